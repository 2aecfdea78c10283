use std::io;
use std::io::Write;

use crate::graph::DirectedGraph;

/// One solver run as read from the text format: `n m`, then `m` lines
/// `u v w`, then the source vertex, all whitespace-delimited.
pub struct Instance {
    pub graph: DirectedGraph,
    pub source: usize,
}

/// Parse the text format. Edges with an endpoint outside `[0, n)` are
/// discarded. Returns `None` on truncated or non-numeric input; the
/// front-ends treat that as "nothing to do" and exit cleanly.
pub fn parse_instance(input: &str) -> Option<Instance> {
    let mut tokens = input.split_ascii_whitespace();
    let n: usize = tokens.next()?.parse().ok()?;
    let m: usize = tokens.next()?.parse().ok()?;

    let mut edges: Vec<(u32, u32, f64)> = Vec::with_capacity(m);
    for _ in 0..m {
        let u: usize = tokens.next()?.parse().ok()?;
        let v: usize = tokens.next()?.parse().ok()?;
        let w: f64 = tokens.next()?.parse().ok()?;
        if u < n && v < n {
            edges.push((u as u32, v as u32, w));
        }
    }

    let source: usize = tokens.next()?.parse().ok()?;
    Some(Instance {
        graph: DirectedGraph::from_edges(n, &edges),
        source,
    })
}

/// Write the timing line, separator, and per-vertex distances, with `INF`
/// standing in for unreachable vertices.
pub fn write_report<W: Write>(
    out: &mut W,
    label: &str,
    elapsed_ms: f64,
    dist: &[f64],
) -> io::Result<()> {
    writeln!(out, "{label} Time: {elapsed_ms} ms")?;
    writeln!(out, "--------------------")?;
    for (i, &d) in dist.iter().enumerate() {
        if d.is_finite() {
            writeln!(out, "Node {i}: {d}")?;
        } else {
            writeln!(out, "Node {i}: INF")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::parse_instance;
    use super::write_report;

    #[test]
    fn parses_the_documented_format() {
        let input = "4 3\n0 1 1.0\n1 2 2.0\n2 3 3.0\n0\n";
        let instance = parse_instance(input).unwrap();
        assert_eq!(instance.graph.vertex_count(), 4);
        assert_eq!(instance.graph.edge_count(), 3);
        assert_eq!(instance.source, 0);
    }

    #[test]
    fn out_of_range_edges_are_discarded() {
        let input = "3 3  0 1 1.5  7 1 2.0  1 9 2.0  0";
        let instance = parse_instance(input).unwrap();
        assert_eq!(instance.graph.edge_count(), 1);
    }

    #[test]
    fn truncated_or_garbled_input_is_rejected() {
        assert!(parse_instance("").is_none());
        assert!(parse_instance("3 2\n0 1 1.0\n").is_none());
        assert!(parse_instance("3 one\n").is_none());
    }

    #[test]
    fn report_prints_inf_for_unreachable() {
        let mut out = Vec::new();
        write_report(&mut out, "BMSSP", 1.5, &[0.0, 2.5, f64::INFINITY]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("BMSSP Time: 1.5 ms"));
        assert_eq!(lines.next(), Some("--------------------"));
        assert_eq!(lines.next(), Some("Node 0: 0"));
        assert_eq!(lines.next(), Some("Node 1: 2.5"));
        assert_eq!(lines.next(), Some("Node 2: INF"));
    }
}
