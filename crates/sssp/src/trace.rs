use std::fs::File;
use std::io;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;

use serde_json::Value;
use serde_json::json;

/// Append-only JSON-lines sink for solver events.
///
/// Each line is one object carrying a monotonic `seq`, an `event` tag, and
/// event-specific payload. Emission is opt-in: the solver only produces
/// events when handed a sink, and the hot path pays nothing otherwise.
/// Write errors are swallowed; the stream is diagnostic, not load-bearing.
pub struct TraceSink {
    out: Box<dyn Write + Send>,
    seq: u64,
}

impl TraceSink {
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self { out, seq: 0 }
    }

    pub fn file(path: &Path) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(Box::new(BufWriter::new(file))))
    }

    pub(crate) fn event(&mut self, mut value: Value) {
        if let Value::Object(fields) = &mut value {
            fields.insert("seq".to_owned(), self.seq.into());
        }
        self.seq += 1;
        let _ = writeln!(self.out, "{value}");
    }
}

/// Distances serialize as numbers, with the string `"inf"` standing in for
/// `+∞` so every line stays parseable JSON.
pub(crate) fn dist_json(d: f64) -> Value {
    if d.is_finite() { json!(d) } else { json!("inf") }
}

/// `[{"n": vertex, "d": distance}, ...]`
pub(crate) fn pairs_json<I>(items: I) -> Value
where
    I: IntoIterator<Item = (usize, f64)>,
{
    Value::Array(
        items
            .into_iter()
            .map(|(n, d)| json!({ "n": n, "d": dist_json(d) }))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::dist_json;
    use super::pairs_json;

    #[test]
    fn infinity_becomes_the_inf_literal() {
        assert_eq!(dist_json(3.5), serde_json::json!(3.5));
        assert_eq!(dist_json(f64::INFINITY), serde_json::json!("inf"));
    }

    #[test]
    fn pairs_carry_vertex_and_distance() {
        let value = pairs_json([(4, 1.25), (7, f64::INFINITY)]);
        assert_eq!(
            value,
            serde_json::json!([{ "n": 4, "d": 1.25 }, { "n": 7, "d": "inf" }])
        );
    }
}
