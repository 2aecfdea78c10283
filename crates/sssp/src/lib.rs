mod bmssp;
mod dijkstra;
pub mod generator;
pub mod graph;
pub mod io;
pub mod trace;

pub use bmssp::solve_sssp;
pub use bmssp::solve_sssp_traced;
pub use dijkstra::dijkstra_binary_heap;
pub use graph::DirectedGraph;
pub use graph::Edge;

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::collections::HashSet;
    use std::io::Write;
    use std::sync::Arc;
    use std::sync::Mutex;

    use rand::Rng;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::dijkstra_binary_heap;
    use crate::generator::GraphCase;
    use crate::generator::generate_case;
    use crate::graph::DirectedGraph;
    use crate::solve_sssp;
    use crate::solve_sssp_traced;
    use crate::trace::TraceSink;

    fn random_graph(n: usize, m: usize, seed: u64, fractional: bool) -> DirectedGraph {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut used = HashSet::new();
        let mut edges = Vec::with_capacity(m);

        while edges.len() < m {
            let u = rng.random_range(0..n);
            let v = rng.random_range(0..n);
            if u == v {
                continue;
            }
            let key = ((u as u64) << 32) | v as u64;
            if used.insert(key) {
                let w = if fractional {
                    rng.random_range(0.0..1_000.0)
                } else {
                    rng.random_range(0..1_000_000_u64) as f64
                };
                edges.push((u as u32, v as u32, w));
            }
        }

        DirectedGraph::from_edges(n, &edges)
    }

    #[test]
    fn matches_dijkstra_on_random_small() {
        for seed in 0..30_u64 {
            let n = 40;
            let m = 220;
            let g = random_graph(n, m, 0xB0A5_0000 + seed, false);
            let src = (seed as usize) % n;
            let expected = dijkstra_binary_heap(&g, src);
            let got = solve_sssp(&g, src);
            assert_eq!(got, expected, "seed={seed}");
        }
    }

    #[test]
    fn matches_dijkstra_on_fractional_weights() {
        for seed in 0..20_u64 {
            let n = 64;
            let m = 512;
            let g = random_graph(n, m, 0xF0A7_0000 + seed, true);
            let src = (seed as usize) % n;
            let expected = dijkstra_binary_heap(&g, src);
            let got = solve_sssp(&g, src);
            assert_eq!(got, expected, "seed={seed}");
        }
    }

    #[test]
    fn linear_chain_distances() {
        let g = DirectedGraph::from_edges(4, &[(0, 1, 1.0), (1, 2, 2.0), (2, 3, 3.0)]);
        assert_eq!(solve_sssp(&g, 0), vec![0.0, 1.0, 3.0, 6.0]);
    }

    #[test]
    fn triangle_prefers_the_detour() {
        let g = DirectedGraph::from_edges(3, &[(0, 1, 10.0), (0, 2, 1.0), (2, 1, 1.0)]);
        assert_eq!(solve_sssp(&g, 0), vec![0.0, 2.0, 1.0]);
    }

    #[test]
    fn disconnected_vertex_stays_infinite() {
        let g = DirectedGraph::from_edges(3, &[(0, 1, 5.0)]);
        let dist = solve_sssp(&g, 0);
        assert_eq!(dist[0], 0.0);
        assert_eq!(dist[1], 5.0);
        assert!(dist[2].is_infinite());
    }

    #[test]
    fn zero_weights_and_unreachable_component() {
        let g = DirectedGraph::from_edges(
            6,
            &[(0, 1, 0.0), (1, 2, 0.0), (2, 3, 0.0), (4, 5, 7.0)],
        );
        let expected = dijkstra_binary_heap(&g, 0);
        assert_eq!(solve_sssp(&g, 0), expected);
    }

    #[test]
    fn self_loops_and_parallel_edges_are_harmless() {
        let g = DirectedGraph::from_edges(
            3,
            &[(0, 0, 1.0), (0, 1, 4.0), (0, 1, 2.0), (1, 2, 1.0), (1, 2, 3.0)],
        );
        assert_eq!(solve_sssp(&g, 0), vec![0.0, 2.0, 3.0]);
    }

    #[test]
    fn trivial_sizes() {
        assert!(solve_sssp(&DirectedGraph::new(0), 0).is_empty());

        let one = DirectedGraph::new(1);
        assert_eq!(solve_sssp(&one, 0), vec![0.0]);

        let dist = solve_sssp(&one, 5);
        assert!(dist[0].is_infinite(), "out-of-range source reaches nothing");
    }

    #[test]
    fn relaxed_edge_invariant_holds() {
        for seed in 0..10_u64 {
            let n = 80;
            let g = random_graph(n, 400, 0x1E1A_0000 + seed, true);
            let dist = solve_sssp(&g, (seed as usize) % n);
            for u in 0..n {
                for edge in g.out_edges(u) {
                    assert!(
                        dist[edge.to as usize] <= dist[u] + edge.weight,
                        "edge {u}->{} violates relaxation",
                        edge.to
                    );
                }
            }
        }
    }

    #[test]
    fn generator_smoke_and_agreement() {
        let cases = [
            GraphCase::ConnectedRandom,
            GraphCase::SparseRandom,
            GraphCase::DenseRandom,
            GraphCase::AlmostLine,
            GraphCase::GridRandom,
            GraphCase::DenseZero,
        ];

        for (i, case) in cases.iter().enumerate() {
            let input = generate_case(*case, 1_024, 0x5EED_0000 + i as u64);
            assert!(input.graph.vertex_count() >= 2, "case={case:?}");
            let expected = dijkstra_binary_heap(&input.graph, input.source);
            let got = solve_sssp(&input.graph, input.source);
            assert_eq!(got, expected, "case={case:?}");
        }
    }

    #[test]
    fn connected_case_reaches_every_vertex() {
        let input = generate_case(GraphCase::ConnectedRandom, 256, 0xC0DE);
        let dist = solve_sssp(&input.graph, input.source);
        assert!(dist.iter().all(|d| d.is_finite()));
    }

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn trace_stream_is_wellformed() {
        const EVENTS: [&str; 10] = [
            "SOLVE_START",
            "RECURSION_ENTER",
            "RECURSION_EXIT",
            "FIND_PIVOTS",
            "BASE_CASE",
            "BASE_PQ_POP",
            "BASE_RELAX",
            "BL_INSERT",
            "BL_PREPEND",
            "BL_PULL",
        ];

        let g = random_graph(48, 280, 0x7ACE, false);
        let buf = SharedBuf::default();
        let mut sink = TraceSink::new(Box::new(buf.clone()));

        let traced = solve_sssp_traced(&g, 3, &mut sink);
        assert_eq!(traced, solve_sssp(&g, 3), "tracing must not change results");

        let bytes = buf.0.lock().unwrap().clone();
        let text = String::from_utf8(bytes).unwrap();
        assert!(!text.is_empty());

        let mut depth = 0_i64;
        let mut seen: BTreeSet<String> = BTreeSet::new();
        for (i, line) in text.lines().enumerate() {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            assert_eq!(value["seq"], serde_json::json!(i as u64));

            let event = value["event"].as_str().unwrap().to_owned();
            assert!(EVENTS.contains(&event.as_str()), "unknown event {event}");
            if i == 0 {
                assert_eq!(event, "SOLVE_START");
            }
            match event.as_str() {
                "RECURSION_ENTER" => depth += 1,
                "RECURSION_EXIT" => {
                    depth -= 1;
                    assert!(depth >= 0);
                }
                _ => {}
            }
            seen.insert(event);
        }
        assert_eq!(depth, 0, "enter/exit events must balance");
        assert!(seen.contains("RECURSION_ENTER"));
        assert!(seen.contains("BASE_CASE"));
        assert!(seen.contains("BL_PULL"));
    }
}
