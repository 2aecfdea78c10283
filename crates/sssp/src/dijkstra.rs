use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;

use crate::graph::DirectedGraph;

/// Textbook binary-heap Dijkstra, the ground truth the recursive solver is
/// checked against.
pub fn dijkstra_binary_heap(graph: &DirectedGraph, source: usize) -> Vec<f64> {
    let n = graph.vertex_count();
    let mut dist = vec![f64::INFINITY; n];
    if source >= n {
        return dist;
    }

    let mut heap: BinaryHeap<Reverse<(OrderedFloat<f64>, usize)>> = BinaryHeap::new();
    dist[source] = 0.0;
    heap.push(Reverse((OrderedFloat(0.0), source)));

    while let Some(Reverse((OrderedFloat(d), u))) = heap.pop() {
        if d != dist[u] {
            continue;
        }

        for edge in graph.out_edges(u) {
            let v = edge.to as usize;
            let cand = d + edge.weight;
            if cand < dist[v] {
                dist[v] = cand;
                heap.push(Reverse((OrderedFloat(cand), v)));
            }
        }
    }

    dist
}
