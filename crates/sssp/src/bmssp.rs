mod block_list;
mod find_pivots;

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::collections::HashSet;

use ordered_float::OrderedFloat;
use serde_json::json;

use crate::graph::DirectedGraph;
use crate::trace::TraceSink;
use crate::trace::dist_json;
use crate::trace::pairs_json;

use block_list::BlockList;

/// Bounded multi-source recursion over the block list, replacing Dijkstra's
/// outer loop. Distances accumulate in `min_costs`; every recursion frame
/// owns a private block list and the distance array is the only shared state.
pub(crate) struct Solver<'g, 't> {
    pub(crate) graph: &'g DirectedGraph,
    pub(crate) min_costs: Vec<f64>,
    pub(crate) k: usize,
    t: usize,
    levels: usize,
    trace: Option<&'t mut TraceSink>,
}

impl<'g, 't> Solver<'g, 't> {
    fn new(graph: &'g DirectedGraph, source: usize, trace: Option<&'t mut TraceSink>) -> Self {
        let n = graph.vertex_count();
        let logn = (n as f64).log2();
        let k = (logn.powf(1.0 / 3.0).floor() as usize).max(2);
        let t = (logn.powf(2.0 / 3.0).floor() as usize).max(1);
        let levels = (logn / t as f64).ceil() as usize;

        let mut min_costs = vec![f64::INFINITY; n];
        min_costs[source] = 0.0;

        Self {
            graph,
            min_costs,
            k,
            t,
            levels,
            trace,
        }
    }

    fn solve(&mut self, source: usize) {
        if let Some(sink) = self.trace.as_deref_mut() {
            sink.event(json!({
                "event": "SOLVE_START",
                "n": self.graph.vertex_count(),
                "source": source,
                "k": self.k,
                "t": self.t,
                "l": self.levels,
            }));
        }
        let frontier = [source];
        let _ = self.bmssp(self.levels, f64::INFINITY, &frontier);
    }

    /// Dijkstra from a single vertex, stopped after `k + 1` settled pops and
    /// capped by `bound`. Under `k + 1` pops everything settled is final up
    /// to `bound`; otherwise the costliest pop becomes the new bound and only
    /// vertices strictly below it count as settled.
    fn base_case(&mut self, bound: f64, start: usize) -> (f64, Vec<usize>) {
        if let Some(sink) = self.trace.as_deref_mut() {
            sink.event(json!({
                "event": "BASE_CASE",
                "v": start,
                "B": dist_json(bound),
            }));
        }

        let graph = self.graph;
        let mut heap: BinaryHeap<Reverse<(OrderedFloat<f64>, usize)>> = BinaryHeap::new();
        heap.push(Reverse((OrderedFloat(self.min_costs[start]), start)));

        let mut settled: Vec<usize> = Vec::new();
        let mut visited: HashSet<usize> = HashSet::new();
        let mut max_cost = self.min_costs[start];

        while settled.len() < self.k + 1 {
            let Some(Reverse((OrderedFloat(cost), u))) = heap.pop() else {
                break;
            };
            if !visited.insert(u) {
                continue;
            }
            settled.push(u);
            if cost > max_cost {
                max_cost = cost;
            }
            if let Some(sink) = self.trace.as_deref_mut() {
                sink.event(json!({
                    "event": "BASE_PQ_POP",
                    "u": u,
                    "c": dist_json(cost),
                }));
            }

            let (to, weight) = graph.out_edge_slices(u);
            for i in 0..to.len() {
                let v = to[i] as usize;
                let d = self.min_costs[u] + weight[i];
                if d <= self.min_costs[v] && d < bound {
                    self.min_costs[v] = d;
                    if let Some(sink) = self.trace.as_deref_mut() {
                        sink.event(json!({
                            "event": "BASE_RELAX",
                            "u": u,
                            "v": v,
                            "d": dist_json(d),
                        }));
                    }
                    heap.push(Reverse((OrderedFloat(d), v)));
                }
            }
        }

        if settled.len() <= self.k {
            return (bound, settled);
        }
        let below = settled
            .iter()
            .copied()
            .filter(|&u| self.min_costs[u] < max_cost)
            .collect();
        (max_cost, below)
    }

    fn bmssp(&mut self, level: usize, bound: f64, frontier: &[usize]) -> (f64, Vec<usize>) {
        if frontier.is_empty() {
            return (bound, Vec::new());
        }
        if let Some(sink) = self.trace.as_deref_mut() {
            sink.event(json!({
                "event": "RECURSION_ENTER",
                "l": level,
                "B": dist_json(bound),
                "frontier": frontier,
            }));
        }

        if level == 0 {
            let (ub, settled) = self.base_case(bound, frontier[0]);
            if let Some(sink) = self.trace.as_deref_mut() {
                sink.event(json!({
                    "event": "RECURSION_EXIT",
                    "l": level,
                    "ub": dist_json(ub),
                    "u_set": &settled,
                }));
            }
            return (ub, settled);
        }

        let (pivots, layers) = find_pivots::find_pivots(self, bound, frontier);
        if let Some(sink) = self.trace.as_deref_mut() {
            sink.event(json!({
                "event": "FIND_PIVOTS",
                "pivots": &pivots,
                "layers": pairs_json(layers.iter().map(|&v| (v, self.min_costs[v]))),
            }));
        }

        let graph = self.graph;
        let capacity = pow2_saturating(self.t.saturating_mul(level - 1));
        let mut list = BlockList::new(capacity, bound);
        let mut min_ub = bound;
        for &p in &pivots {
            let d = self.min_costs[p];
            list.insert(p, d);
            if d < min_ub {
                min_ub = d;
            }
            if let Some(sink) = self.trace.as_deref_mut() {
                sink.event(json!({
                    "event": "BL_INSERT",
                    "u": p,
                    "d": dist_json(d),
                }));
            }
        }

        let settle_cap = self
            .k
            .saturating_mul(pow2_saturating(self.t.saturating_mul(level)));
        let mut settled: Vec<usize> = Vec::new();

        while settled.len() < settle_cap && !list.is_empty() {
            let (pulled, pulled_bound) = list.pull();
            if let Some(sink) = self.trace.as_deref_mut() {
                sink.event(json!({
                    "event": "BL_PULL",
                    "frontier": &pulled,
                    "bound": dist_json(pulled_bound),
                }));
            }

            let (sub_ub, sub_settled) = self.bmssp(level - 1, pulled_bound, &pulled);
            min_ub = sub_ub;

            let mut to_prepend: Vec<(usize, f64)> = Vec::new();
            for &u in &sub_settled {
                settled.push(u);
                let (to, weight) = graph.out_edge_slices(u);
                for i in 0..to.len() {
                    let v = to[i] as usize;
                    let d = self.min_costs[u] + weight[i];
                    if d <= self.min_costs[v] {
                        self.min_costs[v] = d;
                        if pulled_bound <= d && d < bound {
                            list.insert(v, d);
                            if let Some(sink) = self.trace.as_deref_mut() {
                                sink.event(json!({
                                    "event": "BL_INSERT",
                                    "u": v,
                                    "d": dist_json(d),
                                }));
                            }
                        } else if sub_ub <= d && d < pulled_bound {
                            to_prepend.push((v, d));
                        }
                    }
                }
            }

            if let Some(sink) = self.trace.as_deref_mut() {
                sink.event(json!({
                    "event": "BL_PREPEND",
                    "elements": pairs_json(to_prepend.iter().copied()),
                }));
            }
            list.batch_prepend(&to_prepend);
        }

        // Re-admit expansion vertices that ended up below the final bound but
        // were never pulled; the parent frame treats them as settled.
        for &v in &layers {
            if self.min_costs[v] < min_ub {
                settled.push(v);
            }
        }

        if let Some(sink) = self.trace.as_deref_mut() {
            sink.event(json!({
                "event": "RECURSION_EXIT",
                "l": level,
                "ub": dist_json(min_ub),
                "u_set": &settled,
            }));
        }
        (min_ub, settled)
    }
}

#[inline]
fn pow2_saturating(exp: usize) -> usize {
    if exp >= usize::BITS as usize {
        usize::MAX
    } else {
        1_usize << exp
    }
}

fn solve_with(graph: &DirectedGraph, source: usize, trace: Option<&mut TraceSink>) -> Vec<f64> {
    let n = graph.vertex_count();
    if n == 0 {
        return Vec::new();
    }
    if source >= n {
        return vec![f64::INFINITY; n];
    }
    let mut solver = Solver::new(graph, source, trace);
    solver.solve(source);
    solver.min_costs
}

/// Shortest-path distances from `source` to every vertex; `+∞` where
/// unreachable.
pub fn solve_sssp(graph: &DirectedGraph, source: usize) -> Vec<f64> {
    solve_with(graph, source, None)
}

/// Same as [`solve_sssp`] but streaming solver events into `trace`.
pub fn solve_sssp_traced(
    graph: &DirectedGraph,
    source: usize,
    trace: &mut TraceSink,
) -> Vec<f64> {
    solve_with(graph, source, Some(trace))
}
