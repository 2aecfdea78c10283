use std::collections::HashMap;
use std::collections::HashSet;

use super::Solver;

/// Grow the relaxation tree `k` layers out of `frontier` and pick the roots
/// whose trees are heavy enough to recurse on.
///
/// Returns `(pivots, all_layers)`. When the expansion fans out past
/// `k * |frontier|` vertices the whole frontier is returned as pivots and the
/// layers collected so far stand in for the full expansion; the driver
/// re-admits any of them that end up settled below its final bound.
pub(super) fn find_pivots(
    solver: &mut Solver<'_, '_>,
    bound: f64,
    frontier: &[usize],
) -> (Vec<usize>, Vec<usize>) {
    if frontier.is_empty() {
        return (Vec::new(), Vec::new());
    }

    let graph = solver.graph;
    let mut all_layers = frontier.to_vec();
    let mut last_layer = frontier.to_vec();
    let mut parent: HashMap<usize, usize> = HashMap::new();
    let budget = solver.k.saturating_mul(frontier.len());

    for _ in 0..solver.k {
        let mut next_layer = Vec::new();
        for &u in &last_layer {
            let (to, weight) = graph.out_edge_slices(u);
            for i in 0..to.len() {
                let v = to[i] as usize;
                let d = solver.min_costs[u] + weight[i];
                // `<=` on purpose: an equal-cost relaxation re-seats the
                // back-pointer, matching the relaxation rule everywhere else.
                if d <= solver.min_costs[v] {
                    solver.min_costs[v] = d;
                    if d < bound {
                        next_layer.push(v);
                        parent.insert(v, u);
                    }
                }
            }
        }
        all_layers.extend_from_slice(&next_layer);
        last_layer = next_layer;
        if all_layers.len() > budget {
            return (frontier.to_vec(), all_layers);
        }
    }

    // Walk each leaf back to its root and credit the root with the depth.
    // Equal-cost re-seating can point back-pointers onto a zero-weight cycle;
    // capping the walk at the map size keeps it finite (an acyclic walk never
    // revisits a vertex, so it takes at most `parent.len()` steps).
    let mut tree_size: HashMap<usize, usize> = HashMap::new();
    let mut chosen: HashSet<usize> = HashSet::new();
    let mut pivots = Vec::new();
    let max_steps = parent.len();

    for &leaf in &last_layer {
        let mut cur = leaf;
        let mut count = 0_usize;
        while count < max_steps {
            let Some(&up) = parent.get(&cur) else {
                break;
            };
            cur = up;
            count += 1;
        }
        let size = tree_size.entry(cur).or_insert(0);
        *size += count;
        if *size >= solver.k && chosen.insert(cur) {
            pivots.push(cur);
        }
    }

    (pivots, all_layers)
}
