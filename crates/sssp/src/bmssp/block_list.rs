use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::collections::HashMap;
use std::collections::VecDeque;

use ordered_float::OrderedFloat;

#[derive(Clone, Copy, Debug)]
struct Element {
    u: usize,
    d: f64,
}

#[inline]
fn cmp_elements(a: &Element, b: &Element) -> Ordering {
    OrderedFloat(a.d)
        .cmp(&OrderedFloat(b.d))
        .then_with(|| a.u.cmp(&b.u))
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum ListKind {
    D0,
    D1,
}

#[derive(Debug)]
struct Block {
    kind: ListKind,
    // D1 blocks carry a fixed upper bound on the keys inside them; the bound
    // is only ever lowered when the block is split. D0 blocks ignore it.
    upper_bound: f64,
    entries: Vec<Element>,
}

#[derive(Clone, Copy, Debug)]
struct Locator {
    kind: ListKind,
    block_id: usize,
    idx: usize,
    d: f64,
}

/// Bounded multiset of `(vertex, key)` pairs with decrease-key semantics.
///
/// Two block sequences back the structure: `d1` receives single inserts and is
/// kept range-partitioned by per-block upper bounds, `d0` receives batch
/// prepends whose keys are smaller than everything already stored. `pull`
/// extracts up to `limit` smallest keys together with a separator bound that
/// is below every key left behind.
///
/// Every operation is total. Keys at or above the global bound are dropped on
/// entry, and a non-improving key for a vertex already present is a no-op.
#[derive(Debug)]
pub(crate) struct BlockList {
    limit: usize,
    bound: f64,
    d0: VecDeque<usize>,
    // (upper_bound, block_id) in ascending upper_bound order; block ids keep
    // entries unique when two blocks share a bound.
    d1: BTreeSet<(OrderedFloat<f64>, usize)>,
    blocks: Vec<Block>,
    locator: HashMap<usize, Locator>,
}

impl BlockList {
    pub fn new(limit: usize, bound: f64) -> Self {
        let mut this = Self {
            limit: limit.max(1),
            bound,
            d0: VecDeque::new(),
            d1: BTreeSet::new(),
            blocks: Vec::new(),
            locator: HashMap::new(),
        };
        // One empty block with the global bound so the first insert always
        // finds a target; it is never dropped from the index.
        let sentinel = this.alloc_block(ListKind::D1, bound, Vec::new());
        this.d1.insert((OrderedFloat(bound), sentinel));
        this
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.locator.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.locator.len()
    }

    pub fn insert(&mut self, u: usize, d: f64) {
        if d >= self.bound {
            return;
        }
        if let Some(&loc) = self.locator.get(&u) {
            if loc.d <= d {
                return;
            }
            self.remove_at(u, loc);
        }

        // Smallest upper bound that still admits the key; the sentinel bound
        // covers every key below the global bound.
        let chosen = self
            .d1
            .range((OrderedFloat(d), 0)..)
            .next()
            .or_else(|| self.d1.iter().next_back())
            .copied();
        let Some((_, block_id)) = chosen else {
            return;
        };

        let idx = {
            let block = &mut self.blocks[block_id];
            block.entries.push(Element { u, d });
            block.entries.len() - 1
        };
        self.locator.insert(
            u,
            Locator {
                kind: ListKind::D1,
                block_id,
                idx,
                d,
            },
        );

        if self.blocks[block_id].entries.len() > self.limit {
            self.split_insert_block(block_id);
        }
    }

    pub fn batch_prepend(&mut self, elements: &[(usize, f64)]) {
        if elements.is_empty() {
            return;
        }

        // Smallest key per vertex wins within the batch.
        let mut best: HashMap<usize, f64> = HashMap::with_capacity(elements.len());
        for &(u, d) in elements {
            best.entry(u)
                .and_modify(|cur| {
                    if d < *cur {
                        *cur = d;
                    }
                })
                .or_insert(d);
        }

        let mut accepted: Vec<Element> = Vec::with_capacity(best.len());
        for &(u, _) in elements {
            let Some(&d) = best.get(&u) else {
                continue;
            };
            best.remove(&u);
            if d >= self.bound {
                continue;
            }
            if let Some(&loc) = self.locator.get(&u) {
                if loc.d <= d {
                    continue;
                }
                self.remove_at(u, loc);
            }
            accepted.push(Element { u, d });
        }
        if accepted.is_empty() {
            return;
        }

        if accepted.len() <= self.limit {
            let block_id = self.alloc_block(ListKind::D0, self.bound, accepted);
            self.relink(block_id);
            self.d0.push_front(block_id);
            return;
        }

        // Oversized batch: repeated median partitions down to half-blocks,
        // pushed front-most-smallest so the head of D0 stays the minimum.
        let cap = self.limit.div_ceil(2);
        let mut segments: Vec<(usize, usize)> = Vec::new();
        partition_by_medians(&mut accepted, cap, &mut segments);
        segments.sort_unstable_by_key(|&(start, _)| start);

        for (start, end) in segments.into_iter().rev() {
            let chunk = accepted[start..end].to_vec();
            let block_id = self.alloc_block(ListKind::D0, self.bound, chunk);
            self.relink(block_id);
            self.d0.push_front(block_id);
        }
    }

    /// Extract up to `limit` vertices with the smallest keys, together with a
    /// separator bound. Keys strictly below the cut are taken; when the whole
    /// selection ties at the cut the batch is taken anyway so the caller
    /// always makes progress.
    pub fn pull(&mut self) -> (Vec<usize>, f64) {
        let total = self.locator.len();
        if total == 0 {
            return (Vec::new(), self.bound);
        }

        if total <= self.limit {
            let mut frontier = Vec::with_capacity(total);
            for &block_id in &self.d0 {
                frontier.extend(self.blocks[block_id].entries.iter().map(|e| e.u));
            }
            for &(_, block_id) in &self.d1 {
                frontier.extend(self.blocks[block_id].entries.iter().map(|e| e.u));
            }
            self.reset_empty();
            return (frontier, self.bound);
        }

        self.drop_empty_d0_front();
        let mut candidates: Vec<Element> = Vec::with_capacity(self.limit * 2);
        let mut seen = 0_usize;
        for &block_id in &self.d0 {
            if seen >= self.limit {
                break;
            }
            let block = &self.blocks[block_id];
            if block.entries.is_empty() {
                continue;
            }
            candidates.extend_from_slice(&block.entries);
            seen += block.entries.len();
        }
        let mut seen = 0_usize;
        for &(_, block_id) in &self.d1 {
            if seen >= self.limit {
                break;
            }
            let block = &self.blocks[block_id];
            if block.entries.is_empty() {
                continue;
            }
            candidates.extend_from_slice(&block.entries);
            seen += block.entries.len();
        }
        debug_assert!(candidates.len() >= self.limit, "prefix scan must cover a full batch");

        let nth = self.limit - 1;
        candidates.select_nth_unstable_by(nth, cmp_elements);
        let cut = candidates[nth].d;

        let mut frontier: Vec<usize> = candidates[..nth]
            .iter()
            .filter(|e| e.d < cut)
            .map(|e| e.u)
            .collect();
        if frontier.is_empty() {
            frontier.extend(candidates[..=nth].iter().map(|e| e.u));
        }

        for &u in &frontier {
            if let Some(&loc) = self.locator.get(&u) {
                self.remove_at(u, loc);
            }
        }

        let bound = self.remaining_min().unwrap_or(self.bound);
        (frontier, bound)
    }

    fn remaining_min(&mut self) -> Option<f64> {
        if self.locator.is_empty() {
            return None;
        }
        self.drop_empty_d0_front();
        let d0_min = self
            .d0
            .front()
            .and_then(|&block_id| block_min(&self.blocks[block_id]));
        let d1_min = self
            .d1
            .iter()
            .find_map(|&(_, block_id)| block_min(&self.blocks[block_id]));
        match (d0_min, d1_min) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (Some(a), None) => Some(a),
            (None, Some(b)) => Some(b),
            (None, None) => None,
        }
    }

    fn split_insert_block(&mut self, block_id: usize) {
        let ub_old = self.blocks[block_id].upper_bound;
        self.d1.remove(&(OrderedFloat(ub_old), block_id));

        let mut entries = std::mem::take(&mut self.blocks[block_id].entries);
        let mid = entries.len() / 2;
        entries.select_nth_unstable_by(mid, cmp_elements);
        let right = entries.split_off(mid);
        let left = entries;

        // The left half keeps the block but with a tight bound, so the right
        // half (and any later block) stays at or above it.
        let ub_left = left
            .iter()
            .map(|e| OrderedFloat(e.d))
            .max()
            .map_or(ub_old, |d| d.0);

        self.blocks[block_id].entries = left;
        self.blocks[block_id].upper_bound = ub_left;
        self.relink(block_id);

        let right_id = self.alloc_block(ListKind::D1, ub_old, right);
        self.relink(right_id);

        self.d1.insert((OrderedFloat(ub_left), block_id));
        self.d1.insert((OrderedFloat(ub_old), right_id));
    }

    fn remove_at(&mut self, u: usize, loc: Locator) {
        self.locator.remove(&u);
        let moved = {
            let block = &mut self.blocks[loc.block_id];
            debug_assert_eq!(block.kind, loc.kind);
            debug_assert_eq!(block.entries[loc.idx].u, u);
            block.entries.swap_remove(loc.idx);
            block.entries.get(loc.idx).copied()
        };
        if let Some(m) = moved {
            if let Some(slot) = self.locator.get_mut(&m.u) {
                slot.idx = loc.idx;
            }
        }

        let block = &self.blocks[loc.block_id];
        if block.kind == ListKind::D1
            && block.entries.is_empty()
            && block.upper_bound != self.bound
        {
            self.d1.remove(&(OrderedFloat(block.upper_bound), loc.block_id));
        }
    }

    fn relink(&mut self, block_id: usize) {
        let kind = self.blocks[block_id].kind;
        for idx in 0..self.blocks[block_id].entries.len() {
            let e = self.blocks[block_id].entries[idx];
            self.locator.insert(
                e.u,
                Locator {
                    kind,
                    block_id,
                    idx,
                    d: e.d,
                },
            );
        }
    }

    fn drop_empty_d0_front(&mut self) {
        while let Some(&block_id) = self.d0.front() {
            if !self.blocks[block_id].entries.is_empty() {
                break;
            }
            self.d0.pop_front();
        }
    }

    fn reset_empty(&mut self) {
        self.locator.clear();
        self.d0.clear();
        self.d1.clear();
        self.blocks.clear();
        let sentinel = self.alloc_block(ListKind::D1, self.bound, Vec::new());
        self.d1.insert((OrderedFloat(self.bound), sentinel));
    }

    fn alloc_block(&mut self, kind: ListKind, upper_bound: f64, entries: Vec<Element>) -> usize {
        let block_id = self.blocks.len();
        self.blocks.push(Block {
            kind,
            upper_bound,
            entries,
        });
        block_id
    }
}

#[inline]
fn block_min(block: &Block) -> Option<f64> {
    block
        .entries
        .iter()
        .map(|e| OrderedFloat(e.d))
        .min()
        .map(|d| d.0)
}

fn partition_by_medians(values: &mut [Element], cap: usize, out: &mut Vec<(usize, usize)>) {
    out.clear();
    let mut stack: Vec<(usize, usize)> = vec![(0, values.len())];
    while let Some((l, r)) = stack.pop() {
        let len = r - l;
        if len <= cap {
            out.push((l, r));
            continue;
        }
        let mid = l + len / 2;
        values[l..r].select_nth_unstable_by(mid - l, cmp_elements);
        // After the partition: [l, mid) <= [mid, r).
        stack.push((mid, r));
        stack.push((l, mid));
    }
}
