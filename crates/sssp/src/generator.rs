use std::collections::HashSet;

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::graph::DirectedGraph;

const WEIGHT_MIN: f64 = 0.1;
const WEIGHT_MAX: f64 = 100.0;

/// Input families for tests and benches. Deterministic per (case, size, seed).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum GraphCase {
    /// Spanning tree plus random extra edges; every vertex reachable.
    ConnectedRandom,
    /// Uniform random sparse graph, possibly disconnected.
    SparseRandom,
    /// Complete-ish graph on ~sqrt(size) vertices.
    DenseRandom,
    /// A long path with a few shortcuts, vertex ids shuffled.
    AlmostLine,
    /// Four-neighbor grid with random weights.
    GridRandom,
    /// Dense graph where every weight is zero; stresses equal-cost ties.
    DenseZero,
}

impl GraphCase {
    pub fn label(self) -> &'static str {
        match self {
            Self::ConnectedRandom => "connected_random",
            Self::SparseRandom => "sparse_random",
            Self::DenseRandom => "dense_random",
            Self::AlmostLine => "almost_line",
            Self::GridRandom => "grid_random",
            Self::DenseZero => "dense_zero",
        }
    }
}

#[derive(Clone, Debug)]
pub struct GeneratedGraph {
    pub graph: DirectedGraph,
    pub source: usize,
}

pub fn generate_case(case: GraphCase, size: usize, seed: u64) -> GeneratedGraph {
    match case {
        GraphCase::ConnectedRandom => connected_random_case(size.max(32), seed),
        GraphCase::SparseRandom => sparse_random_case(size.max(32), seed, 4),
        GraphCase::DenseRandom => dense_random_case(size.max(64), seed),
        GraphCase::AlmostLine => almost_line_case(size.max(64), seed),
        GraphCase::GridRandom => grid_random_case(size.max(64), seed),
        GraphCase::DenseZero => dense_zero_case(size.max(64), seed),
    }
}

fn connected_random_case(size: usize, seed: u64) -> GeneratedGraph {
    let mut rng = StdRng::seed_from_u64(seed);
    let n = size.max(2);
    let m_target = (n.saturating_mul(4)).min(complete_edges(n));

    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(&mut rng);

    let mut edges = Vec::with_capacity(m_target);
    let mut used = HashSet::with_capacity(m_target * 2 + 1);
    for i in 1..n {
        let parent = order[rng.random_range(0..i)];
        push_unique_edge(&mut edges, &mut used, parent, order[i], random_weight(&mut rng));
    }
    while edges.len() < m_target {
        let u = rng.random_range(0..n);
        let v = rng.random_range(0..n);
        if u == v {
            continue;
        }
        push_unique_edge(&mut edges, &mut used, u, v, random_weight(&mut rng));
    }
    edges.shuffle(&mut rng);

    GeneratedGraph {
        graph: DirectedGraph::from_edges(n, &edges),
        source: order[0],
    }
}

fn sparse_random_case(size: usize, seed: u64, edge_factor: usize) -> GeneratedGraph {
    let mut rng = StdRng::seed_from_u64(seed);
    let n = size.max(2);
    let m_target = (n.saturating_mul(edge_factor)).min(complete_edges(n));
    let mut edges = Vec::with_capacity(m_target);
    let mut used = HashSet::with_capacity(m_target * 2 + 1);

    while edges.len() < m_target {
        let u = rng.random_range(0..n);
        let v = rng.random_range(0..n);
        if u == v {
            continue;
        }
        push_unique_edge(&mut edges, &mut used, u, v, random_weight(&mut rng));
    }

    let source = rng.random_range(0..n);
    GeneratedGraph {
        graph: DirectedGraph::from_edges(n, &edges),
        source,
    }
}

fn dense_random_case(size: usize, seed: u64) -> GeneratedGraph {
    let mut rng = StdRng::seed_from_u64(seed);
    let n = floor_sqrt(size).max(8);
    let mut edges = Vec::with_capacity(complete_edges(n));

    for u in 0..n {
        for v in 0..n {
            if u != v {
                edges.push((u as u32, v as u32, random_weight(&mut rng)));
            }
        }
    }

    let source = rng.random_range(0..n);
    GeneratedGraph {
        graph: DirectedGraph::from_edges(n, &edges),
        source,
    }
}

fn dense_zero_case(size: usize, seed: u64) -> GeneratedGraph {
    let mut rng = StdRng::seed_from_u64(seed);
    let n = floor_sqrt(size).max(8);
    let mut edges = Vec::with_capacity(complete_edges(n));

    for u in 0..n {
        for v in 0..n {
            if u != v {
                edges.push((u as u32, v as u32, 0.0));
            }
        }
    }

    let source = rng.random_range(0..n);
    GeneratedGraph {
        graph: DirectedGraph::from_edges(n, &edges),
        source,
    }
}

fn almost_line_case(size: usize, seed: u64) -> GeneratedGraph {
    let mut rng = StdRng::seed_from_u64(seed);
    let n = size.max(8);
    let mut edges = Vec::with_capacity(n * 2);
    let mut used = HashSet::with_capacity(n * 4);

    for i in 0..(n - 1) {
        push_unique_edge(&mut edges, &mut used, i, i + 1, random_weight(&mut rng));
    }

    let m_target = (n.saturating_mul(2)).min(complete_edges(n));
    while edges.len() < m_target {
        let a = rng.random_range(0..(n - 2));
        let mut b = a + rng.random_range(2..=3);
        if b >= n {
            b = n - 1;
        }
        let (u, v) = if rng.random_bool(0.5) { (b, a) } else { (a, b) };
        push_unique_edge(&mut edges, &mut used, u, v, random_weight(&mut rng));
    }

    let mut perm: Vec<usize> = (0..n).collect();
    perm.shuffle(&mut rng);
    let source = perm[0];

    for edge in &mut edges {
        edge.0 = perm[edge.0 as usize] as u32;
        edge.1 = perm[edge.1 as usize] as u32;
    }
    edges.shuffle(&mut rng);

    GeneratedGraph {
        graph: DirectedGraph::from_edges(n, &edges),
        source,
    }
}

fn grid_random_case(size: usize, seed: u64) -> GeneratedGraph {
    let mut rng = StdRng::seed_from_u64(seed);
    let len = floor_sqrt((size / 4).max(16)).max(4);

    let n = len * len;
    let mut edges = Vec::with_capacity(n * 4);
    let index = |i: usize, j: usize| -> usize { i * len + j };

    for i in 0..len {
        for j in 0..len {
            if j + 1 < len {
                edges.push((
                    index(i, j) as u32,
                    index(i, j + 1) as u32,
                    random_weight(&mut rng),
                ));
            }
            if i + 1 < len {
                edges.push((
                    index(i, j) as u32,
                    index(i + 1, j) as u32,
                    random_weight(&mut rng),
                ));
            }
            if j > 0 {
                edges.push((
                    index(i, j) as u32,
                    index(i, j - 1) as u32,
                    random_weight(&mut rng),
                ));
            }
            if i > 0 {
                edges.push((
                    index(i, j) as u32,
                    index(i - 1, j) as u32,
                    random_weight(&mut rng),
                ));
            }
        }
    }

    edges.shuffle(&mut rng);
    let source = rng.random_range(0..n);
    GeneratedGraph {
        graph: DirectedGraph::from_edges(n, &edges),
        source,
    }
}

#[inline]
fn random_weight(rng: &mut StdRng) -> f64 {
    rng.random_range(WEIGHT_MIN..=WEIGHT_MAX)
}

#[inline]
fn complete_edges(n: usize) -> usize {
    n.saturating_mul(n.saturating_sub(1))
}

#[inline]
fn floor_sqrt(value: usize) -> usize {
    (value as f64).sqrt().floor() as usize
}

#[inline]
fn push_unique_edge(
    edges: &mut Vec<(u32, u32, f64)>,
    used: &mut HashSet<u64>,
    u: usize,
    v: usize,
    weight: f64,
) -> bool {
    if u == v {
        return false;
    }
    let key = ((u as u64) << 32) | v as u64;
    if used.insert(key) {
        edges.push((u as u32, v as u32, weight));
        true
    } else {
        false
    }
}
