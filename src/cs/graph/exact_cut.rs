use crate::cs::graph::hypergraph::HypergraphInput;
use crate::error::{Error, Result};
use std::collections::HashSet;

/// Largest vertex count accepted by [`exact_min_cut`].
pub const MAX_EXACT_VERTICES: usize = 24;

/// Exact minimum cut of a small hypergraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExactCut {
    pub min_cut: usize,
    /// Number of distinct edge sets of size `min_cut` separating some bipartition
    pub distinct_cuts: usize,
}

/// Computes the minimum cut by enumerating every bipartition of the vertices.
///
/// Vertex 1 is pinned to one side, so each unordered bipartition is visited
/// once: `2^(N-1) - 1` masks in total. Intended for cross-checking the
/// randomized solver on small inputs.
pub fn exact_min_cut(input: &HypergraphInput) -> Result<ExactCut> {
    let n = input.vertices;
    if n < 2 {
        return Err(Error::InvalidInput(
            "a cut needs at least two vertices".to_string(),
        ));
    }
    if n > MAX_EXACT_VERTICES {
        return Err(Error::InputTooLarge(format!(
            "{} vertices, exhaustive enumeration supports at most {}",
            n, MAX_EXACT_VERTICES
        )));
    }

    let edges: Vec<[usize; 3]> = input
        .edges
        .iter()
        .map(|e| [e[0] - 1, e[1] - 1, e[2] - 1])
        .collect();

    let mut best = usize::MAX;
    let mut cuts: HashSet<Vec<usize>> = HashSet::new();

    for half in 1u32..(1u32 << (n - 1)) {
        // Bit v of `side` is the side of vertex v; vertex 0 stays on side 0.
        let side = half << 1;
        let crosses = |e: &[usize; 3]| {
            let s = e.map(|v| (side >> v) & 1);
            s[0] != s[1] || s[1] != s[2]
        };

        let size = edges.iter().filter(|e| crosses(*e)).count();
        if size > best {
            continue;
        }
        if size < best {
            best = size;
            cuts.clear();
        }
        let crossing = edges
            .iter()
            .enumerate()
            .filter(|(_, e)| crosses(*e))
            .map(|(i, _)| i)
            .collect();
        cuts.insert(crossing);
    }

    Ok(ExactCut {
        min_cut: best,
        distinct_cuts: cuts.len(),
    })
}
