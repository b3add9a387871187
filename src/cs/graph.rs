//! Minimum cuts of 3-uniform hypergraphs.
//!
//! - [`union_find`]: disjoint-set forest with union by size
//! - [`hypergraph`]: parsing and the contraction engine
//! - [`karger_stein`]: randomized recursive contraction and the trial driver
//! - [`exact_cut`]: exhaustive bipartition enumeration for small inputs

pub mod exact_cut;
pub mod hypergraph;
pub mod karger_stein;
pub mod union_find;

pub use exact_cut::{exact_min_cut, ExactCut};
pub use hypergraph::{Hyperedge, Hypergraph, HypergraphInput};
pub use karger_stein::{
    karger_stein, CutCandidate, HypergraphMinCut, MinCutConfig, MinCutReport, MinCutTracker,
};
pub use union_find::UnionFind;
