//! 3-uniform hypergraphs and the contraction engine used by Karger-Stein.
//!
//! A [`Hypergraph`] carries its own disjoint-set forest over the original
//! vertices, so contracting a hyperedge is two unions (x with y, then y with
//! z). Cloning an instance gives a fully detached copy, which is what the
//! branching scheduler relies on.
//!
//! Each hyperedge has two identity tokens:
//! - `id`, its input position, used to remove it from the edge list
//! - `rank`, a random 64-bit value, XOR-ed into the cut fingerprint
//!
//! Because XOR is commutative, the fingerprint of a cut depends only on which
//! edges are in it, never on the order in which they were found.

use crate::cs::graph::union_find::UnionFind;
use crate::error::{Error, Result};
use rand::Rng;
use std::str::FromStr;

/// Largest vertex count accepted from input.
pub const MAX_VERTICES: usize = 1 << 24;

fn check_vertex_count(vertices: usize) -> Result<()> {
    if vertices == 0 {
        return Err(Error::InvalidInput(
            "hypergraph must have at least one vertex".to_string(),
        ));
    }
    if vertices > MAX_VERTICES {
        return Err(Error::InputTooLarge(format!(
            "{} vertices, at most {} are supported",
            vertices, MAX_VERTICES
        )));
    }
    Ok(())
}

/// A hyperedge over three (not necessarily distinct) 0-based vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hyperedge {
    /// Position of the edge in the input, unique per hypergraph
    pub id: usize,
    /// Random token used for cut fingerprints
    pub rank: u64,
    pub vertices: [usize; 3],
}

/// Number of endpoint pairs (xy, yz, xz) lying in different components.
///
/// The result is 0, 2 or 3: a single differing pair is impossible.
fn cross_pairs(forest: &mut UnionFind, edge: &Hyperedge) -> usize {
    let [x, y, z] = edge.vertices;
    let (rx, ry, rz) = (forest.find(x), forest.find(y), forest.find(z));
    usize::from(rx != ry) + usize::from(ry != rz) + usize::from(rx != rz)
}

/// One candidate instance: edges, vertex partition and the partial cut.
#[derive(Debug, Clone)]
pub struct Hypergraph {
    edges: Vec<Hyperedge>,
    forest: UnionFind,
    components: usize,
    cut_size: usize,
    fingerprint: u64,
    cut_edges: Vec<usize>,
}

impl Hypergraph {
    /// Builds an instance from 1-based vertex triples, drawing one random rank
    /// per edge from `rng`.
    pub fn from_triples<R: Rng + ?Sized>(
        vertices: usize,
        triples: &[[usize; 3]],
        rng: &mut R,
    ) -> Result<Self> {
        check_vertex_count(vertices)?;

        let mut edges = Vec::with_capacity(triples.len());
        for (id, triple) in triples.iter().enumerate() {
            let mut zero_based = [0; 3];
            for (slot, &v) in zero_based.iter_mut().zip(triple) {
                if v == 0 || v > vertices {
                    return Err(Error::InvalidVertex {
                        vertex: v,
                        edge: id + 1,
                        vertices,
                    });
                }
                *slot = v - 1;
            }
            edges.push(Hyperedge {
                id,
                rank: rng.gen(),
                vertices: zero_based,
            });
        }

        Ok(Self {
            edges,
            forest: UnionFind::new(vertices),
            components: vertices,
            cut_size: 0,
            fingerprint: 0,
            cut_edges: Vec::new(),
        })
    }

    /// Number of live components (N).
    pub fn components(&self) -> usize {
        self.components
    }

    pub fn edges(&self) -> &[Hyperedge] {
        &self.edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Cut edges classified so far.
    pub fn cut_size(&self) -> usize {
        self.cut_size
    }

    /// XOR of the ranks of the classified cut edges.
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    /// Ids of the classified cut edges, in classification order.
    pub fn cut_edges(&self) -> &[usize] {
        &self.cut_edges
    }

    /// Root of the component holding `vertex` (0-based).
    pub fn component_of(&mut self, vertex: usize) -> usize {
        self.forest.find(vertex)
    }

    /// Drops every edge whose three endpoints lie in one component.
    pub fn remove_self_loops(&mut self) {
        let forest = &mut self.forest;
        self.edges.retain(|e| cross_pairs(forest, e) != 0);
    }

    /// Contracts one hyperedge.
    ///
    /// Self-loops are removed first. With `Some(index)` the edge at that
    /// position of the cleaned list is contracted; with `None` one is drawn
    /// uniformly from `rng`. The edge may merge up to two pairs of components,
    /// and each merge lowers the component count by one.
    ///
    /// # Panics
    ///
    /// Panics if no edges remain after self-loop removal, or if `index` is out
    /// of range.
    pub fn contract<R: Rng + ?Sized>(&mut self, index: Option<usize>, rng: &mut R) {
        self.remove_self_loops();
        assert!(
            !self.edges.is_empty(),
            "contract called on a hypergraph without edges"
        );

        let index = index.unwrap_or_else(|| rng.gen_range(0..self.edges.len()));
        let elim = self.edges[index];
        self.edges.retain(|e| e.id != elim.id);

        let [x, y, z] = elim.vertices;
        let (rx, ry) = (self.forest.find(x), self.forest.find(y));
        if rx != ry {
            self.forest.union(rx, ry);
            self.components -= 1;
        }
        let (ry, rz) = (self.forest.find(y), self.forest.find(z));
        if ry != rz {
            self.forest.union(ry, rz);
            self.components -= 1;
        }
    }

    /// Classifies the remaining edges of a small instance (N ≤ 3).
    ///
    /// An edge whose number of crossing endpoint pairs equals N spans every
    /// component and belongs to the cut. Cut edges and self-loops are then
    /// removed; whatever is left touches exactly two of three components.
    pub fn reduce(&mut self) {
        debug_assert!(self.components <= 3, "reduce on a large hypergraph");

        let n = self.components;
        let forest = &mut self.forest;
        let mut cut_size = self.cut_size;
        let mut fingerprint = self.fingerprint;
        let cut_edges = &mut self.cut_edges;

        self.edges.retain(|e| {
            let crossing = cross_pairs(forest, e);
            if crossing == n {
                fingerprint ^= e.rank;
                cut_size += 1;
                cut_edges.push(e.id);
                false
            } else {
                crossing != 0
            }
        });

        self.cut_size = cut_size;
        self.fingerprint = fingerprint;
    }
}

/// A parsed hypergraph description with 1-based vertices.
///
/// The text form is whitespace separated: vertex count `N`, edge count `M`,
/// then `M` triples of vertex indices in `1..=N`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HypergraphInput {
    pub vertices: usize,
    pub edges: Vec<[usize; 3]>,
}

impl HypergraphInput {
    pub fn new(vertices: usize, edges: Vec<[usize; 3]>) -> Result<Self> {
        let input = Self { vertices, edges };
        input.validate()?;
        Ok(input)
    }

    fn validate(&self) -> Result<()> {
        check_vertex_count(self.vertices)?;
        for (i, edge) in self.edges.iter().enumerate() {
            if let Some(&v) = edge.iter().find(|&&v| v == 0 || v > self.vertices) {
                return Err(Error::InvalidVertex {
                    vertex: v,
                    edge: i + 1,
                    vertices: self.vertices,
                });
            }
        }
        Ok(())
    }

    /// Builds the contraction instance, assigning random ranks from `rng`.
    pub fn to_hypergraph<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Hypergraph> {
        Hypergraph::from_triples(self.vertices, &self.edges, rng)
    }
}

impl FromStr for HypergraphInput {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut tokens = s.split_whitespace();
        let mut next = |what: &str| -> Result<usize> {
            let token = tokens
                .next()
                .ok_or_else(|| Error::InvalidInput(format!("missing {}", what)))?;
            token.parse::<usize>().map_err(|_| {
                Error::InvalidInput(format!(
                    "expected a non-negative integer for {}, found '{}'",
                    what, token
                ))
            })
        };

        let vertices = next("vertex count")?;
        let edge_count = next("edge count")?;
        let mut edges = Vec::with_capacity(edge_count.min(1 << 20));
        for i in 1..=edge_count {
            let what = format!("endpoint of edge {}", i);
            edges.push([next(&what)?, next(&what)?, next(&what)?]);
        }

        if let Some(extra) = tokens.next() {
            return Err(Error::InvalidInput(format!(
                "unexpected trailing token '{}' after {} edges",
                extra, edge_count
            )));
        }

        Self::new(vertices, edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use std::collections::HashSet;

    fn build(vertices: usize, triples: &[[usize; 3]], seed: u64) -> Hypergraph {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        Hypergraph::from_triples(vertices, triples, &mut rng).unwrap()
    }

    #[test]
    fn test_parse_valid_input() {
        let input: HypergraphInput = "4 3\n1 2 3\n1 2 4\n3 4 1\n".parse().unwrap();
        assert_eq!(input.vertices, 4);
        assert_eq!(input.edges, vec![[1, 2, 3], [1, 2, 4], [3, 4, 1]]);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!(
            "3 1\n1 2 4".parse::<HypergraphInput>(),
            Err(Error::InvalidVertex { vertex: 4, edge: 1, vertices: 3 })
        ));
        assert!(matches!(
            "3 1\n0 1 2".parse::<HypergraphInput>(),
            Err(Error::InvalidVertex { vertex: 0, .. })
        ));
        assert!(matches!(
            "3 -1".parse::<HypergraphInput>(),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            "3 2\n1 2 3".parse::<HypergraphInput>(),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            "3 1\n1 2 3 1".parse::<HypergraphInput>(),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            "0 0".parse::<HypergraphInput>(),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_huge_vertex_count_is_rejected() {
        assert!(matches!(
            "100000000000 0".parse::<HypergraphInput>(),
            Err(Error::InputTooLarge(_))
        ));

        let mut rng = ChaCha20Rng::seed_from_u64(10);
        assert!(matches!(
            Hypergraph::from_triples(MAX_VERTICES + 1, &[], &mut rng),
            Err(Error::InputTooLarge(_))
        ));
        assert!(format!("{} 0", MAX_VERTICES).parse::<HypergraphInput>().is_ok());
    }

    #[test]
    fn test_contract_merges_up_to_two_components() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let mut g = build(5, &[[1, 2, 3], [3, 4, 4], [4, 5, 1]], 1);
        assert_eq!(g.components(), 5);

        g.contract(Some(0), &mut rng);
        assert_eq!(g.components(), 3);
        assert_eq!(g.edge_count(), 2);

        // {3, 4, 4} touches two components, so one merge.
        g.contract(Some(0), &mut rng);
        assert_eq!(g.components(), 2);
        assert_eq!(g.edge_count(), 1);
        assert!(g.edges().iter().all(|e| e.id == 2));
    }

    #[test]
    fn test_contract_drops_self_loops_first() {
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        let mut g = build(4, &[[1, 2, 2], [2, 1, 1], [3, 4, 4]], 2);
        g.contract(Some(0), &mut rng);
        assert_eq!(g.components(), 3);
        // Edge 2 is now a loop and is skipped; index 0 of the cleaned list is edge 3.
        g.contract(Some(0), &mut rng);
        assert_eq!(g.components(), 2);
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    #[should_panic(expected = "without edges")]
    fn test_contract_without_edges_panics() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let mut g = build(4, &[[1, 1, 1]], 3);
        g.contract(None, &mut rng);
    }

    #[test]
    fn test_reduce_two_components() {
        let mut rng = ChaCha20Rng::seed_from_u64(4);
        let g0 = build(3, &[[1, 2, 2], [2, 3, 3], [1, 1, 2], [3, 3, 3]], 4);
        let mut g = g0.clone();
        g.contract(Some(0), &mut rng);
        assert_eq!(g.components(), 2);

        g.reduce();
        assert_eq!(g.cut_size(), 1);
        assert_eq!(g.cut_edges(), &[1]);
        assert_eq!(g.fingerprint(), g0.edges()[1].rank);
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn test_reduce_three_components_keeps_partial_edges() {
        let g0 = build(3, &[[1, 2, 3], [1, 1, 2], [2, 3, 3], [3, 3, 3]], 5);
        let mut g = g0.clone();
        g.reduce();
        assert_eq!(g.cut_size(), 1);
        assert_eq!(g.fingerprint(), g0.edges()[0].rank);
        let left: Vec<usize> = g.edges().iter().map(|e| e.id).collect();
        assert_eq!(left, vec![1, 2]);
    }

    #[test]
    fn test_clone_is_detached() {
        let mut rng = ChaCha20Rng::seed_from_u64(6);
        let g = build(4, &[[1, 2, 3], [2, 3, 4]], 6);
        let mut g1 = g.clone();
        g1.contract(Some(0), &mut rng);
        assert_eq!(g.components(), 4);
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g1.components(), 2);
    }

    #[test]
    fn test_descent_accounts_for_every_edge_once() {
        let triples = [
            [1, 2, 3],
            [2, 3, 4],
            [4, 5, 6],
            [5, 6, 7],
            [7, 8, 1],
            [2, 5, 8],
            [3, 3, 6],
            [1, 4, 7],
        ];
        for seed in 0..20 {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let mut g = build(8, &triples, seed);
            while g.components() > 3 {
                g.contract(None, &mut rng);
            }
            g.reduce();
            if g.components() == 3 && g.edge_count() > 0 {
                g.contract(Some(0), &mut rng);
                g.reduce();
            }

            let unique: HashSet<usize> = g.cut_edges().iter().copied().collect();
            assert_eq!(unique.len(), g.cut_edges().len());
            assert_eq!(g.cut_size(), g.cut_edges().len());

            // The classified cut is exactly the set of edges crossing the final partition.
            let mut crossing = HashSet::new();
            for (id, t) in triples.iter().enumerate() {
                let roots: HashSet<usize> = t.iter().map(|&v| g.component_of(v - 1)).collect();
                if roots.len() > 1 {
                    crossing.insert(id);
                }
            }
            assert_eq!(unique, crossing);
        }
    }

    #[test]
    fn test_fingerprint_independent_of_contraction_order() {
        let triples = [[1, 2, 2], [3, 4, 4], [2, 3, 5], [5, 5, 1]];
        let g = build(5, &triples, 9);
        let mut rng = ChaCha20Rng::seed_from_u64(9);

        let mut a = g.clone();
        a.contract(Some(0), &mut rng);
        a.contract(Some(0), &mut rng);
        a.reduce();

        let mut b = g.clone();
        b.contract(Some(1), &mut rng);
        b.contract(Some(0), &mut rng);
        b.reduce();

        assert_eq!(a.components(), 3);
        assert_eq!(b.components(), 3);
        assert_eq!(a.cut_size(), 1);
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint(), g.edges()[2].rank);
    }
}
