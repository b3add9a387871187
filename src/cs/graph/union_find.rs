/// Disjoint-set forest with union by size and full path compression.
///
/// Elements are `0..n`. Every set is identified by its root, and
/// `size_of(root)` is the number of elements resolving to that root.
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl UnionFind {
    /// Initializes `n` singleton sets.
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Finds the root of the set containing `x`.
    ///
    /// Every node visited on the way up is relinked directly to the root, so a
    /// second call on the same element is a single lookup.
    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        let mut node = x;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }

        root
    }

    /// Merges two distinct roots and returns the surviving root.
    ///
    /// The smaller tree is attached under the larger one; on a tie `a` goes
    /// under `b`. Both arguments must already be roots and must differ.
    pub fn union(&mut self, a: usize, b: usize) -> usize {
        debug_assert_ne!(a, b, "union of a set with itself");
        debug_assert_eq!(self.parent[a], a, "union argument is not a root");
        debug_assert_eq!(self.parent[b], b, "union argument is not a root");

        let (child, root) = if self.size[a] > self.size[b] {
            (b, a)
        } else {
            (a, b)
        };
        self.parent[child] = root;
        self.size[root] += self.size[child];
        root
    }

    /// Number of elements in the set containing `x`.
    pub fn size_of(&mut self, x: usize) -> usize {
        let root = self.find(x);
        self.size[root]
    }

    pub fn connected(&mut self, a: usize, b: usize) -> bool {
        self.find(a) == self.find(b)
    }
}
