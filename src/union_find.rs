//! Disjoint-set structure with path halving, used by [`crate::minimize`] to
//! materialize equivalence-class blocks from a pairwise combinability table.

pub struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    pub fn new(n: usize) -> Self {
        UnionFind {
            parent: (0..n).collect(),
        }
    }

    /// Finds the representative of `i`'s set, halving the path along the way.
    pub fn find(&mut self, i: usize) -> usize {
        let mut i = i;
        while self.parent[i] != self.parent[self.parent[i]] {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        self.parent[i]
    }

    /// Attaches the representative of `i` under the representative of `j`.
    pub fn union(&mut self, i: usize, j: usize) {
        let ri = self.find(i);
        let rj = self.find(j);
        self.parent[ri] = rj;
    }

    /// Returns, for every index, the full set of indices sharing its root.
    pub fn to_closure(&mut self) -> Vec<Vec<usize>> {
        let n = self.parent.len();
        let roots: Vec<usize> = (0..n).map(|i| self.find(i)).collect();
        let mut by_root: std::collections::HashMap<usize, Vec<usize>> =
            std::collections::HashMap::new();
        for (i, &root) in roots.iter().enumerate() {
            by_root.entry(root).or_default().push(i);
        }
        let mut closure = vec![Vec::new(); n];
        for i in 0..n {
            closure[i] = by_root[&roots[i]].clone();
        }
        closure
    }
}
