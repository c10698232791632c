/// A Disjoint Set Union (DSU) over record indices with full path compression and union by rank.
///
/// Elements are appended one at a time with [`Dsu::add`], so the structure grows
/// alongside the record registry instead of being sized up front.
#[derive(Debug, Default, Clone)]
pub struct Dsu {
    parent: Vec<usize>,
    /// Upper bound on the height of each root's tree. Only ever grows.
    rank: Vec<u32>,
    /// Tracks how many disjoint sets currently exist.
    num_sets: usize,
}

impl Dsu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            parent: Vec::with_capacity(capacity),
            rank: Vec::with_capacity(capacity),
            num_sets: 0,
        }
    }

    /// Appends a new singleton set and returns its index.
    pub fn add(&mut self) -> usize {
        let id = self.parent.len();
        self.parent.push(id);
        self.rank.push(0);
        self.num_sets += 1;
        id
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    pub fn num_sets(&self) -> usize {
        self.num_sets
    }

    /// Returns the representative of `v`'s set, pointing every node on the way straight at it.
    ///
    /// Iterative so that long parent chains cannot overflow the stack.
    ///
    /// # Panics
    ///
    /// Panics if `v` was never handed out by [`Dsu::add`].
    pub fn find(&mut self, v: usize) -> usize {
        assert!(
            v < self.parent.len(),
            "element {v} out of range for DSU of size {}",
            self.parent.len()
        );

        let mut root = v;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        // Second pass: compress the path we just walked
        let mut node = v;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }

        root
    }

    /// Merges the sets of `a` and `b`. Returns `true` if a merge actually occurred.
    ///
    /// The lower-rank root goes under the higher-rank one; on a tie `b`'s root is
    /// attached under `a`'s root and `a`'s rank grows by one.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let mut root_a = self.find(a);
        let mut root_b = self.find(b);

        if root_a == root_b {
            return false;
        }

        if self.rank[root_a] < self.rank[root_b] {
            std::mem::swap(&mut root_a, &mut root_b);
        }

        self.parent[root_b] = root_a;
        if self.rank[root_a] == self.rank[root_b] {
            self.rank[root_a] += 1;
        }
        self.num_sets -= 1;
        true
    }

    pub fn same_set(&mut self, a: usize, b: usize) -> bool {
        self.find(a) == self.find(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    fn dsu_of(n: usize) -> Dsu {
        let mut dsu = Dsu::with_capacity(n);
        for _ in 0..n {
            dsu.add();
        }
        dsu
    }

    #[test]
    fn add_hands_out_sequential_indices() {
        let mut dsu = Dsu::new();
        assert!(dsu.is_empty());
        assert_eq!(0, dsu.add());
        assert_eq!(1, dsu.add());
        assert_eq!(2, dsu.add());
        assert_eq!(3, dsu.len());
        assert_eq!(3, dsu.num_sets());
        for i in 0..3 {
            assert_eq!(i, dsu.find(i));
        }
    }

    #[test]
    fn equal_ranks_attach_second_under_first() {
        let mut dsu = dsu_of(2);
        assert!(dsu.union(0, 1));
        assert_eq!(0, dsu.find(1));
        assert_eq!(1, dsu.rank[0]);
        assert_eq!(0, dsu.rank[1]);
    }

    #[test]
    fn lower_rank_goes_under_higher_rank() {
        let mut dsu = dsu_of(3);
        dsu.union(1, 2); // root 1, rank 1
        assert!(dsu.union(0, 1)); // 0 has rank 0, so it joins 1
        assert_eq!(1, dsu.find(0));
        assert_eq!(1, dsu.rank[1]);
        assert_eq!(1, dsu.num_sets());
    }

    #[test]
    fn union_of_same_set_is_noop() {
        let mut dsu = dsu_of(3);
        dsu.union(0, 1);
        let rank_before = dsu.rank.clone();
        assert!(!dsu.union(1, 0));
        assert_eq!(rank_before, dsu.rank);
        assert_eq!(2, dsu.num_sets());
    }

    #[test]
    fn find_compresses_whole_path() {
        let mut dsu = dsu_of(5);
        // Hand-build a chain 4 -> 3 -> 2 -> 1 -> 0
        for i in 1..5 {
            dsu.parent[i] = i - 1;
        }
        assert_eq!(0, dsu.find(4));
        assert!(dsu.parent.iter().all(|&p| p == 0));
    }

    #[test]
    fn find_survives_very_long_chains() {
        let n = 1_000_000;
        let mut dsu = dsu_of(n);
        for i in 1..n {
            dsu.parent[i] = i - 1;
        }
        assert_eq!(0, dsu.find(n - 1));
    }

    #[rstest]
    #[case(&[], 6)]
    #[case(&[(0, 1), (2, 3), (4, 5)], 3)]
    #[case(&[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5)], 1)]
    #[case(&[(0, 5), (5, 0), (0, 0), (1, 4)], 4)]
    fn unions_leave_expected_set_count(#[case] unions: &[(usize, usize)], #[case] sets: usize) {
        let mut dsu = dsu_of(6);
        for &(a, b) in unions {
            dsu.union(a, b);
        }
        assert_eq!(sets, dsu.num_sets());

        let mut roots = (0..6).map(|v| dsu.find(v)).collect::<Vec<_>>();
        roots.sort_unstable();
        roots.dedup();
        assert_eq!(sets, roots.len());
    }

    #[test]
    fn find_is_idempotent() {
        let mut dsu = dsu_of(8);
        for (a, b) in [(0, 7), (2, 3), (3, 7), (5, 6)] {
            dsu.union(a, b);
        }
        for v in 0..8 {
            let root = dsu.find(v);
            assert_eq!(root, dsu.find(root));
        }
        assert!(dsu.same_set(0, 2));
        assert!(!dsu.same_set(0, 5));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn find_out_of_range_panics() {
        let mut dsu = dsu_of(2);
        dsu.find(2);
    }
}
