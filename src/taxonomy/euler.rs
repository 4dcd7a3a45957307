//! Euler tour + sparse table for O(1) lowest-common-ancestor queries
//!
//! The index only knows rows, not taxon ids. A depth-first walk records the
//! current row and its depth at every step, including each return to a
//! parent, which gives a tour of `2N - 1` entries. The shallowest entry
//! between the first occurrences of two rows is their LCA; a sparse table
//! over the depths answers that range-minimum in constant time.

use crate::{Result, TaxLcaError};

/// Power-of-two range-minimum table stored as one contiguous buffer.
///
/// Row `k` holds, for every start `i`, the tour position of the shallowest
/// entry in `[i, i + 2^k)`. Entries past `width - 2^k` are unused.
#[derive(Debug, Clone, Default)]
pub struct SparseTable {
    width: usize,
    levels: usize,
    table: Vec<u32>,
}

impl SparseTable {
    pub fn build(depths: &[u32]) -> Self {
        let width = depths.len();
        if width == 0 {
            return Self::default();
        }
        let levels = width.ilog2() as usize + 1;
        let mut table = vec![0u32; levels * width];

        for (i, slot) in table[..width].iter_mut().enumerate() {
            *slot = i as u32;
        }

        for k in 1..levels {
            let half = 1usize << (k - 1);
            let span = 1usize << k;
            let (done, rest) = table.split_at_mut(k * width);
            let prev = &done[(k - 1) * width..];
            let row = &mut rest[..width];

            for i in 0..=(width - span) {
                let left = prev[i];
                let right = prev[i + half];
                row[i] = if depths[left as usize] <= depths[right as usize] {
                    left
                } else {
                    right
                };
            }
        }

        Self {
            width,
            levels,
            table,
        }
    }

    /// Position of the minimum depth in `[i, j]`, leftmost on ties.
    #[inline]
    pub fn query(&self, depths: &[u32], i: usize, j: usize) -> usize {
        debug_assert!(i <= j && j < self.width);
        let k = (j - i + 1).ilog2() as usize;
        let left = self.table[k * self.width + i] as usize;
        let right = self.table[k * self.width + j + 1 - (1 << k)] as usize;
        if depths[left] <= depths[right] {
            left
        } else {
            right
        }
    }

    pub fn levels(&self) -> usize {
        self.levels
    }

    pub fn memory_usage(&self) -> usize {
        self.table.len() * std::mem::size_of::<u32>()
    }
}

#[derive(Debug, Clone, Default)]
pub struct EulerTourIndex {
    /// Row visited at each tour step (E)
    euler: Vec<u32>,
    /// Depth at each tour step (L)
    depths: Vec<u32>,
    /// First tour position of each row (H)
    first: Vec<u32>,
    sparse: SparseTable,
}

impl EulerTourIndex {
    /// Walk the tree below `root`. `child(row, k)` returns the `k`-th child
    /// row of `row`, or `None` once the children are exhausted.
    ///
    /// Fails if fewer than `row_count` rows are reachable from `root`.
    pub fn build<F>(row_count: usize, root: usize, child: F) -> Result<Self>
    where
        F: Fn(usize, usize) -> Option<usize>,
    {
        if root >= row_count {
            return Err(TaxLcaError::InvalidTree(format!(
                "root row {} outside table of {} rows",
                root, row_count
            )));
        }

        let tour_len = 2 * row_count - 1;
        let mut euler = Vec::with_capacity(tour_len);
        let mut depths = Vec::with_capacity(tour_len);
        let mut first = vec![u32::MAX; row_count];

        // (row, next child cursor)
        let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
        first[root] = 0;
        euler.push(root as u32);
        depths.push(0);

        while let Some(top) = stack.last_mut() {
            let (row, cursor) = *top;
            match child(row, cursor) {
                Some(next) => {
                    top.1 += 1;
                    if next >= row_count || first[next] != u32::MAX {
                        return Err(TaxLcaError::InvalidTree(format!(
                            "row {} reached twice or out of range during tour",
                            next
                        )));
                    }
                    let depth = stack.len() as u32;
                    first[next] = euler.len() as u32;
                    euler.push(next as u32);
                    depths.push(depth);
                    stack.push((next, 0));
                }
                None => {
                    stack.pop();
                    if let Some(&(parent, _)) = stack.last() {
                        euler.push(parent as u32);
                        depths.push(stack.len() as u32 - 1);
                    }
                }
            }
        }

        if euler.len() != tour_len {
            let unreachable = first.iter().filter(|&&pos| pos == u32::MAX).count();
            return Err(TaxLcaError::InvalidTree(format!(
                "{} of {} nodes are not reachable from the root",
                unreachable, row_count
            )));
        }

        let sparse = SparseTable::build(&depths);
        Ok(Self {
            euler,
            depths,
            first,
            sparse,
        })
    }

    /// Lowest common ancestor of two rows
    #[inline]
    pub fn lca(&self, a: usize, b: usize) -> usize {
        let (mut i, mut j) = (self.first[a] as usize, self.first[b] as usize);
        if i > j {
            std::mem::swap(&mut i, &mut j);
        }
        self.euler[self.sparse.query(&self.depths, i, j)] as usize
    }

    /// Depth of `row` below the root
    pub fn depth(&self, row: usize) -> u32 {
        self.depths[self.first[row] as usize]
    }

    pub fn tour_len(&self) -> usize {
        self.euler.len()
    }

    pub fn sparse_levels(&self) -> usize {
        self.sparse.levels()
    }

    pub fn memory_usage(&self) -> usize {
        (self.euler.len() + self.depths.len() + self.first.len()) * std::mem::size_of::<u32>()
            + self.sparse.memory_usage()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(children: &[Vec<usize>]) -> EulerTourIndex {
        EulerTourIndex::build(children.len(), 0, |row, k| children[row].get(k).copied()).unwrap()
    }

    fn parents(children: &[Vec<usize>]) -> Vec<usize> {
        let mut parent = vec![0; children.len()];
        for (row, kids) in children.iter().enumerate() {
            for &kid in kids {
                parent[kid] = row;
            }
        }
        parent
    }

    fn naive_lca(parent: &[usize], a: usize, b: usize) -> usize {
        let mut path = vec![a];
        let mut cur = a;
        while cur != 0 {
            cur = parent[cur];
            path.push(cur);
        }
        let mut cur = b;
        while !path.contains(&cur) {
            cur = parent[cur];
        }
        cur
    }

    #[test]
    fn test_sparse_table_matches_linear_scan() {
        let depths = vec![3, 1, 4, 1, 5, 9, 2, 6, 5, 3, 5, 0, 8, 9, 7];
        let table = SparseTable::build(&depths);
        for i in 0..depths.len() {
            for j in i..depths.len() {
                let expected = (i..=j).min_by_key(|&p| (depths[p], p)).unwrap();
                assert_eq!(table.query(&depths, i, j), expected, "range [{i}, {j}]");
            }
        }
    }

    #[test]
    fn test_sparse_table_single_entry() {
        let table = SparseTable::build(&[7]);
        assert_eq!(table.levels(), 1);
        assert_eq!(table.query(&[7], 0, 0), 0);
    }

    #[test]
    fn test_tour_shape() {
        //      0
        //     / \
        //    1   2
        //   / \
        //  3   4
        let children = vec![vec![1, 2], vec![3, 4], vec![], vec![], vec![]];
        let idx = index(&children);

        assert_eq!(idx.euler, vec![0, 1, 3, 1, 4, 1, 0, 2, 0]);
        assert_eq!(idx.depths, vec![0, 1, 2, 1, 2, 1, 0, 1, 0]);
        assert_eq!(idx.first, vec![0, 1, 7, 2, 4]);
        assert_eq!(idx.tour_len(), 2 * children.len() - 1);
        assert_eq!(idx.depth(4), 2);
    }

    #[test]
    fn test_subtree_segment_contains_only_subtree() {
        let children = vec![vec![1, 2], vec![3, 4], vec![5], vec![], vec![], vec![]];
        let idx = index(&children);
        let last = |row: u32| idx.euler.iter().rposition(|&r| r == row).unwrap();

        let segment: Vec<u32> = idx.euler[idx.first[1] as usize..=last(1)].to_vec();
        assert!(segment.iter().all(|r| [1, 3, 4].contains(r)));
    }

    #[test]
    fn test_lca_matches_naive_walk() {
        let children = vec![
            vec![1, 2, 3],
            vec![4, 5],
            vec![6],
            vec![],
            vec![7, 8],
            vec![],
            vec![9],
            vec![],
            vec![10],
            vec![],
            vec![],
        ];
        let idx = index(&children);
        let parent = parents(&children);

        for a in 0..children.len() {
            for b in 0..children.len() {
                assert_eq!(idx.lca(a, b), naive_lca(&parent, a, b), "lca({a}, {b})");
            }
        }
    }

    #[test]
    fn test_deep_chain_does_not_recurse() {
        let n = 200_000;
        let idx = EulerTourIndex::build(n, 0, |row, k| (k == 0 && row + 1 < n).then_some(row + 1)).unwrap();
        assert_eq!(idx.lca(n - 1, n / 2), n / 2);
        assert_eq!(idx.depth(n - 1), (n - 1) as u32);
    }

    #[test]
    fn test_single_node_tree() {
        let idx = index(&[vec![]]);
        assert_eq!(idx.tour_len(), 1);
        assert_eq!(idx.lca(0, 0), 0);
    }

    #[test]
    fn test_unreachable_rows_fail() {
        // rows 2 and 3 only point at each other
        let children = vec![vec![1], vec![], vec![3], vec![2]];
        let err = EulerTourIndex::build(children.len(), 0, |row, k| children[row].get(k).copied())
            .unwrap_err();
        assert!(matches!(err, TaxLcaError::InvalidTree(_)));
    }
}
