///
/// Enumerates all ways to split `n` objects into two nonempty groups, where each unordered split
/// is produced exactly once.
///
/// The splits are enumerated by increasing size of the left group, so the first splits have a
/// single object on the left. If `n` is even and the left group has size `n/2`, only the splits
/// whose left group contains the first object are produced, as the others are the same splits
/// with both groups exchanged.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Partition {
    n: usize,
    left: Vec<usize>
}

impl Partition {

    ///
    /// Creates the enumeration, positioned at its first split. Returns `None` if there is no
    /// split at all, i.e. `n < 2`.
    ///
    pub fn new(n: usize) -> Option<Self> {
        if n < 2 {
            return None;
        }
        return Some(Partition { n: n, left: vec![0] });
    }

    ///
    /// The indices of the left group, in ascending order.
    ///
    pub fn left(&self) -> &[usize] {
        &self.left
    }

    ///
    /// The indices of the right group, in ascending order.
    ///
    pub fn right(&self) -> Vec<usize> {
        (0..self.n).filter(|i| self.left.binary_search(i).is_err()).collect()
    }

    ///
    /// Moves to the next split, returning `false` if all splits have been produced.
    ///
    pub fn advance(&mut self) -> bool {
        let k = self.left.len();
        // find the last index that can still be increased
        let position = (0..k).rev().find(|i| self.left[*i] < self.n - k + *i);
        match position {
            Some(i) => {
                self.left[i] += 1;
                for j in (i + 1)..k {
                    self.left[j] = self.left[j - 1] + 1;
                }
            },
            None => {
                if 2 * (k + 1) > self.n {
                    return false;
                }
                self.left = (0..(k + 1)).collect();
            }
        }
        if 2 * self.left.len() == self.n && self.left[0] != 0 {
            return false;
        }
        return true;
    }
}

///
/// An entry in the work-list of the recombination search: a polynomial together with the modular
/// factors whose recombination is still open.
///
#[derive(Clone, Debug)]
pub struct SearchFrame<P, F> {
    pub poly: P,
    pub factors: Vec<F>
}

impl<P, F: Clone> SearchFrame<P, F> {

    pub fn new(poly: P, factors: Vec<F>) -> Self {
        SearchFrame { poly: poly, factors: factors }
    }

    ///
    /// Returns the modular factors selected by the given indices.
    ///
    pub fn select(&self, indices: &[usize]) -> Vec<F> {
        indices.iter().map(|i| self.factors[*i].clone()).collect()
    }
}

#[cfg(test)]
fn all_splits(n: usize) -> Vec<(Vec<usize>, Vec<usize>)> {
    let mut result = Vec::new();
    if let Some(mut partition) = Partition::new(n) {
        loop {
            result.push((partition.left().to_vec(), partition.right()));
            if !partition.advance() {
                break;
            }
        }
    }
    return result;
}

#[test]
fn test_partition_small() {
    assert!(Partition::new(0).is_none());
    assert!(Partition::new(1).is_none());
    assert_eq!(vec![(vec![0], vec![1])], all_splits(2));
    assert_eq!(vec![(vec![0], vec![1, 2]), (vec![1], vec![0, 2]), (vec![2], vec![0, 1])], all_splits(3));
    assert_eq!(vec![
        (vec![0], vec![1, 2, 3]),
        (vec![1], vec![0, 2, 3]),
        (vec![2], vec![0, 1, 3]),
        (vec![3], vec![0, 1, 2]),
        (vec![0, 1], vec![2, 3]),
        (vec![0, 2], vec![1, 3]),
        (vec![0, 3], vec![1, 2])
    ], all_splits(4));
}

#[test]
fn test_partition_counts() {
    // there are 2^(n - 1) - 1 unordered splits into two nonempty groups
    for n in 2..10 {
        let splits = all_splits(n);
        assert_eq!((1 << (n - 1)) - 1, splits.len());
        let mut normalized = splits.iter().map(|(l, r)| if l.contains(&0) { l.clone() } else { r.clone() }).collect::<Vec<_>>();
        normalized.sort();
        normalized.dedup();
        assert_eq!(splits.len(), normalized.len());
    }
}

#[test]
fn test_search_frame_select() {
    let frame = SearchFrame::new("f", vec!['a', 'b', 'c']);
    assert_eq!(vec!['a', 'c'], frame.select(&[0, 2]));
}
