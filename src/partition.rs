//! Enumeration of every way to split a finite set into `k` labeled, possibly
//! empty, disjoint blocks.
//!
//! A partition is reported as one label per element: `labels[i]` is the block
//! that element `i` falls into. With `k = 2` this is the power set (label 1 means
//! "in the subset"); with `k = 3` it is every zero/one/two gene assignment.

/// Iterator over all `k^n` labelings of `n` elements.
///
/// Labelings come out in odometer order with element 0 varying fastest, so the
/// first labeling is all zeros and the last is all `k - 1`. Zero elements yield
/// exactly one (empty) labeling; `k = 0` with at least one element yields none.
#[derive(Debug, Clone)]
pub struct Partitions {
    blocks: usize,
    next: Option<Vec<usize>>,
}

impl Partitions {
    pub fn new(elements: usize, blocks: usize) -> Self {
        let next = if elements > 0 && blocks == 0 {
            None
        } else {
            Some(vec![0; elements])
        };
        Self { blocks, next }
    }

    /// Number of labelings this iterator yields in total, or `None` on overflow.
    pub fn count_total(elements: usize, blocks: usize) -> Option<usize> {
        (0..elements).try_fold(1usize, |acc, _| acc.checked_mul(blocks))
    }
}

impl Iterator for Partitions {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        let current = self.next.take()?;
        let mut successor = current.clone();
        for digit in successor.iter_mut() {
            *digit += 1;
            if *digit < self.blocks {
                self.next = Some(successor);
                return Some(current);
            }
            *digit = 0;
        }
        // Every digit wrapped: `current` was the last labeling.
        Some(current)
    }
}

/// All `2^n` subsets of `n` elements as membership flags.
pub fn subsets(elements: usize) -> impl Iterator<Item = Vec<bool>> {
    Partitions::new(elements, 2).map(|labels| labels.into_iter().map(|label| label == 1).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn yields_every_labeling_exactly_once() {
        for elements in 0..5 {
            for k in 1..4 {
                let all: Vec<Vec<usize>> = Partitions::new(elements, k).collect();
                let distinct: HashSet<Vec<usize>> = all.iter().cloned().collect();
                assert_eq!(all.len(), k.pow(elements as u32));
                assert_eq!(distinct.len(), all.len());
                assert!(all.iter().flatten().all(|&label| label < k));
            }
        }
    }

    #[test]
    fn empty_set_has_one_partition() {
        assert_eq!(Partitions::new(0, 3).collect::<Vec<_>>(), vec![Vec::<usize>::new()]);
        assert_eq!(Partitions::new(0, 0).count(), 1);
        assert_eq!(Partitions::new(2, 0).count(), 0);
    }

    #[test]
    fn odometer_order() {
        let all: Vec<Vec<usize>> = Partitions::new(2, 2).collect();
        assert_eq!(all, vec![vec![0, 0], vec![1, 0], vec![0, 1], vec![1, 1]]);
    }

    #[test]
    fn subsets_is_power_set() {
        let all: Vec<Vec<bool>> = subsets(3).collect();
        assert_eq!(all.len(), 8);
        assert_eq!(all[0], vec![false, false, false]);
        assert_eq!(all[7], vec![true, true, true]);
    }

    #[test]
    fn total_count() {
        assert_eq!(Partitions::count_total(4, 3), Some(81));
        assert_eq!(Partitions::count_total(0, 3), Some(1));
        assert_eq!(Partitions::count_total(200, 3), None);
    }
}
