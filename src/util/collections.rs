use super::import::*;
use std::collections::{hash_map::RandomState, hash_set::Difference};
use std::hash::Hash;

pub type Diffed<'d, T> = Difference<'d, T, RandomState>;

/// Contains the stored and the wanted side of an
/// association set for the purpose of diffing them.
/// The diff drives the insert and delete statements.
pub struct Diff<D>
where
    D: Hash + Eq,
{
    stored: HashSet<D>,
    wanted: HashSet<D>,
}

impl<D> Diff<D>
where
    D: Hash + Eq,
{
    pub fn new() -> Self {
        Self {
            stored: HashSet::new(),
            wanted: HashSet::new(),
        }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            stored: HashSet::with_capacity(cap),
            wanted: HashSet::with_capacity(cap),
        }
    }

    /// Get the items currently in the database
    pub fn stored(&mut self) -> &mut HashSet<D> { &mut self.stored }
    /// Get the items the caller wants to end up with
    pub fn wanted(&mut self) -> &mut HashSet<D> { &mut self.wanted }

    /// Diff the two internal sets symmetrically:
    /// (stored - wanted, wanted - stored)
    pub fn diff<'d>(&'d self) -> (Diffed<'d, D>, Diffed<'d, D>) {
        (self.stored.difference(&self.wanted), self.wanted.difference(&self.stored))
    }
}

#[cfg(test)]
mod suite {
    use super::*;

    #[test]
    fn check_diff() {
        let mut diff = Diff::new();
        diff.stored().extend(vec![1, 2, 3]);
        diff.wanted().extend(vec![2, 3, 4]);
        let (del, ins) = diff.diff();
        assert_eq!(del.collect::<Vec<_>>(), vec![&1]);
        assert_eq!(ins.collect::<Vec<_>>(), vec![&4]);
    }

    #[test]
    fn check_diff_disjoint() {
        let mut diff = Diff::new();
        diff.stored().extend(vec![(1i64, 1i64)]);
        diff.wanted().extend(vec![(2i64, 2i64)]);
        let (del, ins) = diff.diff();
        assert_eq!(del.count(), 1);
        assert_eq!(ins.count(), 1);
    }

    #[test]
    fn check_diff_converged() {
        let mut diff: Diff<i64> = Diff::with_capacity(2);
        diff.stored().extend(vec![1, 2]);
        diff.wanted().extend(vec![1, 2]);
        let (del, ins) = diff.diff();
        assert_eq!(del.count(), 0);
        assert_eq!(ins.count(), 0);
    }
}
