//! # Resources
//!
//! There're 3 kinds of scarce resources. A smoker is keyed by the resource the agent withholds
//! for it: the `tobacco` smoker is the one released by a match + paper round.
//!
//! Weights are powers of two, so any two of them sum into a unique number:
//! match + paper = 3, match + tobacco = 5, paper + tobacco = 6.

use std::ops::{Index, IndexMut};

use strum_macros::{Display, EnumIter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
#[strum(serialize_all = "snake_case")]
#[repr(u8)]
pub enum ResourceKind {
    Match = 1,
    Paper = 2,
    Tobacco = 4,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 3] = [Self::Match, Self::Paper, Self::Tobacco];

    /// The weight folded into the accumulator when the resource shows up
    pub const fn weight(self) -> u8 {
        self as u8
    }

    /// position in a [PerKind] table
    const fn slot(self) -> usize {
        match self {
            Self::Match => 0,
            Self::Paper => 1,
            Self::Tobacco => 2,
        }
    }

    /// the two kinds left on the table when `self` is withheld
    pub const fn complement(self) -> [ResourceKind; 2] {
        match self {
            Self::Match => [Self::Paper, Self::Tobacco],
            Self::Paper => [Self::Match, Self::Tobacco],
            Self::Tobacco => [Self::Match, Self::Paper],
        }
    }
}

/// A tiny fixed table with one slot per [ResourceKind].
/// Counters and per-kind conditions are stored in it instead of magic-indexed arrays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerKind<Y> {
    slots: [Y; 3],
}

impl<Y> PerKind<Y> {
    pub const fn new(matches: Y, paper: Y, tobacco: Y) -> Self {
        Self {
            slots: [matches, paper, tobacco],
        }
    }

    /// build every slot out of its kind
    pub fn from_fn(mut f: impl FnMut(ResourceKind) -> Y) -> Self {
        Self::new(
            f(ResourceKind::Match),
            f(ResourceKind::Paper),
            f(ResourceKind::Tobacco),
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, &Y)> {
        ResourceKind::ALL.into_iter().zip(self.slots.iter())
    }
}

impl PerKind<u64> {
    pub fn total(&self) -> u64 {
        self.slots.iter().sum()
    }
}

impl<Y> Index<ResourceKind> for PerKind<Y> {
    type Output = Y;
    fn index(&self, kind: ResourceKind) -> &Self::Output {
        &self.slots[kind.slot()]
    }
}

impl<Y> IndexMut<ResourceKind> for PerKind<Y> {
    fn index_mut(&mut self, kind: ResourceKind) -> &mut Self::Output {
        &mut self.slots[kind.slot()]
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashSet;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_pairwise_sums_are_unique() {
        let sums: HashSet<u8> = ResourceKind::iter()
            .map(|k| k.complement().iter().map(|c| c.weight()).sum())
            .collect();
        assert_eq!(sums, HashSet::from([3, 5, 6]));
    }

    #[test]
    fn test_complement_never_contains_itself() {
        for kind in ResourceKind::iter() {
            assert!(!kind.complement().contains(&kind));
        }
    }

    #[test]
    fn test_names() {
        assert_eq!("match", ResourceKind::Match.to_string());
        assert_eq!("paper", ResourceKind::Paper.to_string());
        assert_eq!("tobacco", ResourceKind::Tobacco.to_string());
    }

    #[test]
    fn test_per_kind_indexing() {
        let mut counts: PerKind<u64> = PerKind::default();
        counts[ResourceKind::Tobacco] += 2;
        counts[ResourceKind::Match] += 1;
        assert_eq!(counts, PerKind::new(1, 0, 2));
        assert_eq!(3, counts.total());
    }
}
