//! # Pairing
//!
//! Checkers don't talk to each other. Each one folds its resource's weight into a shared sum
//! and asks the evaluator whether the sum now describes a complete pair.
//!
//! The decode table is spelled out row by row, so changing a weight can't silently
//! route a pair to the wrong smoker without `test_decode_table_matches_weights` failing first.

use crate::{
    error::ProtocolViolation,
    resource::ResourceKind::{self, Match, Paper, Tobacco},
};

/// pairwise sum -> the smoker it releases (the one keyed by the withheld kind)
pub const DECODE_TABLE: [(u8, ResourceKind); 3] = [
    (Match.weight() + Paper.weight(), Tobacco),
    (Match.weight() + Tobacco.weight(), Paper),
    (Paper.weight() + Tobacco.weight(), Match),
];

/// The pure part of the evaluator: which smoker, if any, does `sum` release
pub fn decode(sum: u8) -> Option<ResourceKind> {
    DECODE_TABLE
        .iter()
        .find(|(pair, _)| *pair == sum)
        .map(|(_, smoker)| *smoker)
}

/// 0, a single weight or a complete pair
pub fn is_valid_sum(sum: u8) -> bool {
    sum == 0 || ResourceKind::ALL.iter().any(|k| k.weight() == sum) || decode(sum).is_some()
}

/// The running `sum` shared by the checkers.
/// Between rounds it's always 0.
#[derive(Debug, Default)]
pub struct Accumulator {
    sum: u8,
}

impl Accumulator {
    pub const fn new() -> Self {
        Self { sum: 0 }
    }

    pub fn sum(&self) -> u8 {
        self.sum
    }

    /// Fold `kind` in and evaluate.
    ///
    /// Returns the smoker to release once a pair is complete, the sum is back to 0 then.
    /// A single resource leaves the sum as is for the next checker to complete.
    ///
    /// # Errors
    /// The same weight twice before a reset, or anything that isn't a single weight
    /// or a pair afterwards, means the agent or a checker broke the protocol.
    pub fn deposit(
        &mut self,
        kind: ResourceKind,
    ) -> Result<Option<ResourceKind>, ProtocolViolation> {
        let violation = ProtocolViolation::Accumulator {
            sum: self.sum,
            kind,
        };
        if self.sum & kind.weight() != 0 {
            return Err(violation);
        }
        let sum = self.sum + kind.weight();
        if !is_valid_sum(sum) {
            return Err(violation);
        }
        self.sum = sum;

        let released = decode(self.sum);
        if released.is_some() {
            self.sum = 0;
        }
        Ok(released)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_decode_table_matches_weights() {
        for (sum, smoker) in DECODE_TABLE {
            let [a, b] = smoker.complement();
            assert_eq!(sum, a.weight() + b.weight());
        }
    }

    #[test]
    fn test_single_weights_release_nobody() {
        for kind in ResourceKind::ALL {
            assert_eq!(None, decode(kind.weight()));
        }
        assert_eq!(None, decode(0));
        assert_eq!(None, decode(7));
    }

    #[test]
    fn test_match_then_paper_releases_tobacco() {
        let mut acc = Accumulator::new();
        assert_eq!(Ok(None), acc.deposit(Match));
        assert_eq!(1, acc.sum());
        assert_eq!(Ok(Some(Tobacco)), acc.deposit(Paper));
        assert_eq!(0, acc.sum());
    }

    #[test]
    fn test_order_does_not_matter() {
        for smoker in ResourceKind::ALL {
            let [a, b] = smoker.complement();
            for (first, second) in [(a, b), (b, a)] {
                let mut acc = Accumulator::new();
                assert_eq!(Ok(None), acc.deposit(first));
                assert_eq!(Ok(Some(smoker)), acc.deposit(second));
                assert_eq!(0, acc.sum());
            }
        }
    }

    #[test]
    fn test_same_resource_twice_is_a_violation() {
        let mut acc = Accumulator::new();
        acc.deposit(Paper).unwrap();
        assert_eq!(
            Err(ProtocolViolation::Accumulator {
                sum: 2,
                kind: Paper
            }),
            acc.deposit(Paper)
        );
        // the failed deposit leaves the sum untouched
        assert_eq!(2, acc.sum());
    }

    #[test]
    fn test_sum_stays_in_valid_set() {
        let mut acc = Accumulator::new();
        for smoker in [Match, Tobacco, Tobacco, Paper, Match] {
            let [a, b] = smoker.complement();
            acc.deposit(a).unwrap();
            assert!(is_valid_sum(acc.sum()));
            acc.deposit(b).unwrap();
            assert_eq!(0, acc.sum());
        }
        assert!(!is_valid_sum(7));
    }
}
