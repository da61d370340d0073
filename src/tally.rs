//! The end-of-run counters and their consistency checks.

use std::fmt;

use crate::{error::ProtocolViolation, resource::PerKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    /// `signal_count[k]` - rounds where `k` was withheld, i.e. the `k` smoker was expected to act
    pub signal_count: PerKind<u64>,
    /// `smoke_count[k]` - times the `k` smoker actually smoked
    pub smoke_count: PerKind<u64>,
}

impl Tally {
    /// Every expected pairing turned into exactly one smoke and every round into one smoke.
    pub fn verify(&self, iterations: u64) -> Result<(), ProtocolViolation> {
        for (kind, &signalled) in self.signal_count.iter() {
            let smoked = self.smoke_count[kind];
            if signalled != smoked {
                return Err(ProtocolViolation::CountMismatch {
                    kind,
                    signalled,
                    smoked,
                });
            }
        }
        let smoked = self.smoke_count.total();
        if smoked != iterations {
            return Err(ProtocolViolation::RoundMismatch {
                rounds: iterations,
                smoked,
            });
        }
        Ok(())
    }
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use crate::resource::ResourceKind::{Match, Paper, Tobacco};
        write!(
            f,
            "Smoke counts: {} matches, {} paper, {} tobacco",
            self.smoke_count[Match], self.smoke_count[Paper], self.smoke_count[Tobacco]
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::resource::ResourceKind;

    #[test]
    fn test_consistent_tally() {
        let tally = Tally {
            signal_count: PerKind::new(3, 4, 3),
            smoke_count: PerKind::new(3, 4, 3),
        };
        assert_eq!(Ok(()), tally.verify(10));
        assert_eq!(
            "Smoke counts: 3 matches, 4 paper, 3 tobacco",
            tally.to_string()
        );
    }

    #[test]
    fn test_mismatch_per_kind() {
        let tally = Tally {
            signal_count: PerKind::new(3, 4, 3),
            smoke_count: PerKind::new(3, 3, 4),
        };
        assert_eq!(
            Err(ProtocolViolation::CountMismatch {
                kind: ResourceKind::Paper,
                signalled: 4,
                smoked: 3
            }),
            tally.verify(10)
        );
    }

    #[test]
    fn test_missing_rounds() {
        let tally = Tally {
            signal_count: PerKind::new(1, 1, 1),
            smoke_count: PerKind::new(1, 1, 1),
        };
        assert_eq!(
            Err(ProtocolViolation::RoundMismatch {
                rounds: 4,
                smoked: 3
            }),
            tally.verify(4)
        );
    }
}
