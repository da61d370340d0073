//! Errors of the crate.
//!
//! There're no expected runtime errors: everything but bad input is a broken invariant.

use thiserror::Error;

use crate::resource::ResourceKind;

/// A coordination guarantee didn't hold. Always fatal for the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolViolation {
    /// A deposit would leave the accumulator outside {0, one weight, one pair}.
    #[error("accumulator holds {sum} when {kind} arrived")]
    Accumulator { sum: u8, kind: ResourceKind },

    /// A smoker woke up without being released for its pair.
    #[error("{kind} smoker smoked {smoked} times, released only {released}")]
    SpuriousSmoke {
        kind: ResourceKind,
        smoked: u64,
        released: u64,
    },

    /// The agent announced resources before every worker was parked.
    #[error("round announced with {ready} of {expected} workers ready")]
    SignalBeforeReady { ready: usize, expected: usize },

    #[error("{kind}: signalled {signalled} rounds, smoked {smoked} times")]
    CountMismatch {
        kind: ResourceKind,
        signalled: u64,
        smoked: u64,
    },

    #[error("{smoked} smokes for {rounds} rounds")]
    RoundMismatch { rounds: u64, smoked: u64 },
}

#[derive(Debug, Error)]
pub enum SmokersError {
    #[error("protocol violation: {0}")]
    Protocol(#[from] ProtocolViolation),

    #[error("invalid iteration count `{0}', expected a positive integer")]
    InvalidIterations(String),

    #[error("invalid seed `{0}', expected an unsigned integer")]
    InvalidSeed(String),

    #[error("unknown mode `{0}', use one of {1}")]
    UnknownMode(String, String),

    #[error("{0} thread panicked")]
    WorkerPanicked(String),
}
