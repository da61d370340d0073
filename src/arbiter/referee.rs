//! The arbiter's state machine. No threads, no mailboxes: one event in, one decision out.

use super::Event;
use crate::{
    error::ProtocolViolation,
    pairing::Accumulator,
    resource::{PerKind, ResourceKind},
    tally::Tally,
};

/// What the arbiter has to do after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Nothing,
    /// the barrier is open, let the agent deal
    Start,
    /// wake the smoker keyed by the kind
    Release(ResourceKind),
    /// a round is over, let the agent go on
    SmokeDone,
}

#[derive(Debug)]
pub struct Referee {
    workers: usize,
    ready: usize,
    accumulator: Accumulator,
    tally: Tally,
    released: PerKind<u64>,
}

impl Referee {
    pub fn new(workers: usize) -> Self {
        Self {
            workers,
            ready: 0,
            accumulator: Accumulator::new(),
            tally: Tally::default(),
            released: PerKind::default(),
        }
    }

    pub fn handle(&mut self, event: Event) -> Result<Outcome, ProtocolViolation> {
        match event {
            Event::Ready => {
                self.ready += 1;
                // exactly once, when the last worker checks in
                Ok(if self.ready == self.workers {
                    Outcome::Start
                } else {
                    Outcome::Nothing
                })
            }
            Event::Offered(excluded) => {
                if self.ready < self.workers {
                    return Err(ProtocolViolation::SignalBeforeReady {
                        ready: self.ready,
                        expected: self.workers,
                    });
                }
                self.tally.signal_count[excluded] += 1;
                Ok(Outcome::Nothing)
            }
            Event::Arrived(kind) => Ok(match self.accumulator.deposit(kind)? {
                Some(smoker) => {
                    self.released[smoker] += 1;
                    Outcome::Release(smoker)
                }
                None => Outcome::Nothing,
            }),
            Event::Smoked(kind) => {
                self.tally.smoke_count[kind] += 1;
                let (smoked, released) = (self.tally.smoke_count[kind], self.released[kind]);
                if smoked > released {
                    return Err(ProtocolViolation::SpuriousSmoke {
                        kind,
                        smoked,
                        released,
                    });
                }
                Ok(Outcome::SmokeDone)
            }
        }
    }

    pub fn accumulated(&self) -> u8 {
        self.accumulator.sum()
    }

    pub fn tally(&self) -> Tally {
        self.tally
    }
}
