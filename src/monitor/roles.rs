//! The loops of the agent, the checkers and the smokers.
//!
//! All of them follow the same shape: lock, then loop { wait for a pending wake-up, act }.
//! The guard is only given away inside `Condvar::wait`.

use log::debug;
use parking_lot::{Condvar, MutexGuard};

use super::{State, Table, WORKERS};
use crate::{
    dealer::{Dealer, Offer},
    error::ProtocolViolation,
    resource::ResourceKind,
};

impl Table {
    /// The worker is at its wait point; let the agent count it.
    /// Called with the lock held right before the 1st wait => the wait can't be missed.
    fn register(&self, state: &mut State) {
        state.ready += 1;
        self.smoke.notify_one();
    }

    /// Withhold `offer.excluded` and put the other two on the table in the offered order.
    pub(super) fn announce(
        &self,
        state: &mut State,
        offer: Offer,
    ) -> Result<(), ProtocolViolation> {
        if state.ready < WORKERS {
            return Err(ProtocolViolation::SignalBeforeReady {
                ready: state.ready,
                expected: WORKERS,
            });
        }
        state.tally.signal_count[offer.excluded] += 1;
        for kind in offer.order {
            debug!("{kind} available");
            state.available[kind] += 1;
            self.resource[kind].notify_one();
        }
        Ok(())
    }

    /// Agent: wait for the barrier, then deal `iterations` rounds, one smoke per round.
    /// Returns early if some worker broke the protocol.
    pub(super) fn agent(
        &self,
        dealer: &mut dyn Dealer,
        iterations: u64,
    ) -> Result<(), ProtocolViolation> {
        let mut state = self.state.lock();

        // wait until all other threads are waiting for a signal
        while state.ready < WORKERS && !state.shutdown {
            self.smoke.wait(&mut state);
        }

        for _ in 0..iterations {
            if state.shutdown {
                break;
            }
            if let Err(violation) = self.announce(&mut state, dealer.next_offer()) {
                return Err(self.abort(&mut state, violation));
            }

            debug!("agent is waiting for smoker to smoke");
            while state.smoked == 0 && !state.shutdown {
                self.smoke.wait(&mut state);
            }
            if state.smoked > 0 {
                state.smoked -= 1;
            }
        }
        Ok(())
    }

    /// Checker for `kind`: fold the weight in, let the evaluator release a smoker.
    pub(super) fn checker(&self, kind: ResourceKind) -> Result<(), ProtocolViolation> {
        let mut state = self.state.lock();
        self.register(&mut state);

        loop {
            if !self.wait_for(&mut state, |s| &mut s.available[kind], &self.resource[kind]) {
                return Ok(());
            }
            match state.accumulator.deposit(kind) {
                Ok(Some(smoker)) => {
                    debug!("{kind} completes the pair, releasing {smoker} smoker");
                    state.released[smoker] += 1;
                    state.go[smoker] += 1;
                    self.materials[smoker].notify_one();
                }
                Ok(None) => {}
                Err(violation) => return Err(self.abort(&mut state, violation)),
            }
        }
    }

    /// Smoker keyed by `kind`: smoke when released, then let the agent go on.
    pub(super) fn smoker(&self, kind: ResourceKind) -> Result<(), ProtocolViolation> {
        let mut state = self.state.lock();
        self.register(&mut state);

        loop {
            if !self.wait_for(&mut state, |s| &mut s.go[kind], &self.materials[kind]) {
                return Ok(());
            }
            state.tally.smoke_count[kind] += 1;
            let (smoked, released) = (state.tally.smoke_count[kind], state.released[kind]);
            if smoked > released {
                let violation = ProtocolViolation::SpuriousSmoke {
                    kind,
                    smoked,
                    released,
                };
                return Err(self.abort(&mut state, violation));
            }
            debug!("{kind} smoker smoked");
            state.smoked += 1;
            self.smoke.notify_one();
        }
    }

    /// Block on `condvar` until the pending counter picked by `pending` is positive, then take one.
    /// Returns false on shutdown.
    fn wait_for(
        &self,
        state: &mut MutexGuard<'_, State>,
        pending: impl Fn(&mut State) -> &mut u32,
        condvar: &Condvar,
    ) -> bool {
        loop {
            if state.shutdown {
                return false;
            }
            let counter = pending(&mut **state);
            if *counter > 0 {
                *counter -= 1;
                return true;
            }
            condvar.wait(state);
        }
    }
}
