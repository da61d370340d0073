//! # Monitor
//!
//! The classic wiring: one mutex guards _all_ the shared state, every wake condition is a condvar
//! over that mutex. Every thread locks once before its loop and keeps the lock for the loop's
//! whole lifetime, the only place it's released is inside a condvar wait.
//! So there's at most one thread running post-wake logic at a time, which is what makes the
//! accumulate-then-decode evaluator race-free.
//!
//! A condvar signal only wakes somebody who's already waiting. OS threads are preemptive and
//! condvars may wake spuriously, so each condition is paired with a counter of pending wake-ups
//! and every wait loops on it. A thread is woken exactly when it can proceed.
//!
//! The agent still waits on the readiness barrier before its 1st round: nobody gets signalled
//! before all 6 workers reached their wait point.
//!
//! See [roles] for what each thread does.

mod roles;

use std::thread;

use log::{error, info};
use parking_lot::{Condvar, Mutex};

use crate::{
    dealer::Dealer,
    error::{ProtocolViolation, SmokersError},
    pairing::Accumulator,
    resource::{PerKind, ResourceKind},
    tally::Tally,
};

/// 3 checkers + 3 smokers
pub const WORKERS: usize = 6;

/// Everything behind the lock
#[derive(Debug, Default)]
struct State {
    accumulator: Accumulator,
    tally: Tally,
    /// smokers released by the evaluator, per kind
    released: PerKind<u64>,
    /// `num_active_threads` - workers parked at their wait point
    ready: usize,
    /// pending "resource available" wake-ups
    available: PerKind<u32>,
    /// pending "materials available" wake-ups
    go: PerKind<u32>,
    /// pending "smoke done" wake-ups
    smoked: u32,
    shutdown: bool,
    /// the 1st broken invariant, if any
    violation: Option<ProtocolViolation>,
}

/// The coordination state shared by reference among all the threads of a run
pub struct Table {
    state: Mutex<State>,
    /// fires when the kind is put on the table
    resource: PerKind<Condvar>,
    /// fires when the smoker keyed by the kind may smoke
    materials: PerKind<Condvar>,
    /// fires when a worker gets ready and when a smoker is done
    smoke: Condvar,
}

impl Table {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
            resource: PerKind::from_fn(|_| Condvar::new()),
            materials: PerKind::from_fn(|_| Condvar::new()),
            smoke: Condvar::new(),
        }
    }

    /// Stop everyone: all wait loops see the flag on their next wake-up.
    fn shutdown(&self, state: &mut State) {
        state.shutdown = true;
        for (_, condvar) in self.resource.iter().chain(self.materials.iter()) {
            condvar.notify_all();
        }
        self.smoke.notify_all();
    }

    /// Record the violation and tear the run down. Returns the violation to the caller.
    fn abort(&self, state: &mut State, violation: ProtocolViolation) -> ProtocolViolation {
        error!("{violation}");
        if state.violation.is_none() {
            state.violation = Some(violation.clone());
        }
        self.shutdown(state);
        violation
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

/// Run the agent for `iterations` rounds against 3 checkers and 3 smokers,
/// then stop the workers and verify the counters.
pub fn run(dealer: &mut dyn Dealer, iterations: u64) -> Result<Tally, SmokersError> {
    let table = Table::new();
    info!("monitor: {iterations} rounds, {WORKERS} workers");

    let panicked = thread::scope(|s| {
        let table = &table;
        let mut workers = Vec::with_capacity(WORKERS);
        for kind in ResourceKind::ALL {
            workers.push((
                format!("{kind} checker"),
                s.spawn(move || table.checker(kind)),
            ));
            workers.push((
                format!("{kind} smoker"),
                s.spawn(move || table.smoker(kind)),
            ));
        }
        let agent = s.spawn(move || table.agent(dealer, iterations));

        let mut panicked = None;
        if agent.join().is_err() {
            panicked = Some("agent".to_string());
        }

        // the agent is done (or gave up) => nobody is going to signal the workers anymore
        table.shutdown(&mut table.state.lock());

        for (name, worker) in workers {
            // violations are already in the state, only panics matter here
            if worker.join().is_err() && panicked.is_none() {
                panicked = Some(name);
            }
        }
        panicked
    });

    if let Some(name) = panicked {
        return Err(SmokersError::WorkerPanicked(name));
    }

    let state = table.state.into_inner();
    if let Some(violation) = state.violation {
        return Err(violation.into());
    }
    state.tally.verify(iterations)?;
    info!("monitor: {}", state.tally);
    Ok(state.tally)
}
