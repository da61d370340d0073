//! # Arbiter
//!
//! The same protocol without a shared lock in sight. One arbiter thread owns the accumulator and
//! the counters and consumes a single ordered queue of [Event]s. Everybody else only talks to it:
//! - checkers turn "resource available" into [Event::Arrived]
//! - smokers turn "materials available" into [Event::Smoked]
//! - the agent reports [Event::Offered] and waits for a [Notice] back
//!
//! Messages are queued, a wake-up can't be lost, the barrier is kept anyway:
//! the agent waits for [Notice::Start], which only comes after all 6 workers said [Event::Ready].
//!
//! Shutdown is closing mailboxes. A worker leaves its loop once its mailbox is closed and empty.

mod referee;

use std::thread;

use log::{debug, error, info};

use crate::{
    dealer::Dealer,
    error::{ProtocolViolation, SmokersError},
    mailbox::Mailbox,
    resource::{PerKind, ResourceKind},
    tally::Tally,
};

pub use referee::{Outcome, Referee};

/// 3 checkers + 3 smokers
pub const WORKERS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// a worker is about to wait on its mailbox
    Ready,
    /// the agent withholds the kind this round
    Offered(ResourceKind),
    /// a checker saw its kind on the table
    Arrived(ResourceKind),
    /// the smoker keyed by the kind has smoked
    Smoked(ResourceKind),
}

/// Arbiter -> agent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Start,
    SmokeDone,
}

/// All the mailboxes of a run
struct Post {
    events: Mailbox<Event>,
    agent: Mailbox<Notice>,
    resources: PerKind<Mailbox<()>>,
    materials: PerKind<Mailbox<()>>,
}

impl Post {
    fn new() -> Self {
        Self {
            events: Mailbox::new(),
            agent: Mailbox::new(),
            resources: PerKind::from_fn(|_| Mailbox::new()),
            materials: PerKind::from_fn(|_| Mailbox::new()),
        }
    }

    fn close_workers(&self) {
        for (_, mailbox) in self.resources.iter().chain(self.materials.iter()) {
            mailbox.close();
        }
    }

    fn close_all(&self) {
        self.close_workers();
        self.agent.close();
        self.events.close();
    }
}

fn agent(post: &Post, dealer: &mut dyn Dealer, iterations: u64) {
    if post.agent.receive() != Some(Notice::Start) {
        return;
    }
    for _ in 0..iterations {
        let offer = dealer.next_offer();
        post.events.send(Event::Offered(offer.excluded));
        for kind in offer.order {
            debug!("{kind} available");
            post.resources[kind].send(());
        }
        debug!("agent is waiting for smoker to smoke");
        if post.agent.receive().is_none() {
            // the arbiter gave up
            return;
        }
    }
}

fn checker(post: &Post, kind: ResourceKind) {
    post.events.send(Event::Ready);
    while post.resources[kind].receive().is_some() {
        post.events.send(Event::Arrived(kind));
    }
}

fn smoker(post: &Post, kind: ResourceKind) {
    post.events.send(Event::Ready);
    while post.materials[kind].receive().is_some() {
        debug!("{kind} smoker smoked");
        post.events.send(Event::Smoked(kind));
    }
}

/// Consume events until the queue is closed and drained or an invariant breaks.
fn arbiter(post: &Post) -> Result<Tally, ProtocolViolation> {
    let mut referee = Referee::new(WORKERS);
    while let Some(event) = post.events.receive() {
        match referee.handle(event) {
            Ok(Outcome::Nothing) => {}
            Ok(Outcome::Start) => {
                post.agent.send(Notice::Start);
            }
            Ok(Outcome::Release(smoker)) => {
                post.materials[smoker].send(());
            }
            Ok(Outcome::SmokeDone) => {
                post.agent.send(Notice::SmokeDone);
            }
            Err(violation) => {
                error!("{violation}");
                post.close_all();
                return Err(violation);
            }
        }
    }
    Ok(referee.tally())
}

/// Run the agent for `iterations` rounds against 3 checkers and 3 smokers through the arbiter,
/// then close the mailboxes and verify the counters.
pub fn run(dealer: &mut dyn Dealer, iterations: u64) -> Result<Tally, SmokersError> {
    let post = Post::new();
    info!("arbiter: {iterations} rounds, {WORKERS} workers");

    let (outcome, panicked) = thread::scope(|s| {
        let post = &post;
        let arbiter_thread = s.spawn(move || arbiter(post));
        let mut workers = Vec::with_capacity(WORKERS);
        for kind in ResourceKind::ALL {
            workers.push((format!("{kind} checker"), s.spawn(move || checker(post, kind))));
            workers.push((format!("{kind} smoker"), s.spawn(move || smoker(post, kind))));
        }
        let agent_thread = s.spawn(move || agent(post, dealer, iterations));

        let mut panicked = None;
        if agent_thread.join().is_err() {
            panicked = Some("agent".to_string());
        }

        // every round is acknowledged => no worker has anything left to do
        post.close_workers();
        for (name, worker) in workers {
            if worker.join().is_err() && panicked.is_none() {
                panicked = Some(name);
            }
        }

        // nobody sends events anymore, let the arbiter drain the rest
        post.close_all();
        let outcome = arbiter_thread.join().ok();
        if outcome.is_none() && panicked.is_none() {
            panicked = Some("arbiter".to_string());
        }
        (outcome, panicked)
    });

    if let Some(name) = panicked {
        return Err(SmokersError::WorkerPanicked(name));
    }
    let tally = match outcome {
        Some(outcome) => outcome?,
        None => return Err(SmokersError::WorkerPanicked("arbiter".to_string())),
    };
    tally.verify(iterations)?;
    info!("arbiter: {tally}");
    Ok(tally)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dealer::{Offer, RandomDealer, ScriptedDealer};

    use crate::resource::ResourceKind::{Match, Paper, Tobacco};

    #[test]
    fn test_random_rounds() {
        let mut dealer = RandomDealer::seeded(2024);
        let tally = run(&mut dealer, 1000).unwrap();
        assert_eq!(tally.signal_count, tally.smoke_count);
        assert_eq!(1000, tally.smoke_count.total());
    }

    #[test]
    fn test_always_excluding_match() {
        let mut dealer = ScriptedDealer::always(Offer::excluding(Match).reversed());
        let tally = run(&mut dealer, 40).unwrap();
        assert_eq!(PerKind::new(40, 0, 0), tally.signal_count);
        assert_eq!(PerKind::new(40, 0, 0), tally.smoke_count);
    }

    #[test]
    fn test_mixed_script() {
        let mut dealer = ScriptedDealer::new(vec![
            Offer::excluding(Tobacco),
            Offer::excluding(Paper).reversed(),
            Offer::excluding(Tobacco).reversed(),
        ]);
        let tally = run(&mut dealer, 30).unwrap();
        assert_eq!(PerKind::new(0, 10, 20), tally.smoke_count);
    }

    #[test]
    fn test_broken_offer_stops_the_run() {
        let mut dealer = ScriptedDealer::always(Offer {
            excluded: Paper,
            order: [Tobacco, Tobacco],
        });
        let err = run(&mut dealer, 10).unwrap_err();
        assert!(matches!(
            err,
            SmokersError::Protocol(ProtocolViolation::Accumulator {
                sum: 4,
                kind: Tobacco
            })
        ));
    }
}
