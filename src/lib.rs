//! The cigarette smokers problem.
//!
//! An agent puts two of three resources on the table every round, three smokers (one per
//! withheld resource) wait to be released exactly when their pair is there. Two wirings:
//! - [monitor] - one lock, condvars, the textbook way
//! - [arbiter] - one thread owns the state, everybody else sends it events

pub mod arbiter;
pub mod config;
pub mod dealer;
pub mod error;
pub mod mailbox;
pub mod monitor;
pub mod pairing;
pub mod resource;
pub mod tally;

use config::{Config, Mode};
use error::SmokersError;
use tally::Tally;

/// Run the configured number of rounds in the configured mode and verify the outcome
pub fn run(config: &Config) -> Result<Tally, SmokersError> {
    let mut dealer = config.dealer();
    match config.mode {
        Mode::Monitor => monitor::run(&mut *dealer, config.iterations),
        Mode::Arbiter => arbiter::run(&mut *dealer, config.iterations),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_both_modes_agree_on_a_seed() {
        let tallies: Vec<Tally> = [Mode::Monitor, Mode::Arbiter]
            .into_iter()
            .map(|mode| {
                run(&Config {
                    mode,
                    iterations: 300,
                    seed: Some(5),
                })
                .unwrap()
            })
            .collect();
        // same dealer => same rounds => same counters
        assert_eq!(tallies[0], tallies[1]);
        assert_eq!(300, tallies[0].smoke_count.total());
    }
}
