//! Run configuration out of the command line: `smokers [mode] [iterations] [seed]`

use std::str::FromStr;

use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::{
    dealer::{Dealer, RandomDealer},
    error::SmokersError,
};

pub const NUM_ITERATIONS: u64 = 1000;

/// How the protocol is wired
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumIter, EnumString, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Mode {
    /// one lock and a condvar per wake condition
    #[default]
    Monitor,
    /// one thread owns the state, the rest send it events
    Arbiter,
}

impl Mode {
    /// `monitor,arbiter`
    pub fn names() -> String {
        Mode::iter()
            .map(|m| m.to_string())
            .collect::<Vec<String>>()
            .join(",")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub mode: Mode,
    pub iterations: u64,
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            iterations: NUM_ITERATIONS,
            seed: None,
        }
    }
}

impl Config {
    /// Parse the arguments that follow the program name. Every one of them is optional.
    pub fn from_args<I, S>(args: I) -> Result<Self, SmokersError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut args = args.into_iter();
        let mut config = Config::default();

        if let Some(mode) = args.next() {
            let mode = mode.as_ref();
            config.mode = Mode::from_str(mode)
                .map_err(|_| SmokersError::UnknownMode(mode.to_string(), Mode::names()))?;
        }
        if let Some(iterations) = args.next() {
            let iterations = iterations.as_ref();
            config.iterations = match iterations.parse::<u64>() {
                Ok(n) if n > 0 => n,
                _ => return Err(SmokersError::InvalidIterations(iterations.to_string())),
            };
        }
        if let Some(seed) = args.next() {
            let seed = seed.as_ref();
            config.seed = Some(
                seed.parse()
                    .map_err(|_| SmokersError::InvalidSeed(seed.to_string()))?,
            );
        }
        Ok(config)
    }

    pub fn dealer(&self) -> Box<dyn Dealer> {
        match self.seed {
            Some(seed) => Box::new(RandomDealer::seeded(seed)),
            None => Box::new(RandomDealer::new()),
        }
    }
}
