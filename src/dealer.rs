//! # Dealer
//!
//! The agent's source of choices. Each round it withholds one kind and puts the other two on the
//! table, announcing them one after another. There're 6 possible rounds: 3 pairs times 2 orders.

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::resource::ResourceKind;

/// One round of the agent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Offer {
    /// the kind left out => the smoker keyed by it is expected to smoke
    pub excluded: ResourceKind,
    /// announcement order of the two included kinds
    pub order: [ResourceKind; 2],
}

impl Offer {
    /// the included kinds announced in their natural order
    pub fn excluding(excluded: ResourceKind) -> Self {
        Self {
            excluded,
            order: excluded.complement(),
        }
    }

    /// same pair, announced the other way around
    pub fn reversed(self) -> Self {
        let [a, b] = self.order;
        Self {
            excluded: self.excluded,
            order: [b, a],
        }
    }
}

pub trait Dealer: Send {
    fn next_offer(&mut self) -> Offer;
}

/// Picks one of the 6 rounds uniformly
pub struct RandomDealer {
    rng: StdRng,
}

impl RandomDealer {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// reproducible sequence of rounds
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomDealer {
    fn default() -> Self {
        Self::new()
    }
}

impl Dealer for RandomDealer {
    fn next_offer(&mut self) -> Offer {
        let r: usize = self.rng.gen_range(0..6);
        let offer = Offer::excluding(ResourceKind::ALL[r % 3]);
        if r < 3 {
            offer
        } else {
            offer.reversed()
        }
    }
}

/// Replays a fixed list of rounds, starting over when it runs out
pub struct ScriptedDealer {
    script: Vec<Offer>,
    next: usize,
}

impl ScriptedDealer {
    /// # Panics
    /// on an empty script, there's nothing to replay
    pub fn new(script: Vec<Offer>) -> Self {
        assert!(!script.is_empty(), "empty script");
        Self { script, next: 0 }
    }

    /// the same pair every round
    pub fn always(offer: Offer) -> Self {
        Self::new(vec![offer])
    }
}

impl Dealer for ScriptedDealer {
    fn next_offer(&mut self) -> Offer {
        let offer = self.script[self.next];
        self.next = (self.next + 1) % self.script.len();
        offer
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_offers_never_include_the_excluded_kind() {
        let mut dealer = RandomDealer::seeded(7);
        for _ in 0..600 {
            let offer = dealer.next_offer();
            assert!(!offer.order.contains(&offer.excluded));
            assert_ne!(offer.order[0], offer.order[1]);
        }
    }

    #[test]
    fn test_random_dealer_covers_every_round() {
        let mut dealer = RandomDealer::seeded(42);
        let seen: HashSet<_> = (0..1000)
            .map(|_| {
                let o = dealer.next_offer();
                (o.excluded, o.order)
            })
            .collect();
        assert_eq!(6, seen.len());
    }

    #[test]
    fn test_seeded_dealers_agree() {
        let mut a = RandomDealer::seeded(1);
        let mut b = RandomDealer::seeded(1);
        for _ in 0..100 {
            assert_eq!(a.next_offer(), b.next_offer());
        }
    }

    #[test]
    fn test_script_cycles() {
        let first = Offer::excluding(ResourceKind::Match);
        let second = Offer::excluding(ResourceKind::Paper).reversed();
        let mut dealer = ScriptedDealer::new(vec![first, second]);
        assert_eq!(first, dealer.next_offer());
        assert_eq!(second, dealer.next_offer());
        assert_eq!(first, dealer.next_offer());
    }
}
