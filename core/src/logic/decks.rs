//! Rotating effect pools. A draw hands out the front item and requeues it at
//! the back, so a pool never runs dry mid-match.

use rand::rngs::StdRng;
use rand::Rng;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::io::fallback_penalties;
use crate::types::{Boost, Penalty, Riddle};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PenaltyDeck {
    queue: VecDeque<Penalty>,
}

impl PenaltyDeck {
    /// An empty list falls back to a single built-in skip-turn penalty; the
    /// engine relies on every draw yielding something.
    pub fn new(items: Vec<Penalty>) -> Self {
        let items = if items.is_empty() {
            fallback_penalties()
        } else {
            items
        };
        Self {
            queue: items.into(),
        }
    }

    pub fn draw(&mut self) -> Penalty {
        let penalty = self.queue.pop_front().expect("penalty deck is never empty");
        self.queue.push_back(penalty.clone());
        penalty
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl Default for PenaltyDeck {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BoostDeck {
    queue: VecDeque<Boost>,
}

impl BoostDeck {
    pub fn new(items: Vec<Boost>) -> Self {
        let items = if items.is_empty() {
            vec![Boost::new("Play another turn")]
        } else {
            items
        };
        Self {
            queue: items.into(),
        }
    }

    pub fn draw(&mut self) -> Boost {
        let boost = self.queue.pop_front().expect("boost deck is never empty");
        self.queue.push_back(boost.clone());
        boost
    }
}

impl Default for BoostDeck {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// Riddles are drawn at random without replacement; once the pool drains,
/// the used pile is recycled.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct RiddlePool {
    available: Vec<Riddle>,
    used: Vec<Riddle>,
}

impl RiddlePool {
    pub fn new(riddles: Vec<Riddle>) -> Self {
        Self {
            available: riddles,
            used: Vec::new(),
        }
    }

    pub fn draw(&mut self, rng: &mut StdRng) -> Option<Riddle> {
        if self.available.is_empty() {
            if self.used.is_empty() {
                return None;
            }
            self.available.append(&mut self.used);
        }
        let index = rng.gen_range(0..self.available.len());
        let riddle = self.available.swap_remove(index);
        self.used.push(riddle.clone());
        Some(riddle)
    }

    pub fn remaining(&self) -> usize {
        self.available.len()
    }
}
