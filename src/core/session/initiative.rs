//! Initiative Rolls
//!
//! Non-player participants roll a d20 each round; players type their own
//! result in. Rolling goes through [`InitiativeRoller`] so tests can script
//! the dice.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Highest face of the initiative die. A roll equal to this is critical.
pub const INITIATIVE_DIE: i32 = 20;

/// Source of initiative rolls, uniform over `1..=INITIATIVE_DIE`.
pub trait InitiativeRoller: Send {
    fn roll(&mut self) -> i32;
}

// ============================================================================
// D20 Roller
// ============================================================================

/// Rolls a d20 from a wrapped RNG.
pub struct D20Roller<R = StdRng> {
    rng: R,
}

impl D20Roller<StdRng> {
    /// Roller seeded from OS entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Create with a specific seed for reproducible results
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for D20Roller<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> D20Roller<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng + Send> InitiativeRoller for D20Roller<R> {
    fn roll(&mut self) -> i32 {
        self.rng.gen_range(1..=INITIATIVE_DIE)
    }
}

// ============================================================================
// Scripted Roller
// ============================================================================

/// Replays a fixed sequence of results, cycling when exhausted.
///
/// Values are clamped into the die's range so a script can never produce an
/// impossible roll.
#[derive(Debug, Clone)]
pub struct ScriptedRoller {
    script: VecDeque<i32>,
}

impl ScriptedRoller {
    pub fn new(rolls: impl IntoIterator<Item = i32>) -> Self {
        let script: VecDeque<i32> = rolls
            .into_iter()
            .map(|r| r.clamp(1, INITIATIVE_DIE))
            .collect();
        Self { script }
    }
}

impl InitiativeRoller for ScriptedRoller {
    fn roll(&mut self) -> i32 {
        match self.script.pop_front() {
            Some(value) => {
                self.script.push_back(value);
                value
            }
            None => 1,
        }
    }
}

// ============================================================================
// Player Entry
// ============================================================================

/// Parse an initiative value typed in by the game master.
///
/// Returns `None` for anything that is not an integer in `1..=20`.
pub fn parse_player_initiative(raw: &str) -> Option<i32> {
    raw.trim()
        .parse::<i32>()
        .ok()
        .filter(|value| (1..=INITIATIVE_DIE).contains(value))
}
