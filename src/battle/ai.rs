//! A module for defining AI behaviors for battle opponents.

use crate::battle::state::TurnRng;
use crate::pal::Pal;
use pal_schema::MoveKind;
use tracing::debug;

/// What the opponent wants to do this turn, before energy is accounted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpponentIntent {
    Attack(MoveKind),
    Defend,
}

/// A trait for any system that can decide on an opponent's action.
pub trait Behavior {
    fn decide_action(&self, opponent: &Pal, player: &Pal, rng: &mut TurnRng) -> OpponentIntent;
}

/// Picks uniformly among basic, special and defend.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomBehavior;

impl RandomBehavior {
    pub fn new() -> Self {
        Self
    }
}

impl Behavior for RandomBehavior {
    fn decide_action(&self, opponent: &Pal, _player: &Pal, rng: &mut TurnRng) -> OpponentIntent {
        let intent = match rng.next_in(0..=2, "opponent action") {
            0 => OpponentIntent::Attack(MoveKind::Basic),
            1 => OpponentIntent::Attack(MoveKind::Special),
            _ => OpponentIntent::Defend,
        };
        debug!(pal = opponent.name(), ?intent, "opponent decided");
        intent
    }
}

/// How a wanted attack maps onto the energy a Pal actually has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveResolution {
    Use(MoveKind),
    Fallback { wanted: MoveKind, used: MoveKind },
    /// Both pools are empty.
    Exhausted,
}

pub fn resolve_energy(pal: &Pal, wanted: MoveKind) -> MoveResolution {
    if pal.has_energy_for(wanted) {
        MoveResolution::Use(wanted)
    } else if pal.has_energy_for(wanted.other()) {
        MoveResolution::Fallback {
            wanted,
            used: wanted.other(),
        }
    } else {
        MoveResolution::Exhausted
    }
}
