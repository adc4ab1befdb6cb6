use crate::errors::ActionError;
use pal_schema::MoveKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An intent submitted by the player for the current round.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    Basic,
    Special,
    Defend,
    // Drink a potion from the inventory.
    Item,
    Tame,
    Run,
    // The index refers to the Pal's slot in the player's roster.
    Switch { slot: usize },
}

impl PlayerAction {
    /// The energy pool this action draws from, if any.
    pub fn move_kind(&self) -> Option<MoveKind> {
        match self {
            PlayerAction::Basic => Some(MoveKind::Basic),
            PlayerAction::Special => Some(MoveKind::Special),
            _ => None,
        }
    }
}

impl fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerAction::Basic => write!(f, "basic"),
            PlayerAction::Special => write!(f, "special"),
            PlayerAction::Defend => write!(f, "defend"),
            PlayerAction::Item => write!(f, "item"),
            PlayerAction::Tame => write!(f, "tame"),
            PlayerAction::Run => write!(f, "run"),
            PlayerAction::Switch { slot } => write!(f, "switch {}", slot + 1),
        }
    }
}

impl FromStr for PlayerAction {
    type Err = ActionError;

    /// Parses dispatcher input. Switch targets are 1-based, as shown to the player.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalized = input.trim().to_lowercase();
        let mut words = normalized.split_whitespace();
        let verb = words.next().unwrap_or_default();
        let rest: Vec<&str> = words.collect();

        let action = match (verb, rest.as_slice()) {
            ("basic" | "attack" | "fight" | "1", []) => PlayerAction::Basic,
            ("special", []) => PlayerAction::Special,
            ("defend" | "2", []) => PlayerAction::Defend,
            ("item" | "potion" | "3", []) => PlayerAction::Item,
            ("tame" | "treat", []) => PlayerAction::Tame,
            ("run" | "flee" | "4", []) => PlayerAction::Run,
            ("switch", [choice]) => match choice.parse::<usize>() {
                Ok(n) if n >= 1 => PlayerAction::Switch { slot: n - 1 },
                _ => return Err(ActionError::UnknownAction(input.trim().to_string())),
            },
            _ => return Err(ActionError::UnknownAction(input.trim().to_string())),
        };
        Ok(action)
    }
}
