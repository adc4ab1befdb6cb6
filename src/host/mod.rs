//! Traits describing the collaborators the battle core talks to.
//!
//! The core never owns inventory, roster, world or quest state. It reaches
//! them through these seams, bundled into a [`BattleHost`] for the duration
//! of a call, so any front end can plug in its own storage.

pub mod memory;

use crate::battle::state::BattleSummary;
use crate::pal::Pal;
use pal_schema::{BattleMode, ItemKind};
use serde::{Deserialize, Serialize};

pub use memory::{Backpack, ConditionFlags, ExplorationBridge, PalRoster};

pub trait Inventory {
    fn has_item(&self, item: ItemKind) -> bool {
        self.item_count(item) > 0
    }

    fn item_count(&self, item: ItemKind) -> u32;

    /// Remove one of `item`. Returns false if none was held.
    fn consume_item(&mut self, item: ItemKind) -> bool;

    fn add_item(&mut self, item: ItemKind);
}

/// The player's owned Pals, addressed by slot.
pub trait Roster {
    fn pals(&self) -> &[Pal];

    fn pal_mut(&mut self, slot: usize) -> Option<&mut Pal>;

    /// Add a newly acquired Pal and return its slot.
    fn add_pal(&mut self, pal: Pal) -> usize;

    /// Ask the player to pick one of `choices`. `None` means they backed out.
    fn prompt_selection(&mut self, choices: &[usize]) -> Option<usize>;

    fn pal(&self, slot: usize) -> Option<&Pal> {
        self.pals().get(slot)
    }

    fn conscious_slots(&self) -> Vec<usize> {
        self.pals()
            .iter()
            .enumerate()
            .filter(|(_, pal)| !pal.is_fainted())
            .map(|(slot, _)| slot)
            .collect()
    }
}

/// Opaque handle for whatever ambient presentation (music, lighting) was
/// active before the battle. Only the presentation layer interprets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AmbientToken(u64);

impl AmbientToken {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Bridge to the exploration layer.
pub trait WorldBridge {
    /// Switch the world into battle mode. Returns the ambient state to restore later.
    fn enter_battle(&mut self, mode: BattleMode) -> AmbientToken;

    fn exit_battle(&mut self, restore: AmbientToken);

    /// Remove a wild Pal from the current location once its encounter is over.
    fn clear_wild_opponent(&mut self, pal_name: &str);
}

/// Persistent quest flags. The core only reports outcomes; what they unlock
/// is decided on the other side of this trait.
pub trait QuestConditions {
    fn is_true(&self, condition: &str) -> bool;

    fn set_condition(&mut self, condition: &str, value: bool);

    fn battle_concluded(&mut self, _summary: &BattleSummary) {}
}

/// All collaborators needed to resolve one call into the battle core.
pub struct BattleHost<'a> {
    pub inventory: &'a mut dyn Inventory,
    pub roster: &'a mut dyn Roster,
    pub world: &'a mut dyn WorldBridge,
    pub quests: &'a mut dyn QuestConditions,
}

impl<'a> BattleHost<'a> {
    pub fn new(
        inventory: &'a mut dyn Inventory,
        roster: &'a mut dyn Roster,
        world: &'a mut dyn WorldBridge,
        quests: &'a mut dyn QuestConditions,
    ) -> Self {
        Self {
            inventory,
            roster,
            world,
            quests,
        }
    }
}
