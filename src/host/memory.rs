//! In-memory collaborator implementations, used by the demo binary and tests.

use super::{AmbientToken, Inventory, QuestConditions, Roster, WorldBridge};
use crate::battle::state::{BattleOutcome, BattleSummary};
use crate::pal::Pal;
use pal_schema::{BattleMode, ItemKind};
use std::collections::{HashMap, VecDeque};

/// Quest flag raised the first time the player wins or tames.
pub const DEFEATED_FIRST_PAL: &str = "defeated_first_pal";

#[derive(Debug, Clone, Default)]
pub struct Backpack {
    items: HashMap<ItemKind, u32>,
}

impl Backpack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: &[(ItemKind, u32)]) -> Self {
        let mut backpack = Self::new();
        for &(item, count) in items {
            *backpack.items.entry(item).or_insert(0) += count;
        }
        backpack
    }
}

impl Inventory for Backpack {
    fn item_count(&self, item: ItemKind) -> u32 {
        self.items.get(&item).copied().unwrap_or(0)
    }

    fn consume_item(&mut self, item: ItemKind) -> bool {
        match self.items.get_mut(&item) {
            Some(count) if *count > 0 => {
                *count -= 1;
                true
            }
            _ => false,
        }
    }

    fn add_item(&mut self, item: ItemKind) {
        *self.items.entry(item).or_insert(0) += 1;
    }
}

/// The player's Pals. Selection prompts are answered from a queue of
/// planned picks, falling back to the first offered slot.
#[derive(Debug, Clone, Default)]
pub struct PalRoster {
    pals: Vec<Pal>,
    planned_picks: VecDeque<usize>,
}

impl PalRoster {
    pub fn new(pals: Vec<Pal>) -> Self {
        Self {
            pals,
            planned_picks: VecDeque::new(),
        }
    }

    pub fn queue_selection(&mut self, slot: usize) {
        self.planned_picks.push_back(slot);
    }

    pub fn len(&self) -> usize {
        self.pals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pals.is_empty()
    }

    /// Restore HP and energy for every Pal. Returns false when there are none.
    pub fn full_party_heal(&mut self) -> bool {
        if self.pals.is_empty() {
            return false;
        }
        for pal in &mut self.pals {
            pal.restore_fully();
        }
        true
    }
}

impl Roster for PalRoster {
    fn pals(&self) -> &[Pal] {
        &self.pals
    }

    fn pal_mut(&mut self, slot: usize) -> Option<&mut Pal> {
        self.pals.get_mut(slot)
    }

    fn add_pal(&mut self, pal: Pal) -> usize {
        self.pals.push(pal);
        self.pals.len() - 1
    }

    fn prompt_selection(&mut self, choices: &[usize]) -> Option<usize> {
        while let Some(pick) = self.planned_picks.pop_front() {
            if choices.contains(&pick) {
                return Some(pick);
            }
        }
        choices.first().copied()
    }
}

/// Records what the battle core asked of the exploration layer.
#[derive(Debug, Clone)]
pub struct ExplorationBridge {
    pub ambient: AmbientToken,
    pub battle_mode: Option<BattleMode>,
    pub cleared_wild: Vec<String>,
    next_token: u64,
}

impl ExplorationBridge {
    pub fn new(ambient: AmbientToken) -> Self {
        Self {
            next_token: ambient.raw() + 1,
            ambient,
            battle_mode: None,
            cleared_wild: Vec::new(),
        }
    }

    pub fn in_battle(&self) -> bool {
        self.battle_mode.is_some()
    }
}

impl Default for ExplorationBridge {
    fn default() -> Self {
        Self::new(AmbientToken::new(0))
    }
}

impl WorldBridge for ExplorationBridge {
    fn enter_battle(&mut self, mode: BattleMode) -> AmbientToken {
        let previous = self.ambient;
        self.ambient = AmbientToken::new(self.next_token);
        self.next_token += 1;
        self.battle_mode = Some(mode);
        previous
    }

    fn exit_battle(&mut self, restore: AmbientToken) {
        self.ambient = restore;
        self.battle_mode = None;
    }

    fn clear_wild_opponent(&mut self, pal_name: &str) {
        self.cleared_wild.push(pal_name.to_string());
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConditionFlags {
    flags: HashMap<String, bool>,
    pub concluded: Vec<BattleSummary>,
}

impl ConditionFlags {
    pub fn new() -> Self {
        Self::default()
    }
}

impl QuestConditions for ConditionFlags {
    fn is_true(&self, condition: &str) -> bool {
        self.flags.get(condition).copied().unwrap_or(false)
    }

    fn set_condition(&mut self, condition: &str, value: bool) {
        self.flags.insert(condition.to_string(), value);
    }

    fn battle_concluded(&mut self, summary: &BattleSummary) {
        if matches!(summary.outcome, BattleOutcome::Victory | BattleOutcome::Tamed)
            && !self.is_true(DEFEATED_FIRST_PAL)
        {
            self.set_condition(DEFEATED_FIRST_PAL, true);
        }
        self.concluded.push(summary.clone());
    }
}
