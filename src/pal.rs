use pal_schema::{MoveKind, PalTemplate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// Level-up growth
const HP_PER_LEVEL: u32 = 10;
const ATTACK_PER_LEVEL: u32 = 2;
const SPECIAL_ATTACK_PER_LEVEL: u32 = 3;
const XP_PER_LEVEL: u32 = 100;

/// Stat changes from a single level gained, for the caller to narrate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelUp {
    pub new_level: u32,
    pub hp_increase: u32,
    pub max_hp: u32,
}

/// A live Pal: shared template data plus its own mutable battle record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pal {
    template: Arc<PalTemplate>,
    pub hp: u32,
    pub max_hp: u32,
    pub level: u32,
    pub experience: u32,
    pub experience_to_next_level: u32,
    pub basic_attack_uses: u32,
    pub max_basic_attack_uses: u32,
    pub special_attack_uses: u32,
    pub max_special_attack_uses: u32,
    pub base_attack_damage: u32,
    pub base_special_attack_damage: u32,
    pub is_acquirable: bool,
}

impl Pal {
    /// Create a fresh level 1 instance from a template
    pub fn from_template(template: Arc<PalTemplate>) -> Self {
        Pal {
            hp: template.max_hp,
            max_hp: template.max_hp,
            level: 1,
            experience: 0,
            experience_to_next_level: XP_PER_LEVEL,
            basic_attack_uses: template.max_basic_attack_uses,
            max_basic_attack_uses: template.max_basic_attack_uses,
            special_attack_uses: template.max_special_attack_uses,
            max_special_attack_uses: template.max_special_attack_uses,
            base_attack_damage: template.base_attack_damage,
            base_special_attack_damage: template.base_special_attack_damage,
            is_acquirable: template.is_acquirable,
            template,
        }
    }

    pub fn name(&self) -> &str {
        &self.template.name
    }

    pub fn move_name(&self, kind: MoveKind) -> &str {
        self.template.moves.name_of(kind)
    }

    pub fn template(&self) -> &Arc<PalTemplate> {
        &self.template
    }

    pub fn is_fainted(&self) -> bool {
        self.hp == 0
    }

    /// Apply damage, clamping at zero. Returns the HP actually lost.
    pub fn apply_damage(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.hp);
        self.hp -= lost;
        lost
    }

    /// Heal, clamping at max HP. Returns the HP actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let restored = amount.min(self.max_hp - self.hp.min(self.max_hp));
        self.hp += restored;
        restored
    }

    pub fn uses_remaining(&self, kind: MoveKind) -> u32 {
        match kind {
            MoveKind::Basic => self.basic_attack_uses,
            MoveKind::Special => self.special_attack_uses,
        }
    }

    pub fn has_energy_for(&self, kind: MoveKind) -> bool {
        self.uses_remaining(kind) > 0
    }

    /// Both pools are empty.
    pub fn is_exhausted(&self) -> bool {
        self.basic_attack_uses == 0 && self.special_attack_uses == 0
    }

    /// Spend one use from the matching pool. Returns false if it was already empty.
    pub fn spend_use(&mut self, kind: MoveKind) -> bool {
        let pool = match kind {
            MoveKind::Basic => &mut self.basic_attack_uses,
            MoveKind::Special => &mut self.special_attack_uses,
        };
        if *pool == 0 {
            return false;
        }
        *pool -= 1;
        true
    }

    pub fn base_damage(&self, kind: MoveKind) -> u32 {
        match kind {
            MoveKind::Basic => self.base_attack_damage,
            MoveKind::Special => self.base_special_attack_damage,
        }
    }

    /// Refill both energy pools. Called whenever a new opponent steps in.
    pub fn reset_attack_uses(&mut self) {
        self.basic_attack_uses = self.max_basic_attack_uses;
        self.special_attack_uses = self.max_special_attack_uses;
    }

    /// Full HP and energy, as at a Pal Center.
    pub fn restore_fully(&mut self) {
        self.hp = self.max_hp;
        self.reset_attack_uses();
    }

    /// Add experience, levelling up as many times as the total allows.
    /// Returns one record per level gained, lowest level first.
    pub fn add_experience(&mut self, amount: u32) -> Vec<LevelUp> {
        let mut gained = Vec::new();
        if amount == 0 {
            return gained;
        }

        self.experience = self.experience.saturating_add(amount);
        while self.experience >= self.experience_to_next_level {
            gained.push(self.level_up());
        }
        gained
    }

    /// Raise the level by one: +10 max HP with a full heal, +2 basic damage,
    /// +3 special damage. The spent threshold is subtracted from the pool.
    pub fn level_up(&mut self) -> LevelUp {
        let spent = self.experience_to_next_level;

        self.level += 1;
        self.max_hp += HP_PER_LEVEL;
        self.hp = self.max_hp;
        self.base_attack_damage += ATTACK_PER_LEVEL;
        self.base_special_attack_damage += SPECIAL_ATTACK_PER_LEVEL;
        self.experience = self.experience.saturating_sub(spent);
        self.experience_to_next_level = self.level * XP_PER_LEVEL;

        LevelUp {
            new_level: self.level,
            hp_increase: HP_PER_LEVEL,
            max_hp: self.max_hp,
        }
    }

    /// Clone used when a Pal joins a trainer's party; trainer Pals can never be tamed.
    pub fn for_trainer(template: Arc<PalTemplate>) -> Self {
        let mut pal = Self::from_template(template);
        pal.is_acquirable = false;
        pal
    }
}
