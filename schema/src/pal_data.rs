use crate::MoveKind;
use serde::{Deserialize, Serialize};

fn default_max_hp() -> u32 {
    50
}

fn default_basic_uses() -> u32 {
    15
}

fn default_special_uses() -> u32 {
    5
}

fn default_attack_damage() -> u32 {
    10
}

fn default_special_damage() -> u32 {
    15
}

fn default_acquirable() -> bool {
    true
}

/// Display names for a Pal's two attacks, in (basic, special) order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveSet {
    pub basic: String,
    pub special: String,
}

impl MoveSet {
    pub fn new(basic: impl Into<String>, special: impl Into<String>) -> Self {
        Self {
            basic: basic.into(),
            special: special.into(),
        }
    }

    pub fn name_of(&self, kind: MoveKind) -> &str {
        match kind {
            MoveKind::Basic => &self.basic,
            MoveKind::Special => &self.special,
        }
    }
}

impl Default for MoveSet {
    fn default() -> Self {
        Self::new("Basic Attack", "Special Attack")
    }
}

/// Immutable definition of a Pal, as supplied by the content loader.
/// Battle instances copy the numeric fields and share the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PalTemplate {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub moves: MoveSet,
    #[serde(default = "default_max_hp")]
    pub max_hp: u32,
    #[serde(default = "default_basic_uses")]
    pub max_basic_attack_uses: u32,
    #[serde(default = "default_special_uses")]
    pub max_special_attack_uses: u32,
    #[serde(default = "default_attack_damage")]
    pub base_attack_damage: u32,
    #[serde(default = "default_special_damage")]
    pub base_special_attack_damage: u32,
    #[serde(default = "default_acquirable")]
    pub is_acquirable: bool,
}

impl PalTemplate {
    /// A template with the stock stat line and the given name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            moves: MoveSet::default(),
            max_hp: default_max_hp(),
            max_basic_attack_uses: default_basic_uses(),
            max_special_attack_uses: default_special_uses(),
            base_attack_damage: default_attack_damage(),
            base_special_attack_damage: default_special_damage(),
            is_acquirable: default_acquirable(),
        }
    }
}
