//! Balance tunables for the battle core.
//!
//! Formula constants that define the combat model itself live next to the
//! formulas (see `battle::calculators` and `pal`). Values here are the knobs a
//! content author is expected to turn, so they load from RON.

use crate::errors::{DataError, DataResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Chance out of 100 that running from a wild Pal succeeds.
    pub run_success_percent: u32,
    /// HP restored by the `defend` action, for either side.
    pub defend_heal: u32,
    /// HP restored when an opponent has no energy left in either pool.
    pub exhausted_heal: u32,
    pub wild_victory_xp: u32,
    pub tame_xp: u32,
    /// Awarded to the active Pal for each trainer Pal it knocks out.
    pub trainer_pal_xp: u32,
    /// Split across every conscious Pal when a trainer's whole party falls.
    pub trainer_bonus_xp: u32,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            run_success_percent: 45,
            defend_heal: 5,
            exhausted_heal: 5,
            wild_victory_xp: 50,
            tame_xp: 75,
            trainer_pal_xp: 40,
            trainer_bonus_xp: 100,
        }
    }
}

impl BattleConfig {
    /// Parse a config from RON. Missing fields keep their defaults.
    pub fn from_ron_str(source: &str) -> DataResult<Self> {
        Ok(ron::from_str(source)?)
    }

    pub fn load(path: &Path) -> DataResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| DataError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_ron_str(&content)
    }
}
