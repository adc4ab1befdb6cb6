//! Pal Battle Engine
//!
//! Turn-based combat between a player's Pal and a wild or trainer-owned
//! opponent: energy-limited attacks, one-shot defend, taming, multi-Pal
//! trainer parties, forced switching and experience-driven leveling.
//! Inventory, roster, world and quest state live behind the traits in
//! [`host`].

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod host;
pub mod pal;
pub mod player;
pub mod progression;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
pub use pal_schema::{BattleMode, ItemKind, MoveKind, MoveSet, PalTemplate, TrainerTemplate};

// --- From this crate's modules (`src/`) ---

// Session lifecycle and turn resolution.
pub use battle::runner::{BattleRunner, PalInfo, TurnOutcome};
pub use battle::state::{
    BattleEvent, BattleOutcome, BattlePhase, BattleSession, BattleSummary, EventBus, Side, TurnRng,
};
pub use battle::trainer::OpponentParty;

// Core runtime types for a battle.
pub use pal::{LevelUp, Pal};
pub use player::PlayerAction;

// Data loading and tuning.
pub use catalog::PalCatalog;
pub use config::BattleConfig;

// Crate-specific error and result types.
pub use errors::{
    ActionError, BattleEngineError, BattleResult, BattleStateError, DataError, DataResult,
    TameError,
};
