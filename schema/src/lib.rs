// Pal Battle Schema - Shared type definitions
// This crate holds the plain data definitions shared between the battle
// engine and whatever loader produces Pal and trainer templates.

pub use battle_data::*;
pub use pal_data::*;
pub use trainer_data::*;

pub mod battle_data;
pub mod pal_data;
pub mod trainer_data;
