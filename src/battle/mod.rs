pub mod ai;
pub mod calculators;
pub mod commands;
pub mod runner;
pub mod state;
pub mod tame;
pub mod trainer;
pub mod turn_orchestrator;

#[cfg(test)]
pub(crate) mod tests;
