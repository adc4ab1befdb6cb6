use crate::battle::state::TurnRng;
use crate::pal::Pal;

pub const BASE_TAME_CHANCE: u32 = 30;

/// Chance out of 100 that a tame succeeds: 30 at full HP, rising one point
/// per percent of HP lost, up to 130 at zero HP.
pub fn calculate_tame_chance(target: &Pal) -> u32 {
    if target.max_hp == 0 {
        return BASE_TAME_CHANCE + 100;
    }
    let missing = u64::from(target.max_hp.saturating_sub(target.hp));
    let bonus = 100 * missing / u64::from(target.max_hp);
    BASE_TAME_CHANCE + bonus as u32
}

/// Roll for tame success
/// Returns true if the tame succeeds
pub fn roll_tame_success(chance: u32, rng: &mut TurnRng) -> bool {
    rng.roll_percent("tame roll") < chance
}

/// Get a descriptive tame chance category for display purposes
pub fn describe_tame_chance(chance: u32) -> &'static str {
    match chance {
        c if c >= 100 => "Certain",
        c if c >= 80 => "Very Good",
        c if c >= 60 => "Good",
        c if c >= 45 => "Fair",
        c if c > BASE_TAME_CHANCE => "Poor",
        _ => "Unlikely",
    }
}
