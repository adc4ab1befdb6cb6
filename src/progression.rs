use crate::battle::state::ExperienceCredit;
use crate::config::BattleConfig;
use pal_schema::BattleMode;

/// Calculator for the experience a battle pays out.
pub struct RewardCalculator<'a> {
    config: &'a BattleConfig,
}

impl<'a> RewardCalculator<'a> {
    pub fn new(config: &'a BattleConfig) -> Self {
        Self { config }
    }

    /// Experience for knocking out a single opponent Pal.
    pub fn knockout_reward(&self, mode: BattleMode) -> u32 {
        match mode {
            BattleMode::Wild => self.config.wild_victory_xp,
            BattleMode::Trainer => self.config.trainer_pal_xp,
        }
    }

    pub fn tame_reward(&self) -> u32 {
        self.config.tame_xp
    }

    /// Split the trainer bonus pool evenly across `slots`.
    /// Any remainder goes one point at a time to the earliest slots.
    pub fn split_bonus_pool(&self, slots: &[usize]) -> Vec<ExperienceCredit> {
        let pool = self.config.trainer_bonus_xp;
        if slots.is_empty() || pool == 0 {
            return Vec::new();
        }

        let share = pool / slots.len() as u32;
        let remainder = pool as usize % slots.len();

        slots
            .iter()
            .enumerate()
            .map(|(i, &slot)| ExperienceCredit {
                slot,
                amount: share + u32::from(i < remainder),
            })
            .filter(|credit| credit.amount > 0)
            .collect()
    }
}
