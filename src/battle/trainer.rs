//! Opponent party sequencing and the faint/switch bookkeeping shared by wild
//! and trainer encounters.

use crate::battle::state::{BattleEvent, BattleOutcome, BattlePhase, BattleSession, EventBus, Side};
use crate::config::BattleConfig;
use crate::errors::{ActionError, BattleResult, BattleStateError};
use crate::host::Roster;
use crate::pal::Pal;
use crate::progression::RewardCalculator;
use pal_schema::BattleMode;
use tracing::{debug, info};

/// The opponent's side: a lone wild Pal, or a trainer's ordered party.
/// Always holds at least one Pal, and `index` always points at one of them.
#[derive(Debug, Clone)]
pub struct OpponentParty {
    trainer: Option<String>,
    pals: Vec<Pal>,
    index: usize,
}

impl OpponentParty {
    pub fn wild(pal: Pal) -> Self {
        Self {
            trainer: None,
            pals: vec![pal],
            index: 0,
        }
    }

    /// A trainer's party. Every member is marked non-acquirable.
    pub fn trainer(name: impl Into<String>, pals: Vec<Pal>) -> BattleResult<Self> {
        if pals.is_empty() {
            return Err(BattleStateError::EmptyOpponentParty.into());
        }
        let pals = pals
            .into_iter()
            .map(|mut pal| {
                pal.is_acquirable = false;
                pal
            })
            .collect();
        Ok(Self {
            trainer: Some(name.into()),
            pals,
            index: 0,
        })
    }

    pub fn mode(&self) -> BattleMode {
        if self.trainer.is_some() {
            BattleMode::Trainer
        } else {
            BattleMode::Wild
        }
    }

    pub fn trainer_name(&self) -> Option<&str> {
        self.trainer.as_deref()
    }

    pub fn active(&self) -> &Pal {
        &self.pals[self.index]
    }

    pub fn active_mut(&mut self) -> &mut Pal {
        &mut self.pals[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.pals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pals.is_empty()
    }

    pub fn pals(&self) -> &[Pal] {
        &self.pals
    }

    /// Pals still waiting behind the active one.
    pub fn remaining(&self) -> usize {
        self.pals.len() - self.index - 1
    }

    /// Move on to the next Pal in the party. Returns false once the party is exhausted.
    pub fn advance(&mut self) -> bool {
        if self.index + 1 < self.pals.len() {
            self.index += 1;
            true
        } else {
            false
        }
    }
}

/// Prepare both sides for a fresh opponent: full HP and energy for the
/// newcomer, refilled energy for the player's Pal, no lingering braces.
pub(crate) fn begin_encounter(session: &mut BattleSession, roster: &mut dyn Roster) -> BattleResult<()> {
    session.opponent_mut().restore_fully();
    session.player_defending = false;
    session.opponent_defending = false;

    let slot = session.player_slot;
    roster
        .pal_mut(slot)
        .ok_or(BattleStateError::MissingRosterPal(slot))?
        .reset_attack_uses();
    Ok(())
}

/// The active opponent fainted: credit the kill, then either send out the
/// trainer's next Pal or conclude in victory.
pub(crate) fn on_opponent_fainted(
    session: &mut BattleSession,
    roster: &mut dyn Roster,
    config: &BattleConfig,
    bus: &mut EventBus,
) -> BattleResult<()> {
    let fainted = session.opponent().name().to_string();
    bus.push(BattleEvent::PalFainted {
        side: Side::Opponent,
        pal: fainted.clone(),
    });

    let calculator = RewardCalculator::new(config);
    session.credit_experience(session.player_slot, calculator.knockout_reward(session.mode()));

    if session.opponents.advance() {
        begin_encounter(session, roster)?;
        let next = session.opponent().name().to_string();
        info!(%fainted, %next, remaining = session.opponents.remaining(), "trainer sends out next pal");

        if let Some(trainer) = session.opponents.trainer_name() {
            bus.push(BattleEvent::TrainerSentOut {
                trainer: trainer.to_string(),
                pal: next,
                remaining: session.opponents.remaining(),
            });
        }
        bus.push(session.hp_status(roster)?);
        session.phase = BattlePhase::AwaitingPlayerAction;
        return Ok(());
    }

    if session.mode() == BattleMode::Trainer {
        let conscious = roster.conscious_slots();
        for credit in calculator.split_bonus_pool(&conscious) {
            session.credit_experience(credit.slot, credit.amount);
        }
        debug!(recipients = conscious.len(), "trainer bonus pool credited");
    }
    session.phase = BattlePhase::Concluded(BattleOutcome::Victory);
    Ok(())
}

/// The player's active Pal fainted: demand a switch if anyone is left standing.
pub(crate) fn on_player_fainted(session: &mut BattleSession, roster: &dyn Roster, bus: &mut EventBus) -> BattleResult<()> {
    let pal = session.player_pal(roster)?.name().to_string();
    bus.push(BattleEvent::PalFainted {
        side: Side::Player,
        pal,
    });

    let choices = roster.conscious_slots();
    if choices.is_empty() {
        session.phase = BattlePhase::Concluded(BattleOutcome::Defeat);
    } else {
        debug!(?choices, "player must switch");
        session.player_defending = false;
        bus.push(BattleEvent::SwitchRequired { choices });
        session.phase = BattlePhase::PlayerMustSwitch;
    }
    Ok(())
}

/// Both active Pals are out of energy in a trainer battle. Nothing either
/// side can do will move the battle forward, so the player's Pal drops out
/// and the usual faint handling takes over.
pub(crate) fn on_mutual_exhaustion(
    session: &mut BattleSession,
    roster: &mut dyn Roster,
    bus: &mut EventBus,
) -> BattleResult<()> {
    let slot = session.player_slot;
    let pal = roster
        .pal_mut(slot)
        .ok_or(BattleStateError::MissingRosterPal(slot))?;
    let hp = pal.hp;
    pal.apply_damage(hp);
    info!(pal = pal.name(), "player pal collapsed from exhaustion");
    bus.push(BattleEvent::PalCollapsed {
        pal: pal.name().to_string(),
    });

    on_player_fainted(session, &*roster, bus)
}

/// Send out the Pal in `slot` after a faint. Does not cost a turn.
///
/// The newcomer enters with full energy, like any Pal starting an encounter.
pub(crate) fn switch_player_pal(
    session: &mut BattleSession,
    roster: &mut dyn Roster,
    slot: usize,
    bus: &mut EventBus,
) -> BattleResult<()> {
    if session.phase != BattlePhase::PlayerMustSwitch {
        return Err(ActionError::SwitchNotExpected.into());
    }
    if slot == session.player_slot || !roster.conscious_slots().contains(&slot) {
        return Err(ActionError::InvalidPalSelection(slot).into());
    }

    let old_pal = session.player_pal(&*roster)?.name().to_string();
    session.player_slot = slot;
    let incoming = roster
        .pal_mut(slot)
        .ok_or(BattleStateError::MissingRosterPal(slot))?;
    incoming.reset_attack_uses();
    let new_pal = incoming.name().to_string();

    bus.push(BattleEvent::PalSwitched { old_pal, new_pal });
    bus.push(session.hp_status(&*roster)?);
    session.phase = BattlePhase::AwaitingPlayerAction;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pal_schema::PalTemplate;
    use std::sync::Arc;

    fn pal(name: &str) -> Pal {
        Pal::from_template(Arc::new(PalTemplate::named(name)))
    }

    #[test]
    fn test_wild_party_has_single_acquirable_pal() {
        let party = OpponentParty::wild(pal("Bramblet"));
        assert_eq!(party.mode(), BattleMode::Wild);
        assert_eq!(party.len(), 1);
        assert_eq!(party.remaining(), 0);
        assert!(party.active().is_acquirable);
        assert_eq!(party.trainer_name(), None);
    }

    #[test]
    fn test_trainer_party_advances_in_order() {
        let mut party =
            OpponentParty::trainer("Rival Kay", vec![pal("Grub"), pal("Moth"), pal("Wyrm")]).unwrap();
        assert_eq!(party.mode(), BattleMode::Trainer);
        assert!(party.pals().iter().all(|p| !p.is_acquirable));

        assert_eq!(party.active().name(), "Grub");
        assert_eq!(party.remaining(), 2);
        assert!(party.advance());
        assert_eq!(party.active().name(), "Moth");
        assert!(party.advance());
        assert_eq!(party.active().name(), "Wyrm");
        assert!(!party.advance());
        assert_eq!(party.active().name(), "Wyrm");
    }

    #[test]
    fn test_empty_trainer_party_is_rejected() {
        let err = OpponentParty::trainer("Nobody", vec![]).unwrap_err();
        assert!(matches!(
            err,
            crate::errors::BattleEngineError::BattleState(BattleStateError::EmptyOpponentParty)
        ));
    }
}
