use crate::battle::ai::{Behavior, RandomBehavior};
use crate::battle::state::{
    BattleEvent, BattleOutcome, BattlePhase, BattleSession, BattleSummary, EventBus, Side, TurnRng,
};
use crate::battle::trainer::{begin_encounter, OpponentParty};
use crate::battle::turn_orchestrator::resolve_player_action;
use crate::config::BattleConfig;
use crate::errors::{ActionError, BattleResult};
use crate::host::{BattleHost, Roster};
use crate::pal::Pal;
use crate::player::PlayerAction;
use pal_schema::BattleMode;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Single owner of the one live battle.
///
/// Holds the session between calls along with the rules and randomness it is
/// resolved with. Collaborators are lent in per call through a [`BattleHost`].
pub struct BattleRunner {
    config: BattleConfig,
    rng: TurnRng,
    behavior: Box<dyn Behavior>,
    session: Option<BattleSession>,
}

/// Result of starting a battle or submitting an action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOutcome {
    pub events: Vec<BattleEvent>,
    pub session_active: bool,
    /// `None` once the session has ended.
    pub phase: Option<BattlePhase>,
}

impl TurnOutcome {
    pub fn formatted_lines(&self) -> Vec<String> {
        self.events.iter().filter_map(BattleEvent::format).collect()
    }
}

/// Information about a Pal for API queries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PalInfo {
    pub name: String,
    pub level: u32,
    pub hp: u32,
    pub max_hp: u32,
    pub basic_attack_uses: u32,
    pub special_attack_uses: u32,
    pub is_defending: bool,
}

impl PalInfo {
    fn of(pal: &Pal, is_defending: bool) -> Self {
        Self {
            name: pal.name().to_string(),
            level: pal.level,
            hp: pal.hp,
            max_hp: pal.max_hp,
            basic_attack_uses: pal.basic_attack_uses,
            special_attack_uses: pal.special_attack_uses,
            is_defending,
        }
    }
}

impl BattleRunner {
    pub fn new(config: BattleConfig, rng: TurnRng) -> Self {
        Self::with_behavior(config, rng, Box::new(RandomBehavior::new()))
    }

    pub fn with_behavior(config: BattleConfig, rng: TurnRng, behavior: Box<dyn Behavior>) -> Self {
        Self {
            config,
            rng,
            behavior,
            session: None,
        }
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&BattleSession> {
        self.session.as_ref()
    }

    /// Snapshot of the player's active Pal and the active opponent.
    pub fn active_combatants(&self, roster: &dyn Roster) -> BattleResult<(PalInfo, PalInfo)> {
        let session = self.session.as_ref().ok_or(ActionError::NoActiveBattle)?;
        let player = PalInfo::of(session.player_pal(roster)?, session.is_defending(Side::Player));
        let opponent = PalInfo::of(session.opponent(), session.is_defending(Side::Opponent));
        Ok((player, opponent))
    }

    /// Open a session against `opponents`.
    ///
    /// With no `player_slot`, the sole conscious Pal is sent out, or the
    /// roster is asked to choose when there are several.
    pub fn start_battle(
        &mut self,
        host: &mut BattleHost<'_>,
        player_slot: Option<usize>,
        opponents: OpponentParty,
    ) -> BattleResult<TurnOutcome> {
        if self.session.is_some() {
            return Err(ActionError::BattleAlreadyActive.into());
        }

        let slot = select_player_pal(&mut *host.roster, player_slot)?;
        let mode = opponents.mode();
        let ambient = host.world.enter_battle(mode);
        let mut session = BattleSession::new(slot, opponents, ambient);
        begin_encounter(&mut session, &mut *host.roster)?;

        let mut bus = EventBus::new();
        let player_pal = session.player_pal(&*host.roster)?.name().to_string();
        let opponent_pal = session.opponent().name().to_string();
        let trainer = session.opponents().trainer_name().map(str::to_string);
        info!(%mode, %player_pal, %opponent_pal, ?trainer, "battle started");

        bus.push(BattleEvent::BattleStarted {
            mode,
            player_pal,
            opponent_pal: opponent_pal.clone(),
            trainer: trainer.clone(),
        });
        if let Some(trainer) = trainer {
            bus.push(BattleEvent::TrainerSentOut {
                trainer,
                pal: opponent_pal,
                remaining: session.opponents().remaining(),
            });
        }
        bus.push(session.hp_status(&*host.roster)?);

        let phase = session.phase();
        self.session = Some(session);
        Ok(TurnOutcome {
            events: bus.into_events(),
            session_active: true,
            phase: Some(phase),
        })
    }

    /// Resolve one player action. When it ends the battle, experience is
    /// paid out and the world is handed back before this returns.
    pub fn submit_action(
        &mut self,
        host: &mut BattleHost<'_>,
        action: PlayerAction,
    ) -> BattleResult<TurnOutcome> {
        let Some(session) = self.session.as_mut() else {
            warn!(%action, "action submitted with no battle in progress");
            return Err(ActionError::NoActiveBattle.into());
        };

        let bus = resolve_player_action(
            session,
            action,
            host,
            &mut self.rng,
            &self.config,
            self.behavior.as_ref(),
        )?;
        let mut events = bus.into_events();

        if let BattlePhase::Concluded(outcome) = session.phase() {
            events.extend(self.end_battle(host, outcome)?.into_events());
        }

        Ok(TurnOutcome {
            events,
            session_active: self.session.is_some(),
            phase: self.session.as_ref().map(BattleSession::phase),
        })
    }

    /// Pay out experience, clear a wild opponent from the world, restore
    /// the ambient state and report the outcome. Drops the session.
    fn end_battle(&mut self, host: &mut BattleHost<'_>, outcome: BattleOutcome) -> BattleResult<EventBus> {
        let session = self.session.take().ok_or(ActionError::NoActiveBattle)?;
        let mut bus = EventBus::new();
        bus.push(BattleEvent::BattleEnded { outcome });

        let mut experience = Vec::new();
        for (slot, amount) in merge_credits(&session) {
            let Some(pal) = host.roster.pal_mut(slot) else {
                continue;
            };
            if pal.is_fainted() {
                debug!(pal = pal.name(), amount, "fainted pal forfeits experience");
                continue;
            }

            let name = pal.name().to_string();
            let levels = pal.add_experience(amount);
            bus.push(BattleEvent::ExperienceGained {
                pal: name.clone(),
                amount,
            });
            for level in levels {
                bus.push(BattleEvent::LeveledUp {
                    pal: name.clone(),
                    level: level.new_level,
                    max_hp: level.max_hp,
                });
            }
            experience.push((name, amount));
        }

        let mode = session.mode();
        if mode == BattleMode::Wild {
            host.world.clear_wild_opponent(session.opponent().name());
        }
        host.world.exit_battle(session.ambient());

        let summary = BattleSummary {
            mode,
            outcome,
            trainer: session.opponents().trainer_name().map(str::to_string),
            opponents: session
                .opponents()
                .pals()
                .iter()
                .map(|pal| pal.name().to_string())
                .collect(),
            experience,
        };
        info!(?outcome, %mode, rounds = session.round(), "battle ended");
        host.quests.battle_concluded(&summary);

        Ok(bus)
    }
}

/// Total the session's credits per slot, in the order slots were first credited.
fn merge_credits(session: &BattleSession) -> Vec<(usize, u32)> {
    let mut totals: Vec<(usize, u32)> = Vec::new();
    for credit in &session.experience_credits {
        match totals.iter_mut().find(|(slot, _)| *slot == credit.slot) {
            Some((_, amount)) => *amount = amount.saturating_add(credit.amount),
            None => totals.push((credit.slot, credit.amount)),
        }
    }
    totals
}

fn select_player_pal(roster: &mut dyn Roster, requested: Option<usize>) -> BattleResult<usize> {
    let conscious = roster.conscious_slots();
    if let Some(slot) = requested {
        return if conscious.contains(&slot) {
            Ok(slot)
        } else {
            Err(ActionError::InvalidPalSelection(slot).into())
        };
    }

    match conscious.as_slice() {
        [] => Err(ActionError::NoConsciousPal.into()),
        [only] => Ok(*only),
        choices => match roster.prompt_selection(choices) {
            Some(slot) if choices.contains(&slot) => Ok(slot),
            Some(slot) => Err(ActionError::InvalidPalSelection(slot).into()),
            None => Err(ActionError::SelectionCancelled.into()),
        },
    }
}
