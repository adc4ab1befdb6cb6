use crate::battle::tame::describe_tame_chance;
use crate::battle::trainer::OpponentParty;
use crate::errors::{BattleResult, BattleStateError};
use crate::host::{AmbientToken, Roster};
use crate::pal::Pal;
use pal_schema::{BattleMode, ItemKind, MoveKind};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Which side of the field a command or event refers to.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Player,
    Opponent,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Player => Side::Opponent,
            Side::Opponent => Side::Player,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleOutcome {
    Victory,
    Defeat,
    Tamed,
    Fled,
}

/// Where the per-round state machine currently stands.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattlePhase {
    AwaitingPlayerAction,
    ResolvingPlayerAction,
    OpponentTurn,
    CheckingEndConditions,
    PlayerMustSwitch, // The active Pal fainted and another conscious Pal must be sent out
    Concluded(BattleOutcome),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct HpLine {
    pub pal: String,
    pub hp: u32,
    pub max_hp: u32,
}

impl HpLine {
    pub fn of(pal: &Pal) -> Self {
        Self {
            pal: pal.name().to_string(),
            hp: pal.hp,
            max_hp: pal.max_hp,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum BattleEvent {
    // Encounter flow
    BattleStarted {
        mode: BattleMode,
        player_pal: String,
        opponent_pal: String,
        trainer: Option<String>,
    },
    TrainerSentOut {
        trainer: String,
        pal: String,
        remaining: usize,
    },

    // Actions
    MoveUsed {
        side: Side,
        pal: String,
        move_name: String,
        kind: MoveKind,
    },
    EnergyFallback {
        pal: String,
        wanted: MoveKind,
        used: MoveKind,
    },
    EnergyExhausted {
        pal: String,
        healed: u32,
    },
    DamageDealt {
        side: Side,
        pal: String,
        damage: u32,
        remaining_hp: u32,
        braced: bool,
    },
    Defended {
        side: Side,
        pal: String,
        healed: u32,
    },
    PalHealed {
        side: Side,
        pal: String,
        amount: u32,
        new_hp: u32,
    },
    ItemUsed {
        item: ItemKind,
    },
    HpStatus {
        player: HpLine,
        opponent: HpLine,
    },

    // Taming and running
    TameAttempted {
        pal: String,
        chance: u32,
    },
    TameSucceeded {
        pal: String,
    },
    TameFailed {
        pal: String,
    },
    RunFailed,
    Fled,

    // Fainting and switching
    PalFainted {
        side: Side,
        pal: String,
    },
    /// Neither active Pal had energy left in a battle the player can't run from.
    PalCollapsed {
        pal: String,
    },
    SwitchRequired {
        choices: Vec<usize>,
    },
    PalSwitched {
        old_pal: String,
        new_pal: String,
    },

    // Progression
    ExperienceGained {
        pal: String,
        amount: u32,
    },
    LeveledUp {
        pal: String,
        level: u32,
        max_hp: u32,
    },

    BattleEnded {
        outcome: BattleOutcome,
    },
}

impl BattleEvent {
    /// Formats the event into a player-facing line.
    /// Returns None for silent events that should not produce user-visible text.
    pub fn format(&self) -> Option<String> {
        match self {
            BattleEvent::BattleStarted {
                mode,
                player_pal,
                opponent_pal,
                trainer,
            } => match (mode, trainer) {
                (BattleMode::Trainer, Some(trainer)) => Some(format!(
                    "{} wants to battle! Go, {}!",
                    trainer, player_pal
                )),
                _ => Some(format!(
                    "A wild {} appears! Go, {}!",
                    opponent_pal, player_pal
                )),
            },
            BattleEvent::TrainerSentOut {
                trainer,
                pal,
                remaining,
            } => Some(format!(
                "{} sent out {}! ({} left in reserve)",
                trainer, pal, remaining
            )),

            BattleEvent::MoveUsed { pal, move_name, .. } => {
                Some(format!("{} used {}!", pal, move_name))
            }
            BattleEvent::EnergyFallback { pal, wanted, .. } => Some(format!(
                "{} is out of {} energy and switches tactics!",
                pal, wanted
            )),
            BattleEvent::EnergyExhausted { pal, healed } => Some(format!(
                "{} is out of energy! It braces and recovers {} HP.",
                pal, healed
            )),
            BattleEvent::DamageDealt {
                pal, damage, braced, ..
            } => {
                if *braced {
                    Some(format!("{} braced and took only {} damage.", pal, damage))
                } else {
                    Some(format!("{} took {} damage.", pal, damage))
                }
            }
            BattleEvent::Defended { pal, healed, .. } => Some(format!(
                "{} braces for the next attack and heals for {} HP!",
                pal, healed
            )),
            BattleEvent::PalHealed { pal, amount, .. } => {
                Some(format!("{} healed for {} HP!", pal, amount))
            }
            BattleEvent::ItemUsed { item } => Some(format!("You used a {}!", item)),
            BattleEvent::HpStatus { player, opponent } => Some(format!(
                "{} HP: {}/{} | {} HP: {}/{}",
                player.pal, player.hp, player.max_hp, opponent.pal, opponent.hp, opponent.max_hp
            )),

            BattleEvent::TameAttempted { pal, chance } => Some(format!(
                "You toss a treat to {}... (chance: {})",
                pal,
                describe_tame_chance(*chance)
            )),
            BattleEvent::TameSucceeded { pal } => {
                Some(format!("You tamed {}! It joins your team.", pal))
            }
            BattleEvent::TameFailed { pal } => Some(format!("Taming {} failed!", pal)),
            BattleEvent::RunFailed => Some("You couldn't get away!".to_string()),
            BattleEvent::Fled => Some("You ran away!".to_string()),

            BattleEvent::PalFainted { pal, .. } => Some(format!("{} fainted!", pal)),
            BattleEvent::PalCollapsed { pal } => Some(format!(
                "With no energy left on either side, {} collapses from exhaustion!",
                pal
            )),
            BattleEvent::SwitchRequired { choices } => Some(format!(
                "Choose your next Pal: {}",
                choices
                    .iter()
                    .map(|slot| format!("switch {}", slot + 1))
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
            BattleEvent::PalSwitched { new_pal, .. } => Some(format!("Go, {}!", new_pal)),

            BattleEvent::ExperienceGained { pal, amount } => {
                Some(format!("{} gained {} XP!", pal, amount))
            }
            BattleEvent::LeveledUp { pal, level, .. } => {
                Some(format!("{} grew to Level {}!", pal, level))
            }

            BattleEvent::BattleEnded { outcome } => match outcome {
                BattleOutcome::Victory => Some("You won the battle!".to_string()),
                BattleOutcome::Defeat => Some("You lost the battle.".to_string()),
                BattleOutcome::Tamed | BattleOutcome::Fled => None,
            },
        }
    }
}

/// Ordered log of everything that happened while resolving a call.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    events: Vec<BattleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<BattleEvent> {
        self.events
    }

    /// Player-facing lines for every non-silent event, in order.
    pub fn formatted_lines(&self) -> Vec<String> {
        self.events.iter().filter_map(BattleEvent::format).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}


#[derive(Debug, Clone)]
enum RngSource {
    Scripted { outcomes: Vec<i32>, index: usize },
    Live(StdRng),
}

/// The single source of randomness for a battle.
///
/// Every draw states its range and the reason it is taken, so scripted runs
/// read like a transcript of the dice.
#[derive(Debug, Clone)]
pub struct TurnRng {
    source: RngSource,
}

impl TurnRng {
    /// Replays `outcomes` verbatim, in order.
    ///
    /// Panics when a draw is requested past the end of the script or when a
    /// scripted value falls outside the requested range.
    pub fn new_for_test(outcomes: Vec<i32>) -> Self {
        Self {
            source: RngSource::Scripted { outcomes, index: 0 },
        }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            source: RngSource::Live(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn new_random() -> Self {
        Self {
            source: RngSource::Live(StdRng::from_os_rng()),
        }
    }

    pub fn next_in(&mut self, range: RangeInclusive<i32>, reason: &str) -> i32 {
        let outcome = match &mut self.source {
            RngSource::Scripted { outcomes, index } => {
                let Some(&outcome) = outcomes.get(*index) else {
                    panic!(
                        "TurnRng exhausted! Tried to get a value for: '{}'. Need more random values.",
                        reason
                    );
                };
                assert!(
                    range.contains(&outcome),
                    "Scripted value {} for '{}' is outside {:?}",
                    outcome,
                    reason,
                    range
                );
                *index += 1;
                outcome
            }
            RngSource::Live(rng) => rng.random_range(range),
        };

        tracing::trace!(outcome, reason, "rng draw");
        outcome
    }

    /// A uniform roll in [0, 100).
    pub fn roll_percent(&mut self, reason: &str) -> u32 {
        self.next_in(0..=99, reason) as u32
    }
}

/// Experience earned during the session, paid out when it ends.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExperienceCredit {
    pub slot: usize,
    pub amount: u32,
}

/// What the outside world learns once a session is over.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BattleSummary {
    pub mode: BattleMode,
    pub outcome: BattleOutcome,
    pub trainer: Option<String>,
    pub opponents: Vec<String>,
    pub experience: Vec<(String, u32)>,
}

/// The one live battle. Created by `BattleRunner::start_battle`, mutated only
/// by the turn orchestrator and trainer controller, dropped when it concludes.
#[derive(Debug, Clone)]
pub struct BattleSession {
    pub(crate) phase: BattlePhase,
    pub(crate) round: u32,
    pub(crate) player_slot: usize,
    pub(crate) opponents: OpponentParty,
    pub(crate) player_defending: bool,
    pub(crate) opponent_defending: bool,
    pub(crate) ambient: AmbientToken,
    pub(crate) experience_credits: Vec<ExperienceCredit>,
}

impl BattleSession {
    pub fn new(player_slot: usize, opponents: OpponentParty, ambient: AmbientToken) -> Self {
        Self {
            phase: BattlePhase::AwaitingPlayerAction,
            round: 1,
            player_slot,
            opponents,
            player_defending: false,
            opponent_defending: false,
            ambient,
            experience_credits: Vec::new(),
        }
    }

    pub fn mode(&self) -> BattleMode {
        self.opponents.mode()
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn player_slot(&self) -> usize {
        self.player_slot
    }

    pub fn opponents(&self) -> &OpponentParty {
        &self.opponents
    }

    pub fn opponent(&self) -> &Pal {
        self.opponents.active()
    }

    pub fn opponent_mut(&mut self) -> &mut Pal {
        self.opponents.active_mut()
    }

    pub fn ambient(&self) -> AmbientToken {
        self.ambient
    }

    pub fn is_defending(&self, side: Side) -> bool {
        match side {
            Side::Player => self.player_defending,
            Side::Opponent => self.opponent_defending,
        }
    }

    pub(crate) fn set_defending(&mut self, side: Side, defending: bool) {
        match side {
            Side::Player => self.player_defending = defending,
            Side::Opponent => self.opponent_defending = defending,
        }
    }

    pub fn is_concluded(&self) -> bool {
        matches!(self.phase, BattlePhase::Concluded(_))
    }

    pub fn credit_experience(&mut self, slot: usize, amount: u32) {
        if amount > 0 {
            self.experience_credits.push(ExperienceCredit { slot, amount });
        }
    }

    /// The player's active Pal, looked up in the roster.
    pub fn player_pal<'r>(&self, roster: &'r dyn Roster) -> BattleResult<&'r Pal> {
        roster
            .pal(self.player_slot)
            .ok_or_else(|| BattleStateError::MissingRosterPal(self.player_slot).into())
    }

    pub fn hp_status(&self, roster: &dyn Roster) -> BattleResult<BattleEvent> {
        Ok(BattleEvent::HpStatus {
            player: HpLine::of(self.player_pal(roster)?),
            opponent: HpLine::of(self.opponent()),
        })
    }
}
