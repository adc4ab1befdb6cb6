use crate::battle::ai::{resolve_energy, Behavior, MoveResolution, OpponentIntent};
use crate::battle::calculators::{calculate_attack_commands, calculate_defend_commands, compute_heal};
use crate::battle::commands::{execute_command_batch, BattleCommand, HealSource};
use crate::battle::state::{BattleEvent, BattleOutcome, BattlePhase, BattleSession, EventBus, Side, TurnRng};
use crate::battle::tame::{calculate_tame_commands, can_attempt_tame};
use crate::battle::trainer::{
    on_mutual_exhaustion, on_opponent_fainted, on_player_fainted, switch_player_pal,
};
use crate::config::BattleConfig;
use crate::errors::{ActionError, BattleResult};
use crate::host::BattleHost;
use crate::player::PlayerAction;
use pal_schema::{ItemKind, MoveKind};
use tracing::{debug, warn};

/// Main entry point for turn resolution.
///
/// Resolves one player action and, when the battle is still on, the
/// opponent's reply, then checks end conditions. A rejected action returns
/// an error before anything is mutated.
pub fn resolve_player_action(
    session: &mut BattleSession,
    action: PlayerAction,
    host: &mut BattleHost<'_>,
    rng: &mut TurnRng,
    config: &BattleConfig,
    behavior: &dyn Behavior,
) -> BattleResult<EventBus> {
    let mut bus = EventBus::new();

    // 1. Forced switches sit outside the normal round
    if let Err(err) = check_phase_allows(session, &action) {
        warn!(%action, %err, "action rejected");
        return Err(err.into());
    }
    if let PlayerAction::Switch { slot } = action {
        switch_player_pal(session, &mut *host.roster, slot, &mut bus)?;
        return Ok(bus);
    }

    // 2. Validation
    if let Err(err) = validate_player_action(session, &action, host) {
        warn!(%action, %err, "action rejected");
        return Err(err.into());
    }

    // 3. Player action
    session.phase = BattlePhase::ResolvingPlayerAction;
    debug!(round = session.round, %action, "resolving player action");
    let commands = calculate_player_commands(session, action, host, rng, config)?;
    execute_command_batch(commands, session, host, &mut bus)?;
    if session.is_concluded() {
        return Ok(bus);
    }

    // 4. Opponent reply
    if !session.opponent().is_fainted() {
        session.phase = BattlePhase::OpponentTurn;
        let commands = calculate_opponent_commands(session, host, rng, config, behavior)?;
        execute_command_batch(commands, session, host, &mut bus)?;
    }

    // 5. End conditions
    session.phase = BattlePhase::CheckingEndConditions;
    bus.push(session.hp_status(&*host.roster)?);
    check_end_conditions(session, host, config, &mut bus)?;
    session.round += 1;

    Ok(bus)
}

fn check_phase_allows(session: &BattleSession, action: &PlayerAction) -> Result<(), ActionError> {
    match (session.phase, action) {
        (BattlePhase::Concluded(_), _) => Err(ActionError::NoActiveBattle),
        (BattlePhase::PlayerMustSwitch, PlayerAction::Switch { .. }) => Ok(()),
        (BattlePhase::PlayerMustSwitch, _) => Err(ActionError::MustSwitch),
        (_, PlayerAction::Switch { .. }) => Err(ActionError::SwitchNotExpected),
        _ => Ok(()),
    }
}

/// Reject anything that cannot be carried out. Nothing is consumed on failure.
fn validate_player_action(
    session: &BattleSession,
    action: &PlayerAction,
    host: &BattleHost<'_>,
) -> Result<(), ActionError> {
    if let Some(kind) = action.move_kind() {
        let pal = host
            .roster
            .pal(session.player_slot)
            .ok_or(ActionError::InvalidPalSelection(session.player_slot))?;
        if !pal.has_energy_for(kind) {
            return Err(ActionError::EnergyExhausted(kind));
        }
    }

    match action {
        PlayerAction::Item => {
            if !host.inventory.has_item(ItemKind::Potion) {
                return Err(ActionError::ItemUnavailable(ItemKind::Potion));
            }
        }
        PlayerAction::Tame => can_attempt_tame(session, &*host.inventory)?,
        PlayerAction::Run => {
            if !session.mode().allows_running() {
                return Err(ActionError::RunForbidden);
            }
        }
        PlayerAction::Basic | PlayerAction::Special | PlayerAction::Defend | PlayerAction::Switch { .. } => {}
    }
    Ok(())
}

fn calculate_player_commands(
    session: &BattleSession,
    action: PlayerAction,
    host: &BattleHost<'_>,
    rng: &mut TurnRng,
    config: &BattleConfig,
) -> BattleResult<Vec<BattleCommand>> {
    let clear_brace = BattleCommand::SetDefending {
        side: Side::Player,
        defending: false,
    };

    let commands = match action {
        PlayerAction::Basic => {
            calculate_attack_commands(Side::Player, MoveKind::Basic, session, &*host.roster, rng)?
        }
        PlayerAction::Special => {
            calculate_attack_commands(Side::Player, MoveKind::Special, session, &*host.roster, rng)?
        }
        PlayerAction::Defend => calculate_defend_commands(Side::Player, config.defend_heal),
        PlayerAction::Item => vec![
            clear_brace,
            BattleCommand::ConsumeItem(ItemKind::Potion),
            BattleCommand::EmitEvent(BattleEvent::ItemUsed {
                item: ItemKind::Potion,
            }),
            BattleCommand::HealPal {
                target: Side::Player,
                amount: compute_heal(rng),
                source: HealSource::Potion,
            },
        ],
        PlayerAction::Tame => calculate_tame_commands(session, config, rng),
        PlayerAction::Run => {
            let roll = rng.roll_percent("run attempt");
            if roll < config.run_success_percent {
                vec![
                    clear_brace,
                    BattleCommand::EmitEvent(BattleEvent::Fled),
                    BattleCommand::SetPhase(BattlePhase::Concluded(BattleOutcome::Fled)),
                ]
            } else {
                vec![clear_brace, BattleCommand::EmitEvent(BattleEvent::RunFailed)]
            }
        }
        PlayerAction::Switch { .. } => Vec::new(),
    };
    Ok(commands)
}

/// The opponent's reply. Energy is accounted for here, so the opponent can
/// always act: an empty pool falls back to the other move type, and with
/// both empty it braces and recovers instead.
fn calculate_opponent_commands(
    session: &BattleSession,
    host: &BattleHost<'_>,
    rng: &mut TurnRng,
    config: &BattleConfig,
    behavior: &dyn Behavior,
) -> BattleResult<Vec<BattleCommand>> {
    let opponent = session.opponent();
    let player = session.player_pal(&*host.roster)?;

    let wanted = match behavior.decide_action(opponent, player, rng) {
        OpponentIntent::Defend => {
            return Ok(calculate_defend_commands(Side::Opponent, config.defend_heal));
        }
        OpponentIntent::Attack(kind) => kind,
    };

    let commands = match resolve_energy(opponent, wanted) {
        MoveResolution::Use(kind) => {
            calculate_attack_commands(Side::Opponent, kind, session, &*host.roster, rng)?
        }
        MoveResolution::Fallback { wanted, used } => {
            debug!(pal = opponent.name(), %wanted, %used, "opponent energy fallback");
            let mut commands = vec![BattleCommand::EmitEvent(BattleEvent::EnergyFallback {
                pal: opponent.name().to_string(),
                wanted,
                used,
            })];
            commands.extend(calculate_attack_commands(
                Side::Opponent,
                used,
                session,
                &*host.roster,
                rng,
            )?);
            commands
        }
        MoveResolution::Exhausted => vec![
            BattleCommand::SetDefending {
                side: Side::Opponent,
                defending: true,
            },
            BattleCommand::HealPal {
                target: Side::Opponent,
                amount: config.exhausted_heal,
                source: HealSource::Exhausted,
            },
        ],
    };
    Ok(commands)
}

fn check_end_conditions(
    session: &mut BattleSession,
    host: &mut BattleHost<'_>,
    config: &BattleConfig,
    bus: &mut EventBus,
) -> BattleResult<()> {
    if session.opponent().is_fainted() {
        on_opponent_fainted(session, &mut *host.roster, config, bus)
    } else if session.player_pal(&*host.roster)?.is_fainted() {
        on_player_fainted(session, &*host.roster, bus)
    } else if !session.mode().allows_running()
        && session.opponent().is_exhausted()
        && session.player_pal(&*host.roster)?.is_exhausted()
    {
        on_mutual_exhaustion(session, &mut *host.roster, bus)
    } else {
        session.phase = BattlePhase::AwaitingPlayerAction;
        Ok(())
    }
}
