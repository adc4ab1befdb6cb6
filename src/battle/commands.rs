use crate::battle::state::{BattleEvent, BattlePhase, BattleSession, EventBus, Side};
use crate::errors::{ActionError, BattleResult, BattleStateError};
use crate::host::BattleHost;
use crate::pal::Pal;
use pal_schema::{ItemKind, MoveKind};

/// Why a heal happened; decides which event narrates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealSource {
    Defend,
    Potion,
    Exhausted,
}

/// Atomic commands representing final state changes.
///
/// Calculators decide *what* happens (and consume randomness); the executor
/// below is the only place that mutates the session or its collaborators.
#[derive(Debug, Clone, PartialEq)]
pub enum BattleCommand {
    DealDamage {
        target: Side,
        amount: u32,
        braced: bool,
    },
    HealPal {
        target: Side,
        amount: u32,
        source: HealSource,
    },
    SpendEnergy {
        side: Side,
        kind: MoveKind,
    },
    SetDefending {
        side: Side,
        defending: bool,
    },
    ConsumeItem(ItemKind),
    /// Copy the active opponent into the player's roster.
    CapturePal,
    CreditExperience {
        slot: usize,
        amount: u32,
    },
    SetPhase(BattlePhase),
    EmitEvent(BattleEvent),
}

pub fn execute_command_batch(
    commands: Vec<BattleCommand>,
    session: &mut BattleSession,
    host: &mut BattleHost<'_>,
    bus: &mut EventBus,
) -> BattleResult<()> {
    for command in commands {
        execute_command(command, session, host, bus)?;
    }
    Ok(())
}

/// Helper function to execute commands that operate on one side's active Pal
fn execute_pal_command<F, T>(
    target: Side,
    session: &mut BattleSession,
    host: &mut BattleHost<'_>,
    operation: F,
) -> BattleResult<T>
where
    F: FnOnce(&mut Pal) -> T,
{
    match target {
        Side::Opponent => Ok(operation(session.opponent_mut())),
        Side::Player => {
            let slot = session.player_slot;
            let pal = host
                .roster
                .pal_mut(slot)
                .ok_or(BattleStateError::MissingRosterPal(slot))?;
            Ok(operation(pal))
        }
    }
}

fn execute_command(
    command: BattleCommand,
    session: &mut BattleSession,
    host: &mut BattleHost<'_>,
    bus: &mut EventBus,
) -> BattleResult<()> {
    match command {
        BattleCommand::EmitEvent(event) => {
            bus.push(event);
        }
        BattleCommand::DealDamage {
            target,
            amount,
            braced,
        } => {
            let (pal, remaining_hp) = execute_pal_command(target, session, host, |pal| {
                pal.apply_damage(amount);
                (pal.name().to_string(), pal.hp)
            })?;
            bus.push(BattleEvent::DamageDealt {
                side: target,
                pal,
                damage: amount,
                remaining_hp,
                braced,
            });
        }
        BattleCommand::HealPal {
            target,
            amount,
            source,
        } => {
            let (pal, healed, new_hp) = execute_pal_command(target, session, host, |pal| {
                let healed = pal.heal(amount);
                (pal.name().to_string(), healed, pal.hp)
            })?;
            bus.push(match source {
                HealSource::Defend => BattleEvent::Defended {
                    side: target,
                    pal,
                    healed,
                },
                HealSource::Potion => BattleEvent::PalHealed {
                    side: target,
                    pal,
                    amount: healed,
                    new_hp,
                },
                HealSource::Exhausted => BattleEvent::EnergyExhausted { pal, healed },
            });
        }
        BattleCommand::SpendEnergy { side, kind } => {
            let spent = execute_pal_command(side, session, host, |pal| pal.spend_use(kind))?;
            if !spent {
                return Err(ActionError::EnergyExhausted(kind).into());
            }
        }
        BattleCommand::SetDefending { side, defending } => {
            session.set_defending(side, defending);
        }
        BattleCommand::ConsumeItem(item) => {
            if !host.inventory.consume_item(item) {
                return Err(ActionError::ItemUnavailable(item).into());
            }
        }
        BattleCommand::CapturePal => {
            let tamed = session.opponent().clone();
            host.roster.add_pal(tamed);
        }
        BattleCommand::CreditExperience { slot, amount } => {
            session.credit_experience(slot, amount);
        }
        BattleCommand::SetPhase(phase) => {
            session.phase = phase;
        }
    }
    Ok(())
}
