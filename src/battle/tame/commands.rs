use crate::battle::commands::BattleCommand;
use crate::battle::state::{BattleEvent, BattleOutcome, BattlePhase, BattleSession, Side, TurnRng};
use crate::battle::tame::{calculate_tame_chance, roll_tame_success};
use crate::config::BattleConfig;
use crate::progression::RewardCalculator;
use pal_schema::ItemKind;
use tracing::debug;

/// Calculate commands for a tame attempt.
/// Preconditions are checked by `can_attempt_tame` before this is called.
/// The treat is spent whether or not the roll succeeds.
pub fn calculate_tame_commands(
    session: &BattleSession,
    config: &BattleConfig,
    rng: &mut TurnRng,
) -> Vec<BattleCommand> {
    let target = session.opponent();
    let pal = target.name().to_string();
    let chance = calculate_tame_chance(target);

    let mut commands = vec![
        BattleCommand::SetDefending {
            side: Side::Player,
            defending: false,
        },
        BattleCommand::ConsumeItem(ItemKind::Treat),
        BattleCommand::EmitEvent(BattleEvent::TameAttempted {
            pal: pal.clone(),
            chance,
        }),
    ];

    let success = roll_tame_success(chance, rng);
    debug!(%pal, chance, success, "tame attempt");

    if success {
        commands.push(BattleCommand::CapturePal);
        commands.push(BattleCommand::CreditExperience {
            slot: session.player_slot(),
            amount: RewardCalculator::new(config).tame_reward(),
        });
        commands.push(BattleCommand::EmitEvent(BattleEvent::TameSucceeded { pal }));
        commands.push(BattleCommand::SetPhase(BattlePhase::Concluded(BattleOutcome::Tamed)));
    } else {
        commands.push(BattleCommand::EmitEvent(BattleEvent::TameFailed { pal }));
    }
    commands
}
