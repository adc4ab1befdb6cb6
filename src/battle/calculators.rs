use crate::battle::commands::{BattleCommand, HealSource};
use crate::battle::state::{BattleEvent, BattleSession, Side, TurnRng};
use crate::errors::BattleResult;
use crate::host::Roster;
use crate::pal::Pal;
use pal_schema::MoveKind;

pub const DAMAGE_VARIANCE: i32 = 2;
pub const MIN_DAMAGE: u32 = 1;
pub const BASE_HEAL: u32 = 15;
pub const HEAL_VARIANCE: i32 = 2;
pub const MIN_HEAL: u32 = 5;

fn apply_variance(base: u32, variance: i32, floor: u32) -> u32 {
    let rolled = i64::from(base) + i64::from(variance);
    rolled.max(i64::from(floor)).min(i64::from(u32::MAX)) as u32
}

/// Raw damage for `attacker` using `kind`: base damage plus a roll in
/// [-2, 2], never below 1.
pub fn compute_attack_damage(attacker: &Pal, kind: MoveKind, rng: &mut TurnRng) -> u32 {
    let variance = rng.next_in(-DAMAGE_VARIANCE..=DAMAGE_VARIANCE, "damage variance");
    apply_variance(attacker.base_damage(kind), variance, MIN_DAMAGE)
}

/// Halve `damage` rounding up when the defender is bracing.
pub fn apply_defense(damage: u32, defender_is_bracing: bool) -> u32 {
    if defender_is_bracing {
        damage.div_ceil(2)
    } else {
        damage
    }
}

/// Potion heal: 15 plus a roll in [-2, 2], never below 5.
pub fn compute_heal(rng: &mut TurnRng) -> u32 {
    let variance = rng.next_in(-HEAL_VARIANCE..=HEAL_VARIANCE, "heal variance");
    apply_variance(BASE_HEAL, variance, MIN_HEAL)
}

fn active_pal<'r>(
    side: Side,
    session: &'r BattleSession,
    roster: &'r dyn Roster,
) -> BattleResult<&'r Pal> {
    match side {
        Side::Player => session.player_pal(roster),
        Side::Opponent => Ok(session.opponent()),
    }
}

/// Commands for one attack by `attacker_side` using `kind`.
///
/// Attacking drops the attacker's own brace. A brace on the defending side
/// halves this hit and is consumed by it.
pub fn calculate_attack_commands(
    attacker_side: Side,
    kind: MoveKind,
    session: &BattleSession,
    roster: &dyn Roster,
    rng: &mut TurnRng,
) -> BattleResult<Vec<BattleCommand>> {
    let attacker = active_pal(attacker_side, session, roster)?;
    let defender_side = attacker_side.opposite();
    let braced = session.is_defending(defender_side);

    let raw = compute_attack_damage(attacker, kind, rng);
    let damage = apply_defense(raw, braced);

    let mut commands = vec![
        BattleCommand::SetDefending {
            side: attacker_side,
            defending: false,
        },
        BattleCommand::SpendEnergy {
            side: attacker_side,
            kind,
        },
        BattleCommand::EmitEvent(BattleEvent::MoveUsed {
            side: attacker_side,
            pal: attacker.name().to_string(),
            move_name: attacker.move_name(kind).to_string(),
            kind,
        }),
    ];
    if braced {
        commands.push(BattleCommand::SetDefending {
            side: defender_side,
            defending: false,
        });
    }
    commands.push(BattleCommand::DealDamage {
        target: defender_side,
        amount: damage,
        braced,
    });
    Ok(commands)
}

/// Brace for the next hit and recover a little HP.
pub fn calculate_defend_commands(side: Side, heal: u32) -> Vec<BattleCommand> {
    vec![
        BattleCommand::SetDefending {
            side,
            defending: true,
        },
        BattleCommand::HealPal {
            target: side,
            amount: heal,
            source: HealSource::Defend,
        },
    ]
}
