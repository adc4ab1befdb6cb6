use crate::battle::state::BattleSession;
use crate::errors::TameError;
use crate::host::Inventory;
use pal_schema::ItemKind;

/// Check every precondition for a tame attempt without consuming anything.
pub fn can_attempt_tame(session: &BattleSession, inventory: &dyn Inventory) -> Result<(), TameError> {
    let target = session.opponent();
    if target.is_fainted() {
        return Err(TameError::TargetFainted {
            pal: target.name().to_string(),
        });
    }
    if !target.is_acquirable {
        return Err(TameError::NotAcquirable {
            pal: target.name().to_string(),
        });
    }
    if !inventory.has_item(ItemKind::Treat) {
        return Err(TameError::NoTreat);
    }
    Ok(())
}
