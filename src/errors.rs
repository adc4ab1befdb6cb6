use pal_schema::{ItemKind, MoveKind};
use thiserror::Error;

/// Main error type for the Pal battle engine
#[derive(Debug, Error)]
pub enum BattleEngineError {
    /// The player's intent was rejected; nothing was consumed
    #[error("action rejected: {0}")]
    Action(#[from] ActionError),
    /// The session and its collaborators disagree about who is fighting
    #[error("battle state error: {0}")]
    BattleState(#[from] BattleStateError),
    /// Template or configuration data could not be used
    #[error("data error: {0}")]
    Data(#[from] DataError),
}

/// Rejections of a submitted player intent.
///
/// None of these mutate the session or hand the opponent a turn; the caller
/// is expected to show the message and ask again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("there is no battle in progress")]
    NoActiveBattle,
    #[error("a battle is already in progress")]
    BattleAlreadyActive,
    #[error("you can't run from a trainer battle")]
    RunForbidden,
    #[error("you don't have any {0}s")]
    ItemUnavailable(ItemKind),
    #[error("no {0} attack uses remaining")]
    EnergyExhausted(MoveKind),
    #[error("your Pal fainted; choose another Pal with `switch <n>`")]
    MustSwitch,
    #[error("switching is only possible after your Pal faints")]
    SwitchNotExpected,
    #[error("roster slot {0} is not a conscious Pal you can send out")]
    InvalidPalSelection(usize),
    #[error("no Pal was selected")]
    SelectionCancelled,
    #[error("you have no conscious Pals")]
    NoConsciousPal,
    #[error(transparent)]
    Tame(#[from] TameError),
    #[error("unknown action `{0}`; valid actions are basic, special, defend, item, tame, run, switch <n>")]
    UnknownAction(String),
}

/// Preconditions for a taming attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TameError {
    #[error("{pal} has fainted and can't be tamed")]
    TargetFainted { pal: String },
    #[error("{pal} belongs to a trainer and can't be tamed")]
    NotAcquirable { pal: String },
    #[error("you need a treat to tame a Pal")]
    NoTreat,
}

/// Internal inconsistencies between the session and its collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleStateError {
    #[error("roster slot {0} no longer holds a Pal")]
    MissingRosterPal(usize),
    #[error("opponent party is empty")]
    EmptyOpponentParty,
}

/// Errors raised while loading templates or configuration.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to parse RON: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("unknown Pal template `{0}`")]
    UnknownPal(String),
    #[error("unknown trainer `{0}`")]
    UnknownTrainer(String),
    #[error("duplicate template `{0}`")]
    Duplicate(String),
    #[error("trainer `{0}` has an empty party")]
    EmptyParty(String),
}

/// Type alias for Results using BattleEngineError
pub type BattleResult<T> = Result<T, BattleEngineError>;

/// Type alias for Results using DataError
pub type DataResult<T> = Result<T, DataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_errors_convert_into_engine_error() {
        let err: BattleEngineError = ActionError::RunForbidden.into();
        assert!(matches!(err, BattleEngineError::Action(ActionError::RunForbidden)));
        assert_eq!(err.to_string(), "action rejected: you can't run from a trainer battle");
    }

    #[test]
    fn test_tame_errors_nest_inside_action_errors() {
        let err: ActionError = TameError::NotAcquirable {
            pal: "Bramblet".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Bramblet belongs to a trainer and can't be tamed");
    }

    #[test]
    fn test_item_names_render_lowercase() {
        assert_eq!(
            ActionError::ItemUnavailable(ItemKind::Potion).to_string(),
            "you don't have any potions"
        );
    }
}
