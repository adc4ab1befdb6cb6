use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// The two attack slots every Pal carries.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum MoveKind {
    Basic,
    Special,
}

impl MoveKind {
    /// The other attack slot, used when one energy pool runs dry.
    pub fn other(self) -> MoveKind {
        match self {
            MoveKind::Basic => MoveKind::Special,
            MoveKind::Special => MoveKind::Basic,
        }
    }
}

/// Consumables the battle core knows how to spend.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum ItemKind {
    Potion,
    Treat,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum BattleMode {
    Wild,
    Trainer,
}

impl BattleMode {
    pub fn allows_running(self) -> bool {
        matches!(self, BattleMode::Wild)
    }
}
