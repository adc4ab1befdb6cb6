use serde::{Deserialize, Serialize};

/// A trainer's ordered party, referencing Pal templates by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainerTemplate {
    pub name: String,
    pub party: Vec<String>,
    #[serde(default)]
    pub intro: Option<String>,
}
