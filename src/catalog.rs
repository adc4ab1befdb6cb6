//! Pal and trainer templates loaded from RON.
//!
//! Templates are immutable and shared through `Arc`; every spawned Pal owns
//! only its own battle record.

use crate::battle::trainer::OpponentParty;
use crate::errors::{BattleResult, DataError, DataResult};
use crate::pal::Pal;
use pal_schema::{PalTemplate, TrainerTemplate};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// On-disk shape of a catalog file.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    starter: Option<String>,
    pals: Vec<PalTemplate>,
    #[serde(default)]
    trainers: Vec<TrainerTemplate>,
}

#[derive(Debug, Clone, Default)]
pub struct PalCatalog {
    pals: HashMap<String, Arc<PalTemplate>>,
    trainers: HashMap<String, TrainerTemplate>,
    pal_order: Vec<String>,
    trainer_order: Vec<String>,
    starter: Option<String>,
}

fn key(name: &str) -> String {
    name.trim().to_lowercase()
}

impl PalCatalog {
    pub fn from_ron_str(source: &str) -> DataResult<Self> {
        let file: CatalogFile = ron::from_str(source)?;
        Self::from_templates(file.pals, file.trainers, file.starter)
    }

    pub fn load(path: &Path) -> DataResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| DataError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_ron_str(&content)
    }

    /// Build a catalog, rejecting duplicate names, trainers with empty
    /// parties, and parties or starters that name an unknown Pal.
    pub fn from_templates(
        pals: Vec<PalTemplate>,
        trainers: Vec<TrainerTemplate>,
        starter: Option<String>,
    ) -> DataResult<Self> {
        let mut catalog = PalCatalog::default();

        for template in pals {
            let k = key(&template.name);
            if catalog.pals.contains_key(&k) {
                return Err(DataError::Duplicate(template.name));
            }
            catalog.pal_order.push(template.name.clone());
            catalog.pals.insert(k, Arc::new(template));
        }

        for trainer in trainers {
            let k = key(&trainer.name);
            if catalog.trainers.contains_key(&k) {
                return Err(DataError::Duplicate(trainer.name));
            }
            if trainer.party.is_empty() {
                return Err(DataError::EmptyParty(trainer.name));
            }
            if let Some(unknown) = trainer.party.iter().find(|pal| catalog.template(pal).is_none()) {
                return Err(DataError::UnknownPal(unknown.clone()));
            }
            catalog.trainer_order.push(trainer.name.clone());
            catalog.trainers.insert(k, trainer);
        }

        if let Some(starter) = &starter {
            if catalog.template(starter).is_none() {
                return Err(DataError::UnknownPal(starter.clone()));
            }
        }
        catalog.starter = starter;

        debug!(
            pals = catalog.pals.len(),
            trainers = catalog.trainers.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    pub fn template(&self, name: &str) -> Option<&Arc<PalTemplate>> {
        self.pals.get(&key(name))
    }

    pub fn trainer(&self, name: &str) -> Option<&TrainerTemplate> {
        self.trainers.get(&key(name))
    }

    /// Pal names in file order.
    pub fn pal_names(&self) -> &[String] {
        &self.pal_order
    }

    /// Trainer names in file order.
    pub fn trainer_names(&self) -> &[String] {
        &self.trainer_order
    }

    pub fn starter(&self) -> Option<&str> {
        self.starter.as_deref()
    }

    fn instantiate(&self, name: &str) -> DataResult<Pal> {
        self.template(name)
            .map(|template| Pal::from_template(Arc::clone(template)))
            .ok_or_else(|| DataError::UnknownPal(name.to_string()))
    }

    /// A fresh wild Pal, acquirable unless its template says otherwise.
    pub fn spawn_wild(&self, name: &str) -> DataResult<Pal> {
        self.instantiate(name)
    }

    /// A fresh Pal for the player's roster.
    pub fn spawn_starter(&self, name: &str) -> DataResult<Pal> {
        self.instantiate(name)
    }

    /// The trainer's party in order, every member non-acquirable.
    pub fn spawn_trainer_party(&self, trainer: &str) -> BattleResult<OpponentParty> {
        let template = self
            .trainer(trainer)
            .ok_or_else(|| DataError::UnknownTrainer(trainer.to_string()))?;

        let mut party = Vec::with_capacity(template.party.len());
        for name in &template.party {
            let pal_template = self
                .template(name)
                .ok_or_else(|| DataError::UnknownPal(name.clone()))?;
            party.push(Pal::for_trainer(Arc::clone(pal_template)));
        }
        OpponentParty::trainer(template.name.clone(), party)
    }
}
