use super::traits::ConfigSection;
use crate::error::GenePoolError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    pub snapshot_path: Option<PathBuf>,
    pub load_on_start: bool,
    pub store_on_stop: bool,
}

impl ConfigSection for PersistenceConfig {
    fn section_name() -> &'static str {
        "persistence"
    }

    fn validate(&self) -> Result<(), GenePoolError> {
        if (self.load_on_start || self.store_on_stop) && self.snapshot_path.is_none() {
            return Err(GenePoolError::Configuration(
                "A snapshot path is required to load or store the pool".to_string(),
            ));
        }
        Ok(())
    }
}
