use super::{
    evolution::EvolutionConfig,
    persistence::PersistenceConfig,
    pool::PoolConfig,
    traits::ConfigSection,
};
use crate::error::GenePoolError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

/// Prefix for environment overrides, e.g. `GENEPOOL__EVOLUTION__THREAD_COUNT=4`.
pub const ENV_PREFIX: &str = "GENEPOOL";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub pool: PoolConfig,
    pub evolution: EvolutionConfig,
    pub persistence: PersistenceConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), GenePoolError> {
        self.pool.validate()?;
        self.evolution.validate()?;
        self.persistence.validate()?;
        Ok(())
    }
}

pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::default())),
        }
    }

    /// Layer a TOML or JSON file (by extension) under environment overrides.
    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), GenePoolError> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(Self::environment())
            .build()?;
        self.install(settings.try_deserialize()?)
    }

    /// Defaults plus environment overrides only.
    pub fn load_from_env(&self) -> Result<(), GenePoolError> {
        let settings = config::Config::builder()
            .add_source(Self::environment())
            .build()?;
        self.install(settings.try_deserialize()?)
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
    }

    fn install(&self, config: AppConfig) -> Result<(), GenePoolError> {
        config.validate()?;
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = config;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), GenePoolError> {
        let toml_str = toml::to_string_pretty(&self.get())?;
        std::fs::write(path, toml_str)?;
        Ok(())
    }

    pub fn get(&self) -> AppConfig {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Apply `f` and keep the result only if it validates.
    pub fn update<F>(&self, f: F) -> Result<(), GenePoolError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut config = self.config.write().unwrap_or_else(PoisonError::into_inner);
        let mut candidate = config.clone();
        f(&mut candidate);
        candidate.validate()?;
        *config = candidate;
        Ok(())
    }
}
