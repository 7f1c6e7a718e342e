use crate::error::GenePoolError;
use serde::{Deserialize, Serialize};

/// Trait for configuration sections
pub trait ConfigSection: Serialize + for<'de> Deserialize<'de> + Default + Clone {
    fn section_name() -> &'static str;
    fn validate(&self) -> Result<(), GenePoolError>;
}

pub(crate) fn check_probability(section: &str, field: &str, value: f64) -> Result<(), GenePoolError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(GenePoolError::Configuration(format!(
            "{}.{} must be between 0 and 1, got {}",
            section, field, value
        )))
    }
}
