use super::traits::{check_probability, ConfigSection};
use crate::error::GenePoolError;
use crate::pool::GetPolicy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub initial_creatures: usize,
    pub relative_complexity: f64,
    pub maximum_depth: usize,
    pub initial_temperature: f64,
    pub get_policy: GetPolicy,
    /// Relative draw weights in Branch, Chop, Copy, Get, Merge, Mutate, Put,
    /// Sequence order. Uniform when absent.
    pub opcode_weights: Option<Vec<f64>>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            initial_creatures: 1000,
            relative_complexity: 0.75,
            maximum_depth: 10,
            initial_temperature: 0.5,
            get_policy: GetPolicy::Template,
            opcode_weights: None,
        }
    }
}

impl ConfigSection for PoolConfig {
    fn section_name() -> &'static str {
        "pool"
    }

    fn validate(&self) -> Result<(), GenePoolError> {
        check_probability(Self::section_name(), "relative_complexity", self.relative_complexity)?;
        check_probability(Self::section_name(), "initial_temperature", self.initial_temperature)?;
        if self.maximum_depth < 1 {
            return Err(GenePoolError::Configuration(
                "Maximum depth must be at least 1".to_string(),
            ));
        }
        if let Some(weights) = &self.opcode_weights {
            if weights.len() != 8 {
                return Err(GenePoolError::Configuration(format!(
                    "Opcode weights need one entry per opcode (8), got {}",
                    weights.len()
                )));
            }
            if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
                return Err(GenePoolError::Configuration(
                    "Opcode weights must be finite and non-negative".to_string(),
                ));
            }
            if weights.iter().sum::<f64>() <= 0.0 {
                return Err(GenePoolError::Configuration(
                    "Opcode weights must not all be zero".to_string(),
                ));
            }
        }
        Ok(())
    }
}
