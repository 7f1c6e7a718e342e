use super::traits::ConfigSection;
use crate::error::GenePoolError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub thread_count: usize,
    /// Worker stack size in bytes; interpretation recurses over gene trees.
    pub worker_stack_size: usize,
    /// Zero runs until standard input is closed.
    pub run_seconds: u64,
    pub report_interval_millis: u64,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            thread_count: 10,
            worker_stack_size: 16 * 1024 * 1024,
            run_seconds: 60,
            report_interval_millis: 1000,
        }
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<(), GenePoolError> {
        if self.thread_count < 1 {
            return Err(GenePoolError::Configuration(
                "Thread count must be at least 1".to_string(),
            ));
        }
        if self.worker_stack_size < 64 * 1024 {
            return Err(GenePoolError::Configuration(
                "Worker stack size must be at least 64 KiB".to_string(),
            ));
        }
        if self.report_interval_millis == 0 {
            return Err(GenePoolError::Configuration(
                "Report interval must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
