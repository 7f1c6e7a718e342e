pub mod config;
pub mod engines;
pub mod error;
pub mod genes;
pub mod pool;

pub use engines::{EvolutionEngine, Evolver, Processor};
pub use error::{GenePoolError, Result};
pub use genes::{Gene, Probability, SpeciesId};
pub use pool::{GenePool, Pool};
