pub mod evolution_engine;
pub mod worker;

pub use evolution_engine::{EvolutionEngine, Evolver, DEFAULT_STACK_SIZE};
