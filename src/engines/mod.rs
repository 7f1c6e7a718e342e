pub mod evolution;
pub mod execution;
pub mod progress;

pub use evolution::{EvolutionEngine, Evolver};
pub use execution::Processor;
pub use progress::{ConsoleProgressCallback, PoolReport, ProgressCallback};
