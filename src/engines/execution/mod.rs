//! The gene interpreter and the visitors its opcodes delegate to.

pub mod chopper;
pub mod copier;
pub mod merger;
pub mod mutator;
pub mod processor;

pub use chopper::Chopper;
pub use copier::Copier;
pub use merger::Merger;
pub use mutator::Mutator;
pub use processor::Processor;
