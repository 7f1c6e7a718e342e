pub mod gene;
pub mod probability;
pub mod species_id;

pub use gene::{Gene, Opcode};
pub use probability::Probability;
pub use species_id::SpeciesId;
