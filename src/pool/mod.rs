pub mod counter;
pub mod gene_pool;
pub mod initializer;
pub mod persistence;
pub mod species;

pub use counter::{CounterSnapshot, SharedCounter};
pub use gene_pool::{GenePool, TEMPERATURE_DELTA};
pub use initializer::{GetPolicy, Initializer, NoTemplates, OpcodeWeights, TemplateSource};
pub use persistence::{PoolSnapshot, SnapshotFile};
pub use species::Species;

use crate::genes::{Gene, Probability, SpeciesId};

/// The shared creature store as seen by the interpreter, the evolution
/// engine and any dashboard. Every method is atomic with respect to every
/// other method on the same pool.
pub trait Pool: Send + Sync {
    /// Replace the whole population with `number_of_creatures` random ones.
    fn initialize(
        &self,
        number_of_creatures: usize,
        relative_complexity: Probability,
        maximum_depth: usize,
        temperature: Probability,
    );

    /// Take a creature out of the pool; `SpeciesId::ANY` picks a random species.
    fn get_creature(&self, species_id: SpeciesId) -> Option<Gene>;

    /// Return a creature to the bucket matching its current shape.
    fn put_creature(&self, creature: Gene);

    /// A uniformly chosen live species, or `SpeciesId::ANY` if there is none.
    fn pick_random_species(&self) -> SpeciesId;

    fn current_number_of_genes(&self) -> i64;
    fn lowest_number_of_genes(&self) -> i64;
    fn highest_number_of_genes(&self) -> i64;

    fn current_number_of_species(&self) -> i64;
    fn lowest_number_of_species(&self) -> i64;
    fn highest_number_of_species(&self) -> i64;

    fn current_number_of_creatures(&self) -> i64;
    fn lowest_number_of_creatures(&self) -> i64;
    fn highest_number_of_creatures(&self) -> i64;

    fn reset_water_marks(&self);

    fn temperature(&self) -> Probability;
    fn set_temperature(&self, temperature: Probability);

    /// Coin toss on `probability AND temperature`.
    fn weighted_coin_flip(&self, probability: Probability) -> bool;
}
