use super::counter::SharedCounter;
use super::initializer::{GetPolicy, Initializer, NoTemplates, OpcodeWeights, TemplateSource};
use super::persistence::PoolSnapshot;
use super::species::Species;
use super::Pool;
use crate::config::traits::ConfigSection;
use crate::config::PoolConfig;
use crate::error::{GenePoolError, Result};
use crate::genes::{Gene, Probability, SpeciesId};
use rand::seq::IteratorRandom;
use rand::Rng;
use rayon::prelude::*;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Temperature step applied on every speciation or extinction.
pub const TEMPERATURE_DELTA: f64 = 0.000_01;

// Adjustments keep the temperature strictly inside (delta, 1 - delta).
const TEMPERATURE_FLOOR: f64 = 2.0 * TEMPERATURE_DELTA;
const TEMPERATURE_CEILING: f64 = 1.0 - 2.0 * TEMPERATURE_DELTA;

#[derive(Debug)]
struct PoolState {
    species: HashMap<SpeciesId, Species>,
    temperature: Probability,
    genes: Arc<SharedCounter>,
    species_count: SharedCounter,
    creatures: SharedCounter,
}

impl PoolState {
    fn new(temperature: Probability) -> Self {
        Self {
            species: HashMap::new(),
            temperature,
            genes: Arc::new(SharedCounter::new()),
            species_count: SharedCounter::new(),
            creatures: SharedCounter::new(),
        }
    }

    fn clear(&mut self) {
        self.species.clear();
        self.genes.reset_counter();
        self.species_count.reset_counter();
        self.creatures.reset_counter();
    }

    fn reset_water_marks(&self) {
        self.genes.reset_water_marks();
        self.species_count.reset_water_marks();
        self.creatures.reset_water_marks();
    }

    fn random_species<R: Rng + ?Sized>(&self, rng: &mut R) -> SpeciesId {
        self.species
            .keys()
            .copied()
            .choose(rng)
            .unwrap_or(SpeciesId::ANY)
    }

    fn take(&mut self, species_id: SpeciesId) -> Option<Gene> {
        if self.species.is_empty() {
            return None;
        }
        let species_id = if species_id.is_any() {
            self.random_species(&mut rand::thread_rng())
        } else {
            species_id
        };

        let species = self.species.get_mut(&species_id)?;
        let creature = species.select_member()?;
        self.creatures.decrement();

        if species.is_extinct() {
            self.species.remove(&species_id);
            self.species_count.decrement();
            self.raise_temperature();
            log::trace!("Species {} went extinct", species_id);
        }
        Some(creature)
    }

    fn insert(&mut self, creature: Gene) {
        let species_id = creature.species_id();
        let is_new = !self.species.contains_key(&species_id);

        self.species.entry(species_id).or_default().add_member(creature);
        self.creatures.increment();

        if is_new {
            self.species_count.increment();
            self.lower_temperature();
            log::trace!("New species {}", species_id);
        }
    }

    // extinction means less diversity, so stir things up
    fn raise_temperature(&mut self) {
        self.adjust_temperature(TEMPERATURE_DELTA);
    }

    fn lower_temperature(&mut self) {
        self.adjust_temperature(-TEMPERATURE_DELTA);
    }

    fn adjust_temperature(&mut self, step: f64) {
        let next = (self.temperature.value() + step).clamp(TEMPERATURE_FLOOR, TEMPERATURE_CEILING);
        self.temperature = Probability::clamped(next);
    }
}

impl TemplateSource for PoolState {
    fn sample_template<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Gene> {
        let species_id = self.random_species(rng);
        self.species
            .get(&species_id)?
            .sample_member(rng)
            .cloned()
    }
}

/// The shared, species-bucketed creature store.
///
/// A single mutex guards the buckets, the temperature and the counters, so
/// every operation is totally ordered against every other one. Creatures
/// are moved in and out; the pool never hands out references.
#[derive(Debug)]
pub struct GenePool {
    state: Mutex<PoolState>,
}

impl Default for GenePool {
    fn default() -> Self {
        Self::new()
    }
}

impl GenePool {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(PoolState::new(Probability::EVEN)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, PoolState> {
        self.state.lock().unwrap_or_else(|poisoned| {
            log::warn!("Gene pool lock poisoned by a panicking worker, recovering");
            poisoned.into_inner()
        })
    }

    /// Seed the pool from a configuration section. Nothing changes when the
    /// section is invalid.
    pub fn initialize_with(&self, config: &PoolConfig) -> Result<()> {
        config.validate()?;
        let relative_complexity = Probability::new(config.relative_complexity)?;
        let temperature = Probability::new(config.initial_temperature)?;
        let weights = config
            .opcode_weights
            .as_deref()
            .map(OpcodeWeights::new)
            .transpose()?;

        self.populate(config.initial_creatures, temperature, |genes| {
            Initializer::new(relative_complexity, config.maximum_depth, genes)
                .with_opcode_weights(weights)
                .with_get_policy(config.get_policy)
        });
        Ok(())
    }

    fn populate<F>(&self, number_of_creatures: usize, temperature: Probability, initializer_for: F)
    where
        F: FnOnce(Arc<SharedCounter>) -> Initializer,
    {
        let mut state = self.lock();
        state.clear();
        state.temperature = temperature;
        let initializer = initializer_for(Arc::clone(&state.genes));

        match initializer.get_policy() {
            GetPolicy::Template => {
                let creatures: Vec<Gene> = (0..number_of_creatures)
                    .into_par_iter()
                    .map_init(rand::thread_rng, |rng, _| {
                        initializer.generate_creature(rng, &NoTemplates)
                    })
                    .collect();
                for creature in creatures {
                    state.insert(creature);
                }
            }
            GetPolicy::ExistingSpecies => {
                let mut rng = rand::thread_rng();
                for _ in 0..number_of_creatures {
                    let creature = initializer.generate_creature(&mut rng, &*state);
                    state.insert(creature);
                }
            }
        }

        // seeding should not show up in the watermarks
        state.reset_water_marks();

        log::info!(
            "Gene pool initialized: {} creatures, {} species, {} genes, temperature {}",
            state.creatures.current_value(),
            state.species_count.current_value(),
            state.genes.current_value(),
            state.temperature
        );
    }

    /// Live species fingerprints, in no particular order.
    pub fn species_ids(&self) -> Vec<SpeciesId> {
        self.lock().species.keys().copied().collect()
    }

    /// Number of creatures in one bucket (zero when it does not exist).
    pub fn species_size(&self, species_id: SpeciesId) -> usize {
        self.lock().species.get(&species_id).map_or(0, Species::len)
    }

    /// Consistent copy of the whole pool, taken under the lock.
    pub fn snapshot(&self) -> PoolSnapshot {
        let state = self.lock();
        PoolSnapshot {
            temperature: state.temperature,
            genes: state.genes.snapshot(),
            species_count: state.species_count.snapshot(),
            creatures: state.creatures.snapshot(),
            buckets: state
                .species
                .iter()
                .map(|(id, species)| (*id, species.clone()))
                .collect(),
        }
    }

    /// Rebuild a pool, checking that every member sits in its own bucket.
    pub fn from_snapshot(snapshot: PoolSnapshot) -> Result<Self> {
        let mut species = HashMap::with_capacity(snapshot.buckets.len());
        for (species_id, bucket) in snapshot.buckets {
            if bucket.is_extinct() {
                return Err(GenePoolError::Persistence(format!(
                    "Species {} has no members",
                    species_id
                )));
            }
            if let Some(stray) = bucket.members().iter().find(|m| m.species_id() != species_id) {
                return Err(GenePoolError::Persistence(format!(
                    "Creature of species {} stored under {}",
                    stray.species_id(),
                    species_id
                )));
            }
            species.insert(species_id, bucket);
        }

        let state = PoolState {
            species,
            temperature: snapshot.temperature,
            genes: Arc::new(SharedCounter::from_snapshot(&snapshot.genes)),
            species_count: SharedCounter::from_snapshot(&snapshot.species_count),
            creatures: SharedCounter::from_snapshot(&snapshot.creatures),
        };
        Ok(Self {
            state: Mutex::new(state),
        })
    }
}

impl Pool for GenePool {
    fn initialize(
        &self,
        number_of_creatures: usize,
        relative_complexity: Probability,
        maximum_depth: usize,
        temperature: Probability,
    ) {
        self.populate(number_of_creatures, temperature, |genes| {
            Initializer::new(relative_complexity, maximum_depth, genes)
        });
    }

    fn get_creature(&self, species_id: SpeciesId) -> Option<Gene> {
        self.lock().take(species_id)
    }

    fn put_creature(&self, creature: Gene) {
        self.lock().insert(creature);
    }

    fn pick_random_species(&self) -> SpeciesId {
        self.lock().random_species(&mut rand::thread_rng())
    }

    fn current_number_of_genes(&self) -> i64 {
        self.lock().genes.current_value()
    }

    fn lowest_number_of_genes(&self) -> i64 {
        self.lock().genes.low_water_mark()
    }

    fn highest_number_of_genes(&self) -> i64 {
        self.lock().genes.high_water_mark()
    }

    fn current_number_of_species(&self) -> i64 {
        self.lock().species_count.current_value()
    }

    fn lowest_number_of_species(&self) -> i64 {
        self.lock().species_count.low_water_mark()
    }

    fn highest_number_of_species(&self) -> i64 {
        self.lock().species_count.high_water_mark()
    }

    fn current_number_of_creatures(&self) -> i64 {
        self.lock().creatures.current_value()
    }

    fn lowest_number_of_creatures(&self) -> i64 {
        self.lock().creatures.low_water_mark()
    }

    fn highest_number_of_creatures(&self) -> i64 {
        self.lock().creatures.high_water_mark()
    }

    fn reset_water_marks(&self) {
        self.lock().reset_water_marks();
    }

    fn temperature(&self) -> Probability {
        self.lock().temperature
    }

    fn set_temperature(&self, temperature: Probability) {
        self.lock().temperature = temperature;
    }

    fn weighted_coin_flip(&self, probability: Probability) -> bool {
        let temperature = self.lock().temperature;
        probability.and(temperature).coin_toss()
    }
}
