use super::counter::SharedCounter;
use crate::error::{GenePoolError, Result};
use crate::genes::{Gene, Opcode, Probability};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// How a freshly grown `Get` gene obtains its template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GetPolicy {
    /// Grow a nested template subtree like any other child.
    #[default]
    Template,
    /// Borrow the shape of a creature already living in the pool.
    ExistingSpecies,
}

/// Supplies template shapes for `GetPolicy::ExistingSpecies`.
pub trait TemplateSource {
    fn sample_template<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Gene>;
}

/// Source for pools that have nothing to offer yet.
pub struct NoTemplates;

impl TemplateSource for NoTemplates {
    fn sample_template<R: Rng + ?Sized>(&self, _rng: &mut R) -> Option<Gene> {
        None
    }
}

/// Weighted distribution over the eight opcodes, in `Opcode::ALL` order.
#[derive(Debug, Clone)]
pub struct OpcodeWeights(WeightedIndex<f64>);

impl OpcodeWeights {
    pub fn new(weights: &[f64]) -> Result<Self> {
        if weights.len() != Opcode::ALL.len() {
            return Err(GenePoolError::Configuration(format!(
                "Expected {} opcode weights, got {}",
                Opcode::ALL.len(),
                weights.len()
            )));
        }
        WeightedIndex::new(weights)
            .map(Self)
            .map_err(|e| GenePoolError::Configuration(format!("Invalid opcode weights: {}", e)))
    }
}

/// Grows random creatures for seeding a pool.
#[derive(Debug, Clone)]
pub struct Initializer {
    relative_complexity: Probability,
    maximum_depth: usize,
    gene_counter: Arc<SharedCounter>,
    opcode_weights: Option<OpcodeWeights>,
    get_policy: GetPolicy,
}

impl Initializer {
    pub fn new(
        relative_complexity: Probability,
        maximum_depth: usize,
        gene_counter: Arc<SharedCounter>,
    ) -> Self {
        Self {
            relative_complexity,
            maximum_depth,
            gene_counter,
            opcode_weights: None,
            get_policy: GetPolicy::Template,
        }
    }

    pub fn with_opcode_weights(mut self, weights: Option<OpcodeWeights>) -> Self {
        self.opcode_weights = weights;
        self
    }

    pub fn with_get_policy(mut self, policy: GetPolicy) -> Self {
        self.get_policy = policy;
        self
    }

    pub fn get_policy(&self) -> GetPolicy {
        self.get_policy
    }

    /// Grow one complete creature. The caller decides where it lives.
    pub fn generate_creature<R, T>(&self, rng: &mut R, templates: &T) -> Gene
    where
        R: Rng + ?Sized,
        T: TemplateSource + ?Sized,
    {
        self.grow(0, rng, templates)
    }

    fn grow<R, T>(&self, depth: usize, rng: &mut R, templates: &T) -> Gene
    where
        R: Rng + ?Sized,
        T: TemplateSource + ?Sized,
    {
        let mut gene = self.generate_gene(rng);
        self.populate(&mut gene, depth, rng, templates);
        gene
    }

    fn populate<R, T>(&self, gene: &mut Gene, depth: usize, rng: &mut R, templates: &T)
    where
        R: Rng + ?Sized,
        T: TemplateSource + ?Sized,
    {
        let can_extend = depth < self.maximum_depth;
        match gene {
            Gene::Branch {
                probability,
                left,
                right,
            } => {
                if can_extend && self.coin_flip(rng) {
                    *left = Some(Box::new(self.grow(depth + 1, rng, templates)));
                }
                if can_extend && self.coin_flip(rng) {
                    *right = Some(Box::new(self.grow(depth + 1, rng, templates)));
                }
                *probability = Probability::sample(rng);
            }
            Gene::Chop { probability } | Gene::Copy { probability } | Gene::Mutate { probability } => {
                *probability = Probability::sample(rng);
            }
            Gene::Get { template } => match self.get_policy {
                GetPolicy::Template => {
                    if can_extend && self.coin_flip(rng) {
                        *template = Some(Box::new(self.grow(depth + 1, rng, templates)));
                    }
                }
                GetPolicy::ExistingSpecies => {
                    // the borrowed shape has to fit below this node
                    let room = self.maximum_depth.saturating_sub(depth);
                    *template = templates
                        .sample_template(rng)
                        .filter(|shape| can_extend && shape.depth() <= room)
                        .map(|shape| {
                            self.gene_counter.add(shape.count_genes() as i64);
                            Box::new(shape)
                        });
                }
            },
            Gene::Sequence { genes } => {
                let budget = self.maximum_depth.saturating_sub(depth);
                while genes.len() < budget && self.coin_flip(rng) {
                    let item = self.grow(depth + 1, rng, templates);
                    genes.push(item);
                }
            }
            Gene::Merge | Gene::Put => {}
        }
    }

    fn generate_gene<R: Rng + ?Sized>(&self, rng: &mut R) -> Gene {
        let pick = match &self.opcode_weights {
            Some(weights) => weights.0.sample(rng),
            None => rng.gen_range(0..Opcode::ALL.len()),
        };
        self.gene_counter.increment();
        Opcode::ALL[pick].bare()
    }

    fn coin_flip<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        self.relative_complexity
            .or(Probability::sample(rng))
            .coin_toss_with(rng)
    }
}
