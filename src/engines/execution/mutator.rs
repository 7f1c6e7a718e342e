use crate::genes::{Gene, Probability};
use crate::pool::Pool;
use rand::Rng;

/// Rewrites a creature in place, children before parents.
///
/// Every change is gated by a temperature-weighted coin flip. Probability
/// rewrites keep the species; swapping arms or relocating sequence items
/// changes it.
pub struct Mutator<'a> {
    pool: &'a dyn Pool,
    probability: Probability,
}

impl<'a> Mutator<'a> {
    pub fn new(pool: &'a dyn Pool, probability: Probability) -> Self {
        Self { pool, probability }
    }

    pub fn mutate(&self, gene: &mut Gene) {
        match gene {
            Gene::Branch {
                probability,
                left,
                right,
            } => {
                if let Some(child) = left.as_deref_mut() {
                    self.mutate(child);
                }
                if let Some(child) = right.as_deref_mut() {
                    self.mutate(child);
                }
                if self.flip() {
                    *probability = Probability::random();
                }
                if self.flip() {
                    std::mem::swap(left, right);
                }
            }
            Gene::Chop { probability } | Gene::Mutate { probability } => {
                if self.flip() {
                    *probability = Probability::random();
                }
            }
            Gene::Get { template } => {
                if let Some(template) = template.as_deref_mut() {
                    self.mutate(template);
                }
            }
            Gene::Sequence { genes } => {
                for item in genes.iter_mut() {
                    self.mutate(item);
                }
                if genes.len() > 1 && self.flip() {
                    let mut rng = rand::thread_rng();
                    let item = genes.remove(rng.gen_range(0..genes.len()));
                    genes.insert(rng.gen_range(0..=genes.len()), item);
                }
            }
            Gene::Copy { .. } | Gene::Merge | Gene::Put => {}
        }
    }

    fn flip(&self) -> bool {
        self.pool.weighted_coin_flip(self.probability)
    }
}
