use crate::genes::{Gene, Probability};
use crate::pool::Pool;

/// Builds a structural copy of a creature out of fresh pool residents.
///
/// Each node of the copy is a bare instance of the matching opcode pulled
/// from the pool, so copying consumes raw material. Children are copied
/// only when a temperature-weighted coin flip allows it, and a copy fails
/// silently wherever the pool has no suitable instance left.
pub struct Copier<'a> {
    pool: &'a dyn Pool,
    probability: Probability,
}

impl<'a> Copier<'a> {
    pub fn new(pool: &'a dyn Pool, probability: Probability) -> Self {
        Self { pool, probability }
    }

    pub fn copy(&self, gene: &Gene) -> Option<Gene> {
        let mut fresh = self.pool.get_creature(gene.opcode().canonical_id())?;

        let matched = match (gene, &mut fresh) {
            (
                Gene::Branch {
                    probability,
                    left,
                    right,
                },
                Gene::Branch {
                    probability: copied,
                    left: copied_left,
                    right: copied_right,
                },
            ) => {
                *copied = *probability;
                *copied_left = self.copy_slot(left);
                *copied_right = self.copy_slot(right);
                true
            }
            (Gene::Chop { probability }, Gene::Chop { probability: copied })
            | (Gene::Copy { probability }, Gene::Copy { probability: copied })
            | (Gene::Mutate { probability }, Gene::Mutate { probability: copied }) => {
                *copied = *probability;
                true
            }
            (Gene::Get { template }, Gene::Get { template: copied }) => {
                *copied = template.as_deref().and_then(|t| self.copy(t)).map(Box::new);
                true
            }
            (Gene::Sequence { genes }, Gene::Sequence { genes: copied }) => {
                for item in genes {
                    if self.pool.weighted_coin_flip(self.probability) {
                        if let Some(item) = self.copy(item) {
                            copied.push(item);
                        }
                    }
                }
                true
            }
            (Gene::Merge, Gene::Merge) | (Gene::Put, Gene::Put) => true,
            _ => false,
        };

        if !matched {
            // fingerprint collision handed us the wrong opcode
            self.pool.put_creature(fresh);
            return None;
        }
        Some(fresh)
    }

    fn copy_slot(&self, slot: &Option<Box<Gene>>) -> Option<Box<Gene>> {
        let child = slot.as_deref()?;
        if !self.pool.weighted_coin_flip(self.probability) {
            return None;
        }
        self.copy(child).map(Box::new)
    }
}
