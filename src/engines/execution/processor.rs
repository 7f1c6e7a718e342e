use super::{Chopper, Copier, Merger, Mutator};
use crate::genes::Gene;
use crate::pool::Pool;

/// Executes a creature's program against the pool.
///
/// The operand stack holds creatures taken out of the pool by `Get` (or
/// produced by `Copy`). Anything still on the stack after a program ends
/// must go back through [`Processor::reset`]; dropping the processor does
/// the same so no creature leaves circulation.
pub struct Processor<'a> {
    pool: &'a dyn Pool,
    stack: Vec<Gene>,
}

impl<'a> Processor<'a> {
    pub fn new(pool: &'a dyn Pool) -> Self {
        Self {
            pool,
            stack: Vec::new(),
        }
    }

    pub fn push(&mut self, creature: Gene) {
        self.stack.push(creature);
    }

    pub fn stack(&self) -> &[Gene] {
        &self.stack
    }

    pub fn stack_len(&self) -> usize {
        self.stack.len()
    }

    /// Run one gene; composite genes run their children recursively.
    pub fn process(&mut self, gene: &Gene) {
        match gene {
            Gene::Branch {
                probability,
                left,
                right,
            } => {
                // the branch's own odds, not damped by temperature
                let chosen = if probability.coin_toss() { left } else { right };
                if let Some(child) = chosen {
                    self.process(child);
                }
            }
            Gene::Chop { probability } => {
                if let Some(mut top) = self.stack.pop() {
                    Chopper::new(self.pool, *probability).chop(&mut top);
                    self.stack.push(top);
                }
            }
            Gene::Copy { probability } => {
                if let Some(top) = self.stack.pop() {
                    let copy = Copier::new(self.pool, *probability).copy(&top);
                    self.stack.push(top);
                    if let Some(copy) = copy {
                        self.stack.push(copy);
                    }
                }
            }
            Gene::Get { template } => {
                if let Some(template) = template {
                    if let Some(creature) = self.pool.get_creature(template.species_id()) {
                        self.stack.push(creature);
                    }
                }
            }
            Gene::Merge => {
                if self.stack.len() >= 2 {
                    if let Some(mut top) = self.stack.pop() {
                        Merger::new(&mut self.stack).merge(&mut top);
                        self.stack.push(top);
                    }
                }
            }
            Gene::Mutate { probability } => {
                if let Some(mut top) = self.stack.pop() {
                    Mutator::new(self.pool, *probability).mutate(&mut top);
                    self.stack.push(top);
                }
            }
            Gene::Put => {
                if let Some(top) = self.stack.pop() {
                    self.pool.put_creature(top);
                }
            }
            Gene::Sequence { genes } => {
                for gene in genes {
                    self.process(gene);
                }
            }
        }
    }

    /// Return every creature left on the stack to the pool.
    pub fn reset(&mut self) {
        while let Some(top) = self.stack.pop() {
            self.pool.put_creature(top);
        }
    }
}

impl Drop for Processor<'_> {
    fn drop(&mut self) {
        self.reset();
    }
}
