use crate::genes::{Gene, Probability};
use crate::pool::Pool;

/// Prunes subtrees out of a creature and releases them into the pool.
///
/// Children are chopped bottom-up: a child is visited before the decision to
/// detach it from its parent is made.
pub struct Chopper<'a> {
    pool: &'a dyn Pool,
    probability: Probability,
}

impl<'a> Chopper<'a> {
    pub fn new(pool: &'a dyn Pool, probability: Probability) -> Self {
        Self { pool, probability }
    }

    pub fn chop(&self, gene: &mut Gene) {
        match gene {
            Gene::Branch { left, right, .. } => {
                self.chop_slot(left);
                self.chop_slot(right);
            }
            Gene::Sequence { genes } => {
                let mut index = 0;
                while index < genes.len() {
                    self.chop(&mut genes[index]);
                    if self.pool.weighted_coin_flip(self.probability) {
                        let item = genes.remove(index);
                        self.pool.put_creature(item);
                    } else {
                        index += 1;
                    }
                }
            }
            Gene::Chop { .. }
            | Gene::Copy { .. }
            | Gene::Get { .. }
            | Gene::Merge
            | Gene::Mutate { .. }
            | Gene::Put => {}
        }
    }

    fn chop_slot(&self, slot: &mut Option<Box<Gene>>) {
        let Some(child) = slot.as_deref_mut() else {
            return;
        };
        self.chop(child);
        if self.pool.weighted_coin_flip(self.probability) {
            if let Some(child) = slot.take() {
                self.pool.put_creature(*child);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genes::Opcode;
    use crate::pool::GenePool;

    fn hot_pool() -> GenePool {
        let pool = GenePool::new();
        pool.initialize(0, Probability::EVEN, 10, Probability::ALWAYS);
        pool
    }

    #[test]
    fn test_leaves_have_nothing_to_chop() {
        let pool = hot_pool();
        let chopper = Chopper::new(&pool, Probability::ALWAYS);
        for opcode in Opcode::ALL {
            let mut gene = opcode.bare();
            chopper.chop(&mut gene);
            assert_eq!(gene, opcode.bare());
        }
        assert_eq!(pool.current_number_of_creatures(), 0);
    }

    #[test]
    fn test_certain_chop_strips_sequence() {
        let pool = hot_pool();
        let mut gene = Gene::sequence(vec![Gene::Put, Gene::Merge, Gene::Put]);

        Chopper::new(&pool, Probability::ALWAYS).chop(&mut gene);

        assert_eq!(gene, Gene::sequence(Vec::new()));
        assert_eq!(pool.current_number_of_creatures(), 3);
        assert_eq!(pool.species_size(Gene::Put.species_id()), 2);
        assert_eq!(pool.species_size(Gene::Merge.species_id()), 1);
    }

    #[test]
    fn test_nested_children_are_released_separately() {
        let pool = hot_pool();
        let mut gene = Gene::branch(
            Probability::EVEN,
            Some(Gene::branch(Probability::EVEN, Some(Gene::Put), None)),
            None,
        );

        Chopper::new(&pool, Probability::ALWAYS).chop(&mut gene);

        // inner Put goes first, then the emptied inner branch
        assert_eq!(gene, Gene::branch(Probability::EVEN, None, None));
        assert_eq!(pool.species_size(Gene::Put.species_id()), 1);
        assert_eq!(pool.species_size(Opcode::Branch.canonical_id()), 1);
    }

    #[test]
    fn test_impossible_chop_changes_nothing() {
        let pool = hot_pool();
        let original = Gene::sequence(vec![Gene::Put, Gene::branch(Probability::EVEN, Some(Gene::Merge), None)]);
        let mut gene = original.clone();

        Chopper::new(&pool, Probability::NEVER).chop(&mut gene);

        assert_eq!(gene, original);
        assert_eq!(pool.current_number_of_creatures(), 0);
    }
}
