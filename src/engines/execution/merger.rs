use crate::genes::Gene;
use rand::Rng;

/// Grafts creatures from the operand stack into empty slots of another.
///
/// Empty branch arms and an empty `Get` template each take one stack item;
/// a sequence takes one item at a random position. Descent into already
/// filled slots stops as soon as the stack runs dry.
pub struct Merger<'s> {
    stack: &'s mut Vec<Gene>,
}

impl<'s> Merger<'s> {
    pub fn new(stack: &'s mut Vec<Gene>) -> Self {
        Self { stack }
    }

    pub fn merge(&mut self, gene: &mut Gene) {
        match gene {
            Gene::Branch { left, right, .. } => {
                self.fill(left);
                self.fill(right);
                self.descend(left);
                self.descend(right);
            }
            Gene::Get { template } => {
                self.fill(template);
                self.descend(template);
            }
            Gene::Sequence { genes } => {
                if let Some(top) = self.stack.pop() {
                    let index = rand::thread_rng().gen_range(0..=genes.len());
                    genes.insert(index, top);
                }
                for item in genes.iter_mut() {
                    if self.stack.is_empty() {
                        break;
                    }
                    self.merge(item);
                }
            }
            Gene::Chop { .. }
            | Gene::Copy { .. }
            | Gene::Merge
            | Gene::Mutate { .. }
            | Gene::Put => {}
        }
    }

    fn fill(&mut self, slot: &mut Option<Box<Gene>>) {
        if slot.is_none() {
            *slot = self.stack.pop().map(Box::new);
        }
    }

    fn descend(&mut self, slot: &mut Option<Box<Gene>>) {
        if self.stack.is_empty() {
            return;
        }
        if let Some(child) = slot.as_deref_mut() {
            self.merge(child);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genes::Probability;

    #[test]
    fn test_fills_empty_arms_from_top_of_stack() {
        let mut stack = vec![Gene::Merge, Gene::Put];
        let mut gene = Gene::branch(Probability::EVEN, None, None);

        Merger::new(&mut stack).merge(&mut gene);

        assert!(stack.is_empty());
        assert_eq!(
            gene,
            Gene::branch(Probability::EVEN, Some(Gene::Put), Some(Gene::Merge))
        );
    }

    #[test]
    fn test_descends_into_filled_arms() {
        let inner = Gene::branch(Probability::EVEN, None, None);
        let mut gene = Gene::branch(Probability::EVEN, Some(inner), Some(Gene::Put));
        let mut stack = vec![Gene::Merge];

        Merger::new(&mut stack).merge(&mut gene);

        assert!(stack.is_empty());
        assert_eq!(
            gene,
            Gene::branch(
                Probability::EVEN,
                Some(Gene::branch(Probability::EVEN, Some(Gene::Merge), None)),
                Some(Gene::Put),
            )
        );
    }

    #[test]
    fn test_sequence_takes_one_item() {
        let mut stack = vec![Gene::Merge, Gene::Put];
        let mut gene = Gene::sequence(vec![Gene::Copy { probability: Probability::EVEN }]);

        Merger::new(&mut stack).merge(&mut gene);

        // the leaves in the sequence have no slots for the rest
        assert_eq!(stack, vec![Gene::Merge]);
        let Gene::Sequence { genes } = &gene else {
            panic!("merge changed the opcode");
        };
        assert_eq!(genes.len(), 2);
        assert!(genes.contains(&Gene::Put));
    }

    #[test]
    fn test_get_takes_template() {
        let mut stack = vec![Gene::Put];
        let mut gene = Gene::get(None);

        Merger::new(&mut stack).merge(&mut gene);

        assert_eq!(gene, Gene::get(Some(Gene::Put)));
    }

    #[test]
    fn test_leaves_leave_stack_alone() {
        let mut stack = vec![Gene::Put];
        let mut gene = Gene::Mutate {
            probability: Probability::EVEN,
        };

        Merger::new(&mut stack).merge(&mut gene);

        assert_eq!(stack.len(), 1);
    }
}
