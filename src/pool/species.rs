use crate::genes::Gene;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Bucket of creatures sharing one fingerprint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Species {
    members: Vec<Gene>,
}

impl Species {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_members(members: Vec<Gene>) -> Self {
        Self { members }
    }

    pub fn add_member(&mut self, creature: Gene) {
        self.members.push(creature);
    }

    /// Removes and returns a uniformly chosen member.
    pub fn select_member(&mut self) -> Option<Gene> {
        self.select_member_with(&mut rand::thread_rng())
    }

    pub fn select_member_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Gene> {
        if self.members.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.members.len());
        Some(self.members.swap_remove(index))
    }

    /// A uniformly chosen member, left in place.
    pub fn sample_member<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Gene> {
        if self.members.is_empty() {
            return None;
        }
        self.members.get(rng.gen_range(0..self.members.len()))
    }

    pub fn is_extinct(&self) -> bool {
        self.members.is_empty()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> &[Gene] {
        &self.members
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_drains_bucket() {
        let mut species = Species::from_members(vec![Gene::Put, Gene::Put, Gene::Put]);

        let mut taken = 0;
        while let Some(member) = species.select_member() {
            assert_eq!(member, Gene::Put);
            taken += 1;
        }

        assert_eq!(taken, 3);
        assert!(species.is_extinct());
        assert!(species.select_member().is_none());
    }

    #[test]
    fn test_sample_leaves_member() {
        let mut rng = rand::thread_rng();
        let species = Species::from_members(vec![Gene::Merge]);
        assert_eq!(species.sample_member(&mut rng), Some(&Gene::Merge));
        assert_eq!(species.len(), 1);
    }
}
