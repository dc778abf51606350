//! Block planning
//!
//! Builds the ordered trial-type list for one block: a multiset with
//! the configured repetition count per type, fully shuffled. Every
//! measurement block reuses the same multiset with a fresh shuffle, so
//! composition is identical across blocks and only the order varies.

use crate::stimulus::types::TrialType;
use rand::seq::SliceRandom;
use rand::Rng;

/// Configured repetitions per trial type for one block
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TypeCounts {
    pub congruent: usize,
    pub incongruent: usize,
    pub control: usize,
}

impl TypeCounts {
    /// Total trials in a block with these counts
    pub fn total(&self) -> usize {
        self.congruent + self.incongruent + self.control
    }
}

/// Produce the shuffled trial-type order for one block
pub fn plan_block<R: Rng>(counts: TypeCounts, rng: &mut R) -> Vec<TrialType> {
    let mut order = Vec::with_capacity(counts.total());
    order.extend(std::iter::repeat(TrialType::Congruent).take(counts.congruent));
    order.extend(std::iter::repeat(TrialType::Incongruent).take(counts.incongruent));
    order.extend(std::iter::repeat(TrialType::Control).take(counts.control));
    order.shuffle(rng);
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn count_of(order: &[TrialType], trial_type: TrialType) -> usize {
        order.iter().filter(|&&t| t == trial_type).count()
    }

    #[test]
    fn test_multiset_matches_configured_counts() {
        let counts = TypeCounts {
            congruent: 5,
            incongruent: 3,
            control: 2,
        };
        let mut rng = StdRng::seed_from_u64(21);
        for _ in 0..20 {
            let order = plan_block(counts, &mut rng);
            assert_eq!(order.len(), 10);
            assert_eq!(count_of(&order, TrialType::Congruent), 5);
            assert_eq!(count_of(&order, TrialType::Incongruent), 3);
            assert_eq!(count_of(&order, TrialType::Control), 2);
        }
    }

    #[test]
    fn test_one_of_each_is_a_permutation() {
        let counts = TypeCounts {
            congruent: 1,
            incongruent: 1,
            control: 1,
        };
        let mut rng = StdRng::seed_from_u64(22);
        let order = plan_block(counts, &mut rng);
        assert_eq!(order.len(), 3);
        assert_eq!(count_of(&order, TrialType::Congruent), 1);
        assert_eq!(count_of(&order, TrialType::Incongruent), 1);
        assert_eq!(count_of(&order, TrialType::Control), 1);
    }

    #[test]
    fn test_zero_counts_give_empty_block() {
        let counts = TypeCounts {
            congruent: 0,
            incongruent: 0,
            control: 0,
        };
        let mut rng = StdRng::seed_from_u64(23);
        assert!(plan_block(counts, &mut rng).is_empty());
    }

    #[test]
    fn test_shuffle_is_deterministic_under_seed() {
        let counts = TypeCounts {
            congruent: 4,
            incongruent: 4,
            control: 4,
        };
        let first = plan_block(counts, &mut StdRng::seed_from_u64(9));
        let second = plan_block(counts, &mut StdRng::seed_from_u64(9));
        assert_eq!(first, second);
    }
}
