//! Random selection of exercises for empty workout slots.
//!
//! Filling happens in two phases. [`Sampler::fill_unused`] draws without replacement from the
//! exercises that are neither chosen nor locked. If that pool runs dry before every slot is
//! filled, [`Sampler::fill_repeating`] draws with replacement from all unlocked exercises.

use log::debug;
use rand::Rng as _;

use crate::Exercise;

/// Uniform random choices, injectable for deterministic tests.
pub trait RandomSource {
    /// Return an index in `0..len`. `len` is never zero.
    fn choose_index(&mut self, len: usize) -> usize;

    /// Return `amount` distinct indices in `0..len`. `amount` never exceeds `len`.
    fn sample_indices(&mut self, len: usize, amount: usize) -> Vec<usize>;
}

/// Adapter for any [`rand::Rng`].
pub struct Random<R>(pub R);

impl Random<rand::rngs::ThreadRng> {
    #[must_use]
    pub fn thread() -> Self {
        Self(rand::thread_rng())
    }
}

impl<R: rand::Rng> RandomSource for Random<R> {
    fn choose_index(&mut self, len: usize) -> usize {
        self.0.gen_range(0..len)
    }

    fn sample_indices(&mut self, len: usize, amount: usize) -> Vec<usize> {
        rand::seq::index::sample(&mut self.0, len, amount).into_vec()
    }
}

pub struct Sampler<'a> {
    unused: Vec<&'a Exercise>,
    unlocked: Vec<&'a Exercise>,
}

impl<'a> Sampler<'a> {
    #[must_use]
    pub fn new(unused: Vec<&'a Exercise>, unlocked: Vec<&'a Exercise>) -> Self {
        Self { unused, unlocked }
    }

    /// Fill empty slots front to back with distinct exercises from the unused pool.
    ///
    /// Returns the number of slots that are still empty.
    pub fn fill_unused(
        &self,
        slots: &mut [Option<Exercise>],
        random: &mut dyn RandomSource,
    ) -> usize {
        let empty = empty_slots(slots);
        let amount = self.unused.len().min(empty);

        if amount > 0 {
            let chosen = random.sample_indices(self.unused.len(), amount);
            for (slot, idx) in slots
                .iter_mut()
                .filter(|slot| slot.is_none())
                .zip(chosen)
            {
                *slot = Some(self.unused[idx].clone());
            }
        }

        empty - amount
    }

    /// Fill remaining empty slots with exercises from the unlocked pool, repeats allowed.
    ///
    /// Slots stay empty if the unlocked pool is empty. Returns the number of slots that are
    /// still empty.
    pub fn fill_repeating(
        &self,
        slots: &mut [Option<Exercise>],
        random: &mut dyn RandomSource,
    ) -> usize {
        let empty = empty_slots(slots);

        if empty == 0 {
            return 0;
        }

        if self.unlocked.is_empty() {
            debug!("no unlocked exercises left to fill {empty} slots");
            return empty;
        }

        debug!(
            "filling {empty} slots from {} unlocked exercises with repetition",
            self.unlocked.len()
        );

        for slot in slots.iter_mut().filter(|slot| slot.is_none()) {
            *slot = Some(self.unlocked[random.choose_index(self.unlocked.len())].clone());
        }

        0
    }
}

fn empty_slots(slots: &[Option<Exercise>]) -> usize {
    slots.iter().filter(|slot| slot.is_none()).count()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rstest::rstest;

    use crate::{
        ExerciseID,
        testing::{First, Last, exercises},
    };

    use super::*;

    fn ids(slots: &[Option<Exercise>]) -> Vec<Option<u32>> {
        slots.iter().map(|s| s.as_ref().map(|e| *e.id)).collect()
    }

    #[rstest]
    #[case::first(Box::new(First), vec![Some(1), Some(9), Some(2), Some(3)])]
    #[case::last(Box::new(Last), vec![Some(5), Some(9), Some(4), Some(3)])]
    fn test_fill_unused(
        #[case] random: Box<dyn RandomSource>,
        #[case] expected: Vec<Option<u32>>,
    ) {
        let mut random = random;
        let pool = exercises(1..=5);
        let locked = exercises([9]);
        let mut slots = vec![None, Some(locked[0].clone()), None, None];
        let sampler = Sampler::new(pool.iter().collect(), pool.iter().collect());

        assert_eq!(sampler.fill_unused(&mut slots, random.as_mut()), 0);
        assert_eq!(ids(&slots), expected);
    }

    #[test]
    fn test_fill_unused_exhausted() {
        let pool = exercises(1..=2);
        let mut slots: Vec<Option<Exercise>> = vec![None, None, None, None];
        let sampler = Sampler::new(pool.iter().collect(), pool.iter().collect());

        assert_eq!(sampler.fill_unused(&mut slots, &mut First), 2);
        assert_eq!(ids(&slots), vec![Some(1), Some(2), None, None]);
    }

    #[test]
    fn test_fill_unused_empty_pool() {
        let mut slots: Vec<Option<Exercise>> = vec![None, None];
        let sampler = Sampler::new(vec![], vec![]);

        assert_eq!(sampler.fill_unused(&mut slots, &mut First), 2);
        assert_eq!(ids(&slots), vec![None, None]);
    }

    #[test]
    fn test_fill_repeating() {
        let unused = exercises([3]);
        let unlocked = exercises(2..=3);
        let mut slots: Vec<Option<Exercise>> = vec![None, None, None];
        let sampler = Sampler::new(unused.iter().collect(), unlocked.iter().collect());

        assert_eq!(sampler.fill_unused(&mut slots, &mut Last), 2);
        assert_eq!(sampler.fill_repeating(&mut slots, &mut Last), 0);
        assert_eq!(ids(&slots), vec![Some(3), Some(3), Some(3)]);
    }

    #[test]
    fn test_fill_repeating_empty_pool() {
        let mut slots: Vec<Option<Exercise>> = vec![None, None];
        let sampler = Sampler::new(vec![], vec![]);

        assert_eq!(sampler.fill_repeating(&mut slots, &mut First), 2);
        assert_eq!(ids(&slots), vec![None, None]);
    }

    #[test]
    fn test_fill_repeating_nothing_to_fill() {
        let pool = exercises([1]);
        let mut slots = vec![Some(pool[0].clone())];
        let sampler = Sampler::new(vec![], pool.iter().collect());

        assert_eq!(sampler.fill_repeating(&mut slots, &mut First), 0);
        assert_eq!(ids(&slots), vec![Some(1)]);
    }

    #[test]
    fn test_random_sample_indices_distinct() {
        for seed in 0..50 {
            let mut random = Random(rand::rngs::StdRng::seed_from_u64(seed));
            let indices = random.sample_indices(10, 4);

            assert_eq!(indices.len(), 4);
            assert_eq!(indices.iter().collect::<BTreeSet<_>>().len(), 4);
            assert!(indices.iter().all(|i| *i < 10));
            assert!(random.choose_index(3) < 3);
        }
    }

    #[test]
    fn test_fill_unused_random_distinct() {
        let pool = exercises(1..=8);

        for seed in 0..50 {
            let mut random = Random(rand::rngs::StdRng::seed_from_u64(seed));
            let mut slots: Vec<Option<Exercise>> = vec![None; 5];
            let sampler = Sampler::new(pool.iter().collect(), pool.iter().collect());

            assert_eq!(sampler.fill_unused(&mut slots, &mut random), 0);
            assert_eq!(
                slots
                    .iter()
                    .flatten()
                    .map(|e| e.id)
                    .collect::<BTreeSet<ExerciseID>>()
                    .len(),
                5
            );
        }
    }
}
