//! Deterministic random sources and exercise fixtures for tests.

use crate::{Exercise, Name, RandomSource};

/// Always picks the lowest indices.
pub struct First;

impl RandomSource for First {
    fn choose_index(&mut self, _len: usize) -> usize {
        0
    }

    fn sample_indices(&mut self, _len: usize, amount: usize) -> Vec<usize> {
        (0..amount).collect()
    }
}

/// Always picks the highest indices, last first.
pub struct Last;

impl RandomSource for Last {
    fn choose_index(&mut self, len: usize) -> usize {
        len - 1
    }

    fn sample_indices(&mut self, len: usize, amount: usize) -> Vec<usize> {
        (len - amount..len).rev().collect()
    }
}

/// Active exercises named `Exercise <id>`.
///
/// # Panics
///
/// Panics if a generated name is rejected by [`Name::new`].
#[must_use]
pub fn exercises(ids: impl IntoIterator<Item = u32>) -> Vec<Exercise> {
    ids.into_iter()
        .map(|id| Exercise::new(id.into(), Name::new(&format!("Exercise {id}")).unwrap()))
        .collect()
}
