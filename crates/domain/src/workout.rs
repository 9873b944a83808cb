use std::collections::{HashMap, HashSet};

use indexmap::IndexSet;
use log::debug;

use crate::{Exercise, ExerciseID, RandomSource, Sampler};

/// Exercise ids pinned by the user, in the order they were submitted.
pub type LockSet = IndexSet<ExerciseID>;

/// Reorder a workout to match the order the user sees on screen.
///
/// Each id in `display_order` takes the first not yet taken exercise with that id. Exercises
/// that the display order does not mention keep their relative order and are appended. Ids
/// without a matching exercise are ignored, so the result is always a permutation of
/// `workout`.
#[must_use]
pub fn reorder(workout: &[Exercise], display_order: &[ExerciseID]) -> Vec<Exercise> {
    let mut remaining = workout.iter().map(Some).collect::<Vec<_>>();
    let mut reordered = Vec::with_capacity(workout.len());

    for id in display_order {
        if let Some(entry) = remaining
            .iter_mut()
            .find(|entry| entry.is_some_and(|e| e.id == *id))
        {
            reordered.extend(entry.take().cloned());
        }
    }

    reordered.extend(remaining.into_iter().flatten().cloned());
    reordered
}

/// Inputs of a workout regeneration.
pub struct Reconciliation<'a> {
    /// Workout as last stored in the session.
    pub previous: &'a [Exercise],
    /// Exercise ids in the order currently shown to the user.
    pub display_order: &'a [ExerciseID],
    pub locked_ids: &'a LockSet,
    pub count: usize,
    /// Exercises eligible for random selection.
    pub pool: &'a [Exercise],
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    pub workout: Vec<Exercise>,
    /// Locked ids which are part of the new workout.
    pub locked_ids: LockSet,
}

impl Reconciliation<'_> {
    /// Build a new workout of at most `count` exercises.
    ///
    /// Locked exercises keep the slot they occupy in the displayed order. Locked exercises
    /// whose slot no longer exists move to the first free slot. All other slots are filled
    /// with distinct random exercises from the pool. Only if the pool has too few unused
    /// exercises, unlocked exercises are repeated. Slots which cannot be filled at all are
    /// dropped.
    pub fn reconcile(&self, random: &mut dyn RandomSource) -> Reconciled {
        if self.count == 0 {
            return Reconciled {
                workout: vec![],
                locked_ids: LockSet::new(),
            };
        }

        let reordered = reorder(self.previous, self.display_order);

        let mut lookup = self
            .pool
            .iter()
            .map(|e| (e.id, e))
            .collect::<HashMap<ExerciseID, &Exercise>>();
        lookup.extend(reordered.iter().map(|e| (e.id, e)));

        let mut slots: Vec<Option<Exercise>> = vec![None; self.count];
        let mut placed = HashSet::new();

        for (idx, exercise) in reordered.iter().enumerate().take(self.count) {
            if self.locked_ids.contains(&exercise.id) && placed.insert(exercise.id) {
                slots[idx] = lookup.get(&exercise.id).map(|e| (*e).clone());
            }
        }

        for id in self.locked_ids {
            if placed.contains(id) {
                continue;
            }
            let Some(exercise) = lookup.get(id) else {
                debug!("dropping lock of unavailable exercise {id}");
                continue;
            };
            placed.insert(*id);
            match slots.iter_mut().find(|slot| slot.is_none()) {
                Some(slot) => *slot = Some((*exercise).clone()),
                None => slots.push(Some((*exercise).clone())),
            }
        }

        let chosen = slots
            .iter()
            .flatten()
            .map(|e| e.id)
            .collect::<HashSet<_>>();
        let unlocked = self
            .pool
            .iter()
            .filter(|e| !self.locked_ids.contains(&e.id))
            .collect::<Vec<_>>();
        let unused = unlocked
            .iter()
            .copied()
            .filter(|e| !chosen.contains(&e.id))
            .collect::<Vec<_>>();

        let sampler = Sampler::new(unused, unlocked);
        if sampler.fill_unused(&mut slots, random) > 0 {
            sampler.fill_repeating(&mut slots, random);
        }

        let mut workout = slots.into_iter().flatten().collect::<Vec<_>>();
        workout.truncate(self.count);

        let locked_ids = self
            .locked_ids
            .iter()
            .filter(|id| workout.iter().any(|e| e.id == **id))
            .copied()
            .collect();

        Reconciled {
            workout,
            locked_ids,
        }
    }
}
