use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDateTime;
use derive_more::{Deref, Display, From, Into};

use crate::{CreateError, Exercise, ExerciseID, Name, ReadError, Timing, format_time};

pub trait HistoryRepository {
    fn read_workouts(&self) -> Result<Vec<WorkoutRecord>, ReadError>;
    fn create_workout(&self, workout: NewWorkout) -> Result<WorkoutRecord, CreateError>;
}

pub trait HistoryService {
    fn get_all_workouts(&self) -> Result<Vec<WorkoutRecord>, ReadError>;
    fn append_workout(&self, workout: NewWorkout) -> Result<WorkoutRecord, CreateError>;

    /// Workouts of a user, most recent first.
    fn get_workouts(&self, username: &Name) -> Result<Vec<WorkoutRecord>, ReadError> {
        let mut workouts = self
            .get_all_workouts()?
            .into_iter()
            .filter(|w| w.username == *username)
            .collect::<Vec<_>>();
        workouts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        Ok(workouts)
    }

    /// Names of all users with at least one saved workout, sorted.
    fn get_users(&self) -> Result<Vec<Name>, ReadError> {
        Ok(self
            .get_all_workouts()?
            .into_iter()
            .map(|w| w.username)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect())
    }
}

#[derive(
    Deref, Debug, Default, Display, Clone, Copy, From, Into, Hash, PartialEq, Eq, PartialOrd, Ord,
)]
pub struct WorkoutID(u32);

/// A finished workout as handed to the history.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWorkout {
    pub username: Name,
    pub timestamp: NaiveDateTime,
    /// Exercises in the order they were performed.
    pub exercises: Vec<ExerciseID>,
    pub timing: Timing,
    pub location: String,
    pub rpe: u8,
    pub notes: String,
}

impl NewWorkout {
    pub const DEFAULT_LOCATION: &'static str = "home";
    pub const DEFAULT_RPE: u8 = 5;

    #[must_use]
    pub fn new(
        username: Name,
        timestamp: NaiveDateTime,
        exercises: &[Exercise],
        timing: Timing,
    ) -> Self {
        Self {
            username,
            timestamp,
            exercises: exercises.iter().map(|e| e.id).collect(),
            timing,
            location: Self::DEFAULT_LOCATION.to_string(),
            rpe: Self::DEFAULT_RPE,
            notes: String::new(),
        }
    }

    #[must_use]
    pub fn into_record(self, id: WorkoutID) -> WorkoutRecord {
        WorkoutRecord {
            id,
            username: self.username,
            timestamp: self.timestamp,
            exercises: self.exercises,
            timing: self.timing,
            location: self.location,
            rpe: self.rpe,
            notes: self.notes,
        }
    }
}

/// A stored workout. Records are never modified after they have been written.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutRecord {
    pub id: WorkoutID,
    pub username: Name,
    pub timestamp: NaiveDateTime,
    pub exercises: Vec<ExerciseID>,
    pub timing: Timing,
    pub location: String,
    pub rpe: u8,
    pub notes: String,
}

impl WorkoutRecord {
    #[must_use]
    pub fn total_time(&self) -> i64 {
        self.timing.total(self.num_exercises())
    }

    #[must_use]
    pub fn num_exercises(&self) -> i64 {
        i64::try_from(self.exercises.len()).unwrap_or(i64::MAX)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryExercise {
    pub id: ExerciseID,
    pub name: Name,
    pub muscle: String,
}

/// A workout joined with the catalog for display.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub record: WorkoutRecord,
    pub exercises: Vec<HistoryExercise>,
    pub total_time: String,
}

impl HistoryEntry {
    #[must_use]
    pub fn new(record: WorkoutRecord, catalog: &BTreeMap<ExerciseID, Exercise>) -> Self {
        let exercises = record
            .exercises
            .iter()
            .map(|id| match catalog.get(id) {
                Some(exercise) => HistoryExercise {
                    id: *id,
                    name: exercise.name.clone(),
                    muscle: exercise.muscle().to_string(),
                },
                None => HistoryExercise {
                    id: *id,
                    name: Name::unknown(id),
                    muscle: Exercise::DEFAULT_MUSCLE.to_string(),
                },
            })
            .collect();
        let total_time = format_time(record.total_time());
        Self {
            record,
            exercises,
            total_time,
        }
    }
}
