use std::{collections::BTreeMap, slice::Iter, str::FromStr};

use derive_more::{Deref, Display, From, Into};
use log::debug;

use crate::{CreateError, Name, ReadError};

pub trait ExerciseRepository {
    fn read_exercises(&self) -> Result<Vec<Exercise>, ReadError>;
    fn create_exercises(&self, exercises: Vec<Exercise>) -> Result<Vec<Exercise>, CreateError>;
}

pub trait ExerciseService {
    fn get_exercises(&self) -> Result<Vec<Exercise>, ReadError>;
    fn create_exercises(&self, exercises: Vec<Exercise>) -> Result<Vec<Exercise>, CreateError>;

    /// Active exercises passing the workout type filter, in catalog order.
    fn get_active_exercises(&self, workout_type: WorkoutType) -> Result<Vec<Exercise>, ReadError> {
        Ok(self
            .get_exercises()?
            .into_iter()
            .filter(|e| workout_type.matches(e))
            .collect())
    }

    /// All exercises by id, including inactive ones still referenced by past workouts.
    fn get_exercise_map(&self) -> Result<BTreeMap<ExerciseID, Exercise>, ReadError> {
        Ok(self
            .get_exercises()?
            .into_iter()
            .map(|e| (e.id, e))
            .collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exercise {
    pub id: ExerciseID,
    pub name: Name,
    pub muscle: String,
    pub kind: String,
    pub body_part: String,
    pub equipment: String,
    pub intensity: u8,
    pub ab_workout: bool,
    pub active: bool,
    pub description: String,
    pub link: String,
}

impl Exercise {
    pub const DEFAULT_MUSCLE: &'static str = "Other";
    pub const DEFAULT_KIND: &'static str = "strength";
    pub const DEFAULT_INTENSITY: u8 = 5;

    /// An active strength exercise with all optional attributes at their defaults.
    #[must_use]
    pub fn new(id: ExerciseID, name: Name) -> Self {
        Self {
            id,
            name,
            muscle: Self::DEFAULT_MUSCLE.to_string(),
            kind: Self::DEFAULT_KIND.to_string(),
            body_part: "full".to_string(),
            equipment: String::new(),
            intensity: Self::DEFAULT_INTENSITY,
            ab_workout: false,
            active: true,
            description: String::new(),
            link: String::new(),
        }
    }

    #[must_use]
    pub fn muscle(&self) -> &str {
        let muscle = self.muscle.trim();
        if muscle.is_empty() {
            Self::DEFAULT_MUSCLE
        } else {
            muscle
        }
    }

    #[must_use]
    pub fn is_cardio(&self) -> bool {
        self.kind.trim().eq_ignore_ascii_case("cardio")
    }
}

#[derive(
    Deref, Debug, Default, Display, Clone, Copy, From, Into, Hash, PartialEq, Eq, PartialOrd, Ord,
)]
pub struct ExerciseID(u32);

impl ExerciseID {
    /// Parse a comma separated list of ids as submitted by a form.
    ///
    /// Tokens which are not non-negative integers are dropped.
    #[must_use]
    pub fn parse_list(value: &str) -> Vec<ExerciseID> {
        value
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .filter_map(|token| match token.parse::<ExerciseID>() {
                Ok(id) => Some(id),
                Err(err) => {
                    debug!("discarding exercise id {token:?}: {err}");
                    None
                }
            })
            .collect()
    }
}

impl FromStr for ExerciseID {
    type Err = ExerciseIDError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .map(ExerciseID)
            .map_err(|_| ExerciseIDError::Invalid(s.to_string()))
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ExerciseIDError {
    #[error("Invalid exercise ID {0:?}")]
    Invalid(String),
}

#[derive(
    strum::AsRefStr,
    strum::Display,
    strum::EnumString,
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    Hash,
    PartialEq,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum WorkoutType {
    #[default]
    Any,
    Core,
    Cardio,
}

impl WorkoutType {
    pub fn iter() -> Iter<'static, WorkoutType> {
        static WORKOUT_TYPES: [WorkoutType; 3] =
            [WorkoutType::Any, WorkoutType::Core, WorkoutType::Cardio];
        WORKOUT_TYPES.iter()
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            WorkoutType::Any => "Any",
            WorkoutType::Core => "Core",
            WorkoutType::Cardio => "Cardio",
        }
    }

    #[must_use]
    pub fn matches(self, exercise: &Exercise) -> bool {
        exercise.active
            && match self {
                WorkoutType::Any => true,
                WorkoutType::Core => exercise.ab_workout,
                WorkoutType::Cardio => exercise.is_cardio(),
            }
    }
}

impl WorkoutType {
    /// Parse a submitted workout type. Unknown values select all exercises.
    #[must_use]
    pub fn from_form(value: &str) -> Self {
        value.trim().parse().unwrap_or_default()
    }
}

/// Group exercises by muscle for the catalog listing.
#[must_use]
pub fn group_by_muscle(exercises: &[Exercise]) -> BTreeMap<String, Vec<&Exercise>> {
    let mut grouped: BTreeMap<String, Vec<&Exercise>> = BTreeMap::new();
    for exercise in exercises {
        grouped
            .entry(exercise.muscle().to_string())
            .or_default()
            .push(exercise);
    }
    grouped
}
