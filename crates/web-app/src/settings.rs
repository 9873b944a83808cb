use circuit_domain::{Name, NameError, SessionState, Timing, WorkoutType};

#[allow(clippy::missing_errors_doc)]
pub trait SettingsService {
    fn get_settings(&self) -> Result<Settings, String>;
    fn set_settings(&self, settings: Settings) -> Result<(), String>;
}

#[allow(clippy::missing_errors_doc)]
pub trait SettingsRepository {
    fn read_settings(&self) -> Result<Settings, String>;
    fn write_settings(&self, settings: Settings) -> Result<(), String>;
}

/// Planner defaults used for new sessions and for resetting invalid form input.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub username: String,
    pub num_exercises: usize,
    pub num_sets: i64,
    pub exercise_duration: i64,
    /// Seconds between exercises.
    pub rest_duration: i64,
    /// Seconds between sets.
    pub set_rest: i64,
    pub workout_type: String,
}

impl Settings {
    pub fn username(&self) -> Result<Name, NameError> {
        Name::new(&self.username)
    }

    #[must_use]
    pub fn timing(&self) -> Timing {
        Timing {
            num_sets: self.num_sets,
            exercise_duration: self.exercise_duration,
            rest_duration: self.rest_duration,
            set_rest: self.set_rest,
        }
    }

    #[must_use]
    pub fn workout_type(&self) -> WorkoutType {
        WorkoutType::from_form(&self.workout_type)
    }

    /// A session without a workout, initialized with these settings.
    pub fn new_session(&self) -> Result<SessionState, NameError> {
        let mut session = SessionState::new(self.username()?);
        session.timing = self.timing();
        session.workout_type = self.workout_type();
        Ok(session)
    }
}

impl Default for Settings {
    fn default() -> Self {
        let timing = Timing::default();
        Self {
            username: "Bruno".to_string(),
            num_exercises: 5,
            num_sets: timing.num_sets,
            exercise_duration: timing.exercise_duration,
            rest_duration: timing.rest_duration,
            set_rest: timing.set_rest,
            workout_type: WorkoutType::Any.to_string(),
        }
    }
}
