use derive_more::{AsRef, Display, From};

use crate::{
    DeleteError, Exercise, ExerciseID, LockSet, Name, ReadError, Reconciled, Timing, UpdateError,
    WorkoutType, reorder,
};

pub trait SessionRepository {
    fn read_session(&self, key: &SessionKey) -> Result<Option<SessionState>, ReadError>;
    fn write_session(&self, key: &SessionKey, state: &SessionState) -> Result<(), UpdateError>;
    fn delete_session(&self, key: &SessionKey) -> Result<(), DeleteError>;
}

pub trait SessionService {
    /// Return the stored session. Sessions stored with another layout version read as absent.
    fn get_session(&self, key: &SessionKey) -> Result<Option<SessionState>, ReadError>;
    fn set_session(&self, key: &SessionKey, state: &SessionState) -> Result<(), UpdateError>;
    fn delete_session(&self, key: &SessionKey) -> Result<(), DeleteError>;
}

/// Identifies the browser session of a single user.
#[derive(AsRef, Debug, Display, From, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionKey(String);

impl From<&str> for SessionKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Per-session planner state kept between requests.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub version: u32,
    pub username: Name,
    pub workout_type: WorkoutType,
    pub current_workout: Vec<Exercise>,
    pub locked_ids: LockSet,
    pub timing: Timing,
}

impl SessionState {
    /// Layout version of the stored state. Stored sessions of other versions are discarded.
    pub const VERSION: u32 = 1;

    #[must_use]
    pub fn new(username: Name) -> Self {
        Self {
            version: Self::VERSION,
            username,
            workout_type: WorkoutType::default(),
            current_workout: vec![],
            locked_ids: LockSet::new(),
            timing: Timing::default(),
        }
    }

    #[must_use]
    pub fn has_workout(&self) -> bool {
        !self.current_workout.is_empty()
    }

    /// Store the result of a regeneration.
    pub fn apply(&mut self, reconciled: Reconciled, timing: Timing) {
        self.current_workout = reconciled.workout;
        self.locked_ids = reconciled.locked_ids;
        self.timing = timing;
    }

    /// Adopt the order shown to the user without regenerating.
    pub fn follow_display_order(&mut self, display_order: &[ExerciseID]) {
        if !display_order.is_empty() {
            self.current_workout = reorder(&self.current_workout, display_order);
        }
    }

    /// Take the finished workout out of the session.
    pub fn take_workout(&mut self) -> Vec<Exercise> {
        std::mem::take(&mut self.current_workout)
    }
}
