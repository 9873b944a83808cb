use log::{debug, error, warn};

use crate::{
    CreateError, DeleteError, Exercise, ExerciseRepository, ExerciseService, HistoryRepository,
    HistoryService, NewWorkout, ReadError, SessionKey, SessionRepository, SessionService,
    SessionState, UpdateError, WorkoutRecord,
};

pub struct Service<R> {
    repository: R,
}

impl<R> Service<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }
}

macro_rules! log_on_error {
    ($func: expr, $error: ident, $action: literal, $entity: literal) => {{
        let result = $func;
        match result {
            Ok(_) => {}
            Err(ref err) => match err {
                $error::Storage(crate::StorageError::Unavailable(_)) => {
                    warn!("failed to {} {}: {err}", $action, $entity);
                }
                _ => {
                    error!("failed to {} {}: {err}", $action, $entity);
                }
            },
        }
        result
    }};
}

impl<R: ExerciseRepository> ExerciseService for Service<R> {
    fn get_exercises(&self) -> Result<Vec<Exercise>, ReadError> {
        log_on_error!(
            self.repository.read_exercises(),
            ReadError,
            "get",
            "exercises"
        )
    }

    fn create_exercises(&self, exercises: Vec<Exercise>) -> Result<Vec<Exercise>, CreateError> {
        log_on_error!(
            self.repository.create_exercises(exercises),
            CreateError,
            "create",
            "exercises"
        )
    }
}

impl<R: SessionRepository> SessionService for Service<R> {
    fn get_session(&self, key: &SessionKey) -> Result<Option<SessionState>, ReadError> {
        let session = log_on_error!(
            self.repository.read_session(key),
            ReadError,
            "get",
            "session"
        )?;
        Ok(session.filter(|session| {
            if session.version != SessionState::VERSION {
                debug!(
                    "discarding session {key} of version {} (expected {})",
                    session.version,
                    SessionState::VERSION
                );
            }
            session.version == SessionState::VERSION
        }))
    }

    fn set_session(&self, key: &SessionKey, state: &SessionState) -> Result<(), UpdateError> {
        log_on_error!(
            self.repository.write_session(key, state),
            UpdateError,
            "set",
            "session"
        )
    }

    fn delete_session(&self, key: &SessionKey) -> Result<(), DeleteError> {
        log_on_error!(
            self.repository.delete_session(key),
            DeleteError,
            "delete",
            "session"
        )
    }
}

impl<R: HistoryRepository> HistoryService for Service<R> {
    fn get_all_workouts(&self) -> Result<Vec<WorkoutRecord>, ReadError> {
        log_on_error!(
            self.repository.read_workouts(),
            ReadError,
            "get",
            "workouts"
        )
    }

    fn append_workout(&self, workout: NewWorkout) -> Result<WorkoutRecord, CreateError> {
        log_on_error!(
            self.repository.create_workout(workout),
            CreateError,
            "append",
            "workout"
        )
    }
}
