use std::collections::BTreeMap;

use chrono::{Local, NaiveDateTime, Timelike};
use circuit_domain::{
    Bucket, CreateError, DeleteError, Exercise, ExerciseID, ExerciseService, HistoryEntry,
    HistoryService, LockSet, Name, NameError, NewWorkout, RandomSource, ReadError,
    Reconciliation, SessionKey, SessionService, SessionState, Timing, Totals, TrendPoint,
    UpdateError, WorkoutType, aggregate, format_time, group_by_muscle, trend,
};
use log::info;

use crate::{Action, Form, PlanRequest, Settings, SettingsService};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Read(#[from] ReadError),
    #[error(transparent)]
    Create(#[from] CreateError),
    #[error(transparent)]
    Update(#[from] UpdateError),
    #[error(transparent)]
    Delete(#[from] DeleteError),
    #[error("invalid settings: {0}")]
    Settings(String),
}

impl From<NameError> for Error {
    fn from(value: NameError) -> Self {
        Error::Settings(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Index(IndexPage),
    /// The workout is ready to be performed.
    Timer,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexPage {
    pub username: Name,
    pub users: Vec<Name>,
    pub workout_type: WorkoutType,
    pub workout: Vec<Exercise>,
    pub locked_ids: LockSet,
    pub num_exercises: usize,
    pub timing: Timing,
    pub total_time: String,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimerPage {
    pub username: Name,
    pub workout: Vec<Exercise>,
    pub timing: Timing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum SaveStatus {
    #[strum(to_string = "no workout")]
    NoWorkout,
    #[strum(to_string = "saved")]
    Saved,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryPage {
    pub username: Name,
    pub entries: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisPage {
    pub username: Name,
    pub trend: Vec<TrendPoint>,
    pub totals: BTreeMap<Bucket, BTreeMap<String, Totals>>,
}

/// Loads the session state around each request and hands it to the reconciler.
pub struct Planner<D, U> {
    domain: D,
    ui: U,
}

impl<D, U> Planner<D, U>
where
    D: ExerciseService + SessionService + HistoryService,
    U: SettingsService,
{
    pub fn new(domain: D, ui: U) -> Self {
        Self { domain, ui }
    }

    /// Handle a submission of the workout form.
    pub fn index(
        &self,
        key: &SessionKey,
        form: &Form,
        random: &mut dyn RandomSource,
    ) -> Result<Response, Error> {
        let settings = self.settings()?;
        let mut session = self.session(key, &settings)?;
        let request = PlanRequest::parse(form, &session, &settings);

        if let Some(username) = request.username.clone() {
            session.username = username;
        }
        session.workout_type = request.workout_type;

        let mut message = None;

        match request.action {
            Action::Generate => {
                let pool = self.domain.get_active_exercises(request.workout_type)?;
                let locked_ids = request.locked_ids.clone().unwrap_or_default();
                let reconciled = Reconciliation {
                    previous: &session.current_workout,
                    display_order: &request.display_order,
                    locked_ids: &locked_ids,
                    count: request.num_exercises,
                    pool: &pool,
                }
                .reconcile(random);
                session.apply(reconciled, request.timing);
            }
            Action::Start if session.has_workout() => {
                session.follow_display_order(&request.display_order);
                self.domain.set_session(key, &session)?;
                return Ok(Response::Timer);
            }
            Action::Save if session.has_workout() => {
                session.follow_display_order(&request.display_order);
                let workout = session.take_workout();
                let record = self.domain.append_workout(NewWorkout::new(
                    session.username.clone(),
                    now(),
                    &workout,
                    request.timing,
                ))?;
                info!("saved workout {} of {}", record.id, record.username);
                message = Some("Workout Saved!".to_string());
            }
            Action::View | Action::Start | Action::Save => {}
        }

        self.domain.set_session(key, &session)?;

        let total_time =
            format_time(request.timing.total(num_exercises(&session.current_workout)));

        Ok(Response::Index(IndexPage {
            users: self.domain.get_users()?,
            username: session.username,
            workout_type: session.workout_type,
            workout: session.current_workout,
            locked_ids: session.locked_ids,
            num_exercises: request.num_exercises,
            timing: request.timing,
            total_time,
            message,
        }))
    }

    /// The workout to perform, or `None` if no workout has been generated.
    pub fn timer(&self, key: &SessionKey) -> Result<Option<TimerPage>, Error> {
        let settings = self.settings()?;
        let session = self.session(key, &settings)?;
        Ok(session.has_workout().then(|| TimerPage {
            username: session.username,
            workout: session.current_workout,
            timing: session.timing,
        }))
    }

    /// Save the workout of the session after it has been performed.
    pub fn save_current_workout(&self, key: &SessionKey) -> Result<SaveStatus, Error> {
        let settings = self.settings()?;
        let mut session = self.session(key, &settings)?;

        if !session.has_workout() {
            return Ok(SaveStatus::NoWorkout);
        }

        let workout = session.take_workout();
        let record = self.domain.append_workout(NewWorkout::new(
            session.username.clone(),
            now(),
            &workout,
            session.timing,
        ))?;
        info!("saved workout {} of {}", record.id, record.username);
        self.domain.set_session(key, &session)?;

        Ok(SaveStatus::Saved)
    }

    pub fn history(&self, key: &SessionKey) -> Result<HistoryPage, Error> {
        let settings = self.settings()?;
        let session = self.session(key, &settings)?;
        let catalog = self.catalog()?;
        let entries = self
            .domain
            .get_workouts(&session.username)?
            .into_iter()
            .map(|record| HistoryEntry::new(record, &catalog))
            .collect();

        Ok(HistoryPage {
            username: session.username,
            entries,
        })
    }

    pub fn analysis(&self, key: &SessionKey) -> Result<AnalysisPage, Error> {
        let settings = self.settings()?;
        let session = self.session(key, &settings)?;
        let catalog = self.catalog()?;
        let records = self.domain.get_workouts(&session.username)?;

        Ok(AnalysisPage {
            trend: trend(&records),
            totals: Bucket::iter()
                .map(|bucket| (*bucket, aggregate(&records, &catalog, *bucket)))
                .collect(),
            username: session.username,
        })
    }

    /// Active exercises grouped by muscle.
    pub fn exercises(&self) -> Result<BTreeMap<String, Vec<Exercise>>, Error> {
        let exercises = self.domain.get_active_exercises(WorkoutType::Any)?;
        Ok(group_by_muscle(&exercises)
            .into_iter()
            .map(|(muscle, exercises)| (muscle, exercises.into_iter().cloned().collect()))
            .collect())
    }

    pub fn users(&self) -> Result<Vec<Name>, Error> {
        Ok(self.domain.get_users()?)
    }

    fn settings(&self) -> Result<Settings, Error> {
        self.ui.get_settings().map_err(Error::Settings)
    }

    fn session(&self, key: &SessionKey, settings: &Settings) -> Result<SessionState, Error> {
        match self.domain.get_session(key)? {
            Some(session) => Ok(session),
            None => Ok(settings.new_session()?),
        }
    }

    fn catalog(&self) -> Result<BTreeMap<ExerciseID, Exercise>, Error> {
        Ok(self.domain.get_exercise_map()?)
    }
}

fn num_exercises(workout: &[Exercise]) -> i64 {
    i64::try_from(workout.len()).unwrap_or(i64::MAX)
}

fn now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}
