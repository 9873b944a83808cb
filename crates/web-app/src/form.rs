//! Conversion of submitted planner forms into typed requests.
//!
//! All ids are normalized to [`ExerciseID`] here, so the reconciler never sees raw form values.

use std::collections::BTreeMap;

use circuit_domain::{ExerciseID, LockSet, Name, SessionState, Timing, WorkoutType};
use log::debug;

use crate::Settings;

/// Submitted form fields.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Form(BTreeMap<String, String>);

impl Form {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: &str) {
        self.0.insert(key.to_string(), value.to_string());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Form {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Show the current state without changing the workout.
    #[default]
    View,
    Generate,
    Start,
    Save,
}

impl Action {
    /// Determine the action from the name of the submit button.
    #[must_use]
    pub fn from_form(form: &Form) -> Self {
        if form.contains("generate") {
            Action::Generate
        } else if form.contains("start") {
            Action::Start
        } else if form.contains("save") {
            Action::Save
        } else {
            Action::View
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanRequest {
    pub action: Action,
    /// User to switch to, if one was submitted.
    pub username: Option<Name>,
    pub workout_type: WorkoutType,
    pub num_exercises: usize,
    pub timing: Timing,
    pub display_order: Vec<ExerciseID>,
    /// Submitted locks. Only present when regenerating.
    pub locked_ids: Option<LockSet>,
}

impl PlanRequest {
    pub const MAX_EXERCISES: usize = 100;
    pub const MAX_SETS: i64 = 100;
    /// Longest accepted duration in seconds.
    pub const MAX_DURATION: i64 = 24 * 60 * 60;

    /// Parse a form, falling back to the session and then to the settings for missing fields.
    ///
    /// If any numeric field is invalid or out of range, all numeric fields are reset to the
    /// settings. Invalid ids are dropped.
    #[must_use]
    pub fn parse(form: &Form, session: &SessionState, settings: &Settings) -> Self {
        let action = Action::from_form(form);
        let (num_exercises, timing) =
            parse_numbers(form, session, settings).unwrap_or_else(|field| {
                debug!("resetting numeric fields after invalid {field}");
                (default_num_exercises(settings), settings.timing())
            });

        Self {
            action,
            username: parse_username(form),
            workout_type: form
                .get("workout_type")
                .map_or(session.workout_type, WorkoutType::from_form),
            num_exercises,
            timing,
            display_order: form
                .get("exercise_order")
                .map(ExerciseID::parse_list)
                .unwrap_or_default(),
            locked_ids: (action == Action::Generate).then(|| {
                form.get("locked_ids")
                    .map(ExerciseID::parse_list)
                    .unwrap_or_default()
                    .into_iter()
                    .collect()
            }),
        }
    }
}

/// Parse the count and timing. Returns the name of the first invalid field on failure.
///
/// The count is never taken from the session.
fn parse_numbers(
    form: &Form,
    session: &SessionState,
    settings: &Settings,
) -> Result<(usize, Timing), &'static str> {
    let num_exercises = match form.get("num_exercises") {
        Some(value) => match parse_int(value).ok_or("num_exercises")? {
            n if n < 0 => 0,
            n => usize::try_from(n)
                .ok()
                .filter(|n| *n <= PlanRequest::MAX_EXERCISES)
                .ok_or("num_exercises")?,
        },
        None => default_num_exercises(settings),
    };
    let field = |key: &'static str, fallback: i64, max: i64| match form.get(key) {
        Some(value) => parse_int(value).filter(|n| in_range(*n, max)).ok_or(key),
        None => Ok(fallback),
    };
    let timing = Timing {
        num_sets: field("num_sets", session.timing.num_sets, PlanRequest::MAX_SETS)?,
        exercise_duration: field(
            "ex_duration",
            session.timing.exercise_duration,
            PlanRequest::MAX_DURATION,
        )?,
        rest_duration: field(
            "rest_duration",
            session.timing.rest_duration,
            PlanRequest::MAX_DURATION,
        )?,
        set_rest: match form.get("set_rest") {
            Some(value) => minutes_to_seconds(value)
                .filter(|n| in_range(*n, PlanRequest::MAX_DURATION))
                .ok_or("set_rest")?,
            None => session.timing.set_rest,
        },
    };
    Ok((num_exercises, timing))
}

fn default_num_exercises(settings: &Settings) -> usize {
    settings.num_exercises.min(PlanRequest::MAX_EXERCISES)
}

fn parse_int(value: &str) -> Option<i64> {
    value.trim().parse().ok()
}

/// Only the magnitude is bounded.
fn in_range(value: i64, max: i64) -> bool {
    value.unsigned_abs() <= max.unsigned_abs()
}

/// Convert decimal minutes into whole seconds, truncating towards zero.
#[allow(clippy::cast_possible_truncation)]
fn minutes_to_seconds(value: &str) -> Option<i64> {
    let minutes = value.trim().parse::<f64>().ok()?;
    if !minutes.is_finite() {
        return None;
    }
    Some((minutes * 60.0) as i64)
}

fn parse_username(form: &Form) -> Option<Name> {
    let new_username = form.get("new_username").unwrap_or_default().trim();
    let username = if new_username.is_empty() {
        form.get("username").filter(|u| !u.is_empty())?
    } else {
        new_username
    };
    match Name::new(username) {
        Ok(name) => Some(name),
        Err(err) => {
            debug!("ignoring username {username:?}: {err}");
            None
        }
    }
}
