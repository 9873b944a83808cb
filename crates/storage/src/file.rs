use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use chrono::NaiveDateTime;
use circuit_domain::{self as domain, CreateError, DeleteError, ReadError, StorageError, UpdateError};
use log::debug;
use serde::{Serialize, de::DeserializeOwned};
use strum::AsRefStr;

/// JSON files in a data directory, one per kind of object.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

#[derive(AsRefStr, Debug, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "snake_case")]
pub enum File {
    Exercises,
    Workouts,
    Sessions,
    Settings,
    Log,
}

impl File {
    pub fn iter() -> std::slice::Iter<'static, File> {
        static FILES: [File; 5] = [
            File::Exercises,
            File::Workouts,
            File::Sessions,
            File::Settings,
            File::Log,
        ];
        FILES.iter()
    }

    #[must_use]
    pub fn file_name(self) -> String {
        format!("{}.json", self.as_ref())
    }
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn path(&self, file: File) -> PathBuf {
        self.dir.join(file.file_name())
    }

    /// Read the content of a file. A missing file reads as the default value.
    ///
    /// Must not log, as the logger writes through this store.
    pub(crate) fn read<V: DeserializeOwned + Default>(&self, file: File) -> Result<V, StorageError> {
        let path = self.path(file);
        match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|err| invalid(&path, err)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(V::default()),
            Err(err) => Err(unavailable(&path, &err)),
        }
    }

    /// Replace the content of a file.
    ///
    /// Must not log, as the logger writes through this store.
    pub(crate) fn write<V: Serialize>(&self, file: File, value: &V) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir).map_err(|err| unavailable(&self.dir, &err))?;
        let path = self.path(file);
        let tmp_path = path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(value).map_err(|err| invalid(&path, err))?;
        fs::write(&tmp_path, bytes).map_err(|err| unavailable(&tmp_path, &err))?;
        fs::rename(&tmp_path, &path).map_err(|err| unavailable(&path, &err))
    }
}

pub(crate) fn unavailable(path: &Path, err: &io::Error) -> StorageError {
    StorageError::Unavailable(format!("{}: {err}", path.display()))
}

fn invalid(path: &Path, err: serde_json::Error) -> StorageError {
    StorageError::Other(format!("{}: {err}", path.display()).into())
}

impl domain::ExerciseRepository for FileStore {
    fn read_exercises(&self) -> Result<Vec<domain::Exercise>, ReadError> {
        self.read::<Vec<Exercise>>(File::Exercises)?
            .into_iter()
            .map(|e| domain::Exercise::try_from(e).map_err(|err| ReadError::Other(err.into())))
            .collect()
    }

    fn create_exercises(
        &self,
        exercises: Vec<domain::Exercise>,
    ) -> Result<Vec<domain::Exercise>, CreateError> {
        let mut records = self.read::<Vec<Exercise>>(File::Exercises)?;
        if exercises
            .iter()
            .any(|e| records.iter().any(|r| r.id == *e.id))
        {
            return Err(CreateError::Conflict);
        }
        records.extend(exercises.iter().map(Exercise::from));
        self.write(File::Exercises, &records)?;
        Ok(exercises)
    }
}

/// Entries are converted one at a time. An entry which does not convert reads as absent.
type Sessions = BTreeMap<String, serde_json::Value>;

impl domain::SessionRepository for FileStore {
    fn read_session(
        &self,
        key: &domain::SessionKey,
    ) -> Result<Option<domain::SessionState>, ReadError> {
        let mut sessions = self.read::<Sessions>(File::Sessions)?;
        let Some(value) = sessions.remove(&key.to_string()) else {
            return Ok(None);
        };
        match serde_json::from_value::<Session>(value)
            .map_err(|err| err.to_string())
            .and_then(|session| {
                domain::SessionState::try_from(session).map_err(|err| err.to_string())
            }) {
            Ok(session) => Ok(Some(session)),
            Err(err) => {
                debug!("discarding session {key}: {err}");
                Ok(None)
            }
        }
    }

    fn write_session(
        &self,
        key: &domain::SessionKey,
        state: &domain::SessionState,
    ) -> Result<(), UpdateError> {
        let mut sessions = self.read::<Sessions>(File::Sessions)?;
        let value = serde_json::to_value(Session::from(state))
            .map_err(|err| UpdateError::Other(err.into()))?;
        sessions.insert(key.to_string(), value);
        Ok(self.write(File::Sessions, &sessions)?)
    }

    fn delete_session(&self, key: &domain::SessionKey) -> Result<(), DeleteError> {
        let mut sessions = self.read::<Sessions>(File::Sessions)?;
        if sessions.remove(&key.to_string()).is_some() {
            self.write(File::Sessions, &sessions)?;
        }
        Ok(())
    }
}

impl domain::HistoryRepository for FileStore {
    fn read_workouts(&self) -> Result<Vec<domain::WorkoutRecord>, ReadError> {
        self.read::<Vec<Workout>>(File::Workouts)?
            .into_iter()
            .map(|w| domain::WorkoutRecord::try_from(w).map_err(|err| ReadError::Other(err.into())))
            .collect()
    }

    fn create_workout(
        &self,
        workout: domain::NewWorkout,
    ) -> Result<domain::WorkoutRecord, CreateError> {
        let mut records = self.read::<Vec<Workout>>(File::Workouts)?;
        let id = records.iter().map(|w| w.id).max().unwrap_or(0) + 1;
        let record = workout.into_record(id.into());
        records.push(Workout::from(&record));
        self.write(File::Workouts, &records)?;
        Ok(record)
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RecordError {
    #[error(transparent)]
    InvalidName(#[from] domain::NameError),
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Exercise {
    pub id: u32,
    pub name: String,
    pub muscle: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub body_part: String,
    pub equipment: String,
    pub intensity: u8,
    pub ab_workout: bool,
    pub active: bool,
    pub description: String,
    pub link: String,
}

impl From<&domain::Exercise> for Exercise {
    fn from(value: &domain::Exercise) -> Self {
        Self {
            id: *value.id,
            name: value.name.to_string(),
            muscle: value.muscle.clone(),
            kind: value.kind.clone(),
            body_part: value.body_part.clone(),
            equipment: value.equipment.clone(),
            intensity: value.intensity,
            ab_workout: value.ab_workout,
            active: value.active,
            description: value.description.clone(),
            link: value.link.clone(),
        }
    }
}

impl TryFrom<Exercise> for domain::Exercise {
    type Error = RecordError;

    fn try_from(value: Exercise) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            name: domain::Name::new(&value.name)?,
            muscle: value.muscle,
            kind: value.kind,
            body_part: value.body_part,
            equipment: value.equipment,
            intensity: value.intensity,
            ab_workout: value.ab_workout,
            active: value.active,
            description: value.description,
            link: value.link,
        })
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub version: u32,
    pub username: String,
    pub workout_type: String,
    pub current_workout: Vec<Exercise>,
    pub locked_ids: Vec<u32>,
    pub num_sets: i64,
    pub ex_duration: i64,
    pub rest_duration: i64,
    pub set_rest: i64,
}

impl From<&domain::SessionState> for Session {
    fn from(value: &domain::SessionState) -> Self {
        Self {
            version: value.version,
            username: value.username.to_string(),
            workout_type: value.workout_type.to_string(),
            current_workout: value.current_workout.iter().map(Exercise::from).collect(),
            locked_ids: value.locked_ids.iter().map(|id| **id).collect(),
            num_sets: value.timing.num_sets,
            ex_duration: value.timing.exercise_duration,
            rest_duration: value.timing.rest_duration,
            set_rest: value.timing.set_rest,
        }
    }
}

impl TryFrom<Session> for domain::SessionState {
    type Error = RecordError;

    fn try_from(value: Session) -> Result<Self, Self::Error> {
        Ok(Self {
            version: value.version,
            username: domain::Name::new(&value.username)?,
            workout_type: domain::WorkoutType::from_form(&value.workout_type),
            current_workout: value
                .current_workout
                .into_iter()
                .map(domain::Exercise::try_from)
                .collect::<Result<Vec<_>, _>>()?,
            locked_ids: value
                .locked_ids
                .into_iter()
                .map(domain::ExerciseID::from)
                .collect(),
            timing: domain::Timing {
                num_sets: value.num_sets,
                exercise_duration: value.ex_duration,
                rest_duration: value.rest_duration,
                set_rest: value.set_rest,
            },
        })
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Workout {
    pub id: u32,
    pub username: String,
    pub timestamp: NaiveDateTime,
    pub exercises: Vec<u32>,
    pub num_sets: i64,
    pub exercise_duration: i64,
    pub rest_duration: i64,
    pub set_rest: i64,
    pub location: String,
    pub rpe: u8,
    pub notes: String,
}

impl From<&domain::WorkoutRecord> for Workout {
    fn from(value: &domain::WorkoutRecord) -> Self {
        Self {
            id: *value.id,
            username: value.username.to_string(),
            timestamp: value.timestamp,
            exercises: value.exercises.iter().map(|id| **id).collect(),
            num_sets: value.timing.num_sets,
            exercise_duration: value.timing.exercise_duration,
            rest_duration: value.timing.rest_duration,
            set_rest: value.timing.set_rest,
            location: value.location.clone(),
            rpe: value.rpe,
            notes: value.notes.clone(),
        }
    }
}

impl TryFrom<Workout> for domain::WorkoutRecord {
    type Error = RecordError;

    fn try_from(value: Workout) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            username: domain::Name::new(&value.username)?,
            timestamp: value.timestamp,
            exercises: value
                .exercises
                .into_iter()
                .map(domain::ExerciseID::from)
                .collect(),
            timing: domain::Timing {
                num_sets: value.num_sets,
                exercise_duration: value.exercise_duration,
                rest_duration: value.rest_duration,
                set_rest: value.set_rest,
            },
            location: value.location,
            rpe: value.rpe,
            notes: value.notes,
        })
    }
}
