use std::{collections::BTreeMap, fs, io, path::Path};

use circuit_domain::{CreateError, Exercise, ExerciseID, ExerciseService, Name, ReadError};
use log::{debug, info, warn};
use serde::Deserialize;

#[derive(thiserror::Error, Debug)]
pub enum SeedError {
    #[error("failed to read {0}: {1}")]
    Directory(String, io::Error),
    #[error(transparent)]
    Read(#[from] ReadError),
    #[error(transparent)]
    Create(#[from] CreateError),
}

#[derive(thiserror::Error, Debug)]
enum FileError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("missing id")]
    MissingID,
    #[error("invalid id {0:?}")]
    InvalidID(String),
    #[error(transparent)]
    InvalidName(#[from] circuit_domain::NameError),
}

/// Fill an empty catalog from a directory of exercise files, one JSON object per file.
///
/// Files which cannot be loaded are skipped. Of several files with the same id, the first in
/// file name order wins. Returns the number of added exercises.
pub fn seed_exercises<S: ExerciseService>(service: &S, dir: &Path) -> Result<usize, SeedError> {
    if !service.get_exercises()?.is_empty() {
        debug!("catalog not empty, skipping seed");
        return Ok(0);
    }

    if !dir.exists() {
        warn!("{} not found, skipping seed", dir.display());
        return Ok(0);
    }

    let mut paths = fs::read_dir(dir)
        .and_then(|entries| {
            entries
                .map(|entry| entry.map(|e| e.path()))
                .collect::<Result<Vec<_>, _>>()
        })
        .map_err(|err| SeedError::Directory(dir.display().to_string(), err))?;
    paths.retain(|path| path.extension().is_some_and(|ext| ext == "json"));
    paths.sort();

    let mut exercises = BTreeMap::new();
    for path in paths {
        match load(&path) {
            Ok(exercise) => {
                exercises.entry(exercise.id).or_insert(exercise);
            }
            Err(err) => warn!("failed to load {}: {err}", path.display()),
        }
    }

    let count = exercises.len();
    if count > 0 {
        service.create_exercises(exercises.into_values().collect())?;
    }
    info!("seeded {count} exercises from {}", dir.display());

    Ok(count)
}

fn load(path: &Path) -> Result<Exercise, FileError> {
    serde_json::from_slice::<ExerciseFile>(&fs::read(path)?)?.into_exercise()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawID {
    Number(i64),
    Text(String),
}

#[derive(Deserialize)]
#[serde(default)]
struct ExerciseFile {
    id: Option<RawID>,
    name: String,
    muscle: String,
    body_part: String,
    #[serde(rename = "type")]
    kind: String,
    equipment: String,
    link: String,
    active: bool,
    intensity: u8,
    ab_workout: bool,
    description: String,
}

impl Default for ExerciseFile {
    fn default() -> Self {
        Self {
            id: None,
            name: "Unknown".to_string(),
            muscle: Exercise::DEFAULT_MUSCLE.to_string(),
            body_part: "full".to_string(),
            kind: Exercise::DEFAULT_KIND.to_string(),
            equipment: String::new(),
            link: String::new(),
            active: true,
            intensity: Exercise::DEFAULT_INTENSITY,
            ab_workout: false,
            description: String::new(),
        }
    }
}

impl ExerciseFile {
    fn into_exercise(self) -> Result<Exercise, FileError> {
        let id = match self.id.ok_or(FileError::MissingID)? {
            RawID::Number(n) => u32::try_from(n)
                .map(ExerciseID::from)
                .map_err(|_| FileError::InvalidID(n.to_string()))?,
            RawID::Text(s) => s.parse().map_err(|_| FileError::InvalidID(s))?,
        };
        Ok(Exercise {
            id,
            name: Name::new(&self.name)?,
            muscle: self.muscle,
            kind: self.kind,
            body_part: self.body_part,
            equipment: self.equipment,
            intensity: self.intensity,
            ab_workout: self.ab_workout,
            active: self.active,
            description: self.description,
            link: self.link,
        })
    }
}
