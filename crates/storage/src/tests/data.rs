use chrono::NaiveDate;
use circuit_domain as domain;
use tempfile::TempDir;

use crate::FileStore;

pub fn store() -> (TempDir, FileStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path().join("data"));
    (dir, store)
}

pub static EXERCISES: std::sync::LazyLock<Vec<domain::Exercise>> =
    std::sync::LazyLock::new(|| vec![EXERCISE.clone(), EXERCISE_2.clone()]);

pub static EXERCISE: std::sync::LazyLock<domain::Exercise> =
    std::sync::LazyLock::new(|| domain::Exercise {
        id: 1.into(),
        name: domain::Name::new("Jumping Jacks").unwrap(),
        muscle: "Full Body".to_string(),
        kind: "cardio".to_string(),
        body_part: "full".to_string(),
        equipment: String::new(),
        intensity: 4,
        ab_workout: false,
        active: true,
        description: "Jump while spreading arms and legs.".to_string(),
        link: "https://example.org/jumping-jacks".to_string(),
    });

pub static EXERCISE_2: std::sync::LazyLock<domain::Exercise> =
    std::sync::LazyLock::new(|| domain::Exercise {
        id: 2.into(),
        name: domain::Name::new("Plank").unwrap(),
        muscle: "Core".to_string(),
        kind: "strength".to_string(),
        body_part: "core".to_string(),
        equipment: "Mat".to_string(),
        intensity: 6,
        ab_workout: true,
        active: true,
        description: String::new(),
        link: String::new(),
    });

pub static SESSION: std::sync::LazyLock<domain::SessionState> =
    std::sync::LazyLock::new(|| domain::SessionState {
        version: domain::SessionState::VERSION,
        username: domain::Name::new("Alice").unwrap(),
        workout_type: domain::WorkoutType::Core,
        current_workout: EXERCISES.clone(),
        locked_ids: [EXERCISE_2.id].into_iter().collect(),
        timing: domain::Timing {
            num_sets: 2,
            exercise_duration: 40,
            rest_duration: 20,
            set_rest: 90,
        },
    });

pub static WORKOUT: std::sync::LazyLock<domain::WorkoutRecord> =
    std::sync::LazyLock::new(|| domain::WorkoutRecord {
        id: 1.into(),
        username: domain::Name::new("Alice").unwrap(),
        timestamp: NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(8, 15, 0)
            .unwrap(),
        exercises: vec![EXERCISE_2.id, EXERCISE.id],
        timing: domain::Timing::default(),
        location: "home".to_string(),
        rpe: 7,
        notes: "felt good".to_string(),
    });
