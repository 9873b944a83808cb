#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod error;
mod exercise;
mod history;
mod name;
mod sampling;
mod service;
mod session;
mod statistics;
mod timing;
mod workout;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use error::{CreateError, DeleteError, ReadError, StorageError, UpdateError};
pub use exercise::{
    Exercise, ExerciseID, ExerciseIDError, ExerciseRepository, ExerciseService, WorkoutType,
    group_by_muscle,
};
pub use history::{
    HistoryEntry, HistoryExercise, HistoryRepository, HistoryService, NewWorkout, WorkoutID,
    WorkoutRecord,
};
pub use name::{Name, NameError};
pub use sampling::{Random, RandomSource, Sampler};
pub use service::Service;
pub use session::{SessionKey, SessionRepository, SessionService, SessionState};
pub use statistics::{Bucket, Totals, TrendPoint, aggregate, trend};
pub use timing::{Timing, format_time, total_time};
pub use workout::{LockSet, Reconciled, Reconciliation, reorder};
