#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod backup;
mod file;
mod seed;
mod ui;

pub use file::{File, FileStore, RecordError};
pub use seed::{SeedError, seed_exercises};
