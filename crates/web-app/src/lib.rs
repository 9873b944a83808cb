#![warn(clippy::pedantic)]

mod form;
pub mod log;
mod planner;
mod service;
mod settings;

pub use form::{Action, Form, PlanRequest};
pub use planner::{
    AnalysisPage, Error, HistoryPage, IndexPage, Planner, Response, SaveStatus, TimerPage,
};
pub use service::Service;
pub use settings::{Settings, SettingsRepository, SettingsService};
