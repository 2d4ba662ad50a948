//! Wheelhouse core library.
//!
//! Credential upgrade rules for U.S. merchant mariners, the career-path
//! evaluator that measures a mariner's sea service and training against
//! them, and the matcher that ranks catalog vessels for building qualifying
//! sea time. Both engines are pure functions over already-fetched records;
//! the backend client, snapshot store and configuration around them are
//! plumbing for the front ends.

pub mod api;
pub mod auth;
pub mod career;
pub mod config;
pub mod error;
pub mod models;
pub mod ships;
pub mod snapshot;
pub mod utils;

pub use career::{
    evaluate_career_path, CareerPathEvaluation, CareerPathEvaluator, CredentialRules, PathSummary,
    StepState, UpgradeProgress,
};
pub use error::CoreError;
pub use models::{
    CareerGoal, CredentialLevel, Department, RouteCategory, SeaServicePeriod, Ship,
    TrainingCertificate, UserRecords, UserSettings,
};
pub use ships::{
    find_qualifying_ships, group_ships_by_class, ship_help_text, ShipMatcher, DEFAULT_SHIP_LIMIT,
};
