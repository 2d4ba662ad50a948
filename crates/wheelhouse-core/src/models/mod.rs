//! Data models for mariner records and the ship catalog.
//!
//! This module contains the records the evaluator and matcher consume:
//!
//! - `CredentialLevel`, `Department`, `RouteCategory`: closed vocabularies
//! - `SeaServicePeriod`, `TrainingCertificate`: a mariner's history
//! - `CareerGoal`, `UserSettings`, `UserRecords`: per-user rows
//! - `Ship`: vessel catalog entries

pub mod credential;
mod de;
pub mod profile;
pub mod sea_service;
pub mod ship;

pub use credential::{CredentialLevel, Department, RouteCategory};
pub use profile::{
    CareerGoal, UserRecords, UserSettings, DEFAULT_CURRENT_CREDENTIAL, DEFAULT_SEA_DAYS_PER_YEAR,
    DEFAULT_TARGET_CREDENTIAL,
};
pub use sea_service::{SeaServicePeriod, TrainingCertificate};
pub use ship::Ship;
