//! Per-user goal and settings rows, plus the bundle of records the
//! evaluator consumes.

use serde::{Deserialize, Serialize};

use super::credential::CredentialLevel;
use super::de;
use super::sea_service::{SeaServicePeriod, TrainingCertificate};
use crate::error::CoreError;

/// Sea days per year assumed when the user has not set one.
pub const DEFAULT_SEA_DAYS_PER_YEAR: u32 = 200;

/// Credential assumed when no goal row exists.
pub const DEFAULT_CURRENT_CREDENTIAL: CredentialLevel = CredentialLevel::ThirdMate;

/// Target assumed when no goal row exists.
pub const DEFAULT_TARGET_CREDENTIAL: CredentialLevel = CredentialLevel::Master;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct CareerGoal {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub current_credential: Option<String>,
    #[serde(default)]
    pub target_credential: Option<String>,
}

impl CareerGoal {
    /// Resolve the goal into credentials, defaulting blank columns.
    /// A column holding an unrecognized value is an error.
    pub fn resolve(&self) -> Result<(CredentialLevel, CredentialLevel), CoreError> {
        let current = resolve_column(self.current_credential.as_deref(), DEFAULT_CURRENT_CREDENTIAL)?;
        let target = resolve_column(self.target_credential.as_deref(), DEFAULT_TARGET_CREDENTIAL)?;
        Ok((current, target))
    }
}

fn resolve_column(value: Option<&str>, default: CredentialLevel) -> Result<CredentialLevel, CoreError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => v.parse(),
        None => Ok(default),
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct UserSettings {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "de::lenient_u32")]
    pub sea_days_per_year: Option<u32>,
}

impl UserSettings {
    pub fn sea_days_per_year(&self) -> u32 {
        self.sea_days_per_year
            .filter(|d| *d > 0)
            .unwrap_or(DEFAULT_SEA_DAYS_PER_YEAR)
    }
}

/// Everything fetched for one user before evaluation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserRecords {
    pub user_id: String,
    pub goal: Option<CareerGoal>,
    pub sea_service: Vec<SeaServicePeriod>,
    pub certificates: Vec<TrainingCertificate>,
    pub settings: Option<UserSettings>,
}

impl UserRecords {
    /// Current and target credentials, with the defaults applied when no
    /// goal row exists.
    pub fn credentials(&self) -> Result<(CredentialLevel, CredentialLevel), CoreError> {
        match self.goal {
            Some(ref goal) => goal.resolve(),
            None => Ok((DEFAULT_CURRENT_CREDENTIAL, DEFAULT_TARGET_CREDENTIAL)),
        }
    }

    pub fn sea_days_per_year(&self) -> u32 {
        self.settings
            .as_ref()
            .map(|s| s.sea_days_per_year())
            .unwrap_or(DEFAULT_SEA_DAYS_PER_YEAR)
    }
}
