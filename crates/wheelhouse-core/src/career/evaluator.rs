//! Career-path evaluation: progress toward each credential upgrade between
//! a mariner's current credential and their target.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::rules::{CredentialRules, StepRequirement};
use crate::error::CoreError;
use crate::models::{
    CredentialLevel, Department, RouteCategory, SeaServicePeriod, TrainingCertificate,
};
use crate::utils::normalize_name;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum StepState {
    NotStarted,
    InProgress,
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct CertificateCheck {
    pub name: String,
    pub satisfied: bool,
}

/// Progress toward one credential on the path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct UpgradeProgress {
    pub credential: CredentialLevel,
    pub department: Department,
    pub required_days: u32,
    pub accumulated_days: u32,
    pub qualifying_periods: usize,
    pub min_grt: u32,
    pub routes: Vec<RouteCategory>,
    pub certificates: Vec<CertificateCheck>,
    pub days_remaining: u32,
    /// Share of required sea time met, 0-100.
    pub sea_time_percent: u32,
    pub state: StepState,
    /// Months of sea time, at the user's rate, until this step's days are
    /// met, counting the steps before it. `None` when the rate is zero.
    pub projected_months: Option<u32>,
}

impl UpgradeProgress {
    pub fn is_complete(&self) -> bool {
        self.state == StepState::Complete
    }

    pub fn sea_time_met(&self) -> bool {
        self.accumulated_days >= self.required_days
    }

    pub fn certificates_satisfied(&self) -> usize {
        self.certificates.iter().filter(|c| c.satisfied).count()
    }

    pub fn missing_certificates(&self) -> impl Iterator<Item = &str> {
        self.certificates
            .iter()
            .filter(|c| !c.satisfied)
            .map(|c| c.name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct PathSummary {
    pub steps_total: usize,
    pub steps_complete: usize,
    pub certificates_required: usize,
    pub certificates_satisfied: usize,
    pub days_remaining: u32,
    pub projected_months: Option<u32>,
    pub next_step: Option<CredentialLevel>,
    pub is_complete: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct CareerPathEvaluation {
    pub user_id: String,
    pub current: CredentialLevel,
    pub target: CredentialLevel,
    pub steps: Vec<UpgradeProgress>,
    pub summary: PathSummary,
}

/// Evaluates upgrade paths against a fixed rule table.
#[derive(Debug, Clone, Copy)]
pub struct CareerPathEvaluator<'r> {
    rules: &'r CredentialRules,
}

impl<'r> CareerPathEvaluator<'r> {
    pub fn new(rules: &'r CredentialRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &'r CredentialRules {
        self.rules
    }

    /// Evaluate the path from `current` to `target`.
    ///
    /// Sea-service periods are never partitioned between steps: a period
    /// counts toward every step whose tonnage and route it satisfies.
    /// Malformed periods count for nothing. Only a target that is not
    /// strictly ahead of `current` on the same ladder is an error.
    pub fn evaluate(
        &self,
        user_id: &str,
        current: CredentialLevel,
        target: CredentialLevel,
        periods: &[SeaServicePeriod],
        certificates: &[TrainingCertificate],
        sea_days_per_year: u32,
    ) -> Result<CareerPathEvaluation, CoreError> {
        let (track, requirements) = self.rules.path(current, target)?;

        let held: HashSet<String> = certificates
            .iter()
            .filter_map(TrainingCertificate::normalized_name)
            .collect();

        let mut cumulative_remaining: u64 = 0;
        let mut steps = Vec::with_capacity(requirements.len());

        for requirement in requirements {
            let mut progress = evaluate_step(requirement, track.department, periods, &held);

            cumulative_remaining += u64::from(progress.days_remaining);
            progress.projected_months = project_months(cumulative_remaining, sea_days_per_year);

            debug!(
                user_id,
                credential = %progress.credential,
                accumulated_days = progress.accumulated_days,
                required_days = progress.required_days,
                certificates = progress.certificates_satisfied(),
                state = ?progress.state,
                "Evaluated upgrade step"
            );
            steps.push(progress);
        }

        let summary = summarize(&steps, sea_days_per_year);

        Ok(CareerPathEvaluation {
            user_id: user_id.to_string(),
            current,
            target,
            steps,
            summary,
        })
    }
}

/// Evaluate a career path with the given rules.
pub fn evaluate_career_path(
    rules: &CredentialRules,
    user_id: &str,
    current: CredentialLevel,
    target: CredentialLevel,
    periods: &[SeaServicePeriod],
    certificates: &[TrainingCertificate],
    sea_days_per_year: u32,
) -> Result<CareerPathEvaluation, CoreError> {
    CareerPathEvaluator::new(rules).evaluate(
        user_id,
        current,
        target,
        periods,
        certificates,
        sea_days_per_year,
    )
}

fn evaluate_step(
    requirement: &StepRequirement,
    department: Department,
    periods: &[SeaServicePeriod],
    held: &HashSet<String>,
) -> UpgradeProgress {
    let (accumulated_days, qualifying_periods) = periods
        .iter()
        .map(|p| requirement.qualifying_days(p, department))
        .filter(|days| *days > 0)
        .fold((0u32, 0usize), |(days, count), d| (days.saturating_add(d), count + 1));

    let certificates: Vec<CertificateCheck> = requirement
        .certificates
        .iter()
        .map(|name| CertificateCheck {
            name: name.clone(),
            satisfied: held.contains(&normalize_name(name)),
        })
        .collect();

    let required_days = requirement.required_sea_days;
    let days_remaining = required_days.saturating_sub(accumulated_days);
    let sea_time_percent = if required_days == 0 {
        100
    } else {
        let pct = u64::from(accumulated_days) * 100 / u64::from(required_days);
        pct.min(100) as u32
    };

    let days_met = accumulated_days >= required_days;
    let certs_met = certificates.iter().all(|c| c.satisfied);
    let any_certificate = certificates.iter().any(|c| c.satisfied);

    let state = if days_met && certs_met {
        StepState::Complete
    } else if accumulated_days > 0 || any_certificate {
        StepState::InProgress
    } else {
        StepState::NotStarted
    };

    UpgradeProgress {
        credential: requirement.credential,
        department,
        required_days,
        accumulated_days,
        qualifying_periods,
        min_grt: requirement.min_grt,
        routes: requirement.routes.clone(),
        certificates,
        days_remaining,
        sea_time_percent,
        state,
        projected_months: None,
    }
}

/// Whole months needed to log `days` at `sea_days_per_year`, rounded up.
fn project_months(days: u64, sea_days_per_year: u32) -> Option<u32> {
    if sea_days_per_year == 0 {
        return None;
    }
    let rate = u64::from(sea_days_per_year);
    let months = (days * 12).div_ceil(rate);
    Some(u32::try_from(months).unwrap_or(u32::MAX))
}

fn summarize(steps: &[UpgradeProgress], sea_days_per_year: u32) -> PathSummary {
    let days_remaining: u64 = steps.iter().map(|s| u64::from(s.days_remaining)).sum();

    PathSummary {
        steps_total: steps.len(),
        steps_complete: steps.iter().filter(|s| s.is_complete()).count(),
        certificates_required: steps.iter().map(|s| s.certificates.len()).sum(),
        certificates_satisfied: steps.iter().map(|s| s.certificates_satisfied()).sum(),
        days_remaining: u32::try_from(days_remaining).unwrap_or(u32::MAX),
        projected_months: project_months(days_remaining, sea_days_per_year),
        next_step: steps.iter().find(|s| !s.is_complete()).map(|s| s.credential),
        is_complete: steps.iter().all(|s| s.is_complete()),
    }
}
