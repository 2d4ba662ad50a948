//! Credential ladders and per-step upgrade requirements.
//!
//! The rules are plain data: [`CredentialRules::standard`] builds the
//! built-in table, and [`CredentialRules::load`] reads a replacement from a
//! JSON file once at start-up. Either way the evaluator only ever sees a
//! validated, read-only value.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::models::{CredentialLevel, Department, RouteCategory, SeaServicePeriod};

/// Sea days USCG counts as one year of service.
const SERVICE_YEAR_DAYS: u32 = 360;

/// Smallest vessel on which service counts at all.
const MIN_QUALIFYING_GRT: u32 = 100;

/// Vessels at or above this size build unlimited-tonnage time.
const UNLIMITED_TONNAGE_GRT: u32 = 1600;

/// Requirement for earning one credential on a ladder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct StepRequirement {
    pub credential: CredentialLevel,
    pub required_sea_days: u32,
    pub min_grt: u32,
    pub routes: Vec<RouteCategory>,
    #[serde(default)]
    pub certificates: Vec<String>,
}

impl StepRequirement {
    pub fn route_eligible(&self, route: Option<RouteCategory>) -> bool {
        route.map(|r| self.routes.contains(&r)).unwrap_or(false)
    }

    /// Days `period` contributes toward this step. A period must meet the
    /// tonnage floor, run on an eligible route and (when recorded) be served
    /// in the track's department; otherwise it contributes nothing.
    pub fn qualifying_days(&self, period: &SeaServicePeriod, department: Department) -> u32 {
        let tonnage_ok = period.grt.map(|g| g >= self.min_grt).unwrap_or(false);
        if tonnage_ok && self.route_eligible(period.route_category) && period.served_in(department) {
            period.credited_days()
        } else {
            0
        }
    }
}

/// One department's ladder: the entry credential followed by each upgrade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Track {
    pub department: Department,
    pub entry: CredentialLevel,
    pub steps: Vec<StepRequirement>,
}

impl Track {
    /// Credentials in ladder order, entry first.
    pub fn ladder(&self) -> impl Iterator<Item = CredentialLevel> + '_ {
        std::iter::once(self.entry).chain(self.steps.iter().map(|s| s.credential))
    }

    pub fn position(&self, credential: CredentialLevel) -> Option<usize> {
        self.ladder().position(|c| c == credential)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct CredentialRules {
    pub tracks: Vec<Track>,
}

impl Default for CredentialRules {
    fn default() -> Self {
        Self::standard()
    }
}

impl CredentialRules {
    /// The built-in deck and engine ladders.
    pub fn standard() -> Self {
        let broad = vec![
            RouteCategory::Oceans,
            RouteCategory::NearCoastal,
            RouteCategory::GreatLakes,
        ];
        let seagoing = vec![RouteCategory::Oceans, RouteCategory::NearCoastal];

        let step = |credential, min_grt, routes: &Vec<RouteCategory>, certificates: &[&str]| {
            StepRequirement {
                credential,
                required_sea_days: SERVICE_YEAR_DAYS,
                min_grt,
                routes: routes.clone(),
                certificates: certificates.iter().map(|c| c.to_string()).collect(),
            }
        };

        Self {
            tracks: vec![
                Track {
                    department: Department::Deck,
                    entry: CredentialLevel::ThirdMate,
                    steps: vec![
                        step(
                            CredentialLevel::SecondMate,
                            MIN_QUALIFYING_GRT,
                            &broad,
                            &["Radar Observer (Unlimited)"],
                        ),
                        step(
                            CredentialLevel::ChiefMate,
                            UNLIMITED_TONNAGE_GRT,
                            &seagoing,
                            &[
                                "Advanced Meteorology",
                                "Advanced Shiphandling",
                                "Advanced Stability",
                                "Leadership and Managerial Skills",
                                "Medical Care Provider",
                            ],
                        ),
                        step(
                            CredentialLevel::Master,
                            UNLIMITED_TONNAGE_GRT,
                            &seagoing,
                            &["Search and Rescue"],
                        ),
                    ],
                },
                Track {
                    department: Department::Engine,
                    entry: CredentialLevel::ThirdAssistantEngineer,
                    steps: vec![
                        step(
                            CredentialLevel::SecondAssistantEngineer,
                            MIN_QUALIFYING_GRT,
                            &broad,
                            &["Advanced Firefighting"],
                        ),
                        step(
                            CredentialLevel::FirstAssistantEngineer,
                            UNLIMITED_TONNAGE_GRT,
                            &seagoing,
                            &[
                                "Engine Room Resource Management",
                                "Leadership and Managerial Skills",
                                "Management of Electrical and Electronic Control Equipment",
                            ],
                        ),
                        step(
                            CredentialLevel::ChiefEngineer,
                            UNLIMITED_TONNAGE_GRT,
                            &seagoing,
                            &["Medical First Aid Provider"],
                        ),
                    ],
                },
            ],
        }
    }

    /// Parse and validate rules from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, CoreError> {
        let rules: CredentialRules =
            serde_json::from_str(json).map_err(|e| CoreError::InvalidRules(e.to_string()))?;
        rules.validate()?;
        Ok(rules)
    }

    /// Load rules from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read rules file: {}", path.display()))?;
        let rules = Self::from_json_str(&contents)
            .with_context(|| format!("Failed to load rules file: {}", path.display()))?;
        Ok(rules)
    }

    /// Check that the table describes usable ladders: every track has
    /// steps, credentials sit on their own department's track exactly once,
    /// and thresholds only tighten going up (so a period that counts for a
    /// higher step also counts for every lower one).
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.tracks.is_empty() {
            return Err(CoreError::InvalidRules("no tracks defined".to_string()));
        }

        let mut seen = HashSet::new();
        for track in &self.tracks {
            if track.steps.is_empty() {
                return Err(CoreError::InvalidRules(format!(
                    "{} track has no upgrade steps",
                    track.department
                )));
            }

            for credential in track.ladder() {
                if credential.department() != track.department {
                    return Err(CoreError::InvalidRules(format!(
                        "{} is not a {} credential",
                        credential, track.department
                    )));
                }
                if !seen.insert(credential) {
                    return Err(CoreError::InvalidRules(format!(
                        "{} appears more than once",
                        credential
                    )));
                }
            }

            for step in &track.steps {
                if step.routes.is_empty() {
                    return Err(CoreError::InvalidRules(format!(
                        "{} has no eligible routes",
                        step.credential
                    )));
                }
            }

            for pair in track.steps.windows(2) {
                let (lower, higher) = (&pair[0], &pair[1]);
                if higher.min_grt < lower.min_grt {
                    return Err(CoreError::InvalidRules(format!(
                        "{} has a lower tonnage floor than {}",
                        higher.credential, lower.credential
                    )));
                }
                if let Some(route) = higher.routes.iter().find(|r| !lower.routes.contains(r)) {
                    return Err(CoreError::InvalidRules(format!(
                        "{} accepts {} time but {} does not",
                        higher.credential, route, lower.credential
                    )));
                }
            }
        }

        Ok(())
    }

    pub fn track_for(&self, credential: CredentialLevel) -> Option<&Track> {
        self.tracks.iter().find(|t| t.position(credential).is_some())
    }

    pub fn requirement(&self, credential: CredentialLevel) -> Option<&StepRequirement> {
        self.tracks
            .iter()
            .flat_map(|t| t.steps.iter())
            .find(|s| s.credential == credential)
    }

    /// Steps strictly after `current` up to and including `target`.
    ///
    /// `target` on another track, equal to `current`, or below it is
    /// [`CoreError::UnreachableTarget`].
    pub fn path(
        &self,
        current: CredentialLevel,
        target: CredentialLevel,
    ) -> Result<(&Track, &[StepRequirement]), CoreError> {
        let track = self
            .track_for(current)
            .ok_or(CoreError::NotOnLadder(current))?;
        let from = track.position(current).ok_or(CoreError::NotOnLadder(current))?;

        match track.position(target) {
            // Ladder position i (i >= 1) is steps[i - 1]
            Some(to) if to > from => Ok((track, &track.steps[from..to])),
            _ => Err(CoreError::UnreachableTarget { current, target }),
        }
    }

    /// Number of upgrades between two credentials, if `target` is reachable.
    pub fn ladder_distance(&self, current: CredentialLevel, target: CredentialLevel) -> Option<usize> {
        self.path(current, target).ok().map(|(_, steps)| steps.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_rules_validate() {
        assert!(CredentialRules::standard().validate().is_ok());
    }

    #[test]
    fn test_standard_ladders() {
        let rules = CredentialRules::standard();
        let deck: Vec<_> = rules.track_for(CredentialLevel::ThirdMate).unwrap().ladder().collect();
        assert_eq!(
            deck,
            vec![
                CredentialLevel::ThirdMate,
                CredentialLevel::SecondMate,
                CredentialLevel::ChiefMate,
                CredentialLevel::Master,
            ]
        );
        let engine = rules.track_for(CredentialLevel::ChiefEngineer).unwrap();
        assert_eq!(engine.department, Department::Engine);
        assert_eq!(engine.position(CredentialLevel::SecondAssistantEngineer), Some(1));
    }

    #[test]
    fn test_path_forward() {
        let rules = CredentialRules::standard();
        let (track, steps) = rules
            .path(CredentialLevel::ThirdMate, CredentialLevel::ChiefMate)
            .unwrap();
        assert_eq!(track.department, Department::Deck);
        let creds: Vec<_> = steps.iter().map(|s| s.credential).collect();
        assert_eq!(creds, vec![CredentialLevel::SecondMate, CredentialLevel::ChiefMate]);
        assert_eq!(
            rules.ladder_distance(CredentialLevel::ThirdMate, CredentialLevel::Master),
            Some(3)
        );
    }

    #[test]
    fn test_path_rejects_backwards_same_and_cross_track() {
        let rules = CredentialRules::standard();
        let unreachable = |c, t| {
            matches!(
                rules.path(c, t),
                Err(CoreError::UnreachableTarget { current, target }) if current == c && target == t
            )
        };
        assert!(unreachable(CredentialLevel::Master, CredentialLevel::SecondMate));
        assert!(unreachable(CredentialLevel::ChiefMate, CredentialLevel::ChiefMate));
        assert!(unreachable(CredentialLevel::ThirdMate, CredentialLevel::ChiefEngineer));
    }

    #[test]
    fn test_path_credential_missing_from_custom_rules() {
        let mut rules = CredentialRules::standard();
        rules.tracks.retain(|t| t.department == Department::Deck);
        assert_eq!(
            rules.path(CredentialLevel::ThirdAssistantEngineer, CredentialLevel::ChiefEngineer),
            Err(CoreError::NotOnLadder(CredentialLevel::ThirdAssistantEngineer))
        );
    }

    #[test]
    fn test_validate_rejects_loosening_thresholds() {
        let mut rules = CredentialRules::standard();
        rules.tracks[0].steps[2].min_grt = 50;
        assert!(matches!(rules.validate(), Err(CoreError::InvalidRules(_))));

        let mut rules = CredentialRules::standard();
        rules.tracks[0].steps[2].routes.push(RouteCategory::Inland);
        assert!(matches!(rules.validate(), Err(CoreError::InvalidRules(_))));
    }

    #[test]
    fn test_validate_rejects_wrong_department_and_duplicates() {
        let mut rules = CredentialRules::standard();
        rules.tracks[0].steps[0].credential = CredentialLevel::ChiefEngineer;
        assert!(rules.validate().is_err());

        let mut rules = CredentialRules::standard();
        rules.tracks[0].steps[1].credential = CredentialLevel::SecondMate;
        assert!(rules.validate().is_err());
    }

    #[test]
    fn test_rules_json_round_trip() {
        let rules = CredentialRules::standard();
        let json = serde_json::to_string(&rules).unwrap();
        assert_eq!(CredentialRules::from_json_str(&json).unwrap(), rules);
    }

    #[test]
    fn test_rules_from_bad_json() {
        assert!(matches!(
            CredentialRules::from_json_str("{\"tracks\": []}"),
            Err(CoreError::InvalidRules(_))
        ));
        assert!(matches!(
            CredentialRules::from_json_str("not json"),
            Err(CoreError::InvalidRules(_))
        ));
    }

    #[test]
    fn test_qualifying_days_checks_tonnage_route_and_department() {
        let rules = CredentialRules::standard();
        let chief_mate = rules.requirement(CredentialLevel::ChiefMate).unwrap();
        let mut period = SeaServicePeriod {
            sign_on_date: Some("2024-01-01".to_string()),
            sign_off_date: Some("2024-01-10".to_string()),
            grt: Some(1600),
            route_category: Some(RouteCategory::Oceans),
            department: Some("deck".to_string()),
            ..Default::default()
        };
        assert_eq!(chief_mate.qualifying_days(&period, Department::Deck), 10);
        assert_eq!(chief_mate.qualifying_days(&period, Department::Engine), 0);

        period.grt = Some(1599);
        assert_eq!(chief_mate.qualifying_days(&period, Department::Deck), 0);

        period.grt = Some(5000);
        period.route_category = Some(RouteCategory::GreatLakes);
        assert_eq!(chief_mate.qualifying_days(&period, Department::Deck), 0);

        period.route_category = None;
        assert_eq!(chief_mate.qualifying_days(&period, Department::Deck), 0);
    }
}
