//! Credential, department and route enumerations.
//!
//! These are the closed vocabularies the rule tables are written in. Backend
//! rows carry them as snake_case strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Shipboard department a credential track belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum Department {
    Deck,
    Engine,
}

impl Department {
    /// Lenient parse used for user-entered and OCR-derived rows.
    /// Labels are matched on their leading word, so "Deck Officer" and
    /// "Engine Dept." parse too.
    pub fn parse_lenient(value: &str) -> Option<Self> {
        let lowered = value.trim().to_lowercase();
        let first = lowered
            .split(|c: char| !c.is_alphanumeric())
            .find(|w| !w.is_empty())?;
        match first {
            "deck" => Some(Department::Deck),
            "engine" | "engineering" | "engineer" => Some(Department::Engine),
            _ => None,
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Department::Deck => write!(f, "Deck"),
            Department::Engine => write!(f, "Engine"),
        }
    }
}

/// A U.S. merchant-mariner officer credential.
///
/// Ordering within a track is not encoded here; it comes from the ladder in
/// [`CredentialRules`](crate::career::CredentialRules).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum CredentialLevel {
    ThirdMate,
    SecondMate,
    ChiefMate,
    Master,
    #[serde(alias = "third_ae")]
    ThirdAssistantEngineer,
    #[serde(alias = "second_ae")]
    SecondAssistantEngineer,
    #[serde(alias = "first_ae")]
    FirstAssistantEngineer,
    ChiefEngineer,
}

impl CredentialLevel {
    pub const ALL: [CredentialLevel; 8] = [
        CredentialLevel::ThirdMate,
        CredentialLevel::SecondMate,
        CredentialLevel::ChiefMate,
        CredentialLevel::Master,
        CredentialLevel::ThirdAssistantEngineer,
        CredentialLevel::SecondAssistantEngineer,
        CredentialLevel::FirstAssistantEngineer,
        CredentialLevel::ChiefEngineer,
    ];

    pub fn department(&self) -> Department {
        match self {
            CredentialLevel::ThirdMate
            | CredentialLevel::SecondMate
            | CredentialLevel::ChiefMate
            | CredentialLevel::Master => Department::Deck,
            CredentialLevel::ThirdAssistantEngineer
            | CredentialLevel::SecondAssistantEngineer
            | CredentialLevel::FirstAssistantEngineer
            | CredentialLevel::ChiefEngineer => Department::Engine,
        }
    }

    /// The snake_case key used by the backend.
    pub fn key(&self) -> &'static str {
        match self {
            CredentialLevel::ThirdMate => "third_mate",
            CredentialLevel::SecondMate => "second_mate",
            CredentialLevel::ChiefMate => "chief_mate",
            CredentialLevel::Master => "master",
            CredentialLevel::ThirdAssistantEngineer => "third_assistant_engineer",
            CredentialLevel::SecondAssistantEngineer => "second_assistant_engineer",
            CredentialLevel::FirstAssistantEngineer => "first_assistant_engineer",
            CredentialLevel::ChiefEngineer => "chief_engineer",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CredentialLevel::ThirdMate => "Third Mate",
            CredentialLevel::SecondMate => "Second Mate",
            CredentialLevel::ChiefMate => "Chief Mate",
            CredentialLevel::Master => "Master",
            CredentialLevel::ThirdAssistantEngineer => "Third Assistant Engineer",
            CredentialLevel::SecondAssistantEngineer => "Second Assistant Engineer",
            CredentialLevel::FirstAssistantEngineer => "First Assistant Engineer",
            CredentialLevel::ChiefEngineer => "Chief Engineer",
        }
    }
}

impl fmt::Display for CredentialLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for CredentialLevel {
    type Err = CoreError;

    /// Accepts backend keys, the short engineer aliases, and display names
    /// in any case, with spaces or hyphens in place of underscores.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c == ' ' || c == '-' { '_' } else { c })
            .collect();

        match normalized.as_str() {
            "third_mate" => Ok(CredentialLevel::ThirdMate),
            "second_mate" => Ok(CredentialLevel::SecondMate),
            "chief_mate" => Ok(CredentialLevel::ChiefMate),
            "master" => Ok(CredentialLevel::Master),
            "third_assistant_engineer" | "third_ae" => Ok(CredentialLevel::ThirdAssistantEngineer),
            "second_assistant_engineer" | "second_ae" => {
                Ok(CredentialLevel::SecondAssistantEngineer)
            }
            "first_assistant_engineer" | "first_ae" => Ok(CredentialLevel::FirstAssistantEngineer),
            "chief_engineer" => Ok(CredentialLevel::ChiefEngineer),
            _ => Err(CoreError::UnknownCredential(s.to_string())),
        }
    }
}

/// Where a vessel operates. Unrecognized backend strings land in `Other`,
/// which no credential treats as eligible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum RouteCategory {
    Oceans,
    #[serde(alias = "near-coastal", alias = "nearcoastal")]
    NearCoastal,
    #[serde(alias = "great-lakes", alias = "greatlakes")]
    GreatLakes,
    Inland,
    #[serde(other)]
    Other,
}

impl RouteCategory {
    /// Parse a non-blank route label in any case, with spaces or hyphens
    /// for underscores. Anything unrecognized is `Other`.
    pub fn parse_lenient(value: &str) -> Self {
        let normalized: String = value
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c == ' ' || c == '-' { '_' } else { c })
            .collect();
        match normalized.as_str() {
            "oceans" | "ocean" => RouteCategory::Oceans,
            "near_coastal" | "nearcoastal" => RouteCategory::NearCoastal,
            "great_lakes" | "greatlakes" => RouteCategory::GreatLakes,
            "inland" => RouteCategory::Inland,
            _ => RouteCategory::Other,
        }
    }
}

impl fmt::Display for RouteCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteCategory::Oceans => write!(f, "Oceans"),
            RouteCategory::NearCoastal => write!(f, "Near Coastal"),
            RouteCategory::GreatLakes => write!(f, "Great Lakes"),
            RouteCategory::Inland => write!(f, "Inland"),
            RouteCategory::Other => write!(f, "Other"),
        }
    }
}
