//! Credential upgrade rules and career-path evaluation.
//!
//! - `rules`: the deck and engine ladders with per-step requirements
//! - `evaluator`: sea-time and certificate progress along a path

pub mod evaluator;
pub mod rules;

pub use evaluator::{
    evaluate_career_path, CareerPathEvaluation, CareerPathEvaluator, CertificateCheck,
    PathSummary, StepState, UpgradeProgress,
};
pub use rules::{CredentialRules, StepRequirement, Track};
