use thiserror::Error;

use crate::models::CredentialLevel;

/// Errors raised by the evaluation engine.
///
/// Sparse or malformed records never produce one of these; only selections
/// and rule tables that cannot describe a real upgrade path do.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Unknown credential: {0}")]
    UnknownCredential(String),

    #[error("{0} is not on any credential ladder")]
    NotOnLadder(CredentialLevel),

    #[error("{target} cannot be reached from {current}")]
    UnreachableTarget {
        current: CredentialLevel,
        target: CredentialLevel,
    },

    #[error("Invalid credential rules: {0}")]
    InvalidRules(String),
}

impl CoreError {
    /// Message suitable for showing to the mariner.
    pub fn user_message(&self) -> String {
        match self {
            CoreError::UnreachableTarget { current, target } => format!(
                "Your goal is not a valid upgrade path: {} does not follow {} on the same ladder. \
                 Update your career goal and try again.",
                target, current
            ),
            CoreError::UnknownCredential(_) | CoreError::NotOnLadder(_) => {
                "Your career goal uses a credential we do not recognize. \
                 Update your career goal and try again."
                    .to_string()
            }
            CoreError::InvalidRules(_) => {
                "Something went wrong loading credential requirements. Please try again.".to_string()
            }
        }
    }
}
