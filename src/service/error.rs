//! Error types for the scoring service exchange

use std::time::Duration;

use thiserror::Error;

/// Why a submission did not produce an assessment
///
/// Every variant ends the current submission; none is retried.
#[derive(Debug, Error)]
pub enum AssessmentError {
    /// The exchange could not be completed (connect, DNS, TLS, body read)
    #[error("Scoring service unreachable: {0}")]
    Transport(String),

    #[error("Scoring service did not answer within {}s", .0.as_secs_f64())]
    Timeout(Duration),

    /// The caller abandoned the submission before it completed
    #[error("Assessment request cancelled")]
    Cancelled,

    /// Non-success status; `message` is the best text found in the body
    #[error("{message}")]
    Service { status: u16, message: String },

    /// Success status but a body that breaks the response contract
    #[error("Scoring service contract violation: {0}")]
    ContractViolation(String),
}

impl AssessmentError {
    pub fn is_transport(&self) -> bool {
        matches!(self, AssessmentError::Transport(_) | AssessmentError::Timeout(_))
    }
}

impl From<reqwest::Error> for AssessmentError {
    fn from(err: reqwest::Error) -> Self {
        AssessmentError::Transport(err.to_string())
    }
}
