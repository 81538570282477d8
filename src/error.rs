//! Error types for the analysis pipeline.

use thiserror::Error;

/// Errors raised by the analysis pipeline and the workflow stages.
///
/// Every error is scoped to one session stage. Use
/// [`AnalysisError::is_recoverable`] to decide whether the current stage
/// should simply be shown again with the message.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error(
        "No valid failure durations found. All calculated TTFs were either \
         less than 1 week or more than 3.5 years."
    )]
    NoPlausibleFailures,

    #[error("{method} fit failed: {reason}")]
    FitFailed { method: String, reason: String },

    #[error("Could not fit model: {0}")]
    UnfitForDerivation(String),

    #[error("Invalid reliability level: {0}")]
    InvalidReliability(String),

    #[error("Cannot move from stage {from} to stage {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Session error: {0}")]
    Session(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl AnalysisError {
    /// Whether the error should re-prompt the current stage rather than end it.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InsufficientData(_) | Self::NoPlausibleFailures | Self::InvalidReliability(_)
        )
    }
}

impl From<serde_json::Error> for AnalysisError {
    fn from(e: serde_json::Error) -> Self {
        Self::Session(e.to_string())
    }
}

impl From<toml::de::Error> for AnalysisError {
    fn from(e: toml::de::Error) -> Self {
        Self::Config(e.to_string())
    }
}

/// Result type for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;
