//! Failure pattern classification from the Weibull shape parameter.
//!
//! | beta          | Pattern                          |
//! |---------------|----------------------------------|
//! | > 1.1         | Age-related failure (wear-out)   |
//! | [0.9, 1.1]    | Random failure                   |
//! | < 0.9         | Infant mortality (RCA Required)  |
//!
//! The closed band around 1.0 is treated as indistinguishable from
//! exponential behaviour.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Shape above which failures are wear-out driven.
pub const AGE_RELATED_MIN_BETA: f64 = 1.1;

/// Shape below which failures are early-life driven.
pub const INFANT_MORTALITY_MAX_BETA: f64 = 0.9;

/// Qualitative failure pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailurePattern {
    #[serde(rename = "Age-related failure")]
    AgeRelated,
    #[serde(rename = "Random failure")]
    Random,
    #[serde(rename = "Infant mortality (RCA Required)")]
    InfantMortality,
}

impl FailurePattern {
    /// Classifies a shape parameter. Total over finite values; `NaN`
    /// falls into the random band.
    pub fn from_beta(beta: f64) -> Self {
        if beta > AGE_RELATED_MIN_BETA {
            Self::AgeRelated
        } else if beta < INFANT_MORTALITY_MAX_BETA {
            Self::InfantMortality
        } else {
            Self::Random
        }
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::AgeRelated => "Age-related failure",
            Self::Random => "Random failure",
            Self::InfantMortality => "Infant mortality (RCA Required)",
        }
    }

    /// Whether the target-reliability stage applies.
    pub fn needs_reliability_target(self) -> bool {
        self == Self::AgeRelated
    }
}

impl fmt::Display for FailurePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classifies an optional shape; a failed fit has no pattern.
pub fn classify(beta: Option<f64>) -> Option<FailurePattern> {
    beta.map(FailurePattern::from_beta)
}
