//! Analysis configuration.
//!
//! Every field has a default matching the standard workflow, so an empty
//! TOML document yields [`AnalysisConfig::default`].
//!
//! ```toml
//! ttf_min_hours = 168.0
//! ttf_max_hours = 30676.5
//! min_timestamps = 2
//! max_entry_rows = 25
//! censoring_threshold = 3
//! aicc_min_sample = 4
//! default_reliability = 0.8
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

/// One week in hours.
pub const ONE_WEEK_HOURS: f64 = 7.0 * 24.0;

/// 3.5 Julian years in hours.
pub const THREE_AND_A_HALF_YEARS_HOURS: f64 = 3.5 * 365.25 * 24.0;

/// Tunables for the analysis pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Exclusive lower bound of a plausible time-to-failure, in hours.
    pub ttf_min_hours: f64,
    /// Exclusive upper bound of a plausible time-to-failure, in hours.
    pub ttf_max_hours: f64,
    /// Minimum number of timestamps needed to derive any duration.
    pub min_timestamps: usize,
    /// Maximum number of manual entry rows read.
    pub max_entry_rows: usize,
    /// Failure counts below this are augmented with a suspension.
    pub censoring_threshold: usize,
    /// Smallest combined sample size for which AICc is reported.
    pub aicc_min_sample: usize,
    /// Reliability level used when the user leaves the target blank.
    pub default_reliability: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            ttf_min_hours: ONE_WEEK_HOURS,
            ttf_max_hours: THREE_AND_A_HALF_YEARS_HOURS,
            min_timestamps: 2,
            max_entry_rows: 25,
            censoring_threshold: 3,
            aicc_min_sample: 4,
            default_reliability: 0.8,
        }
    }
}

impl AnalysisConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the bounds are consistent.
    pub fn validate(&self) -> Result<()> {
        if !self.ttf_min_hours.is_finite() || self.ttf_min_hours < 0.0 {
            return Err(AnalysisError::Config(format!(
                "ttf_min_hours must be a non-negative number, got {}",
                self.ttf_min_hours
            )));
        }
        if !self.ttf_max_hours.is_finite() || self.ttf_max_hours <= self.ttf_min_hours {
            return Err(AnalysisError::Config(format!(
                "ttf_max_hours ({}) must exceed ttf_min_hours ({})",
                self.ttf_max_hours, self.ttf_min_hours
            )));
        }
        if self.min_timestamps < 2 {
            return Err(AnalysisError::Config(
                "min_timestamps must be at least 2".to_string(),
            ));
        }
        if self.max_entry_rows == 0 {
            return Err(AnalysisError::Config(
                "max_entry_rows must be positive".to_string(),
            ));
        }
        if !(self.default_reliability > 0.0 && self.default_reliability < 1.0) {
            return Err(AnalysisError::Config(format!(
                "default_reliability must be in (0, 1), got {}",
                self.default_reliability
            )));
        }
        Ok(())
    }
}
