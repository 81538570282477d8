//! Timestamp preprocessing.
//!
//! Turns pasted event timestamps into plausible time-to-failure durations.
//!
//! # Algorithm
//!
//! 1. Extract every `YYYY-MM-DD HH:MM:SS` substring; anything that does
//!    not parse as a calendar date-time is ignored
//! 2. Sort the instants ascending
//! 3. Take consecutive differences in hours
//! 4. Keep differences strictly inside the plausibility band
//!    (default 1 week to 3.5 years) and round to whole hours, ties to even
//!
//! # Examples
//!
//! ```
//! use u_reliability::config::AnalysisConfig;
//! use u_reliability::preprocess::preprocess_timestamps;
//!
//! let raw = "pump trip 2023-01-01 00:00:00\n\
//!            pump trip 2023-02-01 00:00:00\n\
//!            pump trip 2023-02-01 06:00:00";
//! let events = preprocess_timestamps(raw, &AnalysisConfig::default()).unwrap();
//! assert_eq!(events.failures, vec![744.0]); // the 6 h gap is discarded
//! assert_eq!(events.instants.len(), 3);
//! ```

use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};

/// Layout of an accepted timestamp.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

static TIMESTAMP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}").expect("Invalid timestamp regex")
});

/// Durations derived from a block of event timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreprocessedEvents {
    /// Plausible times to failure, in whole hours, in event order.
    pub failures: Vec<f64>,
    /// Every parsed instant, ascending.
    pub instants: Vec<NaiveDateTime>,
    /// Number of consecutive differences outside the plausibility band.
    pub discarded: usize,
}

/// Extracts and parses every timestamp in `raw`, in order of appearance.
pub fn extract_timestamps(raw: &str) -> Vec<NaiveDateTime> {
    TIMESTAMP_RE
        .find_iter(raw)
        .filter_map(|m| NaiveDateTime::parse_from_str(m.as_str(), TIMESTAMP_FORMAT).ok())
        .collect()
}

/// Hours elapsed from `earlier` to `later`.
pub fn hours_between(earlier: NaiveDateTime, later: NaiveDateTime) -> f64 {
    (later - earlier).num_seconds() as f64 / 3600.0
}

/// Derives time-to-failure durations from raw pasted text.
///
/// # Errors
///
/// - [`AnalysisError::InsufficientData`] if fewer than
///   `config.min_timestamps` timestamps are found
/// - [`AnalysisError::NoPlausibleFailures`] if no difference falls inside
///   `(config.ttf_min_hours, config.ttf_max_hours)`
pub fn preprocess_timestamps(raw: &str, config: &AnalysisConfig) -> Result<PreprocessedEvents> {
    let mut instants = extract_timestamps(raw);
    if instants.len() < config.min_timestamps {
        return Err(AnalysisError::InsufficientData(format!(
            "Please paste at least {} valid timestamps to calculate a failure time.",
            config.min_timestamps
        )));
    }

    instants.sort();

    let deltas: Vec<f64> = instants
        .windows(2)
        .map(|w| hours_between(w[0], w[1]))
        .collect();

    let failures: Vec<f64> = deltas
        .iter()
        .copied()
        .filter(|&h| h > config.ttf_min_hours && h < config.ttf_max_hours)
        .map(f64::round_ties_even)
        .collect();
    let discarded = deltas.len() - failures.len();

    debug!(
        timestamps = instants.len(),
        kept = failures.len(),
        discarded,
        "preprocessed event timestamps"
    );

    if failures.is_empty() {
        return Err(AnalysisError::NoPlausibleFailures);
    }

    Ok(PreprocessedEvents {
        failures,
        instants,
        discarded,
    })
}
