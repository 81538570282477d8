//! Censoring rule for preprocessed failure data.
//!
//! Few derived failures give an unreliable fit unless the period since the
//! last event is acknowledged as survival information. Below the threshold
//! (default 3) every failure is kept and one suspension is added that runs
//! from the last observed event to now.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::AnalysisConfig;
use crate::entry::{DataEntry, EntryState, InputMethod};
use crate::preprocess::hours_between;

/// Message surfaced when data is reclassified as censored.
pub fn censored_warning(threshold: usize) -> String {
    format!(
        "Warning: Fewer than {threshold} failures found. Data is being treated as censored, \
         and a new suspension time from the last event until today has been added."
    )
}

/// Source of the current wall-clock time.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Local wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Pre-filled entry table produced by the censoring rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CensoringOutcome {
    /// Entry mode the table must be shown in.
    pub input_method: InputMethod,
    /// Rows in order: failures, then the synthesized suspension if any.
    pub entries: Vec<DataEntry>,
    /// Set when the data was reclassified as censored.
    pub warning: Option<String>,
}

impl CensoringOutcome {
    /// The synthesized suspension, if one was added.
    pub fn suspension(&self) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.state == EntryState::Suspended)
            .map(|e| e.time)
    }
}

/// Applies the censoring rule to preprocessed failures.
///
/// - fewer than `config.censoring_threshold` failures: all become `F`
///   rows, a suspension of `now - last instant` hours, rounded half to
///   even, is appended
///   when `instants` is non-empty, and the mode becomes
///   [`InputMethod::Censored`] with a warning
/// - otherwise: all become `F` rows and the mode becomes
///   [`InputMethod::Failure`]
///
/// `instants` must be sorted ascending; the last one is the most recent
/// event.
pub fn apply_censoring_rule(
    failures: &[f64],
    instants: Option<&[NaiveDateTime]>,
    now: NaiveDateTime,
    config: &AnalysisConfig,
) -> CensoringOutcome {
    let mut entries: Vec<DataEntry> = failures.iter().map(|&t| DataEntry::failed(t)).collect();

    if failures.len() >= config.censoring_threshold {
        info!(failures = failures.len(), "treating preprocessed data as failures only");
        return CensoringOutcome {
            input_method: InputMethod::Failure,
            entries,
            warning: None,
        };
    }

    let last = instants.and_then(|ts| ts.last().copied());
    if let Some(last) = last {
        let hours = hours_between(last, now).round_ties_even();
        entries.push(DataEntry::suspended(hours));
    }

    warn!(
        failures = failures.len(),
        threshold = config.censoring_threshold,
        suspension_added = last.is_some(),
        "too few failures, reclassifying data as censored"
    );

    CensoringOutcome {
        input_method: InputMethod::Censored,
        entries,
        warning: Some(censored_warning(config.censoring_threshold)),
    }
}
