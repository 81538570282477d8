//! Manual and combined data entry.
//!
//! Rows arrive as raw strings. Parsing is best-effort: blank, non-numeric,
//! non-finite or incomplete rows are skipped without an error, and only the
//! resulting counts are validated.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

/// How the user supplies data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMethod {
    /// Failure times only.
    #[default]
    Failure,
    /// Failures (`F`) mixed with right-censored suspensions (`S`).
    Censored,
}

impl InputMethod {
    /// Parses a form value; anything other than `censored` means failure-only.
    pub fn parse_or_default(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("censored") {
            Self::Censored
        } else {
            Self::Failure
        }
    }

    /// Minimum number of failure times this mode accepts.
    pub fn min_failures(self) -> usize {
        match self {
            Self::Failure => 2,
            Self::Censored => 1,
        }
    }
}

impl fmt::Display for InputMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failure => f.write_str("failure"),
            Self::Censored => f.write_str("censored"),
        }
    }
}

/// Whether an observation ended in failure or was suspended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryState {
    #[serde(rename = "F")]
    Failed,
    #[serde(rename = "S")]
    Suspended,
}

impl EntryState {
    /// Parses `F` or `S`, case-insensitively.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "F" => Some(Self::Failed),
            "S" => Some(Self::Suspended),
            _ => None,
        }
    }
}

/// A typed observation, as pre-filled into the entry table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataEntry {
    pub state: EntryState,
    /// Hours.
    pub time: f64,
}

impl DataEntry {
    pub fn failed(time: f64) -> Self {
        Self {
            state: EntryState::Failed,
            time,
        }
    }

    pub fn suspended(time: f64) -> Self {
        Self {
            state: EntryState::Suspended,
            time,
        }
    }
}

/// One raw table row as submitted by the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRow {
    /// `F` / `S`; ignored in failure-only mode.
    pub state: String,
    /// Time in hours.
    pub time: String,
}

impl EntryRow {
    pub fn new(state: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            time: time.into(),
        }
    }

    /// A failure-only row.
    pub fn time(time: impl Into<String>) -> Self {
        Self::new("", time)
    }
}

/// Failure and suspension times parsed from the entry table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObservedData {
    pub failures: Vec<f64>,
    pub censored: Vec<f64>,
}

impl ObservedData {
    /// Total number of observations.
    pub fn len(&self) -> usize {
        self.failures.len() + self.censored.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty() && self.censored.is_empty()
    }
}

fn parse_time(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<f64>().ok().filter(|t| t.is_finite())
}

/// Parses at most `max_rows` rows in `method` mode.
///
/// In failure-only mode every parseable time is a failure. In mixed mode a
/// row needs both a valid state and a valid time.
pub fn parse_rows(rows: &[EntryRow], method: InputMethod, max_rows: usize) -> ObservedData {
    let mut data = ObservedData::default();
    for row in rows.iter().take(max_rows) {
        let Some(time) = parse_time(&row.time) else {
            continue;
        };
        match method {
            InputMethod::Failure => data.failures.push(time),
            InputMethod::Censored => match EntryState::parse(&row.state) {
                Some(EntryState::Failed) => data.failures.push(time),
                Some(EntryState::Suspended) => data.censored.push(time),
                None => {}
            },
        }
    }
    data
}

/// Checks that `data` holds enough failures for `method`.
pub fn validate(data: &ObservedData, method: InputMethod) -> Result<()> {
    if data.failures.len() < method.min_failures() {
        return Err(AnalysisError::InsufficientData(
            "Please enter sufficient valid failure times.".to_string(),
        ));
    }
    Ok(())
}

/// Parses then validates the entry table.
pub fn collect_entries(
    rows: &[EntryRow],
    method: InputMethod,
    max_rows: usize,
) -> Result<ObservedData> {
    let data = parse_rows(rows, method, max_rows);
    validate(&data, method)?;
    Ok(data)
}
