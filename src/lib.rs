//! # u-reliability
//!
//! Guided Weibull reliability analysis for equipment failure data.
//!
//! Turns pasted event timestamps or manually entered failure and
//! suspension times into a reliability verdict: a fitted two-parameter
//! Weibull distribution by two methods, the failure pattern, a recommended
//! fitting method, and derived engineering quantities (mission time or
//! MTBF with inspection intervals).
//!
//! ## Modules
//!
//! - [`preprocess`] — Timestamp extraction and plausible time-to-failure filtering
//! - [`censoring`] — Suspension synthesis for sparse failure data
//! - [`entry`] — Best-effort parsing of the manual entry table
//! - [`weibull`] — Weibull estimation (MLE, rank regression), fit metrics, reliability functions
//! - [`orchestrator`] — Dual-method fitting into comparable fit records
//! - [`pattern`] — Failure pattern classification from the shape parameter
//! - [`recommend`] — Metric-based method recommendation
//! - [`derivation`] — Mission time, MTBF, inspection intervals, unit conversion
//! - [`session`] — Request-scoped session storage
//! - [`workflow`] — Stage handlers with guarded transitions
//! - [`config`] — Tunable thresholds, loadable from TOML
//!
//! ## Example
//!
//! ```
//! use u_reliability::entry::EntryRow;
//! use u_reliability::session::MemorySession;
//! use u_reliability::workflow::{Stage, Workflow};
//! use u_reliability::AnalysisConfig;
//!
//! let workflow = Workflow::new(AnalysisConfig::default());
//! let mut session = MemorySession::new();
//!
//! workflow.choose_method(&mut session, "failure").unwrap();
//! let rows: Vec<EntryRow> = ["410", "820", "1150", "1490", "1900", "2600"]
//!     .into_iter()
//!     .map(EntryRow::time)
//!     .collect();
//! workflow.submit_data(&mut session, &rows).unwrap();
//!
//! let view = workflow.compare_fits(&mut session).unwrap();
//! let choice = workflow
//!     .choose_fit(&mut session, view.recommendation.recommended_method.key())
//!     .unwrap();
//! if choice.next == Stage::SetTarget {
//!     workflow.set_target(&mut session, "0.9").unwrap();
//! }
//! let report = workflow.results(&mut session).unwrap();
//! assert!(report.beta > 0.0);
//! ```
//!
//! ## Design Philosophy
//!
//! - **Injected state**: handlers borrow a [`session::SessionStore`]; no globals
//! - **Explicit routing**: pattern-driven branching is a guarded state machine
//! - **Research-backed**: estimation follows Abernethy and Lawless

pub mod censoring;
pub mod config;
pub mod derivation;
pub mod entry;
pub mod error;
pub mod orchestrator;
pub mod pattern;
pub mod preprocess;
pub mod recommend;
pub mod session;
pub mod weibull;
pub mod workflow;

pub use config::AnalysisConfig;
pub use error::{AnalysisError, Result};
pub use workflow::{Stage, Workflow};
