//! Session workflow.
//!
//! Sequences the analysis stages over an injected [`SessionStore`]:
//!
//! ```text
//! choose-input-method -> [preprocess-timestamps] -> enter-data
//!     -> review-fit-comparison -> [set-target-reliability] -> view-results
//! ```
//!
//! The current stage and the stages already reached live in the session
//! itself, so a [`Workflow`] holds no per-user state and can serve any
//! number of sessions. Each handler checks the transition into its stage
//! before touching the session; a rejected move is
//! [`AnalysisError::InvalidTransition`].
//!
//! # Transitions
//!
//! - `ChooseMethod` is always enterable and restarts the session
//! - any stage already reached is enterable (back navigation)
//! - otherwise the target must be a successor of the current stage
//! - `SetTarget` requires the chosen fit to be age-related;
//!   `CompareFits -> ViewResults` requires that it is not

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::censoring::{apply_censoring_rule, Clock, SystemClock};
use crate::config::AnalysisConfig;
use crate::derivation::{derive, DerivedReport};
use crate::entry::{collect_entries, DataEntry, EntryRow, InputMethod};
use crate::error::{AnalysisError, Result};
use crate::orchestrator::{fit_both, FitComparison, FitRecord};
use crate::pattern::FailurePattern;
use crate::preprocess::{preprocess_timestamps, PreprocessedEvents};
use crate::recommend::{recommend, Recommendation};
use crate::session::{keys, SessionStore};
use crate::weibull::{DistributionFitter, FitMethod, WeibullFitter};

/// A workflow stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    ChooseMethod,
    Preprocess,
    EnterData,
    CompareFits,
    SetTarget,
    ViewResults,
}

impl Stage {
    /// Abstract route name exposed to the surrounding application.
    pub fn route(self) -> &'static str {
        match self {
            Self::ChooseMethod => "choose-input-method",
            Self::Preprocess => "preprocess-timestamps",
            Self::EnterData => "enter-data",
            Self::CompareFits => "review-fit-comparison",
            Self::SetTarget => "set-target-reliability",
            Self::ViewResults => "view-results",
        }
    }

    /// Stages reachable in one forward step.
    pub fn successors(self) -> &'static [Stage] {
        match self {
            Self::ChooseMethod => &[Self::Preprocess, Self::EnterData],
            Self::Preprocess => &[Self::EnterData],
            Self::EnterData => &[Self::CompareFits],
            Self::CompareFits => &[Self::SetTarget, Self::ViewResults],
            Self::SetTarget => &[Self::ViewResults],
            Self::ViewResults => &[],
        }
    }

    /// Whether `target` may be entered from `self`.
    ///
    /// `chosen` is the pattern of the chosen fit, `None` if no fit was
    /// chosen or it failed.
    pub fn can_enter(self, target: Stage, reached: &[Stage], chosen: Option<FailurePattern>) -> bool {
        let age_related = chosen.is_some_and(FailurePattern::needs_reliability_target);
        match target {
            Self::ChooseMethod => true,
            Self::SetTarget if !age_related => false,
            Self::ViewResults if self == Self::CompareFits => !age_related,
            _ if reached.contains(&target) => true,
            _ => self.successors().contains(&target),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.route())
    }
}

/// The data entry table as it should be shown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryView {
    pub input_method: InputMethod,
    /// Pre-filled rows; empty without a preceding preprocessing run.
    pub entries: Vec<DataEntry>,
    pub warning: Option<String>,
    pub max_rows: usize,
}

/// Both fits with the method recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonView {
    pub mle: FitRecord,
    pub rr: FitRecord,
    pub recommendation: Recommendation,
}

/// Outcome of choosing a fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitChoice {
    pub method: FitMethod,
    pub pattern: Option<FailurePattern>,
    /// Stage the user is routed to.
    pub next: Stage,
}

/// Stage handlers over a request-scoped session.
#[derive(Debug, Clone)]
pub struct Workflow<F = WeibullFitter, C = SystemClock> {
    config: AnalysisConfig,
    fitter: F,
    clock: C,
}

impl Workflow {
    /// Workflow with the built-in fitter and the local clock.
    pub fn new(config: AnalysisConfig) -> Self {
        Self::with_parts(config, WeibullFitter, SystemClock)
    }
}

impl Default for Workflow {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

impl<F: DistributionFitter, C: Clock> Workflow<F, C> {
    pub fn with_parts(config: AnalysisConfig, fitter: F, clock: C) -> Self {
        Self {
            config,
            fitter,
            clock,
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Current stage; a fresh session is at [`Stage::ChooseMethod`].
    pub fn stage<S: SessionStore>(&self, session: &S) -> Result<Stage> {
        Ok(session.get_as(keys::STAGE)?.unwrap_or(Stage::ChooseMethod))
    }

    /// Starts over: clears the session and records the input method.
    ///
    /// Anything other than `censored` selects failure-only entry.
    pub fn choose_method<S: SessionStore>(&self, session: &mut S, raw: &str) -> Result<InputMethod> {
        session.clear();
        self.enter(session, Stage::ChooseMethod)?;
        let method = InputMethod::parse_or_default(raw);
        session.set_as(keys::INPUT_METHOD, &method)?;
        info!(input_method = %method, "workflow started");
        Ok(method)
    }

    /// Derives failure times from pasted timestamps and stashes them for
    /// the entry stage.
    pub fn preprocess<S: SessionStore>(
        &self,
        session: &mut S,
        raw_text: &str,
    ) -> Result<PreprocessedEvents> {
        self.enter(session, Stage::Preprocess)?;
        let events = preprocess_timestamps(raw_text, &self.config)?;
        session.set_as(keys::PRE_FILLED_FAILURES, &events.failures)?;
        session.set_as(keys::ORIGINAL_DATETIMES, &events.instants)?;
        Ok(events)
    }

    /// Builds the entry table, consuming any preprocessed failures.
    ///
    /// The transient keys are taken, so the censoring rule fires at most
    /// once per preprocessing run.
    pub fn enter_data<S: SessionStore>(&self, session: &mut S) -> Result<EntryView> {
        self.enter(session, Stage::EnterData)?;

        let pre_filled: Option<Vec<f64>> = session.take_as(keys::PRE_FILLED_FAILURES)?;
        let instants: Option<Vec<NaiveDateTime>> = session.take_as(keys::ORIGINAL_DATETIMES)?;

        let mut view = EntryView {
            input_method: self.input_method(session)?,
            entries: Vec::new(),
            warning: None,
            max_rows: self.config.max_entry_rows,
        };

        if let Some(failures) = pre_filled.filter(|f| !f.is_empty()) {
            let outcome = apply_censoring_rule(
                &failures,
                instants.as_deref(),
                self.clock.now(),
                &self.config,
            );
            session.set_as(keys::INPUT_METHOD, &outcome.input_method)?;
            view.input_method = outcome.input_method;
            view.entries = outcome.entries;
            view.warning = outcome.warning;
        }

        Ok(view)
    }

    /// Validates the entry table, fits both methods and stores the results.
    pub fn submit_data<S: SessionStore>(
        &self,
        session: &mut S,
        rows: &[EntryRow],
    ) -> Result<FitComparison> {
        self.enter(session, Stage::EnterData)?;
        let method = self.input_method(session)?;
        let data = collect_entries(rows, method, self.config.max_entry_rows)?;

        info!(
            input_method = %method,
            failures = data.failures.len(),
            censored = data.censored.len(),
            "fitting submitted data"
        );
        let comparison = fit_both(&self.fitter, &data.failures, &data.censored, &self.config);

        session.set_as(keys::FAILURES, &data.failures)?;
        session.set_as(keys::CENSORED, &data.censored)?;
        session.set_as(keys::RESULTS_MLE, &comparison.mle)?;
        session.set_as(keys::RESULTS_RR, &comparison.rr)?;
        session.remove(keys::CHOSEN_METHOD);
        forget_downstream(session)?;

        self.enter(session, Stage::CompareFits)?;
        Ok(comparison)
    }

    /// Shows both fits and the recommended method.
    pub fn compare_fits<S: SessionStore>(&self, session: &mut S) -> Result<ComparisonView> {
        self.enter(session, Stage::CompareFits)?;
        let comparison = stored_comparison(session)?;
        let recommendation = recommend(&comparison.mle, &comparison.rr);
        Ok(ComparisonView {
            mle: comparison.mle,
            rr: comparison.rr,
            recommendation,
        })
    }

    /// Records the chosen method and routes on its failure pattern.
    ///
    /// Unrecognized values choose MLE.
    pub fn choose_fit<S: SessionStore>(&self, session: &mut S, raw_method: &str) -> Result<FitChoice> {
        self.enter(session, Stage::CompareFits)?;
        let method = FitMethod::parse(raw_method).unwrap_or(FitMethod::Mle);
        session.set_as(keys::CHOSEN_METHOD, &method)?;
        forget_downstream(session)?;

        let pattern = chosen_record(session)?.and_then(|r| r.pattern());
        let next = match pattern {
            Some(p) if p.needs_reliability_target() => Stage::SetTarget,
            _ => Stage::ViewResults,
        };
        self.enter(session, next)?;

        Ok(FitChoice {
            method,
            pattern,
            next,
        })
    }

    /// Stores the target reliability level; blank input uses the default.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::InvalidReliability`] unless the level parses to a
    /// value strictly between 0 and 1.
    pub fn set_target<S: SessionStore>(&self, session: &mut S, raw_level: &str) -> Result<f64> {
        self.enter(session, Stage::SetTarget)?;
        let level = self.parse_level(raw_level)?;
        session.set_as(keys::RELIABILITY_LEVEL, &level)?;
        self.enter(session, Stage::ViewResults)?;
        Ok(level)
    }

    /// Derives the final quantities from the chosen fit.
    ///
    /// An age-related fit needs a stored target; until [`Self::set_target`]
    /// has run the stage is not enterable.
    pub fn results<S: SessionStore>(&self, session: &mut S) -> Result<DerivedReport> {
        self.enter(session, Stage::ViewResults)?;
        let record = chosen_record(session)?.ok_or_else(|| {
            AnalysisError::UnfitForDerivation("no fit results in session".to_string())
        })?;
        let level: Option<f64> = session.get_as(keys::RELIABILITY_LEVEL)?;
        derive(&record, level)
    }

    fn input_method<S: SessionStore>(&self, session: &S) -> Result<InputMethod> {
        Ok(session.get_as(keys::INPUT_METHOD)?.unwrap_or_default())
    }

    fn parse_level(&self, raw: &str) -> Result<f64> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(self.config.default_reliability);
        }
        let level: f64 = raw
            .parse()
            .map_err(|_| AnalysisError::InvalidReliability(format!("'{raw}' is not a number")))?;
        if !(level > 0.0 && level < 1.0) {
            return Err(AnalysisError::InvalidReliability(format!(
                "{level} must be strictly between 0 and 1"
            )));
        }
        Ok(level)
    }

    fn enter<S: SessionStore>(&self, session: &mut S, target: Stage) -> Result<()> {
        let from = self.stage(session)?;
        let mut reached: Vec<Stage> = session.get_as(keys::REACHED)?.unwrap_or_default();

        let chosen = match target {
            Stage::SetTarget | Stage::ViewResults => chosen_record(session)?.and_then(|r| r.pattern()),
            _ => None,
        };

        let awaiting_target = target == Stage::ViewResults
            && chosen.is_some_and(FailurePattern::needs_reliability_target)
            && !session.contains(keys::RELIABILITY_LEVEL);

        if awaiting_target || !from.can_enter(target, &reached, chosen) {
            warn!(from = %from, to = %target, "rejected stage transition");
            return Err(AnalysisError::InvalidTransition {
                from: from.to_string(),
                to: target.to_string(),
            });
        }

        if !reached.contains(&target) {
            reached.push(target);
            session.set_as(keys::REACHED, &reached)?;
        }
        session.set_as(keys::STAGE, &target)?;
        if from != target {
            debug!(from = %from, to = %target, "entered stage");
        }
        Ok(())
    }
}

/// Drops the target and the stages past the comparison, so a new choice
/// has to walk them again.
fn forget_downstream<S: SessionStore>(session: &mut S) -> Result<()> {
    session.remove(keys::RELIABILITY_LEVEL);
    let mut reached: Vec<Stage> = session.get_as(keys::REACHED)?.unwrap_or_default();
    reached.retain(|s| !matches!(s, Stage::SetTarget | Stage::ViewResults));
    session.set_as(keys::REACHED, &reached)
}

fn stored_comparison<S: SessionStore>(session: &S) -> Result<FitComparison> {
    let mle: Option<FitRecord> = session.get_as(keys::RESULTS_MLE)?;
    let rr: Option<FitRecord> = session.get_as(keys::RESULTS_RR)?;
    match (mle, rr) {
        (Some(mle), Some(rr)) => Ok(FitComparison { mle, rr }),
        _ => Err(AnalysisError::Session("no fit results in session".to_string())),
    }
}

/// Record of the chosen method, MLE when none was chosen.
fn chosen_record<S: SessionStore>(session: &S) -> Result<Option<FitRecord>> {
    let method: FitMethod = session.get_as(keys::CHOSEN_METHOD)?.unwrap_or(FitMethod::Mle);
    let key = match method {
        FitMethod::Mle => keys::RESULTS_MLE,
        FitMethod::RankRegression => keys::RESULTS_RR,
    };
    session.get_as(key)
}
