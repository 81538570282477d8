//! Distribution fitter interface and the built-in Weibull fitter.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::goodness::{aicc, anderson_darling, WEIBULL_PARAMS};
use super::mle::weibull_mle;
use super::mrr::weibull_mrr;
use crate::error::{AnalysisError, Result};

/// Parameter estimation method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FitMethod {
    /// Maximum likelihood.
    #[serde(rename = "mle")]
    Mle,
    /// Least squares on the probability plot (rank regression).
    #[serde(rename = "rr")]
    RankRegression,
}

impl FitMethod {
    /// Both methods, in the order they are fitted and reported.
    pub const ALL: [FitMethod; 2] = [FitMethod::Mle, FitMethod::RankRegression];

    /// Short key used in session state and form values.
    pub fn key(self) -> &'static str {
        match self {
            Self::Mle => "mle",
            Self::RankRegression => "rr",
        }
    }

    /// Human-readable name.
    pub fn label(self) -> &'static str {
        match self {
            Self::Mle => "MLE",
            Self::RankRegression => "Rank Regression",
        }
    }

    /// Parses a form value (`mle`, `rr`, or `ls`), case-insensitively.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "mle" => Some(Self::Mle),
            "rr" | "ls" => Some(Self::RankRegression),
            _ => None,
        }
    }
}

impl fmt::Display for FitMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Unrounded output of a distribution fit.
#[derive(Debug, Clone, PartialEq)]
pub struct WeibullFit {
    /// Shape parameter (beta).
    pub shape: f64,
    /// Scale parameter (alpha), in hours.
    pub scale: f64,
    /// Log-likelihood over failures and suspensions.
    pub log_likelihood: f64,
    /// Corrected AIC; `None` without residual degrees of freedom.
    pub aicc: Option<f64>,
    /// Anderson-Darling statistic.
    pub anderson_darling: f64,
}

/// A capability that fits a two-parameter Weibull distribution.
///
/// Implementations must accept failures-only and failure-plus-suspension
/// data and report ill-conditioned input as an error rather than panic.
pub trait DistributionFitter {
    /// Fits `failures` with right-censored `censored` times by `method`.
    fn fit(&self, failures: &[f64], censored: &[f64], method: FitMethod) -> Result<WeibullFit>;
}

/// Built-in fitter: censored MLE and best-axis rank regression.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeibullFitter;

impl DistributionFitter for WeibullFitter {
    fn fit(&self, failures: &[f64], censored: &[f64], method: FitMethod) -> Result<WeibullFit> {
        let failed = |reason: &str| AnalysisError::FitFailed {
            method: method.label().to_string(),
            reason: reason.to_string(),
        };

        if failures.is_empty() {
            return Err(failed("at least one failure time is required"));
        }
        if failures
            .iter()
            .chain(censored.iter())
            .any(|t| !t.is_finite() || *t <= 0.0)
        {
            return Err(failed("all times must be positive and finite"));
        }

        let (shape, scale, log_likelihood) = match method {
            FitMethod::Mle => {
                let r = weibull_mle(failures, censored)
                    .ok_or_else(|| failed("maximum likelihood did not converge"))?;
                (r.shape, r.scale, r.log_likelihood)
            }
            FitMethod::RankRegression => {
                let r = weibull_mrr(failures, censored)
                    .ok_or_else(|| failed("rank regression needs at least two distinct failure times"))?;
                (r.shape, r.scale, r.log_likelihood)
            }
        };

        if !log_likelihood.is_finite() {
            return Err(failed("log-likelihood is not finite"));
        }

        let anderson_darling = anderson_darling(shape, scale, failures, censored)
            .ok_or_else(|| failed("Anderson-Darling statistic is not finite"))?;
        let n = failures.len() + censored.len();

        Ok(WeibullFit {
            shape,
            scale,
            log_likelihood,
            aicc: aicc(log_likelihood, WEIBULL_PARAMS, n),
            anderson_darling,
        })
    }
}
