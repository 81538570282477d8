//! Dual-method fitting.
//!
//! Runs the distribution fitter once per [`FitMethod`] on identical data
//! and normalizes each outcome into a comparable [`FitRecord`]. The two
//! fits are independent: one failing never prevents the other.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::AnalysisConfig;
use crate::derivation::round_dp;
use crate::pattern::FailurePattern;
use crate::weibull::{DistributionFitter, FitMethod, WeibullFit};

/// Rounded, classified result of a successful fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitSummary {
    /// Shape parameter, 4 decimals.
    pub beta: f64,
    /// Scale parameter in hours, 4 decimals.
    pub alpha: f64,
    pub pattern: FailurePattern,
    /// Log-likelihood, 2 decimals.
    pub loglik: f64,
    /// Corrected AIC, 2 decimals; `None` means not applicable and is
    /// stored as `"N/A"`.
    #[serde(rename = "AICc", with = "not_applicable", default)]
    pub aicc: Option<f64>,
    /// Anderson-Darling statistic, 2 decimals.
    #[serde(rename = "AD")]
    pub ad: f64,
}

impl FitSummary {
    /// Rounds and classifies a raw fit.
    ///
    /// AICc is dropped when `sample_size` is below
    /// `config.aicc_min_sample`.
    pub fn from_fit(fit: &WeibullFit, sample_size: usize, config: &AnalysisConfig) -> Self {
        let beta = round_dp(fit.shape, 4);
        let aicc = if sample_size < config.aicc_min_sample {
            None
        } else {
            fit.aicc.map(|v| round_dp(v, 2))
        };
        Self {
            beta,
            alpha: round_dp(fit.scale, 4),
            pattern: FailurePattern::from_beta(beta),
            loglik: round_dp(fit.log_likelihood, 2),
            aicc,
            ad: round_dp(fit.anderson_darling, 2),
        }
    }

    /// AICc for display, `"N/A"` when not applicable.
    pub fn aicc_display(&self) -> String {
        self.aicc
            .map_or_else(|| not_applicable::TEXT.to_string(), |v| format!("{v:.2}"))
    }
}

/// `Option<f64>` as a number or `"N/A"`.
mod not_applicable {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const TEXT: &str = "N/A";

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &Option<f64>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => s.serialize_f64(*v),
            None => s.serialize_str(TEXT),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        match Option::<Raw>::deserialize(d)? {
            Some(Raw::Number(v)) => Ok(Some(v)),
            Some(Raw::Text(t)) if t == TEXT => Ok(None),
            Some(Raw::Text(t)) => Err(D::Error::custom(format!(
                "expected a number or \"{TEXT}\", got {t:?}"
            ))),
            None => Ok(None),
        }
    }
}

/// Outcome of one fitting method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FitRecord {
    Fitted(FitSummary),
    Failed { error: String },
}

impl FitRecord {
    pub fn summary(&self) -> Option<&FitSummary> {
        match self {
            Self::Fitted(s) => Some(s),
            Self::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Fitted(_) => None,
            Self::Failed { error } => Some(error),
        }
    }

    pub fn beta(&self) -> Option<f64> {
        self.summary().map(|s| s.beta)
    }

    pub fn pattern(&self) -> Option<FailurePattern> {
        self.summary().map(|s| s.pattern)
    }

    pub fn loglik(&self) -> Option<f64> {
        self.summary().map(|s| s.loglik)
    }

    pub fn ad(&self) -> Option<f64> {
        self.summary().map(|s| s.ad)
    }

    pub fn aicc(&self) -> Option<f64> {
        self.summary().and_then(|s| s.aicc)
    }
}

/// Both fits over the same data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitComparison {
    pub mle: FitRecord,
    pub rr: FitRecord,
}

impl FitComparison {
    pub fn get(&self, method: FitMethod) -> &FitRecord {
        match method {
            FitMethod::Mle => &self.mle,
            FitMethod::RankRegression => &self.rr,
        }
    }
}

/// Fits `failures` and `censored` with one method and normalizes the result.
pub fn fit_one<F: DistributionFitter + ?Sized>(
    fitter: &F,
    failures: &[f64],
    censored: &[f64],
    method: FitMethod,
    config: &AnalysisConfig,
) -> FitRecord {
    let sample_size = failures.len() + censored.len();
    match fitter.fit(failures, censored, method) {
        Ok(fit) => {
            let summary = FitSummary::from_fit(&fit, sample_size, config);
            info!(
                method = method.key(),
                beta = summary.beta,
                alpha = summary.alpha,
                pattern = summary.pattern.label(),
                "weibull fit succeeded"
            );
            FitRecord::Fitted(summary)
        }
        Err(e) => {
            warn!(method = method.key(), error = %e, "weibull fit failed");
            FitRecord::Failed {
                error: e.to_string(),
            }
        }
    }
}

/// Fits the data with both methods.
pub fn fit_both<F: DistributionFitter + ?Sized>(
    fitter: &F,
    failures: &[f64],
    censored: &[f64],
    config: &AnalysisConfig,
) -> FitComparison {
    FitComparison {
        mle: fit_one(fitter, failures, censored, FitMethod::Mle, config),
        rr: fit_one(fitter, failures, censored, FitMethod::RankRegression, config),
    }
}
