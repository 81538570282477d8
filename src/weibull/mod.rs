//! Weibull parameter estimation, goodness of fit, and reliability analysis.
//!
//! Fits two-parameter Weibull distributions to failure data with optional
//! right-censored suspensions.
//!
//! # Modules
//!
//! - [`weibull_mle`] — Newton-Raphson MLE on the censored profile likelihood
//! - [`weibull_mrr`] — Median Rank Regression with Johnson adjusted ranks
//! - [`log_likelihood`], [`aicc`], [`anderson_darling`] — fit quality metrics
//! - [`ReliabilityAnalysis`] — R(t), MTBF, mission time
//! - [`DistributionFitter`] — fitter interface, implemented by [`WeibullFitter`]
//!
//! # References
//!
//! - Abernethy, R.B. (2006). *The New Weibull Handbook*, 5th ed.
//! - Lawless, J.F. (2003). *Statistical Models and Methods for Lifetime Data*, 2nd ed.

mod fitter;
mod goodness;
mod mle;
mod mrr;
mod reliability;

pub use fitter::{DistributionFitter, FitMethod, WeibullFit, WeibullFitter};
pub use goodness::{aicc, anderson_darling, log_likelihood, plotting_positions, WEIBULL_PARAMS};
pub use mle::{weibull_mle, WeibullMleResult};
pub use mrr::{weibull_mrr, weibull_mrr_axis, RegressionAxis, WeibullMrrResult};
pub use reliability::ReliabilityAnalysis;
