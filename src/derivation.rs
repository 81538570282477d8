//! Engineering quantities derived from the chosen fit.
//!
//! # Branches
//!
//! - **Age-related failure**: mission time at the target reliability R,
//!   `alpha * (-ln R)^(1/beta)`
//! - **Random failure**: MTBF `alpha * Γ(1 + 1/beta)` plus the non-safety
//!   (`MTBF * 2 * 0.02`) and safety (`MTBF * 2 * 0.01`) interval budgets
//! - **Infant mortality**: nothing is derived; root-cause analysis is
//!   required instead
//!
//! Every quantity is reported in hours (2 decimals) and converted to days,
//! months and years (4 decimals), using 365.25 days per year and
//! 30.4375 days per month.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{AnalysisError, Result};
use crate::orchestrator::FitRecord;
use crate::pattern::FailurePattern;
use crate::weibull::ReliabilityAnalysis;

/// Hours per day.
pub const HOURS_PER_DAY: f64 = 24.0;

/// Julian year length in days.
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Average month length in days (365.25 / 12).
pub const DAYS_PER_MONTH: f64 = DAYS_PER_YEAR / 12.0;

/// Non-safety inspection budget as a fraction of twice the MTBF.
pub const NON_SAFETY_FRACTION: f64 = 0.02;

/// Safety inspection budget as a fraction of twice the MTBF.
pub const SAFETY_FRACTION: f64 = 0.01;

/// Rounds `value` to `places` decimal places, half away from zero.
pub fn round_dp(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// A duration expressed in days, months and years.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitConversion {
    pub days: f64,
    pub months: f64,
    pub years: f64,
}

/// Converts hours to days, months and years, each rounded to 4 decimals.
///
/// Returns `None` for non-finite input, never a partial conversion.
///
/// # Examples
///
/// ```
/// use u_reliability::derivation::convert_hours;
/// let c = convert_hours(8766.0).unwrap();
/// assert_eq!(c.days, 365.25);
/// assert_eq!(c.months, 12.0);
/// assert_eq!(c.years, 1.0);
/// assert!(convert_hours(f64::NAN).is_none());
/// ```
pub fn convert_hours(hours: f64) -> Option<UnitConversion> {
    if !hours.is_finite() {
        return None;
    }
    let days = hours / HOURS_PER_DAY;
    Some(UnitConversion {
        days: round_dp(days, 4),
        months: round_dp(days / DAYS_PER_MONTH, 4),
        years: round_dp(days / DAYS_PER_YEAR, 4),
    })
}

/// A derived quantity in all four units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    /// Hours, 2 decimals.
    pub hours: f64,
    pub days: f64,
    pub months: f64,
    pub years: f64,
}

impl Quantity {
    /// Builds all four units from unrounded hours, or nothing.
    pub fn from_hours(hours: f64) -> Option<Self> {
        let c = convert_hours(hours)?;
        Some(Self {
            hours: round_dp(hours, 2),
            days: c.days,
            months: c.months,
            years: c.years,
        })
    }
}

/// Name of a derived quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantityKind {
    MissionTime,
    Mtbf,
    #[serde(rename = "non_safety_calc")]
    NonSafetyInterval,
    #[serde(rename = "safety_calc")]
    SafetyInterval,
}

/// Final result of the analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedReport {
    pub beta: f64,
    pub alpha: f64,
    pub pattern: FailurePattern,
    /// Reliability level the mission time was computed for.
    pub reliability: Option<f64>,
    pub quantities: BTreeMap<QuantityKind, Quantity>,
}

impl DerivedReport {
    pub fn get(&self, kind: QuantityKind) -> Option<&Quantity> {
        self.quantities.get(&kind)
    }
}

/// Derives engineering quantities from the chosen fit.
///
/// `reliability_level` is used only for age-related patterns; without it
/// no mission time is produced.
///
/// # Errors
///
/// [`AnalysisError::UnfitForDerivation`] if the record is a failed fit or
/// its parameters are not usable.
pub fn derive(record: &FitRecord, reliability_level: Option<f64>) -> Result<DerivedReport> {
    let summary = match record {
        FitRecord::Fitted(s) => s,
        FitRecord::Failed { error } => {
            return Err(AnalysisError::UnfitForDerivation(error.clone()));
        }
    };

    let analysis = ReliabilityAnalysis::new(summary.beta, summary.alpha).ok_or_else(|| {
        AnalysisError::UnfitForDerivation(format!(
            "invalid parameters beta={}, alpha={}",
            summary.beta, summary.alpha
        ))
    })?;

    let mut report = DerivedReport {
        beta: summary.beta,
        alpha: summary.alpha,
        pattern: summary.pattern,
        reliability: None,
        quantities: BTreeMap::new(),
    };

    match summary.pattern {
        FailurePattern::AgeRelated => {
            if let Some(level) = reliability_level {
                let hours = analysis.mission_time(level).ok_or_else(|| {
                    AnalysisError::InvalidReliability(format!("{level} is outside (0, 1)"))
                })?;
                report.reliability = Some(level);
                insert(&mut report, QuantityKind::MissionTime, hours);
            }
        }
        FailurePattern::Random => {
            let mtbf = analysis.mtbf();
            insert(&mut report, QuantityKind::Mtbf, mtbf);
            insert(
                &mut report,
                QuantityKind::NonSafetyInterval,
                mtbf * 2.0 * NON_SAFETY_FRACTION,
            );
            insert(
                &mut report,
                QuantityKind::SafetyInterval,
                mtbf * 2.0 * SAFETY_FRACTION,
            );
        }
        FailurePattern::InfantMortality => {}
    }

    info!(
        pattern = report.pattern.label(),
        quantities = report.quantities.len(),
        "derived reliability quantities"
    );

    Ok(report)
}

fn insert(report: &mut DerivedReport, kind: QuantityKind, hours: f64) {
    if let Some(q) = Quantity::from_hours(hours) {
        report.quantities.insert(kind, q);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::FitSummary;

    fn fitted(beta: f64, alpha: f64) -> FitRecord {
        FitRecord::Fitted(FitSummary {
            beta,
            alpha,
            pattern: FailurePattern::from_beta(beta),
            loglik: -40.0,
            aicc: Some(85.0),
            ad: 0.7,
        })
    }

    #[test]
    fn test_round_dp() {
        assert_eq!(round_dp(472.380_73, 2), 472.38);
        assert_eq!(round_dp(1.234_56, 4), 1.2346);
        assert_eq!(round_dp(-42.125_1, 2), -42.13);
    }

    #[test]
    fn test_convert_one_year() {
        let c = convert_hours(8766.0).expect("finite");
        assert!((c.days - 365.25).abs() < 1e-9);
        assert!((c.months - 12.0).abs() < 1e-9);
        assert!((c.years - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_convert_rounds_to_four_places() {
        let c = convert_hours(100.0).expect("finite");
        assert_eq!(c.days, 4.1667);
        assert_eq!(c.months, 0.1369);
        assert_eq!(c.years, 0.0114);
    }

    #[test]
    fn test_convert_non_finite() {
        assert!(convert_hours(f64::NAN).is_none());
        assert!(convert_hours(f64::INFINITY).is_none());
        assert!(Quantity::from_hours(f64::NEG_INFINITY).is_none());
    }

    #[test]
    fn test_mission_time() {
        let report = derive(&fitted(2.0, 1000.0), Some(0.8)).expect("derivable");
        let q = report.get(QuantityKind::MissionTime).expect("mission time");
        assert_eq!(q.hours, 472.38);
        assert_eq!(report.reliability, Some(0.8));

        // Independent check through R(t) = exp(-(t/alpha)^beta)
        let r = (-(q.hours / 1000.0_f64).powf(2.0)).exp();
        assert!((r - 0.8).abs() < 1e-5, "R(mission_time) = {}", r);

        let c = convert_hours(472.380_727).expect("finite");
        assert_eq!((q.days, q.months, q.years), (c.days, c.months, c.years));
        assert!(report.get(QuantityKind::Mtbf).is_none());
    }

    #[test]
    fn test_age_related_without_level() {
        let report = derive(&fitted(2.0, 1000.0), None).expect("derivable");
        assert!(report.quantities.is_empty());
        assert_eq!(report.reliability, None);
    }

    #[test]
    fn test_age_related_invalid_level() {
        let err = derive(&fitted(2.0, 1000.0), Some(1.5)).expect_err("out of range");
        assert!(matches!(err, AnalysisError::InvalidReliability(_)));
    }

    #[test]
    fn test_random_failure_budgets() {
        // beta = 1: MTBF = alpha
        let report = derive(&fitted(1.0, 5000.0), Some(0.8)).expect("derivable");
        let mtbf = report.get(QuantityKind::Mtbf).expect("mtbf");
        assert!((mtbf.hours - 5000.0).abs() < 1e-6);
        assert_eq!(report.get(QuantityKind::NonSafetyInterval).map(|q| q.hours), Some(200.0));
        assert_eq!(report.get(QuantityKind::SafetyInterval).map(|q| q.hours), Some(100.0));
        assert!(report.get(QuantityKind::MissionTime).is_none());
        assert_eq!(report.reliability, None);
    }

    #[test]
    fn test_random_failure_gamma_mean() {
        let report = derive(&fitted(0.95, 1200.0), None).expect("derivable");
        let expected = 1200.0 * u_numflow::special::gamma(1.0 + 1.0 / 0.95);
        let mtbf = report.get(QuantityKind::Mtbf).expect("mtbf");
        assert!((mtbf.hours - round_dp(expected, 2)).abs() < 1e-9);
    }

    #[test]
    fn test_infant_mortality_reports_parameters_only() {
        let report = derive(&fitted(0.6, 800.0), Some(0.8)).expect("derivable");
        assert_eq!(report.pattern, FailurePattern::InfantMortality);
        assert_eq!(report.beta, 0.6);
        assert_eq!(report.alpha, 800.0);
        assert!(report.quantities.is_empty());
    }

    #[test]
    fn test_failed_fit_is_unfit() {
        let err = derive(
            &FitRecord::Failed {
                error: "singular".into(),
            },
            Some(0.8),
        )
        .expect_err("failed fit");
        assert_eq!(err, AnalysisError::UnfitForDerivation("singular".into()));
    }

    #[test]
    fn test_report_serde_keys() {
        let report = derive(&fitted(1.0, 5000.0), None).expect("derivable");
        let json = serde_json::to_value(&report).expect("serialize");
        assert!(json["quantities"]["mtbf"].is_object());
        assert!(json["quantities"]["non_safety_calc"].is_object());
        assert!(json["quantities"]["safety_calc"].is_object());
        assert_eq!(json["pattern"], serde_json::json!("Random failure"));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn conversion_all_or_nothing(hours in proptest::num::f64::ANY) {
            match convert_hours(hours) {
                Some(c) => {
                    prop_assert!(hours.is_finite());
                    prop_assert!(c.days.is_finite() || hours.abs() > 1e300);
                }
                None => prop_assert!(!hours.is_finite()),
            }
        }

        #[test]
        fn mission_time_inverts_reliability(
            beta in 0.2_f64..8.0,
            alpha in 10.0_f64..50_000.0,
            level in 0.01_f64..0.99,
        ) {
            let ra = ReliabilityAnalysis::new(beta, alpha).expect("valid parameters");
            let t = ra.mission_time(level).expect("valid level");
            prop_assert!((ra.reliability(t) - level).abs() < 1e-9);
        }
    }
}
