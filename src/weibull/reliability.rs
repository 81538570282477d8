//! Reliability quantities of a fitted Weibull distribution.
//!
//! Reliability function, MTBF and mission time.

use u_numflow::special::gamma;

/// Reliability analysis of a fitted Weibull distribution.
///
/// Given shape beta > 0 and scale alpha > 0 (hours):
/// - Reliability: R(t) = exp(-(t/alpha)^beta)
/// - MTBF: alpha * Gamma(1 + 1/beta)
/// - Mission time at reliability R: alpha * (-ln(R))^(1/beta)
///
/// # Examples
///
/// ```
/// use u_reliability::weibull::ReliabilityAnalysis;
/// let ra = ReliabilityAnalysis::new(2.0, 1000.0).unwrap();
/// let t = ra.mission_time(0.8).unwrap();
/// assert!((t - 472.3807).abs() < 1e-3);
/// assert!((ra.reliability(t) - 0.8).abs() < 1e-12);
/// ```
///
/// # Reference
/// Meeker & Escobar (1998), *Statistical Methods for Reliability Data*, Wiley.
#[derive(Debug, Clone, Copy)]
pub struct ReliabilityAnalysis {
    shape: f64,
    scale: f64,
}

impl ReliabilityAnalysis {
    /// Creates a reliability analysis from Weibull parameters.
    ///
    /// # Returns
    /// `None` if either parameter is non-positive or non-finite.
    pub fn new(shape: f64, scale: f64) -> Option<Self> {
        if !shape.is_finite() || !scale.is_finite() || shape <= 0.0 || scale <= 0.0 {
            return None;
        }
        Some(Self { shape, scale })
    }

    /// Reliability (survival) function R(t) = exp(-(t/alpha)^beta).
    ///
    /// Returns 1.0 for t <= 0.
    pub fn reliability(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return 1.0;
        }
        (-(t / self.scale).powf(self.shape)).exp()
    }

    /// Mean time between failures, the Weibull mean.
    ///
    /// ```text
    /// MTBF = alpha * Gamma(1 + 1/beta)
    /// ```
    pub fn mtbf(&self) -> f64 {
        self.scale * gamma(1.0 + 1.0 / self.shape)
    }

    /// Time at which reliability drops to `level`, the inverse of R(t).
    ///
    /// ```text
    /// t = alpha * (-ln(level))^(1/beta)
    /// ```
    ///
    /// # Returns
    /// `None` if `level` is outside (0, 1).
    pub fn mission_time(&self, level: f64) -> Option<f64> {
        if !(level > 0.0 && level < 1.0) {
            return None;
        }
        Some(self.scale * (-level.ln()).powf(1.0 / self.shape))
    }
}
