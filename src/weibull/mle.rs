//! Maximum Likelihood Estimation (MLE) for Weibull parameters with
//! right-censored observations.
//!
//! Uses Newton-Raphson on the profile likelihood equation for the shape
//! parameter beta, then derives the scale parameter analytically.

use super::goodness::log_likelihood;

/// Result of Weibull MLE fitting.
#[derive(Debug, Clone)]
pub struct WeibullMleResult {
    /// Shape parameter (beta).
    pub shape: f64,
    /// Scale parameter (alpha), in the units of the input times.
    pub scale: f64,
    /// Log-likelihood at the fitted parameters, suspensions included.
    pub log_likelihood: f64,
    /// Number of Newton-Raphson iterations used.
    pub iterations: usize,
}

/// Maximum Newton-Raphson iterations.
const MAX_ITER: usize = 100;

/// Convergence tolerance for Newton-Raphson.
const TOL: f64 = 1e-10;

/// Fit a Weibull distribution to failures and suspensions using MLE.
///
/// With `r` failures t_f and `N` observations in total (failures plus
/// right-censored suspensions t_s), the log-likelihood is:
///
/// ```text
/// L(beta, alpha) = sum_f [ln(beta) - beta*ln(alpha) + (beta-1)*ln(t_f)]
///                - sum_all (t/alpha)^beta
/// ```
///
/// For fixed beta the scale has the closed form
/// `alpha_hat = (sum_all(t^beta) / r)^(1/beta)`, which leaves the profile
/// equation for beta:
///
/// ```text
/// g(beta) = r/beta + sum_f ln(t_f) - r * S1 / S0 = 0
/// S0 = sum_all t^beta,  S1 = sum_all t^beta * ln(t)
/// ```
///
/// Times are scaled by their maximum before exponentiation so that large
/// hour values and steep shapes cannot overflow; `g` is invariant under
/// that scaling.
///
/// # Arguments
/// * `failures` - Positive failure times (at least 1)
/// * `censored` - Positive suspension times (may be empty)
///
/// # Returns
/// `None` if there are no failures, fewer than 2 observations in total,
/// any value is non-positive or non-finite, or the iteration does not
/// converge (e.g. all observations identical, or the only failure is the
/// longest observation).
///
/// # Reference
/// Lawless (2003), *Statistical Models and Methods for Lifetime Data*,
/// 2nd ed., Section 5.2.
pub fn weibull_mle(failures: &[f64], censored: &[f64]) -> Option<WeibullMleResult> {
    let r = failures.len();
    if r == 0 || r + censored.len() < 2 {
        return None;
    }

    if !failures
        .iter()
        .chain(censored.iter())
        .all(|&t| t.is_finite() && t > 0.0)
    {
        return None;
    }

    let t_max = failures
        .iter()
        .chain(censored.iter())
        .copied()
        .fold(f64::MIN, f64::max);

    // ln(t / t_max) for every observation; failures first.
    let ln_u_fail: Vec<f64> = failures.iter().map(|t| (t / t_max).ln()).collect();
    let ln_u_all: Vec<f64> = ln_u_fail
        .iter()
        .copied()
        .chain(censored.iter().map(|t| (t / t_max).ln()))
        .collect();
    let sum_ln_u_fail: f64 = ln_u_fail.iter().sum();
    let r_f = r as f64;

    // g'(beta) = -r/beta^2 - r * (S2*S0 - S1^2) / S0^2
    let mut beta = 1.2_f64;
    let mut iterations = 0;

    for iter in 0..MAX_ITER {
        iterations = iter + 1;

        let mut s0 = 0.0_f64;
        let mut s1 = 0.0_f64;
        let mut s2 = 0.0_f64;
        for &lu in &ln_u_all {
            let u_beta = (beta * lu).exp();
            s0 += u_beta;
            s1 += u_beta * lu;
            s2 += u_beta * lu * lu;
        }

        if s0 == 0.0 {
            return None;
        }

        let g = r_f / beta + sum_ln_u_fail - r_f * s1 / s0;
        let g_prime = -r_f / (beta * beta) - r_f * (s2 * s0 - s1 * s1) / (s0 * s0);

        if g_prime.abs() < 1e-30 || !g_prime.is_finite() {
            return None;
        }

        let delta = g / g_prime;
        let next = beta - delta;

        // Halve towards zero instead of stepping past it
        beta = if next <= 0.0 { beta / 2.0 } else { next };

        if delta.abs() < TOL * beta.max(1.0) {
            break;
        }

        if iter == MAX_ITER - 1 {
            return None;
        }
    }

    if !beta.is_finite() || beta <= 0.0 {
        return None;
    }

    // alpha = t_max * (sum_all(u^beta) / r)^(1/beta)
    let s0: f64 = ln_u_all.iter().map(|lu| (beta * lu).exp()).sum();
    let alpha = t_max * (s0 / r_f).powf(1.0 / beta);

    if !alpha.is_finite() || alpha <= 0.0 {
        return None;
    }

    let log_likelihood = log_likelihood(beta, alpha, failures, censored);
    if !log_likelihood.is_finite() {
        return None;
    }

    Some(WeibullMleResult {
        shape: beta,
        scale: alpha,
        log_likelihood,
        iterations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Weibull quantiles at F_i = (i - 0.5) / n.
    fn weibull_quantiles(shape: f64, scale: f64, n: usize) -> Vec<f64> {
        (1..=n)
            .map(|i| {
                let f = (i as f64 - 0.5) / n as f64;
                scale * (-(1.0 - f).ln()).powf(1.0 / shape)
            })
            .collect()
    }

    #[test]
    fn test_mle_known_weibull_data() {
        let data = weibull_quantiles(2.0, 1000.0, 12);
        let result = weibull_mle(&data, &[]).expect("MLE should converge");
        assert!(
            (result.shape - 2.0).abs() < 0.5,
            "shape = {}, expected near 2.0",
            result.shape
        );
        assert!(
            (result.scale - 1000.0).abs() < 150.0,
            "scale = {}, expected near 1000",
            result.scale
        );
        assert!(result.log_likelihood.is_finite());
    }

    #[test]
    fn test_mle_matches_uncensored_closed_form() {
        // At the MLE, alpha^beta = mean(t^beta) for complete data
        let data = [720.0, 1300.0, 2100.0, 2600.0, 3900.0];
        let r = weibull_mle(&data, &[]).expect("MLE should converge");
        let mean_t_beta: f64 =
            data.iter().map(|t: &f64| t.powf(r.shape)).sum::<f64>() / data.len() as f64;
        let rel = (r.scale.powf(r.shape) - mean_t_beta).abs() / mean_t_beta;
        assert!(rel < 1e-8, "relative error {}", rel);
    }

    #[test]
    fn test_mle_large_hours_no_overflow() {
        let data = [20000.0, 21000.0, 22000.0, 23000.0, 24000.0, 25000.0];
        let r = weibull_mle(&data, &[]).expect("steep shape should still converge");
        assert!(r.shape > 5.0, "shape = {}", r.shape);
        assert!(r.scale > 20000.0 && r.scale < 26000.0, "scale = {}", r.scale);
    }

    #[test]
    fn test_mle_suspensions_raise_scale() {
        let failures = [400.0, 650.0, 900.0];
        let plain = weibull_mle(&failures, &[]).expect("complete data");
        let censored = weibull_mle(&failures, &[1500.0, 1500.0]).expect("censored data");
        assert!(
            censored.scale > plain.scale,
            "suspensions should extend the life estimate: {} vs {}",
            censored.scale,
            plain.scale
        );
    }

    #[test]
    fn test_mle_single_failure_with_suspension() {
        let r = weibull_mle(&[500.0], &[2000.0]).expect("one failure is enough with a longer suspension");
        assert!(r.shape > 0.0 && r.scale > 0.0);
    }

    #[test]
    fn test_mle_single_failure_longest_does_not_converge() {
        // The profile equation has no root when the only failure is the
        // longest observation.
        assert!(weibull_mle(&[2000.0], &[500.0]).is_none());
    }

    #[test]
    fn test_mle_insufficient_data() {
        assert!(weibull_mle(&[], &[]).is_none());
        assert!(weibull_mle(&[10.0], &[]).is_none());
        assert!(weibull_mle(&[], &[10.0, 20.0]).is_none());
    }

    #[test]
    fn test_mle_invalid_data() {
        assert!(weibull_mle(&[0.0, 10.0, 20.0], &[]).is_none());
        assert!(weibull_mle(&[-5.0, 10.0, 20.0], &[]).is_none());
        assert!(weibull_mle(&[f64::NAN, 10.0, 20.0], &[]).is_none());
        assert!(weibull_mle(&[10.0, 20.0], &[f64::INFINITY]).is_none());
    }

    #[test]
    fn test_mle_identical_values_fail() {
        assert!(weibull_mle(&[500.0, 500.0, 500.0, 500.0], &[]).is_none());
    }

    #[test]
    fn test_mle_converges_within_budget() {
        let r = weibull_mle(&[300.0, 800.0, 1200.0, 2500.0], &[]).expect("converges");
        assert!(r.iterations > 0 && r.iterations <= MAX_ITER);
    }
}
