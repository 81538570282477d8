//! Goodness-of-fit measures for a fitted Weibull distribution on
//! failure and suspension data.
//!
//! - [`log_likelihood`] — censored Weibull log-likelihood
//! - [`aicc`] — small-sample corrected Akaike Information Criterion
//! - [`plotting_positions`] — Johnson adjusted ranks with Bernard's median ranks
//! - [`anderson_darling`] — Anderson-Darling statistic against the
//!   plotting-position EDF

/// Number of estimated parameters of the two-parameter Weibull.
pub const WEIBULL_PARAMS: usize = 2;

/// Keeps CDF values away from 0 and 1 so the logarithms stay finite.
const CDF_EPS: f64 = 1e-12;

/// Weibull log-likelihood with right-censored observations.
///
/// ```text
/// ln L = sum_f [ln(beta/alpha) + (beta-1)*ln(t_f/alpha)] - sum_all (t/alpha)^beta
/// ```
///
/// Failures contribute the log-density, suspensions the log-survival.
pub fn log_likelihood(shape: f64, scale: f64, failures: &[f64], censored: &[f64]) -> f64 {
    let ln_ratio = (shape / scale).ln();
    let density: f64 = failures
        .iter()
        .map(|&t| ln_ratio + (shape - 1.0) * (t / scale).ln())
        .sum();
    let survival: f64 = failures
        .iter()
        .chain(censored.iter())
        .map(|&t| (t / scale).powf(shape))
        .sum();
    density - survival
}

/// Corrected Akaike Information Criterion.
///
/// ```text
/// AIC  = 2k - 2*ln(L)
/// AICc = AIC + 2k(k+1) / (n - k - 1)
/// ```
///
/// # Returns
/// `None` when `n - k - 1 <= 0` (no residual degrees of freedom), which
/// for the two-parameter Weibull means `n <= 3`.
///
/// # Reference
/// Hurvich & Tsai (1989), "Regression and time series model selection in
/// small samples", *Biometrika* 76(2), pp. 297-307.
pub fn aicc(log_likelihood: f64, n_params: usize, n: usize) -> Option<f64> {
    if n <= n_params + 1 || !log_likelihood.is_finite() {
        return None;
    }
    let k = n_params as f64;
    let aic = 2.0 * k - 2.0 * log_likelihood;
    Some(aic + 2.0 * k * (k + 1.0) / (n as f64 - k - 1.0))
}

/// Median-rank plotting positions for the failures of a censored sample.
///
/// Observations are sorted ascending (failures before suspensions at equal
/// times). Each failure receives Johnson's adjusted rank
///
/// ```text
/// rank_i = rank_{i-1} + (N + 1 - rank_{i-1}) / (1 + reverse_rank_i)
/// ```
///
/// converted to a median rank with Bernard's approximation
/// `F = (rank - 0.3) / (N + 0.4)`. Suspensions only shift later ranks.
///
/// # Returns
/// `(time, F)` pairs for every failure, ascending by time.
///
/// # Reference
/// Johnson (1964), *The Statistical Treatment of Fatigue Experiments*.
pub fn plotting_positions(failures: &[f64], censored: &[f64]) -> Vec<(f64, f64)> {
    let mut observations: Vec<(f64, bool)> = failures
        .iter()
        .map(|&t| (t, true))
        .chain(censored.iter().map(|&t| (t, false)))
        .collect();
    // true sorts after false, so flip the flag to put failures first at ties
    observations.sort_by(|a, b| {
        a.0.partial_cmp(&b.0)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(b.1.cmp(&a.1))
    });

    let n = observations.len() as f64;
    let mut previous_rank = 0.0_f64;
    let mut positions = Vec::with_capacity(failures.len());

    for (i, &(t, failed)) in observations.iter().enumerate() {
        if !failed {
            continue;
        }
        let reverse_rank = n - i as f64;
        let rank = previous_rank + (n + 1.0 - previous_rank) / (1.0 + reverse_rank);
        positions.push((t, (rank - 0.3) / (n + 0.4)));
        previous_rank = rank;
    }

    positions
}

/// Anderson-Darling statistic of a fitted Weibull against the EDF built
/// from [`plotting_positions`].
///
/// With Z the fitted CDF at the sorted failure times (closed with
/// Z_{n+1} -> 1) and F_n the empirical CDF, the integral
/// `n * ∫ (F_n - F)^2 / (F(1-F)) dF` is evaluated piecewise between
/// consecutive Z values:
///
/// ```text
/// A = -Z_i - ln(1-Z_i) + Z_{i-1} + ln(1-Z_{i-1})
/// B = 2*F_{i-1}*[ln(1-Z_i) - ln(1-Z_{i-1})]
/// C = F_{i-1}^2 * [ln(Z_i) - ln(1-Z_i) - ln(Z_{i-1}) + ln(1-Z_{i-1})]
/// AD = n * sum(A + B + C)
/// ```
///
/// Lower values indicate a better fit.
///
/// # Returns
/// `None` if there are no failures or the parameters are not positive.
///
/// # Reference
/// Stephens (1986), "Tests based on EDF statistics", in D'Agostino &
/// Stephens (Eds.), *Goodness-of-Fit Techniques*, Marcel Dekker.
pub fn anderson_darling(shape: f64, scale: f64, failures: &[f64], censored: &[f64]) -> Option<f64> {
    if failures.is_empty() || !(shape > 0.0 && scale > 0.0) {
        return None;
    }

    let positions = plotting_positions(failures, censored);
    let n = positions.len();

    let mut z: Vec<f64> = positions
        .iter()
        .map(|&(t, _)| (1.0 - (-(t / scale).powf(shape)).exp()).clamp(CDF_EPS, 1.0 - CDF_EPS))
        .collect();
    z.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    z.push(1.0 - CDF_EPS);

    let mut edf: Vec<f64> = positions.iter().map(|&(_, f)| f).collect();
    edf.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mut total = 0.0;
    let mut z_prev = 0.0_f64;
    let mut ln_z_prev = 0.0_f64;
    for (i, &zi) in z.iter().enumerate() {
        let fn_prev = if i == 0 { 0.0 } else { edf[i - 1] };
        let ln_z = zi.ln();
        let ln_1mz = (1.0 - zi).ln();
        let ln_1mz_prev = (1.0 - z_prev).ln();

        let a = -zi - ln_1mz + z_prev + ln_1mz_prev;
        let b = 2.0 * fn_prev * (ln_1mz - ln_1mz_prev);
        let c = fn_prev * fn_prev * (ln_z - ln_1mz - ln_z_prev + ln_1mz_prev);
        total += a + b + c;

        z_prev = zi;
        ln_z_prev = ln_z;
    }

    let ad = n as f64 * total;
    ad.is_finite().then_some(ad)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_likelihood_exponential_case() {
        // beta = 1: ln L = -n ln(alpha) - sum(t)/alpha
        let data = [100.0, 200.0, 300.0];
        let ll = log_likelihood(1.0, 200.0, &data, &[]);
        let expected = -3.0 * 200.0_f64.ln() - 600.0 / 200.0;
        assert!((ll - expected).abs() < 1e-10, "ll = {}, expected {}", ll, expected);
    }

    #[test]
    fn test_log_likelihood_suspension_is_survival_term() {
        let with = log_likelihood(2.0, 100.0, &[50.0], &[80.0]);
        let without = log_likelihood(2.0, 100.0, &[50.0], &[]);
        assert!((without - with - 0.64).abs() < 1e-12);
    }

    #[test]
    fn test_aicc_threshold() {
        assert!(aicc(-10.0, WEIBULL_PARAMS, 2).is_none());
        assert!(aicc(-10.0, WEIBULL_PARAMS, 3).is_none());
        // n = 4: AIC = 4 + 20 = 24, correction = 12 / 1
        let v = aicc(-10.0, WEIBULL_PARAMS, 4).expect("n = 4 has one degree of freedom");
        assert!((v - 36.0).abs() < 1e-12, "aicc = {}", v);
    }

    #[test]
    fn test_aicc_approaches_aic() {
        let v = aicc(-50.0, WEIBULL_PARAMS, 10_000).expect("large n");
        assert!((v - 104.0).abs() < 0.01);
    }

    #[test]
    fn test_plotting_positions_uncensored_is_bernard() {
        let pos = plotting_positions(&[30.0, 10.0, 20.0], &[]);
        let times: Vec<f64> = pos.iter().map(|p| p.0).collect();
        assert_eq!(times, vec![10.0, 20.0, 30.0]);
        for (i, &(_, f)) in pos.iter().enumerate() {
            let expected = (i as f64 + 1.0 - 0.3) / 3.4;
            assert!((f - expected).abs() < 1e-12, "F_{} = {}", i, f);
        }
    }

    #[test]
    fn test_plotting_positions_suspension_shifts_ranks() {
        // F(10), S(15), F(20): ranks 1 then 1 + (5 - 1) / (1 + 1) = 3
        let pos = plotting_positions(&[10.0, 20.0], &[15.0]);
        assert_eq!(pos.len(), 2);
        assert!((pos[0].1 - 0.7 / 3.4).abs() < 1e-12);
        assert!((pos[1].1 - 2.7 / 3.4).abs() < 1e-12);
    }

    #[test]
    fn test_plotting_positions_trailing_suspension() {
        let pos = plotting_positions(&[10.0, 20.0], &[100.0]);
        assert!((pos[0].1 - 0.7 / 3.4).abs() < 1e-12);
        assert!((pos[1].1 - 1.7 / 3.4).abs() < 1e-12);
    }

    #[test]
    fn test_anderson_darling_prefers_true_parameters() {
        let data: Vec<f64> = (1..=15)
            .map(|i| {
                let f = (i as f64 - 0.3) / 15.4;
                1000.0 * (-(1.0 - f).ln()).powf(0.5)
            })
            .collect();
        let good = anderson_darling(2.0, 1000.0, &data, &[]).expect("valid");
        let bad = anderson_darling(0.7, 300.0, &data, &[]).expect("valid");
        assert!(good < bad, "AD good = {}, bad = {}", good, bad);
        assert!(good.is_finite() && good >= -1e-9);
    }

    #[test]
    fn test_anderson_darling_invalid() {
        assert!(anderson_darling(2.0, 100.0, &[], &[50.0]).is_none());
        assert!(anderson_darling(0.0, 100.0, &[10.0], &[]).is_none());
        assert!(anderson_darling(2.0, -1.0, &[10.0], &[]).is_none());
    }
}
