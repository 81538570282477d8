//! Method recommendation from fit quality metrics.
//!
//! Each metric awards at most one point, to the side that is strictly
//! better:
//!
//! | Metric            | Better |
//! |-------------------|--------|
//! | log-likelihood    | higher |
//! | Anderson-Darling  | lower  |
//! | AICc              | lower  |
//!
//! A metric is compared only when both sides have a value for it; a value
//! of zero is a value. Ties, including no comparable metric at all, fall
//! back to MLE.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::orchestrator::FitRecord;
use crate::weibull::FitMethod;

/// Text shown when neither method scores better.
pub const SIMILAR_FIT_TEXT: &str = "Both methods provide a very similar statistical fit.";

/// A quality metric used for scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Metric {
    LogLikelihood,
    AndersonDarling,
    Aicc,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::LogLikelihood, Metric::AndersonDarling, Metric::Aicc];

    fn value(self, record: &FitRecord) -> Option<f64> {
        match self {
            Self::LogLikelihood => record.loglik(),
            Self::AndersonDarling => record.ad(),
            Self::Aicc => record.aicc(),
        }
    }

    fn higher_is_better(self) -> bool {
        matches!(self, Self::LogLikelihood)
    }
}

/// Scoring outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Method to pre-select; MLE on a tie.
    pub recommended_method: FitMethod,
    /// Strictly better method, `None` on a tie.
    pub winner: Option<FitMethod>,
    pub mle_score: usize,
    pub rr_score: usize,
    /// Metrics that both sides had.
    pub metrics_compared: Vec<Metric>,
    pub text: String,
}

/// Compares the MLE and rank-regression records.
pub fn recommend(mle: &FitRecord, rr: &FitRecord) -> Recommendation {
    let mut mle_score = 0;
    let mut rr_score = 0;
    let mut metrics_compared = Vec::new();

    for metric in Metric::ALL {
        let (Some(m), Some(r)) = (metric.value(mle), metric.value(rr)) else {
            continue;
        };
        metrics_compared.push(metric);
        let (mle_better, rr_better) = if metric.higher_is_better() {
            (m > r, r > m)
        } else {
            (m < r, r < m)
        };
        if mle_better {
            mle_score += 1;
        } else if rr_better {
            rr_score += 1;
        }
    }

    let compared = metrics_compared.len();
    let (winner, text) = if mle_score > rr_score {
        (Some(FitMethod::Mle), winner_text(FitMethod::Mle, mle_score, compared))
    } else if rr_score > mle_score {
        (
            Some(FitMethod::RankRegression),
            winner_text(FitMethod::RankRegression, rr_score, compared),
        )
    } else {
        (None, SIMILAR_FIT_TEXT.to_string())
    };

    debug!(mle_score, rr_score, compared, ?winner, "scored fitting methods");

    Recommendation {
        recommended_method: winner.unwrap_or(FitMethod::Mle),
        winner,
        mle_score,
        rr_score,
        metrics_compared,
        text,
    }
}

fn winner_text(method: FitMethod, score: usize, compared: usize) -> String {
    format!(
        "{} is recommended, scoring better on {} out of {} metrics.",
        method.label(),
        score,
        compared
    )
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::orchestrator::FitSummary;
    use crate::pattern::FailurePattern;
    use proptest::prelude::*;

    fn arb_record() -> impl Strategy<Value = FitRecord> {
        prop_oneof![
            Just(FitRecord::Failed { error: "x".into() }),
            (-500.0_f64..0.0, 0.0_f64..5.0, proptest::option::of(0.0_f64..1000.0)).prop_map(
                |(loglik, ad, aicc)| FitRecord::Fitted(FitSummary {
                    beta: 1.5,
                    alpha: 100.0,
                    pattern: FailurePattern::AgeRelated,
                    loglik,
                    aicc,
                    ad,
                })
            ),
        ]
    }

    proptest! {
        #[test]
        fn scores_bounded_by_compared(mle in arb_record(), rr in arb_record()) {
            let rec = recommend(&mle, &rr);
            let n = rec.metrics_compared.len();
            prop_assert!(n <= 3);
            prop_assert!(rec.mle_score + rec.rr_score <= n);
            if rec.winner.is_none() {
                prop_assert_eq!(rec.mle_score, rec.rr_score);
                prop_assert_eq!(rec.recommended_method, FitMethod::Mle);
            }
        }

        #[test]
        fn swapping_sides_swaps_scores(mle in arb_record(), rr in arb_record()) {
            let a = recommend(&mle, &rr);
            let b = recommend(&rr, &mle);
            prop_assert_eq!(a.mle_score, b.rr_score);
            prop_assert_eq!(a.rr_score, b.mle_score);
        }
    }
}
