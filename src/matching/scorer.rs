//! Weighted scoring of one (source, target) pair

use serde::{Deserialize, Serialize};

use crate::matching::comparators;
use crate::traits::ExchangeRateProvider;
use crate::types::*;
use crate::utils::validation;

/// Overall score at or above which a candidate counts as a match for the
/// engine's own statistics, independent of caller-configured thresholds
const MATCH_SANITY_FLOOR: f64 = 50.0;

/// Ceiling applied when a cross-currency pair could not be converted
const UNRESOLVED_CURRENCY_CAP: f64 = 50.0;

/// Sub-score a comparator must exceed for its reason to count as
/// contributing evidence rather than noise
const REASON_FLOOR: f64 = 60.0;

/// Relative weights for combining field sub-scores into an overall
/// score. Currency is folded into the amount comparator's logic rather
/// than double-weighted here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    /// Weight of the amount sub-score
    pub amount: f64,
    /// Weight of the date sub-score
    pub date: f64,
    /// Weight of the vendor sub-score
    pub vendor: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            amount: 0.40,
            date: 0.30,
            vendor: 0.30,
        }
    }
}

/// Scores a source transaction against one target candidate.
///
/// Pure apart from the read-only exchange-rate lookup; repeated calls
/// over the same inputs produce identical verdicts.
pub struct Scorer<R: ExchangeRateProvider> {
    rates: R,
    weights: ScoreWeights,
}

impl<R: ExchangeRateProvider> Scorer<R> {
    /// Create a scorer with the default 40/30/30 weighting
    pub fn new(rates: R) -> Self {
        Self {
            rates,
            weights: ScoreWeights::default(),
        }
    }

    /// Create a scorer with custom weights
    pub fn with_weights(rates: R, weights: ScoreWeights) -> Self {
        Self { rates, weights }
    }

    /// The exchange-rate provider backing this scorer
    pub fn rates(&self) -> &R {
        &self.rates
    }

    /// Score one candidate pair, producing a graded, explainable verdict.
    ///
    /// Fails only on structurally invalid input; a missing exchange rate
    /// or vendor is a scored outcome, not an error.
    pub fn score(
        &self,
        source: &SourceTransaction,
        target: &TargetTransaction,
    ) -> MatchResult<ScoredCandidate> {
        validation::validate_source(source)?;
        validation::validate_target(target)?;

        let amount = comparators::compare_amount(source, target, &self.rates);
        let date = comparators::compare_date(source, target);
        let vendor = comparators::compare_vendor(source, target);
        let currency = comparators::compare_currency(source, target);

        let raw_overall = self.weights.amount * amount.field.score
            + self.weights.date * date.score
            + self.weights.vendor * vendor.score;

        let mut applied_caps = Vec::new();
        let mut overall = raw_overall.clamp(0.0, 100.0);

        if let Some(cap_reason) = amount.applied_cap {
            applied_caps.push(cap_reason);
            overall = overall.min(UNRESOLVED_CURRENCY_CAP);
        }

        let mut reasons = Vec::new();
        for field in [&amount.field, &date, &vendor, &currency] {
            if field.score > REASON_FLOOR {
                reasons.push(field.reason.clone());
            }
        }

        Ok(ScoredCandidate {
            target_id: target.id.clone(),
            score: overall,
            confidence: MatchConfidence::for_score(overall),
            is_match: overall >= MATCH_SANITY_FLOOR,
            details: ScoreDetails {
                amount: amount.field.score,
                date: date.score,
                vendor: vendor.score,
                currency: currency.score,
                overall,
            },
            reasons,
            applied_caps,
            is_cross_currency: amount.cross_currency,
        })
    }
}
