//! Candidate ranking and match classification
//!
//! Runs the scorer across the whole candidate pool for one source
//! transaction, then applies the decision policy: matching floor,
//! auto-match threshold, and the clear-winner gap that separates an
//! unambiguous match from a set a human must choose between.

use std::cmp::Ordering;

use crate::matching::scorer::Scorer;
use crate::traits::ExchangeRateProvider;
use crate::types::*;

/// Ranks target candidates for a source transaction and classifies the
/// outcome according to a [`RankingConfig`] policy.
pub struct Ranker<R: ExchangeRateProvider> {
    scorer: Scorer<R>,
}

impl<R: ExchangeRateProvider> Ranker<R> {
    /// Create a ranker with a default-weighted scorer
    pub fn new(rates: R) -> Self {
        Self {
            scorer: Scorer::new(rates),
        }
    }

    /// Create a ranker around an existing scorer
    pub fn with_scorer(scorer: Scorer<R>) -> Self {
        Self { scorer }
    }

    /// The scorer backing this ranker
    pub fn scorer(&self) -> &Scorer<R> {
        &self.scorer
    }

    /// Score every candidate, apply the decision policy, and classify
    /// the outcome for one source transaction.
    ///
    /// Fails only when the source or a candidate is structurally
    /// invalid; an empty pool is a legitimate `no_match` outcome.
    pub fn rank_matches(
        &self,
        source: &SourceTransaction,
        candidates: &[TargetTransaction],
        config: &RankingConfig,
    ) -> MatchResult<RankingResult> {
        if candidates.is_empty() {
            return Ok(RankingResult {
                outcome: RankingOutcome::NoMatch,
                suggestions: Vec::new(),
                stats: RankingStats::default(),
                reason: "no candidates to evaluate".to_string(),
                requires_review: false,
            });
        }

        let mut scored = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            scored.push(self.scorer.score(source, candidate)?);
        }

        let total_candidates = scored.len();
        let avg_score = scored.iter().map(|c| c.score).sum::<f64>() / total_candidates as f64;
        let high_confidence_count = scored
            .iter()
            .filter(|c| c.confidence == MatchConfidence::High)
            .count();

        let mut matching: Vec<ScoredCandidate> = scored
            .into_iter()
            .filter(|c| c.score >= config.min_match_score)
            .collect();

        let stats = RankingStats {
            total_candidates,
            matching_candidates: matching.len(),
            high_confidence_count,
            avg_score,
        };

        if matching.is_empty() {
            return Ok(RankingResult {
                outcome: RankingOutcome::NoMatch,
                suggestions: Vec::new(),
                stats,
                reason: format!(
                    "no candidate reached the matching floor of {:.0}",
                    config.min_match_score
                ),
                requires_review: false,
            });
        }

        matching.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        matching.truncate(config.max_suggestions);
        let suggestions = matching;
        let top = suggestions[0].clone();

        if suggestions.len() == 1 {
            if top.confidence == MatchConfidence::Low {
                return Ok(RankingResult {
                    reason: format!(
                        "best candidate '{}' scored {:.1}, below the confidence threshold",
                        top.target_id, top.score
                    ),
                    outcome: RankingOutcome::LowConfidence,
                    suggestions,
                    stats,
                    requires_review: true,
                });
            }

            let requires_review = top.score < config.auto_match_threshold;
            let reason = if requires_review {
                format!(
                    "single match '{}' at {:.1}, below the auto-match threshold of {:.0}",
                    top.target_id, top.score, config.auto_match_threshold
                )
            } else {
                format!("single clear match '{}' at {:.1}", top.target_id, top.score)
            };
            return Ok(RankingResult {
                outcome: RankingOutcome::Matched { best_match: top },
                suggestions,
                stats,
                reason,
                requires_review,
            });
        }

        // An exact tie at the top is always ambiguous, whatever the
        // configured gap.
        let gap = top.score - suggestions[1].score;
        if top.score >= config.auto_match_threshold && gap > 0.0 && gap >= config.clear_winner_gap {
            Ok(RankingResult {
                reason: format!(
                    "clear winner '{}' leads the runner-up by {:.1} points",
                    top.target_id, gap
                ),
                outcome: RankingOutcome::Matched { best_match: top },
                suggestions,
                stats,
                requires_review: false,
            })
        } else {
            Ok(RankingResult {
                reason: format!(
                    "ambiguous: {} candidates within {:.1} points of the top score",
                    suggestions.len(),
                    gap
                ),
                outcome: RankingOutcome::MultipleMatches,
                suggestions,
                stats,
                requires_review: true,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::NoRates;
    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn source(amount: &str, d: NaiveDate, vendor: &str) -> SourceTransaction {
        SourceTransaction::new(BigDecimal::from_str(amount).unwrap(), "USD", d, vendor)
    }

    fn target(id: &str, amount: &str, d: NaiveDate, vendor: &str) -> TargetTransaction {
        TargetTransaction::new(id, BigDecimal::from_str(amount).unwrap(), "USD", d, vendor)
    }

    #[test]
    fn test_empty_pool_is_no_match() {
        let ranker = Ranker::new(NoRates);
        let result = ranker
            .rank_matches(
                &source("100.00", date(2024, 1, 15), "Starbucks"),
                &[],
                &RankingConfig::default(),
            )
            .unwrap();

        assert_eq!(result.status(), RankingStatus::NoMatch);
        assert!(result.suggestions.is_empty());
        assert!(result.best_match().is_none());
        assert!(!result.requires_review);
        assert_eq!(result.stats, RankingStats::default());
    }

    #[test]
    fn test_single_perfect_candidate_auto_matches() {
        let ranker = Ranker::new(NoRates);
        let d = date(2024, 1, 15);
        let result = ranker
            .rank_matches(
                &source("100.00", d, "Starbucks"),
                &[target("t1", "100.00", d, "Starbucks")],
                &RankingConfig::default(),
            )
            .unwrap();

        assert_eq!(result.status(), RankingStatus::Matched);
        let best = result.best_match().unwrap();
        assert_eq!(best.target_id, "t1");
        assert!((best.score - 100.0).abs() < 1e-9);
        assert!(!result.requires_review);
    }

    #[test]
    fn test_single_decent_candidate_needs_review() {
        let ranker = Ranker::new(NoRates);
        // amount and vendor agree, date five days off: solid but below
        // the auto-match threshold
        let result = ranker
            .rank_matches(
                &source("100.00", date(2024, 1, 15), "Starbucks"),
                &[target("t1", "100.00", date(2024, 1, 27), "Starbucks")],
                &RankingConfig::default(),
            )
            .unwrap();

        assert_eq!(result.status(), RankingStatus::Matched);
        assert!(result.requires_review);
        assert!(result.best_match().unwrap().score < 90.0);
    }

    #[test]
    fn test_single_weak_candidate_is_low_confidence() {
        let ranker = Ranker::new(NoRates);
        // far date and unrelated vendor drag the score into the low tier
        // while the amount keeps it above the matching floor
        let result = ranker
            .rank_matches(
                &source("100.00", date(2024, 1, 15), "Starbucks"),
                &[target("t1", "100.00", date(2024, 2, 2), "Delta Airlines")],
                &RankingConfig {
                    min_match_score: 40.0,
                    ..RankingConfig::default()
                },
            )
            .unwrap();

        assert_eq!(result.status(), RankingStatus::LowConfidence);
        assert!(result.best_match().is_none());
        assert!(result.requires_review);
        assert_eq!(result.suggestions.len(), 1);
    }

    #[test]
    fn test_exact_tie_is_always_ambiguous() {
        let ranker = Ranker::new(NoRates);
        let d = date(2024, 1, 15);
        let result = ranker
            .rank_matches(
                &source("100.00", d, "Starbucks"),
                &[
                    target("t1", "100.00", d, "Starbucks"),
                    target("t2", "100.00", d, "Starbucks"),
                ],
                &RankingConfig {
                    clear_winner_gap: 0.0,
                    ..RankingConfig::default()
                },
            )
            .unwrap();

        assert_eq!(result.status(), RankingStatus::MultipleMatches);
        assert!(result.best_match().is_none());
        assert_eq!(result.suggestions.len(), 2);
        assert!(result.requires_review);
    }

    #[test]
    fn test_clear_winner_over_runner_up() {
        let ranker = Ranker::new(NoRates);
        let d = date(2024, 1, 15);
        let result = ranker
            .rank_matches(
                &source("100.00", d, "Starbucks"),
                &[
                    target("t1", "100.00", d, "Starbucks"),
                    // same amount, but three weeks off and unrelated vendor
                    target("t2", "100.00", date(2024, 2, 5), "Acme Tools"),
                ],
                &RankingConfig {
                    min_match_score: 40.0,
                    ..RankingConfig::default()
                },
            )
            .unwrap();

        assert_eq!(result.status(), RankingStatus::Matched);
        assert_eq!(result.best_match().unwrap().target_id, "t1");
        assert!(!result.requires_review);
    }

    #[test]
    fn test_close_scores_are_ambiguous() {
        let ranker = Ranker::new(NoRates);
        let result = ranker
            .rank_matches(
                &source("100.00", date(2024, 1, 15), "Starbucks"),
                &[
                    target("t1", "100.00", date(2024, 1, 15), "Starbucks"),
                    target("t2", "100.00", date(2024, 1, 17), "Starbucks"),
                ],
                &RankingConfig::default(),
            )
            .unwrap();

        assert_eq!(result.status(), RankingStatus::MultipleMatches);
        assert!(result.requires_review);
    }

    #[test]
    fn test_suggestions_bounded_and_sorted() {
        let ranker = Ranker::new(NoRates);
        let src = source("100.00", date(2024, 1, 15), "Starbucks");
        let candidates: Vec<TargetTransaction> = (15..20)
            .map(|day| {
                target(
                    &format!("t{}", day),
                    "100.00",
                    date(2024, 1, day),
                    "Starbucks",
                )
            })
            .collect();

        let result = ranker
            .rank_matches(&src, &candidates, &RankingConfig::default())
            .unwrap();

        assert_eq!(result.stats.matching_candidates, 5);
        assert!(result.suggestions.len() <= 3);
        for pair in result.suggestions.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_stats_cover_all_candidates() {
        let ranker = Ranker::new(NoRates);
        let d = date(2024, 1, 15);
        let result = ranker
            .rank_matches(
                &source("100.00", d, "Starbucks"),
                &[
                    target("t1", "100.00", d, "Starbucks"),
                    target("t2", "500.00", date(2024, 3, 15), "Acme Tools"),
                ],
                &RankingConfig::default(),
            )
            .unwrap();

        assert_eq!(result.stats.total_candidates, 2);
        assert_eq!(result.stats.matching_candidates, 1);
        assert_eq!(result.stats.high_confidence_count, 1);
        // the average includes the sub-threshold candidate
        assert!(result.stats.avg_score < 100.0);
        assert!(result.stats.avg_score > 0.0);
    }

    #[test]
    fn test_raising_floor_never_adds_matches() {
        let ranker = Ranker::new(NoRates);
        let src = source("100.00", date(2024, 1, 15), "Starbucks");
        let candidates = [
            target("t1", "100.00", date(2024, 1, 15), "Starbucks"),
            target("t2", "104.00", date(2024, 1, 20), "Starbucks Reserve"),
            target("t3", "130.00", date(2024, 1, 25), "Starbeans"),
        ];

        let mut previous = usize::MAX;
        for floor in [40.0, 60.0, 80.0, 95.0] {
            let result = ranker
                .rank_matches(
                    &src,
                    &candidates,
                    &RankingConfig {
                        min_match_score: floor,
                        ..RankingConfig::default()
                    },
                )
                .unwrap();
            assert!(result.stats.matching_candidates <= previous);
            previous = result.stats.matching_candidates;
        }
    }

    #[test]
    fn test_invalid_candidate_propagates() {
        let ranker = Ranker::new(NoRates);
        let d = date(2024, 1, 15);
        let err = ranker
            .rank_matches(
                &source("100.00", d, "Starbucks"),
                &[TargetTransaction::new("t1", BigDecimal::from(0), "USD", d, "Starbucks")],
                &RankingConfig::default(),
            )
            .unwrap_err();

        assert!(matches!(err, MatchError::Validation(_)));
    }
}
