//! Batch orchestration of the ranker over many source transactions
//!
//! Each source is independent: its candidate pool is fetched from the
//! provider (awaiting if the lookup is deferred) and ranked on its own.
//! A failed lookup, or a malformed source, is recorded against that one
//! position and never aborts the rest of the batch.

use std::collections::HashMap;

use crate::matching::ranker::Ranker;
use crate::traits::{CandidateProvider, ExchangeRateProvider};
use crate::types::*;

impl<R: ExchangeRateProvider> Ranker<R> {
    /// Rank every source against its own candidate pool and aggregate
    /// per-status tallies.
    ///
    /// Results are keyed by each source's position in the input
    /// sequence, so they stay addressable even when lookups complete in
    /// a different order than they were issued.
    pub async fn rank_matches_batch<P: CandidateProvider>(
        &self,
        sources: &[SourceTransaction],
        provider: &P,
        config: &RankingConfig,
    ) -> BatchRankingResult {
        let mut results: HashMap<usize, RankingResult> = HashMap::with_capacity(sources.len());
        let mut summary = BatchSummary::default();

        for (index, source) in sources.iter().enumerate() {
            let result = match provider.candidates_for(source, index).await {
                Ok(candidates) => match self.rank_matches(source, &candidates, config) {
                    Ok(result) => result,
                    Err(err) => unprocessed_result(format!("source could not be evaluated: {}", err)),
                },
                Err(err) => unprocessed_result(format!("candidate lookup failed: {}", err)),
            };

            summary.record(&result);
            results.insert(index, result);
        }

        BatchRankingResult { results, summary }
    }
}

/// Placeholder result for a source the batch could not process
fn unprocessed_result(reason: String) -> RankingResult {
    RankingResult {
        outcome: RankingOutcome::NoMatch,
        suggestions: Vec::new(),
        stats: RankingStats::default(),
        reason,
        requires_review: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::NoRates;
    use crate::utils::memory::MemoryCandidatePool;
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

    #[tokio::test]
    async fn test_batch_keys_follow_input_positions() {
        let d = date(2024, 1, 15);
        let pool = MemoryCandidatePool::new();
        pool.set_candidates(0, vec![target("t1", "100.00", d, "Starbucks")]);
        pool.set_candidates(1, Vec::new());

        let ranker = Ranker::new(NoRates);
        let sources = vec![
            source("100.00", d, "Starbucks"),
            source("42.00", d, "Grab"),
        ];

        let batch = ranker
            .rank_matches_batch(&sources, &pool, &RankingConfig::default())
            .await;

        assert_eq!(batch.results.len(), 2);
        assert_eq!(batch.results[&0].status(), RankingStatus::Matched);
        assert_eq!(batch.results[&1].status(), RankingStatus::NoMatch);
        assert_eq!(batch.summary.total, 2);
        assert_eq!(batch.summary.matched, 1);
        assert_eq!(batch.summary.no_match, 1);
    }

    #[tokio::test]
    async fn test_lookup_failure_is_local_to_one_source() {
        let d = date(2024, 1, 15);
        let pool = MemoryCandidatePool::new();
        pool.set_candidates(0, vec![target("t1", "100.00", d, "Starbucks")]);
        pool.fail_index(1, "ledger timeout");
        pool.set_candidates(2, vec![target("t2", "55.00", d, "Grab")]);

        let ranker = Ranker::new(NoRates);
        let sources = vec![
            source("100.00", d, "Starbucks"),
            source("12.00", d, "Uber"),
            source("55.00", d, "Grab"),
        ];

        let batch = ranker
            .rank_matches_batch(&sources, &pool, &RankingConfig::default())
            .await;

        assert_eq!(batch.summary.total, 3);
        assert_eq!(batch.summary.matched, 2);
        assert_eq!(batch.results[&1].status(), RankingStatus::NoMatch);
        assert!(batch.results[&1].reason.contains("ledger timeout"));
        assert!(batch.results[&1].reason.contains("candidate lookup failed"));
    }

    #[tokio::test]
    async fn test_malformed_source_does_not_abort_batch() {
        let d = date(2024, 1, 15);
        let pool = MemoryCandidatePool::new();
        pool.set_candidates(0, vec![target("t1", "100.00", d, "Starbucks")]);
        pool.set_candidates(1, vec![target("t2", "55.00", d, "Grab")]);

        let ranker = Ranker::new(NoRates);
        let sources = vec![
            SourceTransaction::new(BigDecimal::from(-10), "USD", d, "Broken"),
            source("55.00", d, "Grab"),
        ];

        let batch = ranker
            .rank_matches_batch(&sources, &pool, &RankingConfig::default())
            .await;

        assert_eq!(batch.results[&0].status(), RankingStatus::NoMatch);
        assert!(batch.results[&0].reason.contains("could not be evaluated"));
        assert_eq!(batch.results[&1].status(), RankingStatus::Matched);
    }

    #[tokio::test]
    async fn test_summary_counts_review_rollup() {
        let d = date(2024, 1, 15);
        let pool = MemoryCandidatePool::new();
        // two identical candidates force an ambiguous outcome
        pool.set_candidates(
            0,
            vec![
                target("t1", "100.00", d, "Starbucks"),
                target("t2", "100.00", d, "Starbucks"),
            ],
        );

        let ranker = Ranker::new(NoRates);
        let sources = vec![source("100.00", d, "Starbucks")];

        let batch = ranker
            .rank_matches_batch(&sources, &pool, &RankingConfig::default())
            .await;

        assert_eq!(batch.summary.multiple_matches, 1);
        assert_eq!(batch.summary.needs_review, 1);
    }
}
