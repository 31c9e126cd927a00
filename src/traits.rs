//! Traits for collaborator abstraction at the engine boundary

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::types::*;

/// Exchange-rate lookup used when a source and target carry different
/// currencies.
///
/// The scorer is synchronous, so this trait is too; providers backed by
/// a remote service should pre-fetch or cache the rates they need. Any
/// provider-side failure (timeout, unknown pair) must be expressed as
/// `None` — a missing rate is a scored outcome, never an error.
pub trait ExchangeRateProvider: Send + Sync {
    /// Rate that converts one unit of `from` into `to` on the given date,
    /// or `None` when no rate is available
    fn rate(&self, date: NaiveDate, from: &str, to: &str) -> Option<f64>;
}

/// Provider that never has a rate; cross-currency pairs score capped
pub struct NoRates;

impl ExchangeRateProvider for NoRates {
    fn rate(&self, _date: NaiveDate, _from: &str, _to: &str) -> Option<f64> {
        None
    }
}

/// Candidate-pool retrieval for batch ranking.
///
/// This abstracts the ledger query: implementations may answer from
/// memory immediately or run a per-source database lookup. The batch
/// ranker treats a failure here as local to that one source.
#[async_trait]
pub trait CandidateProvider: Send + Sync {
    /// Fetch the candidate pool for the source at the given position in
    /// the batch input
    async fn candidates_for(
        &self,
        source: &SourceTransaction,
        index: usize,
    ) -> MatchResult<Vec<TargetTransaction>>;
}
