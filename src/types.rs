//! Core types and data structures for the matching engine

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A candidate-for-reconciliation record extracted from an external
/// document (bank notification, statement line, parsed email).
///
/// Source transactions have no identity of their own; they are the query
/// side of a match and are never mutated by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceTransaction {
    /// Transaction amount in major currency units (must be positive)
    pub amount: BigDecimal,
    /// ISO 4217 currency code (e.g. "USD", "INR")
    pub currency: String,
    /// Calendar date of the transaction event
    pub date: NaiveDate,
    /// Free-text merchant/payer name; empty when extraction found none
    pub vendor: String,
}

impl SourceTransaction {
    /// Create a new source transaction
    pub fn new(
        amount: BigDecimal,
        currency: impl Into<String>,
        date: NaiveDate,
        vendor: impl Into<String>,
    ) -> Self {
        Self {
            amount,
            currency: currency.into(),
            date,
            vendor: vendor.into(),
        }
    }
}

/// An existing ledger entry considered as the real-world counterpart of
/// a source transaction. Supplied in bulk by the caller as the candidate
/// pool; the engine never mutates or persists these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetTransaction {
    /// Opaque stable identifier assigned by the ledger
    pub id: String,
    /// Transaction amount in major currency units
    pub amount: BigDecimal,
    /// ISO 4217 currency code
    pub currency: String,
    /// Calendar date the ledger recorded for the transaction
    pub date: NaiveDate,
    /// Merchant/payer name as recorded in the ledger
    pub vendor: String,
}

impl TargetTransaction {
    /// Create a new target transaction
    pub fn new(
        id: impl Into<String>,
        amount: BigDecimal,
        currency: impl Into<String>,
        date: NaiveDate,
        vendor: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            amount,
            currency: currency.into(),
            date,
            vendor: vendor.into(),
        }
    }
}

/// Coarse bucketing of a numeric score used for decision branching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MatchConfidence {
    /// Overall score of 90 or above
    High,
    /// Overall score in [70, 90)
    Medium,
    /// Overall score below 70
    Low,
}

impl MatchConfidence {
    /// Derive the confidence tier for an overall score
    pub fn for_score(overall: f64) -> Self {
        if overall >= 90.0 {
            MatchConfidence::High
        } else if overall >= 70.0 {
            MatchConfidence::Medium
        } else {
            MatchConfidence::Low
        }
    }
}

/// Per-field breakdown of how a candidate scored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreDetails {
    /// Amount comparator sub-score (0-100)
    pub amount: f64,
    /// Date comparator sub-score (0-100)
    pub date: f64,
    /// Vendor comparator sub-score (0-100)
    pub vendor: f64,
    /// Currency comparator sub-score (0-100)
    pub currency: f64,
    /// Weighted overall score after caps (0-100)
    pub overall: f64,
}

/// The engine's verdict on one (source, target) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    /// Identifier of the target transaction that was scored
    pub target_id: String,
    /// Weighted overall score (0-100)
    pub score: f64,
    /// Confidence tier derived from the overall score
    pub confidence: MatchConfidence,
    /// Whether the score clears the engine's internal sanity floor (50),
    /// deliberately looser than any caller-configured threshold
    pub is_match: bool,
    /// Per-field breakdown of the score
    pub details: ScoreDetails,
    /// Explanations from fields that contributed positive evidence
    pub reasons: Vec<String>,
    /// Reasons the score was ceiling-capped, if any
    pub applied_caps: Vec<String>,
    /// Whether the two transactions carry different currencies
    pub is_cross_currency: bool,
}

/// Status of a ranking outcome, useful for filtering and reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingStatus {
    /// No candidate cleared the matching floor
    NoMatch,
    /// A single unambiguous best match was found
    Matched,
    /// Several candidates are plausible and a human must choose
    MultipleMatches,
    /// The only plausible candidate scored too low to trust
    LowConfidence,
}

/// Classified outcome of ranking one source transaction.
///
/// The best match is carried inside the `Matched` variant so callers can
/// never read one under any other status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RankingOutcome {
    /// No candidate cleared the matching floor
    NoMatch,
    /// A single unambiguous best match
    Matched {
        /// The winning candidate
        best_match: ScoredCandidate,
    },
    /// Two or more candidates are plausible
    MultipleMatches,
    /// The best candidate exists but scored in the low tier
    LowConfidence,
}

impl RankingOutcome {
    /// The status tag for this outcome
    pub fn status(&self) -> RankingStatus {
        match self {
            RankingOutcome::NoMatch => RankingStatus::NoMatch,
            RankingOutcome::Matched { .. } => RankingStatus::Matched,
            RankingOutcome::MultipleMatches => RankingStatus::MultipleMatches,
            RankingOutcome::LowConfidence => RankingStatus::LowConfidence,
        }
    }
}

/// Aggregate statistics over every candidate scored for one source
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RankingStats {
    /// Size of the candidate pool that was scored
    pub total_candidates: usize,
    /// Candidates at or above the configured matching floor
    pub matching_candidates: usize,
    /// Candidates in the HIGH confidence tier
    pub high_confidence_count: usize,
    /// Mean overall score across all candidates, matching or not
    pub avg_score: f64,
}

/// The outcome for one source transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingResult {
    /// Classified outcome, carrying the best match when there is one
    #[serde(flatten)]
    pub outcome: RankingOutcome,
    /// Top candidates sorted by descending score, bounded by
    /// `RankingConfig::max_suggestions`
    pub suggestions: Vec<ScoredCandidate>,
    /// Statistics over the whole candidate pool
    pub stats: RankingStats,
    /// Human-readable explanation of the outcome
    pub reason: String,
    /// Whether a human must confirm before the match is acted on
    pub requires_review: bool,
}

impl RankingResult {
    /// The status tag for this result
    pub fn status(&self) -> RankingStatus {
        self.outcome.status()
    }

    /// The winning candidate, present only for `Matched` results
    pub fn best_match(&self) -> Option<&ScoredCandidate> {
        match &self.outcome {
            RankingOutcome::Matched { best_match } => Some(best_match),
            _ => None,
        }
    }
}

/// Caller-tunable decision policy for the ranker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Floor an overall score must reach for a candidate to count as
    /// matching at all
    pub min_match_score: f64,
    /// Score floor for review-free auto-acceptance
    pub auto_match_threshold: f64,
    /// Minimum score lead the top candidate must hold over the
    /// runner-up to be unambiguous
    pub clear_winner_gap: f64,
    /// Maximum number of suggestions returned per source
    pub max_suggestions: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            min_match_score: 60.0,
            auto_match_threshold: 90.0,
            clear_winner_gap: 15.0,
            max_suggestions: 3,
        }
    }
}

/// Per-status tallies over a batch run
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Number of source transactions processed
    pub total: usize,
    /// Sources that resolved to a single match
    pub matched: usize,
    /// Sources with no plausible candidate
    pub no_match: usize,
    /// Sources with an ambiguous candidate set
    pub multiple_matches: usize,
    /// Sources whose best candidate scored too low to trust
    pub low_confidence: usize,
    /// Sources that require human review before acting
    pub needs_review: usize,
}

impl BatchSummary {
    /// Fold one ranking result into the tallies
    pub fn record(&mut self, result: &RankingResult) {
        self.total += 1;
        match result.status() {
            RankingStatus::Matched => self.matched += 1,
            RankingStatus::NoMatch => self.no_match += 1,
            RankingStatus::MultipleMatches => self.multiple_matches += 1,
            RankingStatus::LowConfidence => self.low_confidence += 1,
        }
        if result.requires_review {
            self.needs_review += 1;
        }
    }
}

/// Outcome of ranking a whole batch of source transactions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRankingResult {
    /// Ranking result per source, keyed by the source's position in the
    /// input sequence
    pub results: HashMap<usize, RankingResult>,
    /// Per-status tallies for dashboarding
    pub summary: BatchSummary,
}

/// Errors that can occur in the matching engine
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Candidate lookup failed: {0}")]
    CandidateLookup(String),
}

/// Result type for matching operations
pub type MatchResult<T> = Result<T, MatchError>;
