//! # Reconciliation Core
//!
//! A transaction matching and ranking engine for reconciling financial
//! records from two independent sources: candidate "source transactions"
//! extracted from documents or bank-notification emails, and an existing
//! ledger of recorded "target transactions".
//!
//! ## Features
//!
//! - **Field comparators**: graded amount, date, vendor, and currency
//!   comparison with human-readable reasons
//! - **Weighted scoring**: deterministic, explainable 0-100 verdicts
//!   with confidence tiers and score caps
//! - **Decision policy**: configurable thresholds and clear-winner gap
//!   rules classify each source as matched, ambiguous, low-confidence,
//!   or unmatched
//! - **Batch ranking**: per-source candidate pools fetched through an
//!   async provider, with local failure recovery and summary statistics
//! - **Collaborator abstraction**: trait-based exchange-rate and
//!   candidate-pool lookups, with in-memory implementations for testing
//!
//! ## Quick Start
//!
//! ```rust
//! use reconciliation_core::{
//!     NoRates, Ranker, RankingConfig, SourceTransaction, TargetTransaction,
//! };
//! use bigdecimal::BigDecimal;
//! use chrono::NaiveDate;
//! use std::str::FromStr;
//!
//! let ranker = Ranker::new(NoRates);
//! let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
//! let source = SourceTransaction::new(
//!     BigDecimal::from_str("100.00").unwrap(), "USD", date, "Starbucks",
//! );
//! let candidates = vec![TargetTransaction::new(
//!     "txn-1", BigDecimal::from_str("100.00").unwrap(), "USD", date, "Starbucks",
//! )];
//!
//! let result = ranker
//!     .rank_matches(&source, &candidates, &RankingConfig::default())
//!     .unwrap();
//! assert!(result.best_match().is_some());
//! ```

pub mod matching;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use matching::*;
pub use traits::*;
pub use types::*;

// Re-export result utilities for convenience
pub use utils::{best_target_id, can_auto_approve, filter_by_status, format_suggestion, review_required};
pub use utils::{MemoryCandidatePool, MemoryRateTable};
