//! Transaction matching and ranking engine
//!
//! Data flows one direction: a source transaction and its candidate
//! pool go through the [`Scorer`] per pair, the [`Ranker`] per source,
//! and the batch entry point per source set.

pub mod batch;
pub mod comparators;
pub mod ranker;
pub mod scorer;

pub use comparators::{AmountComparison, FieldScore};
pub use ranker::Ranker;
pub use scorer::{ScoreWeights, Scorer};
