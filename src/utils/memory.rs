//! In-memory collaborator implementations for testing and development

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::traits::*;
use crate::types::*;

/// In-memory exchange-rate table keyed by date and currency pair
#[derive(Debug, Clone, Default)]
pub struct MemoryRateTable {
    rates: Arc<RwLock<HashMap<(NaiveDate, String, String), f64>>>,
}

impl MemoryRateTable {
    /// Create an empty rate table
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the rate converting one unit of `from` into `to` on the
    /// given date. The inverse direction is derived automatically.
    pub fn set_rate(&self, date: NaiveDate, from: &str, to: &str, rate: f64) {
        let mut rates = self.rates.write().unwrap();
        rates.insert((date, normalize(from), normalize(to)), rate);
        if rate != 0.0 {
            rates.insert((date, normalize(to), normalize(from)), 1.0 / rate);
        }
    }

    /// Drop every stored rate (useful for testing)
    pub fn clear(&self) {
        self.rates.write().unwrap().clear();
    }
}

fn normalize(currency: &str) -> String {
    currency.to_ascii_uppercase()
}

impl ExchangeRateProvider for MemoryRateTable {
    fn rate(&self, date: NaiveDate, from: &str, to: &str) -> Option<f64> {
        if normalize(from) == normalize(to) {
            return Some(1.0);
        }
        self.rates
            .read()
            .unwrap()
            .get(&(date, normalize(from), normalize(to)))
            .copied()
    }
}

/// In-memory candidate pool keyed by source position, with the ability
/// to make individual lookups fail for exercising batch recovery
#[derive(Debug, Clone, Default)]
pub struct MemoryCandidatePool {
    pools: Arc<RwLock<HashMap<usize, Vec<TargetTransaction>>>>,
    failing: Arc<RwLock<HashMap<usize, String>>>,
}

impl MemoryCandidatePool {
    /// Create an empty pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the candidate list returned for the source at `index`
    pub fn set_candidates(&self, index: usize, candidates: Vec<TargetTransaction>) {
        self.pools.write().unwrap().insert(index, candidates);
        self.failing.write().unwrap().remove(&index);
    }

    /// Make the lookup for `index` fail with the given message
    pub fn fail_index(&self, index: usize, message: &str) {
        self.failing
            .write()
            .unwrap()
            .insert(index, message.to_string());
        self.pools.write().unwrap().remove(&index);
    }
}

#[async_trait]
impl CandidateProvider for MemoryCandidatePool {
    async fn candidates_for(
        &self,
        _source: &SourceTransaction,
        index: usize,
    ) -> MatchResult<Vec<TargetTransaction>> {
        if let Some(message) = self.failing.read().unwrap().get(&index) {
            return Err(MatchError::CandidateLookup(message.clone()));
        }
        Ok(self
            .pools
            .read()
            .unwrap()
            .get(&index)
            .cloned()
            .unwrap_or_default())
    }
}
