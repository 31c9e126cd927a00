//! Bank feed matching example

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use reconciliation_core::{
    can_auto_approve, format_suggestion, review_required, MemoryCandidatePool, MemoryRateTable,
    Ranker, RankingConfig, SourceTransaction, TargetTransaction,
};
use std::str::FromStr;
use uuid::Uuid;

fn ledger_entry(amount: &str, currency: &str, date: NaiveDate, vendor: &str) -> TargetTransaction {
    TargetTransaction::new(
        Uuid::new_v4().to_string(),
        BigDecimal::from_str(amount).unwrap(),
        currency,
        date,
        vendor,
    )
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🏦 Reconciliation Core - Bank Feed Matching Example\n");

    let jan_15 = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
    let jan_17 = NaiveDate::from_ymd_opt(2024, 1, 17).unwrap();

    // Exchange rates the amount comparator can fall back on for
    // cross-currency candidates
    let rates = MemoryRateTable::new();
    rates.set_rate(jan_15, "EUR", "USD", 1.0870);
    let ranker = Ranker::new(rates);

    // 1. Source transactions extracted from bank notification emails
    println!("📨 Extracted source transactions...");
    let sources = vec![
        SourceTransaction::new(
            BigDecimal::from_str("4.85")?,
            "USD",
            jan_15,
            "Starbucks Coffee",
        ),
        SourceTransaction::new(BigDecimal::from_str("23.40")?, "USD", jan_15, "GrabFood"),
        SourceTransaction::new(BigDecimal::from_str("412.00")?, "USD", jan_15, "Lufthansa"),
    ];
    for source in &sources {
        println!("  ✓ {} {} on {} at {}", source.amount, source.currency, source.date, source.vendor);
    }
    println!();

    // 2. Candidate pools the ledger collaborator would supply per source
    let pool = MemoryCandidatePool::new();
    pool.set_candidates(
        0,
        vec![
            ledger_entry("4.85", "USD", jan_15, "Starbucks"),
            ledger_entry("4.85", "USD", jan_17, "Starbucks"),
        ],
    );
    pool.set_candidates(1, vec![ledger_entry("23.40", "USD", jan_17, "Grab")]);
    pool.set_candidates(2, vec![ledger_entry("379.00", "EUR", jan_15, "Lufthansa AG")]);

    // 3. Rank the whole feed in one batch
    println!("🔍 Ranking candidates...\n");
    let batch = ranker
        .rank_matches_batch(&sources, &pool, &RankingConfig::default())
        .await;

    let mut indices: Vec<&usize> = batch.results.keys().collect();
    indices.sort();
    for index in indices {
        let result = &batch.results[index];
        println!("  [{}] {}", index, format_suggestion(result));
        if can_auto_approve(result) {
            println!("      → auto-approved");
        }
    }
    println!();

    // 4. Summary for the review dashboard
    println!("📊 Batch summary");
    println!("  total:            {}", batch.summary.total);
    println!("  matched:          {}", batch.summary.matched);
    println!("  multiple matches: {}", batch.summary.multiple_matches);
    println!("  low confidence:   {}", batch.summary.low_confidence);
    println!("  no match:         {}", batch.summary.no_match);
    println!("  needs review:     {}", batch.summary.needs_review);
    println!();

    let review = review_required(&batch);
    println!("👤 {} source(s) routed to a human reviewer", review.len());

    Ok(())
}
