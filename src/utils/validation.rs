//! Structural validation of transactions handed to the engine
//!
//! A missing or empty vendor is never an error (the vendor comparator
//! scores it neutrally); a malformed amount, date, or currency fails
//! fast so a bad extraction cannot masquerade as a low-scoring match.

use bigdecimal::{BigDecimal, ToPrimitive};

use crate::types::*;

/// Validate that an amount is positive and representable as a finite f64
pub fn validate_amount(amount: &BigDecimal, label: &str) -> MatchResult<()> {
    if *amount <= BigDecimal::from(0) {
        return Err(MatchError::Validation(format!(
            "{} amount must be positive, got {}",
            label, amount
        )));
    }

    match amount.to_f64() {
        Some(value) if value.is_finite() => Ok(()),
        _ => Err(MatchError::Validation(format!(
            "{} amount {} is out of representable range",
            label, amount
        ))),
    }
}

/// Validate that a currency code is a three-letter ISO 4217 code
pub fn validate_currency(currency: &str, label: &str) -> MatchResult<()> {
    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(MatchError::Validation(format!(
            "{} currency must be a three-letter ISO code, got '{}'",
            label, currency
        )));
    }

    Ok(())
}

/// Validate a source transaction before scoring
pub fn validate_source(source: &SourceTransaction) -> MatchResult<()> {
    validate_amount(&source.amount, "source")?;
    validate_currency(&source.currency, "source")?;
    Ok(())
}

/// Validate a target transaction before scoring
pub fn validate_target(target: &TargetTransaction) -> MatchResult<()> {
    validate_amount(&target.amount, &format!("target '{}'", target.id))?;
    validate_currency(&target.currency, &format!("target '{}'", target.id))?;
    Ok(())
}
