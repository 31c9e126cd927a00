//! Field-level comparators for transaction matching
//!
//! Each comparator looks at one attribute of a (source, target) pair and
//! returns a 0-100 sub-score with a human-readable reason. The weighted
//! combination into an overall verdict happens in the scorer.

use crate::traits::ExchangeRateProvider;
use crate::types::{SourceTransaction, TargetTransaction};
use bigdecimal::ToPrimitive;

/// Relative difference treated as equal (rounding and bank fees)
const AMOUNT_EXACT_BAND: f64 = 0.02;
/// Relative difference at which the amount score bottoms out
const AMOUNT_ZERO_BAND: f64 = 0.5;
/// Day delta at which the date score bottoms out
const DATE_ZERO_DAYS: f64 = 30.0;
/// Score for a normalized substring/prefix vendor relationship
const VENDOR_SUBSTRING_SCORE: f64 = 90.0;
/// Ceiling for fuzzy vendor similarity
const VENDOR_FUZZY_CEILING: f64 = 80.0;
/// Neutral score when a vendor name is missing on either side
const VENDOR_NEUTRAL_SCORE: f64 = 50.0;
/// Fixed penalty sub-score for mismatched currencies
const CURRENCY_MISMATCH_SCORE: f64 = 60.0;
/// Fixed amount sub-score when currencies differ and no rate exists
const AMOUNT_NO_RATE_SCORE: f64 = 40.0;

const EPSILON: f64 = 1e-9;

/// One comparator's verdict on a single field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldScore {
    /// Sub-score in [0, 100]
    pub score: f64,
    /// Short explanation of how the sub-score came about
    pub reason: String,
}

/// Amount comparison result, including the cross-currency bookkeeping
/// the scorer needs for capping
#[derive(Debug, Clone, PartialEq)]
pub struct AmountComparison {
    /// The amount sub-score and reason
    pub field: FieldScore,
    /// Whether the pair carries different currencies
    pub cross_currency: bool,
    /// Cap reason recorded when the comparison could not be resolved
    pub applied_cap: Option<String>,
}

/// Compare transaction amounts, converting across currencies when a rate
/// is available for the source's date.
pub fn compare_amount(
    source: &SourceTransaction,
    target: &TargetTransaction,
    rates: &dyn ExchangeRateProvider,
) -> AmountComparison {
    let source_amount = source.amount.to_f64().unwrap_or(0.0);
    let target_amount = target.amount.to_f64().unwrap_or(0.0);

    let cross_currency = !source.currency.eq_ignore_ascii_case(&target.currency);

    if !cross_currency {
        return AmountComparison {
            field: score_relative_difference(source_amount, target_amount, None),
            cross_currency: false,
            applied_cap: None,
        };
    }

    match rates.rate(source.date, &target.currency, &source.currency) {
        Some(rate) => AmountComparison {
            field: score_relative_difference(
                source_amount,
                target_amount * rate,
                Some(&target.currency),
            ),
            cross_currency: true,
            applied_cap: None,
        },
        None => AmountComparison {
            field: FieldScore {
                score: AMOUNT_NO_RATE_SCORE,
                reason: "currency mismatch, no rate".to_string(),
            },
            cross_currency: true,
            applied_cap: Some(format!(
                "no exchange rate for {}->{} on {}",
                target.currency, source.currency, source.date
            )),
        },
    }
}

/// Score two amounts already expressed in the same currency.
///
/// Full marks inside the 2% tolerance band, linear decay to zero at a
/// 50% relative difference.
fn score_relative_difference(
    source_amount: f64,
    target_amount: f64,
    converted_from: Option<&str>,
) -> FieldScore {
    let diff = (source_amount - target_amount).abs();
    let base = source_amount.max(target_amount).max(EPSILON);
    let relative = diff / base;

    let score = if relative <= AMOUNT_EXACT_BAND {
        100.0
    } else if relative >= AMOUNT_ZERO_BAND {
        0.0
    } else {
        100.0 * (AMOUNT_ZERO_BAND - relative) / (AMOUNT_ZERO_BAND - AMOUNT_EXACT_BAND)
    };

    let suffix = match converted_from {
        Some(currency) => format!(" (converted from {})", currency),
        None => String::new(),
    };

    FieldScore {
        score,
        reason: format!("amounts within {:.1}% of each other{}", relative * 100.0, suffix),
    }
}

/// Compare transaction dates.
///
/// Financial institutions routinely post a few days after the event, so
/// the decay stays forgiving in the first week: three days apart still
/// scores 90.
pub fn compare_date(source: &SourceTransaction, target: &TargetTransaction) -> FieldScore {
    let delta = (source.date - target.date).num_days().abs();
    let score = (100.0 * (1.0 - delta as f64 / DATE_ZERO_DAYS)).clamp(0.0, 100.0);

    FieldScore {
        score,
        reason: format!("dates {} day(s) apart", delta),
    }
}

/// Compare vendor names after normalization.
///
/// Exact normalized equality scores 100, a prefix/substring relation 90
/// (catches abbreviations like "Grab" vs "GrabFood"), anything else a
/// fuzzy similarity scaled into 0-80. A missing vendor on either side is
/// absence of evidence, not evidence of absence, and scores neutrally.
pub fn compare_vendor(source: &SourceTransaction, target: &TargetTransaction) -> FieldScore {
    let source_tokens = normalize_vendor(&source.vendor);
    let target_tokens = normalize_vendor(&target.vendor);

    if source_tokens.is_empty() || target_tokens.is_empty() {
        return FieldScore {
            score: VENDOR_NEUTRAL_SCORE,
            reason: "vendor unavailable".to_string(),
        };
    }

    let source_joined = source_tokens.join("");
    let target_joined = target_tokens.join("");

    if source_joined == target_joined {
        return FieldScore {
            score: 100.0,
            reason: "vendor names identical".to_string(),
        };
    }

    if source_joined.contains(&target_joined) || target_joined.contains(&source_joined) {
        return FieldScore {
            score: VENDOR_SUBSTRING_SCORE,
            reason: "one vendor name contains the other".to_string(),
        };
    }

    let overlap = token_overlap(&source_tokens, &target_tokens);
    let edit = levenshtein_ratio(&source_joined, &target_joined);
    let similarity = overlap.max(edit);

    FieldScore {
        score: VENDOR_FUZZY_CEILING * similarity,
        reason: format!("vendor similarity {:.0}%", similarity * 100.0),
    }
}

/// Compare currency codes.
///
/// Binary by design: the actual amount reconciliation under a currency
/// mismatch is the amount comparator's job.
pub fn compare_currency(source: &SourceTransaction, target: &TargetTransaction) -> FieldScore {
    if source.currency.eq_ignore_ascii_case(&target.currency) {
        FieldScore {
            score: 100.0,
            reason: format!("currency match ({})", source.currency.to_ascii_uppercase()),
        }
    } else {
        FieldScore {
            score: CURRENCY_MISMATCH_SCORE,
            reason: format!(
                "currency differs ({} vs {})",
                source.currency.to_ascii_uppercase(),
                target.currency.to_ascii_uppercase()
            ),
        }
    }
}

/// Normalize a vendor name into lowercase alphanumeric tokens, folding
/// common Latin diacritics and dropping punctuation.
pub fn normalize_vendor(vendor: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();

    for c in vendor.chars() {
        for lower in c.to_lowercase() {
            let folded = fold_diacritic(lower);
            if folded.is_alphanumeric() {
                current.push(folded);
            } else if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

/// Map common accented Latin characters onto their base letter
fn fold_diacritic(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        'ý' | 'ÿ' => 'y',
        other => other,
    }
}

/// Jaccard overlap between two token sets
fn token_overlap(a: &[String], b: &[String]) -> f64 {
    use std::collections::HashSet;

    let set_a: HashSet<&str> = a.iter().map(|s| s.as_str()).collect();
    let set_b: HashSet<&str> = b.iter().map(|s| s.as_str()).collect();

    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();

    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

/// Similarity ratio in [0, 1] derived from edit distance
fn levenshtein_ratio(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f64 / longest as f64
}

/// Classic single-row Levenshtein distance over characters
fn levenshtein(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    let mut row: Vec<usize> = (0..=b_chars.len()).collect();

    for (i, ca) in a_chars.iter().enumerate() {
        let mut previous_diagonal = row[0];
        row[0] = i + 1;

        for (j, cb) in b_chars.iter().enumerate() {
            let substitution_cost = if ca == cb { 0 } else { 1 };
            let next = (previous_diagonal + substitution_cost)
                .min(row[j] + 1)
                .min(row[j + 1] + 1);
            previous_diagonal = row[j + 1];
            row[j + 1] = next;
        }
    }

    row[b_chars.len()]
}
