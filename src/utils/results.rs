//! Pure helpers over ranking results for callers and dashboards

use std::collections::HashMap;

use crate::types::*;

/// Best target id to act on: the confirmed match when there is one,
/// otherwise the strongest suggestion, otherwise nothing
pub fn best_target_id(result: &RankingResult) -> Option<&str> {
    if let Some(best) = result.best_match() {
        return Some(&best.target_id);
    }
    result.suggestions.first().map(|s| s.target_id.as_str())
}

/// Whether the result may be committed without human confirmation
pub fn can_auto_approve(result: &RankingResult) -> bool {
    result.status() == RankingStatus::Matched && !result.requires_review
}

/// Render a stable, greppable one-line summary of a ranking result
pub fn format_suggestion(result: &RankingResult) -> String {
    let suggestions: Vec<String> = result
        .suggestions
        .iter()
        .map(|s| {
            format!(
                "{}:{:.1}/{}",
                s.target_id,
                s.score,
                confidence_label(s.confidence)
            )
        })
        .collect();

    format!(
        "status={} review={} candidates={} suggestions=[{}] reason={}",
        status_label(result.status()),
        result.requires_review,
        result.stats.total_candidates,
        suggestions.join(", "),
        result.reason
    )
}

/// Results from a batch with the given status, keyed as in the batch
pub fn filter_by_status(
    batch: &BatchRankingResult,
    status: RankingStatus,
) -> HashMap<usize, &RankingResult> {
    batch
        .results
        .iter()
        .filter(|(_, result)| result.status() == status)
        .map(|(&index, result)| (index, result))
        .collect()
}

/// Results from a batch that need a human decision, keyed as in the batch
pub fn review_required(batch: &BatchRankingResult) -> HashMap<usize, &RankingResult> {
    batch
        .results
        .iter()
        .filter(|(_, result)| result.requires_review)
        .map(|(&index, result)| (index, result))
        .collect()
}

fn status_label(status: RankingStatus) -> &'static str {
    match status {
        RankingStatus::NoMatch => "no_match",
        RankingStatus::Matched => "matched",
        RankingStatus::MultipleMatches => "multiple_matches",
        RankingStatus::LowConfidence => "low_confidence",
    }
}

fn confidence_label(confidence: MatchConfidence) -> &'static str {
    match confidence {
        MatchConfidence::High => "HIGH",
        MatchConfidence::Medium => "MEDIUM",
        MatchConfidence::Low => "LOW",
    }
}
