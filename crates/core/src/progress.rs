//! Dashboard rank and lab-progress bookkeeping.

use crate::error::CoreError;

/// Rank thresholds in ascending order: a total score at or above the
/// threshold earns the rank.
pub const RANKS: &[(i64, &str)] = &[
    (0, "Recruit"),
    (300, "Analyst"),
    (700, "Operative"),
    (1200, "Elite Operative"),
];

/// Number of recent completions shown on the dashboard.
pub const RECENT_ACTIVITY_LIMIT: i64 = 5;

/// Rank name for a total score.
pub fn rank_for_score(total_score: i64) -> &'static str {
    RANKS
        .iter()
        .rev()
        .find(|(threshold, _)| total_score >= *threshold)
        .map(|(_, name)| *name)
        .unwrap_or(RANKS[0].1)
}

/// Score needed to reach the next rank, or `None` at the top rank.
pub fn next_rank_threshold(total_score: i64) -> Option<i64> {
    RANKS
        .iter()
        .map(|(threshold, _)| *threshold)
        .find(|threshold| total_score < *threshold)
}

/// Validate a manually reported lab score against the lab's maximum.
pub fn validate_score(score: i32, max_score: u32) -> Result<(), CoreError> {
    if score < 0 || score as u32 > max_score {
        return Err(CoreError::Validation(format!(
            "Score must be between 0 and {max_score}"
        )));
    }
    Ok(())
}
