//! Match result resolution: WIN/LOSS/DRAW from the home perspective.

use crate::models::{Match, MatchStatus};
use serde::{Deserialize, Serialize};

/// Outcome of a completed match, seen from the home (first) side.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchOutcome {
    Win,
    Loss,
    Draw,
}

/// Classify a pair of scores. Missing scores count as zero, so this is
/// total: any input, including (None, None), yields an outcome.
pub fn resolve(home: Option<i64>, away: Option<i64>) -> MatchOutcome {
    let h = home.unwrap_or(0);
    let a = away.unwrap_or(0);
    if h > a {
        MatchOutcome::Win
    } else if h < a {
        MatchOutcome::Loss
    } else {
        MatchOutcome::Draw
    }
}

/// Outcome of a match, or `None` while it is still scheduled. A match
/// without a recorded result has no outcome; it is not a 0-0 draw.
pub fn outcome_for(m: &Match) -> Option<MatchOutcome> {
    match m.status {
        MatchStatus::Scheduled => None,
        MatchStatus::Completed => Some(resolve(m.home_score, m.away_score)),
    }
}

/// Share of wins across a set of completed-match score pairs, in 0.0..=1.0.
pub fn win_rate(scores: &[(Option<i64>, Option<i64>)]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    let wins = scores
        .iter()
        .filter(|(h, a)| resolve(*h, *a) == MatchOutcome::Win)
        .count();
    wins as f64 / scores.len() as f64
}
