//! Integration tests for the match result resolver.

use football_club_web::{outcome_for, resolve, win_rate, Match, MatchOutcome, MatchStatus};

fn completed(home: Option<i64>, away: Option<i64>) -> Match {
    Match {
        id: 1,
        tournament_id: 1,
        home_team: "Home".to_string(),
        away_team: "Away".to_string(),
        match_date: None,
        venue: None,
        home_score: home,
        away_score: away,
        status: MatchStatus::Completed,
    }
}

#[test]
fn resolve_classifies_from_home_perspective() {
    assert_eq!(resolve(Some(3), Some(1)), MatchOutcome::Win);
    assert_eq!(resolve(Some(0), Some(2)), MatchOutcome::Loss);
    assert_eq!(resolve(Some(2), Some(2)), MatchOutcome::Draw);
    assert_eq!(resolve(Some(0), Some(0)), MatchOutcome::Draw);
}

#[test]
fn resolve_treats_missing_scores_as_zero() {
    assert_eq!(resolve(None, None), MatchOutcome::Draw);
    assert_eq!(resolve(Some(1), None), MatchOutcome::Win);
    assert_eq!(resolve(None, Some(1)), MatchOutcome::Loss);
}

#[test]
fn resolve_is_total_over_non_negative_scores() {
    for h in 0..15 {
        for a in 0..15 {
            let expected = if h > a {
                MatchOutcome::Win
            } else if h < a {
                MatchOutcome::Loss
            } else {
                MatchOutcome::Draw
            };
            assert_eq!(resolve(Some(h), Some(a)), expected);
        }
    }
}

#[test]
fn scheduled_match_has_no_outcome() {
    let mut m = completed(None, None);
    m.status = MatchStatus::Scheduled;
    // Not yet played: no result, not a forced 0-0 draw.
    assert_eq!(outcome_for(&m), None);
}

#[test]
fn completed_match_has_an_outcome() {
    assert_eq!(outcome_for(&completed(Some(2), Some(0))), Some(MatchOutcome::Win));
    assert_eq!(outcome_for(&completed(Some(0), Some(0))), Some(MatchOutcome::Draw));
}

#[test]
fn win_rate_counts_wins_over_all_results() {
    assert_eq!(win_rate(&[]), 0.0);
    let scores = [
        (Some(2), Some(0)), // win
        (Some(1), Some(1)), // draw
        (Some(0), Some(3)), // loss
        (Some(4), Some(2)), // win
    ];
    assert!((win_rate(&scores) - 0.5).abs() < f64::EPSILON);
}
