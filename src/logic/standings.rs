//! Standings arithmetic: points total and display ordering.

use crate::models::TeamStanding;

/// Points from a win/draw record: 3 per win, 1 per draw, 0 per loss.
/// Recomputed in full on every stats edit; nothing accumulates incrementally.
pub fn points_for(won: i64, drawn: i64) -> i64 {
    won * 3 + drawn
}

/// Order standings for display: points desc, then goal difference desc,
/// then goals scored desc. The sort is stable, so rows tied on all three
/// keys keep their input order.
pub fn sort_standings(rows: &mut [TeamStanding]) {
    rows.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then(b.goal_difference().cmp(&a.goal_difference()))
            .then(b.goals_for.cmp(&a.goals_for))
    });
}
