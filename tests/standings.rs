//! Integration tests for the standings calculator: points formula and
//! display ordering, both pure and through the league store.

use football_club_web::{
    points_for, sort_standings, LeagueStore, NewTournament, TeamStanding, TeamStats,
};

fn row(id: i64, name: &str, won: i64, drawn: i64, goals_for: i64, goals_against: i64) -> TeamStanding {
    TeamStanding {
        id,
        tournament_id: 1,
        team_name: name.to_string(),
        played: won + drawn,
        won,
        drawn,
        lost: 0,
        goals_for,
        goals_against,
        points: points_for(won, drawn),
    }
}

#[test]
fn points_are_three_per_win_plus_one_per_draw() {
    for won in 0..20 {
        for drawn in 0..20 {
            assert_eq!(points_for(won, drawn), won * 3 + drawn);
        }
    }
}

#[test]
fn points_ignore_played_lost_and_goals() {
    // Same won/drawn, wildly different goals: identical points.
    let a = row(1, "A", 4, 2, 30, 1);
    let b = row(2, "B", 4, 2, 0, 50);
    assert_eq!(a.points, b.points);
    assert_eq!(a.points, 14);
}

#[test]
fn sort_orders_by_points_then_goal_difference_then_goals_for() {
    let mut rows = vec![
        row(1, "LowPoints", 1, 0, 10, 0),   // 3 pts
        row(2, "HighPoints", 3, 0, 1, 0),   // 9 pts
        row(3, "MidGd", 2, 0, 5, 1),        // 6 pts, gd 4
        row(4, "MidGdBetter", 2, 0, 8, 1),  // 6 pts, gd 7
    ];
    sort_standings(&mut rows);
    let names: Vec<&str> = rows.iter().map(|r| r.team_name.as_str()).collect();
    assert_eq!(names, ["HighPoints", "MidGdBetter", "MidGd", "LowPoints"]);
}

#[test]
fn goals_for_breaks_equal_goal_difference() {
    // Both 6 pts, both gd 2; the 5-3 side ranks above the 2-0 side.
    let mut rows = vec![row(1, "TwoNil", 2, 0, 2, 0), row(2, "FiveThree", 2, 0, 5, 3)];
    sort_standings(&mut rows);
    assert_eq!(rows[0].team_name, "FiveThree");
    assert_eq!(rows[1].team_name, "TwoNil");
}

#[test]
fn full_ties_keep_input_order() {
    let mut rows = vec![
        row(1, "First", 2, 1, 4, 2),
        row(2, "Second", 2, 1, 4, 2),
        row(3, "Third", 2, 1, 4, 2),
    ];
    sort_standings(&mut rows);
    let names: Vec<&str> = rows.iter().map(|r| r.team_name.as_str()).collect();
    assert_eq!(names, ["First", "Second", "Third"]);
}

#[test]
fn cup_a_scenario_through_the_store() {
    let store = LeagueStore::open_in_memory().unwrap();
    let cup = store
        .create_tournament(&NewTournament {
            name: "Cup A".to_string(),
            kind: Default::default(),
            start_date: None,
            end_date: None,
            venue: None,
        })
        .unwrap();

    let red = store.add_team(cup.id, "Red").unwrap();
    let blue = store.add_team(cup.id, "Blue").unwrap();

    let red = store
        .update_team_stats(
            red.id,
            &TeamStats { played: 4, won: 3, drawn: 1, lost: 0, goals_for: 9, goals_against: 2 },
        )
        .unwrap();
    let blue = store
        .update_team_stats(
            blue.id,
            &TeamStats { played: 4, won: 1, drawn: 1, lost: 2, goals_for: 4, goals_against: 7 },
        )
        .unwrap();

    assert_eq!(red.points, 10);
    assert_eq!(blue.points, 4);

    let table = store.standings(cup.id).unwrap();
    let names: Vec<&str> = table.iter().map(|r| r.team_name.as_str()).collect();
    assert_eq!(names, ["Red", "Blue"]);
    assert_eq!(table[0].goal_difference(), 7);
}

#[test]
fn stats_update_recomputes_points_every_time() {
    let store = LeagueStore::open_in_memory().unwrap();
    let t = store
        .create_tournament(&NewTournament {
            name: "League".to_string(),
            kind: Default::default(),
            start_date: None,
            end_date: None,
            venue: None,
        })
        .unwrap();
    let team = store.add_team(t.id, "Rovers").unwrap();
    assert_eq!(team.points, 0);

    let up = store
        .update_team_stats(
            team.id,
            &TeamStats { played: 2, won: 2, drawn: 0, lost: 0, goals_for: 3, goals_against: 0 },
        )
        .unwrap();
    assert_eq!(up.points, 6);

    // Overwrite downwards: points follow the new record, nothing accumulates.
    let down = store
        .update_team_stats(
            team.id,
            &TeamStats { played: 1, won: 0, drawn: 1, lost: 0, goals_for: 1, goals_against: 1 },
        )
        .unwrap();
    assert_eq!(down.points, 1);
}
