//! Integration tests for the club store: player CRUD, search, and teams.

use football_club_web::{ClubStore, Formation, NewPlayer, StoreError, Team};

fn player(jersey: i64, name: &str, goals: i64) -> NewPlayer {
    NewPlayer {
        jersey,
        name: name.to_string(),
        age: 24,
        position: "Midfielder".to_string(),
        fitness: "Fit".to_string(),
        goals,
        injured: false,
        suspended: false,
    }
}

fn team(name: &str) -> Team {
    Team {
        name: name.to_string(),
        coach: "Coach".to_string(),
        staff_info: String::new(),
        formation: Formation::FourFourTwo,
    }
}

#[test]
fn add_and_list_players_ordered_by_jersey() {
    let store = ClubStore::open_in_memory().unwrap();
    store.add_player(&player(10, "Rivera", 12)).unwrap();
    store.add_player(&player(7, "Silva", 8)).unwrap();
    let all = store.players().unwrap();
    let jerseys: Vec<i64> = all.iter().map(|p| p.jersey).collect();
    assert_eq!(jerseys, [7, 10]);
    assert_eq!(all[0].team_assigned, None);
}

#[test]
fn duplicate_jersey_is_rejected() {
    let store = ClubStore::open_in_memory().unwrap();
    store.add_player(&player(9, "Okafor", 20)).unwrap();
    assert!(matches!(
        store.add_player(&player(9, "Other", 0)),
        Err(StoreError::DuplicateJersey)
    ));
}

#[test]
fn player_validation() {
    let store = ClubStore::open_in_memory().unwrap();
    assert!(matches!(
        store.add_player(&player(0, "NoJersey", 0)),
        Err(StoreError::Validation(_))
    ));
    assert!(matches!(
        store.add_player(&player(5, "  ", 0)),
        Err(StoreError::Validation(_))
    ));
    let mut negative = player(5, "Minus", 0);
    negative.goals = -3;
    assert!(matches!(
        store.add_player(&negative),
        Err(StoreError::Validation(_))
    ));
}

#[test]
fn update_overwrites_row_but_keeps_assignment() {
    let store = ClubStore::open_in_memory().unwrap();
    store.add_player(&player(11, "Keane", 3)).unwrap();
    store.save_team(&team("City")).unwrap();
    store.assign_player(11, "City").unwrap();

    let mut changed = player(11, "Keane", 7);
    changed.position = "Striker".to_string();
    changed.injured = true;
    let updated = store.update_player(11, &changed).unwrap();
    assert_eq!(updated.goals, 7);
    assert_eq!(updated.position, "Striker");
    assert!(updated.injured);
    // Whole-row overwrite does not touch the team assignment.
    assert_eq!(updated.team_assigned.as_deref(), Some("City"));
}

#[test]
fn delete_player_and_not_found() {
    let store = ClubStore::open_in_memory().unwrap();
    store.add_player(&player(4, "Mills", 0)).unwrap();
    store.delete_player(4).unwrap();
    assert!(matches!(store.delete_player(4), Err(StoreError::NotFound)));
    assert!(matches!(store.player(4), Err(StoreError::NotFound)));
}

#[test]
fn search_matches_name_substring_case_insensitively() {
    let store = ClubStore::open_in_memory().unwrap();
    store.add_player(&player(10, "Messner", 5)).unwrap();
    store.add_player(&player(11, "Ramesh", 2)).unwrap();
    store.add_player(&player(12, "Brook", 1)).unwrap();

    let hits = store.search_players("mes").unwrap();
    let names: Vec<&str> = hits.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Messner", "Ramesh"]);
}

#[test]
fn search_matches_exact_jersey_number() {
    let store = ClubStore::open_in_memory().unwrap();
    store.add_player(&player(7, "Silva", 8)).unwrap();
    store.add_player(&player(77, "Nunes", 1)).unwrap();

    let hits = store.search_players("7").unwrap();
    // Exact jersey match only: 77 does not match the query "7".
    let jerseys: Vec<i64> = hits.iter().map(|p| p.jersey).collect();
    assert_eq!(jerseys, [7]);
}

#[test]
fn top_scorer_and_total_goals() {
    let store = ClubStore::open_in_memory().unwrap();
    assert!(store.top_scorer().unwrap().is_none());
    assert_eq!(store.total_goals().unwrap(), 0);

    store.add_player(&player(9, "Okafor", 20)).unwrap();
    store.add_player(&player(10, "Rivera", 12)).unwrap();

    let top = store.top_scorer().unwrap().unwrap();
    assert_eq!(top.name, "Okafor");
    assert_eq!(store.total_goals().unwrap(), 32);

    let dash = store.dashboard().unwrap();
    assert_eq!(dash.players, 2);
    assert_eq!(dash.total_goals, 32);
}

#[test]
fn save_team_is_an_upsert() {
    let store = ClubStore::open_in_memory().unwrap();
    store.save_team(&team("City")).unwrap();
    let replaced = store
        .save_team(&Team {
            name: "City".to_string(),
            coach: "New Coach".to_string(),
            staff_info: "physio on staff".to_string(),
            formation: Formation::ThreeFiveTwo,
        })
        .unwrap();
    assert_eq!(replaced.coach, "New Coach");
    assert_eq!(replaced.formation, Formation::ThreeFiveTwo);
    assert_eq!(store.teams().unwrap().len(), 1);
}

#[test]
fn deleting_a_team_clears_assignments_but_keeps_players() {
    let store = ClubStore::open_in_memory().unwrap();
    store.save_team(&team("City")).unwrap();
    store.save_team(&team("Rangers")).unwrap();
    store.add_player(&player(7, "Silva", 8)).unwrap();
    store.add_player(&player(8, "Brook", 1)).unwrap();
    store.add_player(&player(9, "Okafor", 20)).unwrap();
    store.assign_player(7, "City").unwrap();
    store.assign_player(8, "City").unwrap();
    store.assign_player(9, "Rangers").unwrap();

    let mut store = store;
    store.delete_team("City").unwrap();

    // Players survive with their assignment cleared; other teams untouched.
    assert_eq!(store.players().unwrap().len(), 3);
    assert_eq!(store.player(7).unwrap().team_assigned, None);
    assert_eq!(store.player(8).unwrap().team_assigned, None);
    assert_eq!(store.player(9).unwrap().team_assigned.as_deref(), Some("Rangers"));
    assert_eq!(store.teams().unwrap().len(), 1);
}

#[test]
fn deleting_missing_team_is_not_found() {
    let mut store = ClubStore::open_in_memory().unwrap();
    assert!(matches!(store.delete_team("Ghosts"), Err(StoreError::NotFound)));
}

#[test]
fn assignment_requires_an_existing_team() {
    let store = ClubStore::open_in_memory().unwrap();
    store.add_player(&player(7, "Silva", 8)).unwrap();
    assert!(matches!(
        store.assign_player(7, "Nowhere"),
        Err(StoreError::NotFound)
    ));
}

#[test]
fn squad_lists_only_assigned_players() {
    let store = ClubStore::open_in_memory().unwrap();
    store.save_team(&team("City")).unwrap();
    store.add_player(&player(7, "Silva", 8)).unwrap();
    store.add_player(&player(10, "Rivera", 12)).unwrap();
    store.assign_player(10, "City").unwrap();

    let squad = store.squad("City").unwrap();
    assert_eq!(squad.len(), 1);
    assert_eq!(squad[0].name, "Rivera");

    store.unassign_player(10).unwrap();
    assert!(store.squad("City").unwrap().is_empty());
}
