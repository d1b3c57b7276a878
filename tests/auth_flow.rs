//! Integration tests for registration and login against the league store.

use football_club_web::{LeagueStore, Role, StoreError};

#[test]
fn register_then_login_returns_stored_role() {
    let store = LeagueStore::open_in_memory().unwrap();
    let user = store.register("alex", "secret", Role::Manager).unwrap();
    assert_eq!(user.username, "alex");
    assert_eq!(user.role, Role::Manager);

    let logged_in = store.authenticate("alex", "secret").unwrap();
    assert_eq!(logged_in.role, Role::Manager);
    assert_eq!(logged_in.id, user.id);
}

#[test]
fn duplicate_username_fails_and_keeps_one_row() {
    let store = LeagueStore::open_in_memory().unwrap();
    store.register("sam", "first-password", Role::User).unwrap();
    let second = store.register("sam", "other-password", Role::Admin);
    assert!(matches!(second, Err(StoreError::DuplicateUsername)));

    // The original row is untouched: its password still works, the
    // rejected one never does.
    assert!(store.authenticate("sam", "first-password").is_ok());
    assert!(matches!(
        store.authenticate("sam", "other-password"),
        Err(StoreError::InvalidCredentials)
    ));
}

#[test]
fn empty_username_or_password_is_rejected_before_any_write() {
    let store = LeagueStore::open_in_memory().unwrap();
    assert!(matches!(
        store.register("   ", "pw", Role::User),
        Err(StoreError::Validation(_))
    ));
    assert!(matches!(
        store.register("casey", "   ", Role::User),
        Err(StoreError::Validation(_))
    ));
    // Nothing was written for the empty-password attempt.
    assert!(matches!(
        store.authenticate("casey", "   "),
        Err(StoreError::InvalidCredentials)
    ));
}

#[test]
fn wrong_password_and_unknown_user_fail_the_same_way() {
    let store = LeagueStore::open_in_memory().unwrap();
    store.register("jo", "right", Role::User).unwrap();
    assert!(matches!(
        store.authenticate("jo", "wrong"),
        Err(StoreError::InvalidCredentials)
    ));
    assert!(matches!(
        store.authenticate("nobody", "right"),
        Err(StoreError::InvalidCredentials)
    ));
}

#[test]
fn username_lookup_is_case_sensitive() {
    let store = LeagueStore::open_in_memory().unwrap();
    store.register("Drew", "pw", Role::User).unwrap();
    assert!(matches!(
        store.authenticate("drew", "pw"),
        Err(StoreError::InvalidCredentials)
    ));
}

#[test]
fn passwords_are_not_stored_in_clear_text() {
    // Registering with one string and authenticating with a prefix or
    // suffix of it must fail; only the exact password verifies.
    let store = LeagueStore::open_in_memory().unwrap();
    store.register("kit", "hunter2", Role::User).unwrap();
    assert!(matches!(
        store.authenticate("kit", "hunter"),
        Err(StoreError::InvalidCredentials)
    ));
    assert!(store.authenticate("kit", "hunter2").is_ok());
}
