//! Embedded SQLite storage. Two separate stores back the two prototypes
//! this app grew out of: the league store (users, tournaments, standings,
//! matches) and the club store (players, teams). Their schemas live in
//! different database files and are not interoperable.

mod club;
mod league;

pub use club::{ClubDashboard, ClubStore};
pub use league::{LeagueDashboard, LeagueStore};

use rusqlite::Connection;
use std::path::Path;

/// Errors from storage operations. Everything is local to the one
/// operation that raised it; nothing is retried.
#[derive(Debug)]
pub enum StoreError {
    /// Empty required field, equal home/away teams, out-of-range value.
    Validation(String),
    /// Username already registered.
    DuplicateUsername,
    /// Team name already present (in the tournament, or in the club).
    DuplicateTeam,
    /// Jersey number already taken.
    DuplicateJersey,
    /// The row being read, updated, or deleted does not exist.
    NotFound,
    /// Unknown username or wrong password.
    InvalidCredentials,
    /// Backwards tournament status move.
    InvalidTransition,
    /// Underlying SQLite failure.
    Sqlite(rusqlite::Error),
    /// Password hashing/verification failure.
    PasswordHash(bcrypt::BcryptError),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Validation(msg) => write!(f, "{}", msg),
            StoreError::DuplicateUsername => write!(f, "Username already exists"),
            StoreError::DuplicateTeam => write!(f, "Team already exists"),
            StoreError::DuplicateJersey => write!(f, "Jersey number already exists"),
            StoreError::NotFound => write!(f, "Not found"),
            StoreError::InvalidCredentials => write!(f, "Invalid username or password"),
            StoreError::InvalidTransition => write!(f, "Tournament status can only move forward"),
            StoreError::Sqlite(e) => write!(f, "Storage failure: {}", e),
            StoreError::PasswordHash(e) => write!(f, "Password hashing failure: {}", e),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Sqlite(e) => Some(e),
            StoreError::PasswordHash(e) => Some(e),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        match e {
            rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
            other => StoreError::Sqlite(other),
        }
    }
}

impl From<bcrypt::BcryptError> for StoreError {
    fn from(e: bcrypt::BcryptError) -> Self {
        StoreError::PasswordHash(e)
    }
}

/// UNIQUE or PRIMARY KEY constraint hit. Callers map this to the
/// duplicate variant that fits their operation.
pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
    )
}

/// Reject empty (after trim) required text fields.
pub(crate) fn require_non_empty(value: &str, field: &str) -> Result<String, StoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(StoreError::Validation(format!("{} must not be empty", field)));
    }
    Ok(trimmed.to_string())
}

/// Reject negative counts/scores.
pub(crate) fn require_non_negative(value: i64, field: &str) -> Result<i64, StoreError> {
    if value < 0 {
        return Err(StoreError::Validation(format!(
            "{} must not be negative",
            field
        )));
    }
    Ok(value)
}

pub(crate) fn open_connection(path: &Path) -> Result<Connection, StoreError> {
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    Ok(conn)
}

pub(crate) fn open_in_memory_connection() -> Result<Connection, StoreError> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    Ok(conn)
}
