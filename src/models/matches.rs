//! Matches within a tournament: scheduling, scores, status.

use chrono::NaiveDate;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::ToSql;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lifecycle of a match. One-way: a recorded result completes the match.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Scheduled,
    Completed,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Scheduled => "Scheduled",
            MatchStatus::Completed => "Completed",
        }
    }
}

impl FromStr for MatchStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Scheduled" => Ok(MatchStatus::Scheduled),
            "Completed" => Ok(MatchStatus::Completed),
            _ => Err(()),
        }
    }
}

impl ToSql for MatchStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for MatchStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str()?.parse().map_err(|_| FromSqlError::InvalidType)
    }
}

/// A single match. Scores stay `None` until a result is recorded; while
/// Scheduled the stored zeros mean nothing and are not a 0-0 draw.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: i64,
    pub tournament_id: i64,
    pub home_team: String,
    pub away_team: String,
    pub match_date: Option<NaiveDate>,
    pub venue: Option<String>,
    pub home_score: Option<i64>,
    pub away_score: Option<i64>,
    pub status: MatchStatus,
}

/// Payload for scheduling a match. Teams must differ; scores start unset.
#[derive(Clone, Debug, Deserialize)]
pub struct NewMatch {
    pub tournament_id: i64,
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub match_date: Option<NaiveDate>,
    #[serde(default)]
    pub venue: Option<String>,
}

/// Match joined with its tournament name (list views and the dashboard).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub id: i64,
    pub tournament: String,
    pub home_team: String,
    pub home_score: Option<i64>,
    pub away_score: Option<i64>,
    pub away_team: String,
    pub match_date: Option<NaiveDate>,
    pub venue: Option<String>,
    pub status: MatchStatus,
}
