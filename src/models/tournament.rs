//! Tournaments and their standings rows (league store).

use chrono::NaiveDate;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::ToSql;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Competition format of a tournament.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentType {
    #[default]
    League,
    Knockout,
    GroupStage,
}

impl TournamentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TournamentType::League => "League",
            TournamentType::Knockout => "Knockout",
            TournamentType::GroupStage => "Group Stage",
        }
    }
}

impl FromStr for TournamentType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "League" => Ok(TournamentType::League),
            "Knockout" => Ok(TournamentType::Knockout),
            "Group Stage" => Ok(TournamentType::GroupStage),
            _ => Err(()),
        }
    }
}

impl ToSql for TournamentType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for TournamentType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str()?.parse().map_err(|_| FromSqlError::InvalidType)
    }
}

/// Lifecycle of a tournament. Transitions only move forward.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    #[default]
    Upcoming,
    Ongoing,
    Completed,
}

impl TournamentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TournamentStatus::Upcoming => "Upcoming",
            TournamentStatus::Ongoing => "Ongoing",
            TournamentStatus::Completed => "Completed",
        }
    }

    fn rank(self) -> u8 {
        match self {
            TournamentStatus::Upcoming => 0,
            TournamentStatus::Ongoing => 1,
            TournamentStatus::Completed => 2,
        }
    }

    /// Whether moving from `self` to `next` is a forward transition.
    pub fn can_advance_to(self, next: TournamentStatus) -> bool {
        self.rank() < next.rank()
    }
}

impl FromStr for TournamentStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Upcoming" => Ok(TournamentStatus::Upcoming),
            "Ongoing" => Ok(TournamentStatus::Ongoing),
            "Completed" => Ok(TournamentStatus::Completed),
            _ => Err(()),
        }
    }
}

impl ToSql for TournamentStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for TournamentStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str()?.parse().map_err(|_| FromSqlError::InvalidType)
    }
}

/// A tournament row.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TournamentType,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub venue: Option<String>,
    pub status: TournamentStatus,
}

/// Payload for creating a tournament. Status always starts Upcoming.
#[derive(Clone, Debug, Deserialize)]
pub struct NewTournament {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: TournamentType,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub venue: Option<String>,
}

/// One team's aggregated record within a tournament (a standings row).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TeamStanding {
    pub id: i64,
    pub tournament_id: i64,
    pub team_name: String,
    pub played: i64,
    pub won: i64,
    pub drawn: i64,
    pub lost: i64,
    pub goals_for: i64,
    pub goals_against: i64,
    pub points: i64,
}

impl TeamStanding {
    /// Goal difference, derived at read time (never stored).
    pub fn goal_difference(&self) -> i64 {
        self.goals_for - self.goals_against
    }
}

/// Full stats overwrite for a standings row. Points are recomputed, not submitted.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct TeamStats {
    pub played: i64,
    pub won: i64,
    pub drawn: i64,
    pub lost: i64,
    pub goals_for: i64,
    pub goals_against: i64,
}
