//! Roster data structures (club store): players and teams.

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::ToSql;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Tactical formation, from the fixed set the lineup builder offers.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum Formation {
    #[default]
    #[serde(rename = "4-4-2")]
    FourFourTwo,
    #[serde(rename = "4-3-3")]
    FourThreeThree,
    #[serde(rename = "3-5-2")]
    ThreeFiveTwo,
    #[serde(rename = "4-2-3-1")]
    FourTwoThreeOne,
    #[serde(rename = "5-4-1")]
    FiveFourOne,
}

impl Formation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Formation::FourFourTwo => "4-4-2",
            Formation::FourThreeThree => "4-3-3",
            Formation::ThreeFiveTwo => "3-5-2",
            Formation::FourTwoThreeOne => "4-2-3-1",
            Formation::FiveFourOne => "5-4-1",
        }
    }
}

impl FromStr for Formation {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "4-4-2" => Ok(Formation::FourFourTwo),
            "4-3-3" => Ok(Formation::FourThreeThree),
            "3-5-2" => Ok(Formation::ThreeFiveTwo),
            "4-2-3-1" => Ok(Formation::FourTwoThreeOne),
            "5-4-1" => Ok(Formation::FiveFourOne),
            _ => Err(()),
        }
    }
}

impl ToSql for Formation {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for Formation {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str()?.parse().map_err(|_| FromSqlError::InvalidType)
    }
}

/// A squad player, keyed by jersey number.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub jersey: i64,
    pub name: String,
    pub age: i64,
    pub position: String,
    pub fitness: String,
    pub goals: i64,
    pub injured: bool,
    pub suspended: bool,
    /// Team name, when assigned. Cleared (not deleted) when the team goes away.
    pub team_assigned: Option<String>,
}

/// Payload for creating or overwriting a player. Team assignment is managed
/// separately and survives a whole-row update.
#[derive(Clone, Debug, Deserialize)]
pub struct NewPlayer {
    pub jersey: i64,
    pub name: String,
    #[serde(default)]
    pub age: i64,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub fitness: String,
    #[serde(default)]
    pub goals: i64,
    #[serde(default)]
    pub injured: bool,
    #[serde(default)]
    pub suspended: bool,
}

/// A club team, keyed by name. Saving is an upsert.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    #[serde(default)]
    pub coach: String,
    #[serde(default)]
    pub staff_info: String,
    #[serde(default)]
    pub formation: Formation,
}
