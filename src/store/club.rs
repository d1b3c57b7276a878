//! Club store: jersey-keyed players and name-keyed teams, in their own
//! SQLite file (`soccer.db` by default). Separate schema from the league
//! store; the two are not interoperable.

use rusqlite::{params, Connection, Row};
use serde::Serialize;
use std::path::Path;

use super::{
    is_unique_violation, open_connection, open_in_memory_connection, require_non_empty,
    require_non_negative, StoreError,
};
use crate::models::{NewPlayer, Player, Team};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS players (
    jersey        INTEGER PRIMARY KEY,
    name          TEXT NOT NULL,
    age           INTEGER NOT NULL DEFAULT 0,
    position      TEXT NOT NULL DEFAULT '',
    fitness       TEXT NOT NULL DEFAULT '',
    goals         INTEGER NOT NULL DEFAULT 0,
    injured       INTEGER NOT NULL DEFAULT 0,
    suspended     INTEGER NOT NULL DEFAULT 0,
    team_assigned TEXT
);
CREATE TABLE IF NOT EXISTS teams (
    team_name  TEXT PRIMARY KEY,
    coach      TEXT NOT NULL DEFAULT '',
    staff_info TEXT NOT NULL DEFAULT '',
    formation  TEXT NOT NULL DEFAULT '4-4-2'
);
";

/// Aggregate roster numbers for the club dashboard.
#[derive(Clone, Debug, Serialize)]
pub struct ClubDashboard {
    pub players: i64,
    pub teams: i64,
    pub total_goals: i64,
    pub top_scorer: Option<Player>,
}

/// Handle on the club database.
pub struct ClubStore {
    conn: Connection,
}

impl ClubStore {
    /// Open (creating if needed) the club database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = open_connection(path.as_ref())?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// In-memory store for tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = open_in_memory_connection()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    // ---- players ----

    /// Add a player. The jersey number is the primary key; a taken number
    /// fails with `DuplicateJersey`.
    pub fn add_player(&self, new: &NewPlayer) -> Result<Player, StoreError> {
        let name = require_non_empty(&new.name, "Name")?;
        self.validate_player(new)?;
        self.conn
            .execute(
                "INSERT INTO players (jersey, name, age, position, fitness, goals, injured, suspended)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    new.jersey,
                    name,
                    new.age,
                    new.position.trim(),
                    new.fitness.trim(),
                    new.goals,
                    new.injured,
                    new.suspended
                ],
            )
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StoreError::DuplicateJersey
                } else {
                    e.into()
                }
            })?;
        self.player(new.jersey)
    }

    fn validate_player(&self, new: &NewPlayer) -> Result<(), StoreError> {
        if new.jersey <= 0 {
            return Err(StoreError::Validation(
                "Jersey number must be positive".to_string(),
            ));
        }
        require_non_negative(new.age, "Age")?;
        require_non_negative(new.goals, "Goals")?;
        Ok(())
    }

    /// Whole roster ordered by jersey number, the way the squad table
    /// shows it.
    pub fn players(&self) -> Result<Vec<Player>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT jersey, name, age, position, fitness, goals, injured, suspended, team_assigned
             FROM players ORDER BY jersey ASC",
        )?;
        let rows = stmt.query_map([], player_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn player(&self, jersey: i64) -> Result<Player, StoreError> {
        Ok(self.conn.query_row(
            "SELECT jersey, name, age, position, fitness, goals, injured, suspended, team_assigned
             FROM players WHERE jersey = ?1",
            params![jersey],
            player_from_row,
        )?)
    }

    /// Overwrite a player's row (full update, not a patch). The jersey
    /// key and team assignment are left untouched.
    pub fn update_player(&self, jersey: i64, new: &NewPlayer) -> Result<Player, StoreError> {
        let name = require_non_empty(&new.name, "Name")?;
        require_non_negative(new.age, "Age")?;
        require_non_negative(new.goals, "Goals")?;
        let updated = self.conn.execute(
            "UPDATE players
             SET name = ?1, age = ?2, position = ?3, fitness = ?4,
                 goals = ?5, injured = ?6, suspended = ?7
             WHERE jersey = ?8",
            params![
                name,
                new.age,
                new.position.trim(),
                new.fitness.trim(),
                new.goals,
                new.injured,
                new.suspended,
                jersey
            ],
        )?;
        if updated == 0 {
            return Err(StoreError::NotFound);
        }
        self.player(jersey)
    }

    pub fn delete_player(&self, jersey: i64) -> Result<(), StoreError> {
        let deleted = self
            .conn
            .execute("DELETE FROM players WHERE jersey = ?1", params![jersey])?;
        if deleted == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    /// Search by case-insensitive name substring, or by exact jersey
    /// number when the query parses as one.
    pub fn search_players(&self, query: &str) -> Result<Vec<Player>, StoreError> {
        let jersey: Option<i64> = query.trim().parse().ok();
        let mut stmt = self.conn.prepare(
            "SELECT jersey, name, age, position, fitness, goals, injured, suspended, team_assigned
             FROM players WHERE name LIKE '%' || ?1 || '%' OR jersey = ?2
             ORDER BY jersey ASC",
        )?;
        let rows = stmt.query_map(params![query.trim(), jersey], player_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// The player with the most goals, if any players exist.
    pub fn top_scorer(&self) -> Result<Option<Player>, StoreError> {
        let result = self.conn.query_row(
            "SELECT jersey, name, age, position, fitness, goals, injured, suspended, team_assigned
             FROM players ORDER BY goals DESC, jersey ASC LIMIT 1",
            [],
            player_from_row,
        );
        match result {
            Ok(p) => Ok(Some(p)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Goals summed over the whole roster.
    pub fn total_goals(&self) -> Result<i64, StoreError> {
        Ok(self.conn.query_row(
            "SELECT COALESCE(SUM(goals), 0) FROM players",
            [],
            |row| row.get(0),
        )?)
    }

    // ---- teams ----

    /// Create or overwrite a team (the lineup builder saves by name).
    pub fn save_team(&self, team: &Team) -> Result<Team, StoreError> {
        let name = require_non_empty(&team.name, "Team name")?;
        self.conn.execute(
            "INSERT OR REPLACE INTO teams (team_name, coach, staff_info, formation)
             VALUES (?1, ?2, ?3, ?4)",
            params![name, team.coach.trim(), team.staff_info.trim(), team.formation],
        )?;
        self.team(&name)
    }

    pub fn teams(&self) -> Result<Vec<Team>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT team_name, coach, staff_info, formation FROM teams ORDER BY team_name ASC",
        )?;
        let rows = stmt.query_map([], team_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn team(&self, name: &str) -> Result<Team, StoreError> {
        Ok(self.conn.query_row(
            "SELECT team_name, coach, staff_info, formation FROM teams WHERE team_name = ?1",
            params![name],
            team_from_row,
        )?)
    }

    /// Delete a team. Its players stay, with their assignment cleared;
    /// both writes happen in one transaction.
    pub fn delete_team(&mut self, name: &str) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "UPDATE players SET team_assigned = NULL WHERE team_assigned = ?1",
            params![name],
        )?;
        let deleted = tx.execute("DELETE FROM teams WHERE team_name = ?1", params![name])?;
        if deleted == 0 {
            return Err(StoreError::NotFound);
        }
        tx.commit()?;
        Ok(())
    }

    /// Assign a player to a team. The team must exist.
    pub fn assign_player(&self, jersey: i64, team: &str) -> Result<Player, StoreError> {
        self.team(team)?;
        let updated = self.conn.execute(
            "UPDATE players SET team_assigned = ?1 WHERE jersey = ?2",
            params![team, jersey],
        )?;
        if updated == 0 {
            return Err(StoreError::NotFound);
        }
        self.player(jersey)
    }

    /// Clear a player's team assignment.
    pub fn unassign_player(&self, jersey: i64) -> Result<Player, StoreError> {
        let updated = self.conn.execute(
            "UPDATE players SET team_assigned = NULL WHERE jersey = ?1",
            params![jersey],
        )?;
        if updated == 0 {
            return Err(StoreError::NotFound);
        }
        self.player(jersey)
    }

    /// Players currently assigned to the given team.
    pub fn squad(&self, team: &str) -> Result<Vec<Player>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT jersey, name, age, position, fitness, goals, injured, suspended, team_assigned
             FROM players WHERE team_assigned = ?1 ORDER BY jersey ASC",
        )?;
        let rows = stmt.query_map(params![team], player_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    // ---- dashboard ----

    pub fn dashboard(&self) -> Result<ClubDashboard, StoreError> {
        let count = |sql: &str| -> Result<i64, StoreError> {
            Ok(self.conn.query_row(sql, [], |row| row.get(0))?)
        };
        Ok(ClubDashboard {
            players: count("SELECT COUNT(*) FROM players")?,
            teams: count("SELECT COUNT(*) FROM teams")?,
            total_goals: self.total_goals()?,
            top_scorer: self.top_scorer()?,
        })
    }
}

fn player_from_row(row: &Row<'_>) -> rusqlite::Result<Player> {
    Ok(Player {
        jersey: row.get(0)?,
        name: row.get(1)?,
        age: row.get(2)?,
        position: row.get(3)?,
        fitness: row.get(4)?,
        goals: row.get(5)?,
        injured: row.get(6)?,
        suspended: row.get(7)?,
        team_assigned: row.get(8)?,
    })
}

fn team_from_row(row: &Row<'_>) -> rusqlite::Result<Team> {
    Ok(Team {
        name: row.get(0)?,
        coach: row.get(1)?,
        staff_info: row.get(2)?,
        formation: row.get(3)?,
    })
}
