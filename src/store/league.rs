//! League store: users, tournaments, standings rows, and matches, all in
//! one SQLite file (`football.db` by default).

use rusqlite::{params, Connection, Row};
use serde::Serialize;
use std::path::Path;

use super::{
    is_unique_violation, open_connection, open_in_memory_connection, require_non_empty,
    require_non_negative, StoreError,
};
use crate::logic::{points_for, sort_standings, win_rate};
use crate::models::{
    Match, MatchStatus, MatchSummary, NewMatch, NewTournament, Role, TeamStanding, TeamStats,
    Tournament, TournamentStatus, User,
};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id       INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT UNIQUE NOT NULL,
    password TEXT NOT NULL,
    role     TEXT NOT NULL DEFAULT 'user'
);
CREATE TABLE IF NOT EXISTS tournaments (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    name       TEXT NOT NULL,
    type       TEXT NOT NULL,
    start_date TEXT,
    end_date   TEXT,
    venue      TEXT,
    status     TEXT NOT NULL DEFAULT 'Upcoming'
);
CREATE TABLE IF NOT EXISTS teams_in_tournament (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    tournament_id INTEGER NOT NULL REFERENCES tournaments(id),
    team_name     TEXT NOT NULL,
    played        INTEGER NOT NULL DEFAULT 0,
    won           INTEGER NOT NULL DEFAULT 0,
    drawn         INTEGER NOT NULL DEFAULT 0,
    lost          INTEGER NOT NULL DEFAULT 0,
    goals_for     INTEGER NOT NULL DEFAULT 0,
    goals_against INTEGER NOT NULL DEFAULT 0,
    points        INTEGER NOT NULL DEFAULT 0,
    UNIQUE (tournament_id, team_name)
);
CREATE TABLE IF NOT EXISTS matches (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    tournament_id INTEGER NOT NULL REFERENCES tournaments(id),
    home_team     TEXT NOT NULL,
    away_team     TEXT NOT NULL,
    match_date    TEXT,
    venue         TEXT,
    home_score    INTEGER,
    away_score    INTEGER,
    status        TEXT NOT NULL DEFAULT 'Scheduled'
);
";

/// Aggregate counts for the league dashboard screen.
#[derive(Clone, Debug, Serialize)]
pub struct LeagueDashboard {
    pub tournaments: i64,
    pub matches: i64,
    pub completed_matches: i64,
    pub teams: i64,
    pub recent_matches: Vec<MatchSummary>,
}

/// Handle on the league database. One connection, passed to every
/// operation; no globals.
pub struct LeagueStore {
    conn: Connection,
}

impl LeagueStore {
    /// Open (creating if needed) the league database at `path`.
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

    // ---- users ----

    /// Register a user. The password is bcrypt-hashed before it is stored;
    /// a taken username fails with `DuplicateUsername` and writes nothing.
    pub fn register(
        &self,
        username: &str,
        password: &str,
        role: Role,
    ) -> Result<User, StoreError> {
        let username = require_non_empty(username, "Username")?;
        if password.trim().is_empty() {
            return Err(StoreError::Validation(
                "Password must not be empty".to_string(),
            ));
        }
        let hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)?;
        self.conn
            .execute(
                "INSERT INTO users (username, password, role) VALUES (?1, ?2, ?3)",
                params![username, hash, role],
            )
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StoreError::DuplicateUsername
                } else {
                    e.into()
                }
            })?;
        Ok(User {
            id: self.conn.last_insert_rowid(),
            username,
            role,
        })
    }

    /// Check credentials. Unknown username and wrong password produce the
    /// same `InvalidCredentials`, so the response leaks nothing.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<User, StoreError> {
        let row = self
            .conn
            .query_row(
                "SELECT id, username, password, role FROM users WHERE username = ?1",
                params![username],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, Role>(3)?,
                    ))
                },
            );
        let (id, username, hash, role) = match row {
            Ok(r) => r,
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                return Err(StoreError::InvalidCredentials)
            }
            Err(e) => return Err(e.into()),
        };
        if !bcrypt::verify(password, &hash)? {
            return Err(StoreError::InvalidCredentials);
        }
        Ok(User { id, username, role })
    }

    // ---- tournaments ----

    pub fn create_tournament(&self, new: &NewTournament) -> Result<Tournament, StoreError> {
        let name = require_non_empty(&new.name, "Tournament name")?;
        self.conn.execute(
            "INSERT INTO tournaments (name, type, start_date, end_date, venue)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![name, new.kind, new.start_date, new.end_date, new.venue],
        )?;
        self.tournament(self.conn.last_insert_rowid())
    }

    /// All tournaments, most recently created first.
    pub fn tournaments(&self) -> Result<Vec<Tournament>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, type, start_date, end_date, venue, status
             FROM tournaments ORDER BY id DESC",
        )?;
        let rows = stmt.query_map([], tournament_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn tournament(&self, id: i64) -> Result<Tournament, StoreError> {
        Ok(self.conn.query_row(
            "SELECT id, name, type, start_date, end_date, venue, status
             FROM tournaments WHERE id = ?1",
            params![id],
            tournament_from_row,
        )?)
    }

    /// Advance a tournament's status. The chain is Upcoming → Ongoing →
    /// Completed and only forward moves are accepted.
    pub fn set_tournament_status(
        &self,
        id: i64,
        status: TournamentStatus,
    ) -> Result<Tournament, StoreError> {
        let current = self.tournament(id)?;
        if !current.status.can_advance_to(status) {
            return Err(StoreError::InvalidTransition);
        }
        self.conn.execute(
            "UPDATE tournaments SET status = ?1 WHERE id = ?2",
            params![status, id],
        )?;
        self.tournament(id)
    }

    /// Delete a tournament together with its standings rows and matches.
    /// One transaction; either everything goes or nothing does.
    pub fn delete_tournament(&mut self, id: i64) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM matches WHERE tournament_id = ?1", params![id])?;
        tx.execute(
            "DELETE FROM teams_in_tournament WHERE tournament_id = ?1",
            params![id],
        )?;
        let deleted = tx.execute("DELETE FROM tournaments WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Err(StoreError::NotFound);
        }
        tx.commit()?;
        Ok(())
    }

    // ---- standings ----

    /// Add a team to a tournament with a zeroed record. The name is
    /// unique within the tournament.
    pub fn add_team(&self, tournament_id: i64, team_name: &str) -> Result<TeamStanding, StoreError> {
        let team_name = require_non_empty(team_name, "Team name")?;
        self.tournament(tournament_id)?;
        self.conn
            .execute(
                "INSERT INTO teams_in_tournament (tournament_id, team_name) VALUES (?1, ?2)",
                params![tournament_id, team_name],
            )
            .map_err(|e| {
                if is_unique_violation(&e) {
                    StoreError::DuplicateTeam
                } else {
                    e.into()
                }
            })?;
        self.standing(self.conn.last_insert_rowid())
    }

    /// Remove one standings row by its id.
    pub fn remove_team(&self, standing_id: i64) -> Result<(), StoreError> {
        let deleted = self.conn.execute(
            "DELETE FROM teams_in_tournament WHERE id = ?1",
            params![standing_id],
        )?;
        if deleted == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    pub fn standing(&self, id: i64) -> Result<TeamStanding, StoreError> {
        Ok(self.conn.query_row(
            "SELECT id, tournament_id, team_name, played, won, drawn, lost,
                    goals_for, goals_against, points
             FROM teams_in_tournament WHERE id = ?1",
            params![id],
            standing_from_row,
        )?)
    }

    /// Standings table for one tournament, in display order: points desc,
    /// goal difference desc, goals for desc, ties in insertion order.
    pub fn standings(&self, tournament_id: i64) -> Result<Vec<TeamStanding>, StoreError> {
        self.tournament(tournament_id)?;
        let mut stmt = self.conn.prepare(
            "SELECT id, tournament_id, team_name, played, won, drawn, lost,
                    goals_for, goals_against, points
             FROM teams_in_tournament WHERE tournament_id = ?1 ORDER BY id ASC",
        )?;
        let rows = stmt.query_map(params![tournament_id], standing_from_row)?;
        let mut rows = rows.collect::<Result<Vec<_>, _>>()?;
        sort_standings(&mut rows);
        Ok(rows)
    }

    /// Team names in a tournament, for the match scheduling dropdowns.
    pub fn team_names(&self, tournament_id: i64) -> Result<Vec<String>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT team_name FROM teams_in_tournament WHERE tournament_id = ?1 ORDER BY id ASC",
        )?;
        let rows = stmt.query_map(params![tournament_id], |row| row.get(0))?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Overwrite a standings row's stats. Points are always recomputed
    /// from won/drawn here; the caller never supplies them.
    pub fn update_team_stats(
        &self,
        standing_id: i64,
        stats: &TeamStats,
    ) -> Result<TeamStanding, StoreError> {
        for (value, field) in [
            (stats.played, "Played"),
            (stats.won, "Won"),
            (stats.drawn, "Drawn"),
            (stats.lost, "Lost"),
            (stats.goals_for, "Goals for"),
            (stats.goals_against, "Goals against"),
        ] {
            require_non_negative(value, field)?;
        }
        let points = points_for(stats.won, stats.drawn);
        let updated = self.conn.execute(
            "UPDATE teams_in_tournament
             SET played = ?1, won = ?2, drawn = ?3, lost = ?4,
                 goals_for = ?5, goals_against = ?6, points = ?7
             WHERE id = ?8",
            params![
                stats.played,
                stats.won,
                stats.drawn,
                stats.lost,
                stats.goals_for,
                stats.goals_against,
                points,
                standing_id
            ],
        )?;
        if updated == 0 {
            return Err(StoreError::NotFound);
        }
        self.standing(standing_id)
    }

    // ---- matches ----

    /// Schedule a match. Home and away must be different teams; scores
    /// stay unset until a result is recorded.
    pub fn schedule_match(&self, new: &NewMatch) -> Result<Match, StoreError> {
        let home = require_non_empty(&new.home_team, "Home team")?;
        let away = require_non_empty(&new.away_team, "Away team")?;
        if home == away {
            return Err(StoreError::Validation(
                "Home and away teams must be different".to_string(),
            ));
        }
        self.tournament(new.tournament_id)?;
        self.conn.execute(
            "INSERT INTO matches (tournament_id, home_team, away_team, match_date, venue)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![new.tournament_id, home, away, new.match_date, new.venue],
        )?;
        self.match_by_id(self.conn.last_insert_rowid())
    }

    pub fn match_by_id(&self, id: i64) -> Result<Match, StoreError> {
        Ok(self.conn.query_row(
            "SELECT id, tournament_id, home_team, away_team, match_date, venue,
                    home_score, away_score, status
             FROM matches WHERE id = ?1",
            params![id],
            match_from_row,
        )?)
    }

    /// All matches with their tournament names, most recent first.
    pub fn matches(&self) -> Result<Vec<MatchSummary>, StoreError> {
        self.match_summaries(None)
    }

    fn match_summaries(&self, limit: Option<i64>) -> Result<Vec<MatchSummary>, StoreError> {
        let sql = format!(
            "SELECT m.id, t.name, m.home_team, m.home_score, m.away_score,
                    m.away_team, m.match_date, m.venue, m.status
             FROM matches m JOIN tournaments t ON m.tournament_id = t.id
             ORDER BY m.id DESC{}",
            match limit {
                Some(n) => format!(" LIMIT {}", n),
                None => String::new(),
            }
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| {
            Ok(MatchSummary {
                id: row.get(0)?,
                tournament: row.get(1)?,
                home_team: row.get(2)?,
                home_score: row.get(3)?,
                away_score: row.get(4)?,
                away_team: row.get(5)?,
                match_date: row.get(6)?,
                venue: row.get(7)?,
                status: row.get(8)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Record a result: set both scores and flip the match to Completed.
    /// One-way; there is no reopening a completed match.
    pub fn record_result(
        &self,
        match_id: i64,
        home_score: i64,
        away_score: i64,
    ) -> Result<Match, StoreError> {
        require_non_negative(home_score, "Home score")?;
        require_non_negative(away_score, "Away score")?;
        let updated = self.conn.execute(
            "UPDATE matches SET home_score = ?1, away_score = ?2, status = ?3 WHERE id = ?4",
            params![home_score, away_score, MatchStatus::Completed, match_id],
        )?;
        if updated == 0 {
            return Err(StoreError::NotFound);
        }
        self.match_by_id(match_id)
    }

    pub fn delete_match(&self, match_id: i64) -> Result<(), StoreError> {
        let deleted = self
            .conn
            .execute("DELETE FROM matches WHERE id = ?1", params![match_id])?;
        if deleted == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    /// Share of wins in a team's completed matches, from that team's
    /// perspective (scores flipped when it played away).
    pub fn team_win_rate(&self, team: &str) -> Result<f64, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT home_team, home_score, away_score FROM matches
             WHERE status = 'Completed' AND (home_team = ?1 OR away_team = ?1)",
        )?;
        let rows = stmt.query_map(params![team], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Option<i64>>(1)?,
                row.get::<_, Option<i64>>(2)?,
            ))
        })?;
        let mut scores = Vec::new();
        for row in rows {
            let (home_team, hs, aw) = row?;
            if home_team == team {
                scores.push((hs, aw));
            } else {
                scores.push((aw, hs));
            }
        }
        Ok(win_rate(&scores))
    }

    // ---- dashboard ----

    /// Aggregate counts plus the five most recent matches.
    pub fn dashboard(&self) -> Result<LeagueDashboard, StoreError> {
        let count = |sql: &str| -> Result<i64, StoreError> {
            Ok(self.conn.query_row(sql, [], |row| row.get(0))?)
        };
        Ok(LeagueDashboard {
            tournaments: count("SELECT COUNT(*) FROM tournaments")?,
            matches: count("SELECT COUNT(*) FROM matches")?,
            completed_matches: count("SELECT COUNT(*) FROM matches WHERE status = 'Completed'")?,
            teams: count("SELECT COUNT(DISTINCT team_name) FROM teams_in_tournament")?,
            recent_matches: self.match_summaries(Some(5))?,
        })
    }
}

fn tournament_from_row(row: &Row<'_>) -> rusqlite::Result<Tournament> {
    Ok(Tournament {
        id: row.get(0)?,
        name: row.get(1)?,
        kind: row.get(2)?,
        start_date: row.get(3)?,
        end_date: row.get(4)?,
        venue: row.get(5)?,
        status: row.get(6)?,
    })
}

fn standing_from_row(row: &Row<'_>) -> rusqlite::Result<TeamStanding> {
    Ok(TeamStanding {
        id: row.get(0)?,
        tournament_id: row.get(1)?,
        team_name: row.get(2)?,
        played: row.get(3)?,
        won: row.get(4)?,
        drawn: row.get(5)?,
        lost: row.get(6)?,
        goals_for: row.get(7)?,
        goals_against: row.get(8)?,
        points: row.get(9)?,
    })
}

fn match_from_row(row: &Row<'_>) -> rusqlite::Result<Match> {
    Ok(Match {
        id: row.get(0)?,
        tournament_id: row.get(1)?,
        home_team: row.get(2)?,
        away_team: row.get(3)?,
        match_date: row.get(4)?,
        venue: row.get(5)?,
        home_score: row.get(6)?,
        away_score: row.get(7)?,
        status: row.get(8)?,
    })
}
