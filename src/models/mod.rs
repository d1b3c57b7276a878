//! Data structures for the club: users, tournaments, standings, matches, players, teams.

mod matches;
mod player;
mod tournament;
mod user;

pub use matches::{Match, MatchStatus, MatchSummary, NewMatch};
pub use player::{Formation, NewPlayer, Player, Team};
pub use tournament::{
    NewTournament, TeamStanding, TeamStats, Tournament, TournamentStatus, TournamentType,
};
pub use user::{Role, User};
