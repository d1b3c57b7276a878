//! Football club management: library with models, domain logic, and storage.

pub mod logic;
pub mod models;
pub mod store;

pub use logic::{outcome_for, points_for, resolve, sort_standings, win_rate, MatchOutcome};
pub use models::{
    Formation, Match, MatchStatus, MatchSummary, NewMatch, NewPlayer, NewTournament, Player, Role,
    Team, TeamStanding, TeamStats, Tournament, TournamentStatus, TournamentType, User,
};
pub use store::{ClubDashboard, ClubStore, LeagueDashboard, LeagueStore, StoreError};
