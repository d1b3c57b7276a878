//! Single binary web server: HTML from templates/, static from /static, API via REST.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT,
//! LEAGUE_DB (default football.db), CLUB_DB (default soccer.db).

use actix_files::Files;
use actix_session::{storage::CookieSessionStore, Session, SessionMiddleware};
use actix_web::cookie::Key;
use actix_web::{
    delete, get, post, put,
    web::{self, Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use football_club_web::{
    logic, ClubStore, LeagueStore, NewMatch, NewPlayer, NewTournament, Role, StoreError, Team,
    TeamStats, TournamentStatus,
};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// League database handle, shared across workers.
type LeagueState = Data<Mutex<LeagueStore>>;
/// Club database handle, shared across workers.
type ClubState = Data<Mutex<ClubStore>>;

/// Logged-in identity kept in the cookie session.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct SessionUser {
    username: String,
    role: Role,
}

const SESSION_USER_KEY: &str = "user";

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct RegisterBody {
    username: String,
    password: String,
    #[serde(default)]
    role: Role,
}

#[derive(Deserialize)]
struct LoginBody {
    username: String,
    password: String,
}

#[derive(Deserialize)]
struct AddTeamBody {
    team_name: String,
}

#[derive(Deserialize)]
struct StatusBody {
    status: TournamentStatus,
}

#[derive(Deserialize)]
struct ResultBody {
    home_score: i64,
    away_score: i64,
}

/// `team: null` (or omitted) clears the assignment.
#[derive(Deserialize)]
struct AssignTeamBody {
    #[serde(default)]
    team: Option<String>,
}

#[derive(Deserialize)]
struct SearchQuery {
    q: String,
}

/// Path segment: numeric row id (e.g. /api/league/tournaments/{id})
#[derive(Deserialize)]
struct IdPath {
    id: i64,
}

/// Path segment: player jersey number.
#[derive(Deserialize)]
struct JerseyPath {
    jersey: i64,
}

/// Path segment: team name.
#[derive(Deserialize)]
struct TeamNamePath {
    name: String,
}

fn error_response(err: StoreError) -> HttpResponse {
    let body = serde_json::json!({ "error": err.to_string() });
    match err {
        StoreError::Validation(_) | StoreError::InvalidTransition => {
            HttpResponse::BadRequest().json(body)
        }
        StoreError::DuplicateUsername | StoreError::DuplicateTeam | StoreError::DuplicateJersey => {
            HttpResponse::Conflict().json(body)
        }
        StoreError::NotFound => HttpResponse::NotFound().json(body),
        StoreError::InvalidCredentials => HttpResponse::Unauthorized().json(body),
        StoreError::Sqlite(_) | StoreError::PasswordHash(_) => {
            log::error!("operation failed: {}", err);
            HttpResponse::InternalServerError()
                .json(serde_json::json!({ "error": "Storage failure" }))
        }
    }
}

fn require_login(session: &Session) -> Result<SessionUser, HttpResponse> {
    match session.get::<SessionUser>(SESSION_USER_KEY) {
        Ok(Some(user)) => Ok(user),
        _ => Err(HttpResponse::Unauthorized()
            .json(serde_json::json!({ "error": "Login required" }))),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "football-club-web",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

// ---------------------------------------------------------------
// Auth
// ---------------------------------------------------------------

/// Register a new user. Fails with 409 when the username is taken.
#[post("/api/auth/register")]
async fn api_register(state: LeagueState, body: Json<RegisterBody>) -> HttpResponse {
    let store = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match store.register(&body.username, &body.password, body.role) {
        Ok(user) => {
            log::info!("registered user '{}' ({})", user.username, user.role.as_str());
            HttpResponse::Ok().json(user)
        }
        Err(e) => error_response(e),
    }
}

/// Log in: on success the identity goes into the cookie session.
#[post("/api/auth/login")]
async fn api_login(state: LeagueState, session: Session, body: Json<LoginBody>) -> HttpResponse {
    let store = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match store.authenticate(&body.username, &body.password) {
        Ok(user) => {
            let session_user = SessionUser {
                username: user.username.clone(),
                role: user.role,
            };
            if session.insert(SESSION_USER_KEY, &session_user).is_err() {
                return HttpResponse::InternalServerError().body("session error");
            }
            log::info!("user '{}' logged in", user.username);
            HttpResponse::Ok().json(user)
        }
        Err(e) => error_response(e),
    }
}

#[post("/api/auth/logout")]
async fn api_logout(session: Session) -> HttpResponse {
    session.purge();
    HttpResponse::Ok().json(serde_json::json!({ "ok": true }))
}

/// Current session identity (401 when not logged in).
#[get("/api/auth/me")]
async fn api_me(session: Session) -> HttpResponse {
    match require_login(&session) {
        Ok(user) => HttpResponse::Ok().json(user),
        Err(resp) => resp,
    }
}

// ---------------------------------------------------------------
// League: dashboard, tournaments, standings, matches
// ---------------------------------------------------------------

/// Aggregate counts plus the five most recent matches.
#[get("/api/league/dashboard")]
async fn api_league_dashboard(state: LeagueState, session: Session) -> HttpResponse {
    if let Err(resp) = require_login(&session) {
        return resp;
    }
    let store = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match store.dashboard() {
        Ok(d) => HttpResponse::Ok().json(d),
        Err(e) => error_response(e),
    }
}

#[post("/api/league/tournaments")]
async fn api_create_tournament(
    state: LeagueState,
    session: Session,
    body: Json<NewTournament>,
) -> HttpResponse {
    if let Err(resp) = require_login(&session) {
        return resp;
    }
    let store = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match store.create_tournament(&body) {
        Ok(t) => HttpResponse::Ok().json(t),
        Err(e) => error_response(e),
    }
}

#[get("/api/league/tournaments")]
async fn api_list_tournaments(state: LeagueState, session: Session) -> HttpResponse {
    if let Err(resp) = require_login(&session) {
        return resp;
    }
    let store = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match store.tournaments() {
        Ok(ts) => HttpResponse::Ok().json(ts),
        Err(e) => error_response(e),
    }
}

/// Advance tournament status (Upcoming → Ongoing → Completed, forward only).
#[put("/api/league/tournaments/{id}/status")]
async fn api_set_tournament_status(
    state: LeagueState,
    session: Session,
    path: Path<IdPath>,
    body: Json<StatusBody>,
) -> HttpResponse {
    if let Err(resp) = require_login(&session) {
        return resp;
    }
    let store = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match store.set_tournament_status(path.id, body.status) {
        Ok(t) => HttpResponse::Ok().json(t),
        Err(e) => error_response(e),
    }
}

/// Delete a tournament with its standings rows and matches.
#[delete("/api/league/tournaments/{id}")]
async fn api_delete_tournament(
    state: LeagueState,
    session: Session,
    path: Path<IdPath>,
) -> HttpResponse {
    if let Err(resp) = require_login(&session) {
        return resp;
    }
    let mut store = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match store.delete_tournament(path.id) {
        Ok(()) => {
            log::info!("deleted tournament {}", path.id);
            HttpResponse::Ok().json(serde_json::json!({ "ok": true }))
        }
        Err(e) => error_response(e),
    }
}

/// Add a team to a tournament's roster (zeroed standings row).
#[post("/api/league/tournaments/{id}/teams")]
async fn api_add_team(
    state: LeagueState,
    session: Session,
    path: Path<IdPath>,
    body: Json<AddTeamBody>,
) -> HttpResponse {
    if let Err(resp) = require_login(&session) {
        return resp;
    }
    let store = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match store.add_team(path.id, &body.team_name) {
        Ok(row) => HttpResponse::Ok().json(row),
        Err(e) => error_response(e),
    }
}

/// Team names in a tournament (for scheduling dropdowns).
#[get("/api/league/tournaments/{id}/teams")]
async fn api_team_names(state: LeagueState, session: Session, path: Path<IdPath>) -> HttpResponse {
    if let Err(resp) = require_login(&session) {
        return resp;
    }
    let store = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match store.team_names(path.id) {
        Ok(names) => HttpResponse::Ok().json(names),
        Err(e) => error_response(e),
    }
}

/// Standings table in display order (points, goal difference, goals for).
#[get("/api/league/tournaments/{id}/standings")]
async fn api_standings(state: LeagueState, session: Session, path: Path<IdPath>) -> HttpResponse {
    if let Err(resp) = require_login(&session) {
        return resp;
    }
    let store = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match store.standings(path.id) {
        Ok(rows) => HttpResponse::Ok().json(rows),
        Err(e) => error_response(e),
    }
}

/// Overwrite a standings row's stats; points are recomputed server-side.
#[put("/api/league/standings/{id}/stats")]
async fn api_update_stats(
    state: LeagueState,
    session: Session,
    path: Path<IdPath>,
    body: Json<TeamStats>,
) -> HttpResponse {
    if let Err(resp) = require_login(&session) {
        return resp;
    }
    let store = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match store.update_team_stats(path.id, &body) {
        Ok(row) => HttpResponse::Ok().json(row),
        Err(e) => error_response(e),
    }
}

/// Remove a team's standings row from its tournament.
#[delete("/api/league/standings/{id}")]
async fn api_remove_team(state: LeagueState, session: Session, path: Path<IdPath>) -> HttpResponse {
    if let Err(resp) = require_login(&session) {
        return resp;
    }
    let store = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match store.remove_team(path.id) {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "ok": true })),
        Err(e) => error_response(e),
    }
}

#[post("/api/league/matches")]
async fn api_schedule_match(
    state: LeagueState,
    session: Session,
    body: Json<NewMatch>,
) -> HttpResponse {
    if let Err(resp) = require_login(&session) {
        return resp;
    }
    let store = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match store.schedule_match(&body) {
        Ok(m) => HttpResponse::Ok().json(m),
        Err(e) => error_response(e),
    }
}

#[get("/api/league/matches")]
async fn api_list_matches(state: LeagueState, session: Session) -> HttpResponse {
    if let Err(resp) = require_login(&session) {
        return resp;
    }
    let store = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match store.matches() {
        Ok(ms) => HttpResponse::Ok().json(ms),
        Err(e) => error_response(e),
    }
}

/// Record a result: sets both scores and completes the match. The
/// response includes the WIN/LOSS/DRAW outcome from the home side.
#[put("/api/league/matches/{id}/result")]
async fn api_record_result(
    state: LeagueState,
    session: Session,
    path: Path<IdPath>,
    body: Json<ResultBody>,
) -> HttpResponse {
    if let Err(resp) = require_login(&session) {
        return resp;
    }
    let store = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match store.record_result(path.id, body.home_score, body.away_score) {
        Ok(m) => {
            let outcome = logic::outcome_for(&m);
            HttpResponse::Ok().json(serde_json::json!({ "match": m, "outcome": outcome }))
        }
        Err(e) => error_response(e),
    }
}

#[delete("/api/league/matches/{id}")]
async fn api_delete_match(state: LeagueState, session: Session, path: Path<IdPath>) -> HttpResponse {
    if let Err(resp) = require_login(&session) {
        return resp;
    }
    let store = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match store.delete_match(path.id) {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "ok": true })),
        Err(e) => error_response(e),
    }
}

/// Win share over a team's completed matches.
#[get("/api/league/teams/{name}/win-rate")]
async fn api_team_win_rate(
    state: LeagueState,
    session: Session,
    path: Path<TeamNamePath>,
) -> HttpResponse {
    if let Err(resp) = require_login(&session) {
        return resp;
    }
    let store = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match store.team_win_rate(&path.name) {
        Ok(rate) => HttpResponse::Ok().json(serde_json::json!({ "win_rate": rate })),
        Err(e) => error_response(e),
    }
}

// ---------------------------------------------------------------
// Club: players, teams
// ---------------------------------------------------------------

#[get("/api/club/dashboard")]
async fn api_club_dashboard(state: ClubState, session: Session) -> HttpResponse {
    if let Err(resp) = require_login(&session) {
        return resp;
    }
    let store = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match store.dashboard() {
        Ok(d) => HttpResponse::Ok().json(d),
        Err(e) => error_response(e),
    }
}

#[post("/api/club/players")]
async fn api_add_player(state: ClubState, session: Session, body: Json<NewPlayer>) -> HttpResponse {
    if let Err(resp) = require_login(&session) {
        return resp;
    }
    let store = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match store.add_player(&body) {
        Ok(p) => HttpResponse::Ok().json(p),
        Err(e) => error_response(e),
    }
}

#[get("/api/club/players")]
async fn api_list_players(state: ClubState, session: Session) -> HttpResponse {
    if let Err(resp) = require_login(&session) {
        return resp;
    }
    let store = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match store.players() {
        Ok(ps) => HttpResponse::Ok().json(ps),
        Err(e) => error_response(e),
    }
}

/// Search by name substring (case-insensitive) or exact jersey number.
#[get("/api/club/players/search")]
async fn api_search_players(
    state: ClubState,
    session: Session,
    query: Query<SearchQuery>,
) -> HttpResponse {
    if let Err(resp) = require_login(&session) {
        return resp;
    }
    let store = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match store.search_players(&query.q) {
        Ok(ps) => HttpResponse::Ok().json(ps),
        Err(e) => error_response(e),
    }
}

/// Whole-row overwrite of a player (jersey and team assignment keep).
#[put("/api/club/players/{jersey}")]
async fn api_update_player(
    state: ClubState,
    session: Session,
    path: Path<JerseyPath>,
    body: Json<NewPlayer>,
) -> HttpResponse {
    if let Err(resp) = require_login(&session) {
        return resp;
    }
    let store = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match store.update_player(path.jersey, &body) {
        Ok(p) => HttpResponse::Ok().json(p),
        Err(e) => error_response(e),
    }
}

#[delete("/api/club/players/{jersey}")]
async fn api_delete_player(
    state: ClubState,
    session: Session,
    path: Path<JerseyPath>,
) -> HttpResponse {
    if let Err(resp) = require_login(&session) {
        return resp;
    }
    let store = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match store.delete_player(path.jersey) {
        Ok(()) => {
            log::info!("deleted player #{}", path.jersey);
            HttpResponse::Ok().json(serde_json::json!({ "ok": true }))
        }
        Err(e) => error_response(e),
    }
}

/// Assign a player to a team, or clear the assignment with `team: null`.
#[put("/api/club/players/{jersey}/team")]
async fn api_assign_player(
    state: ClubState,
    session: Session,
    path: Path<JerseyPath>,
    body: Json<AssignTeamBody>,
) -> HttpResponse {
    if let Err(resp) = require_login(&session) {
        return resp;
    }
    let store = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let result = match body.team.as_deref() {
        Some(team) => store.assign_player(path.jersey, team),
        None => store.unassign_player(path.jersey),
    };
    match result {
        Ok(p) => HttpResponse::Ok().json(p),
        Err(e) => error_response(e),
    }
}

/// Create or overwrite a team (save is an upsert, keyed by name).
#[post("/api/club/teams")]
async fn api_save_team(state: ClubState, session: Session, body: Json<Team>) -> HttpResponse {
    if let Err(resp) = require_login(&session) {
        return resp;
    }
    let store = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match store.save_team(&body) {
        Ok(t) => HttpResponse::Ok().json(t),
        Err(e) => error_response(e),
    }
}

#[get("/api/club/teams")]
async fn api_list_teams(state: ClubState, session: Session) -> HttpResponse {
    if let Err(resp) = require_login(&session) {
        return resp;
    }
    let store = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match store.teams() {
        Ok(ts) => HttpResponse::Ok().json(ts),
        Err(e) => error_response(e),
    }
}

/// Delete a team; its players stay with their assignment cleared.
#[delete("/api/club/teams/{name}")]
async fn api_delete_team(
    state: ClubState,
    session: Session,
    path: Path<TeamNamePath>,
) -> HttpResponse {
    if let Err(resp) = require_login(&session) {
        return resp;
    }
    let mut store = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match store.delete_team(&path.name) {
        Ok(()) => {
            log::info!("deleted team '{}'", path.name);
            HttpResponse::Ok().json(serde_json::json!({ "ok": true }))
        }
        Err(e) => error_response(e),
    }
}

/// Players currently assigned to a team.
#[get("/api/club/teams/{name}/squad")]
async fn api_squad(state: ClubState, session: Session, path: Path<TeamNamePath>) -> HttpResponse {
    if let Err(resp) = require_login(&session) {
        return resp;
    }
    let store = match state.lock() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match store.squad(&path.name) {
        Ok(ps) => HttpResponse::Ok().json(ps),
        Err(e) => error_response(e),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let league_db = std::env::var("LEAGUE_DB").unwrap_or_else(|_| "football.db".to_string());
    let club_db = std::env::var("CLUB_DB").unwrap_or_else(|_| "soccer.db".to_string());
    let bind = (host.as_str(), port);

    let league = LeagueStore::open(&league_db)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    let club = ClubStore::open(&club_db)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    log::info!("league db: {}, club db: {}", league_db, club_db);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let league = Data::new(Mutex::new(league));
    let club = Data::new(Mutex::new(club));
    let session_key = Key::generate();

    HttpServer::new(move || {
        App::new()
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), session_key.clone())
                    .cookie_secure(false)
                    .build(),
            )
            .app_data(league.clone())
            .app_data(club.clone())
            .route("/", web::get().to(serve_index_async))
            .service(api_health)
            .service(favicon)
            .service(api_register)
            .service(api_login)
            .service(api_logout)
            .service(api_me)
            .service(api_league_dashboard)
            .service(api_create_tournament)
            .service(api_list_tournaments)
            .service(api_set_tournament_status)
            .service(api_delete_tournament)
            .service(api_add_team)
            .service(api_team_names)
            .service(api_standings)
            .service(api_update_stats)
            .service(api_remove_team)
            .service(api_schedule_match)
            .service(api_list_matches)
            .service(api_record_result)
            .service(api_delete_match)
            .service(api_team_win_rate)
            .service(api_club_dashboard)
            .service(api_add_player)
            .service(api_list_players)
            .service(api_search_players)
            .service(api_update_player)
            .service(api_delete_player)
            .service(api_assign_player)
            .service(api_save_team)
            .service(api_list_teams)
            .service(api_delete_team)
            .service(api_squad)
            .service(Files::new("/static", "static").show_files_listing())
    })
    .bind(bind)?
    .run()
    .await
}

async fn serve_index_async() -> HttpResponse {
    let html = include_str!("../../templates/index.html");
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}
