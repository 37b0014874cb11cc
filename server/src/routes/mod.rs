use hypersweeper_common::{
    Coord, GameState,
    protocol::{
        AutoRevealed, ErrorResponse, FlagResponse, GameConfigSummary, HealthResponse,
        MineHitResponse, MinesResponse, RestartResponse, RevealResponse, SafeRevealResponse,
        StatsResponse, Victory,
    },
};
use rocket::{
    Route, State, get,
    http::{Cookie, CookieJar, SameSite, Status},
    post,
    response::status::Custom,
    routes,
    serde::json::Json,
    time::Duration,
};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::{
    error::GameError,
    logic::{RevealOutcome, SafeReveal},
    registry::Registry,
};

pub mod ws;

pub const SESSION_COOKIE: &str = "minesweeper_session";

const MINE_HIT_MESSAGE: &str = "Game Over - Mine Hit!";
const WIN_MESSAGE: &str = "Congratulations! All mines found!";

pub type ApiError = Custom<Json<ErrorResponse>>;
pub type ApiResult<T> = Result<Json<T>, ApiError>;

pub fn all() -> Vec<Route> {
    routes![
        health,
        restart,
        reveal,
        flag,
        stats,
        mines,
        ws::websocket_handler
    ]
}

/// The caller's id from the session cookie, minting and setting a new one
/// when the cookie is missing.
pub fn client_id(cookies: &CookieJar<'_>) -> String {
    if let Some(cookie) = cookies.get(SESSION_COOKIE) {
        return cookie.value().to_string();
    }

    let id = Uuid::new_v4().to_string();
    cookies.add(
        Cookie::build((SESSION_COOKIE, id.clone()))
            .http_only(true)
            .same_site(SameSite::Lax)
            .max_age(Duration::days(1)),
    );
    info!("Issued new client id {}", id);
    id
}

pub fn api_error(err: GameError) -> ApiError {
    let status = if err.is_internal() {
        error!("Internal game error: {}", err);
        Status::InternalServerError
    } else {
        warn!("Rejected request: {}", err);
        Status::BadRequest
    };
    Custom(
        status,
        Json(ErrorResponse {
            detail: err.to_string(),
        }),
    )
}

pub(crate) fn mine_hit_response(coord: Coord, reveals_used: u32) -> MineHitResponse {
    MineHitResponse {
        is_mine: true,
        game_over: true,
        game_state: GameState::Lost,
        coordinates: coord,
        message: MINE_HIT_MESSAGE.to_string(),
        total_reveals: reveals_used,
        mine_hit_coords: coord,
    }
}

pub(crate) fn safe_reveal_response(reveal: SafeReveal) -> SafeRevealResponse {
    let auto_revealed: Vec<AutoRevealed> = reveal
        .auto_revealed
        .into_iter()
        .map(|(coords, count)| AutoRevealed { coords, count })
        .collect();

    SafeRevealResponse {
        is_mine: false,
        count: reveal.neighbor_mines,
        game_state: reveal.state,
        coordinates: reveal.coord,
        cascade_size: auto_revealed.len(),
        auto_revealed,
        total_reveals: reveal.reveals_used,
        victory: reveal.prize.map(|prize| Victory {
            message: WIN_MESSAGE.to_string(),
            total_safe_cells: prize.total_safe_cells,
            flag: prize.secret,
        }),
    }
}

impl From<RevealOutcome> for RevealResponse {
    fn from(outcome: RevealOutcome) -> Self {
        match outcome {
            RevealOutcome::MineHit {
                coord,
                reveals_used,
            } => RevealResponse::MineHit(mine_hit_response(coord, reveals_used)),
            RevealOutcome::Safe(reveal) => RevealResponse::Safe(safe_reveal_response(reveal)),
        }
    }
}

#[get("/api/health")]
pub fn health(registry: &State<Registry>) -> Json<HealthResponse> {
    let config = registry.config();
    Json(HealthResponse {
        status: "healthy".to_string(),
        game_config: GameConfigSummary {
            board_size: config.board_size,
            mine_count: config.mine_count,
            total_cells: config.total_cells(),
        },
        active_sessions: registry.len(),
    })
}

#[post("/api/restart?<seed>")]
#[instrument(level = "trace", skip(registry, cookies))]
pub async fn restart(
    seed: Option<u64>,
    registry: &State<Registry>,
    cookies: &CookieJar<'_>,
) -> ApiResult<RestartResponse> {
    let client_id = client_id(cookies);
    let session = registry.replace(&client_id, seed).map_err(api_error)?;
    let session = session.lock().await;
    let metadata = session.metadata();

    Ok(Json(RestartResponse {
        success: true,
        message: "Game restarted successfully".to_string(),
        board_size: metadata.board_size,
        mine_count: metadata.mine_count,
        generation_time: metadata.generation_time,
    }))
}

#[get("/api/reveal?<x>&<y>&<z>&<w>&<v>")]
#[instrument(level = "trace", skip(registry, cookies))]
pub async fn reveal(
    x: usize,
    y: usize,
    z: usize,
    w: usize,
    v: usize,
    registry: &State<Registry>,
    cookies: &CookieJar<'_>,
) -> ApiResult<RevealResponse> {
    let client_id = client_id(cookies);
    let outcome = registry
        .lock_session(&client_id)
        .await
        .map_err(api_error)?
        .reveal(Coord::new(x, y, z, w, v))
        .map_err(api_error)?;
    Ok(Json(outcome.into()))
}

#[post("/api/flag?<x>&<y>&<z>&<w>&<v>")]
#[instrument(level = "trace", skip(registry, cookies))]
pub async fn flag(
    x: usize,
    y: usize,
    z: usize,
    w: usize,
    v: usize,
    registry: &State<Registry>,
    cookies: &CookieJar<'_>,
) -> ApiResult<FlagResponse> {
    let client_id = client_id(cookies);
    let response = registry
        .lock_session(&client_id)
        .await
        .map_err(api_error)?
        .toggle_flag(Coord::new(x, y, z, w, v))
        .map_err(api_error)?;
    Ok(Json(response))
}

#[get("/api/stats")]
pub async fn stats(registry: &State<Registry>, cookies: &CookieJar<'_>) -> ApiResult<StatsResponse> {
    let client_id = client_id(cookies);
    let stats = registry
        .lock_session(&client_id)
        .await
        .map_err(api_error)?
        .stats();
    Ok(Json(stats))
}

/// Mine layout, disclosed only once the game is lost.
#[get("/api/mines")]
pub async fn mines(registry: &State<Registry>, cookies: &CookieJar<'_>) -> ApiResult<MinesResponse> {
    let client_id = client_id(cookies);
    let session = registry
        .lock_session(&client_id)
        .await
        .map_err(api_error)?;

    if session.state() != GameState::Lost {
        warn!("Client {} asked for mine locations mid-game", client_id);
        return Err(Custom(
            Status::Forbidden,
            Json(ErrorResponse {
                detail: "Mine locations only available when game is over".to_string(),
            }),
        ));
    }

    let mine_locations = session.mine_coordinates();
    Ok(Json(MinesResponse {
        success: true,
        game_state: session.state(),
        total_mines: mine_locations.len(),
        mine_locations,
    }))
}
