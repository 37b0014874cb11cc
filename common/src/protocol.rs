use serde::{Deserialize, Serialize};

use crate::models::{BoardMetadata, Coord, GameState};

/// Requests accepted on the streaming connection.
///
/// `restart` and `stats` carry no payload; whatever `data` they arrive with
/// (`{}`, `null`, or nothing) is ignored.
#[derive(Debug, Deserialize, Serialize, PartialEq)]
#[serde(
    tag = "type",
    content = "data",
    rename_all = "snake_case",
    try_from = "ClientEnvelope"
)]
pub enum ClientMessage {
    Reveal(Coord),
    Flag(Coord),
    Restart,
    Stats,
}

#[derive(Deserialize)]
struct ClientEnvelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Option<CoordData>,
}

#[derive(Deserialize, Default)]
struct CoordData {
    x: Option<usize>,
    y: Option<usize>,
    z: Option<usize>,
    w: Option<usize>,
    v: Option<usize>,
}

impl CoordData {
    fn into_coord(self) -> Option<Coord> {
        Some(Coord::new(self.x?, self.y?, self.z?, self.w?, self.v?))
    }
}

impl TryFrom<ClientEnvelope> for ClientMessage {
    type Error = String;

    fn try_from(envelope: ClientEnvelope) -> Result<Self, Self::Error> {
        let coord = |data: Option<CoordData>| {
            data.and_then(CoordData::into_coord)
                .ok_or_else(|| format!("{} requires x, y, z, w and v", envelope.kind))
        };

        match envelope.kind.as_str() {
            "reveal" => coord(envelope.data).map(ClientMessage::Reveal),
            "flag" => coord(envelope.data).map(ClientMessage::Flag),
            "restart" => Ok(ClientMessage::Restart),
            "stats" => Ok(ClientMessage::Stats),
            other => Err(format!("Unknown message type: {other}")),
        }
    }
}

/// Events pushed on the streaming connection.
#[derive(Debug, Deserialize, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ServerMessage {
    MineHit(MineHitResponse),
    CellRevealed(SafeRevealResponse),
    CascadeReveal(CascadeReveal),
    GameWon(GameWon),
    GameRestarted(Notice),
    Stats(StatsResponse),
    CellFlagged(FlagResponse),
    Error(Notice),
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct AutoRevealed {
    pub coords: Coord,
    pub count: u8,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MineHitResponse {
    pub is_mine: bool,
    pub game_over: bool,
    pub game_state: GameState,
    pub coordinates: Coord,
    pub message: String,
    pub total_reveals: u32,
    pub mine_hit_coords: Coord,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SafeRevealResponse {
    pub is_mine: bool,
    pub count: u8,
    pub game_state: GameState,
    pub coordinates: Coord,
    pub auto_revealed: Vec<AutoRevealed>,
    pub cascade_size: usize,
    pub total_reveals: u32,
    #[serde(flatten)]
    pub victory: Option<Victory>,
}

/// Extra fields attached to a reveal that won the game.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Victory {
    pub message: String,
    pub total_safe_cells: usize,
    pub flag: String,
}

/// Body of `GET /api/reveal`: either shape, distinguished by `is_mine`.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum RevealResponse {
    MineHit(MineHitResponse),
    Safe(SafeRevealResponse),
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CascadeReveal {
    pub auto_revealed: Vec<AutoRevealed>,
    pub cascade_size: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GameWon {
    pub message: String,
    pub total_safe_cells: usize,
    pub total_reveals: u32,
    pub flag: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FlagAction {
    Flagged,
    Unflagged,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FlagResponse {
    pub is_flagged: bool,
    pub action: FlagAction,
    pub coordinates: Coord,
    pub total_flagged: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StatsResponse {
    pub revealed_cells: usize,
    pub flagged_cells: usize,
    pub total_cells: usize,
    pub mine_count: usize,
    pub max_neighbors: usize,
    pub reveals_used: u32,
    pub game_state: GameState,
    pub session_age_seconds: f64,
    pub board_metadata: BoardMetadata,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RestartResponse {
    pub success: bool,
    pub message: String,
    pub board_size: usize,
    pub mine_count: usize,
    pub generation_time: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GameConfigSummary {
    pub board_size: usize,
    pub mine_count: usize,
    pub total_cells: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct HealthResponse {
    pub status: String,
    pub game_config: GameConfigSummary,
    pub active_sessions: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MinesResponse {
    pub success: bool,
    pub game_state: GameState,
    pub mine_locations: Vec<Coord>,
    pub total_mines: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Notice {
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ErrorResponse {
    pub detail: String,
}
