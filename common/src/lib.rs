//! Wire types shared between the 5D minesweeper server and its clients.
//!
//! [`models`] holds the value types (coordinates, game state, board
//! metadata); [`protocol`] holds the request/response payloads and the
//! streaming message envelope.

pub mod models;
pub mod protocol;

pub use models::{BoardMetadata, Coord, DIMENSIONS, GameState, MAX_NEIGHBORS};
