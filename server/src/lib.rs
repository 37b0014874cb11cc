//! 5D toroidal minesweeper engine and its HTTP/WebSocket front end.
//!
//! The engine lives in [`data`] (board storage) and [`logic`] (generation,
//! adjacency, cascade and the per-player [`Session`] state machine).
//! [`Registry`] maps client ids to sessions; [`routes`] exposes it over
//! rocket.

pub mod cleanup;
pub mod config;
pub mod cors;
pub mod data;
pub mod error;
pub mod logic;
pub mod registry;
pub mod routes;

use rocket::{Build, Rocket};
use rocket_cors::Cors;

pub use error::GameError;
pub use logic::{RevealOutcome, Session};
pub use registry::Registry;

/// Assembles the server around an existing registry. Background cleanup is
/// attached separately by the binary.
pub fn build(registry: Registry, cors: Cors) -> Rocket<Build> {
    rocket::build()
        .attach(cors)
        .manage(registry)
        .mount("/", routes::all())
}
