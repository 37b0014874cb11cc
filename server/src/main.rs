use std::process;

use hypersweeper_common::DIMENSIONS;
use hypersweeper_server::{
    Registry, build, cleanup::CleanupFairing, config::Config, cors::create_cors,
};
use rocket::{Build, Rocket};
use tracing::{error, info};

#[rocket::launch]
fn rocket() -> Rocket<Build> {
    tracing_subscriber::fmt::init();
    info!("🚀 Starting 5D Minesweeper server");

    let config = Config::from_env();
    if let Err(e) = config.game.validate() {
        error!("Refusing to start: {}", e);
        process::exit(1);
    }

    info!(
        "📊 Board: {}^{} = {} cells",
        config.game.board_size,
        DIMENSIONS,
        config.game.total_cells()
    );
    info!(
        "💣 Mines: {} ({:.1}% density)",
        config.game.mine_count,
        config.game.mine_density() * 100.0
    );

    let cors = match create_cors(&config.cors_origins) {
        Ok(cors) => cors,
        Err(e) => {
            error!("Invalid CORS configuration: {}", e);
            process::exit(1);
        }
    };

    let registry = Registry::new(config.game);
    let rocket = build(registry, cors).attach(CleanupFairing::new(config.cleanup));

    info!("📡 Endpoints: GET /api/health, POST /api/restart, GET /api/reveal, POST /api/flag, GET /api/stats, GET /api/mines, GET /ws");

    rocket
}
