use tokio::time;
use tracing::{info, warn};

use rocket::{
    Build, Orbit, Rocket,
    fairing::{self, Fairing, Info, Kind},
};

use crate::{config::CleanupConfig, registry::Registry};

pub async fn start_cleanup_task(registry: Registry, config: CleanupConfig) {
    let mut interval = time::interval(config.interval);

    info!(
        "Started session cleanup task: checking every {}s, max session age: {}s",
        config.interval.as_secs(),
        config.max_session_age.as_secs()
    );

    loop {
        interval.tick().await;
        let removed = registry.evict_older_than(config.max_session_age);
        if removed > 0 {
            info!(
                "Cleaned up {} expired sessions, {} remaining",
                removed,
                registry.len()
            );
        }
    }
}

/// Runs the eviction sweep for the lifetime of the server and drops every
/// idle session on shutdown.
pub struct CleanupFairing {
    config: CleanupConfig,
}

impl CleanupFairing {
    pub fn new(config: CleanupConfig) -> Self {
        Self { config }
    }
}

#[rocket::async_trait]
impl Fairing for CleanupFairing {
    fn info(&self) -> Info {
        Info {
            name: "Session Cleanup",
            kind: Kind::Ignite | Kind::Shutdown,
        }
    }

    async fn on_ignite(&self, rocket: Rocket<Build>) -> fairing::Result {
        if let Some(registry) = rocket.state::<Registry>() {
            info!("Starting cleanup task for session registry");
            let registry = registry.clone();
            let config = self.config.clone();
            tokio::spawn(async move {
                start_cleanup_task(registry, config).await;
            });
        } else {
            warn!("No session registry managed, cleanup task not started");
        }
        Ok(rocket)
    }

    async fn on_shutdown(&self, rocket: &Rocket<Orbit>) {
        if let Some(registry) = rocket.state::<Registry>() {
            let removed = registry.evict_older_than(std::time::Duration::ZERO);
            info!("🧹 Cleaned up {} sessions on shutdown", removed);
        }
    }
}
