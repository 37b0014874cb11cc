use std::{sync::Arc, time::Duration};

use dashmap::{DashMap, Entry};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info, instrument};

use crate::{config::GameConfig, error::GameError, logic::Session};

pub type SharedSession = Arc<Mutex<Session>>;

/// Every live session, keyed by client id.
///
/// Cloning is cheap and shares the same map. Callers lock the returned
/// session for the span of one operation; sessions of different clients
/// never contend beyond the map's own shard locks.
#[derive(Clone)]
pub struct Registry {
    sessions: Arc<DashMap<String, SharedSession>>,
    config: Arc<GameConfig>,
}

impl Registry {
    pub fn new(config: GameConfig) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn get(&self, client_id: &str) -> Option<SharedSession> {
        self.sessions
            .get(client_id)
            .map(|entry| entry.value().clone())
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get_or_create(&self, client_id: &str) -> Result<SharedSession, GameError> {
        if let Some(session) = self.get(client_id) {
            return Ok(session);
        }

        match self.sessions.entry(client_id.to_string()) {
            Entry::Occupied(entry) => Ok(entry.get().clone()),
            Entry::Vacant(entry) => {
                let session = Arc::new(Mutex::new(Session::new(self.config.clone(), None)?));
                entry.insert(session.clone());
                info!("Created new session for client {}", client_id);
                Ok(session)
            }
        }
    }

    /// Locks the session currently mapped to `client_id`, creating one if
    /// needed. If the session was evicted or replaced while waiting for the
    /// lock, the lock is released and the current entry is taken instead, so
    /// the caller never mutates a session the map no longer holds.
    pub async fn lock_session(
        &self,
        client_id: &str,
    ) -> Result<OwnedMutexGuard<Session>, GameError> {
        loop {
            let session = self.get_or_create(client_id)?;
            let guard = session.clone().lock_owned().await;
            let still_mapped = self
                .sessions
                .get(client_id)
                .is_some_and(|entry| Arc::ptr_eq(entry.value(), &session));
            if still_mapped {
                return Ok(guard);
            }
            debug!("Session for client {} changed while locking, retrying", client_id);
        }
    }

    /// Discards whatever `client_id` had and starts a fresh game.
    #[instrument(level = "trace", skip(self))]
    pub fn replace(&self, client_id: &str, seed: Option<u64>) -> Result<SharedSession, GameError> {
        let session = Arc::new(Mutex::new(Session::new(self.config.clone(), seed)?));
        let previous = self
            .sessions
            .insert(client_id.to_string(), session.clone());
        info!(
            "Restarted session for client {} (replaced existing: {})",
            client_id,
            previous.is_some()
        );
        Ok(session)
    }

    /// Removes sessions created more than `max_age` ago and returns how many
    /// went. A session that is locked right now is left for a later sweep.
    pub fn evict_older_than(&self, max_age: Duration) -> usize {
        let mut evicted = 0;

        self.sessions.retain(|client_id, session| {
            let Ok(session) = session.try_lock() else {
                return true;
            };
            if session.age() > max_age {
                debug!("Evicting session for client {}", client_id);
                evicted += 1;
                false
            } else {
                true
            }
        });

        evicted
    }
}
