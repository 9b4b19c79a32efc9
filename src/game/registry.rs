//! Registry of live sessions

use std::sync::Arc;
use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;
use rand::Rng;
use tracing::{debug, info};

use super::code::{normalize_code, session_code};
use super::{GameError, GameRules, Session, SessionOptions};

/// Shared handle to one session; the mutex serializes every mutation on it
pub type SessionHandle = Arc<Mutex<Session>>;

/// All live sessions, keyed by uppercase code
pub struct GameRegistry {
    sessions: DashMap<String, SessionHandle>,
    rules: GameRules,
}

impl GameRegistry {
    pub fn new(rules: GameRules) -> Self {
        Self {
            sessions: DashMap::new(),
            rules,
        }
    }

    /// Create a lobby under a fresh code
    pub fn create<R: Rng + ?Sized>(
        &self,
        options: SessionOptions,
        rng: &mut R,
    ) -> Result<SessionHandle, GameError> {
        let mut attempts = 0;
        let slot = loop {
            if attempts >= self.rules.max_id_attempts {
                return Err(GameError::CapacityExhausted);
            }
            attempts += 1;

            // The vacant entry holds the shard lock, so no other create can
            // claim the same code before we insert.
            if let Entry::Vacant(slot) = self.sessions.entry(session_code(rng)) {
                break slot;
            }
        };

        let session = Session::new(slot.key().clone(), options, self.rules, rng)?;
        let code = session.code.clone();
        let handle = Arc::new(Mutex::new(session));
        slot.insert(handle.clone());

        info!(code = %code, live_sessions = self.sessions.len(), "Created session");
        Ok(handle)
    }

    /// Look a session up by code, in any letter case
    pub fn lookup(&self, code: &str) -> Result<SessionHandle, GameError> {
        let code = normalize_code(code);
        self.sessions
            .get(&code)
            .map(|s| s.value().clone())
            .ok_or(GameError::SessionNotFound(code))
    }

    /// Drop a session; unknown codes are ignored
    pub fn remove(&self, code: &str) -> Option<SessionHandle> {
        let code = normalize_code(code);
        let removed = self.sessions.remove(&code).map(|(_, s)| s);
        if removed.is_some() {
            info!(code = %code, "Session ended");
        }
        removed
    }

    #[cfg(test)]
    pub fn contains(&self, code: &str) -> bool {
        self.sessions.contains_key(&normalize_code(code))
    }

    pub fn active_sessions(&self) -> usize {
        self.sessions.len()
    }

    pub fn total_players(&self) -> usize {
        self.sessions
            .iter()
            .map(|s| s.value().lock().players.len())
            .sum()
    }

    /// Remove sessions nobody has touched for `max_idle`, returning how many
    pub fn reap_idle(&self, max_idle: Duration) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|code, session| {
            let keep = session.lock().last_activity.elapsed() < max_idle;
            if !keep {
                debug!(code = %code, "Expiring idle session");
            }
            keep
        });
        before.saturating_sub(self.sessions.len())
    }

    /// Periodically expire idle sessions. Never returns.
    pub async fn run_idle_reaper(&self, sweep_every: Duration, max_idle: Duration) {
        let mut interval = tokio::time::interval(sweep_every);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            interval.tick().await;

            let removed = self.reap_idle(max_idle);
            if removed > 0 {
                info!(
                    removed,
                    live_sessions = self.sessions.len(),
                    "Expired idle sessions"
                );
            }
        }
    }
}

impl Default for GameRegistry {
    fn default() -> Self {
        Self::new(GameRules::default())
    }
}
