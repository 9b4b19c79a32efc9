//! Session and player state (owned by the registry)

use std::fmt;
use std::time::Instant;

use rand::Rng;
use serde::Serialize;

use crate::util::time::unix_millis;

use super::chameleon::DEFAULT_SKEW;
use super::{code, GameError};

/// Roster limit unless configured
pub const DEFAULT_MAX_PLAYERS: usize = 20;

/// Identifier of a player, unique within one session
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for PlayerId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for PlayerId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Engine-wide limits applied to every new session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameRules {
    /// Maximum roster size accepted by joins
    pub max_players: usize,
    /// Skew of the weighted chameleon count distribution
    pub chameleon_skew: f64,
    /// Redraws allowed when allocating codes and player ids
    pub max_id_attempts: usize,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            max_players: DEFAULT_MAX_PLAYERS,
            chameleon_skew: DEFAULT_SKEW,
            max_id_attempts: code::MAX_ATTEMPTS,
        }
    }
}

/// Host choices made when creating a session
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    pub host_name: String,
    /// Draw secret and category from the word source
    pub use_random_secret: bool,
    /// Host plays too and the chameleon count is randomized
    pub random_chameleon_mode: bool,
}

/// Lifecycle phase, derived from `round_active`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundPhase {
    Lobby,
    Active,
}

/// A player on a session roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Only meaningful while a round is active
    pub is_chameleon: bool,
}

impl Player {
    pub fn new(id: PlayerId, name: String) -> Self {
        Self {
            id,
            name,
            is_chameleon: false,
        }
    }
}

/// One game instance
#[derive(Debug, Clone)]
pub struct Session {
    pub code: String,
    pub host_name: String,
    pub use_random_secret: bool,
    pub random_chameleon_mode: bool,
    /// Set only when the host is enrolled on the roster
    pub host_player_id: Option<PlayerId>,
    /// Roster in join order
    pub players: Vec<Player>,
    pub round_active: bool,
    pub secret: String,
    pub category: String,
    pub starting_player_name: String,
    pub rules: GameRules,
    pub created_at: u64,
    pub last_activity: Instant,
}

impl Session {
    /// Create a session in the lobby, enrolling the host when they play too
    pub fn new<R: Rng + ?Sized>(
        code: String,
        options: SessionOptions,
        rules: GameRules,
        rng: &mut R,
    ) -> Result<Self, GameError> {
        let mut session = Self {
            code,
            host_name: options.host_name,
            use_random_secret: options.use_random_secret,
            random_chameleon_mode: options.random_chameleon_mode,
            host_player_id: None,
            players: Vec::new(),
            round_active: false,
            secret: String::new(),
            category: String::new(),
            starting_player_name: String::new(),
            rules,
            created_at: unix_millis(),
            last_activity: Instant::now(),
        };

        if session.random_chameleon_mode {
            let host_name = session.host_name.clone();
            let host_id = session.join(host_name, rng)?;
            session.host_player_id = Some(host_id);
        }

        Ok(session)
    }

    pub fn phase(&self) -> RoundPhase {
        if self.round_active {
            RoundPhase::Active
        } else {
            RoundPhase::Lobby
        }
    }

    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    #[cfg(test)]
    pub fn contains_player(&self, id: &PlayerId) -> bool {
        self.player(id).is_some()
    }

    pub fn player_ids(&self) -> Vec<PlayerId> {
        self.players.iter().map(|p| p.id.clone()).collect()
    }

    pub fn chameleons(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.is_chameleon)
    }

    /// Whether `id` is the host's own roster entry
    pub fn is_host_player(&self, id: &PlayerId) -> bool {
        self.host_player_id.as_ref() == Some(id)
    }

    /// Mark the session as recently used
    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }
}
