//! Configuration module - environment variable parsing

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::game::chameleon::DEFAULT_SKEW;
use crate::game::session::DEFAULT_MAX_PLAYERS;
use crate::game::GameRules;

/// Smallest accepted chameleon skew; below it the count distribution is flat
pub const MIN_CHAMELEON_SKEW: f64 = 0.01;

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Server binding address
    pub server_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// JSON word list; the built-in dataset is used when unset
    pub words_path: Option<PathBuf>,
    /// Maximum roster size per session
    pub max_players: usize,
    /// Skew of the weighted chameleon count distribution
    pub chameleon_skew: f64,

    /// Sessions idle this long are removed (zero disables expiry)
    pub session_idle_timeout: Duration,
    /// How often idle sessions are swept
    pub session_sweep_interval: Duration,

    /// Create/join requests allowed per second, process-wide
    pub request_rate_limit: u32,
    /// Allowed client origins for CORS (comma-separated)
    pub client_origin: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key/value source
    fn from_lookup<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Render provides PORT env var, fall back to SERVER_ADDR or default
        let server_addr = if let Some(port) = var("PORT") {
            format!("0.0.0.0:{}", port)
        } else {
            var("SERVER_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string())
        };

        let chameleon_skew: f64 = parse_or(&var, "CHAMELEON_SKEW", DEFAULT_SKEW)?;
        if !chameleon_skew.is_finite() || chameleon_skew < MIN_CHAMELEON_SKEW {
            return Err(ConfigError::Invalid("CHAMELEON_SKEW"));
        }

        let max_players: usize = parse_or(&var, "MAX_PLAYERS", DEFAULT_MAX_PLAYERS)?;
        if max_players == 0 {
            return Err(ConfigError::Invalid("MAX_PLAYERS"));
        }

        let sweep_secs: u64 = parse_or(&var, "SESSION_SWEEP_INTERVAL_SECS", 60)?;
        if sweep_secs == 0 {
            return Err(ConfigError::Invalid("SESSION_SWEEP_INTERVAL_SECS"));
        }

        Ok(Self {
            server_addr: server_addr
                .parse()
                .map_err(|_| ConfigError::InvalidAddress)?,

            log_level: var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),

            words_path: var("WORDS_PATH").map(PathBuf::from),
            max_players,
            chameleon_skew,

            session_idle_timeout: Duration::from_secs(parse_or(
                &var,
                "SESSION_IDLE_TIMEOUT_SECS",
                4 * 60 * 60,
            )?),
            session_sweep_interval: Duration::from_secs(sweep_secs),

            request_rate_limit: parse_or(&var, "REQUEST_RATE_LIMIT", 20)?,
            client_origin: var("CLIENT_ORIGIN").filter(|s| !s.trim().is_empty()),
        })
    }

    /// Engine limits derived from this configuration
    pub fn game_rules(&self) -> GameRules {
        GameRules {
            max_players: self.max_players,
            chameleon_skew: self.chameleon_skew,
            ..GameRules::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            log_level: "info".to_string(),
            words_path: None,
            max_players: DEFAULT_MAX_PLAYERS,
            chameleon_skew: DEFAULT_SKEW,
            session_idle_timeout: Duration::from_secs(4 * 60 * 60),
            session_sweep_interval: Duration::from_secs(60),
            request_rate_limit: 20,
            client_origin: None,
        }
    }
}

/// Read an optional variable, falling back to `default` when unset
fn parse_or<F, T>(var: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match var(key) {
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),

    #[error("Invalid server address format")]
    InvalidAddress,
}
