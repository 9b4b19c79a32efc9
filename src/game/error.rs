//! Engine error kinds

/// Everything a session operation can refuse with.
///
/// All variants are expected outcomes of user input; none of them indicate a
/// broken process.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("Game {0} not found or has ended")]
    SessionNotFound(String),

    #[error("Player {player_id} not found in game {code}")]
    PlayerNotFound { code: String, player_id: String },

    #[error("Game is full (maximum {max} players)")]
    RosterFull { max: usize },

    #[error("A round is already in progress")]
    RoundInProgress,

    #[error("The host cannot be kicked")]
    ProtectedHost,

    #[error("No players have joined the game yet")]
    NoPlayers,

    #[error("Category and secret word are required")]
    MissingSecret,

    #[error("No free identifiers left, try again later")]
    CapacityExhausted,
}

impl GameError {
    /// Stable machine-readable name for the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            GameError::SessionNotFound(_) | GameError::PlayerNotFound { .. } => "not_found",
            GameError::RosterFull { .. } => "roster_full",
            GameError::RoundInProgress => "round_in_progress",
            GameError::ProtectedHost => "protected_host",
            GameError::NoPlayers => "no_players",
            GameError::MissingSecret => "missing_secret",
            GameError::CapacityExhausted => "capacity_exhausted",
        }
    }
}
