//! Read-only session views served to hosts and players
//!
//! These decide who gets to see what: a chameleon never receives the secret,
//! and a host who plays along only sees their own role.

use serde::Serialize;

use crate::game::{GameError, PlayerId, RoundPhase, Session};

#[derive(Debug, Serialize)]
pub struct RosterEntry {
    pub id: PlayerId,
    pub name: String,
    /// The participating host cannot be kicked
    pub kickable: bool,
}

/// What the host sees
#[derive(Debug, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum HostView {
    Lobby {
        code: String,
        host_name: String,
        use_random_secret: bool,
        random_chameleon_mode: bool,
        players: Vec<RosterEntry>,
        max_players: usize,
        /// Host must type a category and secret to start
        secret_required: bool,
        /// Upper bound offered for a random chameleon count
        max_random_count: usize,
        created_at: u64,
    },
    Active {
        code: String,
        host_name: String,
        category: String,
        starting_player: String,
        role: HostRole,
    },
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HostRole {
    /// Host runs the game without playing
    Moderator {
        secret: String,
        chameleons: Vec<String>,
    },
    /// Host plays and knows the word
    Player { secret: String },
    /// Host plays and has to bluff
    Chameleon { other_chameleons: Vec<String> },
}

/// What a joined player sees
#[derive(Debug, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum PlayerView {
    Lobby {
        code: String,
        name: String,
        players: Vec<String>,
    },
    Active {
        code: String,
        name: String,
        category: String,
        starting_player: String,
        role: PlayerRole,
    },
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlayerRole {
    Informed { secret: String },
    Chameleon { other_chameleons: Vec<String> },
}

/// Names of every chameleon except `me`
fn other_chameleons(session: &Session, me: &PlayerId) -> Vec<String> {
    session
        .chameleons()
        .filter(|p| &p.id != me)
        .map(|p| p.name.clone())
        .collect()
}

pub fn host_view(session: &Session) -> HostView {
    if session.phase() == RoundPhase::Lobby {
        let players = session
            .players
            .iter()
            .map(|p| RosterEntry {
                id: p.id.clone(),
                name: p.name.clone(),
                kickable: !session.is_host_player(&p.id),
            })
            .collect();

        return HostView::Lobby {
            code: session.code.clone(),
            host_name: session.host_name.clone(),
            use_random_secret: session.use_random_secret,
            random_chameleon_mode: session.random_chameleon_mode,
            players,
            max_players: session.rules.max_players,
            secret_required: !session.use_random_secret,
            max_random_count: session.players.len().saturating_sub(1).max(1),
            created_at: session.created_at,
        };
    }

    let host = session
        .host_player_id
        .as_ref()
        .and_then(|id| session.player(id));

    let role = match host {
        Some(host) if host.is_chameleon => HostRole::Chameleon {
            other_chameleons: other_chameleons(session, &host.id),
        },
        Some(_) => HostRole::Player {
            secret: session.secret.clone(),
        },
        None => HostRole::Moderator {
            secret: session.secret.clone(),
            chameleons: session.chameleons().map(|p| p.name.clone()).collect(),
        },
    };

    HostView::Active {
        code: session.code.clone(),
        host_name: session.host_name.clone(),
        category: session.category.clone(),
        starting_player: session.starting_player_name.clone(),
        role,
    }
}

pub fn player_view(session: &Session, id: &PlayerId) -> Result<PlayerView, GameError> {
    let player = session.player(id).ok_or_else(|| GameError::PlayerNotFound {
        code: session.code.clone(),
        player_id: id.to_string(),
    })?;

    if session.phase() == RoundPhase::Lobby {
        return Ok(PlayerView::Lobby {
            code: session.code.clone(),
            name: player.name.clone(),
            players: session.players.iter().map(|p| p.name.clone()).collect(),
        });
    }

    let role = if player.is_chameleon {
        PlayerRole::Chameleon {
            other_chameleons: other_chameleons(session, id),
        }
    } else {
        PlayerRole::Informed {
            secret: session.secret.clone(),
        }
    };

    Ok(PlayerView::Active {
        code: session.code.clone(),
        name: player.name.clone(),
        category: session.category.clone(),
        starting_player: session.starting_player_name.clone(),
        role,
    })
}
