//! Joining, kicking and role bookkeeping on a session roster

use rand::Rng;

use super::code;
use super::{GameError, Player, PlayerId, Session};

impl Session {
    /// Add a player under a fresh id
    pub fn join<R: Rng + ?Sized>(&mut self, name: String, rng: &mut R) -> Result<PlayerId, GameError> {
        if self.players.len() >= self.rules.max_players {
            return Err(GameError::RosterFull {
                max: self.rules.max_players,
            });
        }
        if self.round_active {
            return Err(GameError::RoundInProgress);
        }

        let id = code::generate_unique(
            rng,
            |r| code::player_token(r),
            |candidate| self.players.iter().any(|p| p.id.as_str() == candidate),
            self.rules.max_id_attempts,
        )?;
        let id = PlayerId::from(id);

        self.players.push(Player::new(id.clone(), name));
        self.touch();
        Ok(id)
    }

    /// Remove a player; removing an unknown id is not an error
    pub fn kick(&mut self, id: &PlayerId) -> Result<Option<Player>, GameError> {
        if self.round_active {
            return Err(GameError::RoundInProgress);
        }
        if self.is_host_player(id) {
            return Err(GameError::ProtectedHost);
        }

        self.touch();
        Ok(self
            .players
            .iter()
            .position(|p| &p.id == id)
            .map(|pos| self.players.remove(pos)))
    }

    /// Clear every chameleon flag
    pub fn reset_roles(&mut self) {
        for player in &mut self.players {
            player.is_chameleon = false;
        }
    }
}
