//! Round lifecycle: Lobby <-> Active

use std::collections::HashSet;
use std::num::NonZeroUsize;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::words::{SecretWord, WordSource};

use super::chameleon::{select_chameleons, ChameleonRequest};
use super::{GameError, PlayerId, Session};

/// Validated host input for starting a round
#[derive(Debug, Clone, Default)]
pub struct RoundParams {
    /// Ignored when the session draws random secrets
    pub category: Option<String>,
    /// Ignored when the session draws random secrets
    pub secret: Option<String>,
    /// Players the host picked as chameleons
    pub chameleon_ids: HashSet<PlayerId>,
    /// Number of chameleons to pick at random
    pub random_count: Option<NonZeroUsize>,
}

impl Session {
    /// Start a round, or restart one that is already running.
    ///
    /// On error the session is left untouched.
    pub fn start_round<R: Rng>(
        &mut self,
        params: RoundParams,
        words: &dyn WordSource,
        rng: &mut R,
    ) -> Result<(), GameError> {
        let word = self.resolve_secret(&params, words, rng)?;

        if self.players.is_empty() {
            return Err(GameError::NoPlayers);
        }

        let request = ChameleonRequest {
            count: params.random_count,
            selected: params.chameleon_ids,
            weighted: self.random_chameleon_mode,
        };
        let chameleons =
            select_chameleons(&self.player_ids(), &request, self.rules.chameleon_skew, rng);

        for player in &mut self.players {
            player.is_chameleon = chameleons.contains(&player.id);
        }

        self.starting_player_name = self
            .players
            .choose(rng)
            .map(|p| p.name.clone())
            .unwrap_or_default();
        self.category = word.category;
        self.secret = word.secret;
        self.round_active = true;
        self.touch();
        Ok(())
    }

    /// Return to the lobby, clearing everything round-scoped.
    /// Calling it from the lobby changes nothing.
    pub fn new_round(&mut self) {
        self.round_active = false;
        self.secret.clear();
        self.category.clear();
        self.starting_player_name.clear();
        self.reset_roles();
        self.touch();
    }

    fn resolve_secret<R: Rng>(
        &self,
        params: &RoundParams,
        words: &dyn WordSource,
        rng: &mut R,
    ) -> Result<SecretWord, GameError> {
        let word = if self.use_random_secret {
            words.random_word(rng).ok_or(GameError::MissingSecret)?
        } else {
            SecretWord {
                category: params.category.as_deref().unwrap_or_default().trim().to_string(),
                secret: params.secret.as_deref().unwrap_or_default().trim().to_string(),
            }
        };

        if word.category.trim().is_empty() || word.secret.trim().is_empty() {
            return Err(GameError::MissingSecret);
        }
        Ok(word)
    }
}
