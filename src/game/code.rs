//! Session codes and per-session player tokens

use rand::Rng;

use super::GameError;

/// Number of characters in a session code
pub const CODE_LEN: usize = 4;

/// Number of characters in a player token
pub const PLAYER_TOKEN_LEN: usize = 6;

/// Redraws allowed before giving up on a free identifier
pub const MAX_ATTEMPTS: usize = 10_000;

const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const TOKEN_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

fn draw<R: Rng + ?Sized>(rng: &mut R, alphabet: &[u8], len: usize) -> String {
    (0..len)
        .map(|_| alphabet[rng.gen_range(0..alphabet.len())] as char)
        .collect()
}

/// Draw a single session code, uniform and independent per position
pub fn session_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    draw(rng, CODE_ALPHABET, CODE_LEN)
}

/// Draw a single player token
pub fn player_token<R: Rng + ?Sized>(rng: &mut R) -> String {
    draw(rng, TOKEN_ALPHABET, PLAYER_TOKEN_LEN)
}

/// Keep drawing with `generate` until `taken` rejects nothing, or fail after
/// `max_attempts` draws.
pub fn generate_unique<R, G, T>(
    rng: &mut R,
    mut generate: G,
    taken: T,
    max_attempts: usize,
) -> Result<String, GameError>
where
    R: Rng + ?Sized,
    G: FnMut(&mut R) -> String,
    T: Fn(&str) -> bool,
{
    for _ in 0..max_attempts {
        let candidate = generate(rng);
        if !taken(&candidate) {
            return Ok(candidate);
        }
    }
    Err(GameError::CapacityExhausted)
}

/// Uppercase a code as typed by a user so it matches registry keys
pub fn normalize_code(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}

/// Check that a string looks like a session code
#[cfg(test)]
pub fn is_valid_code(code: &str) -> bool {
    code.len() == CODE_LEN && code.bytes().all(|b| b.is_ascii_uppercase())
}
