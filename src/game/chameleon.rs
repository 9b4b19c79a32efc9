//! Chameleon role assignment
//!
//! Given the roster and what the host asked for, decide which players bluff
//! this round. Selection rules are tried in order and the first applicable
//! one wins:
//!
//! 1. an explicit count of random chameleons
//! 2. an explicit set of players picked by the host
//! 3. a weighted random count (host-participates mode)
//! 4. one uniformly random chameleon

use std::collections::HashSet;
use std::num::NonZeroUsize;

use rand::seq::SliceRandom;
use rand::Rng;

use super::PlayerId;

/// Skew applied to the weighted count distribution unless configured
pub const DEFAULT_SKEW: f64 = 1.5;

/// How the host wants chameleons chosen for one round
#[derive(Debug, Clone, Default)]
pub struct ChameleonRequest {
    /// Pick this many at random
    pub count: Option<NonZeroUsize>,
    /// Use exactly these players
    pub selected: HashSet<PlayerId>,
    /// Draw the count from [`count_distribution`]
    pub weighted: bool,
}

/// Decide which of `players` are chameleons.
///
/// The result is empty only when `players` is empty.
pub fn select_chameleons<R: Rng + ?Sized>(
    players: &[PlayerId],
    request: &ChameleonRequest,
    skew: f64,
    rng: &mut R,
) -> HashSet<PlayerId> {
    let n = players.len();
    if n == 0 {
        return HashSet::new();
    }

    if let Some(count) = request.count {
        // Leave at least one player who knows the word, unless there is only one
        let k = count.get().min(n - 1).max(1);
        return choose_distinct(players, k, rng);
    }

    let selected: HashSet<PlayerId> = request
        .selected
        .iter()
        .filter(|id| players.contains(id))
        .cloned()
        .collect();
    if !selected.is_empty() {
        return selected;
    }

    if request.weighted {
        let k = sample_count(n, skew, rng);
        return choose_distinct(players, k, rng);
    }

    choose_distinct(players, 1, rng)
}

/// Pick `k` distinct players, every subset of size `k` equally likely
pub fn choose_distinct<R: Rng + ?Sized>(
    players: &[PlayerId],
    k: usize,
    rng: &mut R,
) -> HashSet<PlayerId> {
    let mut pool = players.to_vec();
    let (chosen, _) = pool.partial_shuffle(rng, k.min(players.len()));
    chosen.iter().cloned().collect()
}

/// Probability of exactly `k` chameleons for `k = 1..=n`, index `k - 1`.
///
/// A geometric distribution truncated to `[1, n]` and renormalized. Larger
/// rosters flatten it, larger `skew` pushes mass toward one chameleon.
pub fn count_distribution(n: usize, skew: f64) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }

    let r = 1.0 - 1.0 / (n as f64).sqrt();
    let q = r.powf(skew);
    let denom = 1.0 - q.powi(n as i32);

    // q rounds to 1 for a vanishing skew; the limit is uniform
    if !(denom > 0.0 && denom.is_finite()) {
        return vec![1.0 / n as f64; n];
    }

    (1..=n)
        .map(|k| q.powi(k as i32 - 1) * (1.0 - q) / denom)
        .collect()
}

/// Draw a chameleon count in `[1, n]` from [`count_distribution`]
pub fn sample_count<R: Rng + ?Sized>(n: usize, skew: f64, rng: &mut R) -> usize {
    let u: f64 = rng.gen();
    let mut cumulative = 0.0;
    for (i, p) in count_distribution(n, skew).into_iter().enumerate() {
        cumulative += p;
        if cumulative >= u {
            return i + 1;
        }
    }
    // Rounding left the total just under u
    n
}
