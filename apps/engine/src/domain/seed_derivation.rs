//! Deterministic per-round seeds derived from a session seed.
//!
//! A session seeded once replays the same words, roles and turn orders.

/// Derive the RNG seed for one round.
///
/// * `session_seed` - seed the session was created with
/// * `epoch` - bumped on every restart so a replayed lobby deals fresh rounds
/// * `round_no` - 1-based round number
/// * `is_final_round` - finals draw from a separate stream
pub fn derive_round_seed(session_seed: u64, epoch: u32, round_no: u32, is_final_round: bool) -> u64 {
    session_seed
        .wrapping_add((epoch as u64).wrapping_mul(1_000_000_007))
        .wrapping_add((round_no as u64).wrapping_mul(10_000))
        .wrapping_add(if is_final_round { 5_000 } else { 0 })
        .wrapping_add(3)
}
