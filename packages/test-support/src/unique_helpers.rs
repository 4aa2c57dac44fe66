//! Test data helpers.

use ulid::Ulid;

/// Generate a unique string with the given prefix, `{prefix}-{ulid}`.
///
/// ```
/// use test_support::unique_str;
///
/// let a = unique_str("player");
/// assert_ne!(a, unique_str("player"));
/// assert!(a.starts_with("player-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// `n` distinct player names that never collide across tests.
pub fn unique_names(n: usize) -> Vec<String> {
    (0..n).map(|_| unique_str("player")).collect()
}

/// Lobby-style names `Giocatore 1..=n`.
pub fn numbered_names(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("Giocatore {i}")).collect()
}
