//! The single shuffle primitive behind every random permutation in a round.

use rand::Rng;

/// Fisher-Yates shuffle, unbiased for any `Rng`.
///
/// Walks from the back, swapping each slot with a uniformly chosen slot at or
/// before it. `random_range` rejects out-of-range samples internally, so no
/// modulo bias creeps in.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

/// A uniform random permutation of `0..n`.
pub fn random_permutation<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<usize> {
    let mut perm: Vec<usize> = (0..n).collect();
    shuffle(&mut perm, rng);
    perm
}
