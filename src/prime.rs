//! Prime capacities for the bucket stores.
//!
//! Both maps keep their bucket count prime so that `hash mod capacity` spreads keys over every
//! bucket, and so that the quadratic probe sequence of the open-addressing map reaches at least
//! half of the slots before it starts repeating.

/// Returns true if `n` is prime, by trial division with odd factors up to `⌊√n⌋`.
#[must_use]
pub fn is_prime(n: usize) -> bool {
    if n == 2 || n == 3 {
        return true;
    }
    if n < 2 || n % 2 == 0 {
        return false;
    }

    let mut factor: usize = 3;
    while factor.checked_mul(factor).is_some_and(|square| square <= n) {
        if n % factor == 0 {
            return false;
        }
        factor = factor.saturating_add(2);
    }
    true
}

/// Advances `n` to the next prime.
///
/// Even inputs are bumped to the following odd number first, then the candidate moves up in
/// steps of two. Note that this means `next_prime(2) == 3`; construction relies on that.
#[must_use]
pub fn next_prime(n: usize) -> usize {
    let mut candidate = if n % 2 == 0 { n.saturating_add(1) } else { n };
    while !is_prime(candidate) {
        candidate = candidate.saturating_add(2);
    }
    candidate
}

/// Keeps `n` if it is already prime, otherwise advances it with [`next_prime`].
///
/// Used when a table is resized.
#[must_use]
pub fn prime_at_least(n: usize) -> usize {
    if is_prime(n) { n } else { next_prime(n) }
}
