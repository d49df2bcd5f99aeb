use super::{low_word, AvailableSymbols, Permutation};
use crate::error::{DocpermError, Result};
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::Zero;

/// Rebuild the permutation of length `n` with the given swap-order rank.
///
/// Starting from the identity, level `k` (from `n` down to `1`) divides the
/// rank by `k` and swaps the remainder's position with position `k - 1`.
/// A non-zero quotient left after the last level means `rank >= n!`.
pub fn unrank(rank: &BigUint, n: usize) -> Result<Permutation> {
    let mut work: Vec<usize> = (0..n).collect();
    let mut remaining = rank.clone();

    for k in (1..=n).rev() {
        let (quotient, remainder) = remaining.div_rem(&BigUint::from(k));
        work.swap(low_word(&remainder), k - 1);
        remaining = quotient;
    }

    if !remaining.is_zero() {
        return Err(out_of_range(rank, n));
    }
    Ok(Permutation(work))
}

/// Rebuild the permutation of length `n` with the given lexicographic rank
pub fn unrank_lexicographic(rank: &BigUint, n: usize) -> Result<Permutation> {
    // Lehmer digits, least significant (radix 1) last
    let mut digits = vec![0usize; n];
    let mut remaining = rank.clone();
    for i in (0..n).rev() {
        let (quotient, remainder) = remaining.div_rem(&BigUint::from(n - i));
        digits[i] = low_word(&remainder);
        remaining = quotient;
    }

    if !remaining.is_zero() {
        return Err(out_of_range(rank, n));
    }

    let mut available = AvailableSymbols::full(n);
    let symbols = digits
        .into_iter()
        .map(|digit| {
            let symbol = available.nth(digit);
            available.remove(symbol);
            symbol
        })
        .collect();
    Ok(Permutation(symbols))
}

fn out_of_range(rank: &BigUint, n: usize) -> DocpermError {
    DocpermError::RankOutOfRange {
        n,
        bits: rank.bits(),
    }
}
