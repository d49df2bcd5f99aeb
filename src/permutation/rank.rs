use super::{AvailableSymbols, Permutation};
use num_bigint::BigUint;
use num_traits::Zero;

/// Rank a permutation in the swap (Myrvold–Ruskey) order.
///
/// Works on a copy of the permutation together with its inverse. At level
/// `k` the symbol `s` sitting in the last live position is recorded as a
/// digit, then symbol `k - 1` is swapped into that position so the first
/// `k - 1` positions hold a permutation of `0..k-1`. The digits fold into
/// `rank = sub_rank * k + s` from the innermost level outwards.
pub fn rank(permutation: &Permutation) -> BigUint {
    let n = permutation.len();
    let mut work = permutation.as_slice().to_vec();
    let mut inverse = permutation.inverse();

    let mut digits = Vec::with_capacity(n.saturating_sub(1));
    for k in (2..=n).rev() {
        let last = k - 1;
        let s = work[last];
        let home = inverse[last];

        work.swap(last, home);
        inverse.swap(s, last);
        digits.push(s);
    }

    let mut rank = BigUint::zero();
    for (k, &s) in (2..=n).zip(digits.iter().rev()) {
        rank = rank * k as u64 + s as u64;
    }
    rank
}

/// Rank a permutation in lexicographic order via its Lehmer code
pub fn rank_lexicographic(permutation: &Permutation) -> BigUint {
    let n = permutation.len();
    let mut available = AvailableSymbols::full(n);

    let mut rank = BigUint::zero();
    for (i, &symbol) in permutation.as_slice().iter().enumerate() {
        let digit = available.count_below(symbol);
        available.remove(symbol);
        rank = rank * (n - i) as u64 + digit as u64;
    }
    rank
}
