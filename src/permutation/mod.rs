//! Permutations and their ranks in the factorial number system
//!
//! Two orderings are available:
//!
//! - [`RankOrder::Swap`]: the Myrvold–Ruskey ordering. Ranking and unranking
//!   are a sequence of transpositions driven by an inverse array, so both run
//!   in `O(n)` big-integer operations.
//! - [`RankOrder::Lexicographic`]: the Lehmer-code ordering, in which the
//!   identity has rank `0` and the reversal has rank `n! - 1`.
//!
//! Both are bijections between permutations of length `n` and `[0, n!)`.
//! Unranking rejects ranks outside that interval instead of wrapping them.

mod rank;
mod unrank;

pub use rank::{rank, rank_lexicographic};
pub use unrank::{unrank, unrank_lexicographic};

use crate::error::{DocpermError, Result};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A bijection from positions `0..n` onto symbols `0..n`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct Permutation(Vec<usize>);

impl Permutation {
    /// `[0, 1, ..., n-1]`
    pub fn identity(n: usize) -> Self {
        Self((0..n).collect())
    }

    /// Validate `symbols` as a permutation of `0..symbols.len()`
    pub fn new(symbols: Vec<usize>) -> Result<Self> {
        let n = symbols.len();
        let mut seen = vec![false; n];
        for &symbol in &symbols {
            if symbol >= n {
                return Err(DocpermError::SymbolOutOfRange { symbol, n });
            }
            if seen[symbol] {
                return Err(DocpermError::DuplicateSymbol(symbol));
            }
            seen[symbol] = true;
        }
        Ok(Self(symbols))
    }

    /// Validate `symbols` against a declared length
    pub fn with_len(symbols: Vec<usize>, n: usize) -> Result<Self> {
        if symbols.len() != n {
            return Err(DocpermError::LengthMismatch {
                expected: n,
                actual: symbols.len(),
            });
        }
        Self::new(symbols)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<usize> {
        self.0
    }

    /// `inverse[self[i]] == i` for every position `i`
    pub fn inverse(&self) -> Vec<usize> {
        let mut inverse = vec![0usize; self.0.len()];
        for (position, &symbol) in self.0.iter().enumerate() {
            inverse[symbol] = position;
        }
        inverse
    }
}

impl TryFrom<Vec<usize>> for Permutation {
    type Error = DocpermError;
    fn try_from(symbols: Vec<usize>) -> Result<Self> {
        Self::new(symbols)
    }
}

impl From<Permutation> for Vec<usize> {
    fn from(p: Permutation) -> Self {
        p.0
    }
}

impl fmt::Display for Permutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, symbol) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", symbol)?;
        }
        Ok(())
    }
}

/// Which factorial-number-system ordering ranks refer to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RankOrder {
    #[default]
    Swap,
    Lexicographic,
}

impl RankOrder {
    pub fn rank(self, permutation: &Permutation) -> BigUint {
        match self {
            Self::Swap => rank(permutation),
            Self::Lexicographic => rank_lexicographic(permutation),
        }
    }

    pub fn unrank(self, rank: &BigUint, n: usize) -> Result<Permutation> {
        match self {
            Self::Swap => unrank(rank, n),
            Self::Lexicographic => unrank_lexicographic(rank, n),
        }
    }
}

impl std::str::FromStr for RankOrder {
    type Err = DocpermError;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "swap" | "myrvold-ruskey" => Ok(Self::Swap),
            "lex" | "lexicographic" => Ok(Self::Lexicographic),
            _ => Err(DocpermError::InvalidConfig(format!("rank order: {}", s))),
        }
    }
}

/// `n!` as a big integer
pub fn factorial(n: usize) -> BigUint {
    (2..=n as u64).fold(BigUint::from(1u32), |acc, k| acc * k)
}

/// Low 64 bits of `value`; callers only pass values below a machine-word divisor
fn low_word(value: &BigUint) -> usize {
    value.iter_u64_digits().next().unwrap_or(0) as usize
}

/// Fenwick tree over `0..n` counting which symbols are still unused
struct AvailableSymbols {
    tree: Vec<usize>,
}

impl AvailableSymbols {
    fn full(n: usize) -> Self {
        // Every symbol starts available: node i covers (i - lowbit(i), i]
        let tree = (0..=n).map(|i| i & i.wrapping_neg()).collect();
        Self { tree }
    }

    fn remove(&mut self, symbol: usize) {
        let mut i = symbol + 1;
        while i < self.tree.len() {
            self.tree[i] -= 1;
            i += i & i.wrapping_neg();
        }
    }

    /// Number of available symbols strictly below `symbol`
    fn count_below(&self, symbol: usize) -> usize {
        let mut i = symbol;
        let mut count = 0;
        while i > 0 {
            count += self.tree[i];
            i -= i & i.wrapping_neg();
        }
        count
    }

    /// The available symbol with exactly `k` available symbols below it
    fn nth(&self, mut k: usize) -> usize {
        let n = self.tree.len() - 1;
        let mut step = if n == 0 { 0 } else { 1 << (usize::BITS - 1 - n.leading_zeros()) };
        let mut position = 0;
        while step > 0 {
            let next = position + step;
            if next <= n && self.tree[next] <= k {
                position = next;
                k -= self.tree[next];
            }
            step >>= 1;
        }
        position
    }
}
