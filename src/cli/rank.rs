use crate::cli::encode::{format_value, parse_value};
use crate::error::{DocpermError, Result};
use crate::permutation::{Permutation, RankOrder};

/// Parse symbols separated by commas and/or whitespace
pub fn parse_symbols(text: &str) -> Result<Vec<usize>> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<usize>()
                .map_err(|_| DocpermError::InvalidNumber(s.to_string()))
        })
        .collect()
}

/// Rank a permutation given as text
pub fn rank_symbols(text: &str, order: RankOrder, hex: bool) -> Result<String> {
    let permutation = Permutation::new(parse_symbols(text)?)?;
    Ok(format_value(&order.rank(&permutation), hex))
}

/// Unrank a rank given as text into a comma-separated permutation
pub fn unrank_value(rank: &str, n: usize, order: RankOrder, hex: bool) -> Result<String> {
    let rank = parse_value(rank, hex)?;
    Ok(order.unrank(&rank, n)?.to_string())
}
