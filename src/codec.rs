//! Byte/integer codec
//!
//! A payload is read as a big-endian base-256 numeral: every retained byte is
//! one digit, the first byte being the most significant. Decoding emits the
//! minimal digit sequence of a value, so the empty payload and zero map to
//! each other.
//!
//! Two things do not survive a round trip:
//!
//! - `\r` and `\n` under [`LineEndings::Strip`] (the default), which are
//!   skipped before they become digits.
//! - Leading `0x00` bytes, which are leading zero digits under either policy.

use crate::error::{DocpermError, Result};
use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use std::io::{ErrorKind, Read};

const READ_CHUNK: usize = 8 * 1024;

/// What happens to `\r` and `\n` bytes during encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LineEndings {
    /// Skip them; they contribute no digits
    #[default]
    Strip,
    /// Encode them like any other byte
    Keep,
}

impl LineEndings {
    fn retains(self, byte: u8) -> bool {
        match self {
            Self::Strip => byte != b'\n' && byte != b'\r',
            Self::Keep => true,
        }
    }
}

impl std::str::FromStr for LineEndings {
    type Err = DocpermError;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "strip" => Ok(Self::Strip),
            "keep" => Ok(Self::Keep),
            _ => Err(DocpermError::InvalidConfig(format!(
                "line endings: {}",
                s
            ))),
        }
    }
}

/// Byte counts observed while encoding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodeStats {
    pub retained: u64,
    pub stripped: u64,
}

/// Incremental encoder; feed chunks with [`Encoder::update`]
#[derive(Debug, Clone, Default)]
pub struct Encoder {
    line_endings: LineEndings,
    value: BigUint,
    stats: EncodeStats,
    digits: Vec<u8>,
}

impl Encoder {
    pub fn new(line_endings: LineEndings) -> Self {
        Self {
            line_endings,
            ..Default::default()
        }
    }

    /// Append a chunk of input. Equivalent to `value = value * 256 + byte`
    /// for every retained byte, applied one chunk at a time.
    pub fn update(&mut self, chunk: &[u8]) {
        self.digits.clear();
        for &byte in chunk {
            if self.line_endings.retains(byte) {
                self.digits.push(byte);
            } else {
                self.stats.stripped += 1;
            }
        }
        if self.digits.is_empty() {
            return;
        }

        self.stats.retained += self.digits.len() as u64;
        self.value <<= 8 * self.digits.len();
        self.value |= BigUint::from_bytes_be(&self.digits);
    }

    pub fn finish(self) -> (BigUint, EncodeStats) {
        (self.value, self.stats)
    }
}

/// Encode a payload with line endings stripped
pub fn encode(bytes: &[u8]) -> BigUint {
    encode_with(bytes, LineEndings::Strip)
}

/// Encode a payload under an explicit line-ending policy
pub fn encode_with(bytes: &[u8], line_endings: LineEndings) -> BigUint {
    let mut encoder = Encoder::new(line_endings);
    encoder.update(bytes);
    encoder.finish().0
}

/// Encode everything a reader yields, chunk by chunk
pub fn encode_reader<R: Read>(
    mut reader: R,
    line_endings: LineEndings,
) -> Result<(BigUint, EncodeStats)> {
    let mut encoder = Encoder::new(line_endings);
    let mut buf = vec![0u8; READ_CHUNK];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        encoder.update(&buf[..n]);
    }
    Ok(encoder.finish())
}

/// Number of base-256 digits in `value`: `ceil(bits / 8)`, zero for zero
pub fn digit_count(value: &BigUint) -> usize {
    value.bits().div_ceil(8) as usize
}

/// Decode a value into its minimal big-endian byte sequence
pub fn decode(value: &BigUint) -> Vec<u8> {
    if value.is_zero() {
        return Vec::new();
    }

    // Least significant digit first, then flip to big-endian
    let mut digits = value.to_bytes_le();
    digits.reverse();
    debug_assert_eq!(digits.len(), digit_count(value));
    digits
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_encode_abc() {
        let value = encode(b"ABC");
        assert_eq!(value, BigUint::from(4_276_803u32));
        assert_eq!(value, BigUint::from(0x414243u32));
        assert_eq!(decode(&value), b"ABC");
    }

    #[test]
    fn test_line_endings_are_dropped() {
        let with_newline = encode(b"A\nB");
        let without = encode(b"AB");
        assert_eq!(with_newline, without);
        assert_eq!(without, BigUint::from(16_706u32));
        assert_eq!(encode(b"\r\nA\r\n\r\nB\n"), without);
    }

    #[test]
    fn test_keep_line_endings() {
        let value = encode_with(b"A\nB", LineEndings::Keep);
        assert_eq!(value, BigUint::from(0x410a42u32));
        assert_eq!(decode(&value), b"A\nB");
    }

    #[test]
    fn test_zero_edges() {
        assert!(encode(b"").is_zero());
        assert!(encode(b"\n\r\n").is_zero());
        assert!(decode(&BigUint::zero()).is_empty());
        assert_eq!(digit_count(&BigUint::zero()), 0);
    }

    #[test]
    fn test_leading_zero_bytes_are_lost() {
        let value = encode(&[0x00, 0x00, 0x41]);
        assert_eq!(value, BigUint::from(0x41u32));
        assert_eq!(decode(&value), vec![0x41]);
    }

    #[test]
    fn test_digit_count() {
        assert_eq!(digit_count(&BigUint::from(1u32)), 1);
        assert_eq!(digit_count(&BigUint::from(255u32)), 1);
        assert_eq!(digit_count(&BigUint::from(256u32)), 2);
        assert_eq!(digit_count(&BigUint::from(0x414243u32)), 3);
    }

    #[test]
    fn test_chunked_updates_match_single_pass() {
        let text: Vec<u8> = (0..5000u32).map(|i| (i % 251) as u8).collect();
        let mut encoder = Encoder::new(LineEndings::Strip);
        for chunk in text.chunks(37) {
            encoder.update(chunk);
        }
        let (value, stats) = encoder.finish();
        assert_eq!(value, encode(&text));

        let newlines = text.iter().filter(|&&b| b == b'\n' || b == b'\r').count() as u64;
        assert_eq!(stats.stripped, newlines);
        assert_eq!(stats.retained, text.len() as u64 - newlines);
    }

    #[test]
    fn test_encode_reader() {
        let text = b"line one\r\nline two\nline three";
        let (value, stats) = encode_reader(&text[..], LineEndings::Strip).unwrap();
        assert_eq!(decode(&value), b"line oneline twoline three");
        assert_eq!(stats.stripped, 3);
        assert_eq!(stats.retained, 26);
    }

    #[test]
    fn test_line_endings_from_str() {
        assert_eq!("strip".parse::<LineEndings>().unwrap(), LineEndings::Strip);
        assert_eq!("KEEP".parse::<LineEndings>().unwrap(), LineEndings::Keep);
        assert!("crlf".parse::<LineEndings>().is_err());
    }

    fn payload() -> impl Strategy<Value = Vec<u8>> {
        // No line endings and a non-zero first byte
        (
            1u8..=255,
            prop::collection::vec(any::<u8>().prop_filter("line ending", |b| *b != b'\n' && *b != b'\r'), 0..512),
        )
            .prop_filter("first byte is a line ending", |(first, _)| *first != b'\n' && *first != b'\r')
            .prop_map(|(first, mut rest)| {
                rest.insert(0, first);
                rest
            })
    }

    proptest! {
        #[test]
        fn prop_decode_inverts_encode(bytes in payload()) {
            prop_assert_eq!(decode(&encode(&bytes)), bytes);
        }

        #[test]
        fn prop_encode_inverts_decode(value in any::<Vec<u32>>()) {
            let value = BigUint::new(value);
            prop_assert_eq!(encode_with(&decode(&value), LineEndings::Keep), value);
        }
    }
}
