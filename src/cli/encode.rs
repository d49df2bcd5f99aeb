use crate::codec::{decode, encode_reader, LineEndings};
use crate::error::{DocpermError, Result};
use num_bigint::BigUint;
use std::fs::File;
use std::path::Path;

/// Options shared by the encode and decode commands
#[derive(Debug, Clone, Copy, Default)]
pub struct CodecOptions {
    pub hex: bool,
    pub line_endings: LineEndings,
}

/// Parse a decimal or (`hex`) hexadecimal integer; `0x` is accepted in hex
pub fn parse_value(text: &str, hex: bool) -> Result<BigUint> {
    let text = text.trim();
    let (digits, radix) = if hex {
        let digits = text
            .strip_prefix("0x")
            .or_else(|| text.strip_prefix("0X"))
            .unwrap_or(text);
        (digits, 16)
    } else {
        (text, 10)
    };
    if digits.is_empty() {
        return Err(DocpermError::InvalidNumber(text.to_string()));
    }
    BigUint::parse_bytes(digits.as_bytes(), radix)
        .ok_or_else(|| DocpermError::InvalidNumber(text.to_string()))
}

pub fn format_value(value: &BigUint, hex: bool) -> String {
    if hex {
        format!("{:x}", value)
    } else {
        value.to_string()
    }
}

/// Encode a file's bytes as an integer
pub fn encode_file(path: &Path, options: &CodecOptions) -> Result<String> {
    let file = File::open(path)?;
    let (value, _) = encode_reader(file, options.line_endings)?;
    Ok(format_value(&value, options.hex))
}

/// Decode an integer and write its bytes; returns the byte count
pub fn decode_to_file(value: &str, output: &Path, options: &CodecOptions) -> Result<usize> {
    let value = parse_value(value, options.hex)?;
    let bytes = decode(&value);
    std::fs::write(output, &bytes)?;
    Ok(bytes.len())
}
