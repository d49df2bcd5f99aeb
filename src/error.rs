use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocpermError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Permutation has {actual} symbols, expected {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Symbol {symbol} out of range for a permutation of length {n}")]
    SymbolOutOfRange { symbol: usize, n: usize },

    #[error("Symbol {0} appears more than once")]
    DuplicateSymbol(usize),

    #[error("Rank must be less than {n}! ({bits}-bit rank given)")]
    RankOutOfRange { n: usize, bits: u64 },

    #[error("Invalid number: {0}")]
    InvalidNumber(String),

    #[error("Unsupported file type: {}", .0.display())]
    UnsupportedFileType(PathBuf),

    #[error("Converter not found: {0}")]
    ConverterNotFound(String),

    #[error("{tool} failed on {}: {reason}", .input.display())]
    ConversionFailed {
        tool: String,
        input: PathBuf,
        reason: String,
    },

    #[error("{tool} timed out after {secs}s on {}", .input.display())]
    ConversionTimedOut {
        tool: String,
        input: PathBuf,
        secs: u64,
    },

    #[error("{} would overwrite the artifact of {}", .input.display(), .first.display())]
    ArtifactCollision { input: PathBuf, first: PathBuf },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, DocpermError>;
