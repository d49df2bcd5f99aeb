use crate::codec::LineEndings;
use crate::error::{DocpermError, Result};
use crate::permutation::RankOrder;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Permutation size used when none is configured
pub const DEFAULT_PERMUTATION_SIZE: usize = 1000;
/// Worker threads used when none are configured
pub const DEFAULT_WORKERS: usize = 4;
/// Deadline for a single external conversion
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// What to do when an encoded payload is not below `n!`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RankOverflow {
    /// Reduce the value modulo `n!` before unranking
    #[default]
    Reduce,
    /// Fail the file with `RankOutOfRange`
    Reject,
}

/// External converter locations and limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    pub pdftotext: PathBuf,
    pub soffice: Option<PathBuf>,
    pub timeout_secs: u64,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            pdftotext: PathBuf::from("pdftotext"),
            soffice: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ConverterConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Settings for a pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub permutation_size: usize,
    pub workers: usize,
    /// Directory for result artifacts; each input's own directory when unset
    pub output_dir: Option<PathBuf>,
    pub line_endings: LineEndings,
    pub rank_overflow: RankOverflow,
    pub order: RankOrder,
    pub converter: ConverterConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            permutation_size: DEFAULT_PERMUTATION_SIZE,
            workers: DEFAULT_WORKERS,
            output_dir: None,
            line_endings: LineEndings::default(),
            rank_overflow: RankOverflow::default(),
            order: RankOrder::default(),
            converter: ConverterConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Load a JSON config file; missing fields take their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        let config: Self = serde_json::from_slice(&data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(DocpermError::InvalidConfig(
                "workers must be at least 1".into(),
            ));
        }
        if self.converter.timeout_secs == 0 {
            return Err(DocpermError::InvalidConfig(
                "converter timeout must be at least 1 second".into(),
            ));
        }
        Ok(())
    }
}

impl std::str::FromStr for RankOverflow {
    type Err = DocpermError;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "reduce" => Ok(Self::Reduce),
            "reject" => Ok(Self::Reject),
            _ => Err(DocpermError::InvalidConfig(format!("rank overflow: {}", s))),
        }
    }
}
