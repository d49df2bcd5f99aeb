use crate::codec::{decode, encode_reader, LineEndings};
use crate::config::{PipelineConfig, RankOverflow};
use crate::error::Result;
use crate::permutation::factorial;
use crate::pipeline::extract::TextExtractor;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Prefix of every result artifact's file name
pub const ARTIFACT_PREFIX: &str = "outputfile_";

/// Milliseconds spent in each step of [`process_file`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTimings {
    pub extract_ms: u64,
    pub encode_ms: u64,
    pub decode_ms: u64,
    pub unrank_ms: u64,
}

fn millis(since: Instant) -> u64 {
    since.elapsed().as_millis() as u64
}

/// What happened to one input file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
    pub input: PathBuf,
    pub artifact: PathBuf,
    pub retained_bytes: u64,
    pub stripped_bytes: u64,
    pub value_bits: u64,
    pub permutation_size: usize,
    /// The encoded value was reduced modulo `n!` before unranking
    pub rank_reduced: bool,
    pub artifact_sha256: String,
    pub stages: StageTimings,
    pub elapsed_ms: u64,
}

/// `<dir>/outputfile_<file name>.txt`, where `dir` defaults to the input's directory
pub fn artifact_path(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    let mut name = std::ffi::OsString::from(ARTIFACT_PREFIX);
    name.push(input.file_name().unwrap_or_default());
    name.push(".txt");

    let dir = output_dir.or_else(|| input.parent()).unwrap_or(Path::new(""));
    dir.join(name)
}

/// Run one file through extract → encode → artifact → unrank
pub fn process_file<E: TextExtractor + ?Sized>(
    input: &Path,
    config: &PipelineConfig,
    extractor: &E,
) -> Result<FileReport> {
    let start = Instant::now();
    let mut stages = StageTimings::default();

    // Step 1: Plain text from the document
    let step = Instant::now();
    let text = extractor.extract(input)?;
    stages.extract_ms = millis(step);

    // Step 2: Encode the text as one integer
    let step = Instant::now();
    let (value, stats) = encode_reader(text, config.line_endings)?;
    stages.encode_ms = millis(step);
    let value_bits = value.bits();
    debug!(
        input = %input.display(),
        retained = stats.retained,
        stripped = stats.stripped,
        bits = value_bits,
        "encoded"
    );

    // Step 3: Write the decoded bytes as the result artifact
    let artifact = artifact_path(input, config.output_dir.as_deref());
    let step = Instant::now();
    let bytes = decode(&value);
    std::fs::write(&artifact, &bytes)?;
    stages.decode_ms = millis(step);
    if config.line_endings == LineEndings::Strip && stats.stripped > 0 {
        warn!(
            artifact = %artifact.display(),
            stripped = stats.stripped,
            "artifact omits line-ending bytes"
        );
    }
    let artifact_sha256 = hex::encode(Sha256::digest(&bytes));

    // Step 4: Bring the value into [0, n!) when configured to
    let n = config.permutation_size;
    let (rank, rank_reduced) = match config.rank_overflow {
        RankOverflow::Reject => (value, false),
        RankOverflow::Reduce => {
            let bound = factorial(n);
            if value < bound {
                (value, false)
            } else {
                (value % bound, true)
            }
        }
    };

    // Step 5: Unrank. The permutation is not persisted anywhere.
    let step = Instant::now();
    let permutation = config.order.unrank(&rank, n)?;
    stages.unrank_ms = millis(step);
    let permutation_size = permutation.len();
    drop(permutation);

    let elapsed_ms = millis(start);
    debug!(
        input = %input.display(),
        extract_ms = stages.extract_ms,
        encode_ms = stages.encode_ms,
        decode_ms = stages.decode_ms,
        unrank_ms = stages.unrank_ms,
        "stage timings"
    );
    info!(
        input = %input.display(),
        artifact = %artifact.display(),
        rank_reduced,
        elapsed_ms,
        "processed"
    );

    Ok(FileReport {
        input: input.to_path_buf(),
        artifact,
        retained_bytes: stats.retained,
        stripped_bytes: stats.stripped,
        value_bits,
        permutation_size,
        rank_reduced,
        artifact_sha256,
        stages,
        elapsed_ms,
    })
}
