use crate::config::PipelineConfig;
use crate::error::{DocpermError, Result};
use crate::pipeline::extract::TextExtractor;
use crate::pipeline::process::{artifact_path, process_file, FileReport};
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{error, info};

/// Result of one file's task
#[derive(Debug)]
pub struct FileOutcome {
    pub input: PathBuf,
    pub result: Result<FileReport>,
}

impl FileOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Process every input on a pool of `config.workers` threads.
///
/// Each input is processed exactly once, and the call returns after all of
/// them have finished. Outcomes are in input order. A failing file is
/// reported in its outcome and does not affect the others. An input whose
/// artifact path was already claimed by an earlier input fails with
/// [`DocpermError::ArtifactCollision`] without being processed.
pub fn process_all<E: TextExtractor + ?Sized>(
    inputs: &[PathBuf],
    config: &PipelineConfig,
    extractor: &E,
) -> Result<Vec<FileOutcome>> {
    config.validate()?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.workers)
        .thread_name(|i| format!("docperm-worker-{}", i))
        .build()?;

    info!(files = inputs.len(), workers = config.workers, "dispatching");

    let owners = artifact_owners(inputs, config);

    let outcomes: Vec<FileOutcome> = pool.install(|| {
        inputs
            .par_iter()
            .zip(owners.par_iter())
            .map(|(input, owner)| {
                let result = match owner {
                    Some(first) => Err(DocpermError::ArtifactCollision {
                        input: input.clone(),
                        first: first.clone(),
                    }),
                    None => process_file(input, config, extractor),
                };
                if let Err(e) = &result {
                    error!(input = %input.display(), error = %e, "file failed");
                }
                FileOutcome {
                    input: input.clone(),
                    result,
                }
            })
            .collect()
    });

    let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
    info!(
        succeeded = outcomes.len() - failed,
        failed,
        "all files processed"
    );
    Ok(outcomes)
}

/// For each input, the earlier input that already claimed its artifact path
fn artifact_owners(inputs: &[PathBuf], config: &PipelineConfig) -> Vec<Option<PathBuf>> {
    let mut claimed: HashMap<PathBuf, &PathBuf> = HashMap::new();
    inputs
        .iter()
        .map(|input| {
            let artifact = artifact_path(input, config.output_dir.as_deref());
            match claimed.get(&artifact) {
                Some(first) => Some((*first).clone()),
                None => {
                    claimed.insert(artifact, input);
                    None
                }
            }
        })
        .collect()
}
