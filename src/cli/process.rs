use crate::codec::LineEndings;
use crate::config::{PipelineConfig, RankOverflow};
use crate::error::Result;
use crate::permutation::RankOrder;
use crate::pipeline::{process_all, CommandExtractor, FileOutcome};
use serde_json::json;
use std::path::PathBuf;

/// Options for the process command; `None` keeps the config file's value
#[derive(Debug, Clone, Default)]
pub struct ProcessOptions {
    pub config: Option<PathBuf>,
    pub size: Option<usize>,
    pub workers: Option<usize>,
    pub output_dir: Option<PathBuf>,
    pub keep_line_endings: bool,
    pub strict_rank: bool,
    pub order: Option<RankOrder>,
    pub timeout_secs: Option<u64>,
    pub soffice: Option<PathBuf>,
}

impl ProcessOptions {
    /// Config file (or defaults) with command-line overrides applied
    pub fn resolve(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::load(path)?,
            None => PipelineConfig::default(),
        };

        if let Some(size) = self.size {
            config.permutation_size = size;
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = Some(dir.clone());
        }
        if self.keep_line_endings {
            config.line_endings = LineEndings::Keep;
        }
        if self.strict_rank {
            config.rank_overflow = RankOverflow::Reject;
        }
        if let Some(order) = self.order {
            config.order = order;
        }
        if let Some(secs) = self.timeout_secs {
            config.converter.timeout_secs = secs;
        }
        if let Some(soffice) = &self.soffice {
            config.converter.soffice = Some(soffice.clone());
        }

        config.validate()?;
        Ok(config)
    }
}

/// Process input files with the command-line converters
pub fn process_files(inputs: &[PathBuf], options: &ProcessOptions) -> Result<Vec<FileOutcome>> {
    let config = options.resolve()?;
    if let Some(dir) = &config.output_dir {
        std::fs::create_dir_all(dir)?;
    }
    let extractor = CommandExtractor::new(&config.converter);
    process_all(inputs, &config, &extractor)
}

/// One line per file plus a summary line
pub fn format_outcomes(outcomes: &[FileOutcome]) -> String {
    let mut output = String::new();
    for outcome in outcomes {
        match &outcome.result {
            Ok(report) => {
                output.push_str(&format!(
                    "ok    {} -> {} ({} bytes, {}-bit value{})\n",
                    report.input.display(),
                    report.artifact.display(),
                    report.retained_bytes,
                    report.value_bits,
                    if report.rank_reduced { ", rank reduced" } else { "" }
                ));
            }
            Err(e) => {
                output.push_str(&format!("FAIL  {}: {}\n", outcome.input.display(), e));
            }
        }
    }

    let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
    output.push_str(&format!(
        "Processed {} files, {} failed\n",
        outcomes.len(),
        failed
    ));
    output
}

/// One JSON object per line
pub fn format_outcomes_json(outcomes: &[FileOutcome]) -> Result<String> {
    let mut output = String::new();
    for outcome in outcomes {
        let value = match &outcome.result {
            Ok(report) => json!({
                "input": outcome.input,
                "status": "ok",
                "report": report,
            }),
            Err(e) => json!({
                "input": outcome.input,
                "status": "error",
                "error": e.to_string(),
            }),
        };
        output.push_str(&serde_json::to_string(&value)?);
        output.push('\n');
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DocpermError;
    use tempfile::tempdir;

    #[test]
    fn test_resolve_overrides_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("docperm.json");
        std::fs::write(&path, r#"{ "permutation_size": 10, "workers": 2 }"#).unwrap();

        let options = ProcessOptions {
            config: Some(path),
            workers: Some(8),
            strict_rank: true,
            order: Some(RankOrder::Lexicographic),
            ..Default::default()
        };
        let config = options.resolve().unwrap();
        assert_eq!(config.permutation_size, 10);
        assert_eq!(config.workers, 8);
        assert_eq!(config.rank_overflow, RankOverflow::Reject);
        assert_eq!(config.order, RankOrder::Lexicographic);
        assert_eq!(config.line_endings, LineEndings::Strip);
    }

    #[test]
    fn test_resolve_validates() {
        let options = ProcessOptions {
            timeout_secs: Some(0),
            ..Default::default()
        };
        assert!(matches!(options.resolve(), Err(DocpermError::InvalidConfig(_))));
    }

    #[test]
    fn test_process_and_format() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("good.txt");
        let bad = dir.path().join("bad.xls");
        std::fs::write(&good, b"hello\nworld").unwrap();
        std::fs::write(&bad, b"cells").unwrap();

        let options = ProcessOptions {
            output_dir: Some(dir.path().join("results")),
            ..Default::default()
        };
        let outcomes = process_files(&[good.clone(), bad.clone()], &options).unwrap();
        assert_eq!(
            std::fs::read(dir.path().join("results/outputfile_good.txt.txt")).unwrap(),
            b"helloworld"
        );

        let text = format_outcomes(&outcomes);
        assert!(text.contains("ok    "));
        assert!(text.contains("FAIL  "));
        assert!(text.contains("Unsupported file type"));
        assert!(text.ends_with("Processed 2 files, 1 failed\n"));

        let json = format_outcomes_json(&outcomes).unwrap();
        let lines: Vec<serde_json::Value> = json
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["status"], "ok");
        assert_eq!(lines[0]["report"]["retained_bytes"], 10);
        assert_eq!(lines[1]["status"], "error");
    }
}
