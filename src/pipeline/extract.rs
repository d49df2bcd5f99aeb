use crate::config::ConverterConfig;
use crate::error::{DocpermError, Result};
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};
use tempfile::TempDir;
use tracing::debug;

const POLL_INTERVAL: Duration = Duration::from_millis(25);
const STDERR_TAIL: usize = 512;

/// Places LibreOffice is usually installed when `soffice` is not on `PATH`
const SOFFICE_LOCATIONS: &[&str] = &[
    "/Applications/LibreOffice.app/Contents/MacOS/soffice",
    "/usr/lib/libreoffice/program/soffice",
    "/usr/local/lib/libreoffice/program/soffice",
    "/opt/libreoffice/program/soffice",
    "/snap/bin/libreoffice",
];

/// Supported input document kinds, by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Word,
    Text,
}

impl DocumentKind {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match extension.as_deref() {
            Some("pdf") => Ok(Self::Pdf),
            Some("doc") | Some("docx") => Ok(Self::Word),
            Some("txt") => Ok(Self::Text),
            _ => Err(DocpermError::UnsupportedFileType(path.to_path_buf())),
        }
    }
}

/// Plain text produced for one input, readable in chunks
pub struct ExtractedText {
    reader: Box<dyn Read + Send>,
    // Holds the conversion output until the text has been read
    _scratch: Option<TempDir>,
}

impl ExtractedText {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            reader: Box::new(Cursor::new(bytes)),
            _scratch: None,
        }
    }

    pub fn from_file(file: File) -> Self {
        Self {
            reader: Box::new(file),
            _scratch: None,
        }
    }

    fn converted(file: File, scratch: TempDir) -> Self {
        Self {
            reader: Box::new(file),
            _scratch: Some(scratch),
        }
    }
}

impl Read for ExtractedText {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.reader.read(buf)
    }
}

/// Turns an input document into plain text
pub trait TextExtractor: Send + Sync {
    fn extract(&self, input: &Path) -> Result<ExtractedText>;
}

/// Extractor backed by `pdftotext` and LibreOffice
#[derive(Debug, Clone)]
pub struct CommandExtractor {
    pdftotext: PathBuf,
    soffice: Option<PathBuf>,
    timeout: Duration,
}

impl CommandExtractor {
    /// Build from config, searching for `soffice` when no path is configured
    pub fn new(config: &ConverterConfig) -> Self {
        let soffice = config.soffice.clone().or_else(locate_soffice);
        match &soffice {
            Some(path) => debug!(soffice = %path.display(), "using LibreOffice"),
            None => debug!("LibreOffice not found; doc/docx inputs will fail"),
        }
        Self {
            pdftotext: config.pdftotext.clone(),
            soffice,
            timeout: config.timeout(),
        }
    }

    fn pdf_to_text(&self, input: &Path) -> Result<ExtractedText> {
        let scratch = TempDir::new()?;
        let output = scratch.path().join(text_name(input));

        let mut command = Command::new(&self.pdftotext);
        command.arg(input).arg(&output);
        run_converter("pdftotext", command, input, scratch.path(), self.timeout)?;

        let file = open_output("pdftotext", input, &output)?;
        Ok(ExtractedText::converted(file, scratch))
    }

    fn word_to_text(&self, input: &Path) -> Result<ExtractedText> {
        let soffice = self
            .soffice
            .as_ref()
            .ok_or_else(|| DocpermError::ConverterNotFound("soffice".into()))?;
        let scratch = TempDir::new()?;

        // A private profile keeps concurrent LibreOffice instances apart
        let profile = scratch.path().join("profile");
        let mut command = Command::new(soffice);
        command
            .arg(format!("-env:UserInstallation=file://{}", profile.display()))
            .args(["--headless", "--convert-to", "txt:Text", "--outdir"])
            .arg(scratch.path())
            .arg(input);
        run_converter("soffice", command, input, scratch.path(), self.timeout)?;

        let output = scratch.path().join(text_name(input));
        let file = open_output("soffice", input, &output)?;
        Ok(ExtractedText::converted(file, scratch))
    }
}

impl TextExtractor for CommandExtractor {
    fn extract(&self, input: &Path) -> Result<ExtractedText> {
        match DocumentKind::from_path(input)? {
            DocumentKind::Pdf => self.pdf_to_text(input),
            DocumentKind::Word => self.word_to_text(input),
            DocumentKind::Text => Ok(ExtractedText::from_file(File::open(input)?)),
        }
    }
}

/// Find `soffice` on `PATH` or in a usual install location
pub fn locate_soffice() -> Option<PathBuf> {
    let on_path = std::env::var_os("PATH").and_then(|paths| {
        std::env::split_paths(&paths)
            .map(|dir| dir.join("soffice"))
            .find(|candidate| candidate.is_file())
    });
    on_path.or_else(|| {
        SOFFICE_LOCATIONS
            .iter()
            .map(PathBuf::from)
            .find(|candidate| candidate.is_file())
    })
}

/// `<stem>.txt`, the name both converters give their output
fn text_name(input: &Path) -> PathBuf {
    let mut name = input.file_stem().unwrap_or_default().to_os_string();
    name.push(".txt");
    PathBuf::from(name)
}

fn open_output(tool: &str, input: &Path, output: &Path) -> Result<File> {
    File::open(output).map_err(|e| DocpermError::ConversionFailed {
        tool: tool.into(),
        input: input.to_path_buf(),
        reason: format!("no output at {}: {}", output.display(), e),
    })
}

/// Run a converter to completion, killing it at the deadline
fn run_converter(
    tool: &str,
    mut command: Command,
    input: &Path,
    scratch: &Path,
    timeout: Duration,
) -> Result<()> {
    let stderr_path = scratch.join(format!("{}.stderr", tool));
    let stderr = File::create(&stderr_path)?;

    let start = Instant::now();
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::from(stderr))
        .spawn()
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => DocpermError::ConverterNotFound(tool.into()),
            _ => DocpermError::Io(e),
        })?;

    let status: ExitStatus = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if start.elapsed() >= timeout {
            let _ = child.kill();
            let _ = child.wait();
            return Err(DocpermError::ConversionTimedOut {
                tool: tool.into(),
                input: input.to_path_buf(),
                secs: timeout.as_secs(),
            });
        }
        std::thread::sleep(POLL_INTERVAL);
    };

    debug!(
        tool,
        input = %input.display(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "conversion finished"
    );

    if !status.success() {
        let log = std::fs::read(&stderr_path).unwrap_or_default();
        let tail = &log[log.len().saturating_sub(STDERR_TAIL)..];
        return Err(DocpermError::ConversionFailed {
            tool: tool.into(),
            input: input.to_path_buf(),
            reason: format!("{}: {}", status, String::from_utf8_lossy(tail).trim()),
        });
    }
    Ok(())
}
