use clap::{Parser, Subcommand};
use docperm::cli::{
    decode_to_file, encode_file, format_outcomes, format_outcomes_json, process_files,
    rank_symbols, unrank_value, CodecOptions, ProcessOptions,
};
use docperm::{LineEndings, RankOrder};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Version info from build.rs
const VERSION: &str = env!("DOCPERM_VERSION");
const PROFILE: &str = env!("DOCPERM_PROFILE");
const GIT_HASH: &str = env!("DOCPERM_GIT_HASH");

#[derive(Parser)]
#[command(name = "docperm")]
#[command(author, about = "Encode document text as a big integer and unrank it into a permutation", long_about = None)]
struct Cli {
    /// Print version
    #[arg(short = 'V', long)]
    version: bool,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the document pipeline over files
    #[command(alias = "p")]
    Process {
        /// Input documents (pdf, doc, docx, txt)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// JSON config file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Permutation size n
        #[arg(short = 'n', long)]
        size: Option<usize>,

        /// Worker threads
        #[arg(long)]
        workers: Option<usize>,

        /// Directory for result artifacts (default: next to each input)
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Encode line endings instead of stripping them
        #[arg(long)]
        keep_line_endings: bool,

        /// Fail files whose value is not below n! instead of reducing it
        #[arg(long)]
        strict_rank: bool,

        /// Rank order: swap or lexicographic
        #[arg(long, value_parser = parse_order)]
        order: Option<RankOrder>,

        /// Seconds allowed per external conversion
        #[arg(long)]
        timeout: Option<u64>,

        /// Path to LibreOffice's soffice
        #[arg(long)]
        soffice: Option<PathBuf>,

        /// Print one JSON object per file
        #[arg(long)]
        json: bool,
    },

    /// Encode a file's bytes as an integer
    #[command(alias = "e")]
    Encode {
        file: PathBuf,

        /// Print hexadecimal
        #[arg(long)]
        hex: bool,

        /// Encode line endings instead of stripping them
        #[arg(long)]
        keep_line_endings: bool,
    },

    /// Decode an integer into bytes
    #[command(alias = "d")]
    Decode {
        value: String,

        /// Output file
        output: PathBuf,

        /// Value is hexadecimal
        #[arg(long)]
        hex: bool,
    },

    /// Rank a permutation, e.g. "3,0,2,1"
    #[command(alias = "r")]
    Rank {
        symbols: String,

        #[arg(long, default_value = "swap", value_parser = parse_order)]
        order: RankOrder,

        /// Print hexadecimal
        #[arg(long)]
        hex: bool,
    },

    /// Rebuild the permutation of size n with a given rank
    #[command(alias = "u")]
    Unrank {
        rank: String,

        n: usize,

        #[arg(long, default_value = "swap", value_parser = parse_order)]
        order: RankOrder,

        /// Rank is hexadecimal
        #[arg(long)]
        hex: bool,
    },
}

fn parse_order(s: &str) -> Result<RankOrder, String> {
    s.parse().map_err(|e| format!("{}", e))
}

fn line_endings(keep: bool) -> LineEndings {
    if keep {
        LineEndings::Keep
    } else {
        LineEndings::Strip
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "docperm=debug" } else { "docperm=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.version {
        println!("docperm {} {} ({})", PROFILE, VERSION, GIT_HASH);
        return ExitCode::SUCCESS;
    }

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            use clap::CommandFactory;
            let _ = Cli::command().print_help();
            println!();
            return ExitCode::SUCCESS;
        }
    };

    init_tracing(cli.verbose);

    let result = match command {
        Commands::Process {
            files,
            config,
            size,
            workers,
            output_dir,
            keep_line_endings,
            strict_rank,
            order,
            timeout,
            soffice,
            json,
        } => {
            let options = ProcessOptions {
                config,
                size,
                workers,
                output_dir,
                keep_line_endings,
                strict_rank,
                order,
                timeout_secs: timeout,
                soffice,
            };

            process_files(&files, &options).and_then(|outcomes| {
                let report = if json {
                    format_outcomes_json(&outcomes)?
                } else {
                    format_outcomes(&outcomes)
                };
                print!("{}", report);
                if outcomes.iter().all(|o| o.is_ok()) {
                    Ok(ExitCode::SUCCESS)
                } else {
                    Ok(ExitCode::FAILURE)
                }
            })
        }

        Commands::Encode {
            file,
            hex,
            keep_line_endings,
        } => {
            let options = CodecOptions {
                hex,
                line_endings: line_endings(keep_line_endings),
            };
            encode_file(&file, &options).map(|value| {
                println!("{}", value);
                ExitCode::SUCCESS
            })
        }

        Commands::Decode { value, output, hex } => {
            let options = CodecOptions {
                hex,
                ..Default::default()
            };
            decode_to_file(&value, &output, &options).map(|written| {
                println!("Wrote {} bytes to {}", written, output.display());
                ExitCode::SUCCESS
            })
        }

        Commands::Rank {
            symbols,
            order,
            hex,
        } => rank_symbols(&symbols, order, hex).map(|rank| {
            println!("{}", rank);
            ExitCode::SUCCESS
        }),

        Commands::Unrank {
            rank,
            n,
            order,
            hex,
        } => unrank_value(&rank, n, order, hex).map(|permutation| {
            println!("{}", permutation);
            ExitCode::SUCCESS
        }),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
