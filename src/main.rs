use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use dupe_finder_rs::logging::init_logging;
use dupe_finder_rs::prelude::*;

#[derive(Parser)]
#[command(name = "dupe_finder_rs")]
#[command(about = "Find duplicate files by content", long_about = None)]
#[command(
    after_help = "Files are compared by a digest of their full content; names, sizes and \
                  timestamps are not considered.\nAn argument of the form @FILE is replaced \
                  by the lines of FILE."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output (repeat for debug logging)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Number of parallel hashing threads (default: number of CPUs)
    #[arg(short, long, global = true)]
    workers: Option<usize>,

    /// Show a progress bar while hashing
    #[arg(long, global = true)]
    progress: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Report groups of files with identical content
    Dupes {
        #[command(flatten)]
        scan: ScanArgs,

        /// Report format
        #[arg(long, value_enum, default_value = "text")]
        format: ReportFormat,
    },

    /// Export a content fingerprint of every file as JSON
    Fingerprint {
        #[command(flatten)]
        scan: ScanArgs,
    },
}

#[derive(Args)]
struct ScanArgs {
    /// Paths to include in the scan, wildcards are expanded
    #[arg(required = true)]
    paths: Vec<String>,

    /// Recurse into subdirectories
    #[arg(short, long)]
    recurse: bool,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    let args = expand_argfiles(std::env::args_os())?;
    let cli = Cli::parse_from(args);

    init_logging(cli.verbose, cli.quiet);

    // Set up rayon thread pool
    if let Some(workers) = cli.workers {
        rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build_global()
            .context("Failed to build thread pool")?;
    }
    log::info!("using {} worker thread(s)", rayon::current_num_threads());

    let sink = StderrDiagnostics::new(DiagnosticsConfig {
        verbose: cli.verbose > 0,
    });
    let progress = progress_bar(cli.progress);

    match cli.command {
        Command::Dupes { scan, format } => {
            let options = ScanOptions {
                recursive: scan.recurse,
            };
            let result = find_duplicate_files(scan.paths.as_slice(), &options, &sink, &progress);

            let mut out = open_output(scan.output.as_ref())?;
            match format {
                ReportFormat::Text => write_report(&mut out, &result.groups)?,
                ReportFormat::Json => write_json_report(&mut out, &result)?,
            }
        }
        Command::Fingerprint { scan } => {
            let options = ScanOptions {
                recursive: scan.recurse,
            };
            let files = fingerprint_files(scan.paths.as_slice(), &options, &sink, &progress);

            let mut out = open_output(scan.output.as_ref())?;
            write_fingerprints(&mut out, &files)?;
        }
    }

    Ok(())
}

/// Replace `@FILE` arguments with the non-blank lines of FILE
fn expand_argfiles<I: IntoIterator<Item = OsString>>(args: I) -> Result<Vec<OsString>> {
    let mut expanded = Vec::new();

    for (idx, arg) in args.into_iter().enumerate() {
        let argfile = arg
            .to_str()
            .and_then(|s| s.strip_prefix('@'))
            .filter(|path| idx > 0 && !path.is_empty())
            .map(str::to_owned);

        match argfile {
            Some(path) => {
                let contents = fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read argument file {}", path))?;
                expanded.extend(
                    contents
                        .lines()
                        .filter(|line| !line.trim().is_empty())
                        .map(OsString::from),
                );
            }
            None => expanded.push(arg),
        }
    }

    Ok(expanded)
}

fn open_output(path: Option<&PathBuf>) -> Result<Box<dyn Write>> {
    let out: Box<dyn Write> = match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create report file {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    Ok(out)
}

fn progress_bar(enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(0);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}
