//! vault-export - copy a note and its direct links into one flat directory
//!
//! Reads the target markdown note, finds its `[[wiki-links]]` and
//! `![image](...)` / `[link](...)` references, resolves them against the
//! working directory and the note's folder, and copies the note plus every
//! resolved file into the output directory without any subfolders.
//!
//! # Execution Flow
//!
//! 1. Parse arguments (usage error and non-zero exit when incomplete)
//! 2. Validate the target (nothing is created when it is rejected)
//! 3. Initialize logging (stderr, plus rotating files with `--log-dir`), create the output directory
//! 4. Extract → resolve → plan → copy
//! 5. Print the summary to stdout

use std::process::ExitCode;

use anyhow::Result;
use camino::Utf8PathBuf;
use clap::Parser;

use vault_export::models::{ExportConfig, ExportRun, LogLevel, LogSettings};
use vault_export::services::validate_target;
use vault_export::{APP_NAME, ExportError, Exporter, VERSION};

#[derive(Parser)]
#[command(name = "vault-export")]
#[command(version, about = "Export a note and its linked files to a flat directory", long_about = None)]
#[command(after_help = "EXAMPLES:
    vault-export vault/note.md out/             Copy note.md and its links into out/
    vault-export --dry-run vault/note.md out/   Show what would be copied")]
struct Cli {
    /// Markdown note to export
    #[arg(value_name = "TARGET_FILE")]
    target_file: Utf8PathBuf,

    /// Directory to copy into (created if missing)
    #[arg(value_name = "OUTPUT_DIRECTORY")]
    output_directory: Utf8PathBuf,

    /// Print the copy plan without copying anything
    #[arg(long)]
    dry_run: bool,

    /// Only print warnings and errors
    #[arg(short, long)]
    quiet: bool,

    /// Print resolution details
    #[arg(short, long, conflicts_with = "quiet")]
    debug: bool,

    /// Also write daily-rotated log files to this directory
    #[arg(long, value_name = "DIR")]
    log_dir: Option<Utf8PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            if e.downcast_ref::<ExportError>().is_some_and(ExportError::is_preflight) {
                eprintln!("Usage: vault-export <TARGET_FILE> <OUTPUT_DIRECTORY>");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    // before logging, so a rejected target leaves no log directory behind
    validate_target(&cli.target_file)?;

    let log_settings = LogSettings {
        level: LogLevel::from_flags(cli.quiet, cli.debug),
        log_dir: cli.log_dir,
    };
    let _guard = vault_export::logging::setup_logging(&log_settings)?;

    tracing::debug!("Starting {} v{}", APP_NAME, VERSION);

    let config = ExportConfig::new(cli.target_file, cli.output_directory).dry_run(cli.dry_run);

    println!(
        "Exporting '{}' and linked files to '{}'...",
        config.target_file, config.output_dir
    );

    let export = Exporter::new().run(&config)?;

    if export.dry_run {
        print_plan(&export);
    }
    println!("\n{}", export.summary());

    Ok(())
}

fn print_plan(export: &ExportRun) {
    println!("Planned copies:");
    for entry in export.plan.iter() {
        let note = if entry.overwrites_earlier {
            " (overwrites)"
        } else {
            ""
        };
        println!(
            "  {} -> {}{}",
            entry.file.source,
            entry.output_path(&export.output_dir),
            note
        );
    }
}
