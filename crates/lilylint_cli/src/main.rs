//! LilyLint CLI
//!
//! Command line linter for LilyPond sources, driving the LilyPond
//! compiler as its diagnostic source.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use lilylint_core::{Linter, LinterConfig, NoOpenDocuments};

mod output;

use output::FileReport;
use output::json::output_json;
use output::text::output_text;

/// LilyLint - LilyPond source linter
#[derive(Parser)]
#[command(name = "lilylint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check files
    Check {
        /// Files to check
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,

        /// LilyPond executable to use
        #[arg(long)]
        executable: Option<String>,
    },

    /// Initialize configuration
    Init {
        /// Force overwrite existing config
        #[arg(long)]
        force: bool,
    },

    /// Start the LSP server
    Lsp,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(has_errors) => {
            if has_errors {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<bool> {
    match &cli.command {
        Commands::Check {
            files,
            format,
            executable,
        } => run_check(&cli, files, format, executable.as_deref()),
        Commands::Init { force } => run_init(*force).map(|_| false),
        Commands::Lsp => run_lsp().map(|_| false),
    }
}

fn run_check(
    cli: &Cli,
    files: &[PathBuf],
    format: &str,
    executable: Option<&str>,
) -> Result<bool> {
    let mut config = if let Some(ref path) = cli.config {
        LinterConfig::from_file(path).into_diagnostic()?
    } else {
        find_config()?
    };

    if let Some(executable) = executable {
        config.executable_path = executable.to_string();
    }

    let linter = Linter::new(config);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .into_diagnostic()?;

    let mut reports = Vec::new();
    let mut failures = Vec::new();

    for file in files {
        let path = std::path::absolute(file).into_diagnostic()?;
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                failures.push((path, e.to_string()));
                continue;
            }
        };

        match runtime.block_on(linter.check(Some(&path), &text, &NoOpenDocuments)) {
            Ok(outcome) => reports.push(FileReport { path, outcome }),
            Err(e) => failures.push((path, e.to_string())),
        }
    }

    if !failures.is_empty() {
        eprintln!("\n{} file(s) failed to check:", failures.len());
        for (path, error) in &failures {
            eprintln!("  {}: {}", path.display(), error);
        }
    }

    match format {
        "json" => output_json(&reports)?,
        "text" => output_text(&reports),
        other => return Err(miette::miette!("Unknown output format: {}", other)),
    }

    let has_errors = reports.iter().any(|r| r.has_errors());
    Ok(has_errors || !failures.is_empty())
}

fn find_config() -> Result<LinterConfig> {
    let cwd = std::env::current_dir().into_diagnostic()?;
    if let Some(path) = LinterConfig::discover(&cwd) {
        info!("Using config: {}", path.display());
        return LinterConfig::from_file(&path).into_diagnostic();
    }

    info!("No config file found, using defaults");
    Ok(LinterConfig::new())
}

fn run_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(LinterConfig::CONFIG_FILES[0]);

    if config_path.exists() {
        if !force {
            return Err(miette::miette!(
                "Config file already exists. Use --force to overwrite."
            ));
        }
        std::fs::remove_file(&config_path).into_diagnostic()?;
    }

    let default_config = serde_json::to_string_pretty(&LinterConfig::new()).into_diagnostic()?;
    std::fs::write(&config_path, format!("{}\n", default_config)).into_diagnostic()?;
    info!("Created {}", config_path.display());
    Ok(())
}

fn run_lsp() -> Result<()> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .into_diagnostic()?
        .block_on(async {
            lilylint_lsp::run().await;
        });
    Ok(())
}
