// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]
// Add other lints specific to this module that you want to allow but not auto-fix

use anyhow::{Result, Context};
use log::{error, info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use voxbeowulf::app_config::{self, Config};
use voxbeowulf::app_controller::Controller;
use voxbeowulf::errors::AppError;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch the text, extract the line sequence and write every export (default command)
    Run,

    /// Check a persisted record list against the poem's invariants
    Validate {
        /// Record list to check, defaults to the configured JSON export
        #[arg(long, value_name = "PATH")]
        json: Option<PathBuf>,
    },

    /// Generate shell completions for voxbeowulf
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// voxbeowulf - Beowulf parallel text extractor
///
/// Scrapes the Old English / Modern English parallel text of Beowulf into a
/// line-numbered sequence and writes it as JSON, CSV and per-fitt ASS captions.
#[derive(Parser, Debug)]
#[command(name = "voxbeowulf")]
#[command(version)]
#[command(about = "Beowulf parallel text extractor")]
#[command(long_about = "voxbeowulf scrapes the Old English / Modern English parallel text of Beowulf \
and exports it as a line-numbered record list, a table and per-fitt caption files.

EXAMPLES:
    voxbeowulf                                  # Fetch (or reuse the cached page) and export
    voxbeowulf validate                         # Check the configured JSON export
    voxbeowulf validate --json other.json       # Check a specific record list
    voxbeowulf --log-level debug run            # Export with debug logging
    voxbeowulf completions bash > voxbeowulf.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long = "config", default_value = "conf.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Marker and ANSI colour for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("ERROR", "1;31"),
            Level::Warn => ("WARN ", "1;33"),
            Level::Info => ("INFO ", "1;32"),
            Level::Debug => ("DEBUG", "1;36"),
            Level::Trace => ("TRACE", "1;35"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level() && metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (marker, colour) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "\x1B[{}m{} {} {}\x1B[0m", colour, now, marker, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    match run_cli().await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Dispatch the command line. `Ok(false)` means the command ran but its
/// result is a failure, e.g. a validation check did not hold.
async fn run_cli() -> Result<bool> {
    // The logger accepts everything up to trace; the effective level is set
    // through max_level once the config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "voxbeowulf", &mut std::io::stdout());
        return Ok(true);
    }

    // If log level is set via command line, apply it immediately
    if let Some(level) = &cli.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level.into());
    }

    let mut config = Config::load_or_create(&cli.config_path)?;

    // Update log level in config if specified via command line
    match &cli.log_level {
        Some(level) => config.log_level = level.clone().into(),
        None => log::set_max_level(config.log_level.into()),
    }

    let controller = Controller::with_config(config)
        .with_context(|| format!("Invalid configuration in {}", cli.config_path))?;

    match cli.command {
        None | Some(Commands::Run) => run_pipeline(&controller).await,
        Some(Commands::Validate { json }) => {
            let path = json.unwrap_or_else(|| controller.json_path());
            let report = controller.validate_file(&path)?;
            println!("{}", report);
            Ok(report.all_passed())
        }
        Some(Commands::Completions { .. }) => Ok(true),
    }
}

async fn run_pipeline(controller: &Controller) -> Result<bool> {
    match controller.run().await {
        Ok(summary) => {
            info!(
                "Exported {} lines: {}, {}, {} caption files",
                summary.line_count,
                summary.json_path.display(),
                summary.csv_path.display(),
                summary.caption_paths.len()
            );
            Ok(true)
        }
        Err(AppError::Fetch(e)) => {
            error!("Could not obtain the source text: {}", e);
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}
