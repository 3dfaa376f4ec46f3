// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use prepapyri::app_config::{self, Config};
use prepapyri::app_controller::{BatchOptions, Controller};

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
    /// Normalize every file of a workspace's input folder (default command)
    Run(RunArgs),

    /// Normalize a single file and print the result
    File {
        /// Transcription to normalize
        #[arg(value_name = "PATH")]
        path: PathBuf,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Generate shell completions for prepapyri
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Options shared by every processing command
#[derive(Args, Debug, Clone)]
struct CommonArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Do not propagate line numbers
    #[arg(long)]
    no_line_numbers: bool,

    /// Request recto/verso detection
    #[arg(long)]
    recto_verso: bool,

    /// Skip the pre-flight diagnostics
    #[arg(long)]
    no_diagnostics: bool,
}

#[derive(Args, Debug, Clone)]
struct RunArgs {
    /// Workspace holding the in/out/log/archive folders
    #[arg(value_name = "WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Replace outputs that already exist
    #[arg(short, long)]
    force_overwrite: bool,

    /// Leave processed inputs in the input folder
    #[arg(short, long)]
    keep_input: bool,

    #[command(flatten)]
    common: CommonArgs,
}

/// prepapyri - normalization of papyrological transcriptions
#[derive(Parser, Debug)]
#[command(name = "prepapyri")]
#[command(version)]
#[command(about = "Normalizes Coptic and Greek papyrus transcriptions")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "prepapyri rewrites hand-typed papyrus transcriptions into a normalized form:
symbol and siglum substitutions, hyphen relocation, lacuna dot counting and
line numbering.

EXAMPLES:
    prepapyri                                  # Process ./in into ./out
    prepapyri ~/papyri                         # Process the workspace ~/papyri
    prepapyri -f --keep-input ~/papyri         # Overwrite outputs, keep inputs
    prepapyri file page.txt                    # Print one normalized file
    prepapyri completions bash > prepapyri.bash

WORKSPACE:
    in/       transcriptions to process
    out/      normalized output, named <file>_out
    log/      daily log files, log_<YYYY-MM-DD>.txt
    archive/  processed inputs

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    run: RunArgs,
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

    // @returns: ANSI color and tag for level
    fn get_style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, tag) = Self::get_style_for_level(record.level());
            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, tag, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // The logger accepts everything, the effective level is the global max level
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "prepapyri", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Run(args)) => run_batch(args),
        Some(Commands::File { path, common }) => run_single(path, common),
        None => run_batch(cli.run),
    }
}

fn run_batch(args: RunArgs) -> Result<()> {
    let mut config = load_config(&args.common)?;
    if let Some(workspace) = &args.workspace {
        config.workspace.root = workspace.clone();
    }

    let controller = Controller::with_config(config)?;
    let summary = controller.run_folder(BatchOptions {
        force_overwrite: args.force_overwrite,
        keep_input: args.keep_input,
    })?;

    if summary.errors > 0 {
        return Err(anyhow!("{} of {} files failed", summary.errors, summary.total()));
    }
    Ok(())
}

fn run_single(path: PathBuf, common: CommonArgs) -> Result<()> {
    if !path.is_file() {
        return Err(anyhow!("Input file does not exist: {:?}", path));
    }

    let config = load_config(&common)?;
    let controller = Controller::with_config(config)?;
    let outcome = controller.normalize_file(&path)?;

    match outcome.text {
        Some(text) => {
            let mut stdout = std::io::stdout();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
        None => Err(anyhow!("Line annotation aborted, no output for {:?}", path)),
    }
}

/// Load or create the configuration, apply CLI overrides and validate it
fn load_config(options: &CommonArgs) -> Result<Config> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let (mut config, created) = Config::load_or_create(&options.config)?;
    if created {
        warn!("Config file not found at {:?}, created default config.", options.config);
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
    if options.no_line_numbers {
        config.annotation.line_numbers = false;
    }
    if options.recto_verso {
        config.annotation.recto_verso = true;
    }
    if options.no_diagnostics {
        config.diagnostics = false;
    }

    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    info!("Using configuration {:?}", options.config);
    Ok(config)
}
