use anyhow::Context;
use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::normalization::{Pipeline, PipelineOutcome};

// @module: Application controller for batch normalization

const RECORD_RULE: &str = "-----------------------------------";
const STAGE_RULE: &str = "----------";

/// Per-run switches that do not belong in the configuration file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOptions {
    // @field: Replace outputs that already exist
    pub force_overwrite: bool,

    // @field: Leave processed inputs in place instead of archiving them
    pub keep_input: bool,
}

/// What happened to a single input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    /// Normalized text written to the given path
    Written(PathBuf),
    /// Output already existed, nothing was done
    Skipped(PathBuf),
    /// Line annotation produced no text, no output written
    Aborted,
}

/// Result of processing one input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub input: PathBuf,
    pub status: FileStatus,
    /// Whether the input was moved to the archive
    pub archived: bool,
    pub warning_count: usize,
}

/// Counters for a whole batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub skipped: usize,
    pub aborted: usize,
    pub errors: usize,
}

impl BatchSummary {
    fn record(&mut self, status: &FileStatus) {
        match status {
            FileStatus::Written(_) => self.processed += 1,
            FileStatus::Skipped(_) => self.skipped += 1,
            FileStatus::Aborted => self.aborted += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.processed + self.skipped + self.aborted + self.errors
    }
}

/// Main application controller for transcription normalization
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Pipeline built from the configuration
    pipeline: Pipeline,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self, AppError> {
        let pipeline = config
            .build_pipeline()
            .map_err(|e| AppError::Config(format!("{:#}", e)))?;

        Ok(Self { config, pipeline })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Create the workspace directories that do not exist yet
    pub fn ensure_workspace(&self) -> Result<(), AppError> {
        for dir in self.config.workspace.directories() {
            if !FileManager::dir_exists(&dir) {
                debug!("Creating workspace directory {:?}", dir);
            }
            FileManager::ensure_dir(&dir).map_err(file_error)?;
        }
        Ok(())
    }

    /// Normalize a single file without touching the workspace
    pub fn normalize_file<P: AsRef<Path>>(&self, path: P) -> Result<PipelineOutcome, AppError> {
        let text = FileManager::read_text(path.as_ref()).map_err(file_error)?;
        Ok(self.pipeline.run(&text))
    }

    /// Process every input file of the workspace
    /// A failing file is logged and counted, the batch carries on
    pub fn run_folder(&self, options: BatchOptions) -> Result<BatchSummary, AppError> {
        let start_time = std::time::Instant::now();

        self.ensure_workspace()?;

        let input_dir = self.config.workspace.input_path();
        let input_files = FileManager::find_files(&input_dir)
            .with_context(|| format!("Failed to list input directory: {:?}", input_dir))
            .map_err(file_error)?;

        let mut summary = BatchSummary::default();

        if input_files.is_empty() {
            info!("No input files found in {:?}", input_dir);
            return Ok(summary);
        }

        let progress_bar = ProgressBar::new(input_files.len() as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("#>-"));

        for input_file in &input_files {
            let file_name = display_name(input_file);
            progress_bar.set_message(format!("Processing: {}", file_name));

            match self.process_file(input_file, options) {
                Ok(outcome) => summary.record(&outcome.status),
                Err(e) => {
                    error!("Error processing file {}: {}", file_name, e);
                    summary.errors += 1;
                }
            }

            progress_bar.inc(1);
        }

        progress_bar.finish_with_message("Folder processing complete");

        info!(
            "Folder processing completed in {:.2?}: {} processed, {} skipped, {} aborted, {} errors",
            start_time.elapsed(),
            summary.processed,
            summary.skipped,
            summary.aborted,
            summary.errors
        );

        Ok(summary)
    }

    /// Normalize one input file, write its output, log and archive it
    pub fn process_file<P: AsRef<Path>>(
        &self,
        input_file: P,
        options: BatchOptions,
    ) -> Result<FileOutcome, AppError> {
        let input_file = input_file.as_ref();
        let workspace = &self.config.workspace;
        let file_name = display_name(input_file);

        let output_path = FileManager::generate_output_path(
            input_file,
            workspace.output_path(),
            &workspace.output_suffix,
        );

        if FileManager::file_exists(&output_path) && !options.force_overwrite {
            warn!(
                "Skipping {}, output already exists (use --force-overwrite to replace it)",
                file_name
            );
            return Ok(FileOutcome {
                input: input_file.to_path_buf(),
                status: FileStatus::Skipped(output_path),
                archived: false,
                warning_count: 0,
            });
        }

        // The stages log their own warnings, they only go to the record here
        let outcome = self.normalize_file(input_file)?;
        let log_path = FileManager::daily_log_path(workspace.log_path(), Local::now().date_naive());

        let Some(text) = &outcome.text else {
            warn!("Line annotation aborted for {}, no output written", file_name);
            FileManager::append_to_log_file(&log_path, &format_log_record(&file_name, &outcome))
                .map_err(file_error)?;
            return Ok(FileOutcome {
                input: input_file.to_path_buf(),
                status: FileStatus::Aborted,
                archived: false,
                warning_count: outcome.warnings.len(),
            });
        };

        // The log record follows a successful write
        FileManager::write_to_file(&output_path, text).map_err(file_error)?;
        debug!("Wrote {:?}", output_path);

        FileManager::append_to_log_file(&log_path, &format_log_record(&file_name, &outcome))
            .map_err(file_error)?;

        let archived = if options.keep_input {
            false
        } else {
            let archive_path = workspace.archive_path().join(input_file.file_name().unwrap_or_default());
            FileManager::move_file(input_file, &archive_path).map_err(file_error)?;
            debug!("Archived {} to {:?}", file_name, archive_path);
            true
        };

        info!("Success: {:?}", output_path);

        Ok(FileOutcome {
            input: input_file.to_path_buf(),
            status: FileStatus::Written(output_path),
            archived,
            warning_count: outcome.warnings.len(),
        })
    }
}

/// Banner naming the tool and its version
pub fn version_banner() -> String {
    format!("{} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

/// Body of the log record for one processed file
/// The log writer prefixes it with the timestamp
pub fn format_log_record(file_name: &str, outcome: &PipelineOutcome) -> String {
    let warnings = if outcome.warnings.is_empty() {
        "none".to_string()
    } else {
        outcome.warnings.messages().collect::<Vec<_>>().join("\n\t")
    };

    let mut record = format!(
        "{}\n{}\nprocessing:\n\t{}\nwarnings:\n\t{}\n",
        RECORD_RULE,
        version_banner(),
        file_name,
        warnings
    );

    for snapshot in &outcome.stages {
        record.push_str(&format!(
            "{}\n{}\n{}\n{}\n",
            STAGE_RULE, snapshot.stage, STAGE_RULE, snapshot.preview
        ));
    }

    record.push_str(RECORD_RULE);
    record
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn file_error(error: anyhow::Error) -> AppError {
    AppError::File(format!("{:#}", error))
}
