use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::normalization::{AnnotationOptions, DotCounter, Pipeline, DEFAULT_MASK_PATTERN};

/// Application configuration module
/// Loading, validating and saving the batch settings stored in `conf.json`.
/// Substitution rules are built in and not part of the file.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Workspace directories
    #[serde(default)]
    pub workspace: WorkspaceConfig,

    /// Line annotation flags
    #[serde(default)]
    pub annotation: AnnotationConfig,

    /// Dot counting settings
    #[serde(default)]
    pub dots: DotConfig,

    /// Run pre-flight diagnostics on every input
    #[serde(default = "default_true")]
    pub diagnostics: bool,

    /// Characters of each stage output copied into the log record
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Directory layout of a processing workspace
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WorkspaceConfig {
    // @field: Base directory, the others are resolved against it
    #[serde(default = "default_root")]
    pub root: PathBuf,

    // @field: Transcriptions waiting to be processed
    #[serde(default = "default_input_dir")]
    pub input_dir: String,

    // @field: Normalized output
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    // @field: Daily log files
    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    // @field: Processed inputs
    #[serde(default = "default_archive_dir")]
    pub archive_dir: String,

    // @field: Appended to the input file name for the output file
    #[serde(default = "default_output_suffix")]
    pub output_suffix: String,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            input_dir: default_input_dir(),
            output_dir: default_output_dir(),
            log_dir: default_log_dir(),
            archive_dir: default_archive_dir(),
            output_suffix: default_output_suffix(),
        }
    }
}

impl WorkspaceConfig {
    pub fn input_path(&self) -> PathBuf {
        self.root.join(&self.input_dir)
    }

    pub fn output_path(&self) -> PathBuf {
        self.root.join(&self.output_dir)
    }

    pub fn log_path(&self) -> PathBuf {
        self.root.join(&self.log_dir)
    }

    pub fn archive_path(&self) -> PathBuf {
        self.root.join(&self.archive_dir)
    }

    /// All workspace directories, in bootstrap order
    pub fn directories(&self) -> [PathBuf; 4] {
        [
            self.input_path(),
            self.output_path(),
            self.log_path(),
            self.archive_path(),
        ]
    }
}

/// Line annotation flags
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AnnotationConfig {
    /// Propagate line numbers from numeric anchor lines
    #[serde(default = "default_true")]
    pub line_numbers: bool,

    /// Recto/verso detection (not implemented, only warns)
    #[serde(default)]
    pub recto_verso: bool,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            line_numbers: true,
            recto_verso: false,
        }
    }
}

impl From<&AnnotationConfig> for AnnotationOptions {
    fn from(config: &AnnotationConfig) -> Self {
        Self {
            line_numbers: config.line_numbers,
            recto_verso: config.recto_verso,
        }
    }
}

/// Dot counting settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DotConfig {
    /// Regex patterns whose matches are never dot-counted
    #[serde(default = "default_mask_patterns")]
    pub mask_patterns: Vec<String>,
}

impl Default for DotConfig {
    fn default() -> Self {
        Self {
            mask_patterns: default_mask_patterns(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_preview_chars() -> usize {
    400
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_input_dir() -> String {
    "in".to_string()
}

fn default_output_dir() -> String {
    "out".to_string()
}

fn default_log_dir() -> String {
    "log".to_string()
}

fn default_archive_dir() -> String {
    "archive".to_string()
}

fn default_output_suffix() -> String {
    "_out".to_string()
}

fn default_mask_patterns() -> Vec<String> {
    vec![DEFAULT_MASK_PATTERN.to_string()]
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            workspace: WorkspaceConfig::default(),
            annotation: AnnotationConfig::default(),
            dots: DotConfig::default(),
            diagnostics: true,
            preview_chars: default_preview_chars(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load a configuration file, or write and return the defaults if it is missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<(Self, bool)> {
        let path = path.as_ref();
        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let config: Config = serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            return Ok((config, false));
        }

        let config = Config::default();
        config.save(path)?;
        Ok((config, true))
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        let workspace = &self.workspace;
        let names = [
            ("input_dir", &workspace.input_dir),
            ("output_dir", &workspace.output_dir),
            ("log_dir", &workspace.log_dir),
            ("archive_dir", &workspace.archive_dir),
        ];
        for (field, value) in names {
            if value.trim().is_empty() {
                return Err(anyhow!("Workspace {} must not be empty", field));
            }
        }

        if workspace.input_dir == workspace.archive_dir {
            return Err(anyhow!("Workspace input_dir and archive_dir must differ"));
        }

        if workspace.output_suffix.is_empty() {
            return Err(anyhow!("Workspace output_suffix must not be empty"));
        }

        DotCounter::new(&self.dots.mask_patterns).context("Invalid dot mask pattern")?;

        Ok(())
    }

    /// Build the normalization pipeline described by this configuration
    pub fn build_pipeline(&self) -> Result<Pipeline> {
        let dots = DotCounter::new(&self.dots.mask_patterns)?;
        Ok(Pipeline::new()
            .with_dot_counter(dots)
            .with_annotation(AnnotationOptions::from(&self.annotation))
            .with_diagnostics(self.diagnostics)
            .with_preview_chars(self.preview_chars))
    }
}
