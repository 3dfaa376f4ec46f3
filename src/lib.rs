/*!
 * # prepapyri - normalization of papyrological transcriptions
 *
 * A Rust library that turns hand-typed Coptic/Greek transcriptions into a
 * normalized form ready for import into an edition database.
 *
 * ## Features
 *
 * - Ordered regex substitutions for symbols, sigla, brackets and lacunae
 * - Relocation of line-final hyphens onto the continuation line
 * - Counting of lacuna dots (`...` becomes `.3`)
 * - Fragment splitting with propagated line numbers
 * - Pre-flight diagnostics for input the stages cannot repair
 * - Batch processing of a workspace with daily log files and archiving
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `normalization`: the text stages and the pipeline that chains them
 * - `app_config`: Configuration management
 * - `app_controller`: Batch processing of a workspace
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod normalization;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{BatchOptions, BatchSummary, Controller, FileOutcome, FileStatus};
pub use errors::{AppError, PipelineError};
pub use normalization::{
    annotate_lines, count_dots, relocate_hyphens, substitute, AnnotationOptions, Pipeline,
    PipelineOutcome, Warnings,
};
