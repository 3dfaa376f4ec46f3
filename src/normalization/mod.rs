/*!
 * Normalization of papyrological transcriptions.
 *
 * The stages of the pipeline, in order:
 * - `substitution`: ordered regex rules for symbols, sigla and brackets
 * - `hyphens`: moves line-final hyphens onto the continuation line
 * - `dots`: collapses lacuna dots into `.N` counts
 * - `line_numbers`: splits fragments and propagates line numbers
 *
 * `pipeline` chains them, `diagnostics` inspects raw input beforehand.
 * None of these modules touch the file system.
 */

pub mod diagnostics;
pub mod dots;
pub mod hyphens;
pub mod line_numbers;
pub mod pipeline;
pub mod substitution;
pub mod warnings;

// Re-export main types
pub use dots::{count_dots, DotCounter, DEFAULT_MASK_PATTERN};
pub use hyphens::{relocate_hyphens, HyphenMove, HYPHEN_CHARS};
pub use line_numbers::{annotate_lines, Annotation, AnnotationOptions};
pub use pipeline::{Pipeline, PipelineOutcome, Stage, StageSnapshot};
pub use substitution::{substitute, SubstitutionRule, SubstitutionTable, PAPYRI_SUBSTITUTIONS};
pub use warnings::Warnings;
