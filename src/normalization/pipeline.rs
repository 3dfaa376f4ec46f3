/*!
 * The four-stage normalization pipeline.
 *
 * Stages run strictly in order, each on the previous stage's output:
 * substitution, hyphen relocation, dot counting, line annotation.
 * A `Pipeline` holds only immutable configuration, every `run` starts with
 * fresh per-document state.
 */

use std::fmt;

use log::{debug, warn};

use crate::normalization::diagnostics;
use crate::normalization::dots::DotCounter;
use crate::normalization::hyphens::relocate_hyphens;
use crate::normalization::line_numbers::{annotate_lines, AnnotationOptions};
use crate::normalization::substitution::{substitute, SubstitutionTable, PAPYRI_SUBSTITUTIONS};
use crate::normalization::warnings::Warnings;

/// Characters of each stage output kept for the log record
pub const DEFAULT_PREVIEW_CHARS: usize = 400;

/// Pipeline stage identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Substitution,
    HyphenRelocation,
    DotCounting,
    LineAnnotation,
}

impl Stage {
    /// Heading used in log records
    pub fn title(&self) -> &'static str {
        match self {
            Self::Substitution => "Simple Substitutions",
            Self::HyphenRelocation => "Moving Hyphens",
            Self::DotCounting => "Counting Dots",
            Self::LineAnnotation => "Annotating Lines",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Leading excerpt of one stage's output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageSnapshot {
    pub stage: Stage,
    pub preview: String,
}

/// Everything one pipeline run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutcome {
    /// Final text, `None` when line annotation aborted
    pub text: Option<String>,
    pub warnings: Warnings,
    pub stages: Vec<StageSnapshot>,
}

impl PipelineOutcome {
    /// Whether the run produced no text
    pub fn is_aborted(&self) -> bool {
        self.text.is_none()
    }
}

/// Configured normalization pipeline
#[derive(Debug, Clone)]
pub struct Pipeline {
    // @field: Primary rules, the built-in papyri table unless replaced
    substitutions: SubstitutionTable,

    // @field: Rules applied after the primary table
    overrides: Option<SubstitutionTable>,

    // @field: Dot counter with its mask patterns
    dots: DotCounter,

    // @field: Line annotation flags
    annotation: AnnotationOptions,

    // @field: Run pre-flight diagnostics on the raw input
    diagnostics: bool,

    // @field: Preview length per stage snapshot
    preview_chars: usize,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self {
            substitutions: PAPYRI_SUBSTITUTIONS.clone(),
            overrides: None,
            dots: DotCounter::default(),
            annotation: AnnotationOptions::default(),
            diagnostics: false,
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_substitutions(mut self, table: SubstitutionTable) -> Self {
        self.substitutions = table;
        self
    }

    pub fn with_overrides(mut self, table: SubstitutionTable) -> Self {
        self.overrides = Some(table);
        self
    }

    pub fn with_dot_counter(mut self, dots: DotCounter) -> Self {
        self.dots = dots;
        self
    }

    pub fn with_annotation(mut self, options: AnnotationOptions) -> Self {
        self.annotation = options;
        self
    }

    pub fn with_diagnostics(mut self, enabled: bool) -> Self {
        self.diagnostics = enabled;
        self
    }

    pub fn with_preview_chars(mut self, chars: usize) -> Self {
        self.preview_chars = chars;
        self
    }

    pub fn annotation(&self) -> AnnotationOptions {
        self.annotation
    }

    /// Run all stages over one document
    pub fn run(&self, text: &str) -> PipelineOutcome {
        let mut warnings = Warnings::new();
        let mut stages = Vec::with_capacity(4);

        if self.diagnostics {
            for finding in diagnostics::scan(text) {
                warn!("{}", finding);
                warnings.push(&finding.to_string());
            }
        }

        let substituted = substitute(text, &self.substitutions, self.overrides.as_ref());
        stages.push(self.snapshot(Stage::Substitution, &substituted));

        let relocated = relocate_hyphens(&substituted);
        stages.push(self.snapshot(Stage::HyphenRelocation, &relocated));

        let counted = self.dots.count(&relocated);
        stages.push(self.snapshot(Stage::DotCounting, &counted));

        let annotation = annotate_lines(&counted, self.annotation);
        warnings.extend(&annotation.warnings);
        if let Some(annotated) = &annotation.text {
            stages.push(self.snapshot(Stage::LineAnnotation, annotated));
        }

        debug!(
            "Pipeline finished: {} stages, {} warnings",
            stages.len(),
            warnings.len()
        );

        PipelineOutcome {
            text: annotation.text,
            warnings,
            stages,
        }
    }

    fn snapshot(&self, stage: Stage, text: &str) -> StageSnapshot {
        StageSnapshot {
            stage,
            preview: text.chars().take(self.preview_chars).collect(),
        }
    }
}
