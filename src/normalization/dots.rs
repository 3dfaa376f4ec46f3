/*!
 * Lacuna dot counting.
 *
 * Runs of dots (optionally spaced) become `.N` where N is the number of dots.
 * Spans matching a mask pattern, and the canonical `[.?]` marker, are swapped
 * for reserved tokens before counting and restored afterwards, so they come
 * back byte-for-byte unchanged.
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::errors::PipelineError;
use crate::normalization::substitution::LACUNA_MARKER;

/// Mask protecting the siglum and its page number
pub const DEFAULT_MASK_PATTERN: &str = r"P\.Mon\.Epiph\.\s*\d+";

// Private-use code points never occur in Coptic/Greek transcriptions
const LACUNA_SENTINEL: &str = "\u{E000}";
const PLACEHOLDER_OPEN: char = '\u{E001}';
const PLACEHOLDER_CLOSE: char = '\u{E002}';

/// Two or more spaced dot groups, or any plain run of dots
static DOT_RUN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\.[ ]*\.[ ]*\.+|\.[ ]*\.+|\.+").expect("Invalid dot run regex")
});

static DEFAULT_MASKS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![Regex::new(DEFAULT_MASK_PATTERN).expect("Invalid default mask regex")]
});

/// Dot counter with a fixed set of mask patterns
#[derive(Debug, Clone)]
pub struct DotCounter {
    masks: Vec<Regex>,
}

impl Default for DotCounter {
    fn default() -> Self {
        Self {
            masks: DEFAULT_MASKS.clone(),
        }
    }
}

impl DotCounter {
    /// Compile a counter from mask pattern sources
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, PipelineError> {
        let masks = patterns
            .iter()
            .map(|p| {
                let source = p.as_ref();
                Regex::new(source).map_err(|e| PipelineError::invalid_pattern(source, &e))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { masks })
    }

    /// Mask patterns in application order
    pub fn masks(&self) -> &[Regex] {
        &self.masks
    }

    /// Collapse dot runs in `text`
    pub fn count(&self, text: &str) -> String {
        count_dots(text, Some(&self.masks))
    }
}

/// Collapse dot runs into `.N`, leaving masked spans untouched
///
/// Without explicit masks the siglum pattern is protected. When two masks
/// claim overlapping text, the earlier mask wins: later masks only see the
/// placeholder left by the earlier one, and placeholders are restored
/// newest-first so nested ones unfold correctly.
pub fn count_dots(text: &str, mask_patterns: Option<&[Regex]>) -> String {
    let masks = mask_patterns.unwrap_or_else(|| DEFAULT_MASKS.as_slice());

    let mut masked = text.replace(LACUNA_MARKER, LACUNA_SENTINEL);
    let mut originals: Vec<String> = Vec::new();

    for mask in masks {
        masked = mask
            .replace_all(&masked, |caps: &Captures<'_>| {
                let token = placeholder(originals.len());
                originals.push(caps[0].to_string());
                token
            })
            .into_owned();
    }
    debug!("Masked {} spans before dot counting", originals.len());

    let mut processed = DOT_RUN_REGEX
        .replace_all(&masked, |caps: &Captures<'_>| {
            format!(".{}", caps[0].matches('.').count())
        })
        .into_owned();

    for (index, original) in originals.iter().enumerate().rev() {
        processed = processed.replace(&placeholder(index), original);
    }

    processed.replace(LACUNA_SENTINEL, LACUNA_MARKER)
}

fn placeholder(index: usize) -> String {
    format!("{}{}{}", PLACEHOLDER_OPEN, index, PLACEHOLDER_CLOSE)
}
