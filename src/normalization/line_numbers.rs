/*!
 * Fragment-aware line numbering.
 *
 * A document is cut into fragments at blank lines. Inside a fragment, a line
 * holding nothing but a number is an anchor: it is removed and its number is
 * attached to the following line, then propagated backward and forward over
 * the neighbouring transcription lines.
 *
 * Propagation stops at
 * - another bare number,
 * - a line starting with a Latin letter or digit (editorial or already
 *   numbered lines),
 * - a blank line.
 */

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::normalization::warnings::Warnings;

/// Whitespace between a `N.` prefix and a hyphen
static GAP_BEFORE_HYPHEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d\.)\s+([-\u{2010}\u{2011}\u{2212}\u{2013}\u{2014}\u{2015}])")
        .expect("Invalid hyphen gap regex")
});

/// A `N.-` prefix and whatever horizontal space follows the hyphen
static HYPHEN_AFTER_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d\.)([-\u{2010}\u{2011}\u{2212}\u{2013}\u{2014}\u{2015}])[^\S\n]*")
        .expect("Invalid numbered hyphen regex")
});

const RECTO_VERSO_WARNING: &str =
    "Line annotation args error: recto/verso option not yet implemented.";
const NO_OPTIONS_WARNING: &str = "Line annotation args error: no options selected.";

/// Which annotations to apply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnotationOptions {
    /// Number lines from their anchors
    pub line_numbers: bool,
    /// Detect recto/verso sides (not implemented)
    pub recto_verso: bool,
}

impl Default for AnnotationOptions {
    fn default() -> Self {
        Self {
            line_numbers: true,
            recto_verso: false,
        }
    }
}

/// Result of annotating a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    /// Annotated text, `None` when the call was aborted
    pub text: Option<String>,
    /// Messages collected during annotation
    pub warnings: Warnings,
}

/// Result of numbering a single fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberedFragment {
    pub lines: Vec<String>,
    pub warnings: Warnings,
}

/// Split lines (terminators included) into blank-line delimited fragments
///
/// The blank line closing a fragment stays its last element; a trailing
/// fragment without a closing blank line is kept as well.
pub fn split_fragments<S: AsRef<str>>(lines: &[S]) -> Vec<Vec<String>> {
    let mut fragments = Vec::new();
    let mut current = Vec::new();

    for line in lines {
        let line = line.as_ref();
        current.push(line.to_string());
        if line == "\n" {
            fragments.push(std::mem::take(&mut current));
        }
    }

    if !current.is_empty() {
        fragments.push(current);
    }
    fragments
}

/// Propagate line numbers from every anchor in one fragment
pub fn number_fragment<S: AsRef<str>>(fragment: &[S]) -> NumberedFragment {
    let mut lines: Vec<String> = fragment.iter().map(|l| l.as_ref().to_string()).collect();
    let mut warnings = Warnings::new();
    let mut warned = false;

    let mut i = 0;
    while i < lines.len() {
        let trimmed = lines[i].trim();
        if !is_digit_line(trimmed) {
            i += 1;
            continue;
        }
        let Ok(anchor) = trimmed.parse::<i64>() else {
            warnings.push(&format!(
                "Line number warning: anchor '{}' is out of range.",
                trimmed
            ));
            i += 1;
            continue;
        };

        lines.remove(i);
        if let Some(next) = lines.get_mut(i) {
            *next = format!("{}. {}", anchor, next);
        }

        // Backward from the line before the anchor
        let mut next = anchor.checked_sub(1);
        let mut j = i;
        while let Some(number) = next {
            if j == 0 || !continues_numbering(&lines[j - 1]) {
                break;
            }
            j -= 1;
            if number <= 0 && !warned {
                let context = fragment.first().map_or("", |l| l.as_ref().trim_end());
                warnings.push(&format!(
                    "Line number warning: fragment '{}' has line numbers below 1.",
                    context
                ));
                warned = true;
            }
            lines[j] = format!("{}. {}", number, lines[j]);
            next = number.checked_sub(1);
        }

        // Forward from the line after the numbered one
        // Numbering stops where i64 runs out
        let mut next = anchor.checked_add(1);
        let mut k = i + 1;
        while let Some(number) = next {
            if k >= lines.len() || !continues_numbering(&lines[k]) {
                break;
            }
            lines[k] = format!("{}. {}", number, lines[k]);
            next = number.checked_add(1);
            k += 1;
        }
        // lines[i] now carries a prefix, so the scan resumes right after it
    }

    let lines = lines.iter().map(|l| ensure_hyphen_whitespace(l)).collect();
    NumberedFragment { lines, warnings }
}

/// Normalize `12.  -text` to `12.- text`
pub fn ensure_hyphen_whitespace(line: &str) -> String {
    let collapsed = GAP_BEFORE_HYPHEN.replace_all(line, "${1}${2}");
    HYPHEN_AFTER_NUMBER
        .replace_all(&collapsed, "${1}${2} ")
        .into_owned()
}

/// Split into fragments, number each, and join them back
pub fn annotate_lines(text: &str, options: AnnotationOptions) -> Annotation {
    let mut warnings = Warnings::new();

    if options.recto_verso {
        warn!("{}", RECTO_VERSO_WARNING);
        warnings.push(RECTO_VERSO_WARNING);
    }

    if !options.line_numbers {
        if !options.recto_verso {
            warn!("{}", NO_OPTIONS_WARNING);
            warnings.push(NO_OPTIONS_WARNING);
        }
        return Annotation { text: None, warnings };
    }

    let lines: Vec<&str> = text.split_inclusive('\n').collect();
    let fragments = split_fragments(&lines);
    debug!("Numbering {} fragments", fragments.len());

    let mut result = String::with_capacity(text.len());
    for fragment in &fragments {
        let numbered = number_fragment(fragment);
        for message in numbered.warnings.messages() {
            warn!("{}", message);
        }
        warnings.extend(&numbered.warnings);
        result.extend(numbered.lines);
    }

    Annotation {
        text: Some(result),
        warnings,
    }
}

fn is_digit_line(trimmed: &str) -> bool {
    !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit())
}

fn continues_numbering(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty()
        && !is_digit_line(trimmed)
        && !trimmed
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphanumeric())
}
