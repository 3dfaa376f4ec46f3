/*!
 * Pre-flight diagnostics on raw transcriptions.
 *
 * These checks do not change the text. They point at spots that the
 * normalization stages cannot handle on their own and that usually need a
 * manual look.
 */

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::normalization::hyphens::is_hyphen;

static DOUBLE_SLASH_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"/{2,}").expect("Invalid double slash regex")
});

/// Category of a diagnostic finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// `//` abbreviations are not expanded
    DoubleSlash,
    /// Characters outside the Latin/Greek/Coptic repertoire
    UnexpectedCharacter,
    /// Hyphen encoded with something other than U+002D
    NonAsciiHyphen,
}

impl DiagnosticKind {
    pub fn description(&self) -> &'static str {
        match self {
            Self::DoubleSlash => "double slash abbreviation is not expanded",
            Self::UnexpectedCharacter => "characters outside the expected script ranges",
            Self::NonAsciiHyphen => "inconsistent hyphen encoding",
        }
    }
}

/// A single finding with its 1-based line number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub line: usize,
    pub detail: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Diagnostics: line {}: {} ({})",
            self.line,
            self.kind.description(),
            self.detail
        )
    }
}

/// Scan raw text, reporting each kind at most once per line
pub fn scan(text: &str) -> Vec<Diagnostic> {
    let mut findings = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let line_number = index + 1;

        if let Some(found) = DOUBLE_SLASH_REGEX.find(line) {
            findings.push(Diagnostic {
                kind: DiagnosticKind::DoubleSlash,
                line: line_number,
                detail: format!(
                    "'{}' at column {}",
                    found.as_str(),
                    line[..found.start()].chars().count() + 1
                ),
            });
        }

        let unexpected = distinct(line.chars().filter(|c| !is_expected_char(*c)));
        if !unexpected.is_empty() {
            findings.push(Diagnostic {
                kind: DiagnosticKind::UnexpectedCharacter,
                line: line_number,
                detail: describe(&unexpected),
            });
        }

        let hyphens = distinct(line.chars().filter(|c| *c != '-' && is_hyphen(*c)));
        if !hyphens.is_empty() {
            findings.push(Diagnostic {
                kind: DiagnosticKind::NonAsciiHyphen,
                line: line_number,
                detail: describe(&hyphens),
            });
        }
    }

    findings
}

/// Characters a Coptic/Greek transcription is expected to contain
pub fn is_expected_char(c: char) -> bool {
    matches!(c,
        '\u{0000}'..='\u{007F}'    // ASCII
        | '\u{00A0}'..='\u{00FF}'  // Latin-1 punctuation and letters
        | '\u{0300}'..='\u{036F}'  // combining diacritics
        | '\u{0370}'..='\u{03FF}'  // Greek and Coptic
        | '\u{1F00}'..='\u{1FFF}'  // Greek Extended
        | '\u{2000}'..='\u{206F}'  // general punctuation, dashes
        | '\u{2212}'               // minus sign
        | '\u{2C80}'..='\u{2CFF}'  // Coptic
        | '\u{FE20}'..='\u{FE2F}'  // combining half marks (supralinear strokes)
    )
}

fn distinct(chars: impl Iterator<Item = char>) -> Vec<char> {
    let mut seen = Vec::new();
    for c in chars {
        if !seen.contains(&c) {
            seen.push(c);
        }
    }
    seen
}

fn describe(chars: &[char]) -> String {
    chars
        .iter()
        .map(|c| format!("'{}' U+{:04X}", c, *c as u32))
        .collect::<Vec<_>>()
        .join(", ")
}
