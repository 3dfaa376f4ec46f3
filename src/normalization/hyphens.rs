/*!
 * Relocation of line-final hyphens.
 *
 * A hyphen closing a line belongs at the start of the continuation line.
 * All moves are planned from an untouched view of the document first and
 * applied afterwards, so a relocation never changes what a later line looked
 * like while its own move was being planned.
 */

use log::debug;

/// Hyphen-like characters found in transcriptions
pub const HYPHEN_CHARS: [char; 7] = [
    '-',        // hyphen-minus
    '\u{2010}', // hyphen
    '\u{2011}', // non-breaking hyphen
    '\u{2212}', // minus sign
    '\u{2013}', // en dash
    '\u{2014}', // em dash
    '\u{2015}', // horizontal bar
];

/// Check whether `c` is one of the recognised hyphen variants
pub fn is_hyphen(c: char) -> bool {
    HYPHEN_CHARS.contains(&c)
}

/// A planned relocation of one trailing hyphen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HyphenMove {
    /// Line the hyphen is taken from
    pub source: usize,
    /// The hyphen character as written in the source line
    pub hyphen: char,
    /// Line the hyphen is prepended to
    pub target: usize,
}

/// Plan the hyphen moves for a sequence of lines without modifying it
pub fn plan_moves<S: AsRef<str>>(lines: &[S]) -> Vec<HyphenMove> {
    let mut moves = Vec::new();

    for source in 0..lines.len().saturating_sub(1) {
        let Some(hyphen) = trailing_hyphen(lines[source].as_ref()) else {
            continue;
        };

        // Latin alphanumerics open an editorial line, skip past it
        let mut target = source + 1;
        if target < lines.len() - 1 && starts_with_latin_alphanumeric(lines[target].as_ref()) {
            target = source + 2;
        }

        if target < lines.len() {
            moves.push(HyphenMove { source, hyphen, target });
        }
    }

    moves
}

/// Apply planned moves in order
pub fn apply_moves(lines: &mut [String], moves: &[HyphenMove]) {
    for mv in moves {
        if mv.source >= lines.len() || mv.target >= lines.len() {
            continue;
        }

        let trimmed = lines[mv.source].trim_end();
        let stripped = trimmed.strip_suffix(mv.hyphen).unwrap_or(trimmed).to_string();
        lines[mv.source] = stripped;

        let target = &mut lines[mv.target];
        if target.trim().is_empty() {
            *target = format!("{}\n", mv.hyphen);
        } else {
            target.insert(0, mv.hyphen);
        }
    }
}

/// Move every line-final hyphen to the start of its continuation line
pub fn relocate_hyphens(text: &str) -> String {
    let mut lines: Vec<String> = text.split('\n').map(str::to_string).collect();
    let moves = plan_moves(&lines);
    debug!("Relocating {} line-final hyphens", moves.len());

    apply_moves(&mut lines, &moves);
    lines.join("\n")
}

// Trailing hyphen of a line, unless the line is nothing but that hyphen
fn trailing_hyphen(line: &str) -> Option<char> {
    let trimmed = line.trim();
    let mut chars = trimmed.chars();
    let last = chars.next_back()?;
    if !is_hyphen(last) || chars.as_str().is_empty() {
        return None;
    }
    Some(last)
}

fn starts_with_latin_alphanumeric(line: &str) -> bool {
    line.trim()
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphanumeric())
}
