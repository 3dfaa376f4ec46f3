/*!
 * Ordered regex substitution tables.
 *
 * A table is applied rule by rule in declaration order, every rule scanning
 * the text already rewritten by the rules before it. Patterns are compiled
 * in multi-line mode so `^` and `$` match at every line boundary.
 *
 * The regex engine has no lookaround. Rules that need context outside their
 * own match carry a guard: a predicate over the whole haystack and the match
 * span that can veto the replacement, leaving the matched text untouched.
 */

use std::fmt;

use log::debug;
use once_cell::sync::Lazy;
use regex::{Captures, Match, Regex, RegexBuilder};

use crate::errors::PipelineError;

/// Predicate deciding whether a match may be replaced
pub type Guard = fn(haystack: &str, found: &Match<'_>) -> bool;

/// Siglum prefixed to page numbers of the P.Mon.Epiph. edition
pub const SIGLUM: &str = "P.Mon.Epiph.";

/// Canonical notation for a lacuna of unknown extent
pub const LACUNA_MARKER: &str = "[.?]";

/// Built-in rule set for P.Mon.Epiph. transcriptions
pub static PAPYRI_SUBSTITUTIONS: Lazy<SubstitutionTable> = Lazy::new(|| {
    SubstitutionTable::papyri_default().expect("Invalid built-in substitution pattern")
});

/// A single pattern → replacement rule
#[derive(Clone)]
pub struct SubstitutionRule {
    // @field: Compiled multi-line pattern
    pattern: Regex,

    // @field: Replacement template ($1, ${name} expansion)
    replacement: String,

    // @field: Optional veto over individual matches
    guard: Option<Guard>,
}

impl SubstitutionRule {
    /// Compile a rule from a pattern source and replacement template
    pub fn new(pattern: &str, replacement: &str) -> Result<Self, PipelineError> {
        let compiled = RegexBuilder::new(pattern)
            .multi_line(true)
            .build()
            .map_err(|e| PipelineError::invalid_pattern(pattern, &e))?;

        Ok(Self {
            pattern: compiled,
            replacement: replacement.to_string(),
            guard: None,
        })
    }

    /// Attach a guard; matches it rejects are kept verbatim
    pub fn with_guard(mut self, guard: Guard) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Pattern source of this rule
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Replacement template of this rule
    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Apply the rule to every non-overlapping match in `text`
    pub fn apply(&self, text: &str) -> String {
        let Some(guard) = self.guard else {
            return self
                .pattern
                .replace_all(text, self.replacement.as_str())
                .into_owned();
        };

        self.pattern
            .replace_all(text, |caps: &Captures<'_>| {
                let Some(found) = caps.get(0) else {
                    return String::new();
                };
                if guard(text, &found) {
                    let mut expanded = String::new();
                    caps.expand(&self.replacement, &mut expanded);
                    expanded
                } else {
                    found.as_str().to_string()
                }
            })
            .into_owned()
    }
}

impl fmt::Debug for SubstitutionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubstitutionRule")
            .field("pattern", &self.pattern.as_str())
            .field("replacement", &self.replacement)
            .field("guarded", &self.guard.is_some())
            .finish()
    }
}

/// Ordered list of substitution rules
#[derive(Debug, Clone, Default)]
pub struct SubstitutionTable {
    rules: Vec<SubstitutionRule>,
}

impl SubstitutionTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from (pattern, replacement) pairs, keeping their order
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Result<Self, PipelineError> {
        let rules = pairs
            .iter()
            .map(|(pattern, replacement)| SubstitutionRule::new(pattern, replacement))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// Append a rule at the end of the table
    pub fn push(&mut self, rule: SubstitutionRule) {
        self.rules.push(rule);
    }

    /// Rules in application order
    pub fn rules(&self) -> &[SubstitutionRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Apply every rule in order, each one on the output of the previous
    pub fn apply(&self, text: &str) -> String {
        self.rules
            .iter()
            .fold(text.to_string(), |current, rule| rule.apply(&current))
    }

    /// The P.Mon.Epiph. normalization rules
    pub fn papyri_default() -> Result<Self, PipelineError> {
        let mut table = Self::new();

        // Numbers: a bare three-digit line opens a new page
        table.push(SubstitutionRule::new(r"^\d{3}$", "\n\n$0")?.with_guard(not_after_blank_line));
        table.push(SubstitutionRule::new(
            r"\n\s*\n(\d{3})\n",
            &format!("\n\n{} ${{1}}\n", SIGLUM),
        )?);
        table.push(SubstitutionRule::new(r"\A\d{3}", &format!("{} $0", SIGLUM))?);

        // Special characters
        table.push(SubstitutionRule::new("\u{2CE8}", "*rho-cross*")?);
        table.push(SubstitutionRule::new(r"\+", "*stauros*")?);
        table.push(SubstitutionRule::new("\u{00B7}", "*middot*")?);
        table.push(SubstitutionRule::new("\u{2CFF}", "*word-sep-apostrophe*")?);
        table.push(SubstitutionRule::new("\u{2C93}\u{0308}", " \u{2C93}(\u{00A8})")?);
        table.push(SubstitutionRule::new(":", "*dipunct*")?);

        // Square brackets
        table.push(
            SubstitutionRule::new(r"^(.+?)\](.*)$", "[.?][${1}]${2}")?
                .with_guard(line_has_no_bracket_pair),
        );
        table.push(SubstitutionRule::new(r"^\]", LACUNA_MARKER)?);
        table.push(SubstitutionRule::new(r"\[$", LACUNA_MARKER)?);
        table.push(SubstitutionRule::new(r"\[(?:[^\]\s][^\]\n]*$|\z)", "${0}] [.?]")?);
        table.push(SubstitutionRule::new(r"\[[ ]*$", LACUNA_MARKER)?);
        // Whitespace inside brackets is resolved in two steps
        table.push(SubstitutionRule::new(r"(\[[^\s\]]+?)\s+\?", "${1}][?")?);
        table.push(SubstitutionRule::new(r"\[\s*\?\s*\]", "[?]")?);

        // Abbreviations. "//" is not expanded, diagnostics flag it.
        table.push(SubstitutionRule::new(r"(\S+)/", "(${1}( ))")?);

        Ok(table)
    }
}

/// Apply `primary`, then `overrides` when given
pub fn substitute(
    text: &str,
    primary: &SubstitutionTable,
    overrides: Option<&SubstitutionTable>,
) -> String {
    let mut result = primary.apply(text);
    if let Some(extra) = overrides {
        debug!("Applying {} override substitution rules", extra.len());
        result = extra.apply(&result);
    }
    result
}

// The match must not sit right after an empty line
fn not_after_blank_line(haystack: &str, found: &Match<'_>) -> bool {
    !haystack[..found.start()].ends_with("\n\n")
}

// The line from the match start on must not contain a `[` closed later by `]`
fn line_has_no_bracket_pair(haystack: &str, found: &Match<'_>) -> bool {
    let rest = &haystack[found.start()..];
    let line = rest.split('\n').next().unwrap_or(rest);
    match line.find('[') {
        Some(open) => !line[open..].contains(']'),
        None => true,
    }
}
