/*!
 * Tests for the text stages through the public normalization API
 */

use prepapyri::normalization::diagnostics::{scan, DiagnosticKind};
use prepapyri::normalization::hyphens::plan_moves;
use prepapyri::normalization::{
    annotate_lines, count_dots, relocate_hyphens, substitute, AnnotationOptions, DotCounter,
    HyphenMove, SubstitutionRule, SubstitutionTable, PAPYRI_SUBSTITUTIONS,
};

#[test]
fn test_substitute_withBuiltInTable_shouldExpandSiglumAndSymbols() {
    let result = substitute("123\nⲁ+ⲃ\u{00B7}", &PAPYRI_SUBSTITUTIONS, None);
    assert_eq!(result, "\n\nP.Mon.Epiph. 123\nⲁ*stauros*ⲃ*middot*");
}

#[test]
fn test_substitute_withEmptyTable_shouldReturnInput() {
    let table = SubstitutionTable::new();
    assert!(table.is_empty());
    assert_eq!(substitute("ⲁ:ⲃ", &table, None), "ⲁ:ⲃ");
}

#[test]
fn test_substitution_rule_withGuard_shouldKeepRejectedMatches() {
    fn only_first(_: &str, found: &regex::Match<'_>) -> bool {
        found.start() == 0
    }
    let rule = SubstitutionRule::new("ⲁ", "a").unwrap().with_guard(only_first);
    assert_eq!(rule.apply("ⲁⲁⲁ"), "aⲁⲁ");
}

#[test]
fn test_relocate_hyphens_withEditorialLine_shouldSkipIt() {
    let result = relocate_hyphens("ⲁⲛⲟⲕ-\nVerso\nⲡⲉ");
    assert_eq!(result, "ⲁⲛⲟⲕ\nVerso\n-ⲡⲉ");
}

#[test]
fn test_relocate_hyphens_withDashVariant_shouldKeepCharacter() {
    let result = relocate_hyphens("ⲁⲛⲟⲕ\u{2013}\nⲡⲉ\n");
    assert_eq!(result, "ⲁⲛⲟⲕ\n\u{2013}ⲡⲉ\n");
}

#[test]
fn test_plan_moves_withChainedHyphens_shouldUseOriginalLines() {
    let moves = plan_moves(&["ⲁ-", "ⲃ-", "ⲅ"]);
    assert_eq!(
        moves,
        vec![
            HyphenMove { source: 0, hyphen: '-', target: 1 },
            HyphenMove { source: 1, hyphen: '-', target: 2 },
        ]
    );
    assert_eq!(relocate_hyphens("ⲁ-\nⲃ-\nⲅ"), "ⲁ\n-ⲃ\n-ⲅ");
}

#[test]
fn test_count_dots_withSpacedDots_shouldCollapseGroup() {
    assert_eq!(count_dots("ⲁ. . .ⲃ", None), "ⲁ.3ⲃ");
}

#[test]
fn test_count_dots_withSiglumAndLacuna_shouldLeaveThemUntouched() {
    let text = "P.Mon.Epiph. 123 [.?] ⲁ...";
    assert_eq!(count_dots(text, None), "P.Mon.Epiph. 123 [.?] ⲁ.3");
}

#[test]
fn test_dot_counter_withCustomMask_shouldProtectMatches() {
    let counter = DotCounter::new(&[r"O\.\s*Crum\s*\d+"]).unwrap();
    assert_eq!(counter.masks().len(), 1);
    assert_eq!(counter.count("O. Crum 12 ⲁ.."), "O. Crum 12 ⲁ.2");
    // The siglum is no longer masked
    assert_eq!(counter.count("P.Mon"), "P.1Mon");
}

#[test]
fn test_annotate_lines_withCopticFragment_shouldPropagateForward() {
    let annotation = annotate_lines("7\nⲁⲗⲫⲁ\nⲃⲏⲧⲁ\n\n", AnnotationOptions::default());
    assert_eq!(annotation.text.as_deref(), Some("7. ⲁⲗⲫⲁ\n8. ⲃⲏⲧⲁ\n\n"));
}

#[test]
fn test_annotate_lines_withNumbersBelowOne_shouldWarnWithFragmentStart() {
    let annotation = annotate_lines("ⲁ\nⲃ\n1\nⲅ\n", AnnotationOptions::default());
    assert_eq!(annotation.text.as_deref(), Some("-1. ⲁ\n0. ⲃ\n1. ⲅ\n"));
    assert_eq!(
        annotation.warnings.as_str(),
        "Line number warning: fragment 'ⲁ' has line numbers below 1.\n"
    );
}

#[test]
fn test_scan_withMixedProblems_shouldReportEachKind() {
    let findings = scan("ⲁ//\u{2014}ж\n");
    let kinds: Vec<DiagnosticKind> = findings.iter().map(|f| f.kind).collect();
    assert_eq!(
        kinds,
        vec![
            DiagnosticKind::DoubleSlash,
            DiagnosticKind::UnexpectedCharacter,
            DiagnosticKind::NonAsciiHyphen,
        ]
    );
    assert!(findings.iter().all(|f| f.line == 1));
}
