//! Explanation engine and performance analyzer tests

use pretty_assertions::assert_eq;
use rexamine::{
    analyze_pattern_complexity, detect_backtracking_risk, explain_pattern,
    find_matches_with_performance, RegexFlags, WarningKind,
};

#[test]
fn fully_anchored_pattern_reads_as_entire_string() {
    let explanation = explain_pattern("^abc$");
    assert_eq!(explanation.elements.len(), 5);
    assert!(explanation.description.contains("Matches the entire string"));
}

#[test]
fn empty_pattern_gets_the_instructional_hint() {
    let explanation = explain_pattern("");
    assert!(explanation.elements.is_empty());
    assert!(explanation.description.contains("Enter a regular expression"));
}

#[test]
fn single_anchors_read_directionally() {
    assert!(explain_pattern("^a")
        .description
        .contains("Matches from the start of the string"));
    assert!(explain_pattern("a$")
        .description
        .contains("Matches at the end of the string"));
}

#[test]
fn feature_clauses_accumulate_in_order() {
    let description = explain_pattern("^(cat)|(?=!)$").description;
    let start = description.find("Matches the entire string").unwrap();
    let alt = description.find("alternation").unwrap();
    let look = description.find("lookaround").unwrap();
    let captures = description.find("Captures 1 group").unwrap();
    assert!(start < alt && alt < look && look < captures);
}

#[test]
fn capture_count_excludes_non_capturing_groups() {
    assert!(explain_pattern("(a)(?:b)(c)")
        .description
        .contains("Captures 2 groups"));
    assert!(explain_pattern("(a)").description.contains("Captures 1 group"));
}

#[test]
fn plain_pattern_gets_the_default_summary() {
    assert_eq!(
        explain_pattern("abc").description,
        "Matches a pattern in the text."
    );
}

#[test]
fn summary_ends_with_a_single_period() {
    for pattern in ["^abc$", "a|b", "(a)", "abc", "^x"] {
        let description = explain_pattern(pattern).description;
        assert!(description.ends_with('.'));
        assert!(!description.ends_with(".."));
    }
}

#[test]
fn element_descriptions_fold_in_details() {
    let explanation = explain_pattern("a+?");
    assert!(explanation.elements[1].description.contains(" - "));
    assert!(explanation.elements[1].description.contains("Lazy"));
}

#[test]
fn nested_quantifiers_are_flagged_catastrophic() {
    let warnings = detect_backtracking_risk("(a+)+b");
    assert!(!warnings.is_empty());
    assert_eq!(warnings[0].kind, WarningKind::Backtracking);
    assert!(warnings[0].message.contains("Catastrophic"));
    assert!(warnings[0].suggestion.is_some());
    // The same shape also appears in the risky list.
    assert!(warnings.len() >= 2);
}

#[test]
fn alternation_in_quantified_group_is_flagged() {
    let warnings = detect_backtracking_risk("(red|blue)+");
    assert!(warnings
        .iter()
        .any(|w| w.kind == WarningKind::Backtracking));
}

#[test]
fn trailing_wildcard_is_risky_but_not_catastrophic() {
    let warnings = detect_backtracking_risk("a.*");
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].kind, WarningKind::Complexity);
    assert!(warnings[0].message.contains("trailing greedy wildcard"));
}

#[test]
fn heavy_alternation_and_unbounded_repetition_are_risky() {
    let warnings = detect_backtracking_risk("a|b|c|d|e");
    assert!(warnings.iter().any(|w| w.message.contains("4 alternations")));

    let warnings = detect_backtracking_risk("x{3,}");
    assert!(warnings
        .iter()
        .any(|w| w.message.contains("unbounded repetition")));
}

#[test]
fn innocuous_pattern_raises_no_warnings() {
    assert!(detect_backtracking_risk("abc").is_empty());
    assert!(detect_backtracking_risk(r"^\d{4}-\d{2}$").is_empty());
}

#[test]
fn complexity_thresholds_are_exclusive() {
    // Three groups meet but do not exceed the threshold.
    assert_eq!(analyze_pattern_complexity("(a)(b)(c)").score, 0);

    let report = analyze_pattern_complexity("(a)(b)(c)(d)");
    assert_eq!(report.score, 12);
    assert_eq!(report.factors.len(), 1);
    assert!(report.factors[0].contains("group"));
}

#[test]
fn quantifier_score_counts_bare_and_ranged_forms() {
    let report = analyze_pattern_complexity("a*b+c?d{2}e{3,}f{4,5}");
    assert_eq!(report.score, 12);
    assert!(report.factors[0].contains("quantifier"));
}

#[test]
fn lookarounds_and_backreferences_always_contribute() {
    assert_eq!(analyze_pattern_complexity("(?=a)").score, 5);
    assert_eq!(analyze_pattern_complexity(r"(a)\1").score, 6);
}

#[test]
fn simple_pattern_scores_zero() {
    let report = analyze_pattern_complexity("abc");
    assert_eq!(report.score, 0);
    assert!(report.factors.is_empty());
}

#[test]
fn timed_execution_returns_matches_and_a_report() {
    let result = find_matches_with_performance("abc", RegexFlags::GLOBAL, "abc def abc");
    assert_eq!(result.matches.len(), 2);
    assert!(!result.performance.timed_out);
    assert!(result.performance.execution_time_ms >= 0.0);
}

#[test]
fn static_risk_warnings_ride_along_with_execution() {
    let result = find_matches_with_performance("(a+)+b", RegexFlags::empty(), "aab");
    assert!(result
        .performance
        .warnings
        .iter()
        .any(|w| w.kind == WarningKind::Backtracking));
}
