//! Match engine tests: find, validate, replace, split, escape

use pretty_assertions::assert_eq;
use rexamine::{
    escape_literal, find_matches, replace_matches, split_text, validate_pattern, validate_text,
    RegexFlags, SyntaxErrorKind, ValidationMode, MAX_GLOBAL_MATCHES,
};

#[test]
fn email_pattern_fully_matches_an_address() {
    let text = "user@example.com";
    let matches = find_matches(
        r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$",
        RegexFlags::GLOBAL | RegexFlags::MULTILINE,
        text,
    );
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].full_match, text);
    assert_eq!(matches[0].start, 0);
    assert_eq!(matches[0].end, text.len());
}

#[test]
fn global_matching_extracts_numbered_groups_with_positions() {
    let matches = find_matches(r"(\d+)-(\d+)", RegexFlags::GLOBAL, "12-34 56-78");
    assert_eq!(matches.len(), 2);

    let first = &matches[0];
    assert_eq!(first.full_match, "12-34");
    assert_eq!(first.groups.len(), 2);
    assert_eq!(first.groups[0].index, 1);
    assert_eq!(first.groups[0].value, "12");
    assert_eq!((first.groups[0].start, first.groups[0].end), (0, 2));
    assert_eq!(first.groups[1].index, 2);
    assert_eq!(first.groups[1].value, "34");
    assert_eq!((first.groups[1].start, first.groups[1].end), (3, 5));

    assert_eq!(matches[1].full_match, "56-78");
    assert_eq!(matches[1].index, 1);
}

#[test]
fn zero_length_match_on_empty_text_terminates() {
    let matches = find_matches("a*", RegexFlags::GLOBAL, "");
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].full_match, "");
    assert_eq!((matches[0].start, matches[0].end), (0, 0));
}

#[test]
fn zero_length_matches_advance_through_the_text() {
    // "b*" matches empty at 0, "b" at 1, empty at 2 and 3.
    let matches = find_matches("b*", RegexFlags::GLOBAL, "abc");
    assert_eq!(matches.len(), 4);
    for m in &matches {
        assert_eq!(m.end - m.start, m.full_match.len());
    }
}

#[test]
fn global_iteration_respects_the_safety_cap() {
    let text = "x".repeat(20_000);
    let matches = find_matches("", RegexFlags::GLOBAL, &text);
    assert_eq!(matches.len(), MAX_GLOBAL_MATCHES);
}

#[test]
fn non_global_returns_at_most_one_match() {
    let matches = find_matches("o", RegexFlags::empty(), "foo bar foo");
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].start, 1);
}

#[test]
fn sticky_matches_must_start_at_the_cursor() {
    assert!(find_matches("b", RegexFlags::STICKY, "ab").is_empty());

    // Two adjacent matches, then a gap stops the sticky run.
    let matches = find_matches("a", RegexFlags::STICKY | RegexFlags::GLOBAL, "aab");
    assert_eq!(matches.len(), 2);
}

#[test]
fn ignore_case_flag_reaches_the_native_engine() {
    let matches = find_matches("abc", RegexFlags::IGNORE_CASE, "xABCx");
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].full_match, "ABC");
}

#[test]
fn named_groups_carry_their_names() {
    let matches = find_matches(r"(?<word>\w+)", RegexFlags::empty(), "hello");
    assert_eq!(matches[0].groups[0].name.as_deref(), Some("word"));
    assert_eq!(matches[0].groups[0].value, "hello");
}

#[test]
fn non_participating_groups_are_omitted() {
    let matches = find_matches("(a)|(b)", RegexFlags::empty(), "b");
    assert_eq!(matches[0].groups.len(), 1);
    assert_eq!(matches[0].groups[0].index, 2);
}

#[test]
fn match_bounds_invariant_holds() {
    for (pattern, text) in [
        (r"\w+", "alpha beta gamma"),
        (r"(\d*)x", "12x x 3x"),
        ("", "abc"),
    ] {
        for m in find_matches(pattern, RegexFlags::GLOBAL, text) {
            assert_eq!(m.end - m.start, m.full_match.len());
            for group in &m.groups {
                assert!(group.end >= group.start);
            }
        }
    }
}

#[test]
fn invalid_pattern_yields_empty_matches_not_an_error() {
    assert!(find_matches("(unclosed", RegexFlags::GLOBAL, "text").is_empty());
}

#[test]
fn unclosed_group_is_classified_with_a_span() {
    let result = validate_pattern("(unclosed", RegexFlags::empty());
    assert!(!result.is_valid);
    let error = result.error.unwrap();
    assert_eq!(error.kind, SyntaxErrorKind::UnterminatedGroup);
    assert_eq!(error.span.unwrap().position, 0);
}

#[test]
fn unclosed_character_class_is_classified() {
    let result = validate_pattern("a[bc", RegexFlags::empty());
    assert!(!result.is_valid);
    let error = result.error.unwrap();
    assert_eq!(error.kind, SyntaxErrorKind::UnterminatedCharacterClass);
    assert_eq!(error.span.unwrap().position, 1);
}

#[test]
fn valid_pattern_validates_cleanly() {
    let result = validate_pattern(r"a(b)c[d-f]\d{2,3}", RegexFlags::empty());
    assert!(result.is_valid);
    assert!(result.error.is_none());
}

#[test]
fn contains_mode_reports_presence() {
    let ok = validate_text(r"\d+", RegexFlags::empty(), "abc 123", ValidationMode::Contains);
    assert!(ok.is_valid);

    let missing = validate_text("z", RegexFlags::empty(), "abc", ValidationMode::Contains);
    assert!(!missing.is_valid);
}

#[test]
fn full_match_mode_requires_the_entire_text() {
    let ok = validate_text(r"\d+", RegexFlags::empty(), "123", ValidationMode::FullMatch);
    assert!(ok.is_valid);

    // Partial coverage: the raw pattern matches a prefix.
    let prefix = validate_text(r"\d+", RegexFlags::empty(), "12a", ValidationMode::FullMatch);
    assert!(!prefix.is_valid);
    assert!(prefix.message.contains("first 2"), "{}", prefix.message);

    // Misalignment: the raw pattern first matches later in the text.
    let later = validate_text(r"\d+", RegexFlags::empty(), "a12", ValidationMode::FullMatch);
    assert!(!later.is_valid);
    assert!(later.message.contains("position 1"), "{}", later.message);

    let none = validate_text(r"\d+", RegexFlags::empty(), "abc", ValidationMode::FullMatch);
    assert!(!none.is_valid);
}

#[test]
fn full_match_is_not_fooled_by_multiline() {
    // "^(?:b)$" would match the middle line; the whole text still differs.
    let result = validate_text("b", RegexFlags::MULTILINE, "a\nb\nc", ValidationMode::FullMatch);
    assert!(!result.is_valid);
}

#[test]
fn replacement_swaps_numbered_groups() {
    let result = replace_matches(r"(\w+)@(\w+)", RegexFlags::GLOBAL, "a@b c@d", "$2@$1");
    assert_eq!(result.result, "b@a d@c");
    assert_eq!(result.replacement_count, 2);
}

#[test]
fn replacement_count_respects_the_global_flag() {
    let non_global = replace_matches("o", RegexFlags::empty(), "foo bar foo", "0");
    assert_eq!(non_global.result, "f0o bar foo");
    assert_eq!(non_global.replacement_count, 1);

    let global = replace_matches("o", RegexFlags::GLOBAL, "foo bar foo", "0");
    let matches = find_matches("o", RegexFlags::GLOBAL, "foo bar foo");
    assert_eq!(global.replacement_count, matches.len());
}

#[test]
fn replacement_template_tokens_expand() {
    assert_eq!(
        replace_matches("a", RegexFlags::empty(), "a", "$$x").result,
        "$x"
    );
    assert_eq!(
        replace_matches("ab", RegexFlags::empty(), "ab", "[$&]").result,
        "[ab]"
    );
    assert_eq!(
        replace_matches("b", RegexFlags::empty(), "abc", "($`|$')").result,
        "a(a|c)c"
    );
    assert_eq!(
        replace_matches(r"(?<u>\w+)", RegexFlags::empty(), "hi", "<$<u>>").result,
        "<hi>"
    );
}

#[test]
fn unresolvable_group_references_expand_to_nothing() {
    let result = replace_matches("(a)", RegexFlags::empty(), "a", "$2x");
    assert_eq!(result.result, "x");

    // "$10" with one group: the single-digit reference wins, '0' is literal.
    let result = replace_matches("(a)", RegexFlags::empty(), "a", "$10");
    assert_eq!(result.result, "a0");
}

#[test]
fn invalid_pattern_leaves_text_unreplaced() {
    let result = replace_matches("(bad", RegexFlags::GLOBAL, "text", "x");
    assert_eq!(result.result, "text");
    assert_eq!(result.replacement_count, 0);
}

#[test]
fn split_divides_on_every_match() {
    assert_eq!(
        split_text(",", RegexFlags::empty(), "a,b,c"),
        vec!["a", "b", "c"]
    );
    assert_eq!(
        split_text(r"\s+", RegexFlags::empty(), "one  two three"),
        vec!["one", "two", "three"]
    );
    assert_eq!(split_text("(", RegexFlags::empty(), "x"), vec!["x"]);
}

#[test]
fn escape_literal_neutralizes_metacharacters() {
    assert_eq!(escape_literal("a.b*c"), r"a\.b\*c");
    assert_eq!(escape_literal("1+1=2"), r"1\+1=2");
    assert_eq!(escape_literal("plain"), "plain");

    // The escaped text matches itself.
    let matches = find_matches(
        &escape_literal("(1+1)"),
        RegexFlags::empty(),
        "x(1+1)y",
    );
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].start, 1);
}
