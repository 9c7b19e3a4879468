//! Match engine
//!
//! Drives the native regex engine: enumerating matches with capture
//! extraction, validating patterns and text, template replacement, splitting,
//! and literal escaping. All positions reported here are byte offsets into
//! the subject text, as the native engine reports them.
//!
//! Compilation failures never escape as errors from the match drivers; they
//! degrade to empty results. `validate_pattern` is the sanctioned path for
//! surfacing syntax errors as structured data.

use fancy_regex::{Captures, Match, Regex};
use serde::Serialize;

use crate::error::{EngineError, Result};
use crate::flags::RegexFlags;

/// Hard cap on global-match iterations; a silent safety valve, not an error.
pub const MAX_GLOBAL_MATCHES: usize = 10_000;

/// A capture group's matched text and its position in the subject text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaptureGroup {
    /// 1-based group index
    pub index: usize,
    /// Present iff the group used named-capture syntax
    pub name: Option<String>,
    pub value: String,
    pub start: usize,
    pub end: usize,
}

/// One match of the pattern against the subject text.
///
/// Groups that did not participate in the winning alternative are omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    /// 0-based ordinal within the match set
    pub index: usize,
    pub full_match: String,
    pub groups: Vec<CaptureGroup>,
    pub start: usize,
    pub end: usize,
}

/// Coarse classification of a pattern syntax error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum SyntaxErrorKind {
    UnterminatedCharacterClass,
    UnterminatedGroup,
    InvalidEscape,
    InvalidQuantifier,
    Syntax,
}

/// Best-effort location of the offending construct, in pattern char indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ErrorSpan {
    pub position: usize,
    pub length: usize,
}

/// Structured description of a rejected pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternError {
    pub message: String,
    pub kind: SyntaxErrorKind,
    /// Heuristic estimate: points at the last occurrence of the delimiter
    /// class relevant to the error, which may not be the true culprit.
    pub span: Option<ErrorSpan>,
}

/// Result of `validate_pattern`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub error: Option<PatternError>,
}

/// How `validate_text` interprets a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationMode {
    /// The pattern must match somewhere in the text
    Contains,
    /// The pattern must match the entire text exactly
    FullMatch,
}

/// Result of `validate_text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextValidationResult {
    pub is_valid: bool,
    pub message: String,
}

/// Result of `replace_matches`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplacementResult {
    pub result: String,
    pub replacement_count: usize,
}

/// Compile a pattern with its inline flag prefix.
pub(crate) fn compile(pattern: &str, flags: RegexFlags) -> Result<Regex> {
    let prefix = flags.inline_prefix();
    let full_pattern = if prefix.is_empty() {
        pattern.to_string()
    } else {
        format!("{prefix}{pattern}")
    };
    Regex::new(&full_pattern).map_err(|e| EngineError::Compile(e.to_string()))
}

/// Byte offset of the next char boundary after `pos`; used to advance past
/// zero-length matches so global iteration always terminates.
fn next_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .chars()
        .next()
        .map_or(pos + 1, |ch| pos + ch.len_utf8())
}

/// Walk every match of the compiled pattern, honoring the global/sticky
/// flags, the iteration cap and the zero-length advance rule. The shared
/// iteration core under `find_matches`, `replace_matches` and `split_text`.
fn for_each_match<F>(regex: &Regex, flags: RegexFlags, text: &str, mut visit: F)
where
    F: FnMut(&Captures<'_>, &Match<'_>),
{
    let mut cursor = 0usize;
    let mut count = 0usize;
    while cursor <= text.len() && count < MAX_GLOBAL_MATCHES {
        let caps = match regex.captures_from_pos(text, cursor) {
            Ok(Some(caps)) => caps,
            // No further match, or a runtime error from the native engine:
            // both end the enumeration quietly.
            _ => break,
        };
        let Some(whole) = caps.get(0) else { break };
        if flags.is_sticky() && whole.start() != cursor {
            break;
        }
        visit(&caps, &whole);
        count += 1;
        if !flags.is_global() {
            break;
        }
        cursor = if whole.end() == whole.start() {
            next_boundary(text, whole.end())
        } else {
            whole.end()
        };
    }
}

/// Enumerate matches of `pattern` against `text`.
///
/// Without the global flag at most one result is returned. An invalid
/// pattern yields an empty list; use [`validate_pattern`] to surface the
/// syntax error.
pub fn find_matches(pattern: &str, flags: RegexFlags, text: &str) -> Vec<MatchResult> {
    let Ok(regex) = compile(pattern, flags) else {
        return Vec::new();
    };
    let names: Vec<Option<String>> = regex
        .capture_names()
        .map(|n| n.map(str::to_owned))
        .collect();

    let mut results = Vec::new();
    for_each_match(&regex, flags, text, |caps, whole| {
        let mut groups = Vec::new();
        for i in 1..caps.len() {
            if let Some(group) = caps.get(i) {
                groups.push(CaptureGroup {
                    index: i,
                    name: names.get(i).cloned().flatten(),
                    value: group.as_str().to_owned(),
                    start: group.start(),
                    end: group.end(),
                });
            }
        }
        results.push(MatchResult {
            index: results.len(),
            full_match: whole.as_str().to_owned(),
            groups,
            start: whole.start(),
            end: whole.end(),
        });
    });
    results
}

/// Validate a pattern, classifying any syntax error with a best-effort span.
pub fn validate_pattern(pattern: &str, flags: RegexFlags) -> ValidationResult {
    match compile(pattern, flags) {
        Ok(_) => ValidationResult {
            is_valid: true,
            error: None,
        },
        Err(err) => {
            let message = err.to_string();
            let kind = classify_error(&message);
            ValidationResult {
                is_valid: false,
                error: Some(PatternError {
                    span: estimate_span(pattern, kind),
                    message,
                    kind,
                }),
            }
        }
    }
}

/// Classify a native error message by substring. Fragile by nature: the
/// message text belongs to the native engine, not to us.
fn classify_error(message: &str) -> SyntaxErrorKind {
    let lower = message.to_lowercase();
    if lower.contains("character class") || lower.contains("class") || lower.contains("bracket") {
        SyntaxErrorKind::UnterminatedCharacterClass
    } else if lower.contains("parenthes") || lower.contains("group") {
        SyntaxErrorKind::UnterminatedGroup
    } else if lower.contains("escape") || lower.contains("backslash") {
        SyntaxErrorKind::InvalidEscape
    } else if lower.contains("repeat") || lower.contains("repetition") || lower.contains("quantifier") {
        SyntaxErrorKind::InvalidQuantifier
    } else {
        SyntaxErrorKind::Syntax
    }
}

/// Point at the last occurrence of the delimiter class relevant to `kind`.
fn estimate_span(pattern: &str, kind: SyntaxErrorKind) -> Option<ErrorSpan> {
    let delimiters: &[char] = match kind {
        SyntaxErrorKind::UnterminatedCharacterClass => &['['],
        SyntaxErrorKind::UnterminatedGroup => &['('],
        SyntaxErrorKind::InvalidEscape => &['\\'],
        SyntaxErrorKind::InvalidQuantifier => &['*', '+', '?', '{'],
        SyntaxErrorKind::Syntax => return None,
    };
    pattern
        .chars()
        .enumerate()
        .filter(|(_, ch)| delimiters.contains(ch))
        .map(|(i, _)| i)
        .last()
        .map(|position| ErrorSpan {
            position,
            length: 1,
        })
}

/// Check text against a pattern in `contains` or `full_match` mode.
///
/// Full-match mode wraps the pattern as `^(?:pattern)$` and additionally
/// requires the matched text to equal the whole input, so flag interactions
/// (multiline in particular) cannot fake a full match.
pub fn validate_text(
    pattern: &str,
    flags: RegexFlags,
    text: &str,
    mode: ValidationMode,
) -> TextValidationResult {
    match mode {
        ValidationMode::Contains => match compile(pattern, flags) {
            Err(err) => invalid_pattern_result(&err),
            Ok(regex) => match regex.find(text).ok().flatten() {
                Some(found) => TextValidationResult {
                    is_valid: true,
                    message: format!("Pattern found at position {}", found.start()),
                },
                None => TextValidationResult {
                    is_valid: false,
                    message: "Pattern not found in the text".to_string(),
                },
            },
        },
        ValidationMode::FullMatch => {
            let wrapped = format!("^(?:{pattern})$");
            let regex = match compile(&wrapped, flags) {
                Err(err) => return invalid_pattern_result(&err),
                Ok(regex) => regex,
            };
            let full = regex.find(text).ok().flatten();
            if full
                .as_ref()
                .is_some_and(|m| m.start() == 0 && m.as_str() == text)
            {
                return TextValidationResult {
                    is_valid: true,
                    message: "Text fully matches the pattern".to_string(),
                };
            }
            // Diagnose with the unwrapped pattern: did it match a prefix, or
            // only somewhere later in the text?
            let partial = compile(pattern, flags)
                .ok()
                .and_then(|r| r.find(text).ok().flatten().map(|m| (m.start(), m.end())));
            let message = match partial {
                Some((0, end)) => format!(
                    "Pattern matches only the first {end} of {} bytes, not the entire text",
                    text.len()
                ),
                Some((start, _)) => {
                    format!("Pattern first matches at position {start}, not from the start")
                }
                None => "Pattern does not match the text".to_string(),
            };
            TextValidationResult {
                is_valid: false,
                message,
            }
        }
    }
}

fn invalid_pattern_result(err: &EngineError) -> TextValidationResult {
    TextValidationResult {
        is_valid: false,
        message: format!("Invalid pattern: {err}"),
    }
}

/// Replace matches of `pattern` in `text` using a replacement template.
///
/// Template tokens: `$&` (full match), `` $` `` (text before the match),
/// `$'` (text after the match), `$1`..`$99` (numbered group), `$<name>`
/// (named group), `$$` (literal dollar). References to groups that do not
/// exist expand to the empty string. The replacement count respects the
/// global flag.
pub fn replace_matches(
    pattern: &str,
    flags: RegexFlags,
    text: &str,
    template: &str,
) -> ReplacementResult {
    let Ok(regex) = compile(pattern, flags) else {
        return ReplacementResult {
            result: text.to_owned(),
            replacement_count: 0,
        };
    };

    let mut out = String::with_capacity(text.len());
    let mut last = 0usize;
    let mut replacement_count = 0usize;
    for_each_match(&regex, flags, text, |caps, whole| {
        out.push_str(&text[last..whole.start()]);
        out.push_str(&expand_template(template, caps, text, whole));
        last = whole.end();
        replacement_count += 1;
    });
    out.push_str(&text[last..]);

    ReplacementResult {
        result: out,
        replacement_count,
    }
}

/// Expand a replacement template for one match in a single pass.
fn expand_template(template: &str, caps: &Captures<'_>, text: &str, whole: &Match<'_>) -> String {
    let chars: Vec<char> = template.chars().collect();
    let mut out = String::new();
    let mut i = 0usize;

    while i < chars.len() {
        if chars[i] != '$' || i + 1 >= chars.len() {
            out.push(chars[i]);
            i += 1;
            continue;
        }
        match chars[i + 1] {
            '$' => {
                out.push('$');
                i += 2;
            }
            '&' => {
                out.push_str(whole.as_str());
                i += 2;
            }
            '`' => {
                out.push_str(&text[..whole.start()]);
                i += 2;
            }
            '\'' => {
                out.push_str(&text[whole.end()..]);
                i += 2;
            }
            '<' => {
                let name_start = i + 2;
                let mut j = name_start;
                while j < chars.len() && chars[j] != '>' {
                    j += 1;
                }
                if j < chars.len() {
                    let name: String = chars[name_start..j].iter().collect();
                    out.push_str(caps.name(&name).map_or("", |m| m.as_str()));
                    i = j + 1;
                } else {
                    // No closing '>': leave the dollar as a literal.
                    out.push('$');
                    i += 1;
                }
            }
            digit @ '1'..='9' => {
                let first = digit as usize - '0' as usize;
                // Prefer the two-digit reference when that group exists.
                let second = chars.get(i + 2).and_then(|c| c.to_digit(10));
                if let Some(second) = second {
                    let two = first * 10 + second as usize;
                    if two < caps.len() {
                        out.push_str(caps.get(two).map_or("", |m| m.as_str()));
                        i += 3;
                        continue;
                    }
                }
                if first < caps.len() {
                    out.push_str(caps.get(first).map_or("", |m| m.as_str()));
                }
                // Nonexistent group: expands to nothing.
                i += 2;
            }
            other => {
                out.push('$');
                out.push(other);
                i += 2;
            }
        }
    }
    out
}

/// Split the subject text on pattern matches.
///
/// Splitting always enumerates every match regardless of the global flag,
/// under the same iteration cap and zero-length advance rule as
/// [`find_matches`]. An invalid pattern yields the whole text as the only
/// piece.
pub fn split_text(pattern: &str, flags: RegexFlags, text: &str) -> Vec<String> {
    let Ok(regex) = compile(pattern, flags) else {
        return vec![text.to_owned()];
    };
    let mut pieces = Vec::new();
    let mut last = 0usize;
    for_each_match(&regex, flags | RegexFlags::GLOBAL, text, |_, whole| {
        pieces.push(text[last..whole.start()].to_owned());
        last = whole.end();
    });
    pieces.push(text[last..].to_owned());
    pieces
}

/// Characters that carry meaning in pattern syntax.
const METACHARACTERS: &str = "\\^$.|?*+()[]{}";

/// Escape regex metacharacters so `text` matches itself literally.
pub fn escape_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if METACHARACTERS.contains(ch) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
