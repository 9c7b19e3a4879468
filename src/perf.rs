//! Performance analyzer
//!
//! Heuristic static checks for catastrophic-backtracking-prone shapes, an
//! additive structural complexity score, and a timed wrapper around real
//! match execution.
//!
//! The risk detection matches fixed regular expressions against the raw
//! pattern string. That is approximate by construction: it has false
//! positives and false negatives, and is presented as advisory diagnostics,
//! never as a sound static analysis.

use std::sync::LazyLock;
use std::time::Instant;

use regex::Regex;
use serde::Serialize;

use crate::flags::RegexFlags;
use crate::matching::{find_matches, MatchResult};

/// Reporting threshold for a retrospective timeout, in milliseconds. The
/// engine has no preemptive cancellation; a match that blows past this has
/// already finished (or hung) by the time it is measured.
pub const TIMEOUT_THRESHOLD_MS: f64 = 5000.0;

/// Threshold for flagging an execution as slow but not timed out.
pub const SLOW_THRESHOLD_MS: f64 = 100.0;

/// Warning categories, in the engine's reporting vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum WarningKind {
    Backtracking,
    Timeout,
    Complexity,
}

/// One advisory warning. Collected in detection order, not ranked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PerformanceWarning {
    pub kind: WarningKind,
    pub message: String,
    pub suggestion: Option<String>,
}

/// Structural complexity score with the factors that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplexityReport {
    pub score: u32,
    pub factors: Vec<String>,
}

/// Timing and warnings from one real execution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceReport {
    pub execution_time_ms: f64,
    pub timed_out: bool,
    pub warnings: Vec<PerformanceWarning>,
}

/// Matches plus the performance report for the run that produced them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceResult {
    pub matches: Vec<MatchResult>,
    pub performance: PerformanceReport,
}

/// Shapes considered catastrophic. The first hit wins; the list is
/// deliberately ad hoc and is pinned by tests rather than "improved".
static CATASTROPHIC_SHAPES: LazyLock<Vec<(Regex, &'static str, &'static str)>> =
    LazyLock::new(|| {
        [
            (
                r"\([^()]*[+*][^()]*\)[+*]",
                "a quantified group that contains its own quantifier",
                "Restructure so the inner and outer quantifiers cannot trade repetitions between them",
            ),
            (
                r"\([^()]*\|[^()]*\)[+*]",
                "alternation inside a quantified group",
                "Make the alternatives mutually exclusive, or use an atomic group",
            ),
            (
                r"\.\*\.\*|\.\+\.\+",
                "adjacent greedy wildcard runs",
                "Replace one wildcard with a more specific expression",
            ),
        ]
        .into_iter()
        .filter_map(|(shape, what, fix)| Regex::new(shape).ok().map(|r| (r, what, fix)))
        .collect()
    });

/// Shapes that are risky but not necessarily catastrophic. Every hit
/// contributes its own warning.
static RISKY_SHAPES: LazyLock<Vec<(Regex, &'static str, &'static str)>> = LazyLock::new(|| {
    [
        (
            r"\.[*+]$",
            "trailing greedy wildcard",
            "Anchor the end of the pattern or bound the repetition",
        ),
        (
            r"\([^()]*[+*][^()]*\)[+*]",
            "nested quantified group",
            "Flatten the nesting or bound the repetitions",
        ),
        (
            r"\{\d+,\}",
            "unbounded repetition {n,}",
            "Give the repetition an upper bound",
        ),
    ]
    .into_iter()
    .filter_map(|(shape, what, fix)| Regex::new(shape).ok().map(|r| (r, what, fix)))
    .collect()
});

/// Alternation count at or above which a pattern is flagged as risky.
const RISKY_ALTERNATION_COUNT: usize = 4;

/// Statically scan a pattern for backtracking-prone shapes.
pub fn detect_backtracking_risk(pattern: &str) -> Vec<PerformanceWarning> {
    let mut warnings = Vec::new();

    for (shape, what, fix) in CATASTROPHIC_SHAPES.iter() {
        if shape.is_match(pattern) {
            warnings.push(PerformanceWarning {
                kind: WarningKind::Backtracking,
                message: format!("Catastrophic backtracking risk: {what}"),
                suggestion: Some((*fix).to_string()),
            });
            break;
        }
    }

    for (shape, what, fix) in RISKY_SHAPES.iter() {
        if shape.is_match(pattern) {
            warnings.push(PerformanceWarning {
                kind: WarningKind::Complexity,
                message: format!("Potentially slow construct: {what}"),
                suggestion: Some((*fix).to_string()),
            });
        }
    }

    let alternations = count_unescaped(pattern, '|');
    if alternations >= RISKY_ALTERNATION_COUNT {
        warnings.push(PerformanceWarning {
            kind: WarningKind::Complexity,
            message: format!("Potentially slow construct: {alternations} alternations"),
            suggestion: Some("Combine alternatives into character classes where possible".to_string()),
        });
    }

    warnings
}

/// Count occurrences of `target` outside escapes. Character-class context is
/// ignored on purpose: the counts feed a heuristic score, not a parser.
fn count_unescaped(pattern: &str, target: char) -> usize {
    let mut count = 0usize;
    let mut escaped = false;
    for ch in pattern.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        if ch == '\\' {
            escaped = true;
            continue;
        }
        if ch == target {
            count += 1;
        }
    }
    count
}

/// Count quantifiers: unescaped `* + ?` plus `{n}`/`{n,}`/`{n,m}` ranges.
fn count_quantifiers(pattern: &str) -> usize {
    static RANGE: LazyLock<Option<Regex>> =
        LazyLock::new(|| Regex::new(r"\{\d+(?:,\d*)?\}").ok());
    let bare = count_unescaped(pattern, '*')
        + count_unescaped(pattern, '+')
        + count_unescaped(pattern, '?');
    let ranges = RANGE
        .as_ref()
        .map_or(0, |r| r.find_iter(pattern).count());
    bare + ranges
}

/// Count lookaround assertion openers.
fn count_lookarounds(pattern: &str) -> usize {
    ["(?=", "(?!", "(?<=", "(?<!"]
        .iter()
        .map(|needle| pattern.matches(needle).count())
        .sum::<usize>()
    // none of the needles is a substring of another, so nothing double-counts
}

/// Count numbered backreferences `\1`..`\9x`.
fn count_backreferences(pattern: &str) -> usize {
    let chars: Vec<char> = pattern.chars().collect();
    let mut count = 0usize;
    let mut i = 0usize;
    while i + 1 < chars.len() {
        if chars[i] == '\\' {
            if ('1'..='9').contains(&chars[i + 1]) {
                count += 1;
            }
            i += 2;
            continue;
        }
        i += 1;
    }
    count
}

/// Score structural complexity additively.
///
/// Thresholds are exclusive: a count must exceed its threshold to
/// contribute. Lookarounds and backreferences contribute from the first
/// occurrence.
pub fn analyze_pattern_complexity(pattern: &str) -> ComplexityReport {
    let mut score = 0u32;
    let mut factors = Vec::new();

    let quantifiers = count_quantifiers(pattern);
    if quantifiers > 5 {
        score += quantifiers as u32 * 2;
        factors.push(format!("High quantifier count: {quantifiers}"));
    }

    let groups = count_unescaped(pattern, '(');
    if groups > 3 {
        score += groups as u32 * 3;
        factors.push(format!("High group count: {groups}"));
    }

    let alternations = count_unescaped(pattern, '|');
    if alternations > 2 {
        score += alternations as u32 * 4;
        factors.push(format!("High alternation count: {alternations}"));
    }

    let lookarounds = count_lookarounds(pattern);
    if lookarounds > 0 {
        score += lookarounds as u32 * 5;
        factors.push(format!("Lookaround assertions: {lookarounds}"));
    }

    let backreferences = count_backreferences(pattern);
    if backreferences > 0 {
        score += backreferences as u32 * 6;
        factors.push(format!("Backreferences: {backreferences}"));
    }

    ComplexityReport { score, factors }
}

/// Run a real match wrapped in a wall-clock timer.
///
/// The timeout is retrospective: elapsed time is compared against
/// [`TIMEOUT_THRESHOLD_MS`] only after the blocking call returns, so a
/// genuinely catastrophic pattern can still stall the calling thread.
pub fn find_matches_with_performance(
    pattern: &str,
    flags: RegexFlags,
    text: &str,
) -> PerformanceResult {
    let mut warnings = detect_backtracking_risk(pattern);

    let started = Instant::now();
    let matches = find_matches(pattern, flags, text);
    let execution_time_ms = started.elapsed().as_secs_f64() * 1000.0;

    let timed_out = execution_time_ms > TIMEOUT_THRESHOLD_MS;
    if timed_out {
        warnings.push(PerformanceWarning {
            kind: WarningKind::Timeout,
            message: format!(
                "Execution took {execution_time_ms:.0} ms, past the {TIMEOUT_THRESHOLD_MS:.0} ms threshold"
            ),
            suggestion: Some("Simplify the pattern or reduce the input size".to_string()),
        });
    } else if execution_time_ms > SLOW_THRESHOLD_MS {
        warnings.push(PerformanceWarning {
            kind: WarningKind::Complexity,
            message: format!("Slow execution: {execution_time_ms:.1} ms"),
            suggestion: None,
        });
    }

    // Dual condition: the absolute floor avoids false positives on trivially
    // short inputs where the proportional baseline is microscopic.
    let expected_ms = text.len() as f64 * 0.001;
    if execution_time_ms > expected_ms * 10.0 && execution_time_ms > 10.0 {
        warnings.push(PerformanceWarning {
            kind: WarningKind::Backtracking,
            message: format!(
                "Execution took {execution_time_ms:.1} ms against an expected ~{expected_ms:.1} ms; heavy backtracking is likely"
            ),
            suggestion: Some("Check the pattern for nested or competing quantifiers".to_string()),
        });
    }

    PerformanceResult {
        matches,
        performance: PerformanceReport {
            execution_time_ms,
            timed_out,
            warnings,
        },
    }
}
