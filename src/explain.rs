//! Explanation engine
//!
//! Turns a token stream into a per-element breakdown plus a one-paragraph
//! summary of the pattern's overall behavior.

use serde::Serialize;

use crate::token::{tokenize, Token, TokenType};

/// Half-open char-index span into the pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// One descriptive element, derived directly from a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegexElement {
    pub kind: TokenType,
    pub value: String,
    pub description: String,
    pub position: Span,
}

/// Structured breakdown of a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Explanation {
    pub elements: Vec<RegexElement>,
    pub description: String,
}

/// Fixed text shown for an empty pattern.
const EMPTY_PATTERN_HINT: &str =
    "Enter a regular expression to see a breakdown of its parts.";

/// Explain a pattern: one element per token plus a holistic summary.
///
/// Never fails: the tokenizer is total, so every input string produces a
/// (possibly empty) element list.
pub fn explain_pattern(pattern: &str) -> Explanation {
    if pattern.is_empty() {
        return Explanation {
            elements: Vec::new(),
            description: EMPTY_PATTERN_HINT.to_string(),
        };
    }

    let tokens = tokenize(pattern);
    let elements = tokens.iter().map(element_from_token).collect();
    let description = summarize(&tokens);
    Explanation { elements, description }
}

fn element_from_token(token: &Token) -> RegexElement {
    let description = match &token.details {
        Some(details) => format!("{} - {}", token.description, details),
        None => token.description.clone(),
    };
    RegexElement {
        kind: token.token_type,
        value: token.value.clone(),
        description,
        position: Span {
            start: token.start,
            end: token.end,
        },
    }
}

/// Build the holistic summary by feature detection over the token list.
///
/// Clause order: anchoring first, then alternation, lookaround, and the
/// capture-group count. Falls back to a generic sentence when nothing
/// applies; always ends with a single period.
fn summarize(tokens: &[Token]) -> String {
    let has_start_anchor = tokens
        .iter()
        .any(|t| t.token_type == TokenType::Anchor && t.value == "^");
    let has_end_anchor = tokens
        .iter()
        .any(|t| t.token_type == TokenType::Anchor && t.value == "$");
    let has_alternation = tokens.iter().any(|t| t.token_type == TokenType::Alternation);
    let has_lookaround = tokens.iter().any(|t| {
        matches!(t.token_type, TokenType::Lookahead | TokenType::Lookbehind)
    });
    let capture_count = tokens.iter().filter(|t| t.is_capturing_group()).count();

    let mut clauses: Vec<String> = Vec::new();

    if has_start_anchor && has_end_anchor {
        clauses.push("Matches the entire string".to_string());
    } else if has_start_anchor {
        clauses.push("Matches from the start of the string".to_string());
    } else if has_end_anchor {
        clauses.push("Matches at the end of the string".to_string());
    }

    if has_alternation {
        clauses.push("Uses alternation to match one of several options".to_string());
    }
    if has_lookaround {
        clauses.push("Uses lookaround assertions to match based on surrounding context".to_string());
    }
    if capture_count == 1 {
        clauses.push("Captures 1 group".to_string());
    } else if capture_count > 1 {
        clauses.push(format!("Captures {capture_count} groups"));
    }

    if clauses.is_empty() {
        return "Matches a pattern in the text.".to_string();
    }
    format!("{}.", clauses.join(". "))
}
