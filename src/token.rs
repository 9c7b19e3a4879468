//! Pattern tokenizer
//!
//! Lexes a raw pattern string into a flat, ordered sequence of typed tokens.
//! The scan is a single left-to-right pass with no backtracking; every token
//! carries the half-open char-index span it was read from, so concatenating
//! the spans in order reconstructs `[0, pattern_len)` exactly.
//!
//! The tokenizer is total: any string produces a token list, with malformed
//! constructs degrading to literals and unterminated constructs clamped to
//! the end of the pattern.

use serde::Serialize;

/// Token categories recognized by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum TokenType {
    Literal,
    Quantifier,
    CharacterClass,
    PredefinedClass,
    Anchor,
    Group,
    Lookahead,
    Lookbehind,
    Alternation,
    Escape,
    Backreference,
}

/// One lexed element of a pattern.
///
/// `start`/`end` are char indices into the pattern, `end` exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub token_type: TokenType,
    pub value: String,
    pub start: usize,
    pub end: usize,
    pub description: String,
    pub details: Option<String>,
}

impl Token {
    /// Whether this token is a group that captures.
    ///
    /// Excludes non-capturing `(?:` and atomic `(?>` groups; lookarounds
    /// carry their own token types and are never counted here.
    pub fn is_capturing_group(&self) -> bool {
        self.token_type == TokenType::Group
            && !self.value.starts_with("(?:")
            && !self.value.starts_with("(?>")
    }
}

/// Scanner state for one tokenization pass.
struct Scanner {
    pattern: Vec<char>,
    pos: usize,
    tokens: Vec<Token>,
}

/// Tokenize a pattern into contiguous typed tokens.
pub fn tokenize(pattern: &str) -> Vec<Token> {
    let mut scanner = Scanner {
        pattern: pattern.chars().collect(),
        pos: 0,
        tokens: Vec::new(),
    };
    scanner.run();
    scanner.tokens
}

impl Scanner {
    fn run(&mut self) {
        while self.pos < self.pattern.len() {
            match self.pattern[self.pos] {
                '{' => {
                    if !self.scan_range_quantifier() {
                        self.push_literal();
                    }
                }
                '*' | '+' | '?' => self.scan_bare_quantifier(),
                '\\' => self.scan_escape(),
                '[' => self.scan_character_class(),
                '(' => self.scan_group(),
                '^' => self.push_simple(
                    TokenType::Anchor,
                    1,
                    "Asserts position at the start of the string (or line, with multiline)",
                ),
                '$' => self.push_simple(
                    TokenType::Anchor,
                    1,
                    "Asserts position at the end of the string (or line, with multiline)",
                ),
                '|' => self.push_simple(
                    TokenType::Alternation,
                    1,
                    "Alternation: matches the expression before or after the bar",
                ),
                '.' => self.push_simple(
                    TokenType::PredefinedClass,
                    1,
                    "Matches any character except newline (unless dot-all is set)",
                ),
                _ => self.push_literal(),
            }
        }
    }

    /// Slice `[start, end)` of the pattern as a string.
    fn slice(&self, start: usize, end: usize) -> String {
        self.pattern[start..end].iter().collect()
    }

    /// Push a token spanning `[self.pos, end)` and advance past it.
    fn push(&mut self, token_type: TokenType, end: usize, description: String, details: Option<String>) {
        let end = end.min(self.pattern.len());
        let token = Token {
            token_type,
            value: self.slice(self.pos, end),
            start: self.pos,
            end,
            description,
            details,
        };
        self.pos = end;
        self.tokens.push(token);
    }

    fn push_simple(&mut self, token_type: TokenType, len: usize, description: &str) {
        self.push(token_type, self.pos + len, description.to_string(), None);
    }

    fn push_literal(&mut self) {
        let ch = self.pattern[self.pos];
        self.push(
            TokenType::Literal,
            self.pos + 1,
            format!("Matches the character '{ch}' literally"),
            None,
        );
    }

    /// Look at the char `offset` positions ahead of the cursor.
    fn peek(&self, offset: usize) -> Option<char> {
        self.pattern.get(self.pos + offset).copied()
    }

    /// Lazy/possessive suffix detail for a quantifier ending just before `end`.
    /// Returns the new end and the detail text, if a suffix is present.
    fn quantifier_suffix(&self, end: usize) -> (usize, Option<String>) {
        match self.pattern.get(end) {
            Some('?') => (
                end + 1,
                Some("Lazy: matches as few repetitions as possible".to_string()),
            ),
            Some('+') => (
                end + 1,
                Some("Possessive: matches as many as possible, without backtracking".to_string()),
            ),
            _ => (end, None),
        }
    }

    /// Try `{n}`, `{n,}` or `{n,m}` with optional `?`/`+` suffix. Returns
    /// false when the braces do not fit the grammar, leaving the cursor
    /// untouched so `{` falls back to a literal.
    fn scan_range_quantifier(&mut self) -> bool {
        let mut i = self.pos + 1;
        let min_start = i;
        while self.pattern.get(i).is_some_and(|c| c.is_ascii_digit()) {
            i += 1;
        }
        if i == min_start {
            return false;
        }
        let min: String = self.slice(min_start, i);

        let description = match self.pattern.get(i) {
            Some('}') => {
                i += 1;
                format!("Matches exactly {min} of the preceding element")
            }
            Some(',') => {
                i += 1;
                let max_start = i;
                while self.pattern.get(i).is_some_and(|c| c.is_ascii_digit()) {
                    i += 1;
                }
                let max: String = self.slice(max_start, i);
                if self.pattern.get(i) != Some(&'}') {
                    return false;
                }
                i += 1;
                if max.is_empty() {
                    format!("Matches {min} or more of the preceding element")
                } else {
                    format!("Matches between {min} and {max} of the preceding element")
                }
            }
            _ => return false,
        };

        let (end, details) = self.quantifier_suffix(i);
        self.push(TokenType::Quantifier, end, description, details);
        true
    }

    fn scan_bare_quantifier(&mut self) {
        let description = match self.pattern[self.pos] {
            '*' => "Matches 0 or more of the preceding element",
            '+' => "Matches 1 or more of the preceding element",
            _ => "Matches 0 or 1 of the preceding element",
        };
        let (end, details) = self.quantifier_suffix(self.pos + 1);
        self.push(TokenType::Quantifier, end, description.to_string(), details);
    }

    fn scan_escape(&mut self) {
        let Some(next) = self.peek(1) else {
            // Trailing backslash: clamp to the pattern end.
            self.push(
                TokenType::Escape,
                self.pos + 1,
                "Incomplete escape at end of pattern".to_string(),
                None,
            );
            return;
        };

        match next {
            'd' | 'D' | 'w' | 'W' | 's' | 'S' | 'b' | 'B' => {
                let description = match next {
                    'd' => "Matches a digit (0-9)",
                    'D' => "Matches any non-digit",
                    'w' => "Matches a word character (letters, digits, underscore)",
                    'W' => "Matches any non-word character",
                    's' => "Matches a whitespace character",
                    'S' => "Matches any non-whitespace character",
                    'b' => "Asserts a word boundary",
                    _ => "Asserts a position that is not a word boundary",
                };
                self.push(
                    TokenType::PredefinedClass,
                    self.pos + 2,
                    description.to_string(),
                    None,
                );
            }
            '1'..='9' => {
                // Greedy digit run, capped at two digits (\1 .. \99).
                let mut end = self.pos + 2;
                if self.pattern.get(end).is_some_and(|c| c.is_ascii_digit()) {
                    end += 1;
                }
                let number = self.slice(self.pos + 1, end);
                self.push(
                    TokenType::Backreference,
                    end,
                    format!("Backreference to capture group {number}"),
                    None,
                );
            }
            'k' if self.peek(2) == Some('<') => {
                let mut end = self.pos + 3;
                while end < self.pattern.len() && self.pattern[end] != '>' {
                    end += 1;
                }
                let name = self.slice(self.pos + 3, end);
                if end < self.pattern.len() {
                    end += 1; // consume '>'
                }
                self.push(
                    TokenType::Backreference,
                    end,
                    format!("Backreference to named group '{name}'"),
                    None,
                );
            }
            'u' => {
                let end = if self.peek(2) == Some('{') {
                    // \u{H+}
                    let mut i = self.pos + 3;
                    while i < self.pattern.len() && self.pattern[i] != '}' {
                        i += 1;
                    }
                    if i < self.pattern.len() {
                        i + 1
                    } else {
                        i
                    }
                } else {
                    // \uHHHH
                    let mut i = self.pos + 2;
                    let limit = (self.pos + 6).min(self.pattern.len());
                    while i < limit && self.pattern[i].is_ascii_hexdigit() {
                        i += 1;
                    }
                    i
                };
                self.push(
                    TokenType::Escape,
                    end,
                    "Matches a character by Unicode code point".to_string(),
                    None,
                );
            }
            'x' => {
                let mut end = self.pos + 2;
                let limit = (self.pos + 4).min(self.pattern.len());
                while end < limit && self.pattern[end].is_ascii_hexdigit() {
                    end += 1;
                }
                self.push(
                    TokenType::Escape,
                    end,
                    "Matches a character by hexadecimal code".to_string(),
                    None,
                );
            }
            _ => {
                let description = match next {
                    'n' => "Matches a newline".to_string(),
                    't' => "Matches a tab".to_string(),
                    'r' => "Matches a carriage return".to_string(),
                    'f' => "Matches a form feed".to_string(),
                    'v' => "Matches a vertical tab".to_string(),
                    '0' => "Matches a NUL character".to_string(),
                    _ => format!("Matches the character '{next}' (escaped)"),
                };
                self.push(TokenType::Escape, self.pos + 2, description, None);
            }
        }
    }

    /// Scan `[...]`. Handles leading `^` negation, a leading `]` as a literal
    /// member, and backslash-escaped members. Character classes do not nest,
    /// so only the owning brackets are balanced. An unterminated class is
    /// clamped to the pattern end.
    fn scan_character_class(&mut self) {
        let mut i = self.pos + 1;
        let negated = self.pattern.get(i) == Some(&'^');
        if negated {
            i += 1;
        }
        // A ']' directly after '[' or '[^' is a literal member.
        if self.pattern.get(i) == Some(&']') {
            i += 1;
        }
        let mut end = None;
        while i < self.pattern.len() {
            match self.pattern[i] {
                '\\' => i += 2,
                ']' => {
                    end = Some(i + 1);
                    break;
                }
                _ => i += 1,
            }
        }
        let description = if negated {
            "Matches any character not in the set"
        } else {
            "Matches any character in the set"
        };
        let details = end.is_none().then(|| "Unterminated character class".to_string());
        self.push(
            TokenType::CharacterClass,
            end.unwrap_or(self.pattern.len()),
            description.to_string(),
            details,
        );
    }

    /// Scan a parenthesized group with a balanced-paren walk that skips
    /// escaped characters, then classify it by its prefix. An unterminated
    /// group is clamped to the pattern end.
    fn scan_group(&mut self) {
        let mut depth = 0usize;
        let mut i = self.pos;
        let mut end = None;
        while i < self.pattern.len() {
            match self.pattern[i] {
                '\\' => i += 2,
                '(' => {
                    depth += 1;
                    i += 1;
                }
                ')' => {
                    depth -= 1;
                    i += 1;
                    if depth == 0 {
                        end = Some(i);
                        break;
                    }
                }
                _ => i += 1,
            }
        }
        let end = end.unwrap_or(self.pattern.len());
        let (token_type, description, details) = self.classify_group(end);
        self.push(token_type, end, description, details);
    }

    /// Decide the token type and description from the characters directly
    /// after the opening parenthesis.
    fn classify_group(&self, end: usize) -> (TokenType, String, Option<String>) {
        let after = |n: usize| self.pattern.get(self.pos + n).copied();

        if after(1) != Some('?') {
            return (
                TokenType::Group,
                "Capturing group".to_string(),
                None,
            );
        }
        match after(2) {
            Some(':') => (
                TokenType::Group,
                "Non-capturing group".to_string(),
                None,
            ),
            Some('=') => (
                TokenType::Lookahead,
                "Positive lookahead: asserts that what follows matches".to_string(),
                None,
            ),
            Some('!') => (
                TokenType::Lookahead,
                "Negative lookahead: asserts that what follows does not match".to_string(),
                None,
            ),
            Some('>') => (
                TokenType::Group,
                "Atomic group: matched text is never re-examined".to_string(),
                None,
            ),
            Some('<') => match after(3) {
                Some('=') => (
                    TokenType::Lookbehind,
                    "Positive lookbehind: asserts that what precedes matches".to_string(),
                    None,
                ),
                Some('!') => (
                    TokenType::Lookbehind,
                    "Negative lookbehind: asserts that what precedes does not match".to_string(),
                    None,
                ),
                _ => {
                    let name_start = self.pos + 3;
                    let mut j = name_start;
                    while j < end && self.pattern[j] != '>' {
                        j += 1;
                    }
                    let name = self.slice(name_start, j);
                    (
                        TokenType::Group,
                        format!("Named capturing group '{name}'"),
                        None,
                    )
                }
            },
            _ => (
                TokenType::Group,
                "Capturing group".to_string(),
                Some("Unrecognized group prefix".to_string()),
            ),
        }
    }
}
