//! Debug/simulation engine
//!
//! Produces a replayable, ordered log of simulated matching steps for
//! visualization: start, advance past non-matching positions, one match or
//! fail step per pattern token, then a terminal success or failure.
//!
//! This is an educational approximation, not an instrumented trace of the
//! native engine. Steps are derived from the token list and one real match:
//! each consuming token is re-matched as an anchored fragment against the
//! remaining matched text. True backtracking is never reproduced, so the
//! `Backtrack` action exists in the vocabulary but is never emitted.

use serde::Serialize;

use crate::flags::RegexFlags;
use crate::matching::compile;
use crate::token::{tokenize, Token, TokenType};

/// Default playback period in milliseconds.
pub const DEFAULT_PLAY_SPEED_MS: u64 = 500;

/// What one simulated step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum StepAction {
    Start,
    Match,
    Backtrack,
    Advance,
    Fail,
    Success,
}

/// Outcome of the simulated run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum FinalResult {
    Pending,
    Success,
    Failure,
}

/// One step of the simulation. Immutable once created; `step_number` is the
/// step's index in the session log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DebugStep {
    pub step_number: usize,
    /// Char index into the pattern (start of the token being evaluated)
    pub pattern_position: usize,
    /// Byte offset into the subject text
    pub text_position: usize,
    pub action: StepAction,
    pub description: String,
    pub pattern_element: String,
    pub matched_text: Option<String>,
    pub is_backtrack: bool,
}

/// A replayable simulation run.
///
/// The step log is append-only and fixed after generation; playback state
/// (`current_step_index`, `is_playing`, `play_speed_ms`) changes only through
/// the transition methods, each of which returns a new session. Timer
/// scheduling is the caller's job: the session stores the period, and a
/// caller changing speed while playing must cancel its old timer and start a
/// new one so both never run at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DebugSession {
    pub steps: Vec<DebugStep>,
    pub current_step_index: usize,
    pub is_playing: bool,
    pub play_speed_ms: u64,
    pub final_result: FinalResult,
    pub match_start: Option<usize>,
    pub match_end: Option<usize>,
}

impl DebugSession {
    fn new(steps: Vec<DebugStep>, final_result: FinalResult) -> Self {
        Self {
            steps,
            current_step_index: 0,
            is_playing: false,
            play_speed_ms: DEFAULT_PLAY_SPEED_MS,
            final_result,
            match_start: None,
            match_end: None,
        }
    }

    /// Session for missing input: no steps generated, outcome pending.
    fn pending() -> Self {
        Self::new(Vec::new(), FinalResult::Pending)
    }

    /// Highest valid step index, or 0 for an empty log.
    fn last_index(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    /// The step the playhead is on.
    pub fn current_step(&self) -> Option<&DebugStep> {
        self.steps.get(self.current_step_index)
    }

    /// Advance one step; no-op at the end of the log.
    pub fn step_forward(&self) -> Self {
        let mut next = self.clone();
        next.current_step_index = (self.current_step_index + 1).min(self.last_index());
        next
    }

    /// Go back one step; no-op at the start of the log.
    pub fn step_backward(&self) -> Self {
        let mut next = self.clone();
        next.current_step_index = self.current_step_index.saturating_sub(1);
        next
    }

    /// Seek back to the first step and stop playback.
    pub fn reset(&self) -> Self {
        let mut next = self.clone();
        next.current_step_index = 0;
        next.is_playing = false;
        next
    }

    /// Jump to a step; an out-of-range index leaves the session unchanged.
    pub fn seek(&self, index: usize) -> Self {
        let mut next = self.clone();
        if index < self.steps.len() {
            next.current_step_index = index;
        }
        next
    }

    /// Toggle playback.
    pub fn toggle_play(&self) -> Self {
        let mut next = self.clone();
        next.is_playing = !self.is_playing;
        next
    }

    /// Change the playback period. Playback state is preserved; a caller
    /// with a running timer must restart it under the new period.
    pub fn set_play_speed(&self, play_speed_ms: u64) -> Self {
        let mut next = self.clone();
        next.play_speed_ms = play_speed_ms;
        next
    }
}

/// Step-log builder; numbering is the push order.
struct StepLog {
    steps: Vec<DebugStep>,
}

impl StepLog {
    fn new() -> Self {
        Self { steps: Vec::new() }
    }

    fn push(
        &mut self,
        pattern_position: usize,
        text_position: usize,
        action: StepAction,
        description: String,
        pattern_element: String,
        matched_text: Option<String>,
    ) {
        self.steps.push(DebugStep {
            step_number: self.steps.len(),
            pattern_position,
            text_position,
            action,
            description,
            pattern_element,
            matched_text,
            is_backtrack: false,
        });
    }
}

/// Generate the simulated step log for one pattern/text pair.
///
/// Empty pattern or text yields a pending session with no steps. An invalid
/// pattern collapses to a single-step failure session rather than an error.
pub fn generate_debug_steps(pattern: &str, flags: RegexFlags, text: &str) -> DebugSession {
    if pattern.is_empty() || text.is_empty() {
        return DebugSession::pending();
    }

    let tokens = tokenize(pattern);
    let regex = match compile(pattern, flags) {
        Ok(regex) => regex,
        Err(_) => {
            let mut log = StepLog::new();
            log.push(
                0,
                0,
                StepAction::Fail,
                "Invalid regex pattern".to_string(),
                pattern.to_string(),
                None,
            );
            return DebugSession::new(log.steps, FinalResult::Failure);
        }
    };

    let mut log = StepLog::new();
    log.push(
        0,
        0,
        StepAction::Start,
        "Starting match attempt at position 0".to_string(),
        pattern.to_string(),
        None,
    );

    let Some(found) = regex.find(text).ok().flatten() else {
        log.push(
            0,
            0,
            StepAction::Fail,
            "No match found anywhere in the text".to_string(),
            pattern.to_string(),
            None,
        );
        return DebugSession::new(log.steps, FinalResult::Failure);
    };

    // Simulate the try-at-every-offset scan up to the real match start.
    let mut pos = 0usize;
    while pos < found.start() {
        log.push(
            0,
            pos,
            StepAction::Advance,
            format!("No match starting at position {pos}, advancing"),
            pattern.to_string(),
            None,
        );
        pos += text[pos..].chars().next().map_or(1, char::len_utf8);
    }

    // Walk the token list over the matched region. Quantifiers modify the
    // preceding token and consume no text of their own.
    let mut cursor = found.start();
    for (idx, token) in tokens.iter().enumerate() {
        match token.token_type {
            TokenType::Quantifier => log.push(
                token.start,
                cursor,
                StepAction::Match,
                format!("Quantifier '{}' controls how the preceding element repeats", token.value),
                token.value.clone(),
                None,
            ),
            TokenType::Alternation => log.push(
                token.start,
                cursor,
                StepAction::Match,
                "Alternation point: one of the branches matched".to_string(),
                token.value.clone(),
                None,
            ),
            TokenType::Anchor => {
                let satisfied = anchor_holds(&token.value, text, cursor, flags);
                let (action, description) = if satisfied {
                    (
                        StepAction::Match,
                        format!("Anchor '{}' holds at position {cursor}", token.value),
                    )
                } else {
                    (
                        StepAction::Fail,
                        format!("Anchor '{}' does not hold at position {cursor}", token.value),
                    )
                };
                log.push(token.start, cursor, action, description, token.value.clone(), None);
            }
            _ => {
                let fragment = consuming_fragment(token, tokens.get(idx + 1));
                match match_fragment(&fragment, flags, &text[cursor..found.end()]) {
                    Some(len) => {
                        let matched = &text[cursor..cursor + len];
                        log.push(
                            token.start,
                            cursor,
                            StepAction::Match,
                            format!("'{}' matched '{matched}' at position {cursor}", token.value),
                            token.value.clone(),
                            Some(matched.to_string()),
                        );
                        cursor += len;
                    }
                    None => log.push(
                        token.start,
                        cursor,
                        StepAction::Fail,
                        format!("'{}' could not be matched at position {cursor}", token.value),
                        token.value.clone(),
                        None,
                    ),
                }
            }
        }
    }

    log.push(
        pattern.chars().count(),
        found.end(),
        StepAction::Success,
        format!("Match found: '{}'", found.as_str()),
        pattern.to_string(),
        Some(found.as_str().to_string()),
    );

    let mut session = DebugSession::new(log.steps, FinalResult::Success);
    session.match_start = Some(found.start());
    session.match_end = Some(found.end());
    session
}

/// The sub-pattern a consuming token stands for, with its trailing
/// quantifier folded in when the next token is one.
fn consuming_fragment(token: &Token, next: Option<&Token>) -> String {
    match next {
        Some(quantifier) if quantifier.token_type == TokenType::Quantifier => {
            format!("{}{}", token.value, quantifier.value)
        }
        _ => token.value.clone(),
    }
}

/// Match a token fragment anchored at the start of `remaining`, returning
/// how many bytes it consumed. Fragments that cannot stand alone (a bare
/// backreference, for instance) simply fail here; the surrounding walk keeps
/// going, which is part of the approximation.
fn match_fragment(fragment: &str, flags: RegexFlags, remaining: &str) -> Option<usize> {
    let anchored = format!("^(?:{fragment})");
    let regex = compile(&anchored, flags).ok()?;
    regex
        .find(remaining)
        .ok()
        .flatten()
        .filter(|m| m.start() == 0)
        .map(|m| m.end())
}

/// Evaluate `^`/`$` under multiline semantics at a byte offset.
fn anchor_holds(anchor: &str, text: &str, pos: usize, flags: RegexFlags) -> bool {
    let bytes = text.as_bytes();
    match anchor {
        "^" => pos == 0 || (flags.is_multiline() && pos > 0 && bytes[pos - 1] == b'\n'),
        "$" => pos == text.len() || (flags.is_multiline() && bytes[pos] == b'\n'),
        _ => false,
    }
}
