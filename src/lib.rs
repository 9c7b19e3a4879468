//! Regex analysis and simulation engine
//!
//! The analytical core behind a regex workbench UI: it lexes a pattern into
//! typed tokens, explains what each piece does, drives the native matcher
//! for find/validate/replace/split operations, flags backtracking-prone
//! shapes, and generates a replayable step-by-step simulation of a match.
//!
//! Every operation is a pure function over its inputs. The one piece of
//! state, [`DebugSession`], is owned by the caller and advanced through
//! transition methods that return a new session. Errors never cross the
//! public surface as panics or exceptions: invalid patterns degrade to
//! empty or sentinel results, with [`validate_pattern`] as the structured
//! path for surfacing syntax errors.
//!
//! Token spans are char indices into the pattern; match positions are byte
//! offsets into the subject text.

pub mod debug;
pub mod error;
pub mod explain;
pub mod flags;
pub mod matching;
pub mod perf;
pub mod token;

pub use debug::{
    generate_debug_steps, DebugSession, DebugStep, FinalResult, StepAction, DEFAULT_PLAY_SPEED_MS,
};
pub use error::{EngineError, Result};
pub use explain::{explain_pattern, Explanation, RegexElement, Span};
pub use flags::RegexFlags;
pub use matching::{
    escape_literal, find_matches, replace_matches, split_text, validate_pattern, validate_text,
    CaptureGroup, ErrorSpan, MatchResult, PatternError, ReplacementResult, SyntaxErrorKind,
    TextValidationResult, ValidationMode, ValidationResult, MAX_GLOBAL_MATCHES,
};
pub use perf::{
    analyze_pattern_complexity, detect_backtracking_risk, find_matches_with_performance,
    ComplexityReport, PerformanceReport, PerformanceResult, PerformanceWarning, WarningKind,
    SLOW_THRESHOLD_MS, TIMEOUT_THRESHOLD_MS,
};
pub use token::{tokenize, Token, TokenType};
