//! Regex flag set and its flag-string codec

use bitflags::bitflags;

use crate::error::{EngineError, Result};

bitflags! {
    /// Flags that control how a pattern is compiled and driven.
    ///
    /// These correspond to the six flag letters of the host regex dialect:
    /// `g i m s u y`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RegexFlags: u32 {
        /// Enumerate every match instead of stopping at the first
        const GLOBAL = 1;
        /// Case-insensitive matching
        const IGNORE_CASE = 2;
        /// `^` and `$` also match at line boundaries
        const MULTILINE = 4;
        /// `.` also matches newline
        const DOT_ALL = 8;
        /// Unicode mode (inert here: the native engine is Unicode-native)
        const UNICODE = 16;
        /// Each match must begin exactly at the search cursor
        const STICKY = 32;
    }
}

impl Default for RegexFlags {
    fn default() -> Self {
        RegexFlags::empty()
    }
}

/// Canonical flag emission order.
const FLAG_LETTERS: [(RegexFlags, char); 6] = [
    (RegexFlags::GLOBAL, 'g'),
    (RegexFlags::IGNORE_CASE, 'i'),
    (RegexFlags::MULTILINE, 'm'),
    (RegexFlags::DOT_ALL, 's'),
    (RegexFlags::UNICODE, 'u'),
    (RegexFlags::STICKY, 'y'),
];

impl RegexFlags {
    /// Emit the flag string in canonical `g i m s u y` order.
    pub fn to_flag_string(self) -> String {
        FLAG_LETTERS
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, letter)| *letter)
            .collect()
    }

    /// Parse a flag string. Inverse of [`to_flag_string`](Self::to_flag_string);
    /// letter order and repetition are irrelevant to the result.
    pub fn from_flag_string(s: &str) -> Result<Self> {
        let mut flags = RegexFlags::empty();
        for ch in s.chars() {
            match FLAG_LETTERS.iter().find(|(_, letter)| *letter == ch) {
                Some((flag, _)) => flags |= *flag,
                None => return Err(EngineError::UnknownFlag(ch)),
            }
        }
        Ok(flags)
    }

    /// Inline-mode prefix handed to the native engine at compile time.
    ///
    /// Only `i`, `m` and `s` have inline forms; `g` and `y` drive the match
    /// loop instead, and `u` is a no-op.
    pub fn inline_prefix(self) -> String {
        let mut prefix = String::new();
        if self.contains(RegexFlags::IGNORE_CASE) {
            prefix.push_str("(?i)");
        }
        if self.contains(RegexFlags::MULTILINE) {
            prefix.push_str("(?m)");
        }
        if self.contains(RegexFlags::DOT_ALL) {
            prefix.push_str("(?s)");
        }
        prefix
    }

    /// Check if every match should be enumerated
    pub fn is_global(self) -> bool {
        self.contains(RegexFlags::GLOBAL)
    }

    /// Check if matching ignores case
    pub fn is_ignore_case(self) -> bool {
        self.contains(RegexFlags::IGNORE_CASE)
    }

    /// Check if `^`/`$` match at line boundaries
    pub fn is_multiline(self) -> bool {
        self.contains(RegexFlags::MULTILINE)
    }

    /// Check if `.` matches newline
    pub fn is_dot_all(self) -> bool {
        self.contains(RegexFlags::DOT_ALL)
    }

    /// Check if Unicode mode was requested
    pub fn is_unicode(self) -> bool {
        self.contains(RegexFlags::UNICODE)
    }

    /// Check if matches must start at the cursor
    pub fn is_sticky(self) -> bool {
        self.contains(RegexFlags::STICKY)
    }
}
