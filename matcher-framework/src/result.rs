use crate::cursor::Cursor;
use std::borrow::Cow;

/// The outcome of applying a matcher at a cursor.
///
/// A no-match is a first-class result, not an error: `Failure` is the signal
/// that lets an enclosing alternative retry the next arm from the same
/// starting cursor. `Failure::at` records where matching stopped, which is
/// only used for diagnostics.
#[derive(Debug, Clone)]
pub enum MatchResult<T> {
    /// The matcher applied; `next` points past the consumed input.
    Success { value: T, next: Cursor },
    /// The matcher did not apply at this position.
    Failure { reason: Cow<'static, str>, at: Cursor },
}

impl<T> MatchResult<T> {
    /// Shorthand for a successful match.
    pub fn success(value: T, next: Cursor) -> Self {
        MatchResult::Success { value, next }
    }

    /// Shorthand for a failed match.
    pub fn failure(reason: impl Into<Cow<'static, str>>, at: Cursor) -> Self {
        MatchResult::Failure {
            reason: reason.into(),
            at,
        }
    }

    /// Returns true for `Success`.
    pub fn is_success(&self) -> bool {
        matches!(self, MatchResult::Success { .. })
    }

    /// Converts a success into its value and the advanced cursor.
    pub fn into_success(self) -> Option<(T, Cursor)> {
        match self {
            MatchResult::Success { value, next } => Some((value, next)),
            MatchResult::Failure { .. } => None,
        }
    }

    /// Transforms the value of a success; a failure passes through unchanged.
    pub fn map_value<U>(self, f: impl FnOnce(T) -> U) -> MatchResult<U> {
        match self {
            MatchResult::Success { value, next } => MatchResult::Success {
                value: f(value),
                next,
            },
            MatchResult::Failure { reason, at } => MatchResult::Failure { reason, at },
        }
    }

    /// Re-tags a failure with a different value type.
    /// Panics if called on a success.
    pub fn cast_failure<U>(self) -> MatchResult<U> {
        match self {
            MatchResult::Failure { reason, at } => MatchResult::Failure { reason, at },
            MatchResult::Success { .. } => unreachable!("cast_failure on a success"),
        }
    }
}
