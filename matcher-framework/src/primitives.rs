//! Atomic matchers over a text cursor.
//!
//! Every primitive either consumes a fixed pattern and returns `Success`
//! with an advanced cursor, or returns `Failure` without consuming anything.
//! The caller's cursor is never touched, so alternatives can always retry
//! from the position they started at.

use crate::combinators::Matcher;
use crate::cursor::Cursor;
use crate::result::MatchResult;
use crate::span::Span;

/// Matches an exact string.
#[derive(Debug, Clone, Copy)]
pub struct Literal {
    pat: &'static str,
}

/// Matches an exact string, producing the consumed span.
pub fn literal(pat: &'static str) -> Literal {
    Literal { pat }
}

impl Matcher for Literal {
    type Out = Span;

    fn apply(&self, cursor: &Cursor) -> MatchResult<Span> {
        if cursor.starts_with(self.pat) {
            let next = cursor.advance_bytes(self.pat.len());
            MatchResult::success(cursor.span_to(&next), next)
        } else {
            MatchResult::failure(format!("expected `{}`", self.pat), cursor.clone())
        }
    }
}

/// Matches a single character satisfying a predicate.
#[derive(Debug, Clone, Copy)]
pub struct CharWhere<F> {
    pred: F,
    desc: &'static str,
}

/// Matches one character from the class described by `pred`.
/// `desc` names the class in failure reasons.
pub fn char_where<F>(pred: F, desc: &'static str) -> CharWhere<F>
where
    F: Fn(char) -> bool,
{
    CharWhere { pred, desc }
}

impl<F> Matcher for CharWhere<F>
where
    F: Fn(char) -> bool,
{
    type Out = char;

    fn apply(&self, cursor: &Cursor) -> MatchResult<char> {
        match cursor.advance_char() {
            Some((ch, next)) if (self.pred)(ch) => MatchResult::success(ch, next),
            _ => MatchResult::failure(self.desc, cursor.clone()),
        }
    }
}

/// Matches the (possibly empty) run of characters before a stop string.
#[derive(Debug, Clone, Copy)]
pub struct UntilLiteral {
    stop: &'static str,
}

/// Matches everything up to, and excluding, the first occurrence of `stop`.
/// Fails without consuming anything when `stop` never occurs, so an
/// unterminated form falls back to whatever alternative comes next.
pub fn until_literal(stop: &'static str) -> UntilLiteral {
    UntilLiteral { stop }
}

impl Matcher for UntilLiteral {
    type Out = Span;

    fn apply(&self, cursor: &Cursor) -> MatchResult<Span> {
        match cursor.remaining().find(self.stop) {
            Some(idx) => {
                let next = cursor.advance_bytes(idx);
                MatchResult::success(cursor.span_to(&next), next)
            }
            None => MatchResult::failure(format!("no closing `{}`", self.stop), cursor.clone()),
        }
    }
}

/// Matches only at the end of the input, consuming nothing.
#[derive(Debug, Clone, Copy)]
pub struct EndOfInput;

/// Confirms the cursor is at end of input.
pub fn end_of_input() -> EndOfInput {
    EndOfInput
}

impl Matcher for EndOfInput {
    type Out = ();

    fn apply(&self, cursor: &Cursor) -> MatchResult<()> {
        if cursor.is_eof() {
            MatchResult::success((), cursor.clone())
        } else {
            MatchResult::failure("expected end of input", cursor.clone())
        }
    }
}

/// Zero-width look-behind on the character before the cursor.
#[derive(Debug, Clone, Copy)]
pub struct PrecededBy<F> {
    pred: F,
    desc: &'static str,
}

/// Succeeds without consuming anything when the character before the cursor
/// satisfies `pred`. The predicate receives `None` at offset 0.
pub fn preceded_by<F>(pred: F, desc: &'static str) -> PrecededBy<F>
where
    F: Fn(Option<char>) -> bool,
{
    PrecededBy { pred, desc }
}

impl<F> Matcher for PrecededBy<F>
where
    F: Fn(Option<char>) -> bool,
{
    type Out = ();

    fn apply(&self, cursor: &Cursor) -> MatchResult<()> {
        if (self.pred)(cursor.prev_char()) {
            MatchResult::success((), cursor.clone())
        } else {
            MatchResult::failure(self.desc, cursor.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_consumes_exactly_its_pattern() {
        let cursor = Cursor::new("[[rest");
        let (span, next) = literal("[[").apply(&cursor).into_success().unwrap();
        assert_eq!(span, "[[");
        assert_eq!(next.offset(), 2);
    }

    #[test]
    fn literal_failure_does_not_consume() {
        let cursor = Cursor::new("abc");
        assert!(!literal("[[").apply(&cursor).is_success());
        assert_eq!(cursor.offset(), 0);
    }

    #[test]
    fn char_where_matches_one_character() {
        let cursor = Cursor::new("a1");
        let matcher = char_where(|c| c.is_alphabetic(), "letter");
        let (ch, next) = matcher.apply(&cursor).into_success().unwrap();
        assert_eq!(ch, 'a');
        assert!(!matcher.apply(&next).is_success());
    }

    #[test]
    fn until_literal_stops_before_the_stop_string() {
        let cursor = Cursor::new("title]]rest");
        let (span, next) = until_literal("]]").apply(&cursor).into_success().unwrap();
        assert_eq!(span, "title");
        assert!(next.starts_with("]]"));
    }

    #[test]
    fn until_literal_allows_an_empty_run() {
        let cursor = Cursor::new("]]");
        let (span, next) = until_literal("]]").apply(&cursor).into_success().unwrap();
        assert_eq!(span, "");
        assert_eq!(next.offset(), 0);
    }

    #[test]
    fn until_literal_fails_when_unterminated() {
        let cursor = Cursor::new("no closing pair");
        assert!(!until_literal("]]").apply(&cursor).is_success());
    }

    #[test]
    fn end_of_input_only_matches_at_eof() {
        assert!(end_of_input().apply(&Cursor::new("")).is_success());
        assert!(!end_of_input().apply(&Cursor::new("x")).is_success());
    }

    #[test]
    fn preceded_by_sees_none_at_the_start() {
        let matcher = preceded_by(|prev| prev.is_none(), "start of input");
        let cursor = Cursor::new("ab");
        assert!(matcher.apply(&cursor).is_success());
        let (_, next) = cursor.advance_char().unwrap();
        assert!(!matcher.apply(&next).is_success());
    }
}
