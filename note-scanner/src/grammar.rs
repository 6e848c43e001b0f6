//! The note grammar: which forms are recognized and in what priority order.
//!
//! Forms are tried first-match-wins: tag, note link, fenced code, inline
//! code, then a plain-text run. Code forms are recognized only so that tags
//! and links inside them are *not* extracted; they come back as plain text.

use crate::scanner::Scanner;
use crate::token::Token;
use matcher_framework::{
    char_where, literal, preceded_by, until_literal, Cursor, MatchResult, Matcher,
};
use std::sync::Arc;

/// Characters that may appear in a tag name. `/` joins hierarchical
/// segments and is kept in the captured name.
pub fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '/' | '_' | '-')
}

/// A tag may only start at a word boundary: the start of the input, or after
/// a character that is neither an identifier character nor another `#`.
/// This is what keeps the trailing `##end` of `##nested/tag##end` plain
/// text, and what stops `#fragment` inside a URL from being captured.
fn at_tag_boundary(prev: Option<char>) -> bool {
    !matches!(prev, Some(c) if is_identifier_char(c) || c == '#')
}

/// One or more `#` delimiters, then the tag name. The name excludes the
/// delimiters; a `#` with no valid identifier after it fails here and falls
/// through to plain text.
fn tag() -> impl Matcher<Out = Token> + Send + Sync {
    preceded_by(at_tag_boundary, "tag boundary")
        .then(literal("#").repeat(1, None))
        .then(char_where(is_identifier_char, "tag identifier").repeat(1, None))
        .spanned()
        .map(|((_, name), span)| Token::Tag {
            name: name.into_iter().collect(),
            span,
        })
}

/// `[[` then everything up to the first `]]`. The inner text is the linked
/// note's title verbatim; a lone `]` inside is allowed, and there is no
/// escaping, so the first closing pair wins. Unterminated links fail and
/// fall back to plain text.
fn note_link() -> impl Matcher<Out = Token> + Send + Sync {
    literal("[[")
        .then(until_literal("]]"))
        .then(literal("]]"))
        .spanned()
        .map(|(((_, title), _), span)| Token::NoteLink {
            title: title.to_string(),
            span,
        })
}

/// A ``` fenced block, first closing fence wins. Recognized so that tags in
/// code are not counted, but emitted as plain text.
fn code_fence() -> impl Matcher<Out = Token> + Send + Sync {
    literal("```")
        .then(until_literal("```"))
        .then(literal("```"))
        .spanned()
        .map(|(_, span)| Token::Text { span })
}

/// A single-line `code` span, same treatment as a fenced block.
fn inline_code() -> impl Matcher<Out = Token> + Send + Sync {
    literal("`")
        .then(char_where(|c| c != '`' && c != '\n', "code character").repeat(1, None))
        .then(literal("`"))
        .spanned()
        .map(|(_, span)| Token::Text { span })
}

/// Returns true when one of the non-text forms could begin at the cursor.
fn could_start_special(cursor: &Cursor) -> bool {
    match cursor.peek() {
        Some('#') => at_tag_boundary(cursor.prev_char()),
        Some('`') => true,
        Some('[') => cursor.starts_with("[["),
        _ => false,
    }
}

/// Greedy run of characters up to the next position where another form
/// could start. Deliberately conservative: if the other form then fails to
/// match there, the scanner consumes a single character and the adjacent
/// text tokens are coalesced, so the stream never fragments.
struct TextRun;

impl Matcher for TextRun {
    type Out = Token;

    fn apply(&self, cursor: &Cursor) -> MatchResult<Token> {
        let mut current = cursor.clone();
        while !current.is_eof() && !could_start_special(&current) {
            match current.advance_char() {
                Some((_, next)) => current = next,
                None => break,
            }
        }
        if current.offset() == cursor.offset() {
            MatchResult::failure("text run", cursor.clone())
        } else {
            MatchResult::success(
                Token::Text {
                    span: cursor.span_to(&current),
                },
                current,
            )
        }
    }
}

/// The composed note grammar.
///
/// Built once and shared read-only; cloning is an `Arc` bump, so a single
/// grammar can drive scans of different notes from multiple threads.
#[derive(Clone)]
pub struct Grammar {
    top: Arc<dyn Matcher<Out = Token> + Send + Sync>,
}

impl Grammar {
    /// Composes the grammar. Pure construction, no I/O.
    pub fn new() -> Self {
        let top = tag()
            .or(note_link())
            .or(code_fence())
            .or(inline_code())
            .or(TextRun);
        Self { top: Arc::new(top) }
    }

    /// Starts a scan of one note body.
    pub fn scan<S: Into<String>>(&self, input: S) -> Scanner {
        Scanner::with_grammar(self.clone(), input)
    }

    pub(crate) fn apply(&self, cursor: &Cursor) -> MatchResult<Token> {
        self.top.apply(cursor)
    }
}

impl Default for Grammar {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_requires_an_identifier_after_the_delimiter() {
        let grammar = Grammar::new();
        assert!(grammar.apply(&Cursor::new("#work")).is_success());
        // No form applies at a bare `#`; the scanner's single-character
        // fallback handles it.
        assert!(!grammar.apply(&Cursor::new("# heading")).is_success());
        let tokens: Vec<String> = grammar
            .scan("# heading")
            .map(|t| t.source_text().to_string())
            .collect();
        assert_eq!(tokens, ["# heading"]);
    }

    #[test]
    fn tag_name_excludes_delimiters_and_keeps_hierarchy() {
        let grammar = Grammar::new();
        let (token, _) = grammar
            .apply(&Cursor::new("##nested/tag rest"))
            .into_success()
            .unwrap();
        match token {
            Token::Tag { name, span } => {
                assert_eq!(name, "nested/tag");
                assert_eq!(span, "##nested/tag");
            }
            other => panic!("expected a tag, got {other:?}"),
        }
    }

    #[test]
    fn link_beats_text_at_the_same_position() {
        let grammar = Grammar::new();
        let (token, _) = grammar
            .apply(&Cursor::new("[[Project Phoenix]]"))
            .into_success()
            .unwrap();
        match token {
            Token::NoteLink { title, .. } => assert_eq!(title, "Project Phoenix"),
            other => panic!("expected a link, got {other:?}"),
        }
    }

    #[test]
    fn code_fence_swallows_tags_as_text() {
        let grammar = Grammar::new();
        let (token, next) = grammar
            .apply(&Cursor::new("```\n#not/a/tag\n``` after"))
            .into_success()
            .unwrap();
        assert!(token.is_text());
        assert_eq!(next.remaining(), " after");
    }

    #[test]
    fn text_run_stops_where_a_link_could_start() {
        let grammar = Grammar::new();
        let (token, next) = grammar
            .apply(&Cursor::new("about [[target]]"))
            .into_success()
            .unwrap();
        assert_eq!(token.source_text(), "about ");
        assert!(next.starts_with("[["));
    }
}
