use crate::span::Span;
use std::sync::Arc;

/// An immutable position in a shared text buffer.
///
/// A cursor never moves in place: advancing produces a new cursor and leaves
/// the original untouched, so a failed alternative can simply retry from the
/// cursor it was handed. The buffer is shared via `Arc<str>`, which keeps
/// cloning cheap. Line and column are tracked for diagnostics only.
#[derive(Debug, Clone)]
pub struct Cursor {
    buffer: Arc<str>,
    offset: usize,
    line: usize,
    column: usize,
}

impl Cursor {
    /// Creates a cursor at the start of the input.
    pub fn new<S: Into<String>>(input: S) -> Self {
        Self::with_arc(Arc::<str>::from(input.into()))
    }

    /// Creates a cursor from an existing shared buffer.
    pub fn with_arc(buffer: Arc<str>) -> Self {
        Self {
            buffer,
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    /// Returns the underlying shared buffer.
    pub fn buffer(&self) -> Arc<str> {
        Arc::clone(&self.buffer)
    }

    /// Returns the current byte offset.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the current line number (1-indexed).
    pub fn line(&self) -> usize {
        self.line
    }

    /// Returns the current column number (1-indexed).
    pub fn column(&self) -> usize {
        self.column
    }

    /// Returns true if the cursor is at the end of the input.
    pub fn is_eof(&self) -> bool {
        self.offset >= self.buffer.len()
    }

    /// Returns the next character without advancing.
    pub fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    /// Returns the character immediately before the cursor, if any.
    pub fn prev_char(&self) -> Option<char> {
        self.buffer[..self.offset].chars().next_back()
    }

    /// Returns the remaining input from the current position.
    pub fn remaining(&self) -> &str {
        &self.buffer[self.offset..]
    }

    /// Returns true if the remaining input starts with the given pattern.
    pub fn starts_with(&self, pat: &str) -> bool {
        self.remaining().starts_with(pat)
    }

    /// Returns a new cursor advanced past the next character, together with
    /// that character. Returns `None` at end of input.
    pub fn advance_char(&self) -> Option<(char, Cursor)> {
        let ch = self.peek()?;
        Some((ch, self.advance_bytes(ch.len_utf8())))
    }

    /// Returns a new cursor advanced by `n` bytes. `n` must land on a
    /// character boundary within the remaining input.
    pub fn advance_bytes(&self, n: usize) -> Cursor {
        debug_assert!(self.offset + n <= self.buffer.len());
        let mut line = self.line;
        let mut column = self.column;
        for ch in self.buffer[self.offset..self.offset + n].chars() {
            if ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        Cursor {
            buffer: Arc::clone(&self.buffer),
            offset: self.offset + n,
            line,
            column,
        }
    }

    /// Returns the span of source text between this cursor and a later one.
    pub fn span_to(&self, end: &Cursor) -> Span {
        debug_assert!(Arc::ptr_eq(&self.buffer, &end.buffer));
        Span::new(Arc::clone(&self.buffer), self.offset, end.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advancing_leaves_the_original_cursor_in_place() {
        let cursor = Cursor::new("hello");
        let (ch, next) = cursor.advance_char().unwrap();
        assert_eq!(ch, 'h');
        assert_eq!(cursor.offset(), 0);
        assert_eq!(next.offset(), 1);
        assert_eq!(next.peek(), Some('e'));
    }

    #[test]
    fn prev_char_looks_behind() {
        let cursor = Cursor::new("ab");
        assert_eq!(cursor.prev_char(), None);
        let (_, next) = cursor.advance_char().unwrap();
        assert_eq!(next.prev_char(), Some('a'));
    }

    #[test]
    fn line_and_column_track_newlines() {
        let cursor = Cursor::new("a\nb");
        let next = cursor.advance_bytes(2);
        assert_eq!(next.line(), 2);
        assert_eq!(next.column(), 1);
        let next = next.advance_bytes(1);
        assert_eq!(next.line(), 2);
        assert_eq!(next.column(), 2);
    }

    #[test]
    fn multibyte_characters_advance_by_utf8_length() {
        let cursor = Cursor::new("你好");
        let (ch, next) = cursor.advance_char().unwrap();
        assert_eq!(ch, '你');
        assert_eq!(next.offset(), ch.len_utf8());
        assert_eq!(next.peek(), Some('好'));
    }

    #[test]
    fn span_to_cuts_the_consumed_text() {
        let cursor = Cursor::new("hello world");
        let end = cursor.advance_bytes(5);
        assert_eq!(cursor.span_to(&end), "hello");
    }

    #[test]
    fn empty_input_is_eof_immediately() {
        let cursor = Cursor::new("");
        assert!(cursor.is_eof());
        assert_eq!(cursor.peek(), None);
        assert!(cursor.advance_char().is_none());
    }
}
