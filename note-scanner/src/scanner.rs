use crate::grammar::Grammar;
use crate::token::Token;
use matcher_framework::{Cursor, MatchResult, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Scanning,
    Done,
}

/// A lazy, single-pass token stream over one note body.
///
/// Each call to `next` applies the grammar at the current cursor. A match
/// emits a token and advances; when no form matches, a single character is
/// taken as plain text so the scan always makes progress. Adjacent text
/// tokens are coalesced before being handed out. Re-scanning the same input
/// means building a new scanner; an exhausted one stays exhausted.
pub struct Scanner {
    grammar: Grammar,
    cursor: Cursor,
    pending: Option<Token>,
    state: ScanState,
}

impl Scanner {
    /// Scans with a freshly composed grammar. Callers scanning many notes
    /// should build one [`Grammar`] and use [`Grammar::scan`] instead.
    pub fn new<S: Into<String>>(input: S) -> Self {
        Grammar::new().scan(input)
    }

    pub(crate) fn with_grammar<S: Into<String>>(grammar: Grammar, input: S) -> Self {
        Self {
            grammar,
            cursor: Cursor::new(input),
            pending: None,
            state: ScanState::Scanning,
        }
    }

    /// Emits the next raw token, before coalescing. `None` only at end of
    /// input.
    fn scan_one(&mut self) -> Option<Token> {
        match self.grammar.apply(&self.cursor) {
            MatchResult::Success { value, next } if next.offset() > self.cursor.offset() => {
                self.cursor = next;
                return Some(value);
            }
            MatchResult::Success { .. } => {
                // A zero-width token would stall the scan.
                log::trace!(
                    "zero-width match at offset {}; taking one character as text",
                    self.cursor.offset()
                );
            }
            MatchResult::Failure { reason, at } => {
                log::trace!(
                    "no form at line {}, column {} ({}); taking one character as text",
                    at.line(),
                    at.column(),
                    reason
                );
            }
        }
        let (_, next) = self.cursor.advance_char()?;
        let span = self.cursor.span_to(&next);
        self.cursor = next;
        Some(Token::Text { span })
    }
}

impl Iterator for Scanner {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if let Some(token) = self.pending.take() {
            return Some(token);
        }
        if self.state == ScanState::Done {
            return None;
        }
        let mut text: Option<Span> = None;
        loop {
            if self.cursor.is_eof() {
                self.state = ScanState::Done;
                return text.map(|span| Token::Text { span });
            }
            match self.scan_one() {
                Some(Token::Text { span }) => {
                    text = Some(match text {
                        Some(acc) => acc.join(&span),
                        None => span,
                    });
                }
                Some(token) => {
                    return match text.take() {
                        Some(span) => {
                            self.pending = Some(token);
                            Some(Token::Text { span })
                        }
                        None => Some(token),
                    };
                }
                None => {
                    self.state = ScanState::Done;
                    return text.map(|span| Token::Text { span });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_an_empty_sequence() {
        let tokens: Vec<Token> = Scanner::new("").collect();
        assert!(tokens.is_empty());
    }

    #[test]
    fn adjacent_text_fallbacks_are_coalesced() {
        let tokens: Vec<Token> = Scanner::new("[[unterminated").collect();
        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].is_text());
        assert_eq!(tokens[0].source_text(), "[[unterminated");
    }

    #[test]
    fn an_exhausted_scanner_stays_exhausted() {
        let mut scanner = Scanner::new("#tag");
        assert!(scanner.next().is_some());
        assert!(scanner.next().is_none());
        assert!(scanner.next().is_none());
    }
}
