use matcher_framework::Span;

/// A classified unit of note text, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A tag mention such as `#work/urgent`. `name` excludes the `#`
    /// delimiters but keeps hierarchical separators.
    Tag { name: String, span: Span },
    /// A `[[...]]` reference to another note. `title` is the inner text
    /// verbatim.
    NoteLink { title: String, span: Span },
    /// A run of plain text; its content is exactly its span.
    Text { span: Span },
}

impl Token {
    /// Returns the span of source text this token was cut from.
    pub fn span(&self) -> &Span {
        match self {
            Token::Tag { span, .. } | Token::NoteLink { span, .. } | Token::Text { span } => span,
        }
    }

    /// Returns the original source text of this token, delimiters included.
    pub fn source_text(&self) -> &str {
        self.span()
    }

    /// Returns true for a plain-text token.
    pub fn is_text(&self) -> bool {
        matches!(self, Token::Text { .. })
    }
}
