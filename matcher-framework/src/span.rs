use std::ops::Deref;
use std::sync::Arc;

/// A byte range into a shared source buffer.
///
/// Spans keep the `Arc<str>` alive so they can outlive the cursor that
/// produced them, and deref to `&str` for direct use as text. Two spans are
/// equal when they cover the same range and the same text, which lets tests
/// compare tokens cut from different scans of the same input.
#[derive(Clone, Debug)]
pub struct Span {
    buffer: Arc<str>,
    start: usize,
    end: usize,
}

impl Span {
    /// Creates a span over the given byte range of the buffer.
    pub fn new(buffer: Arc<str>, start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        debug_assert!(end <= buffer.len());
        Self { buffer, start, end }
    }

    /// Returns the start offset in bytes.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Returns the end offset in bytes.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Returns the length in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` if the span is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns the underlying shared buffer.
    pub fn buffer(&self) -> Arc<str> {
        Arc::clone(&self.buffer)
    }

    /// Joins two adjacent spans over the same buffer into one.
    /// `other` must start where `self` ends.
    pub fn join(&self, other: &Span) -> Span {
        debug_assert!(Arc::ptr_eq(&self.buffer, &other.buffer));
        debug_assert_eq!(self.end, other.start);
        Span::new(Arc::clone(&self.buffer), self.start, other.end)
    }
}

impl Deref for Span {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.buffer[self.start..self.end]
    }
}

impl AsRef<str> for Span {
    fn as_ref(&self) -> &str {
        self
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.deref())
    }
}

impl PartialEq for Span {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.end == other.end && self.deref() == other.deref()
    }
}

impl Eq for Span {}

impl PartialEq<&str> for Span {
    fn eq(&self, other: &&str) -> bool {
        self.deref() == *other
    }
}

impl PartialEq<Span> for &str {
    fn eq(&self, other: &Span) -> bool {
        *self == other.deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_derefs_to_its_text() {
        let buffer = Arc::<str>::from("hello world");
        let span = Span::new(Arc::clone(&buffer), 6, 11);
        assert_eq!(span, "world");
        assert_eq!(span.len(), 5);
        assert!(!span.is_empty());
    }

    #[test]
    fn join_extends_the_range() {
        let buffer = Arc::<str>::from("abcdef");
        let left = Span::new(Arc::clone(&buffer), 0, 2);
        let right = Span::new(Arc::clone(&buffer), 2, 5);
        let joined = left.join(&right);
        assert_eq!(joined, "abcde");
    }

    #[test]
    fn spans_from_separate_scans_of_equal_text_compare_equal() {
        let a = Span::new(Arc::<str>::from("same"), 0, 4);
        let b = Span::new(Arc::<str>::from("same"), 0, 4);
        assert_eq!(a, b);
    }
}
