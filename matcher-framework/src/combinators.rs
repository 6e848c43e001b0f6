//! Generic composition operators over matchers.
//!
//! Combinators are pure value composition: each one wraps other matchers and
//! produces a new matcher, with no shared mutable state. A grammar is built
//! once from these pieces and then applied to any number of cursors.

use crate::cursor::Cursor;
use crate::result::MatchResult;
use crate::span::Span;
use std::sync::Arc;

/// A pure function from a cursor to a match result.
///
/// Matchers are stateless; `apply` takes `&self` and an immutable cursor, so
/// a single grammar can be shared read-only across threads scanning
/// different inputs.
pub trait Matcher {
    /// The value a successful match extracts.
    type Out;

    /// Applies this matcher at the given cursor.
    fn apply(&self, cursor: &Cursor) -> MatchResult<Self::Out>;

    /// Transforms the value of a successful match; failures pass through.
    fn map<F, U>(self, f: F) -> Map<Self, F>
    where
        Self: Sized,
        F: Fn(Self::Out) -> U,
    {
        Map { inner: self, f }
    }

    /// Sequences this matcher with `next`, producing both values as a pair.
    ///
    /// The sequence is atomic: if `next` fails, nothing is consumed, because
    /// the caller still holds the cursor the sequence started from. The
    /// failure keeps the innermost reason for diagnostics.
    fn then<N>(self, next: N) -> Then<Self, N>
    where
        Self: Sized,
        N: Matcher,
    {
        Then { first: self, second: next }
    }

    /// Tries this matcher, then `other` from the same starting cursor.
    ///
    /// Order is significant: the first success wins, which is the grammar's
    /// tie-break mechanism on ambiguous input.
    fn or<A>(self, other: A) -> Or<Self, A>
    where
        Self: Sized,
        A: Matcher<Out = Self::Out>,
    {
        Or { first: self, second: other }
    }

    /// Greedily applies this matcher between `min` and `max` times.
    ///
    /// `max: None` means unbounded. A successful match that does not advance
    /// the cursor stops the repetition, so zero-width matchers cannot loop.
    fn repeat(self, min: usize, max: Option<usize>) -> Repeat<Self>
    where
        Self: Sized,
    {
        Repeat { inner: self, min, max }
    }

    /// Matches zero or one occurrence, collapsed to a present/absent value.
    fn optional(self) -> Optional<Self>
    where
        Self: Sized,
    {
        Optional { inner: self }
    }

    /// Pairs the matched value with the span of source text it consumed.
    fn spanned(self) -> Spanned<Self>
    where
        Self: Sized,
    {
        Spanned { inner: self }
    }
}

impl<M: Matcher + ?Sized> Matcher for &M {
    type Out = M::Out;

    fn apply(&self, cursor: &Cursor) -> MatchResult<Self::Out> {
        (**self).apply(cursor)
    }
}

impl<M: Matcher + ?Sized> Matcher for Box<M> {
    type Out = M::Out;

    fn apply(&self, cursor: &Cursor) -> MatchResult<Self::Out> {
        (**self).apply(cursor)
    }
}

impl<M: Matcher + ?Sized> Matcher for Arc<M> {
    type Out = M::Out;

    fn apply(&self, cursor: &Cursor) -> MatchResult<Self::Out> {
        (**self).apply(cursor)
    }
}

/// See [`Matcher::map`].
#[derive(Debug, Clone, Copy)]
pub struct Map<M, F> {
    inner: M,
    f: F,
}

impl<M, F, U> Matcher for Map<M, F>
where
    M: Matcher,
    F: Fn(M::Out) -> U,
{
    type Out = U;

    fn apply(&self, cursor: &Cursor) -> MatchResult<U> {
        self.inner.apply(cursor).map_value(&self.f)
    }
}

/// See [`Matcher::then`].
#[derive(Debug, Clone, Copy)]
pub struct Then<A, B> {
    first: A,
    second: B,
}

impl<A, B> Matcher for Then<A, B>
where
    A: Matcher,
    B: Matcher,
{
    type Out = (A::Out, B::Out);

    fn apply(&self, cursor: &Cursor) -> MatchResult<Self::Out> {
        let (a, after_a) = match self.first.apply(cursor) {
            MatchResult::Success { value, next } => (value, next),
            failure => return failure.cast_failure(),
        };
        match self.second.apply(&after_a) {
            MatchResult::Success { value, next } => MatchResult::success((a, value), next),
            failure => failure.cast_failure(),
        }
    }
}

/// See [`Matcher::or`].
#[derive(Debug, Clone, Copy)]
pub struct Or<A, B> {
    first: A,
    second: B,
}

impl<A, B> Matcher for Or<A, B>
where
    A: Matcher,
    B: Matcher<Out = A::Out>,
{
    type Out = A::Out;

    fn apply(&self, cursor: &Cursor) -> MatchResult<Self::Out> {
        let first_failure = match self.first.apply(cursor) {
            success @ MatchResult::Success { .. } => return success,
            failure => failure,
        };
        match self.second.apply(cursor) {
            success @ MatchResult::Success { .. } => success,
            second_failure => furthest(first_failure, second_failure),
        }
    }
}

/// Keeps whichever failure advanced deepest into the input.
fn furthest<T>(a: MatchResult<T>, b: MatchResult<T>) -> MatchResult<T> {
    match (&a, &b) {
        (MatchResult::Failure { at: at_a, .. }, MatchResult::Failure { at: at_b, .. })
            if at_a.offset() >= at_b.offset() =>
        {
            a
        }
        _ => b,
    }
}

/// See [`Matcher::repeat`].
#[derive(Debug, Clone, Copy)]
pub struct Repeat<M> {
    inner: M,
    min: usize,
    max: Option<usize>,
}

impl<M> Matcher for Repeat<M>
where
    M: Matcher,
{
    type Out = Vec<M::Out>;

    fn apply(&self, cursor: &Cursor) -> MatchResult<Self::Out> {
        let mut values = Vec::new();
        let mut current = cursor.clone();
        loop {
            if let Some(max) = self.max {
                if values.len() >= max {
                    break;
                }
            }
            match self.inner.apply(&current) {
                MatchResult::Success { value, next } => {
                    if next.offset() == current.offset() {
                        // Zero-width success; repeating it would never end.
                        break;
                    }
                    values.push(value);
                    current = next;
                }
                MatchResult::Failure { reason, at } => {
                    if values.len() < self.min {
                        return MatchResult::Failure { reason, at };
                    }
                    break;
                }
            }
        }
        if values.len() < self.min {
            MatchResult::failure("repetition fell short of its minimum", current)
        } else {
            MatchResult::success(values, current)
        }
    }
}

/// See [`Matcher::optional`].
#[derive(Debug, Clone, Copy)]
pub struct Optional<M> {
    inner: M,
}

impl<M> Matcher for Optional<M>
where
    M: Matcher,
{
    type Out = Option<M::Out>;

    fn apply(&self, cursor: &Cursor) -> MatchResult<Self::Out> {
        match self.inner.apply(cursor) {
            MatchResult::Success { value, next } => MatchResult::success(Some(value), next),
            MatchResult::Failure { .. } => MatchResult::success(None, cursor.clone()),
        }
    }
}

/// See [`Matcher::spanned`].
#[derive(Debug, Clone, Copy)]
pub struct Spanned<M> {
    inner: M,
}

impl<M> Matcher for Spanned<M>
where
    M: Matcher,
{
    type Out = (M::Out, Span);

    fn apply(&self, cursor: &Cursor) -> MatchResult<Self::Out> {
        match self.inner.apply(cursor) {
            MatchResult::Success { value, next } => {
                let span = cursor.span_to(&next);
                MatchResult::success((value, span), next)
            }
            failure => failure.cast_failure(),
        }
    }
}
