//! The parser's cursor: [`Position`] and [`ParserState`].

use std::cell::OnceCell;
use std::rc::Rc;

use crate::stream::Stream;

/// A monotonic index into the input, starting at zero.
///
/// `Position` only tracks an index today. The token is threaded through [`Position::increment`]
/// anyway, unused, so that a future revision can track line/column without breaking the API —
/// see the data model's note on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position(usize);

impl Position {
    /// The initial position of any parse: index zero.
    pub fn start() -> Self {
        Position(0)
    }

    /// Advances by one token. The token itself is not inspected.
    pub fn increment<T>(self, _consumed: &T) -> Self {
        Position(self.0 + 1)
    }

    /// The raw index, for diagnostics and error messages.
    pub fn index(self) -> usize {
        self.0
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::start()
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An immutable parser cursor: the input tail, the position, and opaque user-supplied state.
///
/// Every transition produces a new `ParserState`; nothing here is mutated in place. Two states
/// are [`PartialEq`] iff their positions agree — per the data model, the input tail is expected
/// to already be consistent with the position, and user state is not part of identity (so a
/// combinator that only touches user state, like `modifyState`, does not invalidate memo
/// entries keyed on position).
pub struct ParserState<S: Stream, U> {
    input: S,
    position: Position,
    user_state: U,
    // Single-slot cache for `next()`, so repeatedly consuming the same state (e.g. the trial
    // runs inside `either`/`attempt`) yields the same successor object rather than a fresh
    // clone each time. This is a pure memoization of a pure function of `self`.
    next_cache: Rc<OnceCell<(S::Token, ParserState<S, U>)>>,
}

impl<S: Stream, U: Clone> Clone for ParserState<S, U> {
    fn clone(&self) -> Self {
        ParserState {
            input: self.input.clone(),
            position: self.position,
            user_state: self.user_state.clone(),
            next_cache: Rc::clone(&self.next_cache),
        }
    }
}

impl<S: Stream, U> PartialEq for ParserState<S, U> {
    fn eq(&self, other: &Self) -> bool {
        self.position == other.position
    }
}

impl<S: Stream, U> ParserState<S, U> {
    /// The unconsumed input.
    pub fn input(&self) -> &S {
        &self.input
    }

    /// The current position.
    pub fn position(&self) -> Position {
        self.position
    }

    /// The opaque user state threaded through the parse.
    pub fn user_state(&self) -> &U {
        &self.user_state
    }
}

impl<S: Stream, U: Clone> ParserState<S, U> {
    /// Builds the initial state for a fresh parse: position zero, the given input and user data.
    pub fn new(input: S, user_state: U) -> Self {
        ParserState {
            input,
            position: Position::start(),
            user_state,
            next_cache: Rc::new(OnceCell::new()),
        }
    }

    /// Replaces the input, leaving position and user state untouched.
    ///
    /// Per the design notes, this routes through the same path as [`ParserState::with_user_state`]
    /// conceptually (a `modifyParserState`-style whole-state rewrite) rather than being treated as
    /// a user-state-only change — unlike the source behavior flagged as a likely bug in §9 of the
    /// specification, which threaded `setInput` through the user-state setter instead.
    pub fn with_input(&self, input: S) -> Self {
        ParserState {
            input,
            position: self.position,
            user_state: self.user_state.clone(),
            next_cache: Rc::new(OnceCell::new()),
        }
    }

    /// Replaces the position, leaving input and user state untouched. Used by
    /// [`crate::combinator::set_position`]; jumping the position without touching the input is a
    /// power-user escape hatch (e.g. re-running a sub-grammar against a saved position), not
    /// something ordinary combinators do.
    pub fn with_position(&self, position: Position) -> Self {
        ParserState {
            input: self.input.clone(),
            position,
            user_state: self.user_state.clone(),
            next_cache: Rc::new(OnceCell::new()),
        }
    }

    /// Replaces the user state, leaving input and position untouched.
    pub fn with_user_state(&self, user_state: U) -> Self {
        ParserState {
            input: self.input.clone(),
            position: self.position,
            user_state,
            next_cache: Rc::new(OnceCell::new()),
        }
    }

    /// Consumes one token, returning `(token, successor state)`.
    ///
    /// Panics if the input is already empty — callers (namely [`crate::combinator::token`]) are
    /// expected to have already checked [`Stream::is_empty`].
    pub fn next(&self) -> (S::Token, ParserState<S, U>) {
        if let Some(cached) = self.next_cache.get() {
            return cached.clone();
        }
        let tok = self.input.first().expect("next() called on empty input");
        let successor = ParserState {
            input: self.input.rest(),
            position: self.position.increment(&tok),
            user_state: self.user_state.clone(),
            next_cache: Rc::new(OnceCell::new()),
        };
        // Another clone of this exact state may have raced us into filling the cache (there is
        // no concurrency in this engine, so "raced" really just means "called twice"); either
        // way `get_or_init` settles on one winner and both callers observe the same successor.
        self.next_cache
            .get_or_init(|| (tok, successor))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::VecStream;

    #[test]
    fn next_is_memoized_identity() {
        let state = ParserState::new(VecStream::new(vec!['a', 'b']), ());
        let (t1, s1) = state.next();
        let (t2, s2) = state.next();
        assert_eq!(t1, t2);
        assert!(s1 == s2);
        assert_eq!(s1.position().index(), 1);
    }

    #[test]
    fn equality_is_position_only() {
        let a = ParserState::new(VecStream::new(vec![1, 2]), "left");
        let b = ParserState::new(VecStream::new(vec![1, 2]), "right");
        assert!(a == b);
    }
}
