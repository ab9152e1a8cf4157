//! The runner (C10): the boundary between the pure `Parser`/`Outcome` world and the outside —
//! seeding an empty [`Memo`], constructing the initial [`ParserState`], and converting a final
//! `Outcome` into one of the documented terminal shapes (raise, callback, boolean, or a lazy
//! resumable stream of results).

use crate::engine::{Outcome, Parser};
use crate::error::ParseError;
use crate::memo::Memo;
use crate::state::ParserState;
use crate::stream::Stream;

/// Runs `p` against `input` with unit user state, starting at [`crate::state::Position::start`].
///
/// # Panics
///
/// Panics with the formatted [`ParseError`] if `p` fails. Use [`run_state`] (to keep the error) or
/// [`test`] (to get a boolean) when failure is an expected outcome rather than a programmer error.
pub fn run<S, P>(p: &P, input: S) -> P::Output
where
    S: Stream + 'static,
    P: Parser<S, ()>,
{
    match run_state(p, input, ()) {
        Ok(value) => value,
        Err(err) => panic!("parse failed: {err}"),
    }
}

/// Runs `p` against `input` with the given initial user state, returning `Ok`/`Err` instead of
/// panicking.
pub fn run_state<S, U, P>(p: &P, input: S, user_state: U) -> Result<P::Output, ParseError>
where
    S: Stream + 'static,
    U: Clone + 'static,
    P: Parser<S, U>,
{
    run_stream(p, ParserState::new(input, user_state)).map_err(|(err, _)| err)
}

/// Runs `p` from an already-constructed [`ParserState`] (e.g. one resumed from a previous run),
/// with a fresh, empty memo chain.
pub fn run_stream<S, U, P>(
    p: &P,
    state: ParserState<S, U>,
) -> Result<P::Output, (ParseError, ParserState<S, U>)>
where
    S: Stream + 'static,
    U: 'static,
    P: Parser<S, U>,
{
    match p.parse(state, Memo::new()).into_result() {
        Ok((value, _state, _memo)) => Ok(value),
        Err((err, state, _memo)) => Err((err, state)),
    }
}

/// Runs `p` against `input`, dispatching to `on_success` or `on_failure` instead of returning —
/// convenient when the caller wants to handle both branches inline without matching a `Result`.
pub fn perform<S, U, P, R>(
    p: &P,
    input: S,
    user_state: U,
    on_success: impl FnOnce(P::Output) -> R,
    on_failure: impl FnOnce(ParseError) -> R,
) -> R
where
    S: Stream + 'static,
    U: Clone + 'static,
    P: Parser<S, U>,
{
    match run_state(p, input, user_state) {
        Ok(v) => on_success(v),
        Err(e) => on_failure(e),
    }
}

/// Runs `p` against `input` and reports only whether it succeeded.
pub fn test<S, P>(p: &P, input: S) -> bool
where
    S: Stream + 'static,
    P: Parser<S, ()>,
{
    test_state(p, input, ())
}

/// Runs `p` against `input` with the given initial user state, reporting only success/failure.
pub fn test_state<S, U, P>(p: &P, input: S, user_state: U) -> bool
where
    S: Stream + 'static,
    U: Clone + 'static,
    P: Parser<S, U>,
{
    run_state(p, input, user_state).is_ok()
}

/// A lazily-advancing sequence of results from repeatedly running `p` against whatever input is
/// left after the previous application — stops as soon as `p` fails, yielding no further items.
///
/// Every application starts from a fresh, empty memo chain: memoized state is scoped to a single
/// call to `p`, not shared across repetitions, matching how [`run`]/[`run_state`] each seed their
/// own [`Memo`].
pub struct RunMany<S: Stream, U, P> {
    p: P,
    state: Option<ParserState<S, U>>,
}

impl<S, U, P> Iterator for RunMany<S, U, P>
where
    S: Stream + 'static,
    U: Clone + 'static,
    P: Parser<S, U>,
{
    type Item = P::Output;

    fn next(&mut self) -> Option<P::Output> {
        let state = self.state.take()?;
        match p_parse(&self.p, state) {
            Outcome::ConsumedOk(v, s2, _) | Outcome::EmptyOk(v, s2, _) => {
                self.state = Some(s2);
                Some(v)
            }
            Outcome::ConsumedErr(..) | Outcome::EmptyErr(..) => None,
        }
    }
}

fn p_parse<S, U, P>(p: &P, state: ParserState<S, U>) -> Outcome<S, U, P::Output>
where
    S: Stream + 'static,
    U: 'static,
    P: Parser<S, U>,
{
    p.parse(state, Memo::new())
}

/// Builds a [`RunMany`] over `input` with unit user state.
pub fn run_many<S, P>(p: P, input: S) -> RunMany<S, (), P>
where
    S: Stream,
    P: Parser<S, ()>,
{
    run_many_state(p, input, ())
}

/// Builds a [`RunMany`] over `input` with the given initial user state.
pub fn run_many_state<S, U, P>(p: P, input: S, user_state: U) -> RunMany<S, U, P>
where
    S: Stream,
    U: Clone,
    P: Parser<S, U>,
{
    run_many_stream(p, ParserState::new(input, user_state))
}

/// Builds a [`RunMany`] starting from an already-constructed [`ParserState`].
pub fn run_many_stream<S, U, P>(p: P, state: ParserState<S, U>) -> RunMany<S, U, P>
where
    S: Stream,
    P: Parser<S, U>,
{
    RunMany {
        p,
        state: Some(state),
    }
}
