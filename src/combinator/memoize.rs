//! Memoization (C11): `memo` and `backtrack`.

use crate::engine::{Outcome, Parser, Step};
use crate::memo::{Memo, ParserId};
use crate::state::ParserState;
use crate::stream::Stream;

/// Caches `p`'s outcome per `(parser id, position)`.
///
/// # Design decision: the `peerr` asymmetry (specification §9)
///
/// The specification flags a possibly-buggy source behavior: on a fresh (non-cached) empty-error
/// outcome, the *cell inserted into the chain* used the pre-call memo while the *value handed back
/// to the caller* used the post-call memo — asymmetric with the other three outcome classes, which
/// use the post-call memo (`pm`) in both places. This port normalizes to the symmetric form: all
/// four outcome classes insert into, and are returned with, `pm` (the memo `p` itself produced).
/// That keeps invariant 8 from the specification ("two calls to the same memoized parser at
/// positions with the same index yield identical outcomes and identical downstream state deltas")
/// true unconditionally rather than depending on call order, and there is no behavioral
/// requirement elsewhere in the specification that depends on the asymmetric form.
#[derive(Clone)]
pub struct Memoize<P> {
    id: ParserId,
    p: P,
}

/// Wraps `p` with memoization, minting a fresh [`ParserId`] for it.
///
/// Every call to `memo` mints a new id — in this port, a plain (unwrapped) combinator never has
/// an id at all, so "assigns `p` an id if it lacks one" (specification §4.6) always takes the
/// "lacks one" branch. Memoizing the same logical parser twice (e.g. by calling `memo(p.clone())`
/// in two places) intentionally produces two independent caches, exactly as wrapping a parser a
/// second time produces a new identity per the data model's note on wrapping.
pub fn memo<P>(p: P) -> Memoize<P> {
    Memoize {
        id: ParserId::fresh(),
        p,
    }
}

impl<S, U, P> Parser<S, U> for Memoize<P>
where
    S: Stream + 'static,
    U: Clone + 'static,
    P: Parser<S, U>,
    P::Output: Clone + 'static,
{
    type Output = P::Output;

    fn step(&self, state: ParserState<S, U>, memo: Memo<S, U>) -> Step<S, U, P::Output> {
        let pos = state.position();
        if let Some(cached) = memo.lookup::<P::Output>(self.id, pos) {
            return Step::Done(cached);
        }
        let outcome = self.p.parse(state, memo);
        let produced_memo = outcome.memo().clone();
        let grown = produced_memo.insert(self.id, pos, clone_outcome(&outcome));
        Step::Done(rethread_memo(outcome, grown))
    }
}

fn clone_outcome<S: Stream, U: Clone, O: Clone>(outcome: &Outcome<S, U, O>) -> Outcome<S, U, O> {
    outcome.clone()
}

fn rethread_memo<S: Stream, U, O>(outcome: Outcome<S, U, O>, memo: Memo<S, U>) -> Outcome<S, U, O> {
    match outcome {
        Outcome::ConsumedOk(v, s, _) => Outcome::ConsumedOk(v, s, memo),
        Outcome::ConsumedErr(e, s, _) => Outcome::ConsumedErr(e, s, memo),
        Outcome::EmptyOk(v, s, _) => Outcome::EmptyOk(v, s, memo),
        Outcome::EmptyErr(e, s, _) => Outcome::EmptyErr(e, s, memo),
    }
}

/// Runs `p`, but discards whatever memo entries it accumulates: every one of `p`'s four outcome
/// classes is reported with the *caller's* original memo chain, not the one `p` produced.
///
/// Use this when a caller wants a clean memo across a speculative branch — e.g. when trying a
/// side-effect-free grammar alternative that, if abandoned, should not leave cache entries behind
/// that make sense only in the context of the abandoned branch's user state.
#[derive(Clone)]
pub struct Backtrack<P>(P);

/// Builds [`Backtrack`].
pub fn backtrack<P>(p: P) -> Backtrack<P> {
    Backtrack(p)
}

impl<S, U, P> Parser<S, U> for Backtrack<P>
where
    S: Stream,
    U: Clone,
    P: Parser<S, U>,
{
    type Output = P::Output;

    fn step(&self, state: ParserState<S, U>, memo: Memo<S, U>) -> Step<S, U, P::Output> {
        let original_memo = memo.clone();
        Step::Done(rethread_memo(self.0.parse(state, memo), original_memo))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combinator::core::{always, never, token};
    use crate::error::ParseError;
    use crate::state::Position;
    use crate::stream::VecStream;

    fn state(tokens: &str) -> ParserState<VecStream<char>, ()> {
        ParserState::new(VecStream::from(tokens), ())
    }

    #[test]
    fn memo_is_observationally_transparent() {
        let direct = token::<VecStream<char>, _, _>(|c: &char| *c == 'a', |p, f| {
            ParseError::Expect(p, "a".into(), f.map(|c| c.to_string()))
        });
        let memoized = memo(token::<VecStream<char>, _, _>(|c: &char| *c == 'a', |p, f| {
            ParseError::Expect(p, "a".into(), f.map(|c| c.to_string()))
        }));
        for input in ["abc", "xyz", ""] {
            let direct_out = direct.parse(state(input), Memo::new());
            let memo_out = memoized.parse(state(input), Memo::new());
            assert_eq!(direct_out.is_ok(), memo_out.is_ok());
            assert_eq!(direct_out.is_consumed(), memo_out.is_consumed());
        }
    }

    #[test]
    fn memo_cache_hit_replays_recorded_outcome() {
        let p = memo(always::<i32>(42));
        let m = Memo::new();
        let first = p.parse(state("x"), m.clone());
        let (value1, _, m1) = first.into_result().unwrap();
        assert_eq!(value1, 42);
        assert_eq!(m1.len(), 1);
        let second = p.parse(state("x"), m1);
        let (value2, ..) = second.into_result().unwrap();
        assert_eq!(value2, 42);
    }

    #[test]
    fn backtrack_discards_inner_memo_growth() {
        let inner = memo(always::<i32>(1));
        let p = backtrack(inner);
        let m = Memo::new();
        let out = p.parse(state("x"), m.clone());
        assert_eq!(out.memo().len(), m.len());
    }

    #[test]
    fn backtrack_preserves_caller_memo_on_failure_too() {
        let p = backtrack(never::<i32>(ParseError::Unknown(Position::start())));
        let m = Memo::new();
        let out = p.parse(state("x"), m.clone());
        assert_eq!(out.memo().len(), 0);
    }
}
