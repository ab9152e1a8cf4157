//! Primitive combinators (C7): the small vocabulary every other parser in this crate, and every
//! parser a caller writes, is ultimately built from.

use std::marker::PhantomData;

use crate::engine::{Outcome, Parser, Step};
use crate::error::ParseError;
use crate::memo::Memo;
use crate::state::{ParserState, Position};
use crate::stream::Stream;

/// A parser that always succeeds with `value`, consuming nothing.
#[derive(Clone)]
pub struct Always<O>(O);

/// Builds [`Always`]: succeeds with `value` without consuming input.
pub fn always<O: Clone>(value: O) -> Always<O> {
    Always(value)
}

impl<S: Stream, U, O: Clone> Parser<S, U> for Always<O> {
    type Output = O;

    fn step(&self, state: ParserState<S, U>, memo: Memo<S, U>) -> Step<S, U, O> {
        Step::Done(Outcome::EmptyOk(self.0.clone(), state, memo))
    }
}

/// A parser that always fails with `err`, consuming nothing.
#[derive(Clone)]
pub struct Never<O> {
    err: ParseError,
    _marker: PhantomData<fn() -> O>,
}

/// Builds [`Never`]: fails with `err` without consuming input.
pub fn never<O>(err: ParseError) -> Never<O> {
    Never {
        err,
        _marker: PhantomData,
    }
}

impl<S: Stream, U, O> Parser<S, U> for Never<O> {
    type Output = O;

    fn step(&self, state: ParserState<S, U>, memo: Memo<S, U>) -> Step<S, U, O> {
        Step::Done(Outcome::EmptyErr(self.err.clone(), state, memo))
    }
}

/// Consumes exactly one token if `pred` accepts it; otherwise fails *without* consuming.
#[derive(Clone)]
pub struct TokenParser<S: Stream, F, E> {
    pred: F,
    err_fn: E,
    _marker: PhantomData<S>,
}

/// Builds a [`TokenParser`]: on empty input calls `err_fn(pos, None)`; otherwise peeks the next
/// token and calls `pred` on it, consuming on acceptance and leaving the token in place on
/// rejection.
pub fn token<S, F, E>(pred: F, err_fn: E) -> TokenParser<S, F, E>
where
    S: Stream,
    F: Fn(&S::Token) -> bool,
    E: Fn(Position, Option<S::Token>) -> ParseError,
{
    TokenParser {
        pred,
        err_fn,
        _marker: PhantomData,
    }
}

impl<S, U, F, E> Parser<S, U> for TokenParser<S, F, E>
where
    S: Stream,
    U: Clone,
    F: Fn(&S::Token) -> bool,
    E: Fn(Position, Option<S::Token>) -> ParseError,
{
    type Output = S::Token;

    fn step(&self, state: ParserState<S, U>, memo: Memo<S, U>) -> Step<S, U, S::Token> {
        if state.input().is_empty() {
            let err = (self.err_fn)(state.position(), None);
            return Step::Done(Outcome::EmptyErr(err, state, memo));
        }
        let tok = state.input().first().expect("checked non-empty above");
        if (self.pred)(&tok) {
            let (_consumed, next_state) = state.next();
            Step::Done(Outcome::ConsumedOk(tok, next_state, memo))
        } else {
            let err = (self.err_fn)(state.position(), Some(tok));
            Step::Done(Outcome::EmptyErr(err, state, memo))
        }
    }
}

/// Runs `p`, then runs `f(value)` against the successor state. See the specification's
/// consumption-composition rule: if `p` consumed, the second parser's empty outcomes are promoted
/// to consumed outcomes, since the sequence as a whole has consumed input.
#[derive(Clone)]
pub struct Bind<P, F> {
    p: P,
    f: F,
}

/// Builds [`Bind`].
pub fn bind<S, U, P, F, Q>(p: P, f: F) -> Bind<P, F>
where
    S: Stream,
    P: Parser<S, U>,
    F: Fn(P::Output) -> Q,
    Q: Parser<S, U>,
{
    Bind { p, f }
}

impl<S, U, P, F, Q> Parser<S, U> for Bind<P, F>
where
    S: Stream,
    U: Clone,
    P: Parser<S, U>,
    F: Fn(P::Output) -> Q,
    Q: Parser<S, U>,
{
    type Output = Q::Output;

    fn step(&self, state: ParserState<S, U>, memo: Memo<S, U>) -> Step<S, U, Q::Output> {
        match self.p.parse(state, memo) {
            Outcome::EmptyOk(v, s2, m2) => {
                let q = (self.f)(v);
                Step::Done(q.parse(s2, m2))
            }
            Outcome::ConsumedOk(v, s2, m2) => {
                let q = (self.f)(v);
                let promoted = match q.parse(s2, m2) {
                    Outcome::EmptyOk(v2, s3, m3) => Outcome::ConsumedOk(v2, s3, m3),
                    Outcome::EmptyErr(e2, s3, m3) => Outcome::ConsumedErr(e2, s3, m3),
                    already_consumed => already_consumed,
                };
                Step::Done(promoted)
            }
            Outcome::ConsumedErr(e, s2, m2) => Step::Done(Outcome::ConsumedErr(e, s2, m2)),
            Outcome::EmptyErr(e, s2, m2) => Step::Done(Outcome::EmptyErr(e, s2, m2)),
        }
    }
}

/// Runs `p`, discards its value, then runs `q` against the successor state and returns `q`'s
/// value. `next(p, q) = bind(p, move |_| q)`.
pub fn next<S, U, P, Q>(p: P, q: Q) -> Bind<P, impl Fn(P::Output) -> Q>
where
    S: Stream,
    P: Parser<S, U>,
    Q: Parser<S, U> + Clone,
{
    bind(p, move |_| q.clone())
}

/// Turns a "consumed then failed" outcome of `p` into "failed without consuming", enabling
/// backtracking across it in [`either`]. The state reported on failure is the state *before*
/// `p` ran; the memo chain is the one `p` produced (memo entries are pure and safe to keep).
#[derive(Clone)]
pub struct Attempt<P>(P);

/// Builds [`Attempt`].
pub fn attempt<P>(p: P) -> Attempt<P> {
    Attempt(p)
}

impl<S, U, P> Parser<S, U> for Attempt<P>
where
    S: Stream,
    U: Clone,
    P: Parser<S, U>,
{
    type Output = P::Output;

    fn step(&self, state: ParserState<S, U>, memo: Memo<S, U>) -> Step<S, U, P::Output> {
        let original_state = state.clone();
        let outcome = self.0.parse(state, memo);
        Step::Done(match outcome {
            Outcome::ConsumedErr(err, _consumed_state, memo_after) => {
                Outcome::EmptyErr(err, original_state, memo_after)
            }
            other => other,
        })
    }
}

/// Runs `p`; on success, reports the pre-call state so the input is not consumed. Errors
/// propagate unchanged.
#[derive(Clone)]
pub struct Lookahead<P>(P);

/// Builds [`Lookahead`].
pub fn lookahead<P>(p: P) -> Lookahead<P> {
    Lookahead(p)
}

impl<S, U, P> Parser<S, U> for Lookahead<P>
where
    S: Stream,
    U: Clone,
    P: Parser<S, U>,
{
    type Output = P::Output;

    fn step(&self, state: ParserState<S, U>, memo: Memo<S, U>) -> Step<S, U, P::Output> {
        let original_state = state.clone();
        Step::Done(match self.0.parse(state, memo) {
            Outcome::ConsumedOk(v, _s2, m2) | Outcome::EmptyOk(v, _s2, m2) => {
                Outcome::EmptyOk(v, original_state, m2)
            }
            failure => failure,
        })
    }
}

/// Runs `p`; on empty failure, tries `q` at the original position, threading `p`'s memo chain
/// into `q` (a failed alternative's memoized work stays available to the next one). If both fail
/// empty, merges the two errors into a lazy [`ParseError::Choice`] union.
#[derive(Clone)]
pub struct Either<P, Q> {
    p: P,
    q: Q,
}

/// Builds [`Either`].
pub fn either<P, Q>(p: P, q: Q) -> Either<P, Q> {
    Either { p, q }
}

impl<S, U, P, Q, O> Parser<S, U> for Either<P, Q>
where
    S: Stream,
    U: Clone,
    P: Parser<S, U, Output = O>,
    Q: Parser<S, U, Output = O>,
{
    type Output = O;

    fn step(&self, state: ParserState<S, U>, memo: Memo<S, U>) -> Step<S, U, O> {
        let original_state = state.clone();
        let pos = state.position();
        Step::Done(match self.p.parse(state, memo) {
            Outcome::EmptyErr(err_p, _s2, memo_from_p) => {
                match self.q.parse(original_state, memo_from_p) {
                    Outcome::EmptyErr(err_q, s3, m3) => {
                        Outcome::EmptyErr(ParseError::Choice(pos, Box::new(err_p), Box::new(err_q)), s3, m3)
                    }
                    other => other,
                }
            }
            other => other,
        })
    }
}

/// Type-erased handle to a parser of a fixed output type, for heterogeneous collections like
/// [`choice`]'s alternative list and recursive grammars built with [`crate::rec::rec`].
pub type BoxedParser<S, U, O> = std::rc::Rc<dyn Parser<S, U, Output = O>>;

/// Tries each alternative left to right, threading the memo chain from one failed attempt into
/// the next. Equivalent to a right fold of [`either`] over the list with a zero-alternative seed
/// that fails with `Multiple(pos, [])`; implemented as a flat loop instead of literal recursive
/// folding so an arbitrarily long alternative list costs O(1) additional stack.
///
/// # Panics
///
/// Panics (raising the fatal grammar-defect condition described in the specification as
/// `ParserError`) if `parsers` is empty — a `choice` with no alternatives is a grammar bug caught
/// at construction, not a parse failure.
#[derive(Clone)]
pub struct Choice<S: Stream, U, O> {
    parsers: Vec<BoxedParser<S, U, O>>,
}

/// Builds [`Choice`] from a non-empty list of same-output alternatives.
pub fn choice<S, U, O>(parsers: Vec<BoxedParser<S, U, O>>) -> Choice<S, U, O>
where
    S: Stream,
{
    if parsers.is_empty() {
        panic!(
            "{}",
            crate::error::ParserError::new("choice() called with zero alternatives")
        );
    }
    Choice { parsers }
}

impl<S, U, O> Parser<S, U> for Choice<S, U, O>
where
    S: Stream,
    U: Clone,
{
    type Output = O;

    fn step(&self, state: ParserState<S, U>, memo: Memo<S, U>) -> Step<S, U, O> {
        let pos = state.position();
        let mut current_memo = memo;
        let mut errors = Vec::new();
        for p in &self.parsers {
            match p.parse(state.clone(), current_memo) {
                Outcome::EmptyErr(err, _s2, m2) => {
                    errors.push(err);
                    current_memo = m2;
                }
                other => return Step::Done(other),
            }
        }
        let merged = errors
            .into_iter()
            .rev()
            .fold(None, |acc, err| {
                Some(match acc {
                    None => err,
                    Some(tail) => ParseError::Choice(pos, Box::new(err), Box::new(tail)),
                })
            })
            .unwrap_or_else(|| ParseError::Multiple(pos, Vec::new()));
        Step::Done(Outcome::EmptyErr(merged, state, current_memo))
    }
}

/// Wraps `p`; replaces an empty failure's error with `Expect(pos, label)`. A consumed failure is
/// left as-is — `p` has already committed, so relabeling it as "expected `label`" would be
/// misleading about how far into `p` things went wrong.
#[derive(Clone)]
pub struct Expected<P> {
    label: String,
    p: P,
}

/// Builds [`Expected`].
pub fn expected<P>(label: impl Into<String>, p: P) -> Expected<P> {
    Expected {
        label: label.into(),
        p,
    }
}

impl<S, U, P> Parser<S, U> for Expected<P>
where
    S: Stream,
    U: Clone,
    P: Parser<S, U>,
{
    type Output = P::Output;

    fn step(&self, state: ParserState<S, U>, memo: Memo<S, U>) -> Step<S, U, P::Output> {
        let pos = state.position();
        Step::Done(match self.p.parse(state, memo) {
            Outcome::EmptyErr(_err, s2, m2) => {
                Outcome::EmptyErr(ParseError::Expect(pos, self.label.clone(), None), s2, m2)
            }
            other => other,
        })
    }
}

/// Fails unconditionally at the current position, with an optional custom message.
#[derive(Clone)]
pub struct Fail<O> {
    message: Option<String>,
    _marker: PhantomData<fn() -> O>,
}

/// Builds [`Fail`]: fails with `Unexpect(pos, message)` if a message is given, else
/// `Unknown(pos)`.
pub fn fail<O>(message: Option<String>) -> Fail<O> {
    Fail {
        message,
        _marker: PhantomData,
    }
}

impl<S: Stream, U, O> Parser<S, U> for Fail<O> {
    type Output = O;

    fn step(&self, state: ParserState<S, U>, memo: Memo<S, U>) -> Step<S, U, O> {
        let pos = state.position();
        let err = match &self.message {
            Some(msg) => ParseError::Unexpect(pos, msg.clone()),
            None => ParseError::Unknown(pos),
        };
        Step::Done(Outcome::EmptyErr(err, state, memo))
    }
}

/// Succeeds (with `()`) iff the input is empty; otherwise fails without consuming.
#[derive(Clone)]
pub struct Eof;

/// Builds [`Eof`].
pub fn eof() -> Eof {
    Eof
}

impl<S, U> Parser<S, U> for Eof
where
    S: Stream,
    S::Token: std::fmt::Debug,
{
    type Output = ();

    fn step(&self, state: ParserState<S, U>, memo: Memo<S, U>) -> Step<S, U, ()> {
        if state.input().is_empty() {
            Step::Done(Outcome::EmptyOk((), state, memo))
        } else {
            let found = state.input().first().map(|t| format!("{t:?}"));
            let err = ParseError::Expect(state.position(), "end of input".into(), found);
            Step::Done(Outcome::EmptyErr(err, state, memo))
        }
    }
}

/// Reads a value out of the current state without consuming input or changing it — the building
/// block every state accessor below is implemented with.
#[derive(Clone)]
pub struct Extract<F> {
    f: F,
}

/// Builds [`Extract`]: succeeds with `f(&state)`, state unchanged.
pub fn extract<S, U, F, O>(f: F) -> Extract<F>
where
    S: Stream,
    F: Fn(&ParserState<S, U>) -> O,
{
    Extract { f }
}

impl<S, U, F, O> Parser<S, U> for Extract<F>
where
    S: Stream,
    F: Fn(&ParserState<S, U>) -> O,
{
    type Output = O;

    fn step(&self, state: ParserState<S, U>, memo: Memo<S, U>) -> Step<S, U, O> {
        let value = (self.f)(&state);
        Step::Done(Outcome::EmptyOk(value, state, memo))
    }
}

/// Replaces the whole parser state with `f(&state)`, reporting the *new* state as the result
/// value. This asymmetry with [`extract`] — which reports a value without changing state — is
/// load-bearing: it is what lets `bind`-based user code distinguish "read something" from
/// "install a new state and hand it back for further chaining".
#[derive(Clone)]
pub struct ModifyParserState<F> {
    f: F,
}

/// Builds [`ModifyParserState`].
pub fn modify_parser_state<S, U, F>(f: F) -> ModifyParserState<F>
where
    S: Stream,
    U: Clone,
    F: Fn(&ParserState<S, U>) -> ParserState<S, U>,
{
    ModifyParserState { f }
}

impl<S, U, F> Parser<S, U> for ModifyParserState<F>
where
    S: Stream,
    U: Clone,
    F: Fn(&ParserState<S, U>) -> ParserState<S, U>,
{
    type Output = ParserState<S, U>;

    fn step(&self, state: ParserState<S, U>, memo: Memo<S, U>) -> Step<S, U, ParserState<S, U>> {
        let new_state = (self.f)(&state);
        Step::Done(Outcome::EmptyOk(new_state.clone(), new_state, memo))
    }
}

/// Reads the current position without consuming input.
pub fn get_position<S, U>() -> Extract<impl Fn(&ParserState<S, U>) -> Position>
where
    S: Stream,
{
    extract(|s: &ParserState<S, U>| s.position())
}

/// Jumps to `pos`, reporting the new state as its result.
pub fn set_position<S, U>(pos: Position) -> ModifyParserState<impl Fn(&ParserState<S, U>) -> ParserState<S, U>>
where
    S: Stream,
    U: Clone,
{
    modify_parser_state(move |s: &ParserState<S, U>| s.with_position(pos))
}

/// Reads the opaque user state without consuming input.
pub fn get_state<S, U>() -> Extract<impl Fn(&ParserState<S, U>) -> U>
where
    S: Stream,
    U: Clone,
{
    extract(|s: &ParserState<S, U>| s.user_state().clone())
}

/// Replaces the user state, reporting the new state as its result.
pub fn set_state<S, U>(value: U) -> ModifyParserState<impl Fn(&ParserState<S, U>) -> ParserState<S, U>>
where
    S: Stream,
    U: Clone,
{
    modify_parser_state(move |s: &ParserState<S, U>| s.with_user_state(value.clone()))
}

/// Replaces the user state with `f` applied to the current one, reporting the new state.
pub fn modify_state<S, U, F>(f: F) -> ModifyParserState<impl Fn(&ParserState<S, U>) -> ParserState<S, U>>
where
    S: Stream,
    U: Clone,
    F: Fn(&U) -> U,
{
    modify_parser_state(move |s: &ParserState<S, U>| s.with_user_state(f(s.user_state())))
}

/// Reads the unconsumed input without consuming it.
pub fn get_input<S, U>() -> Extract<impl Fn(&ParserState<S, U>) -> S>
where
    S: Stream,
{
    extract(|s: &ParserState<S, U>| s.input().clone())
}

/// Replaces the input, reporting the new state as its result.
///
/// This routes through [`modify_parser_state`] (a whole-state rewrite), not a user-state-only
/// change — see the note on [`crate::state::ParserState::with_input`] about why the specification
/// flags the opposite choice as a likely source bug.
pub fn set_input<S, U>(input: S) -> ModifyParserState<impl Fn(&ParserState<S, U>) -> ParserState<S, U>>
where
    S: Stream,
    U: Clone,
{
    modify_parser_state(move |s: &ParserState<S, U>| s.with_input(input.clone()))
}

/// Reads the full parser state (input, position, and user state together) without consuming.
pub fn get_parser_state<S, U>() -> Extract<impl Fn(&ParserState<S, U>) -> ParserState<S, U>>
where
    S: Stream,
    U: Clone,
{
    extract(|s: &ParserState<S, U>| s.clone())
}

/// Replaces the entire parser state wholesale, reporting it back as its result.
pub fn set_parser_state<S, U>(
    new_state: ParserState<S, U>,
) -> ModifyParserState<impl Fn(&ParserState<S, U>) -> ParserState<S, U>>
where
    S: Stream,
    U: Clone,
{
    modify_parser_state(move |_s: &ParserState<S, U>| new_state.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memo::Memo;
    use crate::stream::VecStream;

    fn state(tokens: &str) -> ParserState<VecStream<char>, ()> {
        ParserState::new(VecStream::from(tokens), ())
    }

    #[test]
    fn always_succeeds_empty() {
        let p = always::<i32>(7);
        match p.parse(state("abc"), Memo::new()) {
            Outcome::EmptyOk(v, s, _) => {
                assert_eq!(v, 7);
                assert_eq!(s.position().index(), 0);
            }
            _ => panic!("expected EmptyOk"),
        }
    }

    #[test]
    fn never_fails_empty() {
        let err = ParseError::Unknown(Position::start());
        let p = never::<i32>(err.clone());
        match p.parse(state("abc"), Memo::new()) {
            Outcome::EmptyErr(e, ..) => assert_eq!(e, err),
            _ => panic!("expected EmptyErr"),
        }
    }

    #[test]
    fn token_consumes_on_match_not_on_mismatch() {
        let p = token::<VecStream<char>, _, _>(|c: &char| *c == 'a', |pos, found| {
            ParseError::Expect(pos, "'a'".into(), found.map(|c| c.to_string()))
        });
        match p.parse(state("abc"), Memo::new()) {
            Outcome::ConsumedOk(v, s, _) => {
                assert_eq!(v, 'a');
                assert_eq!(s.position().index(), 1);
            }
            _ => panic!("expected ConsumedOk"),
        }
        match p.parse(state("xyz"), Memo::new()) {
            Outcome::EmptyErr(_, s, _) => assert_eq!(s.position().index(), 0),
            _ => panic!("expected EmptyErr"),
        }
    }

    #[test]
    fn bind_left_identity() {
        let p = bind::<VecStream<char>, (), _, _, _>(always::<i32>(5), |v| always::<i32>(v * 2));
        match p.parse(state("x"), Memo::new()) {
            Outcome::EmptyOk(v, ..) => assert_eq!(v, 10),
            _ => panic!(),
        }
    }

    #[test]
    fn bind_promotes_empty_to_consumed_after_consuming_first() {
        let a = token::<VecStream<char>, _, _>(|c: &char| *c == 'a', |pos, found| {
            ParseError::Expect(pos, "a".into(), found.map(|c| c.to_string()))
        });
        let p = bind::<VecStream<char>, (), _, _, _>(a, |_| always::<i32>(1));
        match p.parse(state("a"), Memo::new()) {
            Outcome::ConsumedOk(v, ..) => assert_eq!(v, 1),
            _ => panic!("expected promotion to ConsumedOk"),
        }
    }

    #[test]
    fn next_discards_first_value_and_keeps_second() {
        let a = token::<VecStream<char>, _, _>(|c: &char| *c == 'a', |pos, found| {
            ParseError::Expect(pos, "a".into(), found.map(|c| c.to_string()))
        });
        let b = token::<VecStream<char>, _, _>(|c: &char| *c == 'b', |pos, found| {
            ParseError::Expect(pos, "b".into(), found.map(|c| c.to_string()))
        });
        match next::<VecStream<char>, (), _, _>(a, b).parse(state("ab"), Memo::new()) {
            Outcome::ConsumedOk(v, s, _) => {
                assert_eq!(v, 'b');
                assert_eq!(s.position().index(), 2);
            }
            _ => panic!("expected ConsumedOk('b')"),
        }
    }

    #[test]
    fn attempt_resets_position_after_consumed_failure() {
        let a = token::<VecStream<char>, _, _>(|c: &char| *c == 'a', |pos, found| {
            ParseError::Expect(pos, "a".into(), found.map(|c| c.to_string()))
        });
        let b = token::<VecStream<char>, _, _>(|c: &char| *c == 'b', |pos, found| {
            ParseError::Expect(pos, "b".into(), found.map(|c| c.to_string()))
        });
        let seq = bind::<VecStream<char>, (), _, _, _>(a, move |_| bind(b, |bb| always(bb)));
        let p = attempt(seq);
        match p.parse(state("ac"), Memo::new()) {
            Outcome::EmptyErr(_, s, _) => assert_eq!(s.position().index(), 0),
            _ => panic!("expected EmptyErr at original position"),
        }
    }

    #[test]
    fn either_merges_errors_when_both_fail_empty() {
        let e1 = never::<i32>(ParseError::Unknown(Position::start()));
        let e2 = never::<i32>(ParseError::Unknown(Position::start()));
        match either(e1, e2).parse(state("x"), Memo::new()) {
            Outcome::EmptyErr(ParseError::Choice(..), ..) => {}
            _ => panic!("expected Choice error"),
        }
    }

    #[test]
    fn either_left_identity_for_never() {
        let p = either(never::<i32>(ParseError::Unknown(Position::start())), always(3));
        match p.parse(state("x"), Memo::new()) {
            Outcome::EmptyOk(v, ..) => assert_eq!(v, 3),
            _ => panic!(),
        }
    }

    #[test]
    fn choice_picks_leftmost_match() {
        let opts: Vec<BoxedParser<VecStream<char>, (), char>> = vec![
            std::rc::Rc::new(token::<VecStream<char>, _, _>(|c: &char| *c == 'a', |p, f| {
                ParseError::Expect(p, "a".into(), f.map(|c| c.to_string()))
            })),
            std::rc::Rc::new(token::<VecStream<char>, _, _>(|c: &char| *c == 'b', |p, f| {
                ParseError::Expect(p, "b".into(), f.map(|c| c.to_string()))
            })),
        ];
        match choice(opts).parse(state("bx"), Memo::new()) {
            Outcome::ConsumedOk(v, ..) => assert_eq!(v, 'b'),
            _ => panic!(),
        }
    }

    #[test]
    #[should_panic]
    fn choice_with_no_alternatives_panics() {
        let empty: Vec<BoxedParser<VecStream<char>, (), char>> = Vec::new();
        let _ = choice(empty);
    }

    #[test]
    fn eof_succeeds_only_at_end() {
        match eof().parse(state(""), Memo::new()) {
            Outcome::EmptyOk((), ..) => {}
            _ => panic!(),
        }
        match eof().parse(state("x"), Memo::new()) {
            Outcome::EmptyErr(..) => {}
            _ => panic!(),
        }
    }

    #[test]
    fn set_position_reports_new_state_as_value() {
        let p = set_position::<VecStream<char>, ()>(Position::start().increment(&'a'));
        match p.parse(state("abc"), Memo::new()) {
            Outcome::EmptyOk(reported, actual, _) => {
                assert_eq!(reported.position(), actual.position());
                assert_eq!(reported.position().index(), 1);
            }
            _ => panic!(),
        }
    }
}
