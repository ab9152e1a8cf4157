//! The continuation protocol (C5) and the trampoline (C6) that drives it.
//!
//! Every parser, instead of being invoked with four callback continuations directly (the
//! dynamically-typed formulation in the specification), is a value implementing [`Parser`] whose
//! [`Parser::step`] returns a [`Step`]: either it is [`Step::Done`] with a final [`Outcome`], or
//! it is [`Step::Continue`] with a [`Thunk`] to run next. [`trampoline`] is the loop that drains
//! a `Step` to completion without growing the Rust call stack — this is the translation the
//! specification's own design notes call for (§9): "compile each combinator to a dedicated node
//! type implementing a `Parser` trait whose `step` method returns a tagged
//! `Step { Done(Outcome) | Continue(&dyn Parser, state, memo) }`".
//!
//! [`Outcome`]'s four variants *are* the four continuations from the specification:
//! `ConsumedOk`/`ConsumedErr` correspond to `cok`/`cerr`, `EmptyOk`/`EmptyErr` to `eok`/`eerr`.
//! A combinator that would "invoke `cok(...)`" in the specification's pseudocode instead
//! constructs and returns `Outcome::ConsumedOk(...)`.
//!
//! Most primitive combinators compose by calling a child's [`Parser::parse`] (which itself
//! trampolines) and matching on the resulting `Outcome` — recursion here is bounded by how
//! deeply the *grammar* nests, which is authored by the programmer, not by input length, exactly
//! as in any other combinator library. The one place recursion is genuinely data-driven —
//! repeating a sub-parser once per input token, in [`crate::combinator::many`] — is written
//! against `Step`/[`Thunk`] directly, so that repeating over an input far longer than the host
//! stack costs O(1) additional stack frames, not O(n).

use crate::error::ParseError;
use crate::memo::Memo;
use crate::state::ParserState;
use crate::stream::Stream;

/// The outcome of running a parser once: one of the four consumed/empty × ok/err classes.
pub enum Outcome<S: Stream, U, O> {
    /// Succeeded, having advanced the input (`cok`).
    ConsumedOk(O, ParserState<S, U>, Memo<S, U>),
    /// Failed, having advanced the input; not recoverable by alternation (`cerr`).
    ConsumedErr(ParseError, ParserState<S, U>, Memo<S, U>),
    /// Succeeded without advancing the input (`eok`).
    EmptyOk(O, ParserState<S, U>, Memo<S, U>),
    /// Failed without advancing the input; recoverable by alternation (`eerr`).
    EmptyErr(ParseError, ParserState<S, U>, Memo<S, U>),
}

impl<S: Stream, U: Clone, O: Clone> Clone for Outcome<S, U, O> {
    fn clone(&self) -> Self {
        match self {
            Outcome::ConsumedOk(o, s, m) => Outcome::ConsumedOk(o.clone(), s.clone(), m.clone()),
            Outcome::ConsumedErr(e, s, m) => Outcome::ConsumedErr(e.clone(), s.clone(), m.clone()),
            Outcome::EmptyOk(o, s, m) => Outcome::EmptyOk(o.clone(), s.clone(), m.clone()),
            Outcome::EmptyErr(e, s, m) => Outcome::EmptyErr(e.clone(), s.clone(), m.clone()),
        }
    }
}

impl<S: Stream, U, O> Outcome<S, U, O> {
    /// True for the two "consumed" variants.
    pub fn is_consumed(&self) -> bool {
        matches!(self, Outcome::ConsumedOk(..) | Outcome::ConsumedErr(..))
    }

    /// True for the two "ok" variants.
    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::ConsumedOk(..) | Outcome::EmptyOk(..))
    }

    /// The state carried by this outcome, regardless of variant.
    pub fn state(&self) -> &ParserState<S, U> {
        match self {
            Outcome::ConsumedOk(_, s, _)
            | Outcome::ConsumedErr(_, s, _)
            | Outcome::EmptyOk(_, s, _)
            | Outcome::EmptyErr(_, s, _) => s,
        }
    }

    /// The memo chain carried by this outcome, regardless of variant.
    pub fn memo(&self) -> &Memo<S, U> {
        match self {
            Outcome::ConsumedOk(_, _, m)
            | Outcome::ConsumedErr(_, _, m)
            | Outcome::EmptyOk(_, _, m)
            | Outcome::EmptyErr(_, _, m) => m,
        }
    }

    /// Converts to a `Result`, discarding the consumed/empty distinction — this is the boundary
    /// the `Runner` (C10) sits at.
    pub fn into_result(self) -> Result<(O, ParserState<S, U>, Memo<S, U>), (ParseError, ParserState<S, U>, Memo<S, U>)> {
        match self {
            Outcome::ConsumedOk(o, s, m) | Outcome::EmptyOk(o, s, m) => Ok((o, s, m)),
            Outcome::ConsumedErr(e, s, m) | Outcome::EmptyErr(e, s, m) => Err((e, s, m)),
        }
    }
}

/// A deferred unit of work: call it to get the next [`Step`].
///
/// Boxing is unavoidable here (the closures capture combinator-specific state of varying size)
/// but it is paid once per *iteration* of a data-driven repeat, not once per recursive descent
/// through the grammar.
pub struct Thunk<S: Stream, U, O>(Box<dyn FnOnce() -> Step<S, U, O>>);

impl<S: Stream, U, O> Thunk<S, U, O> {
    /// Wraps a closure as a thunk.
    pub fn new(f: impl FnOnce() -> Step<S, U, O> + 'static) -> Self {
        Thunk(Box::new(f))
    }

    fn call(self) -> Step<S, U, O> {
        (self.0)()
    }
}

/// One step of the trampolined interpreter: either a final answer, or more work to do.
pub enum Step<S: Stream, U, O> {
    /// The final outcome — the trampoline stops here.
    Done(Outcome<S, U, O>),
    /// Not finished; invoke the thunk for the next step.
    Continue(Thunk<S, U, O>),
}

/// Drains a `Step` to its final `Outcome` in a loop, never recursing.
///
/// This is the entire trampoline (C6): parsers and continuations that would otherwise recurse
/// produce `Step::Continue` thunks instead, and this loop is the only place those thunks are
/// ever called.
pub fn trampoline<S: Stream, U, O>(mut step: Step<S, U, O>) -> Outcome<S, U, O> {
    loop {
        match step {
            Step::Done(outcome) => return outcome,
            Step::Continue(thunk) => step = thunk.call(),
        }
    }
}

/// A composable parser over streams of `S` threading opaque user state `U`.
///
/// This is the Rust realization of the specification's "callable opaque value": a `Parser` is
/// any type that can take a state and a memo chain and produce a `Step`. Combinators are simply
/// other types implementing this trait that hold child parsers and compose their outcomes.
pub trait Parser<S: Stream, U> {
    /// The value produced on success.
    type Output;

    /// Advances the parse by one logical step from `state`, given the memo chain accumulated so
    /// far. Implementations that need to call a child parser to completion should prefer
    /// [`Parser::parse`] (which trampolines) unless they are themselves implementing a
    /// data-driven repeat, in which case they should return `Step::Continue` and let the caller's
    /// trampoline loop drive the iteration.
    fn step(&self, state: ParserState<S, U>, memo: Memo<S, U>) -> Step<S, U, Self::Output>;

    /// Runs this parser to completion from `state`/`memo`, trampolining any `Step::Continue`
    /// chain. This is what every combinator should call on its children.
    fn parse(&self, state: ParserState<S, U>, memo: Memo<S, U>) -> Outcome<S, U, Self::Output> {
        trampoline(self.step(state, memo))
    }

    /// A human-readable name for diagnostics (see [`crate::trace`]).
    fn display_name(&self) -> &str {
        "<parser>"
    }
}

// Blanket impl so `Rc<dyn Parser<S, U, Output = O>>` (used by `rec`/`RecParser`, see
// `crate::rec`) is itself a `Parser` — combinators hold children by value, and an `Rc` to a
// trait object is the value type recursive grammars need.
impl<S: Stream, U, O, P: Parser<S, U, Output = O> + ?Sized> Parser<S, U> for std::rc::Rc<P> {
    type Output = O;

    fn step(&self, state: ParserState<S, U>, memo: Memo<S, U>) -> Step<S, U, O> {
        (**self).step(state, memo)
    }

    fn display_name(&self) -> &str {
        (**self).display_name()
    }
}
