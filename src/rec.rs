//! The fixed-point builder (C9): the only sanctioned way to build a self-referential (recursive)
//! grammar.
//!
//! Direct self-reference at construction time would try to read a binding before it exists —
//! [`rec`] instead hands the body a [`Recursive`] handle that is a *non-owning*, once-initialized
//! indirection: calling it during parsing dispatches to the finished parser, but at construction
//! time nothing has been written yet, which is fine because the body only stores the handle for
//! later use, it does not call it.

use std::cell::RefCell;
use std::rc::Rc;

use crate::engine::{Parser, Step};
use crate::memo::Memo;
use crate::state::ParserState;
use crate::stream::Stream;

/// A handle to a parser under construction.
///
/// Cloning a `Recursive` clones the handle, not the parser — all clones refer to the same
/// indirection cell, which is written exactly once, before any parse runs, by [`rec`].
pub struct Recursive<S: Stream, U, O> {
    cell: Rc<RefCell<Option<Rc<dyn Parser<S, U, Output = O>>>>>,
}

impl<S: Stream, U, O> Clone for Recursive<S, U, O> {
    fn clone(&self) -> Self {
        Recursive {
            cell: Rc::clone(&self.cell),
        }
    }
}

impl<S, U, O> Parser<S, U> for Recursive<S, U, O>
where
    S: Stream,
{
    type Output = O;

    fn step(&self, state: ParserState<S, U>, memo: Memo<S, U>) -> Step<S, U, O> {
        let target = self
            .cell
            .borrow()
            .clone()
            .expect("recursive parser called before its definition was completed");
        target.step(state, memo)
    }
}

/// Builds a self-referential parser.
///
/// `def` receives a [`Recursive`] handle standing in for the parser being built, and must return
/// the completed body (typically a [`crate::combinator::choice`] or [`crate::combinator::either`]
/// over base cases and recursive cases that hold the handle). The handle is wired up to that body
/// before `rec` returns — calling the returned parser after that point, including calling the
/// handle recursively from inside the body during an actual parse, works exactly like calling any
/// other parser.
///
/// # Panics
///
/// Panics if the returned [`Recursive`] handle is *called* (not just stored) before `rec`
/// finishes wiring it up — i.e. only if `def` tries to run the grammar against input during its
/// own construction, which is not a supported use.
pub fn rec<S, U, O>(
    def: impl FnOnce(Recursive<S, U, O>) -> Rc<dyn Parser<S, U, Output = O>>,
) -> Recursive<S, U, O>
where
    S: Stream + 'static,
    U: 'static,
    O: 'static,
{
    let cell = Rc::new(RefCell::new(None));
    let handle = Recursive {
        cell: Rc::clone(&cell),
    };
    let body = def(handle.clone());
    *cell.borrow_mut() = Some(body);
    handle
}

/// Wraps `inner`, overriding its diagnostic [`Parser::display_name`] without changing parse
/// behavior.
#[derive(Clone)]
pub struct Named<P> {
    name: String,
    inner: P,
}

/// Builds [`Named`].
pub fn named<P>(name: impl Into<String>, inner: P) -> Named<P> {
    Named {
        name: name.into(),
        inner,
    }
}

impl<S, U, P> Parser<S, U> for Named<P>
where
    S: Stream,
    P: Parser<S, U>,
{
    type Output = P::Output;

    fn step(&self, state: ParserState<S, U>, memo: Memo<S, U>) -> Step<S, U, P::Output> {
        self.inner.step(state, memo)
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

/// `RecParser(name, body) = Parser(name, rec(body))`: a named, self-referential parser.
pub fn rec_parser<S, U, O>(
    name: impl Into<String>,
    body: impl FnOnce(Recursive<S, U, O>) -> Rc<dyn Parser<S, U, Output = O>>,
) -> Named<Recursive<S, U, O>>
where
    S: Stream + 'static,
    U: 'static,
    O: 'static,
{
    named(name, rec(body))
}
