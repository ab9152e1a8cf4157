//! Primitive, iterative, and memoizing combinators — the engine's vocabulary (C7, C8, C11).
//!
//! This module mirrors the teacher library's own `combinator` module in spirit: a flat
//! re-export surface over a handful of focused submodules, so `cascade::combinator::*` gives
//! callers everything without needing to know which file a given combinator lives in.

mod core;
mod iter;
mod memoize;

pub use core::{
    always, attempt, bind, choice, either, eof, expected, extract, fail, get_input,
    get_parser_state, get_position, get_state, lookahead, modify_parser_state, modify_state,
    never, next, set_input, set_parser_state, set_position, set_state, token, Always, Attempt,
    Bind, BoxedParser, Choice, Either, Eof, Expected, Extract, Fail, Lookahead,
    ModifyParserState, Never, TokenParser,
};
pub use iter::{append, cons, eager, many, many1, sequence, Append, Cons, Eager, Many, Sequence};
pub use memoize::{backtrack, memo, Backtrack, Memoize};

use crate::engine::Parser;
use crate::stream::Stream;

/// `either(p, always(default))`: `p` if it succeeds, else `default` without consuming.
///
/// This is the same fixed-point shape `many` is built from internally (§4.4 of the
/// specification): `many(p) = optional(end, cons(safeP, many(p)))`. Naming it separately avoids
/// every user of "try this, or fall back to a default" having to re-derive that shape by hand.
pub fn optional<S, U, P>(default: P::Output, p: P) -> Either<P, Always<P::Output>>
where
    S: Stream,
    P: Parser<S, U>,
    P::Output: Clone,
{
    either(p, always(default))
}
