//! Iterative combinators (C8): `many`/`many1` and the small family of sequence-builders they are
//! expressed in terms of (`cons`, `append`, `sequence`, `eager`).
//!
//! The specification models these over a lazy output stream so that, e.g., `eager` has something
//! to force. Rust has no need for that indirection — a `Vec` is already as eager as it gets and
//! is what every comparable combinator library (including the teacher) returns from `many`/
//! `separated`-style combinators. `eager` is kept as a pass-through adapter purely so the public
//! surface named in the specification still exists; everything here is eager by construction.

use crate::engine::{Outcome, Parser, Step};
use crate::error::ParserError;
use crate::memo::Memo;
use crate::state::ParserState;
use crate::stream::Stream;

/// Prepends `pv`'s value onto `ps`'s vector, running `pv` then `ps`.
#[derive(Clone)]
pub struct Cons<PV, PS> {
    pv: PV,
    ps: PS,
}

/// Builds [`Cons`].
pub fn cons<PV, PS>(pv: PV, ps: PS) -> Cons<PV, PS> {
    Cons { pv, ps }
}

impl<S, U, PV, PS, T> Parser<S, U> for Cons<PV, PS>
where
    S: Stream,
    U: Clone,
    PV: Parser<S, U, Output = T>,
    PS: Parser<S, U, Output = Vec<T>>,
{
    type Output = Vec<T>;

    fn step(&self, state: ParserState<S, U>, memo: Memo<S, U>) -> Step<S, U, Vec<T>> {
        Step::Done(match self.pv.parse(state, memo) {
            Outcome::EmptyOk(v, s2, m2) => match self.ps.parse(s2, m2) {
                Outcome::EmptyOk(mut rest, s3, m3) => {
                    rest.insert(0, v);
                    Outcome::EmptyOk(rest, s3, m3)
                }
                Outcome::ConsumedOk(mut rest, s3, m3) => {
                    rest.insert(0, v);
                    Outcome::ConsumedOk(rest, s3, m3)
                }
                failure => failure,
            },
            Outcome::ConsumedOk(v, s2, m2) => match self.ps.parse(s2, m2) {
                Outcome::EmptyOk(mut rest, s3, m3) | Outcome::ConsumedOk(mut rest, s3, m3) => {
                    rest.insert(0, v);
                    Outcome::ConsumedOk(rest, s3, m3)
                }
                Outcome::EmptyErr(e, s3, m3) | Outcome::ConsumedErr(e, s3, m3) => {
                    Outcome::ConsumedErr(e, s3, m3)
                }
            },
            Outcome::ConsumedErr(e, s2, m2) => Outcome::ConsumedErr(e, s2, m2),
            Outcome::EmptyErr(e, s2, m2) => Outcome::EmptyErr(e, s2, m2),
        })
    }
}

/// Concatenates `pa`'s and `pb`'s vectors, running `pa` then `pb`.
#[derive(Clone)]
pub struct Append<PA, PB> {
    pa: PA,
    pb: PB,
}

/// Builds [`Append`].
pub fn append<PA, PB>(pa: PA, pb: PB) -> Append<PA, PB> {
    Append { pa, pb }
}

impl<S, U, PA, PB, T> Parser<S, U> for Append<PA, PB>
where
    S: Stream,
    U: Clone,
    PA: Parser<S, U, Output = Vec<T>>,
    PB: Parser<S, U, Output = Vec<T>>,
{
    type Output = Vec<T>;

    fn step(&self, state: ParserState<S, U>, memo: Memo<S, U>) -> Step<S, U, Vec<T>> {
        Step::Done(match self.pa.parse(state, memo) {
            Outcome::EmptyOk(mut a, s2, m2) => match self.pb.parse(s2, m2) {
                Outcome::EmptyOk(b, s3, m3) => {
                    a.extend(b);
                    Outcome::EmptyOk(a, s3, m3)
                }
                Outcome::ConsumedOk(b, s3, m3) => {
                    a.extend(b);
                    Outcome::ConsumedOk(a, s3, m3)
                }
                failure => failure,
            },
            Outcome::ConsumedOk(mut a, s2, m2) => match self.pb.parse(s2, m2) {
                Outcome::EmptyOk(b, s3, m3) | Outcome::ConsumedOk(b, s3, m3) => {
                    a.extend(b);
                    Outcome::ConsumedOk(a, s3, m3)
                }
                Outcome::EmptyErr(e, s3, m3) | Outcome::ConsumedErr(e, s3, m3) => {
                    Outcome::ConsumedErr(e, s3, m3)
                }
            },
            failure @ (Outcome::ConsumedErr(..) | Outcome::EmptyErr(..)) => failure,
        })
    }
}

/// Runs a list of same-output parsers in order, collecting their values.
///
/// Equivalent to a right fold of [`cons`] over the list seeded with `always(vec![])`, implemented
/// as a flat loop so a long list costs O(1) additional stack rather than O(n).
#[derive(Clone)]
pub struct Sequence<S: Stream, U, O> {
    parsers: Vec<crate::combinator::core::BoxedParser<S, U, O>>,
}

/// Builds [`Sequence`].
pub fn sequence<S, U, O>(parsers: Vec<crate::combinator::core::BoxedParser<S, U, O>>) -> Sequence<S, U, O>
where
    S: Stream,
{
    Sequence { parsers }
}

impl<S, U, O> Parser<S, U> for Sequence<S, U, O>
where
    S: Stream,
    U: Clone,
{
    type Output = Vec<O>;

    fn step(&self, mut state: ParserState<S, U>, mut memo: Memo<S, U>) -> Step<S, U, Vec<O>> {
        let mut acc = Vec::with_capacity(self.parsers.len());
        let mut consumed_any = false;
        for p in &self.parsers {
            match p.parse(state, memo) {
                Outcome::EmptyOk(v, s2, m2) => {
                    acc.push(v);
                    state = s2;
                    memo = m2;
                }
                Outcome::ConsumedOk(v, s2, m2) => {
                    acc.push(v);
                    state = s2;
                    memo = m2;
                    consumed_any = true;
                }
                Outcome::EmptyErr(e, s2, m2) => {
                    return Step::Done(if consumed_any {
                        Outcome::ConsumedErr(e, s2, m2)
                    } else {
                        Outcome::EmptyErr(e, s2, m2)
                    });
                }
                Outcome::ConsumedErr(e, s2, m2) => return Step::Done(Outcome::ConsumedErr(e, s2, m2)),
            }
        }
        Step::Done(if consumed_any {
            Outcome::ConsumedOk(acc, state, memo)
        } else {
            Outcome::EmptyOk(acc, state, memo)
        })
    }
}

/// A pass-through adapter: forces `p`'s (already eager, in this port) result. Kept for parity with
/// the specification's public surface — every combinator here already returns a fully
/// materialized `Vec`, so there is nothing left to force.
#[derive(Clone)]
pub struct Eager<P>(P);

/// Builds [`Eager`].
pub fn eager<P>(p: P) -> Eager<P> {
    Eager(p)
}

impl<S, U, P, T> Parser<S, U> for Eager<P>
where
    S: Stream,
    P: Parser<S, U, Output = Vec<T>>,
{
    type Output = Vec<T>;

    fn step(&self, state: ParserState<S, U>, memo: Memo<S, U>) -> Step<S, U, Vec<T>> {
        self.0.step(state, memo)
    }
}

fn finish<S: Stream, U, O>(consumed_any: bool, acc: Vec<O>, state: ParserState<S, U>, memo: Memo<S, U>) -> Outcome<S, U, Vec<O>> {
    if consumed_any {
        Outcome::ConsumedOk(acc, state, memo)
    } else {
        Outcome::EmptyOk(acc, state, memo)
    }
}

/// Zero-or-more repetition of `p`.
///
/// Implemented as a single `loop` within one `step` call — not recursion — so parsing a
/// repetition far longer than the host stack costs O(1) additional Rust stack frames, which is
/// the whole reason the specification calls for a trampolined interpreter in the first place.
///
/// # Panics
///
/// Panics (the fatal `ParserError` grammar-defect condition) if `p` ever succeeds *without*
/// consuming input — otherwise `many` would loop forever. This mirrors the specification's
/// `safeP`/`ParserError` guard exactly.
#[derive(Clone)]
pub struct Many<P> {
    p: P,
}

/// Builds [`Many`].
pub fn many<P>(p: P) -> Many<P> {
    Many { p }
}

impl<S, U, P> Parser<S, U> for Many<P>
where
    S: Stream,
    U: Clone,
    P: Parser<S, U>,
{
    type Output = Vec<P::Output>;

    fn step(&self, mut state: ParserState<S, U>, mut memo: Memo<S, U>) -> Step<S, U, Vec<P::Output>> {
        let mut acc = Vec::new();
        let mut consumed_any = false;
        loop {
            match self.p.parse(state.clone(), memo.clone()) {
                Outcome::EmptyOk(..) => {
                    panic!(
                        "{}",
                        ParserError::new(
                            "many: parser applied to a parser that accepts an empty string"
                        )
                    );
                }
                Outcome::EmptyErr(_e, s2, m2) => {
                    return Step::Done(finish(consumed_any, acc, s2, m2));
                }
                Outcome::ConsumedOk(v, s2, m2) => {
                    acc.push(v);
                    state = s2;
                    memo = m2;
                    consumed_any = true;
                }
                Outcome::ConsumedErr(e, s2, m2) => {
                    return Step::Done(Outcome::ConsumedErr(e, s2, m2));
                }
            }
        }
    }
}

/// One-or-more repetition of `p`: `cons(p, many(p))`.
pub fn many1<P: Clone>(p: P) -> Cons<P, Many<P>> {
    cons(p.clone(), many(p))
}
