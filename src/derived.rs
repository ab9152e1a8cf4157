//! Derived grammar combinators (C13): `between`, `times`, the `sep_by`/`end_by` family, and
//! `chainl`/`chainr`. These compose the primitive combinators (C7) and the engine's
//! [`Outcome`]/[`Step`] protocol (C5/C6) directly rather than introducing any new parsing
//! primitive — `sep_end_by1` and the `chainl`/`chainr` pair are written as single-`step` loops for
//! the same reason [`crate::combinator::many`] is: the repetition they describe is data-driven, so
//! a flat loop keeps it O(1) in additional Rust stack instead of O(n).

use std::rc::Rc;

use crate::combinator::{always, bind, cons, either, many, optional, sequence, BoxedParser};
use crate::engine::{Outcome, Parser, Step};
use crate::memo::Memo;
use crate::state::ParserState;
use crate::stream::Stream;

/// Runs `open`, then `p`, then `close`, keeping only `p`'s value.
pub fn between<S, U, O, A, C>(
    open: BoxedParser<S, U, A>,
    p: BoxedParser<S, U, O>,
    close: BoxedParser<S, U, C>,
) -> impl Parser<S, U, Output = O>
where
    S: Stream,
    U: Clone,
    O: Clone + 'static,
    A: 'static,
    C: 'static,
{
    bind(open, move |_| {
        let p = Rc::clone(&p);
        let close = Rc::clone(&close);
        bind(p, move |v: O| {
            let v2 = v.clone();
            bind(Rc::clone(&close), move |_| always(v2.clone()))
        })
    })
}

/// Runs `p` exactly `n` times, collecting the results in order.
pub fn times<S, U, O>(n: usize, p: BoxedParser<S, U, O>) -> impl Parser<S, U, Output = Vec<O>>
where
    S: Stream,
    U: Clone,
{
    sequence((0..n).map(|_| Rc::clone(&p)).collect())
}

/// One or more `p`, separated by `sep`; `sep`'s value is discarded.
pub fn sep_by1<S, U, O, Osep>(
    p: BoxedParser<S, U, O>,
    sep: BoxedParser<S, U, Osep>,
) -> impl Parser<S, U, Output = Vec<O>>
where
    S: Stream,
    U: Clone,
    O: Clone + 'static,
    Osep: 'static,
{
    let p_rest = Rc::clone(&p);
    let sep_rest = Rc::clone(&sep);
    bind(p, move |first: O| {
        let tail_item = {
            let p_rest = Rc::clone(&p_rest);
            bind(Rc::clone(&sep_rest), move |_| bind(Rc::clone(&p_rest), |v: O| always(v)))
        };
        bind(many(tail_item), move |tail: Vec<O>| {
            let mut v = Vec::with_capacity(tail.len() + 1);
            v.push(first.clone());
            v.extend(tail);
            always(v)
        })
    })
}

/// Zero or more `p`, separated by `sep`.
pub fn sep_by<S, U, O, Osep>(
    p: BoxedParser<S, U, O>,
    sep: BoxedParser<S, U, Osep>,
) -> impl Parser<S, U, Output = Vec<O>>
where
    S: Stream,
    U: Clone,
    O: Clone + 'static,
    Osep: 'static,
{
    optional(Vec::new(), sep_by1(p, sep))
}

fn terminated_item<S, U, O, Osep>(
    p: BoxedParser<S, U, O>,
    sep: BoxedParser<S, U, Osep>,
) -> impl Parser<S, U, Output = O>
where
    S: Stream,
    U: Clone,
    O: Clone + 'static,
    Osep: 'static,
{
    bind(p, move |v: O| {
        let v2 = v.clone();
        bind(Rc::clone(&sep), move |_| always(v2.clone()))
    })
}

/// One or more occurrences of `p`, each immediately followed by `sep`.
pub fn end_by1<S, U, O, Osep>(
    p: BoxedParser<S, U, O>,
    sep: BoxedParser<S, U, Osep>,
) -> impl Parser<S, U, Output = Vec<O>>
where
    S: Stream,
    U: Clone,
    O: Clone + 'static,
    Osep: 'static,
{
    cons(
        terminated_item(Rc::clone(&p), Rc::clone(&sep)),
        many(terminated_item(p, sep)),
    )
}

/// Zero or more occurrences of `p`, each immediately followed by `sep`.
pub fn end_by<S, U, O, Osep>(
    p: BoxedParser<S, U, O>,
    sep: BoxedParser<S, U, Osep>,
) -> impl Parser<S, U, Output = Vec<O>>
where
    S: Stream,
    U: Clone,
    O: Clone + 'static,
    Osep: 'static,
{
    optional(Vec::new(), end_by1(p, sep))
}

/// One or more `p`, separated by `sep`, with an optional trailing `sep`.
///
/// Written as a dedicated loop (mirroring [`crate::combinator::Many`]) rather than the textbook
/// mutually-recursive definition, since the latter would need its own fixed point (see
/// [`crate::rec::rec`]) for no benefit here — the repetition is still plain data-driven looping.
#[derive(Clone)]
pub struct SepEndBy1<P, Sep> {
    p: P,
    sep: Sep,
}

impl<S, U, O, Osep, P, Sep> Parser<S, U> for SepEndBy1<P, Sep>
where
    S: Stream,
    U: Clone,
    P: Parser<S, U, Output = O>,
    Sep: Parser<S, U, Output = Osep>,
{
    type Output = Vec<O>;

    fn step(&self, state: ParserState<S, U>, memo: Memo<S, U>) -> Step<S, U, Vec<O>> {
        let mut acc = Vec::new();
        let (mut state, mut memo, mut consumed_any) = match self.p.parse(state, memo) {
            Outcome::EmptyErr(e, s, m) => return Step::Done(Outcome::EmptyErr(e, s, m)),
            Outcome::ConsumedErr(e, s, m) => return Step::Done(Outcome::ConsumedErr(e, s, m)),
            Outcome::EmptyOk(v, s, m) => {
                acc.push(v);
                (s, m, false)
            }
            Outcome::ConsumedOk(v, s, m) => {
                acc.push(v);
                (s, m, true)
            }
        };
        loop {
            match self.sep.parse(state.clone(), memo.clone()) {
                Outcome::EmptyErr(_, s2, m2) => {
                    return Step::Done(if consumed_any {
                        Outcome::ConsumedOk(acc, s2, m2)
                    } else {
                        Outcome::EmptyOk(acc, s2, m2)
                    });
                }
                Outcome::ConsumedErr(e, s2, m2) => return Step::Done(Outcome::ConsumedErr(e, s2, m2)),
                Outcome::EmptyOk(_, s2, m2) | Outcome::ConsumedOk(_, s2, m2) => {
                    consumed_any = true;
                    match self.p.parse(s2, m2) {
                        Outcome::EmptyOk(v, s3, m3) | Outcome::ConsumedOk(v, s3, m3) => {
                            acc.push(v);
                            state = s3;
                            memo = m3;
                        }
                        Outcome::EmptyErr(_, s3, m3) => {
                            // The separator just consumed, so `p` failing empty here means the
                            // separator was trailing, not a mid-list mismatch.
                            return Step::Done(if consumed_any {
                                Outcome::ConsumedOk(acc, s3, m3)
                            } else {
                                Outcome::EmptyOk(acc, s3, m3)
                            });
                        }
                        Outcome::ConsumedErr(e, s3, m3) => {
                            return Step::Done(Outcome::ConsumedErr(e, s3, m3));
                        }
                    }
                }
            }
        }
    }
}

/// Builds [`SepEndBy1`].
pub fn sep_end_by1<P, Sep>(p: P, sep: Sep) -> SepEndBy1<P, Sep> {
    SepEndBy1 { p, sep }
}

/// Zero or more `p`, separated by `sep`, with an optional trailing `sep`.
pub fn sep_end_by<S, U, O, Osep, P, Sep>(p: P, sep: Sep) -> impl Parser<S, U, Output = Vec<O>>
where
    S: Stream,
    U: Clone,
    O: Clone + 'static,
    P: Parser<S, U, Output = O> + 'static,
    Sep: Parser<S, U, Output = Osep> + 'static,
{
    optional(Vec::new(), sep_end_by1(p, sep))
}

/// Left-associative chain: `p (op p)*`, folding `op`'s function left over the matched values.
///
/// Mirrors [`crate::combinator::Many`]'s single-`step` loop for the same stack-bounding reason.
#[derive(Clone)]
pub struct ChainL1<P, OpP> {
    p: P,
    op: OpP,
}

impl<S, U, O, F, P, OpP> Parser<S, U> for ChainL1<P, OpP>
where
    S: Stream,
    U: Clone,
    O: Clone,
    F: Fn(O, O) -> O,
    P: Parser<S, U, Output = O>,
    OpP: Parser<S, U, Output = F>,
{
    type Output = O;

    fn step(&self, state: ParserState<S, U>, memo: Memo<S, U>) -> Step<S, U, O> {
        let (mut acc, mut state, mut memo, mut consumed_any) = match self.p.parse(state, memo) {
            Outcome::EmptyErr(e, s, m) => return Step::Done(Outcome::EmptyErr(e, s, m)),
            Outcome::ConsumedErr(e, s, m) => return Step::Done(Outcome::ConsumedErr(e, s, m)),
            Outcome::EmptyOk(v, s, m) => (v, s, m, false),
            Outcome::ConsumedOk(v, s, m) => (v, s, m, true),
        };
        loop {
            match self.op.parse(state.clone(), memo.clone()) {
                Outcome::EmptyErr(_, s2, m2) => {
                    return Step::Done(if consumed_any {
                        Outcome::ConsumedOk(acc, s2, m2)
                    } else {
                        Outcome::EmptyOk(acc, s2, m2)
                    });
                }
                Outcome::ConsumedErr(e, s2, m2) => return Step::Done(Outcome::ConsumedErr(e, s2, m2)),
                Outcome::EmptyOk(f, s2, m2) | Outcome::ConsumedOk(f, s2, m2) => {
                    consumed_any = true;
                    match self.p.parse(s2, m2) {
                        Outcome::EmptyOk(rhs, s3, m3) | Outcome::ConsumedOk(rhs, s3, m3) => {
                            acc = f(acc, rhs);
                            state = s3;
                            memo = m3;
                        }
                        Outcome::EmptyErr(e, s3, m3) | Outcome::ConsumedErr(e, s3, m3) => {
                            return Step::Done(Outcome::ConsumedErr(e, s3, m3));
                        }
                    }
                }
            }
        }
    }
}

/// Builds [`ChainL1`].
pub fn chainl1<P, OpP>(p: P, op: OpP) -> ChainL1<P, OpP> {
    ChainL1 { p, op }
}

/// [`chainl1`], or `default` (without consuming) if there are zero occurrences of `p`.
pub fn chainl<S, U, O, F, P, OpP>(p: P, op: OpP, default: O) -> impl Parser<S, U, Output = O>
where
    S: Stream,
    U: Clone,
    O: Clone,
    F: Fn(O, O) -> O,
    P: Parser<S, U, Output = O>,
    OpP: Parser<S, U, Output = F>,
{
    either(chainl1(p, op), always(default))
}

/// Right-associative chain: `p (op p)*`, folding `op`'s function right over the matched values.
///
/// Collects every matched `(op, value)` pair with a flat loop, then folds from the right —
/// avoiding the mutually-recursive textbook definition's need for a fixed point, while still
/// producing right-associative grouping.
#[derive(Clone)]
pub struct ChainR1<P, OpP> {
    p: P,
    op: OpP,
}

impl<S, U, O, F, P, OpP> Parser<S, U> for ChainR1<P, OpP>
where
    S: Stream,
    U: Clone,
    O: Clone,
    F: Fn(O, O) -> O,
    P: Parser<S, U, Output = O>,
    OpP: Parser<S, U, Output = F>,
{
    type Output = O;

    fn step(&self, state: ParserState<S, U>, memo: Memo<S, U>) -> Step<S, U, O> {
        let (first, mut state, mut memo, mut consumed_any) = match self.p.parse(state, memo) {
            Outcome::EmptyErr(e, s, m) => return Step::Done(Outcome::EmptyErr(e, s, m)),
            Outcome::ConsumedErr(e, s, m) => return Step::Done(Outcome::ConsumedErr(e, s, m)),
            Outcome::EmptyOk(v, s, m) => (v, s, m, false),
            Outcome::ConsumedOk(v, s, m) => (v, s, m, true),
        };
        let mut values = vec![first];
        let mut ops: Vec<F> = Vec::new();
        loop {
            match self.op.parse(state.clone(), memo.clone()) {
                Outcome::EmptyErr(_, s2, m2) => {
                    state = s2;
                    memo = m2;
                    break;
                }
                Outcome::ConsumedErr(e, s2, m2) => return Step::Done(Outcome::ConsumedErr(e, s2, m2)),
                Outcome::EmptyOk(f, s2, m2) | Outcome::ConsumedOk(f, s2, m2) => {
                    consumed_any = true;
                    match self.p.parse(s2, m2) {
                        Outcome::EmptyOk(v, s3, m3) | Outcome::ConsumedOk(v, s3, m3) => {
                            ops.push(f);
                            values.push(v);
                            state = s3;
                            memo = m3;
                        }
                        Outcome::EmptyErr(e, s3, m3) | Outcome::ConsumedErr(e, s3, m3) => {
                            return Step::Done(Outcome::ConsumedErr(e, s3, m3));
                        }
                    }
                }
            }
        }
        let mut acc = values.pop().expect("at least one value was parsed");
        while let (Some(f), Some(v)) = (ops.pop(), values.pop()) {
            acc = f(v, acc);
        }
        Step::Done(if consumed_any {
            Outcome::ConsumedOk(acc, state, memo)
        } else {
            Outcome::EmptyOk(acc, state, memo)
        })
    }
}

/// Builds [`ChainR1`].
pub fn chainr1<P, OpP>(p: P, op: OpP) -> ChainR1<P, OpP> {
    ChainR1 { p, op }
}

/// [`chainr1`], or `default` (without consuming) if there are zero occurrences of `p`.
pub fn chainr<S, U, O, F, P, OpP>(p: P, op: OpP, default: O) -> impl Parser<S, U, Output = O>
where
    S: Stream,
    U: Clone,
    O: Clone,
    F: Fn(O, O) -> O,
    P: Parser<S, U, Output = O>,
    OpP: Parser<S, U, Output = F>,
{
    either(chainr1(p, op), always(default))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combinator::token;
    use crate::error::ParseError;
    use crate::stream::VecStream;

    fn state(s: &str) -> ParserState<VecStream<char>, ()> {
        ParserState::new(VecStream::from(s), ())
    }

    fn ch(c: char) -> impl Parser<VecStream<char>, (), Output = char> + Clone {
        #[derive(Clone)]
        struct Ch(char);
        impl Parser<VecStream<char>, ()> for Ch {
            type Output = char;
            fn step(
                &self,
                state: ParserState<VecStream<char>, ()>,
                memo: Memo<VecStream<char>, ()>,
            ) -> Step<VecStream<char>, (), char> {
                let expected = self.0;
                token::<VecStream<char>, _, _>(move |t: &char| *t == expected, move |p, f| {
                    ParseError::Expect(p, expected.to_string(), f.map(|c| c.to_string()))
                })
                .step(state, memo)
            }
        }
        Ch(c)
    }

    fn boxed(c: char) -> BoxedParser<VecStream<char>, (), char> {
        Rc::new(ch(c))
    }

    #[test]
    fn between_keeps_inner_value() {
        let p = between(boxed('('), boxed('a'), boxed(')'));
        match p.parse(state("(a)"), Memo::new()).into_result() {
            Ok((v, s, _)) => {
                assert_eq!(v, 'a');
                assert_eq!(s.position().index(), 3);
            }
            Err(_) => panic!("expected match"),
        }
    }

    #[test]
    fn times_collects_exact_count() {
        let p = times(3, boxed('a'));
        match p.parse(state("aaab"), Memo::new()).into_result() {
            Ok((v, ..)) => assert_eq!(v, vec!['a', 'a', 'a']),
            Err(_) => panic!("expected match"),
        }
        assert!(!times(3, boxed('a')).parse(state("aab"), Memo::new()).is_ok());
    }

    #[test]
    fn sep_by1_requires_at_least_one() {
        assert!(!sep_by1(boxed('a'), boxed(','))
            .parse(state(""), Memo::new())
            .is_ok());
        match sep_by1(boxed('a'), boxed(','))
            .parse(state("a,a,a"), Memo::new())
            .into_result()
        {
            Ok((v, ..)) => assert_eq!(v, vec!['a', 'a', 'a']),
            Err(_) => panic!("expected match"),
        }
    }

    #[test]
    fn sep_by_allows_zero() {
        match sep_by(boxed('a'), boxed(','))
            .parse(state(""), Memo::new())
            .into_result()
        {
            Ok((v, ..)) => assert!(v.is_empty()),
            Err(_) => panic!("expected empty match"),
        }
    }

    #[test]
    fn end_by1_requires_trailing_separator() {
        match end_by1(boxed('a'), boxed(';'))
            .parse(state("a;a;"), Memo::new())
            .into_result()
        {
            Ok((v, ..)) => assert_eq!(v, vec!['a', 'a']),
            Err(_) => panic!("expected match"),
        }
        assert!(!end_by1(boxed('a'), boxed(';'))
            .parse(state("a;a"), Memo::new())
            .is_ok());
    }

    #[test]
    fn sep_end_by1_allows_optional_trailing_separator() {
        match sep_end_by1(boxed('a'), boxed(';'))
            .parse(state("a;a;a"), Memo::new())
            .into_result()
        {
            Ok((v, ..)) => assert_eq!(v, vec!['a', 'a', 'a']),
            Err(_) => panic!("expected match without trailing sep"),
        }
        match sep_end_by1(boxed('a'), boxed(';'))
            .parse(state("a;a;"), Memo::new())
            .into_result()
        {
            Ok((v, ..)) => assert_eq!(v, vec!['a', 'a']),
            Err(_) => panic!("expected match with trailing sep"),
        }
    }

    #[test]
    fn chainl1_is_left_associative() {
        let digit = token::<VecStream<char>, _, _>(
            |c: &char| c.is_ascii_digit(),
            |p, f| ParseError::Expect(p, "digit".into(), f.map(|c| c.to_string())),
        );
        let minus = bind(boxed('-'), |_| {
            always((|a: i64, b: i64| a - b) as fn(i64, i64) -> i64)
        });
        let num = bind::<VecStream<char>, (), _, _, _>(digit, |c: char| always(c.to_digit(10).unwrap() as i64));
        // "9-3-2" left-associated is (9-3)-2 = 4, right-associated would be 9-(3-2) = 8.
        match chainl1(num, minus).parse(state("9-3-2"), Memo::new()).into_result() {
            Ok((v, ..)) => assert_eq!(v, 4),
            Err(_) => panic!("expected match"),
        }
    }

    #[test]
    fn chainr1_is_right_associative() {
        let digit = token::<VecStream<char>, _, _>(
            |c: &char| c.is_ascii_digit(),
            |p, f| ParseError::Expect(p, "digit".into(), f.map(|c| c.to_string())),
        );
        let minus = bind(boxed('-'), |_| {
            always((|a: i64, b: i64| a - b) as fn(i64, i64) -> i64)
        });
        let num = bind::<VecStream<char>, (), _, _, _>(digit, |c: char| always(c.to_digit(10).unwrap() as i64));
        match chainr1(num, minus).parse(state("9-3-2"), Memo::new()).into_result() {
            Ok((v, ..)) => assert_eq!(v, 8),
            Err(_) => panic!("expected match"),
        }
    }
}
