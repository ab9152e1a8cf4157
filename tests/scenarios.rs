//! End-to-end scenarios exercising the public surface the way a grammar author would: building
//! parsers purely from the published combinators and driving them through the runner.

use std::rc::Rc;

use cascade::combinator::{always, attempt, choice, either, next, BoxedParser};
use cascade::derived::{sep_end_by, sep_end_by1};
use cascade::error::ParseError;
use cascade::prelude::*;
use cascade::stream::VecStream;
use cascade::text::{character, string};

type CharStream = VecStream<char>;

fn boxed(c: char) -> BoxedParser<CharStream, (), char> {
    Rc::new(character::<CharStream, ()>(c))
}

/// S1: `choice(character('a'), character('b'), character('c'))` over `"bac"` picks `'b'`.
#[test]
fn s1_choice_picks_the_first_alternative_that_matches() {
    let alts: Vec<BoxedParser<CharStream, (), char>> = vec![boxed('a'), boxed('b'), boxed('c')];
    let value: char = run(&choice(alts), VecStream::from("bac"));
    assert_eq!(value, 'b');
}

/// S2: `choice()` with no alternatives raises at construction, not at parse time.
#[test]
#[should_panic]
fn s2_choice_with_no_alternatives_panics_at_construction() {
    let empty: Vec<BoxedParser<CharStream, (), char>> = Vec::new();
    let _ = choice(empty);
}

/// S3: `sepEndBy(sep, a)` over `"a,a,"` yields `['a', 'a']`.
#[test]
fn s3_sep_end_by_collects_values_with_optional_trailing_separator() {
    let a = boxed('a');
    let sep = boxed(',');
    let value: Vec<char> = run(&sep_end_by(a, sep), VecStream::from("a,a,"));
    assert_eq!(value, vec!['a', 'a']);
}

/// S4: after `sepEndBy(sep, a)` consumes `"a,a,"`, a following `character('z')` still matches.
#[test]
fn s4_next_runs_the_trailing_parser_after_sep_end_by() {
    let a = boxed('a');
    let sep = boxed(',');
    let p = next(sep_end_by(a, sep), character::<CharStream, ()>('z'));
    let value: char = run(&p, VecStream::from("a,a,z"));
    assert_eq!(value, 'z');
}

/// S5: `sepEndBy1(sep, a)` over `""` requires at least one `a` and fails.
#[test]
fn s5_sep_end_by1_fails_on_empty_input() {
    let a = boxed('a');
    let sep = boxed(',');
    assert!(!test(&sep_end_by1(a, sep), VecStream::from("")));
}

/// S6: `either(attempt(next(a, b)), next(a, c))` over `"ac"` backtracks past the failed `b` branch
/// and matches `'c'` via the second alternative, because `attempt` resets the position that
/// `next(a, b)` had already consumed past.
#[test]
fn s6_attempt_lets_either_retry_after_a_consumed_failure() {
    let branch1 = attempt(next(
        character::<CharStream, ()>('a'),
        character::<CharStream, ()>('b'),
    ));
    let branch2 = next(
        character::<CharStream, ()>('a'),
        character::<CharStream, ()>('c'),
    );
    let value: char = run(&either(branch1, branch2), VecStream::from("ac"));
    assert_eq!(value, 'c');
}

/// S7: `choice(string("a"), string("aa"), string("aaa"))` over `"aaaa"` commits to the leftmost
/// alternative, `"a"`, even though a longer alternative would also have matched.
#[test]
fn s7_choice_commits_to_the_leftmost_match_over_longer_alternatives() {
    let alts: Vec<BoxedParser<CharStream, (), String>> = vec![
        Rc::new(string::<CharStream, ()>("a")),
        Rc::new(string::<CharStream, ()>("aa")),
        Rc::new(string::<CharStream, ()>("aaa")),
    ];
    let value: String = run(&choice(alts), VecStream::from("aaaa"));
    assert_eq!(value, "a");
}

/// Invariant 1: `run(always(x), s) = x` for any input.
#[test]
fn invariant_always_returns_its_value_regardless_of_input() {
    assert_eq!(run(&always::<i32>(42), VecStream::from("")), 42);
    assert_eq!(run(&always::<i32>(42), VecStream::from("xyz")), 42);
}

/// Invariant 2: `run(never(e), s)` surfaces the error `e`.
#[test]
fn invariant_never_surfaces_its_error() {
    let err = ParseError::Unexpect(cascade::state::Position::start(), "boom".into());
    let result = run_state(
        &cascade::combinator::never::<i32>(err.clone()),
        VecStream::from("x"),
        (),
    );
    assert_eq!(result.unwrap_err(), err);
}

/// Invariant 5/6: `either` is left- and right-biased toward whichever side actually succeeds.
#[test]
fn invariant_either_prefers_whichever_side_succeeds() {
    let err = ParseError::Unexpect(cascade::state::Position::start(), "no".into());
    let left_wins = either(always::<i32>(1), cascade::combinator::never::<i32>(err.clone()));
    assert_eq!(run(&left_wins, VecStream::from("")), 1);
    let right_wins = either(cascade::combinator::never::<i32>(err), always::<i32>(2));
    assert_eq!(run(&right_wins, VecStream::from("")), 2);
}

/// Invariant 7: after `attempt(p)` fails, `either(attempt(p), q)` runs `q` at the position before
/// `p` started, no matter how far `p` had advanced.
#[test]
fn invariant_attempt_restores_position_before_trying_the_alternative() {
    let p = next(
        character::<CharStream, ()>('a'),
        character::<CharStream, ()>('b'),
    );
    let q = character::<CharStream, ()>('a');
    let value: char = run(&either(attempt(p), q), VecStream::from("ax"));
    assert_eq!(value, 'a');
}
