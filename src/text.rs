//! Token and text helpers (C12): a small set of everyday parsers built purely from [`token`],
//! [`crate::combinator::cons`], and [`crate::combinator::sequence`] — no new primitive behavior,
//! just convenient names for common character classes and literal matching over `char` streams.

use std::rc::Rc;

use crate::combinator::{always, bind, sequence, token};
use crate::engine::Parser;
use crate::error::ParseError;
use crate::stream::Stream;

/// Matches any single token, whatever it is.
pub fn any_token<S, U>() -> impl Parser<S, U, Output = S::Token> + Clone
where
    S: Stream,
    U: Clone,
{
    token::<S, _, _>(|_| true, |pos, _found| ParseError::Unknown(pos))
}

/// Matches exactly `expected`.
pub fn character<S, U>(expected: char) -> impl Parser<S, U, Output = char> + Clone
where
    S: Stream<Token = char>,
    U: Clone,
{
    token::<S, _, _>(
        move |c: &char| *c == expected,
        move |pos, found| {
            ParseError::Expect(pos, expected.to_string(), found.map(|c| c.to_string()))
        },
    )
}

/// Matches the literal `expected` one character at a time, returning it as an owned `String` on
/// success. Fails (without having committed past the first mismatching character's position)
/// partway through if the input diverges — like any [`sequence`] of failable steps, once any
/// character has been consumed the whole match is committed (`ConsumedErr`, not recoverable by
/// plain [`crate::combinator::either`] without [`crate::combinator::attempt`]).
pub fn string<S, U>(expected: &str) -> impl Parser<S, U, Output = String> + Clone
where
    S: Stream<Token = char> + 'static,
    U: Clone + 'static,
{
    let chars: Vec<Rc<dyn Parser<S, U, Output = char>>> = expected
        .chars()
        .map(|c| Rc::new(character(c)) as Rc<dyn Parser<S, U, Output = char>>)
        .collect();
    bind(sequence(chars), |cs: Vec<char>| {
        always(cs.into_iter().collect::<String>())
    })
}

/// Matches any ASCII or Unicode alphabetic character.
pub fn letter<S, U>() -> impl Parser<S, U, Output = char> + Clone
where
    S: Stream<Token = char>,
    U: Clone,
{
    token::<S, _, _>(
        |c: &char| c.is_alphabetic(),
        |pos, found| ParseError::Expect(pos, "a letter".into(), found.map(|c| c.to_string())),
    )
}

/// Matches any decimal digit.
pub fn digit<S, U>() -> impl Parser<S, U, Output = char> + Clone
where
    S: Stream<Token = char>,
    U: Clone,
{
    token::<S, _, _>(
        |c: &char| c.is_ascii_digit(),
        |pos, found| ParseError::Expect(pos, "a digit".into(), found.map(|c| c.to_string())),
    )
}

/// Matches any whitespace character.
pub fn space<S, U>() -> impl Parser<S, U, Output = char> + Clone
where
    S: Stream<Token = char>,
    U: Clone,
{
    token::<S, _, _>(
        |c: &char| c.is_whitespace(),
        |pos, found| ParseError::Expect(pos, "whitespace".into(), found.map(|c| c.to_string())),
    )
}
