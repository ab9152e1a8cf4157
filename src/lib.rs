//! `cascade` is a combinator-style, backtracking-controlled parsing engine: composable parsers
//! over a generic input stream, built from a small set of primitives (`always`, `never`, `bind`,
//! `either`, `attempt`, `lookahead`, `token`, `many`) and run through a trampolined interpreter so
//! that deep repetition costs constant Rust stack rather than growing it one frame per element.
//!
//! The four-way [`engine::Outcome`] protocol (consumed/empty crossed with ok/err) gives every
//! combinator Parsec-style commitment semantics: a parser that consumes input and then fails is
//! not silently retried as an alternative unless it is explicitly wrapped in
//! [`combinator::attempt`].
//!
//! ## Example
//!
//! ```rust
//! use cascade::prelude::*;
//! use cascade::text::{character, digit};
//! use cascade::combinator::many1;
//!
//! let digits = many1(digit::<cascade::stream::VecStream<char>, ()>());
//! let input = cascade::stream::VecStream::from("123abc");
//! let value: Vec<char> = cascade::runner::run(&digits, input);
//! assert_eq!(value, vec!['1', '2', '3']);
//!
//! let open = character::<cascade::stream::VecStream<char>, ()>('(');
//! assert!(cascade::runner::test(&open, cascade::stream::VecStream::from("(x")));
//! ```

#![warn(missing_docs)]

pub mod combinator;
pub mod derived;
pub mod engine;
pub mod error;
pub mod memo;
pub mod rec;
pub mod runner;
pub mod state;
pub mod stream;
pub mod text;
pub mod trace;

/// Commonly needed names, for glob import: `use cascade::prelude::*;`.
pub mod prelude {
    pub use crate::engine::Parser;
    pub use crate::error::{ParseError, ParserError};
    pub use crate::runner::{perform, run, run_many, run_state, test, test_state};
    pub use crate::stream::Stream;
}
