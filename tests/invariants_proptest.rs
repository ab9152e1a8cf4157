//! Property-based checks of invariants 3, 4, 8, and 9 from the engine's testable-properties list,
//! run over randomly generated inputs rather than the single hand-picked example each unit test
//! already covers.

use proptest::prelude::*;

use cascade::combinator::{always, bind, many, memo, token};
use cascade::error::ParseError;
use cascade::prelude::*;
use cascade::stream::VecStream;

type CharStream = VecStream<char>;

fn digit() -> impl Parser<CharStream, (), Output = char> + Clone {
    token::<CharStream, _, _>(
        |c: &char| c.is_ascii_digit(),
        |pos, found| ParseError::Expect(pos, "digit".into(), found.map(|c| c.to_string())),
    )
}

fn ascii_input() -> impl Strategy<Value = String> {
    "[a-z0-9]{0,12}"
}

proptest! {
    /// Invariant 3: `bind(p, always)` is observationally the same as `p` (right identity).
    #[test]
    fn invariant_bind_right_identity(s in ascii_input()) {
        let input = VecStream::from(s.as_str());
        let direct = run_state(&digit(), input.clone(), ());
        let rebound = run_state(&bind(digit(), always), input, ());
        prop_assert_eq!(direct, rebound);
    }

    /// Invariant 4: `bind(always(x), f)` is observationally the same as `f(x)` (left identity).
    #[test]
    fn invariant_bind_left_identity(x in any::<i32>(), s in ascii_input()) {
        let input = VecStream::from(s.as_str());
        let f = |v: i32| always(v * 2);
        let direct = run_state(&f(x), input.clone(), ());
        let bound = run_state(&bind::<CharStream, (), _, _, _>(always(x), f), input, ());
        prop_assert_eq!(direct, bound);
    }

    /// Invariant 8: `memo(p)` is observationally equal to `p` for a pure parser `p`.
    #[test]
    fn invariant_memo_is_observationally_transparent(s in ascii_input()) {
        let input = VecStream::from(s.as_str());
        let direct = run_state(&digit(), input.clone(), ());
        let memoized = run_state(&memo(digit()), input, ());
        prop_assert_eq!(direct, memoized);
    }

    /// Invariant 9: `many(p)` terminates and its length matches the run of leading matches, for
    /// any `p` that only ever succeeds by consuming (a token parser never succeeds empty).
    #[test]
    fn invariant_many_terminates_and_counts_the_leading_run(s in ascii_input()) {
        let expected_len = s.chars().take_while(|c| c.is_ascii_digit()).count();
        let input = VecStream::from(s.as_str());
        let value: Vec<char> = run(&many(digit()), input);
        prop_assert_eq!(value.len(), expected_len);
    }
}
