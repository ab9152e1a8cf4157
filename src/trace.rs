//! Diagnostics (C14): an optional, feature-gated tracing layer over [`Parser::step`], modeled on
//! the teacher library's own `trace` module — same idea (depth-indented enter/exit lines, colored
//! via `anstyle`, written through `anstream::stderr()`), scaled down to this engine's coarser unit
//! of work: one line per combinator invocation rather than a full aligned table, since there is no
//! byte-slice-shaped "remaining input" worth column-aligning here the way there is over `&[u8]`.
//!
//! With the `debug` feature disabled, [`trace`] and [`Traced`] still exist (so call sites don't
//! need `#[cfg]`), but compile down to a plain pass-through with no formatting, no atomics, and no
//! dependency on `anstream`/`anstyle`/`is_terminal_polyfill`.

/// Wraps `p`, logging each call to stderr when the `debug` feature is enabled; otherwise an
/// invisible pass-through.
pub struct Traced<P> {
    name: String,
    p: P,
}

/// Builds [`Traced`].
pub fn trace<P>(name: impl Into<String>, p: P) -> Traced<P> {
    Traced {
        name: name.into(),
        p,
    }
}

#[cfg(feature = "debug")]
mod enabled {
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::Traced;
    use crate::engine::{Outcome, Parser, Step};
    use crate::memo::Memo;
    use crate::state::ParserState;
    use crate::stream::Stream;

    static DEPTH: AtomicUsize = AtomicUsize::new(0);

    struct DepthGuard(usize);

    impl DepthGuard {
        fn enter() -> Self {
            DepthGuard(DEPTH.fetch_add(1, Ordering::SeqCst))
        }
    }

    impl Drop for DepthGuard {
        fn drop(&mut self) {
            DEPTH.fetch_sub(1, Ordering::SeqCst);
        }
    }

    fn outcome_label<S: Stream, U, O>(outcome: &Outcome<S, U, O>) -> (&'static str, anstyle::Style) {
        let green = anstyle::Style::new().fg_color(Some(anstyle::AnsiColor::Green.into()));
        let yellow = anstyle::Style::new().fg_color(Some(anstyle::AnsiColor::Yellow.into()));
        let red = anstyle::Style::new().fg_color(Some(anstyle::AnsiColor::Red.into()));
        match outcome {
            Outcome::ConsumedOk(..) => ("ConsumedOk", green),
            Outcome::EmptyOk(..) => ("EmptyOk", green),
            Outcome::EmptyErr(..) => ("EmptyErr", yellow),
            Outcome::ConsumedErr(..) => ("ConsumedErr", red),
        }
    }

    impl<S, U, P> Parser<S, U> for Traced<P>
    where
        S: Stream,
        P: Parser<S, U>,
    {
        type Output = P::Output;

        fn step(&self, state: ParserState<S, U>, memo: Memo<S, U>) -> Step<S, U, P::Output> {
            let depth = DepthGuard::enter();
            let gutter = anstyle::Style::new().bold();
            let pos = state.position();
            let writer = anstream::stderr();
            let mut writer = writer.lock();
            let _ = writeln!(
                writer,
                "{:depth$}> {name} {gutter}|{reset} at {pos}",
                "",
                depth = depth.0,
                name = self.name,
                gutter = gutter.render(),
                reset = gutter.render_reset(),
                pos = pos,
            );
            drop(writer);

            let outcome = self.p.parse(state, memo);
            let (label, style) = outcome_label(&outcome);
            let writer = anstream::stderr();
            let mut writer = writer.lock();
            let _ = writeln!(
                writer,
                "{:depth$}< {name} {gutter}|{reset} {style}{label}{reset}",
                "",
                depth = depth.0,
                name = self.name,
                gutter = gutter.render(),
                style = style.render(),
                reset = style.render_reset(),
            );
            drop(writer);
            drop(depth);

            Step::Done(outcome)
        }

        fn display_name(&self) -> &str {
            &self.name
        }
    }

    /// True if stderr looks like an interactive terminal — used by callers that want to decide
    /// whether to enable tracing at all rather than always emitting escape codes.
    pub fn stderr_is_terminal() -> bool {
        use is_terminal_polyfill::IsTerminal;
        std::io::stderr().is_terminal()
    }
}

#[cfg(feature = "debug")]
pub use enabled::stderr_is_terminal;

#[cfg(not(feature = "debug"))]
use crate::engine::{Parser, Step};
#[cfg(not(feature = "debug"))]
use crate::memo::Memo;
#[cfg(not(feature = "debug"))]
use crate::state::ParserState;
#[cfg(not(feature = "debug"))]
use crate::stream::Stream;

#[cfg(not(feature = "debug"))]
impl<S, U, P> Parser<S, U> for Traced<P>
where
    S: Stream,
    P: Parser<S, U>,
{
    type Output = P::Output;

    fn step(&self, state: ParserState<S, U>, memo: Memo<S, U>) -> Step<S, U, P::Output> {
        self.p.step(state, memo)
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

#[cfg(not(feature = "debug"))]
/// Always `false` without the `debug` feature: there is no tracing to gate.
pub fn stderr_is_terminal() -> bool {
    false
}
