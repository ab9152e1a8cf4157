//! State-keyed memoization, threaded through the parse as part of the state rather than a side
//! table.
//!
//! A [`Memo`] is a singly-linked chain of [`MemoCell`]s, most-recently-added first. Lookup scans
//! the chain for a `(parser id, position)` key; insertion prepends a new cell. Because the chain
//! is itself an immutable, reference-counted value threaded alongside [`crate::state::ParserState`],
//! backtracking naturally discards or preserves memo entries depending on which `Memo` value a
//! combinator chooses to resume from — see [`crate::combinator::backtrack`] for the combinator
//! that exploits this by deliberately reverting to an earlier `Memo`.
//!
//! Different parsers memoized in the same parse produce different output types, so the stored
//! outcome is type-erased via [`std::any::Any`] and downcast back to the caller's concrete
//! `Outcome<S, U, O>` on lookup. [`ParserId`] equality plus [`crate::state::ParserState`] position
//! equality is the full key; a downcast mismatch would mean two different parsers collided on the
//! same id, which cannot happen since ids are only ever minted by [`ParserId::fresh`].

use std::any::Any;
use std::marker::PhantomData;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::engine::Outcome;
use crate::state::Position;
use crate::stream::Stream;

/// A stable identity for a parser value, required for memo keying.
///
/// Wrapping a parser (e.g. with [`crate::combinator::expected`]) produces a new id, so a wrapper
/// is never mistaken for its inner parser by the memo table — matching the data model's note on
/// `Parser` identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParserId(u64);

impl ParserId {
    /// Mints a fresh, globally-unique id.
    pub fn fresh() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        ParserId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

struct MemoCell<S: Stream, U> {
    id: ParserId,
    position: Position,
    outcome: Rc<dyn Any>,
    next: Option<Rc<MemoCell<S, U>>>,
    _marker: PhantomData<fn() -> (S, U)>,
}

/// The memo chain visible at a given point in the parse.
///
/// Empty initially (seeded by [`crate::run`] and friends); grows only through
/// [`Memo::insert`], which always returns a *new* `Memo` rather than mutating in place, so an
/// older `Memo` value remains valid to resume from even after a newer one has grown past it.
pub struct Memo<S: Stream, U> {
    head: Option<Rc<MemoCell<S, U>>>,
}

impl<S: Stream, U> Clone for Memo<S, U> {
    fn clone(&self) -> Self {
        Memo {
            head: self.head.clone(),
        }
    }
}

impl<S: Stream, U> Default for Memo<S, U> {
    fn default() -> Self {
        Memo { head: None }
    }
}

impl<S: Stream + 'static, U: 'static> Memo<S, U> {
    /// The empty memo chain.
    pub fn new() -> Self {
        Memo::default()
    }

    /// Scans the chain for a recorded outcome at `(id, position)`.
    ///
    /// Returns `None` on the first scan of a given key — it is up to the caller
    /// ([`crate::combinator::memo`]) to then run the parser for real and [`Memo::insert`] the
    /// result for next time.
    pub fn lookup<O: Clone + 'static>(&self, id: ParserId, position: Position) -> Option<Outcome<S, U, O>>
    where
        U: Clone,
    {
        let mut cursor = self.head.as_ref();
        while let Some(cell) = cursor {
            if cell.id == id && cell.position == position {
                return cell
                    .outcome
                    .downcast_ref::<Outcome<S, U, O>>()
                    .cloned();
            }
            cursor = cell.next.as_ref();
        }
        None
    }

    /// Prepends a new cell recording `outcome` for `(id, position)`, returning the grown chain.
    pub fn insert<O: Clone + 'static>(
        &self,
        id: ParserId,
        position: Position,
        outcome: Outcome<S, U, O>,
    ) -> Memo<S, U> {
        Memo {
            head: Some(Rc::new(MemoCell {
                id,
                position,
                outcome: Rc::new(outcome),
                next: self.head.clone(),
                _marker: PhantomData,
            })),
        }
    }

    /// Number of cells in the chain, for diagnostics/tests.
    pub fn len(&self) -> usize {
        let mut n = 0;
        let mut cursor = self.head.as_ref();
        while let Some(cell) = cursor {
            n += 1;
            cursor = cell.next.as_ref();
        }
        n
    }

    /// True iff no entries have been recorded.
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }
}
