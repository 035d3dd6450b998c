// fieldpoint/fieldpoint-ledger/src/lib.rs
// Numan Thabit 2025

//! Ledger entries for instrument points, rendered as an arena of versioned
//! records.
//!
//! A real ledger destroys the spent entry and creates its successor in one
//! confirmation; here the same single-writer-wins semantics come from the
//! arena head check: a transition commits a new version iff the spender's
//! proposed previous-entry digest matches the current head digest. Two
//! conflicting attempts against the same head can never both pass; the
//! second sees a digest that no longer exists.
//!
//! The arena also owns the single debounce-settlement slot per digital
//! point: every committed transition replaces it, and [`PointArena::settle_due`]
//! applies a due settlement as a value-conserving version bump.

pub mod arena;
pub mod entry;
pub mod error;

pub use arena::{PointArena, PointId, TransitionOp, TransitionProposal};
pub use entry::{Entry, PointKind, PointState};
pub use error::LedgerError;
