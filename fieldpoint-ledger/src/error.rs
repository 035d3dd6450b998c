//! Error types for the ledger arena.

use fieldpoint_common::Digest;
use fieldpoint_instruments::TransitionError;
use thiserror::Error;

use crate::arena::PointId;

/// Failures surfaced by arena operations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LedgerError {
    /// No point is provisioned under this id.
    #[error("unknown point {0}")]
    UnknownPoint(PointId),

    /// The proposed previous-entry digest does not match the current head:
    /// the targeted entry was already spent or never existed.
    #[error("stale spend: proposed head {proposed} does not match current head {head}")]
    StaleSpend { proposed: Digest, head: Digest },

    /// The operation's operand does not match the instrument kind of the
    /// target point.
    #[error("operation does not match the instrument kind of the target point")]
    KindMismatch,

    /// The instrument state machine rejected the transition.
    #[error(transparent)]
    Transition(#[from] TransitionError),
}
