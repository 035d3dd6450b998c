//! Error taxonomy for transition attempts.

use fieldpoint_common::Digest;
use thiserror::Error;

/// Terminal failures of a single transition attempt.
///
/// Every variant aborts the whole attempt with no partial mutation; the core
/// never retries. Retrying, if desired at all, is the caller's job with a
/// freshly constructed request against the current head.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TransitionError {
    /// Operation invoked while the instrument is in the wrong simulation
    /// mode (e.g. a field update while simulated).
    #[error("operation not permitted in the current simulation mode")]
    ModeViolation,

    /// Signature did not verify against the identity required for the
    /// operation.
    #[error("signature did not verify for the required identity")]
    AuthorizationFailure,

    /// The commitment the spender declared does not match the one recomputed
    /// from the applied state and conserved value.
    #[error("declared commitment {declared} does not match expected {expected}")]
    CommitmentMismatch {
        /// Commitment recomputed from the successor outputs.
        expected: Digest,
        /// Commitment the spending transaction declared.
        declared: Digest,
    },
}
