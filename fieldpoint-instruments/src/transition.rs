//! The shared gate sequence every signed operation runs through.
//!
//! One attempt moves Pending -> Authorized -> Committed, or Pending ->
//! Rejected on the first failed gate. Gates run in a fixed order: mode
//! guard, signature, state application, commitment check. Because the
//! runner consumes `&S` and returns a fresh successor state, a rejection at
//! any gate leaves the caller's state byte-identical to what it was before
//! the attempt.

use fieldpoint_common::{Digest, PublicIdentity, SignatureBytes};
use serde::{Deserialize, Serialize};

use crate::commitment::{entry_digest, expected_commitment, CanonicalState, RemainderOutput};
use crate::context::{OpKind, Operand, TransitionContext};
use crate::error::TransitionError;

/// A spender's transition request: the authorization signature, the
/// commitment declared for the successor outputs, and the optional
/// remainder output included in that commitment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRequest {
    pub signature: SignatureBytes,
    pub declared_commitment: Digest,
    pub remainder: Option<RemainderOutput>,
}

/// Operation-specific inputs to the gate runner.
pub(crate) struct OpGate<'a> {
    /// Identity whose signature authorizes this operation class.
    pub required: &'a PublicIdentity,
    /// Result of the operation's mode guard.
    pub mode_ok: bool,
    pub op: OpKind,
    pub operand: Operand,
}

/// Run one transition attempt.
///
/// `apply` is the pure state application; it may return auxiliary data `T`
/// (the digital instrument returns its deferred settlement through it).
pub(crate) fn run_signed<S, T, F>(
    entry_value: u64,
    state: &S,
    gate: OpGate<'_>,
    request: &TransitionRequest,
    apply: F,
) -> Result<(S, T), TransitionError>
where
    S: CanonicalState,
    F: FnOnce(&S) -> (S, T),
{
    if !gate.mode_ok {
        return Err(TransitionError::ModeViolation);
    }

    let context = TransitionContext::new(
        entry_digest(entry_value, state),
        gate.op,
        gate.operand,
        request.declared_commitment,
    );
    if !gate
        .required
        .verify(context.digest().as_bytes(), &request.signature)
    {
        return Err(TransitionError::AuthorizationFailure);
    }

    let (next, extra) = apply(state);

    let expected = expected_commitment(entry_value, &next, request.remainder.as_ref());
    if expected != request.declared_commitment {
        return Err(TransitionError::CommitmentMismatch {
            expected,
            declared: request.declared_commitment,
        });
    }

    Ok((next, extra))
}
