//! Commitment builder over a transition's successor outputs.
//!
//! The spender declares up front what the transition produces: the successor
//! entry (same conserved value, new state) plus an optional unallocated
//! remainder. The commitment is a deterministic digest over that output set,
//! so any observer can recompute it from the transition record alone without
//! re-running business logic. Both sides must therefore serialize state
//! identically; [`CanonicalState`] pins that encoding.

use fieldpoint_common::{put_u64, Digest, PublicIdentity};
use serde::{Deserialize, Serialize};

const ENTRY_DOMAIN: &str = "fieldpoint/entry/v1";
const OUTPUTS_DOMAIN: &str = "fieldpoint/outputs/v1";

/// Canonical byte encoding of an instrument state.
///
/// Implementations write a kind tag followed by every field in declaration
/// order, integers little-endian, booleans as one byte, identities as raw
/// 32 bytes. The encoding is append-only by construction: two distinct
/// states must never produce the same bytes.
pub trait CanonicalState {
    fn encode_canonical(&self, out: &mut Vec<u8>);
}

/// Optional remainder output accompanying a successor entry.
///
/// Carries whatever value the spending transaction does not re-anchor in the
/// entry itself, addressed to a recipient identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemainderOutput {
    pub value: u64,
    pub recipient: PublicIdentity,
}

fn entry_bytes<S: CanonicalState>(value: u64, state: &S) -> Vec<u8> {
    let mut out = Vec::with_capacity(128);
    put_u64(&mut out, value);
    state.encode_canonical(&mut out);
    out
}

/// Digest identifying one exact entry version: conserved value plus state.
pub fn entry_digest<S: CanonicalState>(value: u64, state: &S) -> Digest {
    Digest::compute(ENTRY_DOMAIN, &entry_bytes(value, state))
}

/// Commitment over the successor outputs of a transition.
///
/// Pure function: the same `(value, state, remainder)` triple always yields
/// the same digest.
pub fn expected_commitment<S: CanonicalState>(
    value: u64,
    state: &S,
    remainder: Option<&RemainderOutput>,
) -> Digest {
    let mut out = entry_bytes(value, state);
    match remainder {
        Some(remainder) => {
            out.push(0x01);
            put_u64(&mut out, remainder.value);
            out.extend_from_slice(remainder.recipient.as_bytes());
        }
        None => out.push(0x00),
    }
    Digest::compute(OUTPUTS_DOMAIN, &out)
}
