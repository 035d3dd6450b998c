//! Transition context: the bytes a spender actually signs.
//!
//! A signature must authorize one specific spend, not the instrument in
//! general. The context therefore binds the digest of the exact entry being
//! consumed, the operation and its operand, and the commitment the spender
//! declares for the successor outputs. Replaying the signature against any
//! other entry version, operation, or output set changes the context digest
//! and the signature no longer verifies.

use fieldpoint_common::{put_bool, put_i64, Digest};
use serde::{Deserialize, Serialize};

const CONTEXT_DOMAIN: &str = "fieldpoint/context/v1";

/// The three signed operation classes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpKind {
    /// Device reports a new raw value.
    UpdateFieldValue,
    /// Engineer switches simulation mode on or off.
    SetSimulationMode,
    /// Engineer forces a simulated value.
    SimulateValue,
}

impl OpKind {
    /// Stable one-byte tag used in the canonical encoding.
    pub fn tag(self) -> u8 {
        match self {
            OpKind::UpdateFieldValue => 0x01,
            OpKind::SetSimulationMode => 0x02,
            OpKind::SimulateValue => 0x03,
        }
    }
}

/// Operand carried by an operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operand {
    /// New analog value in engineering units.
    AnalogValue(i64),
    /// New digital value.
    DigitalValue(bool),
    /// Requested simulation mode.
    Mode(bool),
}

impl Operand {
    fn encode(&self, out: &mut Vec<u8>) {
        match *self {
            Operand::AnalogValue(value) => {
                out.push(0x01);
                put_i64(out, value);
            }
            Operand::DigitalValue(value) => {
                out.push(0x02);
                put_bool(out, value);
            }
            Operand::Mode(mode) => {
                out.push(0x03);
                put_bool(out, mode);
            }
        }
    }
}

/// Everything a signature over one transition attempt commits to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransitionContext {
    /// Digest of the entry being spent.
    pub prev_entry: Digest,
    /// Operation class.
    pub op: OpKind,
    /// Operation operand.
    pub operand: Operand,
    /// Commitment the spender declares for the successor outputs.
    pub declared_commitment: Digest,
}

impl TransitionContext {
    pub fn new(
        prev_entry: Digest,
        op: OpKind,
        operand: Operand,
        declared_commitment: Digest,
    ) -> Self {
        Self {
            prev_entry,
            op,
            operand,
            declared_commitment,
        }
    }

    /// The message to sign and verify for this spend.
    pub fn digest(&self) -> Digest {
        let mut out = Vec::with_capacity(80);
        out.extend_from_slice(self.prev_entry.as_bytes());
        out.push(self.op.tag());
        self.operand.encode(&mut out);
        out.extend_from_slice(self.declared_commitment.as_bytes());
        Digest::compute(CONTEXT_DOMAIN, &out)
    }
}
