//! Ledger-anchored entries: a conserved value plus one instrument state.

use fieldpoint_common::Digest;
use fieldpoint_instruments::{
    entry_digest, expected_commitment, AnalogInput, CanonicalState, DigitalInput, RemainderOutput,
};
use serde::{Deserialize, Serialize};

/// Instrument kind of a point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointKind {
    Analog,
    Digital,
}

/// State payload of an entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointState {
    Analog(AnalogInput),
    Digital(DigitalInput),
}

impl PointState {
    pub fn kind(&self) -> PointKind {
        match self {
            PointState::Analog(_) => PointKind::Analog,
            PointState::Digital(_) => PointKind::Digital,
        }
    }
}

impl CanonicalState for PointState {
    // Delegates without framing: the wrapped state's own kind tag keeps the
    // digest identical to one computed over the concrete type.
    fn encode_canonical(&self, out: &mut Vec<u8>) {
        match self {
            PointState::Analog(state) => state.encode_canonical(out),
            PointState::Digital(state) => state.encode_canonical(out),
        }
    }
}

/// One ledger entry: the conserved unit-of-account value and the
/// instrument's authoritative current state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub value: u64,
    pub state: PointState,
}

impl Entry {
    pub fn new(value: u64, state: PointState) -> Self {
        Self { value, state }
    }

    /// Digest identifying this exact entry version.
    pub fn digest(&self) -> Digest {
        entry_digest(self.value, &self.state)
    }

    /// Commitment over this entry as a successor output, with an optional
    /// remainder. This is what a spender declares before signing.
    pub fn commitment(&self, remainder: Option<&RemainderOutput>) -> Digest {
        expected_commitment(self.value, &self.state, remainder)
    }
}
