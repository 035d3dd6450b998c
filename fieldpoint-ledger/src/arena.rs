//! The point arena: versioned entry records and spend-once commits.

use std::fmt;

use fieldpoint_common::{Digest, PublicIdentity};
use fieldpoint_instruments::{
    AnalogInput, DigitalInput, PendingSettle, TransitionRequest,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::entry::{Entry, PointState};
use crate::error::LedgerError;

/// Handle to a provisioned point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PointId(pub u32);

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "point-{}", self.0)
    }
}

/// One signed operation plus its operand, as proposed by a spender.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionOp {
    UpdateAnalogField(i64),
    UpdateDigitalField(bool),
    SetSimulationMode(bool),
    SimulateAnalog(i64),
    SimulateDigital(bool),
}

/// A complete transition proposal against one point.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionProposal {
    pub op: TransitionOp,
    pub request: TransitionRequest,
}

struct PointRecord {
    entry: Entry,
    version: u64,
    pending: Option<PendingSettle>,
}

/// Arena of instrument points.
///
/// Each record holds the current entry, a monotonically increasing version
/// index, and the point's single deferred-settlement slot.
#[derive(Default)]
pub struct PointArena {
    points: Vec<PointRecord>,
}

impl PointArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provision an analog input point carrying `value` ledger units.
    pub fn provision_analog(
        &mut self,
        value: u64,
        device: PublicIdentity,
        engineer: PublicIdentity,
        factor: i64,
        offset: i64,
    ) -> PointId {
        let state = PointState::Analog(AnalogInput::new(device, engineer, factor, offset));
        self.provision(Entry::new(value, state))
    }

    /// Provision a digital input point carrying `value` ledger units.
    pub fn provision_digital(
        &mut self,
        value: u64,
        device: PublicIdentity,
        engineer: PublicIdentity,
        invert: bool,
        off_time_delay_ms: u64,
        on_time_delay_ms: u64,
    ) -> PointId {
        let state = PointState::Digital(DigitalInput::new(
            device,
            engineer,
            invert,
            off_time_delay_ms,
            on_time_delay_ms,
        ));
        self.provision(Entry::new(value, state))
    }

    fn provision(&mut self, entry: Entry) -> PointId {
        let id = PointId(self.points.len() as u32);
        debug!(point = %id, head = %entry.digest(), "provisioned point");
        self.points.push(PointRecord {
            entry,
            version: 0,
            pending: None,
        });
        id
    }

    fn record(&self, id: PointId) -> Result<&PointRecord, LedgerError> {
        self.points
            .get(id.0 as usize)
            .ok_or(LedgerError::UnknownPoint(id))
    }

    fn record_mut(&mut self, id: PointId) -> Result<&mut PointRecord, LedgerError> {
        self.points
            .get_mut(id.0 as usize)
            .ok_or(LedgerError::UnknownPoint(id))
    }

    /// Current entry of a point.
    pub fn entry(&self, id: PointId) -> Result<&Entry, LedgerError> {
        Ok(&self.record(id)?.entry)
    }

    /// Current version index of a point.
    pub fn version(&self, id: PointId) -> Result<u64, LedgerError> {
        Ok(self.record(id)?.version)
    }

    /// Digest of the current head entry: what a spender must bind its
    /// signature to.
    pub fn head_digest(&self, id: PointId) -> Result<Digest, LedgerError> {
        Ok(self.record(id)?.entry.digest())
    }

    /// The point's pending deferred settlement, if any.
    pub fn pending_settle(&self, id: PointId) -> Result<Option<PendingSettle>, LedgerError> {
        Ok(self.record(id)?.pending)
    }

    /// Attempt one transition against the head of `id`.
    ///
    /// `prev` is the spender's claim of which entry it is consuming; a
    /// mismatch with the current head digest is a terminal [`LedgerError::StaleSpend`]
    /// and nothing changes. On success the successor entry replaces the head
    /// atomically (same conserved value), the version advances, the
    /// settlement slot is replaced by the transition's outcome, and the new
    /// head digest is returned.
    pub fn commit(
        &mut self,
        id: PointId,
        prev: Digest,
        proposal: &TransitionProposal,
        now_ms: u64,
    ) -> Result<Digest, LedgerError> {
        let record = self.record_mut(id)?;
        let head = record.entry.digest();
        if prev != head {
            warn!(point = %id, proposed = %prev, head = %head, "rejected stale spend");
            return Err(LedgerError::StaleSpend {
                proposed: prev,
                head,
            });
        }

        let value = record.entry.value;
        let request = &proposal.request;
        let (next_state, pending) = match (&record.entry.state, proposal.op) {
            (PointState::Analog(state), TransitionOp::UpdateAnalogField(new_value)) => (
                PointState::Analog(state.update_field_value(value, new_value, request)?),
                None,
            ),
            (PointState::Analog(state), TransitionOp::SetSimulationMode(mode)) => (
                PointState::Analog(state.set_simulation_mode(value, mode, request)?),
                None,
            ),
            (PointState::Analog(state), TransitionOp::SimulateAnalog(new_value)) => (
                PointState::Analog(state.simulate_value(value, new_value, request)?),
                None,
            ),
            (PointState::Digital(state), TransitionOp::UpdateDigitalField(new_value)) => {
                let update = state.update_field_value(value, new_value, request, now_ms)?;
                (PointState::Digital(update.state), update.pending)
            }
            (PointState::Digital(state), TransitionOp::SetSimulationMode(mode)) => {
                let update = state.set_simulation_mode(value, mode, request)?;
                (PointState::Digital(update.state), update.pending)
            }
            (PointState::Digital(state), TransitionOp::SimulateDigital(new_value)) => {
                let update = state.simulate_value(value, new_value, request, now_ms)?;
                (PointState::Digital(update.state), update.pending)
            }
            _ => return Err(LedgerError::KindMismatch),
        };

        record.entry.state = next_state;
        record.version += 1;
        record.pending = pending;
        let new_head = record.entry.digest();
        debug!(point = %id, version = record.version, head = %new_head, "committed transition");
        Ok(new_head)
    }

    /// Apply the point's deferred settlement if its deadline has passed.
    ///
    /// Returns the settled value when one fired. A settlement is a
    /// value-conserving version bump: the conserved value and every field
    /// other than the process value are untouched.
    pub fn settle_due(&mut self, id: PointId, now_ms: u64) -> Result<Option<bool>, LedgerError> {
        let record = self.record_mut(id)?;
        let pending = match record.pending {
            Some(pending) if pending.is_due(now_ms) => pending,
            _ => return Ok(None),
        };

        let settled = match &record.entry.state {
            PointState::Digital(state) => PointState::Digital(state.settled(pending.target)),
            PointState::Analog(_) => return Ok(None),
        };
        record.entry.state = settled;
        record.pending = None;
        record.version += 1;
        debug!(point = %id, target = pending.target, version = record.version, "applied deferred settlement");
        Ok(Some(pending.target))
    }
}
