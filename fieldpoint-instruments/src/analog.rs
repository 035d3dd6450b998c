//! Analog input point.
//!
//! Process values are signed 64-bit integers in engineering units. The
//! `factor`/`offset` scaling constants and the `bad_signal` quality flag are
//! provisioned but not applied by any operation; they are reserved for the
//! engineering-unit conversion layer.

use fieldpoint_common::{put_bool, put_i64, PublicIdentity};
use serde::{Deserialize, Serialize};

use crate::commitment::CanonicalState;
use crate::context::{OpKind, Operand};
use crate::error::TransitionError;
use crate::transition::{run_signed, OpGate, TransitionRequest};

const ANALOG_KIND_TAG: u8 = 0x01;

/// State of one analog input point.
///
/// `device`, `engineer`, `factor`, and `offset` are fixed at provisioning;
/// operations return successor states and never touch them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalogInput {
    /// Identity authorized for field updates.
    pub device: PublicIdentity,
    /// Identity authorized for simulation control.
    pub engineer: PublicIdentity,
    /// Current process value in engineering units.
    pub value: i64,
    /// Last value reported by the device.
    pub field_value: i64,
    /// Last value forced by the engineer.
    pub sim_value: i64,
    /// Signal-quality flag. Reserved: no operation sets it.
    pub bad_signal: bool,
    /// Simulation-mode flag.
    pub is_sim: bool,
    /// Scale factor. Reserved: scaling is not applied by any operation.
    pub factor: i64,
    /// Scale offset. Reserved.
    pub offset: i64,
}

impl AnalogInput {
    /// Provision a new analog input with all mutable fields zeroed and
    /// simulation off.
    pub fn new(
        device: PublicIdentity,
        engineer: PublicIdentity,
        factor: i64,
        offset: i64,
    ) -> Self {
        Self {
            device,
            engineer,
            value: 0,
            field_value: 0,
            sim_value: 0,
            bad_signal: false,
            is_sim: false,
            factor,
            offset,
        }
    }

    /// Successor state after a field update: the new value lands in
    /// `field_value` and propagates to `value`.
    ///
    /// This is the projection a spender uses to compute the commitment it
    /// declares before signing.
    pub fn with_field_value(&self, new_value: i64) -> Self {
        let mut next = self.clone();
        next.field_value = new_value;
        next.value = next.field_value;
        next
    }

    /// Successor state after a simulation-mode switch. Only `is_sim`
    /// changes; the process value holds until the next update in the new
    /// mode.
    pub fn with_simulation_mode(&self, sim_mode: bool) -> Self {
        let mut next = self.clone();
        next.is_sim = sim_mode;
        next
    }

    /// Successor state after a simulated-value override: the new value lands
    /// in `sim_value` and propagates to `value`.
    pub fn with_sim_value(&self, new_value: i64) -> Self {
        let mut next = self.clone();
        next.sim_value = new_value;
        next.value = next.sim_value;
        next
    }

    /// Device reports a new field value. Requires simulation off and the
    /// device's signature.
    pub fn update_field_value(
        &self,
        entry_value: u64,
        new_value: i64,
        request: &TransitionRequest,
    ) -> Result<Self, TransitionError> {
        let (next, ()) = run_signed(
            entry_value,
            self,
            OpGate {
                required: &self.device,
                mode_ok: !self.is_sim,
                op: OpKind::UpdateFieldValue,
                operand: Operand::AnalogValue(new_value),
            },
            request,
            |state| (state.with_field_value(new_value), ()),
        )?;
        Ok(next)
    }

    /// Engineer switches simulation mode. No mode guard; requires the
    /// engineer's signature.
    pub fn set_simulation_mode(
        &self,
        entry_value: u64,
        sim_mode: bool,
        request: &TransitionRequest,
    ) -> Result<Self, TransitionError> {
        let (next, ()) = run_signed(
            entry_value,
            self,
            OpGate {
                required: &self.engineer,
                mode_ok: true,
                op: OpKind::SetSimulationMode,
                operand: Operand::Mode(sim_mode),
            },
            request,
            |state| (state.with_simulation_mode(sim_mode), ()),
        )?;
        Ok(next)
    }

    /// Engineer forces a simulated value. Requires simulation on and the
    /// engineer's signature.
    pub fn simulate_value(
        &self,
        entry_value: u64,
        new_value: i64,
        request: &TransitionRequest,
    ) -> Result<Self, TransitionError> {
        let (next, ()) = run_signed(
            entry_value,
            self,
            OpGate {
                required: &self.engineer,
                mode_ok: self.is_sim,
                op: OpKind::SimulateValue,
                operand: Operand::AnalogValue(new_value),
            },
            request,
            |state| (state.with_sim_value(new_value), ()),
        )?;
        Ok(next)
    }
}

impl CanonicalState for AnalogInput {
    fn encode_canonical(&self, out: &mut Vec<u8>) {
        out.push(ANALOG_KIND_TAG);
        out.extend_from_slice(self.device.as_bytes());
        out.extend_from_slice(self.engineer.as_bytes());
        put_i64(out, self.value);
        put_i64(out, self.field_value);
        put_i64(out, self.sim_value);
        put_bool(out, self.bad_signal);
        put_bool(out, self.is_sim);
        put_i64(out, self.factor);
        put_i64(out, self.offset);
    }
}
