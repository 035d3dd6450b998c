//! Digital input point.
//!
//! Same identity and mode shape as the analog point, with boolean process
//! values, an `invert` polarity flag, and per-edge debounce delays. Value
//! propagation, whether from the device or from the engineer's simulation, routes
//! through the debounce filter, so a successful transition either updates
//! `value` immediately or yields a [`PendingSettle`] for the ledger arena to
//! schedule.

use fieldpoint_common::{put_bool, put_u64, PublicIdentity};
use serde::{Deserialize, Serialize};

use crate::commitment::CanonicalState;
use crate::context::{OpKind, Operand};
use crate::debounce::{filter_value_change, PendingSettle, ValueChange};
use crate::error::TransitionError;
use crate::transition::{run_signed, OpGate, TransitionRequest};

const DIGITAL_KIND_TAG: u8 = 0x02;

/// State of one digital input point.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigitalInput {
    /// Identity authorized for field updates.
    pub device: PublicIdentity,
    /// Identity authorized for simulation control.
    pub engineer: PublicIdentity,
    /// Polarity flag applied when storing a new value.
    pub invert: bool,
    /// Debounce delay for the falling edge (true -> false).
    pub off_time_delay_ms: u64,
    /// Debounce delay for the rising edge (false -> true).
    pub on_time_delay_ms: u64,
    /// Current process value.
    pub value: bool,
    /// Last raw value reported by the device.
    pub field_value: bool,
    /// Last value forced by the engineer.
    pub sim_value: bool,
    /// Signal-quality flag. Reserved: no operation sets it.
    pub bad_signal: bool,
    /// Simulation-mode flag.
    pub is_sim: bool,
}

/// Successor state plus the deferred settlement, if the debounce filter
/// scheduled one instead of updating `value` in place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DigitalUpdate {
    pub state: DigitalInput,
    pub pending: Option<PendingSettle>,
}

impl DigitalInput {
    /// Provision a new digital input with all mutable fields false and
    /// simulation off.
    pub fn new(
        device: PublicIdentity,
        engineer: PublicIdentity,
        invert: bool,
        off_time_delay_ms: u64,
        on_time_delay_ms: u64,
    ) -> Self {
        Self {
            device,
            engineer,
            invert,
            off_time_delay_ms,
            on_time_delay_ms,
            value: false,
            field_value: false,
            sim_value: false,
            bad_signal: false,
            is_sim: false,
        }
    }

    fn debounced(&self, next: DigitalInput, requested: bool, now_ms: u64) -> DigitalUpdate {
        let mut next = next;
        match filter_value_change(
            self.value,
            requested,
            self.invert,
            self.off_time_delay_ms,
            self.on_time_delay_ms,
            now_ms,
        ) {
            ValueChange::Unchanged => DigitalUpdate {
                state: next,
                pending: None,
            },
            ValueChange::Immediate(stored) => {
                next.value = stored;
                DigitalUpdate {
                    state: next,
                    pending: None,
                }
            }
            ValueChange::Deferred(pending) => DigitalUpdate {
                state: next,
                pending: Some(pending),
            },
        }
    }

    /// Successor after a field update: the raw value lands in `field_value`
    /// and propagates to `value` through the debounce filter.
    pub fn with_field_value(&self, new_value: bool, now_ms: u64) -> DigitalUpdate {
        let mut next = self.clone();
        next.field_value = new_value;
        self.debounced(next, new_value, now_ms)
    }

    /// Successor after a simulation-mode switch. Only `is_sim` changes.
    pub fn with_simulation_mode(&self, sim_mode: bool) -> Self {
        let mut next = self.clone();
        next.is_sim = sim_mode;
        next
    }

    /// Successor after a simulated-value override: the value lands in
    /// `sim_value` and propagates to `value` through the debounce filter.
    pub fn with_sim_value(&self, new_value: bool, now_ms: u64) -> DigitalUpdate {
        let mut next = self.clone();
        next.sim_value = new_value;
        self.debounced(next, new_value, now_ms)
    }

    /// Successor once a deferred settlement fires.
    pub fn settled(&self, target: bool) -> Self {
        let mut next = self.clone();
        next.value = target;
        next
    }

    /// Device reports a new raw value. Requires simulation off and the
    /// device's signature.
    pub fn update_field_value(
        &self,
        entry_value: u64,
        new_value: bool,
        request: &TransitionRequest,
        now_ms: u64,
    ) -> Result<DigitalUpdate, TransitionError> {
        let (state, pending) = run_signed(
            entry_value,
            self,
            OpGate {
                required: &self.device,
                mode_ok: !self.is_sim,
                op: OpKind::UpdateFieldValue,
                operand: Operand::DigitalValue(new_value),
            },
            request,
            |state| {
                let update = state.with_field_value(new_value, now_ms);
                (update.state, update.pending)
            },
        )?;
        Ok(DigitalUpdate { state, pending })
    }

    /// Engineer switches simulation mode. The result carries no settlement,
    /// which makes the arena drop any pending one.
    pub fn set_simulation_mode(
        &self,
        entry_value: u64,
        sim_mode: bool,
        request: &TransitionRequest,
    ) -> Result<DigitalUpdate, TransitionError> {
        let (state, ()) = run_signed(
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
        Ok(DigitalUpdate {
            state,
            pending: None,
        })
    }

    /// Engineer forces a simulated value. Requires simulation on and the
    /// engineer's signature.
    pub fn simulate_value(
        &self,
        entry_value: u64,
        new_value: bool,
        request: &TransitionRequest,
        now_ms: u64,
    ) -> Result<DigitalUpdate, TransitionError> {
        let (state, pending) = run_signed(
            entry_value,
            self,
            OpGate {
                required: &self.engineer,
                mode_ok: self.is_sim,
                op: OpKind::SimulateValue,
                operand: Operand::DigitalValue(new_value),
            },
            request,
            |state| {
                let update = state.with_sim_value(new_value, now_ms);
                (update.state, update.pending)
            },
        )?;
        Ok(DigitalUpdate { state, pending })
    }
}

impl CanonicalState for DigitalInput {
    fn encode_canonical(&self, out: &mut Vec<u8>) {
        out.push(DIGITAL_KIND_TAG);
        out.extend_from_slice(self.device.as_bytes());
        out.extend_from_slice(self.engineer.as_bytes());
        put_bool(out, self.invert);
        put_u64(out, self.off_time_delay_ms);
        put_u64(out, self.on_time_delay_ms);
        put_bool(out, self.value);
        put_bool(out, self.field_value);
        put_bool(out, self.sim_value);
        put_bool(out, self.bad_signal);
        put_bool(out, self.is_sim);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commitment::{entry_digest, expected_commitment};
    use crate::context::TransitionContext;
    use ed25519_dalek::{Signer, SigningKey};
    use fieldpoint_common::{Digest, SignatureBytes};

    const ENTRY_VALUE: u64 = 546;
    const NOW_MS: u64 = 1_700_000_000_000;

    fn sample_key(seed: u8) -> SigningKey {
        SigningKey::from_bytes(&[seed; 32])
    }

    fn identity(key: &SigningKey) -> PublicIdentity {
        PublicIdentity::from_verifying_key(&key.verifying_key())
    }

    fn sample_point(off_ms: u64, on_ms: u64) -> (DigitalInput, SigningKey, SigningKey) {
        let device = sample_key(0x11);
        let engineer = sample_key(0x22);
        let point = DigitalInput::new(identity(&device), identity(&engineer), false, off_ms, on_ms);
        (point, device, engineer)
    }

    fn signed_request(
        signer: &SigningKey,
        prev_entry: Digest,
        op: OpKind,
        operand: Operand,
        declared: Digest,
    ) -> TransitionRequest {
        let context = TransitionContext::new(prev_entry, op, operand, declared);
        TransitionRequest {
            signature: SignatureBytes::from(signer.sign(context.digest().as_bytes())),
            declared_commitment: declared,
            remainder: None,
        }
    }

    fn field_update_request(
        point: &DigitalInput,
        signer: &SigningKey,
        new_value: bool,
        now_ms: u64,
    ) -> TransitionRequest {
        let declared = expected_commitment(
            ENTRY_VALUE,
            &point.with_field_value(new_value, now_ms).state,
            None,
        );
        signed_request(
            signer,
            entry_digest(ENTRY_VALUE, point),
            OpKind::UpdateFieldValue,
            Operand::DigitalValue(new_value),
            declared,
        )
    }

    #[test]
    fn zero_delay_update_is_immediate() {
        let (point, device, _) = sample_point(0, 0);
        let request = field_update_request(&point, &device, true, NOW_MS);
        let update = point
            .update_field_value(ENTRY_VALUE, true, &request, NOW_MS)
            .unwrap();

        assert!(update.state.value);
        assert!(update.state.field_value);
        assert!(update.pending.is_none());
    }

    #[test]
    fn rising_edge_defers_by_on_delay() {
        let (point, device, _) = sample_point(5_000, 3_000);
        let request = field_update_request(&point, &device, true, NOW_MS);
        let update = point
            .update_field_value(ENTRY_VALUE, true, &request, NOW_MS)
            .unwrap();

        // Raw value recorded, process value unchanged until the settle.
        assert!(update.state.field_value);
        assert!(!update.state.value);
        assert_eq!(
            update.pending,
            Some(PendingSettle {
                target: true,
                due_at_ms: NOW_MS + 3_000
            })
        );
    }

    #[test]
    fn falling_edge_defers_by_off_delay() {
        let (mut point, device, _) = sample_point(5_000, 0);
        point.value = true;
        point.field_value = true;

        let request = field_update_request(&point, &device, false, NOW_MS);
        let update = point
            .update_field_value(ENTRY_VALUE, false, &request, NOW_MS)
            .unwrap();

        assert!(update.state.value);
        assert!(!update.state.field_value);
        assert_eq!(
            update.pending,
            Some(PendingSettle {
                target: false,
                due_at_ms: NOW_MS + 5_000
            })
        );

        assert!(!update.state.settled(false).value);
    }

    #[test]
    fn unchanged_value_yields_no_settlement() {
        let (point, device, _) = sample_point(5_000, 5_000);
        let request = field_update_request(&point, &device, false, NOW_MS);
        let update = point
            .update_field_value(ENTRY_VALUE, false, &request, NOW_MS)
            .unwrap();

        assert!(!update.state.value);
        assert!(update.pending.is_none());
    }

    #[test]
    fn inverted_point_stores_inverted_polarity() {
        let device = sample_key(0x11);
        let engineer = sample_key(0x22);
        let point = DigitalInput::new(identity(&device), identity(&engineer), true, 0, 0);

        let declared = expected_commitment(
            ENTRY_VALUE,
            &point.with_field_value(true, NOW_MS).state,
            None,
        );
        let request = signed_request(
            &device,
            entry_digest(ENTRY_VALUE, &point),
            OpKind::UpdateFieldValue,
            Operand::DigitalValue(true),
            declared,
        );
        let update = point
            .update_field_value(ENTRY_VALUE, true, &request, NOW_MS)
            .unwrap();

        assert!(update.state.field_value);
        assert!(!update.state.value);
    }

    #[test]
    fn field_update_rejected_in_simulation_mode() {
        let (point, device, engineer) = sample_point(0, 0);
        let declared =
            expected_commitment(ENTRY_VALUE, &point.with_simulation_mode(true), None);
        let request = signed_request(
            &engineer,
            entry_digest(ENTRY_VALUE, &point),
            OpKind::SetSimulationMode,
            Operand::Mode(true),
            declared,
        );
        let update = point
            .set_simulation_mode(ENTRY_VALUE, true, &request)
            .unwrap();
        assert!(update.pending.is_none());

        let request = field_update_request(&update.state, &device, true, NOW_MS);
        let err = update
            .state
            .update_field_value(ENTRY_VALUE, true, &request, NOW_MS)
            .unwrap_err();
        assert_eq!(err, TransitionError::ModeViolation);
    }

    #[test]
    fn simulate_value_routes_through_debounce() {
        let (point, _, engineer) = sample_point(0, 4_000);

        let declared =
            expected_commitment(ENTRY_VALUE, &point.with_simulation_mode(true), None);
        let request = signed_request(
            &engineer,
            entry_digest(ENTRY_VALUE, &point),
            OpKind::SetSimulationMode,
            Operand::Mode(true),
            declared,
        );
        let point = point
            .set_simulation_mode(ENTRY_VALUE, true, &request)
            .unwrap()
            .state;

        let declared = expected_commitment(
            ENTRY_VALUE,
            &point.with_sim_value(true, NOW_MS).state,
            None,
        );
        let request = signed_request(
            &engineer,
            entry_digest(ENTRY_VALUE, &point),
            OpKind::SimulateValue,
            Operand::DigitalValue(true),
            declared,
        );
        let update = point
            .simulate_value(ENTRY_VALUE, true, &request, NOW_MS)
            .unwrap();

        assert!(update.state.sim_value);
        assert!(!update.state.value);
        assert_eq!(
            update.pending,
            Some(PendingSettle {
                target: true,
                due_at_ms: NOW_MS + 4_000
            })
        );
    }

    #[test]
    fn simulate_value_rejected_outside_simulation_mode() {
        let (point, _, engineer) = sample_point(0, 0);
        let declared = expected_commitment(
            ENTRY_VALUE,
            &point.with_sim_value(true, NOW_MS).state,
            None,
        );
        let request = signed_request(
            &engineer,
            entry_digest(ENTRY_VALUE, &point),
            OpKind::SimulateValue,
            Operand::DigitalValue(true),
            declared,
        );
        let err = point
            .simulate_value(ENTRY_VALUE, true, &request, NOW_MS)
            .unwrap_err();
        assert_eq!(err, TransitionError::ModeViolation);
    }

    #[test]
    fn rejected_attempt_leaves_state_untouched() {
        let (point, _, engineer) = sample_point(0, 0);
        let before = point.clone();
        let request = field_update_request(&point, &engineer, true, NOW_MS);
        assert!(point
            .update_field_value(ENTRY_VALUE, true, &request, NOW_MS)
            .is_err());
        assert_eq!(point, before);
    }

    #[test]
    fn state_serialization_round_trip() {
        let (point, device, _) = sample_point(5_000, 3_000);
        let request = field_update_request(&point, &device, true, NOW_MS);
        let update = point
            .update_field_value(ENTRY_VALUE, true, &request, NOW_MS)
            .unwrap();

        let json = serde_json::to_string(&update.state).unwrap();
        let recovered: DigitalInput = serde_json::from_str(&json).unwrap();
        assert_eq!(update.state, recovered);
    }
}
