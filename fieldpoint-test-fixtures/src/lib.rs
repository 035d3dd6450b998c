//! Deterministic key material and request-signing helpers reused across
//! fieldpoint tests.
//!
//! Keys are derived from fixed seeds so fixtures are stable across runs and
//! test failures reproduce byte-for-byte.

use ed25519_dalek::{Signer, SigningKey};
use fieldpoint_common::{Digest, PublicIdentity, SignatureBytes};
use fieldpoint_instruments::{
    OpKind, Operand, RemainderOutput, TransitionContext, TransitionRequest,
};
use once_cell::sync::OnceCell;

const DEVICE_SEED: [u8; 32] = [0x11; 32];
const ENGINEER_SEED: [u8; 32] = [0x22; 32];
const STRANGER_SEED: [u8; 32] = [0x33; 32];

/// The fixture keyring: a device, an engineer, and a key registered as
/// neither.
pub struct PointKeys {
    pub device: SigningKey,
    pub engineer: SigningKey,
    pub stranger: SigningKey,
}

static KEYS: OnceCell<PointKeys> = OnceCell::new();

pub fn point_keys() -> &'static PointKeys {
    KEYS.get_or_init(|| PointKeys {
        device: SigningKey::from_bytes(&DEVICE_SEED),
        engineer: SigningKey::from_bytes(&ENGINEER_SEED),
        stranger: SigningKey::from_bytes(&STRANGER_SEED),
    })
}

pub fn device_identity() -> PublicIdentity {
    PublicIdentity::from_verifying_key(&point_keys().device.verifying_key())
}

pub fn engineer_identity() -> PublicIdentity {
    PublicIdentity::from_verifying_key(&point_keys().engineer.verifying_key())
}

pub fn stranger_identity() -> PublicIdentity {
    PublicIdentity::from_verifying_key(&point_keys().stranger.verifying_key())
}

/// Author a transition request: bind the context, sign it, attach the
/// declared commitment and optional remainder.
pub fn signed_request(
    signer: &SigningKey,
    prev_entry: Digest,
    op: OpKind,
    operand: Operand,
    declared_commitment: Digest,
    remainder: Option<RemainderOutput>,
) -> TransitionRequest {
    let context = TransitionContext::new(prev_entry, op, operand, declared_commitment);
    TransitionRequest {
        signature: SignatureBytes::from(signer.sign(context.digest().as_bytes())),
        declared_commitment,
        remainder,
    }
}
