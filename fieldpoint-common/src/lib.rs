// fieldpoint/fieldpoint-common/src/lib.rs
// Numan Thabit 2025

//! Shared primitives for the fieldpoint protocol crates.
//!
//! This crate defines the identity, signature, and digest types that every
//! other fieldpoint crate builds on:
//! - [`PublicIdentity`]: a registered Ed25519 verifying key; signature
//!   checks fail closed and never panic.
//! - [`SignatureBytes`]: a detached 64-byte Ed25519 signature.
//! - [`Digest`]: a domain-separated BLAKE3-256 digest.
//!
//! It also provides the canonical little-endian byte encoding used for
//! everything that gets hashed, so that two parties always serialize the
//! same logical state to the same bytes.

use std::fmt;

use ed25519_dalek::{Signature as Ed25519Signature, Verifier, VerifyingKey as Ed25519VerifyingKey};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Byte length of a [`Digest`].
pub const DIGEST_LEN: usize = 32;
/// Byte length of a [`PublicIdentity`].
pub const IDENTITY_LEN: usize = 32;
/// Byte length of a [`SignatureBytes`].
pub const SIGNATURE_LEN: usize = 64;

/// Errors from parsing the fixed-width binary types in this crate.
#[derive(Debug, Error)]
pub enum CommonError {
    /// Hex string could not be decoded.
    #[error("invalid hex encoding: {0}")]
    InvalidHex(String),

    /// Decoded byte string has the wrong length.
    #[error("invalid length: expected {expected} bytes, got {got}")]
    InvalidLength { expected: usize, got: usize },
}

/// A domain-separated BLAKE3-256 digest.
///
/// All fieldpoint digests are computed as
/// `BLAKE3(domain || len(payload) as u64 LE || payload)` so that payloads
/// hashed under different domains can never collide.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Digest(#[serde(with = "serde_hex32")] pub [u8; DIGEST_LEN]);

impl Digest {
    /// Hash `payload` under the given domain tag.
    pub fn compute(domain: &str, payload: &[u8]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(domain.as_bytes());
        hasher.update(&(payload.len() as u64).to_le_bytes());
        hasher.update(payload);
        Digest(*hasher.finalize().as_bytes())
    }

    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from a hex string, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, CommonError> {
        let bytes = decode_hex_array::<DIGEST_LEN>(s)?;
        Ok(Digest(bytes))
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

/// A registered public identity: the raw bytes of an Ed25519 verifying key.
///
/// Identities are stored and compared as opaque 32-byte strings; the key is
/// only parsed when a signature is actually checked.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicIdentity(#[serde(with = "serde_hex32")] pub [u8; IDENTITY_LEN]);

impl PublicIdentity {
    pub fn from_verifying_key(key: &Ed25519VerifyingKey) -> Self {
        PublicIdentity(key.to_bytes())
    }

    pub fn as_bytes(&self) -> &[u8; IDENTITY_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from a hex string, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, CommonError> {
        let bytes = decode_hex_array::<IDENTITY_LEN>(s)?;
        Ok(PublicIdentity(bytes))
    }

    /// Verify an Ed25519 signature over `message` against this identity.
    ///
    /// Fails closed: an identity that does not decode to a valid verifying
    /// key, a malformed signature, or a signature over different bytes all
    /// yield `false`. This function never panics and has no side effects.
    pub fn verify(&self, message: &[u8], signature: &SignatureBytes) -> bool {
        let key = match Ed25519VerifyingKey::from_bytes(&self.0) {
            Ok(key) => key,
            Err(_) => return false,
        };
        let signature = Ed25519Signature::from_bytes(&signature.0);
        key.verify(message, &signature).is_ok()
    }
}

impl fmt::Display for PublicIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for PublicIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicIdentity({})", self.to_hex())
    }
}

/// A detached 64-byte Ed25519 signature.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureBytes(#[serde(with = "serde_hex64")] pub [u8; SIGNATURE_LEN]);

impl SignatureBytes {
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from a hex string, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, CommonError> {
        let bytes = decode_hex_array::<SIGNATURE_LEN>(s)?;
        Ok(SignatureBytes(bytes))
    }
}

impl From<Ed25519Signature> for SignatureBytes {
    fn from(signature: Ed25519Signature) -> Self {
        SignatureBytes(signature.to_bytes())
    }
}

impl fmt::Debug for SignatureBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SignatureBytes({})", self.to_hex())
    }
}

/// Append a `u64` in little-endian order.
pub fn put_u64(out: &mut Vec<u8>, value: u64) {
    out.extend_from_slice(&value.to_le_bytes());
}

/// Append an `i64` in little-endian order.
pub fn put_i64(out: &mut Vec<u8>, value: i64) {
    out.extend_from_slice(&value.to_le_bytes());
}

/// Append a boolean as a single byte (`0x00` or `0x01`).
pub fn put_bool(out: &mut Vec<u8>, value: bool) {
    out.push(u8::from(value));
}

fn decode_hex_array<const N: usize>(s: &str) -> Result<[u8; N], CommonError> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(s).map_err(|e| CommonError::InvalidHex(e.to_string()))?;
    if bytes.len() != N {
        return Err(CommonError::InvalidLength {
            expected: N,
            got: bytes.len(),
        });
    }
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes);
    Ok(out)
}

/// Serde module for 32-byte arrays as `0x`-prefixed hex strings.
mod serde_hex32 {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("0x{}", hex::encode(bytes)))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<[u8; 32], D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        super::decode_hex_array::<32>(&s).map_err(de::Error::custom)
    }
}

/// Serde module for 64-byte arrays as `0x`-prefixed hex strings.
mod serde_hex64 {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8; 64], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("0x{}", hex::encode(bytes)))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<[u8; 64], D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        super::decode_hex_array::<64>(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Signer, SigningKey};

    fn sample_key(seed: u8) -> SigningKey {
        SigningKey::from_bytes(&[seed; 32])
    }

    #[test]
    fn digest_is_deterministic() {
        let a = Digest::compute("fieldpoint/test", b"payload");
        let b = Digest::compute("fieldpoint/test", b"payload");
        assert_eq!(a, b);
    }

    #[test]
    fn digest_domains_do_not_collide() {
        let a = Digest::compute("fieldpoint/test/a", b"payload");
        let b = Digest::compute("fieldpoint/test/b", b"payload");
        assert_ne!(a, b);
    }

    #[test]
    fn digest_hex_round_trip() {
        let digest = Digest::compute("fieldpoint/test", b"round trip");
        let parsed = Digest::from_hex(&digest.to_hex()).unwrap();
        assert_eq!(digest, parsed);

        let json = serde_json::to_string(&digest).unwrap();
        let recovered: Digest = serde_json::from_str(&json).unwrap();
        assert_eq!(digest, recovered);
    }

    #[test]
    fn from_hex_rejects_bad_input() {
        assert!(matches!(
            Digest::from_hex("zz"),
            Err(CommonError::InvalidHex(_))
        ));
        assert!(matches!(
            Digest::from_hex("0xabcd"),
            Err(CommonError::InvalidLength {
                expected: 32,
                got: 2
            })
        ));
    }

    #[test]
    fn signature_verifies_for_matching_identity() {
        let key = sample_key(7);
        let identity = PublicIdentity::from_verifying_key(&key.verifying_key());
        let signature = SignatureBytes::from(key.sign(b"transition context"));
        assert!(identity.verify(b"transition context", &signature));
    }

    #[test]
    fn signature_fails_for_wrong_key() {
        let key = sample_key(7);
        let other = sample_key(8);
        let identity = PublicIdentity::from_verifying_key(&other.verifying_key());
        let signature = SignatureBytes::from(key.sign(b"transition context"));
        assert!(!identity.verify(b"transition context", &signature));
    }

    #[test]
    fn signature_fails_for_wrong_message() {
        let key = sample_key(7);
        let identity = PublicIdentity::from_verifying_key(&key.verifying_key());
        let signature = SignatureBytes::from(key.sign(b"transition context"));
        assert!(!identity.verify(b"another context", &signature));
    }

    #[test]
    fn malformed_identity_fails_closed() {
        // Not a valid curve point; verification must return false, not panic.
        let identity = PublicIdentity([0xFF; IDENTITY_LEN]);
        let signature = SignatureBytes([0u8; SIGNATURE_LEN]);
        assert!(!identity.verify(b"anything", &signature));
    }

    #[test]
    fn canonical_encoding_is_stable() {
        let mut out = Vec::new();
        put_u64(&mut out, 0x0102_0304_0506_0708);
        put_i64(&mut out, -1);
        put_bool(&mut out, true);
        put_bool(&mut out, false);
        assert_eq!(
            out,
            [
                0x08, 0x07, 0x06, 0x05, 0x04, 0x03, 0x02, 0x01, // u64 LE
                0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, // -1 as i64 LE
                0x01, 0x00
            ]
        );
    }
}
