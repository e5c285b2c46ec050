//! Error type for key handling, encryption and decryption.

use thiserror::Error;

/// Errors surfaced by the public API.
///
/// Every cryptographic check made while decrypting collapses into
/// [`Error::DecryptionFailure`]; callers learn that decryption failed, never
/// which check rejected the ciphertext.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// A caller-supplied argument violates a precondition.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The key blob tag is not one this crate understands.
    #[error("unsupported key blob format tag {0:#04x}")]
    UnsupportedFormat(u8),

    /// The OID does not name a known parameter set.
    #[error("unsupported parameter set OID {}", dotted(.0))]
    UnsupportedParamSet([u8; 3]),

    /// The key blob is truncated, overlong or carries malformed key material.
    #[error("malformed key blob")]
    InvalidKeyBlob,

    #[error("ciphertext length invalid: expected {expected}, got {actual}")]
    CiphertextBadLength { expected: usize, actual: usize },

    #[error("plaintext too long: at most {max} bytes, got {actual}")]
    PlaintextBadLength { max: usize, actual: usize },

    #[error("decryption failure")]
    DecryptionFailure,

    /// The key was closed and can no longer be used.
    #[error("key object is closed")]
    ObjectClosed,

    /// The operation needs the private key, but only the public key is held.
    #[error("no private key available")]
    NoPrivateKey,
}

pub type Result<T> = core::result::Result<T, Error>;

fn dotted(oid: &[u8; 3]) -> String {
    format!("{:02x}.{:02x}.{:02x}", oid[0], oid[1], oid[2])
}
