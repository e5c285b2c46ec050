//! `ntru-rs` -- NTRUEncrypt public-key encryption.
//!
//! Implements the SVES encryption scheme of ANSI X9.98 / IEEE P1363.1 over
//! the twelve `ees*` parameter sets, with key generation, encryption,
//! decryption and key blob (de)serialization.
//!
//! ```no_run
//! use ntru_rs::{NtruEncryptKey, ParamSetId, Random};
//! use rand_core::{OsRng, TryRngCore};
//!
//! let mut rng = Random::from_rng(&mut OsRng.unwrap_err());
//! let key = NtruEncryptKey::generate(ParamSetId::Ees401ep1, &mut rng);
//! let ct = key.encrypt(b"hello", &mut rng)?;
//! assert_eq!(key.decrypt(&ct)?, b"hello");
//! # Ok::<(), ntru_rs::Error>(())
//! ```

#![deny(unsafe_code)]
#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

pub mod encoder;
pub mod error;
pub mod key;
mod message;
pub mod params;
pub mod random;

pub use encoder::PrivateKeyFormat;
pub use error::{Error, Result};
pub use key::NtruEncryptKey;
pub use ntru_hash as hash;
pub use ntru_math as math;
pub use params::{KeyParams, ParamSetId};
pub use random::Random;
