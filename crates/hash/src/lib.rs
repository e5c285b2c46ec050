//! `ntru-hash` -- Hash-driven byte streams for NTRUEncrypt.
//!
//! Every stream here is a deterministic function of its seed and one of the
//! two supported digests ([`DigestAlgorithm`]):
//!
//! - [`HashDrbg`]: the ANSI X9.82 Hash_DRBG used for key and padding
//!   randomness. A read of any length is a single generate call.
//! - [`Mgf1`]: `H(seed || 0) || H(seed || 1) || ...` with a minimum number
//!   of hash invocations.
//! - [`Igf2`]: unbiased indices in `[0, M)` cut from any byte stream by
//!   rejection sampling.
//!
//! All of them implement [`ntru_math::ByteSource`] (IGF-2 implements
//! [`ntru_math::IndexSource`]) so the samplers in `ntru-math` can consume
//! them directly.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]
#![allow(clippy::cast_possible_truncation)]

extern crate alloc;

mod algorithm;
mod drbg;
mod igf;
mod mgf;

pub use algorithm::{DigestAlgorithm, MAX_DIGEST_LEN};
pub use drbg::HashDrbg;
pub use igf::Igf2;
pub use mgf::Mgf1;
pub use ntru_math::{ByteSource, IndexSource};
