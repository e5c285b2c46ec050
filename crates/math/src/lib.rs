//! `ntru-math` -- Core arithmetic for NTRUEncrypt.
//!
//! `no_std` polynomial arithmetic over `Z_m[X]/(X^N-1)` for the dimensions
//! used by the ees* parameter sets. Sub-modules cover fixed-width bit
//! packing, dense polynomial ring operations, inversion modulo a prime and a
//! prime power, and the two trinomial samplers (BPGM3 and MGF-TP-1).

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]
#![allow(
    clippy::cast_lossless,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::many_single_char_names
)]

extern crate alloc;

pub mod inverter;
pub mod pack;
pub mod poly;
pub mod sample;

pub use inverter::PolynomialInverter;
pub use poly::Polynomial;
pub use sample::{ByteSource, IndexSource};
