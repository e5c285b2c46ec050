//! Trinomial sampling: pull-based byte and index sources, BPGM3 and MGF-TP-1.
//!
//! A trinomial has every coefficient in `{-1, 0, 1}`. [`bpgm3`] places an
//! exact number of `+1` and `-1` coefficients at positions drawn from an
//! [`IndexSource`]. [`gen_trinomial`] expands a [`ByteSource`] into trits, five
//! per byte, and [`encode_trinomial`] is its inverse.

use alloc::{vec, vec::Vec};

use crate::poly::Polynomial;

/// Bytes at or above this value cannot carry five uniform trits (`3^5`).
pub const TRIT_BYTE_LIMIT: u8 = 243;

/// An unbounded, deterministic byte stream.
pub trait ByteSource {
    /// Fill `out` with the next `out.len()` bytes of the stream.
    fn fill(&mut self, out: &mut [u8]);

    fn next_byte(&mut self) -> u8 {
        let mut b = [0u8; 1];
        self.fill(&mut b);
        b[0]
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    #[inline]
    fn fill(&mut self, out: &mut [u8]) {
        (**self).fill(out);
    }
}

/// Reads consume the front of the slice.
///
/// # Panics
///
/// Panics when a read asks for more bytes than remain.
impl ByteSource for &[u8] {
    fn fill(&mut self, out: &mut [u8]) {
        assert!(out.len() <= self.len(), "byte source exhausted");
        let (head, tail) = self.split_at(out.len());
        out.copy_from_slice(head);
        *self = tail;
    }
}

/// A stream of indices, each below a fixed bound.
pub trait IndexSource {
    fn next_index(&mut self) -> usize;
}

impl<S: IndexSource + ?Sized> IndexSource for &mut S {
    #[inline]
    fn next_index(&mut self) -> usize {
        (**self).next_index()
    }
}

// -- BPGM3 -------------------------------------------------------------------

/// Trinomial of length `n` with exactly `num_ones` coefficients equal to `+1`
/// and `num_neg_ones` equal to `-1`.
///
/// Positions are drawn from `igf`; a draw that hits an already-set position
/// is discarded and does not count.
///
/// # Panics
///
/// Panics if `num_ones + num_neg_ones > n`, or if `igf` yields an index
/// `>= n`.
#[must_use]
pub fn bpgm3(
    n: usize, num_ones: usize, num_neg_ones: usize, igf: &mut impl IndexSource,
) -> Polynomial {
    assert!(num_ones + num_neg_ones <= n, "cannot place {num_ones}+{num_neg_ones} trits in {n}");
    let mut p = Polynomial::zero(n);
    let coeffs = p.coeffs_mut();
    for (count, value) in [(num_ones, 1i16), (num_neg_ones, -1i16)] {
        let mut placed = 0;
        while placed < count {
            let i = igf.next_index();
            if coeffs[i] != 0 {
                continue;
            }
            coeffs[i] = value;
            placed += 1;
        }
    }
    p
}

// -- MGF-TP-1 ----------------------------------------------------------------

#[inline]
const fn digit_to_trit(d: u8) -> i16 {
    if d == 2 { -1 } else { d as i16 }
}

#[inline]
const fn trit_to_digit(t: i16) -> u8 {
    if t == -1 { 2 } else { t as u8 }
}

/// Expand a byte into up to `out.len()` trits, least significant digit first.
fn expand_byte(mut b: u8, out: &mut [i16]) {
    for t in out {
        *t = digit_to_trit(b % 3);
        b /= 3;
    }
}

/// Trinomial of length `n` from a byte stream.
///
/// Each byte below [`TRIT_BYTE_LIMIT`] yields five trits (base-3 digits,
/// least significant first, digit `2` read as `-1`); larger bytes are
/// skipped. The final byte is truncated at `n`.
#[must_use]
pub fn gen_trinomial(n: usize, src: &mut impl ByteSource) -> Polynomial {
    let mut p = Polynomial::zero(n);
    let coeffs = p.coeffs_mut();
    let mut i = 0;
    while i < n {
        let b = src.next_byte();
        if b >= TRIT_BYTE_LIMIT {
            continue;
        }
        let end = (i + 5).min(n);
        expand_byte(b, &mut coeffs[i..end]);
        i = end;
    }
    p
}

/// Pack trits five per byte, the inverse of [`gen_trinomial`].
///
/// A trailing group shorter than five trits still takes one byte.
#[must_use]
pub fn encode_trinomial(poly: &Polynomial) -> Vec<u8> {
    poly.coeffs()
        .chunks(5)
        .map(|group| group.iter().rev().fold(0u8, |acc, &t| acc * 3 + trit_to_digit(t)))
        .collect()
}

/// Strict decoding of [`encode_trinomial`] output.
///
/// Unlike [`gen_trinomial`] nothing is skipped: returns `None` unless
/// `bytes` holds exactly `ceil(n / 5)` bytes, each below [`TRIT_BYTE_LIMIT`].
#[must_use]
pub fn decode_trinomial(n: usize, bytes: &[u8]) -> Option<Polynomial> {
    if bytes.len() != n.div_ceil(5) || bytes.iter().any(|&b| b >= TRIT_BYTE_LIMIT) {
        return None;
    }
    let mut coeffs = vec![0i16; n];
    for (chunk, &b) in coeffs.chunks_mut(5).zip(bytes) {
        expand_byte(b, chunk);
    }
    Some(Polynomial::from_coeffs(coeffs))
}
