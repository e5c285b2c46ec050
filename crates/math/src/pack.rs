//! Fixed-width bit packing of small non-negative integers.
//!
//! Every element of a sequence bounded by `max_elt_value` is written with
//! exactly `bits_for(max_elt_value)` bits, most-significant bit first,
//! straddling byte boundaries. The final byte is zero-padded on the right.

use alloc::{vec, vec::Vec};

/// Widest element the packer accepts.
pub const MAX_BITS: u32 = 16;

// ---------------------------------------------------------------------------
// Sizing
// ---------------------------------------------------------------------------

/// Smallest `i` such that `2^i > v`.
#[inline]
#[must_use]
pub const fn count_bits(v: u32) -> u32 {
    u32::BITS - v.leading_zeros()
}

/// Bits used per element for values in `[0, max_elt_value)`.
#[inline]
#[must_use]
pub const fn bits_for(max_elt_value: u32) -> u32 {
    count_bits(max_elt_value.saturating_sub(1))
}

/// Exact packed size in bytes of `num_elts` elements bounded by `max_elt_value`.
#[inline]
#[must_use]
pub const fn packed_len(num_elts: usize, max_elt_value: u32) -> usize {
    (num_elts * bits_for(max_elt_value) as usize).div_ceil(8)
}

// ---------------------------------------------------------------------------
// Pack / unpack
// ---------------------------------------------------------------------------

/// Pack `src` into `out`, writing at most `out.len()` bytes.
///
/// A short `out` receives a prefix of the full encoding; this is how a
/// truncated public key is folded into the encryption seed. Returns the
/// number of bytes written.
///
/// # Panics
///
/// Panics if `max_elt_value` needs more than [`MAX_BITS`] bits.
pub fn pack(max_elt_value: u32, src: &[i16], out: &mut [u8]) -> usize {
    let bits = bits_for(max_elt_value);
    assert!(bits <= MAX_BITS, "element width {bits} exceeds {MAX_BITS} bits");
    let mask = (1u32 << bits) - 1;
    let len = packed_len(src.len(), max_elt_value).min(out.len());

    let mut acc = 0u32;
    let mut acc_bits = 0u32;
    let mut j = 0;
    for &v in src {
        debug_assert!((v as u16 as u32) < max_elt_value.max(1));
        acc = (acc << bits) | (v as u16 as u32 & mask);
        acc_bits += bits;
        while acc_bits >= 8 {
            if j == len {
                return len;
            }
            acc_bits -= 8;
            out[j] = (acc >> acc_bits) as u8;
            acc &= (1 << acc_bits) - 1;
            j += 1;
        }
    }
    if acc_bits > 0 && j < len {
        out[j] = (acc << (8 - acc_bits)) as u8;
        j += 1;
    }
    j
}

/// Pack `src` into a freshly allocated buffer of exactly [`packed_len`] bytes.
#[must_use]
pub fn pack_to_vec(max_elt_value: u32, src: &[i16]) -> Vec<u8> {
    let mut out = vec![0u8; packed_len(src.len(), max_elt_value)];
    pack(max_elt_value, src, &mut out);
    out
}

/// Unpack `out.len()` elements from `src`. Returns the number of bytes read.
///
/// # Panics
///
/// Panics if `src` is shorter than [`packed_len`] for `out.len()` elements or
/// if `max_elt_value` needs more than [`MAX_BITS`] bits.
pub fn unpack(max_elt_value: u32, src: &[u8], out: &mut [i16]) -> usize {
    let bits = bits_for(max_elt_value);
    assert!(bits <= MAX_BITS, "element width {bits} exceeds {MAX_BITS} bits");
    let used = packed_len(out.len(), max_elt_value);
    assert!(src.len() >= used, "need {used} packed bytes, got {}", src.len());
    let mask = (1u32 << bits) - 1;

    let mut bytes = src[..used].iter();
    let mut acc = 0u32;
    let mut acc_bits = 0u32;
    for slot in out.iter_mut() {
        while acc_bits < bits {
            let b = bytes.next().copied().unwrap_or(0);
            acc = (acc << 8) | b as u32;
            acc_bits += 8;
        }
        acc_bits -= bits;
        *slot = ((acc >> acc_bits) & mask) as u16 as i16;
        acc &= (1 << acc_bits) - 1;
    }
    used
}
