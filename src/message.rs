//! Message representation conversions used by encryption and decryption.
//!
//! Bytes become trits three bytes at a time: the 24 bits split into eight
//! 3-bit groups (most significant first) and each group becomes a pair of
//! trits. The pair `(-1, -1)` has no 3-bit preimage.

use ntru_math::Polynomial;
use zeroize::Zeroizing;

/// 3-bit value to trit pair.
const BITS_TO_TRITS: [(i16, i16); 8] =
    [(0, 0), (0, 1), (0, -1), (1, 0), (1, 1), (1, -1), (-1, 0), (-1, 1)];

/// Trit pair to 3-bit value; `8` marks `(-1, -1)` and anything non-ternary.
#[inline]
const fn trits_to_bits(t1: i16, t2: i16) -> u32 {
    const fn digit(t: i16) -> u32 {
        match t {
            0 => 0,
            1 => 1,
            -1 => 2,
            _ => 8,
        }
    }
    let v = 3 * digit(t1) + digit(t2);
    if v > 8 { 8 } else { v }
}

/// Trinomial of length `n` encoding `bin`. Trits past `n` are dropped;
/// coefficients past the end of the input stay zero.
pub(crate) fn binary_to_trinary(n: usize, bin: &[u8]) -> Polynomial {
    let mut p = Polynomial::zero(n);
    let out = p.coeffs_mut();
    for (block, chunk) in bin.chunks(3).enumerate() {
        let base = 16 * block;
        if base >= n {
            break;
        }
        let mut bits = 0u32;
        for (k, &b) in chunk.iter().enumerate() {
            bits |= u32::from(b) << (16 - 8 * k);
        }
        for g in 0..8 {
            let (t1, t2) = BITS_TO_TRITS[((bits >> (21 - 3 * g)) & 7) as usize];
            let i = base + 2 * g;
            if i < n {
                out[i] = t1;
            }
            if i + 1 < n {
                out[i + 1] = t2;
            }
        }
    }
    p
}

/// Inverse of [`binary_to_trinary`], producing `len` bytes.
///
/// Trits missing at the end of `trits` read as zero. The flag is false if
/// any pair had no 3-bit preimage; such pairs decode as `0`.
pub(crate) fn trinary_to_binary(trits: &[i16], len: usize) -> (Zeroizing<Vec<u8>>, bool) {
    let mut out = Zeroizing::new(vec![0u8; len]);
    let mut valid = true;
    for (block, chunk) in out.chunks_mut(3).enumerate() {
        let mut bits = 0u32;
        for g in 0..8 {
            let i = 16 * block + 2 * g;
            let t1 = trits.get(i).copied().unwrap_or(0);
            let t2 = trits.get(i + 1).copied().unwrap_or(0);
            let mut v = trits_to_bits(t1, t2);
            valid &= v < 8;
            v &= 7 * u32::from(v < 8);
            bits = (bits << 3) | v;
        }
        let be = bits.to_be_bytes();
        chunk.copy_from_slice(&be[1..1 + chunk.len()]);
    }
    (out, valid)
}

/// Coefficients mod 4, packed four per byte, first coefficient in the top
/// two bits. A trailing partial byte is zero-filled on the right.
pub(crate) fn pack_mod4(p: &Polynomial) -> Zeroizing<Vec<u8>> {
    Zeroizing::new(
        p.coeffs()
            .chunks(4)
            .map(|group| {
                group
                    .iter()
                    .enumerate()
                    .fold(0u8, |acc, (k, &c)| acc | (((c & 3) as u8) << (6 - 2 * k)))
            })
            .collect(),
    )
}

/// Whether each of `-1`, `0` and `+1` occurs at least `dm0` times.
pub(crate) fn meets_dm0(p: &Polynomial, dm0: usize) -> bool {
    let (ones, neg_ones, rest) = p.trit_counts();
    ones >= dm0 && neg_ones >= dm0 && rest >= dm0
}
