//! IGF-2 index generation.

use core::fmt;

use ntru_math::{ByteSource, IndexSource};
use zeroize::Zeroizing;

use crate::{algorithm::DigestAlgorithm, mgf::Mgf1};

/// Uniform indices in `[0, max)` drawn from a byte stream.
///
/// Bytes are consumed most-significant bit first and cut into `bits`-wide
/// candidates. Candidates at or above the largest multiple of `max` that
/// fits in `bits` bits are rejected; the rest are reduced modulo `max`.
/// Bits left over from one candidate carry into the next.
pub struct Igf2<S> {
    max: u32,
    bits: u32,
    cutoff: u32,
    leftover: Zeroizing<u32>,
    num_leftover: u32,
    src: S,
}

impl<S: ByteSource> Igf2<S> {
    /// # Panics
    ///
    /// Panics unless `1 <= bits <= 16` and `1 <= max <= 2^bits`.
    #[must_use]
    pub fn new(max: u16, bits: u8, src: S) -> Self {
        let bits = u32::from(bits);
        let max = u32::from(max);
        assert!((1..=16).contains(&bits), "IGF-2 index width must be 1..=16 bits");
        let modulus = 1u32 << bits;
        assert!(max >= 1 && max <= modulus, "IGF-2 bound {max} does not fit in {bits} bits");
        Self {
            max,
            bits,
            cutoff: modulus - modulus % max,
            leftover: Zeroizing::new(0),
            num_leftover: 0,
            src,
        }
    }

    #[must_use]
    pub fn into_inner(self) -> S {
        self.src
    }
}

impl Igf2<Mgf1> {
    /// IGF-2 over `MGF1(alg, hash_seed = true, seed)`.
    #[must_use]
    pub fn from_seed(max: u16, bits: u8, alg: DigestAlgorithm, min_runs: u32, seed: &[u8]) -> Self {
        Self::new(max, bits, Mgf1::new(alg, min_runs, true, seed))
    }

    /// Finish the underlying MGF1 stream, returning its hash count.
    pub fn finish(self) -> u32 {
        self.src.finish()
    }
}

impl<S: ByteSource> IndexSource for Igf2<S> {
    fn next_index(&mut self) -> usize {
        loop {
            while self.num_leftover < self.bits {
                *self.leftover = (*self.leftover << 8) | u32::from(self.src.next_byte());
                self.num_leftover += 8;
            }
            let shift = self.num_leftover - self.bits;
            let candidate = (*self.leftover >> shift) & 0xffff;
            self.num_leftover = shift;
            *self.leftover &= (1 << shift) - 1;

            if candidate < self.cutoff {
                return (candidate % self.max) as usize;
            }
        }
    }
}

impl<S: fmt::Debug> fmt::Debug for Igf2<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Igf2")
            .field("max", &self.max)
            .field("bits", &self.bits)
            .field("src", &self.src)
            .finish_non_exhaustive()
    }
}
