//! MGF1 mask generation as an unbounded byte stream.

use alloc::{vec, vec::Vec};
use core::fmt;

use ntru_math::ByteSource;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::algorithm::{DigestAlgorithm, MAX_DIGEST_LEN};

/// `H(s || 0) || H(s || 1) || ...` with a big-endian 32-bit counter, where
/// `s` is the seed or, optionally, `H(seed)`.
///
/// The stream records how many times it invoked the hash. [`Mgf1::finish`]
/// tops that up to the configured minimum, so the total work done by a
/// caller does not depend on how many bytes it happened to consume.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Mgf1 {
    #[zeroize(skip)]
    alg: DigestAlgorithm,
    min_runs: u32,
    runs: u32,
    seed_and_counter: Vec<u8>,
    out: [u8; MAX_DIGEST_LEN],
    used: usize,
}

impl Mgf1 {
    #[must_use]
    pub fn new(alg: DigestAlgorithm, min_runs: u32, hash_seed: bool, seed: &[u8]) -> Self {
        let seed_and_counter = if hash_seed {
            let mut sac = vec![0u8; alg.digest_len() + 4];
            alg.digest_into(&[seed], &mut sac[..alg.digest_len()]);
            sac
        } else {
            let mut sac = Vec::with_capacity(seed.len() + 4);
            sac.extend_from_slice(seed);
            sac.extend_from_slice(&[0; 4]);
            sac
        };
        Self {
            alg,
            min_runs,
            runs: 0,
            seed_and_counter,
            out: [0; MAX_DIGEST_LEN],
            used: alg.digest_len(),
        }
    }

    /// Hash invocations so far.
    #[inline]
    #[must_use]
    pub const fn runs(&self) -> u32 {
        self.runs
    }

    /// Run the hash until at least `min_runs` invocations have happened and
    /// return the final count.
    pub fn finish(mut self) -> u32 {
        while self.runs < self.min_runs {
            self.refill();
        }
        self.runs
    }

    pub fn read(&mut self, out: &mut [u8]) {
        let len = self.alg.digest_len();
        let mut filled = 0;
        while filled < out.len() {
            if self.used >= len {
                self.refill();
            }
            let n = (out.len() - filled).min(len - self.used);
            out[filled..filled + n].copy_from_slice(&self.out[self.used..self.used + n]);
            self.used += n;
            filled += n;
        }
    }

    fn refill(&mut self) {
        let len = self.alg.digest_len();
        self.runs += 1;
        self.used = 0;
        self.alg.digest_into(&[&self.seed_and_counter[..]], &mut self.out[..len]);

        // the counter is the trailing 4 bytes; carries never leave it
        let at = self.seed_and_counter.len() - 4;
        let ctr = &mut self.seed_and_counter[at..];
        let next = u32::from_be_bytes([ctr[0], ctr[1], ctr[2], ctr[3]]).wrapping_add(1);
        ctr.copy_from_slice(&next.to_be_bytes());
    }
}

impl ByteSource for Mgf1 {
    #[inline]
    fn fill(&mut self, out: &mut [u8]) {
        self.read(out);
    }
}

impl fmt::Debug for Mgf1 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mgf1")
            .field("alg", &self.alg)
            .field("min_runs", &self.min_runs)
            .field("runs", &self.runs)
            .finish_non_exhaustive()
    }
}
