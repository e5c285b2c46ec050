//! Deterministic random source for key generation and encryption.

use core::fmt;

use ntru_hash::{ByteSource, DigestAlgorithm, HashDrbg};
use rand_core::{CryptoRng, RngCore, impls};
use zeroize::Zeroizing;

use crate::error::{Error, Result};

/// Seed length drawn by [`Random::from_rng`].
pub const SEED_LEN: usize = 32;

/// A SHA-256 Hash_DRBG.
///
/// Every [`read`](Self::read) is exactly one DRBG generate call of the
/// requested length, so the stream depends on how reads are chunked: a
/// single 80-byte read and two 40-byte reads give different bytes. Key
/// generation pulls one byte per read and encryption pulls the padding in
/// one read. Implements [`RngCore`] + [`CryptoRng`], so it can be passed
/// anywhere this crate takes a random number generator.
pub struct Random {
    drbg: HashDrbg,
}

impl Random {
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `seed` is empty.
    pub fn new(seed: &[u8]) -> Result<Self> {
        check_seed(seed)?;
        Ok(Self { drbg: HashDrbg::new(DigestAlgorithm::Sha256, seed) })
    }

    /// Seed from another generator, typically the operating system's.
    pub fn from_rng(rng: &mut impl CryptoRng) -> Self {
        let mut seed = Zeroizing::new([0u8; SEED_LEN]);
        rng.fill_bytes(&mut *seed);
        Self { drbg: HashDrbg::new(DigestAlgorithm::Sha256, &*seed) }
    }

    /// Replace all state with a fresh instantiation from `seed`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `seed` is empty.
    pub fn seed(&mut self, seed: &[u8]) -> Result<()> {
        check_seed(seed)?;
        self.drbg.seed(seed);
        Ok(())
    }

    /// Mix `entropy` into the current state.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `entropy` is empty.
    pub fn reseed(&mut self, entropy: &[u8]) -> Result<()> {
        check_seed(entropy)?;
        self.drbg.reseed(entropy);
        Ok(())
    }

    #[inline]
    pub fn read(&mut self, out: &mut [u8]) {
        self.drbg.read(out);
    }
}

fn check_seed(seed: &[u8]) -> Result<()> {
    if seed.is_empty() {
        return Err(Error::InvalidArgument("seed must not be empty"));
    }
    Ok(())
}

impl RngCore for Random {
    fn next_u32(&mut self) -> u32 {
        impls::next_u32_via_fill(self)
    }

    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_fill(self)
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        self.read(dst);
    }
}

impl CryptoRng for Random {}

impl ByteSource for Random {
    #[inline]
    fn fill(&mut self, out: &mut [u8]) {
        self.read(out);
    }
}

impl fmt::Debug for Random {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Random").finish_non_exhaustive()
    }
}

/// Adapts any [`RngCore`] to the samplers' [`ByteSource`].
pub(crate) struct RngSource<'a, R: ?Sized>(pub(crate) &'a mut R);

impl<R: RngCore + ?Sized> ByteSource for RngSource<'_, R> {
    #[inline]
    fn fill(&mut self, out: &mut [u8]) {
        self.0.fill_bytes(out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    const SEED: [u8; 32] = hex!("e3b201a9f5b71a7a9b1ceaeccd97e70b6176aad9a4428aa5484392fbc1b09951");
    const ANS_80_1: [u8; 80] = hex!(
        "1abf2eb1cb32a8f5fb4bddef8f70c620c7477ed97aabf58781d682bcf3a25871"
        "a17b37a4a45b17cd4bb55b2e95c0b4bcdabc50d00f3808870dfe7a960270791e"
        "89ff93b60f21cc27f1cc48d0c86f49d1"
    );
    const ANS_80_2: [u8; 80] = hex!(
        "3f3add7014bd7190f1755be22599b6c9c90195be2748710b8b9ed487368fe758"
        "38e440b39985039a21da07eedfdc6fa97f2af6932d119a6b1f2affac7e14a81b"
        "3c8a4fb10798e49406f368a341fa0cd3"
    );
    const RESEED_1: [u8; 32] = hex!("d2a1f0e051ea5f62081a7792073d593d1fc64fbf7162015b4dac255d48494a4b");
    const ANS_80_R1: [u8; 80] = hex!(
        "40deead74875dec8a2c39fee65e42f48fbae3d26da0c5eeeaf3f43eff79d9437"
        "697f3c8f7db63b00ce4f763e5a0c7805935b32a5746c313c9004407eaadbf7e9"
        "771d45500eb786d63e6938b55063bd54"
    );

    #[test]
    fn known_answer_80_byte_reads() {
        let mut r = Random::new(&SEED).unwrap();
        let mut out = [0u8; 80];
        r.read(&mut out);
        assert_eq!(out, ANS_80_1);
        r.read(&mut out);
        assert_eq!(out, ANS_80_2);
        r.reseed(&RESEED_1).unwrap();
        r.read(&mut out);
        assert_eq!(out, ANS_80_R1);
    }

    #[test]
    fn each_read_is_one_generate_call() {
        let mut r = Random::new(&SEED).unwrap();
        let mut drbg = HashDrbg::new(DigestAlgorithm::Sha256, &SEED);
        for len in [1, 1, 17, 80, 3] {
            let mut got = vec![0u8; len];
            let mut expected = vec![0u8; len];
            r.read(&mut got);
            drbg.read(&mut expected);
            assert_eq!(got, expected, "read of {len} bytes");
        }

        let mut split = Random::new(&SEED).unwrap();
        let mut halves = [0u8; 80];
        split.read(&mut halves[..40]);
        split.read(&mut halves[40..]);
        assert_eq!(halves[..40], ANS_80_1[..40]);
        assert_ne!(halves[40..], ANS_80_1[40..]);
    }

    #[test]
    fn seed_restarts_stream() {
        let mut r = Random::new(b"something else").unwrap();
        let _ = r.next_u64();
        r.seed(&SEED).unwrap();
        let mut out = [0u8; 80];
        r.fill_bytes(&mut out);
        assert_eq!(out, ANS_80_1);
    }

    #[test]
    fn empty_seed_rejected() {
        assert_eq!(Random::new(&[]).err(), Some(Error::InvalidArgument("seed must not be empty")));
        let mut r = Random::new(&SEED).unwrap();
        assert!(r.seed(&[]).is_err());
        assert!(r.reseed(&[]).is_err());
    }

    #[test]
    fn from_rng_is_seeded_by_source() {
        let mut src = Random::new(&SEED).unwrap();
        let mut a = Random::from_rng(&mut src);
        let mut b = Random::new(&ANS_80_1[..SEED_LEN]).unwrap();
        assert_eq!(a.next_u64(), b.next_u64());
    }
}
