//! ANSI X9.82 Hash_DRBG.
//!
//! State is a seed vector `V` (its length is fixed by the seed material), a
//! constant `C = H(t || V)` for a fixed 64-byte tag `t`, and a counter.
//! Each [`HashDrbg::read`] hashes successive increments of `V` and then
//! folds `C`, the leading output bytes and the counter back into `V`.

use alloc::{vec, vec::Vec};
use core::fmt;

use ntru_math::ByteSource;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::algorithm::{DigestAlgorithm, MAX_DIGEST_LEN};

/// Domain tag hashed in front of `V` when deriving `C`. Only the first
/// `digest_len` bytes are used.
const TAG: [u8; 64] = [
    0xcf, 0x83, 0xe1, 0x35, 0x7e, 0xef, 0xb8, 0xbd, 0xf1, 0x54, 0x28, 0x50, 0xd6, 0x6d, 0x80, 0x07,
    0xd6, 0x20, 0xe4, 0x05, 0x0b, 0x57, 0x15, 0xdc, 0x83, 0xf4, 0xa9, 0x21, 0xd3, 0x6c, 0xe9, 0xce,
    0x47, 0xd0, 0xd1, 0x3c, 0x5d, 0x85, 0xf2, 0xb0, 0xff, 0x83, 0x18, 0xd2, 0x87, 0x7e, 0xec, 0x2f,
    0x63, 0xb9, 0x31, 0xbd, 0x47, 0x41, 0x7a, 0x81, 0xa5, 0x38, 0x32, 0x7a, 0xf9, 0x27, 0xda, 0x3e,
];

const _: () = assert!(TAG.len() >= MAX_DIGEST_LEN);

/// Deterministic hash-based generator. State is zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct HashDrbg {
    #[zeroize(skip)]
    alg: DigestAlgorithm,
    v: Vec<u8>,
    c: Vec<u8>,
    ctr: u32,
}

impl HashDrbg {
    /// Instantiate from `seed`; `V` takes the length of `seed`.
    ///
    /// # Panics
    ///
    /// Panics if `seed` is empty.
    #[must_use]
    pub fn new(alg: DigestAlgorithm, seed: &[u8]) -> Self {
        let mut drbg = Self { alg, v: Vec::new(), c: vec![0; alg.digest_len()], ctr: 1 };
        drbg.seed(seed);
        drbg
    }

    #[inline]
    #[must_use]
    pub const fn algorithm(&self) -> DigestAlgorithm {
        self.alg
    }

    /// Discard all state and start over from `seed`.
    ///
    /// # Panics
    ///
    /// Panics if `seed` is empty.
    pub fn seed(&mut self, seed: &[u8]) {
        assert!(!seed.is_empty(), "Hash_DRBG seed must not be empty");
        self.v.zeroize();
        self.v = seed.to_vec();
        self.ctr = 1;
        self.derive_c();
    }

    /// Fold fresh entropy into the state.
    ///
    /// The new `V` is `H(V || entropy || 0x01)`, `H` of that input plus one,
    /// and so on, cut to `entropy.len()` bytes. The old `V` is wiped.
    ///
    /// # Panics
    ///
    /// Panics if `entropy` is empty.
    pub fn reseed(&mut self, entropy: &[u8]) {
        assert!(!entropy.is_empty(), "Hash_DRBG reseed input must not be empty");
        let mut tmp = Zeroizing::new(Vec::with_capacity(self.v.len() + entropy.len() + 1));
        tmp.extend_from_slice(&self.v);
        tmp.extend_from_slice(entropy);
        tmp.push(1);

        let mut new_v = vec![0u8; entropy.len()];
        for chunk in new_v.chunks_mut(self.alg.digest_len()) {
            self.alg.digest_into(&[&tmp[..]], chunk);
            add_word(&mut tmp, 1);
        }

        self.v.zeroize();
        self.v = new_v;
        self.ctr = 1;
        self.derive_c();
    }

    /// Fill `out` with the next `out.len()` bytes and advance the state.
    pub fn read(&mut self, out: &mut [u8]) {
        self.hash_gen(out);

        let v = &mut self.v;
        add_truncated(v, &self.c);
        let folded = out.len().min(v.len());
        add_truncated(v, &out[..folded]);
        add_word(v, self.ctr);
        self.ctr = self.ctr.wrapping_add(1);
    }

    fn hash_gen(&self, out: &mut [u8]) {
        let mut data = Zeroizing::new(self.v.clone());
        for chunk in out.chunks_mut(self.alg.digest_len()) {
            self.alg.digest_into(&[&data[..]], chunk);
            add_word(&mut data, 1);
        }
    }

    fn derive_c(&mut self) {
        let len = self.alg.digest_len();
        self.c.resize(len, 0);
        self.alg.digest_into(&[&TAG[..len], &self.v[..]], &mut self.c);
    }
}

impl ByteSource for HashDrbg {
    #[inline]
    fn fill(&mut self, out: &mut [u8]) {
        self.read(out);
    }
}

impl fmt::Debug for HashDrbg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashDrbg")
            .field("alg", &self.alg)
            .field("seed_len", &self.v.len())
            .finish_non_exhaustive()
    }
}

// -- big-endian arithmetic -----------------------------------------------------

/// `acc += addend`, both big-endian and right-aligned. Carries past the
/// shorter operand are dropped.
fn add_truncated(acc: &mut [u8], addend: &[u8]) {
    let mut carry = 0u16;
    for (a, &b) in acc.iter_mut().rev().zip(addend.iter().rev()) {
        let sum = u16::from(*a) + u16::from(b) + carry;
        *a = sum as u8;
        carry = sum >> 8;
    }
}

/// `acc += x` over the full width of `acc`, modulo `2^(8 * acc.len())`.
fn add_word(acc: &mut [u8], x: u32) {
    let mut x = x;
    let mut carry = 0u32;
    for a in acc.iter_mut().rev() {
        let sum = u32::from(*a) + (x & 0xff) + carry;
        *a = sum as u8;
        carry = sum >> 8;
        x >>= 8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    const SHA1_SEED: &[u8; 20] = b"abcdefghijklmnopqrst";
    const SHA1_ANS: [u8; 80] = hex!(
        "14a23ad70f2a5dd725575de6c43e1cdd8b15e3e5"
        "0b661653a3612bdd8ec46128908b9ad4bbad9922"
        "e15b1aa845fc1109a6fcda179b8d5f19b85b1b3b"
        "ae970b2db9f646e8d5345061595fe444ef60b335"
    );

    #[test]
    fn add_word_carries_through() {
        let mut v = [0x00, 0xff, 0xff];
        add_word(&mut v, 1);
        assert_eq!(v, [0x01, 0x00, 0x00]);

        let mut v = [0xff, 0xff];
        add_word(&mut v, 0x0102);
        assert_eq!(v, [0x01, 0x01]);
    }

    #[test]
    fn add_truncated_drops_high_carry() {
        let mut v = [0x01, 0xff, 0xff];
        add_truncated(&mut v, &[0x00, 0x01]);
        assert_eq!(v, [0x01, 0x00, 0x00]);

        let mut v = [0xff];
        add_truncated(&mut v, &[0x01, 0x01]);
        assert_eq!(v, [0x00]);
    }

    #[test]
    fn sha1_first_read_prefixes() {
        for len in [19, 20, 80] {
            let mut drbg = HashDrbg::new(DigestAlgorithm::Sha1, SHA1_SEED);
            let mut out = vec![0u8; len];
            drbg.read(&mut out);
            assert_eq!(out, SHA1_ANS[..len], "read of {len} bytes");
        }
    }

    #[test]
    fn sha1_second_read() {
        let mut drbg = HashDrbg::new(DigestAlgorithm::Sha1, SHA1_SEED);
        let mut out = [0u8; 20];
        drbg.read(&mut out);
        drbg.read(&mut out);
        assert_eq!(out, hex!("7f6dab7ce676e7228e68aaad249dac21c55ba8f1"));
    }

    #[test]
    fn sha1_reseed() {
        let mut drbg = HashDrbg::new(DigestAlgorithm::Sha1, SHA1_SEED);
        let mut out = [0u8; 20];
        drbg.read(&mut out);
        let entropy: [u8; 20] = core::array::from_fn(|i| i as u8);
        drbg.reseed(&entropy);
        drbg.read(&mut out);
        assert_eq!(out, hex!("55778d2b573b041e1b861bebadf43856e33b308f"));
    }

    #[test]
    fn seed_resets_state() {
        let mut drbg = HashDrbg::new(DigestAlgorithm::Sha1, b"unrelated seed");
        let mut out = [0u8; 80];
        drbg.read(&mut out);
        drbg.seed(SHA1_SEED);
        drbg.read(&mut out);
        assert_eq!(out, SHA1_ANS);
    }

    #[test]
    fn short_seed_still_advances() {
        let mut drbg = HashDrbg::new(DigestAlgorithm::Sha256, &[7u8; 4]);
        let mut a = [0u8; 40];
        let mut b = [0u8; 40];
        drbg.read(&mut a);
        drbg.read(&mut b);
        assert_ne!(a, b);
        assert_ne!(a[..20], a[20..]);
    }

    #[test]
    #[should_panic(expected = "must not be empty")]
    fn empty_seed_panics() {
        let _ = HashDrbg::new(DigestAlgorithm::Sha256, &[]);
    }

    #[test]
    fn debug_is_redacted() {
        let drbg = HashDrbg::new(DigestAlgorithm::Sha1, SHA1_SEED);
        let s = format!("{drbg:?}");
        assert!(s.contains("seed_len: 20"));
        assert!(!s.contains("abcdef"));
    }
}
