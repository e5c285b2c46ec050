//! The closed set of digests used by the parameter sets.

use sha1::Sha1;
use sha2::{Digest, Sha256};
use zeroize::Zeroize;

/// Largest digest output among [`DigestAlgorithm`] variants.
pub const MAX_DIGEST_LEN: usize = 32;

/// Hash function selector for MGF1, IGF-2 and the DRBG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DigestAlgorithm {
    Sha1,
    Sha256,
}

impl DigestAlgorithm {
    /// Output length in bytes.
    #[inline]
    #[must_use]
    pub const fn digest_len(self) -> usize {
        match self {
            Self::Sha1 => 20,
            Self::Sha256 => 32,
        }
    }

    /// Compression-function block length in bytes.
    #[inline]
    #[must_use]
    pub const fn block_len(self) -> usize {
        64
    }

    /// Hash the concatenation of `parts` and write the first `out.len()`
    /// bytes of the digest to `out`.
    ///
    /// # Panics
    ///
    /// Panics if `out` is longer than [`Self::digest_len`].
    pub fn digest_into(self, parts: &[&[u8]], out: &mut [u8]) {
        assert!(out.len() <= self.digest_len(), "digest output too long");
        match self {
            Self::Sha1 => run::<Sha1>(parts, out),
            Self::Sha256 => run::<Sha256>(parts, out),
        }
    }
}

fn run<D: Digest>(parts: &[&[u8]], out: &mut [u8]) {
    let mut hasher = D::new();
    for part in parts {
        hasher.update(part);
    }
    let mut digest = hasher.finalize();
    out.copy_from_slice(&digest[..out.len()]);
    digest.as_mut_slice().zeroize();
}
