//! NTRUEncrypt parameter sets.
//!
//! Twelve fixed sets, all with `p = 3` and `q = 2048`, identified by a
//! three-byte OID. The table is immutable; the polynomial inverter every set
//! shares (mod 2, lifted to 2048) is built on first use.

use core::{fmt, str::FromStr};
use std::sync::LazyLock;

use ntru_hash::DigestAlgorithm;
use ntru_math::{PolynomialInverter, pack};

use crate::error::{Error, Result};

/// Small modulus shared by every parameter set.
pub const P: i32 = 3;
/// Large modulus shared by every parameter set.
pub const Q: i32 = 2048;

/// Bytes in an OID.
pub const OID_LEN: usize = 3;

static INVERTER: LazyLock<PolynomialInverter> = LazyLock::new(|| {
    PolynomialInverter::new(2, Q as u16).unwrap_or_else(|| unreachable!("2048 is a power of 2"))
});

/// Named parameter set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParamSetId {
    Ees401ep1,
    Ees449ep1,
    Ees677ep1,
    Ees1087ep2,
    Ees541ep1,
    Ees613ep1,
    Ees887ep1,
    Ees1171ep1,
    Ees659ep1,
    Ees761ep1,
    Ees1087ep1,
    Ees1499ep1,
}

impl ParamSetId {
    pub const ALL: [Self; 12] = [
        Self::Ees401ep1,
        Self::Ees449ep1,
        Self::Ees677ep1,
        Self::Ees1087ep2,
        Self::Ees541ep1,
        Self::Ees613ep1,
        Self::Ees887ep1,
        Self::Ees1171ep1,
        Self::Ees659ep1,
        Self::Ees761ep1,
        Self::Ees1087ep1,
        Self::Ees1499ep1,
    ];

    #[inline]
    #[must_use]
    pub fn params(self) -> &'static KeyParams {
        &TABLE[self as usize]
    }

    #[inline]
    #[must_use]
    pub fn oid(self) -> [u8; OID_LEN] {
        self.params().oid
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Ees401ep1 => "ees401ep1",
            Self::Ees449ep1 => "ees449ep1",
            Self::Ees677ep1 => "ees677ep1",
            Self::Ees1087ep2 => "ees1087ep2",
            Self::Ees541ep1 => "ees541ep1",
            Self::Ees613ep1 => "ees613ep1",
            Self::Ees887ep1 => "ees887ep1",
            Self::Ees1171ep1 => "ees1171ep1",
            Self::Ees659ep1 => "ees659ep1",
            Self::Ees761ep1 => "ees761ep1",
            Self::Ees1087ep1 => "ees1087ep1",
            Self::Ees1499ep1 => "ees1499ep1",
        }
    }

    /// Look a set up by its OID.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedParamSet`] if no set carries `oid`.
    pub fn from_oid(oid: [u8; OID_LEN]) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|id| id.oid() == oid)
            .ok_or(Error::UnsupportedParamSet(oid))
    }
}

impl fmt::Display for ParamSetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ParamSetId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|id| id.name().eq_ignore_ascii_case(s))
            .ok_or(Error::InvalidArgument("unknown parameter set name"))
    }
}

/// Constants of one parameter set.
///
/// Bit-valued fields (`db`, `pk_len`) are kept in bits, as published; use the
/// accessor methods for byte counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyParams {
    pub id: ParamSetId,
    pub oid: [u8; OID_LEN],
    /// Ring dimension.
    pub n: usize,
    /// Number of `+1` (and of `-1`) coefficients in `F`.
    pub df: usize,
    /// `g` has `dg + 1` coefficients `+1` and `dg` coefficients `-1`.
    pub dg: usize,
    /// Random padding length in bits.
    pub db: usize,
    /// Bytes used to encode the message length.
    pub l_len: usize,
    pub max_msg_len: usize,
    /// Minimum count of each of `-1`, `0`, `+1` in a masked message.
    pub dm0: usize,
    /// Number of `+1` (and of `-1`) coefficients in the blinding value `r`.
    pub dr: usize,
    /// Bits per IGF-2 candidate index.
    pub c: u8,
    /// Minimum hash calls when generating `r`.
    pub min_calls_r: u32,
    /// Minimum hash calls when generating the mask.
    pub min_calls_mask: u32,
    /// Bits of the packed public key folded into the encryption seed.
    pub pk_len: usize,
    pub igf_hash: DigestAlgorithm,
    pub mgf_hash: DigestAlgorithm,
}

impl KeyParams {
    /// Look a set up by OID.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedParamSet`] if no set carries `oid`.
    pub fn from_oid(oid: [u8; OID_LEN]) -> Result<&'static Self> {
        ParamSetId::from_oid(oid).map(ParamSetId::params)
    }

    /// The inverter for `(Z/qZ)[X]/(X^N-1)`, shared by every set.
    #[inline]
    #[must_use]
    pub fn inverter(&self) -> &'static PolynomialInverter {
        &INVERTER
    }

    /// `N` as an IGF-2 bound.
    #[inline]
    pub(crate) const fn index_bound(&self) -> u16 {
        self.n as u16
    }

    #[inline]
    #[must_use]
    pub const fn db_bytes(&self) -> usize {
        self.db / 8
    }

    /// Public-key prefix length folded into the encryption seed.
    #[inline]
    #[must_use]
    pub const fn pk_len_bytes(&self) -> usize {
        self.pk_len / 8
    }

    /// Length of the padded message buffer `b || len || m || 0..`.
    #[inline]
    #[must_use]
    pub const fn padded_msg_len(&self) -> usize {
        self.db_bytes() + self.l_len + self.max_msg_len + 1
    }

    #[inline]
    #[must_use]
    pub const fn max_msg_len(&self) -> usize {
        self.max_msg_len
    }

    /// Bytes of a packed polynomial with coefficients in `[0, q)`.
    #[inline]
    #[must_use]
    pub const fn ciphertext_len(&self) -> usize {
        pack::packed_len(self.n, Q as u32)
    }

    #[inline]
    #[must_use]
    pub const fn public_key_blob_len(&self) -> usize {
        1 + OID_LEN + self.ciphertext_len()
    }

    /// `F` packed five trits per byte.
    #[inline]
    #[must_use]
    pub const fn packed_f_len(&self) -> usize {
        self.n.div_ceil(5)
    }

    /// `F` as bit-packed index lists.
    #[inline]
    #[must_use]
    pub const fn listed_f_len(&self) -> usize {
        pack::packed_len(2 * self.df, self.n as u32)
    }

    /// Whether the default private key encoding lists `F`'s indices rather
    /// than packing its trits.
    #[inline]
    #[must_use]
    pub const fn prefers_listed_f(&self) -> bool {
        self.listed_f_len() < self.packed_f_len()
    }

    /// Size of a private key blob in the default (shorter) encoding.
    #[inline]
    #[must_use]
    pub const fn private_key_blob_len(&self) -> usize {
        let f_len = if self.prefers_listed_f() { self.listed_f_len() } else { self.packed_f_len() };
        self.public_key_blob_len() + f_len
    }
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

#[allow(clippy::too_many_arguments)]
const fn set(
    id: ParamSetId, oid: [u8; OID_LEN], n: usize, df: usize, dg: usize, db: usize,
    max_msg_len: usize, dm0: usize, hash: DigestAlgorithm, c: u8,
    min_calls_r: u32, min_calls_mask: u32,
) -> KeyParams {
    KeyParams {
        id,
        oid,
        n,
        df,
        dg,
        db,
        l_len: 1,
        max_msg_len,
        dm0,
        dr: df,
        c,
        min_calls_r,
        min_calls_mask,
        pk_len: db,
        igf_hash: hash,
        mgf_hash: hash,
    }
}

use DigestAlgorithm::{Sha1, Sha256};
use ParamSetId as Id;

#[rustfmt::skip]
const SETS: [KeyParams; 12] = [
    //   id               oid            N     df   dg   db   max  dm0 hash    c   minR minM
    set(Id::Ees401ep1,  [0, 2, 4],  401,  113, 133, 112,  60, 113, Sha1,   11, 32,  9),
    set(Id::Ees449ep1,  [0, 3, 3],  449,  134, 149, 128,  67, 134, Sha1,    9, 31,  9),
    set(Id::Ees677ep1,  [0, 5, 3],  677,  157, 225, 192, 101, 157, Sha256, 11, 27,  9),
    set(Id::Ees1087ep2, [0, 6, 3], 1087,  120, 362, 256, 170, 120, Sha256, 13, 25, 14),
    set(Id::Ees541ep1,  [0, 2, 5],  541,   49, 180, 112,  86,  49, Sha1,   12, 15, 11),
    set(Id::Ees613ep1,  [0, 3, 4],  613,   55, 204, 128,  97,  55, Sha1,   11, 16, 13),
    set(Id::Ees887ep1,  [0, 5, 4],  887,   81, 295, 192, 141,  81, Sha256, 10, 13, 12),
    set(Id::Ees1171ep1, [0, 6, 4], 1171,  106, 390, 256, 186, 106, Sha256, 12, 20, 15),
    set(Id::Ees659ep1,  [0, 2, 6],  659,   38, 219, 112, 108,  38, Sha1,   11, 11, 14),
    set(Id::Ees761ep1,  [0, 3, 5],  761,   42, 253, 128, 125,  42, Sha1,   12, 13, 16),
    set(Id::Ees1087ep1, [0, 5, 5], 1087,   63, 362, 192, 178,  63, Sha256, 13, 13, 14),
    set(Id::Ees1499ep1, [0, 6, 5], 1499,   79, 499, 256, 247,  79, Sha256, 13, 17, 19),
];

static TABLE: [KeyParams; 12] = SETS;

const _: () = {
    let mut i = 0;
    while i < SETS.len() {
        let kp = &SETS[i];
        assert!(kp.id as usize == i);
        assert!(kp.n < 1 << kp.c);
        assert!(kp.l_len == 1 && kp.max_msg_len < 256);
        assert!(kp.pk_len_bytes() <= kp.ciphertext_len());
        // every byte up to the end of a maximal message maps to trits below N
        assert!(2 * ((8 * (kp.padded_msg_len() - 1) - 1) / 3) + 2 <= kp.n);
        i += 1;
    }
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oid_lookup_round_trips() {
        for id in ParamSetId::ALL {
            assert_eq!(ParamSetId::from_oid(id.oid()), Ok(id));
            assert_eq!(KeyParams::from_oid(id.oid()).map(|kp| kp.id), Ok(id));
            assert_eq!(id.params().id, id);
        }
        assert_eq!(ParamSetId::from_oid([0, 2, 7]), Err(Error::UnsupportedParamSet([0, 2, 7])));
    }

    #[test]
    fn names_parse() {
        for id in ParamSetId::ALL {
            assert_eq!(id.name().parse::<ParamSetId>(), Ok(id));
            assert_eq!(id.to_string(), id.name());
        }
        assert_eq!("EES401EP1".parse::<ParamSetId>(), Ok(ParamSetId::Ees401ep1));
        assert!("ees401".parse::<ParamSetId>().is_err());
    }

    #[test]
    fn published_sizes() {
        let kp = ParamSetId::Ees401ep1.params();
        assert_eq!(kp.ciphertext_len(), 552);
        assert_eq!(kp.public_key_blob_len(), 556);
        assert_eq!(kp.private_key_blob_len(), 637);
        assert_eq!(kp.padded_msg_len(), 76);

        let kp = ParamSetId::Ees1499ep1.params();
        assert_eq!(kp.ciphertext_len(), 2062);
        assert_eq!(kp.public_key_blob_len(), 2066);
        assert_eq!(kp.private_key_blob_len(), 2284);

        let pub_lens: Vec<usize> =
            ParamSetId::ALL.iter().map(|id| id.params().public_key_blob_len()).collect();
        assert_eq!(pub_lens, [556, 622, 935, 1499, 748, 847, 1224, 1615, 911, 1051, 1499, 2066]);
    }

    #[test]
    fn default_private_key_encoding() {
        let listed: Vec<ParamSetId> =
            ParamSetId::ALL.into_iter().filter(|id| id.params().prefers_listed_f()).collect();
        assert_eq!(
            listed,
            [ParamSetId::Ees659ep1, ParamSetId::Ees761ep1, ParamSetId::Ees1087ep1, ParamSetId::Ees1499ep1]
        );
    }

    #[test]
    fn shared_inverter() {
        let a = ParamSetId::Ees401ep1.params().inverter();
        let b = ParamSetId::Ees1499ep1.params().inverter();
        assert!(core::ptr::eq(a, b));
        assert_eq!(a.prime(), 2);
        assert_eq!(a.modulus(), Q);
    }
}
