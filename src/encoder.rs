//! Key blob encoding.
//!
//! ```text
//! public:  01 || OID || pack(h)
//! private: tag || OID || pack(h) || F
//! ```
//!
//! `h` is packed with 11 bits per coefficient. The private key stores `F`
//! (where `f = 1 + 3F`) either as five trits per byte or as the bit-packed
//! positions of its `+1` coefficients followed by those of its `-1`
//! coefficients. Tag `02` means "whichever is shorter for this parameter
//! set"; `FE` and `FF` name the packed and listed forms explicitly.

use ntru_math::{Polynomial, pack, sample};
use zeroize::Zeroizing;

use crate::{
    error::{Error, Result},
    params::{KeyParams, OID_LEN, P, Q},
};

const TAG_PUBLIC: u8 = 0x01;
const TAG_PRIVATE_DEFAULT: u8 = 0x02;
const TAG_PRIVATE_PACKED_F: u8 = 0xfe;
const TAG_PRIVATE_LISTED_F: u8 = 0xff;

const HEADER_LEN: usize = 1 + OID_LEN;

/// Encoding of `F` inside a private key blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrivateKeyFormat {
    /// Five trits per byte.
    Packed,
    /// Positions of the `+1` then `-1` coefficients.
    Listed,
}

impl PrivateKeyFormat {
    /// Shorter of the two encodings for `kp`.
    #[must_use]
    pub const fn default_for(kp: &KeyParams) -> Self {
        if kp.prefers_listed_f() { Self::Listed } else { Self::Packed }
    }

    const fn tag(self) -> u8 {
        match self {
            Self::Packed => TAG_PRIVATE_PACKED_F,
            Self::Listed => TAG_PRIVATE_LISTED_F,
        }
    }
}

/// Fields recovered from a blob.
pub(crate) struct RawKey {
    pub(crate) params: &'static KeyParams,
    pub(crate) h: Polynomial,
    pub(crate) f: Option<Polynomial>,
}

pub(crate) fn encode_public(kp: &KeyParams, h: &Polynomial) -> Vec<u8> {
    let mut out = Vec::with_capacity(kp.public_key_blob_len());
    push_header(&mut out, TAG_PUBLIC, kp);
    push_h(&mut out, kp, h);
    out
}

/// `format: None` writes the default tag and the shorter encoding.
pub(crate) fn encode_private(
    kp: &KeyParams, h: &Polynomial, f: &Polynomial, format: Option<PrivateKeyFormat>,
) -> Zeroizing<Vec<u8>> {
    let (tag, format) = match format {
        Some(format) => (format.tag(), format),
        None => (TAG_PRIVATE_DEFAULT, PrivateKeyFormat::default_for(kp)),
    };
    let big_f = recover_f(f);
    let mut out = Zeroizing::new(Vec::with_capacity(kp.public_key_blob_len() + kp.packed_f_len()));
    push_header(&mut out, tag, kp);
    push_h(&mut out, kp, h);
    match format {
        PrivateKeyFormat::Packed => {
            out.extend_from_slice(&Zeroizing::new(sample::encode_trinomial(&big_f)));
        }
        PrivateKeyFormat::Listed => out.extend_from_slice(&list_indices(kp, &big_f)),
    }
    out
}

pub(crate) fn decode(blob: &[u8]) -> Result<RawKey> {
    let (&tag, rest) = blob.split_first().ok_or(Error::InvalidKeyBlob)?;
    if !matches!(tag, TAG_PUBLIC | TAG_PRIVATE_DEFAULT | TAG_PRIVATE_PACKED_F | TAG_PRIVATE_LISTED_F) {
        return Err(Error::UnsupportedFormat(tag));
    }
    let oid: [u8; OID_LEN] = rest
        .get(..OID_LEN)
        .and_then(|s| s.try_into().ok())
        .ok_or(Error::InvalidKeyBlob)?;
    let kp = KeyParams::from_oid(oid)?;
    let format = match tag {
        TAG_PUBLIC => None,
        TAG_PRIVATE_DEFAULT => Some(PrivateKeyFormat::default_for(kp)),
        TAG_PRIVATE_PACKED_F => Some(PrivateKeyFormat::Packed),
        TAG_PRIVATE_LISTED_F => Some(PrivateKeyFormat::Listed),
        _ => unreachable!("tag checked above"),
    };

    let body = &blob[HEADER_LEN..];
    let h_len = kp.ciphertext_len();
    let f_len = match format {
        None => 0,
        Some(PrivateKeyFormat::Packed) => kp.packed_f_len(),
        Some(PrivateKeyFormat::Listed) => kp.listed_f_len(),
    };
    if body.len() != h_len + f_len {
        return Err(Error::InvalidKeyBlob);
    }
    let (h_bytes, f_bytes) = body.split_at(h_len);

    let mut h = Polynomial::zero(kp.n);
    pack::unpack(Q as u32, h_bytes, h.coeffs_mut());

    let big_f = match format {
        None => None,
        Some(PrivateKeyFormat::Packed) => {
            Some(sample::decode_trinomial(kp.n, f_bytes).ok_or(Error::InvalidKeyBlob)?)
        }
        Some(PrivateKeyFormat::Listed) => Some(unlist_indices(kp, f_bytes)?),
    };
    let f = big_f.map(|big_f| lift_f(&big_f));
    Ok(RawKey { params: kp, h, f })
}

// -- helpers -----------------------------------------------------------------

fn push_header(out: &mut Vec<u8>, tag: u8, kp: &KeyParams) {
    out.push(tag);
    out.extend_from_slice(&kp.oid);
}

fn push_h(out: &mut Vec<u8>, kp: &KeyParams, h: &Polynomial) {
    let start = out.len();
    out.resize(start + kp.ciphertext_len(), 0);
    pack::pack(Q as u32, h.coeffs(), &mut out[start..]);
}

/// `F` from `f = 1 + pF`.
fn recover_f(f: &Polynomial) -> Polynomial {
    let mut big_f = f.clone();
    let coeffs = big_f.coeffs_mut();
    if let Some(c0) = coeffs.first_mut() {
        *c0 -= 1;
    }
    for c in coeffs.iter_mut() {
        *c /= P as i16;
    }
    big_f
}

/// `f = 1 + pF`, coefficients left unreduced.
pub(crate) fn lift_f(big_f: &Polynomial) -> Polynomial {
    let mut f = big_f.clone();
    let coeffs = f.coeffs_mut();
    for c in coeffs.iter_mut() {
        *c *= P as i16;
    }
    if let Some(c0) = coeffs.first_mut() {
        *c0 += 1;
    }
    f
}

fn list_indices(kp: &KeyParams, big_f: &Polynomial) -> Zeroizing<Vec<u8>> {
    let mut indices = Zeroizing::new(Vec::with_capacity(2 * kp.df));
    for want in [1, -1] {
        indices.extend(
            big_f.coeffs().iter().enumerate().filter(|&(_, &c)| c == want).map(|(i, _)| i as i16),
        );
    }
    Zeroizing::new(pack::pack_to_vec(kp.n as u32, &indices))
}

fn unlist_indices(kp: &KeyParams, bytes: &[u8]) -> Result<Polynomial> {
    let mut indices = Zeroizing::new(vec![0i16; 2 * kp.df]);
    pack::unpack(kp.n as u32, bytes, &mut indices);

    let mut big_f = Polynomial::zero(kp.n);
    let coeffs = big_f.coeffs_mut();
    for (k, &i) in indices.iter().enumerate() {
        let slot = coeffs.get_mut(i as u16 as usize).ok_or(Error::InvalidKeyBlob)?;
        if *slot != 0 {
            return Err(Error::InvalidKeyBlob);
        }
        *slot = if k < kp.df { 1 } else { -1 };
    }
    Ok(big_f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamSetId;

    fn sample_f(kp: &KeyParams) -> Polynomial {
        let mut big_f = Polynomial::zero(kp.n);
        for k in 0..kp.df {
            big_f.coeffs_mut()[3 * k] = 1;
            big_f.coeffs_mut()[3 * k + 1] = -1;
        }
        lift_f(&big_f)
    }

    fn sample_h(kp: &KeyParams) -> Polynomial {
        Polynomial::from((0..kp.n).map(|i| ((i * 37) % 2048) as i16).collect::<Vec<_>>())
    }

    #[test]
    fn f_lift_and_recover() {
        let big_f = Polynomial::from(vec![-1, 0, 1, 1, -1]);
        let f = lift_f(&big_f);
        assert_eq!(f.coeffs(), &[-2, 0, 3, 3, -3]);
        assert_eq!(recover_f(&f), big_f);
    }

    #[test]
    fn default_private_blob_round_trips() {
        for id in [ParamSetId::Ees401ep1, ParamSetId::Ees1499ep1] {
            let kp = id.params();
            let (h, f) = (sample_h(kp), sample_f(kp));
            let blob = encode_private(kp, &h, &f, None);
            assert_eq!(blob[0], TAG_PRIVATE_DEFAULT);
            assert_eq!(blob.len(), kp.private_key_blob_len());
            let raw = decode(&blob).unwrap();
            assert_eq!(raw.params.id, id);
            assert_eq!(raw.h, h);
            assert_eq!(raw.f.as_ref(), Some(&f));
        }
    }

    #[test]
    fn explicit_formats_round_trip() {
        let kp = ParamSetId::Ees659ep1.params();
        let (h, f) = (sample_h(kp), sample_f(kp));
        for (format, tag, f_len) in [
            (PrivateKeyFormat::Packed, 0xfe, kp.packed_f_len()),
            (PrivateKeyFormat::Listed, 0xff, kp.listed_f_len()),
        ] {
            let blob = encode_private(kp, &h, &f, Some(format));
            assert_eq!(blob[0], tag);
            assert_eq!(blob.len(), kp.public_key_blob_len() + f_len);
            assert_eq!(decode(&blob).unwrap().f, Some(f.clone()));
        }
    }

    #[test]
    fn public_blob_layout() {
        let kp = ParamSetId::Ees401ep1.params();
        let blob = encode_public(kp, &sample_h(kp));
        assert_eq!(&blob[..4], &[0x01, 0x00, 0x02, 0x04]);
        assert_eq!(blob.len(), 556);
        assert!(decode(&blob).unwrap().f.is_none());
    }

    #[test]
    fn rejects_malformed_blobs() {
        let kp = ParamSetId::Ees401ep1.params();
        let blob = encode_public(kp, &sample_h(kp));

        assert_eq!(decode(&[]).err(), Some(Error::InvalidKeyBlob));
        assert_eq!(decode(&[0x01, 0x00]).err(), Some(Error::InvalidKeyBlob));
        assert_eq!(decode(&blob[..blob.len() - 1]).err(), Some(Error::InvalidKeyBlob));

        let mut bad = blob.clone();
        bad[0] = 0x03;
        assert_eq!(decode(&bad).err(), Some(Error::UnsupportedFormat(0x03)));

        let mut bad = blob;
        bad[3] = 0x09;
        assert_eq!(decode(&bad).err(), Some(Error::UnsupportedParamSet([0, 2, 9])));
    }

    #[test]
    fn rejects_bad_listed_indices() {
        let kp = ParamSetId::Ees659ep1.params();
        let f = sample_f(kp);
        let blob = encode_private(kp, &sample_h(kp), &f, Some(PrivateKeyFormat::Listed));
        let f_start = kp.public_key_blob_len();

        // first index (10 bits) forced to 1023 >= N
        let mut bad = blob.to_vec();
        bad[f_start] = 0xff;
        bad[f_start + 1] |= 0xc0;
        assert_eq!(decode(&bad).err(), Some(Error::InvalidKeyBlob));

        // second index made equal to the first (0 and 3 -> 0 and 0)
        let mut bad = blob.to_vec();
        bad[f_start + 1] &= 0xc0;
        bad[f_start + 2] &= 0x0f;
        assert_eq!(decode(&bad).err(), Some(Error::InvalidKeyBlob));
    }

    #[test]
    fn rejects_bad_packed_trits() {
        let kp = ParamSetId::Ees401ep1.params();
        let mut blob = encode_private(kp, &sample_h(kp), &sample_f(kp), None).to_vec();
        let last = blob.len() - 1;
        blob[last] = 243;
        assert_eq!(decode(&blob).err(), Some(Error::InvalidKeyBlob));
    }
}
