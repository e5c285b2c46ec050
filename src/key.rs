//! NTRUEncrypt key pair: generation, SVES encryption and decryption.
//!
//! A key is open until [`NtruEncryptKey::close`] zeroes it; every later
//! operation fails with [`Error::ObjectClosed`].

use core::fmt;

use ntru_hash::{Igf2, Mgf1};
use ntru_math::{
    Polynomial, pack,
    sample::{bpgm3, gen_trinomial},
};
use rand_core::{CryptoRng, RngCore};
use subtle::{Choice, ConstantTimeEq};
use tracing::{debug, instrument, trace};
use zeroize::{Zeroize, Zeroizing};

use crate::{
    encoder::{self, PrivateKeyFormat},
    error::{Error, Result},
    message::{binary_to_trinary, meets_dm0, pack_mod4, trinary_to_binary},
    params::{KeyParams, P, ParamSetId, Q},
    random::RngSource,
};

/// Public key `h`, optionally with the private key `f = 1 + 3F`.
pub struct NtruEncryptKey {
    params: &'static KeyParams,
    h: Polynomial,
    f: Option<Polynomial>,
    closed: bool,
}

impl NtruEncryptKey {
    /// Generate a fresh key pair for `id`.
    ///
    /// `g` and `F` are redrawn until `g` and `f = 1 + 3F` are invertible
    /// mod `q`; the public key is `h = 3 * f^-1 * g mod q`.
    #[instrument(level = "debug", skip_all, fields(param_set = %id))]
    pub fn generate(id: ParamSetId, rng: &mut impl CryptoRng) -> Self {
        let kp = id.params();
        let inverter = kp.inverter();
        let mut igf = Igf2::new(kp.index_bound(), kp.c, RngSource(rng));

        let g = loop {
            let g = bpgm3(kp.n, kp.dg + 1, kp.dg, &mut igf);
            if inverter.invert_mod_prime(&g).is_some() {
                break g;
            }
            trace!("g not invertible, redrawing");
        };

        let (f, f_inv) = loop {
            let big_f = bpgm3(kp.n, kp.df, kp.df, &mut igf);
            let f = encoder::lift_f(&big_f);
            if let Some(f_inv) = inverter.invert(&f) {
                break (f, f_inv);
            }
            trace!("f not invertible, redrawing");
        };

        let h = f_inv.convolution_mod(&g, Q).scale_mod(P, Q);
        Self { params: kp, h, f: Some(f), closed: false }
    }

    /// Parse a public or private key blob.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedFormat`], [`Error::UnsupportedParamSet`] or
    /// [`Error::InvalidKeyBlob`] if `blob` is not a well-formed key.
    pub fn from_blob(blob: &[u8]) -> Result<Self> {
        let raw = encoder::decode(blob)?;
        Ok(Self { params: raw.params, h: raw.h, f: raw.f, closed: false })
    }

    /// A key holding only this key's public half.
    ///
    /// # Errors
    ///
    /// [`Error::ObjectClosed`] if the key was closed.
    pub fn public_only(&self) -> Result<Self> {
        self.ensure_open()?;
        Ok(Self { params: self.params, h: self.h.clone(), f: None, closed: false })
    }

    #[inline]
    #[must_use]
    pub fn param_set(&self) -> ParamSetId {
        self.params.id
    }

    #[inline]
    #[must_use]
    pub fn params(&self) -> &'static KeyParams {
        self.params
    }

    #[inline]
    #[must_use]
    pub fn has_private_key(&self) -> bool {
        self.f.is_some()
    }

    #[inline]
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// # Errors
    ///
    /// [`Error::ObjectClosed`] if the key was closed.
    pub fn public_key_blob(&self) -> Result<Vec<u8>> {
        self.ensure_open()?;
        Ok(encoder::encode_public(self.params, &self.h))
    }

    /// Private key blob in the default encoding (tag `02`).
    ///
    /// # Errors
    ///
    /// [`Error::ObjectClosed`] if the key was closed, [`Error::NoPrivateKey`]
    /// if it only holds a public key.
    pub fn private_key_blob(&self) -> Result<Zeroizing<Vec<u8>>> {
        let f = self.private()?;
        Ok(encoder::encode_private(self.params, &self.h, f, None))
    }

    /// Private key blob with `F` stored in `format`, tagged explicitly.
    ///
    /// # Errors
    ///
    /// As [`NtruEncryptKey::private_key_blob`].
    pub fn encode_private_key_with(&self, format: PrivateKeyFormat) -> Result<Zeroizing<Vec<u8>>> {
        let f = self.private()?;
        Ok(encoder::encode_private(self.params, &self.h, f, Some(format)))
    }

    /// Encrypt `msg` under the public key.
    ///
    /// # Errors
    ///
    /// [`Error::ObjectClosed`] if the key was closed,
    /// [`Error::PlaintextBadLength`] if `msg` is longer than
    /// [`KeyParams::max_msg_len`].
    #[instrument(level = "debug", skip_all, fields(param_set = %self.params.id, len = msg.len()))]
    pub fn encrypt(&self, msg: &[u8], rng: &mut impl CryptoRng) -> Result<Vec<u8>> {
        self.ensure_open()?;
        let kp = self.params;
        if msg.len() > kp.max_msg_len() {
            return Err(Error::PlaintextBadLength { max: kp.max_msg_len(), actual: msg.len() });
        }
        let db = kp.db_bytes();
        let packed_h = pack::pack_to_vec(Q as u32, self.h.coeffs());
        let h_trunc = &packed_h[..kp.pk_len_bytes()];

        loop {
            let mut padded = Zeroizing::new(vec![0u8; kp.padded_msg_len()]);
            rng.fill_bytes(&mut padded[..db]);
            padded[db] = msg.len() as u8;
            padded[db + 1..db + 1 + msg.len()].copy_from_slice(msg);

            let m_trin = binary_to_trinary(kp.n, &padded);
            let s_data = seed_data(kp, msg, &padded[..db], h_trunc);
            let r = self.blinding_value(&s_data);
            let mask = encryption_mask(kp, &r);
            let m_masked = m_trin.add_recentered(&mask, P, -1);

            if meets_dm0(&m_masked, kp.dm0) {
                return Ok(pack::pack_to_vec(Q as u32, r.add_mod(&m_masked, Q).coeffs()));
            }
            trace!("masked message below dm0, retrying");
        }
    }

    /// Recover the message from `ct`.
    ///
    /// Every check runs to completion before the result is decided, and a
    /// rejected ciphertext yields [`Error::DecryptionFailure`] whichever
    /// check failed.
    ///
    /// # Errors
    ///
    /// [`Error::ObjectClosed`], [`Error::NoPrivateKey`],
    /// [`Error::CiphertextBadLength`] or [`Error::DecryptionFailure`].
    #[instrument(level = "debug", skip_all, fields(param_set = %self.params.id))]
    pub fn decrypt(&self, ct: &[u8]) -> Result<Vec<u8>> {
        let f = self.private()?;
        let kp = self.params;
        if ct.len() != kp.ciphertext_len() {
            return Err(Error::CiphertextBadLength { expected: kp.ciphertext_len(), actual: ct.len() });
        }

        let mut e = Polynomial::zero(kp.n);
        pack::unpack(Q as u32, ct, e.coeffs_mut());

        let mut ci = f.convolution_mod(&e, Q);
        ci.recenter(Q, -Q / 2);
        ci.recenter(P, -1);
        let mut ok = Choice::from(u8::from(meets_dm0(&ci, kp.dm0)));

        let c_r = e.sub_mod(&ci, Q);
        let mask = encryption_mask(kp, &c_r);
        let c_mtrin = ci.sub_recentered(&mask, P, -1);
        let (cm, pairs_ok) = trinary_to_binary(c_mtrin.coeffs(), kp.padded_msg_len());
        ok &= Choice::from(u8::from(pairs_ok));

        // b || len || m || zero padding
        let db = kp.db_bytes();
        let stated_len = usize::from(cm[db]);
        let len_ok = stated_len <= kp.max_msg_len();
        ok &= Choice::from(u8::from(len_ok));
        let m_len = if len_ok { stated_len } else { 1 };
        let pad = cm[db + 1 + m_len..].iter().fold(0u8, |acc, &b| acc | b);
        ok &= pad.ct_eq(&0);

        let msg = &cm[db + 1..db + 1 + m_len];
        let packed_h = pack::pack_to_vec(Q as u32, self.h.coeffs());
        let s_data = seed_data(kp, msg, &cm[..db], &packed_h[..kp.pk_len_bytes()]);
        let c_r_check = self.blinding_value(&s_data);
        ok &= c_r.coeffs().ct_eq(c_r_check.coeffs());

        if bool::from(ok) {
            Ok(msg.to_vec())
        } else {
            debug!("decryption rejected");
            Err(Error::DecryptionFailure)
        }
    }

    /// Zero the key material. Later operations fail with
    /// [`Error::ObjectClosed`]; closing again is a no-op.
    pub fn close(&mut self) {
        self.h.zeroize();
        self.f = None;
        self.closed = true;
    }

    // -- internals ------------------------------------------------------------

    fn ensure_open(&self) -> Result<()> {
        if self.closed { Err(Error::ObjectClosed) } else { Ok(()) }
    }

    fn private(&self) -> Result<&Polynomial> {
        self.ensure_open()?;
        self.f.as_ref().ok_or(Error::NoPrivateKey)
    }

    /// `R = r * h mod q`, with `r` drawn from IGF-2 seeded by `s_data`.
    fn blinding_value(&self, s_data: &[u8]) -> Polynomial {
        let kp = self.params;
        let mut igf =
            Igf2::from_seed(kp.index_bound(), kp.c, kp.igf_hash, kp.min_calls_r, s_data);
        let r = bpgm3(kp.n, kp.dr, kp.dr, &mut igf);
        igf.finish();
        r.convolution_mod(&self.h, Q)
    }
}

/// `OID || m || b || h_trunc`.
fn seed_data(kp: &KeyParams, msg: &[u8], b: &[u8], h_trunc: &[u8]) -> Zeroizing<Vec<u8>> {
    let mut s = Zeroizing::new(Vec::with_capacity(kp.oid.len() + msg.len() + b.len() + h_trunc.len()));
    s.extend_from_slice(&kp.oid);
    s.extend_from_slice(msg);
    s.extend_from_slice(b);
    s.extend_from_slice(h_trunc);
    s
}

/// Trinomial mask expanded from `R mod 4` by MGF1 and MGF-TP-1.
fn encryption_mask(kp: &KeyParams, r: &Polynomial) -> Polynomial {
    let mut mgf = Mgf1::new(kp.mgf_hash, kp.min_calls_mask, true, &pack_mod4(r));
    let mask = gen_trinomial(kp.n, &mut mgf);
    mgf.finish();
    mask
}

impl fmt::Debug for NtruEncryptKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NtruEncryptKey")
            .field("param_set", &self.params.id)
            .field("has_private_key", &self.has_private_key())
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}
