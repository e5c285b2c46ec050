//! Polynomial inversion in `(Z/mZ)[X]/(X^N-1)`.
//!
//! Inversion modulo a prime uses the "almost inverse" reduction: track
//! `(f, g, b, c)` with `g = X^N - 1`, strip factors of `X` from `f`, swap when
//! `deg f < deg g`, and cancel constant terms through a table of inverses
//! modulo the prime. The prime-power variant lifts that result with Newton
//! iteration `b <- b * (2 - a * b)`, squaring the working modulus each round.
//!
//! Non-invertible input is an expected outcome (key generation simply draws
//! again), so both entry points return `Option`.

use alloc::{vec, vec::Vec};

use zeroize::Zeroize;

use crate::poly::Polynomial;

/// Inverter for a fixed prime `p` and target modulus `p^k`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PolynomialInverter {
    prime: i32,
    modulus: i32,
    /// `inv[x] * x == 1 (mod p)`; `inv[0] == 0` marks "no inverse".
    inv: Vec<i32>,
}

impl PolynomialInverter {
    /// Inverter modulo `prime^k == modulus`.
    ///
    /// Returns `None` if `prime` is not prime or `modulus` is not a positive
    /// power of it.
    #[must_use]
    pub fn new(prime: u16, modulus: u16) -> Option<Self> {
        let prime = i32::from(prime);
        let modulus = i32::from(modulus);
        if prime < 2 || (2..prime).take_while(|d| d * d <= prime).any(|d| prime % d == 0) {
            return None;
        }
        let mut m = modulus;
        while m > 1 && m % prime == 0 {
            m /= prime;
        }
        if m != 1 || modulus < prime {
            return None;
        }

        let inv = (0..prime)
            .map(|x| (1..prime).find(|y| (x * y) % prime == 1).unwrap_or(0))
            .collect();
        Some(Self { prime, modulus, inv })
    }

    /// Inverter modulo the prime itself.
    #[must_use]
    pub fn mod_prime(prime: u16) -> Option<Self> {
        Self::new(prime, prime)
    }

    #[inline]
    #[must_use]
    pub const fn prime(&self) -> i32 {
        self.prime
    }

    /// Target modulus `p^k`.
    #[inline]
    #[must_use]
    pub const fn modulus(&self) -> i32 {
        self.modulus
    }

    /// Inverse of `a` modulo the target modulus, coefficients in
    /// `[0, modulus)`.
    #[must_use]
    pub fn invert(&self, a: &Polynomial) -> Option<Polynomial> {
        let mut b = self.invert_mod_prime(a)?;

        let mut m = self.prime;
        while m < self.modulus {
            m = m.saturating_mul(m).min(self.modulus);

            let mut c = a.convolution_mod(&b, m);
            let coeffs = c.coeffs_mut();
            coeffs[0] = ((2 - i32::from(coeffs[0])).rem_euclid(m)) as i16;
            for x in &mut coeffs[1..] {
                *x = ((m - i32::from(*x)) % m) as i16;
            }
            b = b.convolution_mod(&c, m);
        }
        Some(b)
    }

    /// Inverse of `a` modulo the prime, coefficients in `[0, p)`.
    #[must_use]
    pub fn invert_mod_prime(&self, a: &Polynomial) -> Option<Polynomial> {
        let n = a.len();
        if n == 0 {
            return None;
        }
        let p = self.prime;

        let mut scratch = Scratch::new(n);
        let Scratch { b, c, f, g } = &mut scratch;
        b[0] = 1;
        for (fi, &ai) in f.iter_mut().zip(a.coeffs()) {
            *fi = i32::from(ai).rem_euclid(p);
        }
        g[n] = 1;
        g[0] = p - 1;

        let mut df = degree(f);
        let mut dg = n;
        let mut k = 0usize;
        let (mut f, mut g, mut b, mut c) = (f, g, b, c);

        loop {
            while f[0] == 0 && df > 0 {
                df -= 1;
                f.rotate_left(1);
                c.rotate_right(1);
                k += 1;
            }

            if df == 0 {
                let f0_inv = self.inv[f[0] as usize];
                if f0_inv == 0 {
                    return None;
                }
                let shift = (n - k % n) % n;
                let mut out = Polynomial::zero(n);
                let coeffs = out.coeffs_mut();
                for (i, &bi) in b[..n].iter().enumerate() {
                    coeffs[(i + shift) % n] = ((f0_inv * bi) % p) as i16;
                }
                return Some(out);
            }

            if df < dg {
                core::mem::swap(&mut f, &mut g);
                core::mem::swap(&mut b, &mut c);
                core::mem::swap(&mut df, &mut dg);
            }

            let u = (f[0] * self.inv[g[0] as usize]) % p;
            for (fi, &gi) in f.iter_mut().zip(g.iter()) {
                *fi = (*fi - u * gi).rem_euclid(p);
            }
            for (bi, &ci) in b.iter_mut().zip(c.iter()) {
                *bi = (*bi - u * ci).rem_euclid(p);
            }
        }
    }
}

/// Working buffers of length `N + 1`, wiped on drop.
struct Scratch {
    b: Vec<i32>,
    c: Vec<i32>,
    f: Vec<i32>,
    g: Vec<i32>,
}

impl Scratch {
    fn new(n: usize) -> Self {
        Self { b: vec![0; n + 1], c: vec![0; n + 1], f: vec![0; n + 1], g: vec![0; n + 1] }
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        self.b.zeroize();
        self.c.zeroize();
        self.f.zeroize();
        self.g.zeroize();
    }
}

/// Index of the highest non-zero coefficient (0 for the zero polynomial).
fn degree(f: &[i32]) -> usize {
    f.iter().rposition(|&x| x != 0).unwrap_or(0)
}
