//! Dense polynomials over `Z[X]/(X^N-1)`.
//!
//! [`Polynomial`] stores exactly `N` signed 16-bit coefficients, index equal
//! to exponent. The length is fixed at construction. Ring operations never
//! mutate their inputs; only [`Polynomial::recenter`] works in place.

use alloc::{vec, vec::Vec};

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Polynomial in coefficient form. Zeroized on drop.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Zeroize, ZeroizeOnDrop)]
pub struct Polynomial(pub(crate) Vec<i16>);

/// Map `x` to the representative of `x mod m` in `[low, low + m)`.
#[inline]
#[must_use]
pub const fn recenter_coeff(x: i32, m: i32, low: i32) -> i32 {
    let mut r = x % m;
    if r >= low + m {
        r -= m;
    }
    if r < low {
        r += m;
    }
    r
}

impl Polynomial {
    /// The zero polynomial with `n` coefficients.
    #[must_use]
    pub fn zero(n: usize) -> Self {
        Self(vec![0; n])
    }

    /// The constant polynomial `1` with `n` coefficients.
    #[must_use]
    pub fn one(n: usize) -> Self {
        let mut p = Self::zero(n);
        if let Some(c) = p.0.first_mut() {
            *c = 1;
        }
        p
    }

    #[inline]
    #[must_use]
    pub fn from_coeffs(coeffs: Vec<i16>) -> Self {
        Self(coeffs)
    }

    /// Number of coefficients (`N`).
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn coeffs(&self) -> &[i16] {
        &self.0
    }

    #[inline]
    #[must_use]
    pub fn coeffs_mut(&mut self) -> &mut [i16] {
        &mut self.0
    }

    /// Reduce every coefficient into `[low, low + modulus)` in place.
    pub fn recenter(&mut self, modulus: i32, low: i32) {
        for c in &mut self.0 {
            *c = recenter_coeff(i32::from(*c), modulus, low) as i16;
        }
    }

    // -- ring operations -----------------------------------------------------

    /// Cyclic convolution `self * other mod (X^N - 1)` without coefficient
    /// reduction.
    ///
    /// Coefficients wrap modulo `2^16`, so a later reduction by any power of
    /// two up to `2^16` is exact.
    ///
    /// # Panics
    ///
    /// Panics if the operands have different lengths.
    #[must_use]
    pub fn convolution(&self, other: &Self) -> Self {
        let acc = convolve(&self.0, &other.0);
        Self(acc.into_iter().map(|c| c as i16).collect())
    }

    /// Cyclic convolution with coefficients reduced into `[0, modulus)`.
    ///
    /// # Panics
    ///
    /// Panics if the operands have different lengths.
    #[must_use]
    pub fn convolution_mod(&self, other: &Self, modulus: i32) -> Self {
        let m = i64::from(modulus);
        let acc = convolve(&self.0, &other.0);
        Self(acc.into_iter().map(|c| c.rem_euclid(m) as i16).collect())
    }

    /// `(self + other)` reduced into `[0, modulus)`.
    #[must_use]
    pub fn add_mod(&self, other: &Self, modulus: i32) -> Self {
        self.add_recentered(other, modulus, 0)
    }

    /// `(self + other)` reduced into `[low, low + modulus)`.
    ///
    /// # Panics
    ///
    /// Panics if the operands have different lengths.
    #[must_use]
    pub fn add_recentered(&self, other: &Self, modulus: i32, low: i32) -> Self {
        self.zip_with(other, modulus, low, |a, b| a + b)
    }

    /// `(self - other)` reduced into `[0, modulus)`.
    #[must_use]
    pub fn sub_mod(&self, other: &Self, modulus: i32) -> Self {
        self.sub_recentered(other, modulus, 0)
    }

    /// `(self - other)` reduced into `[low, low + modulus)`.
    ///
    /// # Panics
    ///
    /// Panics if the operands have different lengths.
    #[must_use]
    pub fn sub_recentered(&self, other: &Self, modulus: i32, low: i32) -> Self {
        self.zip_with(other, modulus, low, |a, b| a - b)
    }

    /// `k * self` reduced into `[0, modulus)`.
    #[must_use]
    pub fn scale_mod(&self, k: i32, modulus: i32) -> Self {
        Self(
            self.0
                .iter()
                .map(|&c| recenter_coeff(i32::from(c) * k, modulus, 0) as i16)
                .collect(),
        )
    }

    /// Counts of `+1`, `-1` and every other coefficient value.
    #[must_use]
    pub fn trit_counts(&self) -> (usize, usize, usize) {
        let ones = self.0.iter().filter(|&&c| c == 1).count();
        let neg_ones = self.0.iter().filter(|&&c| c == -1).count();
        (ones, neg_ones, self.0.len() - ones - neg_ones)
    }

    fn zip_with(&self, other: &Self, modulus: i32, low: i32, op: impl Fn(i32, i32) -> i32) -> Self {
        assert_eq!(self.len(), other.len(), "polynomial length mismatch");
        Self(
            self.0
                .iter()
                .zip(&other.0)
                .map(|(&a, &b)| recenter_coeff(op(i32::from(a), i32::from(b)), modulus, low) as i16)
                .collect(),
        )
    }
}

impl From<Vec<i16>> for Polynomial {
    fn from(coeffs: Vec<i16>) -> Self {
        Self(coeffs)
    }
}

impl AsRef<[i16]> for Polynomial {
    fn as_ref(&self) -> &[i16] {
        &self.0
    }
}

fn convolve(a: &[i16], b: &[i16]) -> Vec<i64> {
    assert_eq!(a.len(), b.len(), "polynomial length mismatch");
    let n = a.len();
    let mut c = vec![0i64; n];
    for (i, &ai) in a.iter().enumerate() {
        let ai = i64::from(ai);
        for (j, &bj) in b.iter().enumerate() {
            let k = if i + j >= n { i + j - n } else { i + j };
            c[k] += ai * i64::from(bj);
        }
    }
    c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recenter_to_zero() {
        let mut a = Polynomial::from(vec![1, 2, 3, 4, 5, 6, 7, 8]);
        a.recenter(4, 0);
        assert_eq!(a.coeffs(), &[1, 2, 3, 0, 1, 2, 3, 0]);
    }

    #[test]
    fn recenter_to_negative_window() {
        let mut a = Polynomial::from(vec![1, 2, 3, 4, 5, 6, 7, 8]);
        a.recenter(4, -2);
        assert_eq!(a.coeffs(), &[1, -2, -1, 0, 1, -2, -1, 0]);

        let mut b = Polynomial::from(vec![-7, -1, 0, 2, 5]);
        b.recenter(3, -1);
        assert_eq!(b.coeffs(), &[-1, -1, 0, -1, -1]);
    }

    #[test]
    fn convolution_by_one() {
        let a = Polynomial::from(vec![1, 0, 1, 0]);
        let one = Polynomial::one(4);
        assert_eq!(a.convolution(&one), a);
    }

    #[test]
    fn convolution_by_x_rotates() {
        let a = Polynomial::from(vec![1, 0, 1, 0]);
        let x = Polynomial::from(vec![0, 1, 0, 0]);
        assert_eq!(a.convolution(&x).coeffs(), &[0, 1, 0, 1]);

        let top = Polynomial::from(vec![0, 0, 0, 7]);
        assert_eq!(top.convolution(&x).coeffs(), &[7, 0, 0, 0]);
    }

    #[test]
    fn convolution_general() {
        let a = Polynomial::from(vec![10, 0, 5, 0]);
        let b = Polynomial::from(vec![0, 3, 2, 0]);
        assert_eq!(a.convolution(&b).coeffs(), &[10, 30, 20, 15]);
    }

    #[test]
    fn convolution_mod_reduces_into_range() {
        let a = Polynomial::from(vec![-1, 1, 0, 1]);
        let b = Polynomial::from(vec![2047, 5, 0, 0]);
        let c = a.convolution_mod(&b, 2048);
        assert_eq!(c.coeffs(), &[6, 2042, 5, 2047]);
    }

    #[test]
    fn convolution_is_commutative() {
        let a = Polynomial::from(vec![3, -1, 4, 1, -5, 9, 2]);
        let b = Polynomial::from(vec![-2, 7, 1, 8, 2, -8, 1]);
        assert_eq!(a.convolution_mod(&b, 2048), b.convolution_mod(&a, 2048));
    }

    #[test]
    #[should_panic(expected = "length mismatch")]
    fn convolution_length_mismatch_panics() {
        let _ = Polynomial::zero(3).convolution(&Polynomial::zero(4));
    }

    #[test]
    fn add_and_subtract_round_trip() {
        let r = Polynomial::from(vec![2040, 7, 1024, 0, 2047]);
        let m = Polynomial::from(vec![1, -1, 0, 1, 1]);
        let e = r.add_mod(&m, 2048);
        assert_eq!(e.coeffs(), &[2041, 6, 1024, 1, 0]);
        assert_eq!(e.sub_mod(&m, 2048), r);
    }

    #[test]
    fn add_recentered_mod_three() {
        let a = Polynomial::from(vec![1, 1, -1, 0, -1]);
        let b = Polynomial::from(vec![1, -1, -1, 1, 0]);
        assert_eq!(a.add_recentered(&b, 3, -1).coeffs(), &[-1, 0, 1, 1, -1]);
        assert_eq!(a.sub_recentered(&b, 3, -1).coeffs(), &[0, -1, 0, -1, -1]);
    }

    #[test]
    fn scale_and_counts() {
        let a = Polynomial::from(vec![1, -1, 0, 1, 2000]);
        assert_eq!(a.scale_mod(3, 2048).coeffs(), &[3, 2045, 0, 3, 1904]);
        assert_eq!(a.trit_counts(), (2, 1, 2));
    }

    #[test]
    fn equality_is_coefficient_wise() {
        let a1 = Polynomial::from(vec![0, 1, 2, 3, 4, 5]);
        let mut a2 = a1.clone();
        assert_eq!(a1, a2);
        a2.coeffs_mut()[0] += 1;
        assert_ne!(a1, a2);
    }
}
