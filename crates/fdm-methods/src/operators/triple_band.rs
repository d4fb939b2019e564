//! Triple-band (tridiagonal) linear operator.

use fdm_core::{
    ensure,
    errors::{Error, Result},
    Real, Size,
};

/// A tridiagonal operator stored as three bands.
///
/// Row `i` reads `lower[i]·x[i-1] + diag[i]·x[i] + upper[i]·x[i+1]`;
/// `lower[0]` and `upper[n-1]` are always zero.
#[derive(Debug, Clone, PartialEq)]
pub struct TripleBandLinearOp {
    lower: Vec<Real>,
    diag: Vec<Real>,
    upper: Vec<Real>,
}

/// Broadcast access to a coefficient array of length 0 (zero), 1 (scalar)
/// or `n` (per row).
#[inline]
fn coeff(v: &[Real], i: Size) -> Real {
    match v.len() {
        0 => 0.0,
        1 => v[0],
        _ => v[i],
    }
}

impl TripleBandLinearOp {
    /// Zero operator of size `n`.
    pub fn zeros(n: Size) -> Self {
        Self {
            lower: vec![0.0; n],
            diag: vec![0.0; n],
            upper: vec![0.0; n],
        }
    }

    /// Identity operator of size `n`.
    pub fn identity(n: Size) -> Self {
        Self {
            lower: vec![0.0; n],
            diag: vec![1.0; n],
            upper: vec![0.0; n],
        }
    }

    /// Build from explicit bands.
    ///
    /// # Errors
    /// [`Configuration`](fdm_core::Error::Configuration) if the bands differ
    /// in length or the outer corner entries are non-zero.
    pub fn from_bands(lower: Vec<Real>, diag: Vec<Real>, upper: Vec<Real>) -> Result<Self> {
        let n = diag.len();
        ensure!(
            n > 0 && lower.len() == n && upper.len() == n,
            Configuration => "inconsistent band sizes ({}, {}, {})",
            lower.len(),
            n,
            upper.len()
        );
        ensure!(
            lower[0] == 0.0 && upper[n - 1] == 0.0,
            Configuration => "corner entries of a triple-band operator must be zero"
        );
        Ok(Self { lower, diag, upper })
    }

    pub(crate) fn from_parts(lower: Vec<Real>, diag: Vec<Real>, upper: Vec<Real>) -> Self {
        debug_assert!(lower.len() == diag.len() && upper.len() == diag.len());
        Self { lower, diag, upper }
    }

    /// Number of rows/columns.
    pub fn size(&self) -> Size {
        self.diag.len()
    }

    /// Lower band.
    pub fn lower(&self) -> &[Real] {
        &self.lower
    }

    /// Main diagonal.
    pub fn diag(&self) -> &[Real] {
        &self.diag
    }

    /// Upper band.
    pub fn upper(&self) -> &[Real] {
        &self.upper
    }

    /// `y = A · x`.
    pub fn apply(&self, x: &[Real]) -> Vec<Real> {
        let n = self.size();
        debug_assert_eq!(x.len(), n, "inconsistent length of x");
        if n == 1 {
            return vec![self.diag[0] * x[0]];
        }
        let mut y = vec![0.0; n];
        y[0] = self.diag[0] * x[0] + self.upper[0] * x[1];
        for i in 1..n - 1 {
            y[i] = self.lower[i] * x[i - 1] + self.diag[i] * x[i] + self.upper[i] * x[i + 1];
        }
        y[n - 1] = self.lower[n - 1] * x[n - 2] + self.diag[n - 1] * x[n - 1];
        y
    }

    /// `diag(a) · x + y + diag(b)`.
    ///
    /// `a` and `b` are broadcast: an empty slice means zero, a single value is
    /// used for every row.
    pub fn axpyb(a: &[Real], x: &Self, y: &Self, b: &[Real]) -> Self {
        let n = y.size();
        debug_assert_eq!(x.size(), n);
        let mut out = y.clone();
        for i in 0..n {
            let s = coeff(a, i);
            out.lower[i] += s * x.lower[i];
            out.diag[i] += s * x.diag[i] + coeff(b, i);
            out.upper[i] += s * x.upper[i];
        }
        out
    }

    /// `A + B`.
    pub fn add(&self, other: &Self) -> Self {
        Self::axpyb(&[1.0], other, self, &[])
    }

    /// Scale row `i` by `u[i]` (`u` is broadcast like in [`Self::axpyb`]).
    pub fn mult(&self, u: &[Real]) -> Self {
        let mut out = self.clone();
        for i in 0..self.size() {
            let s = coeff(u, i);
            out.lower[i] *= s;
            out.diag[i] *= s;
            out.upper[i] *= s;
        }
        out
    }

    /// `a·A + b·I`.
    pub fn shifted(&self, a: Real, b: Real) -> Self {
        let mut out = self.mult(&[a]);
        for d in &mut out.diag {
            *d += b;
        }
        out
    }

    /// Replace row `i` by the identity row.
    pub fn set_identity_row(&mut self, i: Size) {
        self.lower[i] = 0.0;
        self.diag[i] = 1.0;
        self.upper[i] = 0.0;
    }

    /// Solve `A · x = rhs` with the Thomas algorithm.
    ///
    /// # Errors
    /// [`Error::Numerical`] on a zero or non-finite pivot.
    pub fn solve(&self, rhs: &[Real]) -> Result<Vec<Real>> {
        let n = self.size();
        ensure!(
            rhs.len() == n,
            Configuration => "inconsistent size of rhs ({} vs {n})",
            rhs.len()
        );

        let pivot_error = |i: Size, m: Real| {
            Error::Numerical(format!("tridiagonal solve: singular pivot {m} in row {i}"))
        };

        let mut c_prime = vec![0.0; n];
        let mut d_prime = vec![0.0; n];

        let m0 = self.diag[0];
        if m0 == 0.0 || !m0.is_finite() {
            return Err(pivot_error(0, m0));
        }
        c_prime[0] = self.upper[0] / m0;
        d_prime[0] = rhs[0] / m0;

        for i in 1..n {
            let m = self.diag[i] - self.lower[i] * c_prime[i - 1];
            if m == 0.0 || !m.is_finite() {
                return Err(pivot_error(i, m));
            }
            c_prime[i] = self.upper[i] / m;
            d_prime[i] = (rhs[i] - self.lower[i] * d_prime[i - 1]) / m;
        }

        let mut x = d_prime;
        for i in (0..n - 1).rev() {
            x[i] -= c_prime[i] * x[i + 1];
        }
        Ok(x)
    }

    /// Solve `(a·A + b·I) · x = r`.
    pub fn solve_splitting(&self, r: &[Real], a: Real, b: Real) -> Result<Vec<Real>> {
        self.shifted(a, b).solve(r)
    }
}
