//! First and second derivative operators on a non-uniform mesh.
//!
//! Interior rows use the three-point central stencils
//!
//! ```text
//! ∂x  : [-h⁺/(h⁻(h⁻+h⁺)),  (h⁺-h⁻)/(h⁻h⁺),  h⁻/(h⁺(h⁻+h⁺))]
//! ∂xx : [ 2/(h⁻(h⁻+h⁺)),   -2/(h⁻h⁺),        2/(h⁺(h⁻+h⁺))]
//! ```
//!
//! The first derivative falls back to one-sided differences on the two edge
//! rows; the second derivative is zero there.

use fdm_core::Real;

use super::TripleBandLinearOp;
use crate::meshers::Fdm1dMesher;

/// Spacings `(h⁻, h⁺)` of interior node `i`.
fn spacings(mesher: &Fdm1dMesher, i: usize) -> (Real, Real) {
    let hm = mesher.dminus(i).unwrap_or_default();
    let hp = mesher.dplus(i).unwrap_or_default();
    (hm, hp)
}

/// `∂/∂x` on `mesher`.
pub fn first_derivative(mesher: &Fdm1dMesher) -> TripleBandLinearOp {
    let n = mesher.size();
    let mut lower = vec![0.0; n];
    let mut diag = vec![0.0; n];
    let mut upper = vec![0.0; n];

    for i in 1..n - 1 {
        let (hm, hp) = spacings(mesher, i);
        lower[i] = -hp / (hm * (hm + hp));
        diag[i] = (hp - hm) / (hm * hp);
        upper[i] = hm / (hp * (hm + hp));
    }

    if let Some(hp) = mesher.dplus(0) {
        diag[0] = -1.0 / hp;
        upper[0] = 1.0 / hp;
    }
    if let Some(hm) = mesher.dminus(n - 1) {
        lower[n - 1] = -1.0 / hm;
        diag[n - 1] = 1.0 / hm;
    }

    TripleBandLinearOp::from_parts(lower, diag, upper)
}

/// `∂²/∂x²` on `mesher`.
pub fn second_derivative(mesher: &Fdm1dMesher) -> TripleBandLinearOp {
    let n = mesher.size();
    let mut lower = vec![0.0; n];
    let mut diag = vec![0.0; n];
    let mut upper = vec![0.0; n];

    for i in 1..n - 1 {
        let (hm, hp) = spacings(mesher, i);
        lower[i] = 2.0 / (hm * (hm + hp));
        diag[i] = -2.0 / (hm * hp);
        upper[i] = 2.0 / (hp * (hm + hp));
    }

    TripleBandLinearOp::from_parts(lower, diag, upper)
}
