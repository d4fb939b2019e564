//! Time-stepping schemes.
//!
//! A scheme advances the solution of `∂u/∂t + L(t) u = 0` backwards by one
//! step, from `from` down to `to`. Every scheme discretizes the operator
//! over `[max(0, to), from]` and honours the boundary conditions after each
//! explicit update and inside each implicit solve.
//!
//! The family is closed: [`FdmSchemeDesc`] names the variant and its
//! parameters, and [`FdmScheme`] dispatches to the concrete step rule.

pub mod craig_sneyd;
pub mod crank_nicolson;
pub mod douglas;
pub mod explicit_euler;
pub mod hundsdorfer;
pub mod implicit_euler;
pub mod method_of_lines;
pub mod modified_craig_sneyd;
pub mod tr_bdf2;

pub use craig_sneyd::CraigSneydScheme;
pub use crank_nicolson::CrankNicolsonScheme;
pub use douglas::DouglasScheme;
pub use explicit_euler::ExplicitEulerScheme;
pub use hundsdorfer::HundsdorferScheme;
pub use implicit_euler::ImplicitEulerScheme;
pub use method_of_lines::MethodOfLinesScheme;
pub use modified_craig_sneyd::ModifiedCraigSneydScheme;
pub use tr_bdf2::TrBdf2Scheme;

use std::fmt;
use std::str::FromStr;

use fdm_core::{
    ensure,
    errors::{Error, Result},
    Real, Time,
};

use crate::boundary::FdmBoundaryConditionSet;
use crate::operators::{FdmLinearOpComposite, FdmOperatorSplit, TripleBandLinearOp};

// ─── Scheme description ───────────────────────────────────────────────────────

/// The scheme variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FdmSchemeType {
    /// Fully explicit Euler.
    ExplicitEuler,
    /// Fully implicit Euler.
    ImplicitEuler,
    /// θ-blend of explicit and implicit Euler.
    CrankNicolson,
    /// Douglas ADI.
    Douglas,
    /// Craig–Sneyd ADI.
    CraigSneyd,
    /// Modified Craig–Sneyd ADI.
    ModifiedCraigSneyd,
    /// Hundsdorfer–Verwer ADI.
    Hundsdorfer,
    /// Adaptive Runge–Kutta integration of the semi-discrete system.
    MethodOfLines,
    /// Trapezoidal stage followed by a BDF2 stage.
    TrBdf2,
}

impl FdmSchemeType {
    const ALL: [FdmSchemeType; 9] = [
        FdmSchemeType::ExplicitEuler,
        FdmSchemeType::ImplicitEuler,
        FdmSchemeType::CrankNicolson,
        FdmSchemeType::Douglas,
        FdmSchemeType::CraigSneyd,
        FdmSchemeType::ModifiedCraigSneyd,
        FdmSchemeType::Hundsdorfer,
        FdmSchemeType::MethodOfLines,
        FdmSchemeType::TrBdf2,
    ];

    /// Canonical name.
    pub fn name(self) -> &'static str {
        match self {
            FdmSchemeType::ExplicitEuler => "ExplicitEuler",
            FdmSchemeType::ImplicitEuler => "ImplicitEuler",
            FdmSchemeType::CrankNicolson => "CrankNicolson",
            FdmSchemeType::Douglas => "Douglas",
            FdmSchemeType::CraigSneyd => "CraigSneyd",
            FdmSchemeType::ModifiedCraigSneyd => "ModifiedCraigSneyd",
            FdmSchemeType::Hundsdorfer => "Hundsdorfer",
            FdmSchemeType::MethodOfLines => "MethodOfLines",
            FdmSchemeType::TrBdf2 => "TrBDF2",
        }
    }
}

impl fmt::Display for FdmSchemeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FdmSchemeType {
    type Err = Error;

    /// Case-insensitive; `-`, `_` and spaces are ignored.
    fn from_str(s: &str) -> Result<Self> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        Self::ALL
            .into_iter()
            .find(|t| t.name().to_lowercase() == key)
            .ok_or_else(|| Error::Configuration(format!("unknown scheme type '{s}'")))
    }
}

/// A scheme variant together with its mixing parameters.
///
/// `theta` and `mu` mean different things per variant: the implicitness
/// and the mixed-term weight for the splitting schemes, the error tolerance
/// and the relative initial step for the method of lines, and α for TR-BDF2
/// (whose `mu` is not used in one dimension).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FdmSchemeDesc {
    /// Variant.
    pub scheme_type: FdmSchemeType,
    /// First parameter.
    pub theta: Real,
    /// Second parameter.
    pub mu: Real,
}

impl FdmSchemeDesc {
    /// Arbitrary description; check it with [`Self::validate`].
    pub fn new(scheme_type: FdmSchemeType, theta: Real, mu: Real) -> Self {
        Self {
            scheme_type,
            theta,
            mu,
        }
    }

    /// Douglas with θ = ½.
    pub fn douglas() -> Self {
        Self::new(FdmSchemeType::Douglas, 0.5, 0.0)
    }

    /// Crank–Nicolson with θ = ½.
    pub fn crank_nicolson() -> Self {
        Self::new(FdmSchemeType::CrankNicolson, 0.5, 0.0)
    }

    /// Craig–Sneyd with θ = μ = ½.
    pub fn craig_sneyd() -> Self {
        Self::new(FdmSchemeType::CraigSneyd, 0.5, 0.5)
    }

    /// Modified Craig–Sneyd with θ = μ = ⅓.
    pub fn modified_craig_sneyd() -> Self {
        Self::new(FdmSchemeType::ModifiedCraigSneyd, 1.0 / 3.0, 1.0 / 3.0)
    }

    /// Hundsdorfer with θ = ½ + √3/6, μ = ½.
    pub fn hundsdorfer() -> Self {
        Self::new(FdmSchemeType::Hundsdorfer, 0.5 + 3.0_f64.sqrt() / 6.0, 0.5)
    }

    /// Hundsdorfer with θ = 1 − √2/2, μ = ½.
    pub fn modified_hundsdorfer() -> Self {
        Self::new(FdmSchemeType::Hundsdorfer, 1.0 - 2.0_f64.sqrt() / 2.0, 0.5)
    }

    /// Explicit Euler.
    pub fn explicit_euler() -> Self {
        Self::new(FdmSchemeType::ExplicitEuler, 0.0, 0.0)
    }

    /// Implicit Euler.
    pub fn implicit_euler() -> Self {
        Self::new(FdmSchemeType::ImplicitEuler, 0.0, 0.0)
    }

    /// Method of lines with tolerance 0.001 and initial step 1% of the step.
    pub fn method_of_lines() -> Self {
        Self::method_of_lines_with(0.001, 0.01)
    }

    /// Method of lines with the given tolerance and relative initial step.
    pub fn method_of_lines_with(eps: Real, rel_init_step_size: Real) -> Self {
        Self::new(FdmSchemeType::MethodOfLines, eps, rel_init_step_size)
    }

    /// TR-BDF2 with α = 2 − √2.
    pub fn tr_bdf2() -> Self {
        Self::new(FdmSchemeType::TrBdf2, 2.0 - 2.0_f64.sqrt(), 1e-8)
    }

    /// Check the parameters against the variant.
    ///
    /// # Errors
    /// [`Configuration`](fdm_core::Error::Configuration) for parameters the
    /// variant cannot use.
    pub fn validate(&self) -> Result<()> {
        let (theta, mu) = (self.theta, self.mu);
        ensure!(
            theta.is_finite() && mu.is_finite(),
            Configuration => "non-finite parameters for {}: theta = {theta}, mu = {mu}",
            self.scheme_type
        );
        match self.scheme_type {
            FdmSchemeType::ExplicitEuler | FdmSchemeType::ImplicitEuler => {}
            FdmSchemeType::CrankNicolson | FdmSchemeType::Douglas => {
                ensure!(
                    (0.0..=1.0).contains(&theta),
                    Configuration => "{} needs theta in [0, 1], got {theta}",
                    self.scheme_type
                );
            }
            FdmSchemeType::CraigSneyd
            | FdmSchemeType::ModifiedCraigSneyd
            | FdmSchemeType::Hundsdorfer => {
                ensure!(
                    (0.0..=1.0).contains(&theta) && (0.0..=1.0).contains(&mu),
                    Configuration => "{} needs theta and mu in [0, 1], got {theta} and {mu}",
                    self.scheme_type
                );
            }
            FdmSchemeType::MethodOfLines => {
                ensure!(
                    theta > 0.0 && mu > 0.0,
                    Configuration => "method of lines needs a positive tolerance and initial step, got {theta} and {mu}"
                );
            }
            FdmSchemeType::TrBdf2 => {
                ensure!(
                    theta > 0.0 && theta < 1.0,
                    Configuration => "TR-BDF2 needs alpha in (0, 1), got {theta}"
                );
            }
        }
        Ok(())
    }
}

// ─── Dispatch ─────────────────────────────────────────────────────────────────

/// One member of the scheme family, bound to an operator and boundary set.
#[derive(Debug, Clone)]
pub enum FdmScheme<'a> {
    /// See [`ExplicitEulerScheme`].
    ExplicitEuler(ExplicitEulerScheme<'a>),
    /// See [`ImplicitEulerScheme`].
    ImplicitEuler(ImplicitEulerScheme<'a>),
    /// See [`CrankNicolsonScheme`].
    CrankNicolson(CrankNicolsonScheme<'a>),
    /// See [`DouglasScheme`].
    Douglas(DouglasScheme<'a>),
    /// See [`CraigSneydScheme`].
    CraigSneyd(CraigSneydScheme<'a>),
    /// See [`ModifiedCraigSneydScheme`].
    ModifiedCraigSneyd(ModifiedCraigSneydScheme<'a>),
    /// See [`HundsdorferScheme`].
    Hundsdorfer(HundsdorferScheme<'a>),
    /// See [`MethodOfLinesScheme`].
    MethodOfLines(MethodOfLinesScheme<'a>),
    /// See [`TrBdf2Scheme`].
    TrBdf2(TrBdf2Scheme<'a>),
}

impl<'a> FdmScheme<'a> {
    /// Build the scheme described by `desc`.
    ///
    /// # Errors
    /// [`Configuration`](fdm_core::Error::Configuration) if `desc` does not
    /// validate.
    pub fn new(
        desc: &FdmSchemeDesc,
        op: &'a dyn FdmLinearOpComposite,
        bc_set: &'a FdmBoundaryConditionSet,
    ) -> Result<Self> {
        desc.validate()?;
        let (theta, mu) = (desc.theta, desc.mu);
        Ok(match desc.scheme_type {
            FdmSchemeType::ExplicitEuler => Self::ExplicitEuler(ExplicitEulerScheme::new(op, bc_set)),
            FdmSchemeType::ImplicitEuler => Self::ImplicitEuler(ImplicitEulerScheme::new(op, bc_set)),
            FdmSchemeType::CrankNicolson => {
                Self::CrankNicolson(CrankNicolsonScheme::new(theta, op, bc_set))
            }
            FdmSchemeType::Douglas => Self::Douglas(DouglasScheme::new(theta, op, bc_set)),
            FdmSchemeType::CraigSneyd => Self::CraigSneyd(CraigSneydScheme::new(theta, mu, op, bc_set)),
            FdmSchemeType::ModifiedCraigSneyd => {
                Self::ModifiedCraigSneyd(ModifiedCraigSneydScheme::new(theta, mu, op, bc_set))
            }
            FdmSchemeType::Hundsdorfer => {
                Self::Hundsdorfer(HundsdorferScheme::new(theta, mu, op, bc_set))
            }
            FdmSchemeType::MethodOfLines => {
                Self::MethodOfLines(MethodOfLinesScheme::new(theta, mu, op, bc_set))
            }
            FdmSchemeType::TrBdf2 => Self::TrBdf2(TrBdf2Scheme::new(theta, op, bc_set)),
        })
    }

    /// Variant of this scheme.
    pub fn scheme_type(&self) -> FdmSchemeType {
        match self {
            Self::ExplicitEuler(_) => FdmSchemeType::ExplicitEuler,
            Self::ImplicitEuler(_) => FdmSchemeType::ImplicitEuler,
            Self::CrankNicolson(_) => FdmSchemeType::CrankNicolson,
            Self::Douglas(_) => FdmSchemeType::Douglas,
            Self::CraigSneyd(_) => FdmSchemeType::CraigSneyd,
            Self::ModifiedCraigSneyd(_) => FdmSchemeType::ModifiedCraigSneyd,
            Self::Hundsdorfer(_) => FdmSchemeType::Hundsdorfer,
            Self::MethodOfLines(_) => FdmSchemeType::MethodOfLines,
            Self::TrBdf2(_) => FdmSchemeType::TrBdf2,
        }
    }

    /// Advance `a` from `from` back to `to`.
    pub fn step(&self, a: &mut [Real], from: Time, to: Time) -> Result<()> {
        match self {
            Self::ExplicitEuler(s) => s.step(a, from, to),
            Self::ImplicitEuler(s) => s.step(a, from, to),
            Self::CrankNicolson(s) => s.step(a, from, to),
            Self::Douglas(s) => s.step(a, from, to),
            Self::CraigSneyd(s) => s.step(a, from, to),
            Self::ModifiedCraigSneyd(s) => s.step(a, from, to),
            Self::Hundsdorfer(s) => s.step(a, from, to),
            Self::MethodOfLines(s) => s.step(a, from, to),
            Self::TrBdf2(s) => s.step(a, from, to),
        }
    }
}

// ─── Shared building blocks ───────────────────────────────────────────────────

/// Validate one step and discretize the operator over `[max(0, to), from]`.
pub(crate) fn discretize_step(
    op: &dyn FdmLinearOpComposite,
    a: &[Real],
    from: Time,
    to: Time,
) -> Result<FdmOperatorSplit> {
    ensure!(
        a.len() == op.size(),
        Configuration => "array size {} does not match the operator size {}",
        a.len(),
        op.size()
    );
    ensure!(
        from.is_finite() && to.is_finite() && from >= to,
        Domain => "a step must go backwards in time, got {from} -> {to}"
    );
    op.discretize(to.max(0.0), from)
}

/// `y + s·x`.
pub(crate) fn axpy(s: Real, x: &[Real], y: &[Real]) -> Vec<Real> {
    y.iter().zip(x).map(|(yi, xi)| yi + s * xi).collect()
}

/// `x − y`.
pub(crate) fn diff(x: &[Real], y: &[Real]) -> Vec<Real> {
    x.iter().zip(y).map(|(xi, yi)| xi - yi).collect()
}

/// Solve `(I − θ·dt·L) x = rhs` with the edge rows replaced by the
/// boundary equations at `t`.
pub(crate) fn implicit_solve(
    l: &TripleBandLinearOp,
    mut rhs: Vec<Real>,
    theta_dt: Real,
    bc_set: &FdmBoundaryConditionSet,
    t: Time,
) -> Result<Vec<Real>> {
    let mut m = l.shifted(-theta_dt, 1.0);
    bc_set.apply_before_solving(&mut m, &mut rhs, t);
    m.solve(&rhs)
}

/// One sweep over the directional parts:
/// `y ← (I − θ·dt·L_i)⁻¹ (y − θ·dt·L_i·r)`.
pub(crate) fn directional_sweep(
    split: &FdmOperatorSplit,
    mut y: Vec<Real>,
    r: &[Real],
    theta_dt: Real,
    bc_set: &FdmBoundaryConditionSet,
    t: Time,
) -> Result<Vec<Real>> {
    for i in 0..split.n_directions() {
        let rhs = axpy(-theta_dt, &split.apply_direction(i, r), &y);
        y = implicit_solve(split.direction(i), rhs, theta_dt, bc_set, t)?;
    }
    Ok(y)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scheme_names() {
        assert_eq!("CrankNicolson".parse::<FdmSchemeType>().unwrap(), FdmSchemeType::CrankNicolson);
        assert_eq!("crank-nicolson".parse::<FdmSchemeType>().unwrap(), FdmSchemeType::CrankNicolson);
        assert_eq!("tr_bdf2".parse::<FdmSchemeType>().unwrap(), FdmSchemeType::TrBdf2);
        assert_eq!(
            "Modified Craig Sneyd".parse::<FdmSchemeType>().unwrap(),
            FdmSchemeType::ModifiedCraigSneyd
        );
        for t in FdmSchemeType::ALL {
            assert_eq!(t.to_string().parse::<FdmSchemeType>().unwrap(), t);
        }
        assert!("Leapfrog".parse::<FdmSchemeType>().unwrap_err().is_configuration());
    }

    #[test]
    fn published_parameters_validate() {
        for desc in [
            FdmSchemeDesc::douglas(),
            FdmSchemeDesc::crank_nicolson(),
            FdmSchemeDesc::craig_sneyd(),
            FdmSchemeDesc::modified_craig_sneyd(),
            FdmSchemeDesc::hundsdorfer(),
            FdmSchemeDesc::modified_hundsdorfer(),
            FdmSchemeDesc::explicit_euler(),
            FdmSchemeDesc::implicit_euler(),
            FdmSchemeDesc::method_of_lines(),
            FdmSchemeDesc::tr_bdf2(),
        ] {
            assert!(desc.validate().is_ok(), "{desc:?}");
        }
        assert!((FdmSchemeDesc::hundsdorfer().theta - 0.788_675_134_594_812_9).abs() < 1e-15);
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        let bad = [
            FdmSchemeDesc::new(FdmSchemeType::CrankNicolson, 1.5, 0.0),
            FdmSchemeDesc::new(FdmSchemeType::Douglas, -0.1, 0.0),
            FdmSchemeDesc::new(FdmSchemeType::CraigSneyd, 0.5, 2.0),
            FdmSchemeDesc::new(FdmSchemeType::MethodOfLines, 0.0, 0.01),
            FdmSchemeDesc::new(FdmSchemeType::TrBdf2, 1.0, 0.0),
            FdmSchemeDesc::new(FdmSchemeType::ImplicitEuler, Real::NAN, 0.0),
        ];
        for desc in bad {
            assert!(desc.validate().unwrap_err().is_configuration(), "{desc:?}");
        }
    }

    #[test]
    fn dispatch_reports_the_variant() {
        let op = test_support::HeatOp::new(11, None);
        let bc = FdmBoundaryConditionSet::empty();
        let scheme = FdmScheme::new(&FdmSchemeDesc::tr_bdf2(), &op, &bc).unwrap();
        assert_eq!(scheme.scheme_type(), FdmSchemeType::TrBdf2);
    }

    #[test]
    fn step_checks_sizes_and_direction() {
        let op = test_support::HeatOp::new(11, None);
        let bc = FdmBoundaryConditionSet::empty();
        let scheme = FdmScheme::new(&FdmSchemeDesc::douglas(), &op, &bc).unwrap();
        let mut short = vec![0.0; 5];
        assert!(scheme.step(&mut short, 1.0, 0.5).unwrap_err().is_configuration());
        let mut a = vec![1.0; 11];
        assert!(scheme.step(&mut a, 0.5, 1.0).unwrap_err().is_domain());
        assert_eq!(a, vec![1.0; 11]);
    }
}
