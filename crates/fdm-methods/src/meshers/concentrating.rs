//! Concentrating meshers.
//!
//! A uniform partition `u ∈ [0, 1]` is mapped through a hyperbolic-sine
//! change of variables so that nodes cluster around chosen critical levels.
//! The smaller the density parameter, the tighter the clustering. A critical
//! point flagged as required is placed exactly on a node by inserting a
//! piecewise-linear reparametrisation of `u` before the sinh map.

use fdm_core::{ensure, errors::Result, Real, Size};
use fdm_math::{brent_from_guess, close_enough, AdaptiveRungeKutta, Interpolation1D, LinearInterpolation};

use super::{check_bounds, Fdm1dMesher};

/// Default accuracy of the multi-point mesher's ODE integration.
pub const DEFAULT_MULTI_POINT_TOLERANCE: Real = 1e-8;

/// A critical level around which a concentrating mesher clusters nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConcentratingPoint {
    /// The critical level.
    pub point: Real,
    /// Concentration width relative to the domain length.
    pub density: Real,
    /// Whether the level must coincide exactly with a node.
    pub required: bool,
}

impl ConcentratingPoint {
    /// Create a concentration point.
    pub fn new(point: Real, density: Real, required: bool) -> Self {
        Self {
            point,
            density,
            required,
        }
    }

    fn validate(&self, start: Real, end: Real) -> Result<()> {
        ensure!(
            self.density.is_finite() && self.density > 0.0,
            Configuration => "concentration density must be positive, got {}",
            self.density
        );
        ensure!(
            self.point >= start && self.point <= end,
            Domain => "critical point {} outside the mesher bounds [{start}, {end}]",
            self.point
        );
        Ok(())
    }
}

impl Fdm1dMesher {
    /// Mesher on `[start, end]` concentrating nodes around `point`, or a
    /// uniform mesher when `point` is `None`.
    ///
    /// # Errors
    /// * [`Configuration`](fdm_core::Error::Configuration) for `end <= start`,
    ///   a non-positive density, or a required interior point on fewer than
    ///   three nodes.
    /// * [`Domain`](fdm_core::Error::Domain) if the point lies outside
    ///   `[start, end]`.
    pub fn concentrating(
        start: Real,
        end: Real,
        size: Size,
        point: Option<ConcentratingPoint>,
    ) -> Result<Self> {
        check_bounds(start, end, size)?;
        let Some(cp) = point else {
            return Self::uniform(start, end, size);
        };
        cp.validate(start, end)?;

        #[cfg(feature = "logging")]
        tracing::debug!(
            start,
            end,
            size,
            point = cp.point,
            density = cp.density,
            required = cp.required,
            "building concentrating mesher"
        );

        let dx = 1.0 / (size - 1) as Real;
        let density = cp.density * (end - start);
        let c1 = ((start - cp.point) / density).asinh();
        let c2 = ((end - cp.point) / density).asinh();

        let transform = if cp.required {
            let mut u = vec![0.0];
            let mut z = vec![0.0];
            if !close_enough(cp.point, start, 42) && !close_enough(cp.point, end, 42) {
                ensure!(
                    size >= 3,
                    Configuration => "a required interior point needs at least 3 nodes"
                );
                let z0 = -c1 / (c2 - c1);
                let k = (z0 * (size - 1) as Real).round().clamp(1.0, (size - 2) as Real);
                u.push(k / (size - 1) as Real);
                z.push(z0);
            }
            u.push(1.0);
            z.push(1.0);
            Some(LinearInterpolation::new(&u, &z)?)
        } else {
            None
        };

        let mut locations = vec![0.0; size];
        locations[0] = start;
        locations[size - 1] = end;
        for (i, loc) in locations.iter_mut().enumerate().take(size - 1).skip(1) {
            let ui = i as Real * dx;
            let li = transform.as_ref().map_or(ui, |t| t.value(ui));
            *loc = cp.point + density * (c1 * (1.0 - li) + c2 * li).sinh();
        }

        Self::from_locations(locations)
    }

    /// Mesher on `[start, end]` concentrating nodes around several points.
    ///
    /// The grid is the solution `y(u)` of
    ///
    /// `dy/du = a / sqrt(Σ_i 1 / (β_i + (y − p_i)²))`, `y(0) = start`,
    ///
    /// with `β_i = (density_i · (end − start))²` and the scale `a` chosen by
    /// a root search so that `y(1) = end`. Required points are then pinned
    /// to nodes through a piecewise-linear reparametrisation of `u`.
    ///
    /// With a single point this reproduces [`Fdm1dMesher::concentrating`].
    pub fn concentrating_multi(
        start: Real,
        end: Real,
        size: Size,
        points: &[ConcentratingPoint],
        tol: Real,
    ) -> Result<Self> {
        check_bounds(start, end, size)?;
        if points.is_empty() {
            return Self::uniform(start, end, size);
        }
        for cp in points {
            cp.validate(start, end)?;
        }
        ensure!(
            tol > 0.0 && tol.is_finite(),
            Configuration => "mesher tolerance must be positive, got {tol}"
        );

        #[cfg(feature = "logging")]
        tracing::debug!(
            start,
            end,
            size,
            n_points = points.len(),
            "building multi-point concentrating mesher"
        );

        let densities: Vec<Real> = points.iter().map(|cp| cp.density * (end - start)).collect();
        let betas: Vec<Real> = densities.iter().map(|d| d * d).collect();

        let a_init = points
            .iter()
            .zip(&densities)
            .map(|(cp, d)| ((end - cp.point) / d).asinh() - ((start - cp.point) / d).asinh())
            .sum::<Real>()
            / points.len() as Real;

        let rk = AdaptiveRungeKutta::new(tol, 1e-4, 0.0);
        let integrate = |a: Real, y0: Real, x0: Real, x1: Real| -> Result<Real> {
            let rhs = |_u: Real, y: &[Real]| -> Result<Vec<Real>> {
                let s: Real = points
                    .iter()
                    .zip(&betas)
                    .map(|(cp, beta)| 1.0 / (beta + (y[0] - cp.point).powi(2)))
                    .sum();
                Ok(vec![a / s.sqrt()])
            };
            Ok(rk.integrate(&rhs, &[y0], x0, x1)?[0])
        };

        // the root search needs a plain function; integration failures are
        // reported as NaN and surfaced afterwards
        let a = brent_from_guess(
            |a| integrate(a, start, 0.0, 1.0).map_or(Real::NAN, |y1| y1 - end),
            tol,
            a_init,
            0.1 * a_init,
        )?;

        let dx = 1.0 / (size - 1) as Real;
        let mut x = vec![0.0; size];
        let mut y = vec![start; size];
        for i in 1..size {
            x[i] = i as Real * dx;
            y[i] = integrate(a, y[i - 1], x[i - 1], x[i])?;
        }

        let dy = y[size - 1] - end;
        for (i, yi) in y.iter_mut().enumerate().skip(1) {
            *yi -= i as Real * dx * dy;
        }

        let ode_solution = LinearInterpolation::new(&x, &y)?;

        let mut w: Vec<(Real, Real)> = vec![(0.0, 0.0)];
        for cp in points.iter().filter(|cp| cp.required) {
            if cp.point > start && cp.point < end {
                let j = y.partition_point(|&v| v < cp.point).min(size - 1);
                let e = brent_from_guess(
                    |u| ode_solution.value(u) - cp.point,
                    f64::EPSILON,
                    x[j],
                    0.5 / size as Real,
                )?;
                w.push((x[size - 2].min(x[j]), e));
            }
        }
        w.push((1.0, 1.0));
        w.sort_by(|l, r| l.partial_cmp(r).unwrap_or(std::cmp::Ordering::Equal));
        w.dedup_by(|l, r| close_enough(l.0, r.0, 42));

        let (u, z): (Vec<Real>, Vec<Real>) = w.into_iter().unzip();
        let transform = LinearInterpolation::new(&u, &z)?;

        let mut locations: Vec<Real> = (0..size)
            .map(|i| ode_solution.value(transform.value(i as Real * dx)))
            .collect();
        locations[0] = start;
        locations[size - 1] = end;

        Self::from_locations(locations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_node(m: &Fdm1dMesher, x: Real, tol: Real) -> bool {
        m.locations().iter().any(|l| (l - x).abs() <= tol)
    }

    #[test]
    fn required_point_becomes_a_node() {
        let m = Fdm1dMesher::concentrating(
            0.0,
            10.0,
            51,
            Some(ConcentratingPoint::new(3.3, 0.1, true)),
        )
        .unwrap();
        assert_eq!(m.size(), 51);
        assert_eq!(m.lower(), 0.0);
        assert_eq!(m.upper(), 10.0);
        assert!(has_node(&m, 3.3, 1e-12));
    }

    #[test]
    fn nodes_cluster_around_the_point() {
        let m = Fdm1dMesher::concentrating(
            0.0,
            1.0,
            41,
            Some(ConcentratingPoint::new(0.5, 0.05, false)),
        )
        .unwrap();
        let i = m.nearest_index(0.5);
        let centre = m.dplus(i).unwrap();
        let edge = m.dplus(0).unwrap();
        assert!(centre < 0.5 * edge, "centre {centre} vs edge {edge}");
    }

    #[test]
    fn point_on_the_boundary_is_not_duplicated() {
        let m = Fdm1dMesher::concentrating(
            0.0,
            1.0,
            11,
            Some(ConcentratingPoint::new(0.0, 0.1, true)),
        )
        .unwrap();
        assert_eq!(m.size(), 11);
        assert_eq!(m.locations().iter().filter(|&&l| l == 0.0).count(), 1);
    }

    #[test]
    fn invalid_points_are_rejected() {
        let err = Fdm1dMesher::concentrating(0.0, 1.0, 11, Some(ConcentratingPoint::new(2.0, 0.1, true)))
            .unwrap_err();
        assert!(err.is_domain());
        let err = Fdm1dMesher::concentrating(0.0, 1.0, 11, Some(ConcentratingPoint::new(0.5, 0.0, true)))
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn single_point_multi_mesher_matches_sinh_mesher() {
        let cp = ConcentratingPoint::new(0.3, 0.2, false);
        let single = Fdm1dMesher::concentrating(0.0, 1.0, 21, Some(cp)).unwrap();
        let multi = Fdm1dMesher::concentrating_multi(0.0, 1.0, 21, &[cp], 1e-10).unwrap();
        for (a, b) in single.locations().iter().zip(multi.locations()) {
            assert!((a - b).abs() < 1e-6, "{a} vs {b}");
        }
    }

    #[test]
    fn multi_point_mesher_includes_required_points() {
        let points = [
            ConcentratingPoint::new(-0.5, 0.05, true),
            ConcentratingPoint::new(0.8, 0.1, true),
        ];
        let m = Fdm1dMesher::concentrating_multi(-2.0, 2.0, 61, &points, 1e-8).unwrap();
        assert_eq!(m.size(), 61);
        assert_eq!(m.lower(), -2.0);
        assert_eq!(m.upper(), 2.0);
        assert!(has_node(&m, -0.5, 1e-10));
        assert!(has_node(&m, 0.8, 1e-10));
    }
}
