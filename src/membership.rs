use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::math::interp;
use crate::variable::Universe;

/// Shape of a term's membership function. Every shape is total over the reals:
/// values outside the support (and NaN) map to zero.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum MembershipFn {
    /// Rises over `(a, b)`, peaks at exactly `b`, falls over `(b, c)`.
    Triangular { a: f64, b: f64, c: f64 },
    /// Rises over `(a, b)`, flat at one on `[b, c]`, falls over `(c, d)`.
    Trapezoidal { a: f64, b: f64, c: f64, d: f64 },
    Gaussian { mean: f64, sigma: f64 },
    /// Linear interpolation through `(x, degree)` breakpoints sorted by x.
    Piecewise { points: Vec<(f64, f64)> },
}

impl MembershipFn {
    pub fn triangular(a: f64, b: f64, c: f64) -> Self {
        MembershipFn::Triangular { a, b, c }
    }

    pub fn trapezoidal(a: f64, b: f64, c: f64, d: f64) -> Self {
        MembershipFn::Trapezoidal { a, b, c, d }
    }

    pub fn gaussian(mean: f64, sigma: f64) -> Self {
        MembershipFn::Gaussian { mean, sigma }
    }

    pub fn piecewise(points: impl Into<Vec<(f64, f64)>>) -> Self {
        MembershipFn::Piecewise { points: points.into() }
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        match *self {
            MembershipFn::Triangular { a, b, c } => triangular(x, a, b, c),
            MembershipFn::Trapezoidal { a, b, c, d } => {
                if x < b {
                    triangular(x, a, b, b)
                } else if x > c {
                    triangular(x, c, c, d)
                } else if x <= c {
                    1.
                } else {
                    // NaN
                    0.
                }
            },
            MembershipFn::Gaussian { mean, sigma } => {
                let degree = (-(x - mean).powi(2) / (2. * sigma * sigma)).exp();

                if degree.is_nan() {
                    0.
                } else {
                    degree
                }
            },
            MembershipFn::Piecewise { ref points } => interp(x, points),
        }
    }

    pub fn sample(&self, grid: &[f64]) -> Vec<f64> {
        grid.iter().map(|&x| self.evaluate(x)).collect()
    }

    /// Checks the parameters are well formed and every breakpoint lies in `universe`.
    pub(crate) fn validate(&self, variable: &str, term: &str, universe: &Universe) -> Result<(), ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidMembership {
            variable: variable.to_owned(),
            term: term.to_owned(),
            reason: reason.to_owned(),
        };

        let breakpoints: Vec<f64> = match self {
            MembershipFn::Triangular { a, b, c } => {
                if !(a <= b && b <= c) {
                    return Err(invalid("triangular breakpoints must satisfy a <= b <= c"));
                }
                vec![*a, *b, *c]
            },
            MembershipFn::Trapezoidal { a, b, c, d } => {
                if !(a <= b && b <= c && c <= d) {
                    return Err(invalid("trapezoidal breakpoints must satisfy a <= b <= c <= d"));
                }
                vec![*a, *b, *c, *d]
            },
            MembershipFn::Gaussian { mean, sigma } => {
                if !(sigma.is_finite() && *sigma > 0.) {
                    return Err(invalid("gaussian sigma must be positive"));
                }
                vec![*mean]
            },
            MembershipFn::Piecewise { points } => {
                if points.is_empty() {
                    return Err(invalid("piecewise function needs at least one point"));
                }
                if points.windows(2).any(|w| !(w[0].0 <= w[1].0)) {
                    return Err(invalid("piecewise points must be sorted by x"));
                }
                if points.iter().any(|&(_, y)| !(0. ..=1.).contains(&y)) {
                    return Err(invalid("piecewise degrees must lie in [0, 1]"));
                }
                points.iter().map(|&(x, _)| x).collect()
            },
        };

        if let Some(&point) = breakpoints.iter().find(|p| !p.is_finite()) {
            return Err(invalid(&format!("breakpoint {point} is not finite")));
        }

        match breakpoints.into_iter().find(|p| !universe.contains(*p)) {
            Some(point) => Err(ConfigError::TermOutsideUniverse {
                variable: variable.to_owned(),
                term: term.to_owned(),
                point,
                min: universe.min(),
                max: universe.max(),
            }),
            None => Ok(()),
        }
    }
}

/// Mirrors skfuzzy's `trimf`: the peak wins over a degenerate edge, so
/// `a == b` gives 1 at `a` and `b == c` gives 1 at `c`.
fn triangular(x: f64, a: f64, b: f64, c: f64) -> f64 {
    if x == b {
        1.
    } else if a < x && x < b {
        (x - a) / (b - a)
    } else if b < x && x < c {
        (c - x) / (c - b)
    } else {
        0.
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn triangular_breakpoints() {
        let mf = MembershipFn::triangular(15., 25., 35.);

        assert_eq!(mf.evaluate(25.), 1.);
        assert_eq!(mf.evaluate(15.), 0.);
        assert_eq!(mf.evaluate(35.), 0.);
        assert_eq!(mf.evaluate(-1e9), 0.);
        assert_eq!(mf.evaluate(1e9), 0.);
        assert_relative_eq!(mf.evaluate(20.), 0.5);
        assert_relative_eq!(mf.evaluate(32.), 0.3, epsilon = 1e-12);
    }

    #[test]
    fn triangular_is_linear_between_breakpoints() {
        let mf = MembershipFn::triangular(0., 10., 30.);

        for i in 1..10 {
            let x = i as f64;
            assert_relative_eq!(mf.evaluate(x), x / 10., epsilon = 1e-12);
        }
        for i in 11..30 {
            let x = i as f64;
            assert_relative_eq!(mf.evaluate(x), (30. - x) / 20., epsilon = 1e-12);
        }
    }

    #[test]
    fn triangular_shoulders() {
        let cold = MembershipFn::triangular(0., 0., 20.);
        let hot = MembershipFn::triangular(30., 40., 40.);

        assert_eq!(cold.evaluate(0.), 1.);
        assert_eq!(cold.evaluate(10.), 0.5);
        assert_eq!(cold.evaluate(-0.1), 0.);
        assert_eq!(hot.evaluate(40.), 1.);
        assert_eq!(hot.evaluate(40.1), 0.);
        assert_relative_eq!(hot.evaluate(32.), 0.2, epsilon = 1e-12);
    }

    #[test]
    fn degrees_stay_in_unit_interval() {
        let shapes = [
            MembershipFn::triangular(0., 0., 20.),
            MembershipFn::trapezoidal(10., 20., 30., 45.),
            MembershipFn::gaussian(50., 8.),
            MembershipFn::piecewise(vec![(5., 0.), (10., 0.7), (20., 1.), (60., 0.)]),
        ];

        for mf in &shapes {
            for i in -20..=120 {
                let degree = mf.evaluate(i as f64 * 0.75);
                assert!((0. ..=1.).contains(&degree), "{mf:?} gave {degree}");
            }
            assert_eq!(mf.evaluate(f64::NAN), 0.);
        }

        let ramp = MembershipFn::piecewise(vec![(5., 0.), (10., 0.7)]);

        assert_relative_eq!(ramp.evaluate(7.5), 0.35, epsilon = 1e-12);
        assert_relative_eq!(ramp.evaluate(6.), 0.14, epsilon = 1e-12);
        assert_eq!(ramp.evaluate(0.), 0.);
        assert_eq!(ramp.evaluate(10.), 0.7);
        assert_eq!(ramp.evaluate(40.), 0.7);
        assert_relative_eq!(shapes[3].evaluate(15.), 0.85, epsilon = 1e-12);
    }

    #[test]
    fn trapezoid_plateau() {
        let mf = MembershipFn::trapezoidal(10., 20., 30., 40.);

        assert_eq!(mf.evaluate(20.), 1.);
        assert_eq!(mf.evaluate(25.), 1.);
        assert_eq!(mf.evaluate(30.), 1.);
        assert_eq!(mf.evaluate(15.), 0.5);
        assert_eq!(mf.evaluate(35.), 0.5);
        assert_eq!(mf.evaluate(10.), 0.);
        assert_eq!(mf.evaluate(40.), 0.);
    }

    #[test]
    fn validation() {
        let universe = Universe::new(0. ..=40., 1.).unwrap();

        assert!(MembershipFn::triangular(0., 0., 20.).validate("t", "cold", &universe).is_ok());
        assert!(matches!(
            MembershipFn::triangular(10., 5., 20.).validate("t", "cold", &universe),
            Err(ConfigError::InvalidMembership { .. })
        ));
        assert_eq!(
            MembershipFn::triangular(30., 40., 50.).validate("t", "hot", &universe),
            Err(ConfigError::TermOutsideUniverse {
                variable: "t".into(),
                term: "hot".into(),
                point: 50.,
                min: 0.,
                max: 40.,
            })
        );
        assert!(MembershipFn::gaussian(20., 0.).validate("t", "warm", &universe).is_err());
        assert!(MembershipFn::piecewise(vec![(10., 0.), (5., 1.)]).validate("t", "x", &universe).is_err());
        assert!(MembershipFn::piecewise(vec![(5., 0.), (10., 1.5)]).validate("t", "x", &universe).is_err());
    }
}
