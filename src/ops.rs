use std::iter::Sum;
use std::ops::AddAssign;

use num::Float;
use serde::{Deserialize, Serialize};

use crate::math::interp;

/// And operator method for combining the compositions of propositions
/// in a fuzzy rule premise.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AndOp {
    #[default]
    Min,
    Prod,
    BoundedProd,
    DrasticProd,
}

impl AndOp {
    pub fn call<F: Float>(self, u: F, v: F) -> F {
        match self {
            Self::Min => F::min(u, v),
            Self::Prod => u * v,
            Self::BoundedProd => F::max(F::zero(), u + v - F::one()),
            Self::DrasticProd => {
                if v == F::one() {
                    u
                } else if u == F::one() {
                    v
                } else {
                    F::zero()
                }
            },
        }
    }
}

/// Or operator method for combining the compositions of propositions
/// in a fuzzy rule premise. Also aggregates the consequences of the rules.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrOp {
    #[default]
    Max,
    ProbOr,
    BoundedSum,
    DrasticSum,
}

impl OrOp {
    pub fn call<F: Float>(self, u: F, v: F) -> F {
        match self {
            Self::Max => F::max(u, v),
            Self::ProbOr => u + v - u * v,
            Self::BoundedSum => F::min(F::one(), u + v),
            Self::DrasticSum => {
                if v == F::zero() {
                    u
                } else if u == F::zero() {
                    v
                } else {
                    F::one()
                }
            },
        }
    }
}

/// Fuzzy complement
pub fn not<F: Float>(u: F) -> F {
    F::one() - u
}

/// Method for defuzzifcating the resulting membership function.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefuzzificationOp {
    /// Center of Gravity
    #[default]
    Cog,
    /// Bisector of Area
    Boa,
    /// Mean of the values for which the membership function is maximum
    Mom,
    /// Largest value for which the membership function is maximum
    Lom,
    /// Smallest value for which the membership function is maximum
    Som,
}

impl DefuzzificationOp {
    /// `universe` and `membership` are parallel; `membership` must not be all zero.
    pub fn call<F: Float + Sum + AddAssign>(self, universe: &[F], membership: &[F]) -> F {
        match self {
            Self::Cog => {
                let den = membership.iter().copied().sum::<F>();
                let num = universe
                    .iter()
                    .zip(membership)
                    .map(|(&u, &m)| u * m)
                    .sum::<F>();

                num / den
            },
            Self::Boa => {
                let two = F::one() + F::one();
                let areas: Vec<F> = universe
                    .windows(2)
                    .zip(membership.windows(2))
                    .map(|(u, m)| (m[0] + m[1]) * (u[1] - u[0]) / two)
                    .collect();

                let total_area = areas.iter().copied().sum::<F>();
                let target = total_area / two;
                let mut cum_area = F::zero();
                let mut i_area = 0;

                for (i, area) in areas.iter().enumerate() {
                    cum_area += *area;
                    i_area = i;
                    if cum_area >= target {
                        break;
                    }
                }

                let (Some(&area), Some(&x0), Some(&x1)) =
                    (areas.get(i_area), universe.get(i_area), universe.get(i_area + 1))
                else {
                    return universe.first().copied().unwrap_or_else(F::zero);
                };

                interp(target, &[(cum_area - area, x0), (cum_area, x1)])
            },
            Self::Mom => {
                let maximum = max_membership(membership);
                let (len, sum) = universe
                    .iter()
                    .zip(membership)
                    .filter(|&(_, &m)| m == maximum)
                    .fold((0usize, F::zero()), |(len, accum), (&u, _)| (len + 1, accum + u));

                sum / F::from(len).unwrap_or_else(F::one)
            },
            Self::Lom => at_maximum(universe, membership).fold(F::neg_infinity(), F::max),
            Self::Som => at_maximum(universe, membership).fold(F::infinity(), F::min),
        }
    }
}

fn max_membership<F: Float>(membership: &[F]) -> F {
    membership.iter().copied().fold(F::zero(), F::max)
}

fn at_maximum<'a, F: Float>(universe: &'a [F], membership: &'a [F]) -> impl Iterator<Item = F> + 'a {
    let maximum = max_membership(membership);

    universe
        .iter()
        .zip(membership)
        .filter_map(move |(&u, &m)| if m == maximum { Some(u) } else { None })
}

/// What to report when no rule contributes to an output variable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyOutput {
    /// Fail the run with [`Error::NoRuleFired`](crate::Error::NoRuleFired)
    #[default]
    Error,
    /// Fall back to the middle of the universe
    Midpoint,
}

#[test]
fn test_combinators() {
    let degrees = [0., 0.1, 0.25, 0.5, 0.75, 0.9, 1.];

    for &p in &degrees {
        assert_eq!(not(p), 1. - p);

        for &q in &degrees {
            assert_eq!(AndOp::Min.call(p, q), f64::min(p, q));
            assert_eq!(OrOp::Max.call(p, q), f64::max(p, q));
            assert_eq!(AndOp::Min.call(p, q), AndOp::Min.call(q, p));
            assert_eq!(OrOp::Max.call(p, q), OrOp::Max.call(q, p));
        }
    }
}

#[test]
fn test_norm_identities() {
    for p in [0., 0.3, 0.8, 1.] {
        for and_op in [AndOp::Min, AndOp::Prod, AndOp::BoundedProd, AndOp::DrasticProd] {
            approx::assert_abs_diff_eq!(and_op.call(p, 1.), p, epsilon = 1e-12);
            approx::assert_abs_diff_eq!(and_op.call(p, 0.), 0., epsilon = 1e-12);
        }
        for or_op in [OrOp::Max, OrOp::ProbOr, OrOp::BoundedSum, OrOp::DrasticSum] {
            approx::assert_abs_diff_eq!(or_op.call(p, 0.), p, epsilon = 1e-12);
            approx::assert_abs_diff_eq!(or_op.call(p, 1.), 1., epsilon = 1e-12);
        }
    }
}

#[test]
fn test_defuzzification() {
    let universe: Vec<f64> = (0..=10).map(f64::from).collect();
    let membership = [0., 0., 0.5, 1., 1., 1., 0.5, 0., 0., 0., 0.];

    assert_eq!(DefuzzificationOp::Cog.call(&universe, &membership), 4.);
    assert_eq!(DefuzzificationOp::Boa.call(&universe, &membership), 4.);
    assert_eq!(DefuzzificationOp::Mom.call(&universe, &membership), 4.);
    assert_eq!(DefuzzificationOp::Som.call(&universe, &membership), 3.);
    assert_eq!(DefuzzificationOp::Lom.call(&universe, &membership), 5.);
}

#[test]
fn test_ops_from_config_names() {
    let op: DefuzzificationOp = serde_json::from_str("\"boa\"").unwrap();
    let and_op: AndOp = serde_json::from_str("\"bounded_prod\"").unwrap();

    assert_eq!(op, DefuzzificationOp::Boa);
    assert_eq!(and_op, AndOp::BoundedProd);
}
