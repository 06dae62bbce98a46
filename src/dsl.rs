use crate::error::Result;
use crate::inputs::Memberships;
use crate::ops::{not, AndOp, OrOp};
use crate::variable::Variable;

/// A rule condition. Leaves test one term of an input variable.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Is(Variable, String),
    And(Vec<Expr>),
    Or(Vec<Expr>),
    Not(Box<Expr>),
}

impl Expr {
    pub fn all(exprs: impl IntoIterator<Item = Expr>) -> Self {
        Expr::And(exprs.into_iter().collect())
    }

    pub fn any(exprs: impl IntoIterator<Item = Expr>) -> Self {
        Expr::Or(exprs.into_iter().collect())
    }

    pub fn or(self, rhs: Expr) -> Self {
        match self {
            Expr::Or(mut exprs) => {
                exprs.push(rhs);
                Expr::Or(exprs)
            },
            lhs => Expr::Or(vec![lhs, rhs]),
        }
    }

    pub fn and(self, rhs: Expr) -> Self {
        match self {
            Expr::And(mut exprs) => {
                exprs.push(rhs);
                Expr::And(exprs)
            },
            lhs => Expr::And(vec![lhs, rhs]),
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Expr::Not(Box::new(self))
    }

    /// Every `(variable, term)` leaf, left to right.
    pub fn propositions(&self) -> Vec<(Variable, &str)> {
        let mut props = Vec::new();

        fn parse<'p>(expr: &'p Expr, out: &mut Vec<(Variable, &'p str)>) {
            match expr {
                Expr::Is(var, term) => out.push((*var, term.as_str())),
                Expr::And(exprs) | Expr::Or(exprs) => {
                    for expr in exprs {
                        parse(expr, out);
                    }
                },
                Expr::Not(expr) => parse(expr, out),
            }
        }

        parse(self, &mut props);

        props
    }

    /// Truth degree of the condition given fuzzified inputs.
    pub fn eval(&self, memberships: &Memberships<'_>, and_op: AndOp, or_op: OrOp) -> Result<f64> {
        match self {
            Expr::Is(var, term) => memberships.degree(*var, term),
            Expr::And(exprs) => fold(exprs, memberships, and_op, or_op, 1., |u, v| and_op.call(u, v)),
            Expr::Or(exprs) => fold(exprs, memberships, and_op, or_op, 0., |u, v| or_op.call(u, v)),
            Expr::Not(expr) => Ok(not(expr.eval(memberships, and_op, or_op)?)),
        }
    }
}

fn fold(
    exprs: &[Expr],
    memberships: &Memberships<'_>,
    and_op: AndOp,
    or_op: OrOp,
    identity: f64,
    op: impl Fn(f64, f64) -> f64,
) -> Result<f64> {
    let mut degrees = exprs.iter().map(|expr| expr.eval(memberships, and_op, or_op));

    // Seeding with the first operand rather than the identity keeps the
    // result bit-exact for the bounded operators
    let Some(first) = degrees.next() else {
        return Ok(identity);
    };

    degrees.try_fold(first?, |acc, degree| Ok(op(acc, degree?)))
}

/// One conclusion of a rule: `variable is term`, capped at `weight`.
#[derive(Clone, Debug, PartialEq)]
pub struct Consequence {
    pub(crate) var: Variable,
    pub(crate) term: String,
    pub(crate) weight: f64,
}

impl Consequence {
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn term(&self) -> &str {
        &self.term
    }
}

impl Variable {
    pub fn is(self, term: impl Into<String>) -> Expr {
        Expr::Is(self, term.into())
    }

    pub fn conclude(self, term: impl Into<String>) -> Consequence {
        Consequence {
            var: self,
            term: term.into(),
            weight: 1.,
        }
    }
}
