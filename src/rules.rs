use crate::dsl::{Consequence, Expr};
use crate::error::{ConfigError, Result};
use crate::inputs::Memberships;
use crate::ops::{AndOp, OrOp};
use crate::variable::{Role, VariableKey, Variables};

/// Ordered rule base. Order doesn't change the result but keeps iteration
/// and diagnostics deterministic.
#[derive(Clone, Debug, Default)]
pub struct Rules(pub(crate) Vec<Rule>);

impl Rules {
    pub fn new() -> Self {
        Rules(Vec::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Rules(Vec::with_capacity(capacity))
    }

    pub fn add(&mut self, condition: Expr, consequences: impl IntoIterator<Item = Consequence>) {
        self.0.push(Rule {
            condition,
            consequences: consequences.into_iter().collect(),
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn validate(&self, vars: &Variables) -> Result<(), ConfigError> {
        if self.0.is_empty() {
            return Err(ConfigError::NoRules);
        }

        for (i, rule) in self.0.iter().enumerate() {
            rule.validate(i, vars)?;
        }

        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Rule {
    pub(crate) condition: Expr,
    pub(crate) consequences: Vec<Consequence>,
}

impl Rule {
    pub fn condition(&self) -> &Expr {
        &self.condition
    }

    pub fn consequences(&self) -> &[Consequence] {
        &self.consequences
    }

    /// Firing strength: the condition's truth degree.
    pub fn strength(&self, memberships: &Memberships<'_>, and_op: AndOp, or_op: OrOp) -> Result<f64> {
        self.condition.eval(memberships, and_op, or_op)
    }

    /// Mamdani implication: each consequence is activated at the firing
    /// strength clipped to its weight.
    pub fn activations(&self, strength: f64) -> impl Iterator<Item = (VariableKey, &str, f64)> + '_ {
        self.consequences
            .iter()
            .map(move |c| (c.var.key, c.term.as_str(), f64::min(strength, c.weight)))
    }

    fn validate(&self, rule: usize, vars: &Variables) -> Result<(), ConfigError> {
        fn check_operands(expr: &Expr, rule: usize) -> Result<(), ConfigError> {
            match expr {
                Expr::Is(..) => Ok(()),
                Expr::And(exprs) if exprs.is_empty() => Err(ConfigError::EmptyExpression { rule, operator: "and" }),
                Expr::Or(exprs) if exprs.is_empty() => Err(ConfigError::EmptyExpression { rule, operator: "or" }),
                Expr::And(exprs) | Expr::Or(exprs) => exprs.iter().try_for_each(|e| check_operands(e, rule)),
                Expr::Not(expr) => check_operands(expr, rule),
            }
        }

        check_operands(&self.condition, rule)?;

        if self.consequences.is_empty() {
            return Err(ConfigError::NoConsequences(rule));
        }

        let premises = self
            .condition
            .propositions()
            .into_iter()
            .map(|(var, term)| (var, term, Role::Antecedent));
        let conclusions = self
            .consequences
            .iter()
            .map(|c| (c.var, c.term.as_str(), Role::Consequent));

        for (handle, term, role) in premises.chain(conclusions) {
            let Some(var) = vars.get(handle) else {
                return Err(ConfigError::ForeignVariable);
            };

            if var.role() != role {
                return Err(ConfigError::RoleMismatch {
                    rule,
                    variable: var.name().to_owned(),
                    expected: match role {
                        Role::Antecedent => "an antecedent",
                        Role::Consequent => "a consequent",
                    },
                });
            }

            if !var.has_term(term) {
                return Err(ConfigError::UnknownTerm {
                    variable: var.name().to_owned(),
                    term: term.to_owned(),
                });
            }
        }

        for consequence in &self.consequences {
            let weight = consequence.weight;

            if !(weight > 0. && weight <= 1.) {
                return Err(ConfigError::InvalidWeight { rule, weight });
            }
        }

        Ok(())
    }
}
