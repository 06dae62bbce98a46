use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};

use crate::error::ConfigError;
use crate::linspace::Linspace;
use crate::membership::MembershipFn;
use crate::ops::{DefuzzificationOp, EmptyOutput, OrOp};

/// Grids beyond this size are almost certainly a mistyped step.
pub const MAX_UNIVERSE_POINTS: usize = 1_000_000;

new_key_type! {
    /// A variable key
    pub struct VariableKey;
}

static NEXT_REGISTRY: AtomicU64 = AtomicU64::new(0);

/// Handle to a variable registered in [`Variables`]. Used to build rules.
/// Only resolves against the registry (or a clone of it) that issued it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Variable {
    pub(crate) registry: u64,
    pub(crate) key: VariableKey,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Input, used in rule conditions
    Antecedent,
    /// Output, produced by rule conclusions
    Consequent,
}

/// The closed range a variable is defined over, sampled every `step`.
#[derive(Clone, Debug, PartialEq)]
pub struct Universe {
    min: f64,
    max: f64,
    step: f64,
    grid: Vec<f64>,
}

impl Universe {
    pub fn new(range: RangeInclusive<f64>, step: f64) -> Result<Self, ConfigError> {
        let (min, max) = range.into_inner();

        if !(min.is_finite() && max.is_finite() && min < max && step.is_finite() && step > 0.) {
            return Err(ConfigError::InvalidUniverse { min, max, step });
        }

        // One slot is kept for max when the step doesn't divide the range
        let Some(num) = Linspace::count(min, max, step, MAX_UNIVERSE_POINTS - 1) else {
            return Err(ConfigError::UniverseTooLarge {
                min,
                max,
                step,
                limit: MAX_UNIVERSE_POINTS,
            });
        };

        let mut grid: Vec<f64> = Linspace::arange(min, step, num).collect();

        // Never empty: count() is at least one
        let last = grid.len() - 1;

        if max - grid[last] <= step * 1e-9 {
            // Close enough: pin it so max itself is sampled
            grid[last] = max;
        } else {
            grid.push(max);
        }

        Ok(Self { min, max, step, grid })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn grid(&self) -> &[f64] {
        &self.grid
    }

    pub fn contains(&self, x: f64) -> bool {
        self.min <= x && x <= self.max
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Term {
    pub(crate) membership: MembershipFn,
    /// `membership` evaluated over the universe grid
    pub(crate) sampled: Vec<f64>,
}

/// A named set of terms over one universe of discourse.
#[derive(Clone, Debug)]
pub struct LinguisticVariable {
    name: String,
    role: Role,
    universe: Universe,
    pub(crate) terms: IndexMap<String, Term>,
}

impl LinguisticVariable {
    pub fn new(name: impl Into<String>, universe: Universe, role: Role) -> Self {
        Self {
            name: name.into(),
            role,
            universe,
            terms: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    pub fn terms(&self) -> impl Iterator<Item = (&str, &MembershipFn)> {
        self.terms.iter().map(|(name, term)| (name.as_str(), &term.membership))
    }

    pub fn has_term(&self, term: &str) -> bool {
        self.terms.contains_key(term)
    }

    pub fn add_term(&mut self, term: impl Into<String>, membership: MembershipFn) -> Result<(), ConfigError> {
        let term = term.into();

        if self.terms.contains_key(&term) {
            return Err(ConfigError::DuplicateTerm {
                variable: self.name.clone(),
                term,
            });
        }

        membership.validate(&self.name, &term, &self.universe)?;

        let sampled = membership.sample(self.universe.grid());

        self.terms.insert(term, Term { membership, sampled });

        Ok(())
    }

    /// Degree of `x` in every term, in definition order.
    pub fn fuzzify(&self, x: f64) -> IndexMap<String, f64> {
        self.terms
            .iter()
            .map(|(name, term)| (name.clone(), term.membership.evaluate(x)))
            .collect()
    }

    /// Builds the output fuzzy set from per-term activation levels: each term
    /// is clipped at its activation and the clipped sets are unioned with
    /// `aggregation`. Terms missing from `activation` don't contribute.
    pub fn aggregate(&self, activation: &IndexMap<String, f64>, aggregation: OrOp) -> Vec<f64> {
        let mut aggregated = vec![0.; self.universe.grid.len()];

        for (name, term) in &self.terms {
            let level = activation.get(name).copied().unwrap_or(0.);

            if level <= 0. {
                continue;
            }

            for (agg, &mu) in aggregated.iter_mut().zip(&term.sampled) {
                *agg = aggregation.call(*agg, f64::min(mu, level));
            }
        }

        aggregated
    }

    /// Crisp value for the aggregated set built from `activation`. Returns
    /// `None` when that set is zero everywhere and `empty_output` asks for
    /// an error.
    pub fn defuzzify(
        &self,
        activation: &IndexMap<String, f64>,
        aggregation: OrOp,
        defuzz_op: DefuzzificationOp,
        empty_output: EmptyOutput,
    ) -> Option<f64> {
        let aggregated = self.aggregate(activation, aggregation);

        if aggregated.iter().all(|mu| *mu == 0.) {
            return match empty_output {
                EmptyOutput::Error => None,
                EmptyOutput::Midpoint => Some(self.universe.midpoint()),
            };
        }

        Some(defuzz_op.call(self.universe.grid(), &aggregated))
    }
}

#[derive(Clone, Debug)]
pub struct Variables {
    id: u64,
    pub(crate) vars: SlotMap<VariableKey, LinguisticVariable>,
    names: HashMap<String, VariableKey>,
}

impl Default for Variables {
    fn default() -> Self {
        Self {
            id: NEXT_REGISTRY.fetch_add(1, Ordering::Relaxed),
            vars: SlotMap::with_key(),
            names: HashMap::new(),
        }
    }
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&self, key: VariableKey) -> Variable {
        Variable { registry: self.id, key }
    }

    pub fn add(
        &mut self,
        name: impl Into<String>,
        universe_range: RangeInclusive<f64>,
        step: f64,
        role: Role,
    ) -> Result<Variable, ConfigError> {
        let name = name.into();

        if self.names.contains_key(&name) {
            return Err(ConfigError::DuplicateVariable(name));
        }

        let universe = Universe::new(universe_range, step)?;
        let key = self.vars.insert(LinguisticVariable::new(name.clone(), universe, role));

        self.names.insert(name, key);

        Ok(self.handle(key))
    }

    pub fn add_term(
        &mut self,
        var: Variable,
        term: impl Into<String>,
        membership: MembershipFn,
    ) -> Result<(), ConfigError> {
        if var.registry != self.id {
            return Err(ConfigError::ForeignVariable);
        }

        let Some(variable) = self.vars.get_mut(var.key) else {
            return Err(ConfigError::ForeignVariable);
        };

        variable.add_term(term, membership)
    }

    /// `None` for a handle issued by another registry.
    pub fn get(&self, var: Variable) -> Option<&LinguisticVariable> {
        if var.registry != self.id {
            return None;
        }

        self.vars.get(var.key)
    }

    pub fn find(&self, name: &str) -> Option<Variable> {
        self.names.get(name).map(|key| self.handle(*key))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Variable, &LinguisticVariable)> {
        self.vars.iter().map(|(key, var)| (self.handle(key), var))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}
