use std::collections::HashMap;

use indexmap::IndexMap;

use crate::error::{ConfigError, Error, Result};
use crate::variable::{Role, Variable, VariableKey, Variables};

/// Crisp values bound to input variables. Values are checked against the
/// variables' universes when they are fuzzified.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Inputs(pub(crate) HashMap<Variable, f64>);

impl Inputs {
    pub fn new() -> Self {
        Inputs(HashMap::new())
    }

    pub fn add(&mut self, var: Variable, val: f64) {
        self.0.insert(var, val);
    }

    pub fn get(&self, var: Variable) -> Option<f64> {
        self.0.get(&var).copied()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

/// Per-term degrees of every bound input, i.e. the fuzzified facts.
pub struct Memberships<'v> {
    vars: &'v Variables,
    degrees: HashMap<VariableKey, IndexMap<String, f64>>,
}

impl<'v> Memberships<'v> {
    /// Fails on the first binding that is foreign, bound to an output or
    /// outside its universe.
    pub(crate) fn fuzzify(vars: &'v Variables, inputs: &Inputs) -> Result<Self> {
        let mut degrees = HashMap::with_capacity(inputs.0.len());

        for (&handle, &value) in &inputs.0 {
            let var = vars.get(handle).ok_or(Error::Config(ConfigError::ForeignVariable))?;

            if var.role() != Role::Antecedent {
                return Err(Error::NotAnInput(var.name().to_owned()));
            }

            let universe = var.universe();

            if !universe.contains(value) {
                return Err(Error::Range {
                    variable: var.name().to_owned(),
                    value,
                    min: universe.min(),
                    max: universe.max(),
                });
            }

            degrees.insert(handle.key, var.fuzzify(value));
        }

        Ok(Self { vars, degrees })
    }

    pub(crate) fn degree(&self, var: Variable, term: &str) -> Result<f64> {
        let name = || self.vars.get(var).map(|v| v.name().to_owned()).unwrap_or_default();
        let terms = self.degrees.get(&var.key).ok_or_else(|| Error::MissingInput(name()))?;

        // Terms are checked when the system is built
        Ok(terms.get(term).copied().unwrap_or(0.))
    }
}
