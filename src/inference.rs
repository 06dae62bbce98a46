use indexmap::IndexMap;
use tracing::{debug, info, trace};

use crate::config::InferenceConfig;
use crate::error::{ConfigError, Error, Result};
use crate::inputs::{Inputs, Memberships};
use crate::outputs::Outputs;
use crate::rules::Rules;
use crate::variable::{Role, VariableKey, Variables};

/// A validated, immutable Mamdani system: variables, rule base and operators.
/// Safe to share between threads; each [`Simulation`](crate::Simulation)
/// borrows it read-only.
#[derive(Clone, Debug)]
pub struct ControlSystem {
    vars: Variables,
    rules: Rules,
    config: InferenceConfig,
}

impl ControlSystem {
    pub fn new(vars: Variables, rules: Rules, config: InferenceConfig) -> Result<Self, ConfigError> {
        if let Some((_, var)) = vars.iter().find(|(_, var)| var.terms.is_empty()) {
            return Err(ConfigError::NoTerms(var.name().to_owned()));
        }

        rules.validate(&vars)?;

        info!(
            variables = vars.len(),
            rules = rules.len(),
            ?config,
            "built fuzzy control system"
        );

        Ok(Self { vars, rules, config })
    }

    pub fn variables(&self) -> &Variables {
        &self.vars
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    /// Runs fuzzification, rule evaluation, aggregation and defuzzification
    /// for one set of crisp inputs. Pure: the same inputs always give the
    /// same outputs.
    pub fn infer(&self, inputs: &Inputs) -> Result<Outputs> {
        let InferenceConfig {
            and_op,
            or_op,
            aggregation,
            defuzzification,
            empty_output,
        } = self.config;

        // Fuzzificate facts
        let memberships = Memberships::fuzzify(&self.vars, inputs)?;

        // Every output starts with no active terms
        let mut activations: IndexMap<VariableKey, IndexMap<String, f64>> = self
            .vars
            .vars
            .iter()
            .filter(|(_, var)| var.role() == Role::Consequent)
            .map(|(key, _)| (key, IndexMap::new()))
            .collect();
        let mut firing_strengths = Vec::with_capacity(self.rules.len());

        for (i, rule) in self.rules.iter().enumerate() {
            let strength = rule.strength(&memberships, and_op, or_op)?;

            trace!(rule = i, strength, "evaluated rule");

            for (var_key, term, level) in rule.activations(strength) {
                activations
                    .entry(var_key)
                    .or_default()
                    .entry(term.to_owned())
                    .and_modify(|acc| *acc = aggregation.call(*acc, level))
                    .or_insert(level);
            }

            firing_strengths.push(strength);
        }

        // Defuzzificate
        let mut crisp = IndexMap::with_capacity(activations.len());
        let mut named_activations = IndexMap::with_capacity(activations.len());

        for (var_key, activation) in activations {
            let var = &self.vars.vars[var_key];
            let value = var
                .defuzzify(&activation, aggregation, defuzzification, empty_output)
                .ok_or_else(|| Error::NoRuleFired(var.name().to_owned()))?;

            debug!(variable = var.name(), value, ?activation, "defuzzified output");

            crisp.insert(var.name().to_owned(), value);
            named_activations.insert(var.name().to_owned(), activation);
        }

        Ok(Outputs::new(crisp, firing_strengths, named_activations))
    }
}
