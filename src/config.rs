//! Declarative system definitions.
//!
//! A whole control system (variables, terms, rules and operators) can be
//! described as JSON and turned into a [`ControlSystem`]:
//!
//! ```json
//! {
//!   "inference": { "defuzzification": "cog" },
//!   "variables": [
//!     { "name": "temperature", "role": "antecedent", "min": 0, "max": 40, "step": 1,
//!       "terms": [{ "name": "cold", "membership": { "shape": "triangular", "a": 0, "b": 0, "c": 20 } }] },
//!     { "name": "heater", "role": "consequent", "min": 0, "max": 100, "step": 1,
//!       "terms": [{ "name": "high", "membership": { "shape": "triangular", "a": 60, "b": 100, "c": 100 } }] }
//!   ],
//!   "rules": [
//!     { "when": { "is": { "variable": "temperature", "term": "cold" } },
//!       "then": [{ "variable": "heater", "term": "high" }] }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::dsl::{Consequence, Expr};
use crate::error::ConfigError;
use crate::inference::ControlSystem;
use crate::membership::MembershipFn;
use crate::ops::{AndOp, DefuzzificationOp, EmptyOutput, OrOp};
use crate::rules::Rules;
use crate::variable::{Role, Variable, Variables};

/// Operators used by a control system. The default is classic Mamdani:
/// min AND, max OR, max aggregation and centroid defuzzification.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    pub and_op: AndOp,
    pub or_op: OrOp,
    /// Combines activations of the same output term across rules, and the
    /// clipped term sets into one output set.
    pub aggregation: OrOp,
    pub defuzzification: DefuzzificationOp,
    pub empty_output: EmptyOutput,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SystemDefinition {
    #[serde(default)]
    pub inference: InferenceConfig,
    pub variables: Vec<VariableDefinition>,
    pub rules: Vec<RuleDefinition>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VariableDefinition {
    pub name: String,
    pub role: Role,
    pub min: f64,
    pub max: f64,
    #[serde(default = "default_step")]
    pub step: f64,
    pub terms: Vec<TermDefinition>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TermDefinition {
    pub name: String,
    pub membership: MembershipFn,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RuleDefinition {
    pub when: ExprDefinition,
    pub then: Vec<ConsequenceDefinition>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExprDefinition {
    Is { variable: String, term: String },
    And(Vec<ExprDefinition>),
    Or(Vec<ExprDefinition>),
    Not(Box<ExprDefinition>),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConsequenceDefinition {
    pub variable: String,
    pub term: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_step() -> f64 {
    1.
}

fn default_weight() -> f64 {
    1.
}

impl SystemDefinition {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn build(&self) -> Result<ControlSystem, ConfigError> {
        let mut vars = Variables::new();

        for def in &self.variables {
            let var = vars.add(def.name.as_str(), def.min..=def.max, def.step, def.role)?;

            for term in &def.terms {
                vars.add_term(var, term.name.as_str(), term.membership.clone())?;
            }
        }

        let mut rules = Rules::with_capacity(self.rules.len());

        for rule in &self.rules {
            let consequences = rule
                .then
                .iter()
                .map(|c| {
                    let var = resolve(&vars, &c.variable)?;

                    Ok::<_, ConfigError>(var.conclude(c.term.as_str()).with_weight(c.weight))
                })
                .collect::<Result<Vec<Consequence>, _>>()?;

            rules.add(rule.when.to_expr(&vars)?, consequences);
        }

        ControlSystem::new(vars, rules, self.inference)
    }
}

impl ExprDefinition {
    fn to_expr(&self, vars: &Variables) -> Result<Expr, ConfigError> {
        let all = |defs: &[ExprDefinition]| defs.iter().map(|d| d.to_expr(vars)).collect::<Result<Vec<_>, _>>();

        Ok(match self {
            ExprDefinition::Is { variable, term } => resolve(vars, variable)?.is(term.as_str()),
            ExprDefinition::And(defs) => Expr::And(all(defs)?),
            ExprDefinition::Or(defs) => Expr::Or(all(defs)?),
            ExprDefinition::Not(def) => def.to_expr(vars)?.not(),
        })
    }
}

fn resolve(vars: &Variables, name: &str) -> Result<Variable, ConfigError> {
    vars.find(name).ok_or_else(|| ConfigError::UnknownVariable(name.to_owned()))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::Simulation;

    const THERMOSTAT: &str = r#"{
        "inference": { "defuzzification": "cog" },
        "variables": [
            { "name": "temperature", "role": "antecedent", "min": 0, "max": 40,
              "terms": [
                { "name": "cold", "membership": { "shape": "triangular", "a": 0, "b": 0, "c": 20 } },
                { "name": "hot", "membership": { "shape": "triangular", "a": 20, "b": 40, "c": 40 } }
              ] },
            { "name": "heater", "role": "consequent", "min": 0, "max": 100, "step": 1,
              "terms": [
                { "name": "low", "membership": { "shape": "triangular", "a": 0, "b": 0, "c": 50 } },
                { "name": "high", "membership": { "shape": "triangular", "a": 50, "b": 100, "c": 100 } }
              ] }
        ],
        "rules": [
            { "when": { "is": { "variable": "temperature", "term": "cold" } },
              "then": [{ "variable": "heater", "term": "high" }] },
            { "when": { "not": { "is": { "variable": "temperature", "term": "cold" } } },
              "then": [{ "variable": "heater", "term": "low", "weight": 0.5 }] }
        ]
    }"#;

    #[test]
    fn builds_from_json() {
        let def = SystemDefinition::from_json(THERMOSTAT).unwrap();

        assert_eq!(def.inference, InferenceConfig::default());
        assert_eq!(def.variables[0].step, 1.);
        assert_eq!(def.rules[1].then[0].weight, 0.5);

        let system = def.build().unwrap();
        let mut sim = Simulation::new(&system);

        sim.set_input("temperature", 0.).unwrap();

        let heater = sim.run().unwrap().get("heater").unwrap();

        assert!(heater > 75., "heater = {heater}");

        sim.set_input("temperature", 40.).unwrap();

        let heater = sim.run().unwrap().get("heater").unwrap();

        assert!(heater < 25., "heater = {heater}");
        assert_relative_eq!(sim.get_output("heater").unwrap(), heater);
    }

    #[test]
    fn unknown_names() {
        let mut def = SystemDefinition::from_json(THERMOSTAT).unwrap();

        def.rules[0].when = ExprDefinition::Is {
            variable: "pressure".into(),
            term: "low".into(),
        };

        assert_eq!(def.build().map(|_| ()), Err(ConfigError::UnknownVariable("pressure".into())));
    }

    #[test]
    fn malformed_json() {
        assert!(matches!(SystemDefinition::from_json("{ \"variables\": 3 }"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn duplicate_terms_are_rejected() {
        let mut def = SystemDefinition::from_json(THERMOSTAT).unwrap();
        let cold = def.variables[0].terms[0].clone();

        def.variables[0].terms.push(cold);

        assert_eq!(
            def.build().map(|_| ()),
            Err(ConfigError::DuplicateTerm {
                variable: "temperature".into(),
                term: "cold".into(),
            })
        );
    }
}
