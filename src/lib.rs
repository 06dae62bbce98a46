//! Mamdani fuzzy inference.
//!
//! Crisp inputs are fuzzified against the terms of each input variable, a rule
//! base is evaluated with min/max/complement combinators, the activated output
//! terms are clipped and unioned, and the resulting set is reduced to a crisp
//! value by centroid defuzzification.
//!
//! ```
//! use fuzzy_control::{ControlSystem, InferenceConfig, MembershipFn, Role, Rules, Simulation, Variables};
//!
//! let mut vars = Variables::new();
//! let temperature = vars.add("temperature", 0. ..=40., 1., Role::Antecedent)?;
//! let heater = vars.add("heater", 0. ..=100., 1., Role::Consequent)?;
//!
//! vars.add_term(temperature, "cold", MembershipFn::triangular(0., 0., 20.))?;
//! vars.add_term(temperature, "hot", MembershipFn::triangular(20., 40., 40.))?;
//! vars.add_term(heater, "low", MembershipFn::triangular(0., 0., 50.))?;
//! vars.add_term(heater, "high", MembershipFn::triangular(50., 100., 100.))?;
//!
//! let mut rules = Rules::new();
//!
//! rules.add(temperature.is("cold"), [heater.conclude("high")]);
//! rules.add(temperature.is("hot"), [heater.conclude("low")]);
//!
//! let system = ControlSystem::new(vars, rules, InferenceConfig::default())?;
//! let mut sim = Simulation::new(&system);
//!
//! sim.set_input("temperature", 5.)?;
//! sim.run()?;
//!
//! assert!(sim.get_output("heater")? > 50.);
//! # Ok::<(), fuzzy_control::Error>(())
//! ```

mod config;
mod dsl;
mod error;
mod inference;
mod inputs;
mod linspace;
mod math;
mod membership;
mod ops;
mod outputs;
pub mod presets;
mod rules;
mod simulation;
mod variable;

pub use config::{
    ConsequenceDefinition, ExprDefinition, InferenceConfig, RuleDefinition, SystemDefinition, TermDefinition,
    VariableDefinition,
};
pub use dsl::{Consequence, Expr};
pub use error::{ConfigError, Error, Result};
pub use inference::ControlSystem;
pub use inputs::{Inputs, Memberships};
pub use membership::MembershipFn;
pub use ops::{not, AndOp, DefuzzificationOp, EmptyOutput, OrOp};
pub use outputs::Outputs;
pub use rules::{Rule, Rules};
pub use simulation::Simulation;
pub use variable::{LinguisticVariable, Role, Universe, Variable, VariableKey, Variables, MAX_UNIVERSE_POINTS};
