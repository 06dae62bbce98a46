use crate::config::InferenceConfig;
use crate::error::ConfigError;
use crate::inference::ControlSystem;
use crate::membership::MembershipFn;
use crate::rules::Rules;
use crate::variable::{Role, Variables};

/// Room heater controller: temperature in °C and relative humidity in %
/// drive a heater level in %.
pub fn room_heater() -> Result<ControlSystem, ConfigError> {
    let mut vars = Variables::new();
    let temperature = vars.add("temperature", 0. ..=40., 1., Role::Antecedent)?;
    let humidity = vars.add("humidity", 0. ..=100., 1., Role::Antecedent)?;
    let heater = vars.add("heater", 0. ..=100., 1., Role::Consequent)?;

    vars.add_term(temperature, "cold", MembershipFn::triangular(0., 0., 20.))?;
    vars.add_term(temperature, "warm", MembershipFn::triangular(15., 25., 35.))?;
    vars.add_term(temperature, "hot", MembershipFn::triangular(30., 40., 40.))?;

    vars.add_term(humidity, "low", MembershipFn::triangular(0., 0., 50.))?;
    vars.add_term(humidity, "medium", MembershipFn::triangular(30., 50., 70.))?;
    vars.add_term(humidity, "high", MembershipFn::triangular(60., 100., 100.))?;

    vars.add_term(heater, "low", MembershipFn::triangular(0., 0., 50.))?;
    vars.add_term(heater, "medium", MembershipFn::triangular(30., 50., 70.))?;
    vars.add_term(heater, "high", MembershipFn::triangular(60., 100., 100.))?;

    let mut rules = Rules::with_capacity(4);

    rules.add(temperature.is("cold").and(humidity.is("low")), [heater.conclude("high")]);
    rules.add(temperature.is("cold").and(humidity.is("medium")), [heater.conclude("medium")]);
    rules.add(temperature.is("warm"), [heater.conclude("low")]);
    rules.add(temperature.is("hot"), [heater.conclude("low")]);

    ControlSystem::new(vars, rules, InferenceConfig::default())
}

#[test]
fn test_room_heater_definition() {
    let system = room_heater().unwrap();
    let vars = system.variables();
    let temperature = vars.find("temperature").and_then(|v| vars.get(v)).unwrap();
    let terms: Vec<_> = temperature.terms().map(|(name, _)| name).collect();

    assert_eq!(system.rules().len(), 4);
    assert_eq!(terms, ["cold", "warm", "hot"]);
    assert_eq!(temperature.universe().grid().len(), 41);

    for i in 0..=40 {
        for (_, degree) in temperature.fuzzify(i as f64) {
            assert!((0. ..=1.).contains(&degree));
        }
    }
}

#[test]
fn test_undefined_term_fails_to_build() {
    let mut vars = Variables::new();
    let temperature = vars.add("temperature", 0. ..=40., 1., Role::Antecedent).unwrap();
    let heater = vars.add("heater", 0. ..=100., 1., Role::Consequent).unwrap();

    vars.add_term(temperature, "cold", MembershipFn::triangular(0., 0., 20.)).unwrap();
    vars.add_term(heater, "high", MembershipFn::triangular(60., 100., 100.)).unwrap();

    let mut rules = Rules::new();

    rules.add(temperature.is("freezing"), [heater.conclude("high")]);

    assert_eq!(
        ControlSystem::new(vars, rules, InferenceConfig::default()).map(|_| ()),
        Err(ConfigError::UnknownTerm {
            variable: "temperature".into(),
            term: "freezing".into(),
        })
    );
}
