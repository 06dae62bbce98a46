use tracing::debug;

use crate::error::{Error, Result};
use crate::inference::ControlSystem;
use crate::inputs::Inputs;
use crate::outputs::Outputs;
use crate::variable::Role;

/// Input bindings and last outputs for one user of a [`ControlSystem`].
///
/// Sessions are cheap; create one per request or thread. The system they
/// borrow is never mutated.
pub struct Simulation<'s> {
    system: &'s ControlSystem,
    inputs: Inputs,
    outputs: Option<Outputs>,
}

impl<'s> Simulation<'s> {
    pub fn new(system: &'s ControlSystem) -> Self {
        Self {
            system,
            inputs: Inputs::new(),
            outputs: None,
        }
    }

    pub fn system(&self) -> &'s ControlSystem {
        self.system
    }

    /// Binds a crisp value to an input variable. Values outside the
    /// variable's universe are rejected and leave the session untouched.
    pub fn set_input(&mut self, name: &str, value: f64) -> Result<()> {
        let vars = self.system.variables();
        let var = vars.find(name).ok_or_else(|| Error::UnknownVariable(name.to_owned()))?;
        let Some(def) = vars.get(var) else {
            return Err(Error::UnknownVariable(name.to_owned()));
        };

        if def.role() != Role::Antecedent {
            return Err(Error::NotAnInput(name.to_owned()));
        }

        let universe = def.universe();

        if !universe.contains(value) {
            return Err(Error::Range {
                variable: name.to_owned(),
                value,
                min: universe.min(),
                max: universe.max(),
            });
        }

        self.inputs.add(var, value);

        Ok(())
    }

    pub fn clear_inputs(&mut self) {
        self.inputs.clear();
    }

    pub fn inputs(&self) -> &Inputs {
        &self.inputs
    }

    /// Runs inference on the current bindings. On failure any previous
    /// outputs are discarded.
    pub fn run(&mut self) -> Result<&Outputs> {
        self.outputs = None;

        let outputs = self.system.infer(&self.inputs).inspect_err(|err| {
            debug!(%err, "inference failed");
        })?;

        Ok(self.outputs.insert(outputs))
    }

    /// Output of the last successful run.
    pub fn get_output(&self, name: &str) -> Result<f64> {
        self.outputs
            .as_ref()
            .and_then(|outputs| outputs.get(name))
            .ok_or_else(|| Error::NotComputed(name.to_owned()))
    }

    pub fn outputs(&self) -> Option<&Outputs> {
        self.outputs.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::presets::room_heater;

    #[test]
    fn cold_and_dry_heats_high() {
        let system = room_heater().unwrap();
        let mut sim = Simulation::new(&system);

        sim.set_input("temperature", 10.).unwrap();
        sim.set_input("humidity", 20.).unwrap();

        let heater = sim.run().unwrap().get("heater").unwrap();

        assert!(heater > 60., "heater = {heater}");
        assert_relative_eq!(heater, 1291.75 / 15.25, epsilon = 1e-9);
    }

    #[test]
    fn hot_heats_low() {
        let system = room_heater().unwrap();
        let mut sim = Simulation::new(&system);

        sim.set_input("temperature", 32.).unwrap();

        for humidity in [0., 35., 50., 80., 100.] {
            sim.set_input("humidity", humidity).unwrap();

            let heater = sim.run().unwrap().get("heater").unwrap();

            assert!(heater < 40., "heater = {heater} at humidity {humidity}");
            assert_relative_eq!(heater, 273.7 / 12.9, epsilon = 1e-9);
        }
    }

    #[test]
    fn out_of_range_input_is_rejected() {
        let system = room_heater().unwrap();
        let mut sim = Simulation::new(&system);

        assert_eq!(
            sim.set_input("temperature", 45.),
            Err(Error::Range {
                variable: "temperature".into(),
                value: 45.,
                min: 0.,
                max: 40.,
            })
        );
        assert!(matches!(sim.set_input("humidity", -0.5), Err(Error::Range { .. })));
        assert!(matches!(sim.set_input("humidity", f64::NAN), Err(Error::Range { .. })));
        assert!(sim.inputs().0.is_empty());
        assert_eq!(sim.get_output("heater"), Err(Error::NotComputed("heater".into())));
    }

    #[test]
    fn unknown_and_output_names() {
        let system = room_heater().unwrap();
        let mut sim = Simulation::new(&system);

        assert_eq!(sim.set_input("pressure", 1.), Err(Error::UnknownVariable("pressure".into())));
        assert_eq!(sim.set_input("heater", 50.), Err(Error::NotAnInput("heater".into())));
    }

    #[test]
    fn runs_are_idempotent() {
        let system = room_heater().unwrap();
        let mut sim = Simulation::new(&system);

        sim.set_input("temperature", 18.5).unwrap();
        sim.set_input("humidity", 42.).unwrap();

        let first = sim.run().unwrap().clone();
        let second = sim.run().unwrap().clone();

        assert_eq!(first, second);
        assert_eq!(sim.get_output("heater"), Ok(first.get("heater").unwrap()));
    }

    #[test]
    fn failed_run_discards_outputs() {
        let system = room_heater().unwrap();
        let mut sim = Simulation::new(&system);

        sim.set_input("temperature", 10.).unwrap();
        sim.set_input("humidity", 20.).unwrap();
        sim.run().unwrap();

        assert!(sim.get_output("heater").is_ok());

        // Warm-ish and humid: no rule covers it
        sim.set_input("temperature", 15.).unwrap();
        sim.set_input("humidity", 100.).unwrap();

        assert_eq!(sim.run().map(|_| ()), Err(Error::NoRuleFired("heater".into())));
        assert_eq!(sim.get_output("heater"), Err(Error::NotComputed("heater".into())));

        sim.clear_inputs();

        assert_eq!(sim.run().map(|_| ()), Err(Error::MissingInput("temperature".into())));
    }

    #[test]
    fn sessions_share_a_system_across_threads() {
        let system = room_heater().unwrap();

        let results: Vec<f64> = std::thread::scope(|scope| {
            let handles: Vec<_> = [5., 20., 35.]
                .into_iter()
                .map(|temperature| {
                    let system = &system;

                    scope.spawn(move || {
                        let mut sim = Simulation::new(system);

                        sim.set_input("temperature", temperature).unwrap();
                        sim.set_input("humidity", 10.).unwrap();
                        sim.run().unwrap().get("heater").unwrap()
                    })
                })
                .collect();

            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert!(results[0] > results[2]);
    }
}
