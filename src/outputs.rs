use indexmap::IndexMap;
use serde::Serialize;

/// Result of one inference run. Serializes with outputs and terms in
/// definition order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Outputs {
    crisp: IndexMap<String, f64>,
    firing_strengths: Vec<f64>,
    activations: IndexMap<String, IndexMap<String, f64>>,
}

impl Outputs {
    pub(crate) fn new(
        crisp: IndexMap<String, f64>,
        firing_strengths: Vec<f64>,
        activations: IndexMap<String, IndexMap<String, f64>>,
    ) -> Self {
        Self {
            crisp,
            firing_strengths,
            activations,
        }
    }

    /// Defuzzified value of an output variable.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.crisp.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.crisp.iter().map(|(name, value)| (name.as_str(), *value))
    }

    /// Firing strength of each rule, in rule-base order.
    pub fn firing_strengths(&self) -> &[f64] {
        &self.firing_strengths
    }

    /// Aggregated activation of every term of an output variable.
    pub fn activations(&self, name: &str) -> Option<&IndexMap<String, f64>> {
        self.activations.get(name)
    }
}

#[test]
fn test_serialize() {
    let mut crisp = IndexMap::new();
    let mut heater = IndexMap::new();

    crisp.insert("heater".to_owned(), 62.5);
    heater.insert("low".to_owned(), 0.);
    heater.insert("high".to_owned(), 0.5);

    let mut activations = IndexMap::new();

    activations.insert("heater".to_owned(), heater);

    let outputs = Outputs::new(crisp, vec![0.5, 0.], activations);

    assert_eq!(
        serde_json::to_string(&outputs).unwrap(),
        r#"{"crisp":{"heater":62.5},"firing_strengths":[0.5,0.0],"activations":{"heater":{"low":0.0,"high":0.5}}}"#
    );
}
