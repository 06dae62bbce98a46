use thiserror::Error;

/// Malformed variable, term or rule definitions. Raised while a system is being
/// assembled; a system that failed to build can never be run.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid universe [{min}, {max}] with step {step}")]
    InvalidUniverse { min: f64, max: f64, step: f64 },

    #[error("universe [{min}, {max}] with step {step} exceeds {limit} points")]
    UniverseTooLarge { min: f64, max: f64, step: f64, limit: usize },

    #[error("variable `{0}` is defined more than once")]
    DuplicateVariable(String),

    #[error("variable `{variable}` already has a term named `{term}`")]
    DuplicateTerm { variable: String, term: String },

    #[error("variable `{0}` has no terms")]
    NoTerms(String),

    #[error("term `{variable}.{term}`: {reason}")]
    InvalidMembership { variable: String, term: String, reason: String },

    #[error("term `{variable}.{term}` reaches {point}, outside the universe [{min}, {max}]")]
    TermOutsideUniverse { variable: String, term: String, point: f64, min: f64, max: f64 },

    #[error("unknown variable `{0}`")]
    UnknownVariable(String),

    #[error("variable handle was issued by a different registry")]
    ForeignVariable,

    #[error("variable `{variable}` has no term `{term}`")]
    UnknownTerm { variable: String, term: String },

    #[error("rule {rule}: variable `{variable}` cannot be used as {expected}")]
    RoleMismatch { rule: usize, variable: String, expected: &'static str },

    #[error("rule {rule}: `{operator}` needs at least one operand")]
    EmptyExpression { rule: usize, operator: &'static str },

    #[error("rule {0} has no consequences")]
    NoConsequences(usize),

    #[error("rule {rule}: weight {weight} is outside (0, 1]")]
    InvalidWeight { rule: usize, weight: f64 },

    #[error("the rule base is empty")]
    NoRules,

    #[error("malformed system definition: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

/// Errors surfaced by a running simulation.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{value} is outside the universe of `{variable}` [{min}, {max}]")]
    Range { variable: String, value: f64, min: f64, max: f64 },

    #[error("no rule fired for `{0}`; the aggregated output set is empty")]
    NoRuleFired(String),

    #[error("output `{0}` has not been computed")]
    NotComputed(String),

    #[error("unknown variable `{0}`")]
    UnknownVariable(String),

    #[error("`{0}` is an output variable and cannot take an input")]
    NotAnInput(String),

    #[error("no input bound for `{0}`")]
    MissingInput(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
