use std::fmt;

use thiserror::Error;

/// A `(state, action)` pair of a declared model, by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    pub state: String,
    pub action: String,
}

impl Site {
    pub(crate) fn new(state: &str, action: &str) -> Self {
        Self {
            state: state.to_string(),
            action: action.to_string(),
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "state '{}' action '{}'", self.state, self.action)
    }
}

#[derive(Debug, Error)]
/// Errors raised while reading, declaring or compiling a tabular MDP, or
/// when constructing one of the bundled problems.
pub enum MdpError {
    #[error("failed to read or write YAML file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("model has no start state")]
    MissingStart,

    #[error("start state '{start}' is not declared")]
    UnknownStart { start: String },

    #[error("discount factor must lie in [0, 1], got {gamma}")]
    InvalidGamma { gamma: f64 },

    #[error("state '{state}' is declared twice")]
    DuplicateState { state: String },

    #[error("state '{state}' is used before it is declared")]
    UndeclaredState { state: String },

    #[error("terminal state '{state}' cannot have actions")]
    TerminalWithActions { state: String },

    #[error("non-terminal state '{state}' has no actions")]
    DeadEnd { state: String },

    #[error("{site} is declared twice")]
    DuplicateAction { site: Site },

    #[error("{site} has no transitions")]
    NoTransitions { site: Site },

    #[error("{site} leads to undeclared state '{next}'")]
    UnknownNext { site: Site, next: String },

    #[error("{site} lists next state '{next}' more than once")]
    RepeatedNext { site: Site, next: String },

    #[error("{site} -> '{next}': probability {value} is not a finite non-negative number")]
    InvalidProbability {
        site: Site,
        next: String,
        value: f64,
    },

    #[error("{site} -> '{next}': reward {value} is not finite")]
    InvalidReward {
        site: Site,
        next: String,
        value: f64,
    },

    #[error("{site}: transition probabilities sum to {sum}, expected 1")]
    ProbabilitySum { site: Site, sum: f64 },

    #[error("invalid problem parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}
