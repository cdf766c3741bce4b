use serde::{Deserialize, Serialize};

use crate::{CompiledMdp, MdpError};

fn undiscounted() -> f64 {
    1.0
}

fn is_false(flag: &bool) -> bool {
    !flag
}

/// Declarative tabular MDP, as read from and written to YAML.
///
/// ```yaml
/// start: s0
/// gamma: 0.9
/// states:
///   - id: s0
///     actions:
///       - id: go
///         outcomes:
///           - { next: done, prob: 1.0, reward: 1.0 }
///   - id: done
///     terminal: true
/// ```
///
/// `gamma` defaults to 1 (undiscounted). Nothing is checked until
/// [`MdpSpec::validate`] or [`MdpSpec::compile`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MdpSpec {
    pub start: String,
    #[serde(default = "undiscounted")]
    pub gamma: f64,
    pub states: Vec<StateSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSpec {
    pub id: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub terminal: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<ActionSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionSpec {
    pub id: String,
    pub outcomes: Vec<OutcomeSpec>,
}

/// One entry of the transition distribution: `P(next | s, a) = prob`, with
/// `R(s, a, next) = reward`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeSpec {
    pub next: String,
    pub prob: f64,
    pub reward: f64,
}

impl MdpSpec {
    /// Check the model without keeping the compiled form.
    pub fn validate(&self) -> Result<(), MdpError> {
        self.compile().map(drop)
    }

    pub fn compile(&self) -> Result<CompiledMdp, MdpError> {
        CompiledMdp::from_spec(self)
    }
}
