use std::fmt;

/// Broad classification of a `SolveError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A problem collaborator did not supply a required contract function.
    MissingImplementation,
    /// The problem (or a policy handed in with it) violates the MDP contract.
    InvalidProblem,
    /// A numeric parameter of the run is out of range.
    InvalidConfig,
}

/// Error type for both solution engines.
///
/// States and actions are carried in their `Debug` rendering so the error
/// stays independent of the problem's types.
#[derive(Debug, Clone, PartialEq)]
pub enum SolveError {
    /// A closure-assembled problem is missing one of its contract functions.
    MissingImplementation { method: &'static str },
    /// The declared state space lists the same state twice.
    DuplicateState { state: String },
    /// A state was produced that is not part of the declared state space.
    UnknownState { state: String },
    /// A non-terminal state has no legal actions.
    NoLegalActions { state: String },
    /// `transition_prob` returned a negative or non-finite value.
    InvalidProbability {
        state: String,
        action: String,
        next: String,
        value: f64,
    },
    /// Transition probabilities out of a `(state, action)` pair do not sum to 1.
    ProbabilitySum {
        state: String,
        action: String,
        sum: f64,
    },
    /// A policy does not assign an action to a non-terminal state.
    MissingPolicyAction { state: String },
    /// A policy assigns an action that is not legal in its state.
    IllegalPolicyAction { state: String, action: String },
    /// An action-value lookup fell outside the (state, legal action) key set.
    MissingActionValue { state: String, action: String },
    /// Discount factor outside `[0, 1]`.
    InvalidGamma { gamma: f64 },
    /// A run parameter (tolerance, step size, caps) is out of range.
    InvalidConfig { reason: String },
}

impl SolveError {
    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SolveError::MissingImplementation { .. } => ErrorKind::MissingImplementation,
            SolveError::InvalidGamma { .. } | SolveError::InvalidConfig { .. } => {
                ErrorKind::InvalidConfig
            }
            _ => ErrorKind::InvalidProblem,
        }
    }

    pub(crate) fn unknown_state(state: &impl fmt::Debug) -> Self {
        SolveError::UnknownState {
            state: format!("{state:?}"),
        }
    }

    pub(crate) fn no_legal_actions(state: &impl fmt::Debug) -> Self {
        SolveError::NoLegalActions {
            state: format!("{state:?}"),
        }
    }

    pub(crate) fn missing_action_value(state: &impl fmt::Debug, action: &impl fmt::Debug) -> Self {
        SolveError::MissingActionValue {
            state: format!("{state:?}"),
            action: format!("{action:?}"),
        }
    }
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveError::MissingImplementation { method } => {
                write!(f, "problem does not implement '{method}'")
            }
            SolveError::DuplicateState { state } => {
                write!(f, "state {state} is declared more than once")
            }
            SolveError::UnknownState { state } => {
                write!(f, "state {state} is not part of the declared state space")
            }
            SolveError::NoLegalActions { state } => {
                write!(f, "non-terminal state {state} has no legal actions")
            }
            SolveError::InvalidProbability {
                state,
                action,
                next,
                value,
            } => write!(
                f,
                "invalid transition probability {value} for {state} --{action}--> {next}"
            ),
            SolveError::ProbabilitySum { state, action, sum } => write!(
                f,
                "transition probabilities for state {state}, action {action} sum to {sum}, expected 1.0"
            ),
            SolveError::MissingPolicyAction { state } => {
                write!(f, "policy has no action for non-terminal state {state}")
            }
            SolveError::IllegalPolicyAction { state, action } => {
                write!(f, "policy action {action} is not legal in state {state}")
            }
            SolveError::MissingActionValue { state, action } => {
                write!(f, "no action value for state {state}, action {action}")
            }
            SolveError::InvalidGamma { gamma } => {
                write!(f, "discount factor must lie in [0, 1], got {gamma}")
            }
            SolveError::InvalidConfig { reason } => write!(f, "invalid configuration: {reason}"),
        }
    }
}

impl std::error::Error for SolveError {}
