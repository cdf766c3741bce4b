use std::collections::HashMap;

use mdpsolve_core::{ExactProblem, SimulableProblem};
use rand::{Rng, RngCore};

use crate::{ActionSpec, MdpError, MdpSpec, StateSpec, error::Site};

/// Floating point tolerance used when validating probability sums.
pub(crate) const PROB_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Dense index for states in a compiled MDP.
pub struct StateKey(usize);

impl StateKey {
    /// Return the underlying state index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for StateKey {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Position of an action within its state's declaration list.
pub struct ActionKey(usize);

impl ActionKey {
    /// Return the underlying action index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for ActionKey {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone)]
/// Runtime form of an MDP with resolved state references and precomputed CDFs.
///
/// Implements both [`ExactProblem`] and [`SimulableProblem`], so a YAML model
/// can be handed straight to either engine.
pub struct CompiledMdp {
    start: StateKey,
    gamma: f64,
    keys: Vec<StateKey>,
    states: Vec<StateRec>,
    state_ids: Vec<String>,
    state_id_to_key: HashMap<String, StateKey>,
}

#[derive(Debug, Clone)]
struct StateRec {
    terminal: bool,
    actions: Vec<ActionRec>,
}

#[derive(Debug, Clone)]
struct ActionRec {
    id: String,
    outcomes: Vec<OutcomeRec>,
    cdf: Vec<f64>,
}

#[derive(Debug, Clone)]
struct OutcomeRec {
    next: StateKey,
    prob: f64,
    reward: f64,
}

impl CompiledMdp {
    /// Validate `spec` and resolve it into dense records in one pass.
    pub(crate) fn from_spec(spec: &MdpSpec) -> Result<Self, MdpError> {
        if spec.start.trim().is_empty() {
            return Err(MdpError::MissingStart);
        }
        if !(0.0..=1.0).contains(&spec.gamma) {
            return Err(MdpError::InvalidGamma { gamma: spec.gamma });
        }

        let mut state_id_to_key = HashMap::with_capacity(spec.states.len());
        for (idx, state) in spec.states.iter().enumerate() {
            if state_id_to_key
                .insert(state.id.clone(), StateKey::from(idx))
                .is_some()
            {
                return Err(MdpError::DuplicateState {
                    state: state.id.clone(),
                });
            }
        }

        let start = state_id_to_key.get(&spec.start).copied().ok_or_else(|| {
            MdpError::UnknownStart {
                start: spec.start.clone(),
            }
        })?;

        let states = spec
            .states
            .iter()
            .map(|state| compile_state(state, &state_id_to_key))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            states = states.len(),
            start = %spec.start,
            gamma = spec.gamma,
            "compiled mdp"
        );

        Ok(Self {
            start,
            gamma: spec.gamma,
            keys: (0..states.len()).map(StateKey::from).collect(),
            states,
            state_ids: spec.states.iter().map(|state| state.id.clone()).collect(),
            state_id_to_key,
        })
    }

    /// Return the start state key.
    pub fn start(&self) -> StateKey {
        self.start
    }

    /// Return the discount factor.
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Return the number of compiled states.
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// All state keys in declaration order.
    pub fn state_keys(&self) -> &[StateKey] {
        &self.keys
    }

    /// Check whether a state is terminal.
    pub fn terminal(&self, key: StateKey) -> Option<bool> {
        self.states.get(key.index()).map(|state| state.terminal)
    }

    /// Return the number of actions available from a state.
    pub fn num_actions(&self, key: StateKey) -> Option<usize> {
        self.states
            .get(key.index())
            .map(|state| state.actions.len())
    }

    /// Convert a state key back to its declared string id.
    pub fn state_id(&self, key: StateKey) -> Option<&str> {
        self.state_ids.get(key.index()).map(String::as_str)
    }

    /// Convert a string id into a compiled state key.
    pub fn state_key(&self, id: &str) -> Option<StateKey> {
        self.state_id_to_key.get(id).copied()
    }

    /// Convert an action key back to its declared id.
    pub fn action_id(&self, state: StateKey, action: ActionKey) -> Option<&str> {
        self.action(state, action).map(|rec| rec.id.as_str())
    }

    /// Look up an action of `state` by its declared id.
    pub fn action_key(&self, state: StateKey, id: &str) -> Option<ActionKey> {
        self.states
            .get(state.index())?
            .actions
            .iter()
            .position(|rec| rec.id == id)
            .map(ActionKey::from)
    }

    fn action(&self, state: StateKey, action: ActionKey) -> Option<&ActionRec> {
        self.states.get(state.index())?.actions.get(action.index())
    }

    fn outcome(&self, state: StateKey, action: ActionKey, next: StateKey) -> Option<&OutcomeRec> {
        self.action(state, action)?
            .outcomes
            .iter()
            .find(|outcome| outcome.next == next)
    }

    /// Sample one transition for `(state, action)` using a uniform sample in `[0, 1)`.
    /// Returns `None` when the state or action does not exist.
    fn sample_with(&self, state: StateKey, action: ActionKey, sample: f64) -> Option<StateKey> {
        let rec = self.states.get(state.index())?;
        if rec.terminal {
            return Some(state);
        }

        let action = rec.actions.get(action.index())?;
        let last = action.outcomes.len().checked_sub(1)?;
        let chosen = action.cdf.partition_point(|p| *p <= sample).min(last);

        Some(action.outcomes[chosen].next)
    }
}

fn compile_state(
    state: &StateSpec,
    lookup: &HashMap<String, StateKey>,
) -> Result<StateRec, MdpError> {
    if state.terminal {
        if !state.actions.is_empty() {
            return Err(MdpError::TerminalWithActions {
                state: state.id.clone(),
            });
        }
        return Ok(StateRec {
            terminal: true,
            actions: Vec::new(),
        });
    }

    if state.actions.is_empty() {
        return Err(MdpError::DeadEnd {
            state: state.id.clone(),
        });
    }

    let mut actions: Vec<ActionRec> = Vec::with_capacity(state.actions.len());
    for action in &state.actions {
        let site = Site::new(&state.id, &action.id);
        if actions.iter().any(|rec| rec.id == action.id) {
            return Err(MdpError::DuplicateAction { site });
        }
        actions.push(compile_action(site, action, lookup)?);
    }

    Ok(StateRec {
        terminal: false,
        actions,
    })
}

/// Resolve one transition distribution. Probabilities must be finite,
/// non-negative and sum to 1 within [`PROB_TOLERANCE`]; each next state
/// appears once so that `R(s, a, s')` is well defined.
fn compile_action(
    site: Site,
    action: &ActionSpec,
    lookup: &HashMap<String, StateKey>,
) -> Result<ActionRec, MdpError> {
    if action.outcomes.is_empty() {
        return Err(MdpError::NoTransitions { site });
    }

    let mut outcomes: Vec<OutcomeRec> = Vec::with_capacity(action.outcomes.len());
    let mut cdf = Vec::with_capacity(action.outcomes.len());
    let mut mass = 0.0_f64;

    for outcome in &action.outcomes {
        if !outcome.prob.is_finite() || outcome.prob < 0.0 {
            return Err(MdpError::InvalidProbability {
                site,
                next: outcome.next.clone(),
                value: outcome.prob,
            });
        }
        if !outcome.reward.is_finite() {
            return Err(MdpError::InvalidReward {
                site,
                next: outcome.next.clone(),
                value: outcome.reward,
            });
        }

        let Some(&next) = lookup.get(&outcome.next) else {
            return Err(MdpError::UnknownNext {
                site,
                next: outcome.next.clone(),
            });
        };
        if outcomes.iter().any(|rec| rec.next == next) {
            return Err(MdpError::RepeatedNext {
                site,
                next: outcome.next.clone(),
            });
        }

        mass += outcome.prob;
        cdf.push(mass);
        outcomes.push(OutcomeRec {
            next,
            prob: outcome.prob,
            reward: outcome.reward,
        });
    }

    if (mass - 1.0).abs() > PROB_TOLERANCE {
        return Err(MdpError::ProbabilitySum { site, sum: mass });
    }

    Ok(ActionRec {
        id: action.id.clone(),
        outcomes,
        cdf,
    })
}

impl ExactProblem for CompiledMdp {
    type State = StateKey;
    type Action = ActionKey;

    fn states(&self) -> &[StateKey] {
        &self.keys
    }

    fn gamma(&self) -> f64 {
        self.gamma
    }

    fn legal_actions(&self, state: &StateKey) -> Vec<ActionKey> {
        let count = self.num_actions(*state).unwrap_or(0);
        (0..count).map(ActionKey::from).collect()
    }

    fn reward(&self, state: &StateKey, action: &ActionKey, next: &StateKey) -> f64 {
        self.outcome(*state, *action, *next)
            .map_or(0.0, |outcome| outcome.reward)
    }

    fn transition_prob(&self, state: &StateKey, action: &ActionKey, next: &StateKey) -> f64 {
        self.outcome(*state, *action, *next)
            .map_or(0.0, |outcome| outcome.prob)
    }

    fn is_terminal(&self, state: &StateKey) -> bool {
        self.terminal(*state).unwrap_or(true)
    }
}

impl SimulableProblem for CompiledMdp {
    type State = StateKey;
    type Action = ActionKey;

    fn states(&self) -> &[StateKey] {
        &self.keys
    }

    fn gamma(&self) -> f64 {
        self.gamma
    }

    fn initial_state(&self, _rng: &mut dyn RngCore) -> StateKey {
        self.start
    }

    fn legal_actions(&self, state: &StateKey) -> Vec<ActionKey> {
        let count = self.num_actions(*state).unwrap_or(0);
        (0..count).map(ActionKey::from).collect()
    }

    fn reward(&self, state: &StateKey, action: &ActionKey, next: &StateKey) -> f64 {
        self.outcome(*state, *action, *next)
            .map_or(0.0, |outcome| outcome.reward)
    }

    // Unknown inputs stay in place.
    fn sample_transition(
        &self,
        state: &StateKey,
        action: &ActionKey,
        rng: &mut dyn RngCore,
    ) -> StateKey {
        let sample = rng.r#gen::<f64>();
        self.sample_with(*state, *action, sample).unwrap_or(*state)
    }

    fn is_terminal(&self, state: &StateKey) -> bool {
        self.terminal(*state).unwrap_or(true)
    }
}
