use crate::solver::{
    config::validate_gamma,
    error::SolveError,
    problem::ExactProblem,
    tables::{Policy, StateIndex, ValueTable, first_max},
};

/// Floating point tolerance used when validating probability sums.
pub(crate) const PROB_TOLERANCE: f64 = 1e-9;

/// Indexed view of an exact problem shared by the dynamic-programming routines.
///
/// Terminal flags are queried once up front; the problem itself is only read.
pub(crate) struct Model<'p, P: ExactProblem> {
    problem: &'p P,
    index: StateIndex<P::State>,
    terminal: Vec<bool>,
    gamma: f64,
}

impl<'p, P: ExactProblem> Model<'p, P> {
    pub(crate) fn new(problem: &'p P) -> Result<Self, SolveError> {
        let gamma = problem.gamma();
        validate_gamma(gamma)?;

        let index = StateIndex::from_states(problem.states())?;
        let terminal = index
            .states()
            .iter()
            .map(|s| problem.is_terminal(s))
            .collect();

        Ok(Self {
            problem,
            index,
            terminal,
            gamma,
        })
    }

    pub(crate) fn index(&self) -> &StateIndex<P::State> {
        &self.index
    }

    pub(crate) fn state(&self, idx: usize) -> &P::State {
        &self.index.states()[idx]
    }

    pub(crate) fn is_terminal(&self, idx: usize) -> bool {
        self.terminal[idx]
    }

    /// Indices of all non-terminal states, in declaration order.
    pub(crate) fn non_terminal(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.terminal.len()).filter(|&idx| !self.is_terminal(idx))
    }

    /// Zero-initialised value table over the whole state space.
    pub(crate) fn zero_values(&self) -> ValueTable<P::State> {
        ValueTable::zeros(self.index.clone())
    }

    /// Legal actions of a non-terminal state; an empty list is an error.
    pub(crate) fn legal_actions(&self, idx: usize) -> Result<Vec<P::Action>, SolveError> {
        let state = self.state(idx);
        let actions = self.problem.legal_actions(state);
        if actions.is_empty() {
            return Err(SolveError::no_legal_actions(state));
        }
        Ok(actions)
    }

    /// One-step lookahead `sum_s' P(s,a,s') * (R(s,a,s') + gamma * V(s'))`.
    ///
    /// Also checks that the outgoing distribution is well formed.
    pub(crate) fn action_value(
        &self,
        values: &[f64],
        idx: usize,
        action: &P::Action,
    ) -> Result<f64, SolveError> {
        let state = self.state(idx);
        let mut total = 0.0;
        let mut mass = 0.0;

        for (next_idx, next) in self.index.states().iter().enumerate() {
            let prob = self.problem.transition_prob(state, action, next);
            if !prob.is_finite() || prob < 0.0 {
                return Err(SolveError::InvalidProbability {
                    state: format!("{state:?}"),
                    action: format!("{action:?}"),
                    next: format!("{next:?}"),
                    value: prob,
                });
            }
            if prob == 0.0 {
                continue;
            }

            mass += prob;
            let reward = self.problem.reward(state, action, next);
            total += prob * (reward + self.gamma * values[next_idx]);
        }

        if (mass - 1.0).abs() > PROB_TOLERANCE {
            return Err(SolveError::ProbabilitySum {
                state: format!("{state:?}"),
                action: format!("{action:?}"),
                sum: mass,
            });
        }

        Ok(total)
    }

    /// Best action at `idx` under `values` and its lookahead value.
    /// Ties go to the action listed first by the problem.
    pub(crate) fn greedy(
        &self,
        values: &[f64],
        idx: usize,
    ) -> Result<(P::Action, f64), SolveError> {
        let mut scored = Vec::new();
        for action in self.legal_actions(idx)? {
            let q = self.action_value(values, idx, &action)?;
            scored.push((action, q));
        }
        first_max(scored).ok_or_else(|| SolveError::no_legal_actions(self.state(idx)))
    }

    /// Greedy policy over every non-terminal state.
    pub(crate) fn greedy_policy(
        &self,
        values: &[f64],
    ) -> Result<Policy<P::State, P::Action>, SolveError> {
        let mut policy = Policy::new();
        for idx in self.non_terminal() {
            let (action, _) = self.greedy(values, idx)?;
            policy.insert(self.state(idx).clone(), action);
        }
        Ok(policy)
    }

    /// Resolve `policy` into one action slot per state, checking that every
    /// non-terminal state has a legal action.
    pub(crate) fn resolve_policy(
        &self,
        policy: &Policy<P::State, P::Action>,
    ) -> Result<Vec<Option<P::Action>>, SolveError> {
        let mut slots = vec![None; self.index.len()];
        for idx in self.non_terminal() {
            let state = self.state(idx);
            let action = policy
                .get(state)
                .ok_or_else(|| SolveError::MissingPolicyAction {
                    state: format!("{state:?}"),
                })?;
            if !self.legal_actions(idx)?.contains(action) {
                return Err(SolveError::IllegalPolicyAction {
                    state: format!("{state:?}"),
                    action: format!("{action:?}"),
                });
            }
            slots[idx] = Some(action.clone());
        }
        Ok(slots)
    }

    /// Re-key an externally supplied value table onto this model's index.
    pub(crate) fn align(&self, values: &ValueTable<P::State>) -> Result<Vec<f64>, SolveError> {
        self.index
            .states()
            .iter()
            .map(|s| values.get(s).ok_or_else(|| SolveError::unknown_state(s)))
            .collect()
    }
}

/// Extract the greedy policy of `problem` with respect to `values`.
///
/// `values` must cover every declared state.
pub fn greedy_policy<P: ExactProblem>(
    problem: &P,
    values: &ValueTable<P::State>,
) -> Result<Policy<P::State, P::Action>, SolveError> {
    let model = Model::new(problem)?;
    let aligned = model.align(values)?;
    model.greedy_policy(&aligned)
}
