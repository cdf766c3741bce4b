use rand::Rng;

use crate::solver::{
    config::validate_gamma,
    error::SolveError,
    problem::SimulableProblem,
    tables::{ActionValueTable, StateIndex, ValueTable},
};

/// Checked access to a simulable problem for the learning routines.
///
/// Every sampled state is verified against the declared state space so a
/// misbehaving sampler surfaces as `UnknownState` instead of a missing key.
pub(crate) struct Simulation<'p, P: SimulableProblem> {
    problem: &'p P,
    index: StateIndex<P::State>,
    gamma: f64,
}

impl<'p, P: SimulableProblem> Simulation<'p, P> {
    pub(crate) fn new(problem: &'p P) -> Result<Self, SolveError> {
        let gamma = problem.gamma();
        validate_gamma(gamma)?;
        let index = StateIndex::from_states(problem.states())?;
        Ok(Self {
            problem,
            index,
            gamma,
        })
    }

    pub(crate) fn gamma(&self) -> f64 {
        self.gamma
    }

    pub(crate) fn index(&self) -> &StateIndex<P::State> {
        &self.index
    }

    pub(crate) fn is_terminal(&self, state: &P::State) -> bool {
        self.problem.is_terminal(state)
    }

    pub(crate) fn initial_state<R: Rng>(&self, rng: &mut R) -> Result<P::State, SolveError> {
        let state = self.problem.initial_state(rng);
        self.index.require(&state)?;
        Ok(state)
    }

    /// Sample a successor and its reward.
    pub(crate) fn step<R: Rng>(
        &self,
        state: &P::State,
        action: &P::Action,
        rng: &mut R,
    ) -> Result<(P::State, f64), SolveError> {
        let next = self.problem.sample_transition(state, action, rng);
        self.index.require(&next)?;
        let reward = self.problem.reward(state, action, &next);
        Ok((next, reward))
    }

    /// Legal actions of a non-terminal state; an empty list is an error.
    pub(crate) fn legal_actions(&self, state: &P::State) -> Result<Vec<P::Action>, SolveError> {
        let actions = self.problem.legal_actions(state);
        if actions.is_empty() {
            return Err(SolveError::no_legal_actions(state));
        }
        Ok(actions)
    }

    pub(crate) fn zero_values(&self) -> ValueTable<P::State> {
        ValueTable::zeros(self.index.clone())
    }

    /// Action-value table over every non-terminal state and its legal actions.
    pub(crate) fn action_values<F>(
        &self,
        init: F,
    ) -> Result<ActionValueTable<P::State, P::Action>, SolveError>
    where
        F: FnMut() -> f64,
    {
        let mut rows = Vec::new();
        for state in self.index.states() {
            if self.is_terminal(state) {
                continue;
            }
            rows.push((state.clone(), self.legal_actions(state)?));
        }
        Ok(ActionValueTable::from_rows(rows, init))
    }
}
