use std::{fmt::Debug, hash::Hash};

use rand::RngCore;

/// A finite MDP with a fully known model, solvable by dynamic programming.
///
/// Implementations are read-only oracles: every method must be a pure
/// function of its arguments.
pub trait ExactProblem {
    type State: Clone + Eq + Hash + Debug;
    type Action: Clone + PartialEq + Debug;

    /// The complete, finite state space (terminal states included).
    fn states(&self) -> &[Self::State];

    /// Discount factor in `[0, 1]`.
    fn gamma(&self) -> f64;

    /// Actions available in `state`. May be empty only for terminal states.
    fn legal_actions(&self, state: &Self::State) -> Vec<Self::Action>;

    /// Reward of the transition `state --action--> next`.
    fn reward(&self, state: &Self::State, action: &Self::Action, next: &Self::State) -> f64;

    /// Probability of reaching `next` when taking `action` in `state`.
    fn transition_prob(
        &self,
        state: &Self::State,
        action: &Self::Action,
        next: &Self::State,
    ) -> f64;

    /// Whether `state` is terminal. Terminal values stay frozen at 0.
    fn is_terminal(&self, state: &Self::State) -> bool;
}

/// A finite MDP that can only be sampled, used by the learning engine.
pub trait SimulableProblem {
    type State: Clone + Eq + Hash + Debug;
    type Action: Clone + PartialEq + Debug;

    /// The complete, finite state space (terminal states included).
    fn states(&self) -> &[Self::State];

    /// Discount factor in `[0, 1]`.
    fn gamma(&self) -> f64;

    /// Draw the first state of an episode.
    fn initial_state(&self, rng: &mut dyn RngCore) -> Self::State;

    /// Actions available in `state`. May be empty only for terminal states.
    fn legal_actions(&self, state: &Self::State) -> Vec<Self::Action>;

    /// Reward of the transition `state --action--> next`.
    fn reward(&self, state: &Self::State, action: &Self::Action, next: &Self::State) -> f64;

    /// Draw one successor of `state` under `action`.
    fn sample_transition(
        &self,
        state: &Self::State,
        action: &Self::Action,
        rng: &mut dyn RngCore,
    ) -> Self::State;

    /// Whether `state` ends an episode. Processes that never stop on their own
    /// keep the default.
    fn is_terminal(&self, _state: &Self::State) -> bool {
        false
    }
}
