use std::{fmt::Debug, hash::Hash};

use rand::RngCore;

use crate::solver::{
    error::SolveError,
    problem::{ExactProblem, SimulableProblem},
};

type ActionsFn<S, A> = Box<dyn Fn(&S) -> Vec<A>>;
type RewardFn<S, A> = Box<dyn Fn(&S, &A, &S) -> f64>;
type ProbFn<S, A> = Box<dyn Fn(&S, &A, &S) -> f64>;
type TerminalFn<S> = Box<dyn Fn(&S) -> bool>;
type InitialFn<S> = Box<dyn Fn(&mut dyn RngCore) -> S>;
type SampleFn<S, A> = Box<dyn Fn(&S, &A, &mut dyn RngCore) -> S>;

/// Assemble a problem from closures instead of a dedicated type.
///
/// `build_exact` needs `legal_actions`, `reward`, `transition_prob` and
/// `is_terminal`; `build_simulator` needs `initial_state`, `legal_actions`,
/// `reward` and `sample_transition` (`is_terminal` defaults to never).
/// A missing function is reported as `SolveError::MissingImplementation`.
pub struct ProblemBuilder<S, A> {
    states: Vec<S>,
    gamma: f64,
    legal_actions: Option<ActionsFn<S, A>>,
    reward: Option<RewardFn<S, A>>,
    transition_prob: Option<ProbFn<S, A>>,
    is_terminal: Option<TerminalFn<S>>,
    initial_state: Option<InitialFn<S>>,
    sample_transition: Option<SampleFn<S, A>>,
}

impl<S, A> ProblemBuilder<S, A>
where
    S: Clone + Eq + Hash + Debug + 'static,
    A: Clone + PartialEq + Debug + 'static,
{
    pub fn new(states: Vec<S>, gamma: f64) -> Self {
        ProblemBuilder {
            states,
            gamma,
            legal_actions: None,
            reward: None,
            transition_prob: None,
            is_terminal: None,
            initial_state: None,
            sample_transition: None,
        }
    }

    pub fn legal_actions(mut self, f: impl Fn(&S) -> Vec<A> + 'static) -> Self {
        self.legal_actions = Some(Box::new(f));
        self
    }

    pub fn reward(mut self, f: impl Fn(&S, &A, &S) -> f64 + 'static) -> Self {
        self.reward = Some(Box::new(f));
        self
    }

    pub fn transition_prob(mut self, f: impl Fn(&S, &A, &S) -> f64 + 'static) -> Self {
        self.transition_prob = Some(Box::new(f));
        self
    }

    pub fn is_terminal(mut self, f: impl Fn(&S) -> bool + 'static) -> Self {
        self.is_terminal = Some(Box::new(f));
        self
    }

    pub fn initial_state(mut self, f: impl Fn(&mut dyn RngCore) -> S + 'static) -> Self {
        self.initial_state = Some(Box::new(f));
        self
    }

    pub fn sample_transition(
        mut self,
        f: impl Fn(&S, &A, &mut dyn RngCore) -> S + 'static,
    ) -> Self {
        self.sample_transition = Some(Box::new(f));
        self
    }

    /// Finish as a fully specified model for the dynamic-programming engine.
    pub fn build_exact(self) -> Result<FnProblem<S, A>, SolveError> {
        Ok(FnProblem {
            legal_actions: require(self.legal_actions, "legal_actions")?,
            reward: require(self.reward, "reward")?,
            transition_prob: require(self.transition_prob, "transition_prob")?,
            is_terminal: require(self.is_terminal, "is_terminal")?,
            states: self.states,
            gamma: self.gamma,
        })
    }

    /// Finish as a sampled model for the learning engine.
    pub fn build_simulator(self) -> Result<FnSimulator<S, A>, SolveError> {
        Ok(FnSimulator {
            initial_state: require(self.initial_state, "initial_state")?,
            legal_actions: require(self.legal_actions, "legal_actions")?,
            reward: require(self.reward, "reward")?,
            sample_transition: require(self.sample_transition, "sample_transition")?,
            is_terminal: self.is_terminal,
            states: self.states,
            gamma: self.gamma,
        })
    }
}

fn require<T>(slot: Option<T>, method: &'static str) -> Result<T, SolveError> {
    slot.ok_or(SolveError::MissingImplementation { method })
}

/// Exact problem backed by closures. Built by `ProblemBuilder::build_exact`.
pub struct FnProblem<S, A> {
    states: Vec<S>,
    gamma: f64,
    legal_actions: ActionsFn<S, A>,
    reward: RewardFn<S, A>,
    transition_prob: ProbFn<S, A>,
    is_terminal: TerminalFn<S>,
}

impl<S, A> ExactProblem for FnProblem<S, A>
where
    S: Clone + Eq + Hash + Debug,
    A: Clone + PartialEq + Debug,
{
    type State = S;
    type Action = A;

    fn states(&self) -> &[S] {
        &self.states
    }

    fn gamma(&self) -> f64 {
        self.gamma
    }

    fn legal_actions(&self, state: &S) -> Vec<A> {
        (self.legal_actions)(state)
    }

    fn reward(&self, state: &S, action: &A, next: &S) -> f64 {
        (self.reward)(state, action, next)
    }

    fn transition_prob(&self, state: &S, action: &A, next: &S) -> f64 {
        (self.transition_prob)(state, action, next)
    }

    fn is_terminal(&self, state: &S) -> bool {
        (self.is_terminal)(state)
    }
}

/// Simulable problem backed by closures. Built by
/// `ProblemBuilder::build_simulator`.
pub struct FnSimulator<S, A> {
    states: Vec<S>,
    gamma: f64,
    initial_state: InitialFn<S>,
    legal_actions: ActionsFn<S, A>,
    reward: RewardFn<S, A>,
    sample_transition: SampleFn<S, A>,
    is_terminal: Option<TerminalFn<S>>,
}

impl<S, A> SimulableProblem for FnSimulator<S, A>
where
    S: Clone + Eq + Hash + Debug,
    A: Clone + PartialEq + Debug,
{
    type State = S;
    type Action = A;

    fn states(&self) -> &[S] {
        &self.states
    }

    fn gamma(&self) -> f64 {
        self.gamma
    }

    fn initial_state(&self, rng: &mut dyn RngCore) -> S {
        (self.initial_state)(rng)
    }

    fn legal_actions(&self, state: &S) -> Vec<A> {
        (self.legal_actions)(state)
    }

    fn reward(&self, state: &S, action: &A, next: &S) -> f64 {
        (self.reward)(state, action, next)
    }

    fn sample_transition(&self, state: &S, action: &A, rng: &mut dyn RngCore) -> S {
        (self.sample_transition)(state, action, rng)
    }

    fn is_terminal(&self, state: &S) -> bool {
        self.is_terminal.as_ref().is_some_and(|f| f(state))
    }
}
