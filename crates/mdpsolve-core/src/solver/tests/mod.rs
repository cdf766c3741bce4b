mod property_tests;
mod table_tests;

use rand::RngCore;

use crate::solver::problem::{ExactProblem, SimulableProblem};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(super) enum Move {
    Advance,
    Stay,
}

/// State 0 is terminal. From state 1, `Advance` reaches 0 with reward 1 and
/// `Stay` loops on 1 with reward 0.
pub(super) struct TwoState {
    pub(super) states: Vec<u8>,
    pub(super) gamma: f64,
}

impl TwoState {
    pub(super) fn new(gamma: f64) -> Self {
        TwoState {
            states: vec![0, 1],
            gamma,
        }
    }

    fn next(state: u8, action: Move) -> u8 {
        match (state, action) {
            (1, Move::Advance) => 0,
            (s, _) => s,
        }
    }
}

impl ExactProblem for TwoState {
    type State = u8;
    type Action = Move;

    fn states(&self) -> &[u8] {
        &self.states
    }

    fn gamma(&self) -> f64 {
        self.gamma
    }

    fn legal_actions(&self, state: &u8) -> Vec<Move> {
        if *state == 0 {
            Vec::new()
        } else {
            vec![Move::Advance, Move::Stay]
        }
    }

    fn reward(&self, state: &u8, action: &Move, next: &u8) -> f64 {
        if *state == 1 && *action == Move::Advance && *next == 0 {
            1.0
        } else {
            0.0
        }
    }

    fn transition_prob(&self, state: &u8, action: &Move, next: &u8) -> f64 {
        if Self::next(*state, *action) == *next {
            1.0
        } else {
            0.0
        }
    }

    fn is_terminal(&self, state: &u8) -> bool {
        *state == 0
    }
}

impl SimulableProblem for TwoState {
    type State = u8;
    type Action = Move;

    fn states(&self) -> &[u8] {
        &self.states
    }

    fn gamma(&self) -> f64 {
        self.gamma
    }

    fn initial_state(&self, _rng: &mut dyn RngCore) -> u8 {
        1
    }

    fn legal_actions(&self, state: &u8) -> Vec<Move> {
        <Self as ExactProblem>::legal_actions(self, state)
    }

    fn reward(&self, state: &u8, action: &Move, next: &u8) -> f64 {
        <Self as ExactProblem>::reward(self, state, action, next)
    }

    fn sample_transition(&self, state: &u8, action: &Move, _rng: &mut dyn RngCore) -> u8 {
        Self::next(*state, *action)
    }

    fn is_terminal(&self, state: &u8) -> bool {
        *state == 0
    }
}

/// MDP given by dense `[s][a][s']` probability and reward tables.
/// Every state is non-terminal.
#[derive(Debug, Clone)]
pub(super) struct DenseMdp {
    pub(super) states: Vec<usize>,
    pub(super) actions: usize,
    pub(super) probs: Vec<f64>,
    pub(super) rewards: Vec<f64>,
    pub(super) gamma: f64,
}

impl DenseMdp {
    fn at(&self, s: usize, a: usize, next: usize) -> usize {
        let n = self.states.len();
        (s * self.actions + a) * n + next
    }
}

impl ExactProblem for DenseMdp {
    type State = usize;
    type Action = usize;

    fn states(&self) -> &[usize] {
        &self.states
    }

    fn gamma(&self) -> f64 {
        self.gamma
    }

    fn legal_actions(&self, _state: &usize) -> Vec<usize> {
        (0..self.actions).collect()
    }

    fn reward(&self, state: &usize, action: &usize, next: &usize) -> f64 {
        self.rewards[self.at(*state, *action, *next)]
    }

    fn transition_prob(&self, state: &usize, action: &usize, next: &usize) -> f64 {
        self.probs[self.at(*state, *action, *next)]
    }

    fn is_terminal(&self, _state: &usize) -> bool {
        false
    }
}

/// `max_a sum_s' P (R + gamma V)` computed straight from the problem.
pub(super) fn bellman_optimum<P: ExactProblem>(
    problem: &P,
    value: impl Fn(&P::State) -> f64,
    state: &P::State,
) -> f64 {
    problem
        .legal_actions(state)
        .iter()
        .map(|a| {
            problem
                .states()
                .iter()
                .map(|next| {
                    problem.transition_prob(state, a, next)
                        * (problem.reward(state, a, next) + problem.gamma() * value(next))
                })
                .sum::<f64>()
        })
        .fold(f64::NEG_INFINITY, f64::max)
}
