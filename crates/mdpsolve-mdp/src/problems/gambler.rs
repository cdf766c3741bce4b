use mdpsolve_core::{ExactProblem, SimulableProblem};
use rand::{Rng, RngCore};

use super::{check_gamma, check_goal, check_probability};
use crate::MdpError;

/// The gambler's problem: stake part of the capital on a biased coin until
/// reaching `goal` or going broke.
///
/// States are capitals `0..=goal`; both ends are terminal. Staking `a` moves
/// the capital to `s + a` with probability `p_heads` and to `s - a` otherwise.
/// The only reward is `1` for the flip that reaches `goal`, so with `gamma = 1`
/// the value of a state is its probability of winning.
#[derive(Debug, Clone)]
pub struct Gambler {
    goal: u32,
    p_heads: f64,
    gamma: f64,
    states: Vec<u32>,
}

impl Gambler {
    pub fn new(goal: u32, p_heads: f64, gamma: f64) -> Result<Self, MdpError> {
        check_goal(goal)?;
        check_probability("p_heads", p_heads)?;
        check_gamma(gamma)?;

        Ok(Self {
            goal,
            p_heads,
            gamma,
            states: (0..=goal).collect(),
        })
    }

    pub fn goal(&self) -> u32 {
        self.goal
    }

    pub fn p_heads(&self) -> f64 {
        self.p_heads
    }

    /// Stakes allowed with capital `state`: `1..=min(state, goal - state)`.
    pub fn stakes(&self, state: u32) -> Vec<u32> {
        if self.ends(state) {
            return Vec::new();
        }
        (1..=state.min(self.goal - state)).collect()
    }

    fn ends(&self, state: u32) -> bool {
        state == 0 || state >= self.goal
    }

    fn payout(&self, next: u32) -> f64 {
        if next == self.goal { 1.0 } else { 0.0 }
    }
}

impl ExactProblem for Gambler {
    type State = u32;
    type Action = u32;

    fn states(&self) -> &[u32] {
        &self.states
    }

    fn gamma(&self) -> f64 {
        self.gamma
    }

    fn legal_actions(&self, state: &u32) -> Vec<u32> {
        self.stakes(*state)
    }

    fn reward(&self, _state: &u32, _stake: &u32, next: &u32) -> f64 {
        self.payout(*next)
    }

    fn transition_prob(&self, state: &u32, stake: &u32, next: &u32) -> f64 {
        if self.ends(*state) {
            return 0.0;
        }
        if *next == state + stake {
            self.p_heads
        } else if state.checked_sub(*stake) == Some(*next) {
            1.0 - self.p_heads
        } else {
            0.0
        }
    }

    fn is_terminal(&self, state: &u32) -> bool {
        self.ends(*state)
    }
}

/// Sampled version of [`Gambler`]. Episodes start from a capital drawn
/// uniformly from `1..goal`.
#[derive(Debug, Clone)]
pub struct GamblerSim {
    game: Gambler,
}

impl GamblerSim {
    pub fn new(goal: u32, p_heads: f64, gamma: f64) -> Result<Self, MdpError> {
        Gambler::new(goal, p_heads, gamma).map(Self::from)
    }

    pub fn game(&self) -> &Gambler {
        &self.game
    }
}

impl From<Gambler> for GamblerSim {
    fn from(game: Gambler) -> Self {
        Self { game }
    }
}

impl SimulableProblem for GamblerSim {
    type State = u32;
    type Action = u32;

    fn states(&self) -> &[u32] {
        &self.game.states
    }

    fn gamma(&self) -> f64 {
        self.game.gamma
    }

    fn initial_state(&self, rng: &mut dyn RngCore) -> u32 {
        rng.gen_range(1..self.game.goal)
    }

    fn legal_actions(&self, state: &u32) -> Vec<u32> {
        self.game.stakes(*state)
    }

    fn reward(&self, _state: &u32, _stake: &u32, next: &u32) -> f64 {
        self.game.payout(*next)
    }

    fn sample_transition(&self, state: &u32, stake: &u32, rng: &mut dyn RngCore) -> u32 {
        if self.game.ends(*state) {
            return *state;
        }
        if rng.r#gen::<f64>() < self.game.p_heads {
            (state + stake).min(self.game.goal)
        } else {
            state.saturating_sub(*stake)
        }
    }

    fn is_terminal(&self, state: &u32) -> bool {
        self.game.ends(*state)
    }
}
