use mdpsolve_core::{ExactProblem, SimulableProblem};
use rand::{Rng, RngCore};

use super::{check_gamma, check_goal, check_probability};
use crate::MdpError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Travel {
    /// Advance one position for a cost of 1.
    Walk,
    /// Double the position with probability `rho`, otherwise stay. Costs 2.
    Bus,
}

const BOTH: [Travel; 2] = [Travel::Walk, Travel::Bus];

/// The magic bus: reach position `goal` on a line as cheaply as possible,
/// walking or gambling on a bus that doubles the position.
///
/// Positions run over `1..=goal + 1`, where `goal + 1` stands for every
/// overshoot. Landing on the goal pays 0, overshooting costs 9, and the two
/// end positions loop onto themselves forever. No state is terminal, so the
/// problem needs `gamma < 1` to converge.
#[derive(Debug, Clone)]
pub struct MagicBus {
    goal: u32,
    rho: f64,
    gamma: f64,
    states: Vec<u32>,
}

impl MagicBus {
    pub fn new(goal: u32, rho: f64, gamma: f64) -> Result<Self, MdpError> {
        check_goal(goal)?;
        check_probability("rho", rho)?;
        check_gamma(gamma)?;

        Ok(Self {
            goal,
            rho,
            gamma,
            states: (1..=goal + 1).collect(),
        })
    }

    pub fn goal(&self) -> u32 {
        self.goal
    }

    pub fn rho(&self) -> f64 {
        self.rho
    }

    fn walk_to(&self, state: u32) -> u32 {
        (state + 1).min(self.goal + 1)
    }

    fn bus_to(&self, state: u32) -> u32 {
        (2 * state).min(self.goal + 1)
    }
}

impl ExactProblem for MagicBus {
    type State = u32;
    type Action = Travel;

    fn states(&self) -> &[u32] {
        &self.states
    }

    fn gamma(&self) -> f64 {
        self.gamma
    }

    fn legal_actions(&self, _state: &u32) -> Vec<Travel> {
        BOTH.to_vec()
    }

    fn reward(&self, _state: &u32, action: &Travel, next: &u32) -> f64 {
        if *next > self.goal {
            -9.0
        } else if *next == self.goal {
            0.0
        } else {
            match action {
                Travel::Walk => -1.0,
                Travel::Bus => -2.0,
            }
        }
    }

    fn transition_prob(&self, state: &u32, action: &Travel, next: &u32) -> f64 {
        if *state >= self.goal {
            return if next == state { 1.0 } else { 0.0 };
        }
        match action {
            Travel::Walk => {
                if *next == self.walk_to(*state) {
                    1.0
                } else {
                    0.0
                }
            }
            Travel::Bus => {
                if *next == self.bus_to(*state) {
                    self.rho
                } else if next == state {
                    1.0 - self.rho
                } else {
                    0.0
                }
            }
        }
    }

    fn is_terminal(&self, _state: &u32) -> bool {
        false
    }
}

/// Episodic, sampled version of [`MagicBus`]. An episode ends on reaching or
/// passing the goal, worth `+100` and `-100` respectively. Episodes start
/// from a position drawn uniformly from `1..goal`.
#[derive(Debug, Clone)]
pub struct MagicBusSim {
    bus: MagicBus,
}

impl MagicBusSim {
    pub fn new(goal: u32, rho: f64, gamma: f64) -> Result<Self, MdpError> {
        MagicBus::new(goal, rho, gamma).map(|bus| Self { bus })
    }

    pub fn goal(&self) -> u32 {
        self.bus.goal
    }
}

impl SimulableProblem for MagicBusSim {
    type State = u32;
    type Action = Travel;

    fn states(&self) -> &[u32] {
        &self.bus.states
    }

    fn gamma(&self) -> f64 {
        self.bus.gamma
    }

    fn initial_state(&self, rng: &mut dyn RngCore) -> u32 {
        rng.gen_range(1..self.bus.goal)
    }

    fn legal_actions(&self, state: &u32) -> Vec<Travel> {
        if *state >= self.bus.goal {
            return Vec::new();
        }
        BOTH.to_vec()
    }

    fn reward(&self, _state: &u32, action: &Travel, next: &u32) -> f64 {
        if *next > self.bus.goal {
            -100.0
        } else if *next == self.bus.goal {
            100.0
        } else {
            match action {
                Travel::Walk => -1.0,
                Travel::Bus => -2.0,
            }
        }
    }

    fn sample_transition(&self, state: &u32, action: &Travel, rng: &mut dyn RngCore) -> u32 {
        if *state >= self.bus.goal {
            return *state;
        }
        match action {
            Travel::Walk => self.bus.walk_to(*state),
            Travel::Bus if rng.r#gen::<f64>() < self.bus.rho => self.bus.bus_to(*state),
            Travel::Bus => *state,
        }
    }

    fn is_terminal(&self, state: &u32) -> bool {
        *state >= self.bus.goal
    }
}
