use std::collections::HashMap;

use crate::{ActionSpec, CompiledMdp, MdpError, MdpSpec, OutcomeSpec, StateSpec};

/// Declare a tabular MDP one transition at a time.
///
/// States are declared first; `transition(s, a, s', p, r)` then adds the
/// entry `P(s' | s, a) = p` with reward `r`, creating action `a` on first
/// use. Distributions are only checked as a whole by [`MdpBuilder::build`].
///
/// ```
/// use mdpsolve_mdp::MdpBuilder;
///
/// let mut builder = MdpBuilder::new(0.9);
/// builder.state("s")?.terminal("end")?.start("s");
/// builder
///     .transition("s", "go", "end", 0.8, 1.0)?
///     .transition("s", "go", "s", 0.2, 0.0)?;
/// let mdp = builder.build()?;
/// assert_eq!(mdp.state_count(), 2);
/// # Ok::<(), mdpsolve_mdp::MdpError>(())
/// ```
#[derive(Debug, Clone)]
pub struct MdpBuilder {
    start: Option<String>,
    gamma: f64,
    states: Vec<StateSpec>,
    by_id: HashMap<String, usize>,
}

impl MdpBuilder {
    pub fn new(gamma: f64) -> Self {
        Self {
            start: None,
            gamma,
            states: Vec::new(),
            by_id: HashMap::new(),
        }
    }

    /// State simulated episodes start from.
    pub fn start(&mut self, state: impl Into<String>) -> &mut Self {
        self.start = Some(state.into());
        self
    }

    /// Declare a non-terminal state.
    pub fn state(&mut self, id: impl Into<String>) -> Result<&mut Self, MdpError> {
        self.declare(id.into(), false)
    }

    /// Declare a terminal state. Its value is fixed at 0 and it takes no actions.
    pub fn terminal(&mut self, id: impl Into<String>) -> Result<&mut Self, MdpError> {
        self.declare(id.into(), true)
    }

    fn declare(&mut self, id: String, terminal: bool) -> Result<&mut Self, MdpError> {
        if self.by_id.contains_key(&id) {
            return Err(MdpError::DuplicateState { state: id });
        }
        self.by_id.insert(id.clone(), self.states.len());
        self.states.push(StateSpec {
            id,
            terminal,
            actions: Vec::new(),
        });
        Ok(self)
    }

    /// Add `P(next | state, action) = prob` with reward `reward`.
    ///
    /// `state` must already be declared and must not be terminal; `next` may
    /// be declared later.
    pub fn transition(
        &mut self,
        state: &str,
        action: &str,
        next: impl Into<String>,
        prob: f64,
        reward: f64,
    ) -> Result<&mut Self, MdpError> {
        let idx = *self
            .by_id
            .get(state)
            .ok_or_else(|| MdpError::UndeclaredState {
                state: state.to_string(),
            })?;
        let from = &mut self.states[idx];
        if from.terminal {
            return Err(MdpError::TerminalWithActions {
                state: from.id.clone(),
            });
        }

        let outcome = OutcomeSpec {
            next: next.into(),
            prob,
            reward,
        };
        match from.actions.iter_mut().find(|a| a.id == action) {
            Some(existing) => existing.outcomes.push(outcome),
            None => from.actions.push(ActionSpec {
                id: action.to_string(),
                outcomes: vec![outcome],
            }),
        }
        Ok(self)
    }

    /// Snapshot of the declarations so far, e.g. for [`crate::save_yaml`].
    pub fn to_spec(&self) -> Result<MdpSpec, MdpError> {
        let start = self.start.clone().ok_or(MdpError::MissingStart)?;
        Ok(MdpSpec {
            start,
            gamma: self.gamma,
            states: self.states.clone(),
        })
    }

    /// Validate and compile the declared model.
    pub fn build(&self) -> Result<CompiledMdp, MdpError> {
        self.to_spec()?.compile()
    }
}
