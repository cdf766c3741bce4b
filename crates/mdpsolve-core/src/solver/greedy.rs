use std::{fmt::Debug, hash::Hash};

use rand::{Rng, seq::SliceRandom};

use crate::solver::{
    error::SolveError,
    tables::{ActionValueTable, first_max},
};

/// Epsilon-greedy choice among `actions` at `state`.
///
/// With probability `epsilon` a uniformly random action is returned,
/// otherwise the action with the highest value in `q` (first one wins ties).
/// Every greedy candidate must have an entry in `q`.
pub fn epsilon_greedy<S, A, R>(
    q: &ActionValueTable<S, A>,
    state: &S,
    actions: &[A],
    epsilon: f64,
    rng: &mut R,
) -> Result<A, SolveError>
where
    S: Clone + Eq + Hash + Debug,
    A: Clone + PartialEq + Debug,
    R: Rng + ?Sized,
{
    if !(0.0..=1.0).contains(&epsilon) {
        return Err(SolveError::InvalidConfig {
            reason: format!("epsilon must lie in [0, 1], got {epsilon}"),
        });
    }
    if actions.is_empty() {
        return Err(SolveError::no_legal_actions(state));
    }

    if rng.r#gen::<f64>() < epsilon {
        return actions
            .choose(rng)
            .cloned()
            .ok_or_else(|| SolveError::no_legal_actions(state));
    }

    let mut scored = Vec::with_capacity(actions.len());
    for action in actions {
        scored.push((action, q.value(state, action)?));
    }
    first_max(scored)
        .map(|(action, _)| action.clone())
        .ok_or_else(|| SolveError::no_legal_actions(state))
}
