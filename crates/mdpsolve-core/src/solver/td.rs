use rand::Rng;
use tracing::{debug, trace};

use crate::solver::{
    config::LearningConfig,
    error::SolveError,
    metrics::EpisodeMetrics,
    problem::SimulableProblem,
    simulation::Simulation,
    tables::{Policy, ValueTable},
};

/// TD(0) prediction of the value function of a fixed `policy`.
///
/// `config.epsilon` is unused. An episode that starts in a terminal state
/// ends immediately without any update.
pub fn td0<P, R>(
    problem: &P,
    policy: &Policy<P::State, P::Action>,
    config: &LearningConfig,
    rng: &mut R,
) -> Result<ValueTable<P::State>, SolveError>
where
    P: SimulableProblem,
    R: Rng,
{
    td0_with_hook(problem, policy, config, rng, |_| {})
}

/// `td0` that reports every episode to `on_episode`.
pub fn td0_with_hook<P, R, F>(
    problem: &P,
    policy: &Policy<P::State, P::Action>,
    config: &LearningConfig,
    rng: &mut R,
    mut on_episode: F,
) -> Result<ValueTable<P::State>, SolveError>
where
    P: SimulableProblem,
    R: Rng,
    F: FnMut(&EpisodeMetrics),
{
    config.validate()?;
    let sim = Simulation::new(problem)?;
    let gamma = sim.gamma();
    let mut values = sim.zero_values();

    for episode in 0..config.episodes {
        let mut metrics = EpisodeMetrics::new(episode);
        let mut state = sim.initial_state(rng)?;
        let mut state_idx = sim.index().require(&state)?;
        metrics.reached_terminal = sim.is_terminal(&state);

        if !metrics.reached_terminal {
            for _ in 0..config.max_steps {
                let action = policy
                    .get(&state)
                    .ok_or_else(|| SolveError::MissingPolicyAction {
                        state: format!("{state:?}"),
                    })?;
                let (next, reward) = sim.step(&state, action, rng)?;
                let next_idx = sim.index().require(&next)?;
                metrics.record(reward);

                let v = values.values_mut();
                v[state_idx] += config.alpha * (reward + gamma * v[next_idx] - v[state_idx]);

                if sim.is_terminal(&next) {
                    metrics.reached_terminal = true;
                    break;
                }
                state = next;
                state_idx = next_idx;
            }
        }

        trace!(
            episode,
            steps = metrics.steps,
            total_reward = metrics.total_reward,
            "td(0) episode"
        );
        on_episode(&metrics);
    }

    debug!(episodes = config.episodes, "td(0) finished");
    Ok(values)
}
