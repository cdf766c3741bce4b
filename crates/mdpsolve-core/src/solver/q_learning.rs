use rand::Rng;
use tracing::{debug, trace};

use crate::solver::{
    config::LearningConfig,
    error::SolveError,
    greedy::epsilon_greedy,
    metrics::EpisodeMetrics,
    problem::SimulableProblem,
    simulation::Simulation,
    tables::ActionValueTable,
};

/// Off-policy TD control.
///
/// Actions are chosen epsilon-greedily, but the bootstrap target is the best
/// action value at the successor regardless of what is played next. Entries
/// start at 0.
pub fn q_learning<P, R>(
    problem: &P,
    config: &LearningConfig,
    rng: &mut R,
) -> Result<ActionValueTable<P::State, P::Action>, SolveError>
where
    P: SimulableProblem,
    R: Rng,
{
    q_learning_with_hook(problem, config, rng, |_| {})
}

/// `q_learning` that reports every episode to `on_episode`.
pub fn q_learning_with_hook<P, R, F>(
    problem: &P,
    config: &LearningConfig,
    rng: &mut R,
    mut on_episode: F,
) -> Result<ActionValueTable<P::State, P::Action>, SolveError>
where
    P: SimulableProblem,
    R: Rng,
    F: FnMut(&EpisodeMetrics),
{
    config.validate()?;
    let sim = Simulation::new(problem)?;
    let gamma = sim.gamma();
    let mut q = sim.action_values(|| 0.0)?;

    for episode in 0..config.episodes {
        let mut metrics = EpisodeMetrics::new(episode);
        let mut state = sim.initial_state(rng)?;
        metrics.reached_terminal = sim.is_terminal(&state);

        if !metrics.reached_terminal {
            for _ in 0..config.max_steps {
                let actions = sim.legal_actions(&state)?;
                let action = epsilon_greedy(&q, &state, &actions, config.epsilon, rng)?;
                let (next, reward) = sim.step(&state, &action, rng)?;
                metrics.record(reward);

                if sim.is_terminal(&next) {
                    let entry = q.value_mut(&state, &action)?;
                    *entry += config.alpha * (reward - *entry);
                    metrics.reached_terminal = true;
                    break;
                }

                let bootstrap = q
                    .max_value(&next)
                    .ok_or_else(|| SolveError::no_legal_actions(&next))?;
                let entry = q.value_mut(&state, &action)?;
                *entry += config.alpha * (reward + gamma * bootstrap - *entry);

                state = next;
            }
        }

        trace!(
            episode,
            steps = metrics.steps,
            total_reward = metrics.total_reward,
            "q-learning episode"
        );
        on_episode(&metrics);
    }

    debug!(episodes = config.episodes, entries = q.len(), "q-learning finished");
    Ok(q)
}
