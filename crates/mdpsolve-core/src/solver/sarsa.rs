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

/// On-policy TD control.
///
/// The bootstrap target uses the action the epsilon-greedy behaviour policy
/// actually picks at the successor. Entries start uniformly in `[0, 1)`.
pub fn sarsa<P, R>(
    problem: &P,
    config: &LearningConfig,
    rng: &mut R,
) -> Result<ActionValueTable<P::State, P::Action>, SolveError>
where
    P: SimulableProblem,
    R: Rng,
{
    sarsa_with_hook(problem, config, rng, |_| {})
}

/// `sarsa` that reports every episode to `on_episode`.
pub fn sarsa_with_hook<P, R, F>(
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
    let mut q = sim.action_values(|| rng.r#gen::<f64>())?;

    for episode in 0..config.episodes {
        let mut metrics = EpisodeMetrics::new(episode);
        let mut state = sim.initial_state(rng)?;

        if sim.is_terminal(&state) {
            metrics.reached_terminal = true;
        } else {
            let actions = sim.legal_actions(&state)?;
            let mut action = epsilon_greedy(&q, &state, &actions, config.epsilon, rng)?;

            for _ in 0..config.max_steps {
                let (next, reward) = sim.step(&state, &action, rng)?;
                metrics.record(reward);

                if sim.is_terminal(&next) {
                    let entry = q.value_mut(&state, &action)?;
                    *entry += config.alpha * (reward - *entry);
                    metrics.reached_terminal = true;
                    break;
                }

                let next_actions = sim.legal_actions(&next)?;
                let next_action = epsilon_greedy(&q, &next, &next_actions, config.epsilon, rng)?;
                let bootstrap = q.value(&next, &next_action)?;

                let entry = q.value_mut(&state, &action)?;
                *entry += config.alpha * (reward + gamma * bootstrap - *entry);

                state = next;
                action = next_action;
            }
        }

        trace!(
            episode,
            steps = metrics.steps,
            total_reward = metrics.total_reward,
            "sarsa episode"
        );
        on_episode(&metrics);
    }

    debug!(episodes = config.episodes, entries = q.len(), "sarsa finished");
    Ok(q)
}
