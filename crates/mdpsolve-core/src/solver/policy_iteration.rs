use rand::{Rng, seq::SliceRandom};
use tracing::{debug, trace, warn};

use crate::solver::{
    config::ExactConfig,
    error::SolveError,
    evaluation::evaluate_resolved,
    metrics::{ImprovementMetrics, SweepMetrics},
    model::Model,
    problem::ExactProblem,
    tables::Policy,
};

/// Find an optimal policy by alternating evaluation and greedy improvement.
///
/// Starts from a uniformly random legal action in every non-terminal state.
/// Stops once an improvement sweep changes no action, or after
/// `config.max_iter` rounds.
pub fn policy_iteration<P, R>(
    problem: &P,
    config: &ExactConfig,
    rng: &mut R,
) -> Result<Policy<P::State, P::Action>, SolveError>
where
    P: ExactProblem,
    R: Rng,
{
    policy_iteration_with_hook(problem, config, rng, |_| {})
}

/// `policy_iteration` that reports every improvement round to `on_round`.
pub fn policy_iteration_with_hook<P, R, F>(
    problem: &P,
    config: &ExactConfig,
    rng: &mut R,
    mut on_round: F,
) -> Result<Policy<P::State, P::Action>, SolveError>
where
    P: ExactProblem,
    R: Rng,
    F: FnMut(&ImprovementMetrics),
{
    config.validate()?;
    let model = Model::new(problem)?;

    let mut actions: Vec<Option<P::Action>> = vec![None; model.index().len()];
    for idx in model.non_terminal() {
        let legal = model.legal_actions(idx)?;
        actions[idx] = legal.choose(rng).cloned();
    }

    for iteration in 0..config.max_iter {
        let mut values = model.zero_values();
        evaluate_resolved(&model, &actions, config, &mut values, &mut |_: &SweepMetrics| {})?;

        // Reset on every round: a sweep with no changes means the policy is stable.
        let mut stable = true;
        let mut changed_states = 0;
        for idx in model.non_terminal() {
            let (best, _) = model.greedy(values.values(), idx)?;
            if actions[idx].as_ref() != Some(&best) {
                stable = false;
                changed_states += 1;
                actions[idx] = Some(best);
            }
        }

        let metrics = ImprovementMetrics {
            iteration,
            changed_states,
            mean_value: values.mean(),
        };
        trace!(iteration, changed_states, "policy improvement round");
        on_round(&metrics);

        if stable {
            debug!(rounds = iteration + 1, "policy iteration reached a stable policy");
            return Ok(collect_policy(&model, actions));
        }
    }

    warn!(
        max_iter = config.max_iter,
        "policy iteration stopped at the round cap before the policy stabilised"
    );
    Ok(collect_policy(&model, actions))
}

fn collect_policy<P: ExactProblem>(
    model: &Model<'_, P>,
    actions: Vec<Option<P::Action>>,
) -> Policy<P::State, P::Action> {
    actions
        .into_iter()
        .enumerate()
        .filter_map(|(idx, action)| action.map(|a| (model.state(idx).clone(), a)))
        .collect()
}
