use rand::Rng;
use tracing::{debug, trace, warn};

use crate::solver::{
    config::ExactConfig,
    error::SolveError,
    metrics::SweepMetrics,
    model::Model,
    problem::ExactProblem,
    tables::{Policy, ValueTable},
};

/// Find an optimal policy with Bellman optimality backups.
pub fn value_iteration<P, R>(
    problem: &P,
    config: &ExactConfig,
    rng: &mut R,
) -> Result<Policy<P::State, P::Action>, SolveError>
where
    P: ExactProblem,
    R: Rng,
{
    value_iteration_with_hook(problem, config, rng, |_| {}).map(|(policy, _)| policy)
}

/// `value_iteration` that also returns the converged value table.
pub fn value_iteration_with_values<P, R>(
    problem: &P,
    config: &ExactConfig,
    rng: &mut R,
) -> Result<(Policy<P::State, P::Action>, ValueTable<P::State>), SolveError>
where
    P: ExactProblem,
    R: Rng,
{
    value_iteration_with_hook(problem, config, rng, |_| {})
}

/// Value iteration reporting every sweep to `on_sweep`.
///
/// Non-terminal values are seeded uniformly in `[0, 1)`, terminal values at 0.
/// Sweeps update in place. After the largest change drops below
/// `config.epsilon` (or the sweep cap is hit) the greedy policy is extracted
/// from the final table.
pub fn value_iteration_with_hook<P, R, F>(
    problem: &P,
    config: &ExactConfig,
    rng: &mut R,
    mut on_sweep: F,
) -> Result<(Policy<P::State, P::Action>, ValueTable<P::State>), SolveError>
where
    P: ExactProblem,
    R: Rng,
    F: FnMut(&SweepMetrics),
{
    config.validate()?;
    let model = Model::new(problem)?;

    let mut values = model.zero_values();
    for idx in model.non_terminal() {
        values.values_mut()[idx] = rng.r#gen::<f64>();
    }

    let mut converged = false;
    let mut last_delta = f64::INFINITY;
    for sweep in 0..config.max_iter {
        let mut delta: f64 = 0.0;
        for idx in model.non_terminal() {
            let old = values.values()[idx];
            let (_, best) = model.greedy(values.values(), idx)?;
            values.values_mut()[idx] = best;
            delta = delta.max((old - best).abs());
        }

        last_delta = delta;
        let metrics = SweepMetrics { sweep, delta };
        trace!(sweep, delta, "value iteration sweep");
        on_sweep(&metrics);

        if delta < config.epsilon {
            debug!(sweeps = sweep + 1, delta, "value iteration converged");
            converged = true;
            break;
        }
    }

    if !converged {
        warn!(
            max_iter = config.max_iter,
            delta = last_delta,
            "value iteration stopped at the sweep cap before converging"
        );
    }

    let policy = model.greedy_policy(values.values())?;
    Ok((policy, values))
}
