use tracing::{debug, trace, warn};

use crate::solver::{
    config::ExactConfig,
    error::SolveError,
    metrics::SweepMetrics,
    model::Model,
    problem::ExactProblem,
    tables::{Policy, ValueTable},
};

/// Compute the value function of a fixed `policy`.
///
/// Repeats Bellman expectation backups until the largest change in a sweep
/// drops below `config.epsilon` or `config.max_iter` sweeps have run. Hitting
/// the cap is not an error: the latest table is returned.
pub fn evaluate_policy<P: ExactProblem>(
    policy: &Policy<P::State, P::Action>,
    problem: &P,
    config: &ExactConfig,
) -> Result<ValueTable<P::State>, SolveError> {
    evaluate_policy_with_hook(policy, problem, config, |_| {})
}

/// `evaluate_policy` that reports every sweep to `on_sweep`.
pub fn evaluate_policy_with_hook<P, F>(
    policy: &Policy<P::State, P::Action>,
    problem: &P,
    config: &ExactConfig,
    mut on_sweep: F,
) -> Result<ValueTable<P::State>, SolveError>
where
    P: ExactProblem,
    F: FnMut(&SweepMetrics),
{
    config.validate()?;
    let model = Model::new(problem)?;
    let actions = model.resolve_policy(policy)?;

    let mut values = model.zero_values();
    evaluate_resolved(&model, &actions, config, &mut values, &mut on_sweep)?;
    Ok(values)
}

/// Sweep `values` in place until the policy given by `actions` converges.
///
/// Updates are Gauss-Seidel style: a backup already sees the values written
/// earlier in the same sweep. Terminal slots are never touched.
pub(crate) fn evaluate_resolved<P, F>(
    model: &Model<'_, P>,
    actions: &[Option<P::Action>],
    config: &ExactConfig,
    values: &mut ValueTable<P::State>,
    on_sweep: &mut F,
) -> Result<SweepMetrics, SolveError>
where
    P: ExactProblem,
    F: FnMut(&SweepMetrics),
{
    let mut last = SweepMetrics {
        sweep: 0,
        delta: f64::INFINITY,
    };

    for sweep in 0..config.max_iter {
        let mut delta: f64 = 0.0;
        for (idx, action) in actions.iter().enumerate() {
            let Some(action) = action else { continue };
            let old = values.values()[idx];
            let new = model.action_value(values.values(), idx, action)?;
            values.values_mut()[idx] = new;
            delta = delta.max((old - new).abs());
        }

        last = SweepMetrics { sweep, delta };
        trace!(sweep, delta, "policy evaluation sweep");
        on_sweep(&last);

        if delta < config.epsilon {
            debug!(sweeps = sweep + 1, delta, "policy evaluation converged");
            return Ok(last);
        }
    }

    warn!(
        max_iter = config.max_iter,
        delta = last.delta,
        "policy evaluation stopped at the sweep cap before converging"
    );
    Ok(last)
}
