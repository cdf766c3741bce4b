use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::solver::{
    config::ExactConfig,
    evaluation::evaluate_policy,
    policy_iteration::policy_iteration_with_hook,
    tests::{DenseMdp, bellman_optimum},
    value_iteration::value_iteration_with_values,
};

const TIGHT: ExactConfig = ExactConfig {
    epsilon: 1e-11,
    max_iter: 20_000,
};

/// Small dense MDPs with normalised random transition rows.
fn dense_mdp() -> impl Strategy<Value = DenseMdp> {
    (2usize..5, 1usize..4, 0.1f64..0.9).prop_flat_map(|(n, m, gamma)| {
        let cells = n * m * n;
        (
            proptest::collection::vec(0.05f64..1.0, cells),
            proptest::collection::vec(-1.0f64..1.0, cells),
        )
            .prop_map(move |(weights, rewards)| {
                let mut probs = weights;
                for row in probs.chunks_mut(n) {
                    let total: f64 = row.iter().sum();
                    row.iter_mut().for_each(|p| *p /= total);
                }
                DenseMdp {
                    states: (0..n).collect(),
                    actions: m,
                    probs,
                    rewards,
                    gamma,
                }
            })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn value_iteration_satisfies_bellman_optimality(mdp in dense_mdp(), seed in any::<u64>()) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let (_, values) = value_iteration_with_values(&mdp, &TIGHT, &mut rng).expect("solvable");
        let v = |s: &usize| values.get(s).expect("declared");

        for state in &mdp.states {
            let residual = (bellman_optimum(&mdp, v, state) - v(state)).abs();
            prop_assert!(residual < 1e-8, "state {} residual {}", state, residual);
        }
    }

    #[test]
    fn evaluating_the_optimal_policy_reproduces_optimal_values(mdp in dense_mdp(), seed in any::<u64>()) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let (policy, optimal) = value_iteration_with_values(&mdp, &TIGHT, &mut rng).expect("solvable");
        let evaluated = evaluate_policy(&policy, &mdp, &TIGHT).expect("policy covers every state");

        for (state, value) in optimal.iter() {
            let other = evaluated.get(state).expect("declared");
            prop_assert!((value - other).abs() < 1e-6, "state {} {} vs {}", state, value, other);
        }
    }

    #[test]
    fn policy_iteration_never_regresses_and_matches_value_iteration(mdp in dense_mdp(), seed in any::<u64>()) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut means = Vec::new();
        let policy = policy_iteration_with_hook(&mdp, &TIGHT, &mut rng, |m| means.push(m.mean_value))
            .expect("solvable");

        for pair in means.windows(2) {
            prop_assert!(pair[1] >= pair[0] - 1e-8, "{} then {}", pair[0], pair[1]);
        }
        prop_assert!(means.len() <= mdp.actions.pow(mdp.states.len() as u32) + 1);

        let (_, optimal) = value_iteration_with_values(&mdp, &TIGHT, &mut rng).expect("solvable");
        let evaluated = evaluate_policy(&policy, &mdp, &TIGHT).expect("policy covers every state");
        for (state, value) in optimal.iter() {
            let other = evaluated.get(state).expect("declared");
            prop_assert!((value - other).abs() < 1e-6, "state {} {} vs {}", state, value, other);
        }
    }
}
