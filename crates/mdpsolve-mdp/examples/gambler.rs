use mdpsolve_core::{
    ExactConfig, LearningConfig, Policy, q_learning, sarsa, value_iteration_with_values,
};
use mdpsolve_mdp::problems::{Gambler, GamblerSim};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let goal = 100;
    let p_heads = 0.4;
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    // Step 1: solve the known model exactly.
    let game = Gambler::new(goal, p_heads, 1.0).expect("parameters are valid");
    let config = ExactConfig {
        epsilon: 1e-9,
        max_iter: 100_000,
    };
    let (exact, values) =
        value_iteration_with_values(&game, &config, &mut rng).expect("gambler is solvable");

    // Step 2: learn the same task from sampled flips only.
    let sim = GamblerSim::from(game);
    let learning = LearningConfig {
        alpha: 0.2,
        epsilon: 0.02,
        episodes: 300_000,
        max_steps: 50,
    };
    let from_sarsa = sarsa(&sim, &learning, &mut rng)
        .expect("SARSA run should succeed")
        .greedy_policy();
    let from_q = q_learning(&sim, &learning, &mut rng)
        .expect("Q-learning run should succeed")
        .greedy_policy();

    println!("Gambler's problem: goal {goal}, p_heads {p_heads}");
    println!(
        "{:>8} | {:>8} | {:>8} | {:>8} | {:>8}",
        "capital", "P(win)", "exact", "SARSA", "Q-learn"
    );
    println!("{}", "-".repeat(52));
    for capital in 1..goal {
        let stake = |policy: &Policy<u32, u32>| {
            policy
                .get(&capital)
                .map_or_else(|| "-".to_string(), u32::to_string)
        };
        println!(
            "{:>8} | {:>8.4} | {:>8} | {:>8} | {:>8}",
            capital,
            values.get(&capital).unwrap_or(0.0),
            stake(&exact),
            stake(&from_sarsa),
            stake(&from_q)
        );
    }
}
