use mdpsolve_core::{
    ExactConfig, LearningConfig, Policy, policy_iteration, q_learning, value_iteration,
};
use mdpsolve_mdp::problems::{MagicBus, MagicBusSim, Travel};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::EnvFilter;

fn bus_stops(policy: &Policy<u32, Travel>, goal: u32) -> Vec<u32> {
    (1..goal)
        .filter(|s| policy.get(s) == Some(&Travel::Bus))
        .collect()
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let goal = 145;
    let config = ExactConfig::from_default_yaml().expect("bundled config is valid");
    let mut rng = ChaCha8Rng::seed_from_u64(11);

    // Step 1: sweep the bus reliability and compare both exact solvers.
    for rho in [0.01, 0.2, 0.4, 0.5, 0.6, 0.8, 0.99] {
        let bus = MagicBus::new(goal, rho, 0.9).expect("parameters are valid");
        let from_pi = policy_iteration(&bus, &config, &mut rng).expect("policy iteration");
        let from_vi = value_iteration(&bus, &config, &mut rng).expect("value iteration");

        let pi_stops = bus_stops(&from_pi, goal);
        let vi_stops = bus_stops(&from_vi, goal);
        println!("rho = {rho}");
        println!("  take the bus at: {vi_stops:?}");
        if pi_stops != vi_stops {
            println!("  policy iteration differs: {pi_stops:?}");
        }
    }

    // Step 2: learn the episodic variant by simulation.
    let sim = MagicBusSim::new(goal, 0.9, 0.999).expect("parameters are valid");
    let learning = LearningConfig {
        alpha: 0.1,
        epsilon: 0.02,
        episodes: 100_000,
        max_steps: 1000,
    };
    let learned = q_learning(&sim, &learning, &mut rng)
        .expect("Q-learning run should succeed")
        .greedy_policy();

    println!("{}", "-".repeat(50));
    println!("Q-learning, rho = 0.9:");
    println!("  take the bus at: {:?}", bus_stops(&learned, goal));
}
