use mdpsolve_core::{
    ExactConfig, ExactProblem, LearningConfig, SimulableProblem, evaluate_policy,
    policy_iteration, q_learning, sarsa, value_iteration, value_iteration_with_values,
};
use mdpsolve_mdp::{
    MdpError,
    problems::{Gambler, GamblerSim, MAX_GOAL, MagicBus, MagicBusSim, Travel},
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const TIGHT: ExactConfig = ExactConfig {
    epsilon: 1e-10,
    max_iter: 100_000,
};

#[test]
fn gambler_stakes_and_terminals() {
    let game = Gambler::new(100, 0.4, 1.0).expect("valid parameters");

    assert_eq!(game.states().len(), 101);
    assert!(game.is_terminal(&0));
    assert!(game.is_terminal(&100));
    assert!(!game.is_terminal(&50));
    assert_eq!(game.stakes(50), (1..=50).collect::<Vec<_>>());
    assert_eq!(game.stakes(99), vec![1]);
    assert!(game.stakes(100).is_empty());

    assert_eq!(game.transition_prob(&10, &3, &13), 0.4);
    assert!((game.transition_prob(&10, &3, &7) - 0.6).abs() < 1e-12);
    assert_eq!(game.transition_prob(&10, &3, &11), 0.0);
    assert_eq!(ExactProblem::reward(&game, &97, &3, &100), 1.0);
    assert_eq!(ExactProblem::reward(&game, &97, &3, &94), 0.0);
}

#[test]
fn gambler_values_are_win_probabilities() {
    let game = Gambler::new(30, 0.4, 1.0).expect("valid parameters");
    let mut rng = ChaCha8Rng::seed_from_u64(11);

    let (policy, values) = value_iteration_with_values(&game, &TIGHT, &mut rng).expect("solvable");

    assert_eq!(values.get(&0), Some(0.0));
    assert_eq!(values.get(&30), Some(0.0));
    assert_eq!(policy.len(), 29);

    let v: Vec<f64> = (1..30).map(|s| values.get(&s).expect("declared")).collect();
    assert!(v.iter().all(|p| (0.0..=1.0).contains(p)));
    for pair in v.windows(2) {
        assert!(pair[1] >= pair[0] - 1e-7, "{} then {}", pair[0], pair[1]);
    }

    // Bold play from the midpoint wins with probability p_heads.
    assert!((values.get(&15).expect("declared") - 0.4).abs() < 1e-6);
}

#[test]
fn fair_coin_gambler_keeps_terminals_at_zero() {
    let game = Gambler::new(100, 0.5, 1.0).expect("valid parameters");
    let mut rng = ChaCha8Rng::seed_from_u64(12);

    let (policy, values) = value_iteration_with_values(&game, &TIGHT, &mut rng).expect("solvable");

    assert_eq!(values.get(&0), Some(0.0));
    assert_eq!(values.get(&100), Some(0.0));
    assert_eq!(policy.len(), 99);
    assert_eq!(policy.get(&0), None);
    assert_eq!(policy.get(&100), None);
    assert_eq!(game.stakes(50), (1..=50).collect::<Vec<_>>());
    assert!((1..=50).contains(policy.get(&50).expect("50 is not terminal")));

    // With a fair coin every strategy wins with probability capital / goal.
    assert!((values.get(&50).expect("declared") - 0.5).abs() < 1e-6);
}

#[test]
fn gambler_rejects_bad_parameters() {
    let err = Gambler::new(1, 0.4, 1.0).expect_err("goal too small");
    assert!(matches!(err, MdpError::InvalidParameter { name: "goal", .. }));

    let err = Gambler::new(10, 1.5, 1.0).expect_err("p_heads above 1");
    assert!(matches!(err, MdpError::InvalidParameter { name: "p_heads", .. }));

    let err = Gambler::new(MAX_GOAL + 1, 0.4, 1.0).expect_err("goal too large");
    assert!(matches!(err, MdpError::InvalidParameter { name: "goal", .. }));

    let err = MagicBus::new(u32::MAX, 0.5, 0.9).expect_err("goal + 1 would overflow");
    assert!(matches!(err, MdpError::InvalidParameter { name: "goal", .. }));

    let err = MagicBusSim::new(u32::MAX, 0.5, 0.9).expect_err("goal + 1 would overflow");
    assert!(matches!(err, MdpError::InvalidParameter { name: "goal", .. }));

    let err = MagicBus::new(10, 0.5, -0.1).expect_err("negative gamma");
    assert!(matches!(err, MdpError::InvalidGamma { .. }));
}

#[test]
fn gambler_simulation_covers_every_stake() {
    let sim = GamblerSim::new(10, 0.4, 1.0).expect("valid parameters");
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    for _ in 0..200 {
        let start = sim.initial_state(&mut rng);
        assert!((1..10).contains(&start));
    }

    let config = LearningConfig {
        alpha: 0.2,
        epsilon: 0.1,
        episodes: 200,
        max_steps: 50,
    };
    let q = q_learning(&sim, &config, &mut rng).expect("learning should succeed");

    // 1 + 2 + 3 + 4 + 5 + 4 + 3 + 2 + 1 stakes over capitals 1..10.
    assert_eq!(q.len(), 25);
    assert_eq!(q.actions(&0), None);
    assert_eq!(q.actions(&10), None);
}

#[test]
fn slow_bus_is_never_worth_it() {
    let bus = MagicBus::new(20, 0.01, 0.9).expect("valid parameters");
    let mut rng = ChaCha8Rng::seed_from_u64(2);

    let policy = value_iteration(&bus, &TIGHT, &mut rng).expect("solvable");

    assert_eq!(policy.len(), 21);
    assert!(policy.iter().all(|(_, a)| *a == Travel::Walk));
}

#[test]
fn reliable_bus_is_taken_when_it_lands_on_the_goal() {
    let bus = MagicBus::new(16, 0.99, 0.9).expect("valid parameters");
    let mut rng = ChaCha8Rng::seed_from_u64(3);

    let policy = value_iteration(&bus, &TIGHT, &mut rng).expect("solvable");

    assert_eq!(policy.get(&8), Some(&Travel::Bus));
    assert_eq!(policy.get(&15), Some(&Travel::Walk));
}

#[test]
fn policy_and_value_iteration_agree_on_magic_bus() {
    let bus = MagicBus::new(25, 0.6, 0.9).expect("valid parameters");
    let mut rng = ChaCha8Rng::seed_from_u64(4);

    let from_pi = policy_iteration(&bus, &TIGHT, &mut rng).expect("solvable");
    let from_vi = value_iteration(&bus, &TIGHT, &mut rng).expect("solvable");

    let v_pi = evaluate_policy(&from_pi, &bus, &TIGHT).expect("complete policy");
    let v_vi = evaluate_policy(&from_vi, &bus, &TIGHT).expect("complete policy");
    for ((s, a), (_, b)) in v_pi.iter().zip(v_vi.iter()) {
        assert!((a - b).abs() < 1e-6, "state {s}: {a} vs {b}");
    }
}

#[test]
fn magic_bus_simulation_ends_at_the_goal() {
    let sim = MagicBusSim::new(12, 0.5, 0.99).expect("valid parameters");
    let mut rng = ChaCha8Rng::seed_from_u64(6);

    assert!(sim.is_terminal(&12));
    assert!(sim.is_terminal(&13));
    assert!(sim.legal_actions(&13).is_empty());
    assert_eq!(sim.reward(&6, &Travel::Bus, &12), 100.0);
    assert_eq!(sim.reward(&7, &Travel::Bus, &13), -100.0);
    assert_eq!(sim.sample_transition(&11, &Travel::Walk, &mut rng), 12);

    let config = LearningConfig {
        alpha: 0.1,
        epsilon: 0.1,
        episodes: 300,
        max_steps: 40,
    };
    let q = sarsa(&sim, &config, &mut rng).expect("learning should succeed");

    assert_eq!(q.len(), 2 * 11);
    assert_eq!(q.greedy_policy().len(), 11);
}
