use crate::solver::{
    config::{ConfigError, ExactConfig, LearningConfig},
    error::SolveError,
    tables::{ActionValueTable, Policy, StateIndex, ValueTable},
};

#[test]
fn state_index_keeps_declaration_order_and_rejects_duplicates() {
    let index = StateIndex::from_states(&["c", "a", "b"]).expect("distinct states");
    assert_eq!(index.index_of(&"a"), Some(1));
    assert_eq!(index.get(2), Some(&"b"));
    assert_eq!(index.index_of(&"z"), None);
    assert!(matches!(
        index.require(&"z"),
        Err(SolveError::UnknownState { .. })
    ));

    let err = StateIndex::from_states(&[1, 2, 1]).expect_err("1 appears twice");
    assert_eq!(err, SolveError::DuplicateState { state: "1".into() });
}

#[test]
fn value_table_iterates_in_declaration_order() {
    let index = StateIndex::from_states(&[3u8, 1, 2]).expect("distinct states");
    let values = ValueTable::zeros(index);

    let order: Vec<u8> = values.iter().map(|(s, _)| *s).collect();
    assert_eq!(order, vec![3, 1, 2]);
    assert_eq!(values.len(), 3);
    assert_eq!(values.get(&9), None);
    assert_eq!(values.mean(), 0.0);
}

#[test]
fn action_values_cover_only_declared_pairs() {
    let mut seed = 0.0;
    let q = ActionValueTable::from_rows(
        [(1u8, vec!['x', 'y']), (2u8, vec!['y'])],
        move || {
            seed += 1.0;
            seed
        },
    );

    assert_eq!(q.len(), 3);
    assert_eq!(q.get(&1, &'x'), Some(1.0));
    assert_eq!(q.get(&1, &'y'), Some(2.0));
    assert_eq!(q.get(&2, &'x'), None, "'x' is not legal in state 2");
    assert_eq!(q.get(&0, &'x'), None, "state 0 has no row");
    assert_eq!(q.greedy_action(&1), Some(&'y'));
    assert_eq!(q.max_value(&2), Some(3.0));
    assert_eq!(q.states(), &[1, 2]);
}

#[test]
fn greedy_policy_from_action_values_breaks_ties_by_listing_order() {
    let q = ActionValueTable::from_rows([(0u8, vec!['b', 'a'])], || 0.5);
    let policy = q.greedy_policy();

    let expected: Policy<u8, char> = [(0u8, 'b')].into_iter().collect();
    assert_eq!(policy, expected);
}

#[test]
fn policy_insert_replaces_previous_action() {
    let mut policy = Policy::new();
    assert_eq!(policy.insert("s", 1), None);
    assert_eq!(policy.insert("s", 2), Some(1));
    assert_eq!(policy.get(&"s"), Some(&2));
    assert_eq!(policy.len(), 1);
}

#[test]
fn bundled_configs_parse_and_match_defaults() {
    let exact = ExactConfig::from_default_yaml().expect("bundled exact config is valid");
    assert_eq!(exact, ExactConfig::default());

    let learning = LearningConfig::from_default_yaml().expect("bundled learning config is valid");
    assert_eq!(learning, LearningConfig::default());
}

#[test]
fn partial_yaml_falls_back_to_defaults() {
    let config = LearningConfig::from_yaml_str("alpha: 0.25\nepisodes: 40\n").expect("valid yaml");
    assert_eq!(config.alpha, 0.25);
    assert_eq!(config.episodes, 40);
    assert_eq!(config.max_steps, LearningConfig::default().max_steps);
}

#[test]
fn invalid_yaml_configs_are_rejected() {
    let err = ExactConfig::from_yaml_str("max_iter: 0\n").expect_err("max_iter 0");
    assert!(matches!(err, ConfigError::Invalid(_)));

    let err = LearningConfig::from_yaml_str("epsilon: 2.0\n").expect_err("epsilon above 1");
    assert!(matches!(err, ConfigError::Invalid(_)));

    let err = ExactConfig::from_yaml_str("epsilon: [1, 2]\n").expect_err("not a number");
    assert!(matches!(err, ConfigError::Yaml(_)));

    let err = ExactConfig::from_yaml_path("/definitely/not/here.yaml").expect_err("no file");
    assert!(matches!(err, ConfigError::Io(_)));
}
