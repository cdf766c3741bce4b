mod solver;

pub use solver::closure::{FnProblem, FnSimulator, ProblemBuilder};
pub use solver::config::{ConfigError, ExactConfig, LearningConfig};
pub use solver::error::{ErrorKind, SolveError};
pub use solver::evaluation::{evaluate_policy, evaluate_policy_with_hook};
pub use solver::greedy::epsilon_greedy;
pub use solver::metrics::{EpisodeMetrics, ImprovementMetrics, SweepMetrics};
pub use solver::greedy_policy;
pub use solver::policy_iteration::{policy_iteration, policy_iteration_with_hook};
pub use solver::problem::{ExactProblem, SimulableProblem};
pub use solver::q_learning::{q_learning, q_learning_with_hook};
pub use solver::sarsa::{sarsa, sarsa_with_hook};
pub use solver::tables::{ActionValueTable, Policy, StateIndex, ValueTable};
pub use solver::td::{td0, td0_with_hook};
pub use solver::value_iteration::{
    value_iteration, value_iteration_with_hook, value_iteration_with_values,
};
