pub mod closure;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod greedy;
pub mod metrics;
mod model;
pub mod policy_iteration;
pub mod problem;
pub mod q_learning;
pub mod sarsa;
mod simulation;
pub mod tables;
pub mod td;
pub mod value_iteration;

pub use model::greedy_policy;

#[cfg(test)]
mod tests;
