use thiserror::Error;

use crate::planner::config::ConfigError;

/// Error type for exploration, value iteration and policy queries.
#[derive(Debug, Error)]
pub enum PlanError {
    /// Sweeps were requested before any reachability exploration ran.
    #[error("value iteration is not initialized; explore or plan from a state first")]
    NotInitialized,

    #[error(
        "invalid probability for state {state}, action {action}, outcome {outcome_index}: {value}"
    )]
    InvalidProbability {
        state: String,
        action: String,
        outcome_index: usize,
        value: f64,
    },

    #[error(
        "probability sum for state {state}, action {action} must be within {tolerance} of 1.0, got {sum}"
    )]
    ProbabilitySum {
        state: String,
        action: String,
        sum: f64,
        tolerance: f64,
    },

    /// The distribution carries no probability mass.
    #[error("state {state}, action {action} has zero total transition probability")]
    ZeroProbabilityMass { state: String, action: String },

    #[error("invalid reward for state {state}, action {action}: {value}")]
    InvalidReward {
        state: String,
        action: String,
        value: f64,
    },

    /// An action distribution was requested for a state with no applicable actions.
    #[error("state {state} has no applicable actions to distribute probability over")]
    EmptyActionSet { state: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}
