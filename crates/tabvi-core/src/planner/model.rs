use std::fmt;

use crate::planner::transition::Transition;

/// Interface a domain implements so the planner can explore and back up its states.
///
/// The four methods are the external collaborators of the planner:
/// - action enumeration: `applicable_actions(state)`
/// - transition model: `transitions(state, action)`
/// - reward function: `reward(state, action, next)`
/// - terminal predicate: `is_terminal(state)`
///
/// States are only borrowed. The planner hashes them, caches what it needs and drops them.
pub trait MdpModel {
    type State;
    type Action: Clone + PartialEq + fmt::Debug;

    /// Return whether a state ends the episode. Terminal states are never expanded.
    fn is_terminal(&self, state: &Self::State) -> bool;

    /// Return every action applicable in `state`, in a stable enumeration order.
    fn applicable_actions(&self, state: &Self::State) -> Vec<Self::Action>;

    /// Return the successor distribution of taking `action` in `state`.
    /// Probabilities must sum to 1.
    fn transitions(
        &self,
        state: &Self::State,
        action: &Self::Action,
    ) -> Vec<Transition<Self::State>>;

    /// Return the reward for the transition `state --action--> next`.
    fn reward(&self, state: &Self::State, action: &Self::Action, next: &Self::State) -> f64;
}
