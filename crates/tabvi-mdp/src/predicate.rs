use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{MdpError, StateSpec};

/// Condition over the states of a tabular MDP, used to scope affordances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StatePredicate {
    Always,
    /// Holds in exactly one state.
    StateIs {
        state: String,
    },
    /// Holds in every state carrying `tag`.
    HasTag {
        tag: String,
    },
    Not {
        predicate: Box<StatePredicate>,
    },
    All {
        predicates: Vec<StatePredicate>,
    },
    Any {
        predicates: Vec<StatePredicate>,
    },
}

impl StatePredicate {
    pub fn state_is(state: impl Into<String>) -> Self {
        StatePredicate::StateIs {
            state: state.into(),
        }
    }

    pub fn has_tag(tag: impl Into<String>) -> Self {
        StatePredicate::HasTag { tag: tag.into() }
    }

    pub fn negate(self) -> Self {
        StatePredicate::Not {
            predicate: Box::new(self),
        }
    }

    /// Resolve every state and tag reference, failing on unknown ones.
    pub(crate) fn check(&self, states: &[StateSpec]) -> Result<(), MdpError> {
        match self {
            StatePredicate::Always => Ok(()),
            StatePredicate::StateIs { state } => {
                if states.iter().any(|s| s.id == *state) {
                    Ok(())
                } else {
                    Err(MdpError::UnknownPredicateState {
                        state: state.clone(),
                    })
                }
            }
            StatePredicate::HasTag { tag } => {
                if states.iter().any(|s| s.has_tag(tag)) {
                    Ok(())
                } else {
                    Err(MdpError::UnknownTag { tag: tag.clone() })
                }
            }
            StatePredicate::Not { predicate } => predicate.check(states),
            StatePredicate::All { predicates } | StatePredicate::Any { predicates } => {
                predicates.iter().try_for_each(|p| p.check(states))
            }
        }
    }

    /// Evaluate the predicate once per state; entry `i` tells whether it holds in state `i`.
    pub(crate) fn members(&self, states: &[StateSpec], ids: &HashMap<String, usize>) -> Vec<bool> {
        match self {
            StatePredicate::Always => vec![true; states.len()],
            StatePredicate::StateIs { state } => {
                let mut members = vec![false; states.len()];
                if let Some(idx) = ids.get(state) {
                    members[*idx] = true;
                }
                members
            }
            StatePredicate::HasTag { tag } => states.iter().map(|s| s.has_tag(tag)).collect(),
            StatePredicate::Not { predicate } => predicate
                .members(states, ids)
                .into_iter()
                .map(|m| !m)
                .collect(),
            StatePredicate::All { predicates } => {
                predicates.iter().fold(vec![true; states.len()], |acc, p| {
                    acc.into_iter()
                        .zip(p.members(states, ids))
                        .map(|(a, b)| a && b)
                        .collect()
                })
            }
            StatePredicate::Any { predicates } => {
                predicates.iter().fold(vec![false; states.len()], |acc, p| {
                    acc.into_iter()
                        .zip(p.members(states, ids))
                        .map(|(a, b)| a || b)
                        .collect()
                })
            }
        }
    }
}
