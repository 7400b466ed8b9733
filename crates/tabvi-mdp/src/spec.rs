use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{CompiledMdp, MdpError, StatePredicate, compiled::PROB_TOLERANCE};

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Serializable MDP schema used for YAML IO and validation.
pub struct MdpSpec {
    /// Schema version for future compatibility checks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    /// String id of the start state.
    pub start: String,
    /// All state declarations in the model.
    pub states: Vec<StateSpec>,
    /// Action pruning rules applied while planning.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affordances: Option<Vec<AffordanceSpec>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// A single state declaration in the MDP schema.
pub struct StateSpec {
    /// Unique state id.
    pub id: String,
    /// Whether this state is terminal (defaults to `false` if omitted).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal: Option<bool>,
    /// Labels that affordance predicates can refer to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Available actions from this state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<ActionSpec>>,
}

impl StateSpec {
    pub fn is_terminal(&self) -> bool {
        self.terminal.unwrap_or(false)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.as_deref().unwrap_or(&[]).iter().any(|t| t == tag)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// A named action and its stochastic outcomes.
pub struct ActionSpec {
    pub id: String,
    pub outcomes: Vec<OutcomeSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// One probabilistic transition for an action.
pub struct OutcomeSpec {
    pub next: String,
    pub prob: f64,
    pub reward: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Restricts planning to `actions` in every state where `when` holds.
pub struct AffordanceSpec {
    pub when: StatePredicate,
    pub actions: Vec<String>,
}

impl MdpSpec {
    /// Parse a spec from YAML text without validating it.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, MdpError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Render this spec as YAML text.
    pub fn to_yaml_string(&self) -> Result<String, MdpError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Validate schema invariants using the crate default tolerance.
    pub fn validate(&self) -> Result<(), MdpError> {
        self.validate_with_tolerance(PROB_TOLERANCE)
    }

    /// Validate ids, transitions, and probability constraints.
    pub fn validate_with_tolerance(&self, tolerance: f64) -> Result<(), MdpError> {
        // Start state id must be present and non-empty.
        if self.start.trim().is_empty() {
            return Err(MdpError::MissingStart);
        }

        // State ids must be unique.
        let mut ids = HashSet::with_capacity(self.states.len());
        for state in &self.states {
            if !ids.insert(state.id.clone()) {
                return Err(MdpError::DuplicateStateId {
                    id: state.id.clone(),
                });
            }
        }

        // Start state must resolve to a known state id.
        if !ids.contains(&self.start) {
            return Err(MdpError::UnknownStartState {
                start: self.start.clone(),
            });
        }

        for state in &self.states {
            let terminal = state.is_terminal();
            let actions = state.actions.as_deref().unwrap_or(&[]);

            if terminal && !actions.is_empty() {
                return Err(MdpError::TerminalStateHasActions {
                    state: state.id.clone(),
                });
            }

            let mut action_ids = HashSet::with_capacity(actions.len());
            for action in actions {
                if !action_ids.insert(action.id.clone()) {
                    return Err(MdpError::DuplicateActionId {
                        state: state.id.clone(),
                        action: action.id.clone(),
                    });
                }

                if action.outcomes.is_empty() {
                    return Err(MdpError::EmptyOutcomes {
                        state: state.id.clone(),
                        action: action.id.clone(),
                    });
                }

                let mut sum = 0.0_f64;
                let mut targets = HashSet::with_capacity(action.outcomes.len());
                for (i, outcome) in action.outcomes.iter().enumerate() {
                    if !outcome.prob.is_finite() || outcome.prob < 0.0 {
                        return Err(MdpError::InvalidProbability {
                            state: state.id.clone(),
                            action: action.id.clone(),
                            outcome_index: i,
                            value: outcome.prob,
                        });
                    }

                    if !outcome.reward.is_finite() {
                        return Err(MdpError::InvalidReward {
                            state: state.id.clone(),
                            action: action.id.clone(),
                            outcome_index: i,
                            value: outcome.reward,
                        });
                    }

                    if !ids.contains(&outcome.next) {
                        return Err(MdpError::UnknownNextState {
                            state: state.id.clone(),
                            action: action.id.clone(),
                            next: outcome.next.clone(),
                        });
                    }

                    // Rewards are keyed by (state, action, next).
                    if !targets.insert(outcome.next.as_str()) {
                        return Err(MdpError::DuplicateOutcome {
                            state: state.id.clone(),
                            action: action.id.clone(),
                            next: outcome.next.clone(),
                        });
                    }

                    sum += outcome.prob;
                }

                // Outcome probabilities for an action must sum to 1 within tolerance.
                if (sum - 1.0).abs() > tolerance {
                    return Err(MdpError::ProbabilitySum {
                        state: state.id.clone(),
                        action: action.id.clone(),
                        sum,
                        tolerance,
                    });
                }
            }
        }

        self.validate_affordances()
    }

    /// Affordances must list known actions, and their predicates must reference known
    /// states and tags.
    fn validate_affordances(&self) -> Result<(), MdpError> {
        let declared: HashSet<&str> = self
            .states
            .iter()
            .flat_map(|s| s.actions.as_deref().unwrap_or(&[]))
            .map(|a| a.id.as_str())
            .collect();

        for (index, affordance) in self
            .affordances
            .as_deref()
            .unwrap_or(&[])
            .iter()
            .enumerate()
        {
            if affordance.actions.is_empty() {
                return Err(MdpError::EmptyAffordance { index });
            }
            if let Some(action) = affordance
                .actions
                .iter()
                .find(|a| !declared.contains(a.as_str()))
            {
                return Err(MdpError::UnknownAffordanceAction {
                    index,
                    action: action.clone(),
                });
            }
            affordance.when.check(&self.states)?;
        }

        Ok(())
    }

    /// Compile this spec into the runtime representation.
    pub fn compile(&self) -> Result<CompiledMdp, MdpError> {
        CompiledMdp::from_spec(self)
    }
}
