use std::collections::HashMap;

use log::debug;
use tabvi_core::{AffordanceSet, MdpModel, Transition};

use crate::{MdpError, MdpSpec};

/// Floating point tolerance used when validating probability sums.
pub(crate) const PROB_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Dense index for states in a compiled MDP.
pub struct StateKey(usize);

impl StateKey {
    /// Return the underlying state index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for StateKey {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone)]
/// Runtime form of an MDP with resolved state references.
pub struct CompiledMdp {
    start: StateKey,
    states: Vec<StateRec>,
    state_ids: Vec<String>,
    state_id_to_key: HashMap<String, StateKey>,
    affordances: Vec<AffordanceRec>,
}

#[derive(Debug, Clone)]
struct StateRec {
    terminal: bool,
    tags: Vec<String>,
    actions: Vec<ActionRec>,
}

#[derive(Debug, Clone)]
struct ActionRec {
    id: String,
    outcomes: Vec<OutcomeRec>,
}

#[derive(Debug, Clone)]
struct OutcomeRec {
    next: StateKey,
    prob: f64,
    reward: f64,
}

/// Affordance with its predicate evaluated per state.
#[derive(Debug, Clone)]
struct AffordanceRec {
    members: Vec<bool>,
    actions: Vec<String>,
}

impl CompiledMdp {
    /// Compile and validate a spec into a fast runtime representation.
    pub(crate) fn from_spec(spec: &MdpSpec) -> Result<Self, MdpError> {
        spec.validate_with_tolerance(PROB_TOLERANCE)?;

        let mut state_id_to_key = HashMap::with_capacity(spec.states.len());
        let mut positions = HashMap::with_capacity(spec.states.len());
        let mut state_ids = Vec::with_capacity(spec.states.len());

        for (idx, state) in spec.states.iter().enumerate() {
            state_id_to_key.insert(state.id.clone(), StateKey::from(idx));
            positions.insert(state.id.clone(), idx);
            state_ids.push(state.id.clone());
        }

        let start = state_id_to_key.get(&spec.start).copied().ok_or_else(|| {
            MdpError::UnknownStartState {
                start: spec.start.clone(),
            }
        })?;

        let mut states = Vec::with_capacity(spec.states.len());
        for state in &spec.states {
            let mut actions = Vec::new();

            for action in state.actions.as_deref().unwrap_or(&[]) {
                let mut outcomes = Vec::with_capacity(action.outcomes.len());
                for outcome in &action.outcomes {
                    let next = state_id_to_key.get(&outcome.next).copied().ok_or_else(|| {
                        MdpError::UnknownNextState {
                            state: state.id.clone(),
                            action: action.id.clone(),
                            next: outcome.next.clone(),
                        }
                    })?;
                    outcomes.push(OutcomeRec {
                        next,
                        prob: outcome.prob,
                        reward: outcome.reward,
                    });
                }

                actions.push(ActionRec {
                    id: action.id.clone(),
                    outcomes,
                });
            }

            states.push(StateRec {
                terminal: state.is_terminal(),
                tags: state.tags.clone().unwrap_or_default(),
                actions,
            });
        }

        let affordances: Vec<AffordanceRec> = spec
            .affordances
            .as_deref()
            .unwrap_or(&[])
            .iter()
            .map(|affordance| AffordanceRec {
                members: affordance.when.members(&spec.states, &positions),
                actions: affordance.actions.clone(),
            })
            .collect();

        debug!(
            "compiled MDP with {} states and {} affordances",
            states.len(),
            affordances.len()
        );

        Ok(Self {
            start,
            states,
            state_ids,
            state_id_to_key,
            affordances,
        })
    }

    /// Return the start state key.
    pub fn start(&self) -> StateKey {
        self.start
    }

    /// Return the number of compiled states.
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Return the number of actions available from a state.
    pub fn num_actions(&self, key: StateKey) -> Option<usize> {
        self.states
            .get(key.index())
            .map(|state| state.actions.len())
    }

    /// Action ids of a state in declaration order.
    pub fn action_ids(&self, key: StateKey) -> Option<Vec<&str>> {
        self.states
            .get(key.index())
            .map(|state| state.actions.iter().map(|a| a.id.as_str()).collect())
    }

    /// Tags declared on a state.
    pub fn tags(&self, key: StateKey) -> Option<&[String]> {
        self.states
            .get(key.index())
            .map(|state| state.tags.as_slice())
    }

    /// Convert a state key back to its original string id.
    pub fn state_id(&self, key: StateKey) -> Option<&str> {
        self.state_ids.get(key.index()).map(String::as_str)
    }

    /// Convert a string id into a compiled state key.
    pub fn state_key(&self, id: &str) -> Option<StateKey> {
        self.state_id_to_key.get(id).copied()
    }

    pub fn affordance_count(&self) -> usize {
        self.affordances.len()
    }

    /// Affordances declared in the spec, ready to install on a planner.
    pub fn affordances(&self) -> AffordanceSet<StateKey, String> {
        self.affordances
            .iter()
            .fold(AffordanceSet::new(), |set, affordance| {
                let members = affordance.members.clone();
                set.with(
                    move |state: &StateKey| members.get(state.index()).copied().unwrap_or(false),
                    affordance.actions.clone(),
                )
            })
    }

    fn action(&self, state: StateKey, action: &str) -> Option<&ActionRec> {
        self.states
            .get(state.index())?
            .actions
            .iter()
            .find(|a| a.id == action)
    }
}

impl MdpModel for CompiledMdp {
    type State = StateKey;
    type Action = String;

    fn is_terminal(&self, state: &StateKey) -> bool {
        self.states
            .get(state.index())
            .is_some_and(|state| state.terminal)
    }

    fn applicable_actions(&self, state: &StateKey) -> Vec<String> {
        self.states
            .get(state.index())
            .map(|state| state.actions.iter().map(|a| a.id.clone()).collect())
            .unwrap_or_default()
    }

    /// Unknown state/action pairs yield no outcomes, which planners reject as zero mass.
    fn transitions(&self, state: &StateKey, action: &String) -> Vec<Transition<StateKey>> {
        self.action(*state, action)
            .map(|action| {
                action
                    .outcomes
                    .iter()
                    .map(|o| Transition::new(o.next, o.prob))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn reward(&self, state: &StateKey, action: &String, next: &StateKey) -> f64 {
        self.action(*state, action)
            .and_then(|action| action.outcomes.iter().find(|o| o.next == *next))
            .map_or(0.0, |o| o.reward)
    }
}
