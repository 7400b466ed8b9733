use serde::Serialize;

use crate::hashing::StateHasher;
use crate::planner::{
    backup::BellmanBackup, model::MdpModel, value_iteration::PlannerStatus,
    value_iteration::ValueIteration,
};

#[derive(Debug, Clone, Serialize)]
pub struct PlannerSnapshot {
    pub schema_version: u32,
    pub status: PlannerStatus,
    pub state_count: usize,
    pub states: Vec<StateSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StateSnapshot {
    pub index: usize,
    pub key: String,
    pub is_terminal: bool,
    pub value: f64,
    pub actions: Vec<ActionSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActionSnapshot {
    pub action: String,
    pub q: f64,
    pub transitions: Vec<TransitionSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransitionSnapshot {
    pub next_index: usize,
    pub probability: f64,
    pub reward: f64,
}

impl PlannerSnapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl<M, H> ValueIteration<M, H>
where
    M: MdpModel,
    H: StateHasher<M::State>,
{
    /// Capture the transition cache and value table for inspection.
    pub fn snapshot(&self) -> PlannerSnapshot {
        let backup = BellmanBackup::new(self.config().gamma);
        let cache = self.cache();
        let values = self.values();

        let states = cache
            .iter()
            .enumerate()
            .map(|(index, entry)| StateSnapshot {
                index,
                key: format!("{:?}", entry.key()),
                is_terminal: entry.is_terminal(),
                value: if entry.is_terminal() {
                    0.0
                } else {
                    values.value(entry.key())
                },
                actions: entry
                    .actions()
                    .iter()
                    .map(|action| ActionSnapshot {
                        action: format!("{:?}", action.action()),
                        q: backup.q_value(action, cache, values),
                        transitions: action
                            .transitions()
                            .iter()
                            .map(|t| TransitionSnapshot {
                                next_index: t.next.index(),
                                probability: t.probability,
                                reward: t.reward,
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect::<Vec<_>>();

        PlannerSnapshot {
            schema_version: 1,
            status: self.status(),
            state_count: states.len(),
            states,
        }
    }
}
