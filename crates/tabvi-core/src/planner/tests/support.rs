use std::cell::Cell;

use crate::{IdentityHasher, MdpModel, PlannerConfig, Transition, ValueIteration};

struct Row {
    state: u32,
    action: &'static str,
    outcomes: Vec<(u32, f64)>,
    reward: f64,
}

/// Small explicit MDP over integer states for planner tests.
#[derive(Default)]
pub(super) struct TableMdp {
    terminal: Vec<u32>,
    rows: Vec<Row>,
    transition_calls: Cell<usize>,
}

impl TableMdp {
    pub(super) fn new() -> Self {
        Self::default()
    }

    pub(super) fn terminal(mut self, state: u32) -> Self {
        self.terminal.push(state);
        self
    }

    pub(super) fn edge(
        mut self,
        state: u32,
        action: &'static str,
        outcomes: &[(u32, f64)],
        reward: f64,
    ) -> Self {
        self.rows.push(Row {
            state,
            action,
            outcomes: outcomes.to_vec(),
            reward,
        });
        self
    }

    pub(super) fn transition_calls(&self) -> usize {
        self.transition_calls.get()
    }

    fn row(&self, state: u32, action: &str) -> Option<&Row> {
        self.rows
            .iter()
            .find(|row| row.state == state && row.action == action)
    }
}

impl MdpModel for TableMdp {
    type State = u32;
    type Action = &'static str;

    fn is_terminal(&self, state: &u32) -> bool {
        self.terminal.contains(state)
    }

    fn applicable_actions(&self, state: &u32) -> Vec<&'static str> {
        let mut actions = Vec::new();
        for row in self.rows.iter().filter(|row| row.state == *state) {
            if !actions.contains(&row.action) {
                actions.push(row.action);
            }
        }
        actions
    }

    fn transitions(&self, state: &u32, action: &&'static str) -> Vec<Transition<u32>> {
        self.transition_calls.set(self.transition_calls.get() + 1);
        self.row(*state, action)
            .map(|row| {
                row.outcomes
                    .iter()
                    .map(|(next, p)| Transition::new(*next, *p))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn reward(&self, state: &u32, action: &&'static str, _next: &u32) -> f64 {
        self.row(*state, action).map_or(0.0, |row| row.reward)
    }
}

/// `0 -> 1 -> 2`, one action `go` costing 1 per step, state 2 terminal.
pub(super) fn chain() -> TableMdp {
    TableMdp::new()
        .edge(0, "go", &[(1, 1.0)], -1.0)
        .edge(1, "go", &[(2, 1.0)], -1.0)
        .terminal(2)
}

pub(super) fn planner(mdp: TableMdp, gamma: f64) -> ValueIteration<TableMdp, IdentityHasher> {
    ValueIteration::new(mdp, IdentityHasher, PlannerConfig::new(gamma, 1e-9, 1000))
        .expect("test config should be valid")
}
