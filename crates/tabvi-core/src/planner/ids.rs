use serde::Serialize;

/// Dense index of a state in the transition cache.
/// Indices are handed out in discovery order and stay stable until the planner is reset.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct StateIndex(usize);

impl StateIndex {
    /// Return the underlying cache position.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl From<usize> for StateIndex {
    fn from(value: usize) -> Self {
        StateIndex(value)
    }
}

/// Position of an action inside one cached state's action list.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ActionId(usize);

impl ActionId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl From<usize> for ActionId {
    fn from(value: usize) -> Self {
        ActionId(value)
    }
}
