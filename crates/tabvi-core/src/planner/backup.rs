use std::hash::Hash;

use crate::planner::{
    cache::{ActionTransitions, CacheEntry, TransitionCache},
    values::ValueTable,
};

/// Bellman optimality backup over cached transitions.
///
/// `Q(s, a) = sum_{s'} p(s' | s, a) * (r(s, a, s') + gamma * V(s'))` and `V(s) = max_a Q(s, a)`.
#[derive(Debug, Clone, Copy)]
pub struct BellmanBackup {
    gamma: f64,
}

impl BellmanBackup {
    pub fn new(gamma: f64) -> Self {
        BellmanBackup { gamma }
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Expected return of one cached action under the current value table.
    pub fn q_value<K, A>(
        &self,
        action: &ActionTransitions<A>,
        cache: &TransitionCache<K, A>,
        values: &ValueTable<K>,
    ) -> f64
    where
        K: Clone + Eq + Hash,
    {
        action
            .transitions()
            .iter()
            .map(|t| {
                let next_value = match cache.get(t.next) {
                    Some(next) if next.is_terminal() => 0.0,
                    Some(next) => values.value(next.key()),
                    None => values.default_value(),
                };
                t.probability * (t.reward + self.gamma * next_value)
            })
            .sum()
    }

    /// Best Q-value over the cached actions of `entry`.
    /// Returns `None` for terminal entries and states without actions.
    pub fn max_q<K, A>(
        &self,
        entry: &CacheEntry<K, A>,
        cache: &TransitionCache<K, A>,
        values: &ValueTable<K>,
    ) -> Option<f64>
    where
        K: Clone + Eq + Hash,
    {
        if entry.is_terminal() {
            return None;
        }

        entry
            .actions()
            .iter()
            .map(|action| self.q_value(action, cache, values))
            .fold(None, |best: Option<f64>, q| match best {
                Some(b) if b >= q => Some(b),
                _ => Some(q),
            })
    }
}
