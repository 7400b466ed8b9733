//! Canonical state keys.
//!
//! Tabular planners store values and transitions in hash maps, so every state must be turned
//! into a key whose equality matches the equality the planner should reason with. A hasher
//! decides that equality: two states the hasher maps to equal keys share one cache entry.

use std::{fmt, hash::Hash};

pub mod object;

/// Turns states into canonical keys.
///
/// Keys of semantically equal states must compare equal and hash identically. Keys of unequal
/// states may share a hash value, but must not compare equal.
pub trait StateHasher<S> {
    type Key: Clone + Eq + Hash + fmt::Debug;

    fn hash_state(&self, state: &S) -> Self::Key;

    /// Whether two keys denote the same state.
    fn equals(&self, a: &Self::Key, b: &Self::Key) -> bool {
        a == b
    }
}

/// Hasher for states that already have the right `Eq` and `Hash`; the key is the state itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityHasher;

impl<S> StateHasher<S> for IdentityHasher
where
    S: Clone + Eq + Hash + fmt::Debug,
{
    type Key = S;

    fn hash_state(&self, state: &S) -> S {
        state.clone()
    }
}

#[cfg(test)]
mod tests;
