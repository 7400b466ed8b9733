use std::{collections::HashMap, hash::Hash, slice::Iter};

use crate::planner::ids::{ActionId, StateIndex};

/// Expansion progress of a cached state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expansion {
    /// Discovered as a successor but not expanded yet.
    Pending,
    /// Actions and transitions are cached.
    Expanded,
    /// Terminal state; never expanded and always valued 0.
    Terminal,
}

/// A cached successor: where it leads, how likely it is and what it pays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CachedTransition {
    pub next: StateIndex,
    pub probability: f64,
    pub reward: f64,
}

/// All cached transitions for one action of one state.
#[derive(Debug, Clone)]
pub struct ActionTransitions<A> {
    action: A,
    transitions: Vec<CachedTransition>,
}

impl<A> ActionTransitions<A> {
    pub fn new(action: A, transitions: Vec<CachedTransition>) -> Self {
        ActionTransitions {
            action,
            transitions,
        }
    }

    pub fn action(&self) -> &A {
        &self.action
    }

    pub fn transitions(&self) -> &[CachedTransition] {
        &self.transitions
    }
}

/// One state in the transition cache.
#[derive(Debug, Clone)]
pub struct CacheEntry<K, A> {
    key: K,
    expansion: Expansion,
    actions: Vec<ActionTransitions<A>>,
}

impl<K, A> CacheEntry<K, A> {
    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn expansion(&self) -> Expansion {
        self.expansion
    }

    pub fn is_terminal(&self) -> bool {
        self.expansion == Expansion::Terminal
    }

    pub fn is_expanded(&self) -> bool {
        self.expansion != Expansion::Pending
    }

    pub fn actions(&self) -> &[ActionTransitions<A>] {
        &self.actions
    }

    pub fn action(&self, action_id: ActionId) -> Option<&ActionTransitions<A>> {
        self.actions.get(action_id.index())
    }
}

/// Memoized transition dynamics of every discovered state.
///
/// Entries live in a dense vector addressed by `StateIndex`; a key map interns hashed
/// state keys to their index, so successors are stored as indices rather than keys.
#[derive(Debug, Clone)]
pub struct TransitionCache<K, A> {
    entries: Vec<CacheEntry<K, A>>,
    index: HashMap<K, StateIndex>,
}

impl<K, A> Default for TransitionCache<K, A> {
    fn default() -> Self {
        TransitionCache {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<K, A> TransitionCache<K, A>
where
    K: Clone + Eq + Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the index for `key`, registering it as pending if it is new.
    /// The flag is `true` when the key was inserted by this call.
    pub(crate) fn intern(&mut self, key: K) -> (StateIndex, bool) {
        if let Some(index) = self.index.get(&key) {
            return (*index, false);
        }

        let index = StateIndex::from(self.entries.len());
        self.entries.push(CacheEntry {
            key: key.clone(),
            expansion: Expansion::Pending,
            actions: Vec::new(),
        });
        self.index.insert(key, index);
        (index, true)
    }

    /// Store the expansion of a pending state.
    pub(crate) fn expand(&mut self, index: StateIndex, actions: Vec<ActionTransitions<A>>) {
        if let Some(entry) = self.entries.get_mut(index.index()) {
            entry.actions = actions;
            entry.expansion = Expansion::Expanded;
        }
    }

    pub(crate) fn mark_terminal(&mut self, index: StateIndex) {
        if let Some(entry) = self.entries.get_mut(index.index()) {
            entry.actions.clear();
            entry.expansion = Expansion::Terminal;
        }
    }

    /// Drop every entry at or after `len`, undoing a partial exploration.
    pub(crate) fn truncate(&mut self, len: usize) {
        for entry in self.entries.drain(len.min(self.entries.len())..) {
            self.index.remove(&entry.key);
        }
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    pub fn index_of(&self, key: &K) -> Option<StateIndex> {
        self.index.get(key).copied()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Whether `key` has been fully processed (expanded or marked terminal).
    pub fn is_expanded(&self, key: &K) -> bool {
        self.index_of(key)
            .and_then(|index| self.get(index))
            .is_some_and(CacheEntry::is_expanded)
    }

    pub fn get(&self, index: StateIndex) -> Option<&CacheEntry<K, A>> {
        self.entries.get(index.index())
    }

    pub fn entry(&self, key: &K) -> Option<&CacheEntry<K, A>> {
        self.index_of(key).and_then(|index| self.get(index))
    }

    pub fn key(&self, index: StateIndex) -> Option<&K> {
        self.get(index).map(CacheEntry::key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, CacheEntry<K, A>> {
        self.entries.iter()
    }
}

impl<'a, K, A> IntoIterator for &'a TransitionCache<K, A> {
    type Item = &'a CacheEntry<K, A>;
    type IntoIter = Iter<'a, CacheEntry<K, A>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
