use std::{collections::HashMap, hash::Hash};

/// State values keyed by hashed state key.
///
/// Keys that were never written read as `default_value`; terminal keys are pinned to 0.
#[derive(Debug, Clone)]
pub struct ValueTable<K> {
    values: HashMap<K, f64>,
    default_value: f64,
}

impl<K> ValueTable<K>
where
    K: Eq + Hash,
{
    pub fn new(default_value: f64) -> Self {
        ValueTable {
            values: HashMap::new(),
            default_value,
        }
    }

    pub fn default_value(&self) -> f64 {
        self.default_value
    }

    /// Value of `key`, or the default when it has never been written.
    pub fn value(&self, key: &K) -> f64 {
        self.values.get(key).copied().unwrap_or(self.default_value)
    }

    /// Return whether the table has an explicit entry for `key`.
    pub fn contains(&self, key: &K) -> bool {
        self.values.contains_key(key)
    }

    /// Overwrite the value for `key` and return the previous reading.
    pub(crate) fn set(&mut self, key: K, value: f64) -> f64 {
        self.values.insert(key, value).unwrap_or(self.default_value)
    }

    /// Write the value for `key` in place, cloning the key only on its first write.
    /// Returns the previous reading.
    pub(crate) fn update(&mut self, key: &K, value: f64) -> f64
    where
        K: Clone,
    {
        match self.values.get_mut(key) {
            Some(slot) => std::mem::replace(slot, value),
            None => {
                self.values.insert(key.clone(), value);
                self.default_value
            }
        }
    }

    pub(crate) fn remove(&mut self, key: &K) {
        self.values.remove(key);
    }

    pub(crate) fn clear(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
