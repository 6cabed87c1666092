//! Utility functions and traits shared by both map implementations

use crate::{ChainedHashMap, OpenAddressingMap, hashing::KeyHasher};

/// Extension trait for map implementations that provides additional utility methods
pub trait HashMapExtensions<V> {
    /// Returns the keys of the hash map as a Vec, in iteration order
    fn keys(&self) -> Vec<String>;

    /// Returns the values of the hash map as a Vec, in iteration order
    fn values(&self) -> Vec<V>;
}

impl<V, H> HashMapExtensions<V> for OpenAddressingMap<V, H>
where
    V: Clone,
    H: KeyHasher,
{
    fn keys(&self) -> Vec<String> {
        self.iter().map(|(k, _)| k.to_string()).collect()
    }

    fn values(&self) -> Vec<V> {
        self.iter().map(|(_, v)| v.clone()).collect()
    }
}

impl<V, H> HashMapExtensions<V> for ChainedHashMap<V, H>
where
    V: Clone,
    H: KeyHasher,
{
    fn keys(&self) -> Vec<String> {
        self.iter().map(|(k, _)| k.to_string()).collect()
    }

    fn values(&self) -> Vec<V> {
        self.iter().map(|(_, v)| v.clone()).collect()
    }
}

/// Creates an `OpenAddressingMap` with the given capacity and hasher from key-value pairs
pub fn from_pairs<K, V, H, I>(capacity: usize, hasher: H, pairs: I) -> OpenAddressingMap<V, H>
where
    K: Into<String>,
    H: KeyHasher,
    I: IntoIterator<Item = (K, V)>,
{
    let mut map = OpenAddressingMap::new(capacity, hasher);
    map.extend(pairs);
    map
}
