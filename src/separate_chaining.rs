use std::{fmt, mem};

use log::{debug, trace};

use crate::{
    chain::{self, Chain},
    hashing::{ByteSumHasher, KeyHasher},
    prime::{next_prime, prime_at_least},
};

/// Load factor at which the next `put` doubles the table first
pub const MAX_LOAD_FACTOR: f64 = 1.0;

/// Bucket count used by [`ChainedHashMap::default`]
pub const DEFAULT_CAPACITY: usize = 11;

/// A string-keyed hash map resolving collisions by separate chaining.
///
/// Every bucket owns a [`Chain`] holding the entries that hash to it; removal unlinks the entry,
/// so there are no tombstones. The capacity is always prime, and a `put` that finds the load
/// factor at [`MAX_LOAD_FACTOR`] or more first resizes to the next prime at or above twice the
/// capacity.
#[derive(Debug, Clone)]
pub struct ChainedHashMap<V, H = ByteSumHasher> {
    /// The bucket store; its length is the capacity
    buckets: Vec<Chain<V>>,
    /// Number of entries
    size: usize,
    /// Hash strategy
    hasher: H,
}

impl<V> Default for ChainedHashMap<V, ByteSumHasher> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, ByteSumHasher)
    }
}

impl<V, H> ChainedHashMap<V, H>
where
    H: KeyHasher,
{
    /// Creates an empty map with `next_prime(capacity)` buckets.
    #[must_use]
    pub fn new(capacity: usize, hasher: H) -> Self {
        Self { buckets: fresh_buckets(next_prime(capacity)), size: 0, hasher }
    }

    /// Creates an empty map using the hasher's default value.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self
    where
        H: Default,
    {
        Self::new(capacity, H::default())
    }

    /// Bucket index for `key`
    #[allow(clippy::cast_possible_truncation)]
    fn bucket_index(&self, key: &str) -> usize {
        let capacity = self.buckets.len().max(1) as u64;
        // Less than the capacity, which came from a usize.
        (self.hasher.hash_key(key) % capacity) as usize
    }

    /// Inserts or updates `key`, returning the value it replaced.
    ///
    /// An update unlinks the old entry and appends the new one, so the key moves to the end of
    /// its bucket.
    pub fn put(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        if self.table_load() >= MAX_LOAD_FACTOR {
            self.resize_table(self.capacity().saturating_mul(2));
        }

        let index = self.bucket_index(&key);
        let bucket = self.buckets.get_mut(index)?;
        let previous = bucket.remove(&key);
        bucket.push_back(key, value);
        if previous.is_none() {
            self.size = self.size.saturating_add(1);
        }
        previous
    }

    /// Returns the value stored for `key`.
    pub fn get(&self, key: &str) -> Option<&V> {
        self.buckets.get(self.bucket_index(key))?.get(key)
    }

    /// Returns a mutable reference to the value stored for `key`.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let index = self.bucket_index(key);
        self.buckets.get_mut(index)?.get_mut(key)
    }

    /// Returns true if `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.buckets.get(self.bucket_index(key)).is_some_and(|bucket| bucket.contains(key))
    }

    /// Unlinks the entry for `key` and returns its value. Absent keys are a no-op.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let index = self.bucket_index(key);
        let removed = self.buckets.get_mut(index)?.remove(key)?;
        self.size = self.size.saturating_sub(1);
        Some(removed)
    }

    /// Rebuilds the table with `new_capacity` buckets (advanced to a prime) and rehashes every
    /// entry into it.
    ///
    /// A target of zero is ignored. Entries are drained in bucket order and re-inserted through
    /// [`put`](Self::put), so a target smaller than the entry count grows again while rehashing.
    pub fn resize_table(&mut self, new_capacity: usize) {
        if new_capacity < 1 {
            trace!("refusing to resize chained table to {new_capacity}");
            return;
        }

        let new_capacity = prime_at_least(new_capacity);
        debug!(
            "resizing chained table {} -> {new_capacity} ({} entries)",
            self.capacity(),
            self.size
        );

        let held: Vec<(String, V)> = mem::replace(&mut self.buckets, fresh_buckets(new_capacity))
            .into_iter()
            .flatten()
            .collect();
        self.size = 0;
        for (key, value) in held {
            self.put(key, value);
        }
    }

    /// Returns `len / capacity`.
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    pub fn table_load(&self) -> f64 {
        self.size as f64 / self.capacity() as f64
    }

    /// Number of buckets whose chain is empty
    #[must_use]
    pub fn empty_buckets(&self) -> usize {
        self.buckets.iter().filter(|bucket| bucket.is_empty()).count()
    }

    /// Returns the number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns true if the map is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the number of buckets
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Key-value pairs in bucket order, then chain order within each bucket
    #[must_use]
    pub fn keys_and_values(&self) -> Vec<(&str, &V)> {
        self.iter().collect()
    }

    /// Replaces every chain with an empty one. The capacity is unchanged.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            *bucket = Chain::new();
        }
        self.size = 0;
    }

    /// Returns an iterator over the entries in bucket order
    #[must_use]
    pub fn iter(&self) -> Iter<'_, V> {
        Iter { buckets: self.buckets.iter(), current: None }
    }
}

/// A fresh bucket store
fn fresh_buckets<V>(capacity: usize) -> Vec<Chain<V>> {
    let mut buckets = Vec::with_capacity(capacity);
    buckets.resize_with(capacity, Chain::new);
    buckets
}

impl<V, H, K> Extend<(K, V)> for ChainedHashMap<V, H>
where
    H: KeyHasher,
    K: Into<String>,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<V, H, K> FromIterator<(K, V)> for ChainedHashMap<V, H>
where
    H: KeyHasher + Default,
    K: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::with_capacity(DEFAULT_CAPACITY);
        map.extend(iter);
        map
    }
}

impl<V, H> fmt::Display for ChainedHashMap<V, H>
where
    V: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, bucket) in self.buckets.iter().enumerate() {
            writeln!(f, "{index}: {bucket}")?;
        }
        Ok(())
    }
}

/// Iterator over the entries of a [`ChainedHashMap`]
#[derive(Debug, Clone)]
pub struct Iter<'a, V> {
    /// Buckets not yet visited
    buckets: std::slice::Iter<'a, Chain<V>>,
    /// Position inside the bucket being walked
    current: Option<chain::Iter<'a, V>>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.current.as_mut().and_then(Iterator::next) {
                return Some(entry);
            }
            self.current = Some(self.buckets.next()?.iter());
        }
    }
}

impl<'a, V, H> IntoIterator for &'a ChainedHashMap<V, H>
where
    H: KeyHasher,
{
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
