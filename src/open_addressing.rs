use std::{fmt, mem};

use log::{debug, trace};

use crate::{
    hashing::KeyHasher,
    prime::{next_prime, prime_at_least},
};

/// Load factor at which the next `put` doubles the table first
pub const MAX_LOAD_FACTOR: f64 = 0.5;

/// A live key-value pair
#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry<V> {
    /// The key
    key: String,
    /// The value associated with the key
    value: V,
}

/// State of a single slot in the bucket store
#[derive(Debug, Clone, PartialEq, Eq)]
enum Slot<V> {
    /// Never written since the last rebuild or clear; terminates every probe sequence
    Empty,
    /// Held an entry that was removed; probes continue past it, inserts may reuse it
    Tombstone,
    /// Holds a live entry
    Occupied(Entry<V>),
}

/// Where a `put` should write
#[derive(Debug, Clone, Copy)]
enum Placement {
    /// The key is live at this index
    Existing(usize),
    /// The key is absent; this empty or tombstoned index receives it
    Vacant(usize),
}

/// A string-keyed hash map with quadratic-probing open addressing.
///
/// The capacity is always prime. A `put` that finds the table at a load factor of
/// [`MAX_LOAD_FACTOR`] or more first resizes to the next prime at or above twice the capacity.
/// Removal leaves a tombstone behind so that probe sequences running through the slot stay
/// intact; tombstones are only dropped when the table is rebuilt or cleared.
///
/// Note: This implementation is not thread-safe.
#[derive(Debug, Clone)]
pub struct OpenAddressingMap<V, H> {
    /// The bucket store; its length is the capacity
    slots: Vec<Slot<V>>,
    /// Number of live entries
    size: usize,
    /// Hash strategy
    hasher: H,
}

impl<V, H> OpenAddressingMap<V, H>
where
    H: KeyHasher,
{
    /// Creates an empty map with `next_prime(capacity)` slots.
    #[must_use]
    pub fn new(capacity: usize, hasher: H) -> Self {
        Self { slots: empty_slots(next_prime(capacity)), size: 0, hasher }
    }

    /// Creates an empty map using the hasher's default value.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self
    where
        H: Default,
    {
        Self::new(capacity, H::default())
    }

    /// Slot visited at step `probe` of the quadratic sequence for `hash`
    #[allow(clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]
    fn probe_index(&self, hash: u64, probe: usize) -> usize {
        let capacity = self.slots.len().max(1) as u128;
        let probe = probe as u128;
        // Bounded by the capacity, which came from a usize.
        ((u128::from(hash) + probe * probe) % capacity) as usize
    }

    /// Index of the live entry for `key`, skipping over tombstones
    fn find(&self, key: &str) -> Option<usize> {
        let hash = self.hasher.hash_key(key);
        for probe in 0..self.slots.len() {
            let index = self.probe_index(hash, probe);
            match self.slots.get(index)? {
                Slot::Empty => return None,
                Slot::Occupied(entry) if entry.key == key => return Some(index),
                Slot::Occupied(_) | Slot::Tombstone => {}
            }
        }
        None
    }

    /// Finds where `key` lives or should be written.
    ///
    /// Probing continues past tombstones until the key or an empty slot shows up; a missing
    /// key is then written into the first tombstone seen, else into the empty slot.
    fn locate(&self, key: &str) -> Option<Placement> {
        let hash = self.hasher.hash_key(key);
        let mut first_tombstone = None;

        for probe in 0..self.slots.len() {
            let index = self.probe_index(hash, probe);
            match self.slots.get(index)? {
                Slot::Empty => return Some(Placement::Vacant(first_tombstone.unwrap_or(index))),
                Slot::Occupied(entry) if entry.key == key => {
                    return Some(Placement::Existing(index));
                }
                Slot::Tombstone if first_tombstone.is_none() => first_tombstone = Some(index),
                Slot::Tombstone | Slot::Occupied(_) => {}
            }
        }

        first_tombstone.map(Placement::Vacant)
    }

    /// Inserts or updates `key`, returning the value it replaced.
    pub fn put(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        if self.table_load() >= MAX_LOAD_FACTOR {
            self.resize_table(self.capacity().saturating_mul(2));
        }

        let Some(placement) = self.locate(&key) else {
            // Every reachable slot is live; cannot happen while the load stays below one half.
            trace!("probe sequence exhausted at capacity {}, growing", self.capacity());
            self.resize_table(self.capacity().saturating_mul(2));
            return self.put(key, value);
        };

        match placement {
            Placement::Existing(index) => match self.slots.get_mut(index) {
                Some(Slot::Occupied(entry)) => Some(mem::replace(&mut entry.value, value)),
                _ => None,
            },
            Placement::Vacant(index) => {
                if let Some(slot) = self.slots.get_mut(index) {
                    *slot = Slot::Occupied(Entry { key, value });
                    self.size = self.size.saturating_add(1);
                }
                None
            }
        }
    }

    /// Returns the value stored for `key`.
    pub fn get(&self, key: &str) -> Option<&V> {
        match self.slots.get(self.find(key)?)? {
            Slot::Occupied(entry) => Some(&entry.value),
            Slot::Empty | Slot::Tombstone => None,
        }
    }

    /// Returns a mutable reference to the value stored for `key`.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let index = self.find(key)?;
        match self.slots.get_mut(index)? {
            Slot::Occupied(entry) => Some(&mut entry.value),
            Slot::Empty | Slot::Tombstone => None,
        }
    }

    /// Returns true if `key` has a live entry.
    pub fn contains_key(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Tombstones the entry for `key` and returns its value. Absent keys are a no-op.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let index = self.find(key)?;
        let slot = self.slots.get_mut(index)?;
        match mem::replace(slot, Slot::Tombstone) {
            Slot::Occupied(entry) => {
                self.size = self.size.saturating_sub(1);
                Some(entry.value)
            }
            other => {
                *slot = other;
                None
            }
        }
    }

    /// Rebuilds the table with `new_capacity` slots (advanced to a prime) and rehashes every
    /// live entry into it.
    ///
    /// A target below the number of live entries is ignored. Entries are re-inserted through
    /// [`put`](Self::put), so a target that leaves the new table at half load or more grows it
    /// again while rehashing.
    pub fn resize_table(&mut self, new_capacity: usize) {
        if new_capacity < self.size {
            trace!("refusing to resize to {new_capacity}: {} live entries", self.size);
            return;
        }

        let new_capacity = prime_at_least(new_capacity);
        debug!(
            "resizing open addressing table {} -> {new_capacity} ({} live entries)",
            self.capacity(),
            self.size
        );

        let old_slots = mem::replace(&mut self.slots, empty_slots(new_capacity));
        self.size = 0;
        for slot in old_slots {
            if let Slot::Occupied(Entry { key, value }) = slot {
                self.put(key, value);
            }
        }
    }

    /// Returns `len / capacity`.
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    pub fn table_load(&self) -> f64 {
        self.size as f64 / self.capacity() as f64
    }

    /// Returns `capacity - len`.
    ///
    /// Tombstoned slots count as empty here since they hold no live value.
    #[must_use]
    pub fn empty_buckets(&self) -> usize {
        self.capacity().saturating_sub(self.size)
    }

    /// Returns the number of live entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns true if the map holds no live entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the number of slots
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Live key-value pairs in ascending slot order
    #[must_use]
    pub fn keys_and_values(&self) -> Vec<(&str, &V)> {
        self.iter().collect()
    }

    /// Empties every slot, tombstones included. The capacity is unchanged.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = Slot::Empty;
        }
        self.size = 0;
    }

    /// Returns an iterator over live entries in ascending slot order
    #[must_use]
    pub fn iter(&self) -> Iter<'_, V> {
        Iter { slots: &self.slots, index: 0 }
    }
}

/// A fresh bucket store
fn empty_slots<V>(capacity: usize) -> Vec<Slot<V>> {
    let mut slots = Vec::with_capacity(capacity);
    slots.resize_with(capacity, || Slot::Empty);
    slots
}

impl<V, H, K> Extend<(K, V)> for OpenAddressingMap<V, H>
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

impl<V, H, K> FromIterator<(K, V)> for OpenAddressingMap<V, H>
where
    H: KeyHasher + Default,
    K: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::with_capacity(0);
        map.extend(iter);
        map
    }
}

impl<V, H> fmt::Display for OpenAddressingMap<V, H>
where
    V: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, slot) in self.slots.iter().enumerate() {
            match slot {
                Slot::Empty => writeln!(f, "{index}: None")?,
                Slot::Tombstone => writeln!(f, "{index}: Tombstone")?,
                Slot::Occupied(entry) => writeln!(f, "{index}: K: {} V: {}", entry.key, entry.value)?,
            }
        }
        Ok(())
    }
}

/// Forward, single-pass iterator over the live entries of an [`OpenAddressingMap`]
#[derive(Debug, Clone)]
pub struct Iter<'a, V> {
    /// The map's bucket store
    slots: &'a [Slot<V>],
    /// Next slot to inspect
    index: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        // Running off the end of the store is the normal end of iteration.
        loop {
            let slot = self.slots.get(self.index)?;
            self.index = self.index.saturating_add(1);
            if let Slot::Occupied(entry) = slot {
                return Some((entry.key.as_str(), &entry.value));
            }
        }
    }
}

impl<'a, V, H> IntoIterator for &'a OpenAddressingMap<V, H>
where
    H: KeyHasher,
{
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        hashing::{ByteSumHasher, SipKeyHasher, WeightedByteSumHasher},
        prime::is_prime,
    };
    use proptest::prelude::*;
    use std::collections::HashMap;

    #[test]
    fn test_put_and_get() {
        let mut map = OpenAddressingMap::new(11, ByteSumHasher);
        assert_eq!(map.put("key1", 1), None);
        assert_eq!(map.put("key2", 2), None);
        assert_eq!(map.put("key3", 3), None);

        assert_eq!(map.get("key1"), Some(&1));
        assert_eq!(map.get("key2"), Some(&2));
        assert_eq!(map.get("key3"), Some(&3));
        assert_eq!(map.get("key4"), None);
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_update_keeps_size() {
        let mut map = OpenAddressingMap::new(101, ByteSumHasher);
        map.put("key1", 10);
        map.put("key2", 20);
        assert_eq!(map.put("key1", 30), Some(10));

        assert_eq!(map.get("key1"), Some(&30));
        assert_eq!(map.len(), 2);
        assert!((map.table_load() - 2.0 / 101.0).abs() < f64::EPSILON);
        assert_eq!(map.empty_buckets(), 99);
    }

    #[test]
    fn test_resize_scenario() {
        let mut map = OpenAddressingMap::new(20, ByteSumHasher);
        map.put("key1", 10);
        assert_eq!(map.len(), 1);
        assert_eq!(map.capacity(), 23);
        assert_eq!(map.get("key1"), Some(&10));
        assert!(map.contains_key("key1"));

        map.resize_table(30);
        assert_eq!(map.len(), 1);
        assert_eq!(map.capacity(), 31);
        assert_eq!(map.get("key1"), Some(&10));
        assert!(map.contains_key("key1"));
    }

    #[test]
    fn test_resize_below_size_is_refused() {
        let mut map = OpenAddressingMap::new(53, SipKeyHasher);
        for i in 0..10 {
            map.put(format!("key{i}"), i);
        }
        map.resize_table(9);
        assert_eq!(map.capacity(), 53);
        assert_eq!(map.len(), 10);
    }

    #[test]
    fn test_growth_sequence() {
        // 53 -> 107 -> 223 -> 449, independent of the hash function
        let mut map = OpenAddressingMap::new(53, ByteSumHasher);
        for i in 0..150 {
            map.put(format!("str{i}"), i * 100);
        }
        assert_eq!(map.len(), 150);
        assert_eq!(map.capacity(), 449);
        assert_eq!(map.empty_buckets(), 299);
        for i in 0..150 {
            assert_eq!(map.get(&format!("str{i}")), Some(&(i * 100)));
        }
    }

    #[test]
    fn test_repeated_keys() {
        let mut map = OpenAddressingMap::new(41, WeightedByteSumHasher);
        for i in 0..50 {
            map.put(format!("str{}", i / 3), i * 100);
        }
        assert_eq!(map.len(), 17);
        assert_eq!(map.capacity(), 41);
        assert_eq!(map.get("str16"), Some(&4900));
        assert_eq!(map.get("str0"), Some(&200));
    }

    #[test]
    fn test_remove_leaves_tombstone() {
        let mut map = OpenAddressingMap::new(11, ByteSumHasher);
        map.put("key1", 1);
        assert_eq!(map.remove("key1"), Some(1));
        assert_eq!(map.remove("key1"), None);
        assert!(!map.contains_key("key1"));
        assert_eq!(map.get("key1"), None);
        assert_eq!(map.len(), 0);
        assert_eq!(map.empty_buckets(), 11);
        assert!(map.to_string().contains("Tombstone"));
    }

    #[test]
    fn test_probe_continues_past_tombstone() {
        // Anagrams share a home slot under the byte sum.
        let mut map = OpenAddressingMap::new(11, ByteSumHasher);
        map.put("ab", 1);
        map.put("ba", 2);
        map.put("aab", 3);
        map.put("aba", 4);

        map.remove("ab");
        assert_eq!(map.get("ba"), Some(&2));
        map.remove("aab");
        assert_eq!(map.get("aba"), Some(&4));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_reinsert_after_tombstone_does_not_duplicate() {
        let mut map = OpenAddressingMap::new(11, ByteSumHasher);
        map.put("ab", 1);
        map.put("ba", 2);
        map.remove("ab");

        // "ba" lives past the tombstone; updating it must not land in the tombstone.
        assert_eq!(map.put("ba", 3), Some(2));
        assert_eq!(map.len(), 1);
        assert_eq!(map.remove("ba"), Some(3));
        assert!(!map.contains_key("ba"));
        assert!(map.is_empty());

        // A genuinely new key reuses the first tombstone.
        map.put("ab", 5);
        assert_eq!(map.keys_and_values(), vec![("ab", &5)]);
    }

    #[test]
    fn test_constant_hash_still_terminates() {
        let mut map = OpenAddressingMap::new(7, |_: &str| 0u64);
        for i in 0..20 {
            map.put(i.to_string(), i);
        }
        for i in 0..20 {
            assert_eq!(map.get(&i.to_string()), Some(&i));
        }
        assert!(!map.contains_key("missing"));
        assert_eq!(map.len(), 20);
    }

    #[test]
    fn test_clear_keeps_capacity() {
        let mut map = OpenAddressingMap::new(11, ByteSumHasher);
        map.put("key1", 1);
        map.put("key2", 2);
        map.remove("key2");
        map.clear();

        assert!(map.is_empty());
        assert_eq!(map.capacity(), 11);
        assert_eq!(map.get("key1"), None);
        assert!(!map.to_string().contains("Tombstone"));
    }

    #[test]
    fn test_iteration_skips_dead_slots() {
        let mut map = OpenAddressingMap::new(11, ByteSumHasher);
        // Byte sums 49, 50, 51 -> slots 5, 6, 7
        map.put("1", 10);
        map.put("2", 20);
        map.put("3", 30);
        map.remove("2");

        let collected: Vec<(&str, &i32)> = map.iter().collect();
        assert_eq!(collected, vec![("1", &10), ("3", &30)]);
        assert_eq!(map.keys_and_values(), collected);

        let mut iter = map.iter();
        assert!(iter.next().is_some());
        assert!(iter.next().is_some());
        assert!(iter.next().is_none());
        assert!(iter.next().is_none());

        let mut sum = 0;
        for (_, value) in &map {
            sum += value;
        }
        assert_eq!(sum, 40);
    }

    #[test]
    fn test_get_mut() {
        let mut map = OpenAddressingMap::new(11, SipKeyHasher);
        map.put("key1", 1);
        if let Some(value) = map.get_mut("key1") {
            *value += 10;
        }
        assert_eq!(map.get("key1"), Some(&11));
    }

    #[test]
    fn test_from_iter_and_display() {
        let map: OpenAddressingMap<i32, ByteSumHasher> =
            [("1", 10), ("2", 20)].into_iter().collect();
        // 0 -> 3 slots; byte sums 49 and 50 land in slots 1 and 2
        assert_eq!(map.capacity(), 3);
        assert_eq!(map.to_string(), "0: None\n1: K: 1 V: 10\n2: K: 2 V: 20\n");
    }

    proptest! {
        #[test]
        fn size_tracks_distinct_keys(keys in prop::collection::vec("[a-z]{1,6}", 0..200)) {
            let mut map = OpenAddressingMap::new(5, ByteSumHasher);
            let mut model = HashMap::new();
            for (i, key) in keys.iter().enumerate() {
                map.put(key.as_str(), i);
                model.insert(key.clone(), i);

                prop_assert!(is_prime(map.capacity()));
                // Checked before the insert, so the post-insert bound carries one extra entry.
                let pre_insert = (map.len() as f64 - 1.0) / map.capacity() as f64;
                prop_assert!(pre_insert < MAX_LOAD_FACTOR);
            }
            prop_assert_eq!(map.len(), model.len());
            for (key, value) in &model {
                prop_assert_eq!(map.get(key), Some(value));
            }
        }

        #[test]
        fn remove_matches_model(
            keys in prop::collection::vec("[a-c]{1,3}", 0..100),
            removals in prop::collection::vec("[a-c]{1,3}", 0..100),
        ) {
            let mut map = OpenAddressingMap::new(3, ByteSumHasher);
            let mut model = HashMap::new();
            for key in &keys {
                map.put(key.as_str(), key.len());
                model.insert(key.clone(), key.len());
            }
            for key in &removals {
                prop_assert_eq!(map.remove(key), model.remove(key));
                prop_assert!(!map.contains_key(key));
            }
            prop_assert_eq!(map.len(), model.len());
            prop_assert_eq!(map.iter().count(), model.len());
            prop_assert!(
                (map.table_load() - map.len() as f64 / map.capacity() as f64).abs() < f64::EPSILON
            );
            prop_assert_eq!(map.empty_buckets() + map.len(), map.capacity());
        }

        #[test]
        fn accepted_resize_preserves_entries(
            keys in prop::collection::hash_set("[a-z0-9]{1,8}", 0..60),
            target in 0usize..400,
        ) {
            let mut map = OpenAddressingMap::new(11, SipKeyHasher);
            for key in &keys {
                map.put(key.as_str(), key.clone());
            }
            let before = map.capacity();
            map.resize_table(target);

            if target < keys.len() {
                prop_assert_eq!(map.capacity(), before);
            } else if target >= 2 * keys.len() + 1 {
                prop_assert_eq!(map.capacity(), prime_at_least(target));
            }
            prop_assert!(is_prime(map.capacity()));
            prop_assert_eq!(map.len(), keys.len());
            for key in &keys {
                prop_assert_eq!(map.get(key), Some(key));
            }
        }
    }
}
