//! Most frequent values of a sequence, counted with a [`ChainedHashMap`].

use crate::{hashing::ByteSumHasher, separate_chaining::ChainedHashMap};

/// Result of [`find_mode`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mode<T> {
    /// Values that reached the highest frequency, in the order they reached it
    pub values: Vec<T>,
    /// The highest frequency
    pub frequency: usize,
}

/// Finds the most frequent values of `items`.
///
/// Counts are keyed by each item's string form. Items are scanned once: an item whose count
/// overtakes the running maximum resets the result to just that item, and an item whose count
/// ties the maximum is appended. A value is therefore listed again if it was reset out and
/// later climbs back to the maximum.
///
/// ```rust
/// use primehash::find_mode;
///
/// let mode = find_mode(&["apple", "apple", "grape", "melon", "peach"]);
/// assert_eq!(mode.values, vec!["apple"]);
/// assert_eq!(mode.frequency, 2);
/// ```
#[must_use]
pub fn find_mode<T>(items: &[T]) -> Mode<T>
where
    T: ToString + Clone,
{
    let mut counts: ChainedHashMap<usize, ByteSumHasher> = ChainedHashMap::with_capacity(items.len());
    let mut mode = Mode { values: Vec::new(), frequency: 0 };

    for item in items {
        let key = item.to_string();
        let count = counts.get(&key).copied().unwrap_or(0).saturating_add(1);
        counts.put(key, count);

        if count > mode.frequency {
            mode.frequency = count;
            mode.values.clear();
            mode.values.push(item.clone());
        } else if count == mode.frequency {
            mode.values.push(item.clone());
        }
    }

    mode
}
