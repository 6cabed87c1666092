//! Singly linked list of key-value pairs, one per bucket of a
//! [`ChainedHashMap`](crate::ChainedHashMap).

use std::fmt;

/// A node in the chain
#[derive(Debug, Clone)]
struct Node<V> {
    /// The key in the key-value pair
    key: String,
    /// The value associated with the key
    value: V,
    /// The following node
    next: Link<V>,
}

/// Owning pointer to the rest of the chain
type Link<V> = Option<Box<Node<V>>>;

/// A singly linked list of entries.
///
/// New entries go to the tail, so forward traversal yields insertion order.
#[derive(Debug, Clone)]
pub struct Chain<V> {
    /// First node, if any
    head: Link<V>,
    /// Number of nodes
    len: usize,
}

impl<V> Default for Chain<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Chain<V> {
    /// Creates an empty chain
    #[must_use]
    pub const fn new() -> Self {
        Self { head: None, len: 0 }
    }

    /// Appends an entry at the tail without looking for an existing key.
    pub fn push_back(&mut self, key: String, value: V) {
        let mut cursor = &mut self.head;
        while let Some(node) = cursor {
            cursor = &mut node.next;
        }
        *cursor = Some(Box::new(Node { key, value, next: None }));
        self.len = self.len.saturating_add(1);
    }

    /// Unlinks the first entry for `key` and returns its value.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let mut cursor = &mut self.head;
        while cursor.as_ref().is_some_and(|node| node.key != key) {
            cursor = &mut cursor.as_mut()?.next;
        }

        let node = cursor.take()?;
        *cursor = node.next;
        self.len = self.len.saturating_sub(1);
        Some(node.value)
    }

    /// Returns the value of the first entry for `key`.
    pub fn get(&self, key: &str) -> Option<&V> {
        self.iter().find_map(|(k, v)| (k == key).then_some(v))
    }

    /// Returns a mutable reference to the value of the first entry for `key`.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let mut cursor = self.head.as_deref_mut();
        while let Some(node) = cursor {
            if node.key == key {
                return Some(&mut node.value);
            }
            cursor = node.next.as_deref_mut();
        }
        None
    }

    /// Returns true if some entry has `key`
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the chain has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Iterates from head to tail
    #[must_use]
    pub fn iter(&self) -> Iter<'_, V> {
        Iter { next: self.head.as_deref() }
    }
}

impl<V> Drop for Chain<V> {
    fn drop(&mut self) {
        // Unlink node by node; the default recursive drop can overflow the stack on long chains.
        let mut link = self.head.take();
        while let Some(mut node) = link {
            link = node.next.take();
        }
    }
}

impl<V: fmt::Display> fmt::Display for Chain<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in self {
            write!(f, "-> ({key}: {value}) ")?;
        }
        Ok(())
    }
}

/// Borrowing iterator over a [`Chain`]
#[derive(Debug, Clone)]
pub struct Iter<'a, V> {
    /// Node to yield next
    next: Option<&'a Node<V>>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = node.next.as_deref();
        Some((node.key.as_str(), &node.value))
    }
}

impl<'a, V> IntoIterator for &'a Chain<V> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Owning iterator over a [`Chain`], draining it from the head
#[derive(Debug)]
pub struct IntoIter<V> {
    /// The remaining entries
    chain: Chain<V>,
}

impl<V> Iterator for IntoIter<V> {
    type Item = (String, V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.chain.head.take()?;
        let Node { key, value, next } = *node;
        self.chain.head = next;
        self.chain.len = self.chain.len.saturating_sub(1);
        Some((key, value))
    }
}

impl<V> IntoIterator for Chain<V> {
    type Item = (String, V);
    type IntoIter = IntoIter<V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { chain: self }
    }
}
