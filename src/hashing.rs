//! Pluggable string hash functions.
//!
//! A map owns its hasher as a strategy object. Anything implementing [`KeyHasher`] can be
//! injected, including plain closures of type `Fn(&str) -> u64`.

use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

/// Maps a string key to an unsigned integer.
///
/// The value only has to be deterministic for a given key; the maps reduce it modulo their
/// capacity themselves.
pub trait KeyHasher {
    /// Hashes `key`
    fn hash_key(&self, key: &str) -> u64;
}

impl<F> KeyHasher for F
where
    F: Fn(&str) -> u64,
{
    fn hash_key(&self, key: &str) -> u64 {
        self(key)
    }
}

/// Sum of the key's code points.
///
/// Anagrams collide, which makes it handy for exercising collision handling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ByteSumHasher;

impl KeyHasher for ByteSumHasher {
    fn hash_key(&self, key: &str) -> u64 {
        key.chars().fold(0u64, |hash, letter| hash.wrapping_add(u64::from(letter)))
    }
}

/// Sum of `(position + 1) * code point` over the key's characters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeightedByteSumHasher;

impl KeyHasher for WeightedByteSumHasher {
    fn hash_key(&self, key: &str) -> u64 {
        key.chars().zip(1u64..).fold(0u64, |hash, (letter, weight)| {
            hash.wrapping_add(weight.wrapping_mul(u64::from(letter)))
        })
    }
}

/// The standard library's SipHash with fixed keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SipKeyHasher;

impl KeyHasher for SipKeyHasher {
    fn hash_key(&self, key: &str) -> u64 {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_sum() {
        assert_eq!(ByteSumHasher.hash_key(""), 0);
        assert_eq!(ByteSumHasher.hash_key("a"), 97);
        assert_eq!(ByteSumHasher.hash_key("ab"), 97 + 98);
        assert_eq!(ByteSumHasher.hash_key("ab"), ByteSumHasher.hash_key("ba"));
    }

    #[test]
    fn test_weighted_byte_sum() {
        assert_eq!(WeightedByteSumHasher.hash_key("ab"), 97 + 2 * 98);
        assert_eq!(WeightedByteSumHasher.hash_key("ba"), 98 + 2 * 97);
        assert_ne!(WeightedByteSumHasher.hash_key("ab"), WeightedByteSumHasher.hash_key("ba"));
    }

    #[test]
    fn test_sip_is_deterministic() {
        assert_eq!(SipKeyHasher.hash_key("key1"), SipKeyHasher.hash_key("key1"));
    }

    #[test]
    fn test_closure_as_hasher() {
        let constant = |_: &str| 7u64;
        assert_eq!(constant.hash_key("anything"), 7);
    }
}
