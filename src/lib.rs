//! # Prime Hash
//!
//! String-keyed hash maps whose bucket counts are always prime.
//!
//! This crate provides two hash map implementations sharing one interface:
//!
//! - `OpenAddressingMap`: quadratic probing over a single slot array, with tombstones for
//!   removed entries. Grows when the load factor reaches 0.5.
//! - `ChainedHashMap`: separate chaining, one linked list per bucket. Grows when the load
//!   factor reaches 1.0.
//!
//! Both take the hash function as an injected [`KeyHasher`], so any `Fn(&str) -> u64` works.
//! [`find_mode`] builds on the chained map to count the most frequent values of a slice.
//!
//! ## Basic Usage
//!
//! ```rust
//! use primehash::{ByteSumHasher, OpenAddressingMap};
//!
//! // A requested capacity of 20 is advanced to the prime 23
//! let mut map = OpenAddressingMap::new(20, ByteSumHasher);
//! assert_eq!(map.capacity(), 23);
//!
//! // Insert values
//! map.put("apple", 1);
//! map.put("banana", 2);
//!
//! // Retrieve values
//! assert_eq!(map.get("apple"), Some(&1));
//!
//! // Update values
//! map.put("apple", 10);
//! assert_eq!(map.get("apple"), Some(&10));
//!
//! // Remove values
//! map.remove("apple");
//! assert_eq!(map.get("apple"), None);
//!
//! // Resize and rehash
//! map.resize_table(30);
//! assert_eq!(map.capacity(), 31);
//! assert_eq!(map.get("banana"), Some(&2));
//! ```
//!
//! ## Separate Chaining
//!
//! ```rust
//! use primehash::ChainedHashMap;
//!
//! let mut map: ChainedHashMap<String> = ChainedHashMap::default();
//! for i in 1..=5 {
//!     map.put(i.to_string(), (i * 10).to_string());
//! }
//! assert_eq!(map.len(), 5);
//! assert!(map.table_load() <= 1.0);
//!
//! map.clear();
//! assert!(map.is_empty());
//! assert_eq!(map.capacity(), 11);
//! ```

/// Singly linked list used as the bucket of the chained map
pub mod chain;
/// Pluggable string hash functions
pub mod hashing;
/// Mode finding on top of the chained map
pub mod mode;
/// Quadratic-probing open-addressing map
pub mod open_addressing;
/// Prime capacity arithmetic
pub mod prime;
/// Separate-chaining map
pub mod separate_chaining;
/// Utility functions and traits for the hash maps
pub mod utils;

pub use hashing::{ByteSumHasher, KeyHasher, SipKeyHasher, WeightedByteSumHasher};
pub use mode::{Mode, find_mode};
pub use open_addressing::OpenAddressingMap;
pub use separate_chaining::ChainedHashMap;
pub use utils::HashMapExtensions;
