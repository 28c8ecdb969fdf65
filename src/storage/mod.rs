//! # Storage Back Ends
//!
//! Pluggable storage for registry contents.
//!
//! ## Overview
//!
//! A registry delegates all bookkeeping of key to (value, description)
//! associations to a [`Storage`] implementation. The registry owns key
//! validation, overwrite policy, and locking; back ends hold plain state and
//! perform no validation of their own. [`MemoryStorage`] is the default back
//! end used when a registry is built without an explicit one.

use std::collections::HashMap;

pub mod memory;

pub use memory::MemoryStorage;

/// Internal storage representation of one entry: the stored value, which may
/// itself be absent, and an optional description.
pub type Stored<V> = (Option<V>, Option<String>);

/// Capability set a registry requires from its storage back end.
///
/// Implementations are free to keep state anywhere they like as long as the
/// operations below behave as documented. Mutual exclusion is provided by
/// the owning registry; implementations are never called concurrently.
pub trait Storage<V>: Send {
    /// Insert or overwrite the entry for `key` unconditionally.
    fn set(&mut self, key: String, value: Option<V>, description: Option<String>);

    /// Fetch the entry for `key`, or `None` when the key is absent.
    fn get(&self, key: &str) -> Option<Stored<V>>;

    /// Remove `key` if present. Absence is a no-op, not an error; the
    /// registry surfaces missing keys to callers before reaching the store.
    fn delete(&mut self, key: &str);

    /// Remove all entries.
    fn clear(&mut self);

    /// Bulk-set multiple entries, each overwritten unconditionally.
    fn update(&mut self, entries: Vec<(String, Stored<V>)>);

    /// Current key set. Iteration order is unspecified.
    fn keys(&self) -> Vec<String>;

    /// Number of stored entries.
    fn len(&self) -> usize;

    /// True when no entries are stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when `key` has an entry, whether or not its value is set.
    fn contains(&self, key: &str) -> bool;

    /// Full snapshot of the stored state.
    fn to_map(&self) -> HashMap<String, Stored<V>>;
}
