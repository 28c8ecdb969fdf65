//! # Registry Core
//!
//! Thread-safe, string-keyed registry for plugin-style registration.
//!
//! ## Overview
//!
//! A [`Registry`] is a single mutable mapping from validated string keys to
//! values with optional per-entry descriptions. Every operation runs under
//! one reentrant lock, so arbitrary threads can register, look up, and
//! remove entries concurrently, and a caller can compose several operations
//! into one critical section with [`Registry::bulk`].
//!
//! ## Key Features
//!
//! - **Key validation**: keys must be non-empty and whitespace-free
//! - **Overwrite policies**: forbid, allow, or warn on writes to existing keys
//! - **Bulk transactions**: hold the lock across several operations
//! - **Pluggable storage** via the [`Storage`](crate::storage::Storage) trait
//! - **JSON import/export** of registry contents
//!
//! ## Usage
//!
//! ```rust
//! use registry_core::Registry;
//!
//! # fn main() -> registry_core::Result<()> {
//! let registry: Registry<i32> = Registry::new();
//! registry.insert("answer", 42)?;
//!
//! assert_eq!(registry.lookup("answer")?, 42);
//! assert!(registry.contains("answer"));
//! # Ok(())
//! # }
//! ```

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::ops::Deref;

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::level_filters::LevelFilter;
use tracing::{debug, warn, Span};

use crate::error::{RegistryError, Result};
use crate::policy::OverwritePolicy;
use crate::storage::{MemoryStorage, Storage, Stored};

pub mod builder;
pub mod stored_item;

pub use builder::RegistryBuilder;
pub use stored_item::StoredItem;

type StoreCell<V> = RefCell<Box<dyn Storage<V>>>;

/// Thread-safe registry mapping validated string keys to values.
///
/// The registry owns exactly one storage back end and one reentrant lock,
/// both created at construction. Stored values are handed out by clone;
/// callers that want shared mutable values register `Arc`'d types, in which
/// case snapshots alias the live values rather than deep-copying them.
pub struct Registry<V> {
    inner: ReentrantMutex<StoreCell<V>>,
    policy: OverwritePolicy,
    verbosity: LevelFilter,
    span: Span,
}

/// RAII critical section over a registry.
///
/// Produced by [`Registry::bulk`]. Holds the registry lock until dropped and
/// dereferences to the registry itself, so any sequence of operations runs
/// as one atomic unit. The lock is reentrant, which is what lets operations
/// called through the guard acquire it again on the same thread. Dropping
/// the guard releases the lock on every exit path, including panics, and no
/// error raised inside the section is suppressed.
pub struct BulkGuard<'a, V> {
    registry: &'a Registry<V>,
    _guard: ReentrantMutexGuard<'a, StoreCell<V>>,
}

impl<V> Deref for BulkGuard<'_, V> {
    type Target = Registry<V>;

    fn deref(&self) -> &Registry<V> {
        self.registry
    }
}

impl<V: Clone + Send + 'static> Registry<V> {
    /// Create a registry with default settings: a fresh in-memory back end
    /// and the `Forbid` overwrite policy.
    pub fn new() -> Self {
        Self::from_parts(
            Box::new(MemoryStorage::new()),
            OverwritePolicy::default(),
            crate::logging::verbosity_filter(crate::logging::DEFAULT_LOG_LEVEL),
            tracing::info_span!("registry"),
        )
    }

    /// Create a registry with the given overwrite policy and defaults
    /// otherwise.
    pub fn with_policy(policy: OverwritePolicy) -> Self {
        Self::from_parts(
            Box::new(MemoryStorage::new()),
            policy,
            crate::logging::verbosity_filter(crate::logging::DEFAULT_LOG_LEVEL),
            tracing::info_span!("registry"),
        )
    }

    /// Start building a registry with custom settings
    pub fn builder() -> RegistryBuilder<V> {
        RegistryBuilder::new()
    }

    pub(crate) fn from_parts(
        store: Box<dyn Storage<V>>,
        policy: OverwritePolicy,
        verbosity: LevelFilter,
        span: Span,
    ) -> Self {
        Self {
            inner: ReentrantMutex::new(RefCell::new(store)),
            policy,
            verbosity,
            span,
        }
    }

    /// Register `value` under `key` with an optional description.
    ///
    /// Under the `Forbid` policy an existing key is rejected with
    /// [`RegistryError::AlreadyRegistered`]. When no description is given,
    /// an auto-generated one naming the value's type is attached.
    pub fn register(&self, key: &str, value: V, description: Option<&str>) -> Result<()> {
        let _entered = self.span.enter();
        let guard = self.inner.lock();
        {
            let store = guard.borrow();
            Self::check_key(&**store, key, self.policy.forbids_overwrite(), false)?;
            self.warn_if_overwriting(&**store, key);
        }
        let description = match description {
            Some(text) => text.to_owned(),
            None => format!("Registered value of type {}", std::any::type_name::<V>()),
        };
        guard
            .borrow_mut()
            .set(key.to_owned(), Some(value), Some(description));
        if self.debug_enabled() {
            debug!(key, "registered");
        }
        Ok(())
    }

    /// Run a value-producing closure and register its result.
    ///
    /// The produced value is stored under `key` and handed back to the
    /// caller, so registration can wrap construction without an extra
    /// binding:
    ///
    /// ```rust
    /// use std::sync::Arc;
    /// use registry_core::Registry;
    ///
    /// # fn main() -> registry_core::Result<()> {
    /// let registry: Registry<Arc<dyn Fn(i32) -> i32 + Send + Sync>> = Registry::new();
    /// let plus_one = registry.register_with("plus_one", Some("adds one"), || {
    ///     Arc::new(|x| x + 1) as Arc<dyn Fn(i32) -> i32 + Send + Sync>
    /// })?;
    ///
    /// assert_eq!(plus_one(3), 4);
    /// assert_eq!(registry.lookup("plus_one")?(5), 6);
    /// # Ok(())
    /// # }
    /// ```
    pub fn register_with<F>(&self, key: &str, description: Option<&str>, f: F) -> Result<V>
    where
        F: FnOnce() -> V,
    {
        let value = f();
        self.register(key, value.clone(), description)?;
        Ok(value)
    }

    /// Assign `value` to `key` without attaching a description.
    ///
    /// Subject to key validation and the overwrite policy, like
    /// [`register`](Self::register).
    pub fn insert(&self, key: &str, value: V) -> Result<()> {
        let _entered = self.span.enter();
        let guard = self.inner.lock();
        {
            let store = guard.borrow();
            Self::check_key(&**store, key, self.policy.forbids_overwrite(), false)?;
            self.warn_if_overwriting(&**store, key);
        }
        guard.borrow_mut().set(key.to_owned(), Some(value), None);
        if self.debug_enabled() {
            debug!(key, "registered");
        }
        Ok(())
    }

    /// Strict lookup: fetch the value registered under `key`.
    ///
    /// Fails with [`RegistryError::NotRegistered`] when the key is absent,
    /// and also when the key is present but its stored value is unset. A
    /// registered-but-unset entry is indistinguishable from an absent one
    /// through this accessor; use [`contains`](Self::contains) or
    /// [`snapshot`](Self::snapshot) to tell them apart.
    pub fn lookup(&self, key: &str) -> Result<V> {
        let guard = self.inner.lock();
        {
            let store = guard.borrow();
            Self::check_key(&**store, key, false, true)?;
        }
        let stored = guard.borrow().get(key);
        match stored {
            Some((Some(value), _)) => Ok(value),
            _ => Err(RegistryError::not_registered(key)),
        }
    }

    /// Fetch the value for `key`, or `None` when absent or unset.
    ///
    /// Performs no key validation at all and never fails, unlike
    /// [`lookup`](Self::lookup).
    pub fn get(&self, key: &str) -> Option<V> {
        let guard = self.inner.lock();
        let stored = guard.borrow().get(key);
        stored.and_then(|(value, _)| value)
    }

    /// Fetch the value for `key`, or `default` when absent or unset
    pub fn get_or(&self, key: &str, default: V) -> V {
        self.get(key).unwrap_or(default)
    }

    /// Remove the entry registered under `key`.
    ///
    /// Fails with [`RegistryError::NotRegistered`] when the key is absent.
    pub fn remove(&self, key: &str) -> Result<()> {
        let _entered = self.span.enter();
        let guard = self.inner.lock();
        {
            let store = guard.borrow();
            Self::check_key(&**store, key, false, true)?;
        }
        guard.borrow_mut().delete(key);
        if self.debug_enabled() {
            debug!(key, "unregistered");
        }
        Ok(())
    }

    /// Remove all entries
    pub fn clear(&self) {
        let _entered = self.span.enter();
        let guard = self.inner.lock();
        guard.borrow_mut().clear();
        if self.debug_enabled() {
            debug!("registry cleared");
        }
    }

    /// True when `key` has an entry, set or not. No key validation.
    pub fn contains(&self, key: &str) -> bool {
        let guard = self.inner.lock();
        let store = guard.borrow();
        store.contains(key)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        let guard = self.inner.lock();
        let store = guard.borrow();
        store.len()
    }

    /// True when the registry holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the current key set.
    ///
    /// The key list is taken under the lock; the returned `Vec` is then safe
    /// to consume without holding it. Concurrent mutation during iteration
    /// cannot corrupt anything but may of course miss entries added after
    /// the snapshot was taken.
    pub fn keys(&self) -> Vec<String> {
        let guard = self.inner.lock();
        let store = guard.borrow();
        store.keys()
    }

    /// Point-in-time view of every entry as a [`StoredItem`].
    ///
    /// The returned map's key set is decoupled from later registry mutation.
    /// Values are clones; registering `Arc`'d values makes the snapshot
    /// alias the live values instead of copying their contents.
    pub fn snapshot(&self) -> HashMap<String, StoredItem<V>> {
        let guard = self.inner.lock();
        let entries = guard.borrow().to_map();
        entries
            .into_iter()
            .map(|(key, (value, description))| (key, StoredItem::new(value, description)))
            .collect()
    }

    /// Snapshot reduced to key and value, descriptions dropped
    pub fn to_map(&self) -> HashMap<String, Option<V>> {
        let guard = self.inner.lock();
        let entries = guard.borrow().to_map();
        entries
            .into_iter()
            .map(|(key, (value, _))| (key, value))
            .collect()
    }

    /// Build a new registry from plain key/value pairs.
    ///
    /// Entries are bulk-loaded straight through the back end, bypassing key
    /// validation and the overwrite policy entirely; loading always
    /// succeeds, with later duplicates winning. Incremental merging with
    /// policy enforcement is [`update`](Self::update)'s job instead.
    pub fn from_map<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, V)>,
    {
        Self::from_entries(
            entries
                .into_iter()
                .map(|(key, value)| (key, (Some(value), None))),
        )
    }

    /// Build a new registry from full `(value, description)` entries.
    ///
    /// Same bulk-load semantics as [`from_map`](Self::from_map). The new
    /// registry gets its own fresh lock and back end.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Stored<V>)>,
    {
        let registry = Self::new();
        {
            let guard = registry.inner.lock();
            guard.borrow_mut().update(entries.into_iter().collect());
        }
        registry
    }

    /// Merge multiple entries, enforcing key validation and overwrite policy
    /// for every key.
    ///
    /// All keys are validated against the pre-call state before any entry is
    /// stored, so a failed call leaves the registry untouched. Under the
    /// `Forbid` policy a key duplicated inside the batch counts as already
    /// registered for the later occurrence.
    pub fn update<I>(&self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, Stored<V>)>,
    {
        let _entered = self.span.enter();
        let guard = self.inner.lock();
        let entries: Vec<(String, Stored<V>)> = entries.into_iter().collect();
        let cant_exist = self.policy.forbids_overwrite();
        {
            let store = guard.borrow();
            let mut batch_keys: HashSet<&str> = HashSet::with_capacity(entries.len());
            for (key, _) in &entries {
                Self::check_key(&**store, key, cant_exist, false)?;
                if cant_exist && !batch_keys.insert(key.as_str()) {
                    return Err(RegistryError::already_registered(key.as_str()));
                }
            }
        }
        let mut store = guard.borrow_mut();
        for (key, (value, description)) in entries {
            if self.policy == OverwritePolicy::Warn && store.contains(&key) {
                warn!(key = %key, "overwriting existing registry entry");
            }
            store.set(key, value, description);
        }
        Ok(())
    }

    /// Merge plain key/value pairs with policy enforcement, attaching no
    /// descriptions. See [`update`](Self::update).
    pub fn update_values<I>(&self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, V)>,
    {
        self.update(
            entries
                .into_iter()
                .map(|(key, value)| (key, (Some(value), None))),
        )
    }

    /// Enter a bulk critical section.
    ///
    /// The returned guard holds the registry lock and dereferences to the
    /// registry, so several operations can be composed atomically:
    ///
    /// ```rust
    /// use registry_core::Registry;
    ///
    /// # fn main() -> registry_core::Result<()> {
    /// let registry: Registry<i32> = Registry::new();
    /// {
    ///     let bulk = registry.bulk();
    ///     bulk.insert("a", 1)?;
    ///     bulk.insert("b", 2)?;
    /// }
    /// assert_eq!(registry.len(), 2);
    /// # Ok(())
    /// # }
    /// ```
    pub fn bulk(&self) -> BulkGuard<'_, V> {
        BulkGuard {
            registry: self,
            _guard: self.inner.lock(),
        }
    }

    /// Export the full back-end state, descriptions included.
    ///
    /// Together with [`import_state`](Self::import_state) or
    /// [`from_entries`](Self::from_entries) this supports transplanting a
    /// registry's contents; a registry rebuilt from exported state never
    /// shares a lock with its source.
    pub fn export_state(&self) -> HashMap<String, Stored<V>> {
        let guard = self.inner.lock();
        let store = guard.borrow();
        store.to_map()
    }

    /// Merge previously exported state into this registry.
    ///
    /// Goes straight through the back end's bulk update, bypassing key
    /// validation and overwrite policy like [`from_entries`](Self::from_entries).
    pub fn import_state<I>(&self, entries: I)
    where
        I: IntoIterator<Item = (String, Stored<V>)>,
    {
        let guard = self.inner.lock();
        guard.borrow_mut().update(entries.into_iter().collect());
    }

    /// The registry's overwrite policy
    pub fn overwrite_policy(&self) -> OverwritePolicy {
        self.policy
    }

    fn check_key(
        store: &dyn Storage<V>,
        key: &str,
        cant_exist: bool,
        must_exist: bool,
    ) -> Result<()> {
        if key.is_empty() {
            return Err(RegistryError::invalid_key(
                key,
                "key cannot be an empty string",
            ));
        }
        if key.chars().any(char::is_whitespace) {
            return Err(RegistryError::invalid_key(
                key,
                "key cannot contain whitespace characters",
            ));
        }
        if cant_exist && store.contains(key) {
            return Err(RegistryError::already_registered(key));
        }
        if must_exist && !store.contains(key) {
            return Err(RegistryError::not_registered(key));
        }
        Ok(())
    }

    fn warn_if_overwriting(&self, store: &dyn Storage<V>, key: &str) {
        if self.policy == OverwritePolicy::Warn && store.contains(key) {
            warn!(key, "overwriting existing registry entry");
        }
    }

    fn debug_enabled(&self) -> bool {
        self.verbosity >= LevelFilter::DEBUG
    }
}

impl<V: Clone + Send + Serialize + 'static> Registry<V> {
    /// Serialize the registry contents to a JSON object of key to value.
    ///
    /// Descriptions are not exported; unset values appear as `null`. Fails
    /// with [`RegistryError::Serialization`] when a value is not
    /// representable as JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&self.to_map())
            .map_err(|source| RegistryError::serialization(source.to_string()))
    }

    /// Pretty-printed variant of [`to_json`](Self::to_json)
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.to_map())
            .map_err(|source| RegistryError::serialization(source.to_string()))
    }
}

impl<V: Clone + Send + DeserializeOwned + 'static> Registry<V> {
    /// Build a new registry from a JSON object of key to value.
    ///
    /// `null` values load as registered-but-unset entries. Delegates to
    /// [`from_entries`](Self::from_entries), so no key validation or policy
    /// enforcement applies. Fails with [`RegistryError::Parse`] on malformed
    /// input.
    pub fn from_json(text: &str) -> Result<Self> {
        let parsed: HashMap<String, Option<V>> =
            serde_json::from_str(text).map_err(|source| RegistryError::parse(source.to_string()))?;
        Ok(Self::from_entries(
            parsed.into_iter().map(|(key, value)| (key, (value, None))),
        ))
    }
}

impl<V: Clone + Send + 'static> Default for Registry<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone + Send + 'static> fmt::Debug for Registry<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys = self.keys();
        keys.sort();
        f.debug_tuple("Registry").field(&keys).finish()
    }
}
