#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Registry Core
//!
//! Thread-safe, string-keyed registry for plugin-style registration patterns.
//!
//! ## Overview
//!
//! This crate provides a single mutable associative container protected by a
//! reentrant lock. Callers register values under validated string keys, look
//! them up or remove them from any thread, compose several operations into
//! one critical section, and round-trip registry contents through JSON text.
//! Each entry may carry an optional human-readable description exposed
//! through snapshots.
//!
//! ## Key Features
//!
//! - **Thread safety**: one reentrant lock serializes every operation
//! - **Key validation**: non-empty, whitespace-free string keys
//! - **Overwrite policies**: forbid (default), allow, or warn on duplicate keys
//! - **Bulk transactions**: [`Registry::bulk`] holds the lock across operations
//! - **Pluggable storage**: back ends implement the [`Storage`] trait
//! - **JSON import/export**: [`Registry::to_json`] and [`Registry::from_json`]
//!
//! ## Module Organization
//!
//! - [`registry`] - The registry core, builder, and snapshot views
//! - [`storage`] - Storage back end trait and the in-memory default
//! - [`policy`] - Overwrite policy governing writes to existing keys
//! - [`error`] - Structured error handling
//! - [`logging`] - Opt-in console logging setup
//!
//! ## Quick Start
//!
//! ```rust
//! use registry_core::{OverwritePolicy, Registry, RegistryError};
//!
//! # fn main() -> registry_core::Result<()> {
//! let registry: Registry<i32> = Registry::new();
//!
//! registry.register("answer", 42, Some("the answer"))?;
//! assert_eq!(registry.lookup("answer")?, 42);
//!
//! // duplicate registration is rejected under the default policy
//! assert!(matches!(
//!     registry.insert("answer", 7),
//!     Err(RegistryError::AlreadyRegistered { .. })
//! ));
//!
//! // relaxed registries overwrite instead
//! let relaxed = Registry::with_policy(OverwritePolicy::Allow);
//! relaxed.insert("x", 10)?;
//! relaxed.insert("x", 20)?;
//! assert_eq!(relaxed.lookup("x")?, 20);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod logging;
pub mod policy;
pub mod registry;
pub mod storage;

pub use error::{RegistryError, Result};
pub use policy::OverwritePolicy;
pub use registry::{BulkGuard, Registry, RegistryBuilder, StoredItem};
pub use storage::{MemoryStorage, Storage, Stored};
