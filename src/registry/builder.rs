//! Construction of registries with custom settings.

use crate::error::{RegistryError, Result};
use crate::logging::{verbosity_filter, DEFAULT_LOG_LEVEL, MAX_LOG_LEVEL};
use crate::policy::OverwritePolicy;
use crate::registry::Registry;
use crate::storage::{MemoryStorage, Storage};

/// Builder for [`Registry`] instances with non-default settings.
///
/// All inputs are validated at [`build`](Self::build) time; malformed
/// settings surface as [`RegistryError::Configuration`].
///
/// ```rust
/// use registry_core::{OverwritePolicy, Registry};
///
/// # fn main() -> registry_core::Result<()> {
/// let registry: Registry<i32> = Registry::builder()
///     .overwrite_policy(OverwritePolicy::Allow)
///     .log_level(10)
///     .name("handlers")
///     .build()?;
///
/// registry.insert("x", 10)?;
/// registry.insert("x", 20)?;
/// assert_eq!(registry.lookup("x")?, 20);
/// # Ok(())
/// # }
/// ```
pub struct RegistryBuilder<V> {
    policy: OverwritePolicy,
    policy_code: Option<u8>,
    log_level: u8,
    store: Option<Box<dyn Storage<V>>>,
    name: Option<String>,
}

impl<V: Clone + Send + 'static> RegistryBuilder<V> {
    pub(crate) fn new() -> Self {
        Self {
            policy: OverwritePolicy::default(),
            policy_code: None,
            log_level: DEFAULT_LOG_LEVEL,
            store: None,
            name: None,
        }
    }

    /// Set the overwrite policy
    pub fn overwrite_policy(mut self, policy: OverwritePolicy) -> Self {
        self.policy = policy;
        self.policy_code = None;
        self
    }

    /// Set the overwrite policy from its numeric code.
    ///
    /// Out-of-range codes are rejected when the registry is built.
    pub fn overwrite_policy_code(mut self, code: u8) -> Self {
        self.policy_code = Some(code);
        self
    }

    /// Set the numeric log verbosity, valid in `0..=50`.
    ///
    /// Lower values log more; the default of 30 emits warnings and errors
    /// only. Out-of-range values are rejected when the registry is built.
    pub fn log_level(mut self, level: u8) -> Self {
        self.log_level = level;
        self
    }

    /// Supply a custom storage back end instead of the in-memory default
    pub fn store<S>(mut self, store: S) -> Self
    where
        S: Storage<V> + 'static,
    {
        self.store = Some(Box::new(store));
        self
    }

    /// Label this instance's tracing span
    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_owned());
        self
    }

    /// Validate the collected settings and construct the registry
    pub fn build(self) -> Result<Registry<V>> {
        let policy = match self.policy_code {
            Some(code) => OverwritePolicy::try_from(code)?,
            None => self.policy,
        };
        if self.log_level > MAX_LOG_LEVEL {
            return Err(RegistryError::configuration(format!(
                "log level {} is out of range 0..={MAX_LOG_LEVEL}",
                self.log_level
            )));
        }
        let span = match &self.name {
            Some(name) => tracing::info_span!("registry", name = %name),
            None => tracing::info_span!("registry"),
        };
        let store = self
            .store
            .unwrap_or_else(|| Box::new(MemoryStorage::new()));
        Ok(Registry::from_parts(
            store,
            policy,
            verbosity_filter(self.log_level),
            span,
        ))
    }
}

impl<V: Clone + Send + 'static> Default for RegistryBuilder<V> {
    fn default() -> Self {
        Self::new()
    }
}
