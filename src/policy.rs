//! Overwrite policy for writes that target an existing key.

use serde::{Deserialize, Serialize};

use crate::error::RegistryError;

/// Governs whether assigning to an existing key is an error.
///
/// The numeric codes are stable and accepted wherever a policy is read from
/// configuration: 0 forbids overwrites, 1 allows them silently, 2 allows
/// them and emits a warning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverwritePolicy {
    /// Reject writes to keys that already exist (default).
    #[default]
    Forbid = 0,
    /// Silently overwrite existing keys.
    Allow = 1,
    /// Overwrite existing keys and log a warning for each.
    Warn = 2,
}

impl OverwritePolicy {
    /// Stable numeric code for this policy
    pub fn code(self) -> u8 {
        self as u8
    }

    /// True when a write to an existing key must be rejected
    pub(crate) fn forbids_overwrite(self) -> bool {
        matches!(self, Self::Forbid)
    }
}

impl TryFrom<u8> for OverwritePolicy {
    type Error = RegistryError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Forbid),
            1 => Ok(Self::Allow),
            2 => Ok(Self::Warn),
            other => Err(RegistryError::configuration(format!(
                "invalid overwrite policy code {other}, expected 0, 1, or 2"
            ))),
        }
    }
}
