//! Configuration types for a tournament registry.

use serde::{Deserialize, Serialize};

use crate::{Result, TourneyError};

/// How strictly settlement sheets are checked against the participant set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettlementPolicy {
    /// Reject entries naming identities that never joined.
    pub reject_non_participants: bool,
    /// Accept sheets that score only a subset of the participants.
    pub allow_partial: bool,
}

impl SettlementPolicy {
    /// Every participant must be scored and nobody else may be.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            reject_non_participants: true,
            allow_partial: false,
        }
    }

    /// Only the array-length rule applies.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            reject_non_participants: false,
            allow_partial: true,
        }
    }
}

impl Default for SettlementPolicy {
    fn default() -> Self {
        Self {
            reject_non_participants: true,
            allow_partial: true,
        }
    }
}

/// Configuration for a single registry instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Settlement validation policy.
    pub settlement: SettlementPolicy,
}

impl RegistryConfig {
    /// Parse a JSON config document. Missing fields take their defaults.
    ///
    /// # Errors
    /// Returns [`TourneyError::Configuration`] if the document is malformed.
    pub fn from_json(doc: &str) -> Result<Self> {
        serde_json::from_str(doc).map_err(|e| TourneyError::Configuration(e.to_string()))
    }
}
