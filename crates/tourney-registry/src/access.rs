//! Owner capability check.
//!
//! A registry has exactly one privileged identity, fixed at construction.
//! Owner-only operations call [`AccessControl::authorize`] before reading
//! any record, so an unauthorized caller learns nothing about registry
//! state from the error it gets back.

use tourney_types::{Identity, Result, TourneyError};

/// Flat single-owner access control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessControl {
    owner: Identity,
}

impl AccessControl {
    #[must_use]
    pub fn new(owner: Identity) -> Self {
        Self { owner }
    }

    #[must_use]
    pub fn owner(&self) -> Identity {
        self.owner
    }

    #[must_use]
    pub fn is_owner(&self, caller: &Identity) -> bool {
        *caller == self.owner
    }

    /// # Errors
    /// Returns [`TourneyError::Unauthorized`] unless `caller` is the owner.
    pub fn authorize(&self, caller: &Identity) -> Result<()> {
        if self.is_owner(caller) {
            Ok(())
        } else {
            tracing::warn!(caller = %caller, "Owner-only operation rejected");
            Err(TourneyError::Unauthorized { caller: *caller })
        }
    }
}
