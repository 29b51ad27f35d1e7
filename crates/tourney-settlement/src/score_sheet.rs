//! Score sheets: the owner-supplied input to settlement.
//!
//! The wire shape is two parallel arrays (participants, scores). A sheet
//! can only be built from arrays of equal length; that is the one check
//! which depends on nothing but the request itself.

use std::collections::HashSet;

use tourney_types::{Identity, Result, Score, TourneyError};

/// Ordered `(participant, score)` pairs supplied for one settlement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreSheet {
    entries: Vec<(Identity, Score)>,
}

impl ScoreSheet {
    /// Zip two parallel arrays into a sheet.
    ///
    /// # Errors
    /// Returns [`TourneyError::LengthMismatch`] if the arrays differ in length.
    pub fn from_parallel(participants: &[Identity], scores: &[Score]) -> Result<Self> {
        if participants.len() != scores.len() {
            return Err(TourneyError::LengthMismatch {
                participants: participants.len(),
                scores: scores.len(),
            });
        }
        Ok(Self {
            entries: participants.iter().copied().zip(scores.iter().copied()).collect(),
        })
    }

    /// Build a sheet from pairs directly.
    #[must_use]
    pub fn from_pairs(entries: Vec<(Identity, Score)>) -> Self {
        Self { entries }
    }

    /// First identity that appears more than once, if any.
    #[must_use]
    pub fn first_duplicate(&self) -> Option<Identity> {
        let mut seen = HashSet::with_capacity(self.entries.len());
        self.entries
            .iter()
            .map(|(identity, _)| *identity)
            .find(|identity| !seen.insert(*identity))
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Identity, Score)> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
