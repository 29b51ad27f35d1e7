//! # Tournament: the lifecycle record
//!
//! ## State Machine
//!
//! ```text
//!   ┌──────┐  start   ┌─────────┐  end (settle)  ┌───────┐
//!   │ OPEN ├─────────▶│ STARTED ├───────────────▶│ ENDED │
//!   └──────┘          └─────────┘                └───────┘
//!     ▲ join
//! ```
//!
//! - **Enrollment only while Open**: participants never change afterwards
//! - **Monotonic**: no transition leads back to an earlier phase
//! - **Single settlement**: scores are written once, by the move to ENDED
//!
//! The guards here cover the record itself. Caller authorization and id
//! validation live in the registry.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{Identity, Result, TournamentId, TourneyError};

/// Final result recorded for one participant.
pub type Score = u64;

/// Lifecycle phase of a tournament.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum TournamentPhase {
    /// Accepting participants.
    Open,
    /// Running. Enrollment is closed.
    Started,
    /// Settled. **Terminal.**
    Ended,
}

impl TournamentPhase {
    /// Can a record in this phase move to `target`?
    #[must_use]
    pub fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Open, Self::Started) | (Self::Started, Self::Ended)
        )
    }
}

impl std::fmt::Display for TournamentPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "OPEN"),
            Self::Started => write!(f, "STARTED"),
            Self::Ended => write!(f, "ENDED"),
        }
    }
}

/// One tournament record in the registry arena.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tournament {
    /// Dense id, equal to the record's position in the arena.
    pub id: TournamentId,
    /// Participants required before the tournament may start.
    pub min_users: u64,
    /// Enrolled identities.
    pub participants: BTreeSet<Identity>,
    /// Current lifecycle phase.
    pub phase: TournamentPhase,
    /// Final scores, written by settlement.
    pub scores: BTreeMap<Identity, Score>,
}

impl Tournament {
    /// A fresh Open record with no participants.
    #[must_use]
    pub fn new(id: TournamentId, min_users: u64) -> Self {
        Self {
            id,
            min_users,
            participants: BTreeSet::new(),
            phase: TournamentPhase::Open,
            scores: BTreeMap::new(),
        }
    }

    /// `true` once the Start transition has succeeded.
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.phase != TournamentPhase::Open
    }

    /// `true` once the End transition has succeeded.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase == TournamentPhase::Ended
    }

    /// Active means not yet Ended (Open or Started).
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.is_finished()
    }

    #[must_use]
    pub fn user_count(&self) -> usize {
        self.participants.len()
    }

    #[must_use]
    pub fn has_participant(&self, identity: &Identity) -> bool {
        self.participants.contains(identity)
    }

    /// Whether the participant threshold has been reached.
    #[must_use]
    pub fn threshold_met(&self) -> bool {
        u64::try_from(self.user_count()).map_or(true, |count| count >= self.min_users)
    }

    /// Add `identity` to the participant set.
    ///
    /// # Errors
    /// - `AlreadyStarted` if the record has left the Open phase
    /// - `DuplicateJoin` if `identity` is already enrolled
    pub fn enroll(&mut self, identity: Identity) -> Result<()> {
        if self.is_started() {
            return Err(TourneyError::AlreadyStarted(self.id));
        }
        if !self.participants.insert(identity) {
            return Err(TourneyError::DuplicateJoin {
                id: self.id,
                identity,
            });
        }
        Ok(())
    }

    /// Move Open → Started.
    ///
    /// # Errors
    /// - `AlreadyStarted` if the record is not Open
    /// - `InsufficientParticipants` if fewer than `min_users` have joined
    pub fn mark_started(&mut self) -> Result<()> {
        if self.is_started() {
            return Err(TourneyError::AlreadyStarted(self.id));
        }
        if !self.threshold_met() {
            return Err(TourneyError::InsufficientParticipants {
                id: self.id,
                needed: self.min_users,
                current: self.user_count(),
            });
        }
        self.transition(TournamentPhase::Started)
    }

    /// Check that the record can be settled right now.
    ///
    /// # Errors
    /// - `NotActive` if the record was never started
    /// - `AlreadyFinished` if the record is already settled
    pub fn ensure_settleable(&self) -> Result<()> {
        match self.phase {
            TournamentPhase::Open => Err(TourneyError::NotActive(self.id)),
            TournamentPhase::Ended => Err(TourneyError::AlreadyFinished(self.id)),
            TournamentPhase::Started => Ok(()),
        }
    }

    /// Record validated scores and move Started → Ended.
    ///
    /// The caller is responsible for validating the sheet against the
    /// settlement policy; this only guards the phase.
    pub fn settle(&mut self, scores: BTreeMap<Identity, Score>) -> Result<()> {
        self.ensure_settleable()?;
        self.transition(TournamentPhase::Ended)?;
        self.scores = scores;
        Ok(())
    }

    /// Recorded score for `identity`, if settled.
    #[must_use]
    pub fn score_of(&self, identity: &Identity) -> Option<Score> {
        self.scores.get(identity).copied()
    }

    fn transition(&mut self, target: TournamentPhase) -> Result<()> {
        if !self.phase.can_transition_to(target) {
            return Err(TourneyError::IllegalTransition {
                id: self.id,
                from: self.phase,
                to: target,
            });
        }
        self.phase = target;
        Ok(())
    }
}

/// Compact view of a record, as yielded by the active-set query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentSummary {
    pub id: TournamentId,
    pub min_users: u64,
    pub user_count: usize,
    pub phase: TournamentPhase,
}

impl From<&Tournament> for TournamentSummary {
    fn from(t: &Tournament) -> Self {
        Self {
            id: t.id,
            min_users: t.min_users,
            user_count: t.user_count(),
            phase: t.phase,
        }
    }
}

/// Full read-only view of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentDetails {
    pub id: TournamentId,
    pub min_users: u64,
    pub user_count: usize,
    pub participants: Vec<Identity>,
    pub is_started: bool,
    pub is_finished: bool,
    pub phase: TournamentPhase,
}

impl From<&Tournament> for TournamentDetails {
    fn from(t: &Tournament) -> Self {
        Self {
            id: t.id,
            min_users: t.min_users,
            user_count: t.user_count(),
            participants: t.participants.iter().copied().collect(),
            is_started: t.is_started(),
            is_finished: t.is_finished(),
            phase: t.phase,
        }
    }
}

/// Answer to a player-score query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerScore {
    /// A score was recorded for this player at settlement.
    Settled(Score),
    /// No score recorded: not settled yet, or not part of the settled sheet.
    NotYetSettled,
}

impl PlayerScore {
    #[must_use]
    pub fn settled(&self) -> Option<Score> {
        match self {
            Self::Settled(score) => Some(*score),
            Self::NotYetSettled => None,
        }
    }
}
