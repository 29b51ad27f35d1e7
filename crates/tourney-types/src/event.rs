//! Events emitted by committed lifecycle transitions.
//!
//! Every successful mutating operation produces exactly one
//! [`TournamentEvent`], returned to the caller inside [`Committed`] and
//! appended to the registry's journal. Failed operations produce none.

use serde::{Deserialize, Serialize};

use crate::{Identity, TournamentId};

/// A structured, observable record of one committed transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum TournamentEvent {
    /// A tournament was appended to the registry.
    TournamentCreated { id: TournamentId, min_users: u64 },
    /// `user` enrolled in an Open tournament.
    UserJoined { id: TournamentId, user: Identity },
    /// The tournament moved Open → Started.
    TournamentStarted { id: TournamentId },
    /// The tournament was settled and moved Started → Ended.
    TournamentEnded { id: TournamentId },
}

impl TournamentEvent {
    /// Stable event name for subscribers.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::TournamentCreated { .. } => "TournamentCreated",
            Self::UserJoined { .. } => "UserJoined",
            Self::TournamentStarted { .. } => "TournamentStarted",
            Self::TournamentEnded { .. } => "TournamentEnded",
        }
    }

    /// The tournament the event concerns.
    #[must_use]
    pub fn tournament_id(&self) -> TournamentId {
        match self {
            Self::TournamentCreated { id, .. }
            | Self::UserJoined { id, .. }
            | Self::TournamentStarted { id }
            | Self::TournamentEnded { id } => *id,
        }
    }

    /// Canonical byte encoding used for journal digests.
    ///
    /// Format: `tag(1) || id(8, LE) || payload`, where payload is
    /// `min_users(8, LE)` for creation, the 32-byte identity for a join,
    /// and empty otherwise.
    #[must_use]
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(41);
        match self {
            Self::TournamentCreated { id, min_users } => {
                bytes.push(1);
                bytes.extend_from_slice(&id.0.to_le_bytes());
                bytes.extend_from_slice(&min_users.to_le_bytes());
            }
            Self::UserJoined { id, user } => {
                bytes.push(2);
                bytes.extend_from_slice(&id.0.to_le_bytes());
                bytes.extend_from_slice(user.as_bytes());
            }
            Self::TournamentStarted { id } => {
                bytes.push(3);
                bytes.extend_from_slice(&id.0.to_le_bytes());
            }
            Self::TournamentEnded { id } => {
                bytes.push(4);
                bytes.extend_from_slice(&id.0.to_le_bytes());
            }
        }
        bytes
    }
}

impl std::fmt::Display for TournamentEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TournamentCreated { id, min_users } => {
                write!(f, "TournamentCreated({id}, min_users={min_users})")
            }
            Self::UserJoined { id, user } => write!(f, "UserJoined({id}, {user})"),
            Self::TournamentStarted { id } => write!(f, "TournamentStarted({id})"),
            Self::TournamentEnded { id } => write!(f, "TournamentEnded({id})"),
        }
    }
}

/// The result of a committed mutation plus the events it emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Committed<T> {
    pub value: T,
    pub events: Vec<TournamentEvent>,
}

impl<T> Committed<T> {
    #[must_use]
    pub fn new(value: T, event: TournamentEvent) -> Self {
        Self {
            value,
            events: vec![event],
        }
    }

    /// Discard the events and keep the value.
    pub fn into_value(self) -> T {
        self.value
    }
}
