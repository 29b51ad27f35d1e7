//! Error types for the tournament ledger core.
//!
//! All errors use the `TRN_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by taxonomy:
//! - 1xx: Authorization errors
//! - 2xx: Argument errors (malformed input)
//! - 3xx: Lifecycle state errors
//! - 9xx: General / internal errors

use thiserror::Error;

use crate::{Identity, TournamentId, TournamentPhase};

/// Coarse classification of a [`TourneyError`].
///
/// A front-end maps `Unauthorized`, `InvalidArgument` and `InvalidState` to
/// distinguishable client errors, and `Internal` to a server error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Unauthorized,
    InvalidArgument,
    InvalidState,
    Internal,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthorized => write!(f, "UNAUTHORIZED"),
            Self::InvalidArgument => write!(f, "INVALID_ARGUMENT"),
            Self::InvalidState => write!(f, "INVALID_STATE"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// Central error enum for all tournament operations.
#[derive(Debug, Error)]
pub enum TourneyError {
    // =================================================================
    // Authorization Errors (1xx)
    // =================================================================
    /// The caller is not the registry owner.
    #[error("TRN_ERR_100: Unauthorized access by {caller}")]
    Unauthorized { caller: Identity },

    // =================================================================
    // Argument Errors (2xx)
    // =================================================================
    /// `min_users` of zero.
    #[error("TRN_ERR_200: Invalid argument: zero threshold")]
    ZeroThreshold,

    /// The id is outside `0..counter`.
    #[error("TRN_ERR_201: Invalid argument: unknown id {id} (counter = {counter})")]
    UnknownTournament { id: TournamentId, counter: u64 },

    /// Participant and score arrays differ in length.
    #[error("TRN_ERR_202: Invalid argument: length mismatch ({participants} participants, {scores} scores)")]
    LengthMismatch { participants: usize, scores: usize },

    /// The same identity appears twice in one settlement sheet.
    #[error("TRN_ERR_203: Invalid argument: duplicate settlement entry for {0}")]
    DuplicateSettlementEntry(Identity),

    /// A settlement entry names someone who never joined.
    #[error("TRN_ERR_204: Invalid argument: {identity} is not a participant of {id}")]
    NotAParticipant { id: TournamentId, identity: Identity },

    /// Settlement policy requires every participant to be scored.
    #[error("TRN_ERR_205: Invalid argument: incomplete settlement for {id} ({supplied} of {expected} participants scored)")]
    IncompleteSettlement {
        id: TournamentId,
        expected: usize,
        supplied: usize,
    },

    /// An identity string could not be decoded.
    #[error("TRN_ERR_206: Invalid argument: malformed identity: {0}")]
    MalformedIdentity(String),

    // =================================================================
    // Lifecycle State Errors (3xx)
    // =================================================================
    /// Join or Start against a tournament that has left the Open phase.
    #[error("TRN_ERR_300: Invalid state: {0} already started")]
    AlreadyStarted(TournamentId),

    /// The caller is already enrolled.
    #[error("TRN_ERR_301: Invalid state: duplicate join of {identity} into {id}")]
    DuplicateJoin { id: TournamentId, identity: Identity },

    /// Not enough participants to start.
    #[error("TRN_ERR_302: Invalid state: insufficient participants for {id}: need {needed}, have {current}")]
    InsufficientParticipants {
        id: TournamentId,
        needed: u64,
        current: usize,
    },

    /// End against a tournament that was never started.
    #[error("TRN_ERR_303: Invalid state: {0} not active")]
    NotActive(TournamentId),

    /// End against a tournament that is already settled.
    #[error("TRN_ERR_304: Invalid state: {0} already finished")]
    AlreadyFinished(TournamentId),

    /// A phase transition the lifecycle does not admit.
    #[error("TRN_ERR_305: Invalid state: cannot move {id} from {from} to {to}")]
    IllegalTransition {
        id: TournamentId,
        from: TournamentPhase,
        to: TournamentPhase,
    },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error (poisoned lock, exhausted counter).
    #[error("TRN_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("TRN_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid config document, bad values).
    #[error("TRN_ERR_902: Configuration error: {0}")]
    Configuration(String),

    /// A snapshot failed invariant checks on restore.
    #[error("TRN_ERR_903: Corrupt snapshot: {reason}")]
    CorruptSnapshot { reason: String },
}

impl TourneyError {
    /// Taxonomy bucket of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::ZeroThreshold
            | Self::UnknownTournament { .. }
            | Self::LengthMismatch { .. }
            | Self::DuplicateSettlementEntry(_)
            | Self::NotAParticipant { .. }
            | Self::IncompleteSettlement { .. }
            | Self::MalformedIdentity(_) => ErrorKind::InvalidArgument,
            Self::AlreadyStarted(_)
            | Self::DuplicateJoin { .. }
            | Self::InsufficientParticipants { .. }
            | Self::NotActive(_)
            | Self::AlreadyFinished(_)
            | Self::IllegalTransition { .. } => ErrorKind::InvalidState,
            Self::Internal(_)
            | Self::Serialization(_)
            | Self::Configuration(_)
            | Self::CorruptSnapshot { .. } => ErrorKind::Internal,
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, TourneyError>;

impl From<serde_json::Error> for TourneyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
