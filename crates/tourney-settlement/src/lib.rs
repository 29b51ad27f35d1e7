//! # tourney-settlement
//!
//! **Settlement Engine**: validates owner-supplied score sheets and applies
//! them to a Started tournament, moving it to its terminal ENDED phase.
//!
//! ## Flow
//!
//! ```text
//! (participants[], scores[]) → ScoreSheet::from_parallel()   length check
//!     → SettlementEngine::validate()                         state, duplicates, policy
//!     → Tournament::settle()                                 scores written, STARTED → ENDED
//! ```
//!
//! Membership and completeness rules are governed by a
//! [`SettlementPolicy`](tourney_types::SettlementPolicy).

pub mod engine;
pub mod score_sheet;

pub use engine::{SettlementEngine, SettlementReport};
pub use score_sheet::ScoreSheet;
