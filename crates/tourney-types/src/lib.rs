//! # tourney-types
//!
//! Shared types, errors, and configuration for the **Tourney** ledger core.
//!
//! This crate is the leaf dependency of the workspace. It defines:
//!
//! - **Identifiers**: [`TournamentId`], [`Identity`]
//! - **Tournament model**: [`Tournament`], [`TournamentPhase`], [`TournamentSummary`], [`TournamentDetails`], [`PlayerScore`]
//! - **Events**: [`TournamentEvent`], [`Committed`]
//! - **Configuration**: [`RegistryConfig`], [`SettlementPolicy`]
//! - **Errors**: [`TourneyError`] with `TRN_ERR_` prefix codes, classified by [`ErrorKind`]
//! - **Constants**: domain separators and version info

pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod ids;
pub mod tournament;

pub use config::*;
pub use error::*;
pub use event::*;
pub use ids::*;
pub use tournament::*;

// Constants are accessed via `tourney_types::constants::FOO`.
