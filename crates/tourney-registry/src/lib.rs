//! # tourney-registry
//!
//! **Tournament Registry**: the append-only, id-indexed store of tournaments
//! and the lifecycle operations that mutate it.
//!
//! ## Architecture
//!
//! 1. **AccessControl**: single owner fixed at construction, gates create / start / end
//! 2. **TournamentRegistry**: dense arena + counter; create, join, start, end, queries
//! 3. **ActiveTournaments**: derived, lazy view of every record not yet Ended
//! 4. **EventJournal**: append-only, digest-chained log of committed events
//! 5. **RegistrySnapshot**: persisted state layout, validated on restore
//! 6. **SharedRegistry**: `RwLock` handle for concurrent callers
//!
//! ## Lifecycle
//!
//! ```text
//! create ─▶ OPEN ──join*──▶ OPEN ──start──▶ STARTED ──end(scores)──▶ ENDED
//! ```
//!
//! Each committed operation returns exactly one event; each rejected one
//! returns a [`TourneyError`](tourney_types::TourneyError) and changes nothing.

pub mod access;
pub mod active;
pub mod journal;
pub mod registry;
pub mod shared;
pub mod snapshot;

pub use access::AccessControl;
pub use active::ActiveTournaments;
pub use journal::{EventJournal, JournalEntry};
pub use registry::TournamentRegistry;
pub use shared::SharedRegistry;
pub use snapshot::RegistrySnapshot;
