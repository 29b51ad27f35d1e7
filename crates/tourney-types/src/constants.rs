//! System-wide constants for the tournament ledger core.

/// Domain separator for the event journal digest chain.
pub const JOURNAL_DOMAIN: &[u8] = b"tourney:journal:v1:";

/// Digest of the (empty) journal before the first event.
pub const JOURNAL_GENESIS: [u8; 32] = [0u8; 32];

/// Snapshot format version written by `RegistrySnapshot`.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "Tourney";
