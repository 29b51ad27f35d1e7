//! Append-only event journal with a chained digest.
//!
//! Each entry commits to every entry before it:
//!
//! ```text
//! digest[n] = SHA-256(domain || digest[n-1] || n || canonical_bytes(event[n]))
//! digest[-1] = JOURNAL_GENESIS
//! ```
//!
//! Rewriting, dropping or reordering any past event changes every later
//! digest, so the journal head is a compact commitment to the whole history.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tourney_types::{Result, TournamentEvent, TourneyError, constants};

/// One committed event and its position in the chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Zero-based position in the journal.
    pub sequence: u64,
    pub event: TournamentEvent,
    /// Chained digest up to and including this entry.
    pub digest: [u8; 32],
}

impl JournalEntry {
    #[must_use]
    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest)
    }
}

/// Append-only, digest-chained list of committed events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventJournal {
    entries: Vec<JournalEntry>,
}

impl EventJournal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a journal from stored entries, verifying the chain.
    ///
    /// # Errors
    /// Returns [`TourneyError::CorruptSnapshot`] if any digest or sequence
    /// number does not match.
    pub fn from_entries(entries: Vec<JournalEntry>) -> Result<Self> {
        let journal = Self { entries };
        journal.verify()?;
        Ok(journal)
    }

    /// Append `event` and return the new entry.
    pub fn append(&mut self, event: TournamentEvent) -> &JournalEntry {
        let sequence = self.entries.len() as u64;
        let digest = chain_digest(&self.head(), sequence, &event);
        self.entries.push(JournalEntry {
            sequence,
            event,
            digest,
        });
        &self.entries[self.entries.len() - 1]
    }

    /// Digest of the latest entry, or the genesis digest if empty.
    #[must_use]
    pub fn head(&self) -> [u8; 32] {
        self.entries
            .last()
            .map_or(constants::JOURNAL_GENESIS, |entry| entry.digest)
    }

    /// Recompute the whole chain and compare with the stored digests.
    ///
    /// # Errors
    /// Returns [`TourneyError::CorruptSnapshot`] at the first mismatch.
    pub fn verify(&self) -> Result<()> {
        let mut prev = constants::JOURNAL_GENESIS;
        for (position, entry) in self.entries.iter().enumerate() {
            let expected_sequence = position as u64;
            if entry.sequence != expected_sequence {
                return Err(TourneyError::CorruptSnapshot {
                    reason: format!(
                        "journal entry {position} carries sequence {}",
                        entry.sequence
                    ),
                });
            }
            let expected = chain_digest(&prev, expected_sequence, &entry.event);
            if expected != entry.digest {
                return Err(TourneyError::CorruptSnapshot {
                    reason: format!("journal digest mismatch at sequence {expected_sequence}"),
                });
            }
            prev = entry.digest;
        }
        Ok(())
    }

    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    pub fn events(&self) -> impl Iterator<Item = &TournamentEvent> {
        self.entries.iter().map(|entry| &entry.event)
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

fn chain_digest(prev: &[u8; 32], sequence: u64, event: &TournamentEvent) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(constants::JOURNAL_DOMAIN);
    hasher.update(prev);
    hasher.update(sequence.to_le_bytes());
    hasher.update(event.canonical_bytes());
    let result = hasher.finalize();
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&result);
    digest
}

#[cfg(test)]
mod tests {
    use tourney_types::{Identity, TournamentId};

    use super::*;

    fn sample() -> EventJournal {
        let id = TournamentId(0);
        let mut journal = EventJournal::new();
        journal.append(TournamentEvent::TournamentCreated { id, min_users: 1 });
        journal.append(TournamentEvent::UserJoined {
            id,
            user: Identity::from_bytes([5; 32]),
        });
        journal.append(TournamentEvent::TournamentStarted { id });
        journal
    }

    #[test]
    fn empty_journal_head_is_genesis() {
        let journal = EventJournal::new();
        assert!(journal.is_empty());
        assert_eq!(journal.head(), constants::JOURNAL_GENESIS);
        assert!(journal.verify().is_ok());
    }

    #[test]
    fn sequences_are_dense() {
        let journal = sample();
        let seqs: Vec<u64> = journal.entries().iter().map(|e| e.sequence).collect();
        assert_eq!(seqs, vec![0, 1, 2]);
        assert_eq!(journal.head(), journal.entries()[2].digest);
    }

    #[test]
    fn same_history_same_head() {
        assert_eq!(sample().head(), sample().head());
    }

    #[test]
    fn verify_detects_tampered_event() {
        let mut entries = sample().entries().to_vec();
        entries[1].event = TournamentEvent::UserJoined {
            id: TournamentId(0),
            user: Identity::from_bytes([6; 32]),
        };
        let err = EventJournal::from_entries(entries).unwrap_err();
        assert!(matches!(err, TourneyError::CorruptSnapshot { .. }));
    }

    #[test]
    fn verify_detects_dropped_entry() {
        let mut entries = sample().entries().to_vec();
        entries.remove(0);
        assert!(EventJournal::from_entries(entries).is_err());
    }

    #[test]
    fn digest_hex_is_64_chars() {
        let journal = sample();
        assert_eq!(journal.entries()[0].digest_hex().len(), 64);
    }
}
