//! Registry snapshots: the persisted state layout.
//!
//! A snapshot holds the owner, the counter, the settlement policy in force,
//! the dense record arena and the event journal. Restoring one re-checks
//! every registry invariant and replays the journal against the records,
//! so a tampered or truncated snapshot is refused instead of silently
//! loaded.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tourney_types::{
    Identity, RegistryConfig, Result, SettlementPolicy, Tournament, TournamentEvent, TournamentId,
    TournamentPhase, TourneyError, constants,
};

use crate::journal::{EventJournal, JournalEntry};
use crate::registry::TournamentRegistry;

/// Serializable image of a [`TournamentRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub version: u32,
    pub owner: Identity,
    pub counter: u64,
    /// Policy the registry settled under; score sheets are re-checked against it.
    #[serde(default)]
    pub settlement: SettlementPolicy,
    pub tournaments: Vec<Tournament>,
    pub journal: Vec<JournalEntry>,
}

impl RegistrySnapshot {
    /// Encode as JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode from JSON. Does not validate; see [`TournamentRegistry::restore`].
    pub fn from_json(doc: &str) -> Result<Self> {
        Ok(serde_json::from_str(doc)?)
    }
}

impl TournamentRegistry {
    /// Capture the full registry state.
    #[must_use]
    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            version: constants::SNAPSHOT_VERSION,
            owner: self.owner(),
            counter: self.counter(),
            settlement: self.config().settlement,
            tournaments: self.tournaments().to_vec(),
            journal: self.journal().entries().to_vec(),
        }
    }

    /// Rebuild a registry from `snapshot` after validating it.
    ///
    /// Recorded scores are checked against the policy stored in the
    /// snapshot. `config` only governs the restored registry from here on.
    ///
    /// # Errors
    /// Returns [`TourneyError::CorruptSnapshot`] if any invariant fails.
    pub fn restore(snapshot: RegistrySnapshot, config: RegistryConfig) -> Result<Self> {
        if snapshot.version != constants::SNAPSHOT_VERSION {
            return Err(corrupt(format!(
                "unsupported snapshot version {}",
                snapshot.version
            )));
        }
        if snapshot.counter != snapshot.tournaments.len() as u64 {
            return Err(corrupt(format!(
                "counter {} does not match {} records",
                snapshot.counter,
                snapshot.tournaments.len()
            )));
        }

        for (position, record) in snapshot.tournaments.iter().enumerate() {
            check_record(position, record, snapshot.settlement)?;
        }

        let journal = EventJournal::from_entries(snapshot.journal)?;
        check_replay(&journal, &snapshot.tournaments)?;

        tracing::info!(
            engine = constants::ENGINE_NAME,
            version = constants::VERSION,
            owner = %snapshot.owner,
            counter = snapshot.counter,
            events = journal.len(),
            "Registry restored from snapshot"
        );

        Ok(Self::from_parts(
            snapshot.owner,
            config,
            snapshot.tournaments,
            journal,
        ))
    }
}

fn corrupt(reason: String) -> TourneyError {
    TourneyError::CorruptSnapshot { reason }
}

fn check_record(position: usize, record: &Tournament, policy: SettlementPolicy) -> Result<()> {
    if record.id.0 != position as u64 {
        return Err(corrupt(format!(
            "record at position {position} carries {}",
            record.id
        )));
    }
    if record.min_users == 0 {
        return Err(corrupt(format!("{} has a zero threshold", record.id)));
    }
    if record.is_started() && !record.threshold_met() {
        return Err(corrupt(format!(
            "{} started below its threshold",
            record.id
        )));
    }
    if !record.is_finished() && !record.scores.is_empty() {
        return Err(corrupt(format!("{} has scores before settlement", record.id)));
    }
    if policy.reject_non_participants
        && record.scores.keys().any(|k| !record.has_participant(k))
    {
        return Err(corrupt(format!(
            "{} has scores for non-participants",
            record.id
        )));
    }
    Ok(())
}

/// Shadow of one record rebuilt from the journal.
struct Replayed {
    min_users: u64,
    participants: BTreeSet<Identity>,
    phase: TournamentPhase,
}

/// Replay journal events into a shadow arena and compare it with the
/// stored records (scores are not journaled and are not compared).
///
/// Every event must be legal at its position: joins only while Open and
/// only once per identity, phases only along Open → Started → Ended.
fn check_replay(journal: &EventJournal, records: &[Tournament]) -> Result<()> {
    let mut shadow: Vec<Replayed> = Vec::new();

    for event in journal.events() {
        match event {
            TournamentEvent::TournamentCreated { id, min_users } => {
                if id.0 != shadow.len() as u64 {
                    return Err(corrupt(format!("journal creates {id} out of order")));
                }
                shadow.push(Replayed {
                    min_users: *min_users,
                    participants: BTreeSet::new(),
                    phase: TournamentPhase::Open,
                });
            }
            TournamentEvent::UserJoined { id, user } => {
                let entry = shadow_entry(&mut shadow, *id)?;
                if entry.phase != TournamentPhase::Open {
                    return Err(corrupt(format!(
                        "journal joins {user} to {id} while {}",
                        entry.phase
                    )));
                }
                if !entry.participants.insert(*user) {
                    return Err(corrupt(format!("journal joins {user} to {id} twice")));
                }
            }
            TournamentEvent::TournamentStarted { id } => {
                replay_transition(&mut shadow, *id, TournamentPhase::Started)?;
            }
            TournamentEvent::TournamentEnded { id } => {
                replay_transition(&mut shadow, *id, TournamentPhase::Ended)?;
            }
        }
    }

    if shadow.len() != records.len() {
        return Err(corrupt(format!(
            "journal describes {} tournaments, snapshot holds {}",
            shadow.len(),
            records.len()
        )));
    }
    for (record, replayed) in records.iter().zip(&shadow) {
        if record.min_users != replayed.min_users
            || record.participants != replayed.participants
            || record.phase != replayed.phase
        {
            return Err(corrupt(format!("{} disagrees with the journal", record.id)));
        }
    }
    Ok(())
}

fn replay_transition(shadow: &mut [Replayed], id: TournamentId, to: TournamentPhase) -> Result<()> {
    let entry = shadow_entry(shadow, id)?;
    if !entry.phase.can_transition_to(to) {
        return Err(corrupt(format!(
            "journal moves {id} from {} to {to}",
            entry.phase
        )));
    }
    entry.phase = to;
    Ok(())
}

fn shadow_entry(shadow: &mut [Replayed], id: TournamentId) -> Result<&mut Replayed> {
    let index = id
        .index()
        .filter(|i| *i < shadow.len())
        .ok_or_else(|| corrupt(format!("journal references {id} before creation")))?;
    Ok(&mut shadow[index])
}
