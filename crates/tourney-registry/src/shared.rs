//! Thread-safe handle around a [`TournamentRegistry`].
//!
//! Mutations hold the write lock for the whole validate-then-mutate step;
//! the guard is dropped on every exit path, success or error. Queries hold
//! the read lock, run concurrently with each other, and only ever observe
//! fully committed state. No lock is held across a call out of the
//! registry: queries copy what they need before returning.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tourney_settlement::SettlementReport;
use tourney_types::{
    Committed, Identity, PlayerScore, RegistryConfig, Result, Score, TournamentDetails,
    TournamentId, TournamentSummary, TourneyError,
};

use crate::registry::TournamentRegistry;
use crate::snapshot::RegistrySnapshot;

/// Cloneable, shareable registry handle.
#[derive(Debug, Clone)]
pub struct SharedRegistry {
    inner: Arc<RwLock<TournamentRegistry>>,
}

impl SharedRegistry {
    #[must_use]
    pub fn new(owner: Identity) -> Self {
        Self::from_registry(TournamentRegistry::new(owner))
    }

    #[must_use]
    pub fn with_config(owner: Identity, config: RegistryConfig) -> Self {
        Self::from_registry(TournamentRegistry::with_config(owner, config))
    }

    #[must_use]
    pub fn from_registry(registry: TournamentRegistry) -> Self {
        Self {
            inner: Arc::new(RwLock::new(registry)),
        }
    }

    pub fn create_tournament(
        &self,
        caller: Identity,
        min_users: u64,
    ) -> Result<Committed<TournamentId>> {
        self.write()?.create_tournament(caller, min_users)
    }

    pub fn join_tournament(&self, caller: Identity, id: TournamentId) -> Result<Committed<()>> {
        self.write()?.join_tournament(caller, id)
    }

    pub fn start_tournament(&self, caller: Identity, id: TournamentId) -> Result<Committed<()>> {
        self.write()?.start_tournament(caller, id)
    }

    pub fn end_tournament(
        &self,
        caller: Identity,
        participants: &[Identity],
        scores: &[Score],
        id: TournamentId,
    ) -> Result<Committed<SettlementReport>> {
        self.write()?
            .end_tournament(caller, participants, scores, id)
    }

    /// Active summaries, collected under one read lock.
    pub fn active_tournaments(&self) -> Result<Vec<TournamentSummary>> {
        Ok(self.read()?.active_tournaments().collect())
    }

    pub fn tournament_details(&self, id: TournamentId) -> Result<TournamentDetails> {
        self.read()?.tournament_details(id)
    }

    pub fn player_score(&self, participant: &Identity, id: TournamentId) -> Result<PlayerScore> {
        self.read()?.player_score(participant, id)
    }

    pub fn counter(&self) -> Result<u64> {
        Ok(self.read()?.counter())
    }

    pub fn owner(&self) -> Result<Identity> {
        Ok(self.read()?.owner())
    }

    pub fn snapshot(&self) -> Result<RegistrySnapshot> {
        Ok(self.read()?.snapshot())
    }

    /// Run `f` against a consistent view of the registry.
    pub fn with_read<R>(&self, f: impl FnOnce(&TournamentRegistry) -> R) -> Result<R> {
        let guard = self.read()?;
        Ok(f(&guard))
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, TournamentRegistry>> {
        self.inner
            .read()
            .map_err(|_| TourneyError::Internal("registry lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, TournamentRegistry>> {
        self.inner
            .write()
            .map_err(|_| TourneyError::Internal("registry lock poisoned".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let owner = Identity::random();
        let a = SharedRegistry::new(owner);
        let b = a.clone();
        let id = a.create_tournament(owner, 1).unwrap().value;
        b.join_tournament(Identity::random(), id).unwrap();
        assert_eq!(a.tournament_details(id).unwrap().user_count, 1);
        assert_eq!(b.counter().unwrap(), 1);
    }

    #[test]
    fn failed_mutation_releases_lock() {
        let owner = Identity::random();
        let shared = SharedRegistry::new(owner);
        assert!(shared.create_tournament(Identity::random(), 1).is_err());
        // A leaked write guard would deadlock here.
        assert_eq!(shared.counter().unwrap(), 0);
        assert!(shared.create_tournament(owner, 1).is_ok());
    }

    #[test]
    fn with_read_sees_committed_state() {
        let owner = Identity::random();
        let shared = SharedRegistry::new(owner);
        shared.create_tournament(owner, 3).unwrap();
        let active = shared.with_read(|r| r.active_tournaments().count()).unwrap();
        assert_eq!(active, 1);
        assert_eq!(shared.owner().unwrap(), owner);
    }
}
