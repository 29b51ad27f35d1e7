//! The tournament registry.
//!
//! An explicit store object: a dense arena of [`Tournament`] records indexed
//! by [`TournamentId`], the id counter, the owner capability and the event
//! journal. Independent registries can coexist freely.
//!
//! Every mutating operation validates first and writes last. A rejected
//! call returns an error, leaves the registry exactly as it was and emits
//! no event. A committed call returns [`Committed`] carrying one event.
//!
//! ## Check order
//!
//! | Operation | Checks, in order |
//! |-----------|------------------|
//! | create    | owner → threshold |
//! | join      | id → started → duplicate |
//! | start     | owner → id → started → participant count |
//! | end       | array lengths → owner → id → not active → already finished → duplicates → membership → completeness |

use tourney_settlement::{ScoreSheet, SettlementEngine, SettlementReport};
use tourney_types::{
    Committed, Identity, PlayerScore, RegistryConfig, Result, Score, Tournament,
    TournamentDetails, TournamentEvent, TournamentId, TourneyError,
};

use crate::access::AccessControl;
use crate::active::ActiveTournaments;
use crate::journal::EventJournal;

/// Append-only registry of tournaments with owner-gated lifecycle control.
#[derive(Debug, Clone)]
pub struct TournamentRegistry {
    access: AccessControl,
    config: RegistryConfig,
    settlement: SettlementEngine,
    /// Arena; position == id.
    tournaments: Vec<Tournament>,
    /// Number of records ever created; also the next id.
    counter: u64,
    journal: EventJournal,
}

impl TournamentRegistry {
    /// Empty registry owned by `owner`, default configuration.
    #[must_use]
    pub fn new(owner: Identity) -> Self {
        Self::with_config(owner, RegistryConfig::default())
    }

    #[must_use]
    pub fn with_config(owner: Identity, config: RegistryConfig) -> Self {
        Self {
            access: AccessControl::new(owner),
            settlement: SettlementEngine::new(config.settlement),
            config,
            tournaments: Vec::new(),
            counter: 0,
            journal: EventJournal::new(),
        }
    }

    /// Reassemble a registry from already-validated parts.
    pub(crate) fn from_parts(
        owner: Identity,
        config: RegistryConfig,
        tournaments: Vec<Tournament>,
        journal: EventJournal,
    ) -> Self {
        let counter = tournaments.len() as u64;
        Self {
            access: AccessControl::new(owner),
            settlement: SettlementEngine::new(config.settlement),
            config,
            tournaments,
            counter,
            journal,
        }
    }

    // -----------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------

    /// Append a new Open tournament. Owner only.
    ///
    /// # Errors
    /// - `Unauthorized` if `caller` is not the owner
    /// - `ZeroThreshold` if `min_users == 0`
    pub fn create_tournament(
        &mut self,
        caller: Identity,
        min_users: u64,
    ) -> Result<Committed<TournamentId>> {
        self.access.authorize(&caller)?;
        if min_users == 0 {
            return Err(TourneyError::ZeroThreshold);
        }

        let id = TournamentId(self.counter);
        let next = id
            .checked_next()
            .ok_or_else(|| TourneyError::Internal("tournament counter exhausted".to_string()))?;

        self.tournaments.push(Tournament::new(id, min_users));
        self.counter = next.0;

        tracing::info!(%id, min_users, counter = self.counter, "Tournament created");
        Ok(self.commit(id, TournamentEvent::TournamentCreated { id, min_users }))
    }

    /// Enroll `caller` in an Open tournament. Any caller.
    ///
    /// # Errors
    /// - `UnknownTournament` if `id` is out of range
    /// - `AlreadyStarted` if the tournament left the Open phase
    /// - `DuplicateJoin` if `caller` is already enrolled
    pub fn join_tournament(&mut self, caller: Identity, id: TournamentId) -> Result<Committed<()>> {
        let tournament = self.lookup_mut(id)?;
        tournament.enroll(caller)?;
        let participants = tournament.user_count();

        tracing::info!(%id, user = %caller, participants, "User joined");
        Ok(self.commit((), TournamentEvent::UserJoined { id, user: caller }))
    }

    /// Move an Open tournament to Started. Owner only.
    ///
    /// # Errors
    /// - `Unauthorized` if `caller` is not the owner
    /// - `UnknownTournament` if `id` is out of range
    /// - `AlreadyStarted` if the tournament is not Open
    /// - `InsufficientParticipants` if fewer than `min_users` joined
    pub fn start_tournament(&mut self, caller: Identity, id: TournamentId) -> Result<Committed<()>> {
        self.access.authorize(&caller)?;
        let tournament = self.lookup_mut(id)?;
        tournament.mark_started()?;
        let participants = tournament.user_count();

        tracing::info!(%id, participants, "Tournament started");
        Ok(self.commit((), TournamentEvent::TournamentStarted { id }))
    }

    /// Settle a Started tournament with parallel participant / score arrays
    /// and move it to Ended. Owner only.
    ///
    /// The length check runs before authorization: it inspects only the
    /// request, never registry state.
    ///
    /// # Errors
    /// - `LengthMismatch` if the arrays differ in length
    /// - `Unauthorized` if `caller` is not the owner
    /// - `UnknownTournament` if `id` is out of range
    /// - `NotActive` / `AlreadyFinished` if the tournament is not Started
    /// - `DuplicateSettlementEntry`, `NotAParticipant`, `IncompleteSettlement`
    ///   per the settlement policy
    pub fn end_tournament(
        &mut self,
        caller: Identity,
        participants: &[Identity],
        scores: &[Score],
        id: TournamentId,
    ) -> Result<Committed<SettlementReport>> {
        let sheet = ScoreSheet::from_parallel(participants, scores)?;
        self.access.authorize(&caller)?;

        let engine = self.settlement;
        let tournament = self.lookup_mut(id)?;
        let report = engine.settle(tournament, &sheet)?;

        tracing::info!(
            %id,
            scored = report.scored,
            unscored = report.unscored,
            "Tournament ended"
        );
        Ok(self.commit(report, TournamentEvent::TournamentEnded { id }))
    }

    // -----------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------

    /// Summaries of every tournament not yet Ended, ascending by id.
    pub fn active_tournaments(&self) -> ActiveTournaments<'_> {
        ActiveTournaments::new(&self.tournaments)
    }

    /// # Errors
    /// Returns `UnknownTournament` if `id` is out of range.
    pub fn tournament_details(&self, id: TournamentId) -> Result<TournamentDetails> {
        let tournament = self.lookup(id)?;
        tracing::debug!(%id, phase = %tournament.phase, "Details queried");
        Ok(TournamentDetails::from(tournament))
    }

    /// Recorded score of `participant` in tournament `id`.
    ///
    /// # Errors
    /// Returns `UnknownTournament` if `id` is out of range.
    pub fn player_score(&self, participant: &Identity, id: TournamentId) -> Result<PlayerScore> {
        let tournament = self.lookup(id)?;
        Ok(tournament
            .score_of(participant)
            .map_or(PlayerScore::NotYetSettled, PlayerScore::Settled))
    }

    /// Borrow a record.
    ///
    /// # Errors
    /// Returns `UnknownTournament` if `id` is out of range.
    pub fn tournament(&self, id: TournamentId) -> Result<&Tournament> {
        self.lookup(id)
    }

    /// All records, ascending by id.
    pub fn tournaments(&self) -> &[Tournament] {
        &self.tournaments
    }

    #[must_use]
    pub fn owner(&self) -> Identity {
        self.access.owner()
    }

    /// Number of tournaments ever created.
    #[must_use]
    pub fn counter(&self) -> u64 {
        self.counter
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tournaments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tournaments.is_empty()
    }

    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    #[must_use]
    pub fn journal(&self) -> &EventJournal {
        &self.journal
    }

    // -----------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------

    fn index_of(&self, id: TournamentId) -> Result<usize> {
        if id.0 >= self.counter {
            return Err(TourneyError::UnknownTournament {
                id,
                counter: self.counter,
            });
        }
        id.index()
            .ok_or_else(|| TourneyError::Internal(format!("{id} exceeds addressable range")))
    }

    fn lookup(&self, id: TournamentId) -> Result<&Tournament> {
        let index = self.index_of(id)?;
        self.tournaments
            .get(index)
            .ok_or_else(|| TourneyError::Internal(format!("{id} missing from arena")))
    }

    fn lookup_mut(&mut self, id: TournamentId) -> Result<&mut Tournament> {
        let index = self.index_of(id)?;
        self.tournaments
            .get_mut(index)
            .ok_or_else(|| TourneyError::Internal(format!("{id} missing from arena")))
    }

    fn commit<T>(&mut self, value: T, event: TournamentEvent) -> Committed<T> {
        let entry = self.journal.append(event.clone());
        tracing::debug!(
            event = event.name(),
            sequence = entry.sequence,
            digest = %entry.digest_hex(),
            "Event journaled"
        );
        Committed::new(value, event)
    }
}

#[cfg(test)]
mod tests {
    use tourney_types::{ErrorKind, SettlementPolicy, TournamentPhase};

    use super::*;

    fn setup() -> (TournamentRegistry, Identity) {
        let owner = Identity::random();
        (TournamentRegistry::new(owner), owner)
    }

    #[test]
    fn owner_is_fixed_at_construction() {
        let (registry, owner) = setup();
        assert_eq!(registry.owner(), owner);
        assert_eq!(registry.counter(), 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn create_assigns_dense_ids() {
        let (mut registry, owner) = setup();
        for expected in 0..3u64 {
            let committed = registry.create_tournament(owner, 2).unwrap();
            assert_eq!(committed.value, TournamentId(expected));
            assert_eq!(
                committed.events,
                vec![TournamentEvent::TournamentCreated {
                    id: TournamentId(expected),
                    min_users: 2
                }]
            );
        }
        assert_eq!(registry.counter(), 3);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn create_rejects_non_owner_before_threshold() {
        let (mut registry, _) = setup();
        let err = registry.create_tournament(Identity::random(), 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert_eq!(registry.counter(), 0);
    }

    #[test]
    fn create_rejects_zero_threshold() {
        let (mut registry, owner) = setup();
        let err = registry.create_tournament(owner, 0).unwrap_err();
        assert!(matches!(err, TourneyError::ZeroThreshold));
        assert_eq!(registry.counter(), 0);
        assert!(registry.journal().is_empty());
    }

    #[test]
    fn join_unknown_id() {
        let (mut registry, owner) = setup();
        registry.create_tournament(owner, 10).unwrap();
        let err = registry
            .join_tournament(Identity::random(), TournamentId(1))
            .unwrap_err();
        assert!(matches!(
            err,
            TourneyError::UnknownTournament {
                id: TournamentId(1),
                counter: 1
            }
        ));
    }

    #[test]
    fn join_emits_user_joined() {
        let (mut registry, owner) = setup();
        let id = registry.create_tournament(owner, 10).unwrap().value;
        let player = Identity::random();
        let committed = registry.join_tournament(player, id).unwrap();
        assert_eq!(
            committed.events,
            vec![TournamentEvent::UserJoined { id, user: player }]
        );
        assert_eq!(registry.tournament_details(id).unwrap().user_count, 1);
    }

    #[test]
    fn owner_may_join_as_player() {
        let (mut registry, owner) = setup();
        let id = registry.create_tournament(owner, 1).unwrap().value;
        registry.join_tournament(owner, id).unwrap();
        registry.start_tournament(owner, id).unwrap();
        assert!(registry.tournament(id).unwrap().is_started());
    }

    #[test]
    fn start_by_non_owner_rejected_before_id_check() {
        let (mut registry, _) = setup();
        let err = registry
            .start_tournament(Identity::random(), TournamentId(42))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }

    #[test]
    fn end_length_check_precedes_everything() {
        let (mut registry, _) = setup();
        let x = Identity::random();
        let err = registry
            .end_tournament(Identity::random(), &[x, x], &[1], TournamentId(99))
            .unwrap_err();
        assert!(matches!(err, TourneyError::LengthMismatch { .. }));
    }

    #[test]
    fn end_open_tournament_not_active() {
        let (mut registry, owner) = setup();
        let id = registry.create_tournament(owner, 1).unwrap().value;
        let x = Identity::random();
        registry.join_tournament(x, id).unwrap();
        let err = registry.end_tournament(owner, &[x], &[5], id).unwrap_err();
        assert!(matches!(err, TourneyError::NotActive(_)));
        assert_eq!(registry.tournament(id).unwrap().phase, TournamentPhase::Open);
    }

    #[test]
    fn player_score_before_and_after_settlement() {
        let (mut registry, owner) = setup();
        let id = registry.create_tournament(owner, 1).unwrap().value;
        let x = Identity::random();
        registry.join_tournament(x, id).unwrap();
        registry.start_tournament(owner, id).unwrap();
        assert_eq!(
            registry.player_score(&x, id).unwrap(),
            PlayerScore::NotYetSettled
        );

        registry.end_tournament(owner, &[x], &[5], id).unwrap();
        assert_eq!(registry.player_score(&x, id).unwrap(), PlayerScore::Settled(5));
        assert!(registry.player_score(&x, TournamentId(1)).is_err());
    }

    #[test]
    fn strict_config_flows_into_settlement() {
        let owner = Identity::random();
        let config = RegistryConfig {
            settlement: SettlementPolicy::strict(),
        };
        let mut registry = TournamentRegistry::with_config(owner, config);
        let id = registry.create_tournament(owner, 2).unwrap().value;
        let (x, y) = (Identity::random(), Identity::random());
        registry.join_tournament(x, id).unwrap();
        registry.join_tournament(y, id).unwrap();
        registry.start_tournament(owner, id).unwrap();

        let err = registry.end_tournament(owner, &[x], &[3], id).unwrap_err();
        assert!(matches!(err, TourneyError::IncompleteSettlement { .. }));
        registry.end_tournament(owner, &[x, y], &[3, 4], id).unwrap();
    }

    #[test]
    fn journal_tracks_every_commit() {
        let (mut registry, owner) = setup();
        let id = registry.create_tournament(owner, 1).unwrap().value;
        let x = Identity::random();
        registry.join_tournament(x, id).unwrap();
        let _ = registry.join_tournament(x, id);
        registry.start_tournament(owner, id).unwrap();
        registry.end_tournament(owner, &[x], &[1], id).unwrap();

        let names: Vec<&str> = registry.journal().events().map(TournamentEvent::name).collect();
        assert_eq!(
            names,
            vec!["TournamentCreated", "UserJoined", "TournamentStarted", "TournamentEnded"]
        );
        registry.journal().verify().unwrap();
    }
}
