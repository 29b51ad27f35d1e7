//! Settlement engine.
//!
//! Settling a Started tournament:
//! 1. Check the record is settleable (started, not finished)
//! 2. Reject duplicate entries in the sheet
//! 3. Reject entries for non-participants (policy)
//! 4. Reject incomplete sheets (policy)
//! 5. Record the scores and move the record to ENDED
//!
//! Validation runs to completion before anything is written, so a rejected
//! sheet leaves the record untouched.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tourney_types::{
    Identity, Result, Score, SettlementPolicy, Tournament, TournamentId, TourneyError,
};

use crate::score_sheet::ScoreSheet;

/// Outcome of a successful settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementReport {
    pub id: TournamentId,
    /// Participants that received a score.
    pub scored: usize,
    /// Participants left without a score (partial settlement).
    pub unscored: usize,
}

/// Validates score sheets against a record and a [`SettlementPolicy`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SettlementEngine {
    policy: SettlementPolicy,
}

impl SettlementEngine {
    #[must_use]
    pub fn new(policy: SettlementPolicy) -> Self {
        Self { policy }
    }

    #[must_use]
    pub fn policy(&self) -> SettlementPolicy {
        self.policy
    }

    /// Validate `sheet` for `tournament` and return the scores to record.
    ///
    /// # Errors
    /// - `NotActive` / `AlreadyFinished` if the record cannot be settled
    /// - `DuplicateSettlementEntry` if an identity appears twice
    /// - `NotAParticipant` if the policy rejects unknown identities
    /// - `IncompleteSettlement` if the policy forbids partial sheets
    pub fn validate(
        &self,
        tournament: &Tournament,
        sheet: &ScoreSheet,
    ) -> Result<BTreeMap<Identity, Score>> {
        tournament.ensure_settleable()?;

        if let Some(identity) = sheet.first_duplicate() {
            tracing::warn!(id = %tournament.id, %identity, "Settlement rejected: duplicate entry");
            return Err(TourneyError::DuplicateSettlementEntry(identity));
        }

        if self.policy.reject_non_participants {
            if let Some((identity, _)) = sheet
                .iter()
                .find(|(identity, _)| !tournament.has_participant(identity))
            {
                tracing::warn!(
                    id = %tournament.id,
                    identity = %identity,
                    "Settlement rejected: entry for non-participant"
                );
                return Err(TourneyError::NotAParticipant {
                    id: tournament.id,
                    identity: *identity,
                });
            }
        }

        let scores: BTreeMap<Identity, Score> = sheet.iter().copied().collect();

        if !self.policy.allow_partial {
            let supplied = scores
                .keys()
                .filter(|identity| tournament.has_participant(identity))
                .count();
            if supplied < tournament.user_count() {
                tracing::warn!(
                    id = %tournament.id,
                    supplied,
                    expected = tournament.user_count(),
                    "Settlement rejected: incomplete sheet"
                );
                return Err(TourneyError::IncompleteSettlement {
                    id: tournament.id,
                    expected: tournament.user_count(),
                    supplied,
                });
            }
        }

        Ok(scores)
    }

    /// Validate `sheet` and, if it passes, settle `tournament`.
    pub fn settle(&self, tournament: &mut Tournament, sheet: &ScoreSheet) -> Result<SettlementReport> {
        let scores = self.validate(tournament, sheet)?;
        let scored = scores
            .keys()
            .filter(|identity| tournament.has_participant(identity))
            .count();
        let unscored = tournament.user_count() - scored;

        tournament.settle(scores)?;

        tracing::debug!(id = %tournament.id, scored, unscored, "Settlement applied");

        Ok(SettlementReport {
            id: tournament.id,
            scored,
            unscored,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tourney_types::TournamentPhase;

    fn started_with(players: &[Identity]) -> Tournament {
        let mut t = Tournament::new(TournamentId(0), 1);
        for p in players {
            t.enroll(*p).unwrap();
        }
        t.mark_started().unwrap();
        t
    }

    #[test]
    fn settles_full_sheet() {
        let x = Identity::random();
        let y = Identity::random();
        let mut t = started_with(&[x, y]);
        let sheet = ScoreSheet::from_parallel(&[x, y], &[5, 9]).unwrap();

        let report = SettlementEngine::default().settle(&mut t, &sheet).unwrap();
        assert_eq!(report.scored, 2);
        assert_eq!(report.unscored, 0);
        assert_eq!(t.phase, TournamentPhase::Ended);
        assert_eq!(t.score_of(&y), Some(9));
    }

    #[test]
    fn default_policy_allows_partial() {
        let x = Identity::random();
        let y = Identity::random();
        let mut t = started_with(&[x, y]);
        let sheet = ScoreSheet::from_parallel(&[x], &[5]).unwrap();

        let report = SettlementEngine::default().settle(&mut t, &sheet).unwrap();
        assert_eq!(report.scored, 1);
        assert_eq!(report.unscored, 1);
        assert_eq!(t.score_of(&y), None);
    }

    #[test]
    fn strict_policy_rejects_partial() {
        let x = Identity::random();
        let y = Identity::random();
        let mut t = started_with(&[x, y]);
        let sheet = ScoreSheet::from_parallel(&[x], &[5]).unwrap();

        let err = SettlementEngine::new(SettlementPolicy::strict())
            .settle(&mut t, &sheet)
            .unwrap_err();
        assert!(matches!(
            err,
            TourneyError::IncompleteSettlement {
                expected: 2,
                supplied: 1,
                ..
            }
        ));
        assert_eq!(t.phase, TournamentPhase::Started);
        assert!(t.scores.is_empty());
    }

    #[test]
    fn non_participant_rejected_by_default() {
        let x = Identity::random();
        let stranger = Identity::random();
        let mut t = started_with(&[x]);
        let sheet = ScoreSheet::from_parallel(&[x, stranger], &[1, 2]).unwrap();

        let err = SettlementEngine::default().settle(&mut t, &sheet).unwrap_err();
        assert!(
            matches!(err, TourneyError::NotAParticipant { identity, .. } if identity == stranger),
            "Expected NotAParticipant, got: {err:?}"
        );
        assert!(!t.is_finished());
    }

    #[test]
    fn lenient_policy_records_non_participant() {
        let x = Identity::random();
        let stranger = Identity::random();
        let mut t = started_with(&[x]);
        let sheet = ScoreSheet::from_parallel(&[x, stranger], &[1, 2]).unwrap();

        let report = SettlementEngine::new(SettlementPolicy::lenient())
            .settle(&mut t, &sheet)
            .unwrap();
        assert_eq!(report.scored, 1);
        assert_eq!(t.score_of(&stranger), Some(2));
    }

    #[test]
    fn duplicate_entry_rejected() {
        let x = Identity::random();
        let mut t = started_with(&[x]);
        let sheet = ScoreSheet::from_pairs(vec![(x, 1), (x, 2)]);

        let err = SettlementEngine::new(SettlementPolicy::lenient())
            .settle(&mut t, &sheet)
            .unwrap_err();
        assert!(matches!(err, TourneyError::DuplicateSettlementEntry(id) if id == x));
    }

    #[test]
    fn state_checked_before_sheet_contents() {
        let x = Identity::random();
        let mut t = Tournament::new(TournamentId(4), 1);
        t.enroll(x).unwrap();
        // Sheet is bad in every way, but the record was never started.
        let sheet = ScoreSheet::from_pairs(vec![(x, 1), (x, 2)]);

        let err = SettlementEngine::default().settle(&mut t, &sheet).unwrap_err();
        assert!(matches!(err, TourneyError::NotActive(TournamentId(4))));
    }

    #[test]
    fn report_serializes() {
        let report = SettlementReport {
            id: TournamentId(2),
            scored: 3,
            unscored: 1,
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"scored\":3"));
    }
}
