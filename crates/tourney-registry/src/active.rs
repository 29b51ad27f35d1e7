//! Active-set view.
//!
//! "Active" means not yet Ended. Nothing is cached: every call walks the
//! registry arena from id 0, so the view always reflects the latest
//! committed mutation and yields summaries in ascending id order.

use std::iter::FusedIterator;

use tourney_types::{Tournament, TournamentSummary};

/// Lazy iterator over the summaries of active tournaments.
///
/// A clone continues from the same position. Call
/// [`TournamentRegistry::active_tournaments`](crate::TournamentRegistry::active_tournaments)
/// again for a fresh pass from id 0.
#[derive(Debug, Clone)]
pub struct ActiveTournaments<'a> {
    inner: std::slice::Iter<'a, Tournament>,
}

impl<'a> ActiveTournaments<'a> {
    pub(crate) fn new(tournaments: &'a [Tournament]) -> Self {
        Self {
            inner: tournaments.iter(),
        }
    }
}

impl Iterator for ActiveTournaments<'_> {
    type Item = TournamentSummary;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .by_ref()
            .find(|t| t.is_active())
            .map(TournamentSummary::from)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.inner.size_hint().1)
    }
}

impl FusedIterator for ActiveTournaments<'_> {}
