//! Two-source record list behind every page
//!
//! A page shows the bundled seed, the collaborator-backed live list, or a
//! combination of both, as decided by its [`MergePolicy`]. Fetches are issued
//! and settled separately so that overlapping fetches resolve according to
//! the configured [`FetchOrdering`].

use dashboard_core::config::{FetchOrdering, MergePolicy};
use dashboard_core::types::{Origin, Tagged};
use dashboard_store::StoredRecord;
use tracing::debug;

/// Identifies one issued fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FetchTicket(u64);

/// Seed and live records merged into one displayed list
#[derive(Debug, Clone)]
pub struct DataSource<R> {
    seed: Vec<R>,
    live: Vec<R>,
    merge: MergePolicy,
    ordering: FetchOrdering,
    issued: u64,
    applied: Option<u64>,
    in_flight: usize,
    merged: Vec<Tagged<R>>,
}

impl<R: StoredRecord> DataSource<R> {
    /// Source showing `seed` until live records arrive
    #[must_use]
    pub fn new(seed: Vec<R>, merge: MergePolicy, ordering: FetchOrdering) -> Self {
        let mut source = Self {
            seed,
            live: Vec::new(),
            merge,
            ordering,
            issued: 0,
            applied: None,
            in_flight: 0,
            merged: Vec::new(),
        };
        source.remerge();
        source
    }

    /// Displayed records, each tagged with its origin
    pub fn records(&self) -> &[Tagged<R>] {
        &self.merged
    }

    /// Last applied live list
    pub fn live(&self) -> &[R] {
        &self.live
    }

    /// Bundled records
    pub fn seed(&self) -> &[R] {
        &self.seed
    }

    /// Merge policy in force
    pub const fn merge_policy(&self) -> MergePolicy {
        self.merge
    }

    /// Whether any issued fetch has not settled yet
    pub const fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    /// Displayed record with `id`
    pub fn find(&self, id: &str) -> Option<&Tagged<R>> {
        self.merged.iter().find(|t| t.record.id() == id)
    }

    /// Origin of the displayed record with `id`
    pub fn origin_of(&self, id: &str) -> Option<Origin> {
        self.find(id).map(|t| t.origin)
    }

    /// Register a new fetch
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.issued += 1;
        self.in_flight += 1;
        FetchTicket(self.issued)
    }

    /// Settle a fetch with its records
    ///
    /// Returns whether the records replaced the live list. Under
    /// [`FetchOrdering::LatestIssued`] a fetch older than the last applied one
    /// is dropped.
    pub fn complete_fetch(&mut self, ticket: FetchTicket, records: Vec<R>) -> bool {
        self.settle();
        let stale = self.ordering == FetchOrdering::LatestIssued
            && self.applied.is_some_and(|applied| ticket.0 < applied);
        if stale {
            debug!(
                collection = R::COLLECTION,
                ticket = ticket.0,
                "Discarding superseded fetch"
            );
            return false;
        }

        self.applied = Some(ticket.0);
        self.live = records;
        self.remerge();
        true
    }

    /// Settle a fetch that failed; the displayed list is kept
    pub fn fail_fetch(&mut self, _ticket: FetchTicket) {
        self.settle();
    }

    const fn settle(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    fn remerge(&mut self) {
        let live = self.live.iter().cloned().map(Tagged::live);
        let seed = self.seed.iter().cloned().map(Tagged::seed);
        self.merged = match self.merge {
            MergePolicy::LiveOrSeed if self.live.is_empty() => seed.collect(),
            MergePolicy::LiveOrSeed | MergePolicy::LiveOnly => live.collect(),
            MergePolicy::LiveThenSeed => live.chain(seed).collect(),
            MergePolicy::SeedOnly => seed.collect(),
        };
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use dashboard_core::seed;
    use dashboard_core::types::Client;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn live_clients() -> Vec<Client> {
        seed::clients()
            .into_iter()
            .take(2)
            .map(|mut c| {
                c.id = format!("live-{}", c.id);
                c
            })
            .collect()
    }

    #[rstest]
    #[case(MergePolicy::LiveOrSeed, 5, 2)]
    #[case(MergePolicy::LiveThenSeed, 5, 7)]
    #[case(MergePolicy::SeedOnly, 5, 5)]
    #[case(MergePolicy::LiveOnly, 0, 2)]
    fn test_merge_policies(
        #[case] merge: MergePolicy,
        #[case] before_fetch: usize,
        #[case] after_fetch: usize,
    ) {
        let mut source = DataSource::new(seed::clients(), merge, FetchOrdering::LastSettled);
        assert_eq!(source.records().len(), before_fetch);

        let ticket = source.begin_fetch();
        assert!(source.complete_fetch(ticket, live_clients()));
        assert_eq!(source.records().len(), after_fetch);
    }

    #[test]
    fn test_live_records_come_first_and_are_tagged() {
        let mut source = DataSource::new(
            seed::clients(),
            MergePolicy::LiveThenSeed,
            FetchOrdering::LastSettled,
        );
        let ticket = source.begin_fetch();
        source.complete_fetch(ticket, live_clients());

        let origins: Vec<Origin> = source.records().iter().map(|t| t.origin).collect();
        assert_eq!(origins.first(), Some(&Origin::Live));
        assert_eq!(origins.last(), Some(&Origin::Seed));
        assert_eq!(source.origin_of("live-seed-c1"), Some(Origin::Live));
        assert_eq!(source.origin_of("seed-c1"), Some(Origin::Seed));
        assert_eq!(source.origin_of("nope"), None);
    }

    #[test]
    fn test_empty_live_falls_back_to_seed() {
        let mut source = DataSource::new(
            seed::access_logs(),
            MergePolicy::LiveOrSeed,
            FetchOrdering::LastSettled,
        );
        let ticket = source.begin_fetch();
        source.complete_fetch(ticket, Vec::new());
        assert_eq!(source.records().len(), 8);
        assert!(source.records().iter().all(|t| t.origin == Origin::Seed));
    }

    #[test]
    fn test_last_settled_overwrites_with_older_fetch() {
        let mut source =
            DataSource::new(Vec::new(), MergePolicy::LiveOnly, FetchOrdering::LastSettled);
        let first = source.begin_fetch();
        let second = source.begin_fetch();
        assert!(source.is_loading());

        assert!(source.complete_fetch(second, live_clients()));
        assert!(source.complete_fetch(first, Vec::new()));
        assert!(source.records().is_empty());
        assert!(!source.is_loading());
    }

    #[test]
    fn test_latest_issued_drops_superseded_fetch() {
        let mut source =
            DataSource::new(Vec::new(), MergePolicy::LiveOnly, FetchOrdering::LatestIssued);
        let first = source.begin_fetch();
        let second = source.begin_fetch();

        assert!(source.complete_fetch(second, live_clients()));
        assert!(!source.complete_fetch(first, Vec::new()));
        assert_eq!(source.records().len(), 2);
        assert!(!source.is_loading());
    }

    #[test]
    fn test_latest_issued_applies_in_order_completions() {
        let mut source =
            DataSource::new(Vec::new(), MergePolicy::LiveOnly, FetchOrdering::LatestIssued);
        let first = source.begin_fetch();
        let second = source.begin_fetch();

        assert!(source.complete_fetch(first, Vec::new()));
        assert!(source.complete_fetch(second, live_clients()));
        assert_eq!(source.records().len(), 2);
    }

    #[test]
    fn test_failed_fetch_keeps_list() {
        let mut source = DataSource::new(
            seed::clients(),
            MergePolicy::LiveThenSeed,
            FetchOrdering::LastSettled,
        );
        let ticket = source.begin_fetch();
        source.fail_fetch(ticket);
        assert_eq!(source.records().len(), 5);
        assert!(!source.is_loading());
    }
}
