//! The data-access contract the pages are written against

use std::convert::Infallible;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashboard_core::Result;
use dashboard_core::types::{AccessLog, AccessLogDraft, Client, ClientDraft, ClientPatch, Idea, IdeaDraft, IdeaPatch};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// A record type kept in a named collection
pub trait StoredRecord: Clone + Send + Sync + 'static {
    /// Payload accepted by `create`
    type Draft: Send + Sync + 'static;

    /// Change accepted by `update`
    type Patch: Send + Sync + 'static;

    /// Collection name, also used for table and notification channel names
    const COLLECTION: &'static str;

    /// Record identifier
    fn id(&self) -> &str;

    /// Creation time; lists are ordered by it, newest first
    fn created_at(&self) -> DateTime<Utc>;

    /// Materialise a new record
    fn from_draft(id: String, now: DateTime<Utc>, draft: Self::Draft) -> Self;

    /// Apply a change in place
    fn apply_patch(&mut self, patch: Self::Patch, now: DateTime<Utc>);
}

impl StoredRecord for AccessLog {
    type Draft = AccessLogDraft;
    // Entries are written by ingestion only
    type Patch = Infallible;

    const COLLECTION: &'static str = "access_logs";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn from_draft(id: String, now: DateTime<Utc>, draft: AccessLogDraft) -> Self {
        Self::from_draft(id, now, draft)
    }

    fn apply_patch(&mut self, patch: Infallible, _now: DateTime<Utc>) {
        match patch {}
    }
}

impl StoredRecord for Client {
    type Draft = ClientDraft;
    type Patch = ClientPatch;

    const COLLECTION: &'static str = "clients";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn from_draft(id: String, now: DateTime<Utc>, draft: ClientDraft) -> Self {
        Self::from_draft(id, now, draft)
    }

    fn apply_patch(&mut self, patch: ClientPatch, now: DateTime<Utc>) {
        Self::apply_patch(self, patch, now);
    }
}

impl StoredRecord for Idea {
    type Draft = IdeaDraft;
    type Patch = IdeaPatch;

    const COLLECTION: &'static str = "ideas";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn from_draft(id: String, now: DateTime<Utc>, draft: IdeaDraft) -> Self {
        Self::from_draft(id, now, draft)
    }

    fn apply_patch(&mut self, patch: IdeaPatch, now: DateTime<Utc>) {
        Self::apply_patch(self, patch, now);
    }
}

/// Options of a `list` call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Maximum number of records
    pub limit: Option<usize>,
    /// Only records created strictly before this instant
    pub created_before: Option<DateTime<Utc>>,
}

impl ListQuery {
    /// Everything, newest first
    #[must_use]
    pub const fn all() -> Self {
        Self {
            limit: None,
            created_before: None,
        }
    }

    /// Cap the number of records
    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Only records older than `cutoff`
    #[must_use]
    pub const fn created_before(mut self, cutoff: DateTime<Utc>) -> Self {
        self.created_before = Some(cutoff);
        self
    }

    /// Whether a record created at `created_at` passes the time bound
    #[must_use]
    pub fn admits(&self, created_at: DateTime<Utc>) -> bool {
        self.created_before.is_none_or(|cutoff| created_at < cutoff)
    }
}

/// Insert notifications of one collection
///
/// Each item is the identifier of a newly inserted record. Dropping the
/// subscription unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    receiver: mpsc::UnboundedReceiver<String>,
    forwarder: Option<JoinHandle<()>>,
}

impl Subscription {
    /// Subscription fed directly by the store
    #[must_use]
    pub const fn new(receiver: mpsc::UnboundedReceiver<String>) -> Self {
        Self {
            receiver,
            forwarder: None,
        }
    }

    /// Subscription fed by a background task, aborted on drop
    #[must_use]
    pub const fn with_forwarder(
        receiver: mpsc::UnboundedReceiver<String>,
        forwarder: JoinHandle<()>,
    ) -> Self {
        Self {
            receiver,
            forwarder: Some(forwarder),
        }
    }

    /// Next inserted id, `None` once the feed has closed
    pub async fn next(&mut self) -> Option<String> {
        self.receiver.recv().await
    }

    /// Next inserted id if one is already queued
    pub fn try_next(&mut self) -> Option<String> {
        self.receiver.try_recv().ok()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(forwarder) = self.forwarder.take() {
            forwarder.abort();
        }
    }
}

/// Data-access collaborator for one record type
///
/// Every operation is atomic from the caller's point of view. Implementations
/// report failures as [`dashboard_core::Error`]; callers treat all of them the
/// same way.
#[async_trait]
pub trait RecordStore<R: StoredRecord>: Send + Sync {
    /// Records matching `query`, newest first
    async fn list(&self, query: &ListQuery) -> Result<Vec<R>>;

    /// Persist a new record
    async fn create(&self, draft: R::Draft) -> Result<R>;

    /// Apply `patch` to the record with `id`
    async fn update(&self, id: &str, patch: R::Patch) -> Result<R>;

    /// Remove the record with `id`
    async fn delete(&self, id: &str) -> Result<()>;

    /// Feed of inserted record ids
    async fn subscribe(&self) -> Result<Subscription>;
}
