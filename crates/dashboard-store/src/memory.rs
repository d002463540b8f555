//! In-process record store
//!
//! Backs the pages when no database is configured and in tests. Failures can
//! be injected and every call is counted so callers can assert which
//! collaborator operations ran.

use std::cmp::Reverse;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashboard_core::{Error, Result};
use parking_lot::{Mutex, RwLock};
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

use crate::record::{ListQuery, RecordStore, StoredRecord, Subscription};

/// Number of calls made to each operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    /// `list` calls
    pub list: usize,
    /// `create` calls
    pub create: usize,
    /// `update` calls
    pub update: usize,
    /// `delete` calls
    pub delete: usize,
    /// `subscribe` calls
    pub subscribe: usize,
}

impl CallCounts {
    /// Calls that change stored data
    #[must_use]
    pub const fn mutations(&self) -> usize {
        self.create + self.update + self.delete
    }
}

#[derive(Debug, Default)]
struct Counters {
    list: AtomicUsize,
    create: AtomicUsize,
    update: AtomicUsize,
    delete: AtomicUsize,
    subscribe: AtomicUsize,
}

impl Counters {
    fn snapshot(&self) -> CallCounts {
        CallCounts {
            list: self.list.load(Ordering::Relaxed),
            create: self.create.load(Ordering::Relaxed),
            update: self.update.load(Ordering::Relaxed),
            delete: self.delete.load(Ordering::Relaxed),
            subscribe: self.subscribe.load(Ordering::Relaxed),
        }
    }
}

/// Record store held in memory
#[derive(Debug)]
pub struct MemoryStore<R> {
    records: RwLock<Vec<R>>,
    subscribers: Mutex<Vec<mpsc::UnboundedSender<String>>>,
    failure: Mutex<Option<String>>,
    counters: Counters,
}

impl<R: StoredRecord> Default for MemoryStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: StoredRecord> MemoryStore<R> {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            subscribers: Mutex::new(Vec::new()),
            failure: Mutex::new(None),
            counters: Counters::default(),
        }
    }

    /// Store pre-populated with `records`
    #[must_use]
    pub fn with_records(records: Vec<R>) -> Self {
        let store = Self::new();
        *store.records.write() = records;
        store
    }

    /// Configure every call to fail with `message`
    #[must_use]
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.set_failure(Some(message.into()));
        self
    }

    /// Start or stop failing calls
    pub fn set_failure(&self, message: Option<String>) {
        *self.failure.lock() = message;
    }

    /// Calls made so far
    pub fn calls(&self) -> CallCounts {
        self.counters.snapshot()
    }

    /// Copy of the stored records in insertion order
    pub fn records(&self) -> Vec<R> {
        self.records.read().clone()
    }

    /// Stored record with `id`
    pub fn get(&self, id: &str) -> Option<R> {
        self.records.read().iter().find(|r| r.id() == id).cloned()
    }

    /// Insert a record as another client of the store would, notifying subscribers
    ///
    /// Not counted as a call.
    pub fn insert_external(&self, draft: R::Draft) -> R {
        let record = R::from_draft(Uuid::new_v4().to_string(), Utc::now(), draft);
        self.records.write().push(record.clone());
        self.notify(record.id());
        record
    }

    fn check_failure(&self) -> Result<()> {
        match self.failure.lock().as_ref() {
            Some(message) => Err(Error::Store(message.clone())),
            None => Ok(()),
        }
    }

    fn notify(&self, id: &str) {
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|sender| sender.send(id.to_string()).is_ok());
        debug!(
            collection = R::COLLECTION,
            id,
            subscribers = subscribers.len(),
            "Insert notified"
        );
    }

    fn not_found(id: &str) -> Error {
        Error::NotFound {
            resource: format!("{} record {id}", R::COLLECTION),
        }
    }
}

#[async_trait]
impl<R: StoredRecord> RecordStore<R> for MemoryStore<R> {
    async fn list(&self, query: &ListQuery) -> Result<Vec<R>> {
        self.counters.list.fetch_add(1, Ordering::Relaxed);
        self.check_failure()?;

        let mut records: Vec<R> = self
            .records
            .read()
            .iter()
            .filter(|r| query.admits(r.created_at()))
            .cloned()
            .collect();
        records.sort_by_key(|r| Reverse(r.created_at()));
        if let Some(limit) = query.limit {
            records.truncate(limit);
        }
        Ok(records)
    }

    async fn create(&self, draft: R::Draft) -> Result<R> {
        self.counters.create.fetch_add(1, Ordering::Relaxed);
        self.check_failure()?;

        let record = R::from_draft(Uuid::new_v4().to_string(), Utc::now(), draft);
        self.records.write().push(record.clone());
        self.notify(record.id());
        Ok(record)
    }

    async fn update(&self, id: &str, patch: R::Patch) -> Result<R> {
        self.counters.update.fetch_add(1, Ordering::Relaxed);
        self.check_failure()?;

        let mut records = self.records.write();
        let record = records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| Self::not_found(id))?;
        record.apply_patch(patch, Utc::now());
        Ok(record.clone())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.counters.delete.fetch_add(1, Ordering::Relaxed);
        self.check_failure()?;

        let mut records = self.records.write();
        let position = records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| Self::not_found(id))?;
        records.remove(position);
        Ok(())
    }

    async fn subscribe(&self) -> Result<Subscription> {
        self.counters.subscribe.fetch_add(1, Ordering::Relaxed);
        self.check_failure()?;

        let (sender, receiver) = mpsc::unbounded_channel();
        self.subscribers.lock().push(sender);
        Ok(Subscription::new(receiver))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Duration;
    use dashboard_core::seed;
    use dashboard_core::types::{
        AccessLog, AccessLogDraft, Client, ClientDraft, ClientPatch, ClientStatus, Idea,
        IdeaPatch,
    };
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_list_is_newest_first_and_limited() {
        let store = MemoryStore::with_records(seed::access_logs());

        let all = store.list(&ListQuery::all()).await.unwrap();
        assert_eq!(all.len(), 8);
        assert!(
            all.iter()
                .zip(all.iter().skip(1))
                .all(|(newer, older)| newer.timestamp >= older.timestamp)
        );

        let limited = store.list(&ListQuery::all().with_limit(3)).await.unwrap();
        assert_eq!(limited.len(), 3);
        assert_eq!(limited.first().unwrap().id, all.first().unwrap().id);
        assert_eq!(store.calls().list, 2);
    }

    #[tokio::test]
    async fn test_list_created_before() {
        let logs = seed::access_logs();
        let newest = logs.iter().map(|l| l.timestamp).max().unwrap();
        let store = MemoryStore::with_records(logs);

        let older = store
            .list(&ListQuery::all().created_before(newest))
            .await
            .unwrap();
        assert_eq!(older.len(), 7);
        assert!(older.iter().all(|l| l.timestamp < newest));

        let none = store
            .list(&ListQuery::all().created_before(newest - Duration::days(365)))
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_create_update_delete() {
        let store: MemoryStore<Client> = MemoryStore::new();

        let created = store
            .create(ClientDraft {
                company: "Northwind".to_string(),
                contact_name: "Ana Trujillo".to_string(),
                contact_title: None,
                email: "new@example.com".to_string(),
                phone: None,
                website: None,
                industry: "Other".to_string(),
                status: ClientStatus::Lead,
            })
            .await
            .unwrap();
        assert_eq!(created.health_score, Client::DEFAULT_HEALTH_SCORE);

        let updated = store
            .update(&created.id, ClientPatch::Status(ClientStatus::Customer))
            .await
            .unwrap();
        assert_eq!(updated.status, ClientStatus::Customer);
        assert_eq!(store.get(&created.id).unwrap().status, ClientStatus::Customer);

        store.delete(&created.id).await.unwrap();
        assert!(store.records().is_empty());
        assert_eq!(store.calls().mutations(), 3);
    }

    #[tokio::test]
    async fn test_missing_record_is_not_found() {
        let store = MemoryStore::with_records(seed::ideas());

        let result = store
            .update(
                "missing",
                IdeaPatch::Vote {
                    voter: "u1".to_string(),
                },
            )
            .await;
        assert!(matches!(result, Err(Error::NotFound { .. })));

        let result = store.delete("missing").await;
        assert!(matches!(result, Err(Error::NotFound { .. })));
        assert_eq!(store.records().len(), 6);
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let store: MemoryStore<Idea> = MemoryStore::new().with_failure("connection refused");

        let result = store.list(&ListQuery::all()).await;
        match result {
            Err(Error::Store(message)) => assert_eq!(message, "connection refused"),
            other => panic!("expected store error, got {other:?}"),
        }
        assert_eq!(store.calls().list, 1);

        store.set_failure(None);
        assert!(store.list(&ListQuery::all()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_subscribers_see_every_insert() {
        let store: MemoryStore<AccessLog> = MemoryStore::new();
        let mut first = store.subscribe().await.unwrap();
        let mut second = store.subscribe().await.unwrap();

        let external = store.insert_external(AccessLogDraft::admin(
            "/alerts/create",
            serde_json::json!({ "action": "alert_created" }),
        ));
        let created = store
            .create(AccessLogDraft::admin("/views/create", serde_json::Value::Null))
            .await
            .unwrap();

        assert_eq!(first.next().await, Some(external.id.clone()));
        assert_eq!(first.next().await, Some(created.id.clone()));
        assert_eq!(second.try_next(), Some(external.id));
        assert_eq!(store.calls().create, 1);
    }

    #[tokio::test]
    async fn test_dropped_subscription_is_pruned() {
        let store: MemoryStore<AccessLog> = MemoryStore::new();
        let subscription = store.subscribe().await.unwrap();
        drop(subscription);

        store.insert_external(AccessLogDraft::default());
        assert!(store.subscribers.lock().is_empty());
    }
}
