//! Page controllers for the dashboard
//!
//! Each page owns its local UI state (filter, open dialog, forms), a
//! [`DataSource`] merging bundled sample records with collaborator records,
//! and the mutation flows that go through a [`RecordStore`]. Outcomes reach the
//! user through a [`Notifier`].

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]
#![allow(clippy::module_name_repetitions)]

pub mod access_logs;
pub mod clients;
pub mod export;
pub mod feedback;
pub mod flow;
pub mod notify;
pub mod source;
pub mod summary;

pub use access_logs::{AccessLogExport, AccessLogPage};
pub use clients::ClientPage;
pub use export::ExportFile;
pub use feedback::FeedbackPage;
pub use notify::{MemoryNotifier, Notice, NoticeKind, Notifier, TracingNotifier};
pub use source::{DataSource, FetchTicket};
pub use summary::DashboardSummary;

use std::sync::Arc;

use dashboard_core::config::{Config, PagesConfig, StoreBackend};
use dashboard_core::types::{AccessLog, Client, Idea};
use dashboard_core::Result;
use dashboard_store::{MemoryStore, PgStore, RecordStore};
use tracing::info;

/// One collaborator per collection
#[derive(Clone)]
pub struct Stores {
    /// Access log entries
    pub access_logs: Arc<dyn RecordStore<AccessLog>>,
    /// CRM clients
    pub clients: Arc<dyn RecordStore<Client>>,
    /// Feedback ideas
    pub ideas: Arc<dyn RecordStore<Idea>>,
}

impl std::fmt::Debug for Stores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stores").finish_non_exhaustive()
    }
}

impl Stores {
    /// Empty in-process stores
    #[must_use]
    pub fn memory() -> Self {
        Self {
            access_logs: Arc::new(MemoryStore::new()),
            clients: Arc::new(MemoryStore::new()),
            ideas: Arc::new(MemoryStore::new()),
        }
    }

    /// The same database behind every collection
    #[must_use]
    pub fn postgres(store: &PgStore) -> Self {
        Self {
            access_logs: Arc::new(store.clone()),
            clients: Arc::new(store.clone()),
            ideas: Arc::new(store.clone()),
        }
    }

    /// Stores for the configured backend
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be reached or migrated.
    pub async fn from_config(config: &Config) -> Result<Self> {
        match config.store.backend {
            StoreBackend::Memory => {
                info!("Using in-memory stores");
                Ok(Self::memory())
            }
            StoreBackend::Postgres => {
                let store = PgStore::connect(&config.database).await?;
                store.migrate().await?;
                info!(
                    max_connections = config.database.max_connections,
                    "Connected to PostgreSQL"
                );
                Ok(Self::postgres(&store))
            }
        }
    }
}

/// The three pages sharing one notification sink
#[derive(Debug)]
pub struct Dashboard {
    /// Access logs page
    pub access_logs: AccessLogPage,
    /// Clients page
    pub clients: ClientPage,
    /// Feedback board
    pub feedback: FeedbackPage,
}

impl Dashboard {
    /// Build every page over `stores`
    pub fn new(stores: &Stores, notifier: &Arc<dyn Notifier>, config: &PagesConfig) -> Self {
        Self {
            access_logs: AccessLogPage::new(
                Arc::clone(&stores.access_logs),
                Arc::clone(notifier),
                config,
            ),
            clients: ClientPage::new(Arc::clone(&stores.clients), Arc::clone(notifier), config),
            feedback: FeedbackPage::new(Arc::clone(&stores.ideas), Arc::clone(notifier), config),
        }
    }

    /// Initial fetch of every page
    ///
    /// A page whose fetch fails keeps its bundled records; the failure has
    /// already been reported through the notifier.
    pub async fn load_all(&mut self) -> usize {
        let mut loaded = 0;
        loaded += self.access_logs.mount().await.unwrap_or_default();
        loaded += self.clients.load().await.unwrap_or_default();
        loaded += self.feedback.load().await.unwrap_or_default();
        loaded
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_memory_backend_from_default_config() {
        let stores = Stores::from_config(&Config::default()).await.unwrap();
        let notifier: Arc<dyn Notifier> = Arc::new(MemoryNotifier::new());
        let mut dashboard = Dashboard::new(&stores, &notifier, &PagesConfig::default());

        assert_eq!(dashboard.load_all().await, 0);
        assert_eq!(dashboard.access_logs.view().len(), 8);
        assert_eq!(dashboard.clients.view().len(), 5);
        assert_eq!(dashboard.feedback.view().len(), 6);
    }
}
