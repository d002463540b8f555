//! CRM clients page

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashboard_core::config::PagesConfig;
use dashboard_core::seed;
use dashboard_core::types::{Client, ClientPatch, ClientStatus, DealStage, Tagged};
use dashboard_core::Result;
use dashboard_protocol::clients::{PipelineCard, pipeline_board};
use dashboard_protocol::forms::{ClientForm, DealForm};
use dashboard_protocol::{
    ClientDialog, ClientFilter, ClientStats, ExportFormat, compute_aggregate, derive_view,
};
use dashboard_store::{ListQuery, RecordStore};
use indexmap::IndexMap;
use tracing::info;

use crate::export::ExportFile;
use crate::flow::{ensure_live, failed, fetch_into, refuse, reject};
use crate::notify::{Notice, Notifier};
use crate::source::DataSource;

/// Entity name used in export filenames
pub const EXPORT_ENTITY: &str = "clients";

/// State and actions of the clients page
pub struct ClientPage {
    store: Arc<dyn RecordStore<Client>>,
    notifier: Arc<dyn Notifier>,
    source: DataSource<Client>,

    /// Query and status selector
    pub filter: ClientFilter,
    /// Open dialog
    pub dialog: ClientDialog,
    /// Create and edit form
    pub form: ClientForm,
    /// New-deal form
    pub deal_form: DealForm,
}

impl std::fmt::Debug for ClientPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientPage")
            .field("records", &self.source.records().len())
            .field("filter", &self.filter)
            .field("dialog", &self.dialog)
            .finish_non_exhaustive()
    }
}

impl ClientPage {
    /// Page listing live clients ahead of the bundled ones
    pub fn new(
        store: Arc<dyn RecordStore<Client>>,
        notifier: Arc<dyn Notifier>,
        config: &PagesConfig,
    ) -> Self {
        Self {
            store,
            notifier,
            source: DataSource::new(
                seed::clients(),
                config.clients.merge,
                config.fetch_ordering,
            ),
            filter: ClientFilter::default(),
            dialog: ClientDialog::None,
            form: ClientForm::default(),
            deal_form: DealForm::default(),
        }
    }

    /// Merged record list
    pub const fn source(&self) -> &DataSource<Client> {
        &self.source
    }

    /// Clients passing the current filter
    pub fn view(&self) -> Vec<&Tagged<Client>> {
        derive_view(self.source.records(), &self.filter)
    }

    /// Header counters over the current view
    pub fn stats(&self) -> ClientStats {
        compute_aggregate(&self.view())
    }

    /// Deals of the displayed clients grouped by stage
    pub fn pipeline(&self) -> IndexMap<DealStage, Vec<PipelineCard<'_>>> {
        pipeline_board(self.view().into_iter().map(|t| &t.record))
    }

    /// Reset the query and the status selector
    pub fn clear_filters(&mut self) {
        self.filter.clear();
    }

    /// Open the detail dialog of a displayed client
    pub fn show_detail(&mut self, id: &str) -> bool {
        if self.source.find(id).is_none() {
            return false;
        }
        self.dialog = ClientDialog::Detail { id: id.to_string() };
        true
    }

    /// Fetch every stored client
    ///
    /// # Errors
    ///
    /// Returns the collaborator error after notifying.
    pub async fn load(&mut self) -> Result<usize> {
        fetch_into(self.store.as_ref(), &mut self.source, &ListQuery::all())
            .await
            .map_err(|e| {
                failed(self.notifier.as_ref(), "fetch_clients", "Failed to fetch clients", e)
            })
    }

    /// Open an empty create form
    pub fn open_create(&mut self) {
        self.form = ClientForm::default();
        self.dialog = ClientDialog::Create;
    }

    /// Open the edit form pre-filled from a live client
    ///
    /// # Errors
    ///
    /// Returns a read-only error for a sample client and a not-found error for
    /// an unknown one.
    pub fn open_edit(&mut self, id: &str) -> Result<()> {
        ensure_live(self.notifier.as_ref(), &self.source, id)?;
        let Some(tagged) = self.source.find(id) else {
            return Ok(());
        };

        let client = &tagged.record;
        let primary = client.primary_contact();
        self.form = ClientForm {
            id: Some(client.id.clone()),
            company: client.company.clone(),
            contact_name: client.name.clone(),
            contact_title: primary.map(|c| c.title.clone()),
            email: client.primary_email().to_string(),
            phone: primary.and_then(|c| c.phone.clone()),
            website: client.website.clone(),
            industry: client.industry.clone(),
            status: client.status,
        };
        self.dialog = ClientDialog::Edit { id: id.to_string() };
        Ok(())
    }

    /// Create a client from the form
    ///
    /// # Errors
    ///
    /// Returns a validation error or the collaborator error.
    pub async fn create_client(&mut self) -> Result<Client> {
        if let Err(form) = self.form.validate_for_create() {
            return Err(reject(self.notifier.as_ref(), form));
        }

        let created = self
            .store
            .create(self.form.to_draft())
            .await
            .map_err(|e| {
                failed(self.notifier.as_ref(), "create_client", "Failed to create client", e)
            })?;

        info!(id = %created.id, company = %created.company, "Client created");
        self.form = ClientForm::default();
        self.dialog.close();
        self.notifier.notify(
            Notice::success("Client created")
                .with_description(format!("{} has been added", created.company)),
        );
        self.refetch().await;
        Ok(created)
    }

    /// Save the edit form
    ///
    /// # Errors
    ///
    /// Returns a validation error, a read-only error for a sample client, or
    /// the collaborator error.
    pub async fn edit_client(&mut self) -> Result<Client> {
        let id = match self.form.validate_for_edit() {
            Ok(id) => id.to_string(),
            Err(form) => return Err(reject(self.notifier.as_ref(), form)),
        };

        let patch = ClientPatch::Details(self.form.to_draft());
        let updated = self
            .apply(&id, patch, "edit_client", "Failed to update client")
            .await?;

        self.form = ClientForm::default();
        self.dialog.close();
        self.notifier.notify(
            Notice::success("Client updated")
                .with_description(format!("{} has been updated", updated.company)),
        );
        self.refetch().await;
        Ok(updated)
    }

    /// Ask for confirmation before deleting a live client
    ///
    /// # Errors
    ///
    /// Returns a read-only error for a sample client and a not-found error for
    /// an unknown one.
    pub fn request_delete(&mut self, id: &str) -> Result<()> {
        ensure_live(self.notifier.as_ref(), &self.source, id)?;
        self.dialog = ClientDialog::ConfirmDelete { id: id.to_string() };
        Ok(())
    }

    /// Delete the client awaiting confirmation
    ///
    /// # Errors
    ///
    /// Returns a validation error when no deletion is pending, or the
    /// collaborator error.
    pub async fn confirm_delete(&mut self) -> Result<()> {
        let ClientDialog::ConfirmDelete { id } = &self.dialog else {
            return Err(refuse(self.notifier.as_ref(), "id", "No client selected for deletion"));
        };
        let id = id.clone();
        ensure_live(self.notifier.as_ref(), &self.source, &id)?;

        self.store.delete(&id).await.map_err(|e| {
            failed(self.notifier.as_ref(), "delete_client", "Failed to delete client", e)
        })?;

        info!(id = %id, "Client deleted");
        self.dialog.close();
        self.notifier.notify(Notice::success("Client deleted"));
        self.refetch().await;
        Ok(())
    }

    /// Mark a live client inactive
    ///
    /// # Errors
    ///
    /// Returns a read-only error for a sample client or the collaborator error.
    pub async fn archive_client(&mut self, id: &str) -> Result<Client> {
        let archived = self
            .apply(
                id,
                ClientPatch::Status(ClientStatus::Inactive),
                "archive_client",
                "Failed to archive client",
            )
            .await?;

        self.dialog.close();
        self.notifier.notify(
            Notice::success("Client archived")
                .with_description(format!("{} has been marked inactive", archived.company)),
        );
        self.refetch().await;
        Ok(archived)
    }

    /// Open the new-deal form for a live client
    ///
    /// # Errors
    ///
    /// Returns a read-only error for a sample client and a not-found error for
    /// an unknown one.
    pub fn open_add_deal(&mut self, id: &str) -> Result<()> {
        ensure_live(self.notifier.as_ref(), &self.source, id)?;
        if let Some(tagged) = self.source.find(id) {
            self.deal_form = DealForm::for_company(&tagged.record.company);
        }
        self.dialog = ClientDialog::AddDeal {
            client_id: id.to_string(),
        };
        Ok(())
    }

    /// Append the deal in the deal form to the client it was opened for
    ///
    /// # Errors
    ///
    /// Returns a validation error or the collaborator error.
    pub async fn create_deal(&mut self) -> Result<Client> {
        let ClientDialog::AddDeal { client_id } = &self.dialog else {
            return Err(refuse(
                self.notifier.as_ref(),
                "client_id",
                "No client selected for the deal",
            ));
        };
        let client_id = client_id.clone();
        let draft = match self.deal_form.to_draft() {
            Ok(draft) => draft,
            Err(form) => return Err(reject(self.notifier.as_ref(), form)),
        };
        let name = draft.name.clone();

        let updated = self
            .apply(
                &client_id,
                ClientPatch::AddDeal(draft),
                "create_deal",
                "Failed to create deal",
            )
            .await?;

        self.deal_form = DealForm::default();
        self.dialog.close();
        self.notifier.notify(
            Notice::success("Deal created").with_description(format!("{name} has been added")),
        );
        self.refetch().await;
        Ok(updated)
    }

    /// Refetch after a mutation; a failed fetch has already been reported
    async fn refetch(&mut self) {
        let _ = self.load().await;
    }

    async fn apply(
        &self,
        id: &str,
        patch: ClientPatch,
        action: &str,
        failure: &str,
    ) -> Result<Client> {
        ensure_live(self.notifier.as_ref(), &self.source, id)?;
        let updated = self
            .store
            .update(id, patch)
            .await
            .map_err(|e| failed(self.notifier.as_ref(), action, failure, e))?;
        info!(action, id = %updated.id, "Client updated");
        Ok(updated)
    }

    /// Render the current view
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn build_export(&self, format: ExportFormat, now: DateTime<Utc>) -> Result<ExportFile> {
        ExportFile::build(
            EXPORT_ENTITY,
            self.view().into_iter().map(|t| &t.record),
            format,
            now,
        )
    }

    /// Write the current view into `directory` and notify
    ///
    /// # Errors
    ///
    /// Returns a serialization or I/O error after notifying.
    pub async fn export_to(
        &mut self,
        directory: &Path,
        format: ExportFormat,
        now: DateTime<Utc>,
    ) -> Result<PathBuf> {
        let count = self.view().len();
        let file = self
            .build_export(format, now)
            .map_err(|e| failed(self.notifier.as_ref(), "export_clients", "Export failed", e))?;
        let path = file
            .write_to(directory)
            .await
            .map_err(|e| failed(self.notifier.as_ref(), "export_clients", "Export failed", e))?;

        self.dialog.close();
        self.notifier.notify(Notice::success("Export completed").with_description(format!(
            "{count} clients exported to {}",
            format.extension().to_uppercase()
        )));
        Ok(path)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use dashboard_core::Error;
    use crate::notify::MemoryNotifier;
    use dashboard_protocol::Selector;
    use dashboard_store::MemoryStore;
    use pretty_assertions::assert_eq;

    fn page() -> (ClientPage, Arc<MemoryStore<Client>>, Arc<MemoryNotifier>) {
        let store = Arc::new(MemoryStore::new());
        let notifier = Arc::new(MemoryNotifier::new());
        let page = ClientPage::new(store.clone(), notifier.clone(), &PagesConfig::default());
        (page, store, notifier)
    }

    #[test]
    fn test_stats_follow_the_filter() {
        let (mut page, _, _) = page();
        assert_eq!(page.stats().total_clients, 5);

        page.filter.status = Selector::Only(ClientStatus::Customer);
        let stats = page.stats();
        assert_eq!(stats.total_clients, 2);
        assert_eq!(stats.total_customers, 2);

        page.clear_filters();
        assert_eq!(page.view().len(), 5);
    }

    #[test]
    fn test_pipeline_has_every_column() {
        let (page, _, _) = page();
        let board = page.pipeline();
        assert_eq!(board.len(), 5);
        assert!(board.values().flatten().all(|card| !card.client_id.is_empty()));
    }

    #[test]
    fn test_sample_clients_cannot_be_edited() {
        let (mut page, _, notifier) = page();
        let result = page.open_edit("seed-c1");
        assert!(matches!(result, Err(Error::ReadOnly { .. })));
        assert_eq!(page.dialog, ClientDialog::None);
        assert_eq!(notifier.count(crate::notify::NoticeKind::Error), 1);
    }

    #[tokio::test]
    async fn test_create_requires_company() {
        let (mut page, store, notifier) = page();
        page.open_create();
        page.form.contact_name = "Dana Lee".to_string();
        page.form.email = "dana@example.com".to_string();

        let result = page.create_client().await;
        assert!(matches!(result, Err(Error::Validation { .. })));
        assert_eq!(store.calls().create, 0);
        assert_eq!(notifier.last().unwrap().message, ClientForm::CREATE_MESSAGE);
        assert_eq!(page.dialog, ClientDialog::Create);
    }
}
