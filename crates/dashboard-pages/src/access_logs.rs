//! Access logs page
//!
//! Entries are read-only. Administrative actions such as blocking an address
//! or saving a view are recorded by appending a synthetic admin entry through
//! the collaborator, never by editing an existing one.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashboard_core::config::{AccessLogsPageConfig, PagesConfig};
use dashboard_core::seed;
use dashboard_core::types::{AccessLog, AccessLogDraft, LogLevel, LogStatus, Tagged};
use dashboard_core::Result;
use dashboard_protocol::access_logs::select_for_export;
use dashboard_protocol::forms::{AlertConfigForm, SaveViewForm, SavedViewFilters, WebhookForm};
use dashboard_protocol::{
    AccessLogDialog, AccessLogFilter, AccessLogStats, ExportFormat, ExportRange,
    compute_aggregate, derive_view,
};
use dashboard_store::{ListQuery, RecordStore, Subscription};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::export::ExportFile;
use crate::flow::{failed, fetch_into, refuse, reject};
use crate::notify::{Notice, Notifier};
use crate::source::DataSource;

/// Entity name used in export filenames
pub const EXPORT_ENTITY: &str = "access-logs";

/// Options of the export dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessLogExport {
    /// Time window
    pub range: ExportRange,
    /// Encoding
    pub format: ExportFormat,
    /// Apply the status and type filters of the page
    pub include_filters: bool,
}

impl Default for AccessLogExport {
    fn default() -> Self {
        Self {
            range: ExportRange::Week,
            format: ExportFormat::Csv,
            include_filters: true,
        }
    }
}

/// State and actions of the access logs page
pub struct AccessLogPage {
    store: Arc<dyn RecordStore<AccessLog>>,
    notifier: Arc<dyn Notifier>,
    source: DataSource<AccessLog>,
    settings: AccessLogsPageConfig,
    live_tail: Option<Subscription>,

    /// Query and selectors
    pub filter: AccessLogFilter,
    /// Open dialog
    pub dialog: AccessLogDialog,
    /// Alert settings dialog
    pub alert_form: AlertConfigForm,
    /// Save-view dialog
    pub view_form: SaveViewForm,
    /// Webhook dialog
    pub webhook_form: WebhookForm,
    /// Export dialog
    pub export: AccessLogExport,
}

impl std::fmt::Debug for AccessLogPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessLogPage")
            .field("records", &self.source.records().len())
            .field("filter", &self.filter)
            .field("dialog", &self.dialog)
            .field("live_tail", &self.live_tail.is_some())
            .finish_non_exhaustive()
    }
}

impl AccessLogPage {
    /// Page showing the bundled entries until the first fetch
    pub fn new(
        store: Arc<dyn RecordStore<AccessLog>>,
        notifier: Arc<dyn Notifier>,
        config: &PagesConfig,
    ) -> Self {
        let settings = config.access_logs.clone();
        Self {
            store,
            notifier,
            source: DataSource::new(seed::access_logs(), settings.merge, config.fetch_ordering),
            settings,
            live_tail: None,
            filter: AccessLogFilter::default(),
            dialog: AccessLogDialog::None,
            alert_form: AlertConfigForm::default(),
            view_form: SaveViewForm::default(),
            webhook_form: WebhookForm::default(),
            export: AccessLogExport::default(),
        }
    }

    /// Merged record list
    pub const fn source(&self) -> &DataSource<AccessLog> {
        &self.source
    }

    /// Entries passing the current filter, in list order
    pub fn view(&self) -> Vec<&Tagged<AccessLog>> {
        derive_view(self.source.records(), &self.filter)
    }

    /// Header counters over every displayed entry; the filter does not apply
    pub fn stats(&self) -> AccessLogStats {
        compute_aggregate(self.source.records())
    }

    /// Reset the query and every selector
    pub fn clear_filters(&mut self) {
        self.filter.clear();
    }

    /// Open the detail dialog of a displayed entry
    pub fn show_detail(&mut self, id: &str) -> bool {
        if self.source.find(id).is_none() {
            return false;
        }
        self.dialog = AccessLogDialog::Detail { id: id.to_string() };
        true
    }

    /// Fetch the newest entries
    ///
    /// # Errors
    ///
    /// Returns the collaborator error after notifying.
    pub async fn load(&mut self) -> Result<usize> {
        let query = ListQuery::all().with_limit(self.settings.fetch_limit);
        fetch_into(self.store.as_ref(), &mut self.source, &query)
            .await
            .map_err(|e| failed(self.notifier.as_ref(), "fetch_logs", "Failed to fetch logs", e))
    }

    /// First fetch, then the live tail when the configuration asks for it
    ///
    /// # Errors
    ///
    /// Returns the first collaborator error after notifying.
    pub async fn mount(&mut self) -> Result<usize> {
        let count = self.load().await?;
        if self.settings.live_tail {
            self.enable_live_tail().await?;
        }
        Ok(count)
    }

    /// Fetch and confirm with a notice
    ///
    /// # Errors
    ///
    /// Returns the collaborator error after notifying.
    pub async fn refresh(&mut self) -> Result<usize> {
        let count = self.load().await?;
        self.notifier.notify(Notice::info("Logs refreshed"));
        Ok(count)
    }

    /// Append one admin entry, then close the dialog, notify and refetch
    async fn record_admin_action(
        &mut self,
        action: &str,
        draft: AccessLogDraft,
        success: Notice,
        failure: &str,
    ) -> Result<AccessLog> {
        let created = self
            .store
            .create(draft)
            .await
            .map_err(|e| failed(self.notifier.as_ref(), action, failure, e))?;

        info!(action, id = %created.id, resource = %created.resource, "Admin action recorded");
        self.dialog.close();
        self.notifier.notify(success);
        self.refetch().await;
        Ok(created)
    }

    /// Block `ip` by appending a blocked entry against it
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank address or the collaborator error.
    pub async fn block_ip(&mut self, ip: &str) -> Result<AccessLog> {
        let ip = ip.trim();
        if ip.is_empty() {
            return Err(refuse(self.notifier.as_ref(), "ip", "Please enter an IP address"));
        }

        let draft = AccessLogDraft {
            status: LogStatus::Blocked,
            level: LogLevel::Warn,
            method: "POST".to_string(),
            status_code: 403,
            ip_address: Some(ip.to_string()),
            is_suspicious: true,
            ..AccessLogDraft::admin(
                format!("/blocked-ips/{ip}"),
                json!({ "action": "ip_blocked", "ip": ip }),
            )
        };
        let success =
            Notice::success("IP blocked").with_description(format!("{ip} has been added to blocklist"));
        self.record_admin_action("block_ip", draft, success, "Failed to block IP")
            .await
    }

    /// Record a new alert with the current alert settings
    ///
    /// # Errors
    ///
    /// Returns the collaborator error.
    pub async fn create_alert(&mut self) -> Result<AccessLog> {
        let draft = AccessLogDraft::admin(
            "/alerts/create",
            json!({
                "action": "alert_created",
                "threshold": self.alert_form.threshold,
                "time_window": self.alert_form.time_window,
            }),
        );
        self.record_admin_action(
            "create_alert",
            draft,
            Notice::success("Alert created"),
            "Failed to create alert",
        )
        .await
    }

    /// Save the alert settings form
    ///
    /// # Errors
    ///
    /// Returns a validation error or the collaborator error.
    pub async fn save_alert_config(&mut self) -> Result<AccessLog> {
        if let Err(form) = self.alert_form.validate_form() {
            return Err(reject(self.notifier.as_ref(), form));
        }

        let draft = AccessLogDraft::admin(
            "/alerts/configure",
            json!({ "action": "alert_configured", "config": self.alert_form }),
        );
        let created = self
            .record_admin_action(
                "save_alert_config",
                draft,
                Notice::success("Alert settings saved"),
                "Failed to save alert settings",
            )
            .await?;
        self.alert_form = AlertConfigForm::default();
        Ok(created)
    }

    /// Save the current filters under the name in the view form
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank name or the collaborator error.
    pub async fn save_view(&mut self) -> Result<AccessLog> {
        if let Err(form) = self.view_form.validate_form() {
            return Err(reject(self.notifier.as_ref(), form));
        }

        let name = self.view_form.name.trim().to_string();
        let filters = SavedViewFilters {
            status: self.filter.status,
            level: self.filter.level,
            access_type: self.filter.access_type,
        };
        let draft = AccessLogDraft::admin(
            "/views/create",
            json!({
                "action": "view_saved",
                "name": name,
                "is_default": self.view_form.is_default,
                "query": self.filter.query,
                "filters": filters,
            }),
        );
        let success =
            Notice::success("View saved").with_description(format!("\"{name}\" has been saved"));
        let created = self
            .record_admin_action("save_view", draft, success, "Failed to save view")
            .await?;
        self.view_form = SaveViewForm::default();
        Ok(created)
    }

    /// Connect the webhook in the webhook form
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank URL or the collaborator error.
    pub async fn connect_webhook(&mut self) -> Result<AccessLog> {
        if let Err(form) = self.webhook_form.validate_form() {
            return Err(reject(self.notifier.as_ref(), form));
        }

        let url = self.webhook_form.url.trim().to_string();
        let draft = AccessLogDraft::admin(
            "/integrations/webhook",
            json!({ "action": "webhook_connected", "url": url }),
        );
        let success = Notice::success("Webhook connected")
            .with_description(format!("Events will be sent to {url}"));
        let created = self
            .record_admin_action("connect_webhook", draft, success, "Failed to connect webhook")
            .await?;
        self.webhook_form = WebhookForm::default();
        Ok(created)
    }

    /// Delete stored entries older than the retention period
    ///
    /// Returns the number of entries removed.
    ///
    /// # Errors
    ///
    /// Returns the first collaborator error; entries deleted before it stay deleted.
    pub async fn clear_old_logs(&mut self, now: DateTime<Utc>) -> Result<usize> {
        let cutoff = now - Duration::days(self.settings.retention_days);
        let result = self.delete_older_than(cutoff).await;
        let removed = result
            .map_err(|e| failed(self.notifier.as_ref(), "clear_old_logs", "Failed to clear logs", e))?;

        info!(removed, cutoff = %cutoff, "Old logs cleared");
        self.dialog.close();
        self.notifier.notify(Notice::success("Old logs archived").with_description(format!(
            "Logs older than {} days have been removed",
            self.settings.retention_days
        )));
        self.refetch().await;
        Ok(removed)
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        let expired = self
            .store
            .list(&ListQuery::all().created_before(cutoff))
            .await?;
        for log in &expired {
            self.store.delete(&log.id).await?;
        }
        Ok(expired.len())
    }

    /// Refetch after a mutation; a failed fetch has already been reported
    async fn refetch(&mut self) {
        let _ = self.load().await;
    }

    /// Open the insert subscription
    ///
    /// # Errors
    ///
    /// Returns the collaborator error after notifying.
    pub async fn enable_live_tail(&mut self) -> Result<()> {
        if self.live_tail.is_some() {
            return Ok(());
        }
        let subscription = self.store.subscribe().await.map_err(|e| {
            failed(self.notifier.as_ref(), "enable_live_tail", "Live tail unavailable", e)
        })?;
        self.live_tail = Some(subscription);
        info!("Live tail enabled");
        Ok(())
    }

    /// Drop the insert subscription
    pub fn disable_live_tail(&mut self) {
        if self.live_tail.take().is_some() {
            info!("Live tail disabled");
        }
    }

    /// Whether the insert subscription is open
    pub const fn is_live_tail(&self) -> bool {
        self.live_tail.is_some()
    }

    /// Wait for the next insert and refetch once for it
    ///
    /// Returns the inserted id, or `None` when the tail is off or its feed has
    /// closed; a closed feed turns the tail off.
    pub async fn next_live_insert(&mut self) -> Option<String> {
        let Some(id) = self.live_tail.as_mut()?.next().await else {
            warn!("Live tail feed closed");
            self.live_tail = None;
            return None;
        };
        self.refetch().await;
        Some(id)
    }

    /// Handle every insert already queued, one refetch per insert
    pub async fn drain_live_tail(&mut self) -> usize {
        let mut handled = 0;
        while let Some(id) = self.live_tail.as_mut().and_then(Subscription::try_next) {
            debug!(id = %id, "Live insert");
            self.refetch().await;
            handled += 1;
        }
        handled
    }

    /// Render the entries chosen in the export dialog
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn build_export(&self, now: DateTime<Utc>) -> Result<ExportFile> {
        let selected = select_for_export(
            self.source.records(),
            &self.filter,
            self.export.range,
            self.export.include_filters,
            now,
        );
        ExportFile::build(
            EXPORT_ENTITY,
            selected.into_iter().map(|t| &t.record),
            self.export.format,
            now,
        )
    }

    /// Write the export into `directory`, close the dialog and notify
    ///
    /// # Errors
    ///
    /// Returns a serialization or I/O error after notifying.
    pub async fn export_to(&mut self, directory: &Path, now: DateTime<Utc>) -> Result<PathBuf> {
        let file = self
            .build_export(now)
            .map_err(|e| failed(self.notifier.as_ref(), "export_logs", "Export failed", e))?;
        let path = file
            .write_to(directory)
            .await
            .map_err(|e| failed(self.notifier.as_ref(), "export_logs", "Export failed", e))?;

        self.dialog.close();
        self.notifier.notify(Notice::success("Export completed").with_description(format!(
            "Exported {} of access logs as {}",
            self.export.range,
            self.export.format.extension().to_uppercase()
        )));
        Ok(path)
    }
}
