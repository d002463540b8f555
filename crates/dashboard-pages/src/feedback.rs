//! Feedback board page

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashboard_core::config::PagesConfig;
use dashboard_core::seed;
use dashboard_core::types::{FeedbackUser, Idea, IdeaPatch, IdeaStatus, NpsResponse, Tagged};
use dashboard_core::Result;
use dashboard_protocol::forms::{IdeaForm, RespondForm};
use dashboard_protocol::{
    ExportFormat, FeedbackDialog, IdeaFilter, IdeaSort, IdeaStats, NpsSummary,
    compute_aggregate, derive_view, sort_ideas,
};
use dashboard_store::{ListQuery, RecordStore};
use tracing::{info, warn};

use crate::export::ExportFile;
use crate::flow::{ensure_live, failed, fetch_into, refuse, reject};
use crate::notify::{Notice, Notifier};
use crate::source::DataSource;

/// Entity name used in export filenames
pub const EXPORT_ENTITY: &str = "feedback";

/// Shown when a voter votes twice and duplicate votes are refused
pub const DUPLICATE_VOTE_MESSAGE: &str = "You have already voted for this idea";

/// State and actions of the feedback board
pub struct FeedbackPage {
    store: Arc<dyn RecordStore<Idea>>,
    notifier: Arc<dyn Notifier>,
    source: DataSource<Idea>,
    responses: Vec<NpsResponse>,
    dedupe_votes: bool,

    /// Query, status and category selectors
    pub filter: IdeaFilter,
    /// Board ordering
    pub sort: IdeaSort,
    /// Open dialog
    pub dialog: FeedbackDialog,
    /// Submit-idea form
    pub idea_form: IdeaForm,
    /// Admin response form
    pub respond_form: RespondForm,
}

impl std::fmt::Debug for FeedbackPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedbackPage")
            .field("records", &self.source.records().len())
            .field("filter", &self.filter)
            .field("sort", &self.sort)
            .field("dialog", &self.dialog)
            .finish_non_exhaustive()
    }
}

impl FeedbackPage {
    /// Board listing live ideas ahead of the bundled ones
    pub fn new(
        store: Arc<dyn RecordStore<Idea>>,
        notifier: Arc<dyn Notifier>,
        config: &PagesConfig,
    ) -> Self {
        let settings = &config.feedback;
        Self {
            store,
            notifier,
            source: DataSource::new(seed::ideas(), settings.merge, config.fetch_ordering),
            responses: seed::nps_responses(),
            dedupe_votes: settings.dedupe_votes,
            filter: IdeaFilter::default(),
            sort: settings.default_sort.into(),
            dialog: FeedbackDialog::None,
            idea_form: IdeaForm::default(),
            respond_form: RespondForm::default(),
        }
    }

    /// Merged record list
    pub const fn source(&self) -> &DataSource<Idea> {
        &self.source
    }

    /// Ideas passing the filter, in board order
    pub fn view(&self) -> Vec<&Tagged<Idea>> {
        let mut ideas = derive_view(self.source.records(), &self.filter);
        sort_ideas(&mut ideas, self.sort);
        ideas
    }

    /// Header counters over the whole board; the filter does not apply
    pub fn stats(&self) -> IdeaStats {
        compute_aggregate(self.source.records())
    }

    /// Net promoter breakdown of the survey answers
    pub fn nps_summary(&self) -> NpsSummary {
        compute_aggregate(&self.responses)
    }

    /// Reset the query and every selector; the ordering is kept
    pub fn clear_filters(&mut self) {
        self.filter.clear();
    }

    /// Open the detail dialog of a displayed idea
    pub fn show_detail(&mut self, id: &str) -> bool {
        if self.source.find(id).is_none() {
            return false;
        }
        self.dialog = FeedbackDialog::Detail { id: id.to_string() };
        true
    }

    /// Fetch every stored idea
    ///
    /// # Errors
    ///
    /// Returns the collaborator error after notifying.
    pub async fn load(&mut self) -> Result<usize> {
        fetch_into(self.store.as_ref(), &mut self.source, &ListQuery::all())
            .await
            .map_err(|e| {
                failed(self.notifier.as_ref(), "fetch_ideas", "Failed to fetch feedback", e)
            })
    }

    /// Open an empty submit form
    pub fn open_new_idea(&mut self) {
        self.idea_form = IdeaForm::default();
        self.dialog = FeedbackDialog::NewIdea;
    }

    /// Submit the idea in the form on behalf of `author`
    ///
    /// # Errors
    ///
    /// Returns a validation error or the collaborator error.
    pub async fn submit_idea(&mut self, author: FeedbackUser) -> Result<Idea> {
        let draft = match self.idea_form.to_draft(author) {
            Ok(draft) => draft,
            Err(form) => return Err(reject(self.notifier.as_ref(), form)),
        };

        let created = self.store.create(draft).await.map_err(|e| {
            failed(self.notifier.as_ref(), "submit_idea", "Failed to submit feedback", e)
        })?;

        info!(id = %created.id, title = %created.title, "Idea submitted");
        self.idea_form = IdeaForm::default();
        self.dialog.close();
        self.notifier.notify(
            Notice::success("Idea submitted")
                .with_description("Thank you for your feedback"),
        );
        self.refetch().await;
        Ok(created)
    }

    /// Add one vote from `voter`
    ///
    /// A repeat voter is counted again unless duplicate votes are refused in
    /// the configuration.
    ///
    /// # Errors
    ///
    /// Returns a read-only error for a sample idea, a validation error for a
    /// refused duplicate, or the collaborator error.
    pub async fn vote(&mut self, id: &str, voter: &str) -> Result<Idea> {
        ensure_live(self.notifier.as_ref(), &self.source, id)?;
        let repeat = self
            .source
            .find(id)
            .is_some_and(|t| t.record.has_voter(voter));
        if repeat && self.dedupe_votes {
            warn!(id, voter, "Duplicate vote refused");
            return Err(refuse(self.notifier.as_ref(), "voter", DUPLICATE_VOTE_MESSAGE));
        }

        let patch = IdeaPatch::Vote {
            voter: voter.to_string(),
        };
        let updated = self
            .apply(id, patch, "vote", "Failed to record vote")
            .await?;

        self.notifier.notify(Notice::success("Vote recorded"));
        self.refetch().await;
        Ok(updated)
    }

    /// Move an idea to `status`
    ///
    /// # Errors
    ///
    /// Returns a read-only error for a sample idea or the collaborator error.
    pub async fn update_status(&mut self, id: &str, status: IdeaStatus) -> Result<Idea> {
        let updated = self
            .apply(
                id,
                IdeaPatch::Status(status),
                "update_status",
                "Failed to update status",
            )
            .await?;

        self.notifier.notify(
            Notice::success("Status updated").with_description(format!("Idea moved to {status}")),
        );
        self.refetch().await;
        Ok(updated)
    }

    /// Open the response form for a live idea
    ///
    /// # Errors
    ///
    /// Returns a read-only error for a sample idea and a not-found error for
    /// an unknown one.
    pub fn open_respond(&mut self, id: &str) -> Result<()> {
        ensure_live(self.notifier.as_ref(), &self.source, id)?;
        self.respond_form = RespondForm::default();
        self.dialog = FeedbackDialog::Respond { id: id.to_string() };
        Ok(())
    }

    /// Post the response form on the idea it was opened for
    ///
    /// # Errors
    ///
    /// Returns a validation error or the collaborator error.
    pub async fn respond(&mut self, responder: &str, now: DateTime<Utc>) -> Result<Idea> {
        let FeedbackDialog::Respond { id } = &self.dialog else {
            return Err(refuse(self.notifier.as_ref(), "id", "No idea selected for a response"));
        };
        let id = id.clone();
        let response = match self.respond_form.to_response(responder, now) {
            Ok(response) => response,
            Err(form) => return Err(reject(self.notifier.as_ref(), form)),
        };

        let updated = self
            .apply(
                &id,
                IdeaPatch::Respond(response),
                "respond",
                "Failed to post response",
            )
            .await?;

        self.respond_form = RespondForm::default();
        self.dialog.close();
        self.notifier.notify(Notice::success("Response posted"));
        self.refetch().await;
        Ok(updated)
    }

    /// Mark a live idea as a duplicate of `target`
    ///
    /// # Errors
    ///
    /// Returns a validation error when the target is missing or the idea
    /// itself, a read-only error for a sample idea, or the collaborator error.
    pub async fn merge_into(&mut self, id: &str, target: &str) -> Result<Idea> {
        if id == target || self.source.find(target).is_none() {
            return Err(refuse(
                self.notifier.as_ref(),
                "target",
                "Select another idea to merge into",
            ));
        }

        let patch = IdeaPatch::MergeInto {
            target: target.to_string(),
        };
        let merged = self
            .apply(id, patch, "merge_idea", "Failed to merge ideas")
            .await?;

        self.dialog.close();
        self.notifier.notify(Notice::success("Ideas merged"));
        self.refetch().await;
        Ok(merged)
    }

    /// Delete a live idea
    ///
    /// # Errors
    ///
    /// Returns a read-only error for a sample idea or the collaborator error.
    pub async fn delete_idea(&mut self, id: &str) -> Result<()> {
        ensure_live(self.notifier.as_ref(), &self.source, id)?;
        self.store.delete(id).await.map_err(|e| {
            failed(self.notifier.as_ref(), "delete_idea", "Failed to delete feedback", e)
        })?;

        info!(id, "Idea deleted");
        self.dialog.close();
        self.notifier.notify(Notice::success("Feedback deleted"));
        self.refetch().await;
        Ok(())
    }

    /// Refetch after a mutation; a failed fetch has already been reported
    async fn refetch(&mut self) {
        let _ = self.load().await;
    }

    async fn apply(&self, id: &str, patch: IdeaPatch, action: &str, failure: &str) -> Result<Idea> {
        ensure_live(self.notifier.as_ref(), &self.source, id)?;
        let updated = self
            .store
            .update(id, patch)
            .await
            .map_err(|e| failed(self.notifier.as_ref(), action, failure, e))?;
        info!(action, id = %updated.id, votes = updated.votes, "Idea updated");
        Ok(updated)
    }

    /// Render the current view in board order
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
            .map_err(|e| failed(self.notifier.as_ref(), "export_ideas", "Export failed", e))?;
        let path = file
            .write_to(directory)
            .await
            .map_err(|e| failed(self.notifier.as_ref(), "export_ideas", "Export failed", e))?;

        self.dialog.close();
        self.notifier.notify(Notice::success("Export complete").with_description(format!(
            "{count} ideas exported to {}",
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
    use dashboard_core::types::IdeaCategory;
    use dashboard_protocol::Selector;
    use dashboard_store::MemoryStore;
    use pretty_assertions::assert_eq;

    fn page() -> (FeedbackPage, Arc<MemoryStore<Idea>>, Arc<MemoryNotifier>) {
        let store = Arc::new(MemoryStore::new());
        let notifier = Arc::new(MemoryNotifier::new());
        let page = FeedbackPage::new(store.clone(), notifier.clone(), &PagesConfig::default());
        (page, store, notifier)
    }

    fn ids(page: &FeedbackPage) -> Vec<String> {
        page.view().iter().map(|t| t.record.id.clone()).collect()
    }

    #[test]
    fn test_view_is_sorted_by_configured_key() {
        let (mut page, _, _) = page();
        assert_eq!(
            ids(&page),
            vec!["idea4", "idea1", "idea3", "idea6", "idea2", "idea5"]
        );

        page.sort = IdeaSort::Recent;
        assert_eq!(ids(&page).first().map(String::as_str), Some("idea5"));
    }

    #[test]
    fn test_clear_filters_keeps_sort() {
        let (mut page, _, _) = page();
        page.sort = IdeaSort::Trending;
        page.filter.category = Selector::Only(IdeaCategory::Integration);
        page.filter.query = "zzz-no-match".to_string();
        assert!(page.view().is_empty());
        assert_eq!(page.stats().total_ideas, 6);

        page.clear_filters();
        assert_eq!(page.view().len(), 6);
        assert_eq!(page.sort, IdeaSort::Trending);
    }

    #[test]
    fn test_stats_ignore_filter() {
        let (mut page, _, _) = page();
        page.filter.status = Selector::Only(IdeaStatus::Shipped);
        assert_eq!(page.view().len(), 1);

        let stats = page.stats();
        assert_eq!(stats.total_ideas, 6);
        assert_eq!(stats.in_progress, 2);
        assert_eq!(stats.shipped, 1);
    }

    #[test]
    fn test_nps_summary_over_bundled_answers() {
        let (page, _, _) = page();
        assert_eq!(page.nps_summary().score, 40);
    }

    #[tokio::test]
    async fn test_blank_description_is_rejected() {
        let (mut page, store, notifier) = page();
        page.open_new_idea();
        page.idea_form.title = "Dark mode".to_string();

        let result = page.submit_idea(seed::unknown_user()).await;
        assert!(matches!(result, Err(Error::Validation { .. })));
        assert_eq!(store.calls().create, 0);
        assert_eq!(notifier.last().unwrap().message, IdeaForm::MESSAGE);
        assert_eq!(page.dialog, FeedbackDialog::NewIdea);
    }

    #[tokio::test]
    async fn test_sample_ideas_cannot_be_voted() {
        let (mut page, store, _) = page();
        let result = page.vote("idea1", "u1").await;
        assert!(matches!(result, Err(Error::ReadOnly { .. })));
        assert_eq!(store.calls().update, 0);
    }
}
