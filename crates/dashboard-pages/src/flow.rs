//! Steps shared by every page action: fetch, reject, fail

use dashboard_core::types::Origin;
use dashboard_core::{Error, Result};
use dashboard_protocol::FormError;
use dashboard_store::{ListQuery, RecordStore, StoredRecord};
use tracing::{debug, error, warn};

use crate::notify::{Notice, Notifier};
use crate::source::DataSource;

/// Shown when an edit targets a bundled record
pub const READ_ONLY_MESSAGE: &str = "Sample records cannot be changed";

/// Fetch the live list into `source`
///
/// # Errors
///
/// Returns the collaborator error; the displayed list is left as it was.
pub async fn fetch_into<R: StoredRecord>(
    store: &dyn RecordStore<R>,
    source: &mut DataSource<R>,
    query: &ListQuery,
) -> Result<usize> {
    let ticket = source.begin_fetch();
    match store.list(query).await {
        Ok(records) => {
            let count = records.len();
            let applied = source.complete_fetch(ticket, records);
            debug!(collection = R::COLLECTION, count, applied, "Fetch settled");
            Ok(count)
        }
        Err(e) => {
            source.fail_fetch(ticket);
            error!(collection = R::COLLECTION, error = %e, "Fetch failed");
            Err(e)
        }
    }
}

/// Report a form that failed validation; no collaborator call is made
pub fn reject(notifier: &dyn Notifier, form: FormError) -> Error {
    warn!(fields = ?form.fields(), "Form rejected");
    notifier.notify(Notice::error(form.message()));
    form.into()
}

/// Report an action refused before any collaborator call
pub fn refuse(notifier: &dyn Notifier, field: &str, message: &str) -> Error {
    warn!(field, message, "Action refused");
    notifier.notify(Notice::error(message));
    Error::validation(field, message)
}

/// Report a collaborator failure with a generic message
pub fn failed(notifier: &dyn Notifier, action: &str, message: &str, cause: Error) -> Error {
    error!(action, error = %cause, "Action failed");
    notifier.notify(Notice::error(message));
    cause
}

/// Check that `id` names a displayed live record
///
/// # Errors
///
/// Returns [`Error::NotFound`] for an unknown id and [`Error::ReadOnly`] for a
/// seed record, notifying in both cases.
pub fn ensure_live<R: StoredRecord>(
    notifier: &dyn Notifier,
    source: &DataSource<R>,
    id: &str,
) -> Result<()> {
    match source.origin_of(id) {
        Some(Origin::Live) => Ok(()),
        Some(Origin::Seed) => {
            warn!(collection = R::COLLECTION, id, "Edit of sample record refused");
            notifier.notify(Notice::error(READ_ONLY_MESSAGE));
            Err(Error::ReadOnly {
                resource: format!("{} record {id}", R::COLLECTION),
            })
        }
        None => {
            notifier.notify(Notice::error("Record not found"));
            Err(Error::NotFound {
                resource: format!("{} record {id}", R::COLLECTION),
            })
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::notify::{MemoryNotifier, NoticeKind};
    use dashboard_core::config::{FetchOrdering, MergePolicy};
    use dashboard_core::seed;
    use dashboard_core::types::Client;
    use dashboard_store::MemoryStore;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_fetch_into_applies_live_list() {
        let store = MemoryStore::with_records(seed::clients());
        let mut source =
            DataSource::new(Vec::new(), MergePolicy::LiveOnly, FetchOrdering::LastSettled);

        let count = fetch_into(&store, &mut source, &ListQuery::all()).await.unwrap();
        assert_eq!(count, 5);
        assert_eq!(source.records().len(), 5);
        assert!(!source.is_loading());
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_list() {
        let store = MemoryStore::<Client>::new().with_failure("timeout");
        let mut source = DataSource::new(
            seed::clients(),
            MergePolicy::LiveThenSeed,
            FetchOrdering::LastSettled,
        );

        let result = fetch_into(&store, &mut source, &ListQuery::all()).await;
        assert!(matches!(result, Err(Error::Store(_))));
        assert_eq!(source.records().len(), 5);
        assert!(!source.is_loading());
    }

    #[test]
    fn test_refuse_notifies() {
        let notifier = MemoryNotifier::new();
        let error = refuse(&notifier, "id", "Nothing selected");

        assert!(matches!(error, Error::Validation { ref field, .. } if field == "id"));
        assert_eq!(notifier.last().unwrap().message, "Nothing selected");
        assert_eq!(notifier.count(NoticeKind::Error), 1);
    }

    #[test]
    fn test_ensure_live_refuses_seed_records() {
        let notifier = MemoryNotifier::new();
        let source = DataSource::new(
            seed::clients(),
            MergePolicy::LiveThenSeed,
            FetchOrdering::LastSettled,
        );

        let result = ensure_live(&notifier, &source, "seed-c1");
        assert!(matches!(result, Err(Error::ReadOnly { .. })));
        assert_eq!(notifier.last().unwrap().message, READ_ONLY_MESSAGE);

        let result = ensure_live(&notifier, &source, "missing");
        assert!(matches!(result, Err(Error::NotFound { .. })));
        assert_eq!(notifier.count(NoticeKind::Error), 2);
    }
}
