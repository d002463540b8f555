//! Behaviour every page relies on, exercised through a trait object

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use dashboard_core::seed;
use dashboard_core::types::{Idea, IdeaDraft, IdeaPatch, IdeaStatus};
use dashboard_store::{ListQuery, MemoryStore, RecordStore};
use pretty_assertions::assert_eq;

fn draft(title: &str) -> IdeaDraft {
    IdeaDraft {
        title: title.to_string(),
        description: "Details".to_string(),
        category: dashboard_core::types::IdeaCategory::Feature,
        product: None,
        tags: vec!["ui".to_string()],
        author: seed::unknown_user(),
    }
}

#[tokio::test]
async fn created_records_are_listed_first() {
    let memory = Arc::new(MemoryStore::with_records(seed::ideas()));
    let store: Arc<dyn RecordStore<Idea>> = memory.clone();

    let created = store.create(draft("Keyboard shortcuts")).await.unwrap();
    let listed = store.list(&ListQuery::all()).await.unwrap();

    assert_eq!(listed.len(), 7);
    assert_eq!(listed.first().unwrap().id, created.id);
    assert_eq!(memory.calls().create, 1);
}

#[tokio::test]
async fn updates_are_visible_to_the_next_list() {
    let store: Arc<dyn RecordStore<Idea>> = Arc::new(MemoryStore::with_records(seed::ideas()));

    let updated = store
        .update("idea2", IdeaPatch::Status(IdeaStatus::Planned))
        .await
        .unwrap();
    assert_eq!(updated.status, IdeaStatus::Planned);

    let listed = store.list(&ListQuery::all()).await.unwrap();
    let stored = listed.iter().find(|i| i.id == "idea2").unwrap();
    assert_eq!(stored.status, IdeaStatus::Planned);
}

#[tokio::test]
async fn subscription_reports_each_insert_once() {
    let memory = Arc::new(MemoryStore::<Idea>::new());
    let store: Arc<dyn RecordStore<Idea>> = memory.clone();
    let mut subscription = store.subscribe().await.unwrap();

    let first = store.create(draft("One")).await.unwrap();
    let second = memory.insert_external(draft("Two"));

    assert_eq!(subscription.next().await, Some(first.id));
    assert_eq!(subscription.next().await, Some(second.id));
    assert_eq!(subscription.try_next(), None);
}
