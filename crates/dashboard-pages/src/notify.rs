//! User-visible notifications
//!
//! Pages report outcomes through a [`Notifier`]. Delivery is fire-and-forget:
//! nothing is returned and nothing is retried.

use std::fmt;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// Kind of notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    /// An action completed
    Success,
    /// An action failed or was rejected
    Error,
    /// Neutral information
    Info,
}

impl NoticeKind {
    /// Lowercase label
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for NoticeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Kind
    pub kind: NoticeKind,
    /// Headline
    pub message: String,
    /// Optional detail line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Notice {
    /// Success notice
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Success, message)
    }

    /// Failure notice
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Error, message)
    }

    /// Informational notice
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Info, message)
    }

    fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            description: None,
        }
    }

    /// Attach a detail line
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Notification sink
pub trait Notifier: Send + Sync {
    /// Show `notice` to the user
    fn notify(&self, notice: Notice);
}

/// Sink that writes each notice to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        let description = notice.description.as_deref().unwrap_or_default();
        match notice.kind {
            NoticeKind::Error => error!(headline = %notice.message, description, "Notice"),
            NoticeKind::Success | NoticeKind::Info => {
                info!(kind = %notice.kind, headline = %notice.message, description, "Notice");
            }
        }
    }
}

/// Sink that keeps every notice, for tests and batch tools
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl MemoryNotifier {
    /// Empty sink
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every notice so far, oldest first
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().clone()
    }

    /// Most recent notice
    pub fn last(&self) -> Option<Notice> {
        self.notices.lock().last().cloned()
    }

    /// Number of notices of `kind`
    pub fn count(&self, kind: NoticeKind) -> usize {
        self.notices.lock().iter().filter(|n| n.kind == kind).count()
    }

    /// Forget every notice
    pub fn clear(&self) {
        self.notices.lock().clear();
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().push(notice);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_memory_notifier_keeps_order() {
        let sink = MemoryNotifier::new();
        sink.notify(Notice::info("Logs refreshed"));
        sink.notify(Notice::error("Failed to fetch logs"));

        assert_eq!(sink.notices().len(), 2);
        assert_eq!(sink.last().unwrap().message, "Failed to fetch logs");
        assert_eq!(sink.count(NoticeKind::Error), 1);

        sink.clear();
        assert!(sink.last().is_none());
    }

    #[test]
    fn test_notice_serialization_skips_missing_description() {
        let value = serde_json::to_value(Notice::success("View saved")).unwrap();
        assert_eq!(value["kind"], "success");
        assert!(value.get("description").is_none());

        let value = serde_json::to_value(
            Notice::success("IP blocked").with_description("10.0.0.1 has been added to blocklist"),
        )
        .unwrap();
        assert_eq!(value["description"], "10.0.0.1 has been added to blocklist");
    }

    #[test]
    fn test_tracing_notifier_accepts_every_kind() {
        let sink = TracingNotifier;
        sink.notify(Notice::success("ok"));
        sink.notify(Notice::error("failed").with_description("detail"));
        sink.notify(Notice::info("note"));
    }
}
