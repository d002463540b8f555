//! The one dialog each page may have open at a time

use serde::{Deserialize, Serialize};

/// Open dialog of the access logs page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "dialog", rename_all = "snake_case")]
pub enum AccessLogDialog {
    /// Nothing open
    #[default]
    None,
    /// Full detail of one entry
    Detail {
        /// Entry shown
        id: String,
    },
    /// Export options
    Export,
    /// Alert threshold settings
    AlertConfig,
    /// Name and save the current filters
    SaveView,
    /// Connect an outgoing webhook
    Webhook,
    /// Confirm blocking an address
    BlockIp {
        /// Address to block
        ip: String,
    },
    /// Confirm removing entries past retention
    ClearLogs,
}

impl AccessLogDialog {
    /// Whether any dialog is open
    #[must_use]
    pub const fn is_open(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Close the dialog, returning what was open
    pub fn close(&mut self) -> Self {
        std::mem::take(self)
    }
}

/// Open dialog of the clients page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "dialog", rename_all = "snake_case")]
pub enum ClientDialog {
    /// Nothing open
    #[default]
    None,
    /// Full detail of one client
    Detail {
        /// Client shown
        id: String,
    },
    /// New client form
    Create,
    /// Edit client form
    Edit {
        /// Client being edited
        id: String,
    },
    /// Delete confirmation
    ConfirmDelete {
        /// Client to delete
        id: String,
    },
    /// New deal form
    AddDeal {
        /// Client receiving the deal
        client_id: String,
    },
    /// Export options
    Export,
}

impl ClientDialog {
    /// Whether any dialog is open
    #[must_use]
    pub const fn is_open(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Client the open dialog acts on, if any
    #[must_use]
    pub fn target_id(&self) -> Option<&str> {
        match self {
            Self::Detail { id } | Self::Edit { id } | Self::ConfirmDelete { id } => Some(id),
            Self::AddDeal { client_id } => Some(client_id),
            Self::None | Self::Create | Self::Export => None,
        }
    }

    /// Close the dialog, returning what was open
    pub fn close(&mut self) -> Self {
        std::mem::take(self)
    }
}

/// Open dialog of the feedback board
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "dialog", rename_all = "snake_case")]
pub enum FeedbackDialog {
    /// Nothing open
    #[default]
    None,
    /// Full detail of one idea
    Detail {
        /// Idea shown
        id: String,
    },
    /// Submit-idea form
    NewIdea,
    /// Admin response form
    Respond {
        /// Idea answered
        id: String,
    },
    /// Merge into another idea
    Merge {
        /// Idea being merged away
        id: String,
    },
    /// Delete confirmation
    ConfirmDelete {
        /// Idea to delete
        id: String,
    },
    /// Export options
    Export,
}

impl FeedbackDialog {
    /// Whether any dialog is open
    #[must_use]
    pub const fn is_open(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Idea the open dialog acts on, if any
    #[must_use]
    pub fn target_id(&self) -> Option<&str> {
        match self {
            Self::Detail { id }
            | Self::Respond { id }
            | Self::Merge { id }
            | Self::ConfirmDelete { id } => Some(id),
            Self::None | Self::NewIdea | Self::Export => None,
        }
    }

    /// Close the dialog, returning what was open
    pub fn close(&mut self) -> Self {
        std::mem::take(self)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_only_one_dialog_at_a_time() {
        let mut dialog = ClientDialog::Create;
        assert!(dialog.is_open());

        dialog = ClientDialog::ConfirmDelete {
            id: "c1".to_string(),
        };
        assert_eq!(dialog.target_id(), Some("c1"));

        let closed = dialog.close();
        assert_eq!(closed, ClientDialog::ConfirmDelete { id: "c1".to_string() });
        assert!(!dialog.is_open());
        assert_eq!(dialog.target_id(), None);
    }

    #[test]
    fn test_dialog_serialization() {
        let dialog = AccessLogDialog::BlockIp {
            ip: "45.67.89.123".to_string(),
        };
        let value = serde_json::to_value(&dialog).unwrap();
        assert_eq!(value["dialog"], "block_ip");
        assert_eq!(value["ip"], "45.67.89.123");

        let back: AccessLogDialog = serde_json::from_value(value).unwrap();
        assert_eq!(back, dialog);
    }

    #[test]
    fn test_feedback_targets() {
        assert_eq!(
            FeedbackDialog::Respond { id: "idea2".to_string() }.target_id(),
            Some("idea2")
        );
        assert_eq!(FeedbackDialog::NewIdea.target_id(), None);
        assert!(!FeedbackDialog::default().is_open());
    }
}
