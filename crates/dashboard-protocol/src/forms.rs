//! Dialog forms and their required-field validation
//!
//! Every form is checked before any collaborator call. A failed check
//! carries the user-facing message of its dialog and the offending fields.

use chrono::{DateTime, NaiveDate, Utc};
use dashboard_core::types::{
    AccessType, AdminResponse, ClientDraft, ClientStatus, DealDraft, DealStage, FeedbackUser,
    IdeaCategory, IdeaDraft, LogLevel, LogStatus,
};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::FormError;
use crate::view::Selector;

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("blank"))
    } else {
        Ok(())
    }
}

fn positive_amount(value: &str) -> Result<(), ValidationError> {
    match value.trim().parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount > 0.0 => Ok(()),
        _ => Err(ValidationError::new("not_a_positive_amount")),
    }
}

fn invalid_fields<F: Validate>(form: &F) -> Vec<String> {
    let mut fields: Vec<String> = form.validate().err().map_or_else(Vec::new, |errors| {
        errors
            .field_errors()
            .keys()
            .map(ToString::to_string)
            .collect()
    });
    fields.sort();
    fields
}

fn incomplete(message: &str, fields: Vec<String>) -> Result<(), FormError> {
    if fields.is_empty() {
        Ok(())
    } else {
        Err(FormError::Incomplete {
            message: message.to_string(),
            fields,
        })
    }
}

fn check<F: Validate>(form: &F, message: &str) -> Result<(), FormError> {
    incomplete(message, invalid_fields(form))
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

/// Save-view dialog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SaveViewForm {
    /// View name
    #[validate(custom(function = "not_blank"))]
    pub name: String,

    /// Open this view by default
    pub is_default: bool,
}

impl SaveViewForm {
    /// Shown when the name is blank
    pub const MESSAGE: &'static str = "Please enter a view name";

    /// Check required fields
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Incomplete`] when the name is blank.
    pub fn validate_form(&self) -> Result<(), FormError> {
        check(self, Self::MESSAGE)
    }
}

/// Filters captured by a saved view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedViewFilters {
    /// Outcome status
    pub status: Selector<LogStatus>,
    /// Severity
    pub level: Selector<LogLevel>,
    /// Access type
    #[serde(rename = "type")]
    pub access_type: Selector<AccessType>,
}

/// Connect-webhook dialog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct WebhookForm {
    /// Target URL
    #[validate(custom(function = "not_blank"))]
    pub url: String,
}

impl WebhookForm {
    /// Shown when the URL is blank
    pub const MESSAGE: &'static str = "Please enter a webhook URL";

    /// Check required fields
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Incomplete`] when the URL is blank.
    pub fn validate_form(&self) -> Result<(), FormError> {
        check(self, Self::MESSAGE)
    }
}

/// Alert configuration dialog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AlertConfigForm {
    /// Failures per window that trigger an alert
    #[validate(range(min = 1, max = 100))]
    pub threshold: u32,

    /// Window label such as `5m`
    #[validate(custom(function = "not_blank"))]
    pub time_window: String,

    /// Delivery channels
    #[validate(length(min = 1))]
    pub channels: Vec<String>,

    /// Whether the alert is armed
    pub enabled: bool,
}

impl Default for AlertConfigForm {
    fn default() -> Self {
        Self {
            threshold: 5,
            time_window: "5m".to_string(),
            channels: vec!["email".to_string()],
            enabled: true,
        }
    }
}

impl AlertConfigForm {
    /// Shown when a setting is out of range
    pub const MESSAGE: &'static str = "Please check the alert settings";

    /// Check required fields
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Incomplete`] for an out-of-range threshold, a blank
    /// window or no channel.
    pub fn validate_form(&self) -> Result<(), FormError> {
        check(self, Self::MESSAGE)
    }
}

/// Create and edit client dialogs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ClientForm {
    /// Set when editing an existing client
    pub id: Option<String>,

    /// Company name
    #[validate(custom(function = "not_blank"))]
    pub company: String,

    /// Primary contact name
    #[validate(custom(function = "not_blank"))]
    pub contact_name: String,

    /// Primary contact title
    pub contact_title: Option<String>,

    /// Primary contact email
    #[validate(custom(function = "not_blank"))]
    pub email: String,

    /// Primary contact phone
    pub phone: Option<String>,

    /// Website
    pub website: Option<String>,

    /// Industry, `Other` when blank
    pub industry: String,

    /// Lifecycle status
    pub status: ClientStatus,
}

impl Default for ClientForm {
    fn default() -> Self {
        Self {
            id: None,
            company: String::new(),
            contact_name: String::new(),
            contact_title: None,
            email: String::new(),
            phone: None,
            website: None,
            industry: String::new(),
            status: ClientStatus::Lead,
        }
    }
}

impl ClientForm {
    /// Shown when creating without company, contact or email
    pub const CREATE_MESSAGE: &'static str = "Please fill in company name, contact name, and email";
    /// Shown when editing without a required field
    pub const EDIT_MESSAGE: &'static str = "Please fill in all required fields";

    /// Check the create dialog
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Incomplete`] when company, contact name or email is blank.
    pub fn validate_for_create(&self) -> Result<(), FormError> {
        check(self, Self::CREATE_MESSAGE)
    }

    /// Check the edit dialog and return the client being edited
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Incomplete`] when the id, company, contact name or
    /// email is missing.
    pub fn validate_for_edit(&self) -> Result<&str, FormError> {
        let mut fields = invalid_fields(self);
        let id = self.id.as_deref().map(str::trim).filter(|id| !id.is_empty());
        if id.is_none() {
            fields.push("id".to_string());
            fields.sort();
        }
        incomplete(Self::EDIT_MESSAGE, fields)?;
        Ok(id.unwrap_or_default())
    }

    /// Normalised payload
    #[must_use]
    pub fn to_draft(&self) -> ClientDraft {
        let industry = self.industry.trim();
        ClientDraft {
            company: self.company.trim().to_string(),
            contact_name: self.contact_name.trim().to_string(),
            contact_title: non_empty(self.contact_title.as_deref()),
            email: self.email.trim().to_string(),
            phone: non_empty(self.phone.as_deref()),
            website: non_empty(self.website.as_deref()),
            industry: if industry.is_empty() {
                "Other".to_string()
            } else {
                industry.to_string()
            },
            status: self.status,
        }
    }
}

/// New-deal dialog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DealForm {
    /// Title
    #[validate(custom(function = "not_blank"))]
    pub title: String,

    /// Contract value as typed
    #[validate(custom(function = "positive_amount"))]
    pub value: String,

    /// Starting stage
    pub stage: DealStage,

    /// Win probability
    #[validate(range(max = 100))]
    pub probability: u8,

    /// Expected close date
    pub expected_close: Option<NaiveDate>,

    /// Description
    pub notes: Option<String>,
}

impl Default for DealForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            value: String::new(),
            stage: DealStage::Qualification,
            probability: Self::DEFAULT_PROBABILITY,
            expected_close: None,
            notes: None,
        }
    }
}

impl DealForm {
    /// Shown when the title or value is missing
    pub const MESSAGE: &'static str = "Please fill in deal title and value";
    /// Probability of a new deal
    pub const DEFAULT_PROBABILITY: u8 = 25;

    /// Form pre-filled for a deal with `company`
    #[must_use]
    pub fn for_company(company: &str) -> Self {
        Self {
            title: format!("Deal with {company}"),
            ..Self::default()
        }
    }

    /// Check required fields and return the normalised payload
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Incomplete`] when the title is blank or the value is
    /// not a positive number.
    pub fn to_draft(&self) -> Result<DealDraft, FormError> {
        check(self, Self::MESSAGE)?;
        let value = self.value.trim().parse::<f64>().map_err(|_| FormError::Incomplete {
            message: Self::MESSAGE.to_string(),
            fields: vec!["value".to_string()],
        })?;
        Ok(DealDraft {
            name: self.title.trim().to_string(),
            value,
            stage: self.stage,
            probability: self.probability,
            expected_close: self.expected_close,
            notes: non_empty(self.notes.as_deref()),
        })
    }
}

/// Submit-idea dialog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct IdeaForm {
    /// Title
    #[validate(custom(function = "not_blank"))]
    pub title: String,

    /// Description
    #[validate(custom(function = "not_blank"))]
    pub description: String,

    /// Category
    pub category: IdeaCategory,

    /// Product area
    pub product: Option<String>,

    /// Comma-separated tags
    pub tags: String,
}

impl Default for IdeaForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            category: IdeaCategory::Feature,
            product: None,
            tags: String::new(),
        }
    }
}

impl IdeaForm {
    /// Shown when the title or description is blank
    pub const MESSAGE: &'static str = "Please fill in title and description";

    /// Tags split on commas, trimmed, empties dropped
    #[must_use]
    pub fn tag_list(&self) -> Vec<String> {
        self.tags
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(ToString::to_string)
            .collect()
    }

    /// Check required fields and return the normalised payload
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Incomplete`] when the title or description is blank.
    pub fn to_draft(&self, author: FeedbackUser) -> Result<IdeaDraft, FormError> {
        check(self, Self::MESSAGE)?;
        Ok(IdeaDraft {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            category: self.category,
            product: non_empty(self.product.as_deref()),
            tags: self.tag_list(),
            author,
        })
    }
}

/// Admin response dialog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RespondForm {
    /// Reply text
    #[validate(custom(function = "not_blank"))]
    pub message: String,
}

impl RespondForm {
    /// Shown when the reply is blank
    pub const MESSAGE: &'static str = "Please enter a response";

    /// Check required fields and build the reply
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Incomplete`] when the reply is blank.
    pub fn to_response(
        &self,
        responded_by: &str,
        now: DateTime<Utc>,
    ) -> Result<AdminResponse, FormError> {
        check(self, Self::MESSAGE)?;
        Ok(AdminResponse {
            message: self.message.trim().to_string(),
            responded_at: now,
            responded_by: responded_by.to_string(),
        })
    }
}
