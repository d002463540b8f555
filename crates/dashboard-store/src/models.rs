//! Row types of the PostgreSQL backend and their mapping to records
//!
//! Nested parts of a record are stored as JSONB. Labels that no longer parse
//! fall back to a neutral value so one bad row never breaks a page.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use dashboard_core::types::{
    AccessLog, AccessType, Address, AdminResponse, Client, ClientStatus, Contact, Deal,
    DeviceInfo, FeedbackUser, GeoLocation, Idea, IdeaCategory, IdeaStatus, LogLevel, LogStatus,
    Priority, UserSummary,
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use tracing::warn;

/// Parse a stored label, logging and substituting `fallback` when unknown
fn label_or<T: FromStr>(column: &str, value: &str, fallback: T) -> T {
    value.parse().unwrap_or_else(|_| {
        warn!(column, value, "Unknown stored label, using fallback");
        fallback
    })
}

/// Integer conversion between record and column widths; out of range reads as zero
fn convert<S, T>(value: S) -> T
where
    T: TryFrom<S> + Default,
{
    T::try_from(value).unwrap_or_default()
}

/// Database model for access logs
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AccessLogDb {
    /// Unique identifier
    pub id: String,
    /// Request time
    pub created_at: DateTime<Utc>,
    /// Outcome label
    pub status: String,
    /// Severity label
    pub level: String,
    /// Access category label
    pub access_type: String,
    /// Authenticated user
    pub user_info: Option<Json<UserSummary>>,
    /// Target resource
    pub resource: String,
    /// HTTP method
    pub method: String,
    /// HTTP status code
    pub status_code: i32,
    /// Origin address
    pub ip_address: String,
    /// Resolved origin
    pub location: Json<GeoLocation>,
    /// Device details
    pub device: Json<DeviceInfo>,
    /// Duration in milliseconds
    pub duration_ms: i64,
    /// Request bytes
    pub request_size: i64,
    /// Response bytes
    pub response_size: i64,
    /// Raw user agent
    pub user_agent: String,
    /// Referrer
    pub referrer: Option<String>,
    /// Session identifier
    pub session_id: String,
    /// Request identifier
    pub request_id: String,
    /// Error message
    pub error_message: Option<String>,
    /// Stack trace
    pub stack_trace: Option<String>,
    /// Tags
    pub tags: Vec<String>,
    /// Threat flag
    pub is_suspicious: bool,
    /// Automated client flag
    pub is_bot: bool,
    /// Structured payload
    pub metadata: Json<serde_json::Value>,
}

impl AccessLogDb {
    /// Row for a record
    #[must_use]
    pub fn from_record(log: &AccessLog) -> Self {
        Self {
            id: log.id.clone(),
            created_at: log.timestamp,
            status: log.status.as_str().to_string(),
            level: log.level.as_str().to_string(),
            access_type: log.access_type.as_str().to_string(),
            user_info: log.user.clone().map(Json),
            resource: log.resource.clone(),
            method: log.method.clone(),
            status_code: i32::from(log.status_code),
            ip_address: log.ip_address.clone(),
            location: Json(log.location.clone()),
            device: Json(log.device.clone()),
            duration_ms: convert(log.duration_ms),
            request_size: convert(log.request_size),
            response_size: convert(log.response_size),
            user_agent: log.user_agent.clone(),
            referrer: log.referrer.clone(),
            session_id: log.session_id.clone(),
            request_id: log.request_id.clone(),
            error_message: log.error_message.clone(),
            stack_trace: log.stack_trace.clone(),
            tags: log.tags.clone(),
            is_suspicious: log.is_suspicious,
            is_bot: log.is_bot,
            metadata: Json(log.metadata.clone()),
        }
    }
}

impl From<AccessLogDb> for AccessLog {
    fn from(row: AccessLogDb) -> Self {
        Self {
            status: label_or("status", &row.status, LogStatus::Info),
            level: label_or("level", &row.level, LogLevel::Info),
            access_type: label_or("access_type", &row.access_type, AccessType::System),
            id: row.id,
            timestamp: row.created_at,
            user: row.user_info.map(|Json(user)| user),
            resource: row.resource,
            method: row.method,
            status_code: convert(row.status_code),
            ip_address: row.ip_address,
            location: row.location.0,
            device: row.device.0,
            duration_ms: convert(row.duration_ms),
            request_size: convert(row.request_size),
            response_size: convert(row.response_size),
            user_agent: row.user_agent,
            referrer: row.referrer,
            session_id: row.session_id,
            request_id: row.request_id,
            error_message: row.error_message,
            stack_trace: row.stack_trace,
            tags: row.tags,
            is_suspicious: row.is_suspicious,
            is_bot: row.is_bot,
            metadata: row.metadata.0,
        }
    }
}

/// Database model for clients
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ClientDb {
    /// Unique identifier
    pub id: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Display name
    pub name: String,
    /// Company name, may be empty
    pub company: Option<String>,
    /// Industry, may be empty
    pub industry: Option<String>,
    /// Website
    pub website: Option<String>,
    /// Lifecycle status label
    pub status: String,
    /// Contacts
    pub contacts: Json<Vec<Contact>>,
    /// Current revenue
    pub revenue: f64,
    /// Lifetime value
    pub lifetime_value: f64,
    /// Project count
    pub projects: i32,
    /// Health score, unset for rows written by older clients
    pub health_score: Option<i16>,
    /// Last NPS answer
    pub nps: Option<i16>,
    /// Last activity
    pub last_activity: DateTime<Utc>,
    /// Tags
    pub tags: Vec<String>,
    /// Postal address
    pub address: Json<Address>,
    /// Account owner
    pub owner: String,
    /// Team members
    pub team: Vec<String>,
    /// Acquisition source
    pub source: String,
    /// Deals
    pub deals: Json<Vec<Deal>>,
}

impl ClientDb {
    /// Row for a record
    #[must_use]
    pub fn from_record(client: &Client) -> Self {
        Self {
            id: client.id.clone(),
            created_at: client.created_at,
            name: client.name.clone(),
            company: Some(client.company.clone()),
            industry: Some(client.industry.clone()),
            website: client.website.clone(),
            status: client.status.as_str().to_string(),
            contacts: Json(client.contacts.clone()),
            revenue: client.revenue,
            lifetime_value: client.lifetime_value,
            projects: convert(client.projects),
            health_score: Some(i16::from(client.health_score)),
            nps: client.nps.map(i16::from),
            last_activity: client.last_activity,
            tags: client.tags.clone(),
            address: Json(client.address.clone()),
            owner: client.owner.clone(),
            team: client.team.clone(),
            source: client.source.clone(),
            deals: Json(client.deals.clone()),
        }
    }
}

/// Client status label, accepting the legacy `active` spelling
fn client_status(value: &str) -> ClientStatus {
    if value == "active" {
        ClientStatus::Customer
    } else {
        label_or("status", value, ClientStatus::Lead)
    }
}

impl From<ClientDb> for Client {
    fn from(row: ClientDb) -> Self {
        let company = row
            .company
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| row.name.clone());
        let industry = row
            .industry
            .filter(|i| !i.trim().is_empty())
            .unwrap_or_else(|| "Other".to_string());

        Self {
            status: client_status(&row.status),
            id: row.id,
            name: row.name,
            company,
            industry,
            website: row.website,
            contacts: row.contacts.0,
            revenue: row.revenue,
            lifetime_value: row.lifetime_value,
            projects: convert(row.projects),
            health_score: row
                .health_score
                .map_or(Self::DEFAULT_HEALTH_SCORE, |score| convert(score.clamp(0, 100))),
            nps: row.nps.map(convert),
            created_at: row.created_at,
            last_activity: row.last_activity,
            tags: row.tags,
            address: row.address.0,
            owner: row.owner,
            team: row.team,
            source: row.source,
            deals: row.deals.0,
        }
    }
}

/// Database model for feedback ideas
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct IdeaDb {
    /// Unique identifier
    pub id: String,
    /// Submission time
    pub created_at: DateTime<Utc>,
    /// Last change
    pub updated_at: DateTime<Utc>,
    /// Title
    pub title: String,
    /// Description
    pub description: String,
    /// Category label
    pub category: String,
    /// Status label
    pub status: String,
    /// Priority label
    pub priority: String,
    /// Vote count
    pub votes: i32,
    /// Voter ids
    pub voters: Vec<String>,
    /// Comment count
    pub comments: i32,
    /// Submitting user
    pub author: Json<FeedbackUser>,
    /// Target release
    pub planned_release: Option<String>,
    /// Related idea ids
    pub linked_ideas: Vec<String>,
    /// Tags
    pub tags: Vec<String>,
    /// Impact estimate
    pub impact_score: i16,
    /// Effort estimate
    pub effort_score: i16,
    /// Official reply
    pub admin_response: Option<Json<AdminResponse>>,
    /// Surviving idea when merged
    pub merged_into: Option<String>,
    /// Subscriber count
    pub subscribers: i32,
    /// View count
    pub views: i32,
    /// Product area
    pub product: Option<String>,
}

impl IdeaDb {
    /// Row for a record
    #[must_use]
    pub fn from_record(idea: &Idea) -> Self {
        Self {
            id: idea.id.clone(),
            created_at: idea.created_at,
            updated_at: idea.updated_at,
            title: idea.title.clone(),
            description: idea.description.clone(),
            category: idea.category.as_str().to_string(),
            status: idea.status.as_str().to_string(),
            priority: idea.priority.as_str().to_string(),
            votes: convert(idea.votes),
            voters: idea.voters.clone(),
            comments: convert(idea.comments),
            author: Json(idea.author.clone()),
            planned_release: idea.planned_release.clone(),
            linked_ideas: idea.linked_ideas.clone(),
            tags: idea.tags.clone(),
            impact_score: i16::from(idea.impact_score),
            effort_score: i16::from(idea.effort_score),
            admin_response: idea.admin_response.clone().map(Json),
            merged_into: idea.merged_into.clone(),
            subscribers: convert(idea.subscribers),
            views: convert(idea.views),
            product: idea.product.clone(),
        }
    }
}

impl From<IdeaDb> for Idea {
    fn from(row: IdeaDb) -> Self {
        Self {
            category: label_or("category", &row.category, IdeaCategory::Other),
            status: label_or("status", &row.status, IdeaStatus::New),
            priority: label_or("priority", &row.priority, Priority::Important),
            id: row.id,
            title: row.title,
            description: row.description,
            votes: convert(row.votes),
            voters: row.voters,
            comments: convert(row.comments),
            author: row.author.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
            planned_release: row.planned_release,
            linked_ideas: row.linked_ideas,
            tags: row.tags,
            impact_score: convert(row.impact_score),
            effort_score: convert(row.effort_score),
            admin_response: row.admin_response.map(|Json(response)| response),
            merged_into: row.merged_into,
            subscribers: convert(row.subscribers),
            views: convert(row.views),
            product: row.product,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use dashboard_core::seed;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_access_log_row_mapping_preserves_record() {
        for log in seed::access_logs() {
            let back = AccessLog::from(AccessLogDb::from_record(&log));
            assert_eq!(back, log);
        }
    }

    #[test]
    fn test_unknown_labels_fall_back() {
        let mut row = AccessLogDb::from_record(&seed::access_logs().remove(0));
        row.status = "exploded".to_string();
        row.access_type = "teleport".to_string();

        let log = AccessLog::from(row);
        assert_eq!(log.status, LogStatus::Info);
        assert_eq!(log.access_type, AccessType::System);
    }

    #[test]
    fn test_legacy_client_rows() {
        let mut row = ClientDb::from_record(&seed::clients().remove(0));
        row.status = "active".to_string();
        row.company = Some("  ".to_string());
        row.industry = None;
        row.health_score = None;

        let client = Client::from(row.clone());
        assert_eq!(client.status, ClientStatus::Customer);
        assert_eq!(client.company, row.name);
        assert_eq!(client.industry, "Other");
        assert_eq!(client.health_score, Client::DEFAULT_HEALTH_SCORE);
    }

    #[test]
    fn test_client_and_idea_mapping_preserves_records() {
        for client in seed::clients() {
            assert_eq!(Client::from(ClientDb::from_record(&client)), client);
        }
        for idea in seed::ideas() {
            assert_eq!(Idea::from(IdeaDb::from_record(&idea)), idea);
        }
    }

    #[test]
    fn test_out_of_range_counts_read_as_zero() {
        let mut row = IdeaDb::from_record(&seed::ideas().remove(0));
        row.votes = -3;
        row.impact_score = 900;

        let idea = Idea::from(row);
        assert_eq!(idea.votes, 0);
        assert_eq!(idea.impact_score, 0);
    }
}
