//! Access log records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

labelled_enum! {
    /// Outcome of a logged request
    pub enum LogStatus {
        /// Request succeeded
        Success => "success",
        /// Request failed
        Failed => "failed",
        /// Request was blocked before reaching the resource
        Blocked => "blocked",
        /// Request succeeded with a warning
        Warning => "warning",
        /// Informational entry
        Info => "info",
    }
}

labelled_enum! {
    /// Severity of a log entry
    pub enum LogLevel {
        /// Debug
        Debug => "debug",
        /// Info
        Info => "info",
        /// Warning
        Warn => "warn",
        /// Error
        Error => "error",
        /// Critical
        Critical => "critical",
    }
}

labelled_enum! {
    /// Category of access that produced the entry
    pub enum AccessType {
        /// Sign-in
        Login => "login",
        /// Sign-out
        Logout => "logout",
        /// API request
        Api => "api",
        /// Administrative action
        Admin => "admin",
        /// File transfer
        File => "file",
        /// Database query
        Database => "database",
        /// Internal system event
        System => "system",
    }
}

labelled_enum! {
    /// Kind of client device
    pub enum DeviceType {
        /// Desktop browser
        Desktop => "desktop",
        /// Phone
        Mobile => "mobile",
        /// Tablet
        Tablet => "tablet",
        /// Automated client
        Bot => "bot",
        /// Could not be determined
        Unknown => "unknown",
    }
}

labelled_enum! {
    /// Threat assessment stored alongside persisted entries
    pub enum ThreatLevel {
        /// Nothing notable
        Low => "low",
        /// Worth a look
        Medium => "medium",
        /// Likely hostile
        High => "high",
    }
}

impl From<ThreatLevel> for LogLevel {
    fn from(threat: ThreatLevel) -> Self {
        match threat {
            ThreatLevel::High => Self::Error,
            ThreatLevel::Medium => Self::Warn,
            ThreatLevel::Low => Self::Info,
        }
    }
}

impl From<LogLevel> for ThreatLevel {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error | LogLevel::Critical => Self::High,
            LogLevel::Warn => Self::Medium,
            LogLevel::Debug | LogLevel::Info => Self::Low,
        }
    }
}

/// User attached to an entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    /// User identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
}

/// Resolved origin of a request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoLocation {
    /// City, `Unknown` when unresolved
    pub city: String,
    /// Country, `Unknown` when unresolved
    pub country: String,
    /// `lat,lon` pair, may be empty
    pub coordinates: String,
}

impl GeoLocation {
    /// Parse the persisted `"City, Country"` form
    #[must_use]
    pub fn parse(value: Option<&str>) -> Self {
        let mut parts = value.unwrap_or_default().splitn(2, ',');
        let field = |part: Option<&str>| {
            part.map(str::trim)
                .filter(|p| !p.is_empty())
                .unwrap_or("Unknown")
                .to_string()
        };

        Self {
            city: field(parts.next()),
            country: field(parts.next()),
            coordinates: String::new(),
        }
    }

    /// Persisted `"City, Country"` form
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}, {}", self.city, self.country)
    }
}

/// Client device details
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Device category
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    /// Browser or client library
    pub browser: String,
    /// Operating system
    pub os: String,
    /// Browser version
    pub version: String,
}

impl Default for DeviceInfo {
    fn default() -> Self {
        Self {
            device_type: DeviceType::Desktop,
            browser: "Unknown".to_string(),
            os: String::new(),
            version: String::new(),
        }
    }
}

/// A single access log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessLog {
    /// Entry identifier
    pub id: String,
    /// When the request happened
    pub timestamp: DateTime<Utc>,
    /// Outcome
    pub status: LogStatus,
    /// Severity
    pub level: LogLevel,
    /// Access category
    pub access_type: AccessType,
    /// Authenticated user, if any
    pub user: Option<UserSummary>,
    /// Target resource path
    pub resource: String,
    /// HTTP method
    pub method: String,
    /// HTTP status code
    pub status_code: u16,
    /// Origin IP address
    pub ip_address: String,
    /// Resolved location
    pub location: GeoLocation,
    /// Client device
    pub device: DeviceInfo,
    /// Request duration in milliseconds
    pub duration_ms: u64,
    /// Request body size in bytes
    pub request_size: u64,
    /// Response body size in bytes
    pub response_size: u64,
    /// Raw user agent
    pub user_agent: String,
    /// Referring page
    pub referrer: Option<String>,
    /// Session identifier, empty for anonymous traffic
    pub session_id: String,
    /// Request correlation id
    pub request_id: String,
    /// Error or block reason
    pub error_message: Option<String>,
    /// Captured stack trace
    pub stack_trace: Option<String>,
    /// Free-form tags
    pub tags: Vec<String>,
    /// Flagged by threat detection
    pub is_suspicious: bool,
    /// Automated client
    pub is_bot: bool,
    /// Structured payload of synthetic admin entries
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub metadata: serde_json::Value,
}

impl AccessLog {
    /// Bytes moved in both directions
    #[must_use]
    pub const fn bytes_transferred(&self) -> u64 {
        self.request_size.saturating_add(self.response_size)
    }

    /// Display name of the user, `Anonymous` when unauthenticated
    #[must_use]
    pub fn user_name(&self) -> &str {
        self.user.as_ref().map_or("Anonymous", |u| u.name.as_str())
    }

    /// Materialise a draft once the store has assigned an id and timestamp
    #[must_use]
    pub fn from_draft(id: String, timestamp: DateTime<Utc>, draft: AccessLogDraft) -> Self {
        let request_id = format!("req_{id}");
        Self {
            id,
            timestamp,
            status: draft.status,
            level: draft.level,
            access_type: draft.access_type,
            user: None,
            resource: draft.resource,
            method: draft.method,
            status_code: draft.status_code,
            ip_address: draft.ip_address.unwrap_or_default(),
            location: GeoLocation::parse(draft.location.as_deref()),
            device: DeviceInfo {
                device_type: draft.device_type,
                browser: draft.browser.unwrap_or_else(|| "Unknown".to_string()),
                ..DeviceInfo::default()
            },
            duration_ms: draft.duration_ms,
            request_size: 0,
            response_size: 0,
            user_agent: String::new(),
            referrer: None,
            session_id: String::new(),
            request_id,
            error_message: None,
            stack_trace: None,
            tags: Vec::new(),
            is_suspicious: draft.is_suspicious,
            is_bot: draft.device_type == DeviceType::Bot,
            metadata: draft.metadata,
        }
    }
}

impl AsRef<Self> for AccessLog {
    fn as_ref(&self) -> &Self {
        self
    }
}

/// Payload for appending an entry through the collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessLogDraft {
    /// Access category
    pub access_type: AccessType,
    /// Outcome
    pub status: LogStatus,
    /// Severity
    pub level: LogLevel,
    /// Target resource path
    pub resource: String,
    /// HTTP method
    pub method: String,
    /// HTTP status code
    pub status_code: u16,
    /// Origin IP address
    pub ip_address: Option<String>,
    /// `"City, Country"`
    pub location: Option<String>,
    /// Device category
    pub device_type: DeviceType,
    /// Browser name
    pub browser: Option<String>,
    /// Duration in milliseconds
    pub duration_ms: u64,
    /// Threat flag
    pub is_suspicious: bool,
    /// Structured payload
    pub metadata: serde_json::Value,
}

impl Default for AccessLogDraft {
    fn default() -> Self {
        Self {
            access_type: AccessType::Api,
            status: LogStatus::Success,
            level: LogLevel::Info,
            resource: String::new(),
            method: "GET".to_string(),
            status_code: 200,
            ip_address: None,
            location: None,
            device_type: DeviceType::Desktop,
            browser: None,
            duration_ms: 0,
            is_suspicious: false,
            metadata: serde_json::Value::Object(serde_json::Map::new()),
        }
    }
}

impl AccessLogDraft {
    /// Administrative entry against `resource` carrying `metadata`
    #[must_use]
    pub fn admin(resource: impl Into<String>, metadata: serde_json::Value) -> Self {
        Self {
            access_type: AccessType::Admin,
            resource: resource.into(),
            metadata,
            ..Self::default()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(ThreatLevel::High, LogLevel::Error)]
    #[case(ThreatLevel::Medium, LogLevel::Warn)]
    #[case(ThreatLevel::Low, LogLevel::Info)]
    fn test_threat_level_maps_to_log_level(#[case] threat: ThreatLevel, #[case] level: LogLevel) {
        assert_eq!(LogLevel::from(threat), level);
        assert_eq!(ThreatLevel::from(level), threat);
    }

    #[rstest]
    #[case(Some("San Francisco, USA"), "San Francisco", "USA")]
    #[case(Some("Berlin"), "Berlin", "Unknown")]
    #[case(None, "Unknown", "Unknown")]
    fn test_location_parse(#[case] raw: Option<&str>, #[case] city: &str, #[case] country: &str) {
        let location = GeoLocation::parse(raw);
        assert_eq!(location.city, city);
        assert_eq!(location.country, country);
    }

    #[test]
    fn test_from_draft_applies_defaults() {
        let draft = AccessLogDraft {
            status: LogStatus::Blocked,
            ip_address: Some("45.67.89.123".to_string()),
            device_type: DeviceType::Bot,
            is_suspicious: true,
            ..AccessLogDraft::admin("/blocked-ips/45.67.89.123", json!({"action": "ip_blocked"}))
        };

        let log = AccessLog::from_draft("abc".to_string(), Utc::now(), draft);

        assert_eq!(log.access_type, AccessType::Admin);
        assert_eq!(log.status, LogStatus::Blocked);
        assert_eq!(log.method, "GET");
        assert_eq!(log.status_code, 200);
        assert_eq!(log.request_id, "req_abc");
        assert_eq!(log.user_name(), "Anonymous");
        assert_eq!(log.location.city, "Unknown");
        assert!(log.is_bot);
        assert!(log.is_suspicious);
        assert_eq!(log.metadata["action"], "ip_blocked");
    }

    #[test]
    fn test_device_type_serializes_as_type() {
        let device = DeviceInfo::default();
        let value = serde_json::to_value(&device).unwrap();
        assert_eq!(value["type"], "desktop");
    }
}
