//! CSV and JSON export of a derived view

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use dashboard_core::format::iso_date;
use dashboard_core::types::{AccessLog, Client, Idea};
use serde::{Deserialize, Serialize};

use crate::error::ExportError;

/// Export file format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Comma-separated values with a header row
    #[default]
    Csv,
    /// Pretty-printed JSON array
    Json,
}

impl ExportFormat {
    /// File extension, without the dot
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    /// Media type of the payload
    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Json => "application/json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = dashboard_core::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(dashboard_core::Error::validation(
                "format",
                format!("unsupported export format '{other}'"),
            )),
        }
    }
}

/// `<entity>-export-<YYYY-MM-DD>.<ext>`
#[must_use]
pub fn export_filename(entity: &str, now: DateTime<Utc>, format: ExportFormat) -> String {
    format!("{entity}-export-{}.{}", iso_date(now), format.extension())
}

/// Records with a flat CSV shape
pub trait CsvRow {
    /// Header row, one entry per serialized row field
    const HEADERS: &'static [&'static str];

    /// Flat row type written for each record
    type Row: Serialize;

    /// Flatten one record
    fn csv_row(&self) -> Self::Row;
}

/// Pretty JSON array of the records
///
/// # Errors
///
/// Returns [`ExportError::Json`] if a record cannot be serialized.
pub fn to_json<'a, R, I>(records: I) -> Result<String, ExportError>
where
    R: Serialize + 'a,
    I: IntoIterator<Item = &'a R>,
{
    let records: Vec<&R> = records.into_iter().collect();
    Ok(serde_json::to_string_pretty(&records)?)
}

/// Header plus one flat row per record; the header is written even for no records
///
/// # Errors
///
/// Returns [`ExportError::Csv`] on encoding failure.
pub fn to_csv<'a, R, I>(records: I) -> Result<String, ExportError>
where
    R: CsvRow + 'a,
    I: IntoIterator<Item = &'a R>,
{
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(R::HEADERS)?;
    for record in records {
        writer.serialize(record.csv_row())?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Buffer(e.error().to_string()))?;
    String::from_utf8(bytes).map_err(|e| ExportError::Buffer(e.to_string()))
}

/// Serialize in the requested format
///
/// # Errors
///
/// Returns an [`ExportError`] on encoding failure.
pub fn render<'a, R, I>(records: I, format: ExportFormat) -> Result<String, ExportError>
where
    R: CsvRow + Serialize + 'a,
    I: IntoIterator<Item = &'a R>,
{
    match format {
        ExportFormat::Csv => to_csv(records),
        ExportFormat::Json => to_json(records),
    }
}

/// Flat access log row
#[derive(Debug, Serialize)]
pub struct AccessLogRow {
    timestamp: String,
    status: &'static str,
    level: &'static str,
    access_type: &'static str,
    user: String,
    resource: String,
    method: String,
    status_code: u16,
    ip_address: String,
    location: String,
    device: &'static str,
    duration_ms: u64,
    bytes: u64,
    suspicious: bool,
}

impl CsvRow for AccessLog {
    const HEADERS: &'static [&'static str] = &[
        "Timestamp",
        "Status",
        "Level",
        "Type",
        "User",
        "Resource",
        "Method",
        "Status Code",
        "IP Address",
        "Location",
        "Device",
        "Duration (ms)",
        "Bytes",
        "Suspicious",
    ];

    type Row = AccessLogRow;

    fn csv_row(&self) -> AccessLogRow {
        AccessLogRow {
            timestamp: self.timestamp.to_rfc3339(),
            status: self.status.as_str(),
            level: self.level.as_str(),
            access_type: self.access_type.as_str(),
            user: self.user_name().to_string(),
            resource: self.resource.clone(),
            method: self.method.clone(),
            status_code: self.status_code,
            ip_address: self.ip_address.clone(),
            location: self.location.label(),
            device: self.device.device_type.as_str(),
            duration_ms: self.duration_ms,
            bytes: self.bytes_transferred(),
            suspicious: self.is_suspicious,
        }
    }
}

/// Flat client row
#[derive(Debug, Serialize)]
pub struct ClientRow {
    company: String,
    contact: String,
    email: String,
    phone: String,
    industry: String,
    status: &'static str,
    revenue: f64,
    projects: u32,
}

impl CsvRow for Client {
    const HEADERS: &'static [&'static str] = &[
        "Company", "Contact", "Email", "Phone", "Industry", "Status", "Revenue", "Projects",
    ];

    type Row = ClientRow;

    fn csv_row(&self) -> ClientRow {
        let contact = self.primary_contact();
        ClientRow {
            company: self.company.clone(),
            contact: contact.map_or_else(|| self.name.clone(), |c| c.name.clone()),
            email: self.primary_email().to_string(),
            phone: contact
                .and_then(|c| c.phone.clone())
                .unwrap_or_default(),
            industry: self.industry.clone(),
            status: self.status.as_str(),
            revenue: self.revenue,
            projects: self.projects,
        }
    }
}

/// Flat idea row
#[derive(Debug, Serialize)]
pub struct IdeaRow {
    title: String,
    category: &'static str,
    status: &'static str,
    priority: &'static str,
    votes: u32,
    comments: u32,
    author: String,
    created_at: String,
    tags: String,
}

impl CsvRow for Idea {
    const HEADERS: &'static [&'static str] = &[
        "Title", "Category", "Status", "Priority", "Votes", "Comments", "Author", "Created",
        "Tags",
    ];

    type Row = IdeaRow;

    fn csv_row(&self) -> IdeaRow {
        IdeaRow {
            title: self.title.clone(),
            category: self.category.as_str(),
            status: self.status.as_str(),
            priority: self.priority.as_str(),
            votes: self.votes,
            comments: self.comments,
            author: self.author.name.clone(),
            created_at: iso_date(self.created_at),
            tags: self.tags.join("; "),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::clients::ClientFilter;
    use crate::view::{Selector, derive_view};
    use chrono::TimeZone;
    use dashboard_core::seed;
    use dashboard_core::types::ClientStatus;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_filename_pattern() {
        let now = Utc.with_ymd_and_hms(2024, 12, 24, 23, 59, 0).unwrap();
        assert_eq!(
            export_filename("clients", now, ExportFormat::Csv),
            "clients-export-2024-12-24.csv"
        );
        assert_eq!(
            export_filename("access-logs", now, ExportFormat::Json),
            "access-logs-export-2024-12-24.json"
        );
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert!("pdf".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_json_round_trip_of_filtered_view() {
        let clients = seed::clients();
        let filter = ClientFilter {
            status: Selector::Only(ClientStatus::Customer),
            ..ClientFilter::default()
        };
        let view = derive_view(&clients, &filter);

        let json = to_json(view.iter().copied()).unwrap();
        let parsed: Vec<Client> = serde_json::from_str(&json).unwrap();

        let expected: Vec<Client> = view.into_iter().cloned().collect();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_json_round_trip_of_ideas_and_logs() {
        let ideas = seed::ideas();
        let parsed: Vec<Idea> = serde_json::from_str(&to_json(&ideas).unwrap()).unwrap();
        assert_eq!(parsed, ideas);

        let logs = seed::access_logs();
        let parsed: Vec<AccessLog> = serde_json::from_str(&to_json(&logs).unwrap()).unwrap();
        assert_eq!(parsed, logs);
    }

    #[test]
    fn test_client_csv_columns() {
        let clients = seed::clients();
        let csv = to_csv(clients.iter().take(1)).unwrap();
        let mut lines = csv.lines();

        assert_eq!(
            lines.next().unwrap(),
            "Company,Contact,Email,Phone,Industry,Status,Revenue,Projects"
        );
        let row = lines.next().unwrap();
        assert!(row.starts_with("TechCorp Solutions,Sarah Chen,sarah@techcorp.example,"));
        assert!(row.ends_with(",Technology,customer,150000.0,12"));
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_csv_header_only_for_empty_view() {
        let csv = to_csv(Vec::<&Idea>::new()).unwrap();
        assert_eq!(csv.trim_end(), Idea::HEADERS.join(","));
    }

    #[test]
    fn test_csv_parses_back() {
        let ideas = seed::ideas();
        let csv = render(&ideas, ExportFormat::Csv).unwrap();

        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.len(), Idea::HEADERS.len());

        let records: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
        assert_eq!(records.len(), ideas.len());
        assert_eq!(records.first().unwrap().get(0), Some("Dark mode support across all pages"));
    }

    #[test]
    fn test_access_log_csv_rows() {
        let logs = seed::access_logs();
        let csv = to_csv(&logs).unwrap();
        assert_eq!(csv.lines().count(), logs.len() + 1);
        assert!(csv.lines().nth(2).unwrap().contains(",failed,warn,login,Anonymous,"));
    }
}
