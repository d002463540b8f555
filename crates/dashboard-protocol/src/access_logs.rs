//! Access log filter, stats and export range

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use dashboard_core::types::{AccessLog, AccessType, LogLevel, LogStatus};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::stats::{Aggregate, mean, rate, tally};
use crate::view::{RecordFilter, Searchable, Selector};

impl Searchable for AccessLog {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.resource.as_str()];
        if let Some(user) = &self.user {
            fields.push(&user.name);
        }
        fields.push(&self.ip_address);
        fields
    }
}

/// Filter state of the access logs page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessLogFilter {
    /// Matched against resource, user name and IP address
    pub query: String,
    /// Outcome status
    pub status: Selector<LogStatus>,
    /// Severity
    pub level: Selector<LogLevel>,
    /// Access type
    pub access_type: Selector<AccessType>,
}

impl AccessLogFilter {
    /// Reset every dimension
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// The part of this filter carried into an export: status and access type only
    #[must_use]
    pub fn export_subset(&self) -> Self {
        Self {
            status: self.status,
            access_type: self.access_type,
            ..Self::default()
        }
    }
}

impl RecordFilter for AccessLogFilter {
    type Record = AccessLog;

    fn query(&self) -> &str {
        &self.query
    }

    fn admits(&self, log: &AccessLog) -> bool {
        self.status.admits(&log.status)
            && self.level.admits(&log.level)
            && self.access_type.admits(&log.access_type)
    }

    fn is_unconstrained(&self) -> bool {
        self.query.is_empty()
            && self.status.is_all()
            && self.level.is_all()
            && self.access_type.is_all()
    }
}

/// Header counters of the access logs page
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AccessLogStats {
    /// Number of entries
    pub total: usize,
    /// Entries with status success
    pub success: usize,
    /// Entries with status failed
    pub failed: usize,
    /// Entries with status blocked
    pub blocked: usize,
    /// Entries with status warning
    pub warning: usize,
    /// Entries flagged suspicious
    pub suspicious: usize,
    /// Entries from bots
    pub bots: usize,
    /// Mean request duration, rounded to whole milliseconds
    pub avg_duration_ms: u64,
    /// Share of successful entries, one decimal
    pub success_rate: f64,
    /// Share of failed entries, one decimal
    pub error_rate: f64,
    /// Distinct authenticated users
    pub unique_users: usize,
    /// Distinct source addresses
    pub unique_ips: usize,
    /// Request plus response bytes
    pub bytes_transferred: u64,
    /// Entries per status, first-seen order
    pub by_status: IndexMap<LogStatus, usize>,
    /// Entries per access type, first-seen order
    pub by_type: IndexMap<AccessType, usize>,
}

impl Aggregate for AccessLogStats {
    type Record = AccessLog;

    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    fn aggregate<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a AccessLog>,
    {
        let logs: Vec<&AccessLog> = records.into_iter().collect();
        let total = logs.len();
        let count = |status: LogStatus| logs.iter().filter(|l| l.status == status).count();

        let success = count(LogStatus::Success);
        let failed = count(LogStatus::Failed);
        let avg_duration = mean(logs.iter().map(|l| l.duration_ms as f64));

        let unique_users: HashSet<&str> = logs
            .iter()
            .filter_map(|l| l.user.as_ref().map(|u| u.id.as_str()))
            .collect();
        let unique_ips: HashSet<&str> = logs.iter().map(|l| l.ip_address.as_str()).collect();

        Self {
            total,
            success,
            failed,
            blocked: count(LogStatus::Blocked),
            warning: count(LogStatus::Warning),
            suspicious: logs.iter().filter(|l| l.is_suspicious).count(),
            bots: logs.iter().filter(|l| l.is_bot).count(),
            avg_duration_ms: avg_duration.round() as u64,
            success_rate: rate(success, total),
            error_rate: rate(failed, total),
            unique_users: unique_users.len(),
            unique_ips: unique_ips.len(),
            bytes_transferred: logs.iter().map(|l| l.bytes_transferred()).sum(),
            by_status: tally(logs.iter().copied(), |l: &AccessLog| l.status),
            by_type: tally(logs.iter().copied(), |l: &AccessLog| l.access_type),
        }
    }
}

/// Time window of an access log export
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExportRange {
    /// Last 24 hours
    #[serde(rename = "24h")]
    Day,
    /// Last 7 days
    #[default]
    #[serde(rename = "7d")]
    Week,
    /// Last 30 days
    #[serde(rename = "30d")]
    Month,
    /// Last 90 days
    #[serde(rename = "90d")]
    Quarter,
    /// Everything fetched
    #[serde(rename = "all")]
    All,
}

impl ExportRange {
    /// Short label, also accepted by `FromStr`
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Day => "24h",
            Self::Week => "7d",
            Self::Month => "30d",
            Self::Quarter => "90d",
            Self::All => "all",
        }
    }

    /// Oldest timestamp inside the window, `None` when unbounded
    #[must_use]
    pub fn cutoff(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let span = match self {
            Self::Day => Duration::hours(24),
            Self::Week => Duration::days(7),
            Self::Month => Duration::days(30),
            Self::Quarter => Duration::days(90),
            Self::All => return None,
        };
        Some(now - span)
    }

    /// Whether `log` falls inside the window
    #[must_use]
    pub fn admits(self, log: &AccessLog, now: DateTime<Utc>) -> bool {
        self.cutoff(now).is_none_or(|cutoff| log.timestamp >= cutoff)
    }
}

impl fmt::Display for ExportRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportRange {
    type Err = dashboard_core::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "24h" => Ok(Self::Day),
            "7d" => Ok(Self::Week),
            "30d" => Ok(Self::Month),
            "90d" => Ok(Self::Quarter),
            "all" => Ok(Self::All),
            other => Err(dashboard_core::Error::validation(
                "range",
                format!("unknown export range '{other}'"),
            )),
        }
    }
}

/// Entries selected by the export dialog
///
/// The window always applies. With `include_filters` only the status and
/// access type of `filter` are honoured, matching the export dialog.
pub fn select_for_export<'a, T>(
    records: &'a [T],
    filter: &AccessLogFilter,
    range: ExportRange,
    include_filters: bool,
    now: DateTime<Utc>,
) -> Vec<&'a T>
where
    T: AsRef<AccessLog>,
{
    let scope = if include_filters {
        filter.export_subset()
    } else {
        AccessLogFilter::default()
    };
    records
        .iter()
        .filter(|item| {
            let log = (*item).as_ref();
            range.admits(log, now) && scope.admits(log)
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::view::derive_view;
    use dashboard_core::seed;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_failed_login_scenario() {
        let logs = seed::access_logs();
        let filter = AccessLogFilter {
            query: "login".to_string(),
            status: Selector::Only(LogStatus::Failed),
            ..AccessLogFilter::default()
        };

        let ids: Vec<&str> = derive_view(&logs, &filter)
            .into_iter()
            .map(|l| l.id.as_str())
            .collect();
        assert_eq!(ids, vec!["2"]);
    }

    #[test]
    fn test_query_matches_user_and_ip() {
        let logs = seed::access_logs();

        let by_user = AccessLogFilter {
            query: "SARAH".to_string(),
            ..AccessLogFilter::default()
        };
        let ids: Vec<&str> = derive_view(&logs, &by_user)
            .into_iter()
            .map(|l| l.id.as_str())
            .collect();
        assert_eq!(ids, vec!["3", "8"]);

        let by_ip = AccessLogFilter {
            query: "192.168.1.100".to_string(),
            ..AccessLogFilter::default()
        };
        assert_eq!(derive_view(&logs, &by_ip).len(), 2);
    }

    #[test]
    fn test_anonymous_entries_do_not_match_placeholder_name() {
        let logs = seed::access_logs();
        let filter = AccessLogFilter {
            query: "anonymous".to_string(),
            ..AccessLogFilter::default()
        };
        assert!(derive_view(&logs, &filter).is_empty());
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut filter = AccessLogFilter {
            query: "x".to_string(),
            status: Selector::Only(LogStatus::Blocked),
            level: Selector::Only(LogLevel::Error),
            access_type: Selector::Only(AccessType::Api),
        };
        assert!(!filter.is_unconstrained());
        filter.clear();
        assert!(filter.is_unconstrained());
    }

    #[test]
    fn test_stats_over_seed() {
        let logs = seed::access_logs();
        let stats = AccessLogStats::aggregate(&logs);

        assert_eq!(stats.total, 8);
        assert_eq!(stats.success, 4);
        assert_eq!(stats.failed, 2);
        assert_eq!(stats.blocked, 1);
        assert_eq!(stats.warning, 1);
        assert_eq!(stats.suspicious, 2);
        assert_eq!(stats.bots, 1);
        assert_eq!(stats.avg_duration_ms, 677);
        assert!((stats.success_rate - 50.0).abs() < f64::EPSILON);
        assert!((stats.error_rate - 25.0).abs() < f64::EPSILON);
        assert_eq!(stats.unique_users, 4);
        assert_eq!(stats.unique_ips, 6);
        assert_eq!(stats.by_status.get(&LogStatus::Success), Some(&4));
        assert_eq!(stats.by_status.keys().next(), Some(&LogStatus::Success));
    }

    #[test]
    fn test_stats_over_empty_list() {
        let stats = AccessLogStats::aggregate(&Vec::<AccessLog>::new());
        assert_eq!(stats.total, 0);
        assert!(stats.success_rate.abs() < f64::EPSILON);
        assert!(stats.error_rate.abs() < f64::EPSILON);
        assert_eq!(stats.avg_duration_ms, 0);
    }

    #[test]
    fn test_export_range_window() {
        let logs = seed::access_logs();
        let newest = logs.first().unwrap().timestamp;
        let now = newest + Duration::hours(1);

        let filter = AccessLogFilter {
            status: Selector::Only(LogStatus::Failed),
            query: "payments".to_string(),
            ..AccessLogFilter::default()
        };

        assert_eq!(
            select_for_export(&logs, &filter, ExportRange::Day, false, now).len(),
            8
        );
        // Query is not carried into the export, status is
        let ids: Vec<&str> = select_for_export(&logs, &filter, ExportRange::Day, true, now)
            .into_iter()
            .map(|l| l.id.as_str())
            .collect();
        assert_eq!(ids, vec!["2", "7"]);

        let far_future = now + Duration::days(365);
        assert!(select_for_export(&logs, &filter, ExportRange::Quarter, false, far_future).is_empty());
        assert_eq!(
            select_for_export(&logs, &filter, ExportRange::All, false, far_future).len(),
            8
        );
    }

    #[test]
    fn test_export_range_parse() {
        assert_eq!("30d".parse::<ExportRange>().unwrap(), ExportRange::Month);
        assert_eq!(ExportRange::default().to_string(), "7d");
        assert!("1y".parse::<ExportRange>().is_err());
    }
}
