//! Header counters of every page in one document

use chrono::{DateTime, Utc};
use dashboard_core::format::{
    format_bytes, format_currency, format_date, format_duration_ms, format_relative_time,
    format_timestamp,
};
use dashboard_core::types::HealthBand;
use dashboard_protocol::{AccessLogStats, ClientStats, IdeaStats, NpsSummary};
use serde::Serialize;

use crate::Dashboard;

/// Snapshot of the stat cards shown above each page
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    /// Access log counters
    pub access_logs: AccessLogStats,
    /// Time of the newest displayed entry
    pub latest_entry: Option<DateTime<Utc>>,
    /// Client counters over the filtered list
    pub clients: ClientStats,
    /// Displayed clients whose health score is in the at-risk band
    pub at_risk_clients: usize,
    /// Idea board counters
    pub feedback: IdeaStats,
    /// Survey breakdown
    pub nps: NpsSummary,
}

impl DashboardSummary {
    /// Read the counters of every page
    #[must_use]
    pub fn collect(dashboard: &Dashboard) -> Self {
        let latest_entry = dashboard
            .access_logs
            .source()
            .records()
            .iter()
            .map(|t| t.record.timestamp)
            .max();
        let at_risk_clients = dashboard
            .clients
            .view()
            .iter()
            .filter(|t| t.record.health_band() == HealthBand::AtRisk)
            .count();

        Self {
            access_logs: dashboard.access_logs.stats(),
            latest_entry,
            clients: dashboard.clients.stats(),
            at_risk_clients,
            feedback: dashboard.feedback.stats(),
            nps: dashboard.feedback.nps_summary(),
        }
    }

    /// One line per page, headed by the date of `now`
    #[must_use]
    pub fn render_text(&self, now: DateTime<Utc>) -> String {
        let logs = &self.access_logs;
        let latest = self.latest_entry.map_or_else(
            || "none".to_string(),
            |at| format!("{} ({})", format_timestamp(at), format_relative_time(now, at)),
        );
        let clients = &self.clients;
        let ideas = &self.feedback;

        let lines = [
            format!("Dashboard summary for {}", format_date(now)),
            format!(
                "access logs: {} entries, {}% success, {}% errors, avg {}, {} transferred, latest {latest}",
                logs.total,
                logs.success_rate,
                logs.error_rate,
                format_duration_ms(logs.avg_duration_ms),
                format_bytes(logs.bytes_transferred),
            ),
            format!(
                "clients:     {} clients, {} customers, pipeline {}, {} at risk",
                clients.total_clients,
                clients.total_customers,
                format_currency(clients.pipeline_value),
                self.at_risk_clients,
            ),
            format!(
                "feedback:    {} ideas, {} votes, NPS {}",
                ideas.total_ideas, ideas.total_votes, self.nps.score
            ),
        ];
        lines.join("\n")
    }
}
