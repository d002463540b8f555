//! Configuration management for the dashboard pages

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Which data-access backend the pages talk to
    #[serde(default)]
    pub store: StoreConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Per-page behaviour
    #[serde(default)]
    pub pages: PagesConfig,

    /// Export configuration
    #[serde(default)]
    pub export: ExportConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database URL
    #[serde(default = "default_database_url")]
    pub url: String,

    /// Maximum number of connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Minimum number of connections
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,

    /// Idle timeout in seconds
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout: u64,
}

/// Data-access backend selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// Process-local collections, nothing persisted
    #[default]
    Memory,
    /// `PostgreSQL` through the configured database URL
    Postgres,
}

/// Store configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Backend used for `list/create/update/delete/subscribe`
    #[serde(default)]
    pub backend: StoreBackend,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json or text)
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Log to file
    #[serde(default)]
    pub file: Option<PathBuf>,
}

/// How the static seed and the collaborator-backed list are combined
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// Live records when any were fetched, otherwise the seed
    #[default]
    LiveOrSeed,
    /// Live records followed by every seed record
    LiveThenSeed,
    /// Only the seed, live results are ignored
    SeedOnly,
    /// Only live records, the seed is never shown
    LiveOnly,
}

/// Which completed fetch is allowed to replace the displayed list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchOrdering {
    /// Whichever fetch settles last overwrites the list
    #[default]
    LastSettled,
    /// Completions of fetches that were superseded before settling are dropped
    LatestIssued,
}

/// Default sort applied to the idea board
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdeaSortConfig {
    /// Most votes first
    #[default]
    Votes,
    /// Newest first
    Recent,
    /// Highest impact score first
    Trending,
}

/// Behaviour shared by all pages plus page-specific sections
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PagesConfig {
    /// Fetch completion ordering for every page
    #[serde(default)]
    pub fetch_ordering: FetchOrdering,

    /// Access logs page
    #[serde(default)]
    pub access_logs: AccessLogsPageConfig,

    /// CRM clients page
    #[serde(default)]
    pub clients: ClientsPageConfig,

    /// Feedback board page
    #[serde(default)]
    pub feedback: FeedbackPageConfig,
}

/// Access logs page configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessLogsPageConfig {
    /// Maximum records requested per fetch
    #[serde(default = "default_fetch_limit")]
    pub fetch_limit: usize,

    /// Records older than this are removed by "clear old logs"
    #[serde(default = "default_retention_days")]
    pub retention_days: i64,

    /// Open the push subscription when the page starts
    #[serde(default)]
    pub live_tail: bool,

    /// Seed/live merge policy
    #[serde(default = "default_access_logs_merge")]
    pub merge: MergePolicy,
}

/// CRM clients page configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientsPageConfig {
    /// Seed/live merge policy
    #[serde(default = "default_concat_merge")]
    pub merge: MergePolicy,
}

/// Feedback board configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackPageConfig {
    /// Seed/live merge policy
    #[serde(default = "default_concat_merge")]
    pub merge: MergePolicy,

    /// Reject a second vote from a voter already listed on the idea
    #[serde(default)]
    pub dedupe_votes: bool,

    /// Initial sort of the board
    #[serde(default)]
    pub default_sort: IdeaSortConfig,
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory export files are written to
    #[serde(default = "default_export_dir")]
    pub directory: PathBuf,
}

// Default value functions
fn default_database_url() -> String {
    "postgresql://localhost/dashboard".to_string()
}

const fn default_max_connections() -> u32 {
    10
}

const fn default_min_connections() -> u32 {
    1
}

const fn default_connect_timeout() -> u64 {
    30
}

const fn default_idle_timeout() -> u64 {
    600
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

const fn default_fetch_limit() -> usize {
    100
}

const fn default_retention_days() -> i64 {
    30
}

const fn default_access_logs_merge() -> MergePolicy {
    MergePolicy::LiveOrSeed
}

const fn default_concat_merge() -> MergePolicy {
    MergePolicy::LiveThenSeed
}

fn default_export_dir() -> PathBuf {
    PathBuf::from("exports")
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout: default_connect_timeout(),
            idle_timeout: default_idle_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

impl Default for AccessLogsPageConfig {
    fn default() -> Self {
        Self {
            fetch_limit: default_fetch_limit(),
            retention_days: default_retention_days(),
            live_tail: false,
            merge: default_access_logs_merge(),
        }
    }
}

impl Default for ClientsPageConfig {
    fn default() -> Self {
        Self {
            merge: default_concat_merge(),
        }
    }
}

impl Default for FeedbackPageConfig {
    fn default() -> Self {
        Self {
            merge: default_concat_merge(),
            dedupe_votes: false,
            default_sort: IdeaSortConfig::default(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: default_export_dir(),
        }
    }
}

impl Config {
    /// Load configuration from `dashboard.toml` (optional) and `DASHBOARD__*` variables
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or parsed.
    pub fn load() -> crate::Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration from an explicit file, falling back to `dashboard.toml`
    ///
    /// # Errors
    ///
    /// Returns an error if the file is unreadable or a value has the wrong shape.
    pub fn load_from(path: Option<&std::path::Path>) -> crate::Result<Self> {
        let file = path.map_or_else(
            || config::File::with_name("dashboard").required(false),
            |p| config::File::from(p).required(true),
        );

        let config = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("DASHBOARD")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()
            .map_err(|e| crate::Error::Configuration {
                message: e.to_string(),
            })?;

        config
            .try_deserialize()
            .map_err(|e| crate::Error::Configuration {
                message: e.to_string(),
            })
    }
}
