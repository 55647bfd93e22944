use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use tracing::trace;

use crate::util::{get_dashboard_addr, get_db_path};

#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct Config {
    #[serde(default)]
    pub monitor: MonitorConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// What to probe and how often
#[derive(Debug, Clone, serde::Deserialize)]
pub struct MonitorConfig {
    #[serde(default = "default_interval")]
    pub interval_secs: u64,

    /// Host for the raw connect stage
    #[serde(default = "default_target_host")]
    pub target_host: String,

    #[serde(default = "default_target_port")]
    pub target_port: u16,

    /// URL fetched by the HTTP stage
    #[serde(default = "default_check_url")]
    pub check_url: String,

    /// Escalating per-stage timeouts
    #[serde(default = "default_timeouts")]
    pub timeouts_secs: Vec<u64>,
}

/// SQLite file and retention policy
#[derive(Debug, Clone, serde::Deserialize)]
pub struct StorageConfig {
    #[serde(default = "get_db_path")]
    pub path: PathBuf,

    /// Instant samples older than this are swept
    #[serde(default = "default_retention_hours")]
    pub retention_hours: u64,

    #[serde(default = "default_cleanup_interval_hours")]
    pub cleanup_interval_hours: u64,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub log_up: bool,

    #[serde(default = "default_true")]
    pub log_down: bool,

    #[serde(default)]
    pub log_debug: bool,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "get_dashboard_addr")]
    pub bind_addr: SocketAddr,

    /// Directory with the static dashboard assets
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,

    #[serde(default = "default_true")]
    pub enable_cors: bool,
}

impl MonitorConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn timeouts(&self) -> Vec<Duration> {
        self.timeouts_secs
            .iter()
            .copied()
            .map(Duration::from_secs)
            .collect()
    }
}

impl StorageConfig {
    pub fn retention(&self) -> Duration {
        hours_to_duration(self.retention_hours).unwrap_or(Duration::MAX)
    }

    pub fn cleanup_interval(&self) -> Duration {
        hours_to_duration(self.cleanup_interval_hours).unwrap_or(Duration::MAX)
    }
}

/// `None` when the hour count does not fit in whole seconds
fn hours_to_duration(hours: u64) -> Option<Duration> {
    hours.checked_mul(3600).map(Duration::from_secs)
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval(),
            target_host: default_target_host(),
            target_port: default_target_port(),
            check_url: default_check_url(),
            timeouts_secs: default_timeouts(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: get_db_path(),
            retention_hours: default_retention_hours(),
            cleanup_interval_hours: default_cleanup_interval_hours(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_up: false,
            log_down: true,
            log_debug: false,
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            bind_addr: get_dashboard_addr(),
            static_dir: default_static_dir(),
            enable_cors: true,
        }
    }
}

fn default_interval() -> u64 {
    30
}

fn default_target_host() -> String {
    String::from("www.google.com")
}

fn default_target_port() -> u16 {
    443
}

fn default_check_url() -> String {
    String::from("https://www.google.com")
}

fn default_timeouts() -> Vec<u64> {
    vec![2, 4, 8]
}

fn default_retention_hours() -> u64 {
    48
}

fn default_cleanup_interval_hours() -> u64 {
    24
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("./dashboard")
}

fn default_true() -> bool {
    true
}

impl Config {
    fn validate(self) -> anyhow::Result<Self> {
        if self.monitor.interval_secs == 0 {
            anyhow::bail!("monitor.interval_secs must be greater than zero");
        }
        if self.monitor.timeouts_secs.is_empty() {
            anyhow::bail!("monitor.timeouts_secs must list at least one stage");
        }
        if self.storage.cleanup_interval_hours == 0 {
            anyhow::bail!("storage.cleanup_interval_hours must be greater than zero");
        }
        if hours_to_duration(self.storage.retention_hours).is_none() {
            anyhow::bail!(
                "storage.retention_hours is too large: {}",
                self.storage.retention_hours
            );
        }
        if hours_to_duration(self.storage.cleanup_interval_hours).is_none() {
            anyhow::bail!(
                "storage.cleanup_interval_hours is too large: {}",
                self.storage.cleanup_interval_hours
            );
        }
        Ok(self)
    }
}

pub fn parse_config(content: &str) -> anyhow::Result<Config> {
    serde_json::from_str::<Config>(content)
        .map_err(|e| anyhow::anyhow!("Invalid configuration file provided: {e}"))?
        .validate()
}

pub fn read_config_file(path: &str) -> anyhow::Result<Config> {
    let file_content = std::fs::read_to_string(path)?;
    parse_config(&file_content).inspect(|config| trace!("loaded config: {config:?}"))
}

/// Config file if one was given, defaults otherwise
pub fn load_config(path: Option<&str>) -> anyhow::Result<Config> {
    match path {
        Some(path) => read_config_file(path),
        None => Config::default().validate(),
    }
}
