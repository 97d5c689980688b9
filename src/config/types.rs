use serde::Deserialize;

/// Main configuration structure for Agora-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Sections to harvest, in run order
    pub sections: Vec<String>,

    pub site: SiteConfig,

    #[serde(default)]
    pub crawler: CrawlerConfig,

    pub output: OutputConfig,

    #[serde(default)]
    pub export: ExportConfig,
}

/// Target site identification
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Root URL of the petition site, without a trailing path
    #[serde(rename = "root-url")]
    pub root_url: String,

    /// Fixed user-agent header sent on every request; the site rejects
    /// requests without a browser-like identity
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Delay before the single retry after a 503 response (seconds)
    #[serde(rename = "retry-delay-seconds", default = "default_retry_delay")]
    pub retry_delay_seconds: u64,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-seconds", default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            retry_delay_seconds: default_retry_delay(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

fn default_retry_delay() -> u64 {
    30
}

fn default_request_timeout() -> u64 {
    30
}

/// Output locations
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory for item records and per-section state files
    #[serde(rename = "data-dir")]
    pub data_dir: String,

    /// Directory for the flattened TSV argument export
    #[serde(rename = "export-dir")]
    pub export_dir: String,
}

/// Argument export configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// Minimum pro+con argument count for a petition to be exported
    #[serde(rename = "min-arguments", default = "default_min_arguments")]
    pub min_arguments: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            min_arguments: default_min_arguments(),
        }
    }
}

fn default_min_arguments() -> u32 {
    100
}
