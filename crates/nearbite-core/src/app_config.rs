#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Base URL of the restaurant REST API, e.g. `http://localhost:3000/api`.
    pub api_base_url: String,
    pub http_timeout_secs: u64,
    pub user_agent: String,
    /// Radius for the nearby feed.
    pub search_radius_km: f64,
    /// Radius for category listings.
    pub category_radius_km: f64,
    /// Places checked concurrently per open-status batch.
    pub status_batch_size: usize,
    /// Pause between open-status batches.
    pub status_batch_delay_ms: u64,
    /// Period of the background open-status refresh.
    pub status_refresh_secs: u64,
    /// Period of the nearby feed auto-refresh.
    pub feed_refresh_secs: u64,
}
