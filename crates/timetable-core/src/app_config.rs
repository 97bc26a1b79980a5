use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    /// Persisted geodata cache read before a run and written back after it.
    pub geodata_path: PathBuf,
    /// Base URL of the campus map site used for name-search fallback.
    pub map_search_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
}
