#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_dir: String,
    pub db_file: String,
    /// DuckDB size string such as `"1GB"` or `"512MB"`.
    pub duckdb_memory_limit: String,
    /// Empty means any origin.
    pub cors_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            port: std::env::var("REPAIRDESK_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|e| format!("invalid port: {e}"))?,
            data_dir: std::env::var("REPAIRDESK_DATA_DIR")
                .unwrap_or_else(|_| "./data".to_string()),
            db_file: std::env::var("REPAIRDESK_DB_FILE")
                .unwrap_or_else(|_| "repairdesk.db".to_string()),
            duckdb_memory_limit: std::env::var("REPAIRDESK_DUCKDB_MEMORY")
                .unwrap_or_else(|_| "1GB".to_string()),
            cors_origins: std::env::var("REPAIRDESK_CORS_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
        })
    }

    pub fn db_path(&self) -> String {
        format!("{}/{}", self.data_dir.trim_end_matches('/'), self.db_file)
    }
}
