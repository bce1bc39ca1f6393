use std::sync::Arc;

use chrono::NaiveDate;
use repairdesk_core::{config::Config, stats::StatsBackend};
use repairdesk_duckdb::DuckDbBackend;

/// Shared application state injected into every Axum handler via
/// [`axum::extract::State`].
pub struct AppState {
    /// Concrete backend, kept for liveness checks.
    pub db: Arc<DuckDbBackend>,

    /// The same backend behind the query interface the report facades use.
    pub stats: Arc<dyn StatsBackend>,

    /// Parsed configuration, loaded once at startup from environment variables.
    pub config: Arc<Config>,

    /// Source of "today" for period resolution; UTC calendar date by default.
    pub today: fn() -> NaiveDate,
}

fn utc_today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}

impl AppState {
    /// Construct a new `AppState` wrapping the given backend and config.
    pub fn new(db: DuckDbBackend, config: Config) -> Self {
        let db = Arc::new(db);
        Self {
            stats: db.clone(),
            db,
            config: Arc::new(config),
            today: utc_today,
        }
    }

    /// Pin the reporting date, for deterministic tests.
    pub fn with_today(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }
}
