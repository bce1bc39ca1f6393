pub mod compose;
pub mod config;
pub mod error;
pub mod period;
pub mod reports;
pub mod series;
pub mod stats;
