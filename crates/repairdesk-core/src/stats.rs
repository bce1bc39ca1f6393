//! Aggregation query interface and the row types it returns.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::period::DateWindow;
use crate::series::{SeriesPoint, SeriesRange};

/// Cap for ranked lists.
pub const TOP_N: usize = 10;
/// Cap for device rankings.
pub const DEVICE_TOP_N: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Pending,
    WaitingParts,
    Repaired,
    NotRepaired,
}

impl TicketStatus {
    pub const ALL: [TicketStatus; 4] = [
        Self::Pending,
        Self::WaitingParts,
        Self::Repaired,
        Self::NotRepaired,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::WaitingParts => "waiting_parts",
            Self::Repaired => "repaired",
            Self::NotRepaired => "not_repaired",
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.as_str() == raw)
            .ok_or_else(|| anyhow!("unknown ticket status: {raw}"))
    }
}

/// A `(label, value)` pair of a grouped distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distribution<V> {
    pub label: String,
    pub value: V,
}

impl<V> Distribution<V> {
    pub fn new(label: impl Into<String>, value: V) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Per-status ticket counts for one window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketTotals {
    pub total: i64,
    pub delivered: i64,
    pub pending: i64,
    pub waiting_parts: i64,
    pub repaired: i64,
    pub not_repaired: i64,
    /// Repaired but not yet handed back.
    pub awaiting_pickup: i64,
}

/// Revenue aggregates over delivered, repaired tickets.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueTotals {
    pub revenue: f64,
    pub paid_tickets: i64,
    pub operations: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerTotals {
    pub total: i64,
    pub with_tickets: i64,
    /// Customers with more than one ticket.
    pub repeat: i64,
    pub tickets: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketValue {
    pub ticket_id: i64,
    pub customer_name: String,
    pub device_label: String,
    pub total: f64,
}

/// An operation ranking row: how often it was performed and what it earned.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationRank {
    pub label: String,
    pub count: i64,
    pub revenue: f64,
}

/// Read-only aggregation queries over the repair-shop records.
///
/// Implementations must apply the delivered-and-repaired filter to every
/// revenue figure, coalesce missing aggregates to zero, and order
/// distributions by value descending then label ascending.
#[async_trait::async_trait]
pub trait StatsBackend: Send + Sync + 'static {
    async fn ticket_totals(&self, window: &DateWindow) -> Result<TicketTotals>;

    /// Mean days between creation and last update of repaired tickets.
    async fn average_repair_days(&self, window: &DateWindow) -> Result<f64>;

    async fn tickets_by_status(&self, window: &DateWindow) -> Result<Vec<Distribution<i64>>>;

    async fn tickets_series(&self, range: &SeriesRange) -> Result<Vec<SeriesPoint<i64>>>;

    async fn customer_totals(&self) -> Result<CustomerTotals>;

    async fn customers_by_type(&self) -> Result<Vec<Distribution<i64>>>;

    async fn top_customers_by_tickets(&self, limit: usize) -> Result<Vec<Distribution<i64>>>;

    async fn top_customers_by_revenue(&self, limit: usize) -> Result<Vec<Distribution<f64>>>;

    async fn new_customers_series(&self, range: &SeriesRange) -> Result<Vec<SeriesPoint<i64>>>;

    async fn tickets_by_device_type(&self) -> Result<Vec<Distribution<i64>>>;

    async fn top_device_brands(&self, limit: usize) -> Result<Vec<Distribution<i64>>>;

    async fn top_device_models(&self, limit: usize) -> Result<Vec<Distribution<i64>>>;

    async fn revenue_totals(&self, window: &DateWindow) -> Result<RevenueTotals>;

    async fn top_operations_by_count(
        &self,
        window: &DateWindow,
        limit: usize,
    ) -> Result<Vec<OperationRank>>;

    async fn top_operations_by_revenue(
        &self,
        window: &DateWindow,
        limit: usize,
    ) -> Result<Vec<OperationRank>>;

    async fn operations_series(&self, range: &SeriesRange) -> Result<Vec<SeriesPoint<i64>>>;

    async fn revenue_series(&self, range: &SeriesRange) -> Result<Vec<SeriesPoint<f64>>>;

    async fn revenue_by_device_type(
        &self,
        window: &DateWindow,
        limit: usize,
    ) -> Result<Vec<Distribution<f64>>>;

    /// Highest summed operation price, lowest ticket id on ties.
    async fn highest_value_ticket(&self, window: &DateWindow) -> Result<Option<TicketValue>>;
}
