use anyhow::Result;
use async_trait::async_trait;

use repairdesk_core::period::DateWindow;
use repairdesk_core::series::{SeriesPoint, SeriesRange};
use repairdesk_core::stats::{
    CustomerTotals, Distribution, OperationRank, RevenueTotals, StatsBackend, TicketTotals,
    TicketValue,
};

use crate::queries::{customers, devices, financial, operations, series, tickets};
use crate::DuckDbBackend;

#[async_trait]
impl StatsBackend for DuckDbBackend {
    async fn ticket_totals(&self, window: &DateWindow) -> Result<TicketTotals> {
        tickets::ticket_totals(self, window).await
    }

    async fn average_repair_days(&self, window: &DateWindow) -> Result<f64> {
        tickets::average_repair_days(self, window).await
    }

    async fn tickets_by_status(&self, window: &DateWindow) -> Result<Vec<Distribution<i64>>> {
        tickets::tickets_by_status(self, window).await
    }

    async fn tickets_series(&self, range: &SeriesRange) -> Result<Vec<SeriesPoint<i64>>> {
        series::tickets_series(self, range).await
    }

    async fn customer_totals(&self) -> Result<CustomerTotals> {
        customers::customer_totals(self).await
    }

    async fn customers_by_type(&self) -> Result<Vec<Distribution<i64>>> {
        customers::customers_by_type(self).await
    }

    async fn top_customers_by_tickets(&self, limit: usize) -> Result<Vec<Distribution<i64>>> {
        customers::top_customers_by_tickets(self, limit).await
    }

    async fn top_customers_by_revenue(&self, limit: usize) -> Result<Vec<Distribution<f64>>> {
        customers::top_customers_by_revenue(self, limit).await
    }

    async fn new_customers_series(&self, range: &SeriesRange) -> Result<Vec<SeriesPoint<i64>>> {
        series::new_customers_series(self, range).await
    }

    async fn tickets_by_device_type(&self) -> Result<Vec<Distribution<i64>>> {
        devices::tickets_by_device_type(self).await
    }

    async fn top_device_brands(&self, limit: usize) -> Result<Vec<Distribution<i64>>> {
        devices::top_device_brands(self, limit).await
    }

    async fn top_device_models(&self, limit: usize) -> Result<Vec<Distribution<i64>>> {
        devices::top_device_models(self, limit).await
    }

    async fn revenue_totals(&self, window: &DateWindow) -> Result<RevenueTotals> {
        operations::revenue_totals(self, window).await
    }

    async fn top_operations_by_count(
        &self,
        window: &DateWindow,
        limit: usize,
    ) -> Result<Vec<OperationRank>> {
        operations::top_operations_by_count(self, window, limit).await
    }

    async fn top_operations_by_revenue(
        &self,
        window: &DateWindow,
        limit: usize,
    ) -> Result<Vec<OperationRank>> {
        operations::top_operations_by_revenue(self, window, limit).await
    }

    async fn operations_series(&self, range: &SeriesRange) -> Result<Vec<SeriesPoint<i64>>> {
        series::operations_series(self, range).await
    }

    async fn revenue_series(&self, range: &SeriesRange) -> Result<Vec<SeriesPoint<f64>>> {
        series::revenue_series(self, range).await
    }

    async fn revenue_by_device_type(
        &self,
        window: &DateWindow,
        limit: usize,
    ) -> Result<Vec<Distribution<f64>>> {
        financial::revenue_by_device_type(self, window, limit).await
    }

    async fn highest_value_ticket(&self, window: &DateWindow) -> Result<Option<TicketValue>> {
        financial::highest_value_ticket(self, window).await
    }
}
