//! Report facades.
//!
//! Each facade resolves its period once, fans its aggregation queries out
//! concurrently and composes the payload. A failing query aborts the whole
//! report; there are no partial reports.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::compose::{average, compare, compare_counts, percent_of, round2, trend, Comparison, Trend};
use crate::error::ReportError;
use crate::period::{Period, PeriodSummary, PeriodToken};
use crate::series::{Granularity, SeriesRange};
use crate::stats::{
    Distribution, OperationRank, StatsBackend, TicketStatus, TicketValue, DEVICE_TOP_N, TOP_N,
};

/// Weekly buckets shown in the customer acquisition trend.
const CUSTOMER_TREND_WEEKS: u32 = 12;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketReport {
    pub period: PeriodSummary,
    pub total_tickets: Comparison<i64>,
    pub by_status: Vec<Distribution<i64>>,
    pub delivered: i64,
    pub awaiting_pickup: i64,
    pub repair_rate: i64,
    pub delivery_rate: i64,
    pub average_repair_days: f64,
    pub tickets_over_time: Trend<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerReport {
    pub total_customers: i64,
    pub customers_with_tickets: i64,
    pub repeat_customers: i64,
    pub repeat_rate: i64,
    pub average_tickets_per_customer: f64,
    pub by_type: Vec<Distribution<i64>>,
    pub top_by_tickets: Vec<Distribution<i64>>,
    pub top_by_revenue: Vec<Distribution<f64>>,
    pub new_customers_over_time: Trend<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceReport {
    pub total_tickets: i64,
    pub by_type: Vec<Distribution<i64>>,
    pub top_brands: Vec<Distribution<i64>>,
    pub top_models: Vec<Distribution<i64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationReport {
    pub period: PeriodSummary,
    pub total_operations: i64,
    pub total_revenue: f64,
    pub average_price: f64,
    pub top_by_count: Vec<OperationRank>,
    pub top_by_revenue: Vec<OperationRank>,
    pub operations_over_time: Trend<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialReport {
    pub period: PeriodSummary,
    pub total_revenue: f64,
    pub previous_revenue: f64,
    pub revenue_change: i64,
    pub paid_tickets: i64,
    pub previous_paid_tickets: i64,
    pub tickets_change: i64,
    pub average_ticket_value: f64,
    pub highest_value_ticket: Option<TicketValue>,
    pub revenue_by_device_type: Vec<Distribution<f64>>,
    pub revenue_over_time: Trend<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub tickets: TicketReport,
    pub customers: CustomerReport,
    pub devices: DeviceReport,
    pub operations: OperationReport,
    pub financial: FinancialReport,
}

#[tracing::instrument(skip(db))]
pub async fn ticket_report(
    db: &dyn StatsBackend,
    token: PeriodToken,
    today: NaiveDate,
) -> Result<TicketReport, ReportError> {
    let period = Period::resolve(token, today);
    let range = period.series_range(today);

    let previous_totals = async {
        match period.previous {
            Some(window) => db.ticket_totals(&window).await.map(Some),
            None => Ok(None),
        }
    };

    let (totals, previous, by_status, repair_days, series) = tokio::try_join!(
        db.ticket_totals(&period.current),
        previous_totals,
        db.tickets_by_status(&period.current),
        db.average_repair_days(&period.current),
        db.tickets_series(&range),
    )
    .map_err(ReportError::compute("ticket"))?;

    debug!(total = totals.total, "ticket report computed");

    Ok(TicketReport {
        period: period.summary(),
        total_tickets: compare_counts(totals.total, previous.map(|p| p.total)),
        by_status: complete_statuses(by_status),
        delivered: totals.delivered,
        awaiting_pickup: totals.awaiting_pickup,
        repair_rate: percent_of(totals.repaired as f64, totals.total as f64),
        delivery_rate: percent_of(totals.delivered as f64, totals.total as f64),
        average_repair_days: round2(repair_days),
        tickets_over_time: trend(&series, &range),
    })
}

#[tracing::instrument(skip(db))]
pub async fn customer_report(
    db: &dyn StatsBackend,
    today: NaiveDate,
) -> Result<CustomerReport, ReportError> {
    let range = SeriesRange::new(Granularity::Weekly, CUSTOMER_TREND_WEEKS, today);

    let (totals, by_type, top_by_tickets, top_by_revenue, series) = tokio::try_join!(
        db.customer_totals(),
        db.customers_by_type(),
        db.top_customers_by_tickets(TOP_N),
        db.top_customers_by_revenue(TOP_N),
        db.new_customers_series(&range),
    )
    .map_err(ReportError::compute("customer"))?;

    debug!(total = totals.total, "customer report computed");

    Ok(CustomerReport {
        total_customers: totals.total,
        customers_with_tickets: totals.with_tickets,
        repeat_customers: totals.repeat,
        repeat_rate: percent_of(totals.repeat as f64, totals.with_tickets as f64),
        average_tickets_per_customer: average(totals.tickets as f64, totals.total as f64),
        by_type,
        top_by_tickets,
        top_by_revenue: round_values(top_by_revenue),
        new_customers_over_time: trend(&series, &range),
    })
}

#[tracing::instrument(skip(db))]
pub async fn device_report(db: &dyn StatsBackend) -> Result<DeviceReport, ReportError> {
    let (by_type, top_brands, top_models) = tokio::try_join!(
        db.tickets_by_device_type(),
        db.top_device_brands(DEVICE_TOP_N),
        db.top_device_models(DEVICE_TOP_N),
    )
    .map_err(ReportError::compute("device"))?;

    Ok(DeviceReport {
        total_tickets: by_type.iter().map(|d| d.value).sum(),
        by_type,
        top_brands,
        top_models,
    })
}

#[tracing::instrument(skip(db))]
pub async fn operation_report(
    db: &dyn StatsBackend,
    token: PeriodToken,
    today: NaiveDate,
) -> Result<OperationReport, ReportError> {
    let period = Period::resolve(token, today);
    let range = period.series_range(today);

    let (totals, top_by_count, top_by_revenue, series) = tokio::try_join!(
        db.revenue_totals(&period.current),
        db.top_operations_by_count(&period.current, TOP_N),
        db.top_operations_by_revenue(&period.current, TOP_N),
        db.operations_series(&range),
    )
    .map_err(ReportError::compute("operation"))?;

    debug!(operations = totals.operations, "operation report computed");

    Ok(OperationReport {
        period: period.summary(),
        total_operations: totals.operations,
        total_revenue: round2(totals.revenue),
        average_price: average(totals.revenue, totals.operations as f64),
        top_by_count,
        top_by_revenue,
        operations_over_time: trend(&series, &range),
    })
}

#[tracing::instrument(skip(db))]
pub async fn financial_report(
    db: &dyn StatsBackend,
    token: PeriodToken,
    today: NaiveDate,
) -> Result<FinancialReport, ReportError> {
    let period = Period::resolve(token, today);
    let range = period.series_range(today);

    let previous_totals = async {
        match period.previous {
            Some(window) => db.revenue_totals(&window).await.map(Some),
            None => Ok(None),
        }
    };

    let (current, previous, highest, by_device_type, series) = tokio::try_join!(
        db.revenue_totals(&period.current),
        previous_totals,
        db.highest_value_ticket(&period.current),
        db.revenue_by_device_type(&period.current, TOP_N),
        db.revenue_series(&range),
    )
    .map_err(ReportError::compute("financial"))?;

    let revenue = compare(round2(current.revenue), previous.as_ref().map(|p| round2(p.revenue)));
    let tickets = compare_counts(current.paid_tickets, previous.map(|p| p.paid_tickets));

    debug!(revenue = revenue.current, "financial report computed");

    Ok(FinancialReport {
        period: period.summary(),
        total_revenue: revenue.current,
        previous_revenue: revenue.previous,
        revenue_change: revenue.change,
        paid_tickets: tickets.current,
        previous_paid_tickets: tickets.previous,
        tickets_change: tickets.change,
        average_ticket_value: average(current.revenue, current.paid_tickets as f64),
        highest_value_ticket: highest.map(|t| TicketValue {
            total: round2(t.total),
            ..t
        }),
        revenue_by_device_type: round_values(by_device_type),
        revenue_over_time: trend(&series, &range),
    })
}

/// All five reports, computed concurrently.
#[tracing::instrument(skip(db))]
pub async fn dashboard(
    db: &dyn StatsBackend,
    token: PeriodToken,
    today: NaiveDate,
) -> Result<Dashboard, ReportError> {
    let (tickets, customers, devices, operations, financial) = tokio::try_join!(
        ticket_report(db, token, today),
        customer_report(db, today),
        device_report(db),
        operation_report(db, token, today),
        financial_report(db, token, today),
    )?;

    Ok(Dashboard {
        tickets,
        customers,
        devices,
        operations,
        financial,
    })
}

/// Every status appears exactly once, zero when absent, ordered by count
/// descending then label.
fn complete_statuses(raw: Vec<Distribution<i64>>) -> Vec<Distribution<i64>> {
    let mut rows: Vec<Distribution<i64>> = TicketStatus::ALL
        .iter()
        .map(|status| {
            let value = raw
                .iter()
                .filter(|d| d.label == status.as_str())
                .map(|d| d.value)
                .sum();
            Distribution::new(status.as_str(), value)
        })
        .collect();
    rows.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.label.cmp(&b.label)));
    rows
}

fn round_values(rows: Vec<Distribution<f64>>) -> Vec<Distribution<f64>> {
    rows.into_iter()
        .map(|d| Distribution {
            value: round2(d.value),
            label: d.label,
        })
        .collect()
}
