use chrono::{Duration, NaiveDate, NaiveDateTime};

use repairdesk_core::period::PeriodToken;
use repairdesk_core::reports::{
    customer_report, dashboard, device_report, financial_report, operation_report, ticket_report,
};
use repairdesk_core::stats::{StatsBackend, TicketStatus};
use repairdesk_duckdb::fixtures::TicketFixture;
use repairdesk_duckdb::DuckDbBackend;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 15).expect("date")
}

fn days_ago(days: i64) -> NaiveDateTime {
    (today() - Duration::days(days))
        .and_hms_opt(10, 0, 0)
        .expect("time")
}

async fn paid_ticket(db: &DuckDbBackend, id: i64, days: i64, prices: &[f64]) {
    db.insert_ticket(&TicketFixture::paid(id, days_ago(days)))
        .await
        .expect("insert ticket");
    for (i, price) in prices.iter().enumerate() {
        db.insert_ticket_operation(id * 100 + i as i64, id, 1, *price)
            .await
            .expect("insert ticket operation");
    }
}

#[tokio::test]
async fn test_week_of_daily_tickets_fills_seven_buckets() {
    let db = DuckDbBackend::open_in_memory().expect("db");
    for i in 0..7 {
        paid_ticket(&db, i + 1, i, &[]).await;
    }

    let report = ticket_report(&db, PeriodToken::Week, today())
        .await
        .expect("ticket report");

    let points = &report.tickets_over_time.points;
    assert_eq!(points.len(), 7);
    assert!(points.iter().all(|p| p.value == 1));
    assert_eq!(points[0].bucket, "2026-03-09");
    assert_eq!(points[6].bucket, "2026-03-15");
    assert!(points.windows(2).all(|w| w[0].bucket < w[1].bucket));

    assert_eq!(report.total_tickets.current, 7);
    assert_eq!(report.total_tickets.previous, 0);
    assert_eq!(report.total_tickets.change, 0);
    assert_eq!(report.repair_rate, 100);
    assert_eq!(report.delivery_rate, 100);
}

#[tokio::test]
async fn test_empty_month_financial_report_is_zero_filled() {
    let db = DuckDbBackend::open_in_memory().expect("db");
    // Outside both the current and previous month windows.
    paid_ticket(&db, 1, 90, &[250.0]).await;

    let report = financial_report(&db, PeriodToken::Month, today())
        .await
        .expect("financial report");

    assert_eq!(report.total_revenue, 0.0);
    assert_eq!(report.revenue_change, 0);
    assert_eq!(report.paid_tickets, 0);
    assert_eq!(report.average_ticket_value, 0.0);
    assert!(report.highest_value_ticket.is_none());
    assert!(report.revenue_by_device_type.is_empty());

    let trend = &report.revenue_over_time;
    assert!(!trend.has_data);
    assert_eq!(trend.points.len(), 30);
    assert!(trend.points.iter().all(|p| p.value == 0.0));
    assert_eq!(trend.points[0].bucket, "2026-02-14");
    assert_eq!(trend.points[29].bucket, "2026-03-15");
}

#[tokio::test]
async fn test_revenue_only_counts_delivered_repaired_tickets() {
    let db = DuckDbBackend::open_in_memory().expect("db");
    db.insert_customer(1, "Ada", "individual", days_ago(40))
        .await
        .expect("customer");
    db.insert_customer(2, "Bob", "business", days_ago(40))
        .await
        .expect("customer");
    db.insert_device_type(1, "Phone").await.expect("type");
    db.insert_operation(1, "Screen replacement", 100.0)
        .await
        .expect("operation");
    db.insert_operation(2, "Battery", 50.0).await.expect("operation");

    let tickets = [
        TicketFixture::paid(1, days_ago(2)).customer(1),
        TicketFixture::paid(2, days_ago(2))
            .customer(2)
            .status(TicketStatus::Repaired, false),
        TicketFixture::paid(3, days_ago(3))
            .customer(2)
            .status(TicketStatus::NotRepaired, true),
        TicketFixture::paid(4, days_ago(4))
            .customer(2)
            .status(TicketStatus::Pending, false),
    ];
    for ticket in &tickets {
        let mut ticket = ticket.clone();
        ticket.device_type_id = Some(1);
        db.insert_ticket(&ticket).await.expect("ticket");
    }
    db.insert_ticket_operation(1, 1, 1, 100.0).await.expect("op");
    db.insert_ticket_operation(2, 1, 2, 50.0).await.expect("op");
    db.insert_ticket_operation(3, 2, 1, 80.0).await.expect("op");
    db.insert_ticket_operation(4, 3, 2, 30.0).await.expect("op");
    db.insert_ticket_operation(5, 4, 2, 20.0).await.expect("op");

    let financial = financial_report(&db, PeriodToken::Month, today())
        .await
        .expect("financial report");
    assert_eq!(financial.total_revenue, 150.0);
    assert_eq!(financial.paid_tickets, 1);
    assert_eq!(financial.average_ticket_value, 150.0);
    assert_eq!(financial.revenue_by_device_type.len(), 1);
    assert_eq!(financial.revenue_by_device_type[0].value, 150.0);
    let revenue_sum: f64 = financial.revenue_over_time.points.iter().map(|p| p.value).sum();
    assert_eq!(revenue_sum, 150.0);

    let operations = operation_report(&db, PeriodToken::Month, today())
        .await
        .expect("operation report");
    assert_eq!(operations.total_operations, 2);
    assert_eq!(operations.total_revenue, 150.0);
    assert_eq!(operations.average_price, 75.0);
    assert_eq!(operations.top_by_revenue[0].label, "Screen replacement");
    assert_eq!(operations.top_by_count.len(), 2);

    let customers = customer_report(&db, today()).await.expect("customer report");
    assert_eq!(customers.top_by_revenue.len(), 1);
    assert_eq!(customers.top_by_revenue[0].label, "Ada");

    let tickets = ticket_report(&db, PeriodToken::Month, today())
        .await
        .expect("ticket report");
    assert_eq!(tickets.total_tickets.current, 4);
    assert_eq!(tickets.awaiting_pickup, 1);
    assert_eq!(tickets.delivered, 2);
}

#[tokio::test]
async fn test_highest_value_ticket_prefers_lowest_id_on_tie() {
    let db = DuckDbBackend::open_in_memory().expect("db");
    db.insert_customer(1, "Grace", "individual", days_ago(10))
        .await
        .expect("customer");
    db.insert_device_brand(1, "Apple").await.expect("brand");
    db.insert_device_model(1, 1, "iPhone 12").await.expect("model");

    paid_ticket(&db, 5, 1, &[100.0]).await;
    db.insert_ticket(&TicketFixture::paid(3, days_ago(2)).customer(1).device(1, 1, 1))
        .await
        .expect("ticket");
    db.insert_ticket_operation(31, 3, 1, 60.0).await.expect("op");
    db.insert_ticket_operation(32, 3, 1, 40.0).await.expect("op");

    let top = db
        .highest_value_ticket(&repairdesk_core::period::DateWindow::unbounded())
        .await
        .expect("query")
        .expect("a ticket");
    assert_eq!(top.ticket_id, 3);
    assert_eq!(top.customer_name, "Grace");
    assert_eq!(top.device_label, "Apple iPhone 12");
    assert_eq!(top.total, 100.0);
}

#[tokio::test]
async fn test_financial_change_against_previous_week() {
    let db = DuckDbBackend::open_in_memory().expect("db");
    paid_ticket(&db, 1, 0, &[50.0]).await;
    paid_ticket(&db, 2, 1, &[50.0]).await;
    paid_ticket(&db, 3, 6, &[50.0]).await;
    paid_ticket(&db, 4, 7, &[50.0]).await;
    paid_ticket(&db, 5, 13, &[50.0]).await;
    // Three weeks ago: in neither window.
    paid_ticket(&db, 6, 21, &[500.0]).await;

    let report = financial_report(&db, PeriodToken::Week, today())
        .await
        .expect("financial report");
    assert_eq!(report.total_revenue, 150.0);
    assert_eq!(report.previous_revenue, 100.0);
    assert_eq!(report.revenue_change, 50);
    assert_eq!(report.paid_tickets, 3);
    assert_eq!(report.previous_paid_tickets, 2);
    assert_eq!(report.tickets_change, 50);

    let all_time = financial_report(&db, PeriodToken::All, today())
        .await
        .expect("financial report");
    assert_eq!(all_time.total_revenue, 750.0);
    assert_eq!(all_time.revenue_change, 0);
}

#[tokio::test]
async fn test_device_rankings_break_ties_by_label() {
    let db = DuckDbBackend::open_in_memory().expect("db");
    db.insert_device_type(1, "Phone").await.expect("type");
    for (id, name) in [(1, "Samsung"), (2, "Apple"), (3, "Nokia")] {
        db.insert_device_brand(id, name).await.expect("brand");
        db.insert_device_model(id, id, "Model X").await.expect("model");
    }
    let brands = [1, 2, 1, 2, 3];
    for (i, brand) in brands.iter().enumerate() {
        let ticket = TicketFixture::paid(i as i64 + 1, days_ago(1)).device(1, *brand, *brand);
        db.insert_ticket(&ticket).await.expect("ticket");
    }

    let first = device_report(&db).await.expect("device report");
    let second = device_report(&db).await.expect("device report");
    assert_eq!(first, second);

    let labels: Vec<&str> = first.top_brands.iter().map(|d| d.label.as_str()).collect();
    assert_eq!(labels, vec!["Apple", "Samsung", "Nokia"]);
    assert_eq!(first.top_brands[0].value, 2);
    assert_eq!(first.top_brands[1].value, 2);

    let models: Vec<&str> = first.top_models.iter().map(|d| d.label.as_str()).collect();
    assert_eq!(models, vec!["Apple Model X", "Samsung Model X", "Nokia Model X"]);
    assert_eq!(first.total_tickets, 5);
}

#[tokio::test]
async fn test_device_rankings_are_capped_at_five() {
    let db = DuckDbBackend::open_in_memory().expect("db");
    for id in 1..=7 {
        db.insert_device_brand(id, &format!("Brand {id}"))
            .await
            .expect("brand");
        db.insert_ticket(&TicketFixture::paid(id, days_ago(1)).device(1, id, id))
            .await
            .expect("ticket");
    }

    let report = device_report(&db).await.expect("device report");
    assert_eq!(report.top_brands.len(), 5);
    assert_eq!(report.top_brands[0].label, "Brand 1");
    // No device_types rows: every ticket falls into the Unknown bucket.
    assert_eq!(report.by_type.len(), 1);
    assert_eq!(report.by_type[0].label, "Unknown");
    assert_eq!(report.by_type[0].value, 7);
}

#[tokio::test]
async fn test_customer_report_counts_repeat_customers_and_weekly_signups() {
    let db = DuckDbBackend::open_in_memory().expect("db");
    db.insert_customer(1, "Ada", "individual", days_ago(1))
        .await
        .expect("customer");
    db.insert_customer(2, "Bob", "business", days_ago(10))
        .await
        .expect("customer");
    db.insert_customer(3, "Cy", "individual", days_ago(100))
        .await
        .expect("customer");

    db.insert_ticket(&TicketFixture::paid(1, days_ago(1)).customer(1))
        .await
        .expect("ticket");
    db.insert_ticket(&TicketFixture::paid(2, days_ago(1)).customer(1))
        .await
        .expect("ticket");
    db.insert_ticket(&TicketFixture::paid(3, days_ago(5)).customer(2))
        .await
        .expect("ticket");

    let report = customer_report(&db, today()).await.expect("customer report");
    assert_eq!(report.total_customers, 3);
    assert_eq!(report.customers_with_tickets, 2);
    assert_eq!(report.repeat_customers, 1);
    assert_eq!(report.repeat_rate, 50);
    assert_eq!(report.average_tickets_per_customer, 1.0);

    let by_type: Vec<(&str, i64)> = report
        .by_type
        .iter()
        .map(|d| (d.label.as_str(), d.value))
        .collect();
    assert_eq!(by_type, vec![("individual", 2), ("business", 1)]);
    assert_eq!(report.top_by_tickets[0].label, "Ada");
    assert_eq!(report.top_by_tickets[0].value, 2);

    let weeks = &report.new_customers_over_time.points;
    assert_eq!(weeks.len(), 12);
    assert_eq!(weeks[11].bucket, "2026-03-09");
    assert_eq!(weeks[11].value, 1);
    assert_eq!(weeks[10].bucket, "2026-03-02");
    assert_eq!(weeks[10].value, 1);
    assert_eq!(weeks.iter().map(|p| p.value).sum::<i64>(), 2);
}

#[tokio::test]
async fn test_average_repair_days_and_status_breakdown() {
    let db = DuckDbBackend::open_in_memory().expect("db");
    db.insert_ticket(&TicketFixture::paid(1, days_ago(5)).updated_at(days_ago(3)))
        .await
        .expect("ticket");
    let created = days_ago(4);
    db.insert_ticket(&TicketFixture::paid(2, created).updated_at(created + Duration::hours(36)))
        .await
        .expect("ticket");
    db.insert_ticket(&TicketFixture::paid(3, days_ago(2)).status(TicketStatus::WaitingParts, false))
        .await
        .expect("ticket");

    let report = ticket_report(&db, PeriodToken::Week, today())
        .await
        .expect("ticket report");
    assert_eq!(report.average_repair_days, 1.75);

    let statuses: Vec<(&str, i64)> = report
        .by_status
        .iter()
        .map(|d| (d.label.as_str(), d.value))
        .collect();
    assert_eq!(
        statuses,
        vec![
            ("repaired", 2),
            ("waiting_parts", 1),
            ("not_repaired", 0),
            ("pending", 0)
        ]
    );
}

#[tokio::test]
async fn test_year_report_uses_monthly_buckets() {
    let db = DuckDbBackend::open_in_memory().expect("db");
    db.insert_ticket(&TicketFixture::paid(
        1,
        NaiveDate::from_ymd_opt(2026, 1, 10)
            .and_then(|d| d.and_hms_opt(9, 0, 0))
            .expect("ts"),
    ))
    .await
    .expect("ticket");
    db.insert_ticket(&TicketFixture::paid(
        2,
        NaiveDate::from_ymd_opt(2025, 5, 3)
            .and_then(|d| d.and_hms_opt(9, 0, 0))
            .expect("ts"),
    ))
    .await
    .expect("ticket");

    let report = ticket_report(&db, PeriodToken::Year, today())
        .await
        .expect("ticket report");
    let points = &report.tickets_over_time.points;
    assert_eq!(points.len(), 13);
    assert_eq!(points[0].bucket, "2025-03");
    assert_eq!(points[2].bucket, "2025-05");
    assert_eq!(points[2].value, 1);
    assert_eq!(points[10].bucket, "2026-01");
    assert_eq!(points[10].value, 1);
    assert_eq!(points[11].value, 0);
    assert_eq!(report.total_tickets.current, 2);
}

#[tokio::test]
async fn test_year_trend_agrees_with_year_totals() {
    let db = DuckDbBackend::open_in_memory().expect("db");
    // The year window starts on 2025-03-16: the first ticket is day 5 of it,
    // the second falls in the same calendar month but before the window.
    let inside = NaiveDate::from_ymd_opt(2025, 3, 20)
        .and_then(|d| d.and_hms_opt(9, 0, 0))
        .expect("ts");
    let before = NaiveDate::from_ymd_opt(2025, 3, 10)
        .and_then(|d| d.and_hms_opt(9, 0, 0))
        .expect("ts");
    for (id, created_at) in [(1, inside), (2, before)] {
        db.insert_ticket(&TicketFixture::paid(id, created_at))
            .await
            .expect("ticket");
        db.insert_ticket_operation(id, id, 1, 100.0)
            .await
            .expect("ticket operation");
    }

    let tickets = ticket_report(&db, PeriodToken::Year, today())
        .await
        .expect("ticket report");
    let trend = &tickets.tickets_over_time;
    assert!(trend.has_data);
    assert_eq!(tickets.total_tickets.current, 1);
    assert_eq!(trend.points.iter().map(|p| p.value).sum::<i64>(), 1);
    assert_eq!(trend.points[0].bucket, "2025-03");
    assert_eq!(trend.points[0].value, 1);

    let financial = financial_report(&db, PeriodToken::Year, today())
        .await
        .expect("financial report");
    let revenue: f64 = financial.revenue_over_time.points.iter().map(|p| p.value).sum();
    assert_eq!(financial.total_revenue, 100.0);
    assert_eq!(revenue, 100.0);

    let operations = operation_report(&db, PeriodToken::Year, today())
        .await
        .expect("operation report");
    let count: i64 = operations.operations_over_time.points.iter().map(|p| p.value).sum();
    assert_eq!(operations.total_operations, 1);
    assert_eq!(count, 1);
}

/// Twelve customers, operations and device types, one paid 10.00 ticket
/// each. Ids run opposite to names so label ordering is observable, and
/// id 1 gets a second ticket to lead every ranking.
async fn seed_twelve_of_each(db: &DuckDbBackend) {
    for id in 1..=12_i64 {
        let suffix = format!("{:02}", 13 - id);
        db.insert_customer(id, &format!("Customer {suffix}"), "individual", days_ago(20))
            .await
            .expect("customer");
        db.insert_operation(id, &format!("Op {suffix}"), 10.0)
            .await
            .expect("operation");
        db.insert_device_type(id, &format!("Type {suffix}"))
            .await
            .expect("device type");
    }

    let owners = (1..=12_i64).chain(std::iter::once(1));
    for (ticket_id, owner) in (1_i64..).zip(owners) {
        let ticket = TicketFixture {
            device_type_id: Some(owner),
            ..TicketFixture::paid(ticket_id, days_ago(2)).customer(owner)
        };
        db.insert_ticket(&ticket).await.expect("ticket");
        db.insert_ticket_operation(ticket_id, ticket_id, owner, 10.0)
            .await
            .expect("ticket operation");
    }
}

#[tokio::test]
async fn test_rankings_cap_at_ten_and_break_ties_by_label() {
    let db = DuckDbBackend::open_in_memory().expect("db");
    seed_twelve_of_each(&db).await;

    let mut expected = vec!["12".to_string()];
    expected.extend((1..=9).map(|n| format!("{n:02}")));
    let with_prefix =
        |prefix: &str| expected.iter().map(|s| format!("{prefix} {s}")).collect::<Vec<_>>();

    let customers = customer_report(&db, today()).await.expect("customer report");
    let ticket_labels: Vec<String> =
        customers.top_by_tickets.iter().map(|d| d.label.clone()).collect();
    assert_eq!(ticket_labels, with_prefix("Customer"));
    assert_eq!(customers.top_by_tickets[0].value, 2);
    assert_eq!(customers.top_by_tickets[1].value, 1);

    let revenue_labels: Vec<String> =
        customers.top_by_revenue.iter().map(|d| d.label.clone()).collect();
    assert_eq!(revenue_labels, with_prefix("Customer"));
    assert_eq!(customers.top_by_revenue[0].value, 20.0);

    let operations = operation_report(&db, PeriodToken::Month, today())
        .await
        .expect("operation report");
    for ranking in [&operations.top_by_count, &operations.top_by_revenue] {
        let names: Vec<String> = ranking.iter().map(|r| r.label.clone()).collect();
        assert_eq!(names, with_prefix("Op"));
    }
    assert_eq!(operations.top_by_count[0].count, 2);
    assert_eq!(operations.top_by_revenue[0].revenue, 20.0);

    let financial = financial_report(&db, PeriodToken::Month, today())
        .await
        .expect("financial report");
    let types: Vec<String> = financial
        .revenue_by_device_type
        .iter()
        .map(|d| d.label.clone())
        .collect();
    assert_eq!(types, with_prefix("Type"));
    assert_eq!(financial.revenue_by_device_type[0].value, 20.0);
}

#[tokio::test]
async fn test_operations_sharing_a_name_rank_separately() {
    let db = DuckDbBackend::open_in_memory().expect("db");
    db.insert_operation(1, "Cleaning", 15.0).await.expect("operation");
    db.insert_operation(2, "Cleaning", 25.0).await.expect("operation");
    paid_ticket(&db, 1, 1, &[]).await;
    db.insert_ticket_operation(1, 1, 1, 15.0).await.expect("op");
    db.insert_ticket_operation(2, 1, 2, 25.0).await.expect("op");
    db.insert_ticket_operation(3, 1, 2, 25.0).await.expect("op");

    let report = operation_report(&db, PeriodToken::Week, today())
        .await
        .expect("operation report");
    let ranked: Vec<(&str, i64, f64)> = report
        .top_by_count
        .iter()
        .map(|r| (r.label.as_str(), r.count, r.revenue))
        .collect();
    assert_eq!(ranked, vec![("Cleaning", 2, 50.0), ("Cleaning", 1, 15.0)]);
}

#[tokio::test]
async fn test_dashboard_is_idempotent() {
    let db = DuckDbBackend::open_in_memory().expect("db");
    db.insert_customer(1, "Ada", "individual", days_ago(3))
        .await
        .expect("customer");
    paid_ticket(&db, 1, 1, &[19.99, 5.01]).await;
    paid_ticket(&db, 2, 2, &[42.5]).await;

    let a = dashboard(&db, PeriodToken::Month, today()).await.expect("dashboard");
    let b = dashboard(&db, PeriodToken::Month, today()).await.expect("dashboard");
    assert_eq!(
        serde_json::to_string(&a).expect("json"),
        serde_json::to_string(&b).expect("json")
    );
    assert_eq!(a.financial.total_revenue, 67.5);
}

#[tokio::test]
async fn test_storage_fault_aborts_report() {
    let db = DuckDbBackend::open_in_memory().expect("db");
    {
        let conn = db.conn_for_test().await;
        conn.execute_batch("DROP TABLE ticket_operations")
            .expect("drop table");
    }

    let err = financial_report(&db, PeriodToken::Week, today())
        .await
        .expect_err("missing table must fail");
    assert_eq!(err.report(), "financial");
    assert!(err.to_string().starts_with("failed to compute financial report"));

    // Reports that never touch the dropped table still succeed.
    device_report(&db).await.expect("device report");
}
