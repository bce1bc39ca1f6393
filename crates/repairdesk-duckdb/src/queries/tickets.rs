use anyhow::Result;

use repairdesk_core::period::DateWindow;
use repairdesk_core::stats::{Distribution, TicketTotals};

use super::{in_window, query_distribution};
use crate::DuckDbBackend;

pub async fn ticket_totals(db: &DuckDbBackend, window: &DateWindow) -> Result<TicketTotals> {
    let conn = db.conn.lock().await;
    let (start, end) = window.bounds();

    let sql = format!(
        r#"
        SELECT
            COUNT(*) AS total,
            COUNT(*) FILTER (WHERE t.delivered) AS delivered,
            COUNT(*) FILTER (WHERE t.status = 'pending') AS pending,
            COUNT(*) FILTER (WHERE t.status = 'waiting_parts') AS waiting_parts,
            COUNT(*) FILTER (WHERE t.status = 'repaired') AS repaired,
            COUNT(*) FILTER (WHERE t.status = 'not_repaired') AS not_repaired,
            COUNT(*) FILTER (WHERE t.status = 'repaired' AND NOT t.delivered) AS awaiting_pickup
        FROM tickets t
        WHERE {window}
        "#,
        window = in_window("t.created_at"),
    );

    let totals = conn
        .prepare(&sql)?
        .query_row(duckdb::params![start, end], |row| {
            Ok(TicketTotals {
                total: row.get(0)?,
                delivered: row.get(1)?,
                pending: row.get(2)?,
                waiting_parts: row.get(3)?,
                repaired: row.get(4)?,
                not_repaired: row.get(5)?,
                awaiting_pickup: row.get(6)?,
            })
        })?;
    Ok(totals)
}

pub async fn average_repair_days(db: &DuckDbBackend, window: &DateWindow) -> Result<f64> {
    let conn = db.conn.lock().await;
    let (start, end) = window.bounds();

    let sql = format!(
        r#"
        SELECT CAST(COALESCE(AVG(EPOCH(t.updated_at - t.created_at)) / 86400.0, 0) AS DOUBLE)
        FROM tickets t
        WHERE {window}
          AND t.status = 'repaired'
        "#,
        window = in_window("t.created_at"),
    );

    let days: f64 = conn
        .prepare(&sql)?
        .query_row(duckdb::params![start, end], |row| row.get(0))?;
    Ok(days)
}

pub async fn tickets_by_status(
    db: &DuckDbBackend,
    window: &DateWindow,
) -> Result<Vec<Distribution<i64>>> {
    let conn = db.conn.lock().await;
    let (start, end) = window.bounds();

    let sql = format!(
        r#"
        SELECT t.status AS label, COUNT(*) AS value
        FROM tickets t
        WHERE {window}
        GROUP BY t.status
        ORDER BY value DESC, label ASC
        "#,
        window = in_window("t.created_at"),
    );

    query_distribution(&conn, &sql, &[&start, &end])
}
