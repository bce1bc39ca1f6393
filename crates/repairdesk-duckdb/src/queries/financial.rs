use anyhow::Result;

use repairdesk_core::period::DateWindow;
use repairdesk_core::stats::{Distribution, TicketValue};

use super::{in_window, query_distribution, PAID_TICKET};
use crate::DuckDbBackend;

pub async fn revenue_by_device_type(
    db: &DuckDbBackend,
    window: &DateWindow,
    limit: usize,
) -> Result<Vec<Distribution<f64>>> {
    let conn = db.conn.lock().await;
    let (start, end) = window.bounds();

    let sql = format!(
        r#"
        SELECT COALESCE(dt.name, 'Unknown') AS label, CAST(SUM(o.price) AS DOUBLE) AS value
        FROM ticket_operations o
        JOIN tickets t ON t.id = o.ticket_id
        LEFT JOIN device_types dt ON dt.id = t.device_type_id
        WHERE {window}
          AND {PAID_TICKET}
        GROUP BY label
        ORDER BY value DESC, label ASC
        LIMIT ?3
        "#,
        window = in_window("t.created_at"),
    );

    query_distribution(&conn, &sql, &[&start, &end, &(limit as i64)])
}

/// The paid ticket with the largest summed operation price; the lowest
/// ticket id wins ties. `None` when the window has no paid operations.
pub async fn highest_value_ticket(
    db: &DuckDbBackend,
    window: &DateWindow,
) -> Result<Option<TicketValue>> {
    let conn = db.conn.lock().await;
    let (start, end) = window.bounds();

    let sql = format!(
        r#"
        SELECT
            t.id,
            COALESCE(c.name, 'Unknown') AS customer_name,
            concat_ws(' ', b.name, m.name) AS device_label,
            CAST(SUM(o.price) AS DOUBLE) AS total
        FROM tickets t
        JOIN ticket_operations o ON o.ticket_id = t.id
        LEFT JOIN customers c ON c.id = t.customer_id
        LEFT JOIN device_brands b ON b.id = t.device_brand_id
        LEFT JOIN device_models m ON m.id = t.device_model_id
        WHERE {window}
          AND {PAID_TICKET}
        GROUP BY t.id, c.name, b.name, m.name
        ORDER BY total DESC, t.id ASC
        LIMIT 1
        "#,
        window = in_window("t.created_at"),
    );

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query_map(duckdb::params![start, end], |row| {
        Ok(TicketValue {
            ticket_id: row.get(0)?,
            customer_name: row.get(1)?,
            device_label: row.get(2)?,
            total: row.get(3)?,
        })
    })?;

    Ok(rows.next().transpose()?)
}
