use anyhow::Result;

use repairdesk_core::stats::{CustomerTotals, Distribution};

use super::{query_distribution, PAID_TICKET};
use crate::DuckDbBackend;

/// All-time customer counts. Tickets pointing at deleted customers are
/// ignored.
pub async fn customer_totals(db: &DuckDbBackend) -> Result<CustomerTotals> {
    let conn = db.conn.lock().await;

    let sql = r#"
        WITH per_customer AS (
            SELECT t.customer_id, COUNT(*) AS tickets
            FROM tickets t
            JOIN customers c ON c.id = t.customer_id
            GROUP BY t.customer_id
        )
        SELECT
            (SELECT COUNT(*) FROM customers) AS total,
            (SELECT COUNT(*) FROM per_customer) AS with_tickets,
            (SELECT COUNT(*) FROM per_customer WHERE tickets > 1) AS repeat_customers,
            (SELECT CAST(COALESCE(SUM(tickets), 0) AS BIGINT) FROM per_customer) AS tickets
    "#;

    let totals = conn.prepare(sql)?.query_row([], |row| {
        Ok(CustomerTotals {
            total: row.get(0)?,
            with_tickets: row.get(1)?,
            repeat: row.get(2)?,
            tickets: row.get(3)?,
        })
    })?;
    Ok(totals)
}

pub async fn customers_by_type(db: &DuckDbBackend) -> Result<Vec<Distribution<i64>>> {
    let conn = db.conn.lock().await;
    let sql = r#"
        SELECT c.customer_type AS label, COUNT(*) AS value
        FROM customers c
        GROUP BY c.customer_type
        ORDER BY value DESC, label ASC
    "#;
    query_distribution(&conn, sql, &[])
}

pub async fn top_customers_by_tickets(
    db: &DuckDbBackend,
    limit: usize,
) -> Result<Vec<Distribution<i64>>> {
    let conn = db.conn.lock().await;
    let sql = r#"
        SELECT c.name AS label, COUNT(*) AS value
        FROM customers c
        JOIN tickets t ON t.customer_id = c.id
        GROUP BY c.id, c.name
        ORDER BY value DESC, label ASC, c.id ASC
        LIMIT ?1
    "#;
    query_distribution(&conn, sql, &[&(limit as i64)])
}

pub async fn top_customers_by_revenue(
    db: &DuckDbBackend,
    limit: usize,
) -> Result<Vec<Distribution<f64>>> {
    let conn = db.conn.lock().await;
    let sql = format!(
        r#"
        SELECT c.name AS label, CAST(SUM(o.price) AS DOUBLE) AS value
        FROM customers c
        JOIN tickets t ON t.customer_id = c.id
        JOIN ticket_operations o ON o.ticket_id = t.id
        WHERE {PAID_TICKET}
        GROUP BY c.id, c.name
        ORDER BY value DESC, label ASC, c.id ASC
        LIMIT ?1
        "#
    );
    query_distribution(&conn, &sql, &[&(limit as i64)])
}
