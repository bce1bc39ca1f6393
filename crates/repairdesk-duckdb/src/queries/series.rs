//! Raw time-bucketed aggregates. Bucket keys already use the densifier's
//! key format; gap-filling happens in the core, not here.

use anyhow::Result;
use duckdb::types::FromSql;
use duckdb::Connection;

use repairdesk_core::series::{SeriesPoint, SeriesRange};

use super::{in_window, PAID_TICKET};
use crate::DuckDbBackend;

fn bucket_expr(range: &SeriesRange, column: &str) -> String {
    format!(
        "strftime(date_trunc('{}', {column}), '{}')",
        range.granularity.trunc_part(),
        range.granularity.key_format()
    )
}

fn query_series<V: FromSql>(
    conn: &Connection,
    sql: &str,
    range: &SeriesRange,
) -> Result<Vec<SeriesPoint<V>>> {
    let (start, end) = range.bounds();
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(duckdb::params![start, end], |row| {
        Ok(SeriesPoint {
            bucket: row.get(0)?,
            value: row.get(1)?,
        })
    })?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    tracing::debug!(
        granularity = range.granularity.trunc_part(),
        buckets = out.len(),
        "raw series loaded"
    );
    Ok(out)
}

pub async fn tickets_series(db: &DuckDbBackend, range: &SeriesRange) -> Result<Vec<SeriesPoint<i64>>> {
    let conn = db.conn.lock().await;
    let sql = format!(
        r#"
        SELECT {bucket} AS bucket, COUNT(*) AS value
        FROM tickets t
        WHERE {window}
        GROUP BY bucket
        ORDER BY bucket
        "#,
        bucket = bucket_expr(range, "t.created_at"),
        window = in_window("t.created_at"),
    );
    query_series(&conn, &sql, range)
}

pub async fn revenue_series(db: &DuckDbBackend, range: &SeriesRange) -> Result<Vec<SeriesPoint<f64>>> {
    let conn = db.conn.lock().await;
    let sql = format!(
        r#"
        SELECT {bucket} AS bucket, CAST(COALESCE(SUM(o.price), 0) AS DOUBLE) AS value
        FROM ticket_operations o
        JOIN tickets t ON t.id = o.ticket_id
        WHERE {window}
          AND {PAID_TICKET}
        GROUP BY bucket
        ORDER BY bucket
        "#,
        bucket = bucket_expr(range, "t.created_at"),
        window = in_window("t.created_at"),
    );
    query_series(&conn, &sql, range)
}

pub async fn operations_series(
    db: &DuckDbBackend,
    range: &SeriesRange,
) -> Result<Vec<SeriesPoint<i64>>> {
    let conn = db.conn.lock().await;
    let sql = format!(
        r#"
        SELECT {bucket} AS bucket, COUNT(o.id) AS value
        FROM ticket_operations o
        JOIN tickets t ON t.id = o.ticket_id
        WHERE {window}
          AND {PAID_TICKET}
        GROUP BY bucket
        ORDER BY bucket
        "#,
        bucket = bucket_expr(range, "t.created_at"),
        window = in_window("t.created_at"),
    );
    query_series(&conn, &sql, range)
}

pub async fn new_customers_series(
    db: &DuckDbBackend,
    range: &SeriesRange,
) -> Result<Vec<SeriesPoint<i64>>> {
    let conn = db.conn.lock().await;
    let sql = format!(
        r#"
        SELECT {bucket} AS bucket, COUNT(*) AS value
        FROM customers c
        WHERE {window}
        GROUP BY bucket
        ORDER BY bucket
        "#,
        bucket = bucket_expr(range, "c.created_at"),
        window = in_window("c.created_at"),
    );
    query_series(&conn, &sql, range)
}
