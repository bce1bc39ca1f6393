use anyhow::Result;

use repairdesk_core::period::DateWindow;
use repairdesk_core::stats::{OperationRank, RevenueTotals};

use super::{in_window, PAID_TICKET};
use crate::DuckDbBackend;

/// Revenue, paid-ticket count and operation count for one window. Paid
/// tickets without operations still count as tickets.
pub async fn revenue_totals(db: &DuckDbBackend, window: &DateWindow) -> Result<RevenueTotals> {
    let conn = db.conn.lock().await;
    let (start, end) = window.bounds();

    let sql = format!(
        r#"
        SELECT
            CAST(COALESCE(SUM(o.price), 0) AS DOUBLE) AS revenue,
            COUNT(DISTINCT t.id) AS paid_tickets,
            COUNT(o.id) AS operations
        FROM tickets t
        LEFT JOIN ticket_operations o ON o.ticket_id = t.id
        WHERE {window}
          AND {PAID_TICKET}
        "#,
        window = in_window("t.created_at"),
    );

    let totals = conn
        .prepare(&sql)?
        .query_row(duckdb::params![start, end], |row| {
            Ok(RevenueTotals {
                revenue: row.get(0)?,
                paid_tickets: row.get(1)?,
                operations: row.get(2)?,
            })
        })?;
    Ok(totals)
}

#[derive(Debug, Clone, Copy)]
enum RankBy {
    Count,
    Revenue,
}

/// One row per catalogue operation, so operations sharing a name rank
/// separately.
async fn top_operations(
    db: &DuckDbBackend,
    window: &DateWindow,
    limit: usize,
    rank_by: RankBy,
) -> Result<Vec<OperationRank>> {
    let conn = db.conn.lock().await;
    let (start, end) = window.bounds();

    let order_by = match rank_by {
        RankBy::Count => "op_count DESC, label ASC, o.operation_id ASC",
        RankBy::Revenue => "op_revenue DESC, label ASC, o.operation_id ASC",
    };

    let sql = format!(
        r#"
        SELECT
            COALESCE(op.name, 'Unknown') AS label,
            COUNT(*) AS op_count,
            CAST(COALESCE(SUM(o.price), 0) AS DOUBLE) AS op_revenue
        FROM ticket_operations o
        JOIN tickets t ON t.id = o.ticket_id
        LEFT JOIN operations op ON op.id = o.operation_id
        WHERE {window}
          AND {PAID_TICKET}
        GROUP BY o.operation_id, label
        ORDER BY {order_by}
        LIMIT ?3
        "#,
        window = in_window("t.created_at"),
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(duckdb::params![start, end, limit as i64], |row| {
        Ok(OperationRank {
            label: row.get(0)?,
            count: row.get(1)?,
            revenue: row.get(2)?,
        })
    })?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub async fn top_operations_by_count(
    db: &DuckDbBackend,
    window: &DateWindow,
    limit: usize,
) -> Result<Vec<OperationRank>> {
    top_operations(db, window, limit, RankBy::Count).await
}

pub async fn top_operations_by_revenue(
    db: &DuckDbBackend,
    window: &DateWindow,
    limit: usize,
) -> Result<Vec<OperationRank>> {
    top_operations(db, window, limit, RankBy::Revenue).await
}
