pub mod customers;
pub mod devices;
pub mod financial;
pub mod operations;
pub mod series;
pub mod tickets;

use anyhow::Result;
use duckdb::types::{FromSql, ToSql};
use duckdb::Connection;

use repairdesk_core::stats::Distribution;

/// Revenue only counts tickets that were repaired and handed back. Every
/// query contributing a price aggregate must include this predicate over
/// the `tickets t` alias, or totals across one report stop agreeing.
pub(crate) const PAID_TICKET: &str = "t.delivered = true AND t.status = 'repaired'";

/// Half-open window over `column`, bound to parameters `?1` and `?2`.
pub(crate) fn in_window(column: &str) -> String {
    format!("{column} >= CAST(?1 AS TIMESTAMP) AND {column} < CAST(?2 AS TIMESTAMP)")
}

/// Run a `SELECT label, value ...` statement. Ordering and limits are the
/// statement's job.
pub(crate) fn query_distribution<V: FromSql>(
    conn: &Connection,
    sql: &str,
    params: &[&dyn ToSql],
) -> Result<Vec<Distribution<V>>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, |row| {
        Ok(Distribution {
            label: row.get(0)?,
            value: row.get(1)?,
        })
    })?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}
