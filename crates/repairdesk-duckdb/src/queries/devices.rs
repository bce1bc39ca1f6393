use anyhow::Result;

use repairdesk_core::stats::Distribution;

use super::query_distribution;
use crate::DuckDbBackend;

/// Every ticket counted once; tickets without a known type land in
/// `Unknown`.
pub async fn tickets_by_device_type(db: &DuckDbBackend) -> Result<Vec<Distribution<i64>>> {
    let conn = db.conn.lock().await;
    let sql = r#"
        SELECT COALESCE(dt.name, 'Unknown') AS label, COUNT(*) AS value
        FROM tickets t
        LEFT JOIN device_types dt ON dt.id = t.device_type_id
        GROUP BY label
        ORDER BY value DESC, label ASC
    "#;
    query_distribution(&conn, sql, &[])
}

pub async fn top_device_brands(db: &DuckDbBackend, limit: usize) -> Result<Vec<Distribution<i64>>> {
    let conn = db.conn.lock().await;
    let sql = r#"
        SELECT b.name AS label, COUNT(*) AS value
        FROM tickets t
        JOIN device_brands b ON b.id = t.device_brand_id
        GROUP BY b.name
        ORDER BY value DESC, label ASC
        LIMIT ?1
    "#;
    query_distribution(&conn, sql, &[&(limit as i64)])
}

/// Models are labelled `"<brand> <model>"`; the brand is omitted when the
/// model has none.
pub async fn top_device_models(db: &DuckDbBackend, limit: usize) -> Result<Vec<Distribution<i64>>> {
    let conn = db.conn.lock().await;
    let sql = r#"
        SELECT concat_ws(' ', b.name, m.name) AS label, COUNT(*) AS value
        FROM tickets t
        JOIN device_models m ON m.id = t.device_model_id
        LEFT JOIN device_brands b ON b.id = m.brand_id
        GROUP BY label
        ORDER BY value DESC, label ASC
        LIMIT ?1
    "#;
    query_distribution(&conn, sql, &[&(limit as i64)])
}
