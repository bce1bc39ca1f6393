//! Row inserts for tests and local demos.
//!
//! The production write path belongs to the CRUD service; these helpers
//! exist so reports can be exercised against a populated database.

use anyhow::Result;
use chrono::NaiveDateTime;
use repairdesk_core::stats::TicketStatus;

use crate::DuckDbBackend;

/// A ticket row to insert. Dimension ids are optional so fixtures can model
/// tickets with unknown devices.
#[derive(Debug, Clone)]
pub struct TicketFixture {
    pub id: i64,
    pub customer_id: Option<i64>,
    pub device_type_id: Option<i64>,
    pub device_brand_id: Option<i64>,
    pub device_model_id: Option<i64>,
    pub status: TicketStatus,
    pub delivered: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TicketFixture {
    /// A delivered, repaired ticket created and closed at `created_at`.
    pub fn paid(id: i64, created_at: NaiveDateTime) -> Self {
        Self {
            id,
            customer_id: None,
            device_type_id: None,
            device_brand_id: None,
            device_model_id: None,
            status: TicketStatus::Repaired,
            delivered: true,
            created_at,
            updated_at: created_at,
        }
    }

    pub fn status(mut self, status: TicketStatus, delivered: bool) -> Self {
        self.status = status;
        self.delivered = delivered;
        self
    }

    pub fn customer(mut self, customer_id: i64) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    pub fn device(mut self, type_id: i64, brand_id: i64, model_id: i64) -> Self {
        self.device_type_id = Some(type_id);
        self.device_brand_id = Some(brand_id);
        self.device_model_id = Some(model_id);
        self
    }

    pub fn updated_at(mut self, updated_at: NaiveDateTime) -> Self {
        self.updated_at = updated_at;
        self
    }
}

fn ts(value: &NaiveDateTime) -> String {
    value.format("%Y-%m-%d %H:%M:%S").to_string()
}

impl DuckDbBackend {
    pub async fn insert_customer(
        &self,
        id: i64,
        name: &str,
        customer_type: &str,
        created_at: NaiveDateTime,
    ) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO customers (id, name, customer_type, created_at) VALUES (?1, ?2, ?3, ?4)",
            duckdb::params![id, name, customer_type, ts(&created_at)],
        )?;
        Ok(())
    }

    pub async fn insert_device_type(&self, id: i64, name: &str) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO device_types (id, name) VALUES (?1, ?2)",
            duckdb::params![id, name],
        )?;
        Ok(())
    }

    pub async fn insert_device_brand(&self, id: i64, name: &str) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO device_brands (id, name) VALUES (?1, ?2)",
            duckdb::params![id, name],
        )?;
        Ok(())
    }

    pub async fn insert_device_model(&self, id: i64, brand_id: i64, name: &str) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO device_models (id, brand_id, name) VALUES (?1, ?2, ?3)",
            duckdb::params![id, brand_id, name],
        )?;
        Ok(())
    }

    pub async fn insert_operation(&self, id: i64, name: &str, default_price: f64) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO operations (id, name, default_price) VALUES (?1, ?2, ?3)",
            duckdb::params![id, name, default_price],
        )?;
        Ok(())
    }

    pub async fn insert_ticket(&self, ticket: &TicketFixture) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            r#"INSERT INTO tickets (
                id, customer_id, device_type_id, device_brand_id, device_model_id,
                status, delivered, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"#,
            duckdb::params![
                ticket.id,
                ticket.customer_id,
                ticket.device_type_id,
                ticket.device_brand_id,
                ticket.device_model_id,
                ticket.status.as_str(),
                ticket.delivered,
                ts(&ticket.created_at),
                ts(&ticket.updated_at),
            ],
        )?;
        Ok(())
    }

    pub async fn insert_ticket_operation(
        &self,
        id: i64,
        ticket_id: i64,
        operation_id: i64,
        price: f64,
    ) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO ticket_operations (id, ticket_id, operation_id, price) VALUES (?1, ?2, ?3, ?4)",
            duckdb::params![id, ticket_id, operation_id, price],
        )?;
        Ok(())
    }
}
