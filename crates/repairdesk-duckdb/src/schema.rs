/// DuckDB initialization SQL.
///
/// Executed once at database open time via `Connection::execute_batch`.
/// All statements use `IF NOT EXISTS` so they are safe to re-run on every
/// startup against a database the CRUD side already populated.
///
/// The analytics layer only reads these tables. Monetary columns are
/// `DECIMAL(10,2)` and are cast to `DOUBLE` at query time.
///
/// Always set an explicit memory limit: the DuckDB default (80% of system
/// RAM) is not acceptable for a server process.
pub fn init_sql(memory_limit: &str) -> String {
    format!(
        r#"SET memory_limit = '{memory_limit}';
SET threads = 2;

-- ===========================================
-- CUSTOMERS
-- ===========================================
CREATE TABLE IF NOT EXISTS customers (
    id              BIGINT PRIMARY KEY,
    name            VARCHAR NOT NULL,
    phone           VARCHAR,
    email           VARCHAR,
    customer_type   VARCHAR NOT NULL DEFAULT 'individual',
    created_at      TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);
CREATE INDEX IF NOT EXISTS idx_customers_created ON customers(created_at);

-- ===========================================
-- DEVICE DIMENSIONS (labels only)
-- ===========================================
CREATE TABLE IF NOT EXISTS device_types (
    id              BIGINT PRIMARY KEY,
    name            VARCHAR NOT NULL
);

CREATE TABLE IF NOT EXISTS device_brands (
    id              BIGINT PRIMARY KEY,
    name            VARCHAR NOT NULL
);

CREATE TABLE IF NOT EXISTS device_models (
    id              BIGINT PRIMARY KEY,
    brand_id        BIGINT,
    name            VARCHAR NOT NULL
);

-- ===========================================
-- OPERATIONS (catalogue of repair work)
-- ===========================================
CREATE TABLE IF NOT EXISTS operations (
    id              BIGINT PRIMARY KEY,
    name            VARCHAR NOT NULL,
    default_price   DECIMAL(10,2) NOT NULL DEFAULT 0
);

-- ===========================================
-- TICKETS
-- ===========================================
-- status lifecycle: pending -> waiting_parts -> repaired | not_repaired.
-- delivered flips to true when the device is handed back; revenue only
-- counts delivered AND repaired tickets.
CREATE TABLE IF NOT EXISTS tickets (
    id              BIGINT PRIMARY KEY,
    customer_id     BIGINT,
    device_type_id  BIGINT,
    device_brand_id BIGINT,
    device_model_id BIGINT,
    status          VARCHAR NOT NULL DEFAULT 'pending'
                    CHECK (status IN ('pending', 'waiting_parts', 'repaired', 'not_repaired')),
    delivered       BOOLEAN NOT NULL DEFAULT false,
    created_at      TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at      TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);
CREATE INDEX IF NOT EXISTS idx_tickets_created  ON tickets(created_at);
CREATE INDEX IF NOT EXISTS idx_tickets_customer ON tickets(customer_id);

-- ===========================================
-- TICKET OPERATIONS (priced line items)
-- ===========================================
CREATE TABLE IF NOT EXISTS ticket_operations (
    id              BIGINT PRIMARY KEY,
    ticket_id       BIGINT NOT NULL,
    operation_id    BIGINT NOT NULL,
    price           DECIMAL(10,2) NOT NULL DEFAULT 0
);
CREATE INDEX IF NOT EXISTS idx_ticket_operations_ticket ON ticket_operations(ticket_id);
"#
    )
}
