use anyhow::{Context, Result};
use sqlx::{Row, SqlitePool};

use crate::domain::{Order, OrderRow};

use super::MIGRATION_001_ORDERS;

/// Append-only store of priced orders.
///
/// There is no update or delete operation: rows are written
/// once and read back in insertion order.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        tracing::debug!(database_url, "opened order store");
        Ok(Self::new(pool))
    }

    /// Create the orders table if it does not exist yet.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_ORDERS)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize the database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    /// Close every pooled connection. Further queries fail.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::debug!("closed order store");
    }

    /// Append a fully priced order. The write is committed before returning.
    pub async fn append_order(&self, order: &Order) -> Result<()> {
        let (
            order_id,
            latitude,
            longitude,
            weight,
            priority,
            vehicle,
            distance_km,
            delivery_cost,
            created_at,
        ) = order.to_row();

        sqlx::query(
            r#"
            INSERT INTO orders (order_id, latitude, longitude, weight, priority, vehicle, distance_km, delivery_cost, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(order_id)
        .bind(latitude)
        .bind(longitude)
        .bind(weight)
        .bind(priority)
        .bind(vehicle)
        .bind(distance_km)
        .bind(delivery_cost)
        .bind(created_at)
        .execute(&self.pool)
        .await
        .context("Failed to save order")?;
        Ok(())
    }

    /// Every stored order, in the order it was written.
    ///
    /// Rows that do not decode into an order are logged and skipped.
    pub async fn list_orders(&self) -> Result<Vec<Order>> {
        let rows = sqlx::query(
            r#"
            SELECT order_id, latitude, longitude, weight, priority, vehicle, distance_km, delivery_cost, created_at
            FROM orders
            ORDER BY rowid
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list orders")?;

        let mut orders = Vec::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            match Self::row_to_tuple(row).and_then(Order::from_row) {
                Ok(order) => orders.push(order),
                Err(e) => tracing::warn!(row = index, "skipping unreadable order row: {e:#}"),
            }
        }
        Ok(orders)
    }

    /// Number of stored orders.
    pub async fn count_orders(&self) -> Result<i64> {
        let count: i64 = sqlx::query("SELECT COUNT(*) as count FROM orders")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count orders")?
            .get("count");
        Ok(count)
    }

    fn row_to_tuple(row: &sqlx::sqlite::SqliteRow) -> Result<OrderRow> {
        Ok((
            row.try_get("order_id")?,
            row.try_get("latitude")?,
            row.try_get("longitude")?,
            row.try_get("weight")?,
            row.try_get("priority")?,
            row.try_get("vehicle")?,
            row.try_get("distance_km")?,
            row.try_get("delivery_cost")?,
            row.try_get("created_at")?,
        ))
    }
}
