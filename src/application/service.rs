use chrono::{DateTime, SubsecRound, Utc};

use crate::domain::{NewOrder, Order, quote};
use crate::storage::Repository;

use super::AppError;

/// Application service for order intake.
/// This is the interface handed to every client (HTTP API, CLI).
pub struct OrderService {
    repo: Repository,
}

impl OrderService {
    /// Create a new order service with the given repository.
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Open (or create) the database at the given path and make sure the
    /// orders table exists.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Release the storage handle.
    pub async fn close(&self) {
        self.repo.close().await;
    }

    /// Price and store an incoming order, stamped with the current time.
    pub async fn create_order(&self, order: NewOrder) -> Result<Order, AppError> {
        // stored timestamps keep microseconds
        self.record_order(order, Utc::now().trunc_subsecs(6)).await
    }

    /// Price and store an order with an explicit creation timestamp.
    pub async fn record_order(
        &self,
        order: NewOrder,
        created_at: DateTime<Utc>,
    ) -> Result<Order, AppError> {
        let quote = quote(&order)?;
        let order = Order::from_quote(order, quote, created_at);

        self.repo.append_order(&order).await?;
        tracing::debug!(
            order_id = %order.order_id,
            vehicle = %order.vehicle,
            distance_km = order.distance_km,
            delivery_cost = order.delivery_cost,
            "order recorded"
        );

        Ok(order)
    }

    /// Every stored order in insertion order.
    pub async fn list_orders(&self) -> Result<Vec<Order>, AppError> {
        Ok(self.repo.list_orders().await?)
    }

    /// Number of stored orders.
    pub async fn count_orders(&self) -> Result<i64, AppError> {
        Ok(self.repo.count_orders().await?)
    }
}
