mod repository;

pub use repository::*;

/// SQL migration for the orders table
pub const MIGRATION_001_ORDERS: &str = include_str!("migrations/001_orders.sql");
