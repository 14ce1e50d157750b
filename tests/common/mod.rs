// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use fleetlytics::application::OrderService;
use fleetlytics::domain::NewOrder;
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(OrderService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = OrderService::init(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Helper to parse a date string into DateTime<Utc> at noon
pub fn parse_date(date_str: &str) -> DateTime<Utc> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
        .and_utc()
}

/// Test fixture: a small mixed fleet
pub struct SampleOrders;

impl SampleOrders {
    /// One order per vehicle class plus a zero-distance order, over three days:
    ///
    /// | id     | weight | vehicle | priority | day        |
    /// |--------|--------|---------|----------|------------|
    /// | ORD_1  | 40     | 3W      | LOW      | 2024-04-01 |
    /// | ORD_2  | 60     | 3W EV   | HIGH     | 2024-04-01 |
    /// | ORD_3  | 150    | 4W      | MEDIUM   | 2024-04-02 |
    /// | ORD_4  | 120    | 4W EV   | HIGH     | 2024-04-02 |
    /// | ORD_5  | 10     | 3W      | LOW      | 2024-04-03 |
    /// | ORD_6  | 90     | 3W EV   | LOW      | 2024-04-03 | (at the warehouse)
    pub async fn record(service: &OrderService) -> Result<()> {
        let fixtures = [
            ("ORD_1", 19.1760, 72.8777, 40, "LOW", "2024-04-01"),
            ("ORD_2", 19.0760, 72.9777, 60, "HIGH", "2024-04-01"),
            ("ORD_3", 19.2760, 72.8777, 150, "MEDIUM", "2024-04-02"),
            ("ORD_4", 19.0760, 72.8277, 120, "HIGH", "2024-04-02"),
            ("ORD_5", 19.1260, 72.8777, 10, "LOW", "2024-04-03"),
            ("ORD_6", 19.0760, 72.8777, 90, "LOW", "2024-04-03"),
        ];

        for (id, lat, lon, weight, priority, day) in fixtures {
            service
                .record_order(NewOrder::new(id, lat, lon, weight, priority), parse_date(day))
                .await?;
        }
        Ok(())
    }
}
