use anyhow::Result;
use std::io::Write;

use crate::application::AnalyticsRow;
use crate::domain::format_timestamp;

/// File name offered for dashboard downloads.
pub const DEFAULT_EXPORT_FILE: &str = "delivery_analysis.csv";

const COLUMNS: [&str; 11] = [
    "order_id",
    "latitude",
    "longitude",
    "weight",
    "priority",
    "vehicle",
    "distance_km",
    "delivery_cost",
    "created_at",
    "date",
    "cost_per_km",
];

/// Exporter for turning analytics rows into delimited text
pub struct Exporter<'a> {
    rows: &'a [AnalyticsRow],
}

impl<'a> Exporter<'a> {
    pub fn new(rows: &'a [AnalyticsRow]) -> Self {
        Self { rows }
    }

    /// Write the rows as CSV, with a column-name row first.
    /// Zero-distance rows leave `cost_per_km` empty.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(COLUMNS)?;

        for row in self.rows {
            let order = &row.order;
            csv_writer.write_record(&[
                order.order_id.clone(),
                order.latitude.to_string(),
                order.longitude.to_string(),
                order.weight.to_string(),
                order.priority.clone(),
                order.vehicle.as_str().to_string(),
                order.distance_km.to_string(),
                order.delivery_cost.to_string(),
                format_timestamp(order.created_at),
                row.date.format("%Y-%m-%d").to_string(),
                row.cost_per_km.map(|v| v.to_string()).unwrap_or_default(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(self.rows.len())
    }

    /// The CSV document as UTF-8 bytes, ready to be saved or served.
    pub fn to_csv_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Order, VehicleType};
    use chrono::{TimeZone, Utc};

    fn row(id: &str, distance_km: f64, cost: f64) -> AnalyticsRow {
        AnalyticsRow::from_order(Order {
            order_id: id.into(),
            latitude: 19.25,
            longitude: 72.95,
            weight: 130,
            priority: "MEDIUM".into(),
            vehicle: VehicleType::FourWheelerEv,
            distance_km,
            delivery_cost: cost,
            created_at: Utc.with_ymd_and_hms(2024, 6, 2, 8, 0, 0).unwrap(),
        })
    }

    #[test]
    fn test_csv_layout() {
        let rows = vec![row("ORD_2", 2.0, 14.0), row("ORD_4", 0.0, 0.0)];
        let bytes = Exporter::new(&rows).to_csv_bytes().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "order_id,latitude,longitude,weight,priority,vehicle,distance_km,delivery_cost,created_at,date,cost_per_km"
        );
        assert_eq!(
            lines[1],
            "ORD_2,19.25,72.95,130,MEDIUM,4W EV,2,14,2024-06-02T08:00:00.000000Z,2024-06-02,7"
        );
        assert!(lines[2].ends_with(",2024-06-02,"));
    }

    #[test]
    fn test_empty_export_has_only_column_names() {
        let mut out = Vec::new();
        let count = Exporter::new(&[]).write_csv(&mut out).unwrap();
        assert_eq!(count, 0);
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 1);
    }
}
