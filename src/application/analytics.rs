use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{Order, VehicleType, round2};

/// An order together with the values the dashboard derives from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsRow {
    #[serde(flatten)]
    pub order: Order,
    /// UTC date component of `created_at`
    pub date: NaiveDate,
    /// `delivery_cost / distance_km`, absent for zero-distance orders
    pub cost_per_km: Option<f64>,
}

impl AnalyticsRow {
    pub fn from_order(order: Order) -> Self {
        let date = order.created_at.date_naive();
        let cost_per_km = if order.distance_km > 0.0 {
            Some(order.delivery_cost / order.distance_km)
        } else {
            None
        };
        Self {
            order,
            date,
            cost_per_km,
        }
    }
}

pub fn derive_rows(orders: Vec<Order>) -> Vec<AnalyticsRow> {
    orders.into_iter().map(AnalyticsRow::from_order).collect()
}

/// Client-side row filter. `None` means "everything".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderFilter {
    pub vehicles: Option<Vec<VehicleType>>,
    pub priorities: Option<Vec<String>>,
    /// Inclusive lower bound on the row date
    pub from_date: Option<NaiveDate>,
    /// Inclusive upper bound on the row date
    pub to_date: Option<NaiveDate>,
}

impl OrderFilter {
    pub fn matches(&self, row: &AnalyticsRow) -> bool {
        if let Some(vehicles) = &self.vehicles {
            if !vehicles.contains(&row.order.vehicle) {
                return false;
            }
        }
        if let Some(priorities) = &self.priorities {
            if !priorities.iter().any(|p| *p == row.order.priority) {
                return false;
            }
        }
        if self.from_date.is_some_and(|from| row.date < from) {
            return false;
        }
        if self.to_date.is_some_and(|to| row.date > to) {
            return false;
        }
        true
    }

    pub fn apply(&self, rows: &[AnalyticsRow]) -> Vec<AnalyticsRow> {
        rows.iter().filter(|row| self.matches(row)).cloned().collect()
    }
}

/// Earliest and latest row date, the default date range of the dashboard.
pub fn date_span(rows: &[AnalyticsRow]) -> Option<(NaiveDate, NaiveDate)> {
    let min = rows.iter().map(|r| r.date).min()?;
    let max = rows.iter().map(|r| r.date).max()?;
    Some((min, max))
}

/// Distinct vehicle labels in order of first appearance.
pub fn distinct_vehicles(rows: &[AnalyticsRow]) -> Vec<VehicleType> {
    let mut seen = Vec::new();
    for row in rows {
        if !seen.contains(&row.order.vehicle) {
            seen.push(row.order.vehicle);
        }
    }
    seen
}

/// Distinct priority labels in order of first appearance.
pub fn distinct_priorities(rows: &[AnalyticsRow]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for row in rows {
        if !seen.contains(&row.order.priority) {
            seen.push(row.order.priority.clone());
        }
    }
    seen
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyMetrics {
    pub total_orders: usize,
    pub total_cost: f64,
    pub average_cost: Option<f64>,
    pub average_cost_per_km: Option<f64>,
}

pub fn key_metrics(rows: &[AnalyticsRow]) -> KeyMetrics {
    let total_cost: f64 = rows.iter().map(|r| r.order.delivery_cost).sum();
    let per_km: Vec<f64> = rows.iter().filter_map(|r| r.cost_per_km).collect();

    KeyMetrics {
        total_orders: rows.len(),
        total_cost: round2(total_cost),
        average_cost: mean(rows.iter().map(|r| r.order.delivery_cost)).map(round2),
        average_cost_per_km: mean(per_km.into_iter()).map(round2),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleSummary {
    pub vehicle: VehicleType,
    pub orders: usize,
    pub total_cost: f64,
    pub average_cost: f64,
    /// Share of the total filtered cost, in percent
    pub cost_share: f64,
}

/// Per-vehicle counts and cost contribution, sorted by vehicle label.
pub fn vehicle_breakdown(rows: &[AnalyticsRow]) -> Vec<VehicleSummary> {
    let mut groups: BTreeMap<VehicleType, (usize, f64)> = BTreeMap::new();
    for row in rows {
        let entry = groups.entry(row.order.vehicle).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += row.order.delivery_cost;
    }

    let grand_total: f64 = groups.values().map(|(_, total)| total).sum();

    groups
        .into_iter()
        .map(|(vehicle, (orders, total_cost))| VehicleSummary {
            vehicle,
            orders,
            total_cost: round2(total_cost),
            average_cost: total_cost / orders as f64,
            cost_share: if grand_total > 0.0 {
                total_cost / grand_total * 100.0
            } else {
                0.0
            },
        })
        .collect()
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}
