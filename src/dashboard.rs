//! Terminal analytics dashboard.
//!
//! Every run pulls the full order list from the API, resolves the filters
//! against what is actually present, and renders key metrics, per-vehicle
//! distribution, an optional keyword query answer and the filtered orders.
use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;

use crate::application::{
    AnalyticsRow, AppError, KeyMetrics, OrderFilter, QueryAnswer, VehicleSummary, answer_query,
    date_span, derive_rows, distinct_priorities, distinct_vehicles, key_metrics,
    vehicle_breakdown,
};
use crate::client::OrdersClient;
use crate::domain::{Order, VehicleType};
use crate::io::Exporter;

/// What the user asked for. Unset filters select everything present.
#[derive(Debug, Clone, Default)]
pub struct DashboardOptions {
    pub vehicles: Option<Vec<String>>,
    pub priorities: Option<Vec<String>>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub query: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub filter: OrderFilter,
    pub metrics: KeyMetrics,
    pub vehicles: Vec<VehicleSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<QueryAnswer>,
    pub rows: Vec<AnalyticsRow>,
}

/// Turn user options into a concrete filter: every vehicle and priority
/// present in the data, over the full date span, unless narrowed.
pub fn resolve_filter(
    rows: &[AnalyticsRow],
    options: &DashboardOptions,
) -> Result<OrderFilter, AppError> {
    let vehicles = match &options.vehicles {
        Some(labels) => labels
            .iter()
            .map(|label| {
                VehicleType::from_str(label).ok_or_else(|| AppError::UnknownVehicle(label.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?,
        None => distinct_vehicles(rows),
    };

    let priorities = options
        .priorities
        .clone()
        .unwrap_or_else(|| distinct_priorities(rows));

    let span = date_span(rows);
    let from_date = options.from_date.or(span.map(|(min, _)| min));
    let to_date = options.to_date.or(span.map(|(_, max)| max));

    if let (Some(from), Some(to)) = (from_date, to_date) {
        if from > to {
            return Err(AppError::InvalidDateRange {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
    }

    Ok(OrderFilter {
        vehicles: Some(vehicles),
        priorities: Some(priorities),
        from_date,
        to_date,
    })
}

/// Build the report for `orders`. Returns `None` when there is no data at all.
pub fn build_report(
    orders: Vec<Order>,
    options: &DashboardOptions,
) -> Result<Option<DashboardReport>, AppError> {
    if orders.is_empty() {
        return Ok(None);
    }

    let all_rows = derive_rows(orders);
    let filter = resolve_filter(&all_rows, options)?;
    let rows = filter.apply(&all_rows);

    Ok(Some(DashboardReport {
        metrics: key_metrics(&rows),
        vehicles: vehicle_breakdown(&rows),
        answer: options.query.as_deref().map(|q| answer_query(q, &rows)),
        filter,
        rows,
    }))
}

/// Fetch, render and optionally export.
pub async fn run(
    client: &OrdersClient,
    options: &DashboardOptions,
    format: &str,
    export: Option<&Path>,
) -> Result<()> {
    let orders = match client.fetch_orders().await {
        Ok(orders) => orders,
        Err(e) => {
            if matches!(e, AppError::BackendUnavailable(_)) {
                eprintln!("Backend API is not running");
            }
            return Err(e).context(format!("Failed to fetch orders from {}", client.url()));
        }
    };

    let Some(report) = build_report(orders, options)? else {
        println!("No data available yet.");
        return Ok(());
    };

    match format {
        "table" => print_report(&report),
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        other => anyhow::bail!("Unsupported format: {} (use table or json)", other),
    }

    if let Some(path) = export {
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        let count = Exporter::new(&report.rows).write_csv(file)?;
        eprintln!("Exported {} orders to {}", count, path.display());
    }

    Ok(())
}

pub fn print_report(report: &DashboardReport) {
    println!("Smart Delivery Analytics Dashboard");
    println!("{}", "=".repeat(60));
    print_filter(&report.filter);
    println!();

    let m = &report.metrics;
    println!("Key Metrics");
    println!("  {:<22} {:>12}", "Total Orders", m.total_orders);
    println!("  {:<22} {:>12.2}", "Total Cost (₹)", m.total_cost);
    println!("  {:<22} {:>12}", "Avg Cost / Order (₹)", format_opt(m.average_cost));
    println!("  {:<22} {:>12}", "Avg Cost / Km (₹)", format_opt(m.average_cost_per_km));
    println!();

    println!("Order Distribution by Vehicle");
    let max_orders = report.vehicles.iter().map(|v| v.orders).max().unwrap_or(0);
    for v in &report.vehicles {
        println!(
            "  {:<6} {:>6}  {}",
            v.vehicle.as_str(),
            v.orders,
            bar(v.orders as f64, max_orders as f64)
        );
    }
    println!();

    println!("Cost Contribution by Vehicle (%)");
    for v in &report.vehicles {
        println!(
            "  {:<6} {:>6.2}  {}",
            v.vehicle.as_str(),
            v.cost_share,
            bar(v.cost_share, 100.0)
        );
    }
    println!();

    if let Some(answer) = &report.answer {
        println!("Query");
        for line in answer.to_string().lines() {
            println!("  {}", line);
        }
        println!();
    }

    println!("Filtered Orders");
    if report.rows.is_empty() {
        println!("  No orders match the current filters.");
        return;
    }
    println!(
        "  {:<12} {:<8} {:<6} {:>6} {:>9} {:>10} {:>8}  {}",
        "ORDER", "PRIORITY", "VEHICLE", "WEIGHT", "KM", "COST", "COST/KM", "CREATED"
    );
    println!("  {}", "-".repeat(86));
    for row in &report.rows {
        let o = &row.order;
        println!(
            "  {:<12} {:<8} {:<6} {:>6} {:>9.2} {:>10.2} {:>8}  {}",
            truncate(&o.order_id, 12),
            truncate(&o.priority, 8),
            o.vehicle.as_str(),
            o.weight,
            o.distance_km,
            o.delivery_cost,
            format_opt(row.cost_per_km.map(crate::domain::round2)),
            o.created_at.format("%Y-%m-%d %H:%M:%S")
        );
    }
}

fn print_filter(filter: &OrderFilter) {
    let vehicles = filter
        .vehicles
        .as_ref()
        .map(|v| v.iter().map(|v| v.as_str()).collect::<Vec<_>>().join(", "))
        .unwrap_or_else(|| "all".to_string());
    let priorities = filter
        .priorities
        .as_ref()
        .map(|p| p.join(", "))
        .unwrap_or_else(|| "all".to_string());

    println!("Vehicles:   {}", vehicles);
    println!("Priorities: {}", priorities);
    if let (Some(from), Some(to)) = (filter.from_date, filter.to_date) {
        println!("Dates:      {} .. {}", from, to);
    }
}

fn format_opt(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.2}", v))
        .unwrap_or_else(|| "-".to_string())
}

fn bar(value: f64, max: f64) -> String {
    const WIDTH: f64 = 40.0;
    if max <= 0.0 {
        return String::new();
    }
    "#".repeat(((value / max) * WIDTH).round() as usize)
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}
