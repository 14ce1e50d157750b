mod common;

use anyhow::Result;
use chrono::NaiveDate;
use common::{SampleOrders, test_service};
use fleetlytics::application::{
    OrderFilter, QueryAnswer, answer_query, derive_rows, key_metrics, vehicle_breakdown,
};
use fleetlytics::dashboard::{DashboardOptions, build_report};
use fleetlytics::domain::VehicleType;
use fleetlytics::io::Exporter;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[tokio::test]
async fn test_key_metrics_over_all_orders() -> Result<()> {
    let (service, _temp) = test_service().await?;
    SampleOrders::record(&service).await?;

    let rows = derive_rows(service.list_orders().await?);
    let metrics = key_metrics(&rows);

    assert_eq!(metrics.total_orders, 6);
    // 66.6 + 44.4 + 222.0 + 38.85 + 33.3 + 0.0
    assert!(approx(metrics.total_cost, 405.15));
    // 405.15 / 6 = 67.525, either side of the rounding boundary is fine
    assert!((metrics.average_cost.unwrap() - 67.525).abs() <= 0.005 + 1e-9);
    // ORD_6 sits on the warehouse and has no cost per km; the other five
    // average (6 + 4 + 10 + 7 + 6) / 5
    assert_eq!(metrics.average_cost_per_km, Some(6.6));

    Ok(())
}

#[tokio::test]
async fn test_filter_by_single_vehicle() -> Result<()> {
    let (service, _temp) = test_service().await?;
    SampleOrders::record(&service).await?;

    let rows = derive_rows(service.list_orders().await?);
    let filter = OrderFilter {
        vehicles: Some(vec![VehicleType::ThreeWheeler]),
        ..Default::default()
    };
    let filtered = filter.apply(&rows);

    assert!(filtered.iter().all(|r| r.order.vehicle == VehicleType::ThreeWheeler));
    let ids: Vec<_> = filtered.iter().map(|r| r.order.order_id.as_str()).collect();
    assert_eq!(ids, vec!["ORD_1", "ORD_5"]);

    let metrics = key_metrics(&filtered);
    assert_eq!(metrics.total_orders, 2);
    assert!(approx(metrics.total_cost, 99.9));

    Ok(())
}

#[tokio::test]
async fn test_filter_by_priority_and_dates() -> Result<()> {
    let (service, _temp) = test_service().await?;
    SampleOrders::record(&service).await?;

    let rows = derive_rows(service.list_orders().await?);
    let filter = OrderFilter {
        priorities: Some(vec!["HIGH".into(), "MEDIUM".into()]),
        from_date: NaiveDate::from_ymd_opt(2024, 4, 2),
        to_date: NaiveDate::from_ymd_opt(2024, 4, 3),
        ..Default::default()
    };
    let ids: Vec<_> = filter
        .apply(&rows)
        .into_iter()
        .map(|r| r.order.order_id)
        .collect();
    assert_eq!(ids, vec!["ORD_3", "ORD_4"]);

    Ok(())
}

#[tokio::test]
async fn test_vehicle_breakdown_percentages() -> Result<()> {
    let (service, _temp) = test_service().await?;
    SampleOrders::record(&service).await?;

    let rows = derive_rows(service.list_orders().await?);
    let breakdown = vehicle_breakdown(&rows);

    let labels: Vec<_> = breakdown.iter().map(|v| v.vehicle.as_str()).collect();
    assert_eq!(labels, vec!["3W", "3W EV", "4W", "4W EV"]);

    let counts: Vec<_> = breakdown.iter().map(|v| v.orders).collect();
    assert_eq!(counts, vec![2, 2, 1, 1]);

    let share_total: f64 = breakdown.iter().map(|v| v.cost_share).sum();
    assert!(approx(share_total, 100.0));

    let four_wheeler = &breakdown[2];
    assert!(approx(four_wheeler.cost_share, 222.0 / 405.15 * 100.0));

    Ok(())
}

#[tokio::test]
async fn test_queries_see_only_filtered_rows() -> Result<()> {
    let (service, _temp) = test_service().await?;
    SampleOrders::record(&service).await?;

    let rows = derive_rows(service.list_orders().await?);
    assert_eq!(
        answer_query("What was the most expensive delivery?", &rows),
        QueryAnswer::MostExpensive {
            order_id: "ORD_3".into(),
            delivery_cost: 222.0
        }
    );

    let electric = OrderFilter {
        vehicles: Some(vec![VehicleType::ThreeWheelerEv, VehicleType::FourWheelerEv]),
        ..Default::default()
    }
    .apply(&rows);

    assert_eq!(
        answer_query("most expensive", &electric),
        QueryAnswer::MostExpensive {
            order_id: "ORD_2".into(),
            delivery_cost: 44.4
        }
    );
    // (44.4 + 38.85 + 0.0) / 3
    assert_eq!(answer_query("AVERAGE COST", &electric), QueryAnswer::AverageCost(27.75));
    assert_eq!(answer_query("cheapest route", &electric), QueryAnswer::Unsupported);

    Ok(())
}

#[tokio::test]
async fn test_dashboard_report_and_export() -> Result<()> {
    let (service, _temp) = test_service().await?;
    SampleOrders::record(&service).await?;

    let options = DashboardOptions {
        priorities: Some(vec!["LOW".into()]),
        query: Some("vehicle performance".into()),
        ..Default::default()
    };
    let report = build_report(service.list_orders().await?, &options)?.unwrap();

    assert_eq!(report.metrics.total_orders, 3);
    assert_eq!(report.filter.from_date, NaiveDate::from_ymd_opt(2024, 4, 1));
    assert_eq!(report.filter.to_date, NaiveDate::from_ymd_opt(2024, 4, 3));
    let text = report.answer.as_ref().unwrap().to_string();
    assert!(text.starts_with("vehicle\n3W "));

    let csv = String::from_utf8(Exporter::new(&report.rows).to_csv_bytes()?)?;
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].ends_with("created_at,date,cost_per_km"));
    let first: Vec<&str> = lines[1].split(',').collect();
    assert_eq!(first[0], "ORD_1");
    assert_eq!(first[5], "3W");
    assert_eq!(first[9], "2024-04-01");
    assert!(approx(first[10].parse::<f64>()?, 6.0));
    // zero-distance order exports an empty cost per km
    assert!(lines[3].starts_with("ORD_6,"));
    assert!(lines[3].ends_with(",2024-04-03,"));

    let json = serde_json::to_value(&report)?;
    assert_eq!(json["rows"].as_array().unwrap().len(), 3);
    assert_eq!(json["rows"][0]["vehicle"], "3W");
    assert_eq!(json["answer"]["kind"], "vehicle_performance");

    Ok(())
}
