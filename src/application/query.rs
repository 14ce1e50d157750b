use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{VehicleType, round2};

use super::analytics::{AnalyticsRow, vehicle_breakdown};

/// Canned analytical questions, matched by trigger phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyticsQuery {
    MostExpensive,
    AverageCost,
    VehiclePerformance,
}

impl AnalyticsQuery {
    /// Supported commands, in matching priority order.
    pub const ALL: [AnalyticsQuery; 3] = [
        AnalyticsQuery::MostExpensive,
        AnalyticsQuery::AverageCost,
        AnalyticsQuery::VehiclePerformance,
    ];

    pub fn trigger(&self) -> &'static str {
        match self {
            AnalyticsQuery::MostExpensive => "most expensive",
            AnalyticsQuery::AverageCost => "average cost",
            AnalyticsQuery::VehiclePerformance => "vehicle performance",
        }
    }

    /// First command whose trigger phrase occurs anywhere in `input`,
    /// ignoring case.
    pub fn detect(input: &str) -> Option<Self> {
        let input = input.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|query| input.contains(query.trigger()))
    }

    pub fn evaluate(&self, rows: &[AnalyticsRow]) -> QueryAnswer {
        if rows.is_empty() {
            return QueryAnswer::NoData;
        }

        match self {
            AnalyticsQuery::MostExpensive => {
                // first row wins on ties
                let top = rows.iter().fold(&rows[0], |best, row| {
                    if row.order.delivery_cost > best.order.delivery_cost {
                        row
                    } else {
                        best
                    }
                });
                QueryAnswer::MostExpensive {
                    order_id: top.order.order_id.clone(),
                    delivery_cost: top.order.delivery_cost,
                }
            }
            AnalyticsQuery::AverageCost => {
                let total: f64 = rows.iter().map(|r| r.order.delivery_cost).sum();
                QueryAnswer::AverageCost(round2(total / rows.len() as f64))
            }
            AnalyticsQuery::VehiclePerformance => QueryAnswer::VehiclePerformance(
                vehicle_breakdown(rows)
                    .into_iter()
                    .map(|s| VehicleCost {
                        vehicle: s.vehicle,
                        average_cost: s.average_cost,
                    })
                    .collect(),
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleCost {
    pub vehicle: VehicleType,
    pub average_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum QueryAnswer {
    /// Nothing was asked.
    Prompt,
    MostExpensive { order_id: String, delivery_cost: f64 },
    AverageCost(f64),
    VehiclePerformance(Vec<VehicleCost>),
    /// A supported question over an empty selection.
    NoData,
    Unsupported,
}

/// Answer a free-text question over the currently filtered rows.
pub fn answer_query(input: &str, rows: &[AnalyticsRow]) -> QueryAnswer {
    if input.trim().is_empty() {
        return QueryAnswer::Prompt;
    }
    match AnalyticsQuery::detect(input) {
        Some(query) => query.evaluate(rows),
        None => QueryAnswer::Unsupported,
    }
}

impl fmt::Display for QueryAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryAnswer::Prompt => write!(f, "Enter a query above."),
            QueryAnswer::MostExpensive {
                order_id,
                delivery_cost,
            } => write!(f, "Order {} with cost ₹{:.2}", order_id, delivery_cost),
            QueryAnswer::AverageCost(avg) => write!(f, "Average delivery cost: ₹{:.2}", avg),
            QueryAnswer::VehiclePerformance(costs) => {
                // flattened two-column text, one vehicle per line
                write!(f, "vehicle")?;
                for cost in costs {
                    write!(f, "\n{:<8}{:>12.6}", cost.vehicle.as_str(), cost.average_cost)?;
                }
                Ok(())
            }
            QueryAnswer::NoData => write!(f, "No orders match the current filters."),
            QueryAnswer::Unsupported => write!(f, "Query not supported yet."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Order;
    use chrono::Utc;

    fn row(id: &str, vehicle: VehicleType, cost: f64) -> AnalyticsRow {
        AnalyticsRow::from_order(Order {
            order_id: id.into(),
            latitude: 19.1,
            longitude: 72.9,
            weight: 50,
            priority: "HIGH".into(),
            vehicle,
            distance_km: 1.0,
            delivery_cost: cost,
            created_at: Utc::now(),
        })
    }

    fn rows() -> Vec<AnalyticsRow> {
        vec![
            row("ORD_1", VehicleType::ThreeWheeler, 12.5),
            row("ORD_2", VehicleType::ThreeWheelerEv, 40.0),
            row("ORD_3", VehicleType::FourWheeler, 40.0),
            row("ORD_4", VehicleType::ThreeWheeler, 7.5),
        ]
    }

    #[test]
    fn test_detect_is_case_insensitive_substring() {
        assert_eq!(
            AnalyticsQuery::detect("Which is the MOST EXPENSIVE order?"),
            Some(AnalyticsQuery::MostExpensive)
        );
        assert_eq!(
            AnalyticsQuery::detect("show average cost"),
            Some(AnalyticsQuery::AverageCost)
        );
        assert_eq!(
            AnalyticsQuery::detect("vehicle performance please"),
            Some(AnalyticsQuery::VehiclePerformance)
        );
        assert_eq!(AnalyticsQuery::detect("priciest order"), None);
    }

    #[test]
    fn test_detect_prefers_earlier_trigger() {
        assert_eq!(
            AnalyticsQuery::detect("average cost of the most expensive"),
            Some(AnalyticsQuery::MostExpensive)
        );
    }

    #[test]
    fn test_most_expensive_keeps_first_on_tie() {
        let answer = answer_query("most expensive", &rows());
        assert_eq!(
            answer,
            QueryAnswer::MostExpensive {
                order_id: "ORD_2".into(),
                delivery_cost: 40.0
            }
        );
        assert_eq!(answer.to_string(), "Order ORD_2 with cost ₹40.00");
    }

    #[test]
    fn test_average_cost() {
        let answer = answer_query("Average Cost", &rows());
        assert_eq!(answer, QueryAnswer::AverageCost(25.0));
        assert_eq!(answer.to_string(), "Average delivery cost: ₹25.00");
    }

    #[test]
    fn test_vehicle_performance_text() {
        let answer = answer_query("vehicle performance", &rows());
        match &answer {
            QueryAnswer::VehiclePerformance(costs) => {
                assert_eq!(costs.len(), 3);
                assert_eq!(costs[0].vehicle, VehicleType::ThreeWheeler);
                assert_eq!(costs[0].average_cost, 10.0);
            }
            other => panic!("unexpected answer: {other:?}"),
        }
        let text = answer.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "vehicle");
        assert!(lines[1].starts_with("3W "));
        assert!(lines[1].ends_with("10.000000"));
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_prompt_unsupported_and_no_data() {
        assert_eq!(answer_query("   ", &rows()), QueryAnswer::Prompt);
        assert_eq!(answer_query("forecast next week", &rows()), QueryAnswer::Unsupported);
        assert_eq!(answer_query("most expensive", &[]), QueryAnswer::NoData);
    }
}
