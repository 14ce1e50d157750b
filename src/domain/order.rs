use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, de};

use super::{Quote, VehicleType};

/// Wire and table layout of a stored order:
/// `[order_id, latitude, longitude, weight, priority, vehicle, distance_km,
/// delivery_cost, created_at]`.
pub type OrderRow = (String, f64, f64, i64, String, String, f64, f64, String);

/// An order as submitted by a client, before pricing.
///
/// Coordinates and weight also accept numeric strings, and weight accepts
/// integral floats such as `50.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrder {
    pub order_id: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub latitude: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub longitude: f64,
    #[serde(deserialize_with = "lenient_i64")]
    pub weight: i64,
    pub priority: String,
    /// Explicit electric-vehicle request. When absent the identifier's
    /// number parity decides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ev: Option<bool>,
}

impl NewOrder {
    pub fn new(
        order_id: impl Into<String>,
        latitude: f64,
        longitude: f64,
        weight: i64,
        priority: impl Into<String>,
    ) -> Self {
        Self {
            order_id: order_id.into(),
            latitude,
            longitude,
            weight,
            priority: priority.into(),
            ev: None,
        }
    }

    pub fn with_ev(mut self, ev: bool) -> Self {
        self.ev = Some(ev);
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Int(i64),
    Float(f64),
    Text(String),
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Int(v) => Ok(v as f64),
        NumberOrText::Float(v) => Ok(v),
        NumberOrText::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid number: {s:?}"))),
    }
}

fn lenient_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let integral = |v: f64| -> Result<i64, D::Error> {
        if v.is_finite() && v.fract() == 0.0 {
            Ok(v as i64)
        } else {
            Err(de::Error::custom(format!("expected an integer, got {v}")))
        }
    };

    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Int(v) => Ok(v),
        NumberOrText::Float(v) => integral(v),
        NumberOrText::Text(s) => {
            let s = s.trim();
            match s.parse::<i64>() {
                Ok(v) => Ok(v),
                Err(_) => s
                    .parse::<f64>()
                    .map_err(|_| de::Error::custom(format!("invalid integer: {s:?}")))
                    .and_then(integral),
            }
        }
    }
}

/// A priced, persisted order. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub weight: i64,
    pub priority: String,
    pub vehicle: VehicleType,
    pub distance_km: f64,
    pub delivery_cost: f64,
    pub created_at: DateTime<Utc>,
}

impl Order {
    pub fn from_quote(order: NewOrder, quote: Quote, created_at: DateTime<Utc>) -> Self {
        Self {
            order_id: order.order_id,
            latitude: order.latitude,
            longitude: order.longitude,
            weight: order.weight,
            priority: order.priority,
            vehicle: quote.vehicle,
            distance_km: quote.distance_km,
            delivery_cost: quote.delivery_cost,
            created_at,
        }
    }

    pub fn to_row(&self) -> OrderRow {
        (
            self.order_id.clone(),
            self.latitude,
            self.longitude,
            self.weight,
            self.priority.clone(),
            self.vehicle.as_str().to_string(),
            self.distance_km,
            self.delivery_cost,
            format_timestamp(self.created_at),
        )
    }

    pub fn from_row(row: OrderRow) -> Result<Self> {
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
        ) = row;

        Ok(Self {
            vehicle: VehicleType::from_str(&vehicle)
                .ok_or_else(|| anyhow::anyhow!("Invalid vehicle label: {}", vehicle))?,
            created_at: parse_timestamp(&created_at)
                .with_context(|| format!("Invalid created_at for order {}", order_id))?,
            order_id,
            latitude,
            longitude,
            weight,
            priority,
            distance_km,
            delivery_cost,
        })
    }
}

/// Render a timestamp the way it is stored: RFC 3339, UTC, microseconds.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a stored timestamp.
///
/// Accepts RFC 3339 as well as naive ISO-8601 (`2024-05-01T10:20:30.123456`),
/// which is read as UTC.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .context("Timestamp must be ISO-8601")?;
    Ok(naive.and_utc())
}
