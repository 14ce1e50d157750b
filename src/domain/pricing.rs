use std::fmt;

use super::{NewOrder, VehicleType};

/// Depot latitude every distance is measured from.
pub const WAREHOUSE_LAT: f64 = 19.0760;

/// Depot longitude every distance is measured from.
pub const WAREHOUSE_LON: f64 = 72.8777;

/// Flat degrees-to-kilometers factor. Distances are planar, not geodesic.
pub const KM_PER_DEGREE: f64 = 111.0;

/// Round to 2 decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Distance in kilometers between the warehouse and `(lat, lon)`.
///
/// Euclidean distance in degree space scaled by [`KM_PER_DEGREE`], rounded
/// to 2 decimals.
pub fn calculate_distance(lat: f64, lon: f64) -> f64 {
    let d_lat = lat - WAREHOUSE_LAT;
    let d_lon = lon - WAREHOUSE_LON;
    round2(d_lat.hypot(d_lon) * KM_PER_DEGREE)
}

/// Extract the numeric segment of an order identifier.
///
/// The segment is the text between the first `_` and the next `_` (or the
/// end of the string): `"ORD_42"` and `"ORD_42_retry"` both yield 42.
pub fn parse_order_number(order_id: &str) -> Result<i64, OrderIdError> {
    let segment = order_id
        .split('_')
        .nth(1)
        .ok_or_else(|| OrderIdError::MissingSeparator(order_id.to_string()))?;

    segment
        .trim()
        .parse()
        .map_err(|_| OrderIdError::InvalidNumber(order_id.to_string()))
}

/// Whether the order rides an electric vehicle: its number is even.
pub fn ev_toggle(order_id: &str) -> Result<bool, OrderIdError> {
    Ok(parse_order_number(order_id)?.rem_euclid(2) == 0)
}

/// Vehicle and its per-km tariff for a given weight and order identifier.
pub fn assign_vehicle(weight: i64, order_id: &str) -> Result<(VehicleType, f64), OrderIdError> {
    let vehicle = VehicleType::for_load(weight, ev_toggle(order_id)?);
    Ok((vehicle, vehicle.cost_per_km()))
}

/// Delivery cost for `distance_km` at `cost_per_km`, rounded to 2 decimals.
pub fn delivery_cost(distance_km: f64, cost_per_km: f64) -> f64 {
    round2(distance_km * cost_per_km)
}

/// Everything the pricing engine derives for one order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quote {
    pub distance_km: f64,
    pub vehicle: VehicleType,
    pub delivery_cost: f64,
}

/// Price an incoming order.
///
/// An explicit `ev` flag on the order takes precedence over identifier
/// parity; only when it is absent is the identifier parsed.
pub fn quote(order: &NewOrder) -> Result<Quote, OrderIdError> {
    let distance_km = calculate_distance(order.latitude, order.longitude);
    let electric = match order.ev {
        Some(ev) => ev,
        None => ev_toggle(&order.order_id)?,
    };
    let vehicle = VehicleType::for_load(order.weight, electric);

    Ok(Quote {
        distance_km,
        vehicle,
        delivery_cost: delivery_cost(distance_km, vehicle.cost_per_km()),
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderIdError {
    /// No `_` separator, so there is no numeric segment at all.
    MissingSeparator(String),
    /// The segment after the separator is not an integer.
    InvalidNumber(String),
}

impl fmt::Display for OrderIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderIdError::MissingSeparator(id) => {
                write!(f, "order id '{}' has no '_' separated number", id)
            }
            OrderIdError::InvalidNumber(id) => {
                write!(f, "order id '{}' does not end in an integer segment", id)
            }
        }
    }
}

impl std::error::Error for OrderIdError {}
