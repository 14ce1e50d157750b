//! Synthetic load for the intake service.
//!
//! Order `n` is named `ORD_{n}` and its weight bucket is picked by `n % 4`,
//! so consecutive orders cycle through light and heavy loads while the
//! identifier parity alternates between electric and combustion vehicles.
use std::ops::RangeInclusive;
use std::time::Duration;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::client::OrdersClient;
use crate::domain::NewOrder;

pub const PRIORITIES: [&str; 3] = ["LOW", "MEDIUM", "HIGH"];

const LIGHT_WEIGHTS: RangeInclusive<i64> = 1..=80;
const HEAVY_WEIGHTS: RangeInclusive<i64> = 120..=160;

/// Weight range for the `n`-th order.
pub fn weight_bucket(n: u64) -> RangeInclusive<i64> {
    match n % 4 {
        0 | 1 => LIGHT_WEIGHTS,
        _ => HEAVY_WEIGHTS,
    }
}

pub fn generate_order<R: Rng>(n: u64, rng: &mut R) -> NewOrder {
    let priority = PRIORITIES.choose(rng).copied().unwrap_or("LOW");

    NewOrder::new(
        format!("ORD_{n}"),
        rng.gen_range(19.0..19.3),
        rng.gen_range(72.8..73.0),
        rng.gen_range(weight_bucket(n)),
        priority,
    )
}

/// Post one order per `interval`, starting at `ORD_1`.
///
/// Runs forever unless `limit` is given. Every attempt prints one status
/// line; failed requests are reported and the loop moves on.
pub async fn run<R: Rng>(
    client: &OrdersClient,
    interval: Duration,
    limit: Option<u64>,
    rng: &mut R,
) -> u64 {
    let mut n: u64 = 1;

    loop {
        let order = generate_order(n, rng);
        let status = match client.submit_order(&order).await {
            Ok(code) => code.to_string(),
            Err(e) => {
                tracing::warn!(order_id = %order.order_id, "submit failed: {e}");
                "error".to_string()
            }
        };

        println!(
            "{} | Weight: {} | Status: {}",
            order.order_id, order.weight, status
        );

        if limit.is_some_and(|limit| n >= limit) {
            return n;
        }

        n += 1;
        tokio::time::sleep(interval).await;
    }
}
