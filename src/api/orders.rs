use axum::{Json, Router, extract::State, routing::get};
use serde::{Deserialize, Serialize};

use crate::application::AppError;
use crate::domain::{NewOrder, OrderRow};

use super::AppState;

/// Acknowledgment returned by `POST /orders`. Carries no order data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub status: String,
}

impl Ack {
    pub fn success() -> Self {
        Self {
            status: "success".to_string(),
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/orders", get(list_orders).post(create_order))
}

async fn create_order(
    State(state): State<AppState>,
    Json(order): Json<NewOrder>,
) -> Result<Json<Ack>, AppError> {
    let order = state.service.create_order(order).await?;
    tracing::info!(
        order_id = %order.order_id,
        vehicle = %order.vehicle,
        delivery_cost = order.delivery_cost,
        "order created"
    );
    Ok(Json(Ack::success()))
}

async fn list_orders(State(state): State<AppState>) -> Result<Json<Vec<OrderRow>>, AppError> {
    let orders = state.service.list_orders().await?;
    Ok(Json(orders.iter().map(|o| o.to_row()).collect()))
}
