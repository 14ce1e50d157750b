use std::time::Duration;

use reqwest::Client;

use crate::application::AppError;
use crate::domain::{NewOrder, Order, OrderRow};

/// Thin HTTP client for the `/orders` endpoint, shared by the dashboard and
/// the load generator. Requests are never retried.
#[derive(Clone)]
pub struct OrdersClient {
    http: Client,
    url: String,
}

impl OrdersClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::BackendUnavailable(e.to_string()))?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch every stored order, oldest first.
    pub async fn fetch_orders(&self) -> Result<Vec<Order>, AppError> {
        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| AppError::BackendUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::BackendRejected {
                status: status.as_u16(),
                body,
            });
        }

        let rows: Vec<OrderRow> = response
            .json()
            .await
            .map_err(|e| AppError::InvalidResponse(e.to_string()))?;
        tracing::debug!(rows = rows.len(), "fetched orders");

        rows.into_iter()
            .map(|row| {
                Order::from_row(row).map_err(|e| AppError::InvalidResponse(format!("{e:#}")))
            })
            .collect()
    }

    /// Submit one order and report the HTTP status the API answered with.
    pub async fn submit_order(&self, order: &NewOrder) -> Result<u16, AppError> {
        let response = self
            .http
            .post(&self.url)
            .json(order)
            .send()
            .await
            .map_err(|e| AppError::BackendUnavailable(e.to_string()))?;
        Ok(response.status().as_u16())
    }
}
