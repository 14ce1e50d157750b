use axum::{Json, http::StatusCode, response::{IntoResponse, Response}};
use serde_json::json;

use crate::application::AppError;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::InvalidOrderId(_)
            | AppError::UnknownVehicle(_)
            | AppError::InvalidDateRange { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, self.to_string())
            }
            AppError::BackendUnavailable(_)
            | AppError::BackendRejected { .. }
            | AppError::InvalidResponse(_)
            | AppError::Database(_) => {
                tracing::error!("Internal Server Error: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
