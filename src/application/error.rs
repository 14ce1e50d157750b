use thiserror::Error;

use crate::domain::OrderIdError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid order id: {0}")]
    InvalidOrderId(#[from] OrderIdError),

    #[error("Unknown vehicle label: {0}")]
    UnknownVehicle(String),

    #[error("Invalid date range: {from} is after {to}")]
    InvalidDateRange { from: String, to: String },

    #[error("Backend API is not running ({0})")]
    BackendUnavailable(String),

    #[error("Backend API returned {status}: {body}")]
    BackendRejected { status: u16, body: String },

    #[error("Backend API sent an unreadable response: {0}")]
    InvalidResponse(String),

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}
