// Application layer - use cases and orchestration.
// The HTTP API and the CLI both go through OrderService for writes;
// analytics and queries work on rows pulled from either side.

pub mod analytics;
pub mod error;
pub mod query;
pub mod service;

pub use analytics::*;
pub use error::*;
pub use query::*;
pub use service::*;
