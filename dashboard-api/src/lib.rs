pub mod config;
pub mod error;
pub mod metrics_server;
pub mod observability;
pub mod routes;
pub mod validate;

pub use error::ApiError;
pub use routes::{router, AppState};
