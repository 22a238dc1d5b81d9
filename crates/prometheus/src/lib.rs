mod client;
mod error;
pub mod models;

pub use client::PrometheusClient;
pub use error::PrometheusError;
pub use models::Series;

pub type Result<T> = std::result::Result<T, PrometheusError>;
