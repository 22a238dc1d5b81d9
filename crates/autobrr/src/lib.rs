mod client;
mod error;
pub mod models;

pub use client::AutobrrClient;
pub use error::AutobrrError;
pub use models::Indexer;

pub type Result<T> = std::result::Result<T, AutobrrError>;
