pub mod client;
pub mod error;
pub mod types;

pub use client::RestClient;
pub use error::ApiError;
