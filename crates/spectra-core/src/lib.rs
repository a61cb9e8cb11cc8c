pub mod config;
pub mod error;
pub mod models;
pub mod store;

pub use error::SpectraError;
