pub mod rest;
pub mod traits;

pub use rest::{ApiError, RestClient};
pub use traits::{AddChannelsOutcome, SpectraService};
