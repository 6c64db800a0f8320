pub mod client;
pub mod error;
pub mod retry;
pub mod types;

pub use client::SerpClient;
pub use error::SerpError;
pub use types::{YelpBusinessResponse, YelpOrganicResult, YelpSearchResponse};
