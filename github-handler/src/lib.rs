pub mod client;
pub mod error;

pub use client::{GithubClient, SearchPayload, SearchQuery};
pub use error::ApiError;
