pub mod client;
pub mod error;

pub use client::{GitHubClient, StatusSource};
pub use error::GitHubError;
