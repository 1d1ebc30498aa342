pub mod client;
pub mod dto;
pub mod error;
#[cfg(test)]
pub mod fake;

pub use client::{ApiClient, Backend};
pub use error::ApiError;
