pub mod client;
pub mod errors;
pub mod models;
pub mod normalize;

pub use client::ApiClient;
pub use errors::{ClientError, ErrorCode};
pub use models::*;
pub use normalize::normalize_quotes;
