pub mod base;
pub mod registry;

pub use base::QuoteService;
pub use registry::{display_name, ProviderRegistry};
