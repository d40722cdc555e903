pub mod mask;
pub mod money;

pub use mask::mask_sensitive;
pub use money::{format_seconds, format_try};
