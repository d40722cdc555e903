pub mod auth;
pub mod config;
pub mod http;
pub mod providers;
pub mod services;
pub mod utils;
