pub mod admin;
pub mod auth;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod errors;
pub mod store;

#[cfg(feature = "audit-log")]
pub mod audit;
