//! Configuration loaded from `pinauth.toml`.

pub mod settings;

pub use settings::{Settings, DEFAULT_CONFIG_PATH};
