// src/core/mod.rs
pub mod config;
pub mod vault;

pub use config::Config;
pub use vault::{ImportSummary, Vault, VaultError};
