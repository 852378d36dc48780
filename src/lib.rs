// src/lib.rs
pub mod cli;
pub mod core;
pub mod db;
pub mod generators;
pub mod importers;
pub mod logging;
pub mod models;
pub mod strength;
pub mod utils;

pub use crate::core::config::Config;
pub use crate::core::vault::{ImportSummary, Vault, VaultError};
pub use crate::generators::{GeneratorError, GeneratorPolicy, PasswordGenerator, PolicyUpdate};
pub use crate::strength::{StrengthChecker, StrengthLabel};
