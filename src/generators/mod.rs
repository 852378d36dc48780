// src/generators/mod.rs
use thiserror::Error;

pub mod password;
pub mod pool;

pub use password::{GeneratorPolicy, PasswordGenerator, PolicyUpdate};
pub use pool::{Category, CharacterPool};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GeneratorError {
    #[error("Password length {length} is outside the allowed range [{min}, {max}]")]
    LengthOutOfRange { length: usize, min: usize, max: usize },

    #[error("Password length {length} is too short to hold one character from each of the {required} required categories")]
    LengthBelowRequired { length: usize, required: usize },

    #[error("No allowed characters available. Check policy settings.")]
    EmptyPool,

    #[error("Password count must be greater than zero")]
    InvalidCount,

    #[error("Invalid policy: {0}")]
    InvalidPolicy(String),

    #[error("Invalid character pool: {0}")]
    InvalidPool(String),
}

pub type Result<T> = std::result::Result<T, GeneratorError>;
