// src/core/config.rs
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use log::LevelFilter;

use crate::generators::GeneratorPolicy;
use crate::strength::{StrengthChecker, StrengthLabel, DEFAULT_MIN_LENGTH};

// Configuration for the password keeper
#[derive(Debug, Clone)]
pub struct Config {
    // Database
    pub database_url: String,

    // Password Generation
    pub default_password_length: usize,
    pub password_min_length: usize,
    pub password_max_length: usize,
    pub require_uppercase: bool,
    pub require_lowercase: bool,
    pub require_digits: bool,
    pub require_symbols: bool,

    // Strength checks
    pub strength_min_length: usize,
    pub min_strength: StrengthLabel,

    // Logging
    pub log_level: LevelFilter,
    pub log_file: PathBuf,

    // Problems found while loading; reported once logging is up
    pub warnings: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        let app_dir = crate::utils::get_app_config_dir().unwrap_or_else(|| PathBuf::from("."));
        let policy = GeneratorPolicy::default();

        Self {
            // Database
            database_url: format!("sqlite:{}", app_dir.join("passkeeper.db").display()),

            // Password Generation
            default_password_length: 16,
            password_min_length: policy.min_length,
            password_max_length: policy.max_length,
            require_uppercase: policy.require_upper,
            require_lowercase: policy.require_lower,
            require_digits: policy.require_digit,
            require_symbols: policy.require_symbol,

            // Strength checks
            strength_min_length: DEFAULT_MIN_LENGTH,
            min_strength: StrengthLabel::Medium,

            // Logging
            log_level: LevelFilter::Info,
            log_file: app_dir.join("passkeeper.log"),

            warnings: Vec::new(),
        }
    }
}

impl Config {
    // Load configuration from environment variables
    pub fn load() -> Self {
        Self::load_from(|key| env::var(key).ok())
    }

    /// Same as `load`, reading values through `lookup` instead of the
    /// process environment.
    pub fn load_from<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        // Database
        if let Some(url) = lookup("DATABASE_URL") {
            config.database_url = url;
        }

        let mut warnings = Vec::new();

        // Password Generation
        set_parsed(&lookup, "DEFAULT_PASSWORD_LENGTH", &mut config.default_password_length, &mut warnings);
        set_parsed(&lookup, "PASSWORD_MIN_LENGTH", &mut config.password_min_length, &mut warnings);
        set_parsed(&lookup, "PASSWORD_MAX_LENGTH", &mut config.password_max_length, &mut warnings);
        set_parsed(&lookup, "REQUIRE_UPPERCASE", &mut config.require_uppercase, &mut warnings);
        set_parsed(&lookup, "REQUIRE_LOWERCASE", &mut config.require_lowercase, &mut warnings);
        set_parsed(&lookup, "REQUIRE_DIGITS", &mut config.require_digits, &mut warnings);
        set_parsed(&lookup, "REQUIRE_SYMBOLS", &mut config.require_symbols, &mut warnings);

        // Strength checks
        set_parsed(&lookup, "STRENGTH_MIN_LENGTH", &mut config.strength_min_length, &mut warnings);
        set_parsed(&lookup, "MIN_STRENGTH", &mut config.min_strength, &mut warnings);

        // Logging
        if let Some(level) = lookup("LOG_LEVEL") {
            match level.to_lowercase().as_str() {
                "off" => config.log_level = LevelFilter::Off,
                "error" => config.log_level = LevelFilter::Error,
                "warn" => config.log_level = LevelFilter::Warn,
                "info" => config.log_level = LevelFilter::Info,
                "debug" => config.log_level = LevelFilter::Debug,
                "trace" => config.log_level = LevelFilter::Trace,
                _ => warnings.push(format!("Unknown log level '{}', using {}", level, config.log_level)),
            }
        }

        if let Some(file) = lookup("LOG_FILE") {
            config.log_file = PathBuf::from(file);
        }

        config.warnings = warnings;
        config
    }

    pub fn generator_policy(&self) -> GeneratorPolicy {
        GeneratorPolicy {
            min_length: self.password_min_length,
            max_length: self.password_max_length,
            require_upper: self.require_uppercase,
            require_lower: self.require_lowercase,
            require_digit: self.require_digits,
            require_symbol: self.require_symbols,
        }
    }

    pub fn strength_checker(&self) -> StrengthChecker {
        StrengthChecker::new(self.strength_min_length)
    }
}

fn set_parsed<F, T>(lookup: &F, key: &str, target: &mut T, warnings: &mut Vec<String>)
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    if let Some(val) = lookup(key) {
        match val.trim().parse() {
            Ok(parsed) => *target = parsed,
            Err(_) => warnings.push(format!("Ignoring invalid value '{}' for {}", val, key)),
        }
    }
}
