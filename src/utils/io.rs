// src/utils/io.rs
use std::path::PathBuf;

/// Get the application config directory
pub fn get_app_config_dir() -> Option<PathBuf> {
    if let Some(proj_dirs) = directories::ProjectDirs::from("com", "passkeeper", "passkeeper") {
        let config_dir = proj_dirs.config_dir();

        // Create the directory if it doesn't exist
        if !config_dir.exists() {
            if let Err(e) = std::fs::create_dir_all(config_dir) {
                log::error!("Failed to create config directory: {}", e);
                return None;
            }
        }

        Some(config_dir.to_path_buf())
    } else {
        log::error!("Could not determine config directory");
        None
    }
}

/// Single-character delimiter from a CLI or prompt argument. `\t` and `tab`
/// both mean a tab.
pub fn parse_delimiter(value: &str) -> Result<char, String> {
    if value == "\\t" || value == "tab" {
        return Ok('\t');
    }

    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some('"'), None) => Err("Quote cannot be used as a delimiter".to_string()),
        (Some(c), None) if c != '\n' && c != '\r' => Ok(c),
        _ => Err(format!("Delimiter must be a single character, got '{}'", value)),
    }
}
