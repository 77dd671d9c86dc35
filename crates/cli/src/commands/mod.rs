pub mod config_cmd;
pub mod credentials;
pub mod doctor;
pub mod post;
pub mod preview;
pub mod render;

use std::path::Path;

use threadsmith_config::AppConfig;

/// Resolve a text argument: `@path` reads the file as UTF-8, anything else is literal.
pub fn read_text_arg(arg: &str) -> Result<String, Box<dyn std::error::Error>> {
    match arg.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(Path::new(path))
            .map_err(|e| format!("Failed to read {path}: {e}").into()),
        None => Ok(arg.to_string()),
    }
}

pub fn load_config() -> Result<AppConfig, Box<dyn std::error::Error>> {
    Ok(AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?)
}
