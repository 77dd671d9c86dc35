//! `threadsmith config`: Configuration management commands.

use threadsmith_config::{AppConfig, PublisherKind};
use threadsmith_core::credentials::CREDENTIAL_VARS;

/// Non-fatal problems worth surfacing for an otherwise valid config.
fn warnings(config: &AppConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if !config.credentials.is_complete() {
        warnings.push(format!(
            "Credentials incomplete (set {} or run `threadsmith credentials`)",
            CREDENTIAL_VARS.join(", ")
        ));
    }

    if config.publisher.kind == PublisherKind::Command && config.publisher.program.is_none() {
        warnings.push("publisher.kind = \"command\" but publisher.program is not set".into());
    }

    warnings
}

pub async fn validate() -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Validating configuration...");

    match AppConfig::load() {
        Ok(config) => {
            println!("   ✅ Config parsed successfully");

            let warnings = warnings(&config);
            if warnings.is_empty() {
                println!("   ✅ All checks passed");
            } else {
                println!();
                for w in &warnings {
                    println!("   ⚠️  {w}");
                }
            }

            println!();
            println!("   Max length: {}", config.thread.max_unit_length);
            println!("   Publisher:  {:?}", config.publisher.kind);
            println!("   Theme:      {}", config.render.theme);
        }
        Err(e) => {
            println!("   ❌ Config error: {e}");
            return Err(e.into());
        }
    }

    Ok(())
}

pub async fn show() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    // Secrets never leave the process through `show`
    for secret in [
        &mut config.credentials.api_key,
        &mut config.credentials.api_secret,
        &mut config.credentials.access_token,
        &mut config.credentials.access_token_secret,
    ] {
        if secret.is_some() {
            *secret = Some("[REDACTED]".into());
        }
    }
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

pub async fn path() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", AppConfig::config_path().display());
    Ok(())
}
