//! `threadsmith doctor`: Diagnose system health.

use threadsmith_config::AppConfig;
use threadsmith_core::Publisher;
use threadsmith_publishers::build_from_config;
use threadsmith_render::MermaidRenderer;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 threadsmith Doctor: System Diagnostics");
    println!("=========================================\n");

    let mut issues = 0;

    // Check config
    let config_path = AppConfig::config_path();
    if !config_path.exists() {
        println!("  ℹ️  No config file at {} (using defaults)", config_path.display());
    }
    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Config valid");
            config
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            issues += 1;
            AppConfig::default()
        }
    };

    // Check credentials
    let missing = config.credentials.to_credentials().missing();
    if missing.is_empty() {
        println!("  ✅ Credentials complete");
    } else {
        println!("  ⚠️  Missing credentials: {}", missing.join(", "));
        issues += 1;
    }

    // Check publisher
    match publisher_status(&config).await {
        Ok(name) => println!("  ✅ Publisher: {name}"),
        Err(problem) => {
            println!("  ❌ Publisher: {problem}");
            issues += 1;
        }
    }

    // Check renderer
    let renderer = match &config.render.program {
        Some(program) => match which::which(program) {
            Ok(path) => Some(path.display().to_string()),
            Err(_) => None,
        },
        None => MermaidRenderer::new().invocation().map(|inv| inv.to_string()),
    };
    match renderer {
        Some(renderer) => println!("  ✅ Mermaid renderer: {renderer}"),
        None => {
            println!(
                "  ⚠️  Mermaid renderer not found, install with: npm install -g {}",
                threadsmith_render::NPX_PACKAGE
            );
            issues += 1;
        }
    }

    // Summary
    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}

/// Build the configured publisher and run its health check.
async fn publisher_status(config: &AppConfig) -> Result<String, String> {
    let publisher = build_from_config(config, config.credentials.to_credentials())
        .map_err(|e| e.to_string())?;

    match publisher.health_check().await {
        Ok(true) => Ok(match &config.publisher.program {
            Some(program) => format!("{} ({program})", publisher.name()),
            None => publisher.name().to_string(),
        }),
        Ok(false) => Err(format!(
            "{} publisher is not ready (program not found: {})",
            publisher.name(),
            config.publisher.program.as_deref().unwrap_or("none")
        )),
        Err(e) => Err(e.to_string()),
    }
}
