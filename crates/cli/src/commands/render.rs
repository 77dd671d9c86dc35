//! `threadsmith render`: Render a Mermaid diagram to an image.

use std::io::{IsTerminal, Read};
use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use threadsmith_config::RenderConfig;
use threadsmith_core::{RenderRequest, Renderer, Theme};
use threadsmith_render::MermaidRenderer;

use super::load_config;

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Read the diagram from a file
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Diagram source given inline
    #[arg(long, value_name = "CODE")]
    pub code: Option<String>,

    /// Output image path (.png, .svg, or .pdf)
    #[arg(short, long, value_name = "OUT")]
    pub output: PathBuf,

    /// default, forest, dark, or neutral
    #[arg(long)]
    pub theme: Option<Theme>,

    /// Background color
    #[arg(long = "bg", value_name = "COLOR")]
    pub background: Option<String>,

    #[arg(long)]
    pub width: Option<u32>,

    #[arg(long)]
    pub scale: Option<u32>,
}

impl RenderArgs {
    /// Build the request, falling back to configured defaults.
    fn request(&self, source: String, defaults: &RenderConfig) -> RenderRequest {
        RenderRequest::new(source, self.output.clone())
            .with_theme(self.theme.unwrap_or(defaults.theme))
            .with_background(
                self.background
                    .clone()
                    .unwrap_or_else(|| defaults.background.clone()),
            )
            .with_width(self.width.unwrap_or(defaults.width))
            .with_scale(self.scale.unwrap_or(defaults.scale))
    }

    /// `--code` first, then `-i FILE`, then piped stdin.
    fn read_source(&self) -> Result<String, Box<dyn std::error::Error>> {
        if let Some(code) = &self.code {
            return Ok(code.clone());
        }
        if let Some(path) = &self.input {
            return Ok(std::fs::read_to_string(path)
                .map_err(|e| format!("Failed to read {}: {e}", path.display()))?);
        }

        let stdin = std::io::stdin();
        if stdin.is_terminal() {
            return Err("No diagram source: pass --code, -i FILE, or pipe it on stdin".into());
        }
        let mut source = String::new();
        stdin.lock().read_to_string(&mut source)?;
        Ok(source)
    }
}

pub async fn run(args: RenderArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let source = args.read_source()?;

    let renderer = match &config.render.program {
        Some(program) => MermaidRenderer::with_program(program, vec![]),
        None => MermaidRenderer::new(),
    }
    .with_timeout(Duration::from_secs(config.render.timeout_secs));

    let path = renderer.render(&args.request(source, &config.render)).await?;
    println!("Rendered: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        render: RenderArgs,
    }

    #[test]
    fn inline_code_wins_over_file() {
        let h = Harness::parse_from([
            "render",
            "--code",
            "graph TD; A-->B",
            "-i",
            "/does/not/exist.mmd",
            "-o",
            "out.png",
        ]);
        assert_eq!(h.render.read_source().unwrap(), "graph TD; A-->B");
    }

    #[test]
    fn reads_input_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flow.mmd");
        std::fs::write(&path, "sequenceDiagram\n A->>B: hi").unwrap();

        let h = Harness::parse_from([
            "render",
            "-i",
            path.to_str().unwrap(),
            "-o",
            "out.svg",
        ]);
        assert_eq!(h.render.read_source().unwrap(), "sequenceDiagram\n A->>B: hi");
    }

    #[test]
    fn flags_override_config_defaults() {
        let h = Harness::parse_from([
            "render", "--code", "x", "-o", "o.png", "--theme", "dark", "--bg", "transparent",
        ]);
        let request = h.render.request("x".into(), &RenderConfig::default());

        assert_eq!(request.theme, Theme::Dark);
        assert_eq!(request.background, "transparent");
        assert_eq!(request.width, 1200);
        assert_eq!(request.scale, 2);
    }

    #[test]
    fn unknown_theme_is_rejected() {
        let parsed = Harness::try_parse_from(["render", "--code", "x", "-o", "o.png", "--theme", "neon"]);
        assert!(parsed.is_err());
    }
}
