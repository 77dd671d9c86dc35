//! Mermaid diagram rendering for threadsmith.
//!
//! Rendering is delegated to mermaid-cli (`mmdc`). The renderer locates the
//! executable on `PATH`, falling back to `npx -y @mermaid-js/mermaid-cli`,
//! writes the diagram source to a temporary `.mmd` file, and runs the tool
//! with a timeout.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use threadsmith_core::error::RenderError;
use threadsmith_core::renderer::{RenderRequest, Renderer};
use tokio::process::Command;
use tracing::{debug, info, warn};

pub const MMDC: &str = "mmdc";
pub const NPX_PACKAGE: &str = "@mermaid-js/mermaid-cli";

/// How to launch the renderer: a program plus arguments placed before the job's own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub prefix_args: Vec<String>,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>, prefix_args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            prefix_args,
        }
    }

    /// `mmdc` on PATH, else `npx -y @mermaid-js/mermaid-cli`, else nothing.
    pub fn locate() -> Option<Self> {
        if let Ok(mmdc) = which::which(MMDC) {
            return Some(Self::new(mmdc, vec![]));
        }

        which::which("npx")
            .ok()
            .map(|npx| Self::new(npx, vec!["-y".into(), NPX_PACKAGE.into()]))
    }
}

impl std::fmt::Display for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.prefix_args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

pub struct MermaidRenderer {
    invocation: Option<Invocation>,
    timeout: Duration,
}

impl MermaidRenderer {
    /// Locate mermaid-cli on this machine.
    pub fn new() -> Self {
        Self::from_invocation(Invocation::locate())
    }

    pub fn from_invocation(invocation: Option<Invocation>) -> Self {
        Self {
            invocation,
            timeout: Duration::from_secs(60),
        }
    }

    /// Use a specific executable instead of searching PATH.
    pub fn with_program(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self::from_invocation(Some(Invocation::new(program, args)))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn invocation(&self) -> Option<&Invocation> {
        self.invocation.as_ref()
    }

    pub fn is_available(&self) -> bool {
        self.invocation.is_some()
    }
}

impl Default for MermaidRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn job_args(request: &RenderRequest, input: &Path, output: &Path) -> Vec<String> {
    vec![
        "-i".into(),
        input.display().to_string(),
        "-o".into(),
        output.display().to_string(),
        "-t".into(),
        request.theme.to_string(),
        "-b".into(),
        request.background.clone(),
        "-w".into(),
        request.width.to_string(),
        "-s".into(),
        request.scale.to_string(),
    ]
}

#[async_trait]
impl Renderer for MermaidRenderer {
    fn name(&self) -> &str {
        "mermaid"
    }

    async fn render(&self, request: &RenderRequest) -> Result<PathBuf, RenderError> {
        if request.source.trim().is_empty() {
            return Err(RenderError::EmptySource);
        }

        let invocation = self.invocation.as_ref().ok_or_else(|| {
            RenderError::ToolNotFound(format!(
                "{MMDC} (install with: npm install -g {NPX_PACKAGE})"
            ))
        })?;

        let output = std::path::absolute(&request.output)?;
        if let Some(parent) = output.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Removed when dropped, on every return path.
        let mut source_file = tempfile::Builder::new().suffix(".mmd").tempfile()?;
        source_file.write_all(request.source.as_bytes())?;
        source_file.flush()?;

        let args = job_args(request, source_file.path(), &output);
        debug!(renderer = %invocation, output = %output.display(), "Rendering diagram");

        let run = Command::new(&invocation.program)
            .args(&invocation.prefix_args)
            .args(&args)
            .kill_on_drop(true)
            .output();

        let result = tokio::time::timeout(self.timeout, run)
            .await
            .map_err(|_| RenderError::Timeout(self.timeout.as_secs()))??;

        if !result.status.success() {
            let status = result.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&result.stderr).trim().to_string();
            warn!(exit_code = status, "Renderer failed");
            return Err(RenderError::Failed { status, stderr });
        }

        if !output.exists() {
            return Err(RenderError::OutputMissing(output));
        }

        info!(output = %output.display(), "Rendered diagram");
        Ok(output)
    }
}
