//! Renderer trait: turns diagram source text into an image file.

use std::path::PathBuf;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::RenderError;

pub const DEFAULT_BACKGROUND: &str = "white";
pub const DEFAULT_WIDTH: u32 = 1200;
pub const DEFAULT_SCALE: u32 = 2;

/// Built-in diagram themes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Default,
    Forest,
    Dark,
    Neutral,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Forest => "forest",
            Self::Dark => "dark",
            Self::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Self::Default),
            "forest" => Ok(Self::Forest),
            "dark" => Ok(Self::Dark),
            "neutral" => Ok(Self::Neutral),
            other => Err(format!(
                "unknown theme '{other}' (expected default, forest, dark, or neutral)"
            )),
        }
    }
}

/// A single render job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    /// Diagram source text
    pub source: String,
    /// Where the image should be written
    pub output: PathBuf,
    pub theme: Theme,
    /// Background color name or `transparent`
    pub background: String,
    /// Image width in pixels
    pub width: u32,
    /// Device scale factor
    pub scale: u32,
}

impl RenderRequest {
    pub fn new(source: impl Into<String>, output: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            output: output.into(),
            theme: Theme::default(),
            background: DEFAULT_BACKGROUND.into(),
            width: DEFAULT_WIDTH,
            scale: DEFAULT_SCALE,
        }
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_background(mut self, background: impl Into<String>) -> Self {
        self.background = background.into();
        self
    }

    pub fn with_width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = scale;
        self
    }
}

/// The core Renderer trait.
#[async_trait]
pub trait Renderer: Send + Sync {
    fn name(&self) -> &str;

    /// Render the request and return the absolute path of the written image.
    async fn render(&self, request: &RenderRequest) -> std::result::Result<PathBuf, RenderError>;
}
