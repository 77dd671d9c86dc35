//! Error types for the threadsmith domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use std::path::PathBuf;

use thiserror::Error;

use crate::publisher::PostId;

/// The top-level error type for all threadsmith operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Segmentation errors ---
    #[error("Segmentation error: {0}")]
    Segment(#[from] SegmentError),

    // --- Publishing errors ---
    #[error("Publish error: {0}")]
    Publish(#[from] PublishError),

    // --- Rendering errors ---
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    // --- Credential errors ---
    #[error("Credential error: {0}")]
    Credential(#[from] CredentialError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SegmentError {
    #[error("Text is empty or whitespace-only")]
    EmptyInput,

    #[error("Unit limit {limit} must be greater than the reserve width {reserve}")]
    InvalidLimit { limit: usize, reserve: usize },

    #[error("Unit limit {limit} leaves no room for a {total}-part thread")]
    LimitTooSmall { limit: usize, total: usize },
}

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Publisher not configured: {0}")]
    NotConfigured(String),

    #[error("Post rejected: {0}")]
    Rejected(String),

    #[error(
        "Thread interrupted at post {position} after {} post(s) went live: {reason}",
        .published.len()
    )]
    Partial {
        published: Vec<PostId>,
        position: usize,
        reason: String,
    },

    #[error("Publisher process failed: {0}")]
    Process(String),

    #[error("Invalid publisher response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Diagram source is empty")]
    EmptySource,

    #[error("Renderer executable not found: {0}")]
    ToolNotFound(String),

    #[error("Renderer exited with status {status}: {stderr}")]
    Failed { status: i32, stderr: String },

    #[error("Renderer produced no output at {}", .0.display())]
    OutputMissing(PathBuf),

    #[error("Renderer timed out after {0}s")]
    Timeout(u64),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error("Missing credentials: {}", .0.join(", "))]
    Missing(Vec<&'static str>),
}
