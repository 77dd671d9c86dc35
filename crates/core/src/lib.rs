//! # threadsmith core
//!
//! Thread segmentation, preview formatting, and the domain traits every other
//! threadsmith crate implements against. Nothing in this crate performs I/O.
//!
//! The [`segmenter`] is the heart of the workspace: a pure function from text
//! to an ordered, numbered thread of bounded-length chunks. Publishing,
//! rendering, and credential handling are modeled as traits here and
//! implemented in their own crates.

pub mod credentials;
pub mod error;
pub mod preview;
pub mod publisher;
pub mod renderer;
pub mod segmenter;

// Re-export key types at crate root for ergonomics
pub use credentials::{CredentialSource, Credentials};
pub use error::{CredentialError, Error, PublishError, RenderError, Result, SegmentError};
pub use preview::{ChunkStats, format_preview, preview_stats};
pub use publisher::{PostId, PublishReceipt, Published, Publisher, ThreadReceipt};
pub use renderer::{RenderRequest, Renderer, Theme};
pub use segmenter::{DEFAULT_MAX_UNIT_LENGTH, DEFAULT_RESERVE_WIDTH, Segmenter, char_len, segment};
