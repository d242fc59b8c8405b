//! vidsight core library
//!
//! Turns a video's subtitle markup into timestamp-anchored analysis: caption
//! parsing, fixed-width time windows, prompt building, and fail-soft parsing
//! of the text-generation backend's replies.

pub mod analyzer;
pub mod backend;
pub mod captions;
pub mod error;
pub mod format;
pub mod prompt;
pub mod provider;
pub mod response;
pub mod segment;
pub mod source;
pub mod timestamp;
pub mod types;

// Re-export commonly used items at crate root
pub use analyzer::{AnalysisContext, Analyzer};
pub use backend::{Backend, ChatBackend};
pub use captions::{parse_captions, strip_tags};
pub use error::{AnalysisError, BackendError, Result, SourceError};
pub use format::{format_bundle_readable, format_timestamp};
pub use prompt::{ChatMessage, ChatRequest};
pub use provider::{BackendConfig, Provider, ProviderConfig, ProviderError};
pub use response::{parse_key_points, parse_window_reply};
pub use segment::{Window, split_windows};
pub use source::{VideoSource, fetch_video, is_youtube_url};
pub use timestamp::{parse_timestamp, timestamp_to_seconds};
pub use types::{CaptionSegment, KeyPoint, ResultBundle, TimestampedAnalysis, VideoMetadata};
