use serde::{Deserialize, Serialize};

/// Informational duration assigned to every parsed caption.
pub const DEFAULT_CAPTION_DURATION: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionSegment {
    /// Start time in seconds
    pub timestamp: f64,
    pub text: String,
    pub duration: f64,
}

impl CaptionSegment {
    pub fn new(timestamp: f64, text: impl Into<String>) -> Self {
        Self {
            timestamp,
            text: text.into(),
            duration: DEFAULT_CAPTION_DURATION,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyPoint {
    pub point: String,
    pub timestamp: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimestampedAnalysis {
    /// 1-based window number; gaps mean the window had no captions or no usable reply
    pub segment_number: usize,
    pub start_timestamp: f64,
    pub duration: f64,
    pub summary: String,
    pub insights: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultBundle {
    pub captions: Vec<CaptionSegment>,
    pub summary: Option<String>,
    pub key_points: Vec<KeyPoint>,
    pub timestamped_analysis: Vec<TimestampedAnalysis>,
    pub total_segments: usize,
    /// Wall-clock seconds, rounded to two decimals
    pub processing_time: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub title: String,
    pub description: String,
    pub duration: u64,
    pub views: u64,
    pub channel: String,
    pub upload_date: Option<String>,
    pub thumbnail_url: Option<String>,
}
