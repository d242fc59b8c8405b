//! Fixed-count time windows over a caption sequence.

use serde::Serialize;

use crate::types::CaptionSegment;

pub const DEFAULT_WINDOW_COUNT: usize = 5;

/// One non-empty slice of the timeline, `[start, start + width)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Window {
    /// 0-based window index; the published segment number is `index + 1`
    pub index: usize,
    pub start: f64,
    pub width: f64,
    pub text: String,
    pub caption_count: usize,
}

impl Window {
    pub fn end(&self) -> f64 {
        self.start + self.width
    }

    pub fn segment_number(&self) -> usize {
        self.index + 1
    }
}

/// Split `captions` into `window_count` equal windows spanning
/// `[0, last caption timestamp)` and return the non-empty ones.
///
/// The total duration is the timestamp of the last caption, so input is
/// expected to be ordered. A caption exactly at that timestamp falls outside
/// every window. Empty windows are omitted; callers key on
/// [`Window::index`], not on position.
pub fn split_windows(captions: &[CaptionSegment], window_count: usize) -> Vec<Window> {
    let Some(last) = captions.last() else {
        return Vec::new();
    };
    let total_duration = last.timestamp;
    if total_duration == 0.0 || window_count == 0 {
        return Vec::new();
    }

    let width = total_duration / window_count as f64;

    (0..window_count)
        .filter_map(|index| {
            let start = index as f64 * width;
            let end = (index + 1) as f64 * width;

            let texts: Vec<&str> = captions
                .iter()
                .filter(|c| start <= c.timestamp && c.timestamp < end)
                .map(|c| c.text.as_str())
                .collect();

            if texts.is_empty() {
                return None;
            }

            Some(Window {
                index,
                start,
                width,
                caption_count: texts.len(),
                text: texts.join(" "),
            })
        })
        .collect()
}

/// Join every caption's text with single spaces.
pub fn full_transcript(captions: &[CaptionSegment]) -> String {
    captions
        .iter()
        .map(|c| c.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
