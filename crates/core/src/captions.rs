//! WebVTT-style caption markup parser.
//!
//! The markup is scanned once, line by line. Anything outside a cue block
//! (the `WEBVTT` header, `NOTE`/`STYLE` blocks, cue identifiers) never
//! contains a `-->` marker and is skipped while seeking the next cue.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::{timestamp::parse_timestamp, types::CaptionSegment};

const CUE_MARKER: &str = "-->";

static STYLING_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("styling tag pattern is valid"));

enum ScanState {
    SeekingCue,
    ReadingText { start: f64, lines: Vec<String> },
}

/// Remove inline `<...>` styling tags (`<c>`, `<i>`, `<00:00:01.000>`, ...)
/// and trim the result.
pub fn strip_tags(line: &str) -> String {
    STYLING_TAG.replace_all(line, "").trim().to_string()
}

/// Parse caption markup into segments, in source order.
///
/// Cues with an unparseable start timestamp are skipped, cues whose text is
/// empty after tag stripping are dropped. Markup without any cue yields an
/// empty vector.
pub fn parse_captions(markup: &str) -> Vec<CaptionSegment> {
    let mut segments = Vec::new();
    let mut state = ScanState::SeekingCue;
    let mut skipped = 0usize;

    for line in markup.lines() {
        let line = line.trim();

        state = match state {
            ScanState::SeekingCue => {
                if line.contains(CUE_MARKER) {
                    begin_cue(line, &mut skipped)
                } else {
                    ScanState::SeekingCue
                }
            }
            ScanState::ReadingText { start, mut lines } => {
                if line.is_empty() {
                    finish_cue(start, lines, &mut segments);
                    ScanState::SeekingCue
                } else if line.contains(CUE_MARKER) {
                    finish_cue(start, lines, &mut segments);
                    begin_cue(line, &mut skipped)
                } else {
                    let text = strip_tags(line);
                    if !text.is_empty() {
                        lines.push(text);
                    }
                    ScanState::ReadingText { start, lines }
                }
            }
        };
    }

    if let ScanState::ReadingText { start, lines } = state {
        finish_cue(start, lines, &mut segments);
    }

    if skipped > 0 {
        debug!(skipped, "skipped cues with malformed timestamps");
    }

    segments
}

fn begin_cue(line: &str, skipped: &mut usize) -> ScanState {
    let start_token = line.split(CUE_MARKER).next().unwrap_or_default();
    match parse_timestamp(start_token) {
        Some(start) => ScanState::ReadingText {
            start,
            lines: Vec::new(),
        },
        None => {
            *skipped += 1;
            ScanState::SeekingCue
        }
    }
}

fn finish_cue(start: f64, lines: Vec<String>, segments: &mut Vec<CaptionSegment>) {
    let text = lines.join(" ");
    if !text.is_empty() {
        segments.push(CaptionSegment::new(start, text));
    }
}
