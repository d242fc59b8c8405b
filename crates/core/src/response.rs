//! Line scanners for backend replies.
//!
//! Both grammars are fail-soft: lines that do not match are skipped and a
//! reply that ignores the requested format yields an empty result.

use crate::{
    segment::Window,
    types::{KeyPoint, TimestampedAnalysis},
};

pub const MAX_KEY_POINTS: usize = 8;
pub const MAX_INSIGHTS: usize = 3;

const SUMMARY_LABEL: &str = "Summary:";
const INSIGHTS_LABEL: &str = "Insights:";
/// `*` is left out: models use it for emphasis as often as for bullets.
const BULLET_MARKERS: &[char] = &['-', '•'];

/// Parse a numbered list (`1. text`) into at most [`MAX_KEY_POINTS`] points.
pub fn parse_key_points(reply: &str) -> Vec<KeyPoint> {
    reply
        .lines()
        .filter_map(numbered_item)
        .take(MAX_KEY_POINTS)
        .map(|point| KeyPoint {
            point: point.to_string(),
            timestamp: None,
        })
        .collect()
}

/// `"12. text"` -> `Some("text")`: digits, a period, whitespace, non-empty rest.
fn numbered_item(line: &str) -> Option<&str> {
    let line = line.trim();
    let rest = line.trim_start_matches(|c: char| c.is_ascii_digit());
    if rest.len() == line.len() {
        return None;
    }
    let rest = rest.strip_prefix('.')?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let text = rest.trim();
    (!text.is_empty()).then_some(text)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Summary,
    Insights,
}

/// Summary line and insight bullets extracted from a per-window reply.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowReply {
    pub summary: Option<String>,
    pub insights: Vec<String>,
}

impl WindowReply {
    /// Attach window timing. Replies without a summary produce no row.
    pub fn into_analysis(self, window: &Window) -> Option<TimestampedAnalysis> {
        let summary = self.summary?;
        Some(TimestampedAnalysis {
            segment_number: window.segment_number(),
            start_timestamp: window.start,
            duration: window.width,
            summary,
            insights: self.insights,
        })
    }
}

/// Scan a `Summary: ...` / `Insights:` + bullets reply.
pub fn parse_window_reply(reply: &str) -> WindowReply {
    let mut section = Section::None;
    let mut summary = String::new();
    let mut insights = Vec::new();

    for line in reply.lines() {
        let line = line.trim();

        if let Some(rest) = line.strip_prefix(SUMMARY_LABEL) {
            summary = rest.trim().to_string();
            section = Section::Summary;
        } else if line.starts_with(INSIGHTS_LABEL) {
            section = Section::Insights;
        } else if section == Section::Insights {
            if !line.starts_with(BULLET_MARKERS) {
                continue;
            }
            let insight = line
                .trim_start_matches(|c: char| BULLET_MARKERS.contains(&c) || c.is_whitespace())
                .trim_end();
            if !insight.is_empty() {
                insights.push(insight.to_string());
            }
        }
    }

    insights.truncate(MAX_INSIGHTS);

    WindowReply {
        summary: (!summary.is_empty()).then_some(summary),
        insights,
    }
}
