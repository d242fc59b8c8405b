//! Chat-completion requests for the three analysis kinds.
//!
//! Every request is one-shot: a single `user` message, no history.

use serde::{Deserialize, Serialize};

use crate::{segment::Window, types::CaptionSegment};

pub const SUMMARY_CHAR_LIMIT: usize = 8000;
pub const KEY_POINTS_CHAR_LIMIT: usize = 6000;
pub const WINDOW_CHAR_LIMIT: usize = 2000;

pub const TEMPERATURE: f64 = 0.7;
pub const MAX_TOKENS: u32 = 1000;
pub const TOP_P: f64 = 0.9;

const TRUNCATION_MARKER: &str = "...";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
    pub max_tokens: u32,
    pub top_p: f64,
}

impl ChatRequest {
    pub fn user(model: &str, prompt: String) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt,
            }],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            top_p: TOP_P,
        }
    }

    /// Content of the single user message.
    pub fn prompt(&self) -> &str {
        self.messages
            .first()
            .map(|m| m.content.as_str())
            .unwrap_or_default()
    }
}

/// Cut `text` to at most `limit` characters, appending `...` when cut.
pub fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((byte_idx, _)) => format!("{}{}", &text[..byte_idx], TRUNCATION_MARKER),
        None => text.to_string(),
    }
}

fn transcript(captions: &[CaptionSegment], limit: usize) -> String {
    truncate_chars(&crate::segment::full_transcript(captions), limit)
}

pub fn summary_request(model: &str, title: &str, captions: &[CaptionSegment]) -> ChatRequest {
    let content = transcript(captions, SUMMARY_CHAR_LIMIT);
    let prompt = format!(
        r#"You are a professional video content analyst. Generate a comprehensive summary of the following video content.

Video Title: {title}

Content:
{content}

Provide a clear, well-structured summary that:
1. Captures the main topic
2. Highlights key themes
3. Mentions important points
4. Is suitable for someone who hasn't watched the video

Summary:"#
    );
    ChatRequest::user(model, prompt)
}

pub fn key_points_request(model: &str, title: &str, captions: &[CaptionSegment]) -> ChatRequest {
    let content = transcript(captions, KEY_POINTS_CHAR_LIMIT);
    let prompt = format!(
        r#"You are a professional video content analyst. Extract the key points from the following video content.

Video Title: {title}

Content:
{content}

Extract 5-8 important key points. Format each point on a new line starting with a number and period (1. , 2. , etc.)

Key Points:"#
    );
    ChatRequest::user(model, prompt)
}

pub fn window_request(model: &str, title: &str, window: &Window, window_count: usize) -> ChatRequest {
    let content = truncate_chars(&window.text, WINDOW_CHAR_LIMIT);
    let part = window.segment_number();
    let prompt = format!(
        r#"You are a professional video content analyst. Analyze this segment of video content and provide a brief summary with key insights.

Video Title: {title}
Segment: Part {part} of {window_count}

Content:
{content}

Provide:
1. A brief 2-3 sentence summary of this segment
2. 2-3 key insights specific to this part

Format:
Summary: [your summary]
Insights: [bullet point list]"#
    );
    ChatRequest::user(model, prompt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("abcdef", 10), "abcdef");
        assert_eq!(truncate_chars("abcdef", 6), "abcdef");
        assert_eq!(truncate_chars("abcdef", 3), "abc...");
        // counts characters, not bytes
        assert_eq!(truncate_chars("привет", 2), "пр...");
    }

    #[test]
    fn test_summary_request_shape() {
        let captions = vec![CaptionSegment::new(0.0, "hello"), CaptionSegment::new(1.0, "world")];
        let req = summary_request("local-model", "My Video", &captions);

        assert_eq!(req.model, "local-model");
        assert_eq!(req.messages.len(), 1);
        assert_eq!(req.messages[0].role, "user");
        assert_eq!(req.temperature, 0.7);
        assert_eq!(req.max_tokens, 1000);
        assert_eq!(req.top_p, 0.9);
        assert!(req.prompt().contains("Video Title: My Video"));
        assert!(req.prompt().contains("hello world"));
    }

    #[test]
    fn test_summary_transcript_is_capped() {
        let long = "é".repeat(SUMMARY_CHAR_LIMIT + 1);
        let captions = vec![CaptionSegment::new(0.0, long)];
        let req = summary_request("m", "", &captions);

        let expected = format!("{}...", "é".repeat(SUMMARY_CHAR_LIMIT));
        assert!(req.prompt().contains(&expected));
        assert!(!req.prompt().contains(&"é".repeat(SUMMARY_CHAR_LIMIT + 1)));
    }

    #[test]
    fn test_key_points_transcript_is_capped() {
        let long = "x".repeat(KEY_POINTS_CHAR_LIMIT + 50);
        let captions = vec![CaptionSegment::new(0.0, long)];
        let req = key_points_request("m", "", &captions);

        let expected = format!("{}...", "x".repeat(KEY_POINTS_CHAR_LIMIT));
        assert!(req.prompt().contains(&expected));
        assert!(!req.prompt().contains(&"x".repeat(KEY_POINTS_CHAR_LIMIT + 1)));
        assert!(req.prompt().contains("1. , 2. , etc."));
    }

    #[test]
    fn test_window_request_labels_part() {
        let window = Window {
            index: 2,
            start: 40.0,
            width: 20.0,
            text: "y".repeat(WINDOW_CHAR_LIMIT + 1),
            caption_count: 1,
        };
        let req = window_request("m", "Title", &window, 5);

        assert!(req.prompt().contains("Segment: Part 3 of 5"));
        assert!(req.prompt().contains("Summary: [your summary]"));
        assert!(req.prompt().contains(&format!("{}...", "y".repeat(WINDOW_CHAR_LIMIT))));
    }

    #[test]
    fn test_request_serializes_to_chat_completion_body() {
        let req = ChatRequest::user("m", "hi".to_string());
        let body = serde_json::to_value(&req).unwrap();

        assert_eq!(body["model"], "m");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "hi");
        assert_eq!(body["max_tokens"], 1000);
    }
}
