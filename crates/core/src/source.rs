//! Video metadata and caption markup via `yt-dlp`.

use serde_json::Value;
use tokio::process::Command;
use tracing::{debug, info};

use crate::{error::SourceError, types::VideoMetadata};

const YOUTUBE_DOMAINS: &[&str] = &["youtube.com", "youtu.be", "m.youtube.com"];
const PREFERRED_LANGUAGE: &str = "en";
const CAPTION_FORMAT: &str = "vtt";

#[derive(Debug, Clone, PartialEq)]
pub struct CaptionTrack {
    pub language: String,
    pub url: String,
    /// Auto-generated by YouTube rather than uploaded
    pub automatic: bool,
}

#[derive(Debug, Clone)]
pub struct VideoSource {
    pub metadata: VideoMetadata,
    pub track: Option<CaptionTrack>,
    /// Raw WebVTT markup of `track`; `None` when the video has no usable track
    pub markup: Option<String>,
}

pub fn is_youtube_url(url: &str) -> bool {
    let url = url.to_lowercase();
    YOUTUBE_DOMAINS.iter().any(|domain| url.contains(domain))
}

/// Fetch metadata and one caption track for a YouTube URL.
pub async fn fetch_video(url: &str) -> Result<VideoSource, SourceError> {
    if !is_youtube_url(url) {
        return Err(SourceError::InvalidUrl {
            url: url.to_string(),
        });
    }

    let video_info = dump_info(url).await?;
    let metadata = metadata_from_info(&video_info);
    let track = select_caption_track(&video_info);

    let markup = match &track {
        Some(track) => {
            info!(language = %track.language, automatic = track.automatic, "downloading caption track");
            let body = reqwest::get(&track.url)
                .await?
                .error_for_status()?
                .text()
                .await?;
            Some(body)
        }
        None => {
            debug!("video has no {} caption track", CAPTION_FORMAT);
            None
        }
    };

    Ok(VideoSource {
        metadata,
        track,
        markup,
    })
}

async fn dump_info(url: &str) -> Result<Value, SourceError> {
    let output = Command::new("yt-dlp")
        .arg(url)
        .arg("--dump-single-json")
        .arg("--skip-download")
        .arg("--no-warnings")
        .output()
        .await?;

    if !output.status.success() {
        return Err(SourceError::YtDlpFailed {
            url: url.to_string(),
            reason: String::from_utf8_lossy(&output.stderr).to_string(),
        });
    }

    Ok(serde_json::from_slice(&output.stdout)?)
}

/// Map yt-dlp's info JSON to [`VideoMetadata`], defaulting missing fields.
pub fn metadata_from_info(info: &Value) -> VideoMetadata {
    let text = |key: &str| info.get(key).and_then(Value::as_str).map(str::to_string);
    let number = |key: &str| info.get(key).and_then(Value::as_f64).unwrap_or(0.0).max(0.0) as u64;

    VideoMetadata {
        title: text("title").unwrap_or_else(|| "Unknown".to_string()),
        description: text("description").unwrap_or_default(),
        duration: number("duration"),
        views: number("view_count"),
        channel: text("uploader").unwrap_or_else(|| "Unknown".to_string()),
        upload_date: text("upload_date"),
        thumbnail_url: text("thumbnail"),
    }
}

/// Pick one WebVTT track: uploaded English, auto English, then the first
/// uploaded language, then the first automatic one.
pub fn select_caption_track(info: &Value) -> Option<CaptionTrack> {
    let uploaded = info.get("subtitles").and_then(Value::as_object);
    let automatic = info.get("automatic_captions").and_then(Value::as_object);

    let preferred = [(uploaded, false), (automatic, true)]
        .into_iter()
        .filter_map(|(tracks, auto)| {
            let formats = tracks?.get(PREFERRED_LANGUAGE)?;
            vtt_track(PREFERRED_LANGUAGE, formats, auto)
        })
        .next();

    preferred.or_else(|| {
        [(uploaded, false), (automatic, true)]
            .into_iter()
            .filter_map(|(tracks, auto)| {
                tracks?
                    .iter()
                    .find_map(|(lang, formats)| vtt_track(lang, formats, auto))
            })
            .next()
    })
}

fn vtt_track(language: &str, formats: &Value, automatic: bool) -> Option<CaptionTrack> {
    formats.as_array()?.iter().find_map(|format| {
        if format.get("ext").and_then(Value::as_str) != Some(CAPTION_FORMAT) {
            return None;
        }
        let url = format.get("url").and_then(Value::as_str)?;
        Some(CaptionTrack {
            language: language.to_string(),
            url: url.to_string(),
            automatic,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_youtube_url() {
        assert!(is_youtube_url("https://www.youtube.com/watch?v=abc"));
        assert!(is_youtube_url("https://YOUTU.BE/abc"));
        assert!(is_youtube_url("https://m.youtube.com/watch?v=abc"));
        assert!(!is_youtube_url("https://vimeo.com/123"));
    }

    #[test]
    fn test_metadata_defaults() {
        let meta = metadata_from_info(&json!({ "duration": 61.5, "view_count": 10 }));

        assert_eq!(meta.title, "Unknown");
        assert_eq!(meta.channel, "Unknown");
        assert_eq!(meta.description, "");
        assert_eq!(meta.duration, 61);
        assert_eq!(meta.views, 10);
        assert_eq!(meta.upload_date, None);
    }

    #[test]
    fn test_metadata_fields() {
        let meta = metadata_from_info(&json!({
            "title": "Rust in 100 seconds",
            "uploader": "Fireship",
            "upload_date": "20230101",
            "thumbnail": "https://i.ytimg.com/x.jpg"
        }));

        assert_eq!(meta.title, "Rust in 100 seconds");
        assert_eq!(meta.channel, "Fireship");
        assert_eq!(meta.upload_date.as_deref(), Some("20230101"));
        assert_eq!(meta.thumbnail_url.as_deref(), Some("https://i.ytimg.com/x.jpg"));
    }

    #[test]
    fn test_prefers_uploaded_english() {
        let info = json!({
            "subtitles": {
                "de": [{ "ext": "vtt", "url": "https://subs/de" }],
                "en": [{ "ext": "json3", "url": "https://subs/en.json" }, { "ext": "vtt", "url": "https://subs/en" }]
            },
            "automatic_captions": {
                "en": [{ "ext": "vtt", "url": "https://auto/en" }]
            }
        });

        let track = select_caption_track(&info).unwrap();
        assert_eq!(track.url, "https://subs/en");
        assert!(!track.automatic);
    }

    #[test]
    fn test_falls_back_to_automatic_english() {
        let info = json!({
            "subtitles": { "fr": [{ "ext": "vtt", "url": "https://subs/fr" }] },
            "automatic_captions": { "en": [{ "ext": "vtt", "url": "https://auto/en" }] }
        });

        let track = select_caption_track(&info).unwrap();
        assert_eq!(track.url, "https://auto/en");
        assert!(track.automatic);
    }

    #[test]
    fn test_falls_back_to_any_language() {
        let info = json!({
            "subtitles": {},
            "automatic_captions": { "es": [{ "ext": "srv3", "url": "x" }, { "ext": "vtt", "url": "https://auto/es" }] }
        });

        let track = select_caption_track(&info).unwrap();
        assert_eq!(track.language, "es");
        assert_eq!(track.url, "https://auto/es");
    }

    #[test]
    fn test_no_vtt_track() {
        let info = json!({ "subtitles": { "en": [{ "ext": "json3", "url": "x" }] } });
        assert_eq!(select_caption_track(&info), None);
        assert_eq!(select_caption_track(&json!({})), None);
    }
}
