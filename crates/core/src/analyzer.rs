//! One request's pipeline: captions, probe, summary, key points, windows.

use std::time::Instant;

use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use crate::{
    backend::Backend,
    captions::parse_captions,
    error::{AnalysisError, Result},
    prompt::{key_points_request, summary_request, window_request},
    response::{parse_key_points, parse_window_reply},
    segment::{DEFAULT_WINDOW_COUNT, split_windows},
    types::{CaptionSegment, KeyPoint, ResultBundle, TimestampedAnalysis},
};

/// Per-request inputs besides the caption markup.
#[derive(Debug, Clone)]
pub struct AnalysisContext {
    /// Video title for prompt context; may be empty
    pub title: String,
    pub window_count: usize,
}

impl Default for AnalysisContext {
    fn default() -> Self {
        Self {
            title: String::new(),
            window_count: DEFAULT_WINDOW_COUNT,
        }
    }
}

impl AnalysisContext {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

pub struct Analyzer<B> {
    backend: B,
}

impl<B: Backend> Analyzer<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Parse `markup` and run the full analysis.
    ///
    /// Fails only when no captions were found or the backend is down; every
    /// later backend failure leaves its field empty.
    pub async fn analyze(&self, markup: &str, ctx: &AnalysisContext) -> Result<ResultBundle> {
        let started = Instant::now();
        let captions = parse_captions(markup);
        self.run(captions, ctx, started).await
    }

    /// Same as [`Analyzer::analyze`] for captions that are already parsed.
    pub async fn analyze_captions(
        &self,
        captions: Vec<CaptionSegment>,
        ctx: &AnalysisContext,
    ) -> Result<ResultBundle> {
        self.run(captions, ctx, Instant::now()).await
    }

    async fn run(
        &self,
        captions: Vec<CaptionSegment>,
        ctx: &AnalysisContext,
        started: Instant,
    ) -> Result<ResultBundle> {
        let request_id = Uuid::new_v4();
        let span = info_span!("analyze", %request_id, captions = captions.len());

        async move {
            if captions.is_empty() {
                return Err(AnalysisError::NoCaptionsFound);
            }

            if !self.backend.is_available().await {
                return Err(AnalysisError::BackendUnavailable {
                    url: self.backend.endpoint(),
                });
            }

            let summary = self.summary(&captions, ctx).await;
            let key_points = self.key_points(&captions, ctx).await;
            let timestamped_analysis = self.windows(&captions, ctx).await;

            let processing_time = (started.elapsed().as_secs_f64() * 100.0).round() / 100.0;
            info!(
                has_summary = summary.is_some(),
                key_points = key_points.len(),
                windows = timestamped_analysis.len(),
                processing_time,
                "analysis finished"
            );

            Ok(ResultBundle {
                total_segments: captions.len(),
                captions,
                summary,
                key_points,
                timestamped_analysis,
                processing_time,
            })
        }
        .instrument(span)
        .await
    }

    async fn summary(&self, captions: &[CaptionSegment], ctx: &AnalysisContext) -> Option<String> {
        debug!("requesting summary");
        let request = summary_request(self.backend.model(), &ctx.title, captions);
        match self.backend.complete(&request).await {
            Ok(reply) if !reply.trim().is_empty() => Some(reply.trim().to_string()),
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "summary request failed");
                None
            }
        }
    }

    async fn key_points(&self, captions: &[CaptionSegment], ctx: &AnalysisContext) -> Vec<KeyPoint> {
        debug!("requesting key points");
        let request = key_points_request(self.backend.model(), &ctx.title, captions);
        match self.backend.complete(&request).await {
            Ok(reply) => parse_key_points(&reply),
            Err(e) => {
                warn!(error = %e, "key points request failed");
                Vec::new()
            }
        }
    }

    async fn windows(
        &self,
        captions: &[CaptionSegment],
        ctx: &AnalysisContext,
    ) -> Vec<TimestampedAnalysis> {
        let windows = split_windows(captions, ctx.window_count);
        debug!(windows = windows.len(), "requesting window analysis");

        let mut analysis = Vec::with_capacity(windows.len());
        for window in &windows {
            let request = window_request(self.backend.model(), &ctx.title, window, ctx.window_count);
            let reply = match self.backend.complete(&request).await {
                Ok(reply) => reply,
                Err(e) => {
                    warn!(
                        error = %e,
                        segment = window.segment_number(),
                        start = window.start,
                        end = window.end(),
                        "window request failed"
                    );
                    continue;
                }
            };

            match parse_window_reply(&reply).into_analysis(window) {
                Some(row) => analysis.push(row),
                None => debug!(segment = window.segment_number(), "window reply had no summary"),
            }
        }
        analysis
    }
}
