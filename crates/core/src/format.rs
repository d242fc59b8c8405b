use crate::types::{ResultBundle, VideoMetadata};

/// Format seconds as MM:SS, or H:MM:SS from one hour on
pub fn format_timestamp(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let (hours, mins, secs) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, mins, secs)
    } else {
        format!("{:02}:{:02}", mins, secs)
    }
}

/// Format an analysis bundle as human-readable markdown
pub fn format_bundle_readable(bundle: &ResultBundle, metadata: Option<&VideoMetadata>) -> String {
    let mut output = String::new();

    if let Some(meta) = metadata {
        output.push_str(&format!("# {}\n\n", meta.title));
        output.push_str(&format!(
            "**Channel:** {} | **Duration:** {} | **Views:** {}\n\n",
            meta.channel,
            format_timestamp(meta.duration as f64),
            meta.views
        ));
    }

    output.push_str(&format!(
        "**Captions:** {} | **Processing time:** {:.2}s\n\n",
        bundle.total_segments, bundle.processing_time
    ));

    output.push_str("## Summary\n\n");
    match &bundle.summary {
        Some(summary) => output.push_str(summary),
        None => output.push_str("_No summary available._"),
    }
    output.push_str("\n\n");

    if !bundle.key_points.is_empty() {
        output.push_str("## Key Points\n\n");
        for (i, point) in bundle.key_points.iter().enumerate() {
            output.push_str(&format!("{}. {}\n", i + 1, point.point));
        }
        output.push('\n');
    }

    if !bundle.timestamped_analysis.is_empty() {
        output.push_str("## Segments\n\n");
        for segment in &bundle.timestamped_analysis {
            let start = format_timestamp(segment.start_timestamp);
            let end = format_timestamp(segment.start_timestamp + segment.duration);
            output.push_str(&format!(
                "### [{}–{}] Part {}\n\n",
                start, end, segment.segment_number
            ));
            output.push_str(&format!("{}\n\n", segment.summary));
            for insight in &segment.insights {
                output.push_str(&format!("• {}\n", insight));
            }
            if !segment.insights.is_empty() {
                output.push('\n');
            }
        }
    }

    output
}
