//! Caption timestamp tokens (`[HH:]MM:SS[.mmm]`) to seconds.

/// Parse a `[HH:]MM:SS[.mmm]` token into seconds.
///
/// Returns `None` for anything that is not two or three colon-separated,
/// finite, non-negative numbers.
pub fn parse_timestamp(token: &str) -> Option<f64> {
    let parts: Vec<&str> = token.trim().split(':').collect();
    if !(2..=3).contains(&parts.len()) {
        return None;
    }

    let mut values = parts.iter().map(|p| parse_component(p));
    let (hours, minutes, seconds) = if parts.len() == 3 {
        (values.next()??, values.next()??, values.next()??)
    } else {
        (0.0, values.next()??, values.next()??)
    };

    Some(hours * 3600.0 + minutes * 60.0 + seconds)
}

/// Convert a timestamp token to seconds, falling back to `0.0` when it
/// cannot be parsed.
pub fn timestamp_to_seconds(token: &str) -> f64 {
    parse_timestamp(token).unwrap_or(0.0)
}

fn parse_component(part: &str) -> Option<f64> {
    let part = part.trim();
    // f64::from_str accepts "inf", "NaN" and exponents; timestamps are plain digits
    if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    part.parse::<f64>().ok().filter(|v| v.is_finite())
}
