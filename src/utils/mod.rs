use anyhow::Result;
use url::Url;

/// Resolve a bare video id or a watch / short / embed URL to the video id
pub fn extract_video_id(input: &str) -> Result<String> {
    let input = input.trim();

    if is_video_id(input) {
        return Ok(input.to_string());
    }

    let with_scheme = if input.starts_with("http://") || input.starts_with("https://") {
        input.to_string()
    } else {
        format!("https://{}", input)
    };

    let parsed = Url::parse(&with_scheme)
        .map_err(|_| anyhow::anyhow!("Invalid video id or URL: {}", input))?;

    let host = parsed.host_str().unwrap_or_default();
    let candidate = if host == "youtu.be" {
        parsed.path_segments().and_then(|mut s| s.next()).map(str::to_string)
    } else if host == "youtube.com" || host.ends_with(".youtube.com") {
        parsed
            .query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.into_owned())
            .or_else(|| {
                let segments: Vec<&str> = parsed.path_segments()?.collect();
                match segments.as_slice() {
                    ["embed" | "shorts" | "live" | "v", id, ..] => Some(id.to_string()),
                    _ => None,
                }
            })
    } else {
        None
    };

    candidate
        .filter(|id| is_video_id(id))
        .ok_or_else(|| anyhow::anyhow!("Invalid video id or URL: {}", input))
}

/// Video ids are 11 characters from the URL-safe base64 alphabet
fn is_video_id(s: &str) -> bool {
    s.len() == 11
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Split a comma separated language list, dropping blanks
pub fn parse_language_codes(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::to_string)
        .collect()
}

/// Format seconds as `HH:MM:SS,mmm`
pub fn format_srt_timestamp(seconds: f64) -> String {
    let total_ms = (seconds.max(0.0) * 1000.0).round() as u64;

    let milli = total_ms % 1000;
    let total_seconds = total_ms / 1000;
    let sec = total_seconds % 60;
    let min = (total_seconds / 60) % 60;
    let hour = total_seconds / 3600;

    format!("{hour:02}:{min:02}:{sec:02},{milli:03}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_video_id() {
        assert_eq!(extract_video_id("dQw4w9WgXcQ").unwrap(), "dQw4w9WgXcQ");
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42").unwrap(),
            "dQw4w9WgXcQ"
        );
        assert_eq!(extract_video_id("youtu.be/dQw4w9WgXcQ").unwrap(), "dQw4w9WgXcQ");
        assert_eq!(
            extract_video_id("https://m.youtube.com/embed/dQw4w9WgXcQ").unwrap(),
            "dQw4w9WgXcQ"
        );
        assert!(extract_video_id("https://example.com/watch?v=dQw4w9WgXcQ").is_err());
        assert!(extract_video_id("short").is_err());
    }

    #[test]
    fn test_parse_language_codes() {
        assert_eq!(parse_language_codes("en"), vec!["en"]);
        assert_eq!(parse_language_codes(" de, en ,,fr"), vec!["de", "en", "fr"]);
        assert!(parse_language_codes(" , ").is_empty());
    }

    #[test]
    fn test_format_srt_timestamp() {
        assert_eq!(format_srt_timestamp(0.0), "00:00:00,000");
        assert_eq!(format_srt_timestamp(1.5), "00:00:01,500");
        assert_eq!(format_srt_timestamp(3.3), "00:00:03,300");
        assert_eq!(format_srt_timestamp(3725.25), "01:02:05,250");
        assert_eq!(format_srt_timestamp(-2.0), "00:00:00,000");
    }
}
