use serde_json::{Deserializer, Value};

use crate::error::{Result, TranscriptError};

/// Key that introduces the captions object inside the player response
pub const CAPTIONS_MARKER: &str = r#""captions":"#;

/// Key that follows the captions object in the player response
pub const VIDEO_DETAILS_MARKER: &str = r#","videoDetails"#;

/// Present when the platform answers with a bot check
pub const RECAPTCHA_MARKER: &str = r#"class="g-recaptcha""#;

/// Present on every page that carries player data
pub const PLAYABILITY_MARKER: &str = r#""playabilityStatus":"#;

/// Locate the caption track list renderer embedded in a watch page.
///
/// The returned value is the `playerCaptionsTracklistRenderer` object and is
/// guaranteed to contain a `captionTracks` key.
pub fn extract_captions_renderer(html: &str, video_id: &str) -> Result<Value> {
    let Some(start) = html.find(CAPTIONS_MARKER) else {
        return Err(classify_missing_captions(html, video_id));
    };

    let tail = &html[start + CAPTIONS_MARKER.len()..];
    let mut captions = decode_captions_object(tail, video_id)?;

    let renderer = match captions.get_mut("playerCaptionsTracklistRenderer") {
        Some(renderer) if renderer.is_object() => renderer.take(),
        _ => {
            tracing::debug!("Captions object has no track list renderer");
            return Err(TranscriptError::transcripts_disabled(video_id));
        }
    };

    if renderer.get("captionTracks").is_none() {
        tracing::debug!("Track list renderer has no captionTracks");
        return Err(TranscriptError::no_transcript_available(video_id));
    }

    Ok(renderer)
}

fn classify_missing_captions(html: &str, video_id: &str) -> TranscriptError {
    if html.contains(RECAPTCHA_MARKER) {
        tracing::debug!("Bot check served for video {}", video_id);
        return TranscriptError::too_many_requests(video_id);
    }

    if !html.contains(PLAYABILITY_MARKER) {
        return TranscriptError::video_unavailable(video_id);
    }

    TranscriptError::transcripts_disabled(video_id)
}

/// Decode the JSON value that starts at the beginning of `tail`.
///
/// The streaming decoder stops at the value's closing brace and is used
/// first; cutting at the next `,"videoDetails` key is the fallback.
fn decode_captions_object(tail: &str, video_id: &str) -> Result<Value> {
    let streamed = Deserializer::from_str(tail).into_iter::<Value>().next();

    let streamed_err = match streamed {
        Some(Ok(value)) => return Ok(value),
        Some(Err(e)) => e.to_string(),
        None => "no JSON value after captions marker".to_string(),
    };

    tracing::debug!(
        "Streaming decode of captions failed ({}), trying videoDetails window",
        streamed_err
    );

    let window = tail
        .split_once(VIDEO_DETAILS_MARKER)
        .map(|(head, _)| head)
        .unwrap_or(tail);

    serde_json::from_str(window).map_err(|e| {
        TranscriptError::request_failed(video_id, format!("unparsable captions JSON: {}", e))
    })
}
