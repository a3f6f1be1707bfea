/// Result type used by the transcript pipeline
pub type Result<T> = std::result::Result<T, TranscriptError>;

/// Failure kinds of the transcript pipeline.
///
/// Every variant carries the id of the video being processed so a failure can
/// be reported without extra context. The display form is uniform:
/// `Transcript error for video <id>: <message>`.
#[derive(thiserror::Error, Debug)]
pub enum TranscriptError {
    /// Transport failure, unexpected HTTP status, or page/XML content that
    /// could not be parsed.
    #[error("Transcript error for video {video_id}: YouTube request error: {reason}")]
    RequestFailed { video_id: String, reason: String },

    /// The platform served a bot check instead of the watch page.
    #[error("Transcript error for video {video_id}: Too many requests")]
    TooManyRequests { video_id: String },

    #[error("Transcript error for video {video_id}: Video unavailable")]
    VideoUnavailable { video_id: String },

    #[error("Transcript error for video {video_id}: Transcripts are disabled for this video")]
    TranscriptsDisabled { video_id: String },

    #[error("Transcript error for video {video_id}: No transcripts available for this video")]
    NoTranscriptAvailable { video_id: String },

    #[error("Transcript error for video {video_id}: Failed to create consent cookie")]
    ConsentTokenMissing { video_id: String },

    #[error(
        "Transcript error for video {video_id}: No transcript found for languages: {}",
        .requested.join(", ")
    )]
    NoTranscriptFound {
        video_id: String,
        requested: Vec<String>,
    },
}

impl TranscriptError {
    pub fn request_failed(video_id: &str, reason: impl std::fmt::Display) -> Self {
        Self::RequestFailed {
            video_id: video_id.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn too_many_requests(video_id: &str) -> Self {
        Self::TooManyRequests {
            video_id: video_id.to_string(),
        }
    }

    pub fn video_unavailable(video_id: &str) -> Self {
        Self::VideoUnavailable {
            video_id: video_id.to_string(),
        }
    }

    pub fn transcripts_disabled(video_id: &str) -> Self {
        Self::TranscriptsDisabled {
            video_id: video_id.to_string(),
        }
    }

    pub fn no_transcript_available(video_id: &str) -> Self {
        Self::NoTranscriptAvailable {
            video_id: video_id.to_string(),
        }
    }

    pub fn consent_token_missing(video_id: &str) -> Self {
        Self::ConsentTokenMissing {
            video_id: video_id.to_string(),
        }
    }

    pub fn no_transcript_found<S: AsRef<str>>(video_id: &str, requested: &[S]) -> Self {
        Self::NoTranscriptFound {
            video_id: video_id.to_string(),
            requested: requested.iter().map(|s| s.as_ref().to_string()).collect(),
        }
    }

    /// Id of the video the failure belongs to
    pub fn video_id(&self) -> &str {
        match self {
            Self::RequestFailed { video_id, .. }
            | Self::TooManyRequests { video_id }
            | Self::VideoUnavailable { video_id }
            | Self::TranscriptsDisabled { video_id }
            | Self::NoTranscriptAvailable { video_id }
            | Self::ConsentTokenMissing { video_id }
            | Self::NoTranscriptFound { video_id, .. } => video_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_uniform() {
        let err = TranscriptError::transcripts_disabled("abc123");
        assert_eq!(
            err.to_string(),
            "Transcript error for video abc123: Transcripts are disabled for this video"
        );

        let err = TranscriptError::request_failed("abc123", "connection reset");
        assert_eq!(
            err.to_string(),
            "Transcript error for video abc123: YouTube request error: connection reset"
        );
    }

    #[test]
    fn test_no_transcript_found_lists_requested_languages() {
        let err = TranscriptError::no_transcript_found("vid", &["de", "fr"]);
        assert_eq!(
            err.to_string(),
            "Transcript error for video vid: No transcript found for languages: de, fr"
        );
        match err {
            TranscriptError::NoTranscriptFound { requested, .. } => {
                assert_eq!(requested, vec!["de".to_string(), "fr".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_video_id_accessor() {
        let errors = [
            TranscriptError::too_many_requests("v1"),
            TranscriptError::video_unavailable("v1"),
            TranscriptError::no_transcript_available("v1"),
            TranscriptError::consent_token_missing("v1"),
            TranscriptError::no_transcript_found::<&str>("v1", &[]),
        ];
        for err in errors {
            assert_eq!(err.video_id(), "v1");
        }
    }
}
