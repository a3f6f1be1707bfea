use crate::config::HttpConfig;
use crate::error::{Result, TranscriptError};
use crate::extractors::{self, consent, ConsentDecision};
use crate::http::{HttpAccess, HttpClient};
use crate::transcript::{Transcript, TranscriptCatalog};

/// Watch page of a video, without the id
pub const WATCH_URL: &str = "https://www.youtube.com/watch?v=";

/// Entry point of the transcript pipeline.
///
/// Each instance owns its HTTP client and therefore its cookie jar; use one
/// instance per concurrent session.
pub struct TranscriptApi<H = HttpClient> {
    http: H,
}

impl TranscriptApi<HttpClient> {
    /// Create an API backed by a fresh reqwest client
    pub fn new(config: &HttpConfig) -> anyhow::Result<Self> {
        Ok(Self::with_http(HttpClient::new(config)?))
    }
}

impl<H: HttpAccess> TranscriptApi<H> {
    pub fn with_http(http: H) -> Self {
        Self { http }
    }

    /// Discover the caption tracks of a video
    pub async fn list_transcripts(&self, video_id: &str) -> Result<TranscriptCatalog> {
        tracing::info!("Listing transcripts for video {}", video_id);

        let html = self.fetch_video_html(video_id).await?;
        let renderer = extractors::extract_captions_renderer(&html, video_id)?;
        TranscriptCatalog::from_renderer(video_id, &renderer)
    }

    /// Fetch the first transcript matching `languages`, in preference order
    pub async fn get_transcript<S: AsRef<str>>(
        &self,
        video_id: &str,
        languages: &[S],
    ) -> Result<Transcript> {
        let mut catalog = self.list_transcripts(video_id).await?;
        let transcript = catalog.find_transcript_mut(languages)?;

        tracing::info!(
            "Selected {} transcript {:?} for video {}",
            if transcript.is_generated { "generated" } else { "manual" },
            transcript.language_code,
            video_id
        );

        transcript.fetch(&self.http).await?;
        Ok(transcript.clone())
    }

    /// Download and decode the entries of a catalog track in place, e.g. one
    /// returned by [`TranscriptCatalog::find_transcript_mut`]
    pub async fn fetch(&self, transcript: &mut Transcript) -> Result<()> {
        transcript.fetch(&self.http).await
    }

    /// Fetch the watch page, passing the consent interstitial at most once
    async fn fetch_video_html(&self, video_id: &str) -> Result<String> {
        let url = format!("{}{}", WATCH_URL, urlencoding::encode(video_id));

        let html = self.fetch_page(&url, video_id).await?;
        let cookie = match consent::resolve_consent(&html, video_id)? {
            ConsentDecision::PassThrough => return Ok(html),
            ConsentDecision::Retry { cookie } => cookie,
        };

        let consent_url = url::Url::parse(consent::CONSENT_COOKIE_URL)
            .map_err(|e| TranscriptError::request_failed(video_id, e))?;
        self.http.set_cookie(&cookie, &consent_url);
        tracing::info!("Consent cookie installed, fetching watch page again");

        let html = self.fetch_page(&url, video_id).await?;
        if consent::is_consent_page(&html) {
            return Err(TranscriptError::request_failed(
                video_id,
                "consent page served again after setting consent cookie",
            ));
        }

        Ok(html)
    }

    async fn fetch_page(&self, url: &str, video_id: &str) -> Result<String> {
        let response = self
            .http
            .get(url)
            .await
            .map_err(|e| TranscriptError::request_failed(video_id, e))?;

        match response.status {
            429 => Err(TranscriptError::too_many_requests(video_id)),
            _ if !response.is_success() => Err(TranscriptError::request_failed(
                video_id,
                format!("watch page returned HTTP {}", response.status),
            )),
            _ => Ok(response.body),
        }
    }
}
