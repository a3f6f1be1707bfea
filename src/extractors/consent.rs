use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{Result, TranscriptError};

lazy_static! {
    /// Hidden `v` field of the consent form carrying the consent token
    static ref CONSENT_TOKEN_RE: Regex = Regex::new(r#"name="v" value="(.*?)""#).unwrap();
}

/// Form action present only on the consent interstitial
pub const CONSENT_FORM_MARKER: &str = r#"action="https://consent.youtube.com/s""#;

/// Origin the consent cookie is installed for
pub const CONSENT_COOKIE_URL: &str = "https://www.youtube.com";

/// What to do with a freshly fetched watch page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsentDecision {
    /// Real content; use it as is
    PassThrough,
    /// Consent interstitial; install the cookie and fetch the page again
    Retry { cookie: String },
}

pub fn is_consent_page(html: &str) -> bool {
    html.contains(CONSENT_FORM_MARKER)
}

/// Decide whether `html` is the consent interstitial and, if so, derive the
/// `CONSENT` cookie from its hidden `v` field.
pub fn resolve_consent(html: &str, video_id: &str) -> Result<ConsentDecision> {
    if !is_consent_page(html) {
        return Ok(ConsentDecision::PassThrough);
    }

    tracing::debug!("Consent interstitial served for video {}", video_id);

    let token = CONSENT_TOKEN_RE
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| TranscriptError::consent_token_missing(video_id))?;

    Ok(ConsentDecision::Retry {
        cookie: consent_cookie(token),
    })
}

fn consent_cookie(token: &str) -> String {
    format!("CONSENT=YES+{}; Domain=.youtube.com; Path=/", token)
}
