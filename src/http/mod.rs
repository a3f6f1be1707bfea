//! HTTP access layer used by the transcript pipeline.
//!
//! Each [`HttpClient`] owns its own cookie jar, so the consent cookie installed
//! for one session never leaks into another client.

use async_trait::async_trait;
use reqwest::cookie::Jar;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};
use reqwest::{Client, Proxy};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::config::HttpConfig;

/// Status and body of a completed GET request
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport failures raised before a response body is available
#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// GET requests plus a cookie store, as needed by the pipeline
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpAccess: Send + Sync {
    /// Issue a GET request, following redirects, and read the whole body
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError>;

    /// Store a cookie (in `Set-Cookie` syntax) for requests to `url`
    fn set_cookie(&self, cookie: &str, url: &Url);
}

/// reqwest-backed [`HttpAccess`] with a session-scoped cookie jar
pub struct HttpClient {
    client: Client,
    jar: Arc<Jar>,
}

impl HttpClient {
    /// Build a client; the proxy variable named in `config` is read here, once
    pub fn new(config: &HttpConfig) -> Result<Self, TransportError> {
        let jar = Arc::new(Jar::default());

        let mut headers = HeaderMap::new();
        match HeaderValue::from_str(&config.accept_language) {
            Ok(value) => {
                headers.insert(ACCEPT_LANGUAGE, value);
            }
            Err(_) => tracing::warn!(
                "Ignoring invalid Accept-Language value: {}",
                config.accept_language
            ),
        }

        let mut builder = Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .default_headers(headers)
            .user_agent(config.user_agent.as_str());

        if config.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_secs));
        }

        if let Some(proxy) = proxy_from_env(&config.proxy_env) {
            builder = builder.proxy(proxy);
        }

        Ok(Self {
            client: builder.build()?,
            jar,
        })
    }
}

#[async_trait]
impl HttpAccess for HttpClient {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        tracing::debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        tracing::debug!("GET {} -> {} ({} bytes)", url, status, body.len());
        Ok(HttpResponse { status, body })
    }

    fn set_cookie(&self, cookie: &str, url: &Url) {
        tracing::debug!("Storing cookie for {}", url);
        self.jar.add_cookie_str(cookie, url);
    }
}

/// Proxy configured through the environment variable `var`, if any.
///
/// An unusable value is logged and ignored so the client still works.
pub fn proxy_from_env(var: &str) -> Option<Proxy> {
    let value = std::env::var(var).ok()?;
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Err(e) = Url::parse(value) {
        tracing::warn!("Ignoring proxy from {}: invalid URL {:?} ({})", var, value, e);
        return None;
    }

    match Proxy::all(value) {
        Ok(proxy) => {
            tracing::debug!("Routing requests through proxy from {}", var);
            Some(proxy)
        }
        Err(e) => {
            tracing::warn!("Ignoring proxy from {}: {}", var, e);
            None
        }
    }
}
