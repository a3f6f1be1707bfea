//! YouTube Transcript - retrieve YouTube transcripts without the official API
//!
//! The library reads a video's watch page, extracts the embedded caption track
//! catalog (passing the consent interstitial when one is served), selects a
//! track by language preference and decodes its timed-text payload.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod extractors;
pub mod http;
pub mod output;
pub mod transcript;
pub mod utils;

pub use api::TranscriptApi;
pub use cli::{Cli, OutputFormat};
pub use config::Config;
pub use error::{Result, TranscriptError};
pub use http::{HttpAccess, HttpClient, HttpResponse, TransportError};
pub use transcript::{Transcript, TranscriptCatalog, TranscriptEntry, TranslationLanguage};
