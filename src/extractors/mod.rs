//! Extraction of structured data from the video watch page.

pub mod captions;
pub mod consent;

pub use captions::extract_captions_renderer;
pub use consent::{is_consent_page, resolve_consent, ConsentDecision};
