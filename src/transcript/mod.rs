use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Result, TranscriptError};

pub mod decoder;

/// One timed caption segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub text: String,

    /// Start time in seconds
    pub start: f64,

    /// Duration in seconds
    pub duration: f64,
}

impl TranscriptEntry {
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// A language a transcript can be machine-translated into
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationLanguage {
    /// Display name
    pub language: String,
    pub language_code: String,
}

/// One caption track of a video.
///
/// Entries are absent until [`Transcript::fetch`] has downloaded and decoded
/// the track.
#[derive(Debug, Clone)]
pub struct Transcript {
    pub video_id: String,

    /// Display name of the track language
    pub language: String,
    pub language_code: String,

    /// True for automatic speech recognition tracks
    pub is_generated: bool,
    pub translation_languages: Vec<TranslationLanguage>,
    entries: Option<Vec<TranscriptEntry>>,
    source_url: String,
}

impl Transcript {
    pub fn new(
        video_id: impl Into<String>,
        language: impl Into<String>,
        language_code: impl Into<String>,
        is_generated: bool,
        source_url: impl Into<String>,
    ) -> Self {
        Self {
            video_id: video_id.into(),
            language: language.into(),
            language_code: language_code.into(),
            is_generated,
            translation_languages: Vec::new(),
            entries: None,
            source_url: source_url.into(),
        }
    }

    /// Decoded entries; empty while the transcript is unfetched
    pub fn entries(&self) -> &[TranscriptEntry] {
        self.entries.as_deref().unwrap_or_default()
    }

    /// True once a payload has been decoded, even one with no segments
    pub fn is_fetched(&self) -> bool {
        self.entries.is_some()
    }

    /// Location of the timed-text payload
    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    #[cfg(test)]
    pub(crate) fn set_entries_for_test(&mut self, entries: Vec<TranscriptEntry>) {
        self.entries = Some(entries);
    }
}

/// All caption tracks discovered for one video
#[derive(Debug, Clone)]
pub struct TranscriptCatalog {
    pub video_id: String,
    pub manually_created: BTreeMap<String, Transcript>,
    pub generated: BTreeMap<String, Transcript>,
    pub translation_languages: Vec<TranslationLanguage>,
}

#[derive(Debug, Clone, Copy)]
enum TrackKind {
    Manual,
    Generated,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCaptionTrack {
    base_url: String,
    name: RawText,
    language_code: String,
    #[serde(default)]
    kind: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTranslationLanguage {
    language_name: RawText,
    language_code: String,
}

/// Display text, either `{"simpleText": ..}` or `{"runs": [{"text": ..}]}`
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawText {
    #[serde(default)]
    simple_text: Option<String>,
    #[serde(default)]
    runs: Vec<RawRun>,
}

#[derive(Deserialize)]
struct RawRun {
    text: String,
}

impl RawText {
    fn into_text(self) -> Option<String> {
        self.simple_text
            .or_else(|| self.runs.into_iter().next().map(|run| run.text))
    }
}

impl TranscriptCatalog {
    /// Build the catalog from a `playerCaptionsTracklistRenderer` object.
    ///
    /// Translation languages are best effort; every caption track must be
    /// well formed or the whole catalog is rejected.
    pub fn from_renderer(video_id: &str, renderer: &Value) -> Result<Self> {
        let translation_languages = parse_translation_languages(video_id, renderer);

        let tracks = renderer
            .get("captionTracks")
            .and_then(Value::as_array)
            .ok_or_else(|| TranscriptError::no_transcript_available(video_id))?;

        if tracks.is_empty() {
            return Err(TranscriptError::no_transcript_available(video_id));
        }

        let mut manually_created = BTreeMap::new();
        let mut generated = BTreeMap::new();

        for (index, track) in tracks.iter().enumerate() {
            let raw: RawCaptionTrack = RawCaptionTrack::deserialize(track).map_err(|e| {
                TranscriptError::request_failed(
                    video_id,
                    format!("malformed caption track #{}: {}", index, e),
                )
            })?;

            let language = raw.name.into_text().ok_or_else(|| {
                TranscriptError::request_failed(
                    video_id,
                    format!("caption track #{} has no display name", index),
                )
            })?;

            let is_generated = raw.kind.as_deref() == Some("asr");
            let mut transcript = Transcript::new(
                video_id,
                language,
                raw.language_code.clone(),
                is_generated,
                raw.base_url,
            );
            transcript.translation_languages = translation_languages.clone();

            let target = if is_generated {
                &mut generated
            } else {
                &mut manually_created
            };
            target.insert(raw.language_code, transcript);
        }

        tracing::debug!(
            "Catalog for {}: {} manual, {} generated, {} translation languages",
            video_id,
            manually_created.len(),
            generated.len(),
            translation_languages.len()
        );

        Ok(Self {
            video_id: video_id.to_string(),
            manually_created,
            generated,
            translation_languages,
        })
    }

    /// First track matching the preference list, manual tracks before
    /// generated ones for the same language
    pub fn find_transcript<S: AsRef<str>>(&self, language_codes: &[S]) -> Result<&Transcript> {
        self.find_in(language_codes, &[TrackKind::Manual, TrackKind::Generated])
    }

    pub fn find_manually_created<S: AsRef<str>>(
        &self,
        language_codes: &[S],
    ) -> Result<&Transcript> {
        self.find_in(language_codes, &[TrackKind::Manual])
    }

    pub fn find_generated<S: AsRef<str>>(&self, language_codes: &[S]) -> Result<&Transcript> {
        self.find_in(language_codes, &[TrackKind::Generated])
    }

    /// Like [`find_transcript`](Self::find_transcript), but hands out the
    /// catalog's own track so fetching it fills the catalog in place.
    pub fn find_transcript_mut<S: AsRef<str>>(
        &mut self,
        language_codes: &[S],
    ) -> Result<&mut Transcript> {
        self.find_in_mut(language_codes, &[TrackKind::Manual, TrackKind::Generated])
    }

    pub fn find_manually_created_mut<S: AsRef<str>>(
        &mut self,
        language_codes: &[S],
    ) -> Result<&mut Transcript> {
        self.find_in_mut(language_codes, &[TrackKind::Manual])
    }

    pub fn find_generated_mut<S: AsRef<str>>(
        &mut self,
        language_codes: &[S],
    ) -> Result<&mut Transcript> {
        self.find_in_mut(language_codes, &[TrackKind::Generated])
    }

    fn tracks(&self, kind: TrackKind) -> &BTreeMap<String, Transcript> {
        match kind {
            TrackKind::Manual => &self.manually_created,
            TrackKind::Generated => &self.generated,
        }
    }

    /// Kind and code of the first requested language that has a track
    fn locate<'c, S: AsRef<str>>(
        &self,
        language_codes: &'c [S],
        kinds: &[TrackKind],
    ) -> Result<(TrackKind, &'c str)> {
        language_codes
            .iter()
            .find_map(|code| {
                let code = code.as_ref();
                kinds
                    .iter()
                    .copied()
                    .find(|kind| self.tracks(*kind).contains_key(code))
                    .map(|kind| (kind, code))
            })
            .ok_or_else(|| TranscriptError::no_transcript_found(&self.video_id, language_codes))
    }

    fn find_in<S: AsRef<str>>(
        &self,
        language_codes: &[S],
        kinds: &[TrackKind],
    ) -> Result<&Transcript> {
        let (kind, code) = self.locate(language_codes, kinds)?;
        self.tracks(kind)
            .get(code)
            .ok_or_else(|| TranscriptError::no_transcript_found(&self.video_id, language_codes))
    }

    fn find_in_mut<S: AsRef<str>>(
        &mut self,
        language_codes: &[S],
        kinds: &[TrackKind],
    ) -> Result<&mut Transcript> {
        let (kind, code) = self.locate(language_codes, kinds)?;
        let tracks = match kind {
            TrackKind::Manual => &mut self.manually_created,
            TrackKind::Generated => &mut self.generated,
        };
        tracks
            .get_mut(code)
            .ok_or_else(|| TranscriptError::no_transcript_found(&self.video_id, language_codes))
    }

    /// Manual tracks followed by generated tracks
    pub fn transcripts(&self) -> impl Iterator<Item = &Transcript> {
        self.manually_created.values().chain(self.generated.values())
    }
}

fn parse_translation_languages(video_id: &str, renderer: &Value) -> Vec<TranslationLanguage> {
    let Some(entries) = renderer.get("translationLanguages").and_then(Value::as_array) else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| {
            let parsed = RawTranslationLanguage::deserialize(entry)
                .ok()
                .and_then(|raw| {
                    let language = raw.language_name.into_text()?;
                    Some(TranslationLanguage {
                        language,
                        language_code: raw.language_code,
                    })
                });
            if parsed.is_none() {
                tracing::warn!("Skipping malformed translation language for {}", video_id);
            }
            parsed
        })
        .collect()
}

impl fmt::Display for TranscriptCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "For this video ({}) transcripts are available in the following languages:",
            self.video_id
        )?;

        writeln!(f, "\n(MANUALLY CREATED)")?;
        write_tracks(f, &self.manually_created)?;

        writeln!(f, "\n(GENERATED)")?;
        write_tracks(f, &self.generated)?;

        writeln!(f, "\n(TRANSLATION LANGUAGES)")?;
        if self.translation_languages.is_empty() {
            writeln!(f, "None")?;
        }
        for lang in &self.translation_languages {
            writeln!(f, " - {} (\"{}\")", lang.language_code, lang.language)?;
        }
        Ok(())
    }
}

fn write_tracks(f: &mut fmt::Formatter<'_>, tracks: &BTreeMap<String, Transcript>) -> fmt::Result {
    if tracks.is_empty() {
        return writeln!(f, "None");
    }
    for (code, transcript) in tracks {
        writeln!(f, " - {} (\"{}\")", code, transcript.language)?;
    }
    Ok(())
}
