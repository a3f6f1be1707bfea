use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::{Transcript, TranscriptEntry};
use crate::error::{Result, TranscriptError};
use crate::http::HttpAccess;

impl Transcript {
    /// Download the timed-text payload and replace the entries with it.
    ///
    /// Entries are only assigned once the whole payload decoded, so a failed
    /// fetch leaves the transcript untouched.
    pub async fn fetch<H: HttpAccess + ?Sized>(&mut self, http: &H) -> Result<()> {
        tracing::debug!(
            "Fetching {} transcript ({}) for {}",
            self.language_code,
            if self.is_generated { "generated" } else { "manual" },
            self.video_id
        );

        let response = http
            .get(&self.source_url)
            .await
            .map_err(|e| TranscriptError::request_failed(&self.video_id, e))?;

        if !response.is_success() {
            return Err(TranscriptError::request_failed(
                &self.video_id,
                format!("timed text request returned HTTP {}", response.status),
            ));
        }

        let entries = parse_timed_text(&response.body, &self.video_id)?;
        tracing::info!(
            "Decoded {} entries for {} ({})",
            entries.len(),
            self.video_id,
            self.language_code
        );
        self.entries = Some(entries);
        Ok(())
    }
}

/// Entry being read between `<text ...>` and `</text>`
struct PendingEntry {
    start: f64,
    duration: f64,
    text: String,
}

/// Decode a timed-text document (`<transcript><text start=".." dur="..">..`)
/// into entries, in document order.
///
/// Unparsable `start`/`dur` values decode to `0` and are logged. A document
/// without a `<transcript>` element (empty body, plain text, an HTML error
/// page) is rejected.
pub fn parse_timed_text(xml: &str, video_id: &str) -> Result<Vec<TranscriptEntry>> {
    let mut reader = Reader::from_str(xml);
    let mut entries = Vec::new();
    let mut pending: Option<PendingEntry> = None;
    let mut has_root = false;

    loop {
        let event = reader.read_event().map_err(|e| {
            TranscriptError::request_failed(
                video_id,
                format!(
                    "invalid timed text XML at position {}: {}",
                    reader.buffer_position(),
                    e
                ),
            )
        })?;

        match event {
            Event::Start(ref e) | Event::Empty(ref e) if e.name().as_ref() == b"transcript" => {
                has_root = true;
            }
            Event::Start(ref e) if e.name().as_ref() == b"text" => {
                let (start, duration) = read_timing(e, entries.len(), video_id);
                pending = Some(PendingEntry {
                    start,
                    duration,
                    text: String::new(),
                });
            }
            Event::Empty(ref e) if e.name().as_ref() == b"text" => {
                let (start, duration) = read_timing(e, entries.len(), video_id);
                entries.push(TranscriptEntry {
                    text: String::new(),
                    start,
                    duration,
                });
            }
            Event::Text(ref e) => {
                if let Some(entry) = pending.as_mut() {
                    let raw = e.unescape().map_err(|err| {
                        TranscriptError::request_failed(
                            video_id,
                            format!("invalid escape in timed text: {}", err),
                        )
                    })?;
                    entry.text.push_str(&raw);
                }
            }
            Event::CData(ref e) => {
                if let Some(entry) = pending.as_mut() {
                    entry.text.push_str(&String::from_utf8_lossy(e));
                }
            }
            Event::End(ref e) if e.name().as_ref() == b"text" => {
                if let Some(entry) = pending.take() {
                    entries.push(TranscriptEntry {
                        text: html_escape::decode_html_entities(&entry.text).into_owned(),
                        start: entry.start,
                        duration: entry.duration,
                    });
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !has_root {
        return Err(TranscriptError::request_failed(
            video_id,
            "timed text payload has no transcript element",
        ));
    }

    Ok(entries)
}

fn read_timing(element: &BytesStart<'_>, index: usize, video_id: &str) -> (f64, f64) {
    let mut start = None;
    let mut duration = None;

    for attr in element.attributes().flatten() {
        match attr.key.as_ref() {
            b"start" => start = Some(String::from_utf8_lossy(&attr.value).into_owned()),
            b"dur" => duration = Some(String::from_utf8_lossy(&attr.value).into_owned()),
            _ => {}
        }
    }

    (
        parse_seconds(start.as_deref(), "start", index, video_id),
        parse_seconds(duration.as_deref(), "dur", index, video_id),
    )
}

fn parse_seconds(raw: Option<&str>, attribute: &str, index: usize, video_id: &str) -> f64 {
    match raw.map(|value| value.trim().parse::<f64>()) {
        Some(Ok(seconds)) if seconds.is_finite() => seconds,
        _ => {
            tracing::warn!(
                "Entry #{} of {} has unusable {} value {:?}, using 0",
                index,
                video_id,
                attribute,
                raw
            );
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpResponse, MockHttpAccess};

    const PAYLOAD: &str = r#"<?xml version="1.0" encoding="utf-8" ?><transcript><text start="1.5" dur="2.0">Hello</text><text start="3.5" dur="1.0">World</text></transcript>"#;

    #[test]
    fn test_decodes_entries_in_order() {
        let entries = parse_timed_text(PAYLOAD, "vid").unwrap();

        assert_eq!(
            entries,
            vec![
                TranscriptEntry {
                    text: "Hello".to_string(),
                    start: 1.5,
                    duration: 2.0
                },
                TranscriptEntry {
                    text: "World".to_string(),
                    start: 3.5,
                    duration: 1.0
                },
            ]
        );
    }

    #[test]
    fn test_malformed_timestamp_decodes_to_zero() {
        let xml = r#"<transcript>
    <text start="0.5" dur="1.0">first</text>
    <text start="abc" dur="2.5">second</text>
    <text start="4.0">third</text>
</transcript>"#;
        let entries = parse_timed_text(xml, "vid").unwrap();

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].text, "first");
        assert_eq!(entries[1].text, "second");
        assert_eq!(entries[1].start, 0.0);
        assert_eq!(entries[1].duration, 2.5);
        assert_eq!(entries[2].text, "third");
        assert_eq!(entries[2].start, 4.0);
        assert_eq!(entries[2].duration, 0.0);
    }

    #[test]
    fn test_entities_are_decoded() {
        let xml = r#"<transcript><text start="0" dur="1">it&amp;#39;s &lt;b&gt; &amp;quot;fine&amp;quot;</text></transcript>"#;
        let entries = parse_timed_text(xml, "vid").unwrap();
        assert_eq!(entries[0].text, "it's <b> \"fine\"");
    }

    #[test]
    fn test_self_closing_entry_keeps_position() {
        let xml = r#"<transcript><text start="1" dur="1">a</text><text start="2" dur="1"/><text start="3" dur="1">c</text></transcript>"#;
        let entries = parse_timed_text(xml, "vid").unwrap();
        let texts: Vec<_> = entries.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "", "c"]);
    }

    #[test]
    fn test_payload_without_transcript_root_is_rejected() {
        let payloads = [
            "",
            "not xml at all",
            "<html><body>Sorry, something went wrong.</body></html>",
        ];
        for payload in payloads {
            let err = parse_timed_text(payload, "vid").unwrap_err();
            assert!(
                matches!(err, TranscriptError::RequestFailed { .. }),
                "payload {payload:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_empty_transcript_counts_as_fetched() {
        assert!(parse_timed_text("<transcript/>", "vid").unwrap().is_empty());

        let mut http = MockHttpAccess::new();
        http.expect_get()
            .returning(|_| Ok(HttpResponse::new(200, "<transcript></transcript>")));

        let mut transcript = Transcript::new("vid", "English", "en", false, "https://example.com/t");
        tokio_test::block_on(transcript.fetch(&http)).unwrap();
        assert!(transcript.is_fetched());
        assert!(transcript.entries().is_empty());
    }

    #[tokio::test]
    async fn test_empty_body_fails_fetch() {
        let mut http = MockHttpAccess::new();
        http.expect_get()
            .times(1)
            .returning(|_| Ok(HttpResponse::new(200, "")));

        let mut transcript = Transcript::new("vid", "English", "en", false, "https://example.com/t");
        let err = transcript.fetch(&http).await.unwrap_err();

        assert!(matches!(err, TranscriptError::RequestFailed { .. }));
        assert!(!transcript.is_fetched());
    }

    #[test]
    fn test_invalid_xml_is_request_failed() {
        let xml = r#"<transcript><text start="1" dur="1">oops</transcript>"#;
        let err = parse_timed_text(xml, "vid").unwrap_err();
        assert!(matches!(err, TranscriptError::RequestFailed { .. }));
    }

    #[tokio::test]
    async fn test_fetch_populates_entries() {
        let mut http = MockHttpAccess::new();
        http.expect_get()
            .withf(|url: &str| url == "https://example.com/timedtext?lang=en")
            .times(1)
            .returning(|_| Ok(HttpResponse::new(200, PAYLOAD)));

        let mut transcript =
            Transcript::new("vid", "English", "en", false, "https://example.com/timedtext?lang=en");
        assert!(!transcript.is_fetched());

        transcript.fetch(&http).await.unwrap();
        assert!(transcript.is_fetched());
        assert_eq!(transcript.entries().len(), 2);
        assert_eq!(transcript.entries()[1].end(), 4.5);
    }

    #[test]
    fn test_failed_fetch_leaves_entries_empty() {
        let mut http = MockHttpAccess::new();
        http.expect_get()
            .returning(|_| Ok(HttpResponse::new(404, "not found")));

        let mut transcript = Transcript::new("vid", "English", "en", false, "https://example.com/t");
        let err = tokio_test::block_on(transcript.fetch(&http)).unwrap_err();

        assert!(matches!(err, TranscriptError::RequestFailed { .. }));
        assert!(!transcript.is_fetched());
    }
}
