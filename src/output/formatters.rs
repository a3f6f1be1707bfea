use anyhow::{Context, Result};

use crate::transcript::{Transcript, TranscriptEntry};
use crate::utils::format_srt_timestamp;

/// One line per entry: `[start - end]: text`
pub fn format_as_text(transcript: &Transcript) -> String {
    transcript
        .entries()
        .iter()
        .map(|entry| format!("[{:.2} - {:.2}]: {}\n", entry.start, entry.end(), entry.text))
        .collect()
}

/// Pretty-printed JSON array of `{text, start, duration}` objects
pub fn format_as_json(transcript: &Transcript) -> Result<String> {
    serde_json::to_string_pretty(transcript.entries()).context("Failed to serialize transcript")
}

/// Numbered SRT blocks separated by blank lines
pub fn format_as_srt(transcript: &Transcript) -> String {
    transcript
        .entries()
        .iter()
        .enumerate()
        .map(|(i, entry)| srt_block(i + 1, entry))
        .collect()
}

fn srt_block(index: usize, entry: &TranscriptEntry) -> String {
    format!(
        "{}\n{} --> {}\n{}\n\n",
        index,
        format_srt_timestamp(entry.start),
        format_srt_timestamp(entry.end()),
        entry.text
    )
}
