use anyhow::{Context, Result};
use std::path::Path;

use crate::cli::OutputFormat;
use crate::transcript::Transcript;

pub mod formatters;

pub use formatters::*;

/// Render a transcript in the requested format
pub fn render(transcript: &Transcript, format: OutputFormat) -> Result<String> {
    let content = match format {
        OutputFormat::Text => format_as_text(transcript),
        OutputFormat::Json => format_as_json(transcript)?,
        OutputFormat::Srt => format_as_srt(transcript),
    };
    Ok(content)
}

/// Save a rendered transcript to file
pub fn save_to_file(transcript: &Transcript, path: &Path, format: OutputFormat) -> Result<()> {
    let content = render(transcript, format)?;
    fs_err::write(path, content).context("Failed to write transcript")?;
    Ok(())
}

/// Print a rendered transcript to stdout
pub fn print_to_console(transcript: &Transcript, format: OutputFormat) -> Result<()> {
    let content = render(transcript, format)?;
    if content.ends_with('\n') {
        print!("{}", content);
    } else {
        println!("{}", content);
    }
    Ok(())
}
