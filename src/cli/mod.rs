use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "yt-transcript",
    about = "Fetch the transcript of a YouTube video",
    version,
    long_about = "Retrieves manually created or auto-generated YouTube transcripts by reading the video's watch page, and prints them as plain text, JSON or SRT.\n\nOptions take double dashes, e.g. `yt-transcript --video dQw4w9WgXcQ --languages de,en`; only --output and --quiet have one-letter forms."
)]
pub struct Cli {
    /// Video id or URL (watch, youtu.be or embed link)
    #[arg(long, value_name = "ID", required_unless_present = "show_config")]
    pub video: Option<String>,

    /// Language codes in order of preference, comma separated (e.g. "en,de,fr")
    #[arg(long, value_name = "CODES")]
    pub languages: Option<String>,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Output file path (prints to console if not specified)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// List the available transcripts instead of fetching one
    #[arg(long)]
    pub list: bool,

    /// Print the effective configuration and exit
    #[arg(long)]
    pub show_config: bool,

    /// Enable verbose logging
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Disable progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One "[start - end]: text" line per entry
    Text,
    /// Pretty-printed JSON array of entries
    Json,
    /// SRT subtitle format
    Srt,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Srt => write!(f, "srt"),
        }
    }
}
