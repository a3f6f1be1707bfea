use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use youtube_transcript::{output, utils, Cli, Config, TranscriptApi};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "youtube_transcript=debug"
    } else {
        "youtube_transcript=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(err) = run(cli).await {
        eprintln!("{} {:#}", console::style("Error:").red().bold(), err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;

    if cli.show_config {
        config.display();
        return Ok(());
    }

    let video = cli
        .video
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("video ID must be specified using --video"))?;
    let video_id = utils::extract_video_id(video)?;

    let languages = match cli.languages.as_deref() {
        Some(list) => utils::parse_language_codes(list),
        None => config.defaults.languages.clone(),
    };
    if languages.is_empty() {
        anyhow::bail!("at least one language code is required");
    }
    let format = cli.format.unwrap_or(config.defaults.format);

    let api = TranscriptApi::new(&config.http)?;
    let progress = spinner(cli.quiet);

    if cli.list {
        progress.set_message(format!("Listing transcripts for {}...", video_id));
        let catalog = api.list_transcripts(&video_id).await;
        progress.finish_and_clear();
        print!("{}", catalog?);
        return Ok(());
    }

    progress.set_message(format!("Fetching transcript for {}...", video_id));
    let transcript = api.get_transcript(&video_id, languages.as_slice()).await;
    progress.finish_and_clear();
    let transcript = transcript?;

    tracing::info!(
        "Fetched {} entries ({}, {})",
        transcript.entries().len(),
        transcript.language,
        transcript.language_code
    );

    match cli.output {
        Some(path) => {
            output::save_to_file(&transcript, &path, format)?;
            eprintln!("Transcript saved to: {}", path.display());
        }
        None => output::print_to_console(&transcript, format)?,
    }

    Ok(())
}

fn spinner(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let progress = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        progress.set_style(style);
    }
    progress.enable_steady_tick(Duration::from_millis(100));
    progress
}
