use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::{fs, io::IsTerminal};
use tracing_subscriber::EnvFilter;

use tubesum::config::AppConfig;
use tubesum::pipeline::{self, VideoSummary};
use tubesum::provider::{self, ProviderContext, ProviderKind};
use tubesum::summarizer::RecursiveSummarizer;
use tubesum::transcript::{FileTranscriptSource, TranscriptSource, YoutubeTranscriptSource};

/// tubesum - summarize a video from its captions
///
/// Fetches the caption track, splits it into chunks that fit the model's
/// input budget, summarizes each chunk and merges the partial summaries.
#[derive(Parser, Debug)]
#[command(name = "tubesum")]
#[command(version = "0.1.0")]
#[command(about = "Summarize a video from its caption track", long_about = None)]
struct Args {
    /// Video URL (youtu.be, watch, embed or shorts link)
    #[arg(value_name = "URL")]
    url: String,

    /// JSON configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Summarization model identifier
    #[arg(long, value_name = "ID")]
    model: Option<String>,

    /// Token budget per transcript chunk
    #[arg(long, value_name = "TOKENS")]
    chunk_budget: Option<usize>,

    /// Preferred caption language (repeatable, most preferred first)
    #[arg(long = "language", value_name = "CODE")]
    languages: Vec<String>,

    /// Read caption segments from a JSON file instead of fetching them
    #[arg(long, value_name = "PATH")]
    transcript_file: Option<PathBuf>,

    /// Use the offline leading-words provider instead of the inference API
    #[arg(long)]
    offline: bool,

    /// Print sampled key moments with timestamps
    #[arg(long)]
    timestamps: bool,

    /// Print the transcript text that was summarized
    #[arg(long)]
    full_transcript: bool,

    /// Also write the summary text to this file, or to
    /// `<title>_summary.txt` inside this directory
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

impl Args {
    /// Validate CLI arguments
    fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            anyhow::bail!("Please provide a video URL");
        }

        if let Some(path) = &self.transcript_file {
            if !path.is_file() {
                anyhow::bail!("Transcript file does not exist: {:?}", path);
            }
        }

        if let Some(budget) = self.chunk_budget {
            if budget == 0 {
                anyhow::bail!("Chunk budget must be positive, got: {}", budget);
            }
        }

        Ok(())
    }

    /// Layer CLI flags over the loaded configuration
    fn app_config(&self) -> Result<AppConfig> {
        let mut config = AppConfig::load(self.config.as_deref())?;
        if let Some(model) = &self.model {
            config.summarizer.model = model.clone();
        }
        if let Some(budget) = self.chunk_budget {
            config.summarizer.chunk_token_budget = budget;
        }
        if !self.languages.is_empty() {
            config.transcript.languages = self.languages.clone();
        }
        if self.offline {
            config.provider.kind = ProviderKind::Lead;
        }
        Ok(config)
    }

    fn transcript_source(&self, config: &AppConfig) -> Result<Box<dyn TranscriptSource>> {
        match &self.transcript_file {
            Some(path) => Ok(Box::new(FileTranscriptSource::new(path.clone()))),
            None => Ok(Box::new(YoutubeTranscriptSource::new(
                config.transcript.languages.clone(),
                config.transcript.timeout(),
            )?)),
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    // Validate arguments
    args.validate()
        .context("Failed to validate command-line arguments")?;

    let config = args.app_config().context("Failed to load configuration")?;
    config.validate().context("Configuration validation failed")?;

    let providers = ProviderContext::new();
    let model_id = match config.provider.kind {
        ProviderKind::Lead => provider::lead::LEAD_MODEL_ID.to_string(),
        ProviderKind::InferenceApi => config.summarizer.model.clone(),
    };
    let provider = providers
        .get_or_try_init(&model_id, |id| provider::load_provider(&config.provider, id))
        .with_context(|| format!("Failed to load summarization model {}", model_id))?;

    let source = args.transcript_source(&config)?;
    let summarizer = RecursiveSummarizer::new(&*provider, config.summarizer.clone());
    let mut result = pipeline::summarize_video(&args.url, source.as_ref(), &summarizer)?;
    if !args.full_transcript {
        result.full_text = None;
    }

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&result).context("Failed to encode summary as JSON")?
        );
    } else {
        print_summary(&result, args.timestamps);
    }

    if let Some(output) = &args.output {
        let path = summary_path(output, &result);
        fs::write(&path, format!("{}\n", result.summary))
            .with_context(|| format!("Failed to write summary to {:?}", path))?;
        tracing::info!(path = %path.display(), "summary written");
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();
}

/// A directory gets the title-derived file name
fn summary_path(output: &Path, result: &VideoSummary) -> PathBuf {
    if output.is_dir() {
        output.join(result.summary_file_name())
    } else {
        output.to_path_buf()
    }
}

fn print_summary(result: &VideoSummary, timestamps: bool) {
    println!("Summary for {}", result.video_id);
    if let Some(details) = &result.details {
        println!("Title: {}", details.title);
        println!("{} | {} min", details.author, details.length_minutes());
        if let Some(thumbnail) = &details.thumbnail_url {
            println!("Thumbnail: {}", thumbnail);
        }
    }
    if let Some(language) = &result.language {
        println!("Language: {}", language);
    }
    println!();
    println!("{}", result.summary);

    if timestamps && !result.key_moments.is_empty() {
        println!();
        println!("Key moments:");
        for moment in &result.key_moments {
            println!("  [{}] {}", moment.timestamp_label(), moment.text);
        }
    }

    if let Some(text) = &result.full_text {
        println!();
        println!("Full transcript:");
        println!("{}", text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["tubesum", "https://youtu.be/abc12345678"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn flags_override_config() {
        let args = args(&[
            "--model",
            "sshleifer/distilbart-cnn-12-6",
            "--chunk-budget",
            "400",
            "--language",
            "de",
            "--language",
            "en",
            "--offline",
        ]);
        let config = args.app_config().unwrap();
        assert_eq!(config.summarizer.model, "sshleifer/distilbart-cnn-12-6");
        assert_eq!(config.summarizer.chunk_token_budget, 400);
        assert_eq!(config.transcript.languages, vec!["de", "en"]);
        assert_eq!(config.provider.kind, ProviderKind::Lead);
    }

    #[test]
    fn rejects_zero_budget() {
        assert!(args(&["--chunk-budget", "0"]).validate().is_err());
    }

    #[test]
    fn rejects_missing_transcript_file() {
        assert!(args(&["--transcript-file", "no/such/file.json"])
            .validate()
            .is_err());
    }
}
