//! # Article Narrator
//!
//! Downloads a web article, saves its title and body as plain text, and
//! publishes a synthesized speech rendition to S3.
//!
//! ## Usage
//!
//! ```sh
//! article_narrator https://example.com/news/some-story
//! ```
//!
//! ## Architecture
//!
//! One article per run, four stages strictly in sequence:
//! 1. **Fetching**: download the page and extract title/body ([`scrapers::article`])
//! 2. **Naming**: derive a safe base name from the title ([`utils::sanitize_filename`])
//! 3. **Saving**: write `articles/{name}.txt` ([`outputs::text`])
//! 4. **Narrating**: synthesize `{name}.mp3` and upload it ([`narrator`])
//!
//! Fetch, save and synthesis failures end the run with a non-zero status.
//! Upload failures are printed and the run still exits 0.

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod api;
mod cli;
mod config;
mod errors;
mod models;
mod narrator;
mod outputs;
mod scrapers;
mod utils;

use api::{ObjectStore, PollySynthesizer, S3Store, SpeechSynthesizer};
use cli::Cli;
use config::{BUCKET_NAME, MAX_SPEECH_CHARS};
use errors::PipelineError;
use models::{ArticleRecord, UploadOutcome};
use narrator::Narrator;
use outputs::text::{articles_dir, save_article};
use utils::{sanitize_filename, truncate_chars};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let url = match url_arg(&args) {
        Ok(url) => url,
        Err(exit) => return exit.emit(),
    };

    let result = run(url).await;
    match &result {
        Ok(UploadOutcome::Uploaded { bucket, key }) => {
            info!(%bucket, %key, "Narration published")
        }
        Ok(UploadOutcome::Failed(e)) => warn!(error = %e, "Narration saved locally only"),
        Err(e) => error!(error = ?e, "Run failed"),
    }
    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        uploaded = result.as_ref().is_ok_and(UploadOutcome::is_uploaded),
        "Execution complete"
    );

    exit_for(&result).emit()
}

/// How the process ends: exit status plus an optional final stdout line.
#[derive(Debug, PartialEq, Eq)]
struct Exit {
    success: bool,
    line: Option<String>,
}

impl Exit {
    fn failure(line: impl Into<String>) -> Self {
        Self {
            success: false,
            line: Some(line.into()),
        }
    }

    fn code(&self) -> ExitCode {
        if self.success {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }

    /// Print the final line, if any, and hand back the exit status.
    fn emit(self) -> ExitCode {
        if let Some(line) = &self.line {
            println!("{line}");
        }
        self.code()
    }
}

/// The article URL, or the usage failure when none was given.
fn url_arg(args: &Cli) -> Result<&str, Exit> {
    args.url
        .as_deref()
        .ok_or_else(|| Exit::failure("ERROR -- expected article URL"))
}

/// Map a finished run to its exit.
///
/// Upload problems were already reported by the narrator and still exit 0;
/// every [`PipelineError`] prints its diagnostic and exits non-zero.
fn exit_for(result: &Result<UploadOutcome, PipelineError>) -> Exit {
    match result {
        Ok(_) => Exit {
            success: true,
            line: None,
        },
        Err(e) => Exit::failure(e.to_string()),
    }
}

/// Fetch `url` and run the remaining stages against AWS.
#[instrument(level = "info")]
async fn run(url: &str) -> Result<UploadOutcome, PipelineError> {
    println!("Fetching article from: {url}");
    let article = scrapers::article::fetch_article(url).await?;
    debug!(markup_bytes = article.raw_html.len(), "Fetched article");

    let narrator = Narrator::new(
        PollySynthesizer::from_env().await,
        S3Store::from_env().await,
        ".",
    );
    process(&article, &articles_dir()?, &narrator).await
}

/// Name, save and narrate an already-fetched article.
async fn process<S, O>(
    article: &ArticleRecord,
    articles_dir: &Path,
    narrator: &Narrator<S, O>,
) -> Result<UploadOutcome, PipelineError>
where
    S: SpeechSynthesizer,
    O: ObjectStore,
{
    let name = sanitize_filename(&article.title);
    info!(%name, "Sanitized article title");

    let path = save_article(articles_dir, &name, article).await?;
    println!("Article saved to: {}", path.display());

    let text = truncate_chars(&article.body_text, MAX_SPEECH_CHARS);
    Ok(narrator.narrate(&name, BUCKET_NAME, text).await?)
}
