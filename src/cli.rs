//! Command-line interface definitions for Article Narrator.
//!
//! The tool takes a single positional argument, the article URL. Everything
//! else is fixed at compile time (see [`crate::config`]).

use clap::Parser;

/// Command-line arguments.
///
/// The URL is optional at the parser level so a missing argument produces
/// the tool's own `ERROR -- expected article URL` line instead of clap's usage
/// error.
///
/// # Examples
///
/// ```sh
/// article_narrator https://example.com/news/some-story
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// URL of the article to fetch and narrate
    pub url: Option<String>,

    /// Extra positional arguments are accepted and ignored
    #[arg(hide = true)]
    pub extra: Vec<String>,
}
