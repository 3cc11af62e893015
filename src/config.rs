//! Fixed settings for the narration pipeline.
//!
//! None of these are exposed on the command line. The only runtime inputs are
//! the article URL, `RUST_LOG`, and the standard AWS credential/region chain.

use std::time::Duration;

/// Bucket that receives the synthesized audio.
pub const BUCKET_NAME: &str = "article-storage-1029384756";

/// Region the speech-synthesis client is pinned to.
pub const POLLY_REGION: &str = "us-east-1";

/// Voice used for every narration.
pub const VOICE_ID: &str = "Joanna";

/// Synthesis engine tier.
pub const ENGINE: &str = "standard";

/// Output sample rate in Hz, as the service expects it (a string).
pub const SAMPLE_RATE: &str = "8000";

/// Audio container returned by the synthesis call.
pub const OUTPUT_FORMAT: &str = "mp3";

/// Input type handed to the synthesis call.
pub const TEXT_TYPE: &str = "text";

/// Number of body characters sent for narration.
pub const MAX_SPEECH_CHARS: usize = 1500;

/// Maximum length of a sanitized name, in characters.
pub const MAX_NAME_CHARS: usize = 100;

/// Name used when a title sanitizes down to nothing.
pub const FALLBACK_NAME: &str = "article";

/// Subdirectory of the working directory that holds article text.
pub const ARTICLES_DIR: &str = "articles";

/// Per-request timeout for the page download.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(7);

/// `User-Agent` sent with the page download.
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Region used for the upload when the AWS config chain provides none.
pub const DEFAULT_S3_REGION: &str = "us-east-1";
