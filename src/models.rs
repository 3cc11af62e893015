//! Data carried between pipeline stages.
//!
//! - [`ArticleRecord`]: title and body extracted from a page
//! - [`SpeechRequest`]: parameters for one synthesis call
//! - [`UploadOutcome`]: what happened to the audio upload

use crate::config;
use crate::errors::UploadError;

/// An article as extracted from a page's markup.
///
/// Produced once by the fetcher and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRecord {
    /// The article headline.
    pub title: String,
    /// Plain body text, paragraphs separated by a blank line.
    pub body_text: String,
    /// The markup the record was parsed from, after cleaning.
    pub raw_html: String,
}

impl ArticleRecord {
    /// Flattened text file content: title, blank line, body.
    pub fn to_text(&self) -> String {
        format!("{}\n\n{}", self.title, self.body_text)
    }
}

/// Parameters for a single speech-synthesis call.
///
/// Everything except `text` comes from [`crate::config`]; build one with
/// [`SpeechRequest::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechRequest {
    /// Plain text to speak, already cut to the service limit.
    pub text: String,
    /// Voice name, e.g. `"Joanna"`.
    pub voice_id: &'static str,
    /// Engine tier, `"standard"`.
    pub engine: &'static str,
    /// Sample rate in Hz as a string, `"8000"`.
    pub sample_rate: &'static str,
    /// Audio container, `"mp3"`.
    pub output_format: &'static str,
    /// Input interpretation, `"text"` (not SSML).
    pub text_type: &'static str,
}

impl SpeechRequest {
    /// Request for `text` with the fixed voice, engine, rate and format.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let req = SpeechRequest::new("Hello");
    /// assert_eq!(req.voice_id, "Joanna");
    /// ```
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            voice_id: config::VOICE_ID,
            engine: config::ENGINE,
            sample_rate: config::SAMPLE_RATE,
            output_format: config::OUTPUT_FORMAT,
            text_type: config::TEXT_TYPE,
        }
    }
}

/// Result of the upload step. Failures here never abort the run.
#[derive(Debug)]
pub enum UploadOutcome {
    /// The audio file is stored at `bucket`/`key`.
    Uploaded {
        /// Target bucket name.
        bucket: String,
        /// Object key, `{name}.mp3`.
        key: String,
    },
    /// The upload was attempted and rejected; the local file remains.
    Failed(UploadError),
}

impl UploadOutcome {
    /// `true` only for [`UploadOutcome::Uploaded`].
    pub fn is_uploaded(&self) -> bool {
        matches!(self, UploadOutcome::Uploaded { .. })
    }
}
