//! External service clients: speech synthesis and object storage.
//!
//! # Architecture
//!
//! The narrator talks to its collaborators through two traits:
//! - [`SpeechSynthesizer`]: text in, encoded audio bytes out
//! - [`ObjectStore`]: upload a local file under a bucket/key
//!
//! [`PollySynthesizer`] and [`S3Store`] are the AWS-backed implementations.
//! Neither retries; a failed call is reported once.

use std::io;
use std::path::Path;
use std::time::Instant;

use aws_config::BehaviorVersion;
use aws_config::meta::region::RegionProviderChain;
use aws_credential_types::provider::{ProvideCredentials, SharedCredentialsProvider};
use aws_sdk_polly::config::Region;
use aws_sdk_polly::types::{Engine, OutputFormat, TextType, VoiceId};
use aws_sdk_s3::primitives::ByteStream;
use tokio::fs;
use tracing::{info, instrument, warn};

use crate::config::{DEFAULT_S3_REGION, POLLY_REGION};
use crate::errors::{NarrationError, UploadError};
use crate::models::SpeechRequest;

/// Converts text to encoded audio.
///
/// Implementors must return the service's audio stream byte for byte; the
/// narrator writes it to disk without inspecting it.
pub trait SpeechSynthesizer {
    /// Synthesize `request` and return the audio stream's bytes unmodified.
    ///
    /// # Arguments
    ///
    /// * `request` - Text plus voice, engine, sample rate and format
    ///
    /// # Errors
    ///
    /// Any failure is a [`NarrationError::Synthesis`]; callers treat it as fatal.
    async fn synthesize(&self, request: &SpeechRequest) -> Result<Vec<u8>, NarrationError>;
}

/// Key-addressed binary storage.
pub trait ObjectStore {
    /// Upload the file at `path` to `bucket` under `key`.
    ///
    /// # Errors
    ///
    /// - [`UploadError::FileNotFound`] if `path` does not exist
    /// - [`UploadError::MissingCredentials`] if no credentials can be resolved
    /// - [`UploadError::Service`] for any other rejection
    async fn upload(&self, path: &Path, bucket: &str, key: &str) -> Result<(), UploadError>;
}

/// Confirm the upload source exists and return its size in bytes.
///
/// Runs before any credential or network work so a missing file is always
/// reported as [`UploadError::FileNotFound`].
///
/// # Arguments
///
/// * `path` - Local file about to be uploaded
///
/// # Returns
///
/// The file length, or [`UploadError::FileNotFound`] if nothing exists at
/// `path`. Other I/O failures (permissions, not a regular file) map to
/// [`UploadError::Service`].
pub async fn upload_source_len(path: &Path) -> Result<u64, UploadError> {
    match fs::metadata(path).await {
        Ok(meta) if meta.is_file() => Ok(meta.len()),
        Ok(_) => Err(UploadError::Service(format!("{} is not a file", path.display()))),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(UploadError::FileNotFound),
        Err(e) => Err(UploadError::Service(e.to_string())),
    }
}

/// Append the fixed fallback region to `chain`.
///
/// S3 refuses to send a request without a region, while the speech client
/// is always pinned to [`POLLY_REGION`]. When the environment, profile and
/// instance metadata all come up empty the upload goes to
/// [`DEFAULT_S3_REGION`].
pub fn with_region_fallback(chain: RegionProviderChain) -> RegionProviderChain {
    chain.or_else(Region::new(DEFAULT_S3_REGION))
}

/// Amazon Polly client.
///
/// Sends one `SynthesizeSpeech` request per call and collects the returned
/// audio stream in memory.
#[derive(Debug, Clone)]
pub struct PollySynthesizer {
    client: aws_sdk_polly::Client,
}

impl PollySynthesizer {
    /// Build a client from the default AWS config chain, pinned to
    /// [`POLLY_REGION`].
    pub async fn from_env() -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(POLLY_REGION))
            .load()
            .await;
        Self {
            client: aws_sdk_polly::Client::new(&sdk_config),
        }
    }
}

impl SpeechSynthesizer for PollySynthesizer {
    #[instrument(level = "info", skip_all, fields(voice = request.voice_id, chars = request.text.chars().count()))]
    async fn synthesize(&self, request: &SpeechRequest) -> Result<Vec<u8>, NarrationError> {
        let t0 = Instant::now();
        let response = self
            .client
            .synthesize_speech()
            .engine(Engine::from(request.engine))
            .sample_rate(request.sample_rate)
            .text(&request.text)
            .text_type(TextType::from(request.text_type))
            .output_format(OutputFormat::from(request.output_format))
            .voice_id(VoiceId::from(request.voice_id))
            .send()
            .await
            .map_err(|e| {
                NarrationError::Synthesis(aws_sdk_polly::error::DisplayErrorContext(&e).to_string())
            })?;

        let audio = response
            .audio_stream
            .collect()
            .await
            .map_err(|e| NarrationError::Synthesis(e.to_string()))?
            .into_bytes()
            .to_vec();

        info!(
            bytes = audio.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Speech synthesized"
        );
        Ok(audio)
    }
}

/// Amazon S3 client.
///
/// Keeps the resolved credentials provider next to the client so a missing
/// identity can be reported on its own instead of as a dispatch failure.
#[derive(Debug, Clone)]
pub struct S3Store {
    client: aws_sdk_s3::Client,
    credentials: Option<SharedCredentialsProvider>,
}

impl S3Store {
    /// Build a client from the default AWS config chain.
    ///
    /// The region comes from the usual sources (`AWS_REGION`, profile,
    /// instance metadata) and falls back to [`DEFAULT_S3_REGION`].
    pub async fn from_env() -> Self {
        let region = with_region_fallback(RegionProviderChain::default_provider());
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(region)
            .load()
            .await;
        Self {
            client: aws_sdk_s3::Client::new(&sdk_config),
            credentials: sdk_config.credentials_provider(),
        }
    }

    /// Resolve credentials once, mapping any failure to
    /// [`UploadError::MissingCredentials`].
    async fn check_credentials(&self) -> Result<(), UploadError> {
        let Some(provider) = &self.credentials else {
            return Err(UploadError::MissingCredentials);
        };
        provider.provide_credentials().await.map_err(|e| {
            warn!(error = %e, "Could not resolve AWS credentials");
            UploadError::MissingCredentials
        })?;
        Ok(())
    }
}

impl ObjectStore for S3Store {
    #[instrument(level = "info", skip(self, path), fields(path = %path.display()))]
    async fn upload(&self, path: &Path, bucket: &str, key: &str) -> Result<(), UploadError> {
        let bytes = upload_source_len(path).await?;
        self.check_credentials().await?;

        let body = ByteStream::from_path(path).await.map_err(|e| {
            if path.exists() {
                UploadError::Service(e.to_string())
            } else {
                UploadError::FileNotFound
            }
        })?;

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .content_type("audio/mpeg")
            .send()
            .await
            .map_err(|e| {
                UploadError::Service(aws_sdk_s3::error::DisplayErrorContext(&e).to_string())
            })?;

        info!(bytes, "Uploaded object");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upload_source_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let err = upload_source_len(&tmp.path().join("missing.mp3")).await.unwrap_err();
        assert!(matches!(err, UploadError::FileNotFound));
    }

    #[tokio::test]
    async fn upload_source_reports_length() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("clip.mp3");
        std::fs::write(&path, [0xFF, 0xFB, 0x90, 0x00]).unwrap();
        assert_eq!(upload_source_len(&path).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn upload_source_rejects_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let err = upload_source_len(tmp.path()).await.unwrap_err();
        assert!(matches!(err, UploadError::Service(_)));
    }

    #[tokio::test]
    async fn region_falls_back_when_nothing_configured() {
        let chain = with_region_fallback(RegionProviderChain::first_try(None::<Region>));
        assert_eq!(chain.region().await, Some(Region::new(DEFAULT_S3_REGION)));
    }

    #[tokio::test]
    async fn configured_region_wins_over_fallback() {
        let chain = with_region_fallback(RegionProviderChain::first_try(Some(Region::new(
            "eu-west-1",
        ))));
        assert_eq!(chain.region().await, Some(Region::new("eu-west-1")));
    }
}
