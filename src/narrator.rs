//! Narration: synthesize speech, save it locally, upload it.
//!
//! Synthesis and local write failures are fatal and returned as
//! [`NarrationError`]. Upload failures are printed and returned inside
//! [`UploadOutcome::Failed`] so the run can finish normally.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{error, info, instrument, warn};

use crate::api::{ObjectStore, SpeechSynthesizer};
use crate::config::MAX_SPEECH_CHARS;
use crate::errors::NarrationError;
use crate::models::{SpeechRequest, UploadOutcome};
use crate::utils::truncate_chars;

/// Drives one synthesis call and one upload.
#[derive(Debug)]
pub struct Narrator<S, O> {
    synthesizer: S,
    store: O,
    /// Where `{name}.mp3` is written; the working directory in production.
    audio_dir: PathBuf,
}

impl<S, O> Narrator<S, O>
where
    S: SpeechSynthesizer,
    O: ObjectStore,
{
    /// Create a narrator.
    ///
    /// # Arguments
    ///
    /// * `synthesizer` - Speech service that turns text into audio bytes
    /// * `store` - Object storage that receives the finished file
    /// * `audio_dir` - Directory for `{name}.mp3`; `"."` in production so the
    ///   file lands in the working directory
    pub fn new(synthesizer: S, store: O, audio_dir: impl Into<PathBuf>) -> Self {
        Self {
            synthesizer,
            store,
            audio_dir: audio_dir.into(),
        }
    }

    #[cfg(test)]
    pub fn synthesizer(&self) -> &S {
        &self.synthesizer
    }

    #[cfg(test)]
    pub fn store(&self) -> &O {
        &self.store
    }

    /// Path of the local audio file for `name`.
    pub fn audio_path(&self, name: &str) -> PathBuf {
        self.audio_dir.join(format!("{name}.mp3"))
    }

    /// Narrate `text` as `{name}.mp3` and upload it to `bucket`.
    ///
    /// Text longer than [`MAX_SPEECH_CHARS`] is cut to that length before
    /// synthesis.
    ///
    /// # Returns
    ///
    /// [`UploadOutcome::Uploaded`] or [`UploadOutcome::Failed`]; either way
    /// the audio file has been written and the outcome line printed.
    ///
    /// # Errors
    ///
    /// [`NarrationError`] if synthesis fails or the audio cannot be written.
    /// Nothing is uploaded in that case.
    #[instrument(level = "info", skip(self, text), fields(chars = text.chars().count()))]
    pub async fn narrate(
        &self,
        name: &str,
        bucket: &str,
        text: &str,
    ) -> Result<UploadOutcome, NarrationError> {
        let clamped = truncate_chars(text, MAX_SPEECH_CHARS);
        if clamped.len() < text.len() {
            warn!(
                limit = MAX_SPEECH_CHARS,
                dropped_bytes = text.len() - clamped.len(),
                "Narration text exceeds the synthesis limit; truncating"
            );
        }

        let audio = self
            .synthesizer
            .synthesize(&SpeechRequest::new(clamped))
            .await?;

        let path = self.audio_path(name);
        write_audio(&path, &audio).await?;
        println!("Speech file saved as {name}.mp3");

        let key = format!("{name}.mp3");
        let outcome = match self.store.upload(&path, bucket, &key).await {
            Ok(()) => {
                println!("Uploaded '{key}' to S3");
                UploadOutcome::Uploaded {
                    bucket: bucket.to_string(),
                    key,
                }
            }
            Err(e) => {
                error!(error = %e, %bucket, %key, "Upload failed");
                println!("ERROR -- {e}");
                UploadOutcome::Failed(e)
            }
        };
        Ok(outcome)
    }
}

async fn write_audio(path: &Path, audio: &[u8]) -> Result<(), NarrationError> {
    fs::write(path, audio)
        .await
        .map_err(|source| NarrationError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    info!(path = %path.display(), bytes = audio.len(), "Wrote audio file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::upload_source_len;
    use crate::errors::UploadError;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeSynth {
        audio: Vec<u8>,
        fail: bool,
        seen: Mutex<Vec<SpeechRequest>>,
    }

    impl SpeechSynthesizer for FakeSynth {
        async fn synthesize(&self, request: &SpeechRequest) -> Result<Vec<u8>, NarrationError> {
            self.seen.lock().unwrap().push(request.clone());
            if self.fail {
                return Err(NarrationError::Synthesis("ServiceUnavailable".into()));
            }
            Ok(self.audio.clone())
        }
    }

    enum StoreMode {
        ReadFile,
        RemoveThenRead,
        Reject(fn() -> UploadError),
    }

    struct FakeStore {
        mode: StoreMode,
        uploads: Mutex<Vec<(String, String, Vec<u8>)>>,
    }

    impl FakeStore {
        fn new(mode: StoreMode) -> Self {
            Self {
                mode,
                uploads: Mutex::new(Vec::new()),
            }
        }
    }

    impl ObjectStore for FakeStore {
        async fn upload(&self, path: &Path, bucket: &str, key: &str) -> Result<(), UploadError> {
            match &self.mode {
                StoreMode::ReadFile => {}
                StoreMode::RemoveThenRead => std::fs::remove_file(path).unwrap(),
                StoreMode::Reject(make) => return Err(make()),
            }
            upload_source_len(path).await?;
            let body = std::fs::read(path).unwrap();
            self.uploads
                .lock()
                .unwrap()
                .push((bucket.to_string(), key.to_string(), body));
            Ok(())
        }
    }

    fn synth(audio: &[u8]) -> FakeSynth {
        FakeSynth {
            audio: audio.to_vec(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn writes_audio_verbatim_and_uploads_under_name_key() {
        let tmp = tempfile::tempdir().unwrap();
        let audio: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        let narrator = Narrator::new(synth(&audio), FakeStore::new(StoreMode::ReadFile), tmp.path());

        let outcome = narrator
            .narrate("Test_Article", "bucket-1", "Lorem ipsum...")
            .await
            .unwrap();

        let on_disk = std::fs::read(tmp.path().join("Test_Article.mp3")).unwrap();
        assert_eq!(on_disk, audio);
        assert!(matches!(
            outcome,
            UploadOutcome::Uploaded { ref bucket, ref key } if bucket == "bucket-1" && key == "Test_Article.mp3"
        ));

        let uploads = narrator.store.uploads.lock().unwrap();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].0, "bucket-1");
        assert_eq!(uploads[0].1, "Test_Article.mp3");
        assert_eq!(uploads[0].2, audio);

        let seen = narrator.synthesizer.seen.lock().unwrap();
        assert_eq!(seen[0], SpeechRequest::new("Lorem ipsum..."));
    }

    #[tokio::test]
    async fn clamps_long_text_to_limit() {
        let tmp = tempfile::tempdir().unwrap();
        let narrator = Narrator::new(synth(b"ID3"), FakeStore::new(StoreMode::ReadFile), tmp.path());
        let text = "é".repeat(MAX_SPEECH_CHARS + 200);

        narrator.narrate("long", "b", &text).await.unwrap();

        let seen = narrator.synthesizer.seen.lock().unwrap();
        assert_eq!(seen[0].text.chars().count(), MAX_SPEECH_CHARS);
    }

    #[tokio::test]
    async fn missing_file_is_reported_not_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let narrator = Narrator::new(
            synth(b"ID3"),
            FakeStore::new(StoreMode::Reject(|| UploadError::FileNotFound)),
            tmp.path(),
        );

        let outcome = narrator.narrate("gone", "b", "text").await.unwrap();
        assert!(!outcome.is_uploaded());
        assert!(matches!(outcome, UploadOutcome::Failed(UploadError::FileNotFound)));
    }

    #[tokio::test]
    async fn audio_removed_before_upload_is_reported_not_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let narrator = Narrator::new(
            synth(b"ID3"),
            FakeStore::new(StoreMode::RemoveThenRead),
            tmp.path(),
        );

        let outcome = narrator.narrate("vanished", "b", "text").await.unwrap();

        assert!(matches!(outcome, UploadOutcome::Failed(UploadError::FileNotFound)));
        assert!(!tmp.path().join("vanished.mp3").exists());
        assert!(narrator.store.uploads.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn credential_and_service_failures_are_reported() {
        let tmp = tempfile::tempdir().unwrap();

        let no_creds = Narrator::new(
            synth(b"ID3"),
            FakeStore::new(StoreMode::Reject(|| UploadError::MissingCredentials)),
            tmp.path(),
        );
        let outcome = no_creds.narrate("a", "b", "text").await.unwrap();
        assert!(matches!(outcome, UploadOutcome::Failed(UploadError::MissingCredentials)));

        let denied = Narrator::new(
            synth(b"ID3"),
            FakeStore::new(StoreMode::Reject(|| UploadError::Service("AccessDenied".into()))),
            tmp.path(),
        );
        let outcome = denied.narrate("a", "b", "text").await.unwrap();
        assert!(matches!(outcome, UploadOutcome::Failed(UploadError::Service(ref m)) if m == "AccessDenied"));
    }

    #[tokio::test]
    async fn synthesis_failure_is_fatal_and_skips_upload() {
        let tmp = tempfile::tempdir().unwrap();
        let failing = FakeSynth {
            fail: true,
            ..Default::default()
        };
        let narrator = Narrator::new(failing, FakeStore::new(StoreMode::ReadFile), tmp.path());

        let err = narrator.narrate("x", "b", "text").await.unwrap_err();
        assert!(matches!(err, NarrationError::Synthesis(_)));
        assert!(!tmp.path().join("x.mp3").exists());
        assert!(narrator.store.uploads.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unwritable_audio_dir_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let narrator = Narrator::new(
            synth(b"ID3"),
            FakeStore::new(StoreMode::ReadFile),
            tmp.path().join("does-not-exist"),
        );

        let err = narrator.narrate("x", "b", "text").await.unwrap_err();
        assert!(matches!(err, NarrationError::Write { .. }));
    }
}
