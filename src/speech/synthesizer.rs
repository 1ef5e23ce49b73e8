//! Core `Synthesizer` trait and the HTTP backend implementation.
//!
//! `HttpSynthesizer` posts text to a TTS service and receives raw audio
//! bytes back, which are written to a uniquely-named temporary file.  The
//! returned [`SynthesizedAudio`] hands ownership of that file to the caller;
//! the pipeline never deletes it.

use std::path::PathBuf;

use async_trait::async_trait;
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::config::SpeechConfig;

// ---------------------------------------------------------------------------
// SpeechError
// ---------------------------------------------------------------------------

/// Errors that can occur during speech synthesis.
#[derive(Debug, Error)]
pub enum SpeechError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("synthesis request timed out")]
    Timeout,

    /// The backend answered with a non-success status.
    #[error("synthesis backend returned status {0}")]
    Backend(u16),

    /// The backend returned zero audio bytes.
    #[error("synthesis backend returned no audio")]
    EmptyAudio,

    /// Writing the audio artifact to disk failed.
    #[error("failed to write audio artifact: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for SpeechError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SpeechError::Timeout
        } else {
            SpeechError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// SynthesizedAudio
// ---------------------------------------------------------------------------

/// A synthesized speech artifact on transient storage.
///
/// Ownership of the file belongs to whoever holds this value; the synthesis
/// step never cleans it up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedAudio {
    /// Path to the generated audio file.
    pub path: PathBuf,
    /// Size of the audio payload in bytes (always non-zero).
    pub byte_len: u64,
}

// ---------------------------------------------------------------------------
// Synthesizer trait
// ---------------------------------------------------------------------------

/// Async trait for text-to-speech backends.
///
/// Implementors must be `Send + Sync` so they can be shared across request
/// handlers (e.g. wrapped in `Arc<dyn Synthesizer>`).
///
/// No constraint is placed on text length or language; the backend infers
/// the language from the content.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Synthesize `text` into a playable audio artifact.
    async fn synthesize(&self, text: &str) -> Result<SynthesizedAudio, SpeechError>;
}

// ---------------------------------------------------------------------------
// HttpSynthesizer
// ---------------------------------------------------------------------------

/// Calls an HTTP TTS endpoint (`POST {base_url}/api/tts`) and stores the
/// returned audio bytes in a fresh temp file per call.
///
/// File naming relies on the uniqueness guarantee of the temp-file facility;
/// there is no reuse and no collision handling beyond that.
pub struct HttpSynthesizer {
    client: reqwest::Client,
    config: SpeechConfig,
}

impl HttpSynthesizer {
    /// Build a synthesizer from application config.
    ///
    /// The HTTP client is pre-configured with the per-request timeout from
    /// `config.timeout_secs`.
    pub fn from_config(config: &SpeechConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }

    /// Write `bytes` to a uniquely-named `.mp3` temp file and release
    /// ownership to the caller.
    fn write_artifact(bytes: &[u8]) -> Result<SynthesizedAudio, SpeechError> {
        let file = NamedTempFile::with_suffix(".mp3")?;
        std::fs::write(file.path(), bytes)?;
        // keep() detaches the file from the guard: the caller now owns the
        // artifact's lifecycle.
        let (_, path) = file.keep().map_err(|e| SpeechError::Io(e.error))?;
        Ok(SynthesizedAudio {
            path,
            byte_len: bytes.len() as u64,
        })
    }
}

#[async_trait]
impl Synthesizer for HttpSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<SynthesizedAudio, SpeechError> {
        let url = format!("{}/api/tts", self.config.base_url);

        let body = serde_json::json!({
            "text":  text,
            "voice": self.config.voice,
        });

        let response = self.client.post(&url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SpeechError::Backend(status.as_u16()));
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(SpeechError::EmptyAudio);
        }

        Self::write_artifact(&bytes)
    }
}

// ---------------------------------------------------------------------------
// MockSynthesizer  (test-only)
// ---------------------------------------------------------------------------

/// A test double that writes a fixed byte pattern without any network call,
/// or fails with a configured error.
#[cfg(test)]
pub struct MockSynthesizer {
    fail: bool,
}

#[cfg(test)]
impl MockSynthesizer {
    pub fn ok() -> Self {
        Self { fail: false }
    }

    pub fn failing() -> Self {
        Self { fail: true }
    }
}

#[cfg(test)]
#[async_trait]
impl Synthesizer for MockSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<SynthesizedAudio, SpeechError> {
        if self.fail {
            return Err(SpeechError::Backend(503));
        }
        // Deterministic non-empty payload derived from the input.
        let payload = format!("FAKE-MP3:{text}");
        HttpSynthesizer::write_artifact(payload.as_bytes())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_config_builds_without_panic() {
        let _synth = HttpSynthesizer::from_config(&SpeechConfig::default());
    }

    #[test]
    fn write_artifact_creates_owned_file() {
        let audio = HttpSynthesizer::write_artifact(b"abc123").expect("write");
        assert_eq!(audio.byte_len, 6);
        assert!(audio.path.exists());
        let content = std::fs::read(&audio.path).expect("read back");
        assert_eq!(content, b"abc123");

        // Caller-owned lifecycle: we delete it, nobody else will.
        std::fs::remove_file(&audio.path).expect("cleanup");
    }

    #[test]
    fn write_artifact_paths_are_unique_per_call() {
        let a = HttpSynthesizer::write_artifact(b"one").expect("first");
        let b = HttpSynthesizer::write_artifact(b"two").expect("second");
        assert_ne!(a.path, b.path);
        std::fs::remove_file(&a.path).ok();
        std::fs::remove_file(&b.path).ok();
    }

    #[tokio::test]
    async fn mock_ok_returns_non_empty_artifact() {
        let synth = MockSynthesizer::ok();
        let audio = synth.synthesize("hola mundo").await.expect("synthesize");
        assert!(audio.byte_len > 0);
        assert!(audio.path.exists());
        std::fs::remove_file(&audio.path).ok();
    }

    #[tokio::test]
    async fn mock_failing_returns_backend_error() {
        let synth = MockSynthesizer::failing();
        let err = synth.synthesize("text").await.unwrap_err();
        assert!(matches!(err, SpeechError::Backend(503)));
    }

    /// Verify that `HttpSynthesizer` is object-safe (usable as `dyn Synthesizer`).
    #[test]
    fn synthesizer_is_object_safe() {
        let synth: Box<dyn Synthesizer> =
            Box::new(HttpSynthesizer::from_config(&SpeechConfig::default()));
        drop(synth);
    }
}
