//! Pipeline orchestrator — drives decode → transcribe → translate → speak.
//!
//! [`Pipeline`] owns the injected [`ModelHandle`] plus the translator and
//! synthesizer seams.  Stage results are typed ([`PipelineOutput`]); the
//! presentation layer decides how to render failures.  The sentinel strings
//! live here because one of them is also pipeline *input*: a failed
//! transcription cascades its sentinel text into the translation call, which
//! is the behavior the original UI exhibits and is preserved deliberately.

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

use crate::audio::{decode_file, resample_to_16k, DecodeError};
use crate::speech::{SpeechError, SynthesizedAudio, Synthesizer};
use crate::stt::{ModelHandle, SttError};
use crate::translate::{TranslateError, TranslatorProvider};

/// Rendered in place of a transcript when the transcription stage failed.
pub const TRANSCRIPTION_SENTINEL: &str = "Transcription Error";
/// Rendered in place of a translation when the translation stage failed.
pub const TRANSLATION_SENTINEL: &str = "Translation Error";

// ---------------------------------------------------------------------------
// StageError
// ---------------------------------------------------------------------------

/// A failure in one pipeline stage.
///
/// Each stage catches its own failure; no stage failure ever aborts the
/// stages after it.
#[derive(Debug, Error)]
pub enum StageError {
    /// The uploaded file could not be decoded to PCM.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The STT engine failed (or no model is loaded).
    #[error(transparent)]
    Transcription(#[from] SttError),

    /// The translation backend failed (or the translator could not be
    /// constructed for the requested language).
    #[error(transparent)]
    Translation(#[from] TranslateError),

    /// The synthesis backend failed.
    #[error(transparent)]
    Synthesis(#[from] SpeechError),

    /// A blocking task panicked or was cancelled.
    #[error("internal task failure: {0}")]
    Task(String),
}

// ---------------------------------------------------------------------------
// PipelineOutput
// ---------------------------------------------------------------------------

/// Typed per-stage results of one transcribe-and-translate invocation.
///
/// Both fields are always populated: translation is attempted even when
/// transcription failed (see [`Pipeline::run_on_samples`]).
#[derive(Debug)]
pub struct PipelineOutput {
    /// Source-language transcript, or why transcription failed.
    pub transcription: Result<String, StageError>,
    /// Target-language text, or why translation failed.
    pub translation: Result<String, StageError>,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// The request-scoped processing pipeline.
///
/// Holds the model handle built once at startup and the two backend seams.
/// Cheap to clone; all fields are shared handles.
#[derive(Clone)]
pub struct Pipeline {
    model: ModelHandle,
    translators: Arc<dyn TranslatorProvider>,
    synthesizer: Arc<dyn Synthesizer>,
}

impl Pipeline {
    pub fn new(
        model: ModelHandle,
        translators: Arc<dyn TranslatorProvider>,
        synthesizer: Arc<dyn Synthesizer>,
    ) -> Self {
        Self {
            model,
            translators,
            synthesizer,
        }
    }

    /// Decode and resample an uploaded file, then run
    /// [`run_on_samples`](Self::run_on_samples).
    ///
    /// A decode failure is reported as the transcription stage failing —
    /// there is no transcript to produce — and translation is still
    /// attempted on the sentinel text.
    pub async fn transcribe_and_translate(
        &self,
        audio_path: &Path,
        target: &str,
    ) -> PipelineOutput {
        let path = audio_path.to_path_buf();
        let decoded = tokio::task::spawn_blocking(move || decode_file(&path))
            .await
            .map_err(|e| StageError::Task(e.to_string()));

        let samples = match decoded {
            Ok(Ok(audio)) => Ok(resample_to_16k(&audio.samples, audio.sample_rate)),
            Ok(Err(e)) => Err(StageError::from(e)),
            Err(e) => Err(e),
        };

        match samples {
            Ok(samples) => self.run_on_samples(&samples, target).await,
            Err(e) => {
                log::error!("audio decode failed: {e}");
                let translation = self.translate_text(TRANSCRIPTION_SENTINEL, target).await;
                PipelineOutput {
                    transcription: Err(e),
                    translation,
                }
            }
        }
    }

    /// Transcribe 16 kHz mono samples and translate the result.
    ///
    /// Translation is always attempted, even when transcription failed — in
    /// that case the transcription sentinel text is sent to the backend, as
    /// the original UI does.
    pub async fn run_on_samples(&self, samples: &[f32], target: &str) -> PipelineOutput {
        // Whisper inference is CPU-bound; keep it off the async workers.
        let model = self.model.clone();
        let audio = samples.to_vec();
        let transcription: Result<String, StageError> =
            match tokio::task::spawn_blocking(move || model.transcribe(&audio)).await {
                Ok(Ok(text)) => Ok(text),
                Ok(Err(e)) => {
                    log::error!("transcription failed: {e}");
                    Err(e.into())
                }
                Err(e) => {
                    log::error!("transcription task failed: {e}");
                    Err(StageError::Task(e.to_string()))
                }
            };

        let source_text = match &transcription {
            Ok(text) => text.clone(),
            Err(_) => TRANSCRIPTION_SENTINEL.to_string(),
        };

        let translation = self.translate_text(&source_text, target).await;

        PipelineOutput {
            transcription,
            translation,
        }
    }

    /// Construct a translator for `target` and translate `text`.
    async fn translate_text(&self, text: &str, target: &str) -> Result<String, StageError> {
        let translator = match self.translators.create(target) {
            Ok(t) => t,
            Err(e) => {
                log::error!("translator construction failed for '{target}': {e}");
                return Err(e.into());
            }
        };

        match translator.translate(text).await {
            Ok(translated) => Ok(translated),
            Err(e) => {
                log::error!("translation to '{target}' failed: {e}");
                Err(e.into())
            }
        }
    }

    /// Synthesize speech from `text`.
    ///
    /// Never fails: empty input and backend errors both degrade to `None`
    /// (with the error logged), so a "read aloud" press before any
    /// transcription exists simply produces nothing.
    pub async fn speak(&self, text: &str) -> Option<SynthesizedAudio> {
        if text.trim().is_empty() {
            log::debug!("speak called with empty text; skipping synthesis");
            return None;
        }

        match self.synthesizer.synthesize(text).await {
            Ok(audio) => Some(audio),
            Err(e) => {
                log::error!("speech synthesis failed: {e}");
                None
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Arc;

    use crate::speech::MockSynthesizer;
    use crate::stt::MockSttEngine;
    use crate::translate::{languages, TranslateError, Translator};

    // ── Mock translation seam ─────────────────────────────────────────────

    /// Echoes `[target] input` so tests can observe exactly what text was
    /// fed to the translation backend.
    struct EchoTranslator {
        target: String,
    }

    #[async_trait]
    impl Translator for EchoTranslator {
        async fn translate(&self, text: &str) -> Result<String, TranslateError> {
            Ok(format!("[{}] {}", self.target, text))
        }
    }

    struct EchoProvider;

    impl TranslatorProvider for EchoProvider {
        fn create(&self, target: &str) -> Result<Box<dyn Translator>, TranslateError> {
            if !languages::is_supported(target) {
                return Err(TranslateError::UnsupportedLanguage(target.to_string()));
            }
            Ok(Box::new(EchoTranslator {
                target: target.to_string(),
            }))
        }
    }

    /// Provider whose translators always fail mid-call.
    struct BrokenProvider;

    #[async_trait]
    impl Translator for BrokenTranslator {
        async fn translate(&self, _text: &str) -> Result<String, TranslateError> {
            Err(TranslateError::Request("connection refused".into()))
        }
    }

    struct BrokenTranslator;

    impl TranslatorProvider for BrokenProvider {
        fn create(&self, _target: &str) -> Result<Box<dyn Translator>, TranslateError> {
            Ok(Box::new(BrokenTranslator))
        }
    }

    // ── Helpers ───────────────────────────────────────────────────────────

    fn pipeline_with(model: ModelHandle, provider: Arc<dyn TranslatorProvider>) -> Pipeline {
        Pipeline::new(model, provider, Arc::new(MockSynthesizer::ok()))
    }

    fn loaded(text: &str) -> ModelHandle {
        ModelHandle::loaded(Arc::new(MockSttEngine::ok(text)))
    }

    // ── transcribe + translate ────────────────────────────────────────────

    #[tokio::test]
    async fn happy_path_transcribes_and_translates() {
        let pipeline = pipeline_with(loaded("hello world"), Arc::new(EchoProvider));
        let out = pipeline.run_on_samples(&[0.0f32; 16_000], "es").await;

        assert_eq!(out.transcription.unwrap(), "hello world");
        assert_eq!(out.translation.unwrap(), "[es] hello world");
    }

    #[tokio::test]
    async fn model_unavailable_yields_transcription_error_and_cascades() {
        let pipeline = pipeline_with(
            ModelHandle::unavailable("model missing"),
            Arc::new(EchoProvider),
        );
        let out = pipeline.run_on_samples(&[0.0f32; 16_000], "fr").await;

        assert!(matches!(
            out.transcription.unwrap_err(),
            StageError::Transcription(SttError::ModelUnavailable(_))
        ));
        // Translation was still attempted, fed the sentinel text.
        assert_eq!(
            out.translation.unwrap(),
            format!("[fr] {TRANSCRIPTION_SENTINEL}")
        );
    }

    #[tokio::test]
    async fn unsupported_language_fails_translation_only() {
        let pipeline = pipeline_with(loaded("hello"), Arc::new(EchoProvider));
        let out = pipeline.run_on_samples(&[0.0f32; 16_000], "xx").await;

        assert_eq!(out.transcription.unwrap(), "hello");
        assert!(matches!(
            out.translation.unwrap_err(),
            StageError::Translation(TranslateError::UnsupportedLanguage(_))
        ));
    }

    #[tokio::test]
    async fn translation_call_failure_is_typed_not_panicking() {
        let pipeline = pipeline_with(loaded("hello"), Arc::new(BrokenProvider));
        let out = pipeline.run_on_samples(&[0.0f32; 16_000], "de").await;

        assert_eq!(out.transcription.unwrap(), "hello");
        assert!(matches!(
            out.translation.unwrap_err(),
            StageError::Translation(TranslateError::Request(_))
        ));
    }

    #[tokio::test]
    async fn decode_failure_still_attempts_translation() {
        let pipeline = pipeline_with(loaded("unreached"), Arc::new(EchoProvider));
        let out = pipeline
            .transcribe_and_translate(Path::new("/nonexistent/upload.wav"), "es")
            .await;

        assert!(matches!(
            out.transcription.unwrap_err(),
            StageError::Decode(_)
        ));
        assert_eq!(
            out.translation.unwrap(),
            format!("[es] {TRANSCRIPTION_SENTINEL}")
        );
    }

    // ── speak ─────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn speak_empty_text_returns_none_without_error() {
        let pipeline = pipeline_with(loaded("x"), Arc::new(EchoProvider));
        assert!(pipeline.speak("").await.is_none());
        assert!(pipeline.speak("   \n\t").await.is_none());
    }

    #[tokio::test]
    async fn speak_failure_degrades_to_none() {
        let pipeline = Pipeline::new(
            loaded("x"),
            Arc::new(EchoProvider),
            Arc::new(MockSynthesizer::failing()),
        );
        assert!(pipeline.speak("some text").await.is_none());
    }

    #[tokio::test]
    async fn speak_returns_artifact_with_non_zero_length() {
        let pipeline = pipeline_with(loaded("x"), Arc::new(EchoProvider));
        let audio = pipeline.speak("hola mundo").await.expect("artifact");
        assert!(audio.byte_len > 0);
        assert!(audio.path.exists());
        std::fs::remove_file(&audio.path).ok();
    }

    // ── end-to-end ───────────────────────────────────────────────────────

    #[tokio::test]
    async fn end_to_end_transcribe_translate_speak() {
        let pipeline = pipeline_with(loaded("hello world"), Arc::new(EchoProvider));

        let out = pipeline.run_on_samples(&[0.0f32; 16_000], "es").await;
        let transcription = out.transcription.unwrap();
        assert_eq!(transcription, "hello world");

        let translation = out.translation.unwrap();
        assert!(!translation.is_empty());

        let audio = pipeline.speak(&translation).await.expect("audio");
        assert!(audio.byte_len > 0);
        std::fs::remove_file(&audio.path).ok();
    }
}
