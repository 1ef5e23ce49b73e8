//! Request handlers.
//!
//! Stage failures never surface as HTTP errors: the transcribe endpoint
//! renders the sentinel strings in place of missing text, and the speak
//! endpoint answers `204 No Content` when there is nothing to play.  Only a
//! malformed request (missing multipart fields) earns a `400`.

use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::pipeline::{TRANSCRIPTION_SENTINEL, TRANSLATION_SENTINEL};
use crate::server::state::AppState;
use crate::server::ui;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Body of the root health route.
#[derive(Debug, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
}

/// Body of the transcribe endpoint: each field is either real text or its
/// sentinel string.
#[derive(Debug, Serialize, Deserialize)]
pub struct TranscribeResponse {
    pub transcription: String,
    pub translation: String,
}

/// Body accepted by the speak endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct SpeakRequest {
    pub text: String,
}

// ---------------------------------------------------------------------------
// GET /
// ---------------------------------------------------------------------------

/// Static health payload announcing the UI mount point.  Independent of all
/// application state, including whether a model loaded.
pub async fn root_handler(State(state): State<AppState>) -> Json<RootResponse> {
    Json(RootResponse {
        message: format!("Web UI is running at {}", state.mount_path),
    })
}

// ---------------------------------------------------------------------------
// GET {mount}
// ---------------------------------------------------------------------------

/// Serve the browser UI page.
pub async fn ui_handler(State(state): State<AppState>) -> Html<String> {
    Html(ui::render_page(&state.mount_path))
}

// ---------------------------------------------------------------------------
// POST {mount}/api/transcribe
// ---------------------------------------------------------------------------

/// Accept a multipart upload (`audio` file + `target_language` field), run
/// the pipeline, and render each stage result or its sentinel.
pub async fn transcribe_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<TranscribeResponse>, StatusCode> {
    let mut audio_bytes = None;
    let mut target = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| StatusCode::BAD_REQUEST)?
    {
        match field.name() {
            Some("audio") => {
                audio_bytes = Some(field.bytes().await.map_err(|_| StatusCode::BAD_REQUEST)?);
            }
            Some("target_language") => {
                target = Some(field.text().await.map_err(|_| StatusCode::BAD_REQUEST)?);
            }
            _ => {}
        }
    }

    let audio = audio_bytes.ok_or(StatusCode::BAD_REQUEST)?;
    let target = target.ok_or(StatusCode::BAD_REQUEST)?;

    // Scratch file for the upload; unlike synthesized artifacts this one is
    // ours and is removed when the guard drops.
    let scratch = tempfile::NamedTempFile::new().map_err(|e| {
        log::error!("failed to create upload scratch file: {e}");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    std::fs::write(scratch.path(), &audio).map_err(|e| {
        log::error!("failed to write upload scratch file: {e}");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let out = state
        .pipeline
        .transcribe_and_translate(scratch.path(), &target)
        .await;

    Ok(Json(TranscribeResponse {
        transcription: out
            .transcription
            .unwrap_or_else(|_| TRANSCRIPTION_SENTINEL.to_string()),
        translation: out
            .translation
            .unwrap_or_else(|_| TRANSLATION_SENTINEL.to_string()),
    }))
}

// ---------------------------------------------------------------------------
// POST {mount}/api/speak
// ---------------------------------------------------------------------------

/// Synthesize speech from the posted text.  Answers audio bytes on success,
/// `204 No Content` when synthesis produced nothing (empty text, backend
/// failure, unreadable artifact).
pub async fn speak_handler(
    State(state): State<AppState>,
    Json(req): Json<SpeakRequest>,
) -> Response {
    match state.pipeline.speak(&req.text).await {
        Some(audio) => match tokio::fs::read(&audio.path).await {
            Ok(bytes) => ([(header::CONTENT_TYPE, "audio/mpeg")], bytes).into_response(),
            Err(e) => {
                log::error!("failed to read synthesized artifact: {e}");
                StatusCode::NO_CONTENT.into_response()
            }
        },
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::pipeline::Pipeline;
    use crate::server::router::create_router;
    use crate::speech::MockSynthesizer;
    use crate::stt::{MockSttEngine, ModelHandle};
    use crate::translate::{
        languages, TranslateError, Translator, TranslatorProvider,
    };

    // ── Mocks ────────────────────────────────────────────────────────────

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

    fn state_with_model(model: ModelHandle) -> AppState {
        let pipeline = Pipeline::new(model, Arc::new(EchoProvider), Arc::new(MockSynthesizer::ok()));
        AppState::new(pipeline, "/app")
    }

    fn default_state() -> AppState {
        state_with_model(ModelHandle::loaded(Arc::new(MockSttEngine::ok(
            "hello world",
        ))))
    }

    // ── Helpers ──────────────────────────────────────────────────────────

    /// Minimal 16 kHz mono 16-bit PCM WAV (10 ms of a quiet tone).
    fn wav_bytes() -> Vec<u8> {
        let n_samples: u32 = 160;
        let data_len = n_samples * 2;
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
        bytes.extend_from_slice(b"WAVE");
        bytes.extend_from_slice(b"fmt ");
        bytes.extend_from_slice(&16u32.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&16_000u32.to_le_bytes());
        bytes.extend_from_slice(&32_000u32.to_le_bytes());
        bytes.extend_from_slice(&2u16.to_le_bytes());
        bytes.extend_from_slice(&16u16.to_le_bytes());
        bytes.extend_from_slice(b"data");
        bytes.extend_from_slice(&data_len.to_le_bytes());
        for i in 0..n_samples {
            let s = ((i as f32 * 0.1).sin() * 8_000.0) as i16;
            bytes.extend_from_slice(&s.to_le_bytes());
        }
        bytes
    }

    const BOUNDARY: &str = "test-boundary";

    fn multipart_body(audio: Option<&[u8]>, target: Option<&str>) -> Vec<u8> {
        let mut body = Vec::new();
        if let Some(target) = target {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; \
                     name=\"target_language\"\r\n\r\n{target}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some(audio) = audio {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; \
                     name=\"audio\"; filename=\"upload.wav\"\r\n\
                     Content-Type: audio/wav\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(audio);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn transcribe_request(audio: Option<&[u8]>, target: Option<&str>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/app/api/transcribe")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(audio, target)))
            .unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    // ── GET / ────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn root_returns_literal_message() {
        let router = create_router(default_state());
        let response = router
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], br#"{"message":"Web UI is running at /app"}"#);
    }

    #[tokio::test]
    async fn root_message_is_state_independent() {
        // Even with no model loaded the health payload is identical.
        let router = create_router(state_with_model(ModelHandle::unavailable("no model")));
        let response = router
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["message"], "Web UI is running at /app");
    }

    // ── GET /app ─────────────────────────────────────────────────────────

    #[tokio::test]
    async fn ui_page_is_served_at_mount_path() {
        let router = create_router(default_state());
        let response = router
            .oneshot(Request::builder().uri("/app").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let page = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(page.contains("Transcribe and Translate"));
    }

    // ── POST /app/api/transcribe ─────────────────────────────────────────

    #[tokio::test]
    async fn transcribe_happy_path() {
        let router = create_router(default_state());
        let response = router
            .oneshot(transcribe_request(Some(&wav_bytes()), Some("es")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["transcription"], "hello world");
        assert_eq!(json["translation"], "[es] hello world");
    }

    #[tokio::test]
    async fn transcribe_without_model_renders_sentinels() {
        let router = create_router(state_with_model(ModelHandle::unavailable("load failed")));
        let response = router
            .oneshot(transcribe_request(Some(&wav_bytes()), Some("es")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["transcription"], "Transcription Error");
        // Translation still ran, fed the sentinel text (cascade preserved).
        assert_eq!(json["translation"], "[es] Transcription Error");
    }

    #[tokio::test]
    async fn transcribe_unsupported_language_renders_translation_sentinel() {
        let router = create_router(default_state());
        let response = router
            .oneshot(transcribe_request(Some(&wav_bytes()), Some("xx")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["transcription"], "hello world");
        assert_eq!(json["translation"], "Translation Error");
    }

    #[tokio::test]
    async fn transcribe_undecodable_upload_renders_sentinel_not_500() {
        let router = create_router(default_state());
        let response = router
            .oneshot(transcribe_request(Some(b"not audio at all"), Some("fr")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["transcription"], "Transcription Error");
    }

    #[tokio::test]
    async fn transcribe_missing_audio_field_is_bad_request() {
        let router = create_router(default_state());
        let response = router
            .oneshot(transcribe_request(None, Some("es")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn transcribe_missing_language_field_is_bad_request() {
        let router = create_router(default_state());
        let response = router
            .oneshot(transcribe_request(Some(&wav_bytes()), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    // ── POST /app/api/speak ──────────────────────────────────────────────

    fn speak_request(text: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/app/api/speak")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                serde_json::to_vec(&SpeakRequest { text: text.into() }).unwrap(),
            ))
            .unwrap()
    }

    #[tokio::test]
    async fn speak_returns_audio_bytes() {
        let router = create_router(default_state());
        let response = router.oneshot(speak_request("hola mundo")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "audio/mpeg"
        );
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert!(!bytes.is_empty());
    }

    #[tokio::test]
    async fn speak_empty_text_is_no_content() {
        let router = create_router(default_state());
        let response = router.oneshot(speak_request("")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn speak_backend_failure_is_no_content() {
        let pipeline = Pipeline::new(
            ModelHandle::loaded(Arc::new(MockSttEngine::ok("x"))),
            Arc::new(EchoProvider),
            Arc::new(MockSynthesizer::failing()),
        );
        let router = create_router(AppState::new(pipeline, "/app"));
        let response = router.oneshot(speak_request("some text")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
}
