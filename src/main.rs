//! Application entry point — Voxlate.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Load the Whisper model into a [`ModelHandle`] — a load failure
//!    degrades to `Unavailable` so the server still comes up.
//! 4. Build the translator provider and synthesizer from config.
//! 5. Build the [`Pipeline`] and [`AppState`].
//! 6. Bind the listener and serve the router.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use voxlate::config::{AppConfig, AppPaths};
use voxlate::pipeline::Pipeline;
use voxlate::server::{create_router, AppState};
use voxlate::speech::HttpSynthesizer;
use voxlate::stt::{ModelHandle, TranscribeParams, WhisperEngine};
use voxlate::translate::HttpTranslatorProvider;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Voxlate starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    // 3. Whisper model → ModelHandle (degrade gracefully on load failure)
    let model_path = AppPaths::new()
        .models_dir
        .join(format!("{}.bin", config.stt.model));

    let params = TranscribeParams {
        language: config.stt.language.clone(),
        ..TranscribeParams::default()
    };

    let model = match WhisperEngine::load(&model_path, params) {
        Ok(engine) => {
            log::info!("Whisper model loaded: {}", model_path.display());
            ModelHandle::loaded(Arc::new(engine))
        }
        Err(e) => {
            log::warn!(
                "Could not load Whisper model ({}): {e}. Transcription will report an error.",
                model_path.display()
            );
            ModelHandle::unavailable(e.to_string())
        }
    };

    // 4. Backend seams
    let translators = Arc::new(HttpTranslatorProvider::new(config.translate.clone()));
    let synthesizer = Arc::new(HttpSynthesizer::from_config(&config.speech));

    // 5. Pipeline + state
    let pipeline = Pipeline::new(model, translators, synthesizer);
    let state = AppState::new(pipeline, config.server.mount_path.clone());
    let router = create_router(state);

    // 6. Serve
    let port = config.server.effective_port();
    let addr: SocketAddr = format!("{}:{port}", config.server.host).parse()?;
    log::info!(
        "Listening on {addr} (UI mounted at {})",
        config.server.mount_path
    );

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
