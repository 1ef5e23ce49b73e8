//! STT (Speech-to-Text) engine module.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use voxlate::stt::{WhisperEngine, TranscribeParams, SttEngine};
//!
//! let params = TranscribeParams::default(); // language = "auto", Greedy { best_of: 1 }
//! let engine = WhisperEngine::load("models/ggml-base.bin", params)
//!     .expect("model not found");
//!
//! // audio: 16 kHz, mono, f32 PCM from the audio module
//! let audio: Vec<f32> = vec![0.0; 16_000]; // 1 s of silence
//! let text = engine.transcribe(&audio).unwrap();
//! println!("{text}");
//! ```

pub mod engine;
pub mod transcribe;

// ── Public re-exports ──────────────────────────────────────────────────────

pub use engine::{ModelHandle, SttEngine, SttError, WhisperEngine};
pub use transcribe::{SamplingStrategy, Segment, TranscribeParams, TranscriptionResult};

// test-only re-export so other test modules can import MockSttEngine
// without `use voxlate::stt::engine::MockSttEngine`.
#[cfg(test)]
pub use engine::MockSttEngine;
