//! Voxlate — transcribe, translate and speak uploaded audio over HTTP.
//!
//! An uploaded audio file is decoded and resampled ([`audio`]), transcribed
//! with Whisper ([`stt`]), translated via an HTTP backend ([`translate`]),
//! and optionally synthesized back to speech ([`speech`]).  The [`pipeline`]
//! module orchestrates the stages with typed per-stage results; the
//! [`server`] module exposes them behind an axum router with a browser UI.

pub mod audio;
pub mod config;
pub mod pipeline;
pub mod server;
pub mod speech;
pub mod stt;
pub mod translate;
