//! Text-to-speech module.
//!
//! This module provides:
//! * [`Synthesizer`] — async trait implemented by TTS backends.
//! * [`HttpSynthesizer`] — REST backend (the production implementation).
//! * [`SynthesizedAudio`] — a caller-owned audio artifact on disk.
//! * [`SpeechError`] — error variants for synthesis operations.

pub mod synthesizer;

pub use synthesizer::{HttpSynthesizer, SpeechError, SynthesizedAudio, Synthesizer};

#[cfg(test)]
pub use synthesizer::MockSynthesizer;
