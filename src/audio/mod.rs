//! Audio handling for uploaded files.
//!
//! Two steps turn an upload into Whisper-ready input:
//!
//! 1. [`decode_file`] — probe and decode wav/mp3/m4a to mono `f32` PCM.
//! 2. [`resample_to_16k`] — convert from the source rate to 16 000 Hz.

pub mod decode;
pub mod resample;

pub use decode::{decode_file, DecodeError, DecodedAudio};
pub use resample::resample_to_16k;
