//! Decoding of uploaded audio files into PCM samples.
//!
//! Uploads arrive as whatever the browser hands us — wav, mp3 or m4a in
//! practice.  [`decode_file`] probes the container with `symphonia`, decodes
//! the first audio track and returns the first channel as `f32` PCM together
//! with the source sample rate.  No format validation happens before the
//! decode call; an unreadable file simply surfaces as a [`DecodeError`].

use std::fs::File;
use std::path::Path;

use symphonia::core::audio::{AudioBufferRef, Signal};
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::conv::FromSample;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use thiserror::Error;

// ---------------------------------------------------------------------------
// DecodeError
// ---------------------------------------------------------------------------

/// Errors that can occur while decoding an uploaded audio file.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The file could not be opened.
    #[error("failed to open audio file: {0}")]
    Io(#[from] std::io::Error),

    /// The container format was not recognised or is corrupt.
    #[error("unrecognised or corrupt audio container: {0}")]
    Probe(String),

    /// No decodable audio track was found in the container.
    #[error("no supported audio track found in input")]
    NoAudioTrack,

    /// The codec is not supported by the enabled symphonia features.
    #[error("unsupported codec: {0}")]
    UnsupportedCodec(String),

    /// A packet failed to decode part-way through the stream.
    #[error("decode failed: {0}")]
    Decode(String),

    /// The track reported no sample rate.
    #[error("audio track has no sample rate")]
    MissingSampleRate,
}

// ---------------------------------------------------------------------------
// DecodedAudio
// ---------------------------------------------------------------------------

/// PCM samples extracted from an uploaded file.
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// Mono `f32` samples (first channel of the source track).
    pub samples: Vec<f32>,
    /// Sample rate of the source track in Hz.
    pub sample_rate: u32,
}

// ---------------------------------------------------------------------------
// decode_file
// ---------------------------------------------------------------------------

/// Decode an audio file at `path` to mono `f32` PCM.
///
/// Only the first channel of the first decodable track is kept — speech
/// recordings are effectively mono and Whisper wants a single channel
/// anyway.  The result still needs resampling to 16 kHz; see
/// [`crate::audio::resample_to_16k`].
///
/// # Errors
///
/// Any I/O, probe, codec or packet-level failure is returned as a
/// [`DecodeError`]; nothing panics on malformed input.
pub fn decode_file(path: impl AsRef<Path>) -> Result<DecodedAudio, DecodeError> {
    let src = File::open(path.as_ref())?;
    let mss = MediaSourceStream::new(Box::new(src), Default::default());

    let hint = Hint::new();
    let meta_opts: MetadataOptions = Default::default();
    let fmt_opts: FormatOptions = Default::default();

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &fmt_opts, &meta_opts)
        .map_err(|e| DecodeError::Probe(e.to_string()))?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or(DecodeError::NoAudioTrack)?;

    let dec_opts: DecoderOptions = Default::default();
    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &dec_opts)
        .map_err(|e| DecodeError::UnsupportedCodec(e.to_string()))?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or(DecodeError::MissingSampleRate)?;

    let mut samples = Vec::new();
    while let Ok(packet) = format.next_packet() {
        while !format.metadata().is_latest() {
            format.metadata().pop();
        }
        if packet.track_id() != track_id {
            continue;
        }
        let decoded = decoder
            .decode(&packet)
            .map_err(|e| DecodeError::Decode(e.to_string()))?;
        append_channel0(&mut samples, decoded);
    }

    Ok(DecodedAudio {
        samples,
        sample_rate,
    })
}

/// Append channel 0 of a decoded buffer to `samples`, converting every
/// sample format symphonia can hand back into `f32`.
fn append_channel0(samples: &mut Vec<f32>, buf: AudioBufferRef<'_>) {
    fn conv<T>(samples: &mut Vec<f32>, data: std::borrow::Cow<symphonia::core::audio::AudioBuffer<T>>)
    where
        T: symphonia::core::sample::Sample,
        f32: FromSample<T>,
    {
        samples.extend(data.chan(0).iter().map(|v| f32::from_sample(*v)));
    }

    match buf {
        AudioBufferRef::F32(data) => samples.extend(data.chan(0)),
        AudioBufferRef::U8(data) => conv(samples, data),
        AudioBufferRef::U16(data) => conv(samples, data),
        AudioBufferRef::U24(data) => conv(samples, data),
        AudioBufferRef::U32(data) => conv(samples, data),
        AudioBufferRef::S8(data) => conv(samples, data),
        AudioBufferRef::S16(data) => conv(samples, data),
        AudioBufferRef::S24(data) => conv(samples, data),
        AudioBufferRef::S32(data) => conv(samples, data),
        AudioBufferRef::F64(data) => conv(samples, data),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
