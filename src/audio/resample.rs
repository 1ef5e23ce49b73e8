//! Resampling of decoded uploads to the rate Whisper expects.
//!
//! The Whisper STT engine requires **16 kHz mono `f32`** audio, while
//! uploaded files arrive at whatever rate they were recorded at (44.1 kHz
//! and 48 kHz being the common cases).  [`resample_to_16k`] converts with
//! linear interpolation — fast, zero extra deps, and more than adequate for
//! speech.

/// Resample `samples` from `source_rate` Hz to 16 000 Hz using linear
/// interpolation.
///
/// * If `source_rate` is already `16_000` the input is cloned and returned
///   unchanged (no-op fast path — no interpolation performed).
/// * If `samples` is empty an empty vector is returned.
///
/// The output length is approximately
/// `samples.len() * 16_000 / source_rate`.
///
/// # Example
///
/// ```rust
/// use voxlate::audio::resample_to_16k;
///
/// // Already 16 kHz — no-op
/// let mono_16k = vec![0.1_f32; 160];
/// let out = resample_to_16k(&mono_16k, 16_000);
/// assert_eq!(out.len(), mono_16k.len());
///
/// // Downsample from 48 kHz to 16 kHz (ratio = 1/3)
/// let hi = vec![0.5_f32; 480];
/// let lo = resample_to_16k(&hi, 48_000);
/// assert_eq!(lo.len(), 160);
/// ```
pub fn resample_to_16k(samples: &[f32], source_rate: u32) -> Vec<f32> {
    const TARGET_RATE: u32 = 16_000;

    if source_rate == TARGET_RATE {
        return samples.to_vec();
    }

    if samples.is_empty() {
        return Vec::new();
    }

    let ratio = TARGET_RATE as f64 / source_rate as f64;
    let output_len = (samples.len() as f64 * ratio).ceil() as usize;
    let mut output = Vec::with_capacity(output_len);

    for i in 0..output_len {
        let src_pos = i as f64 / ratio;
        let idx = src_pos as usize;
        let frac = src_pos - idx as f64;

        let sample = if idx + 1 < samples.len() {
            // Linear interpolation between adjacent samples
            samples[idx] * (1.0 - frac as f32) + samples[idx + 1] * frac as f32
        } else if idx < samples.len() {
            samples[idx]
        } else {
            0.0
        };

        output.push(sample);
    }

    output
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
