#![forbid(unsafe_code)]
//! Phase vocoder pitch shifting for mono audio.
//!
//! `pitchshift` raises or lowers the pitch of a signal by a number of
//! semitones without changing its duration. Each short-time spectral frame
//! keeps its magnitudes while its phases are re-derived from per-bin
//! instantaneous frequency, so the frames overlap-add coherently at a
//! synthesis hop of `HOP * 2^(semitones / 12)`. The resulting time-stretched
//! signal is then linearly resampled back to the original length, which
//! moves every frequency by the same ratio.
//!
//! # Quick Start
//!
//! ```
//! use pitchshift::ShiftParams;
//!
//! // 1 second of 440 Hz sine at 44.1 kHz on a 16-bit scale
//! let input: Vec<f64> = (0..44100)
//!     .map(|i| 8000.0 * (2.0 * std::f64::consts::PI * 440.0 * i as f64 / 44100.0).sin())
//!     .collect();
//!
//! // One octave up
//! let params = ShiftParams::new(12);
//! let output = pitchshift::pitch_shift(&input, &params).unwrap();
//! assert_eq!(output.len(), input.len());
//! ```
//!
//! # Files
//!
//! ```no_run
//! use pitchshift::ShiftParams;
//!
//! let params = ShiftParams::new(-3).with_blend(0.8);
//! pitchshift::pitch_shift_wav_file("in.wav", "out.wav", &params).unwrap();
//! ```

pub mod analysis;
pub mod core;
pub mod duration;
pub mod error;
pub mod io;
pub mod spectral;
pub mod vocoder;

use std::path::Path;
use std::sync::atomic::AtomicBool;

pub use crate::core::params::{Hops, ShiftParams};
pub use crate::core::types::{AudioBuffer, Sample};
pub use crate::core::window::WindowType;
pub use error::PitchShiftError;
pub use spectral::{SpectralFrame, Stft};
pub use vocoder::PhaseVocoder;

/// Validates that input is non-empty and contains only finite samples.
#[inline]
fn validate_input(input: &[Sample]) -> Result<(), PitchShiftError> {
    if input.is_empty() {
        return Err(PitchShiftError::EmptyInput);
    }
    if input.iter().any(|s| !s.is_finite()) {
        return Err(PitchShiftError::NonFiniteInput);
    }
    Ok(())
}

/// Shifts the pitch of a mono signal by `params.pitch_semitones`.
///
/// With `params.resample` (the default) the output has exactly
/// `input.len()` samples and is mixed with the input by `params.blend`.
/// Without it, the time-stretched resynthesis of
/// `ceil(input.len() * HOP_OUT / HOP)` samples is returned as is.
///
/// # Errors
///
/// Returns [`PitchShiftError::InvalidConfig`] for degenerate parameters,
/// [`PitchShiftError::EmptyInput`] or [`PitchShiftError::NonFiniteInput`]
/// for unusable input.
pub fn pitch_shift(input: &[Sample], params: &ShiftParams) -> Result<Vec<Sample>, PitchShiftError> {
    pitch_shift_cancellable(input, params, &AtomicBool::new(false))
}

/// Like [`pitch_shift`], but aborts with [`PitchShiftError::Cancelled`] when
/// `cancel` is set before any spectral frame is processed.
pub fn pitch_shift_cancellable(
    input: &[Sample],
    params: &ShiftParams,
    cancel: &AtomicBool,
) -> Result<Vec<Sample>, PitchShiftError> {
    let hops = params.hops()?;
    validate_input(input)?;

    if !(0.0..=1.0).contains(&params.blend) {
        log::warn!("blend {} is outside [0, 1]; the mix will be amplified or inverted", params.blend);
    }
    log::debug!("pitch shift of {} samples: {}", input.len(), params);

    let transform = Stft::new(params.chunk_size, params.window)?;
    let frames = transform.analyze(input, hops.analysis)?;

    let mut vocoder = PhaseVocoder::new(params.chunk_size, hops)?;
    let adjusted = vocoder.process_cancellable(&frames, cancel)?;

    let synth_len = duration::synthesis_len(hops, input.len(), params.resample);
    let stretched = transform.synthesize(&adjusted, hops.synthesis, synth_len)?;

    duration::finalize(stretched, input, hops, params.resample, params.blend)
}

/// Pitch-shifts the selected channel of an [`AudioBuffer`].
///
/// The channel is `params.channel` (0 by default). The result is a mono
/// buffer at the source sample rate and bit depth, with samples clamped to
/// the integer range and truncated toward zero.
///
/// # Errors
///
/// Returns [`PitchShiftError::ChannelOutOfRange`] if the channel does not
/// exist, plus everything [`pitch_shift`] returns.
pub fn pitch_shift_buffer(
    buffer: &AudioBuffer,
    params: &ShiftParams,
) -> Result<AudioBuffer, PitchShiftError> {
    let mono = buffer.channel(params.channel)?;
    let output = pitch_shift(&mono, params)?;
    AudioBuffer::from_mono_samples(&output, buffer.sample_rate, buffer.bits_per_sample)
}

/// Reads a WAV file, pitch-shifts it, and writes the result to another WAV file.
///
/// The output is mono integer PCM at the source sample rate and bit depth.
/// Nothing is written if reading or processing fails.
///
/// # Errors
///
/// Returns [`PitchShiftError::Io`] if the files cannot be read or written,
/// [`PitchShiftError::UnsupportedFormat`] if the input is not a usable WAV file,
/// plus everything [`pitch_shift_buffer`] returns.
pub fn pitch_shift_wav_file(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    params: &ShiftParams,
) -> Result<AudioBuffer, PitchShiftError> {
    let buffer = io::wav::read_wav_file(input_path)?;
    let result = pitch_shift_buffer(&buffer, params)?;
    io::wav::write_wav_file(output_path, &result)?;
    Ok(result)
}
