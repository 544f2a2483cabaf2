use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

use crate::core::fft::{COMPLEX_ZERO, WINDOW_SUM_EPSILON, WINDOW_SUM_FLOOR_RATIO};
use crate::core::window::{generate_window, WindowType};
use crate::error::PitchShiftError;

/// One complex spectrum, `frame_size` bins (full FFT, both halves).
pub type SpectralFrame = Vec<Complex<f64>>;

/// Cached forward/inverse FFT plans and window for one frame size.
///
/// Frames are centred: the signal is padded with `frame_size / 2` zeros on
/// both sides before analysis, and the same offset is removed after
/// synthesis. Frame `i` therefore describes the neighbourhood of sample
/// `i * hop` in both the analysis and the synthesis time base.
pub struct Stft {
    frame_size: usize,
    window: Vec<f64>,
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
}

impl Stft {
    /// Plans the transforms for `frame_size`-sample frames.
    pub fn new(frame_size: usize, window_type: WindowType) -> Result<Self, PitchShiftError> {
        if frame_size == 0 {
            return Err(PitchShiftError::InvalidConfig(
                "frame size must be greater than 0".to_string(),
            ));
        }
        let mut planner = FftPlanner::new();
        Ok(Self {
            frame_size,
            window: generate_window(window_type, frame_size),
            forward: planner.plan_fft_forward(frame_size),
            inverse: planner.plan_fft_inverse(frame_size),
        })
    }

    #[inline]
    fn pad(&self) -> usize {
        self.frame_size / 2
    }

    /// Number of frames produced for a signal of `len` samples at `hop`.
    pub fn num_frames(&self, len: usize, hop: usize) -> usize {
        len.div_ceil(hop) + 1
    }

    /// Windows and transforms `signal` into frames spaced `hop` samples apart.
    pub fn analyze(&self, signal: &[f64], hop: usize) -> Result<Vec<SpectralFrame>, PitchShiftError> {
        if hop == 0 {
            return Err(PitchShiftError::InvalidConfig(
                "analysis hop must be greater than 0".to_string(),
            ));
        }
        if signal.is_empty() {
            return Err(PitchShiftError::EmptyInput);
        }

        let pad = self.pad();
        let num_frames = self.num_frames(signal.len(), hop);
        let padded_len = (num_frames - 1) * hop + self.frame_size;
        let mut padded = vec![0.0f64; padded_len];
        padded[pad..pad + signal.len()].copy_from_slice(signal);

        let mut frames = Vec::with_capacity(num_frames);
        for frame_idx in 0..num_frames {
            let start = frame_idx * hop;
            let mut buffer: SpectralFrame = padded[start..start + self.frame_size]
                .iter()
                .zip(self.window.iter())
                .map(|(&s, &w)| Complex::new(s * w, 0.0))
                .collect();
            self.forward.process(&mut buffer);
            frames.push(buffer);
        }

        Ok(frames)
    }

    /// Inverse-transforms `frames`, overlap-adds them `hop` samples apart and
    /// returns exactly `output_len` samples (zero-filled past the last frame).
    pub fn synthesize(
        &self,
        frames: &[SpectralFrame],
        hop: usize,
        output_len: usize,
    ) -> Result<Vec<f64>, PitchShiftError> {
        if hop == 0 {
            return Err(PitchShiftError::InvalidConfig(
                "synthesis hop must be greater than 0".to_string(),
            ));
        }
        for (frame_idx, frame) in frames.iter().enumerate() {
            if frame.len() != self.frame_size {
                return Err(PitchShiftError::FrameShape {
                    frame: frame_idx,
                    expected: self.frame_size,
                    found: frame.len(),
                });
            }
        }
        if frames.is_empty() {
            return Ok(vec![0.0; output_len]);
        }

        let total_len = (frames.len() - 1) * hop + self.frame_size;
        let mut output = vec![0.0f64; total_len];
        let mut window_sum = vec![0.0f64; total_len];
        let mut buffer = vec![COMPLEX_ZERO; self.frame_size];
        let norm = 1.0 / self.frame_size as f64;

        for (frame_idx, frame) in frames.iter().enumerate() {
            buffer.copy_from_slice(frame);
            self.inverse.process(&mut buffer);

            let pos = frame_idx * hop;
            for (i, (c, &w)) in buffer.iter().zip(self.window.iter()).enumerate() {
                output[pos + i] += c.re * norm * w;
                window_sum[pos + i] += w * w;
            }
        }

        normalize_output(&mut output, &window_sum);

        let pad = self.pad();
        let mut trimmed: Vec<f64> = output.into_iter().skip(pad).take(output_len).collect();
        trimmed.resize(output_len, 0.0);
        Ok(trimmed)
    }
}

/// Normalizes output by window sum, clamping to prevent amplification in
/// low-overlap regions (occurs when the synthesis hop exceeds the frame overlap).
fn normalize_output(output: &mut [f64], window_sum: &[f64]) {
    let max_window_sum = window_sum.iter().cloned().fold(0.0f64, f64::max);
    let min_window_sum = (max_window_sum * WINDOW_SUM_FLOOR_RATIO).max(WINDOW_SUM_EPSILON);
    for (sample, &ws) in output.iter_mut().zip(window_sum.iter()) {
        *sample /= ws.max(min_window_sum);
    }
}

/// Forward transform: frames of `frame_size` bins spaced `hop` samples apart.
pub fn stft(
    signal: &[f64],
    frame_size: usize,
    hop: usize,
    window: WindowType,
) -> Result<Vec<SpectralFrame>, PitchShiftError> {
    Stft::new(frame_size, window)?.analyze(signal, hop)
}

/// Inverse transform: overlap-adds `frames` spaced `hop` samples apart into
/// a signal of `output_len` samples.
pub fn istft(
    frames: &[SpectralFrame],
    frame_size: usize,
    hop: usize,
    window: WindowType,
    output_len: usize,
) -> Result<Vec<f64>, PitchShiftError> {
    Stft::new(frame_size, window)?.synthesize(frames, hop, output_len)
}
