use rustfft::{num_complex::Complex, FftPlanner};

use crate::core::window::hann_window;

/// Estimates the dominant frequency of a signal in Hz.
///
/// Averages Hann-windowed FFT magnitudes over half-overlapping frames and
/// returns the centre frequency of the strongest positive-frequency bin
/// (DC excluded). Returns 0.0 for signals shorter than `fft_size` or with no
/// energy.
pub fn dominant_frequency(samples: &[f64], sample_rate: u32, fft_size: usize) -> f64 {
    if fft_size < 2 || samples.len() < fft_size {
        return 0.0;
    }

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(fft_size);
    let window = hann_window(fft_size);
    let half = fft_size / 2 + 1;
    let hop = fft_size / 2;

    let mut spectrum = vec![0.0f64; half];
    let mut buffer = vec![Complex::new(0.0, 0.0); fft_size];
    let mut start = 0;
    while start + fft_size <= samples.len() {
        for (slot, (&s, &w)) in buffer
            .iter_mut()
            .zip(samples[start..start + fft_size].iter().zip(window.iter()))
        {
            *slot = Complex::new(s * w, 0.0);
        }
        fft.process(&mut buffer);
        for (acc, c) in spectrum.iter_mut().zip(buffer.iter()) {
            *acc += c.norm();
        }
        start += hop;
    }

    let peak = spectrum
        .iter()
        .enumerate()
        .skip(1)
        .fold((0usize, 0.0f64), |best, (bin, &mag)| {
            if mag > best.1 {
                (bin, mag)
            } else {
                best
            }
        });

    if peak.1 <= 0.0 {
        return 0.0;
    }
    peak.0 as f64 * sample_rate as f64 / fft_size as f64
}
