#![allow(dead_code)]

use std::f64::consts::PI;

pub const SR: u32 = 44100;
/// Fine enough to resolve a semitone step at 440 Hz (~5.4 Hz per bin).
pub const ANALYSIS_FFT: usize = 8192;

pub fn gen_sine(freq_hz: f64, sr: u32, n: usize, amp: f64) -> Vec<f64> {
    (0..n)
        .map(|i| amp * (2.0 * PI * freq_hz * i as f64 / sr as f64).sin())
        .collect()
}

pub fn gen_two_tone(freq_a: f64, amp_a: f64, freq_b: f64, amp_b: f64, sr: u32, n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let t = i as f64 / sr as f64;
            amp_a * (2.0 * PI * freq_a * t).sin() + amp_b * (2.0 * PI * freq_b * t).sin()
        })
        .collect()
}

pub fn rms(signal: &[f64]) -> f64 {
    if signal.is_empty() {
        return 0.0;
    }
    (signal.iter().map(|x| x * x).sum::<f64>() / signal.len() as f64).sqrt()
}

/// RMS of the middle of a signal, ignoring `margin` samples at each end.
pub fn interior_rms(signal: &[f64], margin: usize) -> f64 {
    if signal.len() <= 2 * margin {
        return rms(signal);
    }
    rms(&signal[margin..signal.len() - margin])
}

pub fn dominant_freq(signal: &[f64]) -> f64 {
    pitchshift::analysis::dominant_frequency(signal, SR, ANALYSIS_FFT)
}

/// Interleaves two mono signals of equal length into stereo PCM.
pub fn interleave(left: &[f64], right: &[f64]) -> Vec<i32> {
    left.iter()
        .zip(right.iter())
        .flat_map(|(&l, &r)| [l as i32, r as i32])
        .collect()
}
