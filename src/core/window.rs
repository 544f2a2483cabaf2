//! Window functions for short-time spectral analysis.
//!
//! The spectral transform applies the same window on analysis and synthesis
//! and normalizes by the summed squared window, so any window with a
//! non-vanishing overlap sum reconstructs correctly.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Blackman-Harris window coefficients (4-term).
const BH_A0: f64 = 0.35875;
const BH_A1: f64 = 0.48829;
const BH_A2: f64 = 0.14128;
const BH_A3: f64 = 0.01168;

/// Window function types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WindowType {
    #[default]
    Hann,
    BlackmanHarris,
}

impl WindowType {
    /// Parses a window name as accepted on the command line.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "hann" => Some(WindowType::Hann),
            "blackman-harris" | "bh" => Some(WindowType::BlackmanHarris),
            _ => None,
        }
    }
}

/// Generates a window function of the specified type and size.
pub fn generate_window(window_type: WindowType, size: usize) -> Vec<f64> {
    match window_type {
        WindowType::Hann => hann_window(size),
        WindowType::BlackmanHarris => blackman_harris_window(size),
    }
}

/// Returns `Some(trivial_window)` for degenerate sizes (0 or 1), or `None`
/// to indicate the caller should compute the full window.
#[inline]
fn trivial_window(size: usize) -> Option<Vec<f64>> {
    match size {
        0 => Some(vec![]),
        1 => Some(vec![1.0]),
        _ => None,
    }
}

/// Generates a periodic Hann window.
pub fn hann_window(size: usize) -> Vec<f64> {
    if let Some(w) = trivial_window(size) {
        return w;
    }
    let n = size as f64;
    (0..size)
        .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f64 / n).cos()))
        .collect()
}

/// Generates a periodic Blackman-Harris window.
fn blackman_harris_window(size: usize) -> Vec<f64> {
    if let Some(w) = trivial_window(size) {
        return w;
    }
    let n = size as f64;
    (0..size)
        .map(|i| {
            let x = i as f64 / n;
            BH_A0 - BH_A1 * (2.0 * PI * x).cos() + BH_A2 * (4.0 * PI * x).cos()
                - BH_A3 * (6.0 * PI * x).cos()
        })
        .collect()
}
