//! Instantaneous frequency estimation from frame-to-frame phase drift.

use std::f64::consts::PI;

use crate::error::PitchShiftError;

const TWO_PI: f64 = 2.0 * PI;

/// Wraps a phase value into `(-PI, PI]`.
///
/// Computed as `mod(phase + PI, 2 PI) - PI`; the single value that lands on
/// `-PI` is mapped to `PI`.
#[inline]
pub fn wrap_phase(phase: f64) -> f64 {
    let wrapped = (phase + PI).rem_euclid(TWO_PI) - PI;
    if wrapped <= -PI {
        wrapped + TWO_PI
    } else {
        wrapped
    }
}

/// Wrapped phase of every bin in the previous spectral frame.
///
/// Starts at zero for all bins and is overwritten by each estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseState {
    last_phase: Vec<f64>,
}

impl PhaseState {
    /// Creates zeroed state for `bins` bins.
    pub fn new(bins: usize) -> Self {
        Self {
            last_phase: vec![0.0; bins],
        }
    }

    /// Number of bins tracked.
    #[inline]
    pub fn bins(&self) -> usize {
        self.last_phase.len()
    }

    /// Phase of each bin in the most recently estimated frame.
    #[inline]
    pub fn last_phase(&self) -> &[f64] {
        &self.last_phase
    }

    /// Zeroes all bins.
    pub fn reset(&mut self) {
        self.last_phase.iter_mut().for_each(|p| *p = 0.0);
    }
}

/// Converts per-bin phase differences into instantaneous frequencies
/// (radians per sample) for a fixed analysis hop.
#[derive(Debug, Clone)]
pub struct FrequencyEstimator {
    hop: usize,
    /// Nominal bin frequency `2 PI k / N`.
    bin_frequency: Vec<f64>,
    /// Phase advance of a bin at its nominal frequency over one hop.
    expected_advance: Vec<f64>,
}

impl FrequencyEstimator {
    /// Creates an estimator for `bins`-bin frames analysed `hop` samples apart.
    ///
    /// # Errors
    /// Returns `PitchShiftError::InvalidConfig` if `bins` or `hop` is zero.
    pub fn new(bins: usize, hop: usize) -> Result<Self, PitchShiftError> {
        if bins == 0 {
            return Err(PitchShiftError::InvalidConfig(
                "frequency estimator needs at least one bin".to_string(),
            ));
        }
        if hop == 0 {
            return Err(PitchShiftError::InvalidConfig(
                "analysis hop must be greater than 0".to_string(),
            ));
        }
        let bin_frequency: Vec<f64> = (0..bins)
            .map(|k| TWO_PI * k as f64 / bins as f64)
            .collect();
        let expected_advance = bin_frequency.iter().map(|w| w * hop as f64).collect();
        Ok(Self {
            hop,
            bin_frequency,
            expected_advance,
        })
    }

    /// Returns the number of bins.
    #[inline]
    pub fn bins(&self) -> usize {
        self.bin_frequency.len()
    }

    /// Nominal frequency of `bin` in radians per sample.
    #[inline]
    pub fn bin_frequency(&self, bin: usize) -> f64 {
        self.bin_frequency[bin]
    }

    /// Wrapped deviation of the measured phase advance from the nominal one.
    #[inline]
    pub fn phase_deviation(&self, bin: usize, phase: f64, last_phase: f64) -> f64 {
        wrap_phase(phase - last_phase - self.expected_advance[bin])
    }

    /// Instantaneous frequency of `bin` given its wrapped phase deviation.
    #[inline]
    pub fn true_frequency(&self, bin: usize, deviation: f64) -> f64 {
        self.bin_frequency[bin] + deviation / self.hop as f64
    }

    /// Estimates the instantaneous frequency of every bin of `phase_frame`
    /// into `true_freq`, then records `phase_frame` as the previous frame.
    ///
    /// All three slices must have [`FrequencyEstimator::bins`] entries.
    pub fn estimate(
        &self,
        phase_frame: &[f64],
        state: &mut PhaseState,
        true_freq: &mut [f64],
    ) -> Result<(), PitchShiftError> {
        let bins = self.bins();
        for found in [phase_frame.len(), state.bins(), true_freq.len()] {
            if found != bins {
                return Err(PitchShiftError::BinCount {
                    expected: bins,
                    found,
                });
            }
        }

        for (bin, ((freq, last), &phase)) in true_freq
            .iter_mut()
            .zip(state.last_phase.iter_mut())
            .zip(phase_frame.iter())
            .enumerate()
        {
            let deviation = self.phase_deviation(bin, phase, *last);
            *freq = self.true_frequency(bin, deviation);
            *last = phase;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_phase() {
        assert!((wrap_phase(0.0) - 0.0).abs() < 1e-12);
        assert!((wrap_phase(PI + 0.1) - (-PI + 0.1)).abs() < 1e-12);
        assert!((wrap_phase(-PI - 0.1) - (PI - 0.1)).abs() < 1e-12);
        // Test larger values
        assert!((wrap_phase(10.0 * PI + 0.5) - 0.5).abs() < 1e-9);
        assert!((wrap_phase(-10.0 * PI - 0.5) - (-0.5)).abs() < 1e-9);
    }

    #[test]
    fn test_wrap_phase_boundaries() {
        assert_eq!(wrap_phase(PI), PI);
        assert_eq!(wrap_phase(-PI), PI);
    }

    #[test]
    fn test_wrap_phase_range_sweep() {
        let mut x = -50.0;
        while x < 50.0 {
            let w = wrap_phase(x);
            assert!(w > -PI && w <= PI, "wrap_phase({}) = {}", x, w);
            // Differs from the input by a multiple of 2 PI
            let turns = (x - w) / TWO_PI;
            assert!((turns - turns.round()).abs() < 1e-9);
            x += 0.0137;
        }
    }

    #[test]
    fn test_rejects_zero_hop() {
        assert!(matches!(
            FrequencyEstimator::new(512, 0),
            Err(PitchShiftError::InvalidConfig(_))
        ));
        assert!(matches!(
            FrequencyEstimator::new(0, 256),
            Err(PitchShiftError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_zero_deviation_gives_bin_frequency() {
        let n = 64;
        let hop = 16;
        let est = FrequencyEstimator::new(n, hop).unwrap();
        let mut state = PhaseState::new(n);
        // Every bin advances by exactly its expected phase
        let phase_frame: Vec<f64> = (0..n)
            .map(|k| wrap_phase(hop as f64 * TWO_PI * k as f64 / n as f64))
            .collect();
        let mut freq = vec![0.0; n];
        est.estimate(&phase_frame, &mut state, &mut freq).unwrap();

        for k in 0..n {
            let nominal = TWO_PI * k as f64 / n as f64;
            assert!((freq[k] - nominal).abs() < 1e-9, "bin {}: {} vs {}", k, freq[k], nominal);
        }
        // Nominal frequencies increase with the bin index
        assert!(freq.windows(2).all(|w| w[1] > w[0] - 1e-9));
        assert_eq!(state.last_phase(), phase_frame.as_slice());
    }

    #[test]
    fn test_recovers_off_bin_frequency() {
        // A sinusoid between bins 10 and 11 of a 256-point frame
        let n = 256;
        let hop = 64;
        let omega = TWO_PI * 10.3 / n as f64;
        let est = FrequencyEstimator::new(n, hop).unwrap();
        let mut state = PhaseState::new(n);
        let mut freq = vec![0.0; n];

        let first = vec![0.0; n];
        est.estimate(&first, &mut state, &mut freq).unwrap();

        let mut second = vec![0.0; n];
        second[10] = wrap_phase(omega * hop as f64);
        est.estimate(&second, &mut state, &mut freq).unwrap();

        assert!((freq[10] - omega).abs() < 1e-9, "{} vs {}", freq[10], omega);
    }

    #[test]
    fn test_state_carries_across_frames() {
        let est = FrequencyEstimator::new(4, 1).unwrap();
        let mut state = PhaseState::new(4);
        let mut freq = vec![0.0; 4];
        est.estimate(&[0.1, 0.2, 0.3, 0.4], &mut state, &mut freq).unwrap();
        est.estimate(&[0.2, 0.4, 0.6, 0.8], &mut state, &mut freq).unwrap();
        // bin 0: nominal 0, drift 0.1 over a one-sample hop
        assert!((freq[0] - 0.1).abs() < 1e-12);
        state.reset();
        assert_eq!(state.last_phase(), &[0.0; 4]);
    }

    #[test]
    fn test_mismatched_lengths() {
        let est = FrequencyEstimator::new(8, 2).unwrap();
        let mut state = PhaseState::new(8);
        let mut freq = vec![0.0; 8];
        let err = est.estimate(&[0.0; 7], &mut state, &mut freq).unwrap_err();
        assert_eq!(
            err,
            PitchShiftError::BinCount {
                expected: 8,
                found: 7
            }
        );
    }
}
