//! Phase vocoder driver: re-phases a sequence of spectral frames analysed at
//! one hop so that they overlap-add coherently at another.

use rustfft::num_complex::Complex;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::core::params::Hops;
use crate::error::PitchShiftError;
use crate::spectral::SpectralFrame;
use crate::vocoder::accumulator::PhaseAccumulator;
use crate::vocoder::frequency::{FrequencyEstimator, PhaseState};

/// Phase vocoder state for one signal.
///
/// Owns the previous-frame phases and the accumulated synthesis phases.
/// Both are zeroed at the start of every [`PhaseVocoder::process`] call, so
/// an instance can be reused for independent signals but never shares state
/// between them.
pub struct PhaseVocoder {
    bins: usize,
    hops: Hops,
    estimator: FrequencyEstimator,
    state: PhaseState,
    accumulator: PhaseAccumulator,
    /// Reusable phase buffer.
    phase_frame: Vec<f64>,
    /// Reusable instantaneous frequency buffer.
    true_freq: Vec<f64>,
}

impl PhaseVocoder {
    /// Creates a phase vocoder for `bins`-bin frames.
    ///
    /// # Errors
    /// Returns `PitchShiftError::InvalidConfig` if `bins` or either hop is zero.
    pub fn new(bins: usize, hops: Hops) -> Result<Self, PitchShiftError> {
        Ok(Self {
            bins,
            hops,
            estimator: FrequencyEstimator::new(bins, hops.analysis)?,
            state: PhaseState::new(bins),
            accumulator: PhaseAccumulator::new(bins, hops.synthesis)?,
            phase_frame: vec![0.0; bins],
            true_freq: vec![0.0; bins],
        })
    }

    /// Produces one adjusted frame per input frame: original magnitudes with
    /// the accumulated synthesis phase.
    pub fn process(
        &mut self,
        frames: &[SpectralFrame],
    ) -> Result<Vec<SpectralFrame>, PitchShiftError> {
        self.process_cancellable(frames, &AtomicBool::new(false))
    }

    /// Like [`PhaseVocoder::process`], but checks `cancel` before every frame
    /// and returns `PitchShiftError::Cancelled` (and no frames) once it is set.
    pub fn process_cancellable(
        &mut self,
        frames: &[SpectralFrame],
        cancel: &AtomicBool,
    ) -> Result<Vec<SpectralFrame>, PitchShiftError> {
        self.check_shapes(frames)?;

        self.state.reset();
        self.accumulator.reset();

        log::debug!(
            "phase vocoder: {} frames x {} bins, hop {} -> {}",
            frames.len(),
            self.bins,
            self.hops.analysis,
            self.hops.synthesis
        );

        let mut adjusted = Vec::with_capacity(frames.len());
        for (frame_idx, frame) in frames.iter().enumerate() {
            if cancel.load(Ordering::Relaxed) {
                log::debug!("phase vocoder cancelled at frame {}", frame_idx);
                return Err(PitchShiftError::Cancelled { frame: frame_idx });
            }
            adjusted.push(self.process_frame(frame)?);
        }

        Ok(adjusted)
    }

    /// Rejects the sequence up front if any frame has the wrong bin count,
    /// so no frame is processed on failure.
    fn check_shapes(&self, frames: &[SpectralFrame]) -> Result<(), PitchShiftError> {
        match frames
            .iter()
            .enumerate()
            .find(|(_, frame)| frame.len() != self.bins)
        {
            Some((frame_idx, frame)) => Err(PitchShiftError::FrameShape {
                frame: frame_idx,
                expected: self.bins,
                found: frame.len(),
            }),
            None => Ok(()),
        }
    }

    fn process_frame(&mut self, frame: &[Complex<f64>]) -> Result<SpectralFrame, PitchShiftError> {
        // Zero-magnitude bins report a phase of 0 and still advance.
        for (phase, c) in self.phase_frame.iter_mut().zip(frame.iter()) {
            *phase = c.arg();
        }

        self.estimator
            .estimate(&self.phase_frame, &mut self.state, &mut self.true_freq)?;
        self.accumulator.advance(&self.true_freq)?;

        Ok(frame
            .iter()
            .zip(self.accumulator.phases().iter())
            .map(|(c, &phase)| Complex::from_polar(c.norm(), phase))
            .collect())
    }
}

/// Re-phases `frames` for resynthesis at `hops.synthesis` with a fresh vocoder.
pub fn phase_vocoder(
    frames: &[SpectralFrame],
    hops: Hops,
) -> Result<Vec<SpectralFrame>, PitchShiftError> {
    match frames.first() {
        Some(first) => PhaseVocoder::new(first.len(), hops)?.process(frames),
        None => Ok(vec![]),
    }
}
