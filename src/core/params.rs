//! User-facing pitch-shift parameters and the hop sizes derived from them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::core::window::WindowType;
use crate::error::PitchShiftError;

/// Default frame (FFT) size in samples.
pub const DEFAULT_CHUNK_SIZE: usize = 512;
/// Default fraction of each frame shared with the next one.
pub const DEFAULT_OVERLAP: f64 = 0.5;

/// Parameters controlling a pitch-shift invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShiftParams {
    /// Pitch shift in semitones (positive raises, negative lowers).
    pub pitch_semitones: i32,
    /// Dry/wet mix: 1.0 is fully processed, 0.0 is the original signal.
    pub blend: f64,
    /// Frame size in samples, also the number of spectral bins.
    pub chunk_size: usize,
    /// Fraction of a frame overlapping the next one, in `[0, 1)`.
    pub overlap: f64,
    /// Resample the stretched signal back to the source length.
    pub resample: bool,
    /// Source channel used as the mono input (default: 0).
    pub channel: usize,
    /// Analysis/synthesis window.
    pub window: WindowType,
}

impl Default for ShiftParams {
    fn default() -> Self {
        Self {
            pitch_semitones: 0,
            blend: 1.0,
            chunk_size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_OVERLAP,
            resample: true,
            channel: 0,
            window: WindowType::Hann,
        }
    }
}

impl ShiftParams {
    /// Create parameters for the given semitone shift with default framing.
    pub fn new(pitch_semitones: i32) -> Self {
        Self {
            pitch_semitones,
            ..Self::default()
        }
    }

    /// Set the dry/wet blend.
    pub fn with_blend(mut self, blend: f64) -> Self {
        self.blend = blend;
        self
    }

    /// Set the frame size.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Set the frame overlap fraction.
    pub fn with_overlap(mut self, overlap: f64) -> Self {
        self.overlap = overlap;
        self
    }

    /// Enable or disable resampling back to the source length.
    pub fn with_resample(mut self, resample: bool) -> Self {
        self.resample = resample;
        self
    }

    /// Select the source channel.
    pub fn with_channel(mut self, channel: usize) -> Self {
        self.channel = channel;
        self
    }

    /// Set the window type.
    pub fn with_window(mut self, window: WindowType) -> Self {
        self.window = window;
        self
    }

    /// Frequency ratio of the shift, `2^(semitones / 12)`.
    #[inline]
    pub fn pitch_ratio(&self) -> f64 {
        2f64.powf(self.pitch_semitones as f64 / 12.0)
    }

    /// Analysis hop: `floor((1 - overlap) * chunk_size)`.
    ///
    /// Returns 0 for degenerate overlaps; see [`ShiftParams::hops`].
    pub fn analysis_hop(&self) -> usize {
        let hop = (1.0 - self.overlap) * self.chunk_size as f64;
        if hop.is_finite() && hop > 0.0 {
            hop as usize
        } else {
            0
        }
    }

    /// Validated analysis and synthesis hops.
    ///
    /// # Errors
    /// Returns `PitchShiftError::InvalidConfig` when either hop would be zero.
    pub fn hops(&self) -> Result<Hops, PitchShiftError> {
        self.validate()?;
        Ok(Hops::new(self.analysis_hop(), self.pitch_ratio()))
    }

    /// Validate all parameters.
    pub fn validate(&self) -> Result<(), PitchShiftError> {
        if self.chunk_size == 0 {
            return Err(PitchShiftError::InvalidConfig(
                "chunk size must be greater than 0".to_string(),
            ));
        }
        if !self.overlap.is_finite() || self.overlap < 0.0 {
            return Err(PitchShiftError::InvalidConfig(format!(
                "overlap must be a finite value in [0, 1), got {}",
                self.overlap
            )));
        }
        let hop = self.analysis_hop();
        if hop == 0 {
            return Err(PitchShiftError::InvalidConfig(format!(
                "overlap {} with chunk size {} leaves no hop between frames",
                self.overlap, self.chunk_size
            )));
        }
        if Hops::new(hop, self.pitch_ratio()).synthesis == 0 {
            return Err(PitchShiftError::InvalidConfig(format!(
                "pitch shift of {} semitones collapses the synthesis hop to 0 (analysis hop {})",
                self.pitch_semitones, hop
            )));
        }
        if !self.blend.is_finite() {
            return Err(PitchShiftError::InvalidConfig(format!(
                "blend must be finite, got {}",
                self.blend
            )));
        }
        Ok(())
    }

    /// Parses parameters from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, PitchShiftError> {
        serde_json::from_str(json).map_err(|e| {
            PitchShiftError::InvalidConfig(format!("failed to parse parameters: {}", e))
        })
    }

    /// Reads parameters from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, PitchShiftError> {
        let data = std::fs::read_to_string(path)?;
        serde_json::from_str(&data).map_err(|e| {
            PitchShiftError::InvalidConfig(format!(
                "failed to parse parameters from {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Serializes the parameters as pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, PitchShiftError> {
        serde_json::to_string_pretty(self).map_err(|e| {
            PitchShiftError::InvalidConfig(format!("failed to serialize parameters: {}", e))
        })
    }
}

impl fmt::Display for ShiftParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pitch={:+} st, blend={:.2}, chunk={}, overlap={:.2}, resample={}, channel={}, window={:?}",
            self.pitch_semitones,
            self.blend,
            self.chunk_size,
            self.overlap,
            self.resample,
            self.channel,
            self.window
        )
    }
}

/// Analysis and synthesis hop sizes of one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hops {
    /// Distance between analysis frames (`HOP`).
    pub analysis: usize,
    /// Distance between synthesis frames (`HOP_OUT`).
    pub synthesis: usize,
}

impl Hops {
    /// Derives the synthesis hop as `floor(analysis * ratio)`.
    pub fn new(analysis: usize, pitch_ratio: f64) -> Self {
        let synthesis = analysis as f64 * pitch_ratio;
        let synthesis = if synthesis.is_finite() && synthesis > 0.0 {
            synthesis as usize
        } else {
            0
        };
        Self {
            analysis,
            synthesis,
        }
    }

    /// Effective time-stretch factor of the resynthesis, `HOP_OUT / HOP`.
    #[inline]
    pub fn stretch_factor(&self) -> f64 {
        self.synthesis as f64 / self.analysis as f64
    }

    /// Length of the stretched signal for an input of `input_len` samples,
    /// `ceil(input_len * HOP_OUT / HOP)`.
    pub fn stretched_len(&self, input_len: usize) -> usize {
        (input_len * self.synthesis).div_ceil(self.analysis)
    }
}
