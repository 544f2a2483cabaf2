//! Error types for the pitchshift crate.

use thiserror::Error;

/// Errors that can occur while pitch shifting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PitchShiftError {
    /// Parameters that would make the vocoder undefined (zero hop, zero frame size, ...).
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Input signal has no samples.
    #[error("input signal is empty")]
    EmptyInput,
    /// Input contains NaN or infinite samples.
    #[error("input contains non-finite samples")]
    NonFiniteInput,
    /// Two signals that must line up sample for sample have different lengths.
    #[error("length mismatch: expected {expected} samples, found {found}")]
    LengthMismatch { expected: usize, found: usize },
    /// A spectral frame does not have the bin count of the sequence.
    #[error("spectral frame {frame} has {found} bins, expected {expected}")]
    FrameShape {
        frame: usize,
        expected: usize,
        found: usize,
    },
    /// A per-bin buffer does not have the bin count it was built for.
    #[error("expected {expected} bins, found {found}")]
    BinCount { expected: usize, found: usize },
    /// Requested channel does not exist in the source.
    #[error("channel {channel} out of range for {channels}-channel audio")]
    ChannelOutOfRange { channel: usize, channels: usize },
    /// Audio container or sample format that cannot be handled.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(String),
    /// Processing was aborted between frames.
    #[error("processing cancelled before frame {frame}")]
    Cancelled { frame: usize },
}

impl From<std::io::Error> for PitchShiftError {
    fn from(err: std::io::Error) -> Self {
        PitchShiftError::Io(err.to_string())
    }
}

impl From<hound::Error> for PitchShiftError {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(e) => PitchShiftError::Io(e.to_string()),
            other => PitchShiftError::UnsupportedFormat(other.to_string()),
        }
    }
}
