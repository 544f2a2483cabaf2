pub mod frequency;
pub mod waveform;

pub use frequency::dominant_frequency;
pub use waveform::WaveformPeaks;
