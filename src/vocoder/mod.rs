//! Phase vocoder core: instantaneous frequency estimation, phase
//! accumulation, and the frame-sequence driver.

pub mod accumulator;
pub mod driver;
pub mod frequency;

pub use accumulator::PhaseAccumulator;
pub use driver::{phase_vocoder, PhaseVocoder};
pub use frequency::{wrap_phase, FrequencyEstimator, PhaseState};
