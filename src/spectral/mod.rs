//! Short-time Fourier transform: analysis into complex frames and
//! overlap-add resynthesis at an arbitrary hop.

pub mod stft;

pub use stft::{istft, stft, SpectralFrame, Stft};
