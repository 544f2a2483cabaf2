//! Core types, parameters, window functions, and resampling utilities.

pub mod fft;
pub mod params;
pub mod resample;
pub mod types;
pub mod window;

pub use params::{Hops, ShiftParams};
pub use types::*;
pub use window::{generate_window, WindowType};
