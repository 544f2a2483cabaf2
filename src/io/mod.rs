//! Audio container I/O.

pub mod wav;
