//! Re-export of certain important items

pub use super::blocks;
pub use super::blocks::{ByteOrder, F32Reader, Reading, Rechunker, SinadMeter};
pub use super::numbers::{Complex, Float};
pub use super::samples::Samples;
pub use super::signals::{GaussianNoise, Tone};
pub use super::sinad::{
    BlockDefect, DegeneratePolicy, Sinad, SinadConfig, SinadError, SinadReport,
};
pub use super::windowing::Window;
