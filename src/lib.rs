//! SINAD measurement of demodulated radio audio
//!
//! SINAD (signal to noise and distortion ratio) rates the quality of a
//! receiver by feeding it a carrier modulated with a known reference tone
//! and comparing the power of the demodulated audio with the power of
//! everything in the audio that isn't the reference tone.
//!
//! For single blocks of audio, use the [`sinad`] module. For a continuous
//! stream of audio, have a look at the [`blocks`] module.

#![warn(missing_docs)]

pub mod blocks;
pub mod math;
pub mod metering;
pub mod numbers;
pub mod prelude;
pub mod samples;
pub mod signals;
pub mod sinad;
pub mod windowing;
