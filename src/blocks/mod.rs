//! Signal processing blocks for streamed measurement
//!
//! The [`Sinad`] estimator itself is a pure function of one block of
//! samples. The blocks in this module provide the streaming framing around
//! it: [`F32Reader`] produces [`Samples`] from raw audio, [`Rechunker`]
//! regroups them into fixed-length blocks, and [`SinadMeter`] measures each
//! block on a [task] and publishes one [`Reading`] per block.
//!
//! Blocks that [`spawn`] a task require an active
//! [`tokio::runtime::Runtime`].
//!
//! [`Sinad`]: crate::sinad::Sinad
//! [`Samples`]: crate::samples::Samples
//! [task]: tokio::task
//! [`spawn`]: tokio::task::spawn

pub mod analysis;
pub mod chunks;
pub mod io;

pub use self::analysis::*;
pub use self::chunks::*;
pub use self::io::*;
