//! Signal analysis / metering

use super::chunks::Rechunker;
use crate::numbers::*;
use crate::samples::*;
use crate::sinad::*;

use tokio::sync::{mpsc, watch};
use tokio::task::{spawn, JoinHandle};
use tracing::{debug, trace, warn};

use std::sync::Arc;

/// Block length used by [`SinadMeter`] if the estimator doesn't require one
pub const DEFAULT_BLOCK_LEN: usize = 1000;

const INPUT_CAPACITY: usize = 16;
const READING_CAPACITY: usize = 256;

/// SINAD measured for one block
#[derive(Clone, Debug, PartialEq)]
pub struct Reading {
    /// Number of the block, counted from zero
    pub sequence: u64,
    /// Sample rate of the block
    pub sample_rate: f64,
    /// SINAD in dB or the reason why there is no value for this block
    pub result: Result<f64, SinadError>,
}

/// Error returned by [`SinadMeter::feed`] when the background task has
/// terminated
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("SINAD meter is closed")]
pub struct MeterClosed;

/// Block measuring the SINAD of a stream of audio samples
///
/// Incoming [`Samples`] of any chunk length are regrouped into blocks of the
/// estimator's block length (or [`DEFAULT_BLOCK_LEN`]) and each block is
/// measured by a [`Sinad`] estimator on a background task. Therefore, an
/// active [`tokio::runtime::Runtime`] is required.
///
/// For each block, one [`Reading`] is queued (see [`SinadMeter::recv`]) and
/// published as the latest value (see [`SinadMeter::latest`]). A reading
/// with an error means "no value for this block"; the meter continues with
/// the next block. If the queue is full because nobody calls `recv`,
/// readings are dropped from the queue but the latest value is still
/// updated. A meter created with [`SinadMeter::lossless`] waits for the
/// consumer instead, which eventually blocks the producer.
pub struct SinadMeter<Flt>
where
    Flt: Float,
{
    input: mpsc::Sender<Samples<Flt>>,
    readings: mpsc::Receiver<Reading>,
    latest: watch::Receiver<Option<Reading>>,
    estimator: watch::Sender<Arc<Sinad<Flt>>>,
    join_handle: JoinHandle<()>,
}

fn block_len_of<Flt: Float>(sinad: &Sinad<Flt>) -> usize {
    sinad.config().block_len().unwrap_or(DEFAULT_BLOCK_LEN)
}

impl<Flt> SinadMeter<Flt>
where
    Flt: Float,
{
    /// Create `SinadMeter` using the given estimator
    pub fn new(sinad: Sinad<Flt>) -> Self {
        Self::start(sinad, false)
    }
    /// Create `SinadMeter` which never drops readings from the queue
    ///
    /// When the queue is full, measuring pauses until [`SinadMeter::recv`]
    /// makes room.
    pub fn lossless(sinad: Sinad<Flt>) -> Self {
        Self::start(sinad, true)
    }
    fn start(sinad: Sinad<Flt>, lossless: bool) -> Self {
        let (input, mut input_rx) = mpsc::channel::<Samples<Flt>>(INPUT_CAPACITY);
        let (readings_tx, readings) = mpsc::channel::<Reading>(READING_CAPACITY);
        let (latest_tx, latest) = watch::channel::<Option<Reading>>(None);
        let (estimator, mut estimator_rx) = watch::channel(Arc::new(sinad));
        let join_handle = spawn(async move {
            let mut sinad = estimator_rx.borrow_and_update().clone();
            let mut rechunker = Rechunker::<Flt>::new(block_len_of(&sinad));
            let mut sequence: u64 = 0;
            while let Some(samples) = input_rx.recv().await {
                if estimator_rx.has_changed().unwrap_or(false) {
                    sinad = estimator_rx.borrow_and_update().clone();
                    rechunker.set_chunk_len(block_len_of(&sinad));
                    debug!(config = ?sinad.config(), "SINAD meter reconfigured");
                }
                for block in rechunker.push(samples) {
                    let expected = sinad.config().sample_rate();
                    let result = if block.sample_rate != expected {
                        Err(BlockDefect::SampleRateMismatch {
                            expected,
                            actual: block.sample_rate,
                        }
                        .into())
                    } else {
                        sinad.estimate(&block.chunk)
                    };
                    match &result {
                        Ok(db) => trace!(sequence, sinad_db = db, "block measured"),
                        Err(err) => warn!(sequence, %err, "no SINAD value for block"),
                    }
                    let reading = Reading {
                        sequence,
                        sample_rate: block.sample_rate,
                        result,
                    };
                    sequence += 1;
                    latest_tx.send_replace(Some(reading.clone()));
                    if lossless {
                        // receiver lives as long as the meter
                        let _ = readings_tx.send(reading).await;
                    } else if let Err(mpsc::error::TrySendError::Full(reading)) =
                        readings_tx.try_send(reading)
                    {
                        debug!(sequence = reading.sequence, "reading queue full, dropping");
                    }
                }
            }
            debug!(blocks = sequence, "SINAD meter input closed");
        });
        Self {
            input,
            readings,
            latest,
            estimator,
            join_handle,
        }
    }
    /// Send samples to the meter
    ///
    /// Waits while the input queue is full.
    pub async fn feed(&self, samples: Samples<Flt>) -> Result<(), MeterClosed> {
        self.input.send(samples).await.map_err(|_| MeterClosed)
    }
    /// Obtain a sender for feeding samples from another task
    ///
    /// Note that [`SinadMeter::finish`] waits until all such senders have
    /// been dropped.
    pub fn sender(&self) -> mpsc::Sender<Samples<Flt>> {
        self.input.clone()
    }
    /// Receive next queued reading
    ///
    /// Returns `None` when the meter has been shut down and all readings
    /// have been received.
    pub async fn recv(&mut self) -> Option<Reading> {
        self.readings.recv().await
    }
    /// Most recent reading (if any block has been measured yet)
    pub fn latest(&self) -> Option<Reading> {
        self.latest.borrow().clone()
    }
    /// Watch receiver for the most recent reading
    pub fn subscribe_latest(&self) -> watch::Receiver<Option<Reading>> {
        self.latest.clone()
    }
    /// Currently used estimator
    pub fn estimator(&self) -> Arc<Sinad<Flt>> {
        self.estimator.borrow().clone()
    }
    /// Replace the estimator
    ///
    /// The new estimator is used starting with the next received chunk of
    /// samples. Each block is measured by exactly one estimator. If the
    /// block length changes, pending samples are kept.
    pub fn set_estimator(&self, sinad: Sinad<Flt>) {
        self.estimator.send_replace(Arc::new(sinad));
    }
    /// Close the input, wait for all pending blocks to be measured, and
    /// return the readings that haven't been received yet
    ///
    /// Samples that do not complete a block are discarded.
    pub async fn finish(self) -> Vec<Reading> {
        let Self {
            input,
            mut readings,
            join_handle,
            ..
        } = self;
        drop(input);
        let mut remaining = Vec::new();
        while let Some(reading) = readings.recv().await {
            remaining.push(reading);
        }
        join_handle.await.expect("task panicked");
        remaining
    }
}
