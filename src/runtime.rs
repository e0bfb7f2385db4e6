//! Producer/consumer wiring between a [`Device`], a [`Bridge`] and the
//! [`AisPipeline`] (§4.12, §5): the device's callback thread pushes raw
//! byte batches into the bridge; a dedicated consumer thread drains it and
//! runs the whole DSP graph top-to-bottom, synchronously, one batch at a
//! time. Grounded on `RTLSDR::callback` (producer side) and
//! `RTLSDR::Demodulation` (consumer thread body) in `Device.cpp`.

use crate::bridge::{consumer_timeout, Bridge};
use crate::error::Error;
use crate::pipeline::{AisPipeline, PipelineOutput};
use crate::sample::{Cf32, Cs16, Cu8, RawFormat};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// Decodes one raw batch of wire-format bytes into normalised `Complex32`,
/// mirroring the device-specific conversions in `sample.rs`. Trailing
/// bytes that don't form a whole sample are dropped, the same way a torn
/// read at the end of a device buffer would be.
fn decode_batch(format: RawFormat, raw: &[u8], out: &mut Vec<Cf32>) {
    match format {
        RawFormat::Cu8 => {
            let samples: Vec<Cu8> = raw
                .chunks_exact(2)
                .map(|c| Cu8::new(c[0], c[1]))
                .collect();
            crate::sample::cu8_to_cf32(&samples, out);
        }
        RawFormat::Cs16 => {
            let samples: Vec<Cs16> = raw
                .chunks_exact(4)
                .map(|c| {
                    Cs16::new(
                        i16::from_le_bytes([c[0], c[1]]),
                        i16::from_le_bytes([c[2], c[3]]),
                    )
                })
                .collect();
            crate::sample::cs16_to_cf32(&samples, out);
        }
        RawFormat::Cf32 => {
            out.clear();
            out.extend(raw.chunks_exact(8).map(|c| {
                Cf32::new(
                    f32::from_le_bytes(c[0..4].try_into().unwrap()),
                    f32::from_le_bytes(c[4..8].try_into().unwrap()),
                )
            }));
        }
    }
}

/// The crate's own CIC5/2 -> FIR/3 front end decimates by 6 overall; a
/// decoded batch must be a multiple of this to run through the pipeline
/// without tripping `Error::InvalidBatchLength`.
const FRONT_END_ALIGNMENT: usize = 6;

/// A running consumer thread draining a [`Bridge`] into an [`AisPipeline`].
/// Dropping this without calling [`ConsumerHandle::stop`] leaves the
/// thread running detached; call `stop` and then drop (or just call
/// `stop`, which joins) to shut it down cleanly.
pub struct ConsumerHandle {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl ConsumerHandle {
    /// Signals the consumer thread to stop after its current `pop` call
    /// returns, then joins it.
    pub fn stop(mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Spawns the consumer thread described in §4.12: pop a batch, decode it,
/// run it through `pipeline`, hand the decided symbols to `on_output`.
/// Timeouts and misaligned trailing samples are logged and skipped, never
/// propagated as a panic — the thread keeps draining until `stop`.
pub fn spawn_consumer(
    bridge: Arc<Bridge>,
    format: RawFormat,
    sample_rate_hz: f32,
    mut pipeline: AisPipeline,
    mut on_output: impl FnMut(PipelineOutput) + Send + 'static,
) -> ConsumerHandle {
    let running = Arc::new(AtomicBool::new(true));
    let running_thread = running.clone();
    let timeout = consumer_timeout(4096, sample_rate_hz).max(Duration::from_millis(50));

    let handle = std::thread::spawn(move || {
        let mut samples = Vec::new();
        while running_thread.load(Ordering::Acquire) {
            let raw = match bridge.pop(timeout) {
                Some(raw) => raw,
                None => continue,
            };
            decode_batch(format, &raw, &mut samples);
            let aligned = samples.len() - samples.len() % FRONT_END_ALIGNMENT;
            samples.truncate(aligned);
            if samples.is_empty() {
                continue;
            }
            match pipeline.process(&samples) {
                Ok(output) => on_output(output),
                Err(Error::InvalidBatchLength { len, factor }) => {
                    log::warn!("dropping misaligned batch: len={len} factor={factor}");
                }
                Err(e) => log::warn!("pipeline error on batch: {e}"),
            }
        }
    });

    ConsumerHandle {
        running,
        handle: Some(handle),
    }
}
