//! Device → pipeline bridge (§4.12, §5).
//!
//! A bounded, single-producer single-consumer FIFO of raw sample
//! batches connecting a device callback thread to the consumer thread
//! that drains it and runs the DSP graph. Grounded on
//! `RTLSDR::callback` / `RTLSDR::Demodulation` / `RTLSDR::Play` /
//! `RTLSDR::Pause` in `Device.cpp`; `sizeFIFO` is fixed at 16 per §3's
//! FIFO invariant (the original's `count == 10` overrun check belongs
//! to a differently-tuned build and is not carried over).

use log::warn;
use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};
use std::time::Duration;

const SIZE_FIFO: usize = 16;

struct FifoState {
    slots: VecDeque<Vec<u8>>,
    overruns: u64,
    streaming: bool,
}

/// The FIFO bridge. `count` (exposed via [`Bridge::len`]) always
/// satisfies `0 <= count <= sizeFIFO`; `head`/`tail` are implicit in
/// the `VecDeque`'s own bookkeeping rather than tracked by hand, but
/// the bounded-capacity and single-writer/single-reader invariants of
/// §3 and §5 hold identically.
pub struct Bridge {
    state: Mutex<FifoState>,
    not_empty: Condvar,
}

impl Bridge {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FifoState {
                slots: VecDeque::with_capacity(SIZE_FIFO),
                overruns: 0,
                streaming: false,
            }),
            not_empty: Condvar::new(),
        }
    }

    pub fn play(&self) {
        let mut state = self.state.lock().unwrap();
        state.streaming = true;
    }

    pub fn pause(&self) {
        let mut state = self.state.lock().unwrap();
        state.streaming = false;
        self.not_empty.notify_all();
    }

    pub fn is_streaming(&self) -> bool {
        self.state.lock().unwrap().streaming
    }

    pub fn overrun_count(&self) -> u64 {
        self.state.lock().unwrap().overruns
    }

    pub fn len(&self) -> usize {
        self.state.lock().unwrap().slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Producer side: called from the device's callback thread. Drops
    /// the batch and counts an overrun if the FIFO is full.
    pub fn push(&self, batch: Vec<u8>) {
        let mut state = self.state.lock().unwrap();
        if state.slots.len() == SIZE_FIFO {
            state.overruns += 1;
            warn!("buffer overrun, batch dropped");
            return;
        }
        state.slots.push_back(batch);
        self.not_empty.notify_one();
    }

    /// Consumer side: blocks until a batch is available or `timeout`
    /// elapses. Returns `None` on timeout (logged, non-fatal per §4.12)
    /// or once `pause()` has been called with an empty FIFO.
    pub fn pop(&self, timeout: Duration) -> Option<Vec<u8>> {
        let mut state = self.state.lock().unwrap();
        if state.slots.is_empty() {
            let (guard, result) = self
                .not_empty
                .wait_timeout_while(state, timeout, |s| s.slots.is_empty() && s.streaming)
                .unwrap();
            state = guard;
            if result.timed_out() && state.slots.is_empty() {
                warn!("device timeout waiting for samples");
                return None;
            }
        }
        state.slots.pop_front()
    }
}

impl Default for Bridge {
    fn default() -> Self {
        Self::new()
    }
}

/// Consumer-side wait timeout per §4.12: `1.1 * buffer_len / sample_rate`.
pub fn consumer_timeout(buffer_len: usize, sample_rate_hz: f32) -> Duration {
    let seconds = 1.1 * buffer_len as f32 / sample_rate_hz;
    Duration::from_secs_f32(seconds.max(0.0))
}
