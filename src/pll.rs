//! PLL-based symbol-timing recovery sampler (§4.11).
//!
//! Tracks symbol timing on a real-valued soft-bit stream using a
//! zero-crossing-driven phase accumulator; emits a decided symbol
//! roughly once per 5 input samples. `StartTraining`/`StopTraining`
//! messages switch between a fast (training) and slow (tracking) lock
//! gain, delivered out-of-band through a `thingbuf` MPSC channel in the
//! same style as `setting.rs`'s `Listen<X>` drains its setting channel
//! on every call.

use crate::sample::{Bit, Float32};
pub use thingbuf::mpsc::blocking::Sender;
use thingbuf::mpsc::blocking::{channel, Receiver};

const NOMINAL_STEP: f32 = 0.2; // 1 / 5 samples per symbol
const FAST_GAIN: f32 = 0.6;
const SLOW_GAIN: f32 = 0.05;

/// Control messages accepted by [`PllSampler`], mirroring the upstream
/// decoder's training-mode toggle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PllMessage {
    StartTraining,
    StopTraining,
}

/// A decided symbol, carrying both the hard bit and the soft sample it
/// was sliced from (useful for diagnostics and for feeding a coherent
/// demodulator that wants both).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Symbol {
    pub bit: Bit,
    pub value: Float32,
}

pub struct PllSampler {
    pll: f32,
    prev: bool,
    fast: bool,
    control: Receiver<PllMessage>,
}

impl PllSampler {
    /// Returns `(sender, sampler)`: send `PllMessage`s through the
    /// sender to toggle training mode from another thread or stage.
    pub fn new() -> (Sender<PllMessage>, Self) {
        let (sender, control) = channel(16);
        (
            sender,
            Self {
                pll: 0.0,
                prev: false,
                fast: false,
                control,
            },
        )
    }

    fn drain_control(&mut self) {
        while let Ok(msg) = self.control.try_recv() {
            self.fast = match msg {
                PllMessage::StartTraining => true,
                PllMessage::StopTraining => false,
            };
        }
    }

    pub fn reset(&mut self) {
        self.pll = 0.0;
        self.prev = false;
        self.fast = false;
    }

    pub fn is_training(&self) -> bool {
        self.fast
    }

    /// Consume `input`, appending a [`Symbol`] to `output` for every
    /// sample position where the PLL accumulator rolls over.
    pub fn process(&mut self, input: &[Float32], output: &mut Vec<Symbol>) {
        self.drain_control();
        output.clear();
        for &x in input {
            let bit = x > 0.0;
            if bit != self.prev {
                let gain = if self.fast { FAST_GAIN } else { SLOW_GAIN };
                self.pll += (0.5 - self.pll) * gain;
            }
            self.pll += NOMINAL_STEP;
            if self.pll >= 1.0 {
                output.push(Symbol { bit, value: x });
                self.pll -= self.pll.floor();
            }
            self.prev = bit;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Testable property 7: a 5-samples-per-symbol square wave yields
    /// one symbol per 5 input samples in steady state.
    #[test]
    fn square_wave_yields_one_symbol_per_five_samples() {
        let (_tx, mut pll) = PllSampler::new();
        let mut input = Vec::new();
        for sym in 0..40 {
            let v = if sym % 2 == 0 { 1.0 } else { -1.0 };
            input.extend(std::iter::repeat(v).take(5));
        }
        let mut out = Vec::new();
        pll.process(&input, &mut out);
        let expected = input.len() / 5;
        assert!(
            (out.len() as i64 - expected as i64).abs() <= 1,
            "{} vs {}",
            out.len(),
            expected
        );
    }

    #[test]
    fn start_training_message_sets_fast_gain() {
        let (tx, mut pll) = PllSampler::new();
        assert!(!pll.is_training());
        tx.send(PllMessage::StartTraining).unwrap();
        let mut out = Vec::new();
        pll.process(&[1.0, -1.0, 1.0], &mut out);
        assert!(pll.is_training());
        tx.send(PllMessage::StopTraining).unwrap();
        pll.process(&[1.0], &mut out);
        assert!(!pll.is_training());
    }

    #[test]
    fn output_value_matches_sample_at_decision_point() {
        let (_tx, mut pll) = PllSampler::new();
        let input = vec![1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0];
        let mut out = Vec::new();
        pll.process(&input, &mut out);
        for s in &out {
            assert_eq!(s.value, 1.0);
            assert!(s.bit);
        }
    }
}
