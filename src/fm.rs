//! FM (differential-phase) demodulator (§4.8).
//!
//! Emits the wrapped phase difference between consecutive complex
//! samples, normalised to `[-1, 1]`. Grounded on the differential
//! demodulator stage of `Demod.cpp` that FM-based decoders fall back
//! to when the coherent path is not selected.

use crate::sample::Float32;
use num_complex::Complex32;
use std::f32::consts::PI;

/// A DC bias added to the demodulated phase before normalisation,
/// compensating for a receiver's fixed frequency offset.
#[derive(Clone, Copy, Default)]
pub struct FmDemod {
    prev: Complex32,
    dc_shift: f32,
}

impl FmDemod {
    pub fn new(dc_shift: f32) -> Self {
        Self {
            prev: Complex32::new(0.0, 0.0),
            dc_shift,
        }
    }

    pub fn reset(&mut self) {
        self.prev = Complex32::new(0.0, 0.0);
    }

    /// Output length equals input length.
    pub fn process(&mut self, input: &[Complex32], output: &mut Vec<Float32>) {
        output.clear();
        output.reserve(input.len());
        for &x in input {
            let d = x * self.prev.conj();
            let y = (d.im.atan2(d.re) + self.dc_shift) / PI;
            output.push(y);
            self.prev = x;
        }
    }
}
