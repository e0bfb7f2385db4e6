//! Symmetric polyphase decimating FIR filters (§4.4): `/3` (21 taps) and
//! `/5` (19 taps), used downstream of the CIC5 stage to reach the final
//! channel rate. Grounded on `Downsample3Complex::Receive` /
//! `Downsample5Complex::Receive` in `DSP.cpp`, which this crate
//! reproduces bit-for-bit as literal tap tables but drives through the
//! shared [`DelayLine`] schedule instead of a hand-unrolled prefix loop.

use crate::buffer::DelayLine;
use crate::error::{Error, Result};
use num_complex::Complex32;

/// 21-tap linear-phase low-pass, decimation factor 3.
pub const TAPS_DOWN3: [f32; 21] = [
    -0.00101073661,
    0.0,
    0.00616649466,
    0.01130778123,
    0.0,
    -0.03044260089,
    -0.04750748661,
    0.0,
    0.12579695977,
    0.26922914593,
    0.33292088503,
    0.26922914593,
    0.12579695977,
    0.0,
    -0.04750748661,
    -0.03044260089,
    0.0,
    0.01130778123,
    0.00616649466,
    0.0,
    -0.00101073661,
];

/// 19-tap linear-phase low-pass, decimation factor 5.
pub const TAPS_DOWN5: [f32; 19] = [
    -0.02029180052,
    -0.03693692581,
    -0.04221362949,
    -0.03043770079,
    0.0,
    0.04565655118,
    0.09849846882,
    0.14774770323,
    0.18262620471,
    0.31070225733,
    0.18262620471,
    0.14774770323,
    0.09849846882,
    0.04565655118,
    0.0,
    -0.03043770079,
    -0.04221362949,
    -0.03693692581,
    -0.02029180052,
];

/// A fixed-tap decimating FIR: filter, then keep one sample in `factor`.
#[derive(Clone)]
struct PolyphaseDecimator {
    taps: &'static [f32],
    factor: usize,
    delay: DelayLine<Complex32>,
}

impl PolyphaseDecimator {
    fn new(taps: &'static [f32], factor: usize) -> Self {
        Self {
            taps,
            factor,
            delay: DelayLine::new(taps.len()),
        }
    }

    fn reset(&mut self) {
        self.delay.reset();
    }

    fn process(&mut self, input: &[Complex32], output: &mut Vec<Complex32>) -> Result<()> {
        if input.len() % self.factor != 0 {
            return Err(Error::InvalidBatchLength {
                len: input.len(),
                factor: self.factor,
            });
        }
        output.clear();
        output.reserve(input.len() / self.factor);
        let taps = self.taps;
        self.delay.process(input, self.factor, |window| {
            let mut acc = Complex32::new(0.0, 0.0);
            for (&h, &x) in taps.iter().zip(window.iter()) {
                acc += x * h;
            }
            output.push(acc);
        });
        Ok(())
    }
}

/// Decimate-by-3 polyphase low-pass.
#[derive(Clone)]
pub struct Downsample3 {
    inner: PolyphaseDecimator,
}

impl Downsample3 {
    pub fn new() -> Self {
        Self {
            inner: PolyphaseDecimator::new(&TAPS_DOWN3, 3),
        }
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }

    pub fn process(&mut self, input: &[Complex32], output: &mut Vec<Complex32>) -> Result<()> {
        self.inner.process(input, output)
    }
}

impl Default for Downsample3 {
    fn default() -> Self {
        Self::new()
    }
}

/// Decimate-by-5 polyphase low-pass.
#[derive(Clone)]
pub struct Downsample5 {
    inner: PolyphaseDecimator,
}

impl Downsample5 {
    pub fn new() -> Self {
        Self {
            inner: PolyphaseDecimator::new(&TAPS_DOWN5, 5),
        }
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }

    pub fn process(&mut self, input: &[Complex32], output: &mut Vec<Complex32>) -> Result<()> {
        self.inner.process(input, output)
    }
}

impl Default for Downsample5 {
    fn default() -> Self {
        Self::new()
    }
}
