//! Dual-output frequency rotator (§4.6).
//!
//! Mixes the input up and down by a fixed offset to produce two
//! baseband streams from one intermediate-frequency stream, the way a
//! receiver splits an RTL-SDR capture into the AIS "A" and "B" VHF
//! channels. Grounded on the rotator stage feeding `Downsample3Complex`
//! in `DSP.cpp`.

use num_complex::Complex32;
use std::f32::consts::PI;

/// A unit phasor advanced by a fixed per-sample step, renormalised at
/// batch boundaries to cancel floating-point drift.
#[derive(Clone, Copy)]
struct Phasor {
    value: Complex32,
    step: Complex32,
}

impl Phasor {
    fn new(step: Complex32) -> Self {
        Self {
            value: Complex32::new(1.0, 0.0),
            step,
        }
    }

    #[inline]
    fn advance(&mut self) -> Complex32 {
        let out = self.value;
        self.value *= self.step;
        out
    }

    fn renormalize(&mut self) {
        let mag = self.value.norm();
        if mag > 0.0 {
            self.value /= mag;
        }
    }
}

/// Splits one complex baseband stream into two, mixed by `+offset_hz`
/// and `-offset_hz` respectively.
pub struct Rotator {
    up: Phasor,
    down: Phasor,
}

impl Rotator {
    /// `offset_hz` is the frequency shift (e.g. 25 kHz for the AIS A/B
    /// channel spacing); `sample_rate_hz` is the input sample rate.
    pub fn new(offset_hz: f32, sample_rate_hz: f32) -> Self {
        let angle = 2.0 * PI * offset_hz / sample_rate_hz;
        Self {
            up: Phasor::new(Complex32::from_polar(1.0, angle)),
            down: Phasor::new(Complex32::from_polar(1.0, -angle)),
        }
    }

    /// Mix `input` into `up_out` (shifted by `+offset_hz`) and
    /// `down_out` (shifted by `-offset_hz`). Both outputs have the same
    /// length as `input`. Phasors are renormalised once per call.
    pub fn process(
        &mut self,
        input: &[Complex32],
        up_out: &mut Vec<Complex32>,
        down_out: &mut Vec<Complex32>,
    ) {
        up_out.clear();
        down_out.clear();
        up_out.reserve(input.len());
        down_out.reserve(input.len());
        for &x in input {
            up_out.push(x * self.up.advance());
            down_out.push(x * self.down.advance());
        }
        self.up.renormalize();
        self.down.renormalize();
    }

    /// Current drift of both phasors from unit magnitude; used by tests
    /// and diagnostics, not by the hot path.
    pub fn phasor_magnitudes(&self) -> (f32, f32) {
        (self.up.value.norm(), self.down.value.norm())
    }
}
