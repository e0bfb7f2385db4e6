//! CIC5 cascaded integrator-comb filters (§4.3).
//!
//! A 5-stage comb/integrator cascade implemented as ten alternating
//! moving averages on a two-phase schedule, grounded on
//! `Downsample2CIC5::Receive` / `FilterCIC5::Receive` / `Decimate2::Receive`
//! in `DSP.cpp`. CIC5 has a per-stage-pair gain of `2^5 = 32`; both the
//! decimating and non-decimating filter variants compensate by scaling
//! output by `1/32`.

use crate::error::{Error, Result};
use num_complex::Complex32;

const CIC_GAIN_RECIPROCAL: f32 = 0.03125; // 1 / 32

/// The five-register, two-phase CIC5 recurrence shared by every variant
/// below. `r` and `h` are both zero at construction per §3.
#[derive(Clone, Copy, Default)]
struct Cic5State {
    r: [Complex32; 5],
    h: [Complex32; 5],
}

impl Cic5State {
    /// First half-cycle: feed `a`, return the (unscaled) output sample.
    #[inline]
    fn even(&mut self, a: Complex32) -> Complex32 {
        let mut z = a;
        self.r[0] = z;
        z += self.h[0];
        self.r[1] = z;
        z += self.h[1];
        self.r[2] = z;
        z += self.h[2];
        self.r[3] = z;
        z += self.h[3];
        self.r[4] = z;
        z += self.h[4];
        z
    }

    /// Second half-cycle: feed `b`, return the (unscaled) output sample.
    /// The decimating filter discards this value; the non-decimating
    /// variant keeps it.
    #[inline]
    fn odd(&mut self, b: Complex32) -> Complex32 {
        let mut z = b;
        self.h[0] = z;
        z += self.r[0];
        self.h[1] = z;
        z += self.r[1];
        self.h[2] = z;
        z += self.r[2];
        self.h[3] = z;
        z += self.r[3];
        self.h[4] = z;
        z += self.r[4];
        z
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Downsample-by-2 CIC5 decimator. Input length must be even; output
/// length is `input.len() / 2`.
#[derive(Clone, Default)]
pub struct Downsample2Cic5 {
    state: Cic5State,
}

impl Downsample2Cic5 {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.state.reset();
    }

    pub fn process(&mut self, input: &[Complex32], output: &mut Vec<Complex32>) -> Result<()> {
        if input.len() % 2 != 0 {
            return Err(Error::InvalidBatchLength {
                len: input.len(),
                factor: 2,
            });
        }
        output.clear();
        output.reserve(input.len() / 2);
        for pair in input.chunks_exact(2) {
            let out = self.state.even(pair[0]);
            output.push(out * CIC_GAIN_RECIPROCAL);
            self.state.odd(pair[1]);
        }
        Ok(())
    }
}

/// Non-decimating CIC5: the same five-stage schedule, but every input
/// sample produces an output (the even/odd phase alternates sample by
/// sample rather than pair by pair, and persists across batches).
/// Grounded on `FilterCIC5::Receive` (§ SUPPLEMENTED FEATURES in
/// SPEC_FULL.md).
#[derive(Clone, Default)]
pub struct FilterCic5 {
    state: Cic5State,
    phase_even: bool,
}

impl FilterCic5 {
    pub fn new() -> Self {
        Self {
            state: Cic5State::default(),
            phase_even: true,
        }
    }

    pub fn reset(&mut self) {
        self.state.reset();
        self.phase_even = true;
    }

    pub fn process(&mut self, input: &[Complex32], output: &mut Vec<Complex32>) -> Result<()> {
        output.clear();
        output.reserve(input.len());
        for &x in input {
            let z = if self.phase_even {
                self.state.even(x)
            } else {
                self.state.odd(x)
            };
            output.push(z * CIC_GAIN_RECIPROCAL);
            self.phase_even = !self.phase_even;
        }
        Ok(())
    }
}

/// Trivial decimate-by-2: keep only even-indexed samples, no filtering.
/// Grounded on `Decimate2::Receive`; used where anti-aliasing has
/// already happened upstream.
pub fn decimate2(input: &[Complex32], output: &mut Vec<Complex32>) -> Result<()> {
    if input.len() % 2 != 0 {
        return Err(Error::InvalidBatchLength {
            len: input.len(),
            factor: 2,
        });
    }
    output.clear();
    output.reserve(input.len() / 2);
    output.extend(input.iter().step_by(2));
    Ok(())
}
