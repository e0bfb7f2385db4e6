//! Generic direct-form FIR filter (§4.5), real or complex, no decimation.
//!
//! Grounded on `Filter::Receive` / `FilterComplex::Receive` in `DSP.cpp`:
//! same prefix/steady-state/suffix schedule as the polyphase decimators
//! (§4.4), just without skipping samples between outputs.

use crate::buffer::DelayLine;
use num_complex::Complex32;

/// A tap weight that can scale a sample of type `S`.
pub trait TapScale<S> {
    fn scale(self, sample: S) -> S;
}

impl TapScale<f32> for f32 {
    #[inline]
    fn scale(self, sample: f32) -> f32 {
        self * sample
    }
}

impl TapScale<Complex32> for f32 {
    #[inline]
    fn scale(self, sample: Complex32) -> Complex32 {
        sample * self
    }
}

/// Direct-form FIR filter over samples of type `S`, driven by real-valued
/// taps (as `DSP.cpp`'s `filter()` helper does for both the real and
/// complex variants).
#[derive(Clone)]
pub struct Fir<S: Copy + Default + std::ops::Add<Output = S>> {
    taps: Vec<f32>,
    delay: DelayLine<S>,
}

impl<S: Copy + Default + std::ops::Add<Output = S>> Fir<S>
where
    f32: TapScale<S>,
{
    /// Build a FIR from taps normalised so that DC gain is 1 (the caller's
    /// responsibility, per §3's numeric-units invariant).
    pub fn new(taps: Vec<f32>) -> Self {
        assert!(!taps.is_empty(), "a FIR must have at least one tap");
        let delay = DelayLine::new(taps.len());
        Self { taps, delay }
    }

    pub fn num_taps(&self) -> usize {
        self.taps.len()
    }

    pub fn reset(&mut self) {
        self.delay.reset();
    }

    /// Filter `input`, appending results to `output` (which is cleared
    /// first). Output length equals input length.
    pub fn process(&mut self, input: &[S], output: &mut Vec<S>) {
        output.clear();
        output.reserve(input.len());
        let taps = &self.taps;
        self.delay.process(input, 1, |window| {
            let mut acc = S::default();
            for (h, &x) in taps.iter().zip(window.iter()) {
                acc = acc + h.scale(x);
            }
            output.push(acc);
        });
    }
}

pub type FirReal = Fir<f32>;
pub type FirComplex = Fir<Complex32>;
