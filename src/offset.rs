//! Square-law frequency-offset corrector (§4.7).
//!
//! Estimates and removes residual carrier offset from a tone-spaced
//! FSK-like signal by squaring the block (which folds the two tone
//! peaks onto a single pair straddling twice the residual carrier),
//! locating that pair in the spectrum, and de-rotating the original
//! (unsquared) block by the estimated offset. Grounded on the
//! square-law carrier search described in §4.7; built on this crate's
//! own [`crate::fft::Fft`] rather than an external FFT crate.

use crate::fft::Fft;
use num_complex::Complex32;
use std::f32::consts::PI;

/// Tone separation assumed for the square-law search, in Hz (AIS GMSK
/// at 9600 baud sampled at 48 kHz per §4.7's worked example).
const TONE_SEPARATION_HZ: f32 = 9600.0;
const SEARCH_SAMPLE_RATE_HZ: f32 = 48_000.0;

pub struct OffsetCorrector {
    fft: Fft,
    n: usize,
    delta: usize,
    window: usize,
    scratch: Vec<Complex32>,
    pending: Vec<Complex32>,
    phase: Complex32,
}

impl OffsetCorrector {
    /// `n` must be a power of two (default 2048 per §4.7). `window`
    /// bounds the search range away from the block edges, where the
    /// squared spectrum's own DC/Nyquist leakage would otherwise bias
    /// the peak search; a small fraction of `n` is a safe default.
    pub fn new(n: usize) -> Self {
        let delta = ((TONE_SEPARATION_HZ / SEARCH_SAMPLE_RATE_HZ) * n as f32).round() as usize;
        Self {
            fft: Fft::new(n),
            n,
            delta,
            window: n / 16,
            scratch: vec![Complex32::default(); n],
            pending: Vec::with_capacity(n),
            phase: Complex32::new(1.0, 0.0),
        }
    }

    pub fn block_size(&self) -> usize {
        self.n
    }

    fn process_block(&mut self, block: &[Complex32], output: &mut Vec<Complex32>) {
        let n = self.n;
        let squared: Vec<Complex32> = block.iter().map(|&x| x * x).collect();
        self.fft.forward(&squared, &mut self.scratch);

        let lo = self.window;
        let hi = n.saturating_sub(self.window + self.delta);
        let mut best_i = lo;
        let mut best_score = f32::MIN;
        for i in lo..hi {
            let a = self.scratch[(i + n / 2) % n].norm();
            let b = self.scratch[(i + self.delta + n / 2) % n].norm();
            let score = a + b;
            if score > best_score {
                best_score = score;
                best_i = i;
            }
        }

        let fz = n as f32 / 2.0 - (best_i as f32 + self.delta as f32 / 2.0);
        let step = Complex32::from_polar(1.0, 2.0 * PI * fz / (2.0 * n as f32));

        output.reserve(n);
        for &x in block {
            output.push(x * self.phase);
            self.phase *= step;
        }
        let mag = self.phase.norm();
        if mag > 0.0 {
            self.phase /= mag;
        }
    }

    /// Accumulates `input` into whole blocks of `block_size()`,
    /// emitting a de-rotated block for each one completed. Leftover
    /// samples (fewer than a full block) are carried to the next call.
    pub fn process(&mut self, input: &[Complex32], output: &mut Vec<Complex32>) {
        output.clear();
        self.pending.extend_from_slice(input);
        let n = self.n;
        let mut offset = 0;
        while self.pending.len() - offset >= n {
            let block: Vec<Complex32> = self.pending[offset..offset + n].to_vec();
            self.process_block(&block, output);
            offset += n;
        }
        self.pending.drain(..offset);
    }
}
