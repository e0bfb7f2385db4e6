//! Coherent GMSK demodulator (§4.9).
//!
//! Tracks `nPhases` candidate bit-decision phases in parallel, each
//! scored by a sliding-window minimum-magnitude confidence, and emits
//! the bit decided by whichever phase currently has the strongest
//! worst-case history. Grounded on `CoherentDemodulation::Receive` /
//! `ChallengerDemodulation::Receive` in `Demod.cpp`; the two differ
//! only in the sign of `b`, preserved here as [`Variant`] rather than
//! two near-duplicate types.

use crate::sample::Bit;
use num_complex::Complex32;
use std::f32::consts::PI;

const N_PHASES: usize = 16;
const N_HISTORY: usize = 8;
const N_UPDATE: usize = 2 * N_PHASES;
const N_SEARCH: usize = 2;

/// Sign of `b` in the linear-classification score. The two original
/// implementations are identical save for this one flip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Variant {
    Coherent,
    Challenger,
}

impl Variant {
    #[inline]
    fn sign(self) -> f32 {
        match self {
            Variant::Coherent => 1.0,
            Variant::Challenger => -1.0,
        }
    }
}

/// Multi-phase coherent GMSK bit decider.
pub struct CoherentDemod {
    variant: Variant,
    phase: [Complex32; N_PHASES / 2],
    rot: u8,
    bits: [u32; N_PHASES],
    memory: [[f32; N_HISTORY]; N_PHASES],
    last: usize,
    update: usize,
    max_idx: usize,
}

impl CoherentDemod {
    pub fn new(variant: Variant) -> Self {
        let np2 = N_PHASES / 2;
        let mut phase = [Complex32::new(0.0, 0.0); N_PHASES / 2];
        for (i, p) in phase.iter_mut().enumerate() {
            let alpha = PI / 2.0 / np2 as f32 * i as f32 + PI / 2.0 / (2.0 * np2 as f32);
            *p = Complex32::from_polar(1.0, alpha);
        }
        Self {
            variant,
            phase,
            rot: 0,
            bits: [0; N_PHASES],
            memory: [[0.0; N_HISTORY]; N_PHASES],
            last: 0,
            update: 0,
            max_idx: 0,
        }
    }

    pub fn reset(&mut self) {
        let variant = self.variant;
        *self = Self::new(variant);
    }

    /// Output length equals input length: one decided bit, as ±1, per
    /// input sample.
    pub fn process(&mut self, input: &[Complex32], output: &mut Vec<f32>) {
        output.clear();
        output.reserve(input.len());
        let np2 = N_PHASES / 2;
        let sign = self.variant.sign();

        for &x in input {
            // Multiply by j^rot so every quarter-rotated GMSK point maps
            // onto the same reference axis.
            let (re, im) = match self.rot & 3 {
                0 => (x.re, x.im),
                1 => (-x.im, x.re),
                2 => (-x.re, -x.im),
                _ => (x.im, -x.re),
            };
            self.rot = self.rot.wrapping_add(1) & 3;

            for j in 0..np2 {
                let a = re * self.phase[j].re;
                let b = sign * im * self.phase[j].im;

                self.bits[j] <<= 1;
                self.bits[N_PHASES - 1 - j] <<= 1;

                let t_plus = a + b;
                self.bits[j] |= (t_plus > 0.0) as u32;
                self.memory[j][self.last] = t_plus.abs();

                let t_minus = a - b;
                self.bits[N_PHASES - 1 - j] |= (t_minus > 0.0) as u32;
                self.memory[N_PHASES - 1 - j][self.last] = t_minus.abs();
            }
            self.last = (self.last + 1) % N_HISTORY;

            self.update = (self.update + 1) % N_UPDATE;
            if self.update == 0 {
                let mut max_val = 0.0f32;
                let prev_max = self.max_idx;
                for p in (N_PHASES - N_SEARCH)..=(N_PHASES + N_SEARCH) {
                    let j = (p + prev_max) % N_PHASES;
                    let min_abs = self.memory[j]
                        .iter()
                        .copied()
                        .fold(f32::INFINITY, f32::min);
                    if min_abs > max_val {
                        max_val = min_abs;
                        self.max_idx = j;
                    }
                }
            }

            let b2 = (self.bits[self.max_idx] >> 1) & 1 != 0;
            let b1 = self.bits[self.max_idx] & 1 != 0;
            output.push(if b1 ^ b2 { 1.0 } else { -1.0 });
        }
    }
}

/// Decide hard bits from the demodulator's soft ±1 output, per the
/// trivial zero-threshold slicer used elsewhere in the pipeline.
pub fn slice(soft: &[f32], output: &mut Vec<Bit>) {
    output.clear();
    output.extend(soft.iter().map(|&y| y > 0.0));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_length_matches_input() {
        let mut demod = CoherentDemod::new(Variant::Coherent);
        let input = vec![Complex32::new(1.0, 0.5); 50];
        let mut out = Vec::new();
        demod.process(&input, &mut out);
        assert_eq!(out.len(), 50);
    }

    #[test]
    fn output_is_always_plus_or_minus_one() {
        let mut demod = CoherentDemod::new(Variant::Challenger);
        let input: Vec<Complex32> = (0..400)
            .map(|i| Complex32::from_polar(1.0, (i as f32 * 0.37).sin()))
            .collect();
        let mut out = Vec::new();
        demod.process(&input, &mut out);
        for &y in &out {
            assert!(y == 1.0 || y == -1.0);
        }
    }

    #[test]
    fn coherent_and_challenger_agree_when_im_is_zero() {
        // b = sign * im * phase.im; when im == 0, b == 0 regardless of
        // sign, so both variants must produce identical bit streams.
        let input = vec![Complex32::new(0.7, 0.0); 200];
        let mut a = CoherentDemod::new(Variant::Coherent);
        let mut b = CoherentDemod::new(Variant::Challenger);
        let mut out_a = Vec::new();
        let mut out_b = Vec::new();
        a.process(&input, &mut out_a);
        b.process(&input, &mut out_b);
        assert_eq!(out_a, out_b);
    }

    #[test]
    fn slice_thresholds_at_zero() {
        let mut out = Vec::new();
        slice(&[1.0, -1.0, 0.5, -0.2], &mut out);
        assert_eq!(out, vec![true, false, true, false]);
    }
}
