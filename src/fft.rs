//! Self-contained radix-2 Cooley-Tukey FFT (§4.7, §9).
//!
//! A textbook, unoptimised decimation-in-time FFT: the caller supplies
//! the input in bit-reversed order (via [`Fft::bit_reverse_copy`]) and
//! [`Fft::transform`] performs the butterfly passes in place. Twiddle
//! factors are cached per instance rather than globally, so a planner
//! is reusable across blocks of the same size without recomputation.
//! Grounded directly on `FFT::fft` / `FFT::calcOmega` / `FFT::rev` in
//! `FFT.h`; this crate intentionally does not delegate to an external
//! FFT crate for this stage.

use num_complex::Complex32;
use std::f32::consts::PI;

fn log2_usize(mut x: usize) -> u32 {
    let mut y = 0;
    while x > 1 {
        x >>= 1;
        y += 1;
    }
    y
}

fn bit_reverse(mut x: usize, log_n: u32) -> usize {
    let mut y = 0usize;
    for _ in 0..log_n {
        y <<= 1;
        y |= x & 1;
        x >>= 1;
    }
    y
}

/// An FFT planner for a fixed, power-of-two size `n`.
pub struct Fft {
    n: usize,
    log_n: u32,
    omega: Vec<Complex32>,
}

impl Fft {
    pub fn new(n: usize) -> Self {
        assert!(
            n.is_power_of_two() && n >= 2,
            "FFT size must be a power of two >= 2"
        );
        let log_n = log2_usize(n);
        let mut omega = Vec::with_capacity(log_n as usize);
        let mut m = 2usize;
        for _ in 0..log_n {
            omega.push(Complex32::from_polar(1.0, -2.0 * PI / m as f32));
            m *= 2;
        }
        Self { n, log_n, omega }
    }

    pub fn size(&self) -> usize {
        self.n
    }

    /// Scatter `input` into `output` in bit-reversed order. `output`
    /// must already have `input.len()` elements (which must equal this
    /// planner's size).
    pub fn bit_reverse_copy(&self, input: &[Complex32], output: &mut [Complex32]) {
        assert_eq!(input.len(), self.n);
        assert_eq!(output.len(), self.n);
        for (i, &x) in input.iter().enumerate() {
            output[bit_reverse(i, self.log_n)] = x;
        }
    }

    /// In-place forward transform. `x` must already be in bit-reversed
    /// order (see [`Fft::bit_reverse_copy`]); on return it holds the DFT
    /// in natural order.
    pub fn transform(&self, x: &mut [Complex32]) {
        assert_eq!(x.len(), self.n);
        let mut m = 2usize;
        let mut m2 = 1usize;
        for s in 0..self.log_n as usize {
            let w = self.omega[s];
            let mut k = 0usize;
            while k < self.n {
                let mut o = Complex32::new(1.0, 0.0);
                for j in 0..m2 {
                    let t = o * x[k + j + m2];
                    let u = x[k + j];
                    x[k + j] = u + t;
                    x[k + j + m2] = u - t;
                    o *= w;
                }
                k += m;
            }
            m <<= 1;
            m2 <<= 1;
        }
    }

    /// Forward FFT from `input` into a fresh bit-reversed-then-transformed
    /// `output` vector. Convenience wrapper over `bit_reverse_copy` +
    /// `transform`.
    pub fn forward(&self, input: &[Complex32], output: &mut Vec<Complex32>) {
        output.clear();
        output.resize(self.n, Complex32::default());
        self.bit_reverse_copy(input, output);
        self.transform(output);
    }

    /// Inverse FFT via the standard conjugate trick: `ifft(x) =
    /// conj(fft(conj(x))) / N`. Not present in the component this module
    /// is grounded on (only a forward transform is needed by the
    /// square-law corrector); added so a round-trip is possible.
    pub fn inverse(&self, input: &[Complex32], output: &mut Vec<Complex32>) {
        let conjugated: Vec<Complex32> = input.iter().map(|x| x.conj()).collect();
        self.forward(&conjugated, output);
        let scale = 1.0 / self.n as f32;
        for y in output.iter_mut() {
            *y = y.conj() * scale;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_reverse_is_involution() {
        for log_n in 1..8 {
            let n = 1usize << log_n;
            for i in 0..n {
                assert_eq!(bit_reverse(bit_reverse(i, log_n), log_n), i);
            }
        }
    }

    #[test]
    fn dc_input_produces_energy_only_in_bin_zero() {
        let fft = Fft::new(64);
        let input = vec![Complex32::new(1.0, 0.0); 64];
        let mut out = Vec::new();
        fft.forward(&input, &mut out);
        assert!((out[0].re - 64.0).abs() < 1e-3);
        for &bin in &out[1..] {
            assert!(bin.norm() < 1e-3);
        }
    }

    #[test]
    fn single_tone_produces_a_single_bin_peak() {
        let n = 256;
        let fft = Fft::new(n);
        let k0 = 10;
        let input: Vec<Complex32> = (0..n)
            .map(|t| Complex32::from_polar(1.0, 2.0 * PI * k0 as f32 * t as f32 / n as f32))
            .collect();
        let mut out = Vec::new();
        fft.forward(&input, &mut out);
        let (peak_bin, _) = out
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.norm().partial_cmp(&b.1.norm()).unwrap())
            .unwrap();
        assert_eq!(peak_bin, k0);
    }

    /// Scenario F: IFFT(FFT(x)) = x within tolerance.
    #[test]
    fn forward_inverse_round_trip() {
        let n = 2048;
        let fft = Fft::new(n);
        let input: Vec<Complex32> = (0..n)
            .map(|i| {
                let t = i as f32;
                Complex32::new((t * 0.013).sin(), (t * 0.029).cos())
            })
            .collect();
        let mut spectrum = Vec::new();
        fft.forward(&input, &mut spectrum);
        let mut recovered = Vec::new();
        fft.inverse(&spectrum, &mut recovered);
        for (a, b) in input.iter().zip(recovered.iter()) {
            assert!((a - b).norm() < 1e-4, "{} vs {}", a, b);
        }
    }
}
