//! Sample formats and normalisation to `Complex32`.
//!
//! `CU8`/`CS16`/`CF32` are the wire formats a device or file can deliver.
//! Every stage downstream of the front end works in normalised `Complex32`
//! (nominally within `[-1, 1]`), `f32` soft bits, or `bool` decided bits.

use num_complex::Complex32;

/// A soft decision: sign encodes the bit, magnitude the confidence.
pub type Float32 = f32;

/// A decided bit.
pub type Bit = bool;

/// Complex baseband sample used throughout the DSP graph.
pub type Cf32 = Complex32;

/// Unsigned 8-bit I/Q pair, DC bias 128, scale 128 (RTL-SDR's native format).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cu8 {
    pub i: u8,
    pub q: u8,
}

impl Cu8 {
    pub const fn new(i: u8, q: u8) -> Self {
        Self { i, q }
    }

    /// Normalise to `Complex32` in (roughly) `[-1, 1]`.
    #[inline]
    pub fn to_cf32(self) -> Cf32 {
        Cf32::new(
            (self.i as f32 - 128.0) / 128.0,
            (self.q as f32 - 128.0) / 128.0,
        )
    }
}

/// Signed 16-bit I/Q pair, scale 32768.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cs16 {
    pub i: i16,
    pub q: i16,
}

impl Cs16 {
    pub const fn new(i: i16, q: i16) -> Self {
        Self { i, q }
    }

    #[inline]
    pub fn to_cf32(self) -> Cf32 {
        Cf32::new(self.i as f32 / 32768.0, self.q as f32 / 32768.0)
    }
}

/// Convert a batch of `CU8` samples into normalised `Complex32`.
pub fn cu8_to_cf32(input: &[Cu8], output: &mut Vec<Cf32>) {
    output.clear();
    output.extend(input.iter().map(|s| s.to_cf32()));
}

/// Convert a batch of `CS16` samples into normalised `Complex32`.
pub fn cs16_to_cf32(input: &[Cs16], output: &mut Vec<Cf32>) {
    output.clear();
    output.extend(input.iter().map(|s| s.to_cf32()));
}

/// `CF32` is already the working representation: pass-through copy.
pub fn cf32_to_cf32(input: &[Cf32], output: &mut Vec<Cf32>) {
    output.clear();
    output.extend_from_slice(input);
}

/// Raw sample format carried by a headerless capture file or a device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RawFormat {
    Cu8,
    Cs16,
    Cf32,
}

impl RawFormat {
    /// Size in bytes of one complex sample in this format.
    pub const fn sample_size(self) -> usize {
        match self {
            RawFormat::Cu8 => 2,
            RawFormat::Cs16 => 4,
            RawFormat::Cf32 => 8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cu8_midpoint_is_zero() {
        assert_eq!(Cu8::new(128, 128).to_cf32(), Cf32::new(0.0, 0.0));
    }

    #[test]
    fn cu8_full_scale() {
        let c = Cu8::new(255, 0).to_cf32();
        assert!((c.re - (127.0 / 128.0)).abs() < 1e-6);
        assert!((c.im - (-1.0)).abs() < 1e-6);
    }

    #[test]
    fn cs16_full_scale() {
        let c = Cs16::new(32767, -32768).to_cf32();
        assert!((c.re - (32767.0 / 32768.0)).abs() < 1e-6);
        assert!((c.im - (-1.0)).abs() < 1e-6);
    }

    #[test]
    fn batch_conversion_preserves_length() {
        let input = vec![Cu8::new(128, 128); 5];
        let mut out = Vec::new();
        cu8_to_cf32(&input, &mut out);
        assert_eq!(out.len(), 5);
    }
}
