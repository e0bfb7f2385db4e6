//! Device abstraction (§4.12, §5).
//!
//! A `Device` owns the hardware (or file) source feeding the bridge's
//! producer side: it is configured before `play()`, then pushes raw
//! byte batches into a [`crate::bridge::Bridge`] until `pause()`.
//! Grounded on the shared control surface of `RTLSDR` / `AIRSPYHF` in
//! `Device.cpp` (`openDevice`, `setSampleRate`, `setFrequency`,
//! `setAGCtoAuto`, `setFrequencyCorrection`, `SupportedSampleRates`,
//! `Play`/`Pause`, `isStreaming`).

use crate::bridge::Bridge;
use crate::error::{Error, Result};
use crate::sample::RawFormat;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Hardware (or file) source control surface.
pub trait Device {
    fn open(&mut self, handle: u64) -> Result<()>;
    fn set_sample_rate(&mut self, rate_hz: u32) -> Result<()>;
    fn set_frequency(&mut self, freq_hz: u32) -> Result<()>;
    fn set_agc(&mut self, auto: bool) -> Result<()>;
    fn set_frequency_correction(&mut self, ppm: i32) -> Result<()>;
    fn supported_sample_rates(&self) -> Vec<u32>;
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self) -> Result<()>;
    fn is_streaming(&self) -> bool;
}

/// A trivial in-memory device used by tests and by offline file
/// replay: `push_batch` stands in for the hardware callback, emitting
/// whatever raw bytes are handed to it once `play()` has been called.
pub struct MockDevice {
    format: RawFormat,
    sample_rate_hz: u32,
    frequency_hz: u32,
    agc: bool,
    ppm: i32,
    streaming: Arc<AtomicBool>,
}

impl MockDevice {
    pub fn new(format: RawFormat) -> Self {
        Self {
            format,
            sample_rate_hz: 0,
            frequency_hz: 0,
            agc: false,
            ppm: 0,
            streaming: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn format(&self) -> RawFormat {
        self.format
    }

    pub fn sample_rate_hz(&self) -> u32 {
        self.sample_rate_hz
    }

    pub fn frequency_hz(&self) -> u32 {
        self.frequency_hz
    }

    pub fn agc(&self) -> bool {
        self.agc
    }

    pub fn ppm(&self) -> i32 {
        self.ppm
    }

    /// Stands in for the hardware callback firing: pushes one raw batch
    /// into `bridge`'s producer side, silently dropped (not even counted
    /// as an overrun) while the device isn't streaming, matching
    /// `RTLSDR::callback`'s own `if (!streaming) return;` guard.
    pub fn push_batch(&self, bridge: &Bridge, batch: Vec<u8>) {
        if self.is_streaming() {
            bridge.push(batch);
        }
    }
}

impl Device for MockDevice {
    fn open(&mut self, _handle: u64) -> Result<()> {
        Ok(())
    }

    fn set_sample_rate(&mut self, rate_hz: u32) -> Result<()> {
        if !self.supported_sample_rates().contains(&rate_hz) {
            return Err(Error::DeviceError(format!(
                "unsupported sample rate {rate_hz}"
            )));
        }
        self.sample_rate_hz = rate_hz;
        Ok(())
    }

    fn set_frequency(&mut self, freq_hz: u32) -> Result<()> {
        self.frequency_hz = freq_hz;
        Ok(())
    }

    fn set_agc(&mut self, auto: bool) -> Result<()> {
        self.agc = auto;
        Ok(())
    }

    fn set_frequency_correction(&mut self, ppm: i32) -> Result<()> {
        self.ppm = ppm;
        Ok(())
    }

    fn supported_sample_rates(&self) -> Vec<u32> {
        vec![48_000, 288_000, 384_000, 768_000, 1_536_000, 1_920_000]
    }

    fn play(&mut self) -> Result<()> {
        self.streaming.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.streaming.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_streaming(&self) -> bool {
        self.streaming.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unsupported_sample_rate() {
        let mut dev = MockDevice::new(RawFormat::Cu8);
        let err = dev.set_sample_rate(123_456).unwrap_err();
        assert!(matches!(err, Error::DeviceError(_)));
    }

    #[test]
    fn accepts_a_supported_sample_rate() {
        let mut dev = MockDevice::new(RawFormat::Cu8);
        dev.set_sample_rate(1_536_000).unwrap();
        assert_eq!(dev.sample_rate_hz(), 1_536_000);
    }

    #[test]
    fn play_and_pause_toggle_streaming_flag() {
        let mut dev = MockDevice::new(RawFormat::Cs16);
        assert!(!dev.is_streaming());
        dev.play().unwrap();
        assert!(dev.is_streaming());
        dev.pause().unwrap();
        assert!(!dev.is_streaming());
    }

    #[test]
    fn push_batch_is_dropped_silently_while_paused() {
        let dev = MockDevice::new(RawFormat::Cu8);
        let bridge = Bridge::new();
        dev.push_batch(&bridge, vec![1, 2, 3]);
        assert_eq!(bridge.len(), 0);
        assert_eq!(bridge.overrun_count(), 0);
    }

    #[test]
    fn push_batch_reaches_the_bridge_once_streaming() {
        let mut dev = MockDevice::new(RawFormat::Cu8);
        let bridge = Bridge::new();
        dev.play().unwrap();
        dev.push_batch(&bridge, vec![1, 2, 3]);
        assert_eq!(bridge.len(), 1);
    }
}
