//! End-to-end AIS receive pipeline (§2, §4).
//!
//! Wires the front end (rate conversion down to the dual 256 kS/s A/B
//! channel streams) through the rotator into two identical per-channel
//! chains (conditioning filter → offset corrector → coherent
//! demodulator → PLL sampler), matching the data-flow diagram in §2.
//! The external AIS bit decoder and NMEA assembly are out of scope
//! (§1 Non-goals); this stage hands off decided symbols.

use crate::cic5::Downsample2Cic5;
use crate::coherent::{CoherentDemod, Variant};
use crate::error::Result;
use crate::fir::FirComplex;
use crate::offset::OffsetCorrector;
use crate::pll::{PllMessage, PllSampler, Symbol};
use crate::polyphase::Downsample3;
use crate::rotator::Rotator;
use log::info;
use num_complex::Complex32;
use thingbuf::mpsc::blocking::Sender;

/// Tunable parameters for [`AisPipeline::new`].
#[derive(Clone, Copy, Debug)]
pub struct PipelineConfig {
    /// Input sample rate in Hz (e.g. 1_536_000 for an RTL-SDR at its
    /// usual AIS capture rate).
    pub input_sample_rate_hz: f32,
    /// A/B channel offset from the tuned centre frequency (25 kHz for
    /// the standard AIS channel spacing).
    pub channel_offset_hz: f32,
    /// Square-law offset corrector block size (power of two).
    pub offset_block_size: usize,
    /// Which GMSK decision rule to run downstream of the offset
    /// corrector.
    pub demod_variant: Variant,
    /// Conditioning FIR taps applied per channel after the rotator,
    /// ahead of the offset corrector (taps normalised to DC gain 1).
    pub channel_taps: Vec<f32>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_sample_rate_hz: 1_536_000.0,
            channel_offset_hz: 25_000.0,
            offset_block_size: 2048,
            demod_variant: Variant::Coherent,
            channel_taps: crate::polyphase::TAPS_DOWN5.to_vec(),
        }
    }
}

/// One A or B channel's demodulation chain, downstream of the shared
/// rotator output.
struct Channel {
    conditioning: FirComplex,
    offset: OffsetCorrector,
    demod: CoherentDemod,
    pll: PllSampler,
    training: Sender<PllMessage>,
}

impl Channel {
    fn new(config: &PipelineConfig) -> Self {
        let (training, pll) = PllSampler::new();
        Self {
            conditioning: FirComplex::new(config.channel_taps.clone()),
            offset: OffsetCorrector::new(config.offset_block_size),
            demod: CoherentDemod::new(config.demod_variant),
            pll,
            training,
        }
    }

    fn process(&mut self, input: &[Complex32], symbols: &mut Vec<Symbol>) {
        let mut conditioned = Vec::new();
        self.conditioning.process(input, &mut conditioned);

        let mut corrected = Vec::new();
        self.offset.process(&conditioned, &mut corrected);

        let mut soft = Vec::new();
        self.demod.process(&corrected, &mut soft);

        self.pll.process(&soft, symbols);
    }

    fn start_training(&self) {
        let _ = self.training.send(PllMessage::StartTraining);
    }

    fn stop_training(&self) {
        let _ = self.training.send(PllMessage::StopTraining);
    }
}

/// The full receive chain from normalised `CF32` samples down to
/// decided symbols on both AIS channels.
pub struct AisPipeline {
    cic5: Downsample2Cic5,
    fir3: Downsample3,
    rotator: Rotator,
    channel_a: Channel,
    channel_b: Channel,
}

/// Decided symbols for both channels produced by one call to
/// [`AisPipeline::process`].
#[derive(Default)]
pub struct PipelineOutput {
    pub channel_a: Vec<Symbol>,
    pub channel_b: Vec<Symbol>,
}

impl AisPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        let channel_rate = config.input_sample_rate_hz / 2.0 / 3.0;
        info!(
            "AIS pipeline: input {} Hz -> channel rate {} Hz",
            config.input_sample_rate_hz, channel_rate
        );
        Self {
            cic5: Downsample2Cic5::new(),
            fir3: Downsample3::new(),
            rotator: Rotator::new(config.channel_offset_hz, channel_rate),
            channel_a: Channel::new(&config),
            channel_b: Channel::new(&config),
        }
    }

    pub fn start_training(&self) {
        self.channel_a.start_training();
        self.channel_b.start_training();
    }

    pub fn stop_training(&self) {
        self.channel_a.stop_training();
        self.channel_b.stop_training();
    }

    /// Run one batch of normalised `CF32` baseband samples through the
    /// whole front end and both channel chains.
    pub fn process(&mut self, input: &[Complex32]) -> Result<PipelineOutput> {
        let mut after_cic5 = Vec::new();
        self.cic5.process(input, &mut after_cic5)?;

        let mut after_fir3 = Vec::new();
        self.fir3.process(&after_cic5, &mut after_fir3)?;

        let mut up = Vec::new();
        let mut down = Vec::new();
        self.rotator.process(&after_fir3, &mut up, &mut down);

        let mut output = PipelineOutput::default();
        self.channel_a.process(&up, &mut output.channel_a);
        self.channel_b.process(&down, &mut output.channel_b);
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn processes_a_batch_without_error() {
        let mut pipeline = AisPipeline::new(PipelineConfig::default());
        let input: Vec<Complex32> = (0..3072)
            .map(|i| Complex32::from_polar(1.0, (i as f32 * 0.001).sin()))
            .collect();
        let result = pipeline.process(&input);
        assert!(result.is_ok());
    }

    #[test]
    fn rejects_batch_lengths_misaligned_with_cic5_decimation() {
        let mut pipeline = AisPipeline::new(PipelineConfig::default());
        let input = vec![Complex32::new(0.0, 0.0); 7];
        assert!(pipeline.process(&input).is_err());
    }

    #[test]
    fn training_messages_reach_both_channels() {
        let mut pipeline = AisPipeline::new(PipelineConfig::default());
        pipeline.start_training();
        // The message is queued; a channel only drains it on its next
        // `process` call.
        let mut empty = Vec::new();
        pipeline.channel_a.pll.process(&[], &mut empty);
        pipeline.channel_b.pll.process(&[], &mut empty);
        assert!(pipeline.channel_a.pll.is_training());
        assert!(pipeline.channel_b.pll.is_training());
    }
}
