//! End-to-end integration tests exercising the public API the way a
//! caller outside the crate would: raw samples in, symbols out.

use ais_dsp::coherent::Variant;
use ais_dsp::pipeline::{AisPipeline, PipelineConfig};
use ais_dsp::sample::{cu8_to_cf32, Cu8};
use num_complex::Complex32;

#[test]
fn raw_cu8_batch_runs_end_to_end_without_error() {
    let mut pipeline = AisPipeline::new(PipelineConfig::default());

    // A few thousand samples of a mid-scale tone, large enough to clear
    // the CIC5/2 and FIR/3 decimation and feed at least one offset
    // corrector block on each channel.
    let raw: Vec<Cu8> = (0..12_288)
        .map(|i| {
            let phase = (i as f32 * 0.05).sin();
            Cu8::new((128.0 + 40.0 * phase) as u8, (128.0 + 40.0 * phase.cos()) as u8)
        })
        .collect();
    let mut samples = Vec::new();
    cu8_to_cf32(&raw, &mut samples);

    let result = pipeline.process(&samples).expect("pipeline should accept a well-formed batch");
    // Symbols may or may not appear depending on PLL lock state, but the
    // call must not panic or error, and the returned vectors are valid.
    assert!(result.channel_a.len() < samples.len());
    assert!(result.channel_b.len() < samples.len());
}

#[test]
fn challenger_variant_also_runs_end_to_end() {
    let config = PipelineConfig {
        demod_variant: Variant::Challenger,
        ..PipelineConfig::default()
    };
    let mut pipeline = AisPipeline::new(config);
    let samples = vec![Complex32::new(0.1, -0.05); 6144];
    assert!(pipeline.process(&samples).is_ok());
}

#[test]
fn misaligned_batch_length_is_a_recoverable_error_not_a_panic() {
    let mut pipeline = AisPipeline::new(PipelineConfig::default());
    let samples = vec![Complex32::new(0.0, 0.0); 5];
    assert!(pipeline.process(&samples).is_err());
    // The pipeline must remain usable after a rejected batch.
    let good = vec![Complex32::new(0.0, 0.0); 3072];
    assert!(pipeline.process(&good).is_ok());
}
