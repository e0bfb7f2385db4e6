use ais_dsp::cic5::Downsample2Cic5;
use ais_dsp::fft::Fft;
use ais_dsp::pipeline::{AisPipeline, PipelineConfig};
use ais_dsp::polyphase::Downsample3;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use num_complex::Complex32;

fn bench_cic5(c: &mut Criterion) {
    let input: Vec<Complex32> = (0..8192)
        .map(|i| Complex32::new((i as f32 * 0.01).sin(), (i as f32 * 0.02).cos()))
        .collect();
    let mut out = Vec::new();
    c.bench_function("cic5_downsample2", |b| {
        let mut cic = Downsample2Cic5::new();
        b.iter(|| {
            cic.process(black_box(&input), &mut out).unwrap();
        })
    });
}

fn bench_polyphase(c: &mut Criterion) {
    let input: Vec<Complex32> = (0..4096)
        .map(|i| Complex32::new((i as f32 * 0.03).sin(), (i as f32 * 0.04).cos()))
        .collect();
    let mut out = Vec::new();
    c.bench_function("polyphase_downsample3", |b| {
        let mut down = Downsample3::new();
        b.iter(|| {
            down.process(black_box(&input), &mut out).unwrap();
        })
    });
}

fn bench_fft(c: &mut Criterion) {
    let n = 2048;
    let fft = Fft::new(n);
    let input: Vec<Complex32> = (0..n)
        .map(|i| Complex32::new((i as f32 * 0.01).sin(), 0.0))
        .collect();
    let mut out = Vec::new();
    c.bench_function("fft_forward_2048", |b| {
        b.iter(|| {
            fft.forward(black_box(&input), &mut out);
        })
    });
}

fn bench_pipeline(c: &mut Criterion) {
    let input = vec![Complex32::new(0.1, -0.05); 3072];
    c.bench_function("pipeline_process_batch", |b| {
        let mut pipeline = AisPipeline::new(PipelineConfig::default());
        b.iter(|| {
            let _ = pipeline.process(black_box(&input));
        })
    });
}

criterion_group!(benches, bench_cic5, bench_polyphase, bench_fft, bench_pipeline);
criterion_main!(benches);
