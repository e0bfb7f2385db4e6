//! Replays a stereo `CF32` WAV capture through the real device/bridge/
//! pipeline wiring (§4.12, §5): a producer ("device callback") thread reads
//! the file and hands raw batches to [`MockDevice::push_batch`], a
//! consumer thread drains the [`Bridge`] and runs [`AisPipeline`]
//! top-to-bottom, and this thread just reports the decided symbol counts
//! once the file is exhausted.

use ais_dsp::bridge::Bridge;
use ais_dsp::device::{Device, MockDevice};
use ais_dsp::pipeline::{AisPipeline, PipelineConfig};
use ais_dsp::runtime::spawn_consumer;
use ais_dsp::sample::RawFormat;
use ais_dsp::wav::read_header;
use std::env;
use std::fs::File;
use std::io::{BufReader, Read};
use std::process::ExitCode;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn run(path: &str) -> ais_dsp::error::Result<()> {
    let mut reader = BufReader::new(File::open(path)?);
    let header = read_header(&mut reader)?;
    log::info!(
        "opened {path}: {} Hz, {} bits/sample",
        header.sample_rate_hz, header.bits_per_sample
    );

    let bridge = Arc::new(Bridge::new());
    let mut device = MockDevice::new(RawFormat::Cf32);
    device.play()?;

    let pipeline = AisPipeline::new(PipelineConfig {
        input_sample_rate_hz: header.sample_rate_hz as f32,
        ..PipelineConfig::default()
    });

    let total_a = Arc::new(AtomicUsize::new(0));
    let total_b = Arc::new(AtomicUsize::new(0));
    let (ta, tb) = (total_a.clone(), total_b.clone());
    let consumer = spawn_consumer(
        bridge.clone(),
        RawFormat::Cf32,
        header.sample_rate_hz as f32,
        pipeline,
        move |output| {
            ta.fetch_add(output.channel_a.len(), Ordering::Relaxed);
            tb.fetch_add(output.channel_b.len(), Ordering::Relaxed);
        },
    );

    // Producer: stands in for the device's callback thread, reading the
    // rest of the file and handing raw batches to the bridge.
    let mut buf = vec![0u8; 3072 * 8];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => device.push_batch(&bridge, buf[..n].to_vec()),
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    device.pause()?;

    // Let the consumer drain whatever's left in the FIFO before stopping it.
    std::thread::sleep(Duration::from_millis(200));
    consumer.stop();

    println!("channel A symbols: {}", total_a.load(Ordering::Relaxed));
    println!("channel B symbols: {}", total_b.load(Ordering::Relaxed));
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let Some(path) = env::args().nth(1) else {
        eprintln!("usage: replay <capture.wav>");
        return ExitCode::FAILURE;
    };
    match run(&path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("replay failed: {e}");
            ExitCode::FAILURE
        }
    }
}
