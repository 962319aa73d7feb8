use radiosinad::blocks::{ByteOrder, F32Reader, Reading, SinadMeter};
use radiosinad::samples::Samples;
use radiosinad::signals::{GaussianNoise, Tone};
use radiosinad::sinad::{DegeneratePolicy, Sinad, SinadConfig};
use radiosinad::windowing::Window;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "SINAD measurement of demodulated audio",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Measure raw 32 bit float mono audio from a file or stdin
    Read(ReadArgs),
    /// Measure a generated reference tone with added noise
    Synth(SynthArgs),
}

#[derive(Args, Debug)]
struct MeasureArgs {
    /// Reference tone frequency in Hz
    #[arg(short = 't', long, default_value = "1000")]
    tone: f64,
    /// Sample rate in Hz
    #[arg(short = 'r', long, default_value = "48000")]
    rate: f64,
    /// Block length in samples
    #[arg(short = 'b', long, default_value = "1000")]
    block: usize,
    /// Width of the window around the reference tone in Hz
    #[arg(long, default_value = "20")]
    bandwidth: f64,
    /// Window function (hamming, hann, blackman, rectangular)
    #[arg(short = 'w', long, default_value = "hamming")]
    window: Window,
    /// Report this value (in dB) instead of an error when there is no noise
    #[arg(long)]
    saturate: Option<f64>,
}

impl MeasureArgs {
    fn estimator(&self) -> anyhow::Result<Sinad<f32>> {
        let policy = match self.saturate {
            Some(ceiling) => DegeneratePolicy::Saturate(ceiling),
            None => DegeneratePolicy::Reject,
        };
        let config = SinadConfig::new(self.tone, self.rate)
            .with_reference_bandwidth(self.bandwidth)
            .with_window(self.window)
            .with_block_len(self.block)
            .with_degenerate_policy(policy);
        Sinad::new(config).context("invalid measurement parameters")
    }
}

#[derive(Args, Debug)]
struct ReadArgs {
    /// Input file (stdin if omitted)
    path: Option<PathBuf>,
    /// Samples are big endian
    #[arg(long)]
    big_endian: bool,
    #[command(flatten)]
    measure: MeasureArgs,
}

#[derive(Args, Debug)]
struct SynthArgs {
    /// Tone level in dB relative to full scale
    #[arg(long, default_value = "-4.77", allow_negative_numbers = true)]
    tone_level: f64,
    /// Noise level (RMS) in dB relative to full scale
    #[arg(long, default_value = "-30", allow_negative_numbers = true)]
    noise_level: f64,
    /// Number of blocks to generate
    #[arg(short = 'n', long, default_value = "10")]
    blocks: usize,
    /// Seed for the noise generator
    #[arg(long, default_value = "1")]
    seed: u64,
    #[command(flatten)]
    measure: MeasureArgs,
}

fn print_reading(reading: &Reading) {
    match &reading.result {
        Ok(db) => println!("block {}: {db:.2} dB", reading.sequence),
        Err(err) => println!("block {}: no value ({err})", reading.sequence),
    }
}

async fn read(args: ReadArgs) -> anyhow::Result<()> {
    let mut meter = SinadMeter::lossless(args.measure.estimator()?);
    let byte_order = if args.big_endian {
        ByteOrder::BigEndian
    } else {
        ByteOrder::LittleEndian
    };
    let (rate, block) = (args.measure.rate, args.measure.block);
    let reader = match &args.path {
        Some(path) => F32Reader::with_path(path, byte_order, rate, block, meter.sender())
            .with_context(|| format!("could not open {}", path.display()))?,
        None => F32Reader::new(std::io::stdin(), byte_order, rate, block, meter.sender()),
    };
    let printer = async {
        while let Some(reading) = meter.recv().await {
            print_reading(&reading);
        }
    };
    tokio::select! {
        () = printer => anyhow::bail!("meter stopped unexpectedly"),
        result = reader.wait() => {
            let samples = result.context("could not read input")?;
            tracing::info!(samples, "input exhausted");
        }
    }
    for reading in meter.finish().await {
        print_reading(&reading);
    }
    Ok(())
}

async fn synth(args: SynthArgs) -> anyhow::Result<()> {
    let mut meter = SinadMeter::lossless(args.measure.estimator()?);
    let (rate, block, count) = (args.measure.rate, args.measure.block, args.blocks);
    let mut tone = Tone::with_level_db(args.measure.tone, args.tone_level);
    let mut noise = GaussianNoise::with_level_db(args.seed, args.noise_level);
    let sender = meter.sender();
    let generator = tokio::spawn(async move {
        for _ in 0..count {
            let chunk: Vec<f32> = tone
                .generate(rate, block)
                .into_iter()
                .zip(noise.generate(block))
                .map(|(t, n)| (t + n) as f32)
                .collect();
            if sender.send(Samples::new(rate, chunk)).await.is_err() {
                break;
            }
        }
    });
    let printer = async {
        while let Some(reading) = meter.recv().await {
            print_reading(&reading);
        }
    };
    tokio::select! {
        () = printer => anyhow::bail!("meter stopped unexpectedly"),
        result = generator => result.context("signal generator failed")?,
    }
    for reading in meter.finish().await {
        print_reading(&reading);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();
    match cli.command {
        Command::Read(args) => read(args).await,
        Command::Synth(args) => synth(args).await,
    }
}
