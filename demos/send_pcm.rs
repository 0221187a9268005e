// Example: stream raw PCM bytes to a running audio-intake server
//
// Stands in for the embedded device: open a TCP connection, push bytes,
// close. That is the whole protocol.
//
// Usage: cargo run --example send_pcm -- --addr 127.0.0.1:7123 --file capture.pcm
//
// Without --file, two seconds of a generated 440 Hz tone (16 kHz mono,
// signed 16-bit little-endian) are sent instead.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::time::sleep;
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "send_pcm")]
#[command(about = "Stream raw PCM bytes to an audio-intake server")]
struct Args {
    /// Server address to stream to
    #[arg(short, long, default_value = "127.0.0.1:7123")]
    addr: String,

    /// File whose bytes are sent as-is (raw PCM, no header stripping)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Seconds of generated tone to send when no file is given
    #[arg(short, long, default_value = "2")]
    seconds: u32,

    /// Bytes per write, to mimic a device trickling samples
    #[arg(long, default_value = "1600")]
    chunk_size: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let args = Args::parse();

    let bytes = match &args.file {
        Some(path) => std::fs::read(path)
            .with_context(|| format!("Failed to read input file: {:?}", path))?,
        None => tone_bytes(args.seconds),
    };

    info!("connecting to {}", args.addr);
    let mut stream = TcpStream::connect(&args.addr)
        .await
        .with_context(|| format!("Failed to connect to {}", args.addr))?;

    info!("sending {} bytes", bytes.len());
    for chunk in bytes.chunks(args.chunk_size) {
        stream.write_all(chunk).await.context("Failed to send chunk")?;
        sleep(Duration::from_millis(10)).await;
    }

    stream.shutdown().await?;
    info!("done");
    Ok(())
}

/// 440 Hz sine at 16 kHz mono, signed 16-bit little-endian, half amplitude.
fn tone_bytes(seconds: u32) -> Vec<u8> {
    const RATE: u32 = 16000;
    const FREQ: f64 = 440.0;

    (0..RATE * seconds)
        .map(|i| {
            let t = i as f64 / RATE as f64;
            (16384.0 * (2.0 * std::f64::consts::PI * FREQ * t).sin()) as i16
        })
        .flat_map(|sample| sample.to_le_bytes())
        .collect()
}
