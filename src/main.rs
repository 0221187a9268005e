use anyhow::Result;
use audio_intake::{IntakeServer, ServerConfig};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "audio-intake")]
#[command(about = "Record raw PCM TCP streams as WAV files")]
struct Args {
    /// TCP port to listen on for incoming audio
    #[arg(short, long)]
    port: Option<u16>,

    /// PCM channel count written into the WAV header
    #[arg(short, long)]
    channels: Option<u16>,

    /// Sample rate in Hz written into the WAV header
    #[arg(short, long)]
    rate: Option<u32>,

    /// Bit depth of the incoming samples (8 or 16)
    #[arg(short, long)]
    bits: Option<u16>,

    /// Treat 16-bit wire samples as unsigned and recenter them before writing
    #[arg(short, long)]
    unsigned: bool,

    /// Output directory (default: "out" next to the executable)
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Optional TOML configuration file
    #[arg(long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let mut cfg = ServerConfig::load(args.config.as_deref())?;
    if let Some(port) = args.port {
        cfg.port = port;
    }
    if let Some(channels) = args.channels {
        cfg.format.channels = channels;
    }
    if let Some(rate) = args.rate {
        cfg.format.sample_rate = rate;
    }
    if let Some(bits) = args.bits {
        cfg.format.bits_per_sample = bits;
    }
    if args.unsigned {
        cfg.format.wire_unsigned = true;
    }
    if let Some(out_dir) = args.out_dir {
        cfg.output_dir = out_dir;
    }

    let server = IntakeServer::bind(cfg).await?;
    server.run().await
}
