use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;

/// Sample encoding shared by every stream session.
///
/// Fixed at startup; the incoming byte stream is assumed to already match
/// this format, so there is no per-connection negotiation or resampling.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct StreamFormat {
    /// PCM channel count written into the WAV header
    pub channels: u16,

    /// Sample rate in Hz written into the WAV header
    pub sample_rate: u32,

    /// Bit depth of the incoming samples (8 or 16)
    pub bits_per_sample: u16,

    /// Whether 16-bit wire samples are unsigned and need recentering
    /// before they are written as signed container samples
    pub wire_unsigned: bool,
}

impl Default for StreamFormat {
    fn default() -> Self {
        Self {
            channels: 1,
            sample_rate: 16000,
            bits_per_sample: 16,
            wire_unsigned: false,
        }
    }
}

impl StreamFormat {
    /// Reject formats the transform and container paths cannot represent.
    pub fn validate(&self) -> Result<()> {
        if self.bits_per_sample != 8 && self.bits_per_sample != 16 {
            anyhow::bail!(
                "unsupported bit depth {} (expected 8 or 16)",
                self.bits_per_sample
            );
        }
        if self.channels == 0 {
            anyhow::bail!("channel count must be at least 1");
        }
        if self.sample_rate == 0 {
            anyhow::bail!("sample rate must be positive");
        }
        Ok(())
    }

    pub fn wav_spec(&self) -> hound::WavSpec {
        hound::WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: self.bits_per_sample,
            sample_format: hound::SampleFormat::Int,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// TCP port the intake listener binds to
    pub port: u16,

    /// Directory recorded files are written into
    pub output_dir: PathBuf,

    /// Sample encoding of the incoming streams
    pub format: StreamFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 7123,
            output_dir: default_output_dir(),
            format: StreamFormat::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from an optional TOML file layered over defaults.
    ///
    /// Command-line flags are applied on top by the caller, so a missing file
    /// and a partial file both work.
    pub fn load(file: Option<&str>) -> Result<Self> {
        let defaults = ServerConfig::default();

        let mut builder = config::Config::builder()
            .set_default("port", defaults.port as i64)?
            .set_default(
                "output_dir",
                defaults.output_dir.to_string_lossy().to_string(),
            )?
            .set_default("format.channels", defaults.format.channels as i64)?
            .set_default("format.sample_rate", defaults.format.sample_rate as i64)?
            .set_default(
                "format.bits_per_sample",
                defaults.format.bits_per_sample as i64,
            )?
            .set_default("format.wire_unsigned", defaults.format.wire_unsigned)?;

        if let Some(file) = file {
            builder = builder.add_source(config::File::with_name(file));
        }

        Ok(builder.build()?.try_deserialize()?)
    }
}

/// The recording directory lives next to the executable, like the rest of
/// the deployment; falls back to the working directory when the executable
/// path cannot be resolved.
pub fn default_output_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("out")))
        .unwrap_or_else(|| PathBuf::from("out"))
}
