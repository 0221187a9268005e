use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::warn;

use crate::config::StreamFormat;

/// Streaming WAV encoder fed raw wire bytes.
///
/// The TCP stream carries no framing, so a received chunk may end in the
/// middle of a 16-bit sample; the unpaired byte is carried over and joined
/// with the first byte of the next chunk. A final unpaired byte at end of
/// stream has no complete sample and is dropped at finalization.
pub struct StreamWriter {
    writer: Option<hound::WavWriter<BufWriter<File>>>,
    bits_per_sample: u16,
    pending: Option<u8>,
    samples_written: u64,
}

impl StreamWriter {
    pub fn create(path: &Path, format: &StreamFormat) -> Result<Self> {
        let writer = hound::WavWriter::create(path, format.wav_spec())
            .with_context(|| format!("Failed to create WAV file: {:?}", path))?;

        Ok(Self {
            writer: Some(writer),
            bits_per_sample: format.bits_per_sample,
            pending: None,
            samples_written: 0,
        })
    }

    /// Append a chunk of raw sample bytes to the container.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        if let Some(writer) = &mut self.writer {
            match self.bits_per_sample {
                8 => {
                    for &byte in bytes {
                        // 8-bit WAV payloads are unsigned, same as the wire
                        // encoding; hound's sample type is signed, so
                        // recenter around zero.
                        writer
                            .write_sample((byte ^ 0x80) as i8)
                            .context("Failed to write sample to WAV")?;
                        self.samples_written += 1;
                    }
                }
                _ => {
                    let mut data = bytes;

                    if let Some(first) = self.pending.take() {
                        match data.split_first() {
                            Some((&second, rest)) => {
                                writer
                                    .write_sample(i16::from_le_bytes([first, second]))
                                    .context("Failed to write sample to WAV")?;
                                self.samples_written += 1;
                                data = rest;
                            }
                            None => {
                                self.pending = Some(first);
                                return Ok(());
                            }
                        }
                    }

                    let mut pairs = data.chunks_exact(2);
                    for pair in &mut pairs {
                        writer
                            .write_sample(i16::from_le_bytes([pair[0], pair[1]]))
                            .context("Failed to write sample to WAV")?;
                        self.samples_written += 1;
                    }

                    if let [last] = pairs.remainder() {
                        self.pending = Some(*last);
                    }
                }
            }
        }

        Ok(())
    }

    pub fn samples_written(&self) -> u64 {
        self.samples_written
    }

    /// Flush the container header sizes and close the file.
    pub fn finalize(mut self) -> Result<()> {
        if let Some(writer) = self.writer.take() {
            writer.finalize().context("Failed to finalize WAV file")?;
        }
        Ok(())
    }
}

impl Drop for StreamWriter {
    fn drop(&mut self) {
        if let Some(writer) = self.writer.take() {
            if let Err(e) = writer.finalize() {
                warn!("Failed to finalize WAV writer on drop: {}", e);
            }
        }
    }
}
