use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Instant;
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use tracing::{info, warn};

use super::stats::SessionStats;
use crate::audio::{unsigned16_to_signed, StreamWriter};
use crate::config::StreamFormat;

const READ_BUF_SIZE: usize = 8 * 1024;

/// Lifecycle of one accepted connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Connection established, encoder not yet open
    Accepted,
    /// Receiving bytes into the container
    Streaming,
    /// Stream ended cleanly and the container was finalized
    Finalized,
    /// Socket or write failure; the partial container was still finalized
    Errored,
}

/// Owns one connection's byte stream and its output file.
pub struct StreamSession {
    peer: String,
    output_path: PathBuf,
    format: StreamFormat,
    state: SessionState,
}

impl StreamSession {
    pub fn new(peer: String, output_path: PathBuf, format: StreamFormat) -> Self {
        Self {
            peer,
            output_path,
            format,
            state: SessionState::Accepted,
        }
    }

    /// Receive the connection's byte stream into the output file.
    ///
    /// Runs until the peer closes the connection or a socket/write error
    /// occurs. The container is finalized on both paths, so an abrupt
    /// disconnect still leaves a playable (if truncated) file behind; the
    /// terminal state in the returned stats says which path was taken.
    ///
    /// Only a failure to open the output file is returned as an error.
    pub async fn run(mut self, mut socket: TcpStream) -> Result<SessionStats> {
        info!("stream started from {}", self.peer);
        let started = Instant::now();

        let mut writer = StreamWriter::create(&self.output_path, &self.format)
            .with_context(|| format!("Failed to open output file: {:?}", self.output_path))?;
        self.state = SessionState::Streaming;

        let mut bytes_received: u64 = 0;
        let mut buf = vec![0u8; READ_BUF_SIZE];

        let outcome: Result<()> = loop {
            let n = match socket.read(&mut buf).await {
                Ok(0) => break Ok(()),
                Ok(n) => n,
                Err(e) => {
                    break Err(anyhow::Error::new(e).context("Failed to read from connection"))
                }
            };

            bytes_received += n as u64;

            // Each chunk is raw sample data in the configured format; the
            // only processing is the optional unsigned-to-signed shift.
            let chunk = &mut buf[..n];
            if self.format.bits_per_sample == 16 && self.format.wire_unsigned {
                unsigned16_to_signed(chunk);
            }

            if let Err(e) = writer.write_bytes(chunk) {
                break Err(e);
            }
        };

        // Both terminal states flush the container header, so whatever made
        // it to disk stays readable.
        let samples_written = writer.samples_written();
        let finalized = writer.finalize();

        self.state = match (&outcome, &finalized) {
            (Ok(()), Ok(())) => SessionState::Finalized,
            _ => SessionState::Errored,
        };

        let stats = SessionStats {
            peer: self.peer,
            output_path: self.output_path,
            bytes_received,
            samples_written,
            duration_secs: started.elapsed().as_secs_f64(),
            state: self.state,
        };

        match self.state {
            SessionState::Finalized => {
                info!(
                    "transmission complete, saved to {}",
                    stats.output_path.display()
                );
            }
            _ => {
                if let Err(e) = &outcome {
                    warn!(
                        "stream from {} ended with error: {:#}; partial file finalized at {}",
                        stats.peer,
                        e,
                        stats.output_path.display()
                    );
                }
                if let Err(e) = &finalized {
                    warn!(
                        "failed to finalize {} for {}: {:#}",
                        stats.output_path.display(),
                        stats.peer,
                        e
                    );
                }
            }
        }

        Ok(stats)
    }
}
