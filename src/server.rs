use anyhow::{Context, Result};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::allocator::PathAllocator;
use crate::config::ServerConfig;
use crate::session::StreamSession;

/// TCP listener that records every inbound connection as a WAV file.
pub struct IntakeServer {
    listener: TcpListener,
    config: ServerConfig,
    allocator: Arc<PathAllocator>,
}

impl IntakeServer {
    /// Create the output directory and bind the listen socket.
    ///
    /// Both are startup requirements: without a writable output directory or
    /// a bound port there is nowhere to record, so either failure is fatal.
    pub async fn bind(config: ServerConfig) -> Result<Self> {
        config.format.validate()?;

        std::fs::create_dir_all(&config.output_dir).with_context(|| {
            format!("Failed to create output directory: {:?}", config.output_dir)
        })?;

        let listener = TcpListener::bind(("0.0.0.0", config.port))
            .await
            .with_context(|| format!("Failed to bind TCP listener on port {}", config.port))?;

        let allocator = Arc::new(PathAllocator::new(config.output_dir.clone()));

        Ok(Self {
            listener,
            config,
            allocator,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections forever, one recording session per connection.
    ///
    /// A session failure is logged and contained to its own task; the
    /// listener and the other sessions keep running.
    pub async fn run(self) -> Result<()> {
        log_local_addresses();
        info!("listening on port {}", self.local_addr()?.port());
        info!(
            "configuration: {} channel(s), {} Hz, {} bits, wire {}",
            self.config.format.channels,
            self.config.format.sample_rate,
            self.config.format.bits_per_sample,
            if self.config.format.wire_unsigned {
                "unsigned"
            } else {
                "signed"
            },
        );

        loop {
            let (socket, peer) = self
                .listener
                .accept()
                .await
                .context("Failed to accept connection")?;

            // Allocation happens here, before the session task starts, so
            // the allocator's critical section is the only shared state.
            let output_path = self.allocator.allocate();
            let session = StreamSession::new(peer.to_string(), output_path, self.config.format);

            tokio::spawn(async move {
                match session.run(socket).await {
                    Ok(stats) => {
                        info!(
                            "session from {} done: {} bytes received, {} samples in {:.1}s",
                            stats.peer, stats.bytes_received, stats.samples_written, stats.duration_secs
                        );
                    }
                    Err(e) => {
                        error!("session from {} failed: {:#}", peer, e);
                    }
                }
            });
        }
    }
}

/// Log every non-loopback IPv4 address so the device side knows where to
/// point its stream.
fn log_local_addresses() {
    match if_addrs::get_if_addrs() {
        Ok(ifaces) => {
            for iface in ifaces {
                if iface.is_loopback() {
                    continue;
                }
                if let IpAddr::V4(addr) = iface.ip() {
                    info!("found address {}: {}", iface.name, addr);
                }
            }
        }
        Err(e) => warn!("could not enumerate network interfaces: {}", e),
    }
}
