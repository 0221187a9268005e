use std::path::PathBuf;

use super::session::SessionState;

/// Summary of a finished stream session.
#[derive(Debug, Clone)]
pub struct SessionStats {
    /// Remote peer address the stream came from
    pub peer: String,

    /// File the stream was recorded into
    pub output_path: PathBuf,

    /// Total bytes received over the connection
    pub bytes_received: u64,

    /// Samples actually written into the container
    pub samples_written: u64,

    /// Wall-clock duration of the session in seconds
    pub duration_secs: f64,

    /// Terminal state the session ended in
    pub state: SessionState,
}
