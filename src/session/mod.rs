//! Stream session management
//!
//! One session per accepted TCP connection: the session owns the output
//! file and its encoder for the connection's whole lifetime, feeds every
//! received chunk through the optional wire transform into the container,
//! and finalizes the file when the stream ends, cleanly or not.

mod session;
mod stats;

pub use session::{SessionState, StreamSession};
pub use stats::SessionStats;
