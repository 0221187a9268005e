use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{debug, warn};

/// Highest sequence number the forward scan will probe.
const MAX_SEQ: u32 = 99998;

/// Sequence number of the reserved fallback slot handed out on exhaustion.
const FALLBACK_SEQ: u32 = 0;

/// Produces collision-avoiding output paths of the form `NNNNN.wav`.
///
/// The numbering state lives only in memory, so a restarted process rescans
/// from the bottom of the range. Uniqueness is checked against the filesystem
/// at allocation time only; the scan is serialized by an internal mutex so
/// concurrent connections cannot claim the same candidate.
pub struct PathAllocator {
    output_dir: PathBuf,
    max_seq: u32,
    last_num: Mutex<u32>,
}

impl PathAllocator {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            max_seq: MAX_SEQ,
            last_num: Mutex::new(0),
        }
    }

    /// Return a path that did not exist at the time of the check.
    ///
    /// Scans forward from the last allocated number, so steady-state
    /// allocation costs a single existence probe. Once every number in the
    /// range is occupied, the reserved fallback slot is returned
    /// unconditionally and the counter restarts from the bottom; repeated
    /// exhaustion keeps reusing (and overwriting) that one slot.
    pub fn allocate(&self) -> PathBuf {
        let mut last_num = self.last_num.lock().unwrap();

        for num in (*last_num + 1)..=self.max_seq {
            let candidate = self.output_dir.join(file_name(num));
            match candidate.try_exists() {
                Ok(true) => continue,
                Ok(false) => {
                    *last_num = num;
                    return candidate;
                }
                Err(e) => {
                    // A failed probe is indistinguishable from absence: the
                    // slot is handed out as free.
                    debug!("existence probe failed for {}: {}", candidate.display(), e);
                    *last_num = num;
                    return candidate;
                }
            }
        }

        warn!(
            "output sequence exhausted, reusing fallback slot {}",
            file_name(FALLBACK_SEQ)
        );
        *last_num = 0;
        self.output_dir.join(file_name(FALLBACK_SEQ))
    }
}

fn file_name(num: u32) -> String {
    format!("{num:05}.wav")
}
