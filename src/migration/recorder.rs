//! Append-only failure log.
//!
//! One human-readable line per entity that could not be migrated, so a
//! person can fix or retry just those items later. Recording never fails:
//! a broken sink is reported through tracing and otherwise ignored.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::Utc;
use parking_lot::Mutex;

use super::domain::FailureRecord;

/// Writes [`FailureRecord`]s to an append-only sink.
///
/// The sink sits behind a mutex so concurrent callers can't interleave lines.
pub struct FailureRecorder {
    sink: Mutex<Box<dyn Write + Send>>,
    path: Option<PathBuf>,
    recorded: AtomicUsize,
}

impl FailureRecorder {
    /// Open (or create) a log file in append mode
    pub fn open_append(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let file: File = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            sink: Mutex::new(Box::new(file)),
            path: Some(path.to_path_buf()),
            recorded: AtomicUsize::new(0),
        })
    }

    /// Record into an arbitrary writer
    pub fn from_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            sink: Mutex::new(Box::new(writer)),
            path: None,
            recorded: AtomicUsize::new(0),
        }
    }

    /// Path of the underlying file, if file-backed
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Number of records submitted, whether or not the write succeeded
    pub fn recorded(&self) -> usize {
        self.recorded.load(Ordering::Relaxed)
    }

    /// Append one record. Never returns an error.
    pub fn record(&self, record: &FailureRecord) {
        self.recorded.fetch_add(1, Ordering::Relaxed);

        let line = record.to_string().replace(['\r', '\n'], " ");
        tracing::info!("Failed: {}", line);

        let mut sink = self.sink.lock();
        let result = writeln!(sink, "{} {}", Utc::now().to_rfc3339(), line).and_then(|_| sink.flush());
        if let Err(e) = result {
            tracing::warn!("Error writing to failure log, record dropped ({}): {}", e, line);
        }
    }
}

/// Test writers
#[cfg(test)]
pub mod testing {
    use std::io::{self, Write};
    use std::sync::Arc;

    use parking_lot::Mutex;

    /// A cloneable in-memory writer whose contents can be read back
    #[derive(Clone, Default)]
    pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        pub fn lines(&self) -> Vec<String> {
            String::from_utf8_lossy(&self.0.lock())
                .lines()
                .map(String::from)
                .collect()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// A writer that always fails
    pub struct BrokenSink;

    impl Write for BrokenSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::InvalidData, "cannot encode"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }
}
