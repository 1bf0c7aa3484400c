//! JSONL sink: append-only line-delimited JSON activity log.
//!
//! Each line is a self-contained JSON object written with a single
//! `write_all`, so a concurrent `tail -f` never sees a torn line. When the
//! file cannot be opened or written the sink degrades to stderr, then to
//! silent discard; logging must never take the dashboard down.

#![allow(missing_docs)]

use std::fs::{self, File, OpenOptions, rename};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use super::{LogEntry, LogSink};
use crate::core::errors::{HecError, Result};

/// Degradation state of the writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriterState {
    File,
    Stderr,
    Discard,
}

/// Configuration for the JSONL sink.
#[derive(Debug, Clone)]
pub struct JsonlConfig {
    pub path: PathBuf,
    /// Rotate to `<path>.1` once the file would exceed this size.
    pub max_size_bytes: u64,
}

impl JsonlConfig {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_size_bytes: 10 * 1024 * 1024,
        }
    }
}

struct Writer {
    config: JsonlConfig,
    file: Option<BufWriter<File>>,
    state: WriterState,
    bytes_written: u64,
}

/// Thread-safe JSONL [`LogSink`].
pub struct JsonlSink {
    inner: Mutex<Writer>,
}

impl JsonlSink {
    /// Open the log file, degrading to stderr if that fails.
    pub fn open(config: JsonlConfig) -> Self {
        let mut writer = Writer {
            config,
            file: None,
            state: WriterState::Discard,
            bytes_written: 0,
        };
        writer.reopen();
        Self {
            inner: Mutex::new(writer),
        }
    }

    /// Current degradation state.
    pub fn state(&self) -> &'static str {
        match self.inner.lock().state {
            WriterState::File => "file",
            WriterState::Stderr => "stderr",
            WriterState::Discard => "discard",
        }
    }

    pub fn flush(&self) {
        if let Some(file) = self.inner.lock().file.as_mut() {
            let _ = file.flush();
        }
    }
}

impl LogSink for JsonlSink {
    fn record(&self, entry: &LogEntry) {
        let line = match serde_json::to_string(entry) {
            Ok(json) => format!("{json}\n"),
            Err(e) => {
                let _ = writeln!(io::stderr(), "[HEC-JSONL] serialize error: {e}");
                return;
            }
        };
        let mut writer = self.inner.lock();
        writer.write_line(&line);
        // Activity is sparse; flush per line so operators can tail the file.
        if let Some(file) = writer.file.as_mut() {
            let _ = file.flush();
        }
    }
}

impl Drop for JsonlSink {
    fn drop(&mut self) {
        self.flush();
    }
}

impl Writer {
    fn reopen(&mut self) {
        match open_append(&self.config.path) {
            Ok((file, size)) => {
                self.file = Some(BufWriter::new(file));
                self.state = WriterState::File;
                self.bytes_written = size;
            }
            Err(err) => {
                let _ = writeln!(io::stderr(), "[HEC-JSONL] {err}, using stderr");
                self.file = None;
                self.state = WriterState::Stderr;
            }
        }
    }

    fn write_line(&mut self, line: &str) {
        if self.state == WriterState::File
            && self.bytes_written + line.len() as u64 > self.config.max_size_bytes
        {
            self.rotate();
        }

        match self.state {
            WriterState::File => {
                let ok = self
                    .file
                    .as_mut()
                    .is_some_and(|f| f.write_all(line.as_bytes()).is_ok());
                if ok {
                    self.bytes_written += line.len() as u64;
                } else {
                    self.degrade();
                    self.write_line(line);
                }
            }
            WriterState::Stderr => {
                if write!(io::stderr(), "[HEC-JSONL] {line}").is_err() {
                    self.degrade();
                }
            }
            WriterState::Discard => {}
        }
    }

    fn degrade(&mut self) {
        self.file = None;
        self.state = match self.state {
            WriterState::File => WriterState::Stderr,
            WriterState::Stderr | WriterState::Discard => WriterState::Discard,
        };
    }

    fn rotate(&mut self) {
        if let Some(file) = self.file.as_mut() {
            let _ = file.flush();
        }
        self.file = None;
        let _ = rename(&self.config.path, rotated_name(&self.config.path));
        self.reopen();
    }
}

/// Open or create a file for appending. Returns `(File, current_size)`.
fn open_append(path: &Path) -> Result<(File, u64)> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| HecError::io(parent, source))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| HecError::io(path, source))?;
    let size = file.metadata().map(|m| m.len()).unwrap_or(0);
    Ok((file, size))
}

/// `activity.jsonl` → `activity.jsonl.1`.
fn rotated_name(base: &Path) -> PathBuf {
    let mut name = base.as_os_str().to_owned();
    name.push(".1");
    PathBuf::from(name)
}
