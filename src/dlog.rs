//! [DurabilityLog]: append-only JSON-lines write-ahead log for the store.
//!
//! One file per process, fixed name (`data_store.log` by default, see
//! [crate::config]), textual, UTF-8, append-only. Every successful `insert`
//! writes and flushes exactly one line before returning; `initialize`
//! replays every line back into the index before the store starts serving
//! traffic.

use std::{
    fs,
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
};

use fs2::FileExt;

use crate::{err_at, Error, Result, Sample};

/// Open handle onto the append-only log file, plus the path it was opened
/// from (kept so `shutdown`/`Drop` can log it and so replay can reopen for
/// append after a read pass).
pub struct DurabilityLog {
    path: PathBuf,
    file: Option<fs::File>,
}

impl DurabilityLog {
    /// Open (creating if absent) the log at `path` for append, without
    /// replaying it. Use [DurabilityLog::replay] separately to read back
    /// existing content during `initialize`.
    pub fn open(path: impl AsRef<Path>) -> Result<DurabilityLog> {
        let path = path.as_ref().to_path_buf();
        let file = err_at!(
            IOError,
            fs::OpenOptions::new().create(true).append(true).open(&path)
        )?;
        err_at!(IOError, file.lock_exclusive())?;
        Ok(DurabilityLog {
            path,
            file: Some(file),
        })
    }

    /// Read back every line currently in the log, in file order, without
    /// touching the write cursor used by subsequent `append` calls.
    ///
    /// A line that fails to parse aborts with `Error::ReplayParse` — no
    /// partial replay; the caller (`initialize`) surfaces this as
    /// `failed` and the store stays unusable.
    pub fn replay(path: impl AsRef<Path>) -> Result<Vec<Sample>> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let file = err_at!(IOError, fs::File::open(path))?;
        let reader = io::BufReader::new(file);

        let mut samples = Vec::new();
        for (line_no, line) in reader.lines().enumerate() {
            let line = err_at!(IOError, line)?;
            if line.trim().is_empty() {
                continue;
            }
            let sample: Sample = serde_json::from_str(&line)
                .map_err(|_| Error::ReplayParse(format!("{}:{}", file!(), line!()), line_no))?;
            samples.push(sample);
        }
        Ok(samples)
    }

    /// Append one sample as a canonical JSON-lines record and flush.
    ///
    /// Flushes the OS buffer (`File::flush`) but does not `fsync`; that
    /// matches the "flush on every write" durability contract, not a
    /// stronger crash-safety guarantee.
    pub fn append(&mut self, sample: &Sample) -> Result<()> {
        let file = self.file.as_mut().ok_or_else(|| {
            Error::InvalidState(format!("{}:{} log already closed", file!(), line!()))
        })?;
        let mut line = err_at!(IOError, serde_json::to_string(sample).map_err(to_io_error))?;
        line.push('\n');
        err_at!(IOError, file.write_all(line.as_bytes()))?;
        err_at!(IOError, file.flush())?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Close the log. After this, `append` on this instance fails with
    /// `InvalidState`.
    pub fn close(&mut self) -> Result<()> {
        if let Some(file) = self.file.take() {
            err_at!(IOError, file.unlock())?;
            err_at!(IOError, file.sync_all())?;
        }
        Ok(())
    }
}

impl Drop for DurabilityLog {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

fn to_io_error(err: serde_json::Error) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, err)
}

#[cfg(test)]
#[path = "dlog_test.rs"]
mod dlog_test;
