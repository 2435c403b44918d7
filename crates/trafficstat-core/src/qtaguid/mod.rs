//! Readers for the `xt_qtaguid` text tables.
//!
//! Each read opens the table, scans it line by line, and closes the
//! handle before returning. A close failure is reported as an error so
//! that callers polling on a timer never leak descriptors silently.

pub mod fields;
pub mod iface;
pub mod uid;

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use trafficstat_common::config::TrafficStatConfig;
use trafficstat_common::constants;
use trafficstat_common::error::{Result, TrafficStatError};
use trafficstat_common::types::StatsValue;

pub use iface::parse_iface_stats_at;
pub use uid::parse_uid_stats_at;

/// Fallback source backed by the legacy kernel tables.
///
/// The query layer talks to this trait rather than to the parsers directly
/// so alternative table locations (or test doubles) can be plugged in.
pub trait LegacyTables: Send + Sync {
    /// Sums the interface table rows, optionally restricted to one interface.
    ///
    /// # Errors
    ///
    /// Returns [`TrafficStatError::Io`] if the table cannot be opened, read,
    /// or closed.
    fn iface_stats(&self, iface: Option<&str>) -> Result<StatsValue>;

    /// Sums the untagged uid table rows belonging to `uid`.
    ///
    /// # Errors
    ///
    /// Returns [`TrafficStatError::Io`] if the table cannot be opened, read,
    /// or closed.
    fn uid_stats(&self, uid: u32) -> Result<StatsValue>;
}

/// The two `xt_qtaguid` tables at configurable paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QtaguidTables {
    iface_path: PathBuf,
    uid_path: PathBuf,
}

impl QtaguidTables {
    /// Creates a reader for tables at the given paths.
    #[must_use]
    pub fn new(iface_path: impl Into<PathBuf>, uid_path: impl Into<PathBuf>) -> Self {
        Self {
            iface_path: iface_path.into(),
            uid_path: uid_path.into(),
        }
    }

    /// Creates a reader for the table paths named in `config`.
    #[must_use]
    pub fn from_config(config: &TrafficStatConfig) -> Self {
        Self::new(&config.iface_stat_path, &config.uid_stat_path)
    }

    /// Returns the interface table path.
    #[must_use]
    pub fn iface_path(&self) -> &Path {
        &self.iface_path
    }

    /// Returns the uid table path.
    #[must_use]
    pub fn uid_path(&self) -> &Path {
        &self.uid_path
    }
}

impl Default for QtaguidTables {
    fn default() -> Self {
        Self::new(constants::QTAGUID_IFACE_STATS, constants::QTAGUID_UID_STATS)
    }
}

impl LegacyTables for QtaguidTables {
    fn iface_stats(&self, iface: Option<&str>) -> Result<StatsValue> {
        parse_iface_stats_at(&self.iface_path, iface)
    }

    fn uid_stats(&self, uid: u32) -> Result<StatsValue> {
        parse_uid_stats_at(&self.uid_path, uid)
    }
}

/// Per-table scan outcome, kept for logging.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScanSummary {
    pub(crate) matched: usize,
    pub(crate) skipped: usize,
}

/// Opens `path`, feeds every line to `visit`, and closes the file.
///
/// `visit` returns whether the line was well formed. Lines longer than
/// [`constants::MAX_LINE_LEN`] are skipped without reaching `visit`. Bytes
/// that are not UTF-8 are replaced, so they only spoil the fields they sit in.
pub(crate) fn scan_table(path: &Path, visit: impl FnMut(&str) -> bool) -> Result<ScanSummary> {
    scan_table_with(path, visit, close_table)
}

fn scan_table_with(
    path: &Path,
    mut visit: impl FnMut(&str) -> bool,
    close: impl FnOnce(File) -> std::io::Result<()>,
) -> Result<ScanSummary> {
    let file = File::open(path).map_err(|e| TrafficStatError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut summary = ScanSummary::default();
    let scanned = {
        let mut reader = BufReader::new(&file);
        let mut buf = Vec::with_capacity(constants::MAX_LINE_LEN);
        loop {
            buf.clear();
            match read_bounded_line(&mut reader, &mut buf) {
                Ok(None) => break Ok(()),
                Ok(Some(true)) if visit(&String::from_utf8_lossy(&buf)) => summary.matched += 1,
                Ok(Some(_)) => summary.skipped += 1,
                Err(e) => break Err(e),
            }
        }
    };

    let released = close(file).map_err(|e| {
        tracing::warn!(path = %path.display(), error = %e, "table close failed");
        TrafficStatError::Io {
            path: path.to_path_buf(),
            source: e,
        }
    });
    scanned.map_err(|e| {
        tracing::warn!(path = %path.display(), error = %e, "table read failed");
        TrafficStatError::Io {
            path: path.to_path_buf(),
            source: e,
        }
    })?;
    released?;

    tracing::debug!(
        path = %path.display(),
        matched = summary.matched,
        skipped = summary.skipped,
        "scanned table"
    );
    Ok(summary)
}

/// Reads one line of at most [`constants::MAX_LINE_LEN`] bytes into `buf`.
///
/// Returns `None` at end of input and `Some(false)` for an overlong line,
/// whose remainder is consumed up to the next newline.
fn read_bounded_line(reader: &mut impl BufRead, buf: &mut Vec<u8>) -> std::io::Result<Option<bool>> {
    let limit = constants::MAX_LINE_LEN as u64;
    let read = reader.by_ref().take(limit).read_until(b'\n', buf)?;
    if read == 0 {
        return Ok(None);
    }
    if buf.len() == constants::MAX_LINE_LEN && buf.last() != Some(&b'\n') {
        let _ = reader.skip_until(b'\n')?;
        return Ok(Some(false));
    }
    Ok(Some(true))
}

/// Closes `file`, surfacing any error `close(2)` reports.
#[cfg(unix)]
fn close_table(file: File) -> std::io::Result<()> {
    nix::unistd::close(file).map_err(std::io::Error::from)
}

/// Closes `file`. Close errors are not observable on this platform.
#[cfg(not(unix))]
fn close_table(file: File) -> std::io::Result<()> {
    drop(file);
    Ok(())
}
