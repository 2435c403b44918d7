//! Parser for the per-uid tagged table (`stats`).
//!
//! Row layout (first nine columns; newer kernels append more):
//!
//! ```text
//! idx iface 0x<tag> uid set rx_bytes rx_packets tx_bytes tx_packets ...
//! ```
//!
//! Tag zero rows hold the untagged total for a uid. Tagged rows are
//! sub-totals of the same traffic and are never added to a uid's counters.

use std::path::Path;

use trafficstat_common::error::Result;
use trafficstat_common::types::StatsValue;

use super::{fields, scan_table};

/// One parsed row of the uid table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UidRow<'a> {
    /// Row index.
    pub idx: u32,
    /// Interface name.
    pub iface: &'a str,
    /// Accounting tag; zero for untagged traffic.
    pub tag: u64,
    /// Application uid.
    pub uid: u32,
    /// Counter set (foreground/background).
    pub set: u32,
    /// Byte and packet counters.
    pub stats: StatsValue,
}

/// Parses the first nine columns of a uid table line.
///
/// Returns `None` if any of the nine is missing or malformed.
#[must_use]
pub fn parse_uid_line(line: &str) -> Option<UidRow<'_>> {
    let mut tokens = line.split_whitespace();
    let idx = fields::id(tokens.next()?)?;
    let iface = fields::iface_name(tokens.next()?)?;
    let tag = fields::tag_hex(tokens.next()?)?;
    let uid = fields::id(tokens.next()?)?;
    let set = fields::id(tokens.next()?)?;
    let rx_bytes = fields::counter(tokens.next()?)?;
    let rx_packets = fields::counter(tokens.next()?)?;
    let tx_bytes = fields::counter(tokens.next()?)?;
    let tx_packets = fields::counter(tokens.next()?)?;

    Some(UidRow {
        idx,
        iface,
        tag,
        uid,
        set,
        stats: StatsValue::new(rx_bytes, rx_packets, tx_bytes, tx_packets),
    })
}

/// Sums the untagged rows for `uid` in the table at `path`.
///
/// Rows for every interface and counter set are added together.
///
/// # Errors
///
/// Returns an error if the table cannot be opened, read, or closed.
pub fn parse_uid_stats_at(path: &Path, uid: u32) -> Result<StatsValue> {
    let mut total = StatsValue::default();
    let _ = scan_table(path, |line| {
        let Some(row) = parse_uid_line(line) else {
            return false;
        };
        if row.uid == uid && row.tag == 0 {
            total.accumulate(&row.stats);
        }
        true
    })?;
    tracing::debug!(path = %path.display(), uid, ?total, "parsed uid table");
    Ok(total)
}
